//! Viewport transform: pan offset + scale factor.
//!
//! Card positions live in canvas space. The presentation layer derives
//! screen positions through this transform:
//!
//! ```text
//! screen = canvas * scale + pan
//! canvas = (screen - pan) / scale
//! ```

use crate::config::CanvasConfig;
use crate::model::{Point, Rect};
use serde::{Deserialize, Serialize};

/// Screen-space size of the visible canvas area, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewportSize {
    pub width: f32,
    pub height: f32,
}

impl ViewportSize {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn center(&self) -> Point {
        Point::new(self.width / 2.0, self.height / 2.0)
    }
}

/// Zoom bounds and step sizes, lifted out of [`CanvasConfig`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScaleLimits {
    pub min: f32,
    pub max: f32,
    pub step: f32,
    pub wheel_sensitivity: f32,
}

impl ScaleLimits {
    /// Clamp into `[min, max]`. Inverted limits resolve to `max` rather
    /// than panicking.
    pub fn clamp(&self, scale: f32) -> f32 {
        scale.max(self.min).min(self.max)
    }
}

impl Default for ScaleLimits {
    fn default() -> Self {
        Self::from(&CanvasConfig::default())
    }
}

impl From<&CanvasConfig> for ScaleLimits {
    fn from(config: &CanvasConfig) -> Self {
        Self {
            min: config.min_scale,
            max: config.max_scale,
            step: config.zoom_step,
            wheel_sensitivity: config.wheel_zoom_sensitivity,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewportTransform {
    /// Canvas-to-screen translation.
    pub pan: Point,
    scale: f32,
    limits: ScaleLimits,
}

impl Default for ViewportTransform {
    fn default() -> Self {
        Self::new(ScaleLimits::default())
    }
}

impl ViewportTransform {
    pub fn new(limits: ScaleLimits) -> Self {
        Self {
            pan: Point::ZERO,
            scale: limits.clamp(1.0),
            limits,
        }
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }

    pub fn limits(&self) -> ScaleLimits {
        self.limits
    }

    /// Swap in new limits, re-clamping the current scale.
    pub fn set_limits(&mut self, limits: ScaleLimits) {
        self.limits = limits;
        self.set_scale(self.scale);
    }

    pub fn to_canvas(&self, screen: Point) -> Point {
        (screen - self.pan) / self.scale
    }

    pub fn to_screen(&self, canvas: Point) -> Point {
        canvas * self.scale + self.pan
    }

    /// Canvas rectangle → screen rectangle.
    pub fn rect_to_screen(&self, rect: Rect) -> Rect {
        let origin = self.to_screen(Point::new(rect.x, rect.y));
        Rect::new(
            origin.x,
            origin.y,
            rect.width * self.scale,
            rect.height * self.scale,
        )
    }

    /// Set the scale, clamped to the configured range. Non-finite input is ignored.
    pub fn set_scale(&mut self, proposed: f32) {
        if !proposed.is_finite() {
            log::debug!("ignoring non-finite scale {proposed}");
            return;
        }
        self.scale = self.limits.clamp(proposed);
    }

    pub fn zoom_in(&mut self) {
        self.set_scale(self.scale + self.limits.step);
    }

    pub fn zoom_out(&mut self) {
        self.set_scale(self.scale - self.limits.step);
    }

    /// Wheel zoom: scrolling up (negative `delta_y`) zooms in.
    pub fn zoom_by_wheel(&mut self, delta_y: f32) {
        self.set_scale(self.scale - delta_y * self.limits.wheel_sensitivity);
    }

    /// Translate by a raw screen-space delta.
    pub fn pan_by(&mut self, dx: f32, dy: f32) {
        self.pan = self.pan + Point::new(dx, dy);
    }

    /// Pan so that `rect`'s center sits at the viewport center at the current scale.
    pub fn center_on(&mut self, rect: Rect, viewport: ViewportSize) {
        self.pan = viewport.center() - rect.center() * self.scale;
    }

    /// Choose the largest allowed scale at which `content` fits inside the
    /// viewport (minus `padding` on each side), then center on it.
    pub fn zoom_to_fit(&mut self, content: Rect, viewport: ViewportSize, padding: f32) {
        let avail_w = (viewport.width - padding * 2.0).max(1.0);
        let avail_h = (viewport.height - padding * 2.0).max(1.0);
        if content.width > 0.0 && content.height > 0.0 {
            let fit = (avail_w / content.width).min(avail_h / content.height);
            self.set_scale(fit);
        }
        self.center_on(content, viewport);
    }

    /// The canvas-space rectangle currently visible on screen.
    pub fn visible_rect(&self, viewport: ViewportSize) -> Rect {
        let top_left = self.to_canvas(Point::ZERO);
        Rect::new(
            top_left.x,
            top_left.y,
            viewport.width / self.scale,
            viewport.height / self.scale,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-4
    }

    #[test]
    fn zoom_in_never_exceeds_max() {
        let mut vt = ViewportTransform::default();
        vt.set_scale(3.95);
        for _ in 0..5 {
            vt.zoom_in();
            assert!(vt.scale() <= 4.0);
        }
        assert_eq!(vt.scale(), 4.0);
    }

    #[test]
    fn inverted_limits_do_not_panic() {
        let limits = ScaleLimits {
            min: 3.0,
            max: 0.5,
            step: 0.1,
            wheel_sensitivity: 0.001,
        };
        let mut vt = ViewportTransform::new(limits);
        assert_eq!(vt.scale(), 0.5);
        vt.zoom_in();
        vt.set_scale(10.0);
        assert_eq!(vt.scale(), 0.5);
    }

    #[test]
    fn zoom_out_never_goes_below_min() {
        let mut vt = ViewportTransform::default();
        vt.set_scale(0.15);
        for _ in 0..5 {
            vt.zoom_out();
            assert!(vt.scale() >= 0.1);
        }
        assert_eq!(vt.scale(), 0.1);
    }

    #[test]
    fn set_scale_clamps_and_ignores_nan() {
        let mut vt = ViewportTransform::default();
        vt.set_scale(100.0);
        assert_eq!(vt.scale(), 4.0);
        vt.set_scale(-3.0);
        assert_eq!(vt.scale(), 0.1);
        vt.set_scale(f32::NAN);
        assert_eq!(vt.scale(), 0.1);
    }

    #[test]
    fn canvas_screen_roundtrip() {
        let mut vt = ViewportTransform::default();
        vt.pan = Point::new(-120.0, 45.5);
        vt.set_scale(1.75);
        for p in [
            Point::new(0.0, 0.0),
            Point::new(310.25, -80.0),
            Point::new(-1500.0, 2200.5),
        ] {
            let back = vt.to_canvas(vt.to_screen(p));
            assert!(approx(back.x, p.x) && approx(back.y, p.y), "{p:?} -> {back:?}");
        }
    }

    #[test]
    fn wheel_zoom_direction() {
        let mut vt = ViewportTransform::default();
        vt.zoom_by_wheel(-100.0);
        assert!(approx(vt.scale(), 1.1));
        vt.zoom_by_wheel(200.0);
        assert!(approx(vt.scale(), 0.9));
    }

    #[test]
    fn center_on_maps_card_center_to_viewport_center() {
        let mut vt = ViewportTransform::default();
        vt.set_scale(2.0);
        let rect = Rect::new(100.0, 200.0, 300.0, 100.0);
        let viewport = ViewportSize::new(800.0, 600.0);
        vt.center_on(rect, viewport);
        assert_eq!(vt.pan, Point::new(400.0 - 250.0 * 2.0, 300.0 - 250.0 * 2.0));
        let screen = vt.to_screen(rect.center());
        assert!(approx(screen.x, 400.0) && approx(screen.y, 300.0));
    }

    #[test]
    fn zoom_to_fit_respects_limits() {
        let mut vt = ViewportTransform::default();
        let viewport = ViewportSize::new(800.0, 600.0);
        vt.zoom_to_fit(Rect::new(0.0, 0.0, 10.0, 10.0), viewport, 50.0);
        assert_eq!(vt.scale(), 4.0);
        vt.zoom_to_fit(Rect::new(0.0, 0.0, 1400.0, 1000.0), viewport, 100.0);
        assert!(approx(vt.scale(), 0.4));
        let visible = vt.visible_rect(viewport);
        assert!(visible.contains(Point::new(700.0, 500.0)));
    }
}
