//! Connection path geometry.
//!
//! A connection is drawn as a cubic Bézier between two card rectangles.
//! Stacked cards (target below, roughly aligned) get a vertical curve from
//! bottom-center to top-center; everything else gets a horizontal curve
//! from right-center to left-center.

use cork_core::model::{Connection, Point, Rect};
use cork_core::store::Board;
use kurbo::{BezPath, CubicBez, ParamCurve};

const VERTICAL_MAX_CURVATURE: f32 = 100.0;
const HORIZONTAL_MAX_CURVATURE: f32 = 300.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    Vertical,
    Horizontal,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConnectionPath {
    pub orientation: Orientation,
    pub curve: CubicBez,
}

impl ConnectionPath {
    pub fn start(&self) -> Point {
        to_point(self.curve.p0)
    }

    pub fn end(&self) -> Point {
        to_point(self.curve.p3)
    }

    /// Point halfway along the curve; anchors the label.
    pub fn midpoint(&self) -> Point {
        to_point(self.curve.eval(0.5))
    }

    /// SVG path data (`M … C …`).
    pub fn to_svg(&self) -> String {
        let mut path = BezPath::new();
        path.move_to(self.curve.p0);
        path.curve_to(self.curve.p1, self.curve.p2, self.curve.p3);
        path.to_svg()
    }
}

fn kp(p: Point) -> kurbo::Point {
    kurbo::Point::new(p.x as f64, p.y as f64)
}

fn to_point(p: kurbo::Point) -> Point {
    Point::new(p.x as f32, p.y as f32)
}

/// Shape the curve between two card rectangles.
pub fn connection_path(source: Rect, target: Rect) -> ConnectionPath {
    let aligned = (target.center().x - source.center().x).abs() < source.width / 2.0;
    let below = target.y > source.bottom();

    if aligned && below {
        let start = source.bottom_center();
        let end = target.top_center();
        let c = ((end.y - start.y) * 0.5).min(VERTICAL_MAX_CURVATURE);
        ConnectionPath {
            orientation: Orientation::Vertical,
            curve: CubicBez::new(
                kp(start),
                kp(Point::new(start.x, start.y + c)),
                kp(Point::new(end.x, end.y - c)),
                kp(end),
            ),
        }
    } else {
        let start = source.right_center();
        let end = target.left_center();
        let c = ((end.x - start.x).abs() * 0.5).min(HORIZONTAL_MAX_CURVATURE);
        ConnectionPath {
            orientation: Orientation::Horizontal,
            curve: CubicBez::new(
                kp(start),
                kp(Point::new(start.x + c, start.y)),
                kp(Point::new(end.x - c, end.y)),
                kp(end),
            ),
        }
    }
}

/// Paths for every connection whose endpoints are both on the board.
/// Connections referencing missing cards are skipped.
pub fn connection_paths(board: &Board) -> Vec<(&Connection, ConnectionPath)> {
    board
        .connections
        .iter()
        .filter_map(|conn| {
            let source = board.cards.get(conn.source)?;
            let target = board.cards.get(conn.target)?;
            Some((conn, connection_path(source.bounds(), target.bounds())))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn stacked_cards_get_vertical_curve() {
        let source = Rect::new(0.0, 0.0, 200.0, 100.0);
        let target = Rect::new(40.0, 400.0, 200.0, 100.0);
        let path = connection_path(source, target);
        assert_eq!(path.orientation, Orientation::Vertical);
        assert_eq!(path.start(), Point::new(100.0, 100.0));
        assert_eq!(path.end(), Point::new(140.0, 400.0));
        // 300 * 0.5 = 150, capped at 100
        assert_eq!(path.curve.p1, kurbo::Point::new(100.0, 200.0));
        assert_eq!(path.curve.p2, kurbo::Point::new(140.0, 300.0));
    }

    #[test]
    fn short_vertical_gap_uses_half_distance() {
        let source = Rect::new(0.0, 0.0, 200.0, 100.0);
        let target = Rect::new(0.0, 160.0, 200.0, 100.0);
        let path = connection_path(source, target);
        assert_eq!(path.orientation, Orientation::Vertical);
        assert_eq!(path.curve.p1, kurbo::Point::new(100.0, 130.0));
    }

    #[test]
    fn misaligned_or_above_gets_horizontal_curve() {
        let source = Rect::new(0.0, 0.0, 200.0, 100.0);
        // Centers 150 apart, more than half the source width.
        let side = connection_path(source, Rect::new(150.0, 400.0, 200.0, 100.0));
        assert_eq!(side.orientation, Orientation::Horizontal);
        // Aligned but above.
        let above = connection_path(source, Rect::new(0.0, -300.0, 200.0, 100.0));
        assert_eq!(above.orientation, Orientation::Horizontal);
        assert_eq!(above.start(), Point::new(200.0, 50.0));
        assert_eq!(above.end(), Point::new(0.0, -250.0));
    }

    #[test]
    fn horizontal_curvature_is_capped() {
        let source = Rect::new(0.0, 0.0, 100.0, 100.0);
        let near = connection_path(source, Rect::new(300.0, 0.0, 100.0, 100.0));
        assert_eq!(near.curve.p1, kurbo::Point::new(200.0, 50.0));
        let far = connection_path(source, Rect::new(2100.0, 0.0, 100.0, 100.0));
        assert_eq!(far.curve.p1, kurbo::Point::new(400.0, 50.0));
        assert_eq!(far.curve.p2, kurbo::Point::new(1800.0, 50.0));
    }

    #[test]
    fn svg_and_midpoint() {
        let source = Rect::new(0.0, 0.0, 100.0, 100.0);
        let path = connection_path(source, Rect::new(300.0, 0.0, 100.0, 100.0));
        assert!(path.to_svg().starts_with("M100"));
        assert_eq!(path.midpoint(), Point::new(200.0, 50.0));
    }
}
