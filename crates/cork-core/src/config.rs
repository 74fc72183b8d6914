//! Canvas configuration: zoom limits, card geometry, layout spacing.
//!
//! Every field has a default, so a config document only needs the values it
//! overrides. The browser bridge hands the config over as JSON.

use crate::model::{Point, Size};
use serde::{Deserialize, Serialize};

// ─── Config ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CanvasConfig {
    /// Lower zoom bound. Default: **0.1**.
    pub min_scale: f32,
    /// Upper zoom bound. Default: **4.0**.
    pub max_scale: f32,
    /// Scale change per zoom-in / zoom-out step. Default: **0.1**.
    pub zoom_step: f32,
    /// Scale change per wheel delta unit while Cmd/Ctrl is held. Default: **0.001**.
    pub wheel_zoom_sensitivity: f32,
    /// Size of newly created cards.
    pub card_width: f32,
    pub card_height: f32,
    /// Spacing between auto-laid-out cards.
    pub card_gap: f32,
    /// Where the first batch lands on an empty board.
    pub layout_origin: Point,
    /// Side of the square link affordance in a card's top-right corner.
    pub link_handle_size: f32,
    /// Screen-space margin kept around content by zoom-to-fit.
    pub fit_padding: f32,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            min_scale: 0.1,
            max_scale: 4.0,
            zoom_step: 0.1,
            wheel_zoom_sensitivity: 0.001,
            card_width: 320.0,
            card_height: 220.0,
            card_gap: 60.0,
            layout_origin: Point::new(100.0, 100.0),
            link_handle_size: 18.0,
            fit_padding: 80.0,
        }
    }
}

impl CanvasConfig {
    /// Parse a JSON config; missing fields take their defaults.
    ///
    /// # Errors
    /// Returns a message for malformed JSON, unknown fields, or values
    /// rejected by [`CanvasConfig::validate`].
    pub fn from_json(json: &str) -> Result<Self, String> {
        let config: CanvasConfig =
            serde_json::from_str(json).map_err(|e| format!("Config parse error: {e}"))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.min_scale.is_nan() || self.min_scale <= 0.0 {
            return Err(format!("min_scale must be positive, got {}", self.min_scale));
        }
        if self.min_scale > self.max_scale {
            return Err(format!(
                "min_scale {} exceeds max_scale {}",
                self.min_scale, self.max_scale
            ));
        }
        if self.card_width.is_nan()
            || self.card_height.is_nan()
            || self.card_width <= 0.0
            || self.card_height <= 0.0
        {
            return Err("card size must be positive".to_string());
        }
        if self.zoom_step < 0.0 || self.card_gap < 0.0 || self.link_handle_size < 0.0 {
            return Err("zoom_step, card_gap and link_handle_size must not be negative".to_string());
        }
        Ok(())
    }

    pub fn card_size(&self) -> Size {
        Size::new(self.card_width, self.card_height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn empty_json_yields_defaults() {
        assert_eq!(CanvasConfig::from_json("{}").unwrap(), CanvasConfig::default());
    }

    #[test]
    fn partial_override() {
        let config = CanvasConfig::from_json(r#"{"max_scale": 2.5, "card_gap": 10}"#).unwrap();
        assert_eq!(config.max_scale, 2.5);
        assert_eq!(config.card_gap, 10.0);
        assert_eq!(config.min_scale, 0.1);
    }

    #[test]
    fn rejects_unknown_fields_and_bad_limits() {
        assert!(CanvasConfig::from_json(r#"{"zoom": 1}"#).is_err());
        assert!(CanvasConfig::from_json(r#"{"min_scale": 0}"#).is_err());
        assert!(CanvasConfig::from_json(r#"{"min_scale": 5, "max_scale": 4}"#).is_err());
        assert!(CanvasConfig::from_json(r#"{"card_width": -1}"#).is_err());
    }
}
