//! Editor configuration.
//!
//! All tolerances that are given in screen pixels are divided by the current
//! zoom before they are compared against world-space distances.

use crate::shapes::{SerializableColor, ShapeStyle};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// Tunables for the view transform, hit-testing and editing behaviour.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EditorConfig {
    /// Minimum zoom level.
    pub min_zoom: f64,
    /// Maximum zoom level.
    pub max_zoom: f64,
    /// Additive step used by zoom in/out commands.
    pub zoom_step: f64,
    /// Multiplicative factor applied per wheel notch when zooming at the cursor.
    pub wheel_zoom_factor: f64,
    /// Margin kept around the scene by fit-to-screen (screen pixels).
    pub fit_margin: f64,
    /// Resize handle hit radius (screen pixels).
    pub handle_radius: f64,
    /// Snap radius for precomputed anchor handles (screen pixels).
    pub anchor_snap_radius: f64,
    /// Snap radius for free edge anchoring (screen pixels).
    pub edge_snap_radius: f64,
    /// Extra slack around thin strokes when hit-testing (screen pixels).
    pub stroke_hit_slack: f64,
    /// Shapes smaller than this (world units) are discarded on commit.
    pub min_draw_size: f64,
    /// Offset applied by keyboard duplication (world units).
    pub duplicate_offset: f64,
    /// Maximum number of history entries kept.
    pub history_capacity: usize,
    /// How long a failed upload placeholder stays visible (milliseconds).
    pub upload_error_ttl_ms: u64,
    /// Size of shapes placed by the PlusAdd tool.
    pub placement_size: f64,
    /// Size of icons placed by the IconAdd tool.
    pub icon_size: f64,
    /// Longest side of an inserted image (world units).
    pub max_image_size: f64,
    /// Stroke width given to new shapes.
    pub default_stroke_width: f64,
    /// Stroke color given to new shapes (None = theme foreground).
    pub default_stroke: Option<SerializableColor>,
    /// Fill color given to new box shapes.
    pub default_fill: Option<SerializableColor>,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            min_zoom: 0.1,
            max_zoom: 5.0,
            zoom_step: 0.1,
            wheel_zoom_factor: 1.1,
            fit_margin: 80.0,
            handle_radius: 8.0,
            anchor_snap_radius: 14.0,
            edge_snap_radius: 20.0,
            stroke_hit_slack: 6.0,
            min_draw_size: 3.0,
            duplicate_offset: 20.0,
            history_capacity: 200,
            upload_error_ttl_ms: 3000,
            placement_size: 120.0,
            icon_size: 48.0,
            max_image_size: 480.0,
            default_stroke_width: 2.0,
            default_stroke: None,
            default_fill: None,
        }
    }
}

impl EditorConfig {
    /// Style given to newly created shapes.
    pub fn default_style(&self) -> ShapeStyle {
        ShapeStyle {
            fill: self.default_fill,
            stroke: self.default_stroke,
            stroke_width: self.default_stroke_width,
            ..ShapeStyle::default()
        }
    }

    /// Parse a config from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Check the config for values the editor cannot work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.min_zoom <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "minZoom must be positive, got {}",
                self.min_zoom
            )));
        }
        if self.min_zoom > self.max_zoom {
            return Err(ConfigError::Invalid(format!(
                "minZoom ({}) exceeds maxZoom ({})",
                self.min_zoom, self.max_zoom
            )));
        }
        let radii = [
            ("handleRadius", self.handle_radius),
            ("anchorSnapRadius", self.anchor_snap_radius),
            ("edgeSnapRadius", self.edge_snap_radius),
            ("zoomStep", self.zoom_step),
        ];
        for (name, value) in radii {
            if value <= 0.0 {
                return Err(ConfigError::Invalid(format!("{name} must be positive")));
            }
        }
        if self.wheel_zoom_factor <= 1.0 {
            return Err(ConfigError::Invalid(
                "wheelZoomFactor must be greater than 1".to_string(),
            ));
        }
        if self.history_capacity < 2 {
            return Err(ConfigError::Invalid(
                "historyCapacity must keep at least two entries".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(EditorConfig::default().validate().is_ok());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = EditorConfig::from_json(r#"{ "maxZoom": 8.0 }"#).unwrap();
        assert!((config.max_zoom - 8.0).abs() < f64::EPSILON);
        assert!((config.min_zoom - 0.1).abs() < f64::EPSILON);
        assert!((config.fit_margin - 80.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_rejects_inverted_zoom_bounds() {
        let err = EditorConfig::from_json(r#"{ "minZoom": 3.0, "maxZoom": 2.0 }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_rejects_bad_json() {
        let err = EditorConfig::from_json("{ nope").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }
}
