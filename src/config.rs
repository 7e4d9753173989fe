use egui::{Color32, Vec2};
use serde::{Deserialize, Serialize};

use crate::path::{MAX_STROKE_WIDTH, MIN_STROKE_WIDTH, StrokeStyle};

/// Tunables for the canvas widget, supplied by the host at mount time.
///
/// Missing fields fall back to [`CanvasConfig::default`] when deserializing,
/// so a host only has to spell out what it wants to change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CanvasConfig {
    /// Lower bound for the zoom factor
    pub min_zoom: f32,
    /// Upper bound for the zoom factor
    pub max_zoom: f32,
    /// Multiplicative zoom change per wheel notch
    pub wheel_zoom_step: f32,
    /// Multiplicative zoom change for the zoom in/out buttons
    pub button_zoom_step: f32,
    /// Grid cell size in world units
    pub grid_size: f32,
    /// Grid is not drawn when a cell would be smaller than this on screen
    pub min_grid_spacing: f32,
    pub background_color: Color32,
    pub grid_color: Color32,
    /// World-space size of a freshly placed image
    pub default_image_size: Vec2,
    /// Style the pencil starts with
    pub default_stroke: StrokeStyle,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            min_zoom: 0.1,
            max_zoom: 5.0,
            wheel_zoom_step: 1.1,
            button_zoom_step: 1.2,
            grid_size: 50.0,
            min_grid_spacing: 10.0,
            background_color: Color32::from_rgb(0x11, 0x18, 0x27),
            grid_color: Color32::from_rgb(0x37, 0x41, 0x51),
            default_image_size: Vec2::splat(200.0),
            default_stroke: StrokeStyle::default(),
        }
    }
}

impl CanvasConfig {
    /// Replace values the canvas cannot work with by their defaults.
    ///
    /// Zoom bounds must be positive and ordered, zoom steps greater than one,
    /// grid and image sizes positive. Each replacement is logged.
    pub fn sanitized(mut self) -> Self {
        let defaults = Self::default();

        if !(self.min_zoom.is_finite() && self.min_zoom > 0.0) {
            log::warn!("min_zoom {} is not positive, using {}", self.min_zoom, defaults.min_zoom);
            self.min_zoom = defaults.min_zoom;
        }
        if !(self.max_zoom.is_finite() && self.max_zoom >= self.min_zoom) {
            let max_zoom = defaults.max_zoom.max(self.min_zoom);
            log::warn!("max_zoom {} is below min_zoom, using {}", self.max_zoom, max_zoom);
            self.max_zoom = max_zoom;
        }
        if !(self.wheel_zoom_step.is_finite() && self.wheel_zoom_step > 1.0) {
            log::warn!("wheel_zoom_step {} must exceed 1, using {}", self.wheel_zoom_step, defaults.wheel_zoom_step);
            self.wheel_zoom_step = defaults.wheel_zoom_step;
        }
        if !(self.button_zoom_step.is_finite() && self.button_zoom_step > 1.0) {
            log::warn!("button_zoom_step {} must exceed 1, using {}", self.button_zoom_step, defaults.button_zoom_step);
            self.button_zoom_step = defaults.button_zoom_step;
        }
        if !(self.grid_size.is_finite() && self.grid_size > 0.0) {
            log::warn!("grid_size {} is not positive, using {}", self.grid_size, defaults.grid_size);
            self.grid_size = defaults.grid_size;
        }
        if !(self.min_grid_spacing.is_finite() && self.min_grid_spacing > 0.0) {
            log::warn!("min_grid_spacing {} is not positive, using {}", self.min_grid_spacing, defaults.min_grid_spacing);
            self.min_grid_spacing = defaults.min_grid_spacing;
        }
        if !(self.default_image_size.x > 0.0 && self.default_image_size.y > 0.0) {
            log::warn!("default_image_size {:?} is not positive, using {:?}", self.default_image_size, defaults.default_image_size);
            self.default_image_size = defaults.default_image_size;
        }

        let stroke = &mut self.default_stroke;
        stroke.width = if stroke.width.is_finite() {
            stroke.width.clamp(MIN_STROKE_WIDTH, MAX_STROKE_WIDTH)
        } else {
            defaults.default_stroke.width
        };
        stroke.opacity = if stroke.opacity.is_finite() {
            stroke.opacity.clamp(0.0, 1.0)
        } else {
            defaults.default_stroke.opacity
        };

        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: CanvasConfig = serde_json::from_str(r#"{ "max_zoom": 8.0 }"#).unwrap();
        assert_eq!(config.max_zoom, 8.0);
        assert_eq!(config.min_zoom, 0.1);
        assert_eq!(config.grid_size, 50.0);
        assert_eq!(config.default_image_size, Vec2::splat(200.0));
    }

    #[test]
    fn test_sanitized_keeps_valid_values() {
        let config = CanvasConfig {
            min_zoom: 0.5,
            max_zoom: 2.0,
            grid_size: 20.0,
            ..CanvasConfig::default()
        };
        assert_eq!(config.clone().sanitized(), config);
    }

    #[test]
    fn test_sanitized_repairs_unusable_values() {
        let config: CanvasConfig = serde_json::from_str(
            r#"{ "min_zoom": 0.0, "max_zoom": -1.0, "wheel_zoom_step": 0.5, "grid_size": 0.0, "min_grid_spacing": -3.0 }"#,
        )
        .unwrap();
        let config = config.sanitized();

        assert_eq!(config.min_zoom, 0.1);
        assert_eq!(config.max_zoom, 5.0);
        assert_eq!(config.wheel_zoom_step, 1.1);
        assert_eq!(config.grid_size, 50.0);
        assert_eq!(config.min_grid_spacing, 10.0);
    }

    #[test]
    fn test_sanitized_clamps_default_stroke() {
        let mut config = CanvasConfig::default();
        config.default_stroke.width = 500.0;
        config.default_stroke.opacity = 2.0;
        let stroke = config.sanitized().default_stroke;
        assert_eq!(stroke.width, MAX_STROKE_WIDTH);
        assert_eq!(stroke.opacity, 1.0);
    }
}
