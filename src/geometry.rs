//! Viewport transform for the infinite canvas.
//!
//! Two coordinate systems are in play:
//! - **Screen space**: pixels relative to the drawing surface's top-left corner
//! - **World space**: the fixed drawing coordinates that paths and images live in
//!
//! World origin sits at the surface center shifted by `pan`, scaled by `zoom`.

use egui::{Pos2, Rect, Vec2};
use serde::{Deserialize, Serialize};

/// Zoom and pan of the view onto the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    /// Scale factor (1.0 = 100%)
    pub zoom: f32,
    /// Offset in screen pixels, applied after centering
    pub pan: Vec2,
    /// Size of the drawing surface in screen pixels
    pub size: Vec2,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            zoom: 1.0,
            pan: Vec2::ZERO,
            size: Vec2::ZERO,
        }
    }
}

impl Viewport {
    pub fn new(size: Vec2) -> Self {
        Self {
            size,
            ..Self::default()
        }
    }

    /// Center of the drawing surface in screen space
    pub fn center(&self) -> Pos2 {
        (self.size / 2.0).to_pos2()
    }

    /// Update the surface size; the center follows.
    pub fn resize(&mut self, size: Vec2) {
        self.size = size;
    }

    /// Set the zoom factor, clamped to `[min, max]`. Non-finite values are ignored.
    pub fn set_zoom(&mut self, zoom: f32, min: f32, max: f32) {
        if !zoom.is_finite() {
            return;
        }
        self.zoom = zoom.clamp(min, max);
    }

    /// Multiply the zoom by `factor` while keeping the world point under
    /// `anchor` (screen space) where it is on screen.
    pub fn zoom_at(&mut self, anchor: Pos2, factor: f32, min: f32, max: f32) {
        let old_zoom = self.zoom;
        let new_zoom = (old_zoom * factor).clamp(min, max);
        if !new_zoom.is_finite() || (new_zoom - old_zoom).abs() < f32::EPSILON {
            return;
        }

        let ratio = new_zoom / old_zoom;
        let anchor = anchor - self.center();
        self.pan = anchor - (anchor - self.pan) * ratio;
        self.zoom = new_zoom;
    }

    /// Map a world-space rectangle given by its top-left and size onto the screen.
    pub fn world_rect_to_screen(&self, min: Pos2, size: Vec2) -> Rect {
        Rect::from_min_size(world_to_screen(min, self), size * self.zoom)
    }
}

/// `world = (screen - center - pan) / zoom`
pub fn screen_to_world(screen: Pos2, viewport: &Viewport) -> Pos2 {
    ((screen - viewport.center() - viewport.pan) / viewport.zoom).to_pos2()
}

/// `screen = world * zoom + center + pan`
pub fn world_to_screen(world: Pos2, viewport: &Viewport) -> Pos2 {
    viewport.center() + world.to_vec2() * viewport.zoom + viewport.pan
}

#[cfg(test)]
mod tests {
    use super::*;
    use egui::{pos2, vec2};

    fn approx_eq(a: Pos2, b: Pos2) -> bool {
        (a.x - b.x).abs() < 1e-3 && (a.y - b.y).abs() < 1e-3
    }

    #[test]
    fn test_default_viewport() {
        let viewport = Viewport::default();
        assert_eq!(viewport.zoom, 1.0);
        assert_eq!(viewport.pan, Vec2::ZERO);
    }

    #[test]
    fn test_origin_maps_to_center() {
        let viewport = Viewport::new(vec2(800.0, 600.0));
        assert_eq!(world_to_screen(Pos2::ZERO, &viewport), pos2(400.0, 300.0));
        assert_eq!(screen_to_world(pos2(400.0, 300.0), &viewport), Pos2::ZERO);
    }

    #[test]
    fn test_screen_to_world_with_pan_and_zoom() {
        let viewport = Viewport {
            zoom: 2.0,
            pan: vec2(50.0, -20.0),
            size: vec2(800.0, 600.0),
        };
        // (500 - 400 - 50) / 2 = 25, (300 - 300 + 20) / 2 = 10
        assert!(approx_eq(screen_to_world(pos2(500.0, 300.0), &viewport), pos2(25.0, 10.0)));
    }

    #[test]
    fn test_resize_moves_center() {
        let mut viewport = Viewport::new(vec2(800.0, 600.0));
        viewport.resize(vec2(1000.0, 200.0));
        assert_eq!(viewport.center(), pos2(500.0, 100.0));
    }

    #[test]
    fn test_set_zoom_clamps() {
        let mut viewport = Viewport::default();
        viewport.set_zoom(100.0, 0.1, 5.0);
        assert_eq!(viewport.zoom, 5.0);
        viewport.set_zoom(0.0001, 0.1, 5.0);
        assert_eq!(viewport.zoom, 0.1);
        viewport.set_zoom(f32::NAN, 0.1, 5.0);
        assert_eq!(viewport.zoom, 0.1);
    }

    #[test]
    fn test_zoom_at_keeps_anchor_fixed() {
        let mut viewport = Viewport {
            zoom: 1.3,
            pan: vec2(-40.0, 25.0),
            size: vec2(640.0, 480.0),
        };
        let anchor = pos2(123.0, 456.0);
        let before = screen_to_world(anchor, &viewport);

        viewport.zoom_at(anchor, 1.1, 0.1, 5.0);
        assert!((viewport.zoom - 1.43).abs() < 1e-4);
        assert!(approx_eq(screen_to_world(anchor, &viewport), before));
    }

    #[test]
    fn test_zoom_at_limit_is_noop() {
        let mut viewport = Viewport {
            zoom: 5.0,
            pan: vec2(10.0, 10.0),
            size: vec2(100.0, 100.0),
        };
        viewport.zoom_at(pos2(0.0, 0.0), 1.1, 0.1, 5.0);
        assert_eq!(viewport.zoom, 5.0);
        assert_eq!(viewport.pan, vec2(10.0, 10.0));
    }

    #[test]
    fn test_world_rect_to_screen() {
        let viewport = Viewport {
            zoom: 0.5,
            pan: Vec2::ZERO,
            size: vec2(200.0, 200.0),
        };
        let rect = viewport.world_rect_to_screen(Pos2::ZERO, vec2(200.0, 100.0));
        assert_eq!(rect.min, pos2(100.0, 100.0));
        assert_eq!(rect.size(), vec2(100.0, 50.0));
    }
}
