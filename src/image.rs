use egui::{Pos2, Rect, Vec2};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

/// A raster image placed on a layer.
///
/// The image only references its pixels through `src`; decoding happens in
/// the renderer's [`ImageCache`](crate::image_cache::ImageCache).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanvasImage {
    id: Uuid,
    src: Arc<str>,
    position: Pos2, // World-space top-left
    size: Vec2,     // World-space width and height
}

impl CanvasImage {
    pub fn new(src: impl Into<Arc<str>>, position: Pos2, size: Vec2) -> Self {
        Self {
            id: Uuid::new_v4(),
            src: src.into(),
            position,
            size,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Cache key and load source (data URI or file path)
    pub fn src(&self) -> &str {
        &self.src
    }

    pub fn position(&self) -> Pos2 {
        self.position
    }

    pub fn size(&self) -> Vec2 {
        self.size
    }

    pub fn rect(&self) -> Rect {
        Rect::from_min_size(self.position, self.size)
    }

    pub fn set_position(&mut self, position: Pos2) {
        self.position = position;
    }

    // Display size only, the source pixels are untouched
    pub fn set_size(&mut self, size: Vec2) {
        self.size = size;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use egui::{pos2, vec2};

    #[test]
    fn test_image_ids_are_unique() {
        let a = CanvasImage::new("data:a", Pos2::ZERO, vec2(1.0, 1.0));
        let b = CanvasImage::new("data:a", Pos2::ZERO, vec2(1.0, 1.0));
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn test_image_geometry_is_mutable() {
        let mut image = CanvasImage::new("data:a", Pos2::ZERO, vec2(200.0, 200.0));
        image.set_position(pos2(10.0, 20.0));
        image.set_size(vec2(50.0, 40.0));
        assert_eq!(image.rect(), Rect::from_min_max(pos2(10.0, 20.0), pos2(60.0, 60.0)));
    }
}
