use egui::{Color32, Pos2};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Smallest and largest pencil width the toolbar allows
pub const MIN_STROKE_WIDTH: f32 = 1.0;
pub const MAX_STROKE_WIDTH: f32 = 50.0;

/// Colors offered as one-click swatches in the toolbar
pub const PRESET_COLORS: [Color32; 10] = [
    Color32::from_rgb(0xff, 0xff, 0xff),
    Color32::from_rgb(0x00, 0x00, 0x00),
    Color32::from_rgb(0xef, 0x44, 0x44),
    Color32::from_rgb(0xf9, 0x73, 0x16),
    Color32::from_rgb(0xea, 0xb3, 0x08),
    Color32::from_rgb(0x22, 0xc5, 0x5e),
    Color32::from_rgb(0x3b, 0x82, 0xf6),
    Color32::from_rgb(0x8b, 0x5c, 0xf6),
    Color32::from_rgb(0xec, 0x48, 0x99),
    Color32::from_rgb(0x6b, 0x72, 0x80),
];

/// Color, opacity and width a path is drawn with
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StrokeStyle {
    pub color: Color32,
    /// 0.0 ..= 1.0
    pub opacity: f32,
    /// World units, always positive
    pub width: f32,
}

impl Default for StrokeStyle {
    fn default() -> Self {
        Self {
            color: Color32::WHITE,
            opacity: 1.0,
            width: 2.0,
        }
    }
}

impl StrokeStyle {
    /// Color with the style's opacity folded into its alpha
    pub fn effective_color(&self, extra_opacity: f32) -> Color32 {
        self.color.gamma_multiply((self.opacity * extra_opacity).clamp(0.0, 1.0))
    }
}

// Immutable path, shared between history snapshots
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Path {
    points: Vec<Pos2>,
    style: StrokeStyle,
}

// Path under construction while the pointer is held down
#[derive(Debug, Clone, PartialEq)]
pub struct MutablePath {
    points: Vec<Pos2>,
}

pub type PathRef = Arc<Path>;

impl Path {
    pub fn new(points: Vec<Pos2>, style: StrokeStyle) -> Self {
        Self { points, style }
    }

    pub fn new_ref(points: Vec<Pos2>, style: StrokeStyle) -> PathRef {
        Arc::new(Self::new(points, style))
    }

    pub fn points(&self) -> &[Pos2] {
        &self.points
    }

    pub fn style(&self) -> StrokeStyle {
        self.style
    }

    pub fn color(&self) -> Color32 {
        self.style.color
    }

    pub fn opacity(&self) -> f32 {
        self.style.opacity
    }

    pub fn width(&self) -> f32 {
        self.style.width
    }

    /// A single point (or none) has nothing to stroke
    pub fn is_drawable(&self) -> bool {
        self.points.len() >= 2
    }
}

impl MutablePath {
    pub fn new(start: Pos2) -> Self {
        Self {
            points: vec![start],
        }
    }

    pub fn add_point(&mut self, point: Pos2) {
        self.points.push(point);
    }

    pub fn points(&self) -> &[Pos2] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Freeze into a shareable path with the style in force when the gesture ended.
    pub fn finish(self, style: StrokeStyle) -> PathRef {
        Path::new_ref(self.points, style)
    }
}
