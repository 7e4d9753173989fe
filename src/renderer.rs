use eframe::egui::{self, Color32, Pos2, Rect, Shape, Stroke, Vec2, pos2};

use crate::geometry::{Viewport, world_to_screen};
use crate::image_cache::{ImageCache, LoadMode};
use crate::path::StrokeStyle;
use crate::state::CanvasState;

const FULL_UV: Rect = Rect::from_min_max(pos2(0.0, 0.0), pos2(1.0, 1.0));

/// Draws a [`CanvasState`] into an egui painter.
///
/// Rendering only reads the canvas; the renderer's own state is the image
/// cache.
#[derive(Default)]
pub struct Renderer {
    image_cache: ImageCache,
}

impl Renderer {
    pub fn new(load_mode: LoadMode) -> Self {
        Self {
            image_cache: ImageCache::new(load_mode),
        }
    }

    pub fn image_cache(&self) -> &ImageCache {
        &self.image_cache
    }

    /// Renders the current frame
    ///
    /// Args:
    ///     ctx (egui::Context): The egui context for the current frame
    ///     painter (egui::Painter): The painter to draw with
    ///     rect (egui::Rect): Screen rectangle of the drawing surface
    ///     state (CanvasState): The canvas to draw
    pub fn render(&mut self, ctx: &egui::Context, painter: &egui::Painter, rect: Rect, state: &CanvasState) {
        self.image_cache.begin_frame(ctx);
        let shapes = self.build_shapes(ctx, state, rect);
        painter.extend(shapes);
    }

    /// Everything one frame paints, back to front, in absolute screen
    /// coordinates. The viewport is expected to match `rect`'s size.
    pub fn build_shapes(&mut self, ctx: &egui::Context, state: &CanvasState, rect: Rect) -> Vec<Shape> {
        let config = state.config();
        let viewport = state.viewport();
        let offset = rect.min.to_vec2();
        let to_screen = |p: Pos2| world_to_screen(p, viewport) + offset;

        let mut shapes = vec![Shape::rect_filled(rect, 0.0, config.background_color)];

        let spacing = config.grid_size * viewport.zoom;
        if spacing >= config.min_grid_spacing {
            let stroke = Stroke::new(1.0, config.grid_color.gamma_multiply(0.5));
            grid_lines(&mut shapes, viewport, rect, spacing, stroke);
        }

        let document = state.document();
        let effective = document.effective_properties();
        for layer in document.layers_by_depth() {
            let Some(props) = effective.get(&layer.id) else {
                continue;
            };
            if !props.visible {
                continue;
            }

            for path in &layer.paths {
                if !path.is_drawable() {
                    continue;
                }
                let points = path.points().iter().map(|p| to_screen(*p)).collect();
                shapes.push(stroke_shape(points, &path.style(), props.opacity, viewport.zoom));
            }

            for image in &layer.images {
                let Some(texture) = self.image_cache.texture(ctx, image.src()) else {
                    continue;
                };
                let screen_rect = viewport.world_rect_to_screen(image.position(), image.size()).translate(offset);
                let tint = Color32::WHITE.gamma_multiply(props.opacity);
                shapes.push(Shape::image(texture, screen_rect, FULL_UV, tint));
            }
        }

        if let Some(live) = state.interaction().current_path() {
            if live.len() >= 2 {
                let points = live.points().iter().map(|p| to_screen(*p)).collect();
                shapes.push(stroke_shape(points, &state.stroke(), 1.0, viewport.zoom));
            }
        }

        shapes
    }
}

fn stroke_shape(points: Vec<Pos2>, style: &StrokeStyle, layer_opacity: f32, zoom: f32) -> Shape {
    Shape::line(points, Stroke::new(style.width * zoom, style.effective_color(layer_opacity)))
}

/// Grid lines that stay fixed to world coordinates as the view pans
fn grid_lines(shapes: &mut Vec<Shape>, viewport: &Viewport, rect: Rect, spacing: f32, stroke: Stroke) {
    let origin = viewport.center() + viewport.pan;
    let first = Vec2::new(origin.x.rem_euclid(spacing), origin.y.rem_euclid(spacing));

    let mut x = first.x;
    while x <= rect.width() {
        shapes.push(Shape::line_segment(
            [pos2(rect.min.x + x, rect.min.y), pos2(rect.min.x + x, rect.max.y)],
            stroke,
        ));
        x += spacing;
    }

    let mut y = first.y;
    while y <= rect.height() {
        shapes.push(Shape::line_segment(
            [pos2(rect.min.x, rect.min.y + y), pos2(rect.max.x, rect.min.y + y)],
            stroke,
        ));
        y += spacing;
    }
}
