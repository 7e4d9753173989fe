#![warn(clippy::all, rust_2018_idioms)]

pub mod app;
pub mod command;
pub mod components;
pub mod config;
pub mod document;
pub mod geometry;
pub mod image;
pub mod image_cache;
pub mod input;
pub mod layer;
pub mod panels;
pub mod path;
pub mod renderer;
pub mod state;
pub mod tool;

pub use app::CanvasApp;
pub use command::{Command, CommandError, CommandHistory};
pub use config::CanvasConfig;
pub use document::Document;
pub use geometry::{Viewport, screen_to_world, world_to_screen};
pub use image::CanvasImage;
pub use image_cache::{ImageCache, ImageLoadError, LoadMode};
pub use input::{InputEvent, InputHandler, route_event};
pub use layer::{Layer, LayerId, LayerProperty};
pub use path::{Path, PathRef, StrokeStyle};
pub use renderer::Renderer;
pub use state::{CanvasState, Interaction};
pub use tool::Tool;
