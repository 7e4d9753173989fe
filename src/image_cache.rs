use std::collections::HashMap;

use base64::Engine as _;
use egui::{ColorImage, Context, TextureHandle, TextureId, TextureOptions};
use futures::channel::mpsc;
use thiserror::Error;

/// Reasons an image source could not be turned into pixels
#[derive(Error, Debug)]
pub enum ImageLoadError {
    #[error("unsupported image source: {0}")]
    UnsupportedSource(String),
    #[error("malformed data URI")]
    MalformedDataUri,
    #[error("invalid base64 payload: {0}")]
    Base64(#[from] base64::DecodeError),
    #[error("failed to decode image: {0}")]
    Decode(#[from] ::image::ImageError),
    #[error("failed to read image file: {0}")]
    Io(#[from] std::io::Error),
}

/// Where decoding runs
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LoadMode {
    /// Off the UI thread; the texture shows up on a later frame
    #[default]
    Background,
    /// On the calling thread, finished before `texture` returns
    Inline,
}

/// Public view of a cache entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadState {
    Loading,
    Ready(TextureId),
    Failed,
}

enum Entry {
    Loading,
    Ready(TextureHandle),
    Failed,
}

type Decoded = (String, Result<ColorImage, ImageLoadError>);

/// Textures for image sources, keyed by the source string.
///
/// A failed source stays failed for the lifetime of the cache.
pub struct ImageCache {
    entries: HashMap<String, Entry>,
    sender: mpsc::UnboundedSender<Decoded>,
    receiver: mpsc::UnboundedReceiver<Decoded>,
    mode: LoadMode,
    loads_started: usize,
}

impl Default for ImageCache {
    fn default() -> Self {
        Self::new(LoadMode::default())
    }
}

impl ImageCache {
    pub fn new(mode: LoadMode) -> Self {
        let (sender, receiver) = mpsc::unbounded();
        Self {
            entries: HashMap::new(),
            sender,
            receiver,
            mode,
            loads_started: 0,
        }
    }

    /// Upload whatever finished decoding since the last frame.
    /// Call once per frame before drawing.
    pub fn begin_frame(&mut self, ctx: &Context) {
        while let Ok(Some((src, result))) = self.receiver.try_next() {
            self.finish(ctx, src, result);
        }
    }

    /// Texture for `src`, starting a load on first sight
    pub fn texture(&mut self, ctx: &Context, src: &str) -> Option<TextureId> {
        match self.entries.get(src) {
            Some(Entry::Ready(handle)) => Some(handle.id()),
            Some(Entry::Loading | Entry::Failed) => None,
            None => {
                self.start_load(ctx, src);
                match self.entries.get(src) {
                    Some(Entry::Ready(handle)) => Some(handle.id()),
                    _ => None,
                }
            }
        }
    }

    pub fn state(&self, src: &str) -> Option<LoadState> {
        self.entries.get(src).map(|entry| match entry {
            Entry::Loading => LoadState::Loading,
            Entry::Ready(handle) => LoadState::Ready(handle.id()),
            Entry::Failed => LoadState::Failed,
        })
    }

    /// Number of decodes ever started
    pub fn loads_started(&self) -> usize {
        self.loads_started
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn start_load(&mut self, ctx: &Context, src: &str) {
        self.entries.insert(src.to_owned(), Entry::Loading);
        self.loads_started += 1;

        match self.mode {
            LoadMode::Inline => {
                let result = decode_source(src);
                self.finish(ctx, src.to_owned(), result);
            }
            LoadMode::Background => spawn_decode(ctx.clone(), src.to_owned(), self.sender.clone()),
        }
    }

    fn finish(&mut self, ctx: &Context, src: String, result: Result<ColorImage, ImageLoadError>) {
        let entry = match result {
            Ok(image) => {
                let name = format!("canvas_image_{}", self.loads_started);
                Entry::Ready(ctx.load_texture(name, image, TextureOptions::LINEAR))
            }
            Err(err) => {
                log::error!("Failed to load image {}: {}", abbreviate(&src), err);
                Entry::Failed
            }
        };
        self.entries.insert(src, entry);
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn spawn_decode(ctx: Context, src: String, sender: mpsc::UnboundedSender<Decoded>) {
    std::thread::spawn(move || {
        let result = decode_source(&src);
        if sender.unbounded_send((src, result)).is_ok() {
            ctx.request_repaint();
        }
    });
}

#[cfg(target_arch = "wasm32")]
fn spawn_decode(ctx: Context, src: String, sender: mpsc::UnboundedSender<Decoded>) {
    wasm_bindgen_futures::spawn_local(async move {
        let result = decode_source(&src);
        if sender.unbounded_send((src, result)).is_ok() {
            ctx.request_repaint();
        }
    });
}

/// Data URIs can be megabytes long; keep log lines readable
fn abbreviate(src: &str) -> String {
    match src.char_indices().nth(48) {
        Some((cut, _)) => format!("{}...", &src[..cut]),
        None => src.to_owned(),
    }
}

/// Turn a source string into pixels. Accepts `data:<mime>;base64,<payload>`
/// URIs and, on native targets, file paths.
pub fn decode_source(src: &str) -> Result<ColorImage, ImageLoadError> {
    let bytes = match src.strip_prefix("data:") {
        Some(rest) => decode_data_uri(rest)?,
        None => read_file(src)?,
    };
    decode_bytes(&bytes)
}

fn decode_data_uri(rest: &str) -> Result<Vec<u8>, ImageLoadError> {
    let (meta, payload) = rest.split_once(',').ok_or(ImageLoadError::MalformedDataUri)?;
    if !meta.ends_with(";base64") {
        return Err(ImageLoadError::MalformedDataUri);
    }
    Ok(base64::engine::general_purpose::STANDARD.decode(payload.trim())?)
}

#[cfg(not(target_arch = "wasm32"))]
fn read_file(path: &str) -> Result<Vec<u8>, ImageLoadError> {
    if path.is_empty() {
        return Err(ImageLoadError::UnsupportedSource(path.to_owned()));
    }
    Ok(std::fs::read(path)?)
}

#[cfg(target_arch = "wasm32")]
fn read_file(path: &str) -> Result<Vec<u8>, ImageLoadError> {
    Err(ImageLoadError::UnsupportedSource(path.to_owned()))
}

/// Decode an encoded image (PNG, JPEG, ...) into RGBA pixels
pub fn decode_bytes(bytes: &[u8]) -> Result<ColorImage, ImageLoadError> {
    let image = ::image::load_from_memory(bytes)?.to_rgba8();
    let size = [image.width() as usize, image.height() as usize];
    Ok(ColorImage::from_rgba_unmultiplied(size, image.as_raw()))
}

/// Wrap raw file bytes into a data URI usable as an image source
pub fn encode_data_uri(mime: &str, bytes: &[u8]) -> String {
    format!(
        "data:{};base64,{}",
        mime,
        base64::engine::general_purpose::STANDARD.encode(bytes)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn png_data_uri() -> String {
        let pixels = ::image::RgbaImage::from_pixel(3, 2, ::image::Rgba([255, 0, 0, 255]));
        let mut bytes = Vec::new();
        ::image::DynamicImage::ImageRgba8(pixels)
            .write_to(&mut Cursor::new(&mut bytes), ::image::ImageFormat::Png)
            .unwrap();
        encode_data_uri("image/png", &bytes)
    }

    #[test]
    fn test_decode_data_uri() {
        let image = decode_source(&png_data_uri()).unwrap();
        assert_eq!(image.size, [3, 2]);
        assert_eq!(image.pixels[0], egui::Color32::RED);
    }

    #[test]
    fn test_malformed_sources() {
        assert!(matches!(
            decode_source("data:image/png,abc"),
            Err(ImageLoadError::MalformedDataUri)
        ));
        assert!(matches!(
            decode_source("data:image/png;base64,@@@"),
            Err(ImageLoadError::Base64(_))
        ));
        assert!(matches!(
            decode_source("data:image/png;base64,AAAA"),
            Err(ImageLoadError::Decode(_))
        ));
        assert!(matches!(decode_source(""), Err(ImageLoadError::UnsupportedSource(_))));
    }

    #[test]
    fn test_inline_load_is_cached() {
        let ctx = Context::default();
        let mut cache = ImageCache::new(LoadMode::Inline);
        let src = png_data_uri();

        let first = cache.texture(&ctx, &src);
        assert!(first.is_some());
        assert_eq!(cache.texture(&ctx, &src), first);
        assert_eq!(cache.loads_started(), 1);
    }

    #[test]
    fn test_failed_load_is_not_retried() {
        let ctx = Context::default();
        let mut cache = ImageCache::new(LoadMode::Inline);
        let src = "data:image/png;base64,AAAA";

        assert!(cache.texture(&ctx, src).is_none());
        assert_eq!(cache.state(src), Some(LoadState::Failed));
        assert!(cache.texture(&ctx, src).is_none());
        assert_eq!(cache.loads_started(), 1);
    }

    #[test]
    fn test_background_load_arrives_later() {
        let ctx = Context::default();
        let mut cache = ImageCache::new(LoadMode::Background);
        let src = png_data_uri();

        assert!(cache.texture(&ctx, &src).is_none());
        for _ in 0..500 {
            cache.begin_frame(&ctx);
            if cache.state(&src) != Some(LoadState::Loading) {
                break;
            }
            std::thread::sleep(std::time::Duration::from_millis(10));
        }
        assert!(matches!(cache.state(&src), Some(LoadState::Ready(_))));
    }
}
