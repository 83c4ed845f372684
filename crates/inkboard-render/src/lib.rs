//! Inkboard Render Library
//!
//! Builds backend-neutral display lists for the inkboard canvas and caches
//! decoded images by source URL.

mod image_cache;
mod renderer;
mod theme;

pub use image_cache::{DecodedImage, ImageCache, ImageEntry};
pub use renderer::{DrawCommand, Frame, RendererError, render, render_controller};
pub use theme::{Theme, ThemeMode};
