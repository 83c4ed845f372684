//! Decoded images keyed by source URL.
//!
//! The cache never fetches anything itself. [`ImageCache::request`] tells the
//! host whether it has to start a fetch, and the host hands the bytes back
//! through [`ImageCache::complete`]. A failed fetch or decode returns the
//! entry to an idle pending state, so the next request retries.

use crate::RendererError;
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::Arc;

/// Decoded RGBA8 pixels.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedImage {
    pub width: u32,
    pub height: u32,
    pub rgba: Arc<Vec<u8>>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ImageEntry {
    Pending { in_flight: bool },
    Ready(DecodedImage),
}

type ReadyCallback = Box<dyn FnMut(&str)>;

/// Cache of images referenced by image shapes.
#[derive(Default)]
pub struct ImageCache {
    entries: HashMap<String, ImageEntry>,
    on_ready: Option<ReadyCallback>,
}

impl fmt::Debug for ImageCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImageCache")
            .field("entries", &self.entries.len())
            .field("on_ready", &self.on_ready.is_some())
            .finish()
    }
}

impl ImageCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Called with the source URL whenever an image becomes ready; hosts
    /// schedule a repaint from here.
    pub fn on_ready(&mut self, callback: impl FnMut(&str) + 'static) {
        self.on_ready = Some(Box::new(callback));
    }

    /// Ask for an image. Returns `true` if the host must start a fetch.
    pub fn request(&mut self, src: &str) -> bool {
        let entry = self
            .entries
            .entry(src.to_string())
            .or_insert(ImageEntry::Pending { in_flight: false });
        match entry {
            ImageEntry::Pending { in_flight } if !*in_flight => {
                log::debug!("fetching image {src}");
                *in_flight = true;
                true
            }
            _ => false,
        }
    }

    /// Hand over fetched bytes for a requested image.
    pub fn complete(&mut self, src: &str, bytes: &[u8]) -> Result<&DecodedImage, RendererError> {
        if !self.entries.contains_key(src) {
            return Err(RendererError::UnknownImage(src.to_string()));
        }
        let decoded = match ::image::load_from_memory(bytes) {
            Ok(decoded) => decoded.to_rgba8(),
            Err(err) => {
                log::warn!("failed to decode image {src}: {err}");
                self.entries
                    .insert(src.to_string(), ImageEntry::Pending { in_flight: false });
                return Err(RendererError::Decode(err));
            }
        };
        let (width, height) = decoded.dimensions();
        log::debug!("image {src} ready ({width}x{height})");
        self.entries.insert(
            src.to_string(),
            ImageEntry::Ready(DecodedImage {
                width,
                height,
                rgba: Arc::new(decoded.into_vec()),
            }),
        );
        if let Some(callback) = self.on_ready.as_mut() {
            callback(src);
        }
        match self.entries.get(src) {
            Some(ImageEntry::Ready(image)) => Ok(image),
            _ => Err(RendererError::UnknownImage(src.to_string())),
        }
    }

    /// The host could not fetch the bytes; the next request retries.
    pub fn fail(&mut self, src: &str) {
        if let Some(entry) = self.entries.get_mut(src) {
            log::warn!("failed to fetch image {src}");
            *entry = ImageEntry::Pending { in_flight: false };
        }
    }

    /// Drop one image. Returns whether it was cached.
    pub fn evict(&mut self, src: &str) -> bool {
        self.entries.remove(src).is_some()
    }

    /// Drop every image whose source is not in `sources`, typically the
    /// sources of the image shapes still in the scene. Returns how many
    /// entries were dropped.
    pub fn retain_sources(&mut self, sources: &HashSet<String>) -> usize {
        let before = self.entries.len();
        self.entries.retain(|src, _| sources.contains(src));
        let dropped = before - self.entries.len();
        if dropped > 0 {
            log::debug!("evicted {dropped} unreferenced images");
        }
        dropped
    }

    pub fn get(&self, src: &str) -> Option<&ImageEntry> {
        self.entries.get(src)
    }

    pub fn ready(&self, src: &str) -> Option<&DecodedImage> {
        match self.entries.get(src) {
            Some(ImageEntry::Ready(image)) => Some(image),
            _ => None,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
