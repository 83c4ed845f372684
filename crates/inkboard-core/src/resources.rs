//! Resource collaborators: image uploads and their placeholders.
//!
//! The controller never performs I/O. The host drives an [`Uploader`]
//! future and reports the result back through
//! [`finish_upload`](crate::controller::InteractionController::finish_upload).
//! While a transfer is running the canvas shows a placeholder that lives
//! outside the scene and history.

use crate::shapes::ShapeId;
use kurbo::{Rect, Size};
use std::future::Future;
use std::pin::Pin;
use thiserror::Error;
use web_time::Instant;

/// Upload errors.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum UploadError {
    #[error("Upload rejected: {0}")]
    Rejected(String),
    #[error("Upload failed: {0}")]
    Transport(String),
}

/// Boxed future for async operations (compatible with WASM).
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + 'a>>;

/// Service that stores a binary blob and returns its final URL.
///
/// On native platforms implementations must be Send + Sync.
#[cfg(not(target_arch = "wasm32"))]
pub trait Uploader: Send + Sync {
    fn upload(&self, name: &str, bytes: Vec<u8>) -> BoxFuture<'_, Result<String, UploadError>>;
}

/// Service that stores a binary blob and returns its final URL (WASM version
/// without Send + Sync).
#[cfg(target_arch = "wasm32")]
pub trait Uploader {
    fn upload(&self, name: &str, bytes: Vec<u8>) -> BoxFuture<'_, Result<String, UploadError>>;
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PlaceholderState {
    Uploading,
    /// Shown with an error label until `expires_at`.
    Failed { expires_at: Instant },
}

/// A transient box standing in for an image that is still uploading.
#[derive(Debug, Clone, PartialEq)]
pub struct Placeholder {
    /// Id the image gets once the upload succeeds.
    pub id: ShapeId,
    pub rect: Rect,
    pub label: String,
    pub state: PlaceholderState,
}

impl Placeholder {
    pub fn is_failed(&self) -> bool {
        matches!(self.state, PlaceholderState::Failed { .. })
    }
}

/// Placeholders for uploads in flight or recently failed.
#[derive(Debug, Default)]
pub struct Uploads {
    placeholders: Vec<Placeholder>,
}

impl Uploads {
    pub fn placeholders(&self) -> &[Placeholder] {
        &self.placeholders
    }

    pub(crate) fn insert(&mut self, placeholder: Placeholder) {
        self.placeholders.push(placeholder);
    }

    pub(crate) fn take(&mut self, id: &ShapeId) -> Option<Placeholder> {
        let index = self.placeholders.iter().position(|p| &p.id == id)?;
        Some(self.placeholders.remove(index))
    }

    pub(crate) fn get_mut(&mut self, id: &ShapeId) -> Option<&mut Placeholder> {
        self.placeholders.iter_mut().find(|p| &p.id == id)
    }

    /// Drop failed placeholders whose lifetime has ended.
    pub(crate) fn expire(&mut self, now: Instant) -> usize {
        let before = self.placeholders.len();
        self.placeholders.retain(|p| match p.state {
            PlaceholderState::Failed { expires_at } => expires_at > now,
            PlaceholderState::Uploading => true,
        });
        before - self.placeholders.len()
    }
}

/// Scale a natural image size down so its longest side fits `max_side`.
pub fn fit_image_size(natural: Size, max_side: f64) -> Size {
    if natural.width <= 0.0 || natural.height <= 0.0 {
        return Size::new(max_side, max_side);
    }
    let longest = natural.width.max(natural.height);
    if longest <= max_side {
        return natural;
    }
    natural * (max_side / longest)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fit_image_size() {
        let fitted = fit_image_size(Size::new(960.0, 480.0), 480.0);
        assert!((fitted.width - 480.0).abs() < f64::EPSILON);
        assert!((fitted.height - 240.0).abs() < f64::EPSILON);
        assert_eq!(fit_image_size(Size::new(100.0, 50.0), 480.0), Size::new(100.0, 50.0));
        assert_eq!(fit_image_size(Size::ZERO, 48.0), Size::new(48.0, 48.0));
    }
}
