//! Upload placeholders on the canvas.

use super::{InteractionController, Outcome};
use crate::resources::{Placeholder, PlaceholderState, UploadError, fit_image_size};
use crate::shapes::{Image, Shape, ShapeId};
use kurbo::{Point, Rect, Size};
use std::time::Duration;
use web_time::Instant;

impl InteractionController {
    /// Show a placeholder centred on `world` for a file being uploaded.
    ///
    /// Returns the id the inserted image will carry.
    pub fn begin_upload(&mut self, name: &str, world: Point, natural: Size) -> (ShapeId, Outcome) {
        let size = fit_image_size(natural, self.config.max_image_size);
        let rect = Rect::from_center_size(world, size);
        let id = ShapeId::new();
        log::info!("uploading {name} as {id}");
        self.uploads.insert(Placeholder {
            id: id.clone(),
            rect,
            label: format!("Uploading {name}…"),
            state: PlaceholderState::Uploading,
        });
        (id, Outcome::repaint())
    }

    /// Resolve an upload started with [`InteractionController::begin_upload`].
    ///
    /// Success replaces the placeholder with an image shape in one history
    /// push. Failure keeps the placeholder with an error label until the
    /// configured lifetime has passed.
    pub fn finish_upload(
        &mut self,
        id: &ShapeId,
        result: Result<String, UploadError>,
        now: Instant,
    ) -> Outcome {
        match result {
            Ok(url) => {
                let Some(placeholder) = self.uploads.take(id) else {
                    log::warn!("upload {id} finished without a placeholder");
                    return Outcome::default();
                };
                let rect = placeholder.rect;
                let mut image = Image::new(url, rect.x0, rect.y0, rect.width(), rect.height());
                image.id = placeholder.id;
                log::info!("upload {id} finished: {}", image.src);
                self.store.scene_mut().push(Shape::Image(image));
                let mut out = Outcome::repaint();
                self.commit(&mut out);
                out
            }
            Err(err) => {
                let ttl = Duration::from_millis(self.config.upload_error_ttl_ms);
                let Some(placeholder) = self.uploads.get_mut(id) else {
                    log::warn!("upload {id} failed without a placeholder: {err}");
                    return Outcome::default();
                };
                log::warn!("upload {id} failed: {err}");
                placeholder.label = err.to_string();
                placeholder.state = PlaceholderState::Failed {
                    expires_at: now + ttl,
                };
                Outcome::repaint()
            }
        }
    }

    /// Remove failed placeholders whose lifetime has ended.
    pub fn expire_placeholders(&mut self, now: Instant) -> Outcome {
        match self.uploads.expire(now) {
            0 => Outcome::default(),
            removed => {
                log::debug!("removed {removed} expired upload placeholders");
                Outcome::repaint()
            }
        }
    }

    pub fn placeholders(&self) -> &[Placeholder] {
        self.uploads.placeholders()
    }
}
