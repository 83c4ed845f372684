//! Inline text editing sessions.

use super::{Effect, InteractionController, Outcome, TextSession};
use crate::shapes::{Shape, ShapeId, ShapeKind, Text};
use kurbo::Point;
use std::collections::HashSet;

impl InteractionController {
    /// Text tool press: edit the text under the pointer or start a new one.
    pub(super) fn text_down(&mut self, world: Point) -> Outcome {
        let existing = self
            .hit_test(world)
            .filter(|(kind, _)| *kind == ShapeKind::Text)
            .and_then(|(_, index)| self.store.scene().texts.get(index));
        let (session, text, font_size) = match existing {
            Some(text) => (
                TextSession {
                    target: Some(text.id.clone()),
                    position: Point::new(text.x, text.y),
                },
                text.text().to_string(),
                text.font_size(),
            ),
            None => (
                TextSession {
                    target: None,
                    position: world,
                },
                String::new(),
                Text::DEFAULT_FONT_SIZE,
            ),
        };
        let screen = self.camera.to_screen(session.position);
        self.state.text_session = Some(session);
        Outcome {
            committed: false,
            effects: vec![Effect::OpenTextEditor {
                screen,
                text,
                font_size: font_size * self.camera.zoom,
            }],
        }
    }

    pub fn text_session(&self) -> Option<&TextSession> {
        self.state.text_session.as_ref()
    }

    /// Close the editor with its final content (blur or Enter).
    ///
    /// Empty content discards a new text and deletes an edited one.
    pub fn commit_text(&mut self, content: &str) -> Outcome {
        let Some(session) = self.state.text_session.take() else {
            return Outcome::default();
        };
        let mut out = Outcome::repaint();
        let empty = content.trim().is_empty();
        match session.target {
            Some(id) => {
                let Some(index) = self.store.scene().index_of(ShapeKind::Text, &id) else {
                    log::warn!("edited text {id} no longer exists");
                    return out;
                };
                if empty {
                    self.store
                        .scene_mut()
                        .remove_cascading(&HashSet::from([id]));
                } else {
                    self.store.scene_mut().texts[index].set_text(content);
                }
            }
            None => {
                if empty {
                    log::debug!("empty text discarded");
                    return out;
                }
                let mut text = Text::new(session.position, content);
                text.style.stroke = self.tools.current_style.stroke;
                text.style.opacity = self.tools.current_style.opacity;
                self.store.scene_mut().push(Shape::Text(text));
            }
        }
        self.store.resolve_selection();
        self.commit(&mut out);
        out
    }

    /// Close the editor without changes.
    pub fn cancel_text(&mut self) -> Outcome {
        match self.state.text_session.take() {
            Some(_) => Outcome::repaint(),
            None => Outcome::default(),
        }
    }

    /// Id of the text being edited, if any.
    pub fn editing_text(&self) -> Option<&ShapeId> {
        self.state.text_session.as_ref()?.target.as_ref()
    }
}
