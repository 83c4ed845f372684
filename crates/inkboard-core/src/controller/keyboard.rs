//! Global keyboard shortcuts.
//!
//! Shortcuts are ignored while an inline text editor is open. Redo is bound
//! to Ctrl/Cmd+Shift+Z and Ctrl/Cmd+Y; Ctrl/Cmd+R is left to the host so it
//! keeps reloading the page.

use super::{InteractionController, Outcome};
use crate::input::{Key, KeyEvent, Modifiers};
use kurbo::Vec2;

impl InteractionController {
    pub fn handle_key(&mut self, event: KeyEvent) -> Outcome {
        if self.state.text_session.is_some() {
            return Outcome::default();
        }
        let mut out = match event {
            KeyEvent::Pressed { key, modifiers } => self.key_pressed(key, modifiers),
            KeyEvent::Released {
                key: Key::Space, ..
            } => {
                self.state.space_held = false;
                Outcome::default()
            }
            KeyEvent::Released { .. } => Outcome::default(),
        };
        self.refresh_cursor(&mut out);
        out
    }

    fn key_pressed(&mut self, key: Key, modifiers: Modifiers) -> Outcome {
        if modifiers.command() {
            return match key {
                Key::Char('z') if modifiers.shift => self.redo(),
                Key::Char('z') => self.undo(),
                Key::Char('y') => self.redo(),
                Key::Char('c' | 'd') => {
                    let offset = Vec2::splat(self.config.duplicate_offset);
                    self.duplicate_selection(offset).unwrap_or_default()
                }
                Key::Char('+' | '=') => self.zoom_in(),
                Key::Char('-' | '_') => self.zoom_out(),
                Key::Char('0') => self.reset_view(),
                Key::Char('a') => {
                    self.store.select_all();
                    Outcome::repaint()
                }
                _ => Outcome::default(),
            };
        }

        match key {
            Key::Delete | Key::Backspace if self.state.drag.is_idle() => {
                self.delete_selected().unwrap_or_default()
            }
            Key::Escape => {
                let mut out = self.abort_gesture();
                if self.store.has_selection() {
                    self.store.clear_selection();
                    out.merge(Outcome::repaint());
                }
                out
            }
            Key::Space => {
                self.state.space_held = true;
                Outcome::default()
            }
            _ => Outcome::default(),
        }
    }
}
