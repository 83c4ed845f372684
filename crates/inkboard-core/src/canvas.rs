//! Host contract: the persisted value and the change listener.
//!
//! The host hands the canvas a [`CanvasValue`] on mount and receives a fresh
//! one after every committed edit and every view change.

use crate::config::EditorConfig;
use crate::controller::{EditError, Effect, InteractionController, Outcome};
use crate::input::{KeyEvent, PointerEvent, WheelEvent};
use crate::shapes::ShapeId;
use crate::store::Snapshot;
use kurbo::{Point, Size, Vec2};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Scene plus view state, as persisted by the host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CanvasValue {
    /// View translation in screen pixels.
    pub pan: Vec2,
    pub zoom: f64,
    pub snapshot: Snapshot,
}

impl Default for CanvasValue {
    fn default() -> Self {
        Self {
            pan: Vec2::ZERO,
            zoom: 1.0,
            snapshot: Snapshot::default(),
        }
    }
}

impl CanvasValue {
    pub fn to_json(&self) -> Result<String, EditError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Parse a host value. Missing fields and shape arrays default to empty.
    pub fn from_json(json: &str) -> Result<Self, EditError> {
        let mut value: Self = serde_json::from_str(json)?;
        if !value.zoom.is_finite() || value.zoom <= 0.0 {
            log::warn!("stored zoom {} is unusable; resetting to 1", value.zoom);
            value.zoom = 1.0;
        }
        Ok(value)
    }
}

type ChangeListener = Box<dyn FnMut(&CanvasValue)>;

/// A mounted canvas: the controller plus the host's change listener.
pub struct Canvas {
    controller: InteractionController,
    listener: Option<ChangeListener>,
}

impl fmt::Debug for Canvas {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Canvas")
            .field("controller", &self.controller)
            .field("listener", &self.listener.is_some())
            .finish()
    }
}

impl Canvas {
    pub fn new(config: EditorConfig, initial: Option<CanvasValue>) -> Self {
        Self {
            controller: InteractionController::new(config, initial),
            listener: None,
        }
    }

    /// Register the callback that receives every new value.
    pub fn on_change(&mut self, listener: impl FnMut(&CanvasValue) + 'static) {
        self.listener = Some(Box::new(listener));
    }

    pub fn controller(&self) -> &InteractionController {
        &self.controller
    }

    pub fn value(&self) -> CanvasValue {
        self.controller.value()
    }

    /// Run one controller operation and notify the listener of its changes.
    pub fn apply(&mut self, op: impl FnOnce(&mut InteractionController) -> Outcome) -> Outcome {
        let out = op(&mut self.controller);
        self.notify(&out);
        out
    }

    /// Like [`Canvas::apply`] for the fallible toolbar commands.
    pub fn try_apply(
        &mut self,
        op: impl FnOnce(&mut InteractionController) -> Result<Outcome, EditError>,
    ) -> Result<Outcome, EditError> {
        let out = op(&mut self.controller)?;
        self.notify(&out);
        Ok(out)
    }

    pub fn pointer(&mut self, event: PointerEvent) -> Outcome {
        self.apply(|c| c.handle_pointer(event))
    }

    pub fn wheel(&mut self, event: WheelEvent) -> Outcome {
        self.apply(|c| c.handle_wheel(event))
    }

    pub fn key(&mut self, event: KeyEvent) -> Outcome {
        self.apply(|c| c.handle_key(event))
    }

    /// Show an upload placeholder; the host reports back through
    /// [`InteractionController::finish_upload`].
    pub fn begin_upload(&mut self, name: &str, world: Point, natural: Size) -> (ShapeId, Outcome) {
        self.controller.begin_upload(name, world, natural)
    }

    fn notify(&mut self, out: &Outcome) {
        let Some(listener) = self.listener.as_mut() else {
            return;
        };
        for effect in &out.effects {
            if let Effect::Changed(value) = effect {
                listener(value);
            }
        }
    }
}
