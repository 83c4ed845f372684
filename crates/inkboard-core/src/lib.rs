//! Inkboard Core Library
//!
//! Platform-agnostic scene model, geometry, connector routing, history and
//! interaction state machine for the inkboard canvas. Painting lives in
//! `inkboard-render`.

pub mod camera;
pub mod canvas;
pub mod config;
pub mod controller;
pub mod geometry;
pub mod history;
pub mod input;
pub mod resources;
pub mod router;
pub mod selection;
pub mod shapes;
pub mod store;
pub mod tools;

pub use camera::Camera;
pub use canvas::{Canvas, CanvasValue};
pub use config::{ConfigError, EditorConfig};
pub use controller::{
    CursorStyle, DragMode, EditError, Effect, InteractionController, Outcome, Overlay, ShapePatch,
};
pub use history::HistoryManager;
pub use input::{Key, KeyEvent, Modifiers, MouseButton, PointerEvent, WheelEvent};
pub use resources::{Placeholder, PlaceholderState, UploadError, Uploader};
pub use shapes::{Shape, ShapeId, ShapeKind, ShapeStyle};
pub use store::{ShapeStore, Snapshot};
pub use tools::{PendingInsert, Placement, ToolKind};
