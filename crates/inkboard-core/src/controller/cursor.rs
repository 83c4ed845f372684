//! Cursor feedback.

use super::{DragMode, InteractionController, Outcome, Effect};
use crate::selection::{Corner, Edge, HandleKind};
use crate::tools::ToolKind;
use kurbo::Point;
use serde::{Deserialize, Serialize};

/// Cursor the host should show over the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub enum CursorStyle {
    #[default]
    Default,
    Move,
    Grab,
    Grabbing,
    Crosshair,
    Text,
    EwResize,
    NsResize,
    NwseResize,
    NeswResize,
    /// Round pen glyph; `size` is its diameter in screen pixels.
    Pen { size: f64 },
    /// Eraser ring; `size` is its diameter in screen pixels.
    Eraser { size: f64 },
}

impl CursorStyle {
    /// CSS cursor keyword. Glyph cursors fall back to `crosshair`.
    pub fn css_name(&self) -> &'static str {
        match self {
            CursorStyle::Default => "default",
            CursorStyle::Move => "move",
            CursorStyle::Grab => "grab",
            CursorStyle::Grabbing => "grabbing",
            CursorStyle::Crosshair | CursorStyle::Pen { .. } | CursorStyle::Eraser { .. } => {
                "crosshair"
            }
            CursorStyle::Text => "text",
            CursorStyle::EwResize => "ew-resize",
            CursorStyle::NsResize => "ns-resize",
            CursorStyle::NwseResize => "nwse-resize",
            CursorStyle::NeswResize => "nesw-resize",
        }
    }

    /// Resize cursor for a handle.
    pub fn for_handle(handle: HandleKind) -> Self {
        match handle {
            HandleKind::Corner(Corner::TopLeft | Corner::BottomRight) => CursorStyle::NwseResize,
            HandleKind::Corner(Corner::TopRight | Corner::BottomLeft) => CursorStyle::NeswResize,
            HandleKind::Edge(Edge::Left | Edge::Right) => CursorStyle::EwResize,
            HandleKind::Edge(Edge::Top | Edge::Bottom) => CursorStyle::NsResize,
            HandleKind::Endpoint(_) | HandleKind::ConnectorEnd(_) => CursorStyle::Crosshair,
        }
    }
}

/// Eraser reach beyond the stroke, in screen pixels.
pub(crate) const ERASER_RADIUS: f64 = 10.0;

impl InteractionController {
    /// Cursor for the current tool, drag mode and pointer position.
    pub(crate) fn derive_cursor(&self, world: Point) -> CursorStyle {
        match &self.state.drag {
            DragMode::Pan { .. } => return CursorStyle::Grabbing,
            DragMode::Move { .. } => return CursorStyle::Move,
            DragMode::ResizeCorner(m)
            | DragMode::ResizeEdgeHorizontal(m)
            | DragMode::ResizeEdgeVertical(m)
            | DragMode::ResizeLineEndpoint(m) => return CursorStyle::for_handle(m.handle),
            DragMode::ResizeConnectorEndpoint { .. } | DragMode::PendingConnector { .. } => {
                return CursorStyle::Crosshair;
            }
            _ => {}
        }

        let tool = if self.state.space_held {
            ToolKind::Hand
        } else {
            self.state.active_tool
        };
        match tool {
            ToolKind::Hand => CursorStyle::Grab,
            ToolKind::Pencil => CursorStyle::Pen {
                size: (self.tools.current_style.stroke_width * self.camera.zoom).max(2.0),
            },
            ToolKind::Eraser => CursorStyle::Eraser {
                size: ERASER_RADIUS * 2.0,
            },
            ToolKind::Text => CursorStyle::Text,
            ToolKind::Select => {
                if let Some(handle) = self.handle_at(world) {
                    CursorStyle::for_handle(handle)
                } else if self.hit_test(world).is_some() {
                    CursorStyle::Move
                } else {
                    CursorStyle::Default
                }
            }
            _ => CursorStyle::Crosshair,
        }
    }

    /// Recompute the cursor and report it if it changed.
    pub(crate) fn refresh_cursor(&mut self, out: &mut Outcome) {
        let world = self.state.pointer.unwrap_or(Point::ZERO);
        let cursor = self.derive_cursor(world);
        if cursor != self.state.cursor {
            self.state.cursor = cursor;
            out.effects.push(Effect::SetCursor(cursor));
        }
    }
}
