//! Pointer and keyboard state machine.
//!
//! Every handler applies one event to the controller and returns an
//! [`Outcome`] describing what the host has to do. Transitions that end a
//! transaction (pointer-up after a drag, a delete, a toolbar command) push
//! exactly one history entry, and only when the scene differs from the
//! current entry.

mod anchors;
mod commands;
mod cursor;
mod keyboard;
mod pointer;
mod select;
mod text;
mod uploads;

pub use commands::{EditError, ShapePatch};
pub use cursor::CursorStyle;

use crate::camera::Camera;
use crate::canvas::CanvasValue;
use crate::config::EditorConfig;
use crate::geometry::{AnchorHandle, connector_route, scene_bounds};
use crate::history::HistoryManager;
use crate::resources::{Placeholder, Uploads};
use crate::selection::{HandleKind, connector_handles, get_handles};
use crate::shapes::{Anchor, Connector, Shape, ShapeId, ShapeKind};
use crate::store::{ShapeStore, Snapshot};
use crate::tools::{PendingInsert, ToolKind, ToolManager};
use kurbo::{Point, Rect, Size};

/// A handle drag on one shape.
#[derive(Debug, Clone)]
pub struct Manipulation {
    pub id: ShapeId,
    pub handle: HandleKind,
    /// World point of the pointer-down.
    pub start: Point,
    /// The shape as it was at pointer-down.
    pub original: Shape,
}

/// The manipulation active for the current pointer gesture.
#[derive(Debug, Clone, Default)]
pub enum DragMode {
    #[default]
    Idle,
    /// Panning the view. `last` is in screen coordinates.
    Pan { last: Point },
    /// Moving the selection. Deltas apply to `originals`, never to live state.
    Move { start: Point, originals: Vec<Shape> },
    ResizeCorner(Manipulation),
    ResizeEdgeHorizontal(Manipulation),
    ResizeEdgeVertical(Manipulation),
    ResizeLineEndpoint(Manipulation),
    /// Dragging one end of a connector with live re-anchoring.
    ResizeConnectorEndpoint {
        id: ShapeId,
        end: usize,
        original: Connector,
    },
    RubberBand {
        start: Point,
        current: Point,
        additive: bool,
    },
    /// A draw tool is dragging out a preview.
    Drawing,
    /// The arrow tool started on an anchor handle.
    PendingConnector { from: Anchor, current: Point },
    Erasing,
}

impl DragMode {
    pub fn is_idle(&self) -> bool {
        matches!(self, DragMode::Idle)
    }

    /// Short name for logs.
    pub fn name(&self) -> &'static str {
        match self {
            DragMode::Idle => "idle",
            DragMode::Pan { .. } => "pan",
            DragMode::Move { .. } => "move",
            DragMode::ResizeCorner(_) => "resize-corner",
            DragMode::ResizeEdgeHorizontal(_) => "resize-edge-horizontal",
            DragMode::ResizeEdgeVertical(_) => "resize-edge-vertical",
            DragMode::ResizeLineEndpoint(_) => "resize-line-endpoint",
            DragMode::ResizeConnectorEndpoint { .. } => "resize-connector-endpoint",
            DragMode::RubberBand { .. } => "rubber-band",
            DragMode::Drawing => "drawing",
            DragMode::PendingConnector { .. } => "pending-connector",
            DragMode::Erasing => "erasing",
        }
    }
}

/// An open inline text editor.
#[derive(Debug, Clone, PartialEq)]
pub struct TextSession {
    /// The text being edited, or `None` for a new one.
    pub target: Option<ShapeId>,
    /// World position of the text's top-left corner.
    pub position: Point,
}

/// Everything the state machine tracks besides the scene.
#[derive(Debug, Clone, Default)]
pub struct EditorState {
    pub active_tool: ToolKind,
    pub drag: DragMode,
    /// Nearest snappable anchor during connector creation or re-anchoring.
    pub hover_anchor: Option<AnchorHandle>,
    pub space_held: bool,
    pub text_session: Option<TextSession>,
    pub pending_insert: Option<PendingInsert>,
    /// Last pointer position in world coordinates.
    pub pointer: Option<Point>,
    pub cursor: CursorStyle,
}

/// Something the host must act on after an event.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// The scene or the view changed; persist this value.
    Changed(CanvasValue),
    /// Show an inline text editor at a screen position.
    OpenTextEditor {
        screen: Point,
        text: String,
        font_size: f64,
    },
    SetCursor(CursorStyle),
    Repaint,
}

/// Result of handling one event.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Outcome {
    /// Whether a history entry was pushed.
    pub committed: bool,
    pub effects: Vec<Effect>,
}

impl Outcome {
    pub(crate) fn repaint() -> Self {
        Self {
            committed: false,
            effects: vec![Effect::Repaint],
        }
    }

    /// The value to persist, if this outcome changed anything.
    pub fn changed(&self) -> Option<&CanvasValue> {
        self.effects.iter().find_map(|effect| match effect {
            Effect::Changed(value) => Some(value),
            _ => None,
        })
    }

    pub(crate) fn merge(&mut self, other: Outcome) {
        self.committed |= other.committed;
        self.effects.extend(other.effects);
    }
}

/// Transient geometry painted on top of the committed scene.
#[derive(Debug, Clone, Default)]
pub struct Overlay {
    /// Shape being drawn.
    pub preview: Option<Shape>,
    /// Route of a connector being created.
    pub pending_route: Option<Vec<Point>>,
    pub rubber_band: Option<Rect>,
    pub hover_anchor: Option<Point>,
    pub selection_bounds: Vec<Rect>,
    /// Handle positions of the sole selected shape, in world coordinates.
    pub handles: Vec<Point>,
    pub placeholders: Vec<Placeholder>,
}

/// The canvas editor: scene, view, history and the interaction state.
#[derive(Debug)]
pub struct InteractionController {
    config: EditorConfig,
    camera: Camera,
    store: ShapeStore,
    history: HistoryManager,
    state: EditorState,
    tools: ToolManager,
    uploads: Uploads,
    viewport: Size,
}

impl InteractionController {
    /// Create a controller from an optional host value.
    ///
    /// Without one the scene is empty at zoom 1 and no pan. The initial scene
    /// is the first history entry.
    pub fn new(config: EditorConfig, initial: Option<CanvasValue>) -> Self {
        let mut camera = Camera::with_bounds(config.min_zoom, config.max_zoom, config.zoom_step);
        let store = match initial {
            Some(value) => {
                if value.pan.is_finite() {
                    camera.pan = value.pan;
                } else {
                    log::warn!("stored pan {:?} is unusable; resetting", value.pan);
                }
                camera.set_zoom(value.zoom);
                ShapeStore::from_snapshot(value.snapshot)
            }
            None => ShapeStore::new(),
        };
        let mut history = HistoryManager::with_capacity(config.history_capacity);
        history.push(store.snapshot());
        let mut tools = ToolManager::new();
        tools.current_style = config.default_style();
        log::debug!("canvas mounted with {} shapes", store.scene().total());
        Self {
            config,
            camera,
            store,
            history,
            state: EditorState::default(),
            tools,
            uploads: Uploads::default(),
            viewport: Size::ZERO,
        }
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn store(&self) -> &ShapeStore {
        &self.store
    }

    pub fn scene(&self) -> &Snapshot {
        self.store.scene()
    }

    pub fn history(&self) -> &HistoryManager {
        &self.history
    }

    pub fn state(&self) -> &EditorState {
        &self.state
    }

    pub fn tool_manager(&self) -> &ToolManager {
        &self.tools
    }

    pub fn tool_manager_mut(&mut self) -> &mut ToolManager {
        &mut self.tools
    }

    /// The value the host persists.
    pub fn value(&self) -> CanvasValue {
        CanvasValue {
            pan: self.camera.pan,
            zoom: self.camera.zoom,
            snapshot: self.store.snapshot(),
        }
    }

    /// Size of the drawing surface in screen pixels.
    pub fn set_viewport(&mut self, size: Size) {
        self.viewport = size;
    }

    /// Switch the active tool, abandoning any gesture in progress.
    pub fn set_tool(&mut self, tool: ToolKind) -> Outcome {
        let mut out = self.abort_gesture();
        if tool != self.state.active_tool {
            log::debug!("tool {:?} -> {:?}", self.state.active_tool, tool);
        }
        self.state.active_tool = tool;
        if !tool.is_one_shot() {
            self.state.pending_insert = None;
        }
        self.tools.set_tool(tool);
        self.refresh_cursor(&mut out);
        out
    }

    /// Choose a palette item; the next click places it.
    pub fn set_pending_insert(&mut self, insert: PendingInsert) -> Outcome {
        let tool = insert.tool();
        let out = self.set_tool(tool);
        self.state.pending_insert = Some(insert);
        out
    }

    /// Push the scene to history if it differs from the current entry.
    pub(crate) fn commit(&mut self, out: &mut Outcome) {
        if self.history.current() == Some(self.store.scene()) {
            return;
        }
        self.history.push(self.store.snapshot());
        log::debug!(
            "committed history entry {} ({} shapes)",
            self.history.cursor(),
            self.store.scene().total()
        );
        out.committed = true;
        out.effects.push(Effect::Changed(self.value()));
    }

    /// Report a view-only change.
    pub(crate) fn view_changed(&self, out: &mut Outcome) {
        out.effects.push(Effect::Changed(self.value()));
        out.effects.push(Effect::Repaint);
    }

    pub fn undo(&mut self) -> Outcome {
        let Some(entry) = self.history.undo().cloned() else {
            log::debug!("nothing to undo");
            return Outcome::default();
        };
        log::debug!("undo to entry {}", self.history.cursor());
        self.replay(&entry)
    }

    pub fn redo(&mut self) -> Outcome {
        let Some(entry) = self.history.redo().cloned() else {
            log::debug!("nothing to redo");
            return Outcome::default();
        };
        log::debug!("redo to entry {}", self.history.cursor());
        self.replay(&entry)
    }

    /// Replace the scene wholesale from a history entry.
    fn replay(&mut self, entry: &Snapshot) -> Outcome {
        self.history.set_suppressed(true);
        self.tools.cancel();
        self.state.drag = DragMode::Idle;
        self.state.hover_anchor = None;
        self.store.restore(entry);
        self.history.set_suppressed(false);
        let mut out = Outcome::default();
        self.view_changed(&mut out);
        out
    }

    /// Drop the current gesture and put the scene back to the current
    /// history entry. Nothing is pushed.
    pub(crate) fn abort_gesture(&mut self) -> Outcome {
        let was_dragging = !self.state.drag.is_idle();
        self.tools.cancel();
        self.state.drag = DragMode::Idle;
        self.state.hover_anchor = None;
        if was_dragging {
            if let Some(current) = self.history.current() {
                if current != self.store.scene() {
                    let current = current.clone();
                    let selected: Vec<ShapeId> =
                        self.store.selection().iter().map(|s| s.id.clone()).collect();
                    self.store.restore(&current);
                    self.store.select_ids(&selected);
                }
            }
            return Outcome::repaint();
        }
        Outcome::default()
    }

    pub fn zoom_in(&mut self) -> Outcome {
        self.camera.zoom_in();
        let mut out = Outcome::default();
        self.view_changed(&mut out);
        out
    }

    pub fn zoom_out(&mut self) -> Outcome {
        self.camera.zoom_out();
        let mut out = Outcome::default();
        self.view_changed(&mut out);
        out
    }

    pub fn reset_view(&mut self) -> Outcome {
        self.camera.reset();
        let mut out = Outcome::default();
        self.view_changed(&mut out);
        out
    }

    /// Fit every shape into the viewport with the configured margin.
    pub fn fit_to_screen(&mut self) -> Outcome {
        let Some(bounds) = scene_bounds(self.store.scene()) else {
            return Outcome::default();
        };
        if self.viewport.width <= 0.0 || self.viewport.height <= 0.0 {
            log::warn!("fit to screen requested before the viewport size is known");
            return Outcome::default();
        }
        self.camera
            .fit_to_bounds(bounds, self.viewport, self.config.fit_margin);
        log::info!("fit view to {bounds:?} at zoom {:.3}", self.camera.zoom);
        let mut out = Outcome::default();
        self.view_changed(&mut out);
        out
    }

    /// World tolerance for a screen-pixel radius.
    pub(crate) fn tolerance(&self, pixels: f64) -> f64 {
        self.camera.screen_len(pixels)
    }

    /// Number for a new frame: one past the highest existing number.
    pub(crate) fn next_frame_number(&self) -> u32 {
        self.store
            .scene()
            .frames
            .iter()
            .map(|f| f.frame_number)
            .max()
            .unwrap_or(0)
            + 1
    }

    pub(crate) fn next_figure_number(&self) -> u32 {
        self.store
            .scene()
            .figures
            .iter()
            .map(|f| f.figure_number)
            .max()
            .unwrap_or(0)
            + 1
    }

    /// Transient geometry for the renderer.
    pub fn overlay(&self) -> Overlay {
        let scene = self.store.scene();
        let zoom = self.camera.zoom;
        let mut overlay = Overlay {
            preview: self.tools.preview_shape(),
            hover_anchor: self.state.hover_anchor.as_ref().map(|h| h.point),
            placeholders: self.uploads.placeholders().to_vec(),
            ..Overlay::default()
        };

        match &self.state.drag {
            DragMode::RubberBand { start, current, .. } => {
                overlay.rubber_band = Some(Rect::from_points(*start, *current));
            }
            DragMode::PendingConnector { from, current } => {
                let to = self
                    .state
                    .hover_anchor
                    .as_ref()
                    .map(|h| h.anchor.clone())
                    .unwrap_or_else(|| Anchor::point(*current));
                overlay.pending_route = connector_route(&Connector::new(from.clone(), to), scene, zoom);
            }
            _ => {}
        }

        for item in self.store.selection() {
            let Some(shape) = scene.shape(item.kind, item.index) else {
                continue;
            };
            match &shape {
                Shape::Connector(connector) => {
                    if let Some(route) = connector_route(connector, scene, zoom) {
                        overlay.selection_bounds.push(route_bounds(&route));
                    }
                }
                _ => {
                    if let Some(bounds) = shape.bounds() {
                        overlay.selection_bounds.push(bounds);
                    }
                }
            }
        }

        if let Some(item) = self.store.sole_selection() {
            if let Some(shape) = scene.shape(item.kind, item.index) {
                let handles = match &shape {
                    Shape::Connector(connector) => connector_route(connector, scene, zoom)
                        .map(|route| connector_handles(&route))
                        .unwrap_or_default(),
                    _ => get_handles(&shape),
                };
                overlay.handles = handles.iter().map(|h| h.position).collect();
            }
        }
        overlay
    }

    /// Whether a pointer gesture is in progress.
    pub fn is_dragging(&self) -> bool {
        !self.state.drag.is_idle()
    }

    pub(crate) fn selected_ids(&self) -> Vec<ShapeId> {
        self.store.selection().iter().map(|s| s.id.clone()).collect()
    }

    pub(crate) fn shape_by_id(&self, id: &ShapeId) -> Option<(ShapeKind, usize, Shape)> {
        let (kind, index) = self.store.scene().find(id)?;
        let shape = self.store.scene().shape(kind, index)?;
        Some((kind, index, shape))
    }
}

fn route_bounds(route: &[Point]) -> Rect {
    route
        .iter()
        .skip(1)
        .fold(
            route
                .first()
                .map(|p| Rect::from_points(*p, *p))
                .unwrap_or_default(),
            |acc, p| acc.union_pt(*p),
        )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shapes::Rectangle;

    #[test]
    fn test_initial_entry_pushed_once() {
        let controller = InteractionController::new(EditorConfig::default(), None);
        assert_eq!(controller.history().len(), 1);
        assert!(!controller.history().can_undo());
        assert!(controller.scene().is_empty());
        assert!((controller.camera().zoom - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_initial_value_is_loaded() {
        let mut snapshot = Snapshot::default();
        snapshot.rects.push(Rectangle::new(0.0, 0.0, 10.0, 10.0));
        let value = CanvasValue {
            pan: kurbo::Vec2::new(5.0, 6.0),
            zoom: 2.0,
            snapshot,
        };
        let controller = InteractionController::new(EditorConfig::default(), Some(value));
        assert_eq!(controller.scene().rects.len(), 1);
        assert!((controller.camera().zoom - 2.0).abs() < f64::EPSILON);
        assert_eq!(controller.camera().pan, kurbo::Vec2::new(5.0, 6.0));
    }

    #[test]
    fn test_unusable_initial_view_is_reset() {
        let value = CanvasValue {
            pan: kurbo::Vec2::new(f64::NAN, 3.0),
            zoom: f64::NAN,
            snapshot: Snapshot::default(),
        };
        let controller = InteractionController::new(EditorConfig::default(), Some(value));
        assert!((controller.camera().zoom - 1.0).abs() < f64::EPSILON);
        assert_eq!(controller.camera().pan, kurbo::Vec2::ZERO);
        let world = controller.camera().to_world(Point::new(40.0, 20.0));
        assert_eq!(world, Point::new(40.0, 20.0));

        let value = CanvasValue {
            zoom: 0.0,
            ..CanvasValue::default()
        };
        let controller = InteractionController::new(EditorConfig::default(), Some(value));
        assert!((controller.camera().zoom - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_commit_skips_unchanged_scene() {
        let mut controller = InteractionController::new(EditorConfig::default(), None);
        let mut out = Outcome::default();
        controller.commit(&mut out);
        assert!(!out.committed);
        assert_eq!(controller.history().len(), 1);
    }

    #[test]
    fn test_fit_to_screen_needs_viewport() {
        let mut snapshot = Snapshot::default();
        snapshot.rects.push(Rectangle::new(0.0, 0.0, 2000.0, 1000.0));
        let value = CanvasValue {
            pan: kurbo::Vec2::ZERO,
            zoom: 1.0,
            snapshot,
        };
        let mut controller = InteractionController::new(EditorConfig::default(), Some(value));
        assert!(controller.fit_to_screen().changed().is_none());
        controller.set_viewport(Size::new(1160.0, 660.0));
        let out = controller.fit_to_screen();
        assert!(out.changed().is_some());
        assert!((controller.camera().zoom - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_fit_never_zooms_past_one() {
        let mut snapshot = Snapshot::default();
        snapshot.rects.push(Rectangle::new(0.0, 0.0, 10.0, 10.0));
        let value = CanvasValue {
            pan: kurbo::Vec2::ZERO,
            zoom: 1.0,
            snapshot,
        };
        let mut controller = InteractionController::new(EditorConfig::default(), Some(value));
        controller.set_viewport(Size::new(800.0, 600.0));
        controller.fit_to_screen();
        assert!((controller.camera().zoom - 1.0).abs() < f64::EPSILON);
    }
}
