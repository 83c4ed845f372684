//! Connector creation and re-anchoring with live anchor snapping.

use super::{DragMode, InteractionController, Outcome};
use crate::geometry::{AnchorHandle, SnapRadii, anchor_handles, anchor_point, nearest_anchor};
use crate::shapes::{Anchor, Connector, Shape, ShapeId};
use kurbo::Point;

impl InteractionController {
    /// Anchor handle close enough to the pointer to start a connector.
    pub(super) fn anchor_handle_at(&self, world: Point) -> Option<AnchorHandle> {
        let radius = self.tolerance(self.config.anchor_snap_radius);
        anchor_handles(self.store.scene())
            .into_iter()
            .map(|handle| (handle.point.distance(world), handle))
            .filter(|(d, _)| *d <= radius)
            .min_by(|a, b| a.0.total_cmp(&b.0))
            .map(|(_, handle)| handle)
    }

    /// Refresh the hover anchor, skipping anchors on `exclude`.
    fn update_hover_anchor(&mut self, world: Point, exclude: Option<&ShapeId>) {
        let radii = SnapRadii::at_zoom(
            self.config.anchor_snap_radius,
            self.config.edge_snap_radius,
            self.camera.zoom,
        );
        self.state.hover_anchor = nearest_anchor(self.store.scene(), world, radii, exclude);
    }

    pub(super) fn begin_pending_connector(&mut self, from: Anchor, world: Point) -> Outcome {
        log::debug!("pending connector from {:?}", from.shape_id());
        self.state.drag = DragMode::PendingConnector {
            from,
            current: world,
        };
        self.state.hover_anchor = None;
        Outcome::repaint()
    }

    /// Pointer-move while an anchor search is live.
    pub(super) fn anchor_drag(&mut self, world: Point) -> Outcome {
        let mut drag = std::mem::take(&mut self.state.drag);
        match &mut drag {
            DragMode::PendingConnector { from, current } => {
                *current = world;
                let exclude = from.shape_id().cloned();
                self.update_hover_anchor(world, exclude.as_ref());
            }
            DragMode::ResizeConnectorEndpoint { end, original, .. } => {
                let other = if *end == 0 { &original.to } else { &original.from };
                let exclude = other.shape_id().cloned();
                self.update_hover_anchor(world, exclude.as_ref());
                let mut connector = original.clone();
                *connector.end_mut(*end) = self
                    .state
                    .hover_anchor
                    .as_ref()
                    .map(|hit| hit.anchor.clone())
                    .unwrap_or_else(|| Anchor::point(world));
                self.put_shape(Shape::Connector(connector));
            }
            _ => {}
        }
        self.state.drag = drag;
        Outcome::repaint()
    }

    /// Pointer-up for connector creation or re-anchoring.
    pub(super) fn anchor_up(&mut self, drag: DragMode) -> Outcome {
        let mut out = Outcome::repaint();
        let hover = self.state.hover_anchor.take();
        match drag {
            DragMode::PendingConnector { from, current } => {
                let to = match hover {
                    Some(hit) => hit.anchor,
                    None => {
                        let start = anchor_point(&from, self.store.scene());
                        if start.is_some_and(|p| p.distance(current) < self.config.min_draw_size) {
                            log::debug!("connector released on its origin; discarded");
                            return out;
                        }
                        Anchor::point(current)
                    }
                };
                let mut connector = Connector::new(from, to);
                connector.style = self.tools.current_style.clone();
                log::debug!("created connector {}", connector.id);
                self.store.scene_mut().push(Shape::Connector(connector));
                self.commit(&mut out);
            }
            DragMode::ResizeConnectorEndpoint { id, .. } => {
                log::debug!("re-anchored connector {id}");
                self.commit(&mut out);
                self.store.resolve_selection();
            }
            _ => {}
        }
        out
    }
}
