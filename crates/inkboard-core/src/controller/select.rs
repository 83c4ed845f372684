//! Select tool: hit-testing, handles, move, resize and rubber-band selection.

use super::{DragMode, InteractionController, Manipulation, Outcome};
use crate::geometry::{connector_route, distance_to_polyline};
use crate::input::Modifiers;
use crate::selection::{
    Handle, HandleKind, apply_manipulation, connector_handles, constrain_to_axis, get_handles,
    hit_test_handles,
};
use crate::shapes::{PAINT_ORDER, Shape, ShapeId, ShapeKind};
use kurbo::{Point, Rect, Vec2};

impl InteractionController {
    /// Topmost shape under a world point.
    ///
    /// Walks the paint order in reverse. Connectors are hit against their
    /// routed path, everything else through its own hit test.
    pub fn hit_test(&self, point: Point) -> Option<(ShapeKind, usize)> {
        let scene = self.store.scene();
        let zoom = self.camera.zoom;
        let slack = self.tolerance(self.config.stroke_hit_slack);
        PAINT_ORDER.iter().rev().find_map(|&kind| {
            (0..scene.len(kind))
                .rev()
                .find(|&index| match kind {
                    ShapeKind::Connector => {
                        let connector = &scene.connectors[index];
                        connector_route(connector, scene, zoom).is_some_and(|route| {
                            distance_to_polyline(point, &route)
                                <= connector.style.stroke_width / 2.0 + slack
                        })
                    }
                    _ => scene
                        .get(kind, index)
                        .is_some_and(|shape| shape.hit_test(point, slack)),
                })
                .map(|index| (kind, index))
        })
    }

    /// Handles of the sole selected shape.
    fn sole_handles(&self) -> Option<(ShapeId, Vec<Handle>)> {
        let item = self.store.sole_selection()?;
        let scene = self.store.scene();
        let shape = scene.shape(item.kind, item.index)?;
        let handles = match &shape {
            Shape::Connector(connector) => {
                connector_handles(&connector_route(connector, scene, self.camera.zoom)?)
            }
            _ => get_handles(&shape),
        };
        Some((item.id.clone(), handles))
    }

    /// Handle of the sole selected shape under a world point.
    pub(crate) fn handle_at(&self, point: Point) -> Option<HandleKind> {
        let (_, handles) = self.sole_handles()?;
        hit_test_handles(&handles, point, self.tolerance(self.config.handle_radius))
    }

    pub(super) fn select_down(&mut self, world: Point, modifiers: Modifiers) -> Outcome {
        if let Some((id, handles)) = self.sole_handles() {
            let radius = self.tolerance(self.config.handle_radius);
            if let Some(handle) = hit_test_handles(&handles, world, radius) {
                self.begin_handle_drag(id, handle, world);
                return Outcome::repaint();
            }
        }

        let Some((kind, index)) = self.hit_test(world) else {
            if !modifiers.shift {
                self.store.clear_selection();
            }
            self.state.drag = DragMode::RubberBand {
                start: world,
                current: world,
                additive: modifiers.shift,
            };
            return Outcome::repaint();
        };
        let Some(id) = self.store.scene().get(kind, index).map(|s| s.id().clone()) else {
            return Outcome::default();
        };

        if modifiers.alt {
            let sources = if self.store.is_selected(&id) {
                self.selected_ids()
            } else {
                vec![id]
            };
            let copies = self.duplicate_ids(&sources, Vec2::ZERO);
            log::debug!("alt-drag duplicated {} shapes", copies.len());
            self.store.select_ids(&copies);
        } else if modifiers.shift {
            self.store.toggle_selection(kind, index);
            if !self.store.is_selected(&id) {
                return Outcome::repaint();
            }
        } else if !self.store.is_selected(&id) {
            self.store.select(kind, index);
        }
        self.begin_move(world);
        Outcome::repaint()
    }

    fn begin_move(&mut self, world: Point) {
        let scene = self.store.scene();
        let originals = self
            .store
            .selection()
            .iter()
            .filter_map(|item| {
                let (kind, index) = scene.find(&item.id)?;
                scene.shape(kind, index)
            })
            .collect();
        self.state.drag = DragMode::Move {
            start: world,
            originals,
        };
    }

    fn begin_handle_drag(&mut self, id: ShapeId, handle: HandleKind, world: Point) {
        let Some((_, _, shape)) = self.shape_by_id(&id) else {
            return;
        };
        let drag = match (handle, shape) {
            (HandleKind::ConnectorEnd(end), Shape::Connector(original)) => {
                DragMode::ResizeConnectorEndpoint { id, end, original }
            }
            (HandleKind::ConnectorEnd(_), _) => return,
            (handle, original) => {
                let m = Manipulation {
                    id,
                    handle,
                    start: world,
                    original,
                };
                match handle {
                    HandleKind::Corner(_) => DragMode::ResizeCorner(m),
                    HandleKind::Edge(edge) if edge.is_horizontal() => {
                        DragMode::ResizeEdgeHorizontal(m)
                    }
                    HandleKind::Edge(_) => DragMode::ResizeEdgeVertical(m),
                    _ => DragMode::ResizeLineEndpoint(m),
                }
            }
        };
        log::debug!("begin {}", drag.name());
        self.state.drag = drag;
    }

    /// Replace a shape in the scene by id. Returns false if it is gone.
    pub(super) fn put_shape(&mut self, shape: Shape) -> bool {
        let scene = self.store.scene_mut();
        match scene.index_of(shape.kind(), shape.id()) {
            Some(index) => scene.set(index, shape),
            None => false,
        }
    }

    /// Pointer-move while a select-tool drag is active.
    pub(super) fn select_drag(&mut self, world: Point, constrain: bool) -> Outcome {
        let mut drag = std::mem::take(&mut self.state.drag);
        match &mut drag {
            DragMode::Move { start, originals } => {
                let mut delta = world - *start;
                if constrain {
                    delta = constrain_to_axis(Point::ZERO, delta.to_point()).to_vec2();
                }
                for original in originals.iter() {
                    let mut shape = original.clone();
                    shape.translate(delta);
                    self.put_shape(shape);
                }
            }
            DragMode::ResizeCorner(m)
            | DragMode::ResizeEdgeHorizontal(m)
            | DragMode::ResizeEdgeVertical(m)
            | DragMode::ResizeLineEndpoint(m) => {
                let shape = apply_manipulation(&m.original, Some(m.handle), world - m.start, constrain);
                self.put_shape(shape);
            }
            DragMode::RubberBand { current, .. } => *current = world,
            _ => {}
        }
        self.state.drag = drag;
        Outcome::repaint()
    }

    /// Pointer-up for a select-tool drag.
    pub(super) fn select_up(&mut self, drag: DragMode) -> Outcome {
        let mut out = Outcome::repaint();
        match drag {
            DragMode::RubberBand {
                start,
                current,
                additive,
            } => {
                let rect = Rect::from_points(start, current);
                let hits = self.store.shapes_inside(rect);
                if !additive {
                    self.store.clear_selection();
                }
                for (kind, index) in hits {
                    self.store.add_to_selection(kind, index);
                }
                log::debug!("rubber band selected {} shapes", self.store.selection().len());
            }
            DragMode::Move { .. }
            | DragMode::ResizeCorner(_)
            | DragMode::ResizeEdgeHorizontal(_)
            | DragMode::ResizeEdgeVertical(_)
            | DragMode::ResizeLineEndpoint(_) => {
                self.commit(&mut out);
                self.store.resolve_selection();
            }
            _ => {}
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use crate::canvas::CanvasValue;
    use crate::config::EditorConfig;
    use crate::controller::InteractionController;
    use crate::shapes::{Anchor, AnchorSide, Connector, Frame, Rectangle, ShapeKind};
    use crate::store::Snapshot;
    use kurbo::{Point, Vec2};

    fn controller(snapshot: Snapshot) -> InteractionController {
        InteractionController::new(
            EditorConfig::default(),
            Some(CanvasValue {
                pan: Vec2::ZERO,
                zoom: 1.0,
                snapshot,
            }),
        )
    }

    #[test]
    fn test_topmost_shape_wins() {
        let mut snapshot = Snapshot::default();
        snapshot.rects.push(Rectangle::new(0.0, 0.0, 100.0, 100.0));
        snapshot.rects.push(Rectangle::new(50.0, 50.0, 100.0, 100.0));
        let c = controller(snapshot);
        assert_eq!(c.hit_test(Point::new(75.0, 75.0)), Some((ShapeKind::Rect, 1)));
        assert_eq!(c.hit_test(Point::new(10.0, 10.0)), Some((ShapeKind::Rect, 0)));
        assert_eq!(c.hit_test(Point::new(500.0, 500.0)), None);
    }

    #[test]
    fn test_frame_interior_falls_through() {
        let mut snapshot = Snapshot::default();
        snapshot.rects.push(Rectangle::new(40.0, 40.0, 20.0, 20.0));
        snapshot.frames.push(Frame::new(0.0, 0.0, 200.0, 200.0, 1));
        let c = controller(snapshot);
        assert_eq!(c.hit_test(Point::new(50.0, 50.0)), Some((ShapeKind::Rect, 0)));
        assert_eq!(c.hit_test(Point::new(0.0, 100.0)), Some((ShapeKind::Frame, 0)));
    }

    #[test]
    fn test_connector_hit_through_route() {
        let mut snapshot = Snapshot::default();
        let a = Rectangle::new(0.0, 0.0, 50.0, 50.0);
        let b = Rectangle::new(300.0, 0.0, 50.0, 50.0);
        let connector = Connector::new(
            Anchor::shape(ShapeKind::Rect, a.id.clone(), AnchorSide::Right),
            Anchor::shape(ShapeKind::Rect, b.id.clone(), AnchorSide::Left),
        );
        snapshot.rects.extend([a, b]);
        snapshot.connectors.push(connector);
        let c = controller(snapshot);
        assert_eq!(c.hit_test(Point::new(175.0, 26.0)), Some((ShapeKind::Connector, 0)));
        assert_eq!(c.hit_test(Point::new(175.0, 60.0)), None);
    }
}
