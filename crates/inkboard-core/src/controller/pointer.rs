//! Pointer and wheel dispatch for every tool.

use super::cursor::ERASER_RADIUS;
use super::{DragMode, InteractionController, Outcome};
use crate::input::{Modifiers, MouseButton, PointerEvent, WheelEvent};
use crate::shapes::{Circle, Code, Figure, Frame, Image, Poly, Rectangle, Shape, ShapeId};
use crate::tools::{PendingInsert, Placement, ToolKind, resolve_tool};
use kurbo::{Point, Rect, Size};
use std::collections::HashSet;

/// Whether a freshly drawn shape is big enough to keep.
fn meets_min_size(shape: &Shape, min: f64) -> bool {
    match shape {
        Shape::Line(line) | Shape::Arrow(line) => line.length() >= min,
        Shape::Path(path) => {
            path.len() >= 2
                && shape
                    .bounds()
                    .is_some_and(|b| b.width().max(b.height()) >= min)
        }
        _ => shape
            .resize_box()
            .is_some_and(|b| b.width() >= min && b.height() >= min),
    }
}

impl InteractionController {
    /// Handle one pointer event. Positions are in screen coordinates.
    pub fn handle_pointer(&mut self, event: PointerEvent) -> Outcome {
        let screen = event.position();
        let world = self.camera.to_world(screen);
        self.state.pointer = Some(world);
        let mut out = match event {
            PointerEvent::Down {
                button, modifiers, ..
            } => self.pointer_down(screen, world, button, modifiers),
            PointerEvent::Move { modifiers, .. } => self.pointer_move(screen, world, modifiers),
            PointerEvent::Up { .. } | PointerEvent::Cancel { .. } => self.pointer_up(),
        };
        self.refresh_cursor(&mut out);
        out
    }

    fn pointer_down(
        &mut self,
        screen: Point,
        world: Point,
        button: MouseButton,
        modifiers: Modifiers,
    ) -> Outcome {
        let mut out = Outcome::default();
        if !self.state.drag.is_idle() {
            log::debug!("pointer down during {}; finishing it", self.state.drag.name());
            out.merge(self.pointer_up());
        }
        match button {
            MouseButton::Middle => {
                self.state.drag = DragMode::Pan { last: screen };
                return out;
            }
            MouseButton::Right => return out,
            MouseButton::Left => {}
        }

        let tool = resolve_tool(self.state.active_tool, modifiers, self.state.space_held);
        let result = match tool {
            ToolKind::Select => self.select_down(world, modifiers),
            ToolKind::Hand => {
                self.state.drag = DragMode::Pan { last: screen };
                Outcome::default()
            }
            ToolKind::Arrow => match self.anchor_handle_at(world) {
                Some(handle) => self.begin_pending_connector(handle.anchor, world),
                None => self.begin_drawing(tool, world),
            },
            ToolKind::Rectangle
            | ToolKind::Circle
            | ToolKind::Line
            | ToolKind::Frame
            | ToolKind::Pencil => self.begin_drawing(tool, world),
            ToolKind::Eraser => {
                self.state.drag = DragMode::Erasing;
                self.erase_at(world);
                Outcome::repaint()
            }
            ToolKind::Text => self.text_down(world),
            ToolKind::PlusAdd | ToolKind::IconAdd => self.place_pending(world),
        };
        out.merge(result);
        out
    }

    fn begin_drawing(&mut self, tool: ToolKind, world: Point) -> Outcome {
        self.store.clear_selection();
        self.tools.begin(tool, world);
        self.state.drag = DragMode::Drawing;
        Outcome::repaint()
    }

    fn pointer_move(&mut self, screen: Point, world: Point, modifiers: Modifiers) -> Outcome {
        match &mut self.state.drag {
            DragMode::Idle => Outcome::default(),
            DragMode::Pan { last } => {
                let delta = screen - *last;
                *last = screen;
                self.camera.pan_by(delta);
                let mut out = Outcome::default();
                self.view_changed(&mut out);
                out
            }
            DragMode::Drawing => {
                self.tools.update(world, modifiers.shift);
                Outcome::repaint()
            }
            DragMode::Erasing => {
                self.erase_at(world);
                Outcome::repaint()
            }
            DragMode::PendingConnector { .. } | DragMode::ResizeConnectorEndpoint { .. } => {
                self.anchor_drag(world)
            }
            _ => self.select_drag(world, modifiers.shift),
        }
    }

    /// End the gesture. Pointer cancel takes the same path.
    fn pointer_up(&mut self) -> Outcome {
        let drag = std::mem::take(&mut self.state.drag);
        match drag {
            DragMode::Idle | DragMode::Pan { .. } => Outcome::default(),
            DragMode::Drawing => self.finish_drawing(),
            DragMode::Erasing => {
                let mut out = Outcome::repaint();
                self.commit(&mut out);
                out
            }
            DragMode::PendingConnector { .. } | DragMode::ResizeConnectorEndpoint { .. } => {
                self.anchor_up(drag)
            }
            _ => self.select_up(drag),
        }
    }

    fn finish_drawing(&mut self) -> Outcome {
        let mut out = Outcome::repaint();
        let Some(mut shape) = self.tools.end() else {
            return out;
        };
        shape.normalize();
        if !meets_min_size(&shape, self.config.min_draw_size) {
            log::debug!("discarded {} below the minimum size", shape.kind());
            return out;
        }
        if let Shape::Frame(frame) = &mut shape {
            frame.frame_number = self.next_frame_number();
        }
        log::debug!("drew {} {}", shape.kind(), shape.id());
        self.store.scene_mut().push(shape);
        self.commit(&mut out);
        out
    }

    /// Remove every path within eraser reach of `world`.
    fn erase_at(&mut self, world: Point) {
        let zoom = self.camera.zoom;
        let hits: HashSet<ShapeId> = self
            .store
            .scene()
            .paths
            .iter()
            .filter(|path| {
                path.distance_to(world) <= (path.style.stroke_width / 2.0 + ERASER_RADIUS) / zoom
            })
            .map(|path| path.id.clone())
            .collect();
        if !hits.is_empty() {
            self.store.scene_mut().remove_cascading(&hits);
            self.store.resolve_selection();
        }
    }

    /// Place the pending palette item centred on `world`, then go back to
    /// the select tool.
    fn place_pending(&mut self, world: Point) -> Outcome {
        let mut out = Outcome::repaint();
        if let Some(insert) = self.state.pending_insert.take() {
            let shape = self.pending_shape(insert, world);
            let id = shape.id().clone();
            log::debug!("placed {} {id}", shape.kind());
            self.store.scene_mut().push(shape);
            self.store.select_ids(&[id]);
            self.commit(&mut out);
        } else {
            log::warn!("placement tool active without a pending item");
        }
        self.state.active_tool = ToolKind::Select;
        self.tools.set_tool(ToolKind::Select);
        out
    }

    fn pending_shape(&self, insert: PendingInsert, world: Point) -> Shape {
        let size = self.config.placement_size;
        let rect = Rect::from_center_size(world, Size::new(size, size));
        let (x, y) = (rect.x0, rect.y0);
        let mut shape = match insert {
            PendingInsert::Icon { src } => {
                let icon = Rect::from_center_size(world, Size::new(self.config.icon_size, self.config.icon_size));
                return Shape::Image(Image::new(src, icon.x0, icon.y0, icon.width(), icon.height()));
            }
            PendingInsert::Shape(Placement::Rect) => Shape::Rect(Rectangle::new(x, y, size, size)),
            PendingInsert::Shape(Placement::Circle) => Shape::Circle(Circle::from_rect(rect)),
            PendingInsert::Shape(Placement::Poly(poly_type)) => {
                Shape::Poly(Poly::new(poly_type, x, y, size, size))
            }
            PendingInsert::Shape(Placement::Frame) => {
                Shape::Frame(Frame::new(x, y, size * 2.0, size * 1.5, self.next_frame_number()))
            }
            PendingInsert::Shape(Placement::Figure) => {
                Shape::Figure(Figure::new(x, y, size * 2.0, size * 1.5, self.next_figure_number()))
            }
            PendingInsert::Shape(Placement::Code) => {
                Shape::Code(Code::new(Point::new(x, y), "", "plaintext"))
            }
        };
        *shape.style_mut() = self.tools.current_style.clone();
        shape
    }

    /// Wheel: zoom at the cursor with Ctrl/Cmd, otherwise pan.
    pub fn handle_wheel(&mut self, event: WheelEvent) -> Outcome {
        if event.modifiers.command() {
            let factor = if event.delta.y < 0.0 {
                self.config.wheel_zoom_factor
            } else if event.delta.y > 0.0 {
                1.0 / self.config.wheel_zoom_factor
            } else {
                return Outcome::default();
            };
            self.camera.zoom_at(event.position, factor);
        } else {
            self.camera.pan_by(-event.delta);
        }
        let mut out = Outcome::default();
        self.view_changed(&mut out);
        out
    }
}
