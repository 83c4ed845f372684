//! Toolbar command surface: field edits, kind conversion, delete and duplicate.

use super::{InteractionController, Outcome};
use crate::shapes::{
    Anchor, Circle, Code, Figure, FontFamily, Frame, PolyType, Poly, Rectangle,
    SerializableColor, Shape, ShapeId, ShapeKind, Text, TextAlign, normalize_box,
};
use kurbo::{Point, Vec2};
use serde::Deserialize;
use std::collections::HashMap;
use thiserror::Error;

/// Errors returned by toolbar commands and snapshot parsing.
#[derive(Debug, Error)]
pub enum EditError {
    #[error("No {kind} shape at index {index}")]
    NoSuchShape { kind: ShapeKind, index: usize },
    #[error("Cannot convert {from} to {to}")]
    UnsupportedConversion { from: ShapeKind, to: ShapeKind },
    #[error("Nothing is selected")]
    NothingSelected,
    #[error("Invalid snapshot: {0}")]
    InvalidSnapshot(#[from] serde_json::Error),
}

/// Partial field update sent by a toolbar.
///
/// Fields that do not apply to the target kind are ignored.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ShapePatch {
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub rx: Option<f64>,
    pub ry: Option<f64>,
    pub x1: Option<f64>,
    pub y1: Option<f64>,
    pub x2: Option<f64>,
    pub y2: Option<f64>,
    pub text: Option<String>,
    pub font_size: Option<f64>,
    pub font_family: Option<FontFamily>,
    pub text_align: Option<TextAlign>,
    pub code: Option<String>,
    pub language: Option<String>,
    pub title: Option<String>,
    #[serde(rename = "type")]
    pub poly_type: Option<PolyType>,
    pub src: Option<String>,
    pub fill: Option<SerializableColor>,
    pub stroke: Option<SerializableColor>,
    pub opacity: Option<f64>,
    pub stroke_width: Option<f64>,
    pub stroke_dash_array: Option<Vec<f64>>,
}

impl ShapePatch {
    /// Apply the patch to a shape in place.
    pub fn apply(&self, shape: &mut Shape) {
        let style = shape.style_mut();
        if let Some(fill) = self.fill {
            style.fill = Some(fill);
        }
        if let Some(stroke) = self.stroke {
            style.stroke = Some(stroke);
        }
        if let Some(opacity) = self.opacity {
            style.set_opacity(opacity);
        }
        if let Some(width) = self.stroke_width {
            style.stroke_width = width.max(0.0);
        }
        if let Some(dash) = &self.stroke_dash_array {
            style.stroke_dash_array = (!dash.is_empty()).then(|| dash.clone());
        }

        match shape {
            Shape::Circle(circle) => {
                circle.x = self.x.unwrap_or(circle.x);
                circle.y = self.y.unwrap_or(circle.y);
                circle.rx = self.rx.unwrap_or(circle.rx).abs();
                circle.ry = self.ry.unwrap_or(circle.ry).abs();
            }
            Shape::Line(line) | Shape::Arrow(line) => {
                line.x1 = self.x1.unwrap_or(line.x1);
                line.y1 = self.y1.unwrap_or(line.y1);
                line.x2 = self.x2.unwrap_or(line.x2);
                line.y2 = self.y2.unwrap_or(line.y2);
            }
            Shape::Text(text) => {
                text.x = self.x.unwrap_or(text.x);
                text.y = self.y.unwrap_or(text.y);
                if let Some(align) = self.text_align {
                    text.text_align = align;
                }
                if let Some(family) = self.font_family {
                    text.set_font_family(family);
                }
                if let Some(size) = self.font_size {
                    text.set_font_size(size);
                }
                if let Some(content) = &self.text {
                    text.set_text(content.clone());
                }
            }
            Shape::Code(code) => {
                code.x = self.x.unwrap_or(code.x);
                code.y = self.y.unwrap_or(code.y);
                if let Some(language) = &self.language {
                    code.language = language.clone();
                }
                if let Some(size) = self.font_size {
                    code.set_font_size(size);
                }
                if let Some(content) = &self.code {
                    code.set_code(content.clone());
                }
            }
            Shape::Poly(poly) => {
                if let Some(poly_type) = self.poly_type {
                    poly.poly_type = poly_type;
                }
            }
            Shape::Figure(figure) => {
                if let Some(title) = &self.title {
                    figure.title = title.clone();
                }
            }
            Shape::Image(image) => {
                if let Some(src) = &self.src {
                    image.src = src.clone();
                }
            }
            _ => {}
        }

        if matches!(shape, Shape::Circle(_)) {
            return;
        }
        if let Some(rect) = shape.resize_box() {
            shape.set_resize_box(normalize_box(
                self.x.unwrap_or(rect.x0),
                self.y.unwrap_or(rect.y0),
                self.width.unwrap_or(rect.width()),
                self.height.unwrap_or(rect.height()),
            ));
        }
    }
}

impl InteractionController {
    /// Apply a field patch to one shape and push history.
    pub fn update_shape(
        &mut self,
        kind: ShapeKind,
        index: usize,
        patch: &ShapePatch,
    ) -> Result<Outcome, EditError> {
        let mut shape = self
            .store
            .scene()
            .shape(kind, index)
            .ok_or(EditError::NoSuchShape { kind, index })?;
        patch.apply(&mut shape);
        shape.normalize();
        self.store.scene_mut().set(index, shape);
        let mut out = Outcome::repaint();
        self.commit(&mut out);
        Ok(out)
    }

    /// Convert a shape to another kind, keeping its id and style.
    ///
    /// Box kinds convert through their bounding box, text and code swap
    /// content, lines and arrows swap collection. Connectors attached to the
    /// shape follow it to the new collection.
    pub fn change_shape_kind(
        &mut self,
        kind: ShapeKind,
        index: usize,
        new_kind: ShapeKind,
    ) -> Result<Outcome, EditError> {
        let shape = self
            .store
            .scene()
            .shape(kind, index)
            .ok_or(EditError::NoSuchShape { kind, index })?;
        if kind == new_kind {
            return Ok(Outcome::default());
        }
        let mut converted = self
            .convert(&shape, new_kind)
            .ok_or(EditError::UnsupportedConversion {
                from: kind,
                to: new_kind,
            })?;
        let id = shape.id().clone();
        converted.set_id(id.clone());
        *converted.style_mut() = shape.style().clone();

        let scene = self.store.scene_mut();
        scene.remove(kind, index);
        scene.push(converted);
        scene.connectors.retain_mut(|connector| {
            for anchor in [&mut connector.from, &mut connector.to] {
                if let Anchor::Shape {
                    kind: anchor_kind,
                    shape_id,
                    ..
                } = anchor
                {
                    if *shape_id == id {
                        if !new_kind.is_anchorable() {
                            log::debug!("dropping connector {} after conversion", connector.id);
                            return false;
                        }
                        *anchor_kind = new_kind;
                    }
                }
            }
            true
        });
        log::debug!("converted {id} from {kind} to {new_kind}");

        self.store.select_ids(&[id]);
        let mut out = Outcome::repaint();
        self.commit(&mut out);
        Ok(out)
    }

    fn convert(&self, shape: &Shape, to: ShapeKind) -> Option<Shape> {
        let converted = match (shape, to) {
            (Shape::Text(text), ShapeKind::Code) => {
                let mut code = Code::new(Point::new(text.x, text.y), text.text(), "plaintext");
                code.set_font_size(text.font_size());
                Shape::Code(code)
            }
            (Shape::Code(code), ShapeKind::Text) => Shape::Text(
                Text::new(Point::new(code.x, code.y), code.code()).with_font_size(code.font_size()),
            ),
            (Shape::Line(line), ShapeKind::Arrow) => Shape::Arrow(line.clone()),
            (Shape::Arrow(line), ShapeKind::Line) => Shape::Line(line.clone()),
            _ => {
                let rect = shape.resize_box()?;
                let (x, y, w, h) = (rect.x0, rect.y0, rect.width(), rect.height());
                match to {
                    ShapeKind::Rect => Shape::Rect(Rectangle::new(x, y, w, h)),
                    ShapeKind::Circle => Shape::Circle(Circle::from_rect(rect)),
                    ShapeKind::Poly => Shape::Poly(Poly::new(PolyType::default(), x, y, w, h)),
                    ShapeKind::Frame => {
                        Shape::Frame(Frame::new(x, y, w, h, self.next_frame_number()))
                    }
                    ShapeKind::Figure => {
                        Shape::Figure(Figure::new(x, y, w, h, self.next_figure_number()))
                    }
                    _ => return None,
                }
            }
        };
        Some(converted)
    }

    /// Delete the selection, cascading to attached connectors.
    pub fn delete_selected(&mut self) -> Result<Outcome, EditError> {
        if !self.store.has_selection() {
            return Err(EditError::NothingSelected);
        }
        let removed = self.store.delete_selected();
        log::debug!("deleted {removed} shapes");
        let mut out = Outcome::repaint();
        self.commit(&mut out);
        Ok(out)
    }

    /// Duplicate the selection by `offset` and select the copies.
    pub fn duplicate_selection(&mut self, offset: Vec2) -> Result<Outcome, EditError> {
        if !self.store.has_selection() {
            return Err(EditError::NothingSelected);
        }
        let copies = self.duplicate_ids(&self.selected_ids(), offset);
        self.store.select_ids(&copies);
        let mut out = Outcome::repaint();
        self.commit(&mut out);
        Ok(out)
    }

    /// Copy shapes by id with fresh ids. Does not push history.
    ///
    /// Frames and figures take the next free number in order. A copied
    /// connector whose ends were copied in the same batch attaches to the
    /// copies.
    pub(super) fn duplicate_ids(&mut self, sources: &[ShapeId], offset: Vec2) -> Vec<ShapeId> {
        let mut next_frame = self.next_frame_number();
        let mut next_figure = self.next_figure_number();
        let mut mapping: HashMap<ShapeId, ShapeId> = HashMap::new();
        let mut copies = Vec::with_capacity(sources.len());
        for id in sources {
            let Some((_, _, mut shape)) = self.shape_by_id(id) else {
                continue;
            };
            shape.regenerate_id();
            shape.translate(offset);
            match &mut shape {
                Shape::Frame(frame) => {
                    frame.frame_number = next_frame;
                    next_frame += 1;
                }
                Shape::Figure(figure) => {
                    figure.figure_number = next_figure;
                    next_figure += 1;
                }
                _ => {}
            }
            mapping.insert(id.clone(), shape.id().clone());
            copies.push(shape);
        }

        for shape in &mut copies {
            if let Shape::Connector(connector) = shape {
                for anchor in [&mut connector.from, &mut connector.to] {
                    if let Anchor::Shape { shape_id, .. } = anchor {
                        if let Some(copy) = mapping.get(shape_id) {
                            *shape_id = copy.clone();
                        }
                    }
                }
            }
        }

        let ids = copies.iter().map(|shape| shape.id().clone()).collect();
        let scene = self.store.scene_mut();
        for shape in copies {
            scene.push(shape);
        }
        ids
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::CanvasValue;
    use crate::config::EditorConfig;
    use crate::shapes::AnchorSide;
    use crate::store::Snapshot;

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
    fn test_update_shape_patch() {
        let mut snapshot = Snapshot::default();
        snapshot.rects.push(Rectangle::new(0.0, 0.0, 10.0, 10.0));
        let mut c = controller(snapshot);
        let patch: ShapePatch =
            serde_json::from_str(r#"{ "width": -40.0, "opacity": 3.0 }"#).unwrap();
        let out = c.update_shape(ShapeKind::Rect, 0, &patch).unwrap();
        assert!(out.committed);
        let rect = &c.scene().rects[0];
        assert!((rect.x + 40.0).abs() < f64::EPSILON);
        assert!((rect.width - 40.0).abs() < f64::EPSILON);
        assert!((rect.style.opacity - 1.0).abs() < f64::EPSILON);
        assert_eq!(c.history().len(), 2);
    }

    #[test]
    fn test_update_missing_shape() {
        let mut c = controller(Snapshot::default());
        let err = c
            .update_shape(ShapeKind::Circle, 3, &ShapePatch::default())
            .unwrap_err();
        assert!(matches!(err, EditError::NoSuchShape { index: 3, .. }));
    }

    #[test]
    fn test_rect_to_circle_keeps_id_and_connectors() {
        let mut snapshot = Snapshot::default();
        let rect = Rectangle::new(0.0, 0.0, 100.0, 60.0);
        let other = Rectangle::new(300.0, 0.0, 50.0, 50.0);
        let id = rect.id.clone();
        snapshot.connectors.push(crate::shapes::Connector::new(
            Anchor::shape(ShapeKind::Rect, id.clone(), AnchorSide::Right),
            Anchor::shape(ShapeKind::Rect, other.id.clone(), AnchorSide::Left),
        ));
        snapshot.rects.extend([rect, other]);
        let mut c = controller(snapshot);

        c.change_shape_kind(ShapeKind::Rect, 0, ShapeKind::Circle).unwrap();
        let scene = c.scene();
        assert_eq!(scene.rects.len(), 1);
        assert_eq!(scene.circles.len(), 1);
        let circle = &scene.circles[0];
        assert_eq!(&circle.id, &id);
        assert!((circle.rx - 50.0).abs() < f64::EPSILON);
        assert!((circle.ry - 30.0).abs() < f64::EPSILON);
        assert!(matches!(
            &scene.connectors[0].from,
            Anchor::Shape { kind: ShapeKind::Circle, .. }
        ));
    }

    #[test]
    fn test_text_to_code_transfers_content() {
        let mut snapshot = Snapshot::default();
        snapshot
            .texts
            .push(Text::new(Point::new(5.0, 5.0), "fn main() {}").with_font_size(16.0));
        let mut c = controller(snapshot);
        c.change_shape_kind(ShapeKind::Text, 0, ShapeKind::Code).unwrap();
        let code = &c.scene().codes[0];
        assert_eq!(code.code(), "fn main() {}");
        assert!((code.font_size() - 16.0).abs() < f64::EPSILON);
        assert!(c.scene().texts.is_empty());
    }

    #[test]
    fn test_unsupported_conversion() {
        let mut snapshot = Snapshot::default();
        snapshot.rects.push(Rectangle::new(0.0, 0.0, 10.0, 10.0));
        let mut c = controller(snapshot);
        let err = c
            .change_shape_kind(ShapeKind::Rect, 0, ShapeKind::Text)
            .unwrap_err();
        assert!(matches!(err, EditError::UnsupportedConversion { .. }));
        assert_eq!(c.history().len(), 1);
    }

    #[test]
    fn test_duplicate_frames_number_monotonically() {
        let mut snapshot = Snapshot::default();
        snapshot.frames.push(Frame::new(0.0, 0.0, 100.0, 100.0, 1));
        snapshot.frames.push(Frame::new(200.0, 0.0, 100.0, 100.0, 4));
        let mut c = controller(snapshot);
        c.store.select_all();
        c.duplicate_selection(Vec2::new(20.0, 20.0)).unwrap();
        let numbers: Vec<u32> = c.scene().frames.iter().map(|f| f.frame_number).collect();
        assert_eq!(numbers, vec![1, 4, 5, 6]);
        assert!((c.scene().frames[2].x - 20.0).abs() < f64::EPSILON);
        assert_eq!(c.store().selection().len(), 2);
    }

    #[test]
    fn test_duplicated_connector_follows_copies() {
        let mut snapshot = Snapshot::default();
        let a = Rectangle::new(0.0, 0.0, 50.0, 50.0);
        let b = Rectangle::new(200.0, 0.0, 50.0, 50.0);
        snapshot.connectors.push(crate::shapes::Connector::new(
            Anchor::shape(ShapeKind::Rect, a.id.clone(), AnchorSide::Right),
            Anchor::shape(ShapeKind::Rect, b.id.clone(), AnchorSide::Left),
        ));
        snapshot.rects.extend([a, b]);
        let mut c = controller(snapshot);
        c.store.select_all();
        c.duplicate_selection(Vec2::new(0.0, 100.0)).unwrap();

        let scene = c.scene();
        assert_eq!(scene.rects.len(), 4);
        assert_eq!(scene.connectors.len(), 2);
        let copy = &scene.connectors[1];
        assert_eq!(copy.from.shape_id(), Some(&scene.rects[2].id));
        assert_eq!(copy.to.shape_id(), Some(&scene.rects[3].id));
    }

    #[test]
    fn test_delete_requires_selection() {
        let mut c = controller(Snapshot::default());
        assert!(matches!(c.delete_selected(), Err(EditError::NothingSelected)));
    }
}
