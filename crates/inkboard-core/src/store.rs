//! Shape collections and selection.

use crate::shapes::{
    Circle, Code, Connector, Figure, Frame, Image, Line, PAINT_ORDER, Path, Poly, Rectangle,
    Shape, ShapeId, ShapeKind, ShapeTrait, Text,
};
use kurbo::Rect;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Run `$body` with `$vec` bound to the collection for `$kind`.
macro_rules! on_collection {
    (mut $snapshot:expr, $kind:expr, $vec:ident => $body:expr) => {
        match $kind {
            ShapeKind::Image => { let $vec = &mut $snapshot.images; $body }
            ShapeKind::Rect => { let $vec = &mut $snapshot.rects; $body }
            ShapeKind::Circle => { let $vec = &mut $snapshot.circles; $body }
            ShapeKind::Poly => { let $vec = &mut $snapshot.polys; $body }
            ShapeKind::Line => { let $vec = &mut $snapshot.lines; $body }
            ShapeKind::Arrow => { let $vec = &mut $snapshot.arrows; $body }
            ShapeKind::Connector => { let $vec = &mut $snapshot.connectors; $body }
            ShapeKind::Path => { let $vec = &mut $snapshot.paths; $body }
            ShapeKind::Text => { let $vec = &mut $snapshot.texts; $body }
            ShapeKind::Frame => { let $vec = &mut $snapshot.frames; $body }
            ShapeKind::Figure => { let $vec = &mut $snapshot.figures; $body }
            ShapeKind::Code => { let $vec = &mut $snapshot.codes; $body }
        }
    };
    ($snapshot:expr, $kind:expr, $vec:ident => $body:expr) => {
        match $kind {
            ShapeKind::Image => { let $vec = &$snapshot.images; $body }
            ShapeKind::Rect => { let $vec = &$snapshot.rects; $body }
            ShapeKind::Circle => { let $vec = &$snapshot.circles; $body }
            ShapeKind::Poly => { let $vec = &$snapshot.polys; $body }
            ShapeKind::Line => { let $vec = &$snapshot.lines; $body }
            ShapeKind::Arrow => { let $vec = &$snapshot.arrows; $body }
            ShapeKind::Connector => { let $vec = &$snapshot.connectors; $body }
            ShapeKind::Path => { let $vec = &$snapshot.paths; $body }
            ShapeKind::Text => { let $vec = &$snapshot.texts; $body }
            ShapeKind::Frame => { let $vec = &$snapshot.frames; $body }
            ShapeKind::Figure => { let $vec = &$snapshot.figures; $body }
            ShapeKind::Code => { let $vec = &$snapshot.codes; $body }
        }
    };
}

/// Full copy of every shape collection at one point in edit time.
///
/// Serialized as one camelCase array per kind. Missing arrays load as empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Snapshot {
    pub images: Vec<Image>,
    pub rects: Vec<Rectangle>,
    pub circles: Vec<Circle>,
    pub polys: Vec<Poly>,
    pub lines: Vec<Line>,
    pub arrows: Vec<Line>,
    pub connectors: Vec<Connector>,
    pub paths: Vec<Path>,
    pub texts: Vec<Text>,
    pub frames: Vec<Frame>,
    pub figures: Vec<Figure>,
    pub codes: Vec<Code>,
}

/// An entry in the undo history.
pub type HistoryEntry = Snapshot;

impl Snapshot {
    /// Number of shapes of one kind.
    pub fn len(&self, kind: ShapeKind) -> usize {
        on_collection!(self, kind, v => v.len())
    }

    /// Total number of shapes.
    pub fn total(&self) -> usize {
        PAINT_ORDER.iter().map(|kind| self.len(*kind)).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }

    /// Borrow a shape by collection position.
    pub fn get(&self, kind: ShapeKind, index: usize) -> Option<&dyn ShapeTrait> {
        on_collection!(self, kind, v => v.get(index).map(|s| s as &dyn ShapeTrait))
    }

    pub fn get_mut(&mut self, kind: ShapeKind, index: usize) -> Option<&mut dyn ShapeTrait> {
        on_collection!(mut self, kind, v => v.get_mut(index).map(|s| s as &mut dyn ShapeTrait))
    }

    /// Owned copy of a shape.
    pub fn shape(&self, kind: ShapeKind, index: usize) -> Option<Shape> {
        Some(match kind {
            ShapeKind::Image => Shape::Image(self.images.get(index)?.clone()),
            ShapeKind::Rect => Shape::Rect(self.rects.get(index)?.clone()),
            ShapeKind::Circle => Shape::Circle(self.circles.get(index)?.clone()),
            ShapeKind::Poly => Shape::Poly(self.polys.get(index)?.clone()),
            ShapeKind::Line => Shape::Line(self.lines.get(index)?.clone()),
            ShapeKind::Arrow => Shape::Arrow(self.arrows.get(index)?.clone()),
            ShapeKind::Connector => Shape::Connector(self.connectors.get(index)?.clone()),
            ShapeKind::Path => Shape::Path(self.paths.get(index)?.clone()),
            ShapeKind::Text => Shape::Text(self.texts.get(index)?.clone()),
            ShapeKind::Frame => Shape::Frame(self.frames.get(index)?.clone()),
            ShapeKind::Figure => Shape::Figure(self.figures.get(index)?.clone()),
            ShapeKind::Code => Shape::Code(self.codes.get(index)?.clone()),
        })
    }

    /// Append a shape to its collection and return its index.
    pub fn push(&mut self, shape: Shape) -> usize {
        fn append<T>(v: &mut Vec<T>, item: T) -> usize {
            v.push(item);
            v.len() - 1
        }
        match shape {
            Shape::Image(s) => append(&mut self.images, s),
            Shape::Rect(s) => append(&mut self.rects, s),
            Shape::Circle(s) => append(&mut self.circles, s),
            Shape::Poly(s) => append(&mut self.polys, s),
            Shape::Line(s) => append(&mut self.lines, s),
            Shape::Arrow(s) => append(&mut self.arrows, s),
            Shape::Connector(s) => append(&mut self.connectors, s),
            Shape::Path(s) => append(&mut self.paths, s),
            Shape::Text(s) => append(&mut self.texts, s),
            Shape::Frame(s) => append(&mut self.frames, s),
            Shape::Figure(s) => append(&mut self.figures, s),
            Shape::Code(s) => append(&mut self.codes, s),
        }
    }

    /// Overwrite the shape at `index` of the shape's own collection.
    ///
    /// Returns false if the index is out of range.
    pub fn set(&mut self, index: usize, shape: Shape) -> bool {
        fn put<T>(v: &mut [T], index: usize, item: T) -> bool {
            match v.get_mut(index) {
                Some(slot) => {
                    *slot = item;
                    true
                }
                None => false,
            }
        }
        match shape {
            Shape::Image(s) => put(&mut self.images, index, s),
            Shape::Rect(s) => put(&mut self.rects, index, s),
            Shape::Circle(s) => put(&mut self.circles, index, s),
            Shape::Poly(s) => put(&mut self.polys, index, s),
            Shape::Line(s) => put(&mut self.lines, index, s),
            Shape::Arrow(s) => put(&mut self.arrows, index, s),
            Shape::Connector(s) => put(&mut self.connectors, index, s),
            Shape::Path(s) => put(&mut self.paths, index, s),
            Shape::Text(s) => put(&mut self.texts, index, s),
            Shape::Frame(s) => put(&mut self.frames, index, s),
            Shape::Figure(s) => put(&mut self.figures, index, s),
            Shape::Code(s) => put(&mut self.codes, index, s),
        }
    }

    /// Remove a shape by position. Does not cascade.
    pub fn remove(&mut self, kind: ShapeKind, index: usize) -> Option<Shape> {
        let shape = self.shape(kind, index)?;
        on_collection!(mut self, kind, v => { v.remove(index); });
        Some(shape)
    }

    /// Position of a shape by id. Collections are unsorted, so this scans.
    pub fn index_of(&self, kind: ShapeKind, id: &ShapeId) -> Option<usize> {
        on_collection!(self, kind, v => v.iter().position(|s| s.id() == id))
    }

    /// Locate a shape of any kind by id.
    pub fn find(&self, id: &ShapeId) -> Option<(ShapeKind, usize)> {
        PAINT_ORDER
            .iter()
            .find_map(|kind| self.index_of(*kind, id).map(|index| (*kind, index)))
    }

    pub fn contains_id(&self, id: &ShapeId) -> bool {
        self.find(id).is_some()
    }

    /// Iterate one collection.
    pub fn iter(&self, kind: ShapeKind) -> Box<dyn Iterator<Item = &dyn ShapeTrait> + '_> {
        on_collection!(self, kind, v => Box::new(v.iter().map(|s| s as &dyn ShapeTrait)))
    }

    /// Iterate every shape back to front in paint order.
    pub fn iter_painted(&self) -> impl Iterator<Item = (ShapeKind, usize, &dyn ShapeTrait)> + '_ {
        PAINT_ORDER.iter().flat_map(move |kind| {
            self.iter(*kind)
                .enumerate()
                .map(move |(index, shape)| (*kind, index, shape))
        })
    }

    /// Remove every shape whose id is in `ids`, plus every connector attached
    /// to any of them. Returns how many shapes were removed.
    pub fn remove_cascading(&mut self, ids: &HashSet<ShapeId>) -> usize {
        let before = self.total();
        for kind in PAINT_ORDER {
            on_collection!(mut self, kind, v => v.retain(|s| !ids.contains(s.id())));
        }
        self.connectors.retain(|c| {
            let dangling = ids.iter().any(|id| c.references(id));
            if dangling {
                log::debug!("removing connector {} attached to a deleted shape", c.id);
            }
            !dangling
        });
        before - self.total()
    }

    /// Whether an anchor's shape exists in the collection it names.
    pub fn anchor_target_exists(&self, kind: ShapeKind, id: &ShapeId) -> bool {
        kind.is_anchorable() && self.index_of(kind, id).is_some()
    }

    /// Repair a snapshot supplied by the host.
    ///
    /// Normalizes boxes, clamps style fields, re-measures text and code, and
    /// drops connectors whose attached shape does not exist.
    pub fn sanitize(&mut self) {
        for kind in PAINT_ORDER {
            on_collection!(mut self, kind, v => {
                for shape in v.iter_mut() {
                    shape.style_mut().sanitize();
                }
            });
        }
        for rect in &mut self.rects {
            rect.normalize();
        }
        for circle in &mut self.circles {
            circle.normalize();
        }
        for image in &mut self.images {
            image.set_rect(image.as_rect());
        }
        for poly in &mut self.polys {
            poly.set_rect(poly.as_rect());
        }
        for frame in &mut self.frames {
            frame.set_rect(frame.as_rect());
        }
        for figure in &mut self.figures {
            figure.set_rect(figure.as_rect());
        }
        for text in &mut self.texts {
            text.measure();
        }
        for code in &mut self.codes {
            code.fit_to_content();
        }

        let connectors = std::mem::take(&mut self.connectors);
        self.connectors = connectors
            .into_iter()
            .filter(|c| {
                let ok = [&c.from, &c.to].into_iter().all(|anchor| match anchor {
                    crate::shapes::Anchor::Shape { kind, shape_id, .. } => {
                        self.anchor_target_exists(*kind, shape_id)
                    }
                    crate::shapes::Anchor::Point { .. } => true,
                });
                if !ok {
                    log::warn!("dropping connector {} with a dangling anchor", c.id);
                }
                ok
            })
            .collect();
    }
}

/// A selected shape. `index` is a cache; `id` is authoritative.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionItem {
    pub kind: ShapeKind,
    pub index: usize,
    pub id: ShapeId,
}

/// The live scene plus the current selection.
#[derive(Debug, Clone, Default)]
pub struct ShapeStore {
    scene: Snapshot,
    selection: Vec<SelectionItem>,
}

impl ShapeStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store from a host snapshot, repairing it first.
    pub fn from_snapshot(mut snapshot: Snapshot) -> Self {
        snapshot.sanitize();
        Self {
            scene: snapshot,
            selection: Vec::new(),
        }
    }

    pub fn scene(&self) -> &Snapshot {
        &self.scene
    }

    pub fn scene_mut(&mut self) -> &mut Snapshot {
        &mut self.scene
    }

    /// Deep copy of the scene for history.
    pub fn snapshot(&self) -> Snapshot {
        self.scene.clone()
    }

    /// Replace every collection wholesale and clear the selection.
    pub fn restore(&mut self, snapshot: &Snapshot) {
        self.scene = snapshot.clone();
        self.selection.clear();
    }

    pub fn selection(&self) -> &[SelectionItem] {
        &self.selection
    }

    pub fn has_selection(&self) -> bool {
        !self.selection.is_empty()
    }

    /// The single selected shape, if exactly one is selected.
    pub fn sole_selection(&self) -> Option<&SelectionItem> {
        match self.selection.as_slice() {
            [only] => Some(only),
            _ => None,
        }
    }

    fn item(&self, kind: ShapeKind, index: usize) -> Option<SelectionItem> {
        let id = self.scene.get(kind, index)?.id().clone();
        Some(SelectionItem { kind, index, id })
    }

    /// Select one shape, replacing the selection.
    pub fn select(&mut self, kind: ShapeKind, index: usize) {
        self.selection.clear();
        self.add_to_selection(kind, index);
    }

    pub fn add_to_selection(&mut self, kind: ShapeKind, index: usize) {
        if let Some(item) = self.item(kind, index) {
            if !self.is_selected(&item.id) {
                self.selection.push(item);
            }
        }
    }

    /// Add the shape if unselected, remove it otherwise.
    pub fn toggle_selection(&mut self, kind: ShapeKind, index: usize) {
        let Some(item) = self.item(kind, index) else {
            return;
        };
        if self.is_selected(&item.id) {
            self.selection.retain(|s| s.id != item.id);
        } else {
            self.selection.push(item);
        }
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    /// Select every shape in paint order.
    pub fn select_all(&mut self) {
        self.selection = self
            .scene
            .iter_painted()
            .map(|(kind, index, shape)| SelectionItem {
                kind,
                index,
                id: shape.id().clone(),
            })
            .collect();
    }

    /// Replace the selection by ids, resolving their current positions.
    pub fn select_ids(&mut self, ids: &[ShapeId]) {
        self.selection = ids
            .iter()
            .filter_map(|id| {
                let (kind, index) = self.scene.find(id)?;
                Some(SelectionItem {
                    kind,
                    index,
                    id: id.clone(),
                })
            })
            .collect();
    }

    pub fn is_selected(&self, id: &ShapeId) -> bool {
        self.selection.iter().any(|s| &s.id == id)
    }

    /// Re-resolve cached indices after inserts or deletes; drops items whose
    /// shape no longer exists.
    pub fn resolve_selection(&mut self) {
        let scene = &self.scene;
        self.selection.retain_mut(|item| match scene.find(&item.id) {
            Some((kind, index)) => {
                item.kind = kind;
                item.index = index;
                true
            }
            None => false,
        });
    }

    /// Delete every selected shape, cascading to attached connectors.
    /// Returns how many shapes were removed.
    pub fn delete_selected(&mut self) -> usize {
        let ids: HashSet<ShapeId> = self.selection.drain(..).map(|s| s.id).collect();
        if ids.is_empty() {
            return 0;
        }
        self.scene.remove_cascading(&ids)
    }

    /// Shapes whose bounds lie entirely inside `rect`.
    pub fn shapes_inside(&self, rect: Rect) -> Vec<(ShapeKind, usize)> {
        self.scene
            .iter_painted()
            .filter(|(_, _, shape)| {
                shape
                    .bounds()
                    .is_some_and(|b| contains_rect(rect, b))
            })
            .map(|(kind, index, _)| (kind, index))
            .collect()
    }
}

/// Inclusive containment: `inner` may touch any edge of `outer`.
fn contains_rect(outer: Rect, inner: Rect) -> bool {
    inner.x0 >= outer.x0 && inner.y0 >= outer.y0 && inner.x1 <= outer.x1 && inner.y1 <= outer.y1
}
