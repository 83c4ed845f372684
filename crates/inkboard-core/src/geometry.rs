//! Stateless geometry over the scene: anchor resolution, bounds and distances.
//!
//! Anchors are resolved here and nowhere else; callers get fresh coordinates
//! on every call and must not keep them across a mutation.

use crate::router::{self, RouteRequest};
use crate::shapes::{Anchor, AnchorSide, Connector, ShapeKind, ShapeId, ShapeTrait};
use crate::store::Snapshot;
use kurbo::{Point, Rect};

/// Distance from `point` to the segment `a`-`b`.
pub fn distance_to_segment(point: Point, a: Point, b: Point) -> f64 {
    let ab = b - a;
    let len_sq = ab.hypot2();
    if len_sq < f64::EPSILON {
        return point.distance(a);
    }
    let t = ((point - a).dot(ab) / len_sq).clamp(0.0, 1.0);
    point.distance(a + ab * t)
}

/// Minimum distance from `point` to any segment of a polyline.
pub fn distance_to_polyline(point: Point, points: &[Point]) -> f64 {
    match points {
        [] => f64::INFINITY,
        [only] => point.distance(*only),
        _ => points
            .windows(2)
            .map(|w| distance_to_segment(point, w[0], w[1]))
            .fold(f64::INFINITY, f64::min),
    }
}

/// Box of an anchorable shape, looked up by id.
pub fn anchored_box(scene: &Snapshot, kind: ShapeKind, id: &ShapeId) -> Option<Rect> {
    if !kind.is_anchorable() {
        return None;
    }
    let index = scene.index_of(kind, id)?;
    scene.get(kind, index)?.bounds()
}

/// Point `percent` of the way along one side of a box.
pub fn box_side_point(rect: Rect, side: AnchorSide, percent: f64) -> Point {
    let t = percent.clamp(0.0, 1.0);
    let (origin, edge) = match side {
        AnchorSide::Top => (rect.origin(), (rect.width(), 0.0)),
        AnchorSide::Bottom => (Point::new(rect.x0, rect.y1), (rect.width(), 0.0)),
        AnchorSide::Left => (rect.origin(), (0.0, rect.height())),
        AnchorSide::Right => (Point::new(rect.x1, rect.y0), (0.0, rect.height())),
        AnchorSide::None => return rect.center(),
    };
    Point::new(origin.x + t * edge.0, origin.y + t * edge.1)
}

/// Cardinal point of an ellipse's bounding box. `percent` does not apply.
fn circle_side_point(rect: Rect, side: AnchorSide) -> Point {
    let c = rect.center();
    match side {
        AnchorSide::Top => Point::new(c.x, rect.y0),
        AnchorSide::Bottom => Point::new(c.x, rect.y1),
        AnchorSide::Left => Point::new(rect.x0, c.y),
        AnchorSide::Right => Point::new(rect.x1, c.y),
        AnchorSide::None => c,
    }
}

/// Resolve an anchor to a world point. `None` if its shape no longer exists.
pub fn anchor_point(anchor: &Anchor, scene: &Snapshot) -> Option<Point> {
    match anchor {
        Anchor::Point { point } => Some(*point),
        Anchor::Shape {
            kind,
            shape_id,
            side,
            percent,
        } => {
            let rect = anchored_box(scene, *kind, shape_id)?;
            Some(if *kind == ShapeKind::Circle {
                circle_side_point(rect, *side)
            } else {
                box_side_point(rect, *side, percent.unwrap_or(Anchor::DEFAULT_PERCENT))
            })
        }
    }
}

/// Box of the shape an anchor is attached to; `None` for floating anchors.
pub fn shape_bounds(anchor: &Anchor, scene: &Snapshot) -> Option<Rect> {
    match anchor {
        Anchor::Shape { kind, shape_id, .. } => anchored_box(scene, *kind, shape_id),
        Anchor::Point { .. } => None,
    }
}

/// Bounds of everything in the scene; `None` if it is empty.
pub fn scene_bounds(scene: &Snapshot) -> Option<Rect> {
    let mut result: Option<Rect> = None;
    let mut add = |rect: Rect| {
        result = Some(match result {
            Some(r) => r.union(rect),
            None => rect,
        });
    };
    for (_, _, shape) in scene.iter_painted() {
        if let Some(bounds) = shape.bounds() {
            add(bounds);
        }
    }
    for connector in &scene.connectors {
        for anchor in [&connector.from, &connector.to] {
            if let Anchor::Point { point } = anchor {
                add(Rect::from_points(*point, *point));
            }
        }
    }
    result
}

/// Routed polyline of a connector, or `None` if either end is unresolved.
pub fn connector_route(connector: &Connector, scene: &Snapshot, zoom: f64) -> Option<Vec<Point>> {
    let (Some(from), Some(to)) = (
        anchor_point(&connector.from, scene),
        anchor_point(&connector.to, scene),
    ) else {
        log::warn!("connector {} has an unresolved anchor; skipped", connector.id);
        return None;
    };
    Some(router::route(&RouteRequest {
        from,
        to,
        from_side: connector.from.side(),
        to_side: connector.to.side(),
        from_box: shape_bounds(&connector.from, scene),
        to_box: shape_bounds(&connector.to, scene),
        zoom,
    }))
}

/// A snappable connection point.
#[derive(Debug, Clone, PartialEq)]
pub struct AnchorHandle {
    pub anchor: Anchor,
    pub point: Point,
}

const SIDES: [AnchorSide; 4] = [
    AnchorSide::Top,
    AnchorSide::Bottom,
    AnchorSide::Left,
    AnchorSide::Right,
];

/// The four side midpoints of every anchorable shape (cardinals for circles).
pub fn anchor_handles(scene: &Snapshot) -> Vec<AnchorHandle> {
    let mut handles = Vec::new();
    for (kind, _, shape) in scene.iter_painted() {
        if !kind.is_anchorable() {
            continue;
        }
        for side in SIDES {
            let anchor = Anchor::shape(kind, shape.id().clone(), side);
            if let Some(point) = anchor_point(&anchor, scene) {
                handles.push(AnchorHandle { anchor, point });
            }
        }
    }
    handles
}

/// Search radii, already converted to world units.
#[derive(Debug, Clone, Copy)]
pub struct SnapRadii {
    /// Radius around precomputed handles.
    pub handle: f64,
    /// Radius around box edges and circle cardinals.
    pub edge: f64,
}

impl SnapRadii {
    /// Convert screen-pixel radii at the given zoom.
    pub fn at_zoom(handle_px: f64, edge_px: f64, zoom: f64) -> Self {
        Self {
            handle: handle_px / zoom,
            edge: edge_px / zoom,
        }
    }
}

fn nearest(candidates: impl Iterator<Item = (f64, AnchorHandle)>, radius: f64) -> Option<AnchorHandle> {
    candidates
        .filter(|(d, _)| *d <= radius)
        .fold(None, |best: Option<(f64, AnchorHandle)>, (d, h)| match best {
            Some((bd, _)) if bd <= d => best,
            _ => Some((d, h)),
        })
        .map(|(_, h)| h)
}

/// Nearest anchor to `point`.
///
/// Tries precomputed handles first, then any point on a box edge (with the
/// percent along the edge), then circle cardinal points. Anchors on
/// `exclude` are never candidates.
pub fn nearest_anchor(
    scene: &Snapshot,
    point: Point,
    radii: SnapRadii,
    exclude: Option<&ShapeId>,
) -> Option<AnchorHandle> {
    let allowed = |id: &ShapeId| exclude != Some(id);
    let handles = anchor_handles(scene);
    if let Some(hit) = nearest(
        handles
            .into_iter()
            .filter(|h| h.anchor.shape_id().is_none_or(allowed))
            .map(|h| (h.point.distance(point), h)),
        radii.handle,
    ) {
        return Some(hit);
    }

    let mut edge_hits = Vec::new();
    for (kind, _, shape) in scene.iter_painted() {
        if !kind.is_box() || !allowed(shape.id()) {
            continue;
        }
        let Some(rect) = shape.bounds() else { continue };
        for side in SIDES {
            let a = box_side_point(rect, side, 0.0);
            let b = box_side_point(rect, side, 1.0);
            let ab = b - a;
            let len_sq = ab.hypot2();
            let percent = if len_sq < f64::EPSILON {
                0.0
            } else {
                ((point - a).dot(ab) / len_sq).clamp(0.0, 1.0)
            };
            let on_edge = a + ab * percent;
            edge_hits.push((
                on_edge.distance(point),
                AnchorHandle {
                    anchor: Anchor::Shape {
                        kind,
                        shape_id: shape.id().clone(),
                        side,
                        percent: Some(percent),
                    },
                    point: on_edge,
                },
            ));
        }
    }
    if let Some(hit) = nearest(edge_hits.into_iter(), radii.edge) {
        return Some(hit);
    }

    let cardinals = scene
        .circles
        .iter()
        .filter(|circle| allowed(circle.id()))
        .flat_map(|circle| {
            SIDES.into_iter().map(move |side| {
                let p = circle_side_point(circle.as_rect(), side);
                (
                    p.distance(point),
                    AnchorHandle {
                        anchor: Anchor::shape(ShapeKind::Circle, circle.id().clone(), side),
                        point: p,
                    },
                )
            })
        });
    nearest(cardinals, radii.edge)
}
