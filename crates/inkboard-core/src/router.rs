//! Orthogonal ("elbow") connector routing.
//!
//! A route leaves each endpoint along its anchor side, passes through a
//! stand-off point, and joins the two stand-off points with one of a fixed set
//! of candidate middle sections. Candidates are scored and the cheapest one
//! that stays clear of both endpoint boxes wins. No randomness is involved:
//! the same request always yields the same points.

use crate::shapes::AnchorSide;
use kurbo::{Point, Rect};

/// Distance from an endpoint to its stand-off point (screen pixels).
pub const STAND_OFF: f64 = 24.0;
/// Clearance kept by go-around routes outside the union of both boxes.
pub const DETOUR_MARGIN: f64 = 30.0;

const BEND_COST: f64 = 200.0;
const PREFERRED_BONUS: f64 = 100.0;
const ASYMMETRY_WEIGHT: f64 = 0.2;
const SINGLE_ELBOW_COST: f64 = 150.0;
const SHORT_SEGMENT: f64 = 15.0;
const SHORT_SEGMENT_COST: f64 = 500.0;
/// Boxes are shrunk by this much before the collision check so that
/// segments running along an edge do not count as crossing it.
const BLOCK_INSET: f64 = 1.0;
/// Consecutive points closer than this are merged.
const DUPLICATE_EPSILON: f64 = 0.5;
const ALIGN_EPSILON: f64 = 1e-6;

/// Everything the router needs about one connector.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteRequest {
    pub from: Point,
    pub to: Point,
    pub from_side: AnchorSide,
    pub to_side: AnchorSide,
    /// Box of the shape at the `from` end, if attached.
    pub from_box: Option<Rect>,
    /// Box of the shape at the `to` end, if attached.
    pub to_box: Option<Rect>,
    /// Current zoom; the stand-off distance is constant on screen.
    pub zoom: f64,
}

#[derive(Debug, Clone)]
struct Candidate {
    mids: Vec<Point>,
    preferred: bool,
}

impl Candidate {
    fn new(mids: Vec<Point>) -> Self {
        Self {
            mids,
            preferred: false,
        }
    }

    fn preferred(mids: Vec<Point>) -> Self {
        Self {
            mids,
            preferred: true,
        }
    }
}

/// Horizontal-first Z through the midpoint between the stand-off points.
fn mid_x_route(p1: Point, p3: Point) -> Vec<Point> {
    let mx = (p1.x + p3.x) / 2.0;
    vec![Point::new(mx, p1.y), Point::new(mx, p3.y)]
}

/// Vertical-first Z through the midpoint between the stand-off points.
fn mid_y_route(p1: Point, p3: Point) -> Vec<Point> {
    let my = (p1.y + p3.y) / 2.0;
    vec![Point::new(p1.x, my), Point::new(p3.x, my)]
}

/// Midpoint of the gap between two intervals, if they do not overlap.
fn gap_midpoint(a0: f64, a1: f64, b0: f64, b1: f64) -> Option<f64> {
    if a1 < b0 {
        Some((a1 + b0) / 2.0)
    } else if b1 < a0 {
        Some((b1 + a0) / 2.0)
    } else {
        None
    }
}

fn candidates(p1: Point, p3: Point, req: &RouteRequest) -> Vec<Candidate> {
    let mut out = Vec::new();

    if (p1.x - p3.x).abs() < ALIGN_EPSILON || (p1.y - p3.y).abs() < ALIGN_EPSILON {
        out.push(Candidate::new(Vec::new()));
    }

    out.push(Candidate::new(vec![Point::new(p3.x, p1.y)]));
    out.push(Candidate::new(vec![Point::new(p1.x, p3.y)]));

    out.push(Candidate::preferred(mid_x_route(p1, p3)));
    out.push(Candidate::preferred(mid_y_route(p1, p3)));

    if let (Some(a), Some(b)) = (req.from_box, req.to_box) {
        if let Some(gx) = gap_midpoint(a.x0, a.x1, b.x0, b.x1) {
            out.push(Candidate::preferred(vec![
                Point::new(gx, p1.y),
                Point::new(gx, p3.y),
            ]));
        }
        if let Some(gy) = gap_midpoint(a.y0, a.y1, b.y0, b.y1) {
            out.push(Candidate::preferred(vec![
                Point::new(p1.x, gy),
                Point::new(p3.x, gy),
            ]));
        }
    }

    let union = match (req.from_box, req.to_box) {
        (Some(a), Some(b)) => a.union(b),
        (Some(a), None) => a.union_pt(p3),
        (None, Some(b)) => b.union_pt(p1),
        (None, None) => Rect::from_points(p1, p3),
    }
    .inflate(DETOUR_MARGIN, DETOUR_MARGIN);
    out.push(Candidate::new(vec![
        Point::new(p1.x, union.y0),
        Point::new(p3.x, union.y0),
    ]));
    out.push(Candidate::new(vec![
        Point::new(p1.x, union.y1),
        Point::new(p3.x, union.y1),
    ]));
    out.push(Candidate::new(vec![
        Point::new(union.x0, p1.y),
        Point::new(union.x0, p3.y),
    ]));
    out.push(Candidate::new(vec![
        Point::new(union.x1, p1.y),
        Point::new(union.x1, p3.y),
    ]));

    out
}

/// Drop points that nearly coincide with their predecessor.
pub fn collapse_duplicates(points: &[Point]) -> Vec<Point> {
    let mut out: Vec<Point> = Vec::with_capacity(points.len());
    for p in points {
        if out.last().is_none_or(|last| last.distance(*p) >= DUPLICATE_EPSILON) {
            out.push(*p);
        }
    }
    out
}

fn path_length(points: &[Point]) -> f64 {
    points.windows(2).map(|w| w[0].distance(w[1])).sum()
}

/// Number of direction changes along a polyline.
pub fn count_bends(points: &[Point]) -> usize {
    let dirs: Vec<_> = points
        .windows(2)
        .filter_map(|w| {
            let v = w[1] - w[0];
            let len = v.hypot();
            (len > f64::EPSILON).then(|| v / len)
        })
        .collect();
    dirs.windows(2)
        .filter(|d| (d[0] - d[1]).hypot() > ALIGN_EPSILON)
        .count()
}

/// Whether the segment `a`-`b` passes through the interior of `rect`
/// (Liang-Barsky clipping).
pub fn segment_crosses_rect(a: Point, b: Point, rect: Rect) -> bool {
    if rect.width() <= 0.0 || rect.height() <= 0.0 {
        return false;
    }
    let d = b - a;
    let mut t0: f64 = 0.0;
    let mut t1: f64 = 1.0;
    let checks = [
        (-d.x, a.x - rect.x0),
        (d.x, rect.x1 - a.x),
        (-d.y, a.y - rect.y0),
        (d.y, rect.y1 - a.y),
    ];
    for (p, q) in checks {
        if p.abs() < f64::EPSILON {
            // Parallel to this edge: reject if outside (or on) it.
            if q <= 0.0 {
                return false;
            }
        } else {
            let r = q / p;
            if p < 0.0 {
                t0 = t0.max(r);
            } else {
                t1 = t1.min(r);
            }
            if t0 >= t1 {
                return false;
            }
        }
    }
    t0 < t1
}

fn blocked(points: &[Point], boxes: &[Rect]) -> bool {
    points.windows(2).any(|w| {
        boxes
            .iter()
            .any(|rect| segment_crosses_rect(w[0], w[1], *rect))
    })
}

fn score(candidate: &Candidate, full: &[Point], routed: &[Point], p1: Point, p3: Point) -> f64 {
    let mut score = path_length(full) + BEND_COST * count_bends(full) as f64;
    if candidate.preferred {
        score -= PREFERRED_BONUS;
    }
    if let [m0, m1] = candidate.mids.as_slice() {
        score += ASYMMETRY_WEIGHT * (p1.distance(*m0) - m1.distance(p3)).abs();
    }
    if candidate.mids.len() == 1 {
        score += SINGLE_ELBOW_COST;
    }
    let short = routed
        .windows(2)
        .filter(|w| w[0].distance(w[1]) < SHORT_SEGMENT)
        .count();
    score + SHORT_SEGMENT_COST * short as f64
}

fn assemble(p0: Point, p1: Point, mids: &[Point], p3: Point, p4: Point) -> Vec<Point> {
    let mut points = Vec::with_capacity(mids.len() + 4);
    points.push(p0);
    points.push(p1);
    points.extend_from_slice(mids);
    points.push(p3);
    points.push(p4);
    collapse_duplicates(&points)
}

/// Route a connector. Always returns at least the two endpoints.
pub fn route(req: &RouteRequest) -> Vec<Point> {
    let zoom = if req.zoom > 0.0 { req.zoom } else { 1.0 };
    let offset = STAND_OFF / zoom;
    let p0 = req.from;
    let p4 = req.to;
    let p1 = p0 + req.from_side.direction() * offset;
    let p3 = p4 + req.to_side.direction() * offset;

    // An endpoint with no side sits at its shape's center, so that shape
    // cannot be used as an obstacle.
    let boxes: Vec<Rect> = [
        (req.from_box, req.from_side),
        (req.to_box, req.to_side),
    ]
    .into_iter()
    .filter_map(|(rect, side)| match (rect, side) {
        (Some(rect), side) if side != AnchorSide::None => {
            Some(rect.inflate(-BLOCK_INSET, -BLOCK_INSET))
        }
        _ => None,
    })
    .collect();

    let mut best: Option<(f64, Vec<Point>)> = None;
    for candidate in candidates(p1, p3, req) {
        let full = assemble(p0, p1, &candidate.mids, p3, p4);
        if blocked(&full, &boxes) {
            continue;
        }
        let mut routed = vec![p1];
        routed.extend_from_slice(&candidate.mids);
        routed.push(p3);
        let routed = collapse_duplicates(&routed);
        let s = score(&candidate, &full, &routed, p1, p3);
        if best.as_ref().is_none_or(|(b, _)| s < *b) {
            best = Some((s, full));
        }
    }

    match best {
        Some((_, points)) => points,
        None => {
            log::trace!("every route blocked; using horizontal-first fallback");
            assemble(p0, p1, &mid_x_route(p1, p3), p3, p4)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(from_box: Rect, to_box: Rect, from_side: AnchorSide, to_side: AnchorSide) -> RouteRequest {
        let side_point = |r: Rect, s: AnchorSide| match s {
            AnchorSide::Top => Point::new(r.center().x, r.y0),
            AnchorSide::Bottom => Point::new(r.center().x, r.y1),
            AnchorSide::Left => Point::new(r.x0, r.center().y),
            AnchorSide::Right => Point::new(r.x1, r.center().y),
            AnchorSide::None => r.center(),
        };
        RouteRequest {
            from: side_point(from_box, from_side),
            to: side_point(to_box, to_side),
            from_side,
            to_side,
            from_box: Some(from_box),
            to_box: Some(to_box),
            zoom: 1.0,
        }
    }

    fn is_orthogonal(points: &[Point]) -> bool {
        points
            .windows(2)
            .all(|w| (w[0].x - w[1].x).abs() < 1e-9 || (w[0].y - w[1].y).abs() < 1e-9)
    }

    #[test]
    fn test_aligned_boxes_route_straight() {
        let req = request(
            Rect::new(0.0, 0.0, 100.0, 100.0),
            Rect::new(300.0, 0.0, 400.0, 100.0),
            AnchorSide::Right,
            AnchorSide::Left,
        );
        let points = route(&req);
        assert_eq!(points.first(), Some(&Point::new(100.0, 50.0)));
        assert_eq!(points.last(), Some(&Point::new(300.0, 50.0)));
        assert_eq!(count_bends(&points), 0);
    }

    #[test]
    fn test_offset_boxes_use_gap_z_route() {
        let req = request(
            Rect::new(0.0, 0.0, 100.0, 100.0),
            Rect::new(300.0, 200.0, 400.0, 300.0),
            AnchorSide::Right,
            AnchorSide::Left,
        );
        let points = route(&req);
        assert!(is_orthogonal(&points));
        assert_eq!(count_bends(&points), 2);
        // The vertical run sits in the middle of the horizontal gap.
        assert!(points.iter().any(|p| (p.x - 200.0).abs() < 1e-9));
    }

    #[test]
    fn test_route_is_deterministic() {
        let req = request(
            Rect::new(0.0, 0.0, 80.0, 60.0),
            Rect::new(150.0, 220.0, 260.0, 300.0),
            AnchorSide::Bottom,
            AnchorSide::Left,
        );
        let first = route(&req);
        for _ in 0..10 {
            assert_eq!(route(&req), first);
        }
    }

    #[test]
    fn test_facing_away_goes_around() {
        let a = Rect::new(0.0, 0.0, 100.0, 100.0);
        let b = Rect::new(300.0, 0.0, 400.0, 100.0);
        let req = request(a, b, AnchorSide::Left, AnchorSide::Right);
        let points = route(&req);
        let inner = [a.inflate(-1.0, -1.0), b.inflate(-1.0, -1.0)];
        assert!(!blocked(&points, &inner));
        assert!(is_orthogonal(&points));
    }

    #[test]
    fn test_stand_off_scales_with_zoom() {
        let mut req = request(
            Rect::new(0.0, 0.0, 100.0, 100.0),
            Rect::new(300.0, 200.0, 400.0, 300.0),
            AnchorSide::Right,
            AnchorSide::Left,
        );
        req.zoom = 2.0;
        let points = route(&req);
        assert_eq!(points[1], Point::new(112.0, 50.0));
    }

    #[test]
    fn test_floating_endpoints() {
        let req = RouteRequest {
            from: Point::new(0.0, 0.0),
            to: Point::new(100.0, 50.0),
            from_side: AnchorSide::None,
            to_side: AnchorSide::None,
            from_box: None,
            to_box: None,
            zoom: 1.0,
        };
        let points = route(&req);
        assert_eq!(points.first(), Some(&Point::new(0.0, 0.0)));
        assert_eq!(points.last(), Some(&Point::new(100.0, 50.0)));
        assert!(is_orthogonal(&points));
    }

    #[test]
    fn test_collapse_duplicates() {
        let pts = [
            Point::new(0.0, 0.0),
            Point::new(0.2, 0.0),
            Point::new(10.0, 0.0),
            Point::new(10.0, 0.1),
        ];
        assert_eq!(
            collapse_duplicates(&pts),
            vec![Point::new(0.0, 0.0), Point::new(10.0, 0.0)]
        );
    }

    #[test]
    fn test_segment_crosses_rect() {
        let rect = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert!(segment_crosses_rect(Point::new(-5.0, 5.0), Point::new(15.0, 5.0), rect));
        assert!(!segment_crosses_rect(Point::new(-5.0, 15.0), Point::new(15.0, 15.0), rect));
        // Running along an edge is not crossing.
        assert!(!segment_crosses_rect(Point::new(-5.0, 0.0), Point::new(15.0, 0.0), rect));
        assert!(!segment_crosses_rect(Point::new(10.0, 5.0), Point::new(20.0, 5.0), rect));
    }
}
