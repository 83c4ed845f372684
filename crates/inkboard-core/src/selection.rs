//! Selection handles and the resize/move math behind them.

use crate::shapes::{Shape, normalize_box};
use kurbo::{Point, Rect, Vec2};

/// Handle size in screen pixels.
pub const HANDLE_SIZE: f64 = 10.0;

/// Type of selection handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HandleKind {
    /// Endpoint handle for lines/arrows (index 0 = start, 1 = end).
    Endpoint(usize),
    /// Endpoint of a connector (0 = from, 1 = to); dragging it re-anchors.
    ConnectorEnd(usize),
    /// Corner handle for box shapes.
    Corner(Corner),
    /// Edge midpoint handle for box shapes.
    Edge(Edge),
}

/// Corner positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Corner {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

/// Edge positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Edge {
    Top,
    Right,
    Bottom,
    Left,
}

impl Edge {
    /// Left and right edges resize horizontally only.
    pub fn is_horizontal(self) -> bool {
        matches!(self, Edge::Left | Edge::Right)
    }
}

/// A selection handle with its position and type.
#[derive(Debug, Clone, Copy)]
pub struct Handle {
    /// Position in world coordinates.
    pub position: Point,
    pub kind: HandleKind,
}

impl Handle {
    pub fn new(position: Point, kind: HandleKind) -> Self {
        Self { position, kind }
    }

    /// Check if a point (in world coordinates) hits this handle.
    /// `tolerance` should be adjusted for camera zoom.
    pub fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        self.position.distance(point) <= tolerance
    }
}

/// The eight resize handles of a box: corners first, then edge midpoints.
pub fn box_handles(bounds: Rect) -> Vec<Handle> {
    let c = bounds.center();
    vec![
        Handle::new(Point::new(bounds.x0, bounds.y0), HandleKind::Corner(Corner::TopLeft)),
        Handle::new(Point::new(bounds.x1, bounds.y0), HandleKind::Corner(Corner::TopRight)),
        Handle::new(Point::new(bounds.x0, bounds.y1), HandleKind::Corner(Corner::BottomLeft)),
        Handle::new(Point::new(bounds.x1, bounds.y1), HandleKind::Corner(Corner::BottomRight)),
        Handle::new(Point::new(c.x, bounds.y0), HandleKind::Edge(Edge::Top)),
        Handle::new(Point::new(bounds.x1, c.y), HandleKind::Edge(Edge::Right)),
        Handle::new(Point::new(c.x, bounds.y1), HandleKind::Edge(Edge::Bottom)),
        Handle::new(Point::new(bounds.x0, c.y), HandleKind::Edge(Edge::Left)),
    ]
}

/// Get the selection handles for a shape.
///
/// Connector handles depend on the routed path; see [`connector_handles`].
pub fn get_handles(shape: &Shape) -> Vec<Handle> {
    match shape {
        Shape::Line(line) | Shape::Arrow(line) => vec![
            Handle::new(line.start(), HandleKind::Endpoint(0)),
            Handle::new(line.end(), HandleKind::Endpoint(1)),
        ],
        _ => shape.resize_box().map(box_handles).unwrap_or_default(),
    }
}

/// Handles at both ends of a routed connector.
pub fn connector_handles(route: &[Point]) -> Vec<Handle> {
    match (route.first(), route.last()) {
        (Some(first), Some(last)) => vec![
            Handle::new(*first, HandleKind::ConnectorEnd(0)),
            Handle::new(*last, HandleKind::ConnectorEnd(1)),
        ],
        _ => Vec::new(),
    }
}

/// Find which handle (if any) is hit at the given point.
pub fn hit_test_handles(handles: &[Handle], point: Point, tolerance: f64) -> Option<HandleKind> {
    handles
        .iter()
        .find(|handle| handle.hit_test(point, tolerance))
        .map(|handle| handle.kind)
}

/// Resize a box by dragging one of its handles by `delta`.
///
/// Corners keep the opposite corner fixed; with `square` the result takes the
/// larger side on both axes, growing away from the fixed corner. Edges move a
/// single side. The result is normalized.
pub fn resize_box(original: Rect, handle: HandleKind, delta: Vec2, square: bool) -> Rect {
    let Rect { x0, y0, x1, y1 } = original;
    match handle {
        HandleKind::Corner(corner) => {
            let (fixed, moved) = match corner {
                Corner::TopLeft => (Point::new(x1, y1), Point::new(x0, y0)),
                Corner::TopRight => (Point::new(x0, y1), Point::new(x1, y0)),
                Corner::BottomLeft => (Point::new(x1, y0), Point::new(x0, y1)),
                Corner::BottomRight => (Point::new(x0, y0), Point::new(x1, y1)),
            };
            let moved = moved + delta;
            if square {
                let w = moved.x - fixed.x;
                let h = moved.y - fixed.y;
                let side = w.abs().max(h.abs());
                let sx = if w < 0.0 { -side } else { side };
                let sy = if h < 0.0 { -side } else { side };
                normalize_box(fixed.x, fixed.y, sx, sy)
            } else {
                Rect::from_points(fixed, moved)
            }
        }
        HandleKind::Edge(edge) => {
            let (x0, y0, x1, y1) = match edge {
                Edge::Top => (x0, y0 + delta.y, x1, y1),
                Edge::Bottom => (x0, y0, x1, y1 + delta.y),
                Edge::Left => (x0 + delta.x, y0, x1, y1),
                Edge::Right => (x0, y0, x1 + delta.x, y1),
            };
            Rect::new(x0, y0, x1, y1).abs()
        }
        HandleKind::Endpoint(_) | HandleKind::ConnectorEnd(_) => original,
    }
}

/// Apply a handle manipulation to a copy of `shape`.
///
/// `handle` of `None` moves the whole shape. `constrain` is the Shift
/// modifier: square corner resizes, axis-locked endpoint drags.
pub fn apply_manipulation(shape: &Shape, handle: Option<HandleKind>, delta: Vec2, constrain: bool) -> Shape {
    let mut shape = shape.clone();
    match handle {
        None => shape.translate(delta),
        Some(HandleKind::Endpoint(index)) => {
            if let Shape::Line(line) | Shape::Arrow(line) = &mut shape {
                let (moving, other) = if index == 0 {
                    (line.start(), line.end())
                } else {
                    (line.end(), line.start())
                };
                let mut target = moving + delta;
                if constrain {
                    target = constrain_to_axis(other, target);
                }
                line.set_endpoint(index, target);
            }
        }
        Some(kind @ (HandleKind::Corner(_) | HandleKind::Edge(_))) => {
            if let Some(original) = shape.resize_box() {
                shape.set_resize_box(resize_box(original, kind, delta, constrain));
            }
        }
        Some(HandleKind::ConnectorEnd(_)) => {}
    }
    shape
}

/// Snap `point` so the segment from `origin` is horizontal or vertical,
/// whichever is closer.
pub fn constrain_to_axis(origin: Point, point: Point) -> Point {
    if (point.x - origin.x).abs() >= (point.y - origin.y).abs() {
        Point::new(point.x, origin.y)
    } else {
        Point::new(origin.x, point.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shapes::{Circle, Line, Path, Rectangle};

    #[test]
    fn test_line_handles() {
        let line = Line::new(Point::new(0.0, 0.0), Point::new(100.0, 100.0));
        let handles = get_handles(&Shape::Line(line));
        assert_eq!(handles.len(), 2);
        assert!(matches!(handles[0].kind, HandleKind::Endpoint(0)));
        assert!(matches!(handles[1].kind, HandleKind::Endpoint(1)));
    }

    #[test]
    fn test_rectangle_handles() {
        let rect = Rectangle::new(0.0, 0.0, 100.0, 50.0);
        let handles = get_handles(&Shape::Rect(rect));
        assert_eq!(handles.len(), 8);
        assert!(matches!(handles[0].kind, HandleKind::Corner(Corner::TopLeft)));
        assert_eq!(handles[5].position, Point::new(100.0, 25.0));
    }

    #[test]
    fn test_path_has_no_handles() {
        let path = Path::from_points(vec![Point::ZERO, Point::new(5.0, 5.0)]);
        assert!(get_handles(&Shape::Path(path)).is_empty());
    }

    #[test]
    fn test_handle_hit_test() {
        let handle = Handle::new(Point::new(50.0, 50.0), HandleKind::Endpoint(0));
        assert!(handle.hit_test(Point::new(50.0, 50.0), 10.0));
        assert!(handle.hit_test(Point::new(55.0, 55.0), 10.0));
        assert!(!handle.hit_test(Point::new(70.0, 70.0), 10.0));
    }

    #[test]
    fn test_apply_endpoint_manipulation() {
        let line = Line::new(Point::new(0.0, 0.0), Point::new(100.0, 100.0));
        let result = apply_manipulation(
            &Shape::Line(line),
            Some(HandleKind::Endpoint(1)),
            Vec2::new(10.0, 20.0),
            false,
        );
        let Shape::Line(line) = result else {
            panic!("Expected Line shape");
        };
        assert!((line.x2 - 110.0).abs() < f64::EPSILON);
        assert!((line.y2 - 120.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_corner_resize_keeps_opposite_corner() {
        let rect = Rectangle::new(0.0, 0.0, 100.0, 100.0);
        let result = apply_manipulation(
            &Shape::Rect(rect),
            Some(HandleKind::Corner(Corner::TopLeft)),
            Vec2::new(30.0, 10.0),
            false,
        );
        assert_eq!(result.resize_box(), Some(Rect::new(30.0, 10.0, 100.0, 100.0)));
    }

    #[test]
    fn test_corner_resize_past_opposite_corner_normalizes() {
        let original = Rect::new(0.0, 0.0, 100.0, 100.0);
        let r = resize_box(original, HandleKind::Corner(Corner::BottomRight), Vec2::new(-150.0, -120.0), false);
        assert_eq!(r, Rect::new(-50.0, -20.0, 0.0, 0.0));
    }

    #[test]
    fn test_square_corner_resize_on_circle() {
        let circle = Circle::new(Point::new(50.0, 30.0), 50.0, 30.0);
        let result = apply_manipulation(
            &Shape::Circle(circle),
            Some(HandleKind::Corner(Corner::BottomRight)),
            Vec2::new(20.0, 20.0),
            true,
        );
        let Shape::Circle(circle) = result else {
            panic!("Expected Circle shape");
        };
        assert!((circle.rx - circle.ry).abs() < f64::EPSILON);
        assert!((circle.rx - 60.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_edge_resize_single_axis() {
        let original = Rect::new(0.0, 0.0, 100.0, 50.0);
        let r = resize_box(original, HandleKind::Edge(Edge::Right), Vec2::new(25.0, 40.0), false);
        assert_eq!(r, Rect::new(0.0, 0.0, 125.0, 50.0));
        let r = resize_box(original, HandleKind::Edge(Edge::Top), Vec2::new(25.0, 10.0), false);
        assert_eq!(r, Rect::new(0.0, 10.0, 100.0, 50.0));
    }

    #[test]
    fn test_move() {
        let rect = Rectangle::new(10.0, 10.0, 5.0, 5.0);
        let moved = apply_manipulation(&Shape::Rect(rect), None, Vec2::new(1.0, 2.0), false);
        assert_eq!(moved.resize_box(), Some(Rect::new(11.0, 12.0, 16.0, 17.0)));
    }
}
