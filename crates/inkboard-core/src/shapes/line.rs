//! Straight segment shape, shared by the `lines` and `arrows` collections.

use super::{ShapeId, ShapeStyle, ShapeTrait};
use crate::geometry::distance_to_segment;
use kurbo::{BezPath, Point, Rect, Vec2};
use serde::{Deserialize, Serialize};

/// A straight segment from (x1, y1) to (x2, y2).
///
/// Arrows use the same data; the renderer adds a head at (x2, y2).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Line {
    pub(crate) id: ShapeId,
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
    /// Style properties.
    #[serde(flatten)]
    pub style: ShapeStyle,
}

impl Line {
    /// Create a new segment.
    pub fn new(start: Point, end: Point) -> Self {
        Self {
            id: ShapeId::new(),
            x1: start.x,
            y1: start.y,
            x2: end.x,
            y2: end.y,
            style: ShapeStyle::default(),
        }
    }

    pub fn start(&self) -> Point {
        Point::new(self.x1, self.y1)
    }

    pub fn end(&self) -> Point {
        Point::new(self.x2, self.y2)
    }

    /// Set one endpoint (0 = start, anything else = end).
    pub fn set_endpoint(&mut self, index: usize, point: Point) {
        if index == 0 {
            self.x1 = point.x;
            self.y1 = point.y;
        } else {
            self.x2 = point.x;
            self.y2 = point.y;
        }
    }

    /// Get the length of the segment.
    pub fn length(&self) -> f64 {
        self.start().distance(self.end())
    }
}

impl ShapeTrait for Line {
    fn id(&self) -> &ShapeId {
        &self.id
    }

    fn bounds(&self) -> Option<Rect> {
        Some(Rect::from_points(self.start(), self.end()))
    }

    fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        distance_to_segment(point, self.start(), self.end())
            <= tolerance + self.style.stroke_width / 2.0
    }

    fn to_path(&self) -> BezPath {
        let mut path = BezPath::new();
        path.move_to(self.start());
        path.line_to(self.end());
        path
    }

    fn style(&self) -> &ShapeStyle {
        &self.style
    }

    fn style_mut(&mut self) -> &mut ShapeStyle {
        &mut self.style
    }

    fn translate(&mut self, delta: Vec2) {
        self.x1 += delta.x;
        self.y1 += delta.y;
        self.x2 += delta.x;
        self.y2 += delta.y;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_hit_test() {
        let line = Line::new(Point::new(0.0, 0.0), Point::new(100.0, 0.0));
        assert!(line.hit_test(Point::new(50.0, 3.0), 2.0));
        assert!(!line.hit_test(Point::new(50.0, 10.0), 2.0));
        assert!(!line.hit_test(Point::new(120.0, 0.0), 2.0));
    }

    #[test]
    fn test_bounds_from_reversed_points() {
        let line = Line::new(Point::new(100.0, 80.0), Point::new(10.0, 20.0));
        let bounds = line.bounds().unwrap();
        assert!((bounds.x0 - 10.0).abs() < f64::EPSILON);
        assert!((bounds.y1 - 80.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_set_endpoint() {
        let mut line = Line::new(Point::ZERO, Point::new(10.0, 10.0));
        line.set_endpoint(1, Point::new(30.0, 40.0));
        assert!((line.length() - 50.0).abs() < 1e-10);
    }
}
