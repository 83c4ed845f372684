//! Freehand path shape.

use super::{ShapeId, ShapeStyle, ShapeTrait};
use crate::geometry::distance_to_polyline;
use kurbo::{BezPath, Point, Rect, Vec2};
use serde::{Deserialize, Serialize};

/// A freehand stroke: an ordered list of points.
///
/// Points are appended while drawing; once committed the list is not edited
/// point-by-point (only moved as a whole).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Path {
    pub(crate) id: ShapeId,
    /// Points in the stroke.
    pub points: Vec<Point>,
    /// Style properties.
    #[serde(flatten)]
    pub style: ShapeStyle,
}

impl Path {
    /// Start a stroke at a point.
    pub fn starting_at(point: Point) -> Self {
        Self::from_points(vec![point])
    }

    /// Create from existing points.
    pub fn from_points(points: Vec<Point>) -> Self {
        Self {
            id: ShapeId::new(),
            points,
            style: ShapeStyle::default(),
        }
    }

    /// Append a point while drawing.
    ///
    /// With `constrain`, the new segment is snapped to horizontal or vertical
    /// relative to the previous point, whichever is closer.
    pub fn push_point(&mut self, point: Point, constrain: bool) {
        let point = match (constrain, self.points.last()) {
            (true, Some(prev)) => {
                if (point.x - prev.x).abs() >= (point.y - prev.y).abs() {
                    Point::new(point.x, prev.y)
                } else {
                    Point::new(prev.x, point.y)
                }
            }
            _ => point,
        };
        self.points.push(point);
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Distance from a point to the stroke's center line.
    pub fn distance_to(&self, point: Point) -> f64 {
        match self.points.as_slice() {
            [] => f64::INFINITY,
            [only] => only.distance(point),
            points => distance_to_polyline(point, points),
        }
    }
}

impl ShapeTrait for Path {
    fn id(&self) -> &ShapeId {
        &self.id
    }

    fn bounds(&self) -> Option<Rect> {
        let first = self.points.first()?;
        let init = Rect::from_points(*first, *first);
        Some(self.points.iter().fold(init, |acc, p| acc.union_pt(*p)))
    }

    fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        self.distance_to(point) <= tolerance + self.style.stroke_width / 2.0
    }

    fn to_path(&self) -> BezPath {
        let mut path = BezPath::new();
        if let Some((first, rest)) = self.points.split_first() {
            path.move_to(*first);
            for p in rest {
                path.line_to(*p);
            }
        }
        path
    }

    fn style(&self) -> &ShapeStyle {
        &self.style
    }

    fn style_mut(&mut self) -> &mut ShapeStyle {
        &mut self.style
    }

    fn translate(&mut self, delta: Vec2) {
        for point in &mut self.points {
            *point += delta;
        }
    }
}
