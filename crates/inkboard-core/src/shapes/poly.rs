//! Parametric polygon shapes driven by a bounding box.

use super::{ShapeId, ShapeStyle, ShapeTrait, normalize_box};
use crate::geometry::distance_to_polyline;
use kurbo::{BezPath, Point, Rect, Shape as KurboShape, Vec2};
use serde::{Deserialize, Serialize};
use std::f64::consts::{FRAC_PI_2, FRAC_PI_8, PI};

/// Outline family of a [`Poly`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PolyType {
    #[default]
    Diamond,
    Triangle,
    Pentagon,
    Hexagon,
    Octagon,
    Star,
    Parallelogram,
}

impl PolyType {
    pub fn all() -> &'static [PolyType] {
        &[
            PolyType::Diamond,
            PolyType::Triangle,
            PolyType::Pentagon,
            PolyType::Hexagon,
            PolyType::Octagon,
            PolyType::Star,
            PolyType::Parallelogram,
        ]
    }

    /// Outline vertices in unit-box coordinates ([0, 1] on both axes).
    pub fn unit_vertices(self) -> Vec<(f64, f64)> {
        match self {
            PolyType::Diamond => vec![(0.5, 0.0), (1.0, 0.5), (0.5, 1.0), (0.0, 0.5)],
            PolyType::Triangle => vec![(0.5, 0.0), (1.0, 1.0), (0.0, 1.0)],
            PolyType::Parallelogram => vec![(0.25, 0.0), (1.0, 0.0), (0.75, 1.0), (0.0, 1.0)],
            PolyType::Pentagon => regular(5, -FRAC_PI_2),
            PolyType::Hexagon => regular(6, 0.0),
            PolyType::Octagon => regular(8, FRAC_PI_8),
            PolyType::Star => (0..10)
                .map(|i| {
                    let radius = if i % 2 == 0 { 0.5 } else { 0.2 };
                    let angle = -FRAC_PI_2 + i as f64 * PI / 5.0;
                    (0.5 + radius * angle.cos(), 0.5 + radius * angle.sin())
                })
                .collect(),
        }
    }
}

/// Vertices of a regular polygon inscribed in the unit box.
fn regular(sides: usize, start: f64) -> Vec<(f64, f64)> {
    (0..sides)
        .map(|i| {
            let angle = start + i as f64 * 2.0 * PI / sides as f64;
            (0.5 + 0.5 * angle.cos(), 0.5 + 0.5 * angle.sin())
        })
        .collect()
}

/// A polygon inscribed in an x/y/width/height box.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Poly {
    pub(crate) id: ShapeId,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    #[serde(rename = "type", default)]
    pub poly_type: PolyType,
    /// Style properties.
    #[serde(flatten)]
    pub style: ShapeStyle,
}

impl Poly {
    pub fn new(poly_type: PolyType, x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            id: ShapeId::new(),
            x,
            y,
            width,
            height,
            poly_type,
            style: ShapeStyle::default(),
        }
    }

    pub fn as_rect(&self) -> Rect {
        normalize_box(self.x, self.y, self.width, self.height)
    }

    pub fn set_rect(&mut self, rect: Rect) {
        self.x = rect.x0;
        self.y = rect.y0;
        self.width = rect.width();
        self.height = rect.height();
    }

    /// Outline vertices in world coordinates.
    pub fn vertices(&self) -> Vec<Point> {
        let rect = self.as_rect();
        self.poly_type
            .unit_vertices()
            .into_iter()
            .map(|(u, v)| Point::new(rect.x0 + u * rect.width(), rect.y0 + v * rect.height()))
            .collect()
    }
}

impl ShapeTrait for Poly {
    fn id(&self) -> &ShapeId {
        &self.id
    }

    fn bounds(&self) -> Option<Rect> {
        Some(self.as_rect())
    }

    fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        if self.to_path().winding(point) != 0 {
            return true;
        }
        let mut ring = self.vertices();
        if let Some(first) = ring.first().copied() {
            ring.push(first);
        }
        distance_to_polyline(point, &ring) <= tolerance
    }

    fn to_path(&self) -> BezPath {
        let mut path = BezPath::new();
        let vertices = self.vertices();
        if let Some((first, rest)) = vertices.split_first() {
            path.move_to(*first);
            for p in rest {
                path.line_to(*p);
            }
            path.close_path();
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
        self.x += delta.x;
        self.y += delta.y;
    }
}
