//! Ellipse shape with independent radii.

use super::{ShapeId, ShapeStyle, ShapeTrait};
use kurbo::{BezPath, Ellipse as KurboEllipse, Point, Rect, Shape as KurboShape, Vec2};
use serde::{Deserialize, Serialize};

/// An ellipse centered at (x, y).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Circle {
    pub(crate) id: ShapeId,
    /// Center x.
    pub x: f64,
    /// Center y.
    pub y: f64,
    /// Horizontal radius.
    pub rx: f64,
    /// Vertical radius.
    pub ry: f64,
    /// Style properties.
    #[serde(flatten)]
    pub style: ShapeStyle,
}

impl Circle {
    /// Create a new ellipse.
    pub fn new(center: Point, rx: f64, ry: f64) -> Self {
        Self {
            id: ShapeId::new(),
            x: center.x,
            y: center.y,
            rx,
            ry,
            style: ShapeStyle::default(),
        }
    }

    /// Create an ellipse inscribed in a bounding rectangle.
    pub fn from_rect(rect: Rect) -> Self {
        Self::new(rect.center(), rect.width() / 2.0, rect.height() / 2.0)
    }

    pub fn center(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// Bounding box `{x - rx, y - ry, 2rx, 2ry}`.
    pub fn as_rect(&self) -> Rect {
        let (rx, ry) = (self.rx.abs(), self.ry.abs());
        Rect::new(self.x - rx, self.y - ry, self.x + rx, self.y + ry)
    }

    /// Fit the ellipse to a bounding rectangle.
    pub fn set_rect(&mut self, rect: Rect) {
        let rect = rect.abs();
        let center = rect.center();
        self.x = center.x;
        self.y = center.y;
        self.rx = rect.width() / 2.0;
        self.ry = rect.height() / 2.0;
    }

    /// Make both radii non-negative.
    pub fn normalize(&mut self) {
        self.rx = self.rx.abs();
        self.ry = self.ry.abs();
    }

    /// The four cardinal points: top, bottom, left, right.
    pub fn cardinal_points(&self) -> [Point; 4] {
        let (rx, ry) = (self.rx.abs(), self.ry.abs());
        [
            Point::new(self.x, self.y - ry),
            Point::new(self.x, self.y + ry),
            Point::new(self.x - rx, self.y),
            Point::new(self.x + rx, self.y),
        ]
    }

    /// Get as a kurbo Ellipse.
    pub fn as_kurbo(&self) -> KurboEllipse {
        KurboEllipse::new(self.center(), (self.rx.abs(), self.ry.abs()), 0.0)
    }
}

impl ShapeTrait for Circle {
    fn id(&self) -> &ShapeId {
        &self.id
    }

    fn bounds(&self) -> Option<Rect> {
        Some(self.as_rect())
    }

    fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        let rx = self.rx.abs() + tolerance;
        let ry = self.ry.abs() + tolerance;
        if rx < f64::EPSILON || ry < f64::EPSILON {
            return false;
        }
        let dx = (point.x - self.x) / rx;
        let dy = (point.y - self.y) / ry;
        dx * dx + dy * dy <= 1.0
    }

    fn to_path(&self) -> BezPath {
        self.as_kurbo().to_path(0.1)
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
