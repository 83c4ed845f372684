//! Numbered frame shape.

use super::{ShapeId, ShapeStyle, ShapeTrait, normalize_box};
use kurbo::{BezPath, Point, Rect, Shape as KurboShape, Vec2};
use serde::{Deserialize, Serialize};

/// Hit-test a box outline: within `tolerance` of any edge.
pub(crate) fn hits_border(rect: Rect, point: Point, tolerance: f64) -> bool {
    let outer = rect.inflate(tolerance, tolerance);
    let inner = rect.inflate(-tolerance, -tolerance);
    outer.contains(point) && !(inner.width() > 0.0 && inner.height() > 0.0 && inner.contains(point))
}

/// A frame: an outlined region labelled "Frame N" above its top-left corner.
///
/// Only the border and the label hit, so shapes placed inside stay reachable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Frame {
    pub(crate) id: ShapeId,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    /// 1-based ordinal shown in the label.
    pub frame_number: u32,
    /// Style properties.
    #[serde(flatten)]
    pub style: ShapeStyle,
}

impl Frame {
    /// Height of the label strip drawn above the top edge.
    pub const LABEL_HEIGHT: f64 = 20.0;
    pub const LABEL_FONT_SIZE: f64 = 13.0;

    pub fn new(x: f64, y: f64, width: f64, height: f64, frame_number: u32) -> Self {
        Self {
            id: ShapeId::new(),
            x,
            y,
            width,
            height,
            frame_number,
            style: ShapeStyle::default(),
        }
    }

    pub fn label(&self) -> String {
        format!("Frame {}", self.frame_number)
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

    /// Region occupied by the label.
    pub fn label_rect(&self) -> Rect {
        let rect = self.as_rect();
        let label_width = self.label().chars().count() as f64 * Self::LABEL_FONT_SIZE * 0.6;
        Rect::new(rect.x0, rect.y0 - Self::LABEL_HEIGHT, rect.x0 + label_width, rect.y0)
    }
}

impl ShapeTrait for Frame {
    fn id(&self) -> &ShapeId {
        &self.id
    }

    fn bounds(&self) -> Option<Rect> {
        Some(self.as_rect())
    }

    fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        hits_border(self.as_rect(), point, tolerance)
            || self.label_rect().inflate(tolerance, tolerance).contains(point)
    }

    fn to_path(&self) -> BezPath {
        self.as_rect().to_path(0.1)
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hits_border_and_label_only() {
        let frame = Frame::new(0.0, 0.0, 200.0, 100.0, 1);
        assert!(frame.hit_test(Point::new(0.0, 50.0), 4.0));
        assert!(frame.hit_test(Point::new(198.0, 50.0), 4.0));
        assert!(!frame.hit_test(Point::new(100.0, 50.0), 4.0));
        assert!(frame.hit_test(Point::new(10.0, -10.0), 0.0));
    }

    #[test]
    fn test_label() {
        assert_eq!(Frame::new(0.0, 0.0, 1.0, 1.0, 3).label(), "Frame 3");
    }

    #[test]
    fn test_tiny_frame_hits_everywhere() {
        let frame = Frame::new(0.0, 0.0, 4.0, 4.0, 1);
        assert!(frame.hit_test(Point::new(2.0, 2.0), 3.0));
    }
}
