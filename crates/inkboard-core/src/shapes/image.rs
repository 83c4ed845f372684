//! Image shape referencing an external raster resource.

use super::{ShapeId, ShapeStyle, ShapeTrait, normalize_box};
use kurbo::{BezPath, Point, Rect, Shape as KurboShape, Vec2};
use serde::{Deserialize, Serialize};

/// An image placed on the canvas.
///
/// Pixels are never stored in the scene: `src` is a URI resolved by the
/// renderer's image cache.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Image {
    pub(crate) id: ShapeId,
    /// Resource URI.
    pub src: String,
    /// Left edge.
    pub x: f64,
    /// Top edge.
    pub y: f64,
    /// Display width.
    pub width: f64,
    /// Display height.
    pub height: f64,
    /// Style properties (stroke used for optional border).
    #[serde(flatten)]
    pub style: ShapeStyle,
}

impl Image {
    /// Create an image shape with the given display box.
    pub fn new(src: impl Into<String>, x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            id: ShapeId::new(),
            src: src.into(),
            x,
            y,
            width,
            height,
            style: ShapeStyle::default(),
        }
    }

    /// Scale a natural size to fit within max dimensions while preserving aspect ratio.
    ///
    /// The box keeps its top-left corner.
    pub fn fit_within(mut self, natural: (f64, f64), max_width: f64, max_height: f64) -> Self {
        let (nw, nh) = natural;
        if nw <= 0.0 || nh <= 0.0 {
            self.width = max_width;
            self.height = max_height;
            return self;
        }
        let aspect = nw / nh;
        if aspect > max_width / max_height {
            // Wider than target: fit to width
            self.width = max_width;
            self.height = max_width / aspect;
        } else {
            self.height = max_height;
            self.width = max_height * aspect;
        }
        self
    }

    /// Get the bounding rectangle.
    pub fn as_rect(&self) -> Rect {
        normalize_box(self.x, self.y, self.width, self.height)
    }

    pub fn set_rect(&mut self, rect: Rect) {
        self.x = rect.x0;
        self.y = rect.y0;
        self.width = rect.width();
        self.height = rect.height();
    }
}

impl ShapeTrait for Image {
    fn id(&self) -> &ShapeId {
        &self.id
    }

    fn bounds(&self) -> Option<Rect> {
        Some(self.as_rect())
    }

    fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        self.as_rect().inflate(tolerance, tolerance).contains(point)
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
    fn test_fit_within() {
        let img = Image::new("a.png", 0.0, 0.0, 0.0, 0.0);
        // 2:1 into a square box
        let fitted = img.fit_within((1000.0, 500.0), 400.0, 400.0);
        assert!((fitted.width - 400.0).abs() < 0.01);
        assert!((fitted.height - 200.0).abs() < 0.01);
    }

    #[test]
    fn test_fit_within_unknown_size() {
        let img = Image::new("a.png", 0.0, 0.0, 0.0, 0.0).fit_within((0.0, 0.0), 120.0, 90.0);
        assert!((img.width - 120.0).abs() < f64::EPSILON);
        assert!((img.height - 90.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_bounds() {
        let img = Image::new("a.png", 10.0, 20.0, 100.0, 50.0);
        let bounds = img.bounds().unwrap();
        assert!((bounds.x0 - 10.0).abs() < f64::EPSILON);
        assert!((bounds.y0 - 20.0).abs() < f64::EPSILON);
        assert!((bounds.x1 - 110.0).abs() < f64::EPSILON);
        assert!((bounds.y1 - 70.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_src_serialized() {
        let img = Image::new("https://example.com/cat.png", 0.0, 0.0, 1.0, 1.0);
        let json = serde_json::to_value(&img).unwrap();
        assert_eq!(json["src"], "https://example.com/cat.png");
    }
}
