//! Code block shape.

use super::text::{line_count, widest_line};
use super::{ShapeId, ShapeStyle, ShapeTrait};
use kurbo::{BezPath, Point, Rect, RoundedRect, Shape as KurboShape, Vec2};
use serde::{Deserialize, Serialize};

/// A monospace code block whose box fits its content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Code {
    pub(crate) id: ShapeId,
    pub x: f64,
    pub y: f64,
    #[serde(default)]
    pub(crate) width: f64,
    #[serde(default)]
    pub(crate) height: f64,
    pub(crate) code: String,
    #[serde(default)]
    pub language: String,
    pub(crate) font_size: f64,
    /// Style properties.
    #[serde(flatten)]
    pub style: ShapeStyle,
}

impl Code {
    pub const DEFAULT_FONT_SIZE: f64 = 14.0;
    /// Inner padding on every side.
    pub const PADDING: f64 = 12.0;
    pub const MIN_WIDTH: f64 = 120.0;
    /// Monospace advance as a fraction of the font size.
    const ADVANCE: f64 = 0.6;
    const LINE_HEIGHT: f64 = 1.4;
    const CORNER_RADIUS: f64 = 6.0;

    pub fn new(position: Point, code: impl Into<String>, language: impl Into<String>) -> Self {
        let mut shape = Self {
            id: ShapeId::new(),
            x: position.x,
            y: position.y,
            width: 0.0,
            height: 0.0,
            code: code.into(),
            language: language.into(),
            font_size: Self::DEFAULT_FONT_SIZE,
            style: ShapeStyle::default(),
        };
        shape.fit_to_content();
        shape
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn font_size(&self) -> f64 {
        self.font_size
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    pub fn set_code(&mut self, code: impl Into<String>) {
        self.code = code.into();
        self.fit_to_content();
    }

    pub fn set_font_size(&mut self, size: f64) {
        self.font_size = size.max(1.0);
        self.fit_to_content();
    }

    /// Height of one rendered line.
    pub fn line_height(&self) -> f64 {
        self.font_size * Self::LINE_HEIGHT
    }

    /// Recompute width and height from the code.
    pub fn fit_to_content(&mut self) {
        let text_width = widest_line(&self.code) as f64 * self.font_size * Self::ADVANCE;
        self.width = (text_width + 2.0 * Self::PADDING).max(Self::MIN_WIDTH);
        self.height = line_count(&self.code) as f64 * self.line_height() + 2.0 * Self::PADDING;
    }

    pub fn as_rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.x + self.width, self.y + self.height)
    }
}

impl ShapeTrait for Code {
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
        RoundedRect::from_rect(self.as_rect(), Self::CORNER_RADIUS).to_path(0.1)
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
