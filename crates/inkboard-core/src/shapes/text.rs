//! Text shape.

use super::{ShapeId, ShapeStyle, ShapeTrait};
use kurbo::{BezPath, Point, Rect, Shape as KurboShape, Vec2};
use serde::{Deserialize, Serialize};

/// Font family options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontFamily {
    /// Hand-drawn style font (default).
    #[default]
    Hand,
    /// Clean sans-serif font.
    Sans,
    Serif,
    Mono,
}

impl FontFamily {
    /// Get the font family name as used by the renderer.
    pub fn name(&self) -> &'static str {
        match self {
            FontFamily::Hand => "Virgil",
            FontFamily::Sans => "Noto Sans",
            FontFamily::Serif => "Noto Serif",
            FontFamily::Mono => "Fira Code",
        }
    }

    /// Average advance of one character, as a fraction of the font size.
    ///
    /// Empirical approximations; actual width depends on the font.
    pub fn advance_factor(&self) -> f64 {
        match self {
            FontFamily::Hand => 0.55,
            FontFamily::Sans => 0.52,
            FontFamily::Serif => 0.58,
            FontFamily::Mono => 0.6,
        }
    }

    /// Get all available font families.
    pub fn all() -> &'static [FontFamily] {
        &[
            FontFamily::Hand,
            FontFamily::Sans,
            FontFamily::Serif,
            FontFamily::Mono,
        ]
    }
}

/// Horizontal alignment of lines inside the text box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    #[default]
    Left,
    Center,
    Right,
}

/// Line height as a multiple of the font size.
pub(crate) const LINE_HEIGHT: f64 = 1.2;

/// Count lines the way the text box lays them out: empty content is one line,
/// and a trailing newline opens another.
pub(crate) fn line_count(content: &str) -> usize {
    let count = content.lines().count().max(1);
    if content.ends_with('\n') { count + 1 } else { count }
}

/// Character count of the widest line.
pub(crate) fn widest_line(content: &str) -> usize {
    content
        .lines()
        .map(|line| line.chars().count())
        .max()
        .unwrap_or(0)
}

/// A block of text anchored at its top-left corner.
///
/// `width`/`height` are measured from the content and are recomputed whenever
/// the text, font size or font family changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Text {
    pub(crate) id: ShapeId,
    pub x: f64,
    pub y: f64,
    /// The text content.
    pub(crate) text: String,
    /// Font size in world units.
    pub(crate) font_size: f64,
    #[serde(default)]
    pub(crate) width: f64,
    #[serde(default)]
    pub(crate) height: f64,
    #[serde(default)]
    pub(crate) font_family: FontFamily,
    #[serde(default)]
    pub text_align: TextAlign,
    /// Style properties.
    #[serde(flatten)]
    pub style: ShapeStyle,
}

impl Text {
    /// Default font size.
    pub const DEFAULT_FONT_SIZE: f64 = 20.0;
    /// Narrowest box reported for short or empty text.
    pub const MIN_WIDTH: f64 = 20.0;

    /// Create a new text shape.
    pub fn new(position: Point, text: impl Into<String>) -> Self {
        let mut shape = Self {
            id: ShapeId::new(),
            x: position.x,
            y: position.y,
            text: text.into(),
            font_size: Self::DEFAULT_FONT_SIZE,
            width: 0.0,
            height: 0.0,
            font_family: FontFamily::default(),
            text_align: TextAlign::default(),
            style: ShapeStyle::default(),
        };
        shape.measure();
        shape
    }

    /// Set the font size.
    pub fn with_font_size(mut self, size: f64) -> Self {
        self.set_font_size(size);
        self
    }

    /// Set the font family.
    pub fn with_font_family(mut self, family: FontFamily) -> Self {
        self.set_font_family(family);
        self
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn font_size(&self) -> f64 {
        self.font_size
    }

    pub fn font_family(&self) -> FontFamily {
        self.font_family
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    /// Height of one rendered line.
    pub fn line_height(&self) -> f64 {
        self.font_size * LINE_HEIGHT
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
        self.measure();
    }

    pub fn set_font_size(&mut self, size: f64) {
        self.font_size = size.max(1.0);
        self.measure();
    }

    pub fn set_font_family(&mut self, family: FontFamily) {
        self.font_family = family;
        self.measure();
    }

    /// Recompute width and height from the content.
    pub fn measure(&mut self) {
        let advance = self.font_size * self.font_family.advance_factor();
        self.width = (widest_line(&self.text) as f64 * advance).max(Self::MIN_WIDTH);
        self.height = line_count(&self.text) as f64 * self.line_height();
    }

    /// The measured box.
    pub fn as_rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.x + self.width, self.y + self.height)
    }
}

impl ShapeTrait for Text {
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
        // Text has no outline; the box stands in for selection rendering.
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
