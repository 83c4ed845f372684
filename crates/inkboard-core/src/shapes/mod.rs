//! Shape definitions for the canvas.

mod circle;
mod code;
mod connector;
mod figure;
mod frame;
mod image;
mod line;
mod path;
mod poly;
mod rectangle;
mod text;

pub use circle::Circle;
pub use code::Code;
pub use connector::{Anchor, AnchorSide, Connector};
pub use figure::Figure;
pub use frame::Frame;
pub use image::Image;
pub use line::Line;
pub use path::Path;
pub use poly::{Poly, PolyType};
pub use rectangle::Rectangle;
pub use text::{FontFamily, Text, TextAlign};

use kurbo::{BezPath, Point, Rect, Vec2};
use peniko::Color;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Serializable color representation (RGBA8).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SerializableColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl SerializableColor {
    pub fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub fn black() -> Self {
        Self::new(0, 0, 0, 255)
    }

    pub fn white() -> Self {
        Self::new(255, 255, 255, 255)
    }

    pub fn transparent() -> Self {
        Self::new(0, 0, 0, 0)
    }
}

impl From<Color> for SerializableColor {
    fn from(color: Color) -> Self {
        let rgba = color.to_rgba8();
        Self {
            r: rgba.r,
            g: rgba.g,
            b: rgba.b,
            a: rgba.a,
        }
    }
}

impl From<SerializableColor> for Color {
    fn from(color: SerializableColor) -> Self {
        Color::from_rgba8(color.r, color.g, color.b, color.a)
    }
}

/// Style properties shared by every shape.
///
/// `fill`/`stroke` of `None` mean "follow the theme": the renderer picks the
/// foreground color of the active theme for strokes and leaves fills empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ShapeStyle {
    /// Fill color.
    pub fill: Option<SerializableColor>,
    /// Stroke color.
    pub stroke: Option<SerializableColor>,
    /// Overall opacity in [0, 1].
    pub opacity: f64,
    /// Dash pattern for the stroke (None = solid).
    pub stroke_dash_array: Option<Vec<f64>>,
    /// Stroke width in world units.
    pub stroke_width: f64,
}

impl Default for ShapeStyle {
    fn default() -> Self {
        Self {
            fill: None,
            stroke: None,
            opacity: 1.0,
            stroke_dash_array: None,
            stroke_width: 2.0,
        }
    }
}

impl ShapeStyle {
    /// Set the opacity, clamped to [0, 1].
    pub fn set_opacity(&mut self, opacity: f64) {
        self.opacity = if opacity.is_nan() { 1.0 } else { opacity.clamp(0.0, 1.0) };
    }

    /// Clamp fields that may arrive out of range from a host snapshot.
    pub fn sanitize(&mut self) {
        self.set_opacity(self.opacity);
        if !self.stroke_width.is_finite() || self.stroke_width < 0.0 {
            self.stroke_width = 0.0;
        }
    }

    /// Apply opacity to a color.
    pub fn with_opacity(&self, color: SerializableColor) -> Color {
        let alpha = (color.a as f64 * self.opacity).round() as u8;
        Color::from_rgba8(color.r, color.g, color.b, alpha)
    }
}

/// Unique identifier for shapes.
///
/// Generated from a v4 UUID at creation; any string is accepted when a
/// snapshot is loaded.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ShapeId(String);

impl ShapeId {
    /// Generate a fresh identifier.
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for ShapeId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<&str> for ShapeId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl fmt::Display for ShapeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The kind of a shape, which is also the name of its collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeKind {
    Image,
    Rect,
    Circle,
    Poly,
    Line,
    Arrow,
    Connector,
    Path,
    Text,
    Frame,
    Figure,
    Code,
}

/// Fixed back-to-front paint order. Hit-testing walks it in reverse.
pub const PAINT_ORDER: [ShapeKind; 12] = [
    ShapeKind::Image,
    ShapeKind::Rect,
    ShapeKind::Circle,
    ShapeKind::Poly,
    ShapeKind::Line,
    ShapeKind::Arrow,
    ShapeKind::Connector,
    ShapeKind::Path,
    ShapeKind::Text,
    ShapeKind::Frame,
    ShapeKind::Figure,
    ShapeKind::Code,
];

impl ShapeKind {
    /// Name used in snapshots and anchors.
    pub fn name(self) -> &'static str {
        match self {
            ShapeKind::Image => "image",
            ShapeKind::Rect => "rect",
            ShapeKind::Circle => "circle",
            ShapeKind::Poly => "poly",
            ShapeKind::Line => "line",
            ShapeKind::Arrow => "arrow",
            ShapeKind::Connector => "connector",
            ShapeKind::Path => "path",
            ShapeKind::Text => "text",
            ShapeKind::Frame => "frame",
            ShapeKind::Figure => "figure",
            ShapeKind::Code => "code",
        }
    }

    /// Whether connectors may attach to shapes of this kind.
    pub fn is_anchorable(self) -> bool {
        self.is_box() || self == ShapeKind::Circle
    }

    /// Whether this kind is described by an axis-aligned x/y/width/height box.
    pub fn is_box(self) -> bool {
        matches!(
            self,
            ShapeKind::Image
                | ShapeKind::Rect
                | ShapeKind::Poly
                | ShapeKind::Text
                | ShapeKind::Frame
                | ShapeKind::Figure
                | ShapeKind::Code
        )
    }

    /// Whether shapes of this kind get the eight resize handles.
    pub fn is_resizable(self) -> bool {
        matches!(
            self,
            ShapeKind::Image
                | ShapeKind::Rect
                | ShapeKind::Circle
                | ShapeKind::Poly
                | ShapeKind::Frame
                | ShapeKind::Figure
        )
    }

    /// Whether this kind is a two-point segment (line or arrow).
    pub fn is_segment(self) -> bool {
        matches!(self, ShapeKind::Line | ShapeKind::Arrow)
    }
}

impl fmt::Display for ShapeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ShapeKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PAINT_ORDER
            .iter()
            .copied()
            .find(|kind| kind.name() == s)
            .ok_or_else(|| format!("unknown shape kind '{s}'"))
    }
}

/// Common trait for all shapes.
pub trait ShapeTrait {
    /// Get the unique identifier.
    fn id(&self) -> &ShapeId;

    /// Get the bounding box in world coordinates.
    ///
    /// Connectors have no intrinsic bounds: their geometry depends on the
    /// shapes they attach to.
    fn bounds(&self) -> Option<Rect>;

    /// Check if a point (in world coordinates) hits this shape.
    fn hit_test(&self, point: Point, tolerance: f64) -> bool;

    /// Get the outline for rendering.
    fn to_path(&self) -> BezPath;

    /// Get the style.
    fn style(&self) -> &ShapeStyle;

    /// Get mutable style.
    fn style_mut(&mut self) -> &mut ShapeStyle;

    /// Move the shape by a world-space delta.
    fn translate(&mut self, delta: Vec2);
}

/// Owned shape of any kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Shape {
    Image(Image),
    Rect(Rectangle),
    Circle(Circle),
    Poly(Poly),
    Line(Line),
    Arrow(Line),
    Connector(Connector),
    Path(Path),
    Text(Text),
    Frame(Frame),
    Figure(Figure),
    Code(Code),
}

impl Shape {
    pub fn kind(&self) -> ShapeKind {
        match self {
            Shape::Image(_) => ShapeKind::Image,
            Shape::Rect(_) => ShapeKind::Rect,
            Shape::Circle(_) => ShapeKind::Circle,
            Shape::Poly(_) => ShapeKind::Poly,
            Shape::Line(_) => ShapeKind::Line,
            Shape::Arrow(_) => ShapeKind::Arrow,
            Shape::Connector(_) => ShapeKind::Connector,
            Shape::Path(_) => ShapeKind::Path,
            Shape::Text(_) => ShapeKind::Text,
            Shape::Frame(_) => ShapeKind::Frame,
            Shape::Figure(_) => ShapeKind::Figure,
            Shape::Code(_) => ShapeKind::Code,
        }
    }

    /// Borrow the shape through the common trait.
    pub fn as_trait(&self) -> &dyn ShapeTrait {
        match self {
            Shape::Image(s) => s,
            Shape::Rect(s) => s,
            Shape::Circle(s) => s,
            Shape::Poly(s) => s,
            Shape::Line(s) | Shape::Arrow(s) => s,
            Shape::Connector(s) => s,
            Shape::Path(s) => s,
            Shape::Text(s) => s,
            Shape::Frame(s) => s,
            Shape::Figure(s) => s,
            Shape::Code(s) => s,
        }
    }

    /// Mutably borrow the shape through the common trait.
    pub fn as_trait_mut(&mut self) -> &mut dyn ShapeTrait {
        match self {
            Shape::Image(s) => s,
            Shape::Rect(s) => s,
            Shape::Circle(s) => s,
            Shape::Poly(s) => s,
            Shape::Line(s) | Shape::Arrow(s) => s,
            Shape::Connector(s) => s,
            Shape::Path(s) => s,
            Shape::Text(s) => s,
            Shape::Frame(s) => s,
            Shape::Figure(s) => s,
            Shape::Code(s) => s,
        }
    }

    pub fn id(&self) -> &ShapeId {
        self.as_trait().id()
    }

    pub fn bounds(&self) -> Option<Rect> {
        self.as_trait().bounds()
    }

    pub fn style(&self) -> &ShapeStyle {
        self.as_trait().style()
    }

    pub fn style_mut(&mut self) -> &mut ShapeStyle {
        self.as_trait_mut().style_mut()
    }

    pub fn translate(&mut self, delta: Vec2) {
        self.as_trait_mut().translate(delta);
    }

    /// Replace the identifier with a fresh one (used by duplication).
    pub(crate) fn regenerate_id(&mut self) {
        self.set_id(ShapeId::new());
    }

    /// Overwrite the identifier. Only kind conversion keeps an id across shapes.
    pub(crate) fn set_id(&mut self, id: ShapeId) {
        match self {
            Shape::Image(s) => s.id = id,
            Shape::Rect(s) => s.id = id,
            Shape::Circle(s) => s.id = id,
            Shape::Poly(s) => s.id = id,
            Shape::Line(s) | Shape::Arrow(s) => s.id = id,
            Shape::Connector(s) => s.id = id,
            Shape::Path(s) => s.id = id,
            Shape::Text(s) => s.id = id,
            Shape::Frame(s) => s.id = id,
            Shape::Figure(s) => s.id = id,
            Shape::Code(s) => s.id = id,
        }
    }

    /// The x/y/width/height box of a resizable shape.
    ///
    /// Circles report their bounding box.
    pub fn resize_box(&self) -> Option<Rect> {
        match self {
            Shape::Image(s) => Some(s.as_rect()),
            Shape::Rect(s) => Some(s.as_rect()),
            Shape::Circle(s) => Some(s.as_rect()),
            Shape::Poly(s) => Some(s.as_rect()),
            Shape::Frame(s) => Some(s.as_rect()),
            Shape::Figure(s) => Some(s.as_rect()),
            _ => None,
        }
    }

    /// Set the box of a resizable shape. The rect must already be normalized.
    pub fn set_resize_box(&mut self, rect: Rect) {
        match self {
            Shape::Image(s) => s.set_rect(rect),
            Shape::Rect(s) => s.set_rect(rect),
            Shape::Circle(s) => s.set_rect(rect),
            Shape::Poly(s) => s.set_rect(rect),
            Shape::Frame(s) => s.set_rect(rect),
            Shape::Figure(s) => s.set_rect(rect),
            _ => {}
        }
    }

    /// Normalize transient negative extents in place.
    pub fn normalize(&mut self) {
        match self {
            Shape::Image(s) => s.set_rect(s.as_rect()),
            Shape::Rect(s) => s.normalize(),
            Shape::Circle(s) => s.normalize(),
            Shape::Poly(s) => s.set_rect(s.as_rect()),
            Shape::Frame(s) => s.set_rect(s.as_rect()),
            Shape::Figure(s) => s.set_rect(s.as_rect()),
            _ => {}
        }
    }
}

/// Normalize a possibly-negative box so that width and height are non-negative.
pub fn normalize_box(x: f64, y: f64, width: f64, height: f64) -> Rect {
    Rect::new(x, y, x + width, y + height).abs()
}
