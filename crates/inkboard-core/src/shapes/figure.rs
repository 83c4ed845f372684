//! Titled figure container.

use super::frame::hits_border;
use super::{ShapeId, ShapeStyle, ShapeTrait, normalize_box};
use kurbo::{BezPath, Point, Rect, RoundedRect, Shape as KurboShape, Vec2};
use serde::{Deserialize, Serialize};

/// A container with an editable title strip along its top edge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Figure {
    pub(crate) id: ShapeId,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    #[serde(default)]
    pub title: String,
    pub figure_number: u32,
    /// Style properties.
    #[serde(flatten)]
    pub style: ShapeStyle,
}

impl Figure {
    /// Height of the title strip inside the top edge.
    pub const TITLE_HEIGHT: f64 = 28.0;
    const CORNER_RADIUS: f64 = 8.0;

    pub fn new(x: f64, y: f64, width: f64, height: f64, figure_number: u32) -> Self {
        Self {
            id: ShapeId::new(),
            x,
            y,
            width,
            height,
            title: String::new(),
            figure_number,
            style: ShapeStyle::default(),
        }
    }

    /// Title shown in the strip; untitled figures show their number.
    pub fn display_title(&self) -> String {
        if self.title.trim().is_empty() {
            format!("Figure {}", self.figure_number)
        } else {
            self.title.clone()
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

    pub fn title_rect(&self) -> Rect {
        let rect = self.as_rect();
        Rect::new(
            rect.x0,
            rect.y0,
            rect.x1,
            rect.y0 + Self::TITLE_HEIGHT.min(rect.height()),
        )
    }
}

impl ShapeTrait for Figure {
    fn id(&self) -> &ShapeId {
        &self.id
    }

    fn bounds(&self) -> Option<Rect> {
        Some(self.as_rect())
    }

    fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        hits_border(self.as_rect(), point, tolerance) || self.title_rect().contains(point)
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
