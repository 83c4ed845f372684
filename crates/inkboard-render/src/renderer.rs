//! Display-list renderer.
//!
//! [`render`] turns a scene, a view and the controller's transient overlay
//! into a flat list of [`DrawCommand`]s in world coordinates. The host
//! replays them through [`Frame::transform`] on whatever surface it owns.
//! Committed shapes follow the fixed paint order; transients come last.

use crate::image_cache::ImageCache;
use crate::theme::Theme;
use inkboard_core::camera::Camera;
use inkboard_core::controller::{InteractionController, Overlay};
use inkboard_core::geometry::connector_route;
use inkboard_core::resources::Placeholder;
use inkboard_core::shapes::{
    Code, Connector, FontFamily, Figure, Frame as FrameShape, Image, Line, PAINT_ORDER, Path,
    Shape, ShapeId, ShapeKind, ShapeStyle, ShapeTrait, Text, TextAlign,
};
use inkboard_core::store::Snapshot;
use kurbo::{Affine, BezPath, Ellipse, Join, Point, Rect, Shape as KurboShape, Vec2};
use peniko::Color;
use thiserror::Error;

/// Renderer errors.
#[derive(Debug, Error)]
pub enum RendererError {
    #[error("Failed to decode image: {0}")]
    Decode(#[from] image::ImageError),
    #[error("Image was never requested: {0}")]
    UnknownImage(String),
}

/// Handle edge length (screen pixels).
const HANDLE_SIZE: f64 = 10.0;
/// Hover anchor dot radius (screen pixels).
const ANCHOR_DOT_RADIUS: f64 = 5.0;
/// Dash length of selection chrome (screen pixels).
const CHROME_DASH: f64 = 4.0;
/// Placeholder label size (screen pixels).
const PLACEHOLDER_FONT_SIZE: f64 = 14.0;
const FIGURE_TITLE_FONT_SIZE: f64 = 14.0;
const FIGURE_TITLE_PADDING: f64 = 8.0;

/// One drawing operation, in world coordinates.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    /// Fill the whole surface.
    Clear(Color),
    Fill {
        path: BezPath,
        color: Color,
    },
    Stroke {
        path: BezPath,
        color: Color,
        width: f64,
        join: Join,
        dash: Option<Vec<f64>>,
    },
    /// Draw a decoded image from the cache, scaled into `rect`.
    Image {
        src: String,
        rect: Rect,
        opacity: f64,
    },
    /// One line of text. `origin` is the top-left of the line box and
    /// `width` the box that `align` applies to.
    Text {
        text: String,
        origin: Point,
        width: f64,
        font_size: f64,
        family: &'static str,
        align: TextAlign,
        color: Color,
    },
}

/// Everything needed to paint one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    /// World to screen transform.
    pub transform: Affine,
    pub commands: Vec<DrawCommand>,
    /// Image sources referenced by the scene that are not decoded yet, in
    /// paint order. The host passes them to [`ImageCache::request`].
    pub missing_images: Vec<String>,
}

/// Build the display list for a scene.
pub fn render(
    scene: &Snapshot,
    camera: &Camera,
    overlay: &Overlay,
    theme: &Theme,
    images: &ImageCache,
) -> Frame {
    let mut painter = Painter::new(camera, theme, images, None);
    painter.paint(scene, overlay);
    painter.frame
}

/// Build the display list for a controller, hiding the text being edited.
pub fn render_controller(
    controller: &InteractionController,
    theme: &Theme,
    images: &ImageCache,
) -> Frame {
    let overlay = controller.overlay();
    let mut painter = Painter::new(controller.camera(), theme, images, controller.editing_text());
    painter.paint(controller.scene(), &overlay);
    painter.frame
}

struct Painter<'a> {
    theme: &'a Theme,
    images: &'a ImageCache,
    zoom: f64,
    skip: Option<&'a ShapeId>,
    frame: Frame,
}

impl<'a> Painter<'a> {
    fn new(
        camera: &Camera,
        theme: &'a Theme,
        images: &'a ImageCache,
        skip: Option<&'a ShapeId>,
    ) -> Self {
        Self {
            theme,
            images,
            zoom: camera.zoom,
            skip,
            frame: Frame {
                transform: camera.transform(),
                commands: Vec::new(),
                missing_images: Vec::new(),
            },
        }
    }

    /// Convert a screen length to world units.
    fn px(&self, pixels: f64) -> f64 {
        pixels / self.zoom
    }

    fn fill(&mut self, path: BezPath, color: Color) {
        self.frame.commands.push(DrawCommand::Fill { path, color });
    }

    fn stroke(&mut self, path: BezPath, color: Color, width: f64, join: Join, dash: Option<Vec<f64>>) {
        self.frame.commands.push(DrawCommand::Stroke {
            path,
            color,
            width,
            join,
            dash,
        });
    }

    fn stroke_styled(&mut self, path: BezPath, style: &ShapeStyle, join: Join) {
        if style.stroke_width <= 0.0 {
            return;
        }
        let color = self.theme.stroke_color(style);
        self.stroke(path, color, style.stroke_width, join, style.stroke_dash_array.clone());
    }

    fn paint(&mut self, scene: &Snapshot, overlay: &Overlay) {
        self.frame
            .commands
            .push(DrawCommand::Clear(self.theme.background));
        for kind in PAINT_ORDER {
            self.paint_kind(scene, kind);
        }
        self.paint_overlay(scene, overlay);
    }

    fn skipped(&self, id: &ShapeId) -> bool {
        self.skip == Some(id)
    }

    fn paint_kind(&mut self, scene: &Snapshot, kind: ShapeKind) {
        match kind {
            ShapeKind::Image => scene.images.iter().for_each(|s| self.image(s)),
            ShapeKind::Rect => scene
                .rects
                .iter()
                .for_each(|s| self.outline(s.to_path(), &s.style, Join::Miter)),
            ShapeKind::Circle => scene
                .circles
                .iter()
                .for_each(|s| self.outline(s.to_path(), &s.style, Join::Round)),
            ShapeKind::Poly => scene
                .polys
                .iter()
                .for_each(|s| self.outline(s.to_path(), &s.style, Join::Miter)),
            ShapeKind::Line => scene.lines.iter().for_each(|s| self.line(s, false)),
            ShapeKind::Arrow => scene.arrows.iter().for_each(|s| self.line(s, true)),
            ShapeKind::Connector => scene
                .connectors
                .iter()
                .for_each(|s| self.connector(s, scene)),
            ShapeKind::Path => scene.paths.iter().for_each(|s| self.path(s)),
            ShapeKind::Text => scene.texts.iter().for_each(|s| self.text(s)),
            ShapeKind::Frame => scene.frames.iter().for_each(|s| self.frame_shape(s)),
            ShapeKind::Figure => scene.figures.iter().for_each(|s| self.figure(s)),
            ShapeKind::Code => scene.codes.iter().for_each(|s| self.code(s)),
        }
    }

    fn shape(&mut self, shape: &Shape, scene: &Snapshot) {
        match shape {
            Shape::Image(s) => self.image(s),
            Shape::Rect(s) => self.outline(s.to_path(), &s.style, Join::Miter),
            Shape::Circle(s) => self.outline(s.to_path(), &s.style, Join::Round),
            Shape::Poly(s) => self.outline(s.to_path(), &s.style, Join::Miter),
            Shape::Line(s) => self.line(s, false),
            Shape::Arrow(s) => self.line(s, true),
            Shape::Connector(s) => self.connector(s, scene),
            Shape::Path(s) => self.path(s),
            Shape::Text(s) => self.text(s),
            Shape::Frame(s) => self.frame_shape(s),
            Shape::Figure(s) => self.figure(s),
            Shape::Code(s) => self.code(s),
        }
    }

    fn outline(&mut self, path: BezPath, style: &ShapeStyle, join: Join) {
        if let Some(fill) = self.theme.fill_color(style) {
            self.fill(path.clone(), fill);
        }
        self.stroke_styled(path, style, join);
    }

    fn image(&mut self, image: &Image) {
        let rect = image.as_rect();
        if self.images.ready(&image.src).is_some() {
            self.frame.commands.push(DrawCommand::Image {
                src: image.src.clone(),
                rect,
                opacity: image.style.opacity,
            });
        } else {
            self.fill(rect.to_path(0.1), self.theme.placeholder);
            if !self.frame.missing_images.contains(&image.src) {
                self.frame.missing_images.push(image.src.clone());
            }
        }
        if image.style.stroke.is_some() {
            self.stroke_styled(rect.to_path(0.1), &image.style, Join::Miter);
        }
    }

    fn line(&mut self, line: &Line, arrow: bool) {
        self.stroke_styled(line.to_path(), &line.style, Join::Round);
        if arrow {
            let color = self.theme.stroke_color(&line.style);
            let head = arrow_head(line.start(), line.end(), line.style.stroke_width);
            self.fill(head, color);
        }
    }

    fn connector(&mut self, connector: &Connector, scene: &Snapshot) {
        // Unresolved anchors are logged by the router and the connector is
        // left out.
        let Some(route) = connector_route(connector, scene, self.zoom).filter(|r| r.len() >= 2)
        else {
            return;
        };
        self.stroke_styled(polyline(&route), &connector.style, Join::Round);
        let color = self.theme.stroke_color(&connector.style);
        let [.., from, tip] = route.as_slice() else {
            return;
        };
        self.fill(arrow_head(*from, *tip, connector.style.stroke_width), color);
    }

    fn path(&mut self, path: &Path) {
        match path.points.as_slice() {
            [] => {}
            [dot] => {
                let radius = (path.style.stroke_width / 2.0).max(0.5);
                let color = self.theme.stroke_color(&path.style);
                self.fill(Ellipse::new(*dot, (radius, radius), 0.0).to_path(0.1), color);
            }
            _ => self.stroke_styled(path.to_path(), &path.style, Join::Round),
        }
    }

    fn text(&mut self, text: &Text) {
        if self.skipped(text.id()) {
            return;
        }
        let color = self.theme.stroke_color(&text.style);
        let line_height = text.line_height();
        for (i, line) in text.text().split('\n').enumerate() {
            self.frame.commands.push(DrawCommand::Text {
                text: line.to_string(),
                origin: Point::new(text.x, text.y + i as f64 * line_height),
                width: text.width(),
                font_size: text.font_size(),
                family: text.font_family().name(),
                align: text.text_align,
                color,
            });
        }
    }

    fn frame_shape(&mut self, frame: &FrameShape) {
        self.outline(frame.to_path(), &frame.style, Join::Miter);
        let label = frame.label_rect();
        let color = self.theme.stroke_color(&frame.style);
        self.frame.commands.push(DrawCommand::Text {
            text: frame.label(),
            origin: label.origin(),
            width: label.width(),
            font_size: FrameShape::LABEL_FONT_SIZE,
            family: FontFamily::Sans.name(),
            align: TextAlign::Left,
            color,
        });
    }

    fn figure(&mut self, figure: &Figure) {
        let path = figure.to_path();
        if let Some(fill) = self.theme.fill_color(&figure.style) {
            self.fill(path.clone(), fill);
        }
        let strip = figure.title_rect();
        self.fill(strip.to_path(0.1), self.theme.figure_strip);
        self.stroke_styled(path, &figure.style, Join::Round);
        let color = self.theme.stroke_color(&figure.style);
        self.frame.commands.push(DrawCommand::Text {
            text: figure.display_title(),
            origin: Point::new(
                strip.x0 + FIGURE_TITLE_PADDING,
                strip.y0 + (strip.height() - FIGURE_TITLE_FONT_SIZE) / 2.0,
            ),
            width: (strip.width() - 2.0 * FIGURE_TITLE_PADDING).max(0.0),
            font_size: FIGURE_TITLE_FONT_SIZE,
            family: FontFamily::Sans.name(),
            align: TextAlign::Left,
            color,
        });
    }

    fn code(&mut self, code: &Code) {
        if self.skipped(code.id()) {
            return;
        }
        let path = code.to_path();
        let background = self
            .theme
            .fill_color(&code.style)
            .unwrap_or(self.theme.code_background);
        self.fill(path.clone(), background);
        if code.style.stroke.is_some() {
            self.stroke_styled(path, &code.style, Join::Round);
        }
        let color = self.theme.stroke_color(&code.style);
        let line_height = code.line_height();
        for (i, line) in code.code().split('\n').enumerate() {
            self.frame.commands.push(DrawCommand::Text {
                text: line.to_string(),
                origin: Point::new(
                    code.x + Code::PADDING,
                    code.y + Code::PADDING + i as f64 * line_height,
                ),
                width: code.width() - 2.0 * Code::PADDING,
                font_size: code.font_size(),
                family: FontFamily::Mono.name(),
                align: TextAlign::Left,
                color,
            });
        }
    }

    fn chrome_dash(&self) -> Option<Vec<f64>> {
        let dash = self.px(CHROME_DASH);
        Some(vec![dash, dash])
    }

    fn paint_overlay(&mut self, scene: &Snapshot, overlay: &Overlay) {
        if let Some(preview) = &overlay.preview {
            self.shape(preview, scene);
        }
        for placeholder in &overlay.placeholders {
            self.placeholder(placeholder);
        }
        if let Some(route) = overlay.pending_route.as_deref().filter(|r| r.len() >= 2) {
            let width = self.px(2.0);
            self.stroke(polyline(route), self.theme.selection, width, Join::Round, None);
            if let [.., from, tip] = route {
                self.fill(arrow_head(*from, *tip, width), self.theme.selection);
            }
        }

        let thin = self.px(1.0);
        for bounds in &overlay.selection_bounds {
            let dash = self.chrome_dash();
            self.stroke(bounds.to_path(0.1), self.theme.selection, thin, Join::Miter, dash);
        }
        let half = self.px(HANDLE_SIZE) / 2.0;
        for handle in &overlay.handles {
            let square = Rect::from_center_size(*handle, (half * 2.0, half * 2.0)).to_path(0.1);
            self.fill(square.clone(), self.theme.handle_fill);
            self.stroke(square, self.theme.selection, self.px(1.5), Join::Miter, None);
        }
        if let Some(anchor) = overlay.hover_anchor {
            let radius = self.px(ANCHOR_DOT_RADIUS);
            let dot = Ellipse::new(anchor, (radius, radius), 0.0).to_path(0.1);
            self.fill(dot.clone(), self.theme.selection);
            self.stroke(dot, self.theme.handle_fill, self.px(1.5), Join::Round, None);
        }
        if let Some(band) = overlay.rubber_band {
            let path = band.to_path(0.1);
            self.fill(path.clone(), self.theme.selection_fill);
            let dash = self.chrome_dash();
            self.stroke(path, self.theme.selection, thin, Join::Miter, dash);
        }
    }

    fn placeholder(&mut self, placeholder: &Placeholder) {
        let rect = placeholder.rect;
        let path = rect.to_path(0.1);
        self.fill(path.clone(), self.theme.placeholder);
        let border = if placeholder.is_failed() {
            self.theme.error
        } else {
            self.theme.foreground
        };
        let dash = self.chrome_dash();
        self.stroke(path, border, self.px(1.0), Join::Miter, dash);
        let font_size = self.px(PLACEHOLDER_FONT_SIZE);
        self.frame.commands.push(DrawCommand::Text {
            text: placeholder.label.clone(),
            origin: Point::new(rect.x0, rect.center().y - font_size / 2.0),
            width: rect.width(),
            font_size,
            family: FontFamily::Sans.name(),
            align: TextAlign::Center,
            color: border,
        });
    }
}

fn polyline(points: &[Point]) -> BezPath {
    let mut path = BezPath::new();
    if let Some((first, rest)) = points.split_first() {
        path.move_to(*first);
        for p in rest {
            path.line_to(*p);
        }
    }
    path
}

/// Triangular head at `tip`, pointing along `from -> tip`.
fn arrow_head(from: Point, tip: Point, stroke_width: f64) -> BezPath {
    let size = (stroke_width * 4.0).max(10.0);
    let dir = tip - from;
    let len = dir.hypot();
    let dir = if len > f64::EPSILON {
        dir / len
    } else {
        Vec2::new(1.0, 0.0)
    };
    let normal = Vec2::new(-dir.y, dir.x);
    let base = tip - dir * size;
    let mut path = BezPath::new();
    path.move_to(tip);
    path.line_to(base + normal * (size / 2.0));
    path.line_to(base - normal * (size / 2.0));
    path.close_path();
    path
}
