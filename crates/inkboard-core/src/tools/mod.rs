//! Tool set, tool resolution and in-progress drawing.

use crate::input::Modifiers;
use crate::selection::constrain_to_axis;
use crate::shapes::{Circle, Frame, Line, Path, PolyType, Rectangle, Shape, ShapeStyle};
use kurbo::{Point, Rect};
use serde::{Deserialize, Serialize};

/// Available tools.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum ToolKind {
    #[default]
    Select,
    Hand,
    Rectangle,
    Circle,
    Line,
    Arrow,
    Pencil,
    Eraser,
    Text,
    Frame,
    /// Places a previously chosen shape at the pointer.
    PlusAdd,
    /// Places a previously chosen icon at the pointer.
    IconAdd,
}

impl ToolKind {
    /// Tools that drag out a preview shape from the down point.
    pub fn is_drawing(self) -> bool {
        matches!(
            self,
            ToolKind::Rectangle
                | ToolKind::Circle
                | ToolKind::Line
                | ToolKind::Arrow
                | ToolKind::Frame
                | ToolKind::Pencil
        )
    }

    /// Tools that revert to `Select` after one use.
    pub fn is_one_shot(self) -> bool {
        matches!(self, ToolKind::PlusAdd | ToolKind::IconAdd)
    }
}

/// Pick the tool for a pointer-down.
///
/// Ctrl/Cmd always forces `Select`; holding Space forces `Hand`.
pub fn resolve_tool(active: ToolKind, modifiers: Modifiers, space_held: bool) -> ToolKind {
    if modifiers.command() {
        ToolKind::Select
    } else if space_held {
        ToolKind::Hand
    } else {
        active
    }
}

/// What the `PlusAdd` tool places.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Placement {
    Rect,
    Circle,
    Poly(PolyType),
    Frame,
    Figure,
    Code,
}

/// Item chosen in a palette, waiting to be placed by a click.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PendingInsert {
    Shape(Placement),
    /// An icon image by URI.
    Icon { src: String },
}

impl PendingInsert {
    /// The tool that places this item.
    pub fn tool(&self) -> ToolKind {
        match self {
            PendingInsert::Shape(_) => ToolKind::PlusAdd,
            PendingInsert::Icon { .. } => ToolKind::IconAdd,
        }
    }
}

/// State of a tool interaction.
#[derive(Debug, Clone, Default)]
pub enum ToolState {
    /// Tool is idle, waiting for interaction.
    #[default]
    Idle,
    /// A shape is being dragged out.
    Active {
        start: Point,
        current: Point,
        /// Shift held on the last update.
        constrain: bool,
    },
}

/// Manages the current tool and the shape it is drawing.
#[derive(Debug, Clone)]
pub struct ToolManager {
    /// Currently selected tool.
    pub current_tool: ToolKind,
    /// Current state of the tool.
    pub state: ToolState,
    /// Accumulated points for pencil strokes.
    pencil: Option<Path>,
    /// Current style to apply to new shapes.
    pub current_style: ShapeStyle,
}

impl Default for ToolManager {
    fn default() -> Self {
        Self {
            current_tool: ToolKind::default(),
            state: ToolState::default(),
            pencil: None,
            current_style: ShapeStyle::default(),
        }
    }
}

impl ToolManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the current tool, dropping any interaction in progress.
    pub fn set_tool(&mut self, tool: ToolKind) {
        self.current_tool = tool;
        self.cancel();
    }

    /// Begin a drawing interaction with `tool` at a world point.
    pub fn begin(&mut self, tool: ToolKind, point: Point) {
        self.current_tool = tool;
        self.pencil = (tool == ToolKind::Pencil).then(|| {
            let mut path = Path::starting_at(point);
            path.style = self.current_style.clone();
            path
        });
        self.state = ToolState::Active {
            start: point,
            current: point,
            constrain: false,
        };
    }

    /// Update the current interaction.
    pub fn update(&mut self, point: Point, constrain: bool) {
        if let ToolState::Active {
            current,
            constrain: c,
            ..
        } = &mut self.state
        {
            *current = point;
            *c = constrain;
            if let Some(path) = &mut self.pencil {
                path.push_point(point, constrain);
            }
        }
    }

    /// End the current interaction and return the drawn shape, not yet
    /// normalized or size-checked.
    pub fn end(&mut self) -> Option<Shape> {
        let shape = self.preview_shape();
        self.cancel();
        shape
    }

    /// Cancel the current interaction.
    pub fn cancel(&mut self) {
        self.state = ToolState::Idle;
        self.pencil = None;
    }

    pub fn is_active(&self) -> bool {
        matches!(self.state, ToolState::Active { .. })
    }

    /// The shape the current interaction would produce.
    pub fn preview_shape(&self) -> Option<Shape> {
        let ToolState::Active {
            start,
            current,
            constrain,
        } = self.state
        else {
            return None;
        };
        if let Some(path) = &self.pencil {
            return Some(Shape::Path(path.clone()));
        }
        let mut shape = create_shape(self.current_tool, start, current, constrain)?;
        *shape.style_mut() = self.current_style.clone();
        Some(shape)
    }
}

/// Box dragged from `start` to `end`; square when constrained.
fn drag_box(start: Point, end: Point, constrain: bool) -> Rect {
    if !constrain {
        return Rect::from_points(start, end);
    }
    let dx = end.x - start.x;
    let dy = end.y - start.y;
    let side = dx.abs().max(dy.abs());
    let end = Point::new(
        start.x + if dx < 0.0 { -side } else { side },
        start.y + if dy < 0.0 { -side } else { side },
    );
    Rect::from_points(start, end)
}

/// Create a shape from a drag.
fn create_shape(tool: ToolKind, start: Point, end: Point, constrain: bool) -> Option<Shape> {
    match tool {
        ToolKind::Rectangle => {
            let rect = drag_box(start, end, constrain);
            Some(Shape::Rect(Rectangle::new(rect.x0, rect.y0, rect.width(), rect.height())))
        }
        ToolKind::Circle => Some(Shape::Circle(Circle::from_rect(drag_box(start, end, constrain)))),
        ToolKind::Frame => {
            let rect = drag_box(start, end, constrain);
            Some(Shape::Frame(Frame::new(rect.x0, rect.y0, rect.width(), rect.height(), 0)))
        }
        ToolKind::Line | ToolKind::Arrow => {
            let end = if constrain { constrain_to_axis(start, end) } else { end };
            let line = Line::new(start, end);
            Some(if tool == ToolKind::Arrow {
                Shape::Arrow(line)
            } else {
                Shape::Line(line)
            })
        }
        _ => None,
    }
}
