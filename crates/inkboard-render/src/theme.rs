//! Light and dark palettes.

use inkboard_core::shapes::{SerializableColor, ShapeStyle};
use peniko::Color;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ThemeMode {
    #[default]
    Light,
    Dark,
}

/// Colors the renderer resolves unset shape colors and chrome against.
#[derive(Debug, Clone)]
pub struct Theme {
    pub mode: ThemeMode,
    pub background: Color,
    /// Stroke and text color for shapes without an explicit stroke.
    pub foreground: Color,
    /// Selection outlines, handles and hover anchors.
    pub selection: Color,
    /// Rubber-band fill.
    pub selection_fill: Color,
    pub handle_fill: Color,
    pub code_background: Color,
    pub figure_strip: Color,
    /// Fill of upload placeholders and images that are not loaded yet.
    pub placeholder: Color,
    pub error: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self::light()
    }
}

impl Theme {
    pub fn light() -> Self {
        Self {
            mode: ThemeMode::Light,
            background: Color::from_rgba8(250, 250, 250, 255),
            foreground: Color::from_rgba8(30, 30, 30, 255),
            selection: Color::from_rgba8(59, 130, 246, 255),
            selection_fill: Color::from_rgba8(59, 130, 246, 25),
            handle_fill: Color::WHITE,
            code_background: Color::from_rgba8(243, 244, 246, 255),
            figure_strip: Color::from_rgba8(229, 231, 235, 255),
            placeholder: Color::from_rgba8(200, 200, 200, 255),
            error: Color::from_rgba8(220, 38, 38, 255),
        }
    }

    pub fn dark() -> Self {
        Self {
            mode: ThemeMode::Dark,
            background: Color::from_rgba8(24, 24, 27, 255),
            foreground: Color::from_rgba8(228, 228, 231, 255),
            selection: Color::from_rgba8(96, 165, 250, 255),
            selection_fill: Color::from_rgba8(96, 165, 250, 30),
            handle_fill: Color::from_rgba8(39, 39, 42, 255),
            code_background: Color::from_rgba8(39, 39, 42, 255),
            figure_strip: Color::from_rgba8(52, 52, 56, 255),
            placeholder: Color::from_rgba8(63, 63, 70, 255),
            error: Color::from_rgba8(248, 113, 113, 255),
        }
    }

    pub fn for_mode(mode: ThemeMode) -> Self {
        match mode {
            ThemeMode::Light => Self::light(),
            ThemeMode::Dark => Self::dark(),
        }
    }

    /// Stroke color of a shape with its opacity applied.
    pub fn stroke_color(&self, style: &ShapeStyle) -> Color {
        let base = style
            .stroke
            .unwrap_or_else(|| SerializableColor::from(self.foreground));
        style.with_opacity(base)
    }

    /// Fill color of a shape with its opacity applied, if it has one.
    pub fn fill_color(&self, style: &ShapeStyle) -> Option<Color> {
        style.fill.map(|fill| style.with_opacity(fill))
    }
}
