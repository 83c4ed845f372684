//! Drive a controller through a few gestures and check the frames it paints.

use inkboard_core::{
    EditorConfig, InteractionController, Modifiers, MouseButton, PointerEvent, ToolKind,
};
use inkboard_render::{DrawCommand, Frame, ImageCache, Theme, render_controller};
use kurbo::Point;

fn controller() -> InteractionController {
    let _ = env_logger::builder().is_test(true).try_init();
    InteractionController::new(EditorConfig::default(), None)
}

fn press(c: &mut InteractionController, at: (f64, f64)) {
    c.handle_pointer(PointerEvent::Down {
        position: Point::new(at.0, at.1),
        button: MouseButton::Left,
        modifiers: Modifiers::NONE,
    });
}

fn release(c: &mut InteractionController, at: (f64, f64)) {
    c.handle_pointer(PointerEvent::Up {
        position: Point::new(at.0, at.1),
        button: MouseButton::Left,
        modifiers: Modifiers::NONE,
    });
}

fn click(c: &mut InteractionController, at: (f64, f64)) {
    press(c, at);
    release(c, at);
}

fn texts(frame: &Frame) -> Vec<&str> {
    frame
        .commands
        .iter()
        .filter_map(|c| match c {
            DrawCommand::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
        .collect()
}

#[test]
fn test_selected_rect_shows_eight_handles() {
    let mut c = controller();
    c.set_tool(ToolKind::Rectangle);
    press(&mut c, (10.0, 10.0));
    c.handle_pointer(PointerEvent::Move {
        position: Point::new(110.0, 90.0),
        modifiers: Modifiers::NONE,
    });
    release(&mut c, (110.0, 90.0));
    c.set_tool(ToolKind::Select);
    click(&mut c, (50.0, 50.0));
    assert_eq!(c.store().selection().len(), 1);

    let theme = Theme::dark();
    let frame = render_controller(&c, &theme, &ImageCache::new());
    let handles = frame
        .commands
        .iter()
        .filter(|cmd| matches!(cmd, DrawCommand::Fill { color, .. } if *color == theme.handle_fill))
        .count();
    assert_eq!(handles, 8);
    let dashed = frame
        .commands
        .iter()
        .filter(|cmd| matches!(cmd, DrawCommand::Stroke { dash: Some(_), .. }))
        .count();
    assert_eq!(dashed, 1);
}

#[test]
fn test_text_under_edit_is_hidden() {
    let mut c = controller();
    c.set_tool(ToolKind::Text);
    click(&mut c, (300.0, 300.0));
    c.commit_text("hello");
    assert_eq!(c.scene().texts.len(), 1);

    let theme = Theme::light();
    let images = ImageCache::new();
    assert_eq!(texts(&render_controller(&c, &theme, &images)), vec!["hello"]);

    click(&mut c, (305.0, 305.0));
    assert!(c.editing_text().is_some());
    assert!(texts(&render_controller(&c, &theme, &images)).is_empty());

    c.cancel_text();
    assert_eq!(texts(&render_controller(&c, &theme, &images)), vec!["hello"]);
}

#[test]
fn test_frame_follows_view() {
    let mut c = controller();
    c.zoom_in();
    let frame = render_controller(&c, &Theme::light(), &ImageCache::new());
    assert_eq!(frame.transform, c.camera().transform());
}
