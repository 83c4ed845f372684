//! Shared helpers for driving the controller the way a host would.

#![allow(dead_code)]

use inkboard_core::{
    EditorConfig, InteractionController, Key, KeyEvent, Modifiers, MouseButton, Outcome,
    PointerEvent, ToolKind,
};
use kurbo::Point;

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub fn controller() -> InteractionController {
    init_logging();
    InteractionController::new(EditorConfig::default(), None)
}

pub fn ctrl() -> Modifiers {
    Modifiers {
        ctrl: true,
        ..Modifiers::NONE
    }
}

pub fn shift() -> Modifiers {
    Modifiers {
        shift: true,
        ..Modifiers::NONE
    }
}

/// Press at `from`, move to `to`, release at `to`. Returns the release outcome.
pub fn drag(
    c: &mut InteractionController,
    from: (f64, f64),
    to: (f64, f64),
    modifiers: Modifiers,
) -> Outcome {
    c.handle_pointer(PointerEvent::Down {
        position: Point::new(from.0, from.1),
        button: MouseButton::Left,
        modifiers,
    });
    c.handle_pointer(PointerEvent::Move {
        position: Point::new(to.0, to.1),
        modifiers,
    });
    c.handle_pointer(PointerEvent::Up {
        position: Point::new(to.0, to.1),
        button: MouseButton::Left,
        modifiers,
    })
}

pub fn click(c: &mut InteractionController, at: (f64, f64)) -> Outcome {
    c.handle_pointer(PointerEvent::Down {
        position: Point::new(at.0, at.1),
        button: MouseButton::Left,
        modifiers: Modifiers::NONE,
    });
    c.handle_pointer(PointerEvent::Up {
        position: Point::new(at.0, at.1),
        button: MouseButton::Left,
        modifiers: Modifiers::NONE,
    })
}

pub fn draw_rect(c: &mut InteractionController, from: (f64, f64), to: (f64, f64)) -> Outcome {
    c.set_tool(ToolKind::Rectangle);
    drag(c, from, to, Modifiers::NONE)
}

pub fn press(c: &mut InteractionController, key: &str, modifiers: Modifiers) -> Outcome {
    c.handle_key(KeyEvent::Pressed {
        key: Key::from_name(key),
        modifiers,
    })
}
