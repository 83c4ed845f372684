mod common;

use common::{controller, ctrl};
use inkboard_core::{Modifiers, WheelEvent};
use kurbo::{Point, Vec2};
use proptest::prelude::*;

proptest! {
    #[test]
    fn wheel_zoom_keeps_cursor_world_point(
        sx in 0.0..1600.0f64,
        sy in 0.0..1000.0f64,
        notches in prop::collection::vec(prop::bool::ANY, 1..20),
        pan_x in -800.0..800.0f64,
        pan_y in -800.0..800.0f64,
    ) {
        let mut c = controller();
        c.handle_wheel(WheelEvent {
            position: Point::ZERO,
            delta: Vec2::new(pan_x, pan_y),
            modifiers: Modifiers::NONE,
        });
        let cursor = Point::new(sx, sy);
        for zoom_in in notches {
            let before = c.camera().to_world(cursor);
            c.handle_wheel(WheelEvent {
                position: cursor,
                delta: Vec2::new(0.0, if zoom_in { -100.0 } else { 100.0 }),
                modifiers: ctrl(),
            });
            let after = c.camera().to_world(cursor);
            prop_assert!((before - after).hypot() < 1e-6, "{:?} drifted to {:?}", before, after);
            prop_assert!(c.camera().zoom >= 0.1 - 1e-12 && c.camera().zoom <= 5.0 + 1e-12);
        }
    }
}

#[test]
fn test_view_changes_never_touch_history() {
    let mut c = controller();
    c.zoom_in();
    c.handle_wheel(WheelEvent {
        position: Point::new(10.0, 10.0),
        delta: Vec2::new(0.0, 40.0),
        modifiers: Modifiers::NONE,
    });
    let out = c.reset_view();
    assert!(out.changed().is_some());
    assert!(!out.committed);
    assert_eq!(c.history().len(), 1);
    assert_eq!(c.camera().pan, Vec2::ZERO);
}
