mod common;

use common::{controller, ctrl, draw_rect, press};
use inkboard_core::{EditorConfig, InteractionController, Modifiers, ToolKind};
use proptest::prelude::*;

#[derive(Debug, Clone)]
enum Op {
    Draw { x: f64, y: f64, w: f64, h: f64 },
    DuplicateAll,
    DeleteFirst,
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        3 => (0.0..500.0f64, 0.0..500.0f64, 10.0..200.0f64, 10.0..200.0f64)
            .prop_map(|(x, y, w, h)| Op::Draw { x, y, w, h }),
        1 => Just(Op::DuplicateAll),
        1 => Just(Op::DeleteFirst),
    ]
}

/// Apply one operation and report whether it pushed a history entry.
fn apply(c: &mut InteractionController, op: &Op) -> bool {
    match *op {
        Op::Draw { x, y, w, h } => draw_rect(c, (x, y), (x + w, y + h)).committed,
        Op::DuplicateAll => {
            c.set_tool(ToolKind::Select);
            press(c, "a", ctrl());
            press(c, "d", ctrl()).committed
        }
        Op::DeleteFirst => {
            if c.scene().rects.is_empty() {
                return false;
            }
            c.set_tool(ToolKind::Select);
            let center = c.scene().rects[0].as_rect().center();
            common::click(c, (center.x, center.y));
            press(c, "Delete", Modifiers::NONE).committed
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn n_operations_then_n_undos_restores_initial(ops in prop::collection::vec(op(), 1..12)) {
        let mut c = controller();
        let initial = c.scene().clone();
        let mut committed = 0;
        for op in &ops {
            if apply(&mut c, op) {
                committed += 1;
            }
        }
        prop_assert_eq!(c.history().len(), committed + 1);
        for _ in 0..committed {
            c.undo();
        }
        prop_assert_eq!(c.scene(), &initial);
        prop_assert!(!c.history().can_undo());
    }

    #[test]
    fn undos_reach_the_mount_scene_past_capacity(ops in prop::collection::vec(op(), 10..30)) {
        let config = EditorConfig {
            history_capacity: 6,
            ..EditorConfig::default()
        };
        let mut c = InteractionController::new(config, None);
        let initial = c.scene().clone();
        let mut committed = 0;
        for op in &ops {
            if apply(&mut c, op) {
                committed += 1;
            }
        }
        prop_assert_eq!(c.history().len(), (committed + 1).min(6));
        for _ in 0..committed {
            c.undo();
        }
        prop_assert_eq!(c.scene(), &initial);
    }
}

#[test]
fn test_default_capacity_keeps_mount_scene() {
    let mut c = controller();
    let runs = c.config().history_capacity + 10;
    for i in 0..runs {
        let x = (i % 20) as f64 * 30.0;
        let y = (i / 20) as f64 * 30.0;
        assert!(draw_rect(&mut c, (x, y), (x + 20.0, y + 20.0)).committed);
    }
    assert_eq!(c.history().len(), c.config().history_capacity);
    for _ in 0..runs {
        c.undo();
    }
    assert!(c.scene().is_empty());
    assert!(!c.history().can_undo());
}

#[test]
fn test_new_edit_after_undo_drops_redo() {
    let mut c = controller();
    draw_rect(&mut c, (0.0, 0.0), (40.0, 40.0));
    draw_rect(&mut c, (100.0, 0.0), (140.0, 40.0));
    c.undo();
    assert!(c.history().can_redo());

    draw_rect(&mut c, (0.0, 100.0), (40.0, 140.0));
    assert!(!c.history().can_redo());
    assert!(c.redo().effects.is_empty());
    assert_eq!(c.scene().rects.len(), 2);
    assert!((c.scene().rects[1].y - 100.0).abs() < f64::EPSILON);
}

#[test]
fn test_undo_redo_round_trip() {
    let mut c = controller();
    draw_rect(&mut c, (0.0, 0.0), (40.0, 40.0));
    let drawn = c.scene().clone();

    let out = c.undo();
    assert!(!out.committed);
    assert!(out.changed().is_some());
    assert!(c.scene().is_empty());
    assert!(!c.store().has_selection());

    c.redo();
    assert_eq!(c.scene(), &drawn);
    assert_eq!(c.history().len(), 2);
}

#[test]
fn test_drag_pushes_once_on_release() {
    let mut c = controller();
    c.set_tool(ToolKind::Rectangle);
    c.handle_pointer(inkboard_core::PointerEvent::Down {
        position: kurbo::Point::new(0.0, 0.0),
        button: inkboard_core::MouseButton::Left,
        modifiers: Modifiers::NONE,
    });
    for step in 1..20 {
        let out = c.handle_pointer(inkboard_core::PointerEvent::Move {
            position: kurbo::Point::new(step as f64 * 5.0, step as f64 * 4.0),
            modifiers: Modifiers::NONE,
        });
        assert!(!out.committed);
    }
    assert_eq!(c.history().len(), 1);
    assert!(c.scene().is_empty());
    assert!(c.overlay().preview.is_some());

    c.handle_pointer(inkboard_core::PointerEvent::Up {
        position: kurbo::Point::new(95.0, 76.0),
        button: inkboard_core::MouseButton::Left,
        modifiers: Modifiers::NONE,
    });
    assert_eq!(c.history().len(), 2);
}
