mod common;

use common::{click, controller, ctrl, draw_rect, drag, press, shift};
use inkboard_core::shapes::{Anchor, AnchorSide, Circle, ShapeTrait};
use inkboard_core::{
    CanvasValue, EditorConfig, InteractionController, Modifiers, Snapshot, ToolKind,
};
use kurbo::{Point, Vec2};

#[test]
fn test_draw_rectangle() {
    let mut c = controller();
    let out = draw_rect(&mut c, (10.0, 10.0), (110.0, 90.0));

    assert!(out.committed);
    assert!(out.changed().is_some());
    let rects = &c.scene().rects;
    assert_eq!(rects.len(), 1);
    assert!((rects[0].x - 10.0).abs() < f64::EPSILON);
    assert!((rects[0].y - 10.0).abs() < f64::EPSILON);
    assert!((rects[0].width - 100.0).abs() < f64::EPSILON);
    assert!((rects[0].height - 80.0).abs() < f64::EPSILON);
    assert_eq!(c.history().len(), 2);
}

#[test]
fn test_deleting_anchored_rect_removes_connector() {
    let mut c = controller();
    draw_rect(&mut c, (0.0, 0.0), (100.0, 80.0));
    draw_rect(&mut c, (200.0, 0.0), (300.0, 80.0));

    c.set_tool(ToolKind::Arrow);
    let out = drag(&mut c, (100.0, 40.0), (200.0, 40.0), Modifiers::NONE);
    assert!(out.committed);
    assert!(c.scene().lines.is_empty());
    assert!(c.scene().arrows.is_empty());
    let connector = &c.scene().connectors[0];
    assert_eq!(connector.from.side(), AnchorSide::Right);
    assert_eq!(connector.to.side(), AnchorSide::Left);

    c.set_tool(ToolKind::Select);
    click(&mut c, (30.0, 40.0));
    assert_eq!(c.store().selection().len(), 1);
    let out = press(&mut c, "Delete", Modifiers::NONE);

    assert!(out.committed);
    assert_eq!(c.scene().rects.len(), 1);
    assert!(c.scene().connectors.is_empty());
    assert_eq!(c.history().len(), 5);
    // The committed entry never holds a dangling connector.
    assert!(c.history().current().is_some_and(|e| e.connectors.is_empty()));
}

#[test]
fn test_shift_corner_resize_keeps_circle_round() {
    let mut snapshot = Snapshot::default();
    snapshot.circles.push(Circle::new(Point::new(100.0, 100.0), 50.0, 30.0));
    let mut c = InteractionController::new(
        EditorConfig::default(),
        Some(CanvasValue {
            pan: Vec2::ZERO,
            zoom: 1.0,
            snapshot,
        }),
    );

    let out = click(&mut c, (100.0, 100.0));
    assert!(!out.committed);
    assert_eq!(c.store().selection().len(), 1);

    // Bottom-right corner handle of the (50,70)-(150,130) box.
    let out = drag(&mut c, (150.0, 130.0), (170.0, 150.0), shift());
    assert!(out.committed);
    let circle = &c.scene().circles[0];
    assert!((circle.rx - circle.ry).abs() < 1e-9);
    assert!((circle.rx - 60.0).abs() < 1e-9);
    assert_eq!(c.history().len(), 2);
}

#[test]
fn test_undo_at_start_is_noop() {
    let mut c = controller();
    let before = c.scene().clone();
    let out = c.undo();
    assert!(!out.committed);
    assert!(out.effects.is_empty());
    assert_eq!(c.scene(), &before);
    assert_eq!(c.history().cursor(), 0);

    press(&mut c, "z", ctrl());
    assert_eq!(c.history().cursor(), 0);
}

#[test]
fn test_move_applies_against_drag_start() {
    let mut c = controller();
    draw_rect(&mut c, (0.0, 0.0), (50.0, 50.0));
    c.set_tool(ToolKind::Select);

    c.handle_pointer(inkboard_core::PointerEvent::Down {
        position: Point::new(25.0, 25.0),
        button: inkboard_core::MouseButton::Left,
        modifiers: Modifiers::NONE,
    });
    for step in 1..=10 {
        c.handle_pointer(inkboard_core::PointerEvent::Move {
            position: Point::new(25.0 + step as f64 * 3.0, 25.0),
            modifiers: Modifiers::NONE,
        });
    }
    let out = c.handle_pointer(inkboard_core::PointerEvent::Up {
        position: Point::new(55.0, 25.0),
        button: inkboard_core::MouseButton::Left,
        modifiers: Modifiers::NONE,
    });

    assert!(out.committed);
    assert!((c.scene().rects[0].x - 30.0).abs() < 1e-9);
    assert_eq!(c.history().len(), 3);
}

#[test]
fn test_pointer_cancel_commits_like_up() {
    let mut c = controller();
    c.set_tool(ToolKind::Rectangle);
    c.handle_pointer(inkboard_core::PointerEvent::Down {
        position: Point::new(0.0, 0.0),
        button: inkboard_core::MouseButton::Left,
        modifiers: Modifiers::NONE,
    });
    c.handle_pointer(inkboard_core::PointerEvent::Move {
        position: Point::new(40.0, 40.0),
        modifiers: Modifiers::NONE,
    });
    let out = c.handle_pointer(inkboard_core::PointerEvent::Cancel {
        position: Point::new(40.0, 40.0),
    });
    assert!(out.committed);
    assert!(!c.is_dragging());
    assert_eq!(c.scene().rects.len(), 1);
}

#[test]
fn test_rubber_band_selects_fully_contained_only() {
    let mut c = controller();
    draw_rect(&mut c, (10.0, 10.0), (40.0, 40.0));
    draw_rect(&mut c, (60.0, 10.0), (140.0, 40.0));
    c.set_tool(ToolKind::Select);

    let out = drag(&mut c, (0.0, 0.0), (100.0, 100.0), Modifiers::NONE);
    assert!(!out.committed);
    assert_eq!(c.store().selection().len(), 1);
    assert_eq!(c.store().selection()[0].index, 0);
}

fn alt() -> Modifiers {
    Modifiers {
        alt: true,
        ..Modifiers::NONE
    }
}

#[test]
fn test_connector_skips_origin_handle_for_nearby_shape() {
    let mut c = controller();
    draw_rect(&mut c, (0.0, 0.0), (100.0, 100.0));
    draw_rect(&mut c, (110.0, 0.0), (210.0, 100.0));
    let target = c.scene().rects[1].id().clone();

    c.set_tool(ToolKind::Arrow);
    c.handle_pointer(inkboard_core::PointerEvent::Down {
        position: Point::new(100.0, 50.0),
        button: inkboard_core::MouseButton::Left,
        modifiers: Modifiers::NONE,
    });
    c.handle_pointer(inkboard_core::PointerEvent::Move {
        position: Point::new(104.0, 50.0),
        modifiers: Modifiers::NONE,
    });
    assert_eq!(c.overlay().hover_anchor, Some(Point::new(110.0, 50.0)));
    let out = c.handle_pointer(inkboard_core::PointerEvent::Up {
        position: Point::new(104.0, 50.0),
        button: inkboard_core::MouseButton::Left,
        modifiers: Modifiers::NONE,
    });

    assert!(out.committed);
    let connector = &c.scene().connectors[0];
    assert!(connector.to.references(&target));
    assert_eq!(connector.to.side(), AnchorSide::Left);
}

#[test]
fn test_connector_commits_onto_edge_with_percent() {
    let mut c = controller();
    draw_rect(&mut c, (0.0, 0.0), (100.0, 80.0));
    draw_rect(&mut c, (200.0, 0.0), (300.0, 200.0));
    let target = c.scene().rects[1].id().clone();

    c.set_tool(ToolKind::Arrow);
    let out = drag(&mut c, (100.0, 40.0), (195.0, 40.0), Modifiers::NONE);
    assert!(out.committed);
    match &c.scene().connectors[0].to {
        Anchor::Shape {
            shape_id,
            side,
            percent,
            ..
        } => {
            assert_eq!(shape_id, &target);
            assert_eq!(*side, AnchorSide::Left);
            assert!(percent.is_some_and(|p| (p - 0.2).abs() < 1e-9));
        }
        Anchor::Point { .. } => panic!("expected an edge anchor"),
    }
}

#[test]
fn test_dragging_connector_end_re_anchors_it() {
    let mut c = controller();
    draw_rect(&mut c, (0.0, 0.0), (100.0, 80.0));
    draw_rect(&mut c, (200.0, 0.0), (300.0, 80.0));
    draw_rect(&mut c, (200.0, 200.0), (300.0, 280.0));
    let source = c.scene().rects[0].id().clone();
    let target = c.scene().rects[2].id().clone();
    c.set_tool(ToolKind::Arrow);
    drag(&mut c, (100.0, 40.0), (200.0, 40.0), Modifiers::NONE);
    assert_eq!(c.history().len(), 5);

    c.set_tool(ToolKind::Select);
    click(&mut c, (150.0, 40.0));
    assert_eq!(c.store().selection().len(), 1);
    let out = drag(&mut c, (200.0, 40.0), (250.0, 195.0), Modifiers::NONE);

    assert!(out.committed);
    assert_eq!(c.history().len(), 6);
    let connector = &c.scene().connectors[0];
    assert!(connector.from.references(&source));
    assert!(connector.to.references(&target));
    assert_eq!(connector.to.side(), AnchorSide::Top);
}

#[test]
fn test_alt_drag_moves_a_copy() {
    let mut c = controller();
    draw_rect(&mut c, (0.0, 0.0), (50.0, 50.0));
    let original = c.scene().rects[0].id().clone();
    c.set_tool(ToolKind::Select);

    let out = drag(&mut c, (25.0, 25.0), (75.0, 25.0), alt());

    assert!(out.committed);
    assert_eq!(c.history().len(), 3);
    let rects = &c.scene().rects;
    assert_eq!(rects.len(), 2);
    assert_eq!(rects[0].id(), &original);
    assert!(rects[0].x.abs() < f64::EPSILON);
    assert_ne!(rects[1].id(), &original);
    assert!((rects[1].x - 50.0).abs() < 1e-9);
    assert_eq!(&c.store().selection()[0].id, rects[1].id());
}

#[test]
fn test_shift_pencil_commits_axis_aligned_segments() {
    let mut c = controller();
    c.set_tool(ToolKind::Pencil);
    c.handle_pointer(inkboard_core::PointerEvent::Down {
        position: Point::new(0.0, 0.0),
        button: inkboard_core::MouseButton::Left,
        modifiers: shift(),
    });
    for (x, y) in [(50.0, 5.0), (52.0, 40.0)] {
        c.handle_pointer(inkboard_core::PointerEvent::Move {
            position: Point::new(x, y),
            modifiers: shift(),
        });
    }
    let out = c.handle_pointer(inkboard_core::PointerEvent::Up {
        position: Point::new(52.0, 40.0),
        button: inkboard_core::MouseButton::Left,
        modifiers: shift(),
    });

    assert!(out.committed);
    assert_eq!(
        c.scene().paths[0].points,
        vec![Point::new(0.0, 0.0), Point::new(50.0, 0.0), Point::new(50.0, 40.0)]
    );
}

#[test]
fn test_rubber_band_touching_shape_edges_selects_it() {
    let mut c = controller();
    draw_rect(&mut c, (10.0, 10.0), (40.0, 40.0));
    c.set_tool(ToolKind::Select);
    drag(&mut c, (0.0, 0.0), (40.0, 40.0), Modifiers::NONE);
    assert_eq!(c.store().selection().len(), 1);
}
