use super::*;
use crate::canvas::SurfaceArena;
use image::Rgba;

fn masks(rects: &[(f32, f32, f32, f32)]) -> Vec<MaskEntity> {
    let mut arena = SurfaceArena::new();
    rects
        .iter()
        .map(|&(x, y, w, h)| {
            let s = arena.insert_filled(10, 10, Rgba([255, 255, 255, 255]));
            let mut m = MaskEntity::new("m", s, (10, 10), 1.0).with_pos(Pos2::new(x, y));
            m.size = Vec2::new(w, h);
            m
        })
        .collect()
}

fn rect(x: f32, y: f32, w: f32, h: f32) -> Rect {
    Rect::from_min_size(Pos2::new(x, y), Vec2::new(w, h))
}

// =============================================================
// Drag
// =============================================================

#[test]
fn body_down_starts_drag_and_selects() {
    let mut ms = masks(&[(50.0, 50.0, 100.0, 100.0)]);
    let mut sel = None;
    let mut c = TransformController::default();

    let r = c.dispatch(&mut ms, &mut sel, PointerEvent::Down(Pos2::new(80.0, 90.0)));
    assert!(r.changed);
    assert_eq!(r.cursor, CursorHint::Grab);
    assert_eq!(sel, Some(ms[0].id));
    assert_eq!(ms[0].interaction, Interaction::Dragging);
    assert_eq!(
        c.state(),
        TransformState::Dragging { id: ms[0].id, offset: Vec2::new(30.0, 40.0) }
    );
}

#[test]
fn drag_is_absolute_pointer_minus_offset() {
    let mut ms = masks(&[(50.0, 50.0, 100.0, 100.0)]);
    let mut sel = None;
    let mut c = TransformController::default();
    c.dispatch(&mut ms, &mut sel, PointerEvent::Down(Pos2::new(60.0, 60.0)));

    for step in 1..=50 {
        let p = Pos2::new(60.0 + step as f32 * 0.7, 60.0 + step as f32 * 1.3);
        c.dispatch(&mut ms, &mut sel, PointerEvent::Move(p));
    }
    c.dispatch(&mut ms, &mut sel, PointerEvent::Move(Pos2::new(200.0, 10.0)));
    assert_eq!(ms[0].pos, Pos2::new(190.0, 0.0));
    assert_eq!(ms[0].size, Vec2::new(100.0, 100.0));
}

#[test]
fn up_and_leave_clear_all_flags() {
    for end in [PointerEvent::Up, PointerEvent::Leave] {
        let mut ms = masks(&[(0.0, 0.0, 50.0, 50.0)]);
        let mut sel = None;
        let mut c = TransformController::default();
        c.dispatch(&mut ms, &mut sel, PointerEvent::Down(Pos2::new(25.0, 25.0)));

        let r = c.dispatch(&mut ms, &mut sel, end);
        assert!(r.changed);
        assert!(c.is_idle());
        assert!(ms.iter().all(|m| m.interaction == Interaction::Idle));
        // selection survives the end of the gesture
        assert_eq!(sel, Some(ms[0].id));
    }
}

#[test]
fn down_on_empty_canvas_clears_selection() {
    let mut ms = masks(&[(0.0, 0.0, 50.0, 50.0)]);
    let mut sel = Some(ms[0].id);
    let mut c = TransformController::default();
    let r = c.dispatch(&mut ms, &mut sel, PointerEvent::Down(Pos2::new(300.0, 300.0)));
    assert!(r.changed);
    assert!(sel.is_none());
    assert!(c.is_idle());
}

#[test]
fn only_one_entity_is_ever_active() {
    let mut ms = masks(&[(0.0, 0.0, 100.0, 100.0), (200.0, 0.0, 100.0, 100.0)]);
    let mut sel = None;
    let mut c = TransformController::default();
    ms[0].interaction = Interaction::Dragging;

    c.dispatch(&mut ms, &mut sel, PointerEvent::Down(Pos2::new(250.0, 50.0)));
    let active = ms.iter().filter(|m| m.is_transforming()).count();
    assert_eq!(active, 1);
    assert_eq!(ms[0].interaction, Interaction::Idle);
    assert_eq!(c.active_id(), Some(ms[1].id));
}

// =============================================================
// Resize
// =============================================================

#[test]
fn handle_down_records_start_bounds() {
    let mut ms = masks(&[(50.0, 50.0, 100.0, 100.0)]);
    let mut sel = None;
    let mut c = TransformController::default();
    let r = c.dispatch(&mut ms, &mut sel, PointerEvent::Down(Pos2::new(151.0, 149.0)));
    assert_eq!(r.cursor, CursorHint::ResizeNwSe);
    assert_eq!(
        c.state(),
        TransformState::Resizing {
            id: ms[0].id,
            handle: Handle::Se,
            start_pointer: Pos2::new(151.0, 149.0),
            start_bounds: rect(50.0, 50.0, 100.0, 100.0),
        }
    );
    assert_eq!(ms[0].interaction, Interaction::Resizing { handle: Handle::Se });
}

#[test]
fn corner_formulas_keep_opposite_corner() {
    let start = rect(100.0, 100.0, 80.0, 60.0);
    let d = Vec2::new(10.0, -5.0);

    assert_eq!(resize_bounds(start, Handle::Nw, d), rect(110.0, 95.0, 70.0, 65.0));
    assert_eq!(resize_bounds(start, Handle::Ne, d), rect(100.0, 95.0, 90.0, 65.0));
    assert_eq!(resize_bounds(start, Handle::Sw, d), rect(110.0, 100.0, 70.0, 55.0));
    assert_eq!(resize_bounds(start, Handle::Se, d), rect(100.0, 100.0, 90.0, 55.0));
}

#[test]
fn extreme_deltas_clamp_to_minimum() {
    let start = rect(100.0, 100.0, 80.0, 60.0);
    for handle in Handle::ALL {
        for d in [Vec2::new(1e6, 1e6), Vec2::new(-1e6, -1e6), Vec2::new(1e6, -1e6)] {
            let r = resize_bounds(start, handle, d);
            assert!(r.width() >= MIN_MASK_SIZE, "{handle:?} {d:?}");
            assert!(r.height() >= MIN_MASK_SIZE, "{handle:?} {d:?}");
        }
    }
    // nw collapse pins the bottom-right corner
    let r = resize_bounds(start, Handle::Nw, Vec2::new(500.0, 500.0));
    assert_eq!(r.max, start.max);
    assert_eq!(r.size(), Vec2::new(MIN_MASK_SIZE, MIN_MASK_SIZE));
}

#[test]
fn resize_via_dispatch_uses_start_pointer() {
    let mut ms = masks(&[(50.0, 50.0, 100.0, 100.0)]);
    let mut sel = None;
    let mut c = TransformController::default();
    c.dispatch(&mut ms, &mut sel, PointerEvent::Down(Pos2::new(50.0, 50.0)));
    c.dispatch(&mut ms, &mut sel, PointerEvent::Move(Pos2::new(40.0, 45.0)));
    c.dispatch(&mut ms, &mut sel, PointerEvent::Move(Pos2::new(30.0, 20.0)));
    assert_eq!(ms[0].bounds(), rect(30.0, 20.0, 120.0, 130.0));
}

// =============================================================
// Idle hover
// =============================================================

#[test]
fn idle_move_only_reports_cursor() {
    let mut ms = masks(&[(50.0, 50.0, 100.0, 100.0)]);
    let before = ms[0].bounds();
    let mut sel = None;
    let mut c = TransformController::default();

    let r = c.dispatch(&mut ms, &mut sel, PointerEvent::Move(Pos2::new(150.0, 50.0)));
    assert_eq!(r.cursor, CursorHint::ResizeNeSw);
    assert!(!r.changed);

    let r = c.dispatch(&mut ms, &mut sel, PointerEvent::Move(Pos2::new(100.0, 100.0)));
    assert_eq!(r.cursor, CursorHint::Grab);

    let r = c.dispatch(&mut ms, &mut sel, PointerEvent::Move(Pos2::new(0.0, 0.0)));
    assert_eq!(r.cursor, CursorHint::Default);

    assert_eq!(ms[0].bounds(), before);
    assert!(sel.is_none());
}

#[test]
fn entity_removed_mid_drag_returns_to_idle() {
    let mut ms = masks(&[(0.0, 0.0, 50.0, 50.0)]);
    let mut sel = None;
    let mut c = TransformController::default();
    c.dispatch(&mut ms, &mut sel, PointerEvent::Down(Pos2::new(25.0, 25.0)));

    let mut empty: Vec<MaskEntity> = Vec::new();
    let r = c.dispatch(&mut empty, &mut sel, PointerEvent::Move(Pos2::new(30.0, 30.0)));
    assert!(!r.changed);
    assert!(c.is_idle());
}
