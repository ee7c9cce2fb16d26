use super::*;
use crate::canvas::SurfaceArena;
use egui::Vec2;
use image::Rgba;

fn mask_at(arena: &mut SurfaceArena, x: f32, y: f32, w: f32, h: f32) -> MaskEntity {
    let surface = arena.insert_filled(10, 10, Rgba([255, 255, 255, 255]));
    let mut m = MaskEntity::new("m", surface, (10, 10), 1.0).with_pos(Pos2::new(x, y));
    m.size = Vec2::new(w, h);
    m
}

// =============================================================
// Single entity
// =============================================================

#[test]
fn miss_gives_none_and_default_cursor() {
    let mut arena = SurfaceArena::new();
    let masks = vec![mask_at(&mut arena, 50.0, 50.0, 60.0, 60.0)];
    let hit = hit_test(&masks, Pos2::new(5.0, 5.0));
    assert!(hit.is_none());
    assert_eq!(CursorHint::for_hit(hit), CursorHint::Default);
}

#[test]
fn body_hit_is_inclusive_of_edges() {
    let mut arena = SurfaceArena::new();
    let masks = vec![mask_at(&mut arena, 50.0, 50.0, 100.0, 100.0)];
    let hit = hit_test(&masks, Pos2::new(150.0, 100.0)).unwrap();
    // right edge midpoint is far from every corner
    assert_eq!(hit.part, HitPart::Body);
    assert_eq!(CursorHint::for_hit(Some(hit)), CursorHint::Grab);
}

#[test]
fn each_corner_maps_to_its_handle() {
    let mut arena = SurfaceArena::new();
    let masks = vec![mask_at(&mut arena, 50.0, 50.0, 100.0, 100.0)];
    let cases = [
        (Pos2::new(50.0, 50.0), Handle::Nw),
        (Pos2::new(150.0, 50.0), Handle::Ne),
        (Pos2::new(50.0, 150.0), Handle::Sw),
        (Pos2::new(150.0, 150.0), Handle::Se),
    ];
    for (p, expected) in cases {
        assert_eq!(hit_test(&masks, p).unwrap().part, HitPart::Handle(expected));
    }
}

#[test]
fn handle_tolerance_extends_outside_the_body() {
    let mut arena = SurfaceArena::new();
    let masks = vec![mask_at(&mut arena, 50.0, 50.0, 100.0, 100.0)];
    let hit = hit_test(&masks, Pos2::new(42.0, 42.0)).unwrap();
    assert_eq!(hit.part, HitPart::Handle(Handle::Nw));
    assert!(hit_test(&masks, Pos2::new(41.9, 42.0)).is_none());
}

#[test]
fn tiny_entity_prefers_nw_when_corners_overlap() {
    let mut arena = SurfaceArena::new();
    let masks = vec![mask_at(&mut arena, 0.0, 0.0, 4.0, 4.0)];
    assert_eq!(
        hit_test(&masks, Pos2::new(2.0, 2.0)).unwrap().part,
        HitPart::Handle(Handle::Nw)
    );
}

#[test]
fn resize_cursors_by_diagonal() {
    let hit = |h| Some(Hit { id: Uuid::nil(), index: 0, part: HitPart::Handle(h) });
    assert_eq!(CursorHint::for_hit(hit(Handle::Nw)), CursorHint::ResizeNwSe);
    assert_eq!(CursorHint::for_hit(hit(Handle::Se)), CursorHint::ResizeNwSe);
    assert_eq!(CursorHint::for_hit(hit(Handle::Ne)), CursorHint::ResizeNeSw);
    assert_eq!(CursorHint::for_hit(hit(Handle::Sw)), CursorHint::ResizeNeSw);
    assert_eq!(CursorHint::Grab.icon(), CursorIcon::Grab);
}

// =============================================================
// Stacking
// =============================================================

#[test]
fn topmost_entity_wins_over_earlier_overlap() {
    let mut arena = SurfaceArena::new();
    let masks = vec![
        mask_at(&mut arena, 0.0, 0.0, 200.0, 200.0),
        mask_at(&mut arena, 80.0, 80.0, 50.0, 50.0),
    ];
    let hit = hit_test(&masks, Pos2::new(100.0, 100.0)).unwrap();
    assert_eq!(hit.index, 1);
    assert_eq!(hit.id, masks[1].id);
}

#[test]
fn body_of_upper_entity_beats_handle_of_lower_entity() {
    let mut arena = SurfaceArena::new();
    let masks = vec![
        mask_at(&mut arena, 100.0, 100.0, 50.0, 50.0),
        mask_at(&mut arena, 60.0, 60.0, 100.0, 100.0),
    ];
    // (100,100) is the lower entity's nw corner but inside the upper body
    let hit = hit_test(&masks, Pos2::new(100.0, 100.0)).unwrap();
    assert_eq!(hit.index, 1);
    assert_eq!(hit.part, HitPart::Body);
}

#[test]
fn pointer_outside_upper_falls_through_to_lower() {
    let mut arena = SurfaceArena::new();
    let masks = vec![
        mask_at(&mut arena, 0.0, 0.0, 300.0, 300.0),
        mask_at(&mut arena, 20.0, 20.0, 40.0, 40.0),
    ];
    let hit = hit_test(&masks, Pos2::new(200.0, 200.0)).unwrap();
    assert_eq!(hit.index, 0);
}
