use super::*;
use image::Rgba;

fn setup() -> (SurfaceArena, Vec<SurfaceId>) {
    let mut arena = SurfaceArena::new();
    let truth = arena.insert_filled(4, 4, Rgba([0, 0, 0, 0]));
    let display = arena.insert_filled(4, 4, Rgba([0, 0, 0, 0]));
    (arena, vec![truth, display])
}

fn paint(arena: &mut SurfaceArena, ids: &[SurfaceId], x: u32, value: u8) {
    for &id in ids {
        if let Some(img) = arena.get_mut(id) {
            img.put_pixel(x, 0, Rgba([value, value, value, 255]));
        }
    }
}

fn pixel(arena: &SurfaceArena, id: SurfaceId, x: u32) -> Rgba<u8> {
    *arena.get(id).unwrap().get_pixel(x, 0)
}

/// One snapshot-then-paint action, the way the drawing engine drives history.
fn action(h: &mut HistoryManager, arena: &mut SurfaceArena, ids: &[SurfaceId], x: u32, v: u8) {
    h.snapshot("Brush", arena, ids);
    paint(arena, ids, x, v);
    h.note_mutation();
}

#[test]
fn starts_empty_at_minus_one() {
    let h = HistoryManager::default();
    assert_eq!(h.index(), -1);
    assert!(h.is_empty());
    assert!(!h.can_undo());
    assert!(!h.can_redo());
}

#[test]
fn two_snapshots_then_undo_leaves_index_zero() {
    let (mut arena, ids) = setup();
    let mut h = HistoryManager::default();
    h.snapshot("a", &arena, &ids);
    h.snapshot("b", &arena, &ids);
    assert_eq!(h.index(), 1);

    assert_eq!(h.undo(&mut arena, &ids).as_deref(), Some("a"));
    assert_eq!(h.index(), 0);

    assert!(h.undo(&mut arena, &ids).is_none());
    assert_eq!(h.index(), 0);
}

#[test]
fn undo_restores_pre_action_pixels_on_every_layer() {
    let (mut arena, ids) = setup();
    let mut h = HistoryManager::default();
    action(&mut h, &mut arena, &ids, 0, 200);
    assert_eq!(pixel(&arena, ids[0], 0)[0], 200);

    assert!(h.can_undo());
    h.undo(&mut arena, &ids);
    for &id in &ids {
        assert_eq!(pixel(&arena, id, 0), Rgba([0, 0, 0, 0]));
    }
}

#[test]
fn undo_then_redo_round_trips() {
    let (mut arena, ids) = setup();
    let mut h = HistoryManager::default();
    action(&mut h, &mut arena, &ids, 0, 10);
    action(&mut h, &mut arena, &ids, 1, 20);
    let before: Vec<RgbaImage> = ids.iter().map(|&id| arena.get(id).unwrap().clone()).collect();

    h.undo(&mut arena, &ids);
    assert!(h.can_redo());
    h.redo(&mut arena);

    for (i, &id) in ids.iter().enumerate() {
        assert_eq!(arena.get(id).unwrap(), &before[i]);
    }
}

#[test]
fn repeated_undo_walks_back_to_the_start() {
    let (mut arena, ids) = setup();
    let mut h = HistoryManager::default();
    action(&mut h, &mut arena, &ids, 0, 10);
    action(&mut h, &mut arena, &ids, 1, 20);
    action(&mut h, &mut arena, &ids, 2, 30);

    h.undo(&mut arena, &ids);
    assert_eq!(pixel(&arena, ids[0], 2)[3], 0);
    assert_eq!(pixel(&arena, ids[0], 1)[0], 20);
    h.undo(&mut arena, &ids);
    assert_eq!(pixel(&arena, ids[0], 1)[3], 0);
    h.undo(&mut arena, &ids);
    assert_eq!(pixel(&arena, ids[0], 0)[3], 0);
    assert!(!h.can_undo());
    assert_eq!(h.redo_count(), 3);
}

#[test]
fn new_action_after_undo_drops_redo_tail() {
    let (mut arena, ids) = setup();
    let mut h = HistoryManager::default();
    action(&mut h, &mut arena, &ids, 0, 10);
    action(&mut h, &mut arena, &ids, 1, 20);
    h.undo(&mut arena, &ids);
    assert!(h.can_redo());

    action(&mut h, &mut arena, &ids, 3, 40);
    assert!(!h.can_redo());
    assert!(h.redo(&mut arena).is_none());

    // undo goes back to the state the new action started from
    h.undo(&mut arena, &ids);
    assert_eq!(pixel(&arena, ids[0], 0)[0], 10);
    assert_eq!(pixel(&arena, ids[0], 1)[3], 0);
    assert_eq!(pixel(&arena, ids[0], 3)[3], 0);
}

#[test]
fn depth_cap_counts_undoable_steps() {
    for (cap, actions) in [(1usize, 1u32), (1, 4), (3, 3), (3, 6), (50, 60)] {
        let (mut arena, ids) = setup();
        let mut h = HistoryManager::new(cap).with_memory_limit(None);
        for i in 0..actions {
            action(&mut h, &mut arena, &ids, i % 4, i as u8 + 1);
        }
        assert!(h.len() <= cap + 1);
        assert_eq!(h.undo_count(), cap.min(actions as usize), "cap {cap}, {actions} actions");

        let mut undos = 0;
        while h.can_undo() {
            assert!(h.undo(&mut arena, &ids).is_some());
            undos += 1;
        }
        assert_eq!(undos, cap.min(actions as usize), "cap {cap}, {actions} actions");
        assert!(h.undo(&mut arena, &ids).is_none());
    }
}

#[test]
fn single_step_cap_still_undoes_and_redoes() {
    let (mut arena, ids) = setup();
    let mut h = HistoryManager::new(1).with_memory_limit(None);
    action(&mut h, &mut arena, &ids, 0, 7);
    action(&mut h, &mut arena, &ids, 1, 8);

    assert!(h.undo(&mut arena, &ids).is_some());
    assert_eq!(pixel(&arena, ids[0], 0)[0], 7);
    assert_eq!(pixel(&arena, ids[0], 1)[3], 0);
    assert!(!h.can_undo());

    assert!(h.redo(&mut arena).is_some());
    assert_eq!(pixel(&arena, ids[1], 1)[0], 8);
}

#[test]
fn memory_cap_keeps_newest() {
    let (mut arena, ids) = setup();
    // one snapshot of both 4x4 layers is 128 bytes
    let mut h = HistoryManager::new(100).with_memory_limit(Some(300));
    for i in 0..5 {
        action(&mut h, &mut arena, &ids, 0, i);
    }
    assert!(h.memory_usage() <= 300);
    assert_eq!(h.len(), 2);
    assert_eq!(h.memory_usage(), 256);
}

#[test]
fn missing_surface_makes_undo_a_no_op() {
    let (mut arena, ids) = setup();
    let mut h = HistoryManager::default();
    h.snapshot("a", &arena, &ids);
    h.snapshot("b", &arena, &ids);
    arena.remove(ids[1]);

    assert!(h.undo(&mut arena, &ids).is_none());
    assert_eq!(h.index(), 1);
}

#[test]
fn clear_resets_everything() {
    let (mut arena, ids) = setup();
    let mut h = HistoryManager::default();
    action(&mut h, &mut arena, &ids, 0, 1);
    h.clear();
    assert_eq!(h.index(), -1);
    assert_eq!(h.memory_usage(), 0);
    assert!(!h.can_undo());
}

#[test]
fn undo_history_lists_labels_newest_first() {
    let (mut arena, ids) = setup();
    let mut h = HistoryManager::default();
    h.snapshot("Brush", &arena, &ids);
    paint(&mut arena, &ids, 0, 1);
    h.note_mutation();
    h.snapshot("Polygon", &arena, &ids);
    paint(&mut arena, &ids, 1, 1);
    h.note_mutation();
    assert_eq!(h.undo_history(), vec!["Polygon".to_string(), "Brush".to_string()]);
    assert_eq!(h.undo_count(), 2);
}
