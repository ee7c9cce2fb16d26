use super::*;
use crate::components::masks::Interaction;
use crate::components::tools::DrawingEngine;

fn arena_with_base(w: u32, h: u32, color: Rgba<u8>) -> (SurfaceArena, SurfaceId) {
    let mut arena = SurfaceArena::new();
    let base = arena.insert_filled(w, h, color);
    (arena, base)
}

fn entity(arena: &mut SurfaceArena, x: f32, y: f32, w: f32, h: f32) -> MaskEntity {
    let s = arena.insert_filled(10, 10, Rgba([255, 255, 255, 255]));
    let mut m = MaskEntity::new("m", s, (10, 10), 1.0).with_pos(Pos2::new(x, y));
    m.size = Vec2::new(w, h);
    m
}

#[test]
fn base_is_stretched_to_frame() {
    let (arena, base) = arena_with_base(2, 2, Rgba([10, 20, 30, 255]));
    let mut frame = RgbaImage::from_pixel(40, 30, Rgba([99, 99, 99, 99]));
    draw_base(&mut frame, &arena, Some(base));
    assert!(frame.pixels().all(|p| *p == Rgba([10, 20, 30, 255])));
}

#[test]
fn missing_base_leaves_cleared_frame() {
    let arena = SurfaceArena::new();
    let mut frame = RgbaImage::from_pixel(4, 4, Rgba([99, 99, 99, 99]));
    draw_base(&mut frame, &arena, None);
    assert!(frame.pixels().all(|p| p[3] == 0));
}

#[test]
fn entity_drawn_at_seventy_percent() {
    let (mut arena, base) = arena_with_base(100, 100, Rgba([0, 0, 0, 255]));
    let masks = vec![entity(&mut arena, 20.0, 20.0, 60.0, 60.0)];
    let mut frame = RgbaImage::new(100, 100);
    render_editor(&mut frame, &arena, Some(base), &masks, None);

    // interior, away from outline and handles
    assert_eq!(frame.get_pixel(50, 50), &Rgba([179, 179, 179, 255]));
    // outside the entity the base is untouched
    assert_eq!(frame.get_pixel(5, 5), &Rgba([0, 0, 0, 255]));
}

#[test]
fn outline_style_tracks_state() {
    let mut arena = SurfaceArena::new();
    let mut m = entity(&mut arena, 0.0, 0.0, 50.0, 50.0);

    let idle = OutlineStyle::for_entity(&m, None);
    assert_eq!((idle.color, idle.width, idle.dash, idle.handles), (STROKE_IDLE, 2.0, None, true));

    let sel = OutlineStyle::for_entity(&m, Some(m.id));
    assert_eq!(sel.color, STROKE_SELECTED);
    assert!(sel.handles);

    m.interaction = Interaction::Resizing { handle: Handle::Se };
    let active = OutlineStyle::for_entity(&m, Some(m.id));
    assert_eq!(active.color, STROKE_ACTIVE);
    assert_eq!(active.width, 3.0);
    assert_eq!(active.dash, Some((5.0, 5.0)));
    assert!(!active.handles);
}

#[test]
fn handles_only_when_idle() {
    let (mut arena, base) = arena_with_base(100, 100, Rgba([0, 0, 0, 255]));
    let mut masks = vec![entity(&mut arena, 30.0, 30.0, 40.0, 40.0)];
    let mut frame = RgbaImage::new(100, 100);

    render_editor(&mut frame, &arena, Some(base), &masks, None);
    // inside the nw handle square but off the outline
    assert_eq!(frame.get_pixel(27, 27), &HANDLE_FILL);

    masks[0].interaction = Interaction::Dragging;
    render_editor(&mut frame, &arena, Some(base), &masks, None);
    assert_eq!(frame.get_pixel(27, 27), &Rgba([0, 0, 0, 255]));
}

#[test]
fn later_entities_draw_on_top() {
    let (mut arena, base) = arena_with_base(100, 100, Rgba([0, 0, 0, 255]));
    let below = entity(&mut arena, 10.0, 10.0, 80.0, 80.0);
    let red = arena.insert_filled(4, 4, Rgba([255, 0, 0, 255]));
    let mut above = MaskEntity::new("red", red, (4, 4), 1.0).with_pos(Pos2::new(40.0, 40.0));
    above.size = Vec2::new(20.0, 20.0);

    let mut frame = RgbaImage::new(100, 100);
    render_editor(&mut frame, &arena, Some(base), &[below, above], None);
    let p = frame.get_pixel(50, 50);
    assert!(p[0] > p[1], "expected red on top, got {p:?}");
}

#[test]
fn drawing_frame_shows_display_layer_and_pen_preview() {
    let (mut arena, base) = arena_with_base(120, 100, Rgba([0, 0, 0, 255]));
    let mut engine = DrawingEngine::default();
    let layers = engine.attach(&mut arena, 120, 100);
    engine.begin_stroke(&mut arena, Pos2::new(100.0, 80.0));
    engine.end_stroke();

    let pen = [Pos2::new(10.0, 10.0), Pos2::new(60.0, 10.0), Pos2::new(30.0, 50.0)];
    let mut frame = RgbaImage::new(120, 100);
    render_drawing(&mut frame, &arena, Some(base), Some(layers), &pen);

    // brush mark tinted cyan over black
    let brush = frame.get_pixel(100, 80);
    assert!(brush[1] > 100 && brush[2] > 100 && brush[0] < 20);
    // vertex marker
    assert_eq!(frame.get_pixel(10, 10)[3], 255);
    let marker = frame.get_pixel(5, 10);
    assert_eq!(marker, &PEN_VERTEX);
    // translucent fill inside the triangle
    let inside = frame.get_pixel(33, 25);
    assert!(inside[0] > 0 && inside[0] < PEN_FILL[0]);
}

#[test]
fn two_pen_points_have_no_fill() {
    let mut frame = RgbaImage::from_pixel(60, 60, Rgba([0, 0, 0, 255]));
    draw_pen_preview(&mut frame, &[Pos2::new(10.0, 10.0), Pos2::new(50.0, 50.0)]);
    // far from the line, nothing changed
    assert_eq!(frame.get_pixel(45, 15), &Rgba([0, 0, 0, 255]));
}

#[test]
fn dest_pixels_clip_and_reject() {
    let r = Rect::from_min_size(Pos2::new(-10.0, 5.0), Vec2::new(30.0, 10.0));
    assert_eq!(dest_pixels(r, 50, 50), Some((0, 5, 20, 15)));
    let off = Rect::from_min_size(Pos2::new(60.0, 60.0), Vec2::new(5.0, 5.0));
    assert_eq!(dest_pixels(off, 50, 50), None);
}
