use super::*;

#[test]
fn insert_get_remove() {
    let mut arena = SurfaceArena::new();
    let id = arena.insert_filled(4, 3, Rgba([1, 2, 3, 4]));
    assert_eq!(arena.get(id).map(|i| i.dimensions()), Some((4, 3)));
    assert!(arena.contains(id));

    let img = arena.remove(id).unwrap();
    assert_eq!(img.get_pixel(0, 0), &Rgba([1, 2, 3, 4]));
    assert!(arena.get(id).is_none());
    assert!(!arena.contains(id));
}

#[test]
fn stale_handle_does_not_see_reused_slot() {
    let mut arena = SurfaceArena::new();
    let old = arena.insert_filled(1, 1, Rgba([0, 0, 0, 0]));
    arena.remove(old);
    let new = arena.insert_filled(2, 2, Rgba([9, 9, 9, 9]));

    assert_ne!(old, new);
    assert!(arena.get(old).is_none());
    assert!(arena.get_mut(old).is_none());
    assert!(arena.get(new).is_some());
}

#[test]
fn blend_pixel_fast_paths() {
    let base = Rgba([10, 20, 30, 255]);
    assert_eq!(blend_pixel(base, Rgba([255, 0, 0, 0]), 1.0), base);
    assert_eq!(blend_pixel(base, Rgba([255, 0, 0, 255]), 1.0), Rgba([255, 0, 0, 255]));
    assert_eq!(blend_pixel(base, Rgba([255, 0, 0, 255]), 0.0), base);
}

#[test]
fn blend_pixel_half_opacity_over_opaque() {
    let out = blend_pixel(Rgba([0, 0, 0, 255]), Rgba([200, 100, 0, 255]), 0.5);
    assert_eq!(out, Rgba([100, 50, 0, 255]));
}

#[test]
fn blend_at_ignores_out_of_bounds() {
    let mut img = RgbaImage::new(2, 2);
    blend_at(&mut img, -1, 0, Rgba([255, 255, 255, 255]), 1.0);
    blend_at(&mut img, 0, 5, Rgba([255, 255, 255, 255]), 1.0);
    assert!(img.pixels().all(|p| p[3] == 0));

    blend_at(&mut img, 1, 1, Rgba([1, 2, 3, 255]), 1.0);
    assert_eq!(img.get_pixel(1, 1), &Rgba([1, 2, 3, 255]));
}

#[test]
fn color_image_keeps_size_and_pixels() {
    let img = RgbaImage::from_pixel(3, 2, Rgba([10, 20, 30, 255]));
    let ci = rgba_image_to_color_image(&img);
    assert_eq!(ci.size, [3, 2]);
    assert_eq!(ci.pixels.len(), 6);
    assert_eq!(ci.pixels[0], Color32::from_rgb(10, 20, 30));
}
