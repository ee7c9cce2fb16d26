use super::*;
use chrono::TimeZone;
use image::Rgba;

#[test]
fn fit_scales_down_preserving_aspect() {
    assert_eq!(fit_within(1600, 1200, 800, 600), (800, 600));
    assert_eq!(fit_within(4000, 1000, 800, 600), (800, 200));
    assert_eq!(fit_within(1000, 3000, 800, 600), (200, 600));
}

#[test]
fn fit_scales_small_images_up() {
    assert_eq!(fit_within(400, 300, 800, 600), (800, 600));
    assert_eq!(fit_within(100, 50, 800, 600), (800, 400));
}

#[test]
fn fit_never_returns_zero() {
    assert_eq!(fit_within(10000, 1, 800, 600), (800, 1));
    assert_eq!(fit_within(0, 0, 800, 600), (1, 1));
}

#[test]
fn fit_image_resamples_only_when_needed() {
    let img = RgbaImage::from_pixel(800, 600, Rgba([1, 2, 3, 255]));
    let same = fit_image(img.clone(), 800, 600);
    assert_eq!(same, img);

    let big = RgbaImage::from_pixel(1600, 1200, Rgba([9, 9, 9, 255]));
    let fitted = fit_image(big, 800, 600);
    assert_eq!(fitted.dimensions(), (800, 600));
    assert_eq!(fitted.get_pixel(400, 300), &Rgba([9, 9, 9, 255]));
}

#[test]
fn png_encode_decode_keeps_pixels() {
    let mut img = RgbaImage::from_pixel(5, 3, Rgba([0, 0, 0, 255]));
    img.put_pixel(2, 1, Rgba([255, 255, 255, 255]));
    let bytes = encode_png(&img).unwrap();
    assert_eq!(&bytes[1..4], b"PNG");
    assert_eq!(decode_image(&bytes).unwrap(), img);
}

#[test]
fn garbage_bytes_are_an_image_error() {
    assert!(matches!(decode_image(b"not an image"), Err(MaskError::Image(_))));
}

#[test]
fn write_png_creates_parent_dirs() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("out.png");
    let img = RgbaImage::from_pixel(4, 4, Rgba([255, 255, 255, 255]));
    write_png(&img, &path).unwrap();
    assert_eq!(load_image(&path).unwrap(), img);
}

#[test]
fn export_names() {
    let at = Local.with_ymd_and_hms(2024, 3, 9, 7, 5, 1).unwrap();
    assert_eq!(drawn_mask_name(at), "mask-20240309-070501.png");
    assert_eq!(preview_name(at), "preview-20240309-070501.png");
    assert_eq!(PLACED_MASK_FILE, "mask-result.png");
}
