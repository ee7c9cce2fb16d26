//! Raster primitives shared by the drawing engine and the renderer.
//!
//! Coverage is decided at pixel centres: pixel `(x, y)` belongs to a shape
//! when `(x + 0.5, y + 0.5)` lies inside it. Everything clips to the image.

use eframe::egui;
use egui::{Pos2, Rect};
use font8x8::{UnicodeFonts, BASIC_FONTS};
use image::{Rgba, RgbaImage};

use crate::canvas::{blend_at, blend_pixel};

/// How a primitive writes into its target.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Paint {
    /// Replace the pixel. Used for the truth and display layers so repeated
    /// strokes never accumulate.
    Overwrite(Rgba<u8>),
    /// Source-over at the given opacity. Used for previews and overlays.
    Blend(Rgba<u8>, f32),
}

impl Paint {
    #[inline]
    fn apply(self, img: &mut RgbaImage, x: u32, y: u32) {
        match self {
            Paint::Overwrite(c) => img.put_pixel(x, y, c),
            Paint::Blend(c, opacity) => {
                let px = img.get_pixel_mut(x, y);
                *px = blend_pixel(*px, c, opacity);
            }
        }
    }
}

/// Dash pattern `(on, off)` in canvas pixels.
pub type Dash = (f32, f32);

// ============================================================================
// DISCS
// ============================================================================

/// Fill every pixel whose centre is within `radius` of `center`.
pub fn fill_disc(img: &mut RgbaImage, center: Pos2, radius: f32, paint: Paint) {
    let (w, h) = img.dimensions();
    if w == 0 || h == 0 || !(radius > 0.0) {
        return;
    }
    let min_x = ((center.x - radius - 0.5).floor().max(0.0)) as u32;
    let min_y = ((center.y - radius - 0.5).floor().max(0.0)) as u32;
    let max_x = (center.x + radius).ceil().min(w as f32 - 1.0);
    let max_y = (center.y + radius).ceil().min(h as f32 - 1.0);
    if max_x < 0.0 || max_y < 0.0 {
        return;
    }
    let r2 = radius * radius;
    for y in min_y..=max_y as u32 {
        let dy = y as f32 + 0.5 - center.y;
        for x in min_x..=max_x as u32 {
            let dx = x as f32 + 0.5 - center.x;
            if dx * dx + dy * dy <= r2 {
                paint.apply(img, x, y);
            }
        }
    }
}

/// Discs stamped along `a → b` close enough together to leave no gaps.
pub fn fill_capsule(img: &mut RgbaImage, a: Pos2, b: Pos2, radius: f32, paint: Paint) {
    let dist = a.distance(b);
    let spacing = (radius * 0.5).max(0.5);
    let steps = (dist / spacing).ceil().max(1.0) as u32;
    for i in 0..=steps {
        let t = i as f32 / steps as f32;
        fill_disc(img, a.lerp(b, t), radius, paint);
    }
}

// ============================================================================
// POLYGONS
// ============================================================================

/// Horizontal runs `(y, x_start, x_end_exclusive)` covered by the polygon,
/// using even-odd scanline intersection at pixel-row centres.
pub fn polygon_spans(points: &[Pos2], width: u32, height: u32) -> Vec<(u32, u32, u32)> {
    let mut spans = Vec::new();
    let n = points.len();
    if n < 3 || width == 0 || height == 0 {
        return spans;
    }

    let min_y = points.iter().map(|p| p.y).fold(f32::INFINITY, f32::min);
    let max_y = points.iter().map(|p| p.y).fold(f32::NEG_INFINITY, f32::max);
    let y_start = (min_y - 0.5).floor().max(0.0) as u32;
    let y_end = ((max_y + 0.5).ceil().max(0.0) as u32).min(height);

    let mut nodes: Vec<f32> = Vec::with_capacity(n);
    for y in y_start..y_end {
        let yf = y as f32 + 0.5;
        nodes.clear();
        for i in 0..n {
            let j = (i + 1) % n;
            let (pi, pj) = (points[i], points[j]);
            if (pi.y < yf && pj.y >= yf) || (pj.y < yf && pi.y >= yf) {
                let t = (yf - pi.y) / (pj.y - pi.y);
                nodes.push(pi.x + t * (pj.x - pi.x));
            }
        }
        nodes.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

        for pair in nodes.chunks_exact(2) {
            // pixel x is inside when x + 0.5 ∈ [x0, x1)
            let x0 = (pair[0] - 0.5).ceil().clamp(0.0, width as f32) as u32;
            let x1 = (pair[1] - 0.5).ceil().clamp(0.0, width as f32) as u32;
            if x1 > x0 {
                spans.push((y, x0, x1));
            }
        }
    }
    spans
}

pub fn fill_polygon(img: &mut RgbaImage, points: &[Pos2], paint: Paint) {
    let (w, h) = img.dimensions();
    for (y, x0, x1) in polygon_spans(points, w, h) {
        for x in x0..x1 {
            paint.apply(img, x, y);
        }
    }
}

// ============================================================================
// STROKES
// ============================================================================

/// Line of the given width, optionally dashed. The dash phase starts at `a`.
pub fn stroke_line(
    img: &mut RgbaImage,
    a: Pos2,
    b: Pos2,
    width: f32,
    paint: Paint,
    dash: Option<Dash>,
) {
    stroke_line_from(img, a, b, width, paint, dash, 0.0);
}

/// Like [`stroke_line`] with the dash pattern advanced by `phase`.
/// Returns the phase at `b` so polylines keep a continuous pattern.
fn stroke_line_from(
    img: &mut RgbaImage,
    a: Pos2,
    b: Pos2,
    width: f32,
    paint: Paint,
    dash: Option<Dash>,
    phase: f32,
) -> f32 {
    let radius = (width * 0.5).max(0.75);
    let len = a.distance(b);
    let steps = (len * 2.0).ceil().max(1.0) as u32;
    let samples = (0..=steps).filter_map(|i| {
        let t = i as f32 / steps as f32;
        let along = phase + len * t;
        if let Some((on, off)) = dash {
            let period = on + off;
            if period > 0.0 && along % period >= on {
                return None;
            }
        }
        Some(a.lerp(b, t))
    });

    match paint {
        Paint::Overwrite(_) => {
            for c in samples {
                fill_disc(img, c, radius, paint);
            }
        }
        Paint::Blend(..) => {
            // Coverage is gathered first so overlapping discs blend only once.
            let (w, h) = img.dimensions();
            let pad = radius + 1.0;
            let ox = (a.x.min(b.x) - pad).floor().clamp(0.0, w as f32) as u32;
            let oy = (a.y.min(b.y) - pad).floor().clamp(0.0, h as f32) as u32;
            let ex = (a.x.max(b.x) + pad).ceil().clamp(0.0, w as f32) as u32;
            let ey = (a.y.max(b.y) + pad).ceil().clamp(0.0, h as f32) as u32;
            if ex <= ox || ey <= oy {
                return phase + len;
            }
            let mut coverage = RgbaImage::new(ex - ox, ey - oy);
            let origin = egui::vec2(ox as f32, oy as f32);
            for c in samples {
                fill_disc(&mut coverage, c - origin, radius, Paint::Overwrite(Rgba([0, 0, 0, 255])));
            }
            for (x, y, px) in coverage.enumerate_pixels() {
                if px[3] != 0 {
                    paint.apply(img, x + ox, y + oy);
                }
            }
        }
    }
    phase + len
}

/// Connected polyline; `closed` adds the segment back to the first point.
pub fn stroke_polyline(
    img: &mut RgbaImage,
    points: &[Pos2],
    closed: bool,
    width: f32,
    paint: Paint,
    dash: Option<Dash>,
) {
    let mut phase = 0.0;
    for seg in points.windows(2) {
        phase = stroke_line_from(img, seg[0], seg[1], width, paint, dash, phase);
    }
    if closed && points.len() > 2 {
        if let (Some(&last), Some(&first)) = (points.last(), points.first()) {
            stroke_line_from(img, last, first, width, paint, dash, phase);
        }
    }
}

/// Rectangle outline centred on the rect's edges.
pub fn stroke_rect(img: &mut RgbaImage, rect: Rect, width: f32, paint: Paint, dash: Option<Dash>) {
    let corners = [rect.left_top(), rect.right_top(), rect.right_bottom(), rect.left_bottom()];
    stroke_polyline(img, &corners, true, width, paint, dash);
}

/// Fill the pixels whose centres fall inside `rect`.
pub fn fill_rect(img: &mut RgbaImage, rect: Rect, paint: Paint) {
    let (w, h) = img.dimensions();
    let x0 = (rect.min.x - 0.5).ceil().clamp(0.0, w as f32) as u32;
    let x1 = (rect.max.x - 0.5).ceil().clamp(0.0, w as f32) as u32;
    let y0 = (rect.min.y - 0.5).ceil().clamp(0.0, h as f32) as u32;
    let y1 = (rect.max.y - 0.5).ceil().clamp(0.0, h as f32) as u32;
    for y in y0..y1 {
        for x in x0..x1 {
            paint.apply(img, x, y);
        }
    }
}

// ============================================================================
// TEXT
// ============================================================================

/// Width and height in pixels of `text` drawn at `scale`.
pub fn text_size(text: &str, scale: u32) -> (u32, u32) {
    let s = scale.max(1);
    (text.chars().count() as u32 * 8 * s, 8 * s)
}

/// 8×8 bitmap text with its top-left corner at `(x, y)`.
pub fn draw_text(img: &mut RgbaImage, x: i32, y: i32, text: &str, color: Rgba<u8>, scale: u32) {
    let s = scale.max(1) as i32;
    let mut cursor_x = x;
    for ch in text.chars() {
        let Some(glyph) = BASIC_FONTS.get(ch).or_else(|| BASIC_FONTS.get('?')) else {
            cursor_x += 8 * s;
            continue;
        };
        for (row, bits) in glyph.iter().enumerate() {
            for col in 0..8 {
                if (bits >> col) & 1 == 0 {
                    continue;
                }
                let px = cursor_x + col * s;
                let py = y + row as i32 * s;
                for sy in 0..s {
                    for sx in 0..s {
                        blend_at(img, px + sx, py + sy, color, 1.0);
                    }
                }
            }
        }
        cursor_x += 8 * s;
    }
}

#[cfg(test)]
#[path = "shapes_test.rs"]
mod shapes_test;
