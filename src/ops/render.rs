//! Per-frame compositing of the visible canvas.
//!
//! Both modes draw into a caller-owned `RgbaImage` frame that the front-end
//! uploads as a texture. The frame is fully rewritten on every call.

use eframe::egui;
use egui::{Pos2, Rect, Vec2};
use image::{Rgba, RgbaImage};
use rayon::prelude::*;
use uuid::Uuid;

use crate::canvas::{blend_pixel, SurfaceArena, SurfaceId};
use crate::components::masks::{Handle, MaskEntity};
use crate::components::tools::DrawingLayers;
use crate::consts::{HANDLE_SIZE, MASK_OVERLAY_ALPHA, MIN_PEN_POINTS};
use crate::ops::shapes::{
    draw_text, fill_disc, fill_polygon, fill_rect, stroke_polyline, stroke_rect, text_size, Dash,
    Paint,
};

pub const STROKE_ACTIVE: Rgba<u8> = Rgba([0xef, 0x44, 0x44, 255]);
pub const STROKE_SELECTED: Rgba<u8> = Rgba([0x22, 0xc5, 0x5e, 255]);
pub const STROKE_IDLE: Rgba<u8> = Rgba([0x3b, 0x82, 0xf6, 255]);
pub const HANDLE_FILL: Rgba<u8> = STROKE_IDLE;
pub const HANDLE_OUTLINE: Rgba<u8> = Rgba([255, 255, 255, 255]);

pub const PEN_LINE: Rgba<u8> = Rgba([0xf9, 0x73, 0x16, 255]);
pub const PEN_FILL: Rgba<u8> = Rgba([0xf9, 0x73, 0x16, 255]);
pub const PEN_FILL_ALPHA: f32 = 0.25;
pub const PEN_VERTEX: Rgba<u8> = Rgba([0xfa, 0xcc, 0x15, 255]);
pub const PEN_LABEL: Rgba<u8> = Rgba([0, 0, 0, 255]);

const ACTIVE_DASH: Dash = (5.0, 5.0);
const PEN_VERTEX_RADIUS: f32 = 6.0;

/// How one placed entity's outline is drawn.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OutlineStyle {
    pub color: Rgba<u8>,
    pub width: f32,
    pub dash: Option<Dash>,
    pub handles: bool,
}

impl OutlineStyle {
    pub fn for_entity(entity: &MaskEntity, selected: Option<Uuid>) -> Self {
        if entity.is_transforming() {
            OutlineStyle { color: STROKE_ACTIVE, width: 3.0, dash: Some(ACTIVE_DASH), handles: false }
        } else if selected == Some(entity.id) {
            OutlineStyle { color: STROKE_SELECTED, width: 2.0, dash: None, handles: true }
        } else {
            OutlineStyle { color: STROKE_IDLE, width: 2.0, dash: None, handles: true }
        }
    }
}

// ============================================================================
// FRAMES
// ============================================================================

/// Clear the frame, then stretch the base image (if any) over all of it.
pub fn draw_base(frame: &mut RgbaImage, arena: &SurfaceArena, base: Option<SurfaceId>) {
    clear(frame);
    if let Some(img) = base.and_then(|id| arena.get(id)) {
        let full = Rect::from_min_size(Pos2::ZERO, Vec2::new(frame.width() as f32, frame.height() as f32));
        draw_image(frame, img, full, 1.0);
    }
}

/// Mask-editor frame: base, then each entity in order with its outline.
pub fn render_editor(
    frame: &mut RgbaImage,
    arena: &SurfaceArena,
    base: Option<SurfaceId>,
    masks: &[MaskEntity],
    selected: Option<Uuid>,
) {
    draw_base(frame, arena, base);
    for m in masks {
        let bounds = m.bounds();
        if let Some(img) = arena.get(m.surface) {
            draw_image(frame, img, bounds, MASK_OVERLAY_ALPHA);
        }

        let style = OutlineStyle::for_entity(m, selected);
        stroke_rect(frame, bounds, style.width, Paint::Overwrite(style.color), style.dash);

        if style.handles {
            for h in Handle::ALL {
                draw_handle(frame, h.corner(bounds));
            }
        }
    }
}

/// Drawing-mode frame: base, display layer, then the live pen preview.
pub fn render_drawing(
    frame: &mut RgbaImage,
    arena: &SurfaceArena,
    base: Option<SurfaceId>,
    layers: Option<DrawingLayers>,
    pen_points: &[Pos2],
) {
    draw_base(frame, arena, base);
    if let Some(display) = layers.and_then(|l| arena.get(l.display)) {
        let full = Rect::from_min_size(Pos2::ZERO, Vec2::new(frame.width() as f32, frame.height() as f32));
        draw_image(frame, display, full, 1.0);
    }
    draw_pen_preview(frame, pen_points);
}

/// Translucent fill and closing edge once the path is closable, dashed
/// edges between consecutive vertices, numbered markers on top.
pub fn draw_pen_preview(frame: &mut RgbaImage, points: &[Pos2]) {
    if points.is_empty() {
        return;
    }
    let closable = points.len() >= MIN_PEN_POINTS;
    if closable {
        fill_polygon(frame, points, Paint::Blend(PEN_FILL, PEN_FILL_ALPHA));
    }
    stroke_polyline(frame, points, closable, 2.0, Paint::Overwrite(PEN_LINE), Some(ACTIVE_DASH));

    for (i, p) in points.iter().enumerate() {
        fill_disc(frame, *p, PEN_VERTEX_RADIUS, Paint::Overwrite(PEN_VERTEX));
        let label = (i + 1).to_string();
        let (tw, th) = text_size(&label, 1);
        let x = p.x.round() as i32 - tw as i32 / 2;
        let y = p.y.round() as i32 - th as i32 / 2;
        draw_text(frame, x, y, &label, PEN_LABEL, 1);
    }
}

/// `HANDLE_SIZE` square centred on the corner, filled and outlined.
fn draw_handle(frame: &mut RgbaImage, corner: Pos2) {
    let r = Rect::from_center_size(corner, Vec2::splat(HANDLE_SIZE));
    fill_rect(frame, r, Paint::Overwrite(HANDLE_FILL));
    stroke_rect(frame, r, 1.0, Paint::Overwrite(HANDLE_OUTLINE), None);
}

fn clear(frame: &mut RgbaImage) {
    frame.par_chunks_mut(4).for_each(|px| px.copy_from_slice(&[0, 0, 0, 0]));
}

// ============================================================================
// IMAGE DRAWING
// ============================================================================

/// Nearest-neighbour stretch of `src` into `dest`, blended at `opacity`.
///
/// `dest` is snapped with [`pixel_rect`] and sampled with [`sample_index`],
/// the same placement the placed-mask exporter uses.
pub fn draw_image(frame: &mut RgbaImage, src: &RgbaImage, dest: Rect, opacity: f32) {
    let (fw, fh) = frame.dimensions();
    let (sw, sh) = src.dimensions();
    if fw == 0 || fh == 0 || sw == 0 || sh == 0 || dest.width() <= 0.0 || dest.height() <= 0.0 {
        return;
    }
    let dest = pixel_rect(dest);
    let Some((x0, y0, x1, y1)) = dest_pixels(dest, fw, fh) else { return };
    let row_len = fw as usize * 4;

    frame
        .par_chunks_mut(row_len)
        .enumerate()
        .skip(y0 as usize)
        .take((y1 - y0) as usize)
        .for_each(|(y, row)| {
            let sy = sample_index(y as u32, dest.min.y, dest.height(), sh);
            for x in x0..x1 {
                let sx = sample_index(x, dest.min.x, dest.width(), sw);
                let top = *src.get_pixel(sx, sy);
                let i = x as usize * 4;
                let base = Rgba([row[i], row[i + 1], row[i + 2], row[i + 3]]);
                row[i..i + 4].copy_from_slice(&blend_pixel(base, top, opacity).0);
            }
        });
}

/// `rect` snapped to whole pixels: origin and size rounded, size at least 1.
pub fn pixel_rect(rect: Rect) -> Rect {
    Rect::from_min_size(
        rect.min.round(),
        Vec2::new(rect.width().round().max(1.0), rect.height().round().max(1.0)),
    )
}

/// Source index for destination pixel `d` of a span that starts at the whole
/// pixel `start` and is `len` pixels long: `floor((d - start) · src_len / len)`.
#[inline]
pub fn sample_index(d: u32, start: f32, len: f32, src_len: u32) -> u32 {
    let s = ((d as f32 - start) * src_len as f32 / len).floor().max(0.0) as u32;
    s.min(src_len.saturating_sub(1))
}

/// Frame pixel range `[x0, x1) × [y0, y1)` whose centres fall in `dest`.
pub fn dest_pixels(dest: Rect, fw: u32, fh: u32) -> Option<(u32, u32, u32, u32)> {
    let x0 = (dest.min.x - 0.5).ceil().clamp(0.0, fw as f32) as u32;
    let x1 = (dest.max.x - 0.5).ceil().clamp(0.0, fw as f32) as u32;
    let y0 = (dest.min.y - 0.5).ceil().clamp(0.0, fh as f32) as u32;
    let y1 = (dest.max.y - 0.5).ceil().clamp(0.0, fh as f32) as u32;
    (x1 > x0 && y1 > y0).then_some((x0, y0, x1, y1))
}

#[cfg(test)]
#[path = "render_test.rs"]
mod render_test;
