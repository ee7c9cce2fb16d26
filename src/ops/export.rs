//! Binary mask export and composited previews.
//!
//! Every export goes through one classifier, [`is_marked`]: a pixel is mask
//! content iff its alpha is non-zero and each colour channel is within
//! [`MARKER_TOLERANCE`] of [`MARKER`]. Placed entities are turned into
//! stencils first (any visible pixel becomes `MARKER`), so drawn and placed
//! content are classified identically. The result depends only on final
//! pixel values, never on draw order or stroke count.

use image::{Rgba, RgbaImage};
use rayon::prelude::*;

use crate::canvas::SurfaceArena;
use crate::components::masks::MaskEntity;
use crate::components::tools::DrawingLayers;
use crate::consts::{MARKER, MARKER_TOLERANCE, MASK_OFF, MASK_ON};
use crate::ops::render::{dest_pixels, pixel_rect, sample_index};

const CLEAR: Rgba<u8> = Rgba([0, 0, 0, 0]);

// ============================================================================
// CLASSIFICATION
// ============================================================================

#[inline]
pub fn is_marked(px: &Rgba<u8>) -> bool {
    px[3] > 0
        && px[0].abs_diff(MARKER[0]) <= MARKER_TOLERANCE
        && px[1].abs_diff(MARKER[1]) <= MARKER_TOLERANCE
        && px[2].abs_diff(MARKER[2]) <= MARKER_TOLERANCE
}

/// Same-size raster: `MASK_ON` where `src` is marked, `MASK_OFF` elsewhere.
pub fn classify(src: &RgbaImage) -> RgbaImage {
    let (w, h) = src.dimensions();
    let mut out = RgbaImage::from_pixel(w, h, MASK_OFF);
    if w == 0 || h == 0 {
        return out;
    }
    let row_len = w as usize * 4;
    out.par_chunks_mut(row_len)
        .zip(src.par_chunks(row_len))
        .for_each(|(dst, src)| {
            for (d, s) in dst.chunks_exact_mut(4).zip(src.chunks_exact(4)) {
                if is_marked(&Rgba([s[0], s[1], s[2], s[3]])) {
                    d.copy_from_slice(&MASK_ON.0);
                }
            }
        });
    out
}

/// Number of `MASK_ON` pixels in an exported mask.
pub fn marked_count(mask: &RgbaImage) -> usize {
    mask.par_chunks(4).filter(|p| *p == MASK_ON.0).count()
}

// ============================================================================
// STENCILS
// ============================================================================

/// Turn a black/white mask back into a stencil: marked pixels become
/// `MARKER`, everything else transparent.
pub fn stencil_from_mask(mask: &RgbaImage) -> RgbaImage {
    let mut out = mask.clone();
    out.par_chunks_mut(4).for_each(|px| {
        let v = if is_marked(&Rgba([px[0], px[1], px[2], px[3]])) { MARKER } else { CLEAR };
        px.copy_from_slice(&v.0);
    });
    out
}

// ============================================================================
// EXPORTS
// ============================================================================

/// Binary mask from the drawing truth layer. `None` if the layer is gone.
pub fn export_drawn(arena: &SurfaceArena, layers: DrawingLayers) -> Option<RgbaImage> {
    arena.get(layers.truth).map(classify)
}

/// Stencils of every entity stamped into a `width × height` truth-style
/// raster at their rounded rendered bounds, nearest-neighbour sampled.
pub fn rasterize_entities(
    width: u32,
    height: u32,
    arena: &SurfaceArena,
    masks: &[MaskEntity],
) -> RgbaImage {
    let mut out = RgbaImage::from_pixel(width, height, CLEAR);
    for m in masks {
        let Some(src) = arena.get(m.surface) else { continue };
        stamp_stencil(&mut out, src, m);
    }
    out
}

fn stamp_stencil(out: &mut RgbaImage, src: &RgbaImage, m: &MaskEntity) {
    let (sw, sh) = src.dimensions();
    let (ow, oh) = out.dimensions();
    if sw == 0 || sh == 0 {
        return;
    }
    let dest = pixel_rect(m.bounds());
    let Some((x0, y0, x1, y1)) = dest_pixels(dest, ow, oh) else { return };
    let row_len = ow as usize * 4;

    out.par_chunks_mut(row_len)
        .enumerate()
        .skip(y0 as usize)
        .take((y1 - y0) as usize)
        .for_each(|(dy, row)| {
            let sy = sample_index(dy as u32, dest.min.y, dest.height(), sh);
            for dx in x0..x1 {
                let sx = sample_index(dx, dest.min.x, dest.width(), sw);
                if src.get_pixel(sx, sy)[3] > 0 {
                    let i = dx as usize * 4;
                    row[i..i + 4].copy_from_slice(&MARKER.0);
                }
            }
        });
}

/// Binary mask of every placed entity over a `width × height` canvas.
pub fn export_placed(width: u32, height: u32, arena: &SurfaceArena, masks: &[MaskEntity]) -> RgbaImage {
    classify(&rasterize_entities(width, height, arena, masks))
}

/// Pixel-wise union of two same-size masks. `None` if the sizes differ.
pub fn merge(a: &RgbaImage, b: &RgbaImage) -> Option<RgbaImage> {
    if a.dimensions() != b.dimensions() {
        return None;
    }
    let mut out = a.clone();
    let row_len = (a.width() as usize * 4).max(4);
    out.par_chunks_mut(row_len)
        .zip(b.par_chunks(row_len))
        .for_each(|(dst, src)| {
            for (d, s) in dst.chunks_exact_mut(4).zip(src.chunks_exact(4)) {
                if s == MASK_ON.0.as_slice() {
                    d.copy_from_slice(&MASK_ON.0);
                }
            }
        });
    Some(out)
}

/// Base image with every marked pixel painted opaque white. The mask is
/// resampled onto the base when the sizes differ.
pub fn composite_preview(base: &RgbaImage, mask: &RgbaImage) -> RgbaImage {
    let mut out = base.clone();
    let (bw, bh) = base.dimensions();
    let (mw, mh) = mask.dimensions();
    if bw == 0 || bh == 0 || mw == 0 || mh == 0 {
        return out;
    }
    let row_len = bw as usize * 4;
    out.par_chunks_mut(row_len).enumerate().for_each(|(y, row)| {
        let my = ((y as u64 * mh as u64) / bh as u64) as u32;
        for x in 0..bw {
            let mx = ((x as u64 * mw as u64) / bw as u64) as u32;
            if is_marked(mask.get_pixel(mx, my)) {
                let i = x as usize * 4;
                row[i..i + 4].copy_from_slice(&MASK_ON.0);
            }
        }
    });
    out
}

#[cfg(test)]
#[path = "export_test.rs"]
mod export_test;
