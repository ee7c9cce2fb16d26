use eframe::egui;
use egui::{Color32, ColorImage};
use image::{Rgba, RgbaImage};

// ============================================================================
// SURFACE ARENA
// ============================================================================

/// Opaque handle to a raster owned by a [`SurfaceArena`].
///
/// Entities and controllers keep handles, never references, so a surface can
/// be replaced or dropped without invalidating anything that points at it.
/// Looking up a stale handle yields `None`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SurfaceId {
    index: u32,
    generation: u32,
}

struct Slot {
    generation: u32,
    image: Option<RgbaImage>,
}

/// Owner of every raster buffer in an editing session.
#[derive(Default)]
pub struct SurfaceArena {
    slots: Vec<Slot>,
    free: Vec<u32>,
}

impl SurfaceArena {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, image: RgbaImage) -> SurfaceId {
        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index as usize];
            slot.image = Some(image);
            return SurfaceId { index, generation: slot.generation };
        }
        self.slots.push(Slot { generation: 0, image: Some(image) });
        SurfaceId { index: (self.slots.len() - 1) as u32, generation: 0 }
    }

    /// Allocate a surface filled with one colour.
    pub fn insert_filled(&mut self, width: u32, height: u32, fill: Rgba<u8>) -> SurfaceId {
        self.insert(RgbaImage::from_pixel(width, height, fill))
    }

    pub fn get(&self, id: SurfaceId) -> Option<&RgbaImage> {
        let slot = self.slots.get(id.index as usize)?;
        if slot.generation != id.generation {
            return None;
        }
        slot.image.as_ref()
    }

    pub fn get_mut(&mut self, id: SurfaceId) -> Option<&mut RgbaImage> {
        let slot = self.slots.get_mut(id.index as usize)?;
        if slot.generation != id.generation {
            return None;
        }
        slot.image.as_mut()
    }

    pub fn contains(&self, id: SurfaceId) -> bool {
        self.get(id).is_some()
    }

    /// Remove a surface and hand its pixels back. The handle becomes stale.
    pub fn remove(&mut self, id: SurfaceId) -> Option<RgbaImage> {
        let slot = self.slots.get_mut(id.index as usize)?;
        if slot.generation != id.generation {
            return None;
        }
        let image = slot.image.take()?;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(id.index);
        Some(image)
    }
}

// ============================================================================
// PIXEL HELPERS
// ============================================================================

/// Source-over blend of `top` onto `base`, with an extra opacity multiplier.
pub fn blend_pixel(base: Rgba<u8>, top: Rgba<u8>, opacity: f32) -> Rgba<u8> {
    if top[3] == 0 || opacity <= 0.0 {
        return base;
    }
    if opacity >= 1.0 && top[3] == 255 {
        return top;
    }

    let top_a = (top[3] as f32 / 255.0) * opacity.clamp(0.0, 1.0);
    let base_a = base[3] as f32 / 255.0;
    let out_a = top_a + base_a * (1.0 - top_a);
    if out_a <= 0.0 {
        return Rgba([0, 0, 0, 0]);
    }

    let mix = |t: u8, b: u8| -> u8 {
        let t = t as f32 / 255.0;
        let b = b as f32 / 255.0;
        let c = (t * top_a + b * base_a * (1.0 - top_a)) / out_a;
        (c * 255.0).round().clamp(0.0, 255.0) as u8
    };

    Rgba([
        mix(top[0], base[0]),
        mix(top[1], base[1]),
        mix(top[2], base[2]),
        (out_a * 255.0).round().clamp(0.0, 255.0) as u8,
    ])
}

/// Blend into `img` at signed coordinates, ignoring anything off-canvas.
pub fn blend_at(img: &mut RgbaImage, x: i32, y: i32, color: Rgba<u8>, opacity: f32) {
    if x < 0 || y < 0 || x >= img.width() as i32 || y >= img.height() as i32 {
        return;
    }
    let px = img.get_pixel_mut(x as u32, y as u32);
    *px = blend_pixel(*px, color, opacity);
}

/// Converts an RgbaImage to egui's ColorImage format
pub fn rgba_image_to_color_image(img: &RgbaImage) -> ColorImage {
    let size = [img.width() as usize, img.height() as usize];
    let color_pixels: Vec<Color32> = img
        .as_raw()
        .chunks_exact(4)
        .map(|c| Color32::from_rgba_unmultiplied(c[0], c[1], c[2], c[3]))
        .collect();
    ColorImage { size, pixels: color_pixels }
}

#[cfg(test)]
#[path = "canvas_test.rs"]
mod canvas_test;
