use chrono::{DateTime, Local};
use eframe::egui;
use egui::{Pos2, Rect, Vec2};
use uuid::Uuid;

use crate::canvas::SurfaceId;
use crate::consts::{DEFAULT_MASK_POS, MIN_MASK_SIZE};

// ============================================================================
// HANDLES
// ============================================================================

/// One of the four corner hit regions used to start a resize.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Handle {
    Nw,
    Ne,
    Sw,
    Se,
}

impl Handle {
    /// Hit-test priority order.
    pub const ALL: [Handle; 4] = [Handle::Nw, Handle::Ne, Handle::Sw, Handle::Se];

    /// The corner of `rect` this handle sits on.
    pub fn corner(self, rect: Rect) -> Pos2 {
        match self {
            Handle::Nw => rect.left_top(),
            Handle::Ne => rect.right_top(),
            Handle::Sw => rect.left_bottom(),
            Handle::Se => rect.right_bottom(),
        }
    }
}

// ============================================================================
// MASK ENTITY
// ============================================================================

/// What the pointer is currently doing to an entity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Interaction {
    #[default]
    Idle,
    Dragging,
    Resizing { handle: Handle },
}

/// A placed, movable, resizable mask overlay.
///
/// The pixels live in the session's surface arena; the entity only keeps the
/// handle plus the natural size so geometry never needs the arena.
#[derive(Clone, Debug)]
pub struct MaskEntity {
    pub id: Uuid,
    pub name: String,
    pub surface: SurfaceId,
    natural: (u32, u32),
    /// Top-left corner in canvas space.
    pub pos: Pos2,
    /// Rendered size in canvas space.
    pub size: Vec2,
    pub interaction: Interaction,
}

impl MaskEntity {
    /// New entity at the default position, rendered at `natural × scale`.
    pub fn new(name: impl Into<String>, surface: SurfaceId, natural: (u32, u32), scale: f32) -> Self {
        let scale = if scale.is_finite() && scale > 0.0 { scale } else { 1.0 };
        let size = Vec2::new(natural.0 as f32 * scale, natural.1 as f32 * scale);
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            surface,
            natural: (natural.0.max(1), natural.1.max(1)),
            pos: Pos2::new(DEFAULT_MASK_POS.0, DEFAULT_MASK_POS.1),
            size,
            interaction: Interaction::Idle,
        }
    }

    pub fn with_pos(mut self, pos: Pos2) -> Self {
        self.pos = pos;
        self
    }

    pub fn natural_size(&self) -> (u32, u32) {
        self.natural
    }

    /// Horizontal rendered size over natural size.
    pub fn scale(&self) -> f32 {
        self.size.x / self.natural.0 as f32
    }

    pub fn bounds(&self) -> Rect {
        Rect::from_min_size(self.pos, self.size)
    }

    pub fn set_bounds(&mut self, rect: Rect) {
        self.pos = rect.min;
        self.size = rect.size();
    }

    /// Multiply the rendered size, keeping the top-left anchor. Each axis is
    /// floored at the minimum size.
    pub fn zoom(&mut self, factor: f32) {
        if !factor.is_finite() || factor <= 0.0 {
            return;
        }
        self.size = Vec2::new(
            (self.size.x * factor).max(MIN_MASK_SIZE),
            (self.size.y * factor).max(MIN_MASK_SIZE),
        );
    }

    pub fn is_transforming(&self) -> bool {
        self.interaction != Interaction::Idle
    }
}

// ============================================================================
// CREATED MASKS
// ============================================================================

/// A finished binary mask produced by exporting the drawing layer.
#[derive(Clone, Debug)]
pub struct CreatedMask {
    pub id: Uuid,
    pub name: String,
    /// PNG-encoded black/white raster.
    pub png: Vec<u8>,
    pub created_at: DateTime<Local>,
}

impl CreatedMask {
    pub fn new(png: Vec<u8>, created_at: DateTime<Local>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: format!("Mask {}", created_at.format("%H:%M:%S")),
            png,
            created_at,
        }
    }
}

/// Ordered list of created masks, oldest first.
#[derive(Default)]
pub struct CreatedMaskList {
    items: Vec<CreatedMask>,
}

impl CreatedMaskList {
    pub fn push(&mut self, mask: CreatedMask) {
        self.items.push(mask);
    }

    pub fn remove(&mut self, id: Uuid) -> Option<CreatedMask> {
        let idx = self.items.iter().position(|m| m.id == id)?;
        Some(self.items.remove(idx))
    }

    pub fn get(&self, id: Uuid) -> Option<&CreatedMask> {
        self.items.iter().find(|m| m.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &CreatedMask> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[cfg(test)]
#[path = "masks_test.rs"]
mod masks_test;
