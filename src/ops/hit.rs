//! Pointer hit-testing against placed mask entities.

use eframe::egui;
use egui::{CursorIcon, Pos2};
use uuid::Uuid;

use crate::components::masks::{Handle, MaskEntity};
use crate::consts::HANDLE_SIZE;

/// Which part of an entity the pointer is over.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HitPart {
    Body,
    Handle(Handle),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Hit {
    pub id: Uuid,
    pub index: usize,
    pub part: HitPart,
}

/// Cursor to show for the current pointer position.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum CursorHint {
    #[default]
    Default,
    Grab,
    ResizeNwSe,
    ResizeNeSw,
}

impl CursorHint {
    pub fn for_hit(hit: Option<Hit>) -> Self {
        match hit.map(|h| h.part) {
            None => CursorHint::Default,
            Some(HitPart::Body) => CursorHint::Grab,
            Some(HitPart::Handle(h)) => Self::for_handle(h),
        }
    }

    pub fn for_handle(handle: Handle) -> Self {
        match handle {
            Handle::Nw | Handle::Se => CursorHint::ResizeNwSe,
            Handle::Ne | Handle::Sw => CursorHint::ResizeNeSw,
        }
    }

    pub fn icon(self) -> CursorIcon {
        match self {
            CursorHint::Default => CursorIcon::Default,
            CursorHint::Grab => CursorIcon::Grab,
            CursorHint::ResizeNwSe => CursorIcon::ResizeNwSe,
            CursorHint::ResizeNeSw => CursorIcon::ResizeNeSw,
        }
    }
}

/// Corner whose ±`HANDLE_SIZE` square contains `p`, in nw, ne, sw, se order.
pub fn handle_at(entity: &MaskEntity, p: Pos2) -> Option<Handle> {
    let bounds = entity.bounds();
    Handle::ALL.into_iter().find(|h| {
        let c = h.corner(bounds);
        (p.x - c.x).abs() <= HANDLE_SIZE && (p.y - c.y).abs() <= HANDLE_SIZE
    })
}

/// Inclusive body test over `[x, x+w] × [y, y+h]`.
pub fn body_contains(entity: &MaskEntity, p: Pos2) -> bool {
    let b = entity.bounds();
    p.x >= b.min.x && p.x <= b.max.x && p.y >= b.min.y && p.y <= b.max.y
}

/// Topmost entity under `p`. Later entities are on top; the first entity
/// with any hit ends the scan, and its handles win over its body.
pub fn hit_test(masks: &[MaskEntity], p: Pos2) -> Option<Hit> {
    masks.iter().enumerate().rev().find_map(|(index, m)| {
        let part = match handle_at(m, p) {
            Some(h) => HitPart::Handle(h),
            None if body_contains(m, p) => HitPart::Body,
            None => return None,
        };
        Some(Hit { id: m.id, index, part })
    })
}

#[cfg(test)]
#[path = "hit_test.rs"]
mod hit_test;
