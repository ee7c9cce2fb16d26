//! Pointer-driven drag and corner-resize of placed mask entities.
//!
//! [`TransformController::dispatch`] is the whole interface: feed it pointer
//! events in canvas coordinates and it mutates the entity list, returning the
//! cursor to show and whether a redraw is needed.

use eframe::egui;
use egui::{Pos2, Rect, Vec2};
use uuid::Uuid;

use crate::components::masks::{Handle, Interaction, MaskEntity};
use crate::consts::MIN_MASK_SIZE;
use crate::ops::hit::{hit_test, CursorHint, HitPart};

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PointerEvent {
    Down(Pos2),
    Move(Pos2),
    Up,
    /// Pointer left the canvas; handled exactly like `Up`.
    Leave,
}

#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub enum TransformState {
    #[default]
    Idle,
    Dragging {
        id: Uuid,
        /// Pointer minus entity origin at pointer-down.
        offset: Vec2,
    },
    Resizing {
        id: Uuid,
        handle: Handle,
        start_pointer: Pos2,
        start_bounds: Rect,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct TransformResponse {
    pub cursor: CursorHint,
    /// Something visible changed (geometry, flags or selection).
    pub changed: bool,
}

#[derive(Default)]
pub struct TransformController {
    state: TransformState,
}

impl TransformController {
    pub fn state(&self) -> TransformState {
        self.state
    }

    pub fn is_idle(&self) -> bool {
        self.state == TransformState::Idle
    }

    /// Id of the entity under transform, if any.
    pub fn active_id(&self) -> Option<Uuid> {
        match self.state {
            TransformState::Idle => None,
            TransformState::Dragging { id, .. } | TransformState::Resizing { id, .. } => Some(id),
        }
    }

    pub fn dispatch(
        &mut self,
        masks: &mut [MaskEntity],
        selected: &mut Option<Uuid>,
        event: PointerEvent,
    ) -> TransformResponse {
        match event {
            PointerEvent::Down(p) => self.pointer_down(masks, selected, p),
            PointerEvent::Move(p) => self.pointer_move(masks, p),
            PointerEvent::Up | PointerEvent::Leave => self.pointer_up(masks),
        }
    }

    /// Drop any transient state and clear every entity's flag.
    pub fn reset(&mut self, masks: &mut [MaskEntity]) {
        self.pointer_up(masks);
    }

    fn pointer_down(
        &mut self,
        masks: &mut [MaskEntity],
        selected: &mut Option<Uuid>,
        p: Pos2,
    ) -> TransformResponse {
        let Some(hit) = hit_test(masks, p) else {
            let changed = selected.take().is_some();
            self.state = TransformState::Idle;
            return TransformResponse { cursor: CursorHint::Default, changed };
        };

        let Some(entity) = masks.get(hit.index) else {
            return TransformResponse::default();
        };
        let interaction = match hit.part {
            HitPart::Handle(handle) => {
                self.state = TransformState::Resizing {
                    id: hit.id,
                    handle,
                    start_pointer: p,
                    start_bounds: entity.bounds(),
                };
                Interaction::Resizing { handle }
            }
            HitPart::Body => {
                self.state = TransformState::Dragging { id: hit.id, offset: p - entity.pos };
                Interaction::Dragging
            }
        };

        for m in masks.iter_mut() {
            m.interaction = if m.id == hit.id { interaction } else { Interaction::Idle };
        }
        *selected = Some(hit.id);

        TransformResponse { cursor: CursorHint::for_hit(Some(hit)), changed: true }
    }

    fn pointer_move(&mut self, masks: &mut [MaskEntity], p: Pos2) -> TransformResponse {
        match self.state {
            TransformState::Idle => TransformResponse {
                cursor: CursorHint::for_hit(hit_test(masks, p)),
                changed: false,
            },
            TransformState::Dragging { id, offset } => {
                let Some(m) = masks.iter_mut().find(|m| m.id == id) else {
                    self.state = TransformState::Idle;
                    return TransformResponse::default();
                };
                m.pos = p - offset;
                TransformResponse { cursor: CursorHint::Grab, changed: true }
            }
            TransformState::Resizing { id, handle, start_pointer, start_bounds } => {
                let Some(m) = masks.iter_mut().find(|m| m.id == id) else {
                    self.state = TransformState::Idle;
                    return TransformResponse::default();
                };
                m.set_bounds(resize_bounds(start_bounds, handle, p - start_pointer));
                TransformResponse { cursor: CursorHint::for_handle(handle), changed: true }
            }
        }
    }

    fn pointer_up(&mut self, masks: &mut [MaskEntity]) -> TransformResponse {
        let changed = self.state != TransformState::Idle || masks.iter().any(|m| m.is_transforming());
        for m in masks.iter_mut() {
            m.interaction = Interaction::Idle;
        }
        self.state = TransformState::Idle;
        TransformResponse { cursor: CursorHint::Default, changed }
    }
}

/// Apply a corner drag of `delta` to `start`, keeping the opposite corner
/// fixed. Width and height are clamped to `MIN_MASK_SIZE`; when clamped, the
/// moving edge stops at the floor instead of pushing the fixed corner.
pub fn resize_bounds(start: Rect, handle: Handle, delta: Vec2) -> Rect {
    let (w0, h0) = (start.width(), start.height());
    let (moves_left, moves_top) = match handle {
        Handle::Nw => (true, true),
        Handle::Ne => (false, true),
        Handle::Sw => (true, false),
        Handle::Se => (false, false),
    };

    let w = (if moves_left { w0 - delta.x } else { w0 + delta.x }).max(MIN_MASK_SIZE);
    let h = (if moves_top { h0 - delta.y } else { h0 + delta.y }).max(MIN_MASK_SIZE);

    let x = if moves_left { start.max.x - w } else { start.min.x };
    let y = if moves_top { start.max.y - h } else { start.min.y };

    Rect::from_min_size(Pos2::new(x, y), Vec2::new(w, h))
}

#[cfg(test)]
#[path = "transform_test.rs"]
mod transform_test;
