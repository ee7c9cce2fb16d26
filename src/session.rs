//! The editing session: every raster, entity and history stack in one place.
//!
//! A `MaskSession` is created once per launch (or per CLI job) and passed to
//! whoever needs it. It owns the [`SurfaceArena`] that backs every buffer, the
//! mask-editor state (base image, placed entities, selection, transform
//! controller), the drawing state (base image, [`DrawingEngine`]) and the
//! library of created masks. Loading a new drawing base resets the drawing
//! layers and their history; loading a new editor base keeps placed masks.

use chrono::{DateTime, Local};
use image::RgbaImage;
use uuid::Uuid;

use crate::canvas::{SurfaceArena, SurfaceId};
use crate::components::history::HistoryManager;
use crate::components::masks::{CreatedMask, CreatedMaskList, MaskEntity};
use crate::components::tools::DrawingEngine;
use crate::consts::{DEFAULT_CANVAS_HEIGHT, DEFAULT_CANVAS_WIDTH, ZOOM_STEP};
use crate::error::Result;
use crate::io;
use crate::ops::export;
use crate::ops::render;
use crate::ops::transform::{PointerEvent, TransformController, TransformResponse};
use crate::settings::Settings;

/// A base image held in the arena plus the canvas size it was fitted to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BaseImage {
    pub surface: SurfaceId,
    pub width: u32,
    pub height: u32,
}

pub struct MaskSession {
    arena: SurfaceArena,
    max_canvas: (u32, u32),
    mask_scale: f32,

    // Mask editor
    editor_base: Option<BaseImage>,
    masks: Vec<MaskEntity>,
    selected: Option<Uuid>,
    controller: TransformController,

    // Drawing
    drawing_base: Option<BaseImage>,
    drawing: DrawingEngine,

    created: CreatedMaskList,
}

impl Default for MaskSession {
    fn default() -> Self {
        Self::new(&Settings::default())
    }
}

impl MaskSession {
    pub fn new(settings: &Settings) -> Self {
        let history = HistoryManager::new(settings.max_undo_steps)
            .with_memory_limit(Some(settings.max_history_bytes()));
        let mut drawing = DrawingEngine::new(history);
        drawing.set_brush_size(settings.brush_size);

        Self {
            arena: SurfaceArena::new(),
            max_canvas: (settings.max_canvas_width.max(1), settings.max_canvas_height.max(1)),
            mask_scale: settings.default_mask_scale,
            editor_base: None,
            masks: Vec::new(),
            selected: None,
            controller: TransformController::default(),
            drawing_base: None,
            drawing,
            created: CreatedMaskList::default(),
        }
    }

    /// Re-read the limits that can change while the session is open.
    pub fn apply_settings(&mut self, settings: &Settings) {
        self.max_canvas = (settings.max_canvas_width.max(1), settings.max_canvas_height.max(1));
        self.mask_scale = settings.default_mask_scale;
        self.drawing
            .history
            .set_limits(settings.max_undo_steps, Some(settings.max_history_bytes()));
    }

    pub fn arena(&self) -> &SurfaceArena {
        &self.arena
    }

    fn install_base(&mut self, old: Option<BaseImage>, img: RgbaImage) -> BaseImage {
        if let Some(old) = old {
            self.arena.remove(old.surface);
        }
        let fitted = io::fit_image(img, self.max_canvas.0, self.max_canvas.1);
        let (width, height) = fitted.dimensions();
        BaseImage { surface: self.arena.insert(fitted), width, height }
    }

    // ========================================================================
    // MASK EDITOR
    // ========================================================================

    /// Fit `img` into the working canvas and make it the editor base.
    pub fn load_editor_base(&mut self, img: RgbaImage) -> BaseImage {
        let source = img.dimensions();
        let base = self.install_base(self.editor_base, img);
        self.editor_base = Some(base);
        log_info!(
            "Editor base loaded: {}x{} fitted to {}x{}",
            source.0,
            source.1,
            base.width,
            base.height
        );
        base
    }

    pub fn editor_base(&self) -> Option<BaseImage> {
        self.editor_base
    }

    /// Editor canvas size: the fitted base, or the default canvas before one
    /// is loaded.
    pub fn editor_size(&self) -> (u32, u32) {
        self.editor_base
            .map(|b| (b.width, b.height))
            .unwrap_or((DEFAULT_CANVAS_WIDTH, DEFAULT_CANVAS_HEIGHT))
    }

    pub fn masks(&self) -> &[MaskEntity] {
        &self.masks
    }

    pub fn mask(&self, id: Uuid) -> Option<&MaskEntity> {
        self.masks.iter().find(|m| m.id == id)
    }

    /// Mutable access for direct geometry edits (CLI placement, numeric
    /// fields). Interaction state should be left to the controller.
    pub fn mask_mut(&mut self, id: Uuid) -> Option<&mut MaskEntity> {
        self.masks.iter_mut().find(|m| m.id == id)
    }

    /// Place a decoded mask at the default position and scale. Later masks
    /// draw on top.
    pub fn add_mask(&mut self, name: impl Into<String>, img: RgbaImage) -> Uuid {
        let natural = img.dimensions();
        let surface = self.arena.insert(img);
        let entity = MaskEntity::new(name, surface, natural, self.mask_scale);
        let id = entity.id;
        log_info!(
            "Mask placed: {} ({}x{} at scale {:.2})",
            entity.name,
            natural.0,
            natural.1,
            entity.scale()
        );
        self.masks.push(entity);
        id
    }

    pub fn add_mask_bytes(&mut self, name: impl Into<String>, bytes: &[u8]) -> Result<Uuid> {
        let img = io::decode_image(bytes)?;
        Ok(self.add_mask(name, img))
    }

    /// Drop an entity and its pixels. Clears the selection if it pointed at
    /// it and stops any transform in progress.
    pub fn remove_mask(&mut self, id: Uuid) -> bool {
        let Some(idx) = self.masks.iter().position(|m| m.id == id) else {
            return false;
        };
        if self.controller.active_id() == Some(id) {
            self.controller.reset(&mut self.masks);
        }
        let entity = self.masks.remove(idx);
        self.arena.remove(entity.surface);
        if self.selected == Some(id) {
            self.selected = None;
        }
        log_info!("Mask removed: {}", entity.name);
        true
    }

    pub fn selected(&self) -> Option<Uuid> {
        self.selected
    }

    pub fn select(&mut self, id: Option<Uuid>) {
        self.selected = id.filter(|id| self.masks.iter().any(|m| m.id == *id));
    }

    pub fn zoom_in(&mut self) -> bool {
        self.zoom_selected(ZOOM_STEP)
    }

    pub fn zoom_out(&mut self) -> bool {
        self.zoom_selected(1.0 / ZOOM_STEP)
    }

    fn zoom_selected(&mut self, factor: f32) -> bool {
        let Some(id) = self.selected else { return false };
        let Some(entity) = self.masks.iter_mut().find(|m| m.id == id) else {
            return false;
        };
        entity.zoom(factor);
        true
    }

    pub fn controller(&self) -> &TransformController {
        &self.controller
    }

    /// Feed a pointer event (canvas coordinates) to the transform controller.
    pub fn editor_pointer(&mut self, event: PointerEvent) -> TransformResponse {
        self.controller.dispatch(&mut self.masks, &mut self.selected, event)
    }

    /// Binary mask of every placed entity at the editor canvas size. Refused
    /// without a base image or without any entity.
    pub fn export_placed(&self) -> Option<RgbaImage> {
        let base = self.editor_base?;
        if self.masks.is_empty() {
            return None;
        }
        let mask = export::export_placed(base.width, base.height, &self.arena, &self.masks);
        log_info!(
            "Placed mask exported: {}x{}, {} marked pixels",
            base.width,
            base.height,
            export::marked_count(&mask)
        );
        Some(mask)
    }

    /// Editor base with the placed mask painted white over it.
    pub fn placed_preview(&self) -> Option<RgbaImage> {
        let mask = self.export_placed()?;
        let base = self.arena.get(self.editor_base?.surface)?;
        Some(export::composite_preview(base, &mask))
    }

    pub fn render_editor(&self, frame: &mut RgbaImage) {
        render::render_editor(
            frame,
            &self.arena,
            self.editor_base.map(|b| b.surface),
            &self.masks,
            self.selected,
        );
    }

    // ========================================================================
    // DRAWING
    // ========================================================================

    /// Fit `img` into the working canvas, make it the drawing base and start
    /// over with fresh layers and an empty history.
    pub fn load_drawing_base(&mut self, img: RgbaImage) -> BaseImage {
        let source = img.dimensions();
        let base = self.install_base(self.drawing_base, img);
        self.drawing_base = Some(base);
        self.drawing.attach(&mut self.arena, base.width, base.height);
        log_info!(
            "Drawing base loaded: {}x{} fitted to {}x{}",
            source.0,
            source.1,
            base.width,
            base.height
        );
        base
    }

    pub fn drawing_base(&self) -> Option<BaseImage> {
        self.drawing_base
    }

    pub fn drawing(&self) -> &DrawingEngine {
        &self.drawing
    }

    /// Engine access for tool and brush-size changes.
    pub fn drawing_mut(&mut self) -> &mut DrawingEngine {
        &mut self.drawing
    }

    pub fn drawing_pointer(&mut self, event: PointerEvent) -> bool {
        self.drawing.pointer(&mut self.arena, event)
    }

    pub fn complete_pen_path(&mut self) -> bool {
        self.drawing.complete_pen_path(&mut self.arena)
    }

    pub fn cancel_pen_path(&mut self) -> bool {
        self.drawing.cancel_pen_path()
    }

    pub fn undo(&mut self) -> Option<String> {
        let label = self.drawing.undo(&mut self.arena);
        match &label {
            Some(l) => log_info!("Undo: {l}"),
            None => log_info!("Undo refused: at oldest snapshot"),
        }
        label
    }

    pub fn redo(&mut self) -> Option<String> {
        let label = self.drawing.redo(&mut self.arena);
        match &label {
            Some(l) => log_info!("Redo: {l}"),
            None => log_info!("Redo refused: nothing to redo"),
        }
        label
    }

    /// Binary mask of the truth layer. Refused without a drawing base.
    pub fn export_drawn(&self) -> Option<RgbaImage> {
        self.drawing_base?;
        export::export_drawn(&self.arena, self.drawing.layers()?)
    }

    /// Drawing base with the drawn mask painted white over it.
    pub fn drawn_preview(&self) -> Option<RgbaImage> {
        let mask = self.export_drawn()?;
        let base = self.arena.get(self.drawing_base?.surface)?;
        Some(export::composite_preview(base, &mask))
    }

    /// Export the truth layer into the created-mask library.
    pub fn create_mask(&mut self, at: DateTime<Local>) -> Option<Uuid> {
        let mask = self.export_drawn()?;
        let png = match io::encode_png(&mask) {
            Ok(png) => png,
            Err(e) => {
                log_err!("Could not encode created mask: {e}");
                return None;
            }
        };
        let created = CreatedMask::new(png, at);
        let id = created.id;
        log_info!(
            "Created {} ({}x{}, {} marked pixels)",
            created.name,
            mask.width(),
            mask.height(),
            export::marked_count(&mask)
        );
        self.created.push(created);
        Some(id)
    }

    pub fn render_drawing(&self, frame: &mut RgbaImage) {
        render::render_drawing(
            frame,
            &self.arena,
            self.drawing_base.map(|b| b.surface),
            self.drawing.layers(),
            self.drawing.pen_points(),
        );
    }

    // ========================================================================
    // CREATED MASKS
    // ========================================================================

    pub fn created_masks(&self) -> &CreatedMaskList {
        &self.created
    }

    pub fn delete_created(&mut self, id: Uuid) -> bool {
        match self.created.remove(id) {
            Some(m) => {
                log_info!("Deleted {}", m.name);
                true
            }
            None => false,
        }
    }

    /// Place a created mask in the editor. Its white pixels become the
    /// entity's visible pixels, so a placed export reproduces the drawn shape.
    pub fn import_created(&mut self, id: Uuid) -> Option<Uuid> {
        let created = self.created.get(id)?;
        let name = created.name.clone();
        let mask = match io::decode_image(&created.png) {
            Ok(img) => img,
            Err(e) => {
                log_err!("Could not decode {name}: {e}");
                return None;
            }
        };
        Some(self.add_mask(name, export::stencil_from_mask(&mask)))
    }
}

#[cfg(test)]
#[path = "session_test.rs"]
mod session_test;
