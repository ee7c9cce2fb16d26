use eframe::egui;
use egui::Pos2;
use image::Rgba;

use crate::canvas::{SurfaceArena, SurfaceId};
use crate::components::history::HistoryManager;
use crate::consts::{
    BRUSH_SIZE_MAX, BRUSH_SIZE_MIN, DEFAULT_BRUSH_SIZE, DISPLAY_TINT, MARKER, MIN_PEN_POINTS,
};
use crate::ops::shapes::{fill_capsule, fill_disc, fill_polygon, Paint};
use crate::ops::transform::PointerEvent;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum DrawingTool {
    #[default]
    Brush,
    Pen,
}

impl DrawingTool {
    pub fn label(&self) -> &'static str {
        match self {
            DrawingTool::Brush => "Brush",
            DrawingTool::Pen => "Pen",
        }
    }

    pub fn all() -> &'static [DrawingTool] {
        &[DrawingTool::Brush, DrawingTool::Pen]
    }
}

/// The two parallel rasters of a drawing session.
///
/// `truth` only ever holds transparent pixels or [`MARKER`]; `display` holds
/// what the user sees. Both always have the same dimensions.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DrawingLayers {
    pub truth: SurfaceId,
    pub display: SurfaceId,
}

impl DrawingLayers {
    pub fn ids(&self) -> [SurfaceId; 2] {
        [self.truth, self.display]
    }
}

// ============================================================================
// DRAWING ENGINE
// ============================================================================

/// Brush and pen authoring over a truth/display layer pair, with snapshot
/// history.
pub struct DrawingEngine {
    tool: DrawingTool,
    brush_size: f32,
    layers: Option<DrawingLayers>,
    pen_points: Vec<Pos2>,
    /// Last stamped position while a brush stroke is in progress.
    stroke_last: Option<Pos2>,
    pub history: HistoryManager,
}

impl Default for DrawingEngine {
    fn default() -> Self {
        Self::new(HistoryManager::default())
    }
}

impl DrawingEngine {
    pub fn new(history: HistoryManager) -> Self {
        Self {
            tool: DrawingTool::Brush,
            brush_size: DEFAULT_BRUSH_SIZE,
            layers: None,
            pen_points: Vec::new(),
            stroke_last: None,
            history,
        }
    }

    // --- Layers -------------------------------------------------------------

    /// Allocate fresh, fully transparent layers of the given size, releasing
    /// any previous pair. History and pending pen points are reset.
    pub fn attach(&mut self, arena: &mut SurfaceArena, width: u32, height: u32) -> DrawingLayers {
        self.detach(arena);
        let clear = Rgba([0, 0, 0, 0]);
        let layers = DrawingLayers {
            truth: arena.insert_filled(width, height, clear),
            display: arena.insert_filled(width, height, clear),
        };
        self.layers = Some(layers);
        layers
    }

    /// Release the layers and forget everything tied to them.
    pub fn detach(&mut self, arena: &mut SurfaceArena) {
        if let Some(layers) = self.layers.take() {
            arena.remove(layers.truth);
            arena.remove(layers.display);
        }
        self.history.clear();
        self.pen_points.clear();
        self.stroke_last = None;
    }

    pub fn layers(&self) -> Option<DrawingLayers> {
        self.layers
    }

    /// Layers whose surfaces both still exist.
    fn live_layers(&self, arena: &SurfaceArena) -> Option<DrawingLayers> {
        let layers = self.layers?;
        (arena.contains(layers.truth) && arena.contains(layers.display)).then_some(layers)
    }

    // --- Tool state ---------------------------------------------------------

    pub fn tool(&self) -> DrawingTool {
        self.tool
    }

    /// Switch tools. Leaving the pen drops its pending vertices; any brush
    /// stroke in progress ends.
    pub fn set_tool(&mut self, tool: DrawingTool) {
        if self.tool == DrawingTool::Pen && tool != DrawingTool::Pen {
            self.pen_points.clear();
        }
        self.stroke_last = None;
        self.tool = tool;
    }

    pub fn brush_size(&self) -> f32 {
        self.brush_size
    }

    pub fn set_brush_size(&mut self, size: f32) {
        if size.is_finite() {
            self.brush_size = size.clamp(BRUSH_SIZE_MIN, BRUSH_SIZE_MAX);
        }
    }

    pub fn pen_points(&self) -> &[Pos2] {
        &self.pen_points
    }

    pub fn can_complete_pen(&self) -> bool {
        self.pen_points.len() >= MIN_PEN_POINTS
    }

    // --- Pointer routing ----------------------------------------------------

    /// Route a canvas pointer event to the active tool. Returns `true` when
    /// the canvas needs a redraw.
    pub fn pointer(&mut self, arena: &mut SurfaceArena, event: PointerEvent) -> bool {
        match (self.tool, event) {
            (DrawingTool::Brush, PointerEvent::Down(p)) => self.begin_stroke(arena, p),
            (DrawingTool::Brush, PointerEvent::Move(p)) => self.continue_stroke(arena, p),
            (DrawingTool::Brush, PointerEvent::Up | PointerEvent::Leave) => {
                self.end_stroke();
                false
            }
            (DrawingTool::Pen, PointerEvent::Down(p)) => self.add_pen_point(p),
            (DrawingTool::Pen, _) => false,
        }
    }

    // --- Brush --------------------------------------------------------------

    /// Snapshot, then stamp the first disc on both layers.
    pub fn begin_stroke(&mut self, arena: &mut SurfaceArena, p: Pos2) -> bool {
        let Some(layers) = self.live_layers(arena) else { return false };
        self.history.snapshot("Brush stroke", arena, &layers.ids());
        self.stamp(arena, layers, p, p);
        self.history.note_mutation();
        self.stroke_last = Some(p);
        true
    }

    /// Extend the current stroke to `p`. No-op when no stroke is active.
    pub fn continue_stroke(&mut self, arena: &mut SurfaceArena, p: Pos2) -> bool {
        let Some(last) = self.stroke_last else { return false };
        let Some(layers) = self.live_layers(arena) else {
            self.stroke_last = None;
            return false;
        };
        self.stamp(arena, layers, last, p);
        self.stroke_last = Some(p);
        true
    }

    pub fn end_stroke(&mut self) {
        self.stroke_last = None;
    }

    fn stamp(&self, arena: &mut SurfaceArena, layers: DrawingLayers, from: Pos2, to: Pos2) {
        let radius = self.brush_size * 0.5;
        for (id, color) in [(layers.truth, MARKER), (layers.display, DISPLAY_TINT)] {
            if let Some(img) = arena.get_mut(id) {
                if from == to {
                    fill_disc(img, to, radius, Paint::Overwrite(color));
                } else {
                    fill_capsule(img, from, to, radius, Paint::Overwrite(color));
                }
            }
        }
    }

    // --- Pen ----------------------------------------------------------------

    /// Record a vertex. Nothing is painted until the path is completed.
    pub fn add_pen_point(&mut self, p: Pos2) -> bool {
        if self.tool != DrawingTool::Pen {
            return false;
        }
        self.pen_points.push(p);
        true
    }

    /// Fill the pending polygon into both layers. Refused with fewer than
    /// three vertices or without layers; the vertices are kept in that case.
    pub fn complete_pen_path(&mut self, arena: &mut SurfaceArena) -> bool {
        if !self.can_complete_pen() {
            return false;
        }
        let Some(layers) = self.live_layers(arena) else { return false };

        self.history.snapshot("Pen polygon", arena, &layers.ids());
        for (id, color) in [(layers.truth, MARKER), (layers.display, DISPLAY_TINT)] {
            if let Some(img) = arena.get_mut(id) {
                fill_polygon(img, &self.pen_points, Paint::Overwrite(color));
            }
        }
        self.history.note_mutation();
        self.pen_points.clear();
        true
    }

    /// Drop pending vertices without touching either layer.
    pub fn cancel_pen_path(&mut self) -> bool {
        let had_points = !self.pen_points.is_empty();
        self.pen_points.clear();
        had_points
    }

    // --- History ------------------------------------------------------------

    pub fn undo(&mut self, arena: &mut SurfaceArena) -> Option<String> {
        self.stroke_last = None;
        let layers = self.live_layers(arena)?;
        self.history.undo(arena, &layers.ids())
    }

    pub fn redo(&mut self, arena: &mut SurfaceArena) -> Option<String> {
        self.stroke_last = None;
        self.live_layers(arena)?;
        self.history.redo(arena)
    }

    pub fn can_undo(&self) -> bool {
        self.layers.is_some() && self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.layers.is_some() && self.history.can_redo()
    }
}

#[cfg(test)]
#[path = "tools_test.rs"]
mod tools_test;
