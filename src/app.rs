//! eframe front-end: three tabs over one [`MaskSession`].
//!
//! * **Mask Editor** places, drags and resizes mask images over a base image
//!   and exports the placed mask.
//! * **Drawing** paints masks with the brush or pen and keeps created masks.
//! * **Inpainting** hands folders to the batch service and lists its output.
//!
//! Service calls run on worker threads and report back over an mpsc channel,
//! drained at the top of every frame.

use std::path::PathBuf;
use std::sync::mpsc;

use chrono::Local;
use eframe::egui;
use egui::{Color32, Pos2, Rect, Sense, TextureHandle, TextureOptions, Vec2};
use image::RgbaImage;
use uuid::Uuid;

use crate::canvas::rgba_image_to_color_image;
use crate::components::tools::DrawingTool;
use crate::consts::{BRUSH_SIZE_MAX, BRUSH_SIZE_MIN, BRUSH_SIZE_STEP};
use crate::error::Result;
use crate::io::{self, FileHandler, PLACED_MASK_FILE};
use crate::ops::hit::CursorHint;
use crate::ops::inpaint::{self, InpaintClient, InpaintJob, InpaintResponse};
use crate::ops::transform::PointerEvent;
use crate::session::MaskSession;
use crate::settings::Settings;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Tab {
    Editor,
    Drawing,
    Inpaint,
}

/// Work handed to a service worker thread.
enum ServiceJob {
    Run(InpaintJob),
    List(String),
    Fetch { remote: String, dest: PathBuf },
    Health,
}

/// Results sent back from service worker threads.
enum ServiceResult {
    Ran(Result<InpaintResponse>),
    Listed(Result<Vec<String>>),
    Fetched { dest: PathBuf, result: Result<Vec<u8>> },
    Health { url: String, result: Result<String> },
}

impl ServiceJob {
    /// Run against `client`. A client that could not be built fails the job
    /// with its own result kind, so only a failed run resets the run state.
    fn execute(self, client: Result<InpaintClient>, endpoint: &str) -> ServiceResult {
        match self {
            ServiceJob::Run(job) => ServiceResult::Ran(client.and_then(|c| c.run(&job))),
            ServiceJob::List(folder) => ServiceResult::Listed(client.and_then(|c| c.list_output(&folder))),
            ServiceJob::Fetch { remote, dest } => {
                ServiceResult::Fetched { dest, result: client.and_then(|c| c.serve_image(&remote)) }
            }
            ServiceJob::Health => {
                let url = client.as_ref().map_or_else(|_| endpoint.to_string(), |c| c.base_url().to_string());
                ServiceResult::Health { url, result: client.and_then(|c| c.health()) }
            }
        }
    }
}

// ============================================================================
// CANVAS VIEW
// ============================================================================

/// One on-screen canvas: the CPU frame, its GPU texture and pointer tracking.
struct CanvasView {
    name: &'static str,
    frame: RgbaImage,
    texture: Option<TextureHandle>,
    dirty: bool,
    hovering: bool,
}

impl CanvasView {
    fn new(name: &'static str) -> Self {
        Self { name, frame: RgbaImage::new(1, 1), texture: None, dirty: true, hovering: false }
    }

    /// Make sure the frame matches the canvas size before rendering into it.
    fn frame_for(&mut self, size: (u32, u32)) -> &mut RgbaImage {
        if self.frame.dimensions() != size {
            self.frame = RgbaImage::new(size.0.max(1), size.1.max(1));
        }
        &mut self.frame
    }

    /// Paint the texture, scaled down to fit if needed, and translate this
    /// frame's pointer input into canvas-space events.
    fn show(&mut self, ui: &mut egui::Ui) -> Vec<PointerEvent> {
        let (w, h) = self.frame.dimensions();
        let avail = ui.available_size();
        let scale = (avail.x / w as f32).min(avail.y / h as f32).clamp(0.05, 1.0);
        let (rect, response) = ui.allocate_exact_size(Vec2::new(w as f32, h as f32) * scale, Sense::click_and_drag());

        if self.dirty || self.texture.is_none() {
            let image = rgba_image_to_color_image(&self.frame);
            if let Some(tex) = &mut self.texture {
                tex.set(image, TextureOptions::NEAREST);
            } else {
                self.texture = Some(ui.ctx().load_texture(self.name, image, TextureOptions::NEAREST));
            }
            self.dirty = false;
        }
        if let Some(tex) = &self.texture {
            let uv = Rect::from_min_max(Pos2::ZERO, Pos2::new(1.0, 1.0));
            ui.painter().image(tex.id(), rect, uv, Color32::WHITE);
        }

        let to_canvas = |p: Pos2| Pos2::new((p.x - rect.min.x) / scale, (p.y - rect.min.y) / scale);
        let (pressed, released, moving) = ui.input(|i| {
            (i.pointer.primary_pressed(), i.pointer.primary_released(), i.pointer.is_moving())
        });

        let mut events = Vec::new();
        let hover = response.hover_pos();
        if let Some(p) = hover {
            if pressed {
                events.push(PointerEvent::Down(to_canvas(p)));
            } else if moving {
                events.push(PointerEvent::Move(to_canvas(p)));
            }
        }
        if released && self.hovering {
            events.push(PointerEvent::Up);
        }
        if self.hovering && hover.is_none() {
            events.push(PointerEvent::Leave);
        }
        self.hovering = hover.is_some();
        events
    }
}

// ============================================================================
// APP
// ============================================================================

pub struct MaskFEApp {
    settings: Settings,
    session: MaskSession,
    files: FileHandler,
    tab: Tab,

    editor_view: CanvasView,
    drawing_view: CanvasView,

    /// Last user-facing message, shown in the status bar.
    status: String,

    service_sender: mpsc::Sender<ServiceResult>,
    service_receiver: mpsc::Receiver<ServiceResult>,
    inpaint_running: bool,
    inpaint_status: String,
    service_health: String,
    output_images: Vec<String>,
}

impl MaskFEApp {
    pub fn new(_cc: &eframe::CreationContext<'_>) -> Self {
        let settings = Settings::load();
        let (service_sender, service_receiver) = mpsc::channel();
        Self {
            session: MaskSession::new(&settings),
            settings,
            files: FileHandler::new(),
            tab: Tab::Editor,
            editor_view: CanvasView::new("editor-canvas"),
            drawing_view: CanvasView::new("drawing-canvas"),
            status: String::new(),
            service_sender,
            service_receiver,
            inpaint_running: false,
            inpaint_status: String::new(),
            service_health: String::new(),
            output_images: Vec::new(),
        }
    }

    fn set_status(&mut self, msg: impl Into<String>) {
        self.status = msg.into();
    }

    fn save_png(&mut self, img: &RgbaImage, default_name: &str) {
        let Some(path) = self.files.save_png_path(default_name) else { return };
        match io::write_png(img, &path) {
            Ok(()) => {
                log_info!("Saved {}", path.display());
                self.set_status(format!("Saved {}", path.display()));
            }
            Err(e) => {
                log_err!("Save failed for {}: {}", path.display(), e);
                self.set_status(format!("Save failed: {e}"));
            }
        }
    }

    // --- Service results ----------------------------------------------------

    fn drain_service_results(&mut self, ctx: &egui::Context) {
        while let Ok(result) = self.service_receiver.try_recv() {
            match result {
                ServiceResult::Ran(outcome) => {
                    self.inpaint_running = false;
                    self.inpaint_status = inpaint::status_for(&outcome);
                    if matches!(outcome, Ok(ref r) if r.success) {
                        self.refresh_output(ctx);
                    }
                }
                ServiceResult::Listed(Ok(images)) => self.output_images = images,
                ServiceResult::Listed(Err(e)) => {
                    log_warn!("Listing output failed: {e}");
                    self.output_images.clear();
                }
                ServiceResult::Fetched { dest, result } => {
                    let written = result.and_then(|bytes| std::fs::write(&dest, bytes).map_err(Into::into));
                    match written {
                        Ok(()) => self.set_status(format!("Saved {}", dest.display())),
                        Err(e) => {
                            log_err!("Download failed: {e}");
                            self.set_status(format!("Download failed: {e}"));
                        }
                    }
                }
                ServiceResult::Health { url, result } => {
                    self.service_health = match result {
                        Ok(status) => format!("{url}: {status}"),
                        Err(e) => {
                            log_warn!("Health check against {url} failed: {e}");
                            format!("{url}: unreachable ({e})")
                        }
                    };
                }
            }
            ctx.request_repaint();
        }
    }

    fn spawn_service(&self, ctx: &egui::Context, job: ServiceJob) {
        let endpoint = self.settings.inpaint_endpoint.clone();
        let sender = self.service_sender.clone();
        let ctx = ctx.clone();
        std::thread::spawn(move || {
            let msg = job.execute(InpaintClient::new(&endpoint), &endpoint);
            let _ = sender.send(msg);
            ctx.request_repaint();
        });
    }

    fn run_inpaint(&mut self, ctx: &egui::Context) {
        let job = match InpaintJob::from_settings(&self.settings) {
            Ok(job) => job,
            Err(e) => {
                self.inpaint_status = format!("❌ {e}");
                return;
            }
        };
        self.inpaint_running = true;
        self.inpaint_status.clear();
        self.spawn_service(ctx, ServiceJob::Run(job));
    }

    fn refresh_output(&self, ctx: &egui::Context) {
        let folder = self.settings.output_folder.trim().to_string();
        if folder.is_empty() {
            return;
        }
        self.spawn_service(ctx, ServiceJob::List(folder));
    }

    // --- Keyboard -----------------------------------------------------------

    fn handle_shortcuts(&mut self, ctx: &egui::Context) {
        let (undo, redo, enter, escape, delete) = ctx.input(|i| {
            let cmd = i.modifiers.command;
            (
                cmd && !i.modifiers.shift && i.key_pressed(egui::Key::Z),
                cmd && (i.key_pressed(egui::Key::Y) || (i.modifiers.shift && i.key_pressed(egui::Key::Z))),
                i.key_pressed(egui::Key::Enter),
                i.key_pressed(egui::Key::Escape),
                i.key_pressed(egui::Key::Delete),
            )
        });
        if ctx.wants_keyboard_input() {
            return;
        }
        match self.tab {
            Tab::Drawing => {
                if undo && self.session.undo().is_some() {
                    self.drawing_view.dirty = true;
                }
                if redo && self.session.redo().is_some() {
                    self.drawing_view.dirty = true;
                }
                if enter && self.session.complete_pen_path() {
                    self.drawing_view.dirty = true;
                }
                if escape && self.session.cancel_pen_path() {
                    self.drawing_view.dirty = true;
                }
            }
            Tab::Editor => {
                if delete {
                    if let Some(id) = self.session.selected() {
                        self.session.remove_mask(id);
                        self.editor_view.dirty = true;
                    }
                }
            }
            Tab::Inpaint => {}
        }
    }

    // ========================================================================
    // MASK EDITOR TAB
    // ========================================================================

    fn editor_panel(&mut self, ctx: &egui::Context) {
        egui::SidePanel::left("editor_controls").resizable(false).default_width(240.0).show(ctx, |ui| {
            ui.heading("Mask Editor");
            ui.separator();

            if ui.button("Load base image…").clicked() {
                if let Some((img, path)) = self.files.open_image() {
                    let base = self.session.load_editor_base(img);
                    self.set_status(format!("{} → {}×{}", path.display(), base.width, base.height));
                    self.editor_view.dirty = true;
                }
            }
            if ui.button("Add mask images…").clicked() {
                let picked = self.files.open_images();
                if picked.is_empty() {
                    self.set_status("No masks added");
                }
                for (img, path) in picked {
                    let name = path.file_name().map(|s| s.to_string_lossy().to_string()).unwrap_or_default();
                    self.session.add_mask(name, img);
                }
                self.editor_view.dirty = true;
            }

            ui.separator();
            let has_sel = self.session.selected().is_some();
            ui.horizontal(|ui| {
                if ui.add_enabled(has_sel, egui::Button::new("Zoom +")).clicked() && self.session.zoom_in() {
                    self.editor_view.dirty = true;
                }
                if ui.add_enabled(has_sel, egui::Button::new("Zoom −")).clicked() && self.session.zoom_out() {
                    self.editor_view.dirty = true;
                }
            });

            ui.separator();
            ui.label(format!("Placed masks ({})", self.session.masks().len()));
            let mut remove: Option<Uuid> = None;
            let mut select: Option<Uuid> = None;
            egui::ScrollArea::vertical().max_height(240.0).show(ui, |ui| {
                for m in self.session.masks().iter().rev() {
                    ui.horizontal(|ui| {
                        let selected = self.session.selected() == Some(m.id);
                        if ui.selectable_label(selected, &m.name).clicked() {
                            select = Some(m.id);
                        }
                        ui.weak(format!("×{:.2}", m.scale()));
                        if ui.small_button("✖").clicked() {
                            remove = Some(m.id);
                        }
                    });
                }
            });
            if let Some(id) = select {
                self.session.select(Some(id));
                self.editor_view.dirty = true;
            }
            if let Some(id) = remove {
                self.session.remove_mask(id);
                self.editor_view.dirty = true;
            }

            ui.separator();
            let can_export = self.session.editor_base().is_some() && !self.session.masks().is_empty();
            if ui.add_enabled(can_export, egui::Button::new("Export mask")).clicked() {
                if let Some(mask) = self.session.export_placed() {
                    self.save_png(&mask, PLACED_MASK_FILE);
                }
            }
            if ui.add_enabled(can_export, egui::Button::new("Save preview")).clicked() {
                if let Some(preview) = self.session.placed_preview() {
                    self.save_png(&preview, &io::preview_name(Local::now()));
                }
            }
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            if self.editor_view.dirty {
                let size = self.session.editor_size();
                self.session.render_editor(self.editor_view.frame_for(size));
            }
            let events = self.editor_view.show(ui);
            let mut cursor = CursorHint::Default;
            for ev in events {
                let resp = self.session.editor_pointer(ev);
                cursor = resp.cursor;
                if resp.changed {
                    self.editor_view.dirty = true;
                }
            }
            if self.editor_view.hovering {
                ctx.set_cursor_icon(cursor.icon());
            }
        });
    }

    // ========================================================================
    // DRAWING TAB
    // ========================================================================

    fn drawing_panel(&mut self, ctx: &egui::Context) {
        egui::SidePanel::left("drawing_controls").resizable(false).default_width(240.0).show(ctx, |ui| {
            ui.heading("Drawing");
            ui.separator();

            if ui.button("Load image…").clicked() {
                if let Some((img, path)) = self.files.open_image() {
                    let base = self.session.load_drawing_base(img);
                    self.set_status(format!("{} → {}×{}", path.display(), base.width, base.height));
                    self.drawing_view.dirty = true;
                }
            }

            ui.separator();
            let mut tool = self.session.drawing().tool();
            ui.horizontal(|ui| {
                for t in DrawingTool::all() {
                    ui.selectable_value(&mut tool, *t, t.label());
                }
            });
            if tool != self.session.drawing().tool() {
                self.session.drawing_mut().set_tool(tool);
                self.drawing_view.dirty = true;
            }

            let mut size = self.session.drawing().brush_size();
            let slider = egui::Slider::new(&mut size, BRUSH_SIZE_MIN..=BRUSH_SIZE_MAX)
                .step_by(BRUSH_SIZE_STEP as f64)
                .text("Brush size");
            let slider = ui.add(slider);
            if slider.changed() {
                self.session.drawing_mut().set_brush_size(size);
                self.settings.brush_size = self.session.drawing().brush_size();
            }
            // Persist once the drag ends; keyboard and click edits land without a drag.
            if slider.drag_released() || (slider.changed() && !slider.dragged()) {
                self.settings.save();
            }

            if tool == DrawingTool::Pen {
                let n = self.session.drawing().pen_points().len();
                ui.label(format!("{n} point(s)"));
                ui.horizontal(|ui| {
                    let can_complete = self.session.drawing().can_complete_pen();
                    if ui.add_enabled(can_complete, egui::Button::new("Complete path")).clicked()
                        && self.session.complete_pen_path()
                    {
                        self.drawing_view.dirty = true;
                    }
                    if ui.add_enabled(n > 0, egui::Button::new("Cancel")).clicked() && self.session.cancel_pen_path() {
                        self.drawing_view.dirty = true;
                    }
                });
            }

            let history = &self.session.drawing().history;
            let recent = history.undo_history();
            let summary = if history.is_empty() {
                "No history yet".to_string()
            } else {
                format!(
                    "{} undo · {} redo · {:.1} MB",
                    history.undo_count(),
                    history.redo_count(),
                    history.memory_usage() as f64 / (1024.0 * 1024.0)
                )
            };
            ui.horizontal(|ui| {
                let mut undo = ui.add_enabled(self.session.drawing().can_undo(), egui::Button::new("Undo"));
                if !recent.is_empty() {
                    undo = undo.on_hover_text(recent.iter().take(10).cloned().collect::<Vec<_>>().join("\n"));
                }
                if undo.clicked() && self.session.undo().is_some() {
                    self.drawing_view.dirty = true;
                }
                if ui.add_enabled(self.session.drawing().can_redo(), egui::Button::new("Redo")).clicked()
                    && self.session.redo().is_some()
                {
                    self.drawing_view.dirty = true;
                }
            });
            ui.weak(summary);

            ui.separator();
            let has_base = self.session.drawing_base().is_some();
            if ui.add_enabled(has_base, egui::Button::new("Create mask")).clicked() {
                match self.session.create_mask(Local::now()) {
                    Some(_) => self.set_status("Mask created"),
                    None => self.set_status("Could not create mask"),
                }
            }
            if ui.add_enabled(has_base, egui::Button::new("Download mask")).clicked() {
                if let Some(mask) = self.session.export_drawn() {
                    self.save_png(&mask, &io::drawn_mask_name(Local::now()));
                }
            }
            if ui.add_enabled(has_base, egui::Button::new("Save preview")).clicked() {
                if let Some(preview) = self.session.drawn_preview() {
                    self.save_png(&preview, &io::preview_name(Local::now()));
                }
            }

            ui.separator();
            self.created_masks_list(ui);
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            if self.session.drawing_base().is_none() {
                ui.centered_and_justified(|ui| ui.label("Load an image to start drawing"));
                return;
            }
            if self.drawing_view.dirty {
                let size = self
                    .session
                    .drawing_base()
                    .map(|b| (b.width, b.height))
                    .unwrap_or_else(|| self.session.editor_size());
                self.session.render_drawing(self.drawing_view.frame_for(size));
            }
            for ev in self.drawing_view.show(ui) {
                if self.session.drawing_pointer(ev) {
                    self.drawing_view.dirty = true;
                }
            }
            if self.drawing_view.hovering {
                ctx.set_cursor_icon(egui::CursorIcon::Crosshair);
            }
        });
    }

    fn created_masks_list(&mut self, ui: &mut egui::Ui) {
        ui.label(format!("Created masks ({})", self.session.created_masks().len()));
        let mut delete: Option<Uuid> = None;
        let mut import: Option<Uuid> = None;
        let mut download: Option<(String, Vec<u8>)> = None;
        egui::ScrollArea::vertical().id_source("created_masks").show(ui, |ui| {
            for m in self.session.created_masks().iter() {
                ui.horizontal(|ui| {
                    ui.label(&m.name);
                    if ui.small_button("Use").on_hover_text("Place in the mask editor").clicked() {
                        import = Some(m.id);
                    }
                    if ui.small_button("⬇").on_hover_text("Download").clicked() {
                        download = Some((io::drawn_mask_name(m.created_at), m.png.clone()));
                    }
                    if ui.small_button("✖").on_hover_text("Delete").clicked() {
                        delete = Some(m.id);
                    }
                });
            }
        });

        if let Some(id) = import {
            if self.session.import_created(id).is_some() {
                self.editor_view.dirty = true;
                self.set_status("Mask placed in the editor");
            }
        }
        if let Some(id) = delete {
            self.session.delete_created(id);
        }
        if let Some((name, png)) = download {
            if let Some(path) = self.files.save_png_path(&name) {
                match std::fs::write(&path, png) {
                    Ok(()) => self.set_status(format!("Saved {}", path.display())),
                    Err(e) => self.set_status(format!("Save failed: {e}")),
                }
            }
        }
    }

    // ========================================================================
    // INPAINTING TAB
    // ========================================================================

    fn inpaint_panel(&mut self, ctx: &egui::Context) {
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.heading("Inpainting");
            ui.separator();

            let mut changed = false;
            egui::Grid::new("inpaint_folders").num_columns(3).spacing([8.0, 6.0]).show(ui, |ui| {
                for (label, value) in [
                    ("Image folder", &mut self.settings.image_folder),
                    ("Mask folder", &mut self.settings.mask_folder),
                    ("Output folder", &mut self.settings.output_folder),
                ] {
                    ui.label(label);
                    changed |= ui.add(egui::TextEdit::singleline(value).desired_width(360.0)).lost_focus();
                    if ui.button("Browse…").clicked() {
                        if let Some(dir) = self.files.pick_folder() {
                            *value = dir.display().to_string();
                            changed = true;
                        }
                    }
                    ui.end_row();
                }
                ui.label("Service");
                changed |= ui
                    .add(egui::TextEdit::singleline(&mut self.settings.inpaint_endpoint).desired_width(360.0))
                    .lost_focus();
                ui.end_row();
            });
            changed |= ui.checkbox(&mut self.settings.clear_output, "Clear output folder first").changed();
            if changed {
                self.settings.save();
            }

            ui.add_space(6.0);
            let preview = InpaintJob {
                image_folder: self.settings.image_folder.clone(),
                mask_folder: self.settings.mask_folder.clone(),
                output_folder: self.settings.output_folder.clone(),
                model: self.settings.inpaint_model.clone(),
                device: self.settings.inpaint_device.clone(),
                clear_output: self.settings.clear_output,
            };
            ui.label("Command preview:");
            ui.code(preview.command_preview());

            ui.add_space(6.0);
            ui.horizontal(|ui| {
                let ready = preview.validate().is_ok() && !self.inpaint_running;
                let label = if self.inpaint_running { "Running…" } else { "Run inpainting" };
                if ui.add_enabled(ready, egui::Button::new(label)).clicked() {
                    self.run_inpaint(ctx);
                }
                if self.inpaint_running {
                    ui.spinner();
                }
                if ui.button("Refresh output").clicked() {
                    self.refresh_output(ctx);
                }
                if ui.button("Check service").clicked() {
                    self.service_health = "Checking…".to_string();
                    self.spawn_service(ctx, ServiceJob::Health);
                }
            });
            if !self.service_health.is_empty() {
                ui.weak(&self.service_health);
            }

            if !self.inpaint_status.is_empty() {
                let color = if self.inpaint_status.starts_with('✅') {
                    Color32::from_rgb(0x15, 0x80, 0x3d)
                } else {
                    Color32::from_rgb(0xb9, 0x1c, 0x1c)
                };
                ui.colored_label(color, &self.inpaint_status);
            }

            ui.separator();
            ui.label(format!("Output ({})", self.output_images.len()));
            let mut fetch: Option<String> = None;
            egui::ScrollArea::vertical().show(ui, |ui| {
                for path in &self.output_images {
                    ui.horizontal(|ui| {
                        ui.label(path);
                        if ui.small_button("⬇").clicked() {
                            fetch = Some(path.clone());
                        }
                    });
                }
            });
            if let Some(remote) = fetch {
                let name = std::path::Path::new(&remote)
                    .file_name()
                    .map(|s| s.to_string_lossy().to_string())
                    .unwrap_or_else(|| "output.png".to_string());
                if let Some(dest) = self.files.save_png_path(&name) {
                    self.spawn_service(ctx, ServiceJob::Fetch { remote, dest });
                }
            }
        });
    }
}

impl eframe::App for MaskFEApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.drain_service_results(ctx);
        self.handle_shortcuts(ctx);

        egui::TopBottomPanel::top("tabs").show(ctx, |ui| {
            ui.horizontal(|ui| {
                let before = self.tab;
                ui.selectable_value(&mut self.tab, Tab::Editor, "Mask Editor");
                ui.selectable_value(&mut self.tab, Tab::Drawing, "Drawing");
                ui.selectable_value(&mut self.tab, Tab::Inpaint, "Inpainting");
                if self.tab != before {
                    self.editor_view.dirty = true;
                    self.drawing_view.dirty = true;
                }
            });
        });

        egui::TopBottomPanel::bottom("status").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.label(&self.status);
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    let (w, h) = self.session.editor_size();
                    ui.weak(format!("{w}×{h}"));
                });
            });
        });

        match self.tab {
            Tab::Editor => self.editor_panel(ctx),
            Tab::Drawing => self.drawing_panel(ctx),
            Tab::Inpaint => self.inpaint_panel(ctx),
        }
    }
}

#[cfg(test)]
#[path = "app_test.rs"]
mod app_test;
