//! Image ingestion and export artifacts: decode, fit, encode, name, and the
//! native file dialogs that feed them.

use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use image::codecs::png::PngEncoder;
use image::imageops::FilterType;
use image::{ColorType, ImageEncoder, RgbaImage};
use rfd::FileDialog;

use crate::error::{MaskError, Result};

/// Fixed download name for the placed-mask export.
pub const PLACED_MASK_FILE: &str = "mask-result.png";

pub const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "webp", "bmp"];

// ============================================================================
// DECODE / FIT
// ============================================================================

/// Size of a `width × height` image scaled by `min(max_w / w, max_h / h)`.
/// Small images are scaled up as well as large ones down. Never returns a
/// zero dimension.
pub fn fit_within(width: u32, height: u32, max_w: u32, max_h: u32) -> (u32, u32) {
    if width == 0 || height == 0 {
        return (width.max(1), height.max(1));
    }
    let ratio = (max_w as f64 / width as f64).min(max_h as f64 / height as f64);
    let w = ((width as f64 * ratio).floor() as u32).max(1);
    let h = ((height as f64 * ratio).floor() as u32).max(1);
    (w, h)
}

/// Resample `img` to its fitted size. Returned as-is when it already fits
/// exactly.
pub fn fit_image(img: RgbaImage, max_w: u32, max_h: u32) -> RgbaImage {
    let (w, h) = fit_within(img.width(), img.height(), max_w, max_h);
    if (w, h) == img.dimensions() {
        return img;
    }
    image::imageops::resize(&img, w, h, FilterType::Triangle)
}

pub fn decode_image(bytes: &[u8]) -> Result<RgbaImage> {
    let img = image::load_from_memory(bytes)?.to_rgba8();
    non_empty(img)
}

pub fn load_image(path: &Path) -> Result<RgbaImage> {
    let img = image::open(path)?.to_rgba8();
    non_empty(img)
}

fn non_empty(img: RgbaImage) -> Result<RgbaImage> {
    if img.width() == 0 || img.height() == 0 {
        return Err(MaskError::EmptyImage);
    }
    Ok(img)
}

// ============================================================================
// ENCODE / WRITE
// ============================================================================

pub fn encode_png(img: &RgbaImage) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    PngEncoder::new(&mut buf).write_image(img.as_raw(), img.width(), img.height(), ColorType::Rgba8)?;
    Ok(buf)
}

/// Write `img` as PNG, creating parent directories as needed.
pub fn write_png(img: &RgbaImage, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let mut writer = BufWriter::new(File::create(path)?);
    PngEncoder::new(&mut writer).write_image(img.as_raw(), img.width(), img.height(), ColorType::Rgba8)?;
    Ok(())
}

/// `<prefix>-YYYYMMDD-HHMMSS.png`
pub fn timestamped_name(prefix: &str, at: DateTime<Local>) -> String {
    format!("{}-{}.png", prefix, at.format("%Y%m%d-%H%M%S"))
}

pub fn drawn_mask_name(at: DateTime<Local>) -> String {
    timestamped_name("mask", at)
}

pub fn preview_name(at: DateTime<Local>) -> String {
    timestamped_name("preview", at)
}

// ============================================================================
// FILE HANDLER
// ============================================================================

/// Native dialogs, remembering the last directory used.
#[derive(Default)]
pub struct FileHandler {
    pub last_dir: Option<PathBuf>,
}

impl FileHandler {
    pub fn new() -> Self {
        Self::default()
    }

    fn dialog(&self) -> FileDialog {
        let dlg = FileDialog::new();
        match &self.last_dir {
            Some(dir) => dlg.set_directory(dir),
            None => dlg,
        }
    }

    fn remember(&mut self, path: &Path) {
        self.last_dir = path.parent().map(Path::to_path_buf);
    }

    /// Pick and decode one image.
    pub fn open_image(&mut self) -> Option<(RgbaImage, PathBuf)> {
        let path = self.dialog().add_filter("Images", IMAGE_EXTENSIONS).pick_file()?;
        self.remember(&path);
        match load_image(&path) {
            Ok(img) => Some((img, path)),
            Err(e) => {
                log_err!("Failed to open {}: {}", path.display(), e);
                None
            }
        }
    }

    /// Pick several images. Files that fail to decode are logged and skipped.
    pub fn open_images(&mut self) -> Vec<(RgbaImage, PathBuf)> {
        let Some(paths) = self.dialog().add_filter("Masks", &["png", "webp"]).pick_files() else {
            return Vec::new();
        };
        if let Some(first) = paths.first() {
            self.remember(first);
        }
        paths
            .into_iter()
            .filter_map(|path| match load_image(&path) {
                Ok(img) => Some((img, path)),
                Err(e) => {
                    log_warn!("Skipping {}: {}", path.display(), e);
                    None
                }
            })
            .collect()
    }

    /// Ask where to save a PNG, proposing `default_name`.
    pub fn save_png_path(&mut self, default_name: &str) -> Option<PathBuf> {
        let path = self
            .dialog()
            .add_filter("PNG", &["png"])
            .set_file_name(default_name)
            .save_file()?;
        self.remember(&path);
        Some(path)
    }

    pub fn pick_folder(&self) -> Option<PathBuf> {
        self.dialog().pick_folder()
    }
}

#[cfg(test)]
#[path = "io_test.rs"]
mod io_test;
