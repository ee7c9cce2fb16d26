//! User settings persisted as a flat `key=value` file.
//!
//! Unknown keys are ignored and unparsable values fall back to their default,
//! so a hand-edited or truncated file never stops the editor from starting.

use std::path::{Path, PathBuf};

use crate::consts::{
    BRUSH_SIZE_MAX, BRUSH_SIZE_MIN, DEFAULT_BRUSH_SIZE, DEFAULT_CANVAS_HEIGHT,
    DEFAULT_CANVAS_WIDTH, DEFAULT_MASK_SCALE, DEFAULT_MAX_HISTORY_MB, DEFAULT_MAX_UNDO_STEPS,
};

const SETTINGS_FILE: &str = "maskfe_settings.cfg";

/// Settings that persist across launches.
#[derive(Clone, Debug, PartialEq)]
pub struct Settings {
    /// Maximum number of snapshots kept by the drawing history.
    pub max_undo_steps: usize,
    /// Memory ceiling for the drawing history, in MiB.
    pub max_history_mb: usize,
    /// Initial brush diameter in canvas pixels.
    pub brush_size: f32,
    /// Scale applied to newly placed masks.
    pub default_mask_scale: f32,
    /// Box that loaded base images are fitted into.
    pub max_canvas_width: u32,
    pub max_canvas_height: u32,

    // Inpainting service
    pub inpaint_endpoint: String,
    pub inpaint_model: String,
    pub inpaint_device: String,
    pub clear_output: bool,

    // Last used folders
    pub image_folder: String,
    pub mask_folder: String,
    pub output_folder: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            max_undo_steps: DEFAULT_MAX_UNDO_STEPS,
            max_history_mb: DEFAULT_MAX_HISTORY_MB,
            brush_size: DEFAULT_BRUSH_SIZE,
            default_mask_scale: DEFAULT_MASK_SCALE,
            max_canvas_width: DEFAULT_CANVAS_WIDTH,
            max_canvas_height: DEFAULT_CANVAS_HEIGHT,
            inpaint_endpoint: "http://localhost:8000".to_string(),
            inpaint_model: "lama".to_string(),
            inpaint_device: "cuda".to_string(),
            clear_output: true,
            image_folder: String::new(),
            mask_folder: String::new(),
            output_folder: String::new(),
        }
    }
}

impl Settings {
    /// Path to the settings file.
    /// On Linux:   ~/.config/maskfe/maskfe_settings.cfg  (XDG_CONFIG_HOME respected)
    /// On Windows: %APPDATA%\MaskFE\maskfe_settings.cfg
    /// On macOS:   ~/Library/Application Support/MaskFE/maskfe_settings.cfg
    pub fn settings_path() -> Option<PathBuf> {
        #[cfg(target_os = "windows")]
        {
            let appdata = std::env::var("APPDATA")
                .or_else(|_| std::env::var("USERPROFILE"))
                .ok()?;
            return Some(PathBuf::from(appdata).join("MaskFE").join(SETTINGS_FILE));
        }
        #[cfg(target_os = "macos")]
        {
            let home = std::env::var("HOME").ok()?;
            return Some(
                PathBuf::from(home)
                    .join("Library")
                    .join("Application Support")
                    .join("MaskFE")
                    .join(SETTINGS_FILE),
            );
        }
        #[cfg(not(any(target_os = "windows", target_os = "macos")))]
        {
            let config_dir = match std::env::var("XDG_CONFIG_HOME") {
                Ok(xdg) => PathBuf::from(xdg),
                Err(_) => PathBuf::from(std::env::var("HOME").ok()?).join(".config"),
            };
            Some(config_dir.join("maskfe").join(SETTINGS_FILE))
        }
    }

    /// Load from the platform location, or defaults if the file is missing.
    pub fn load() -> Self {
        match Self::settings_path() {
            Some(path) => Self::load_from(&path),
            None => Self::default(),
        }
    }

    /// Save to the platform location. Failures are logged, never raised.
    pub fn save(&self) {
        let Some(path) = Self::settings_path() else {
            log_warn!("No settings directory available; settings not saved");
            return;
        };
        if let Err(e) = self.save_to(&path) {
            log_warn!("Could not save settings to {}: {}", path.display(), e);
        }
    }

    pub fn load_from(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(content) => Self::parse(&content),
            Err(e) => {
                if e.kind() != std::io::ErrorKind::NotFound {
                    log_warn!("Could not read settings {}: {}", path.display(), e);
                }
                Self::default()
            }
        }
    }

    pub fn save_to(&self, path: &Path) -> std::io::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, self.to_config_string())
    }

    /// Parse `key=value` lines on top of the defaults.
    pub fn parse(content: &str) -> Self {
        let mut s = Self::default();
        let d = Self::default();
        for line in content.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let Some((key, val)) = line.split_once('=') else { continue };
            let key = key.trim();
            let val = val.trim();
            match key {
                "max_undo_steps" => {
                    s.max_undo_steps = val.parse().unwrap_or(d.max_undo_steps).max(1);
                }
                "max_history_mb" => {
                    s.max_history_mb = val.parse().unwrap_or(d.max_history_mb).max(1);
                }
                "brush_size" => {
                    s.brush_size = val
                        .parse::<f32>()
                        .ok()
                        .filter(|v| v.is_finite())
                        .unwrap_or(d.brush_size)
                        .clamp(BRUSH_SIZE_MIN, BRUSH_SIZE_MAX);
                }
                "default_mask_scale" => {
                    s.default_mask_scale = val
                        .parse::<f32>()
                        .ok()
                        .filter(|v| v.is_finite() && *v > 0.0)
                        .unwrap_or(d.default_mask_scale);
                }
                "max_canvas_width" => {
                    s.max_canvas_width = val.parse().unwrap_or(d.max_canvas_width).max(1);
                }
                "max_canvas_height" => {
                    s.max_canvas_height = val.parse().unwrap_or(d.max_canvas_height).max(1);
                }
                "inpaint_endpoint" => {
                    if !val.is_empty() {
                        s.inpaint_endpoint = val.trim_end_matches('/').to_string();
                    }
                }
                "inpaint_model" => {
                    if !val.is_empty() {
                        s.inpaint_model = val.to_string();
                    }
                }
                "inpaint_device" => {
                    if !val.is_empty() {
                        s.inpaint_device = val.to_string();
                    }
                }
                "clear_output" => {
                    s.clear_output = val == "true";
                }
                "image_folder" => s.image_folder = val.to_string(),
                "mask_folder" => s.mask_folder = val.to_string(),
                "output_folder" => s.output_folder = val.to_string(),
                _ => {}
            }
        }
        s
    }

    pub fn to_config_string(&self) -> String {
        format!(
            "max_undo_steps={}\n\
             max_history_mb={}\n\
             brush_size={}\n\
             default_mask_scale={}\n\
             max_canvas_width={}\n\
             max_canvas_height={}\n\
             inpaint_endpoint={}\n\
             inpaint_model={}\n\
             inpaint_device={}\n\
             clear_output={}\n\
             image_folder={}\n\
             mask_folder={}\n\
             output_folder={}\n",
            self.max_undo_steps,
            self.max_history_mb,
            self.brush_size,
            self.default_mask_scale,
            self.max_canvas_width,
            self.max_canvas_height,
            self.inpaint_endpoint,
            self.inpaint_model,
            self.inpaint_device,
            self.clear_output,
            self.image_folder,
            self.mask_folder,
            self.output_folder,
        )
    }

    pub fn max_history_bytes(&self) -> usize {
        self.max_history_mb.saturating_mul(1024 * 1024)
    }
}

#[cfg(test)]
#[path = "settings_test.rs"]
mod settings_test;
