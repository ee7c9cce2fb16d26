// ============================================================================
// MaskFE CLI: headless mask composition via command-line arguments
// ============================================================================
//
// Usage examples:
//   MaskFE --base photo.jpg --mask "masks/*.png" --output mask.png
//   MaskFE --base photo.jpg --mask logo.png --at 120,40 --scale 0.5 -o out.png --preview prev.png
//   MaskFE --base photo.jpg --polygon "10,10 110,10 60,90" --brush 300,200 --brush-size 40 -o out.png
//
// No window is opened. Every placed mask and every drawn shape goes through
// the same session and exporter as the GUI, so the result matches what the
// editor would produce for the same inputs.

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Instant;

use clap::Parser;
use eframe::egui::Pos2;
use image::RgbaImage;

use crate::components::tools::DrawingTool;
use crate::error::{MaskError, Result};
use crate::io::{IMAGE_EXTENSIONS, load_image, write_png};
use crate::ops::export;
use crate::ops::transform::PointerEvent;
use crate::session::MaskSession;
use crate::settings::Settings;

// ============================================================================
// CLI argument definition (clap Derive)
// ============================================================================

/// MaskFE headless mask composer.
#[derive(Parser, Debug)]
#[command(
    name = "MaskFE",
    about = "MaskFE headless binary mask composer",
    long_about = "Place mask images and draw polygons or brush dabs over a base image,\n\
                  then write the black/white mask without opening the GUI.\n\n\
                  Coordinates are in the fitted canvas (the base image scaled to fit\n\
                  --max-width × --max-height).\n\n\
                  Example:\n  \
                  MaskFE --base photo.jpg --mask \"masks/*.png\" --output mask.png"
)]
pub struct CliArgs {
    /// Base image the mask is composed over.
    #[arg(short, long, value_name = "FILE")]
    pub base: PathBuf,

    /// Mask image(s) to place. Glob patterns accepted (e.g. "masks/*.png").
    /// Later files draw on top of earlier ones.
    #[arg(short, long, num_args = 1.., value_name = "PATTERN")]
    pub mask: Vec<String>,

    /// Top-left corner for every placed mask, as X,Y.
    #[arg(long, default_value = "50,50", value_name = "X,Y")]
    pub at: String,

    /// Scale for every placed mask (natural size × scale).
    #[arg(long, default_value_t = 0.3)]
    pub scale: f32,

    /// Polygon to fill, as space-separated X,Y vertices. Repeatable.
    #[arg(long, value_name = "\"X,Y X,Y X,Y ...\"")]
    pub polygon: Vec<String>,

    /// Brush dab centre, as X,Y. Repeatable.
    #[arg(long, value_name = "X,Y")]
    pub brush: Vec<String>,

    /// Brush diameter (5–100).
    #[arg(long, default_value_t = 20.0)]
    pub brush_size: f32,

    /// Working canvas box the base image is fitted into.
    #[arg(long, default_value_t = 800)]
    pub max_width: u32,
    #[arg(long, default_value_t = 600)]
    pub max_height: u32,

    /// Output mask (PNG).
    #[arg(short, long, value_name = "FILE")]
    pub output: PathBuf,

    /// Also write the base image with the mask painted white over it.
    #[arg(short, long, value_name = "FILE")]
    pub preview: Option<PathBuf>,

    /// Print per-step details.
    #[arg(short, long)]
    pub verbose: bool,
}

impl CliArgs {
    /// Returns `true` when a CLI-mode flag is present in the real process arguments.
    /// Used by `main()` to route before creating an eframe window.
    pub fn is_cli_mode() -> bool {
        std::env::args().any(|a| a == "--base" || a == "-b" || a == "--help" || a == "-h")
    }
}

/// Everything the composer needs once files are decoded and arguments parsed.
#[derive(Debug, Clone)]
pub struct ComposeJob {
    pub at: Pos2,
    pub scale: f32,
    pub polygons: Vec<Vec<Pos2>>,
    pub brush: Vec<Pos2>,
    pub brush_size: f32,
    pub max_canvas: (u32, u32),
}

pub struct Composition {
    pub mask: RgbaImage,
    pub preview: RgbaImage,
}

// ============================================================================
// Public entry point
// ============================================================================

/// Run the composition and return an OS exit code.
/// `0` = mask written, `1` = any failure.
pub fn run(args: CliArgs) -> ExitCode {
    let start = Instant::now();
    match run_inner(&args) {
        Ok(marked) => {
            println!(
                "wrote {} ({} marked pixels) in {:.0} ms",
                args.output.display(),
                marked,
                start.elapsed().as_secs_f64() * 1000.0
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            log_err!("CLI run failed: {e}");
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run_inner(args: &CliArgs) -> Result<usize> {
    let job = ComposeJob {
        at: parse_point(&args.at)?,
        scale: args.scale,
        polygons: args.polygon.iter().map(|p| parse_polygon(p)).collect::<Result<_>>()?,
        brush: args.brush.iter().map(|p| parse_point(p)).collect::<Result<_>>()?,
        brush_size: args.brush_size,
        max_canvas: (args.max_width, args.max_height),
    };
    if !(job.scale.is_finite() && job.scale > 0.0) {
        return Err(MaskError::InvalidInput(format!("scale must be positive, got {}", job.scale)));
    }

    let base = load_image(&args.base)?;
    if args.verbose {
        println!("base: {} ({}x{})", args.base.display(), base.width(), base.height());
    }

    let mask_paths = resolve_inputs(&args.mask);
    if !args.mask.is_empty() && mask_paths.is_empty() {
        return Err(MaskError::InvalidInput("no mask files matched the given pattern(s)".into()));
    }
    let mut masks = Vec::with_capacity(mask_paths.len());
    for path in &mask_paths {
        let name = path
            .file_name()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| "mask".to_string());
        if args.verbose {
            println!("mask: {}", path.display());
        }
        masks.push((name, load_image(path)?));
    }

    let out = compose(&job, base, masks)?;
    write_png(&out.mask, &args.output)?;
    if let Some(preview) = &args.preview {
        write_png(&out.preview, preview)?;
        if args.verbose {
            println!("preview: {}", preview.display());
        }
    }
    Ok(export::marked_count(&out.mask))
}

/// Union of the placed-mask export and the drawn-mask export over `base`.
pub fn compose(job: &ComposeJob, base: RgbaImage, masks: Vec<(String, RgbaImage)>) -> Result<Composition> {
    if masks.is_empty() && job.polygons.is_empty() && job.brush.is_empty() {
        return Err(MaskError::InvalidInput("nothing to compose: give --mask, --polygon or --brush".into()));
    }

    let settings = Settings {
        default_mask_scale: job.scale,
        brush_size: job.brush_size,
        max_canvas_width: job.max_canvas.0,
        max_canvas_height: job.max_canvas.1,
        ..Settings::default()
    };
    let mut session = MaskSession::new(&settings);

    let fitted = session.load_editor_base(base);
    for (name, img) in masks {
        let id = session.add_mask(name, img);
        if let Some(m) = session.mask_mut(id) {
            m.pos = job.at;
        }
    }

    let base_img = session
        .arena()
        .get(fitted.surface)
        .cloned()
        .ok_or(MaskError::EmptyImage)?;
    session.load_drawing_base(base_img.clone());

    if !job.polygons.is_empty() {
        session.drawing_mut().set_tool(DrawingTool::Pen);
        for poly in &job.polygons {
            for p in poly {
                session.drawing_pointer(PointerEvent::Down(*p));
            }
            session.complete_pen_path();
        }
    }
    if !job.brush.is_empty() {
        session.drawing_mut().set_tool(DrawingTool::Brush);
        for p in &job.brush {
            session.drawing_pointer(PointerEvent::Down(*p));
            session.drawing_pointer(PointerEvent::Up);
        }
    }

    let drawn = session.export_drawn().ok_or(MaskError::EmptyImage)?;
    let mask = match session.export_placed() {
        Some(placed) => export::merge(&placed, &drawn)
            .ok_or_else(|| MaskError::InvalidInput("placed and drawn masks differ in size".into()))?,
        None => drawn,
    };
    let preview = export::composite_preview(&base_img, &mask);
    Ok(Composition { mask, preview })
}

// ============================================================================
// Helpers
// ============================================================================

/// `"x,y"` → point. Whitespace around either number is allowed.
pub fn parse_point(s: &str) -> Result<Pos2> {
    let bad = || MaskError::InvalidInput(format!("expected X,Y, got '{s}'"));
    let (x, y) = s.split_once(',').ok_or_else(bad)?;
    let x: f32 = x.trim().parse().map_err(|_| bad())?;
    let y: f32 = y.trim().parse().map_err(|_| bad())?;
    if !(x.is_finite() && y.is_finite()) {
        return Err(bad());
    }
    Ok(Pos2::new(x, y))
}

/// `"x,y x,y x,y"` → vertices. At least three are required.
pub fn parse_polygon(s: &str) -> Result<Vec<Pos2>> {
    let points = s.split_whitespace().map(parse_point).collect::<Result<Vec<_>>>()?;
    if points.len() < 3 {
        return Err(MaskError::InvalidInput(format!(
            "polygon needs at least 3 points, got {} in '{s}'",
            points.len()
        )));
    }
    Ok(points)
}

/// Mask files named by `patterns`, deduplicated, in the order given.
///
/// A pattern may be a file, a folder or a glob. Folders contribute their image
/// files sorted by name, without recursing. Only files with one of
/// [`IMAGE_EXTENSIONS`] are kept, so `masks/*` picks up the masks and skips
/// notes or sidecar files next to them.
fn resolve_inputs(patterns: &[String]) -> Vec<PathBuf> {
    let mut result: Vec<PathBuf> = Vec::new();
    let keep = |path: PathBuf, result: &mut Vec<PathBuf>| {
        if path.is_file() && has_image_extension(&path) && !result.contains(&path) {
            result.push(path);
        }
    };

    for pattern in patterns {
        let as_path = Path::new(pattern);

        if as_path.is_dir() {
            let mut entries: Vec<PathBuf> = match std::fs::read_dir(as_path) {
                Ok(dir) => dir.flatten().map(|e| e.path()).collect(),
                Err(e) => {
                    eprintln!("warning: cannot read folder '{}': {}", pattern, e);
                    continue;
                }
            };
            entries.sort();
            let before = result.len();
            for entry in entries {
                keep(entry, &mut result);
            }
            if result.len() == before {
                eprintln!("warning: folder '{}' holds no mask images.", pattern);
            }
            continue;
        }

        if as_path.exists() {
            if !has_image_extension(as_path) {
                eprintln!("warning: '{}' is not a supported image, skipped.", pattern);
            }
            keep(as_path.to_path_buf(), &mut result);
            continue;
        }

        match glob::glob(pattern) {
            Ok(entries) => {
                let before = result.len();
                for entry in entries.flatten() {
                    keep(entry, &mut result);
                }
                if result.len() == before {
                    eprintln!("warning: pattern '{}' matched no mask images.", pattern);
                }
            }
            Err(e) => {
                eprintln!("warning: invalid glob '{}': {}", pattern, e);
            }
        }
    }

    result
}

/// `true` for paths ending in one of [`IMAGE_EXTENSIONS`], in any case.
fn has_image_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| IMAGE_EXTENSIONS.iter().any(|known| ext.eq_ignore_ascii_case(known)))
}

#[cfg(test)]
#[path = "cli_test.rs"]
mod cli_test;
