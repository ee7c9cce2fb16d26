//! Shared numeric and colour constants.

use image::Rgba;

// -- Canvas ------------------------------------------------------------------

/// Working canvas size used before any base image has been loaded.
pub const DEFAULT_CANVAS_WIDTH: u32 = 800;
pub const DEFAULT_CANVAS_HEIGHT: u32 = 600;

// -- Placed masks ------------------------------------------------------------

/// Half-extent of the square hit region around each resize corner.
pub const HANDLE_SIZE: f32 = 8.0;

/// Floor applied to a placed mask's rendered width and height.
pub const MIN_MASK_SIZE: f32 = 20.0;

/// Scale given to a freshly placed mask (natural size × scale).
pub const DEFAULT_MASK_SCALE: f32 = 0.3;

/// Top-left corner given to a freshly placed mask.
pub const DEFAULT_MASK_POS: (f32, f32) = (50.0, 50.0);

/// Multiplier applied by zoom in (and divided by zoom out).
pub const ZOOM_STEP: f32 = 1.1;

/// Opacity used when drawing placed masks over the base image.
pub const MASK_OVERLAY_ALPHA: f32 = 0.7;

// -- Drawing -----------------------------------------------------------------

pub const BRUSH_SIZE_MIN: f32 = 5.0;
pub const BRUSH_SIZE_MAX: f32 = 100.0;
pub const BRUSH_SIZE_STEP: f32 = 5.0;
pub const DEFAULT_BRUSH_SIZE: f32 = 20.0;

/// Minimum number of pen vertices before a polygon can be committed.
pub const MIN_PEN_POINTS: usize = 3;

/// Reserved truth-layer colour meaning "masked".
pub const MARKER: Rgba<u8> = Rgba([255, 255, 255, 255]);

/// Per-channel slack allowed when classifying a pixel as the marker colour.
pub const MARKER_TOLERANCE: u8 = 2;

/// What the user sees on the display layer for brush and pen marks.
pub const DISPLAY_TINT: Rgba<u8> = Rgba([0, 255, 255, 150]);

// -- Export ------------------------------------------------------------------

pub const MASK_ON: Rgba<u8> = Rgba([255, 255, 255, 255]);
pub const MASK_OFF: Rgba<u8> = Rgba([0, 0, 0, 255]);

// -- History -----------------------------------------------------------------

pub const DEFAULT_MAX_UNDO_STEPS: usize = 50;
pub const DEFAULT_MAX_HISTORY_MB: usize = 256;
