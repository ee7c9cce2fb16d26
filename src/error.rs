//! Error type for the fallible edges of the crate: files, codecs, the
//! inpainting service and CLI argument parsing.
//!
//! Editing operations themselves never fail; they refuse or no-op instead.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum MaskError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The service answered, but with a non-success status.
    #[error("service returned {status}: {detail}")]
    Remote { status: u16, detail: String },

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("image has no pixels")]
    EmptyImage,
}

pub type Result<T> = std::result::Result<T, MaskError>;
