//! MaskFE: compose binary object masks over a base image.
//!
//! Masks come from two sources. Pre-made mask images are placed, dragged
//! and corner-resized over the base ([`ops::transform`]). Masks can also be
//! painted directly with a brush or a polygon pen ([`components::tools`]),
//! which keeps an exact truth layer apart from the tinted layer the user
//! sees. Either way the result goes through one classifier
//! ([`ops::export`]) into a strict black/white raster.
//!
//! [`session::MaskSession`] ties the pieces together. The desktop front-end
//! (`app`) and the headless CLI (`cli`) both drive it.

#[macro_use]
pub mod logger;

pub mod app;
pub mod canvas;
pub mod cli;
pub mod components;
pub mod consts;
pub mod error;
pub mod io;
pub mod ops;
pub mod session;
pub mod settings;
