//! # Common Components
//!
//! Shared utilities and data structures used by the processing and masking
//! layers.
//!
//! ## Modules
//!
//! - [`pixels`]: Pixel buffer and mask record types
//! - [`image_io`]: Image file loading and saving through the `image` crate
//! - [`config`]: TOML pipeline configuration

pub mod pixels;
pub mod image_io;
pub mod config;
