//! # Error Types
//!
//! Every fallible operation in the library returns [`Result`], carrying one of
//! the [`Error`] kinds below. Errors are plain values: nothing panics across a
//! module boundary, and the binary decides whether to halt or carry on.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors produced by the transform, masking and image I/O layers.
#[derive(Debug, Error)]
pub enum Error {
    /// The image file is missing, unreadable or could not be decoded.
    #[error("failed to load image '{path}': {source}")]
    ImageLoad {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    /// The image could not be encoded or written.
    #[error("failed to save image '{path}': {reason}")]
    ImageSave { path: PathBuf, reason: String },

    /// Two operand buffers that must have equal length do not.
    #[error("buffer size mismatch: {left} bytes vs {right} bytes")]
    SizeMismatch { left: usize, right: usize },

    /// A shift or rotation was requested with more than 8 bits.
    #[error("invalid bit count {0}: must be between 0 and 8")]
    InvalidBitCount(u32),

    /// The mask does not fit inside the transformed buffer at the given offset.
    #[error("buffer too small: {needed} bytes needed from offset {offset}, only {available} available")]
    BufferTooSmall {
        offset: usize,
        needed: usize,
        available: usize,
    },

    /// The masking text could not be parsed.
    #[error("malformed mask file: {0}")]
    MalformedMaskFile(String),

    /// Pixel data length does not match `width * height * 3`.
    #[error("invalid dimensions {width}x{height} for {len} bytes of RGB data")]
    InvalidDimensions { width: u32, height: u32, len: usize },

    /// A pipeline containing an information-destroying stage was asked for its inverse.
    #[error("stage {stage} ({operation}) cannot be inverted")]
    IrreversibleStep { stage: usize, operation: String },

    /// An XOR stage references a key image that was not supplied.
    #[error("stage {stage} references key #{key}, but only {available} key(s) were loaded")]
    MissingKey {
        stage: usize,
        key: usize,
        available: usize,
    },

    /// A masking checkpoint was requested without a mask image.
    #[error("a stage writes a masking file but no mask image was configured")]
    MissingMask,

    #[error(transparent)]
    Io(#[from] io::Error),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;
