//! # Pixel Buffer Processing
//!
//! Reversible byte-level transforms over RGB pixel buffers.
//!
//! - [`byte_ops`]: single-byte XOR, shift and rotate primitives
//! - [`transform`]: the primitives applied across whole buffers
//! - [`pipeline`]: ordered multi-stage transforms and their inverses
//! - [`keygen`]: random key images for XOR stages

pub mod byte_ops;
pub mod keygen;
pub mod pipeline;
pub mod transform;

// Re-export main functions for convenience
pub use byte_ops::{ByteOp, Direction};
pub use pipeline::{Operation, TransformPipeline};
pub use transform::{rotate_buffer, shift_buffer, xor_buffers};
