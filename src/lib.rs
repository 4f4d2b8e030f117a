//! # pixmask
//!
//! Reversible byte-level transforms over RGB pixel buffers (XOR against a key
//! image, bit shifts, bit rotations) and a verifiable masking artifact built
//! on top of them.
//!
//! ## Data flow
//!
//! ```text
//! image file ─► image_io::load ─► TransformPipeline ─┬─► image_io::save
//!                                                    │
//!                      mask image ─► MaskVerifier ◄──┘
//!                                        │
//!                                        ▼
//!                        codec::write_mask_file / verify
//! ```

pub mod common;
pub mod error;
pub mod masking;
pub mod processing;
pub mod runner;

pub use common::image_io;
pub use common::pixels::{Channel, MaskFile, MaskTriple, MaskedChannel, PixelBuffer};
pub use error::{Error, Result};
pub use masking::{MaskVerifier, VerificationReport};
pub use processing::{Direction, Operation, TransformPipeline};
pub use runner::{PipelineRunner, RunSummary};
