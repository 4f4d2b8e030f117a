//! # Masking
//!
//! Produces and checks the masking artifact: an offset plus the summed RGB
//! triples of a mask image laid over a transformed image.
//!
//! - [`verifier`]: mask application (generate) and verification (compare)
//! - [`codec`]: the plain-text masking file format
//! - [`report`]: verification results and their JSON export

pub mod codec;
pub mod report;
pub mod verifier;

pub use report::{Mismatch, VerificationReport};
pub use verifier::MaskVerifier;
