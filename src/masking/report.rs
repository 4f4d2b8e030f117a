//! # Verification Reports
//!
//! Tallies the outcome of one verification pass: every compared pixel is
//! counted, the first few mismatches are kept for display, and the whole
//! report can be exported as JSON next to the images it describes.

use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::common::pixels::MaskTriple;

/// Number of mismatching pixels kept in a report; later ones are only counted.
pub const MAX_REPORTED_MISMATCHES: usize = 10;

/// One pixel whose re-derived sums differ from the masking record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mismatch {
    /// Index into the masking record (0 is the pixel at the offset)
    pub pixel: usize,
    /// Sums stored in the masking record
    pub expected: MaskTriple,
    /// Sums re-derived from the verified buffer and the mask
    pub actual: MaskTriple,
}

/// Outcome of one verification pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationReport {
    pub offset: usize,
    pub total_pixels: usize,
    pub mismatch_count: usize,
    /// The first [`MAX_REPORTED_MISMATCHES`] mismatches, in pixel order
    pub mismatches: Vec<Mismatch>,
    pub all_matched: bool,
}

impl VerificationReport {
    pub fn new(offset: usize) -> Self {
        Self {
            offset,
            total_pixels: 0,
            mismatch_count: 0,
            mismatches: Vec::new(),
            all_matched: true,
        }
    }

    /// Tally one compared pixel.
    pub fn record(&mut self, pixel: usize, expected: MaskTriple, actual: MaskTriple) {
        self.total_pixels += 1;

        if expected != actual {
            self.mismatch_count += 1;
            self.all_matched = false;
            if self.mismatches.len() < MAX_REPORTED_MISMATCHES {
                self.mismatches.push(Mismatch {
                    pixel,
                    expected,
                    actual,
                });
            }
        }
    }

    pub fn first_mismatch(&self) -> Option<&Mismatch> {
        self.mismatches.first()
    }

    /// One-line human readable summary.
    pub fn summary(&self) -> String {
        if self.all_matched {
            format!(
                "all {} pixels from offset {} match the masking record",
                self.total_pixels, self.offset
            )
        } else {
            format!(
                "{} of {} pixels from offset {} do not match the masking record",
                self.mismatch_count, self.total_pixels, self.offset
            )
        }
    }

    pub fn export_to_json<P: AsRef<Path>>(&self, path: P) -> std::io::Result<()> {
        let output = serde_json::json!({
            "generated_at": chrono::Local::now().to_rfc3339(),
            "summary": self.summary(),
            "report": self,
        });

        let json_string = serde_json::to_string_pretty(&output)?;
        let mut file = File::create(path)?;
        file.write_all(json_string.as_bytes())?;

        Ok(())
    }
}
