//! # Mask Application and Verification
//!
//! Masking adds a mask image's channels onto a transformed image, starting at
//! a byte offset, and records the unclamped sums. Unlike the XOR/shift/rotate
//! transforms this is plain addition: sums go up to 510 and nothing wraps.
//!
//! Verification runs the same addition over a freshly loaded buffer and
//! compares the sums with a previously written record. Mismatches are reported,
//! not raised: a verification pass always completes.

use log::{debug, info, warn};

use crate::common::pixels::{MaskFile, MaskTriple, MaskedChannel, PixelBuffer, CHANNELS};
use crate::error::{Error, Result};
use crate::masking::report::VerificationReport;

/// Applies one mask image to transformed buffers and checks buffers against
/// the resulting records.
#[derive(Debug, Clone)]
pub struct MaskVerifier {
    mask: PixelBuffer,
}

impl MaskVerifier {
    pub fn new(mask: PixelBuffer) -> Self {
        Self { mask }
    }

    /// Add the mask onto `transformed` starting at byte `offset`.
    ///
    /// Produces one triple per mask pixel, in pixel order, paired with the
    /// offset.
    ///
    /// # Errors
    /// - [`Error::BufferTooSmall`] if `offset + mask length` exceeds the
    ///   transformed buffer; no record is produced
    pub fn apply_mask(&self, transformed: &PixelBuffer, offset: usize) -> Result<MaskFile> {
        let region = region(transformed, offset, self.mask.len())?;

        let triples: Vec<MaskTriple> = self
            .mask
            .as_bytes()
            .chunks_exact(CHANNELS)
            .zip(region.chunks_exact(CHANNELS))
            .map(|(mask, pixel)| sum_triple(pixel, mask))
            .collect();

        debug!("Masked {} pixels at offset {}", triples.len(), offset);
        Ok(MaskFile::new(offset, triples))
    }

    /// Compare `actual` against a masking record written at byte `offset`.
    ///
    /// For each record entry `k`, the mask is added onto the bytes at
    /// `offset + 3k .. offset + 3k + 3` and the sums are compared with the
    /// entry.
    ///
    /// # Errors
    /// - [`Error::SizeMismatch`] if the record does not have one entry per
    ///   mask pixel
    /// - [`Error::BufferTooSmall`] if `actual` ends before the masked region
    pub fn verify(&self, actual: &PixelBuffer, record: &[MaskTriple], offset: usize) -> Result<VerificationReport> {
        let expected_len = record.len() * CHANNELS;
        if self.mask.len() != expected_len {
            return Err(Error::SizeMismatch {
                left: self.mask.len(),
                right: expected_len,
            });
        }

        let region = region(actual, offset, expected_len)?;
        let mut report = VerificationReport::new(offset);

        let derived = self
            .mask
            .as_bytes()
            .chunks_exact(CHANNELS)
            .zip(region.chunks_exact(CHANNELS))
            .map(|(mask, pixel)| sum_triple(pixel, mask));

        for (pixel, (expected, actual)) in record.iter().zip(derived).enumerate() {
            report.record(pixel, *expected, actual);
        }

        match report.first_mismatch() {
            None => info!("✅ {}", report.summary()),
            Some(first) => warn!(
                "❌ {} (first at pixel {}: expected {:?}, got {:?})",
                report.summary(),
                first.pixel,
                first.expected,
                first.actual
            ),
        }

        Ok(report)
    }

    /// [`verify`](Self::verify) against a decoded masking file, using its
    /// stored offset.
    pub fn verify_file(&self, actual: &PixelBuffer, mask_file: &MaskFile) -> Result<VerificationReport> {
        self.verify(actual, &mask_file.triples, mask_file.offset)
    }
}

/// The `len` bytes of `buffer` starting at `offset`, or `BufferTooSmall`.
fn region(buffer: &PixelBuffer, offset: usize, len: usize) -> Result<&[u8]> {
    let available = buffer.len().saturating_sub(offset);

    match offset.checked_add(len) {
        Some(end) if end <= buffer.len() => Ok(&buffer.as_bytes()[offset..end]),
        _ => Err(Error::BufferTooSmall {
            offset,
            needed: len,
            available,
        }),
    }
}

#[inline]
fn sum_triple(pixel: &[u8], mask: &[u8]) -> MaskTriple {
    [
        pixel[0] as MaskedChannel + mask[0] as MaskedChannel,
        pixel[1] as MaskedChannel + mask[1] as MaskedChannel,
        pixel[2] as MaskedChannel + mask[2] as MaskedChannel,
    ]
}
