//! # Pixel Data Structures
//!
//! Shared data types passed between the image codec, the transform stages and
//! the masking layer.
//!
//! Two channel types are kept apart on purpose: [`Channel`] is a plain 8-bit
//! colour value, while [`MaskedChannel`] holds the sum of two channels and can
//! exceed 255.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// One 8-bit colour component (R, G or B).
pub type Channel = u8;

/// A colour component produced by adding a mask channel onto a transformed
/// channel. Ranges over 0..=510 in practice.
pub type MaskedChannel = u32;

/// Summed (R, G, B) values of one masked pixel.
pub type MaskTriple = [MaskedChannel; 3];

/// Number of channels per pixel. Buffers are always RGB.
pub const CHANNELS: usize = 3;

/// An owned RGB pixel buffer: row-major, 3 bytes per pixel, no row padding.
///
/// The dimensions are fixed at construction and the data length always equals
/// `width * height * 3`. Transforms never mutate a buffer; they build a new one
/// through [`PixelBuffer::with_data`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    data: Vec<Channel>,
}

impl PixelBuffer {
    /// Wrap raw RGB data, checking that it matches the given dimensions.
    ///
    /// # Errors
    /// - [`Error::InvalidDimensions`] if `data.len() != width * height * 3`
    ///
    /// # Example
    /// ```
    /// use pixmask::PixelBuffer;
    ///
    /// let buffer = PixelBuffer::new(2, 1, vec![10, 20, 30, 40, 50, 60]).unwrap();
    /// assert_eq!(buffer.pixel_count(), 2);
    /// ```
    pub fn new(width: u32, height: u32, data: Vec<Channel>) -> Result<Self> {
        let expected = (width as usize)
            .checked_mul(height as usize)
            .and_then(|pixels| pixels.checked_mul(CHANNELS));

        if expected != Some(data.len()) {
            return Err(Error::InvalidDimensions {
                width,
                height,
                len: data.len(),
            });
        }

        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Build a buffer with the same dimensions as `self` around new data.
    ///
    /// Used by the transform stages, which always produce output of the same
    /// length as their input.
    pub fn with_data(&self, data: Vec<Channel>) -> Result<Self> {
        Self::new(self.width, self.height, data)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Length of the buffer in bytes.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn pixel_count(&self) -> usize {
        self.data.len() / CHANNELS
    }

    pub fn as_bytes(&self) -> &[Channel] {
        &self.data
    }

    pub fn into_bytes(self) -> Vec<Channel> {
        self.data
    }
}

/// An offset plus the ordered mask record produced at that offset.
///
/// This is the unit persisted in a masking text file.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MaskFile {
    /// Byte position in the transformed buffer where masking starts.
    pub offset: usize,
    /// One summed triple per mask pixel, in ascending pixel order.
    pub triples: Vec<MaskTriple>,
}

impl MaskFile {
    pub fn new(offset: usize, triples: Vec<MaskTriple>) -> Self {
        Self { offset, triples }
    }

    pub fn pixel_count(&self) -> usize {
        self.triples.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_rejects_wrong_length() {
        let result = PixelBuffer::new(2, 2, vec![0; 11]);
        assert!(matches!(
            result,
            Err(Error::InvalidDimensions {
                width: 2,
                height: 2,
                len: 11
            })
        ));
    }

    #[test]
    fn test_byte_access() {
        let buffer = PixelBuffer::new(2, 1, vec![10, 20, 30, 40, 50, 60]).unwrap();

        assert_eq!(buffer.len(), 6);
        assert_eq!(buffer.pixel_count(), 2);
        assert_eq!(&buffer.as_bytes()[3..], &[40, 50, 60]);
        assert_eq!(buffer.into_bytes(), vec![10, 20, 30, 40, 50, 60]);
    }

    #[test]
    fn test_overflowing_dimensions_rejected() {
        assert!(matches!(
            PixelBuffer::new(u32::MAX, u32::MAX, Vec::new()),
            Err(Error::InvalidDimensions { len: 0, .. })
        ));
    }

    #[test]
    fn test_with_data_keeps_dimensions() {
        let buffer = PixelBuffer::new(1, 2, vec![1; 6]).unwrap();
        let other = buffer.with_data(vec![2; 6]).unwrap();

        assert_eq!(other.width(), 1);
        assert_eq!(other.height(), 2);
        assert!(buffer.with_data(vec![2; 3]).is_err());
    }

    #[test]
    fn test_empty_buffer_is_valid() {
        let buffer = PixelBuffer::new(0, 5, Vec::new()).unwrap();
        assert!(buffer.is_empty());
        assert_eq!(buffer.pixel_count(), 0);
    }
}
