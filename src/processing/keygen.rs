//! Random key images for XOR stages.

use log::debug;
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};

use crate::common::pixels::{PixelBuffer, CHANNELS};
use crate::error::{Error, Result};

/// Generate a `width` x `height` image of uniformly random bytes.
///
/// With a `seed` the output is reproducible, which lets a key image be
/// regenerated instead of stored.
///
/// # Errors
/// - [`Error::InvalidDimensions`] if the byte length overflows `usize`
pub fn random_key(width: u32, height: u32, seed: Option<u64>) -> Result<PixelBuffer> {
    let len = (width as usize)
        .checked_mul(height as usize)
        .and_then(|pixels| pixels.checked_mul(CHANNELS))
        .ok_or(Error::InvalidDimensions { width, height, len: 0 })?;

    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let mut data = vec![0u8; len];
    rng.fill_bytes(&mut data);

    debug!("Generated {}x{} key (seeded: {})", width, height, seed.is_some());
    PixelBuffer::new(width, height, data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processing::transform::xor_buffers;

    #[test]
    fn test_seeded_key_is_reproducible() {
        let a = random_key(8, 4, Some(42)).unwrap();
        let b = random_key(8, 4, Some(42)).unwrap();
        let c = random_key(8, 4, Some(43)).unwrap();

        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(a.len(), 8 * 4 * 3);
    }

    #[test]
    fn test_overflowing_dimensions_rejected() {
        assert!(matches!(
            random_key(u32::MAX, u32::MAX, Some(1)),
            Err(Error::InvalidDimensions {
                width: u32::MAX,
                height: u32::MAX,
                ..
            })
        ));
    }

    #[test]
    fn test_key_works_as_xor_operand() {
        let image = PixelBuffer::new(4, 4, vec![0x55; 48]).unwrap();
        let key = random_key(4, 4, None).unwrap();

        let encrypted = xor_buffers(&image, &key).unwrap();
        assert_eq!(xor_buffers(&encrypted, &key).unwrap(), image);
    }
}
