//! # Byte Operations
//!
//! Pure single-byte primitives: XOR, logical shifts and circular rotations.
//!
//! Bit counts range over `0..=8`. Both ends are well defined: a shift by 8
//! clears the byte, while a rotation by 0 or 8 leaves it unchanged. Anything
//! larger is rejected with [`Error::InvalidBitCount`].

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{Error, Result};

/// Largest accepted shift or rotation amount.
pub const MAX_BITS: u32 = 8;

/// Direction of a shift or rotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Left,
    Right,
}

impl Direction {
    pub fn reversed(self) -> Self {
        match self {
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Left => write!(f, "left"),
            Direction::Right => write!(f, "right"),
        }
    }
}

/// A single-operand byte operation with its bit count.
///
/// Build through [`ByteOp::shift`] or [`ByteOp::rotate`] to get the bit count
/// checked once up front; [`ByteOp::apply`] is then total and can run over a
/// whole buffer without per-byte error handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ByteOp {
    ShiftLeft(u32),
    ShiftRight(u32),
    RotateLeft(u32),
    RotateRight(u32),
}

impl ByteOp {
    pub fn shift(bits: u32, direction: Direction) -> Result<Self> {
        let bits = check_bits(bits)?;
        Ok(match direction {
            Direction::Left => ByteOp::ShiftLeft(bits),
            Direction::Right => ByteOp::ShiftRight(bits),
        })
    }

    pub fn rotate(bits: u32, direction: Direction) -> Result<Self> {
        let bits = check_bits(bits)?;
        Ok(match direction {
            Direction::Left => ByteOp::RotateLeft(bits),
            Direction::Right => ByteOp::RotateRight(bits),
        })
    }

    /// Apply the operation to one byte.
    ///
    /// Shifts of 8 or more clear the byte; rotations wrap modulo 8, so 0 and 8
    /// are both the identity.
    #[inline]
    pub fn apply(self, byte: u8) -> u8 {
        match self {
            ByteOp::ShiftLeft(bits) => byte.checked_shl(bits).unwrap_or(0),
            ByteOp::ShiftRight(bits) => byte.checked_shr(bits).unwrap_or(0),
            ByteOp::RotateLeft(bits) => byte.rotate_left(bits % MAX_BITS),
            ByteOp::RotateRight(bits) => byte.rotate_right(bits % MAX_BITS),
        }
    }
}

/// Check a shift/rotation amount.
///
/// # Errors
/// - [`Error::InvalidBitCount`] if `bits > 8`
pub fn check_bits(bits: u32) -> Result<u32> {
    if bits > MAX_BITS {
        return Err(Error::InvalidBitCount(bits));
    }
    Ok(bits)
}

#[inline]
pub fn xor(a: u8, b: u8) -> u8 {
    a ^ b
}

/// Logical right shift; `bits == 8` yields 0.
pub fn shift_right(byte: u8, bits: u32) -> Result<u8> {
    Ok(ByteOp::shift(bits, Direction::Right)?.apply(byte))
}

/// Logical left shift; `bits == 8` yields 0.
pub fn shift_left(byte: u8, bits: u32) -> Result<u8> {
    Ok(ByteOp::shift(bits, Direction::Left)?.apply(byte))
}

/// Circular right rotation. Rotating by 0 or 8 is the identity.
pub fn rotate_right(byte: u8, bits: u32) -> Result<u8> {
    Ok(ByteOp::rotate(bits, Direction::Right)?.apply(byte))
}

/// Circular left rotation. Rotating by 0 or 8 is the identity.
pub fn rotate_left(byte: u8, bits: u32) -> Result<u8> {
    Ok(ByteOp::rotate(bits, Direction::Left)?.apply(byte))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_xor_is_self_inverse() {
        for a in 0..=255u8 {
            for b in [0u8, 1, 0x5A, 0xA5, 0xFF] {
                assert_eq!(xor(xor(a, b), b), a);
            }
            assert_eq!(xor(a, a), 0);
        }
    }

    #[test]
    fn test_shift_boundaries() {
        assert_eq!(shift_right(0xFF, 0).unwrap(), 0xFF);
        assert_eq!(shift_left(0xFF, 0).unwrap(), 0xFF);
        assert_eq!(shift_right(0xFF, 8).unwrap(), 0);
        assert_eq!(shift_left(0xFF, 8).unwrap(), 0);
        assert_eq!(shift_right(0b1000_0000, 7).unwrap(), 1);
        assert_eq!(shift_left(0b0000_0011, 7).unwrap(), 0b1000_0000);
    }

    #[test]
    fn test_shift_values() {
        assert_eq!(shift_right(10, 3).unwrap(), 1);
        assert_eq!(shift_right(60, 3).unwrap(), 7);
        assert_eq!(shift_left(5, 5).unwrap(), 160);
    }

    #[test]
    fn test_rotate_roundtrip() {
        for a in 0..=255u8 {
            for n in 1..8 {
                assert_eq!(rotate_left(rotate_right(a, n).unwrap(), n).unwrap(), a);
                assert_eq!(rotate_right(rotate_left(a, n).unwrap(), n).unwrap(), a);
            }
        }
    }

    #[test]
    fn test_rotate_identity_at_zero_and_eight() {
        for a in 0..=255u8 {
            assert_eq!(rotate_left(a, 0).unwrap(), a);
            assert_eq!(rotate_right(a, 0).unwrap(), a);
            assert_eq!(rotate_left(a, 8).unwrap(), a);
            assert_eq!(rotate_right(a, 8).unwrap(), a);
        }
    }

    #[test]
    fn test_rotate_values() {
        assert_eq!(rotate_right(0b0000_0001, 1).unwrap(), 0b1000_0000);
        assert_eq!(rotate_left(0b1000_0001, 3).unwrap(), 0b0000_1100);
    }

    #[test]
    fn test_invalid_bit_count() {
        assert!(matches!(shift_right(1, 9), Err(Error::InvalidBitCount(9))));
        assert!(matches!(shift_left(1, 100), Err(Error::InvalidBitCount(100))));
        assert!(matches!(rotate_left(1, 9), Err(Error::InvalidBitCount(9))));
        assert!(matches!(rotate_right(1, u32::MAX), Err(Error::InvalidBitCount(_))));
    }
}
