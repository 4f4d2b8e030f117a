//! # Transform Pipeline
//!
//! An ordered list of buffer operations run one after another over an image.
//!
//! ## Stage flow
//!
//! ```text
//! input ──► stage 0 ──► stage 1 ──► ... ──► output
//!              │           │
//!              ▼           ▼
//!          observer    observer     (exports, mask checkpoints)
//! ```
//!
//! The whole pipeline is validated before the first stage runs, so a bad bit
//! count or a missing key never leaves a half-run pipeline behind.

use log::info;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::common::pixels::PixelBuffer;
use crate::error::{Error, Result};
use crate::processing::byte_ops::{check_bits, ByteOp, Direction};
use crate::processing::transform;

/// One pipeline stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "lowercase")]
pub enum Operation {
    /// XOR against the key image at index `key`
    Xor { key: usize },
    /// Logical shift of every byte
    Shift { bits: u32, direction: Direction },
    /// Circular rotation of every byte
    Rotate { bits: u32, direction: Direction },
}

impl Operation {
    /// Run this operation as pipeline stage `stage`.
    fn apply_at(&self, stage: usize, input: &PixelBuffer, keys: &[PixelBuffer]) -> Result<PixelBuffer> {
        match *self {
            Operation::Xor { key } => {
                let key_buffer = keys.get(key).ok_or(Error::MissingKey {
                    stage,
                    key,
                    available: keys.len(),
                })?;
                transform::xor_buffers(input, key_buffer)
            }
            Operation::Shift { bits, direction } => {
                transform::apply_op(input, ByteOp::shift(bits, direction)?)
            }
            Operation::Rotate { bits, direction } => {
                transform::apply_op(input, ByteOp::rotate(bits, direction)?)
            }
        }
    }

    /// The operation that undoes this one, if there is one.
    ///
    /// Shifting by 0 is the only reversible shift.
    pub fn inverse(&self) -> Option<Operation> {
        match *self {
            Operation::Xor { key } => Some(Operation::Xor { key }),
            Operation::Rotate { bits, direction } => Some(Operation::Rotate {
                bits,
                direction: direction.reversed(),
            }),
            Operation::Shift { bits: 0, direction } => Some(Operation::Shift {
                bits: 0,
                direction,
            }),
            Operation::Shift { .. } => None,
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::Xor { key } => write!(f, "xor with key #{}", key),
            Operation::Shift { bits, direction } => write!(f, "shift {} {}", direction, bits),
            Operation::Rotate { bits, direction } => write!(f, "rotate {} {}", direction, bits),
        }
    }
}

/// A sequence of operations applied in order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransformPipeline {
    stages: Vec<Operation>,
}

impl TransformPipeline {
    pub fn new(stages: Vec<Operation>) -> Self {
        Self { stages }
    }

    pub fn len(&self) -> usize {
        self.stages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    /// Check every stage against the supplied input and keys without running
    /// anything.
    pub fn validate(&self, input: &PixelBuffer, keys: &[PixelBuffer]) -> Result<()> {
        for (stage, op) in self.stages.iter().enumerate() {
            match *op {
                Operation::Xor { key } => {
                    let key_buffer = keys.get(key).ok_or(Error::MissingKey {
                        stage,
                        key,
                        available: keys.len(),
                    })?;
                    if key_buffer.len() != input.len() {
                        return Err(Error::SizeMismatch {
                            left: input.len(),
                            right: key_buffer.len(),
                        });
                    }
                }
                Operation::Shift { bits, .. } | Operation::Rotate { bits, .. } => {
                    check_bits(bits)?;
                }
            }
        }
        Ok(())
    }

    /// Run all stages and return the final buffer.
    pub fn run(&self, input: &PixelBuffer, keys: &[PixelBuffer]) -> Result<PixelBuffer> {
        self.run_with(input, keys, |_, _, _| Ok(()))
    }

    /// Run all stages, handing each stage's output to `observer` as
    /// `(stage_index, operation, output)` before moving on.
    ///
    /// An observer error stops the pipeline and is returned as is.
    pub fn run_with<F>(&self, input: &PixelBuffer, keys: &[PixelBuffer], mut observer: F) -> Result<PixelBuffer>
    where
        F: FnMut(usize, &Operation, &PixelBuffer) -> Result<()>,
    {
        self.validate(input, keys)?;

        let mut current = input.clone();
        for (stage, op) in self.stages.iter().enumerate() {
            info!("🔧 Stage {}: {}", stage, op);
            current = op.apply_at(stage, &current, keys)?;
            observer(stage, op, &current)?;
        }

        Ok(current)
    }

    /// Build the pipeline that undoes this one.
    ///
    /// # Errors
    /// - [`Error::IrreversibleStep`] for any shift by a non-zero amount, since
    ///   shifted-out bits are lost
    pub fn inverse(&self) -> Result<TransformPipeline> {
        let mut stages = Vec::with_capacity(self.stages.len());

        for (stage, op) in self.stages.iter().enumerate().rev() {
            let inverse = op.inverse().ok_or_else(|| Error::IrreversibleStep {
                stage,
                operation: op.to_string(),
            })?;
            stages.push(inverse);
        }

        Ok(TransformPipeline::new(stages))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn buffer(data: Vec<u8>) -> PixelBuffer {
        let pixels = (data.len() / 3) as u32;
        PixelBuffer::new(pixels, 1, data).unwrap()
    }

    fn challenge_pipeline() -> TransformPipeline {
        TransformPipeline::new(vec![
            Operation::Xor { key: 0 },
            Operation::Rotate {
                bits: 3,
                direction: Direction::Right,
            },
            Operation::Xor { key: 0 },
        ])
    }

    #[test]
    fn test_run_matches_manual_steps() {
        let input = buffer(vec![200, 13, 77, 1, 128, 255]);
        let key = buffer(vec![91, 42, 7, 250, 3, 64]);

        let step1 = transform::xor_buffers(&input, &key).unwrap();
        let step2 = transform::rotate_buffer(&step1, 3, Direction::Right).unwrap();
        let expected = transform::xor_buffers(&step2, &key).unwrap();

        let pipeline = challenge_pipeline();
        assert_eq!(pipeline.len(), 3);

        let output = pipeline.run(&input, &[key]).unwrap();
        assert_eq!(output, expected);
    }

    #[test]
    fn test_inverse_restores_input() {
        let input = buffer((0..=254).collect());
        let key = buffer((0..=254).map(|v: u8| v.wrapping_mul(37)).collect());
        let keys = [key];

        let pipeline = challenge_pipeline();
        let transformed = pipeline.run(&input, &keys).unwrap();
        let restored = pipeline.inverse().unwrap().run(&transformed, &keys).unwrap();

        assert_eq!(restored, input);
    }

    #[test]
    fn test_inverse_rejects_shift() {
        let pipeline = TransformPipeline::new(vec![
            Operation::Xor { key: 0 },
            Operation::Shift {
                bits: 5,
                direction: Direction::Left,
            },
        ]);

        assert!(matches!(
            pipeline.inverse(),
            Err(Error::IrreversibleStep { stage: 1, .. })
        ));
    }

    #[test]
    fn test_missing_key_fails_before_running() {
        let input = buffer(vec![1, 2, 3]);
        let mut observed = 0;

        let result = TransformPipeline::new(vec![
            Operation::Rotate {
                bits: 1,
                direction: Direction::Left,
            },
            Operation::Xor { key: 2 },
        ])
        .run_with(&input, &[], |_, _, _| {
            observed += 1;
            Ok(())
        });

        assert!(matches!(
            result,
            Err(Error::MissingKey {
                stage: 1,
                key: 2,
                available: 0
            })
        ));
        assert_eq!(observed, 0);
    }

    #[test]
    fn test_invalid_bits_fail_validation() {
        let input = buffer(vec![1, 2, 3]);
        let pipeline = TransformPipeline::new(vec![Operation::Shift {
            bits: 9,
            direction: Direction::Right,
        }]);

        assert!(matches!(
            pipeline.run(&input, &[]),
            Err(Error::InvalidBitCount(9))
        ));
    }

    #[test]
    fn test_observer_sees_every_stage() {
        let input = buffer(vec![8, 16, 32]);
        let pipeline = TransformPipeline::new(vec![
            Operation::Shift {
                bits: 1,
                direction: Direction::Right,
            },
            Operation::Shift {
                bits: 2,
                direction: Direction::Right,
            },
        ]);

        let mut seen = Vec::new();
        let output = pipeline
            .run_with(&input, &[], |stage, _, out| {
                seen.push((stage, out.as_bytes().to_vec()));
                Ok(())
            })
            .unwrap();

        assert_eq!(seen, vec![(0, vec![4, 8, 16]), (1, vec![1, 2, 4])]);
        assert_eq!(output.as_bytes(), &[1, 2, 4]);
    }

    #[test]
    fn test_empty_pipeline_is_identity() {
        let input = buffer(vec![9, 8, 7]);
        let pipeline = TransformPipeline::default();

        assert!(pipeline.is_empty());
        assert_eq!(pipeline.run(&input, &[]).unwrap(), input);
    }
}
