//! # Buffer Transforms
//!
//! Applies a byte operation to every byte of a pixel buffer. R, G and B bytes
//! are treated alike and no byte depends on its neighbours.
//!
//! ## Execution
//!
//! Each call allocates one output buffer of the input's length. With the
//! `multithreaded` feature, buffers larger than [`CHUNK_SIZE`] are split into
//! pixel-aligned chunks that rayon workers fill in place; every worker owns a
//! disjoint slice of the output and the buffer is only handed back once all of
//! them are done.

use log::debug;

#[cfg(feature = "multithreaded")]
use rayon::prelude::*;

use crate::common::pixels::{PixelBuffer, CHANNELS};
use crate::error::{Error, Result};
use crate::processing::byte_ops::{self, ByteOp, Direction};

/// Bytes handled per parallel work item (64Ki pixels).
pub const CHUNK_SIZE: usize = CHANNELS * 64 * 1024;

/// XOR two buffers byte by byte.
///
/// The result takes the dimensions of `a`.
///
/// # Errors
/// - [`Error::SizeMismatch`] if the buffers differ in length
pub fn xor_buffers(a: &PixelBuffer, b: &PixelBuffer) -> Result<PixelBuffer> {
    if a.len() != b.len() {
        return Err(Error::SizeMismatch {
            left: a.len(),
            right: b.len(),
        });
    }

    debug!("XOR over {} bytes", a.len());
    let data = zip_bytes(a.as_bytes(), b.as_bytes());
    a.with_data(data)
}

/// Shift every byte of `buffer` by `bits` in `direction`.
///
/// # Errors
/// - [`Error::InvalidBitCount`] if `bits > 8`
pub fn shift_buffer(buffer: &PixelBuffer, bits: u32, direction: Direction) -> Result<PixelBuffer> {
    let op = ByteOp::shift(bits, direction)?;
    debug!("Shift {} by {} over {} bytes", direction, bits, buffer.len());
    apply_op(buffer, op)
}

/// Rotate every byte of `buffer` by `bits` in `direction`.
///
/// # Errors
/// - [`Error::InvalidBitCount`] if `bits > 8`
pub fn rotate_buffer(buffer: &PixelBuffer, bits: u32, direction: Direction) -> Result<PixelBuffer> {
    let op = ByteOp::rotate(bits, direction)?;
    debug!("Rotate {} by {} over {} bytes", direction, bits, buffer.len());
    apply_op(buffer, op)
}

/// Size the worker pool used for chunked transforms.
///
/// Must run before the first transform; later calls keep the existing pool and
/// return `false`.
#[cfg(feature = "multithreaded")]
pub fn configure_workers(threads: usize) -> bool {
    match rayon::ThreadPoolBuilder::new().num_threads(threads).build_global() {
        Ok(()) => {
            debug!("Transform pool sized to {} threads", threads);
            true
        }
        Err(e) => {
            log::warn!("Keeping existing transform pool: {}", e);
            false
        }
    }
}

#[cfg(not(feature = "multithreaded"))]
pub fn configure_workers(threads: usize) -> bool {
    debug!("Built without multithreading, ignoring {} threads", threads);
    false
}

/// Apply an already validated [`ByteOp`] to every byte.
pub fn apply_op(buffer: &PixelBuffer, op: ByteOp) -> Result<PixelBuffer> {
    let data = map_bytes(buffer.as_bytes(), op);
    buffer.with_data(data)
}

#[cfg(feature = "multithreaded")]
fn map_bytes(src: &[u8], op: ByteOp) -> Vec<u8> {
    let mut out = vec![0u8; src.len()];
    if src.len() <= CHUNK_SIZE {
        map_chunk(&mut out, src, op);
        return out;
    }

    out.par_chunks_mut(CHUNK_SIZE)
        .zip(src.par_chunks(CHUNK_SIZE))
        .for_each(|(dst, src)| map_chunk(dst, src, op));
    out
}

#[cfg(not(feature = "multithreaded"))]
fn map_bytes(src: &[u8], op: ByteOp) -> Vec<u8> {
    let mut out = vec![0u8; src.len()];
    map_chunk(&mut out, src, op);
    out
}

#[cfg(feature = "multithreaded")]
fn zip_bytes(a: &[u8], b: &[u8]) -> Vec<u8> {
    let mut out = vec![0u8; a.len()];
    if a.len() <= CHUNK_SIZE {
        xor_chunk(&mut out, a, b);
        return out;
    }

    out.par_chunks_mut(CHUNK_SIZE)
        .zip(a.par_chunks(CHUNK_SIZE))
        .zip(b.par_chunks(CHUNK_SIZE))
        .for_each(|((dst, a), b)| xor_chunk(dst, a, b));
    out
}

#[cfg(not(feature = "multithreaded"))]
fn zip_bytes(a: &[u8], b: &[u8]) -> Vec<u8> {
    let mut out = vec![0u8; a.len()];
    xor_chunk(&mut out, a, b);
    out
}

#[inline]
fn map_chunk(dst: &mut [u8], src: &[u8], op: ByteOp) {
    for (d, s) in dst.iter_mut().zip(src) {
        *d = op.apply(*s);
    }
}

#[inline]
fn xor_chunk(dst: &mut [u8], a: &[u8], b: &[u8]) {
    for ((d, a), b) in dst.iter_mut().zip(a).zip(b) {
        *d = byte_ops::xor(*a, *b);
    }
}
