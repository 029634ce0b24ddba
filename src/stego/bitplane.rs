// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmcore

//! Least-significant-bit embedding over a flat sample buffer.
//!
//! Bit *i* of the frame replaces the LSB of sample *i*, in the carrier's
//! row-major, channel-interleaved order (B, G, R within each pixel; see
//! [`Carrier::index`]). Each sample changes by at most one intensity level.
//!
//! There is no spreading and no error correction: any modification of the
//! stego samples after embedding (lossy recompression, resizing, colour
//! conversion) corrupts the payload irrecoverably. Stego images must be
//! stored losslessly.
//!
//! [`Carrier::index`]: crate::raster::Carrier::index

use crate::stego::capacity;
use crate::stego::error::StegoError;
use crate::stego::frame::{read_be_bits, LENGTH_HEADER_BITS};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Samples handled per rayon task.
#[cfg(feature = "parallel")]
const PARALLEL_CHUNK: usize = 1 << 16;

/// Write `bits` into the LSBs of a copy of `carrier`.
///
/// The caller's buffer is never modified. Samples past `bits.len()` and all
/// higher bit planes are left as they were.
///
/// # Errors
/// [`StegoError::CapacityExceeded`] if `bits.len() > carrier.len()`; the
/// check runs before the copy is touched.
pub fn embed(carrier: &[u8], bits: &[u8]) -> Result<Vec<u8>, StegoError> {
    capacity::check(carrier, bits)?;

    let mut stego = carrier.to_vec();
    let target = &mut stego[..bits.len()];

    #[cfg(feature = "parallel")]
    target
        .par_chunks_mut(PARALLEL_CHUNK)
        .zip(bits.par_chunks(PARALLEL_CHUNK))
        .for_each(|(t, b)| set_lsbs(t, b));

    #[cfg(not(feature = "parallel"))]
    set_lsbs(target, bits);

    Ok(stego)
}

fn set_lsbs(target: &mut [u8], bits: &[u8]) {
    for (s, &b) in target.iter_mut().zip(bits) {
        *s = (*s & !1) | (b & 1);
    }
}

/// Read the LSBs of the first `count` samples.
///
/// # Errors
/// [`StegoError::FrameCorrupted`] if `count` exceeds the sample count.
pub fn extract(carrier: &[u8], count: usize) -> Result<Vec<u8>, StegoError> {
    read_lsbs(carrier, 0, count)
}

/// Read the 32-bit big-endian length header from the first 32 samples.
pub fn extract_length_header(carrier: &[u8]) -> Result<u32, StegoError> {
    let bits = read_lsbs(carrier, 0, LENGTH_HEADER_BITS)?;
    Ok(read_be_bits(&bits))
}

/// Read the length header and return the inner bitstream it announces.
///
/// # Errors
/// [`StegoError::FrameCorrupted`] if the announced length runs past the end
/// of the carrier (typical for covers that never held a payload).
pub fn extract_frame(carrier: &[u8]) -> Result<Vec<u8>, StegoError> {
    let len = extract_length_header(carrier)? as usize;
    let available = carrier.len() - LENGTH_HEADER_BITS;
    if len > available {
        return Err(StegoError::FrameCorrupted(format!(
            "length header announces {len} bits, only {available} follow"
        )));
    }
    log::debug!("length header: {len} payload bits");
    read_lsbs(carrier, LENGTH_HEADER_BITS, len)
}

fn read_lsbs(carrier: &[u8], start: usize, count: usize) -> Result<Vec<u8>, StegoError> {
    let end = start
        .checked_add(count)
        .filter(|&end| end <= carrier.len())
        .ok_or_else(|| {
            StegoError::FrameCorrupted(format!(
                "cannot read {count} bits at offset {start} from {} samples",
                carrier.len()
            ))
        })?;
    let window = &carrier[start..end];

    #[cfg(feature = "parallel")]
    let bits = window
        .par_chunks(PARALLEL_CHUNK)
        .flat_map_iter(|chunk| chunk.iter().map(|&s| s & 1))
        .collect();

    #[cfg(not(feature = "parallel"))]
    let bits = window.iter().map(|&s| s & 1).collect();

    Ok(bits)
}
