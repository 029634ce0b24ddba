// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmcore

//! Payload frame construction and parsing.
//!
//! The frame is the bit-level container handed to the bit-plane codec.
//! Everything is serialized most-significant bit first:
//!
//! ```text
//! [32 bits] inner length in bits (big-endian u32, excludes itself)
//! [16 bits] latent height   (big-endian u16)
//! [16 bits] latent width    (big-endian u16)
//! [16 bits] latent channels (big-endian u16)
//! [8·N bits] body: raw little-endian f32 tensor bytes, or the encrypted blob
//! ```
//!
//! [`build_frame`] produces the inner part (shape header + body),
//! [`wrap_with_length`] prepends the outer length. Bits are stored one per
//! `u8` (0 or 1). Bit *i* of the wrapped frame goes to sample *i* of the
//! carrier, whose pixels are laid out B, G, R.

use crate::stego::error::StegoError;

/// Width of the outer length header.
pub const LENGTH_HEADER_BITS: usize = 32;

/// Width of the shape header: three 16-bit fields.
pub const SHAPE_HEADER_BITS: usize = 48;

/// Fixed per-frame overhead in bits (outer length + shape header).
pub const FRAME_OVERHEAD_BITS: usize = LENGTH_HEADER_BITS + SHAPE_HEADER_BITS;

/// Latent tensor shape as carried in the frame header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShapeHeader {
    pub height: u16,
    pub width: u16,
    pub channels: u16,
}

impl ShapeHeader {
    /// Range-check tensor dimensions against the 16-bit header fields.
    ///
    /// # Errors
    /// [`StegoError::ShapeOverflow`] naming the first axis above 65535.
    pub fn from_dims(height: usize, width: usize, channels: usize) -> Result<Self, StegoError> {
        let field = |axis: &'static str, value: usize| {
            u16::try_from(value).map_err(|_| StegoError::ShapeOverflow { axis, value })
        };
        Ok(Self {
            height: field("height", height)?,
            width: field("width", width)?,
            channels: field("channels", channels)?,
        })
    }

    pub fn dims(&self) -> (usize, usize, usize) {
        (self.height as usize, self.width as usize, self.channels as usize)
    }

    /// Number of tensor elements described by the header.
    pub fn element_count(&self) -> usize {
        self.height as usize * self.width as usize * self.channels as usize
    }
}

/// Parsed inner frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedFrame {
    pub shape: ShapeHeader,
    /// Body bytes exactly as embedded (possibly encrypted).
    pub body: Vec<u8>,
}

/// Build the inner bitstream: shape header followed by the body bits.
///
/// The result is `48 + 8 * body.len()` bits long.
pub fn build_frame(shape: ShapeHeader, body: &[u8]) -> Vec<u8> {
    let mut bits = Vec::with_capacity(SHAPE_HEADER_BITS + body.len() * 8);
    push_be_bits(&mut bits, shape.height as u32, 16);
    push_be_bits(&mut bits, shape.width as u32, 16);
    push_be_bits(&mut bits, shape.channels as u32, 16);
    bits.extend(bytes_to_bits(body));
    bits
}

/// Prepend the 32-bit big-endian bit count of `inner`.
///
/// # Errors
/// [`StegoError::CapacityExceeded`] if `inner` is longer than `u32::MAX` bits.
pub fn wrap_with_length(inner: &[u8]) -> Result<Vec<u8>, StegoError> {
    let len = u32::try_from(inner.len()).map_err(|_| StegoError::CapacityExceeded {
        required: inner.len(),
        available: u32::MAX as usize,
    })?;
    let mut bits = Vec::with_capacity(LENGTH_HEADER_BITS + inner.len());
    push_be_bits(&mut bits, len, 32);
    bits.extend_from_slice(inner);
    Ok(bits)
}

/// Parse an inner bitstream back into shape header and body bytes.
///
/// # Errors
/// [`StegoError::FrameCorrupted`] if fewer than 48 bits are present or the
/// body bit count is not a multiple of 8.
pub fn parse_frame(inner: &[u8]) -> Result<ParsedFrame, StegoError> {
    if inner.len() < SHAPE_HEADER_BITS {
        return Err(StegoError::FrameCorrupted(format!(
            "{} bits is shorter than the {SHAPE_HEADER_BITS}-bit shape header",
            inner.len()
        )));
    }

    let body_bits = &inner[SHAPE_HEADER_BITS..];
    if body_bits.len() % 8 != 0 {
        return Err(StegoError::FrameCorrupted(format!(
            "body of {} bits is not byte-aligned",
            body_bits.len()
        )));
    }

    let shape = ShapeHeader {
        height: read_be_bits(&inner[0..16]) as u16,
        width: read_be_bits(&inner[16..32]) as u16,
        channels: read_be_bits(&inner[32..48]) as u16,
    };

    Ok(ParsedFrame { shape, body: bits_to_bytes(body_bits) })
}

/// Append the low `width` bits of `value`, most significant first.
pub fn push_be_bits(bits: &mut Vec<u8>, value: u32, width: u32) {
    debug_assert!(width <= 32);
    for bit_pos in (0..width).rev() {
        bits.push(((value >> bit_pos) & 1) as u8);
    }
}

/// Read up to 32 bits (MSB first) as an unsigned integer.
pub fn read_be_bits(bits: &[u8]) -> u32 {
    debug_assert!(bits.len() <= 32);
    bits.iter().fold(0u32, |acc, &b| (acc << 1) | (b & 1) as u32)
}

/// Convert bytes to a bit vector (MSB first within each byte).
pub fn bytes_to_bits(bytes: &[u8]) -> Vec<u8> {
    let mut bits = Vec::with_capacity(bytes.len() * 8);
    for &byte in bytes {
        push_be_bits(&mut bits, byte as u32, 8);
    }
    bits
}

/// Convert a bit vector (MSB first) back to bytes.
/// Pads the last byte with zero bits if `bits.len()` is not a multiple of 8.
pub fn bits_to_bytes(bits: &[u8]) -> Vec<u8> {
    let mut bytes = Vec::with_capacity((bits.len() + 7) / 8);
    for chunk in bits.chunks(8) {
        let mut byte = 0u8;
        for (i, &bit) in chunk.iter().enumerate() {
            byte |= (bit & 1) << (7 - i);
        }
        bytes.push(byte);
    }
    bytes
}
