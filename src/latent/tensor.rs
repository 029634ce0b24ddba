// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmcore

//! Latent tensor storage and its byte encoding.

use crate::stego::error::StegoError;

/// Bytes per serialized element.
pub const ELEMENT_BYTES: usize = 4;

/// A height × width × channels tensor of `f32`, row-major with interleaved
/// channels (the same layout as a raster carrier).
#[derive(Debug, Clone, PartialEq)]
pub struct LatentTensor {
    height: usize,
    width: usize,
    channels: usize,
    data: Vec<f32>,
}

impl LatentTensor {
    /// # Errors
    /// [`StegoError::InvalidLatent`] if `data.len()` is not `height * width * channels`.
    pub fn new(height: usize, width: usize, channels: usize, data: Vec<f32>) -> Result<Self, StegoError> {
        let expected = element_count(height, width, channels)?;
        if data.len() != expected {
            return Err(StegoError::InvalidLatent(format!(
                "{}x{}x{} needs {expected} elements, got {}",
                height,
                width,
                channels,
                data.len()
            )));
        }
        Ok(Self { height, width, channels, data })
    }

    pub fn zeros(height: usize, width: usize, channels: usize) -> Result<Self, StegoError> {
        let n = element_count(height, width, channels)?;
        Ok(Self { height, width, channels, data: vec![0.0; n] })
    }

    /// Decode little-endian `f32` bytes into a tensor of the given shape.
    ///
    /// # Errors
    /// [`StegoError::InvalidLatent`] if the byte count does not match the shape.
    pub fn from_le_bytes(height: usize, width: usize, channels: usize, bytes: &[u8]) -> Result<Self, StegoError> {
        let expected = element_count(height, width, channels)?
            .checked_mul(ELEMENT_BYTES)
            .ok_or_else(|| StegoError::InvalidLatent("shape too large".into()))?;
        if bytes.len() != expected {
            return Err(StegoError::InvalidLatent(format!(
                "{}x{}x{} needs {expected} bytes, got {}",
                height,
                width,
                channels,
                bytes.len()
            )));
        }
        let data = bytes
            .chunks_exact(ELEMENT_BYTES)
            .map(|c| f32::from_le_bytes([c[0], c[1], c[2], c[3]]))
            .collect();
        Ok(Self { height, width, channels, data })
    }

    /// Serialize every element as 4 little-endian bytes, in index order.
    pub fn to_le_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.data.len() * ELEMENT_BYTES);
        for v in &self.data {
            out.extend_from_slice(&v.to_le_bytes());
        }
        out
    }

    pub fn dims(&self) -> (usize, usize, usize) {
        (self.height, self.width, self.channels)
    }

    #[inline]
    pub fn get(&self, row: usize, col: usize, ch: usize) -> f32 {
        self.data[(row * self.width + col) * self.channels + ch]
    }

    #[inline]
    pub fn set(&mut self, row: usize, col: usize, ch: usize, value: f32) {
        self.data[(row * self.width + col) * self.channels + ch] = value;
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }
}

fn element_count(height: usize, width: usize, channels: usize) -> Result<usize, StegoError> {
    height
        .checked_mul(width)
        .and_then(|p| p.checked_mul(channels))
        .ok_or_else(|| StegoError::InvalidLatent(format!("{height}x{width}x{channels} overflows")))
}
