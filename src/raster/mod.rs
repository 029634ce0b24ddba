// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmcore

//! Raster cover images as flat sample buffers.
//!
//! A [`Carrier`] owns the samples of an 8-bit image in row-major,
//! channel-interleaved order, which is the order the bit-plane codec walks
//! when embedding. Carriers built from RGB images store each pixel as
//! B, G, R: the legacy stego format was written over BGR-ordered pixel
//! buffers, so bit *i* of a frame goes to blue before green before red.
//! The `image` crate is only touched at the edges (RGB conversion);
//! everything inside the stego layer sees `&[u8]`.

pub mod error;
pub mod resize;

use image::RgbImage;

pub use error::RasterError;
pub use resize::{fit_within, fitted_dimensions, resize_square};

/// Number of interleaved channels in an RGB carrier.
pub const RGB_CHANNELS: usize = 3;

/// A height × width × channels grid of `u8` samples stored contiguously.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Carrier {
    height: usize,
    width: usize,
    channels: usize,
    samples: Vec<u8>,
}

impl Carrier {
    /// Wrap an existing sample buffer.
    ///
    /// # Errors
    /// - [`RasterError::InvalidDimensions`] if any axis is zero.
    /// - [`RasterError::SizeMismatch`] if `samples.len() != height * width * channels`.
    pub fn new(height: usize, width: usize, channels: usize, samples: Vec<u8>) -> error::Result<Self> {
        if height == 0 || width == 0 {
            return Err(RasterError::InvalidDimensions { width, height });
        }
        if channels == 0 {
            return Err(RasterError::UnsupportedChannels(channels));
        }
        let expected = height
            .checked_mul(width)
            .and_then(|p| p.checked_mul(channels))
            .ok_or(RasterError::InvalidDimensions { width, height })?;
        if samples.len() != expected {
            return Err(RasterError::SizeMismatch { expected, actual: samples.len() });
        }
        Ok(Self { height, width, channels, samples })
    }

    /// Copy the samples of an RGB image, reordering each pixel to B, G, R.
    pub fn from_rgb(img: &RgbImage) -> Self {
        Self {
            height: img.height() as usize,
            width: img.width() as usize,
            channels: RGB_CHANNELS,
            samples: swap_red_blue(img.as_raw()),
        }
    }

    /// Convert back into an RGB image.
    ///
    /// # Errors
    /// [`RasterError::UnsupportedChannels`] unless the carrier has 3 channels.
    pub fn to_rgb(&self) -> error::Result<RgbImage> {
        if self.channels != RGB_CHANNELS {
            return Err(RasterError::UnsupportedChannels(self.channels));
        }
        let (width, height) = (self.width, self.height);
        let w = u32::try_from(width).map_err(|_| RasterError::InvalidDimensions { width, height })?;
        let h = u32::try_from(height).map_err(|_| RasterError::InvalidDimensions { width, height })?;
        RgbImage::from_raw(w, h, swap_red_blue(&self.samples))
            .ok_or(RasterError::SizeMismatch { expected: width * height * RGB_CHANNELS, actual: self.samples.len() })
    }

    /// Build a carrier with the same shape around a new sample buffer.
    pub fn with_samples(&self, samples: Vec<u8>) -> error::Result<Self> {
        Self::new(self.height, self.width, self.channels, samples)
    }

    /// Flat offset of `(row, col, ch)`: `(row * width + col) * channels + ch`,
    /// where `ch` counts in stored order (0 is blue for RGB-sourced carriers).
    ///
    /// This is the ordinal position used by the bit-plane codec, so bit *i*
    /// of a frame lives in the sample at `index` *i*.
    #[inline]
    pub fn index(&self, row: usize, col: usize, ch: usize) -> usize {
        debug_assert!(row < self.height && col < self.width && ch < self.channels);
        (row * self.width + col) * self.channels + ch
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn channels(&self) -> usize {
        self.channels
    }

    /// All samples in embedding order.
    pub fn samples(&self) -> &[u8] {
        &self.samples
    }

    /// Total sample count (height × width × channels).
    pub fn sample_count(&self) -> usize {
        self.samples.len()
    }
}

/// Exchange the first and third sample of every 3-byte pixel (RGB <-> BGR).
fn swap_red_blue(samples: &[u8]) -> Vec<u8> {
    samples
        .chunks_exact(RGB_CHANNELS)
        .flat_map(|px| [px[2], px[1], px[0]])
        .collect()
}
