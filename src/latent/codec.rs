// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmcore

//! The compression-model seam.
//!
//! The stego layer never looks inside the model that turns a secret image
//! into a latent tensor; it only needs the two directions of
//! [`LatentCodec`]. [`BlockMeanCodec`] is a deterministic stand-in that
//! works without trained weights.

use image::{Rgb, RgbImage};

use crate::latent::tensor::LatentTensor;
use crate::raster::{resize_square, RGB_CHANNELS};
use crate::stego::error::StegoError;

/// Secret image ⇄ latent tensor.
pub trait LatentCodec {
    /// Compress an RGB secret into a latent tensor.
    fn encode_secret(&self, image: &RgbImage) -> Result<LatentTensor, StegoError>;

    /// Reconstruct an RGB image from a latent tensor.
    fn decode_secret(&self, latent: &LatentTensor) -> Result<RgbImage, StegoError>;
}

/// Default square input side of the model.
pub const DEFAULT_INPUT_SIDE: u32 = 64;
/// Default pooling cell.
pub const DEFAULT_BLOCK: u32 = 4;

/// Average-pooling codec.
///
/// Encoding resizes the secret to `input_side × input_side` and stores the
/// mean of every `block × block` cell per channel, scaled to `[0, 1]`.
/// Decoding paints each cell with its mean. Lossy, but fully deterministic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockMeanCodec {
    input_side: u32,
    block: u32,
}

impl BlockMeanCodec {
    /// # Errors
    /// [`StegoError::InvalidLatent`] unless `block` is positive and divides
    /// `input_side`.
    pub fn new(input_side: u32, block: u32) -> Result<Self, StegoError> {
        if block == 0 || input_side == 0 || input_side % block != 0 {
            return Err(StegoError::InvalidLatent(format!(
                "block {block} must be positive and divide input side {input_side}"
            )));
        }
        Ok(Self { input_side, block })
    }

    pub fn input_side(&self) -> u32 {
        self.input_side
    }

    pub fn block(&self) -> u32 {
        self.block
    }

    /// Shape of the latents this codec produces.
    pub fn latent_dims(&self) -> (usize, usize, usize) {
        let cells = (self.input_side / self.block) as usize;
        (cells, cells, RGB_CHANNELS)
    }
}

impl Default for BlockMeanCodec {
    fn default() -> Self {
        Self { input_side: DEFAULT_INPUT_SIDE, block: DEFAULT_BLOCK }
    }
}

impl LatentCodec for BlockMeanCodec {
    fn encode_secret(&self, image: &RgbImage) -> Result<LatentTensor, StegoError> {
        let img = resize_square(image, self.input_side);
        let (cells_h, cells_w, channels) = self.latent_dims();
        let mut latent = LatentTensor::zeros(cells_h, cells_w, channels)?;
        let scale = 1.0 / ((self.block * self.block) as f32 * 255.0);

        for cy in 0..cells_h {
            for cx in 0..cells_w {
                let mut sums = [0u32; RGB_CHANNELS];
                for dy in 0..self.block {
                    for dx in 0..self.block {
                        let px = img.get_pixel(cx as u32 * self.block + dx, cy as u32 * self.block + dy);
                        for (sum, &v) in sums.iter_mut().zip(px.0.iter()) {
                            *sum += v as u32;
                        }
                    }
                }
                for (ch, &sum) in sums.iter().enumerate() {
                    latent.set(cy, cx, ch, sum as f32 * scale);
                }
            }
        }
        Ok(latent)
    }

    fn decode_secret(&self, latent: &LatentTensor) -> Result<RgbImage, StegoError> {
        let (cells_h, cells_w, channels) = latent.dims();
        if channels != RGB_CHANNELS {
            return Err(StegoError::InvalidLatent(format!(
                "expected {RGB_CHANNELS} latent channels, got {channels}"
            )));
        }
        let side = |cells: usize| {
            u32::try_from(cells)
                .ok()
                .and_then(|c| c.checked_mul(self.block))
                .ok_or_else(|| StegoError::InvalidLatent(format!("{cells} cells too large to paint")))
        };
        let (out_w, out_h) = (side(cells_w)?, side(cells_h)?);

        Ok(RgbImage::from_fn(out_w, out_h, |x, y| {
            let (cy, cx) = ((y / self.block) as usize, (x / self.block) as usize);
            let level = |ch: usize| (latent.get(cy, cx, ch) * 255.0).round().clamp(0.0, 255.0) as u8;
            Rgb([level(0), level(1), level(2)])
        }))
    }
}
