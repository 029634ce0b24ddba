// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmcore

//! Cover capacity computation and the pre-embedding size guard.
//!
//! Every cover sample carries exactly one payload bit, so capacity is a
//! plain count: `height × width × channels` bits, of which the first 32 go
//! to the outer length header.

use std::fmt;
use std::path::Path;

use image::RgbImage;

use crate::raster::RGB_CHANNELS;
use crate::stego::crypto::{CipherScheme, BLOCK_LEN, IV_LEN, NONCE_LEN, TAG_LEN};
use crate::stego::error::StegoError;
use crate::stego::frame::{LENGTH_HEADER_BITS, SHAPE_HEADER_BITS};

/// Bits available after the outer length header.
pub fn max_payload_bits(samples: &[u8]) -> usize {
    payload_bits_for(samples.len())
}

fn payload_bits_for(total_samples: usize) -> usize {
    total_samples.saturating_sub(LENGTH_HEADER_BITS)
}

/// Reject a final bitstream (length header included) that is longer than
/// the cover's sample count. Called before any sample is touched.
///
/// # Errors
/// [`StegoError::CapacityExceeded`] with the required and available bit counts.
pub fn check(samples: &[u8], bitstream: &[u8]) -> Result<(), StegoError> {
    if bitstream.len() > samples.len() {
        log::warn!(
            "cover too small: {} bits requested, {} samples available",
            bitstream.len(),
            samples.len()
        );
        return Err(StegoError::CapacityExceeded {
            required: bitstream.len(),
            available: samples.len(),
        });
    }
    Ok(())
}

/// Capacity report for a cover image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CapacityInfo {
    /// Total samples (height × width × channels).
    pub total_samples: usize,
    /// Bits available for shape header + body.
    pub max_payload_bits: usize,
    /// Whole body bytes that fit after the shape header.
    pub max_body_bytes: usize,
}

impl CapacityInfo {
    pub fn from_sample_count(total_samples: usize) -> Self {
        let max_payload_bits = payload_bits_for(total_samples);
        Self {
            total_samples,
            max_payload_bits,
            max_body_bytes: max_payload_bits.saturating_sub(SHAPE_HEADER_BITS) / 8,
        }
    }

    /// Capacity of a `width × height` RGB cover.
    pub fn from_dimensions(width: u32, height: u32) -> Self {
        Self::from_sample_count(width as usize * height as usize * RGB_CHANNELS)
    }

    /// Largest plaintext (in bytes) that fits once the cipher overhead is
    /// added, or `None` if not even an empty body fits.
    ///
    /// `scheme = None` means the body is stored unencrypted.
    pub fn max_plaintext_bytes(&self, scheme: Option<CipherScheme>) -> Option<usize> {
        let body = self.max_body_bytes;
        match scheme {
            None => Some(body),
            Some(CipherScheme::LegacyCbc) => {
                // iv + ceil_to_block(p + 1)
                let blocks = body.checked_sub(IV_LEN)? / BLOCK_LEN;
                (blocks * BLOCK_LEN).checked_sub(1)
            }
            Some(CipherScheme::SealedGcmSiv) => body.checked_sub(NONCE_LEN + TAG_LEN),
        }
    }

    /// Largest number of `f32` latent elements that fits.
    pub fn max_latent_elements(&self, scheme: Option<CipherScheme>) -> usize {
        self.max_plaintext_bytes(scheme).map_or(0, |bytes| bytes / 4)
    }
}

impl fmt::Display for CapacityInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Samples:          {}", self.total_samples)?;
        writeln!(f, "Payload bits:     {}", self.max_payload_bits)?;
        writeln!(
            f,
            "Maximum capacity: {} bytes (~{}KB)",
            self.max_body_bytes,
            self.max_body_bytes / 1000
        )?;
        for scheme in [None, Some(CipherScheme::LegacyCbc), Some(CipherScheme::SealedGcmSiv)] {
            let label = scheme.map_or("plain", CipherScheme::as_str);
            match self.max_plaintext_bytes(scheme) {
                Some(bytes) => writeln!(
                    f,
                    "  {label:<15} {bytes} bytes ({} f32 elements)",
                    bytes / 4
                )?,
                None => writeln!(f, "  {label:<15} does not fit")?,
            }
        }
        Ok(())
    }
}

/// Capacity of an in-memory RGB image.
pub fn capacity_of_image(img: &RgbImage) -> CapacityInfo {
    CapacityInfo::from_sample_count(img.as_raw().len())
}

/// Capacity of an image file, read from its header without decoding pixels.
/// Every cover is converted to RGB before embedding, so 3 channels are assumed.
pub fn capacity_of_path<P: AsRef<Path>>(path: P) -> Result<CapacityInfo, StegoError> {
    let (w, h) = image::image_dimensions(path)?;
    Ok(CapacityInfo::from_dimensions(w, h))
}
