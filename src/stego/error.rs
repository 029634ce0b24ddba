// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmcore

//! Error types for the steganography pipeline.
//!
//! [`StegoError`] covers all failure modes from cover loading through
//! encryption and frame extraction.

use thiserror::Error;

use crate::raster::RasterError;

/// Errors that can occur during steganographic encoding or decoding.
#[derive(Debug, Error)]
pub enum StegoError {
    /// The framed payload does not fit into the cover's sample count.
    #[error("payload needs {required} bits but the cover holds {available}")]
    CapacityExceeded { required: usize, available: usize },
    /// The extracted frame is inconsistent (bad length header, misaligned
    /// body, or a body that does not match the declared shape).
    #[error("payload frame corrupted: {0}")]
    FrameCorrupted(String),
    /// Decryption failed (wrong password or corrupted ciphertext).
    #[error("decryption failed (wrong password?)")]
    DecryptionFailed,
    /// A latent dimension exceeds the 16-bit shape header field.
    #[error("latent {axis} of {value} exceeds the 16-bit shape header")]
    ShapeOverflow { axis: &'static str, value: usize },
    /// Salt or work factor rejected by the key derivation.
    #[error("invalid cipher parameters: {0}")]
    InvalidCipherParams(String),
    /// The cover, stego or secret image is unusable.
    #[error("invalid image: {0}")]
    InvalidImage(#[from] RasterError),
    /// Latent tensor data disagrees with its shape.
    #[error("invalid latent tensor: {0}")]
    InvalidLatent(String),
    /// A configuration file could not be parsed.
    #[error("invalid configuration: {0}")]
    Config(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<image::ImageError> for StegoError {
    fn from(e: image::ImageError) -> Self {
        Self::InvalidImage(RasterError::Codec(e))
    }
}
