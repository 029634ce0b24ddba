// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmcore

//! Error types for raster loading and carrier construction.

use thiserror::Error;

/// Errors that can occur while loading, converting or saving raster images.
#[derive(Debug, Error)]
pub enum RasterError {
    /// The image file could not be decoded or encoded.
    #[error("image codec error: {0}")]
    Codec(#[from] image::ImageError),
    /// The carrier does not have exactly three interleaved channels.
    #[error("expected 3 channels (RGB), found {0}")]
    UnsupportedChannels(usize),
    /// Sample buffer length disagrees with height × width × channels.
    #[error("sample buffer holds {actual} bytes, shape requires {expected}")]
    SizeMismatch { expected: usize, actual: usize },
    /// Width or height is zero or does not fit the image backend.
    #[error("invalid image dimensions {width}x{height}")]
    InvalidDimensions { width: usize, height: usize },
}

pub type Result<T> = std::result::Result<T, RasterError>;
