// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmcore

//! Resizing helpers applied before embedding.
//!
//! Covers are shrunk to a bounded longest side so capacity and runtime stay
//! predictable; secrets are squared to the compression model's input size.
//! Neither helper may run on a stego image: any resampling after embedding
//! destroys the payload.

use image::imageops::{self, FilterType};
use image::RgbImage;

/// Dimensions [`fit_within`] produces for a `width × height` image.
///
/// The longest side becomes `max_side` and the other side is scaled in
/// proportion (rounded down, at least 1). `max_side == 0` disables fitting.
pub fn fitted_dimensions(width: u32, height: u32, max_side: u32) -> (u32, u32) {
    let longest = width.max(height);
    if longest <= max_side || max_side == 0 {
        return (width, height);
    }
    let scale = |side: u32| ((side as u64 * max_side as u64 / longest as u64) as u32).max(1);
    (scale(width), scale(height))
}

/// Downscale so that the longest side is at most `max_side`, keeping the
/// aspect ratio. Images already within bounds are returned unchanged.
pub fn fit_within(img: &RgbImage, max_side: u32) -> RgbImage {
    let (w, h) = img.dimensions();
    let (new_w, new_h) = fitted_dimensions(w, h, max_side);
    if (new_w, new_h) == (w, h) {
        return img.clone();
    }
    log::debug!("resizing cover {w}x{h} -> {new_w}x{new_h}");
    imageops::resize(img, new_w, new_h, FilterType::Triangle)
}

/// Resize to a `side × side` square (aspect ratio is not preserved).
pub fn resize_square(img: &RgbImage, side: u32) -> RgbImage {
    if img.dimensions() == (side, side) {
        return img.clone();
    }
    imageops::resize(img, side, side, FilterType::Triangle)
}
