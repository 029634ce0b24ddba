// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmcore

//! Encode/decode pipeline.
//!
//! Encode:
//! 1. Range-check the latent shape into the 48-bit header
//! 2. Serialize the tensor as little-endian `f32` bytes
//! 3. Encrypt the bytes if a non-empty password was given
//! 4. Build the inner frame and prepend the 32-bit length
//! 5. Check capacity, then embed into a copy of the cover
//!
//! Decode runs the same steps backwards and finally checks that the
//! recovered byte count matches the header's shape.

use image::RgbImage;

use crate::latent::tensor::ELEMENT_BYTES;
use crate::latent::{LatentCodec, LatentTensor};
use crate::raster::{Carrier, RasterError, RGB_CHANNELS};
use crate::stego::crypto::{CipherParams, PayloadCipher};
use crate::stego::error::StegoError;
use crate::stego::frame::{self, ShapeHeader};
use crate::stego::{bitplane, capacity};

/// An empty password means "no encryption", on both sides.
fn active_password(password: Option<&str>) -> Option<&str> {
    password.filter(|pw| !pw.is_empty())
}

fn require_rgb(carrier: &Carrier) -> Result<(), StegoError> {
    if carrier.channels() != RGB_CHANNELS {
        return Err(RasterError::UnsupportedChannels(carrier.channels()).into());
    }
    Ok(())
}

/// Hide `latent` in a copy of `cover`.
///
/// # Errors
/// - [`StegoError::InvalidImage`] if the cover is not 3-channel.
/// - [`StegoError::ShapeOverflow`] if a latent dimension exceeds 65535.
/// - [`StegoError::CapacityExceeded`] if the framed payload does not fit.
pub fn encode_latent(
    cover: &Carrier,
    latent: &LatentTensor,
    password: Option<&str>,
    params: &CipherParams,
) -> Result<Carrier, StegoError> {
    require_rgb(cover)?;

    let (h, w, c) = latent.dims();
    let shape = ShapeHeader::from_dims(h, w, c)?;
    let raw = latent.to_le_bytes();

    let body = match active_password(password) {
        Some(pw) => {
            let cipher = PayloadCipher::new(pw, params)?;
            log::debug!("encrypting {} latent bytes ({:?})", raw.len(), cipher.scheme());
            cipher.encrypt(&raw)
        }
        None => raw,
    };

    let inner = frame::build_frame(shape, &body);
    let bits = frame::wrap_with_length(&inner)?;
    log::debug!(
        "frame: {h}x{w}x{c} latent, {} body bytes, {} bits into {} samples",
        body.len(),
        bits.len(),
        cover.sample_count()
    );

    capacity::check(cover.samples(), &bits)?;
    let stego = bitplane::embed(cover.samples(), &bits)?;
    Ok(cover.with_samples(stego)?)
}

/// Recover the latent tensor hidden in `stego`.
///
/// # Errors
/// - [`StegoError::FrameCorrupted`] if the length or shape header is
///   inconsistent, or the recovered body does not match the shape (this is
///   also how a wrong password surfaces when CBC padding happens to validate).
/// - [`StegoError::DecryptionFailed`] if decryption rejects the body.
pub fn decode_latent(
    stego: &Carrier,
    password: Option<&str>,
    params: &CipherParams,
) -> Result<LatentTensor, StegoError> {
    require_rgb(stego)?;

    let inner = bitplane::extract_frame(stego.samples())?;
    let parsed = frame::parse_frame(&inner)?;
    let (h, w, c) = parsed.shape.dims();

    let raw = match active_password(password) {
        Some(pw) => PayloadCipher::new(pw, params)?.decrypt(&parsed.body)?,
        None => parsed.body,
    };

    let expected = parsed.shape.element_count() * ELEMENT_BYTES;
    if raw.len() != expected {
        return Err(StegoError::FrameCorrupted(format!(
            "{h}x{w}x{c} latent needs {expected} bytes, frame carries {}",
            raw.len()
        )));
    }
    LatentTensor::from_le_bytes(h, w, c, &raw)
}

/// Compress `secret` with `codec` and hide it in `cover`.
pub fn encode_image<C: LatentCodec + ?Sized>(
    codec: &C,
    cover: &RgbImage,
    secret: &RgbImage,
    password: Option<&str>,
    params: &CipherParams,
) -> Result<RgbImage, StegoError> {
    let latent = codec.encode_secret(secret)?;
    let stego = encode_latent(&Carrier::from_rgb(cover), &latent, password, params)?;
    Ok(stego.to_rgb()?)
}

/// Extract the latent from `stego` and reconstruct the secret with `codec`.
pub fn decode_image<C: LatentCodec + ?Sized>(
    codec: &C,
    stego: &RgbImage,
    password: Option<&str>,
    params: &CipherParams,
) -> Result<RgbImage, StegoError> {
    let latent = decode_latent(&Carrier::from_rgb(stego), password, params)?;
    codec.decode_secret(&latent)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stego::crypto::{CipherScheme, DEFAULT_SALT};

    fn cover(w: usize, h: usize) -> Carrier {
        let samples = (0..w * h * 3).map(|i| (i * 31 % 251) as u8).collect();
        Carrier::new(h, w, 3, samples).unwrap()
    }

    fn latent(h: usize, w: usize, c: usize) -> LatentTensor {
        let data = (0..h * w * c).map(|i| i as f32 * 0.25 - 3.0).collect();
        LatentTensor::new(h, w, c, data).unwrap()
    }

    fn fast() -> CipherParams {
        CipherParams::new(CipherScheme::LegacyCbc, DEFAULT_SALT, 8).unwrap()
    }

    #[test]
    fn roundtrip_without_password() {
        let cover = cover(32, 32);
        let secret = latent(4, 4, 3);
        let stego = encode_latent(&cover, &secret, None, &fast()).unwrap();
        assert_eq!(decode_latent(&stego, None, &fast()).unwrap(), secret);
    }

    #[test]
    fn roundtrip_with_password() {
        let cover = cover(32, 32);
        let secret = latent(4, 4, 3);
        let stego = encode_latent(&cover, &secret, Some("hunter2"), &fast()).unwrap();
        assert_eq!(decode_latent(&stego, Some("hunter2"), &fast()).unwrap(), secret);
    }

    #[test]
    fn empty_password_means_plaintext() {
        let cover = cover(32, 32);
        let secret = latent(2, 2, 2);
        let with_empty = encode_latent(&cover, &secret, Some(""), &fast()).unwrap();
        let with_none = encode_latent(&cover, &secret, None, &fast()).unwrap();
        // Plain frames are deterministic, so both stego images are identical.
        assert_eq!(with_empty, with_none);
        assert_eq!(decode_latent(&with_empty, None, &fast()).unwrap(), secret);
    }

    #[test]
    fn cover_is_left_untouched() {
        let cover = cover(16, 16);
        let before = cover.clone();
        let _ = encode_latent(&cover, &latent(2, 2, 2), None, &fast()).unwrap();
        assert_eq!(cover, before);
    }

    #[test]
    fn encrypted_frame_without_password_is_rejected() {
        let cover = cover(32, 32);
        let stego = encode_latent(&cover, &latent(4, 4, 3), Some("pw"), &fast()).unwrap();
        assert!(matches!(decode_latent(&stego, None, &fast()), Err(StegoError::FrameCorrupted(_))));
    }

    #[test]
    fn wrong_password_is_an_error_not_a_panic() {
        let cover = cover(32, 32);
        let stego = encode_latent(&cover, &latent(4, 4, 3), Some("right"), &fast()).unwrap();
        match decode_latent(&stego, Some("wrong"), &fast()) {
            Err(StegoError::DecryptionFailed) | Err(StegoError::FrameCorrupted(_)) => {}
            other => panic!("expected a decode failure, got {other:?}"),
        }
    }

    #[test]
    fn untouched_cover_does_not_decode() {
        // A cover that never held a payload has an arbitrary length header.
        let blank = Carrier::new(8, 8, 3, vec![0xFF; 192]).unwrap();
        assert!(matches!(decode_latent(&blank, None, &fast()), Err(StegoError::FrameCorrupted(_))));
    }

    #[test]
    fn capacity_exceeded_before_mutation() {
        let cover = cover(8, 8);
        match encode_latent(&cover, &latent(4, 4, 3), None, &fast()) {
            Err(StegoError::CapacityExceeded { available: 192, .. }) => {}
            other => panic!("expected CapacityExceeded, got {other:?}"),
        }
    }

    #[test]
    fn non_rgb_cover_rejected() {
        let rgba = Carrier::new(16, 16, 4, vec![0; 16 * 16 * 4]).unwrap();
        assert!(matches!(
            encode_latent(&rgba, &latent(1, 1, 1), None, &fast()),
            Err(StegoError::InvalidImage(RasterError::UnsupportedChannels(4)))
        ));
    }
}
