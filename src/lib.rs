// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmcore

//! # latent-stego
//!
//! Hides the compressed latent of a secret image in the least-significant
//! bits of a cover image, optionally encrypted with a password, and recovers
//! it bit-exactly.
//!
//! The wire format, embedded one bit per sample LSB in row-major,
//! channel-interleaved order with each pixel walked as B, G, R:
//!
//! ```text
//! [32 bits] inner length (big-endian)
//! [48 bits] latent height, width, channels (16-bit big-endian each)
//! [body   ] little-endian f32 tensor bytes, or iv ‖ AES-256-CBC ciphertext
//! ```
//!
//! There is no error correction. Stego images must be stored losslessly
//! (PNG); recompression, resizing or colour conversion destroys the payload.
//!
//! # Quick start
//!
//! ```rust,ignore
//! use latent_stego::{decode_image, encode_image, BlockMeanCodec, CipherParams};
//!
//! let cover = image::open("cover.png")?.to_rgb8();
//! let secret = image::open("secret.png")?.to_rgb8();
//! let codec = BlockMeanCodec::default();
//! let params = CipherParams::default();
//!
//! let stego = encode_image(&codec, &cover, &secret, Some("passphrase"), &params)?;
//! let recovered = decode_image(&codec, &stego, Some("passphrase"), &params)?;
//! ```

pub mod config;
pub mod latent;
pub mod raster;
pub mod stego;

pub use config::StegoConfig;
pub use latent::{BlockMeanCodec, LatentCodec, LatentTensor};
pub use raster::{Carrier, RasterError};
pub use stego::{decode_image, decode_latent, encode_image, encode_latent, StegoError};
pub use stego::{capacity_of_image, capacity_of_path, CapacityInfo};
pub use stego::{CipherParams, CipherScheme, PayloadCipher, ShapeHeader};
