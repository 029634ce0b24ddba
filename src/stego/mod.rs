// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmcore

//! Steganographic encoding and decoding of latent payloads.
//!
//! The payload travels through four layers:
//!
//! - [`frame`]: shape header, body bit-expansion and the outer length header
//! - [`crypto`]: optional password encryption of the body (legacy AES-CBC or
//!   authenticated AES-GCM-SIV)
//! - [`capacity`]: how many bits a cover holds, checked before embedding
//! - [`bitplane`]: one bit per sample LSB, in row-major channel-interleaved
//!   order
//!
//! [`encode_latent`] / [`decode_latent`] run the whole chain on carriers;
//! [`encode_image`] / [`decode_image`] add the compression model on top.

pub mod bitplane;
pub mod capacity;
pub mod crypto;
pub mod error;
pub mod frame;
mod pipeline;

pub use error::StegoError;
pub use capacity::{capacity_of_image, capacity_of_path, CapacityInfo};
pub use crypto::{CipherParams, CipherScheme, PayloadCipher};
pub use frame::{ParsedFrame, ShapeHeader};
pub use pipeline::{decode_image, decode_latent, encode_image, encode_latent};
