// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmcore

//! TOML configuration for the command-line front end.
//!
//! Every section and field is optional; missing values fall back to the
//! legacy-compatible defaults.
//!
//! ```toml
//! [cipher]
//! scheme = "legacy-cbc"
//! salt = "steganography_salt"
//! rounds = 1000
//!
//! [cover]
//! max_side = 512
//!
//! [latent]
//! input_side = 64
//! block = 4
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::latent::codec::{BlockMeanCodec, DEFAULT_BLOCK, DEFAULT_INPUT_SIDE};
use crate::stego::crypto::{CipherParams, CipherScheme, DEFAULT_PBKDF2_ROUNDS, DEFAULT_SALT};
use crate::stego::StegoError;

/// Longest cover side kept before embedding.
pub const DEFAULT_COVER_MAX_SIDE: u32 = 512;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StegoConfig {
    pub cipher: CipherConfig,
    pub cover: CoverConfig,
    pub latent: LatentConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CipherConfig {
    pub scheme: CipherScheme,
    /// Key-derivation salt (UTF-8). Must match the value used at encode time.
    pub salt: String,
    /// PBKDF2 iterations (legacy scheme only).
    pub rounds: u32,
}

impl Default for CipherConfig {
    fn default() -> Self {
        Self {
            scheme: CipherScheme::default(),
            salt: String::from_utf8_lossy(DEFAULT_SALT).into_owned(),
            rounds: DEFAULT_PBKDF2_ROUNDS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoverConfig {
    /// Covers larger than this on their longest side are downscaled; 0 disables.
    pub max_side: u32,
}

impl Default for CoverConfig {
    fn default() -> Self {
        Self { max_side: DEFAULT_COVER_MAX_SIDE }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LatentConfig {
    pub input_side: u32,
    pub block: u32,
}

impl Default for LatentConfig {
    fn default() -> Self {
        Self { input_side: DEFAULT_INPUT_SIDE, block: DEFAULT_BLOCK }
    }
}

impl StegoConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, StegoError> {
        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, StegoError> {
        toml::from_str(content).map_err(|e| StegoError::Config(e.to_string()))
    }

    /// Validated key-derivation parameters.
    pub fn cipher_params(&self) -> Result<CipherParams, StegoError> {
        CipherParams::new(self.cipher.scheme, self.cipher.salt.as_bytes(), self.cipher.rounds)
    }

    /// The built-in compression codec with the configured geometry.
    pub fn latent_codec(&self) -> Result<BlockMeanCodec, StegoError> {
        BlockMeanCodec::new(self.latent.input_side, self.latent.block)
    }
}
