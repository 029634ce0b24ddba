// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmcore

//! Password-based payload encryption.
//!
//! Two schemes are supported, selected through [`CipherParams`]:
//!
//! - **Legacy CBC** (default, wire-compatible with existing stego images):
//!   PBKDF2-HMAC-SHA1 derives a 256-bit key from password + salt; the body is
//!   `iv(16) ‖ AES-256-CBC(PKCS#7(plaintext))`. There is no authentication
//!   tag. A wrong password is only noticed when the decrypted padding is
//!   invalid, and corrupted ciphertext may decrypt to garbage. The decode
//!   pipeline additionally checks the recovered size against the frame
//!   header.
//! - **Sealed GCM-SIV** (opt-in): Argon2id derives the key; the body is
//!   `nonce(12) ‖ AES-256-GCM-SIV(plaintext) ‖ tag(16)`. Wrong passwords
//!   and tampering are always detected.
//!
//! The salt is a constructor argument. Its default is the fixed public
//! constant used by the legacy format, which means a given password maps to
//! the same key in every image and precomputed dictionaries apply to all of
//! them. Changing the salt breaks compatibility with images written under the
//! old one.

use aes::Aes256;
use aes_gcm_siv::aead::Aead;
use aes_gcm_siv::{Aes256GcmSiv, KeyInit, Nonce};
use argon2::Argon2;
use cbc::cipher::block_padding::Pkcs7;
use cbc::cipher::{BlockDecryptMut, BlockEncryptMut, KeyIvInit};
use rand::RngCore;
use serde::{Deserialize, Serialize};
use sha1::Sha1;
use zeroize::Zeroizing;

use crate::stego::error::StegoError;

type Aes256CbcEnc = cbc::Encryptor<Aes256>;
type Aes256CbcDec = cbc::Decryptor<Aes256>;

/// Derived key length in bytes (AES-256).
pub const KEY_LEN: usize = 32;
/// AES block length; also the CBC IV length.
pub const BLOCK_LEN: usize = 16;
/// CBC initialization vector length in bytes.
pub const IV_LEN: usize = 16;
/// AES-GCM-SIV nonce length in bytes.
pub const NONCE_LEN: usize = 12;
/// AES-GCM-SIV authentication tag length in bytes.
pub const TAG_LEN: usize = 16;

/// Salt of the legacy format.
pub const DEFAULT_SALT: &[u8] = b"steganography_salt";
/// PBKDF2 iteration count of the legacy format.
pub const DEFAULT_PBKDF2_ROUNDS: u32 = 1000;
/// Shortest salt accepted (Argon2 rejects anything shorter).
pub const MIN_SALT_LEN: usize = 8;

/// A derived key, wiped on drop.
pub type Key = Zeroizing<[u8; KEY_LEN]>;

/// Encryption scheme for the frame body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CipherScheme {
    /// PBKDF2-HMAC-SHA1 + AES-256-CBC with PKCS#7 padding.
    #[default]
    LegacyCbc,
    /// Argon2id + AES-256-GCM-SIV.
    SealedGcmSiv,
}

impl CipherScheme {
    /// Name as written in configuration files.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::LegacyCbc => "legacy-cbc",
            Self::SealedGcmSiv => "sealed-gcm-siv",
        }
    }
}

/// Key-derivation inputs shared by encoder and decoder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CipherParams {
    scheme: CipherScheme,
    salt: Vec<u8>,
    rounds: u32,
}

impl CipherParams {
    /// Build parameters with an explicit salt and PBKDF2 round count.
    /// `rounds` is ignored by the sealed scheme (Argon2id uses its defaults).
    ///
    /// # Errors
    /// [`StegoError::InvalidCipherParams`] if the salt is shorter than
    /// [`MIN_SALT_LEN`] or `rounds` is zero.
    pub fn new(scheme: CipherScheme, salt: impl Into<Vec<u8>>, rounds: u32) -> Result<Self, StegoError> {
        let salt = salt.into();
        if salt.len() < MIN_SALT_LEN {
            return Err(StegoError::InvalidCipherParams(format!(
                "salt must be at least {MIN_SALT_LEN} bytes, got {}",
                salt.len()
            )));
        }
        if rounds == 0 {
            return Err(StegoError::InvalidCipherParams("rounds must be positive".into()));
        }
        Ok(Self { scheme, salt, rounds })
    }

    /// Parameters of the legacy wire format.
    pub fn legacy() -> Self {
        Self {
            scheme: CipherScheme::LegacyCbc,
            salt: DEFAULT_SALT.to_vec(),
            rounds: DEFAULT_PBKDF2_ROUNDS,
        }
    }

    /// Authenticated scheme with the default salt.
    pub fn sealed() -> Self {
        Self { scheme: CipherScheme::SealedGcmSiv, ..Self::legacy() }
    }

    pub fn scheme(&self) -> CipherScheme {
        self.scheme
    }

    pub fn salt(&self) -> &[u8] {
        &self.salt
    }

    pub fn rounds(&self) -> u32 {
        self.rounds
    }
}

impl Default for CipherParams {
    fn default() -> Self {
        Self::legacy()
    }
}

/// Derive the 256-bit key for `password`. Deterministic for a given
/// password and parameter set.
pub fn derive_key(password: &str, params: &CipherParams) -> Result<Key, StegoError> {
    let mut key = Zeroizing::new([0u8; KEY_LEN]);
    match params.scheme {
        CipherScheme::LegacyCbc => {
            pbkdf2::pbkdf2_hmac::<Sha1>(password.as_bytes(), &params.salt, params.rounds, &mut *key);
        }
        CipherScheme::SealedGcmSiv => {
            Argon2::default()
                .hash_password_into(password.as_bytes(), &params.salt, &mut *key)
                .map_err(|e| StegoError::InvalidCipherParams(e.to_string()))?;
        }
    }
    Ok(key)
}

/// Encrypt with AES-256-CBC under a fresh random IV.
///
/// Returns `iv ‖ ciphertext`; the ciphertext is the PKCS#7-padded plaintext
/// (always 1–16 bytes longer than the input).
pub fn encrypt(key: &[u8; KEY_LEN], plaintext: &[u8]) -> Vec<u8> {
    let mut iv = [0u8; IV_LEN];
    rand::thread_rng().fill_bytes(&mut iv);
    encrypt_with_iv(key, &iv, plaintext)
}

/// Encrypt with AES-256-CBC using a caller-provided IV.
pub fn encrypt_with_iv(key: &[u8; KEY_LEN], iv: &[u8; IV_LEN], plaintext: &[u8]) -> Vec<u8> {
    let cipher = Aes256CbcEnc::new(key.into(), iv.into());
    let ciphertext = cipher.encrypt_padded_vec_mut::<Pkcs7>(plaintext);

    let mut blob = Vec::with_capacity(IV_LEN + ciphertext.len());
    blob.extend_from_slice(iv);
    blob.extend_from_slice(&ciphertext);
    blob
}

/// Decrypt an `iv ‖ ciphertext` blob produced by [`encrypt`].
///
/// # Errors
/// [`StegoError::DecryptionFailed`] if the blob is too short, the ciphertext
/// is not whole blocks, or the PKCS#7 padding is invalid.
pub fn decrypt(key: &[u8; KEY_LEN], blob: &[u8]) -> Result<Vec<u8>, StegoError> {
    if blob.len() < IV_LEN + BLOCK_LEN {
        return Err(StegoError::DecryptionFailed);
    }
    let (iv, ciphertext) = blob.split_at(IV_LEN);
    if ciphertext.len() % BLOCK_LEN != 0 {
        return Err(StegoError::DecryptionFailed);
    }

    let cipher = Aes256CbcDec::new_from_slices(key, iv).map_err(|_| StegoError::DecryptionFailed)?;
    cipher
        .decrypt_padded_vec_mut::<Pkcs7>(ciphertext)
        .map_err(|_| StegoError::DecryptionFailed)
}

/// Encrypt with AES-256-GCM-SIV under a fresh random nonce.
///
/// Returns `nonce ‖ ciphertext ‖ tag`.
pub fn encrypt_sealed(key: &[u8; KEY_LEN], plaintext: &[u8]) -> Vec<u8> {
    let mut nonce_bytes = [0u8; NONCE_LEN];
    rand::thread_rng().fill_bytes(&mut nonce_bytes);

    let cipher = Aes256GcmSiv::new(key.into());
    let nonce = Nonce::from_slice(&nonce_bytes);
    let ciphertext = cipher.encrypt(nonce, plaintext).expect("AES-GCM-SIV encrypt should not fail");

    let mut blob = Vec::with_capacity(NONCE_LEN + ciphertext.len());
    blob.extend_from_slice(&nonce_bytes);
    blob.extend_from_slice(&ciphertext);
    blob
}

/// Decrypt a blob produced by [`encrypt_sealed`].
///
/// # Errors
/// [`StegoError::DecryptionFailed`] on a short blob, wrong key or tampering.
pub fn decrypt_sealed(key: &[u8; KEY_LEN], blob: &[u8]) -> Result<Vec<u8>, StegoError> {
    if blob.len() < NONCE_LEN + TAG_LEN {
        return Err(StegoError::DecryptionFailed);
    }
    let (nonce_bytes, ciphertext) = blob.split_at(NONCE_LEN);

    let cipher = Aes256GcmSiv::new(key.into());
    cipher
        .decrypt(Nonce::from_slice(nonce_bytes), ciphertext)
        .map_err(|_| StegoError::DecryptionFailed)
}

/// A key bound to one password for one encode or decode call.
pub struct PayloadCipher {
    key: Key,
    scheme: CipherScheme,
}

impl PayloadCipher {
    /// Derive the key for `password` under `params`.
    pub fn new(password: &str, params: &CipherParams) -> Result<Self, StegoError> {
        Ok(Self { key: derive_key(password, params)?, scheme: params.scheme })
    }

    pub fn scheme(&self) -> CipherScheme {
        self.scheme
    }

    pub fn encrypt(&self, plaintext: &[u8]) -> Vec<u8> {
        match self.scheme {
            CipherScheme::LegacyCbc => encrypt(&self.key, plaintext),
            CipherScheme::SealedGcmSiv => encrypt_sealed(&self.key, plaintext),
        }
    }

    pub fn decrypt(&self, blob: &[u8]) -> Result<Vec<u8>, StegoError> {
        match self.scheme {
            CipherScheme::LegacyCbc => decrypt(&self.key, blob),
            CipherScheme::SealedGcmSiv => decrypt_sealed(&self.key, blob),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Reduced work factor for the bulk of the tests.
    fn fast() -> CipherParams {
        CipherParams::new(CipherScheme::LegacyCbc, DEFAULT_SALT, 16).unwrap()
    }

    #[test]
    fn encrypt_decrypt_roundtrip() {
        let key = derive_key("secret123", &fast()).unwrap();
        let msg = b"Hello, steganography!";
        let blob = encrypt(&key, msg);
        assert_eq!(decrypt(&key, &blob).unwrap(), msg);
    }

    #[test]
    fn blob_layout_is_iv_plus_padded_blocks() {
        let key = derive_key("pw", &fast()).unwrap();
        assert_eq!(encrypt(&key, &[]).len(), IV_LEN + 16);
        assert_eq!(encrypt(&key, &[0u8; 15]).len(), IV_LEN + 16);
        // Whole-block input gets a full block of padding.
        assert_eq!(encrypt(&key, &[0u8; 16]).len(), IV_LEN + 32);
        assert_eq!(encrypt(&key, &[0u8; 8192]).len(), IV_LEN + 8192 + 16);
    }

    #[test]
    fn padding_value_equals_pad_length() {
        let key = [7u8; KEY_LEN];
        let iv = [0u8; IV_LEN];
        let blob = encrypt_with_iv(&key, &iv, b"abc");
        let raw = Aes256CbcDec::new_from_slices(&key, &iv)
            .unwrap()
            .decrypt_padded_vec_mut::<cbc::cipher::block_padding::NoPadding>(&blob[IV_LEN..])
            .unwrap();
        assert_eq!(&raw[..3], b"abc");
        assert!(raw[3..].iter().all(|&b| b == 13));
    }

    #[test]
    fn cbc_matches_nist_sp800_38a_first_block() {
        // SP 800-38A F.2.5 CBC-AES256.Encrypt, block #1.
        let key: [u8; KEY_LEN] = [
            0x60, 0x3d, 0xeb, 0x10, 0x15, 0xca, 0x71, 0xbe, 0x2b, 0x73, 0xae, 0xf0, 0x85, 0x7d, 0x77, 0x81,
            0x1f, 0x35, 0x2c, 0x07, 0x3b, 0x61, 0x08, 0xd7, 0x2d, 0x98, 0x10, 0xa3, 0x09, 0x14, 0xdf, 0xf4,
        ];
        let iv: [u8; IV_LEN] = core::array::from_fn(|i| i as u8);
        let plaintext = [
            0x6b, 0xc1, 0xbe, 0xe2, 0x2e, 0x40, 0x9f, 0x96, 0xe9, 0x3d, 0x7e, 0x11, 0x73, 0x93, 0x17, 0x2a,
        ];
        let expected = [
            0xf5, 0x8c, 0x4c, 0x04, 0xd6, 0xe5, 0xf1, 0xba, 0x77, 0x9e, 0xab, 0xfb, 0x5f, 0x7b, 0xfb, 0xd6,
        ];
        let blob = encrypt_with_iv(&key, &iv, &plaintext);
        assert_eq!(&blob[..IV_LEN], &iv);
        assert_eq!(&blob[IV_LEN..IV_LEN + 16], &expected);
    }

    #[test]
    fn pbkdf2_sha1_matches_rfc6070() {
        // RFC 6070 test case 5 (dkLen 25 is a prefix of our 32-byte key).
        let params = CipherParams::new(
            CipherScheme::LegacyCbc,
            &b"saltSALTsaltSALTsaltSALTsaltSALTsalt"[..],
            4096,
        )
        .unwrap();
        let key = derive_key("passwordPASSWORDpassword", &params).unwrap();
        let expected = [
            0x3d, 0x2e, 0xec, 0x4f, 0xe4, 0x1c, 0x84, 0x9b, 0x80, 0xc8, 0xd8, 0x36, 0x62, 0xc0, 0xe4, 0x4a,
            0x8b, 0x29, 0x1a, 0x96, 0x4c, 0xf2, 0xf0, 0x70, 0x38,
        ];
        assert_eq!(&key[..25], &expected);
    }

    #[test]
    fn key_deterministic_and_password_dependent() {
        let params = CipherParams::default();
        assert_eq!(derive_key("mypass", &params).unwrap(), derive_key("mypass", &params).unwrap());
        assert_ne!(derive_key("pass1", &params).unwrap(), derive_key("pass2", &params).unwrap());
    }

    #[test]
    fn key_differs_by_salt() {
        let a = CipherParams::new(CipherScheme::LegacyCbc, &b"salt-one"[..], 16).unwrap();
        let b = CipherParams::new(CipherScheme::LegacyCbc, &b"salt-two"[..], 16).unwrap();
        assert_ne!(derive_key("pw", &a).unwrap(), derive_key("pw", &b).unwrap());
    }

    #[test]
    fn ciphertext_differs_per_encryption() {
        let key = derive_key("pass", &fast()).unwrap();
        let msg = b"same message";
        assert_ne!(encrypt(&key, msg), encrypt(&key, msg));
    }

    #[test]
    fn wrong_password_never_returns_plaintext() {
        let msg = vec![0x42u8; 100];
        let good = derive_key("correct", &fast()).unwrap();
        let bad = derive_key("wrong", &fast()).unwrap();
        let blob = encrypt(&good, &msg);
        match decrypt(&bad, &blob) {
            Err(StegoError::DecryptionFailed) => {}
            Ok(pt) => assert_ne!(pt, msg),
            Err(other) => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn malformed_blobs_rejected() {
        let key = [1u8; KEY_LEN];
        assert!(matches!(decrypt(&key, &[]), Err(StegoError::DecryptionFailed)));
        assert!(matches!(decrypt(&key, &[0u8; 16]), Err(StegoError::DecryptionFailed)));
        assert!(matches!(decrypt(&key, &[0u8; 40]), Err(StegoError::DecryptionFailed)));
    }

    #[test]
    fn short_salt_and_zero_rounds_rejected() {
        assert!(matches!(
            CipherParams::new(CipherScheme::LegacyCbc, &b"short"[..], 1000),
            Err(StegoError::InvalidCipherParams(_))
        ));
        assert!(matches!(
            CipherParams::new(CipherScheme::LegacyCbc, DEFAULT_SALT, 0),
            Err(StegoError::InvalidCipherParams(_))
        ));
    }

    #[test]
    fn sealed_roundtrip_and_wrong_key() {
        let params = CipherParams::sealed();
        let cipher = PayloadCipher::new("pw", &params).unwrap();
        let blob = cipher.encrypt(b"latent bytes");
        assert_eq!(blob.len(), NONCE_LEN + 12 + TAG_LEN);
        assert_eq!(cipher.decrypt(&blob).unwrap(), b"latent bytes");

        let other = PayloadCipher::new("not-pw", &params).unwrap();
        assert!(matches!(other.decrypt(&blob), Err(StegoError::DecryptionFailed)));
    }

    #[test]
    fn sealed_detects_tampering() {
        let cipher = PayloadCipher::new("pw", &CipherParams::sealed()).unwrap();
        let mut blob = cipher.encrypt(&[9u8; 64]);
        blob[NONCE_LEN + 3] ^= 0x01;
        assert!(matches!(cipher.decrypt(&blob), Err(StegoError::DecryptionFailed)));
    }

    #[test]
    fn scheme_names_match_config_spelling() {
        #[derive(Deserialize)]
        struct Wrapper {
            scheme: CipherScheme,
        }
        for scheme in [CipherScheme::LegacyCbc, CipherScheme::SealedGcmSiv] {
            let parsed: Wrapper = toml::from_str(&format!("scheme = \"{}\"", scheme.as_str())).unwrap();
            assert_eq!(parsed.scheme, scheme);
        }
    }

    #[test]
    fn schemes_derive_different_keys() {
        let legacy = derive_key("same", &CipherParams::legacy()).unwrap();
        let sealed = derive_key("same", &CipherParams::sealed()).unwrap();
        assert_ne!(legacy, sealed);
    }
}
