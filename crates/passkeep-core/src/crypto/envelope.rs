//! Authenticated envelope encryption for entry secrets.
//!
//! Secrets are sealed with AES-256-GCM under the session's cipher key and
//! carried as a self-describing token:
//!
//! ```text
//! base64url( version (1 byte) || nonce (12 bytes) || ciphertext || tag (16 bytes) )
//! ```
//!
//! The version byte is bound as associated data, so a token cannot be
//! replayed under a future format. A fresh random nonce is drawn for every
//! seal; sealing the same secret twice yields different tokens.
//!
//! Opening fails closed: an undecodable token, an unknown version, a wrong
//! key and tampered ciphertext all collapse into the single
//! [`IntegrityError`]. Wrong key and corruption are cryptographically
//! indistinguishable here, so no attempt is made to tell them apart.

use std::fmt;

use aead::Payload;
use aes_gcm::{
    Aes256Gcm, Key, Nonce,
    aead::{Aead, KeyInit},
};
use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use rand::RngCore;
use secrecy::{ExposeSecret, SecretBox};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{trace, warn};

/// Current sealed-token format version.
pub const FORMAT_VERSION: u8 = 1;

const NONCE_LEN: usize = 12;
const TAG_LEN: usize = 16;

/// A sealed secret failed to open.
///
/// **[INTEGRITY VIOLATION]** The token is malformed, has been tampered with,
/// or was sealed under a different key. No partial plaintext is ever
/// available. Carries no secret material.
#[derive(Error, Debug, PartialEq, Eq)]
#[error("sealed secret failed authentication - possible tampering or wrong key")]
pub struct IntegrityError;

/// Sealing a secret failed unexpectedly.
#[derive(Error, Debug)]
#[error("failed to seal secret: {reason}")]
pub struct SealError {
    pub reason: String,
}

/// An encrypted secret token, safe to persist and display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SealedSecret(String);

impl SealedSecret {
    /// Wrap an already-encoded token, e.g. one loaded from storage.
    #[must_use]
    pub fn from_token(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SealedSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Authenticated cipher bound to one derived key.
///
/// Owns its key for the lifetime of a session; the key is zeroized when the
/// cipher is dropped.
#[derive(Debug)]
pub struct EnvelopeCipher {
    key: SecretBox<[u8; 32]>,
}

impl EnvelopeCipher {
    #[must_use]
    pub fn new(key: SecretBox<[u8; 32]>) -> Self {
        Self { key }
    }

    /// Seal a secret, producing a fresh token.
    ///
    /// Non-deterministic: every call draws a new random nonce, so equal
    /// plaintexts under the same key still produce distinct tokens.
    ///
    /// # Errors
    ///
    /// - `SealError`: the underlying AEAD rejected the operation
    pub fn seal(&self, plaintext: &str) -> Result<SealedSecret, SealError> {
        let mut nonce = [0u8; NONCE_LEN];
        rand::rng().fill_bytes(&mut nonce);

        let key: &Key<Aes256Gcm> = self.key.expose_secret().into();
        let cipher = Aes256Gcm::new(key);

        let ciphertext = cipher
            .encrypt(
                Nonce::from_slice(&nonce),
                Payload {
                    msg: plaintext.as_bytes(),
                    aad: &[FORMAT_VERSION],
                },
            )
            .map_err(|e| SealError {
                reason: e.to_string(),
            })?;

        let mut token = Vec::with_capacity(1 + NONCE_LEN + ciphertext.len());
        token.push(FORMAT_VERSION);
        token.extend_from_slice(&nonce);
        token.extend_from_slice(&ciphertext);

        trace!(token_len = token.len(), "secret sealed");
        Ok(SealedSecret(URL_SAFE_NO_PAD.encode(token)))
    }

    /// Open a sealed token, recovering the secret.
    ///
    /// # Errors
    ///
    /// - `IntegrityError`: the token is malformed, tampered with, or sealed
    ///   under a different key
    pub fn open(&self, sealed: &SealedSecret) -> Result<String, IntegrityError> {
        let token = URL_SAFE_NO_PAD.decode(sealed.as_str()).map_err(|_| {
            warn!("sealed secret is not valid base64");
            IntegrityError
        })?;

        if token.len() < 1 + NONCE_LEN + TAG_LEN {
            warn!(token_len = token.len(), "sealed secret is truncated");
            return Err(IntegrityError);
        }

        let version = token[0];
        if version != FORMAT_VERSION {
            warn!(version, "unknown sealed secret version");
            return Err(IntegrityError);
        }

        let nonce = Nonce::from_slice(&token[1..=NONCE_LEN]);
        let ciphertext = &token[1 + NONCE_LEN..];

        let key: &Key<Aes256Gcm> = self.key.expose_secret().into();
        let cipher = Aes256Gcm::new(key);

        let plaintext = cipher
            .decrypt(
                nonce,
                Payload {
                    msg: ciphertext,
                    aad: &[version],
                },
            )
            .map_err(|_| {
                warn!("sealed secret failed authentication - tampering or wrong key");
                IntegrityError
            })?;

        trace!("secret opened");
        String::from_utf8(plaintext).map_err(|_| {
            warn!("opened secret is not valid UTF-8");
            IntegrityError
        })
    }
}
