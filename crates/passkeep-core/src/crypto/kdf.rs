//! Master-password key derivation.
//!
//! Two independent derivations run over the same master password:
//!
//! 1. An **authentication verifier**: PBKDF2-HMAC-SHA256 over a per-vault
//!    random salt. Stored in the [`MasterRecord`] and recomputed on every
//!    login attempt. The salt makes the verifier useless as an encryption
//!    key and unlinkable across vaults.
//! 2. A **cipher key**: a plain SHA-256 digest of the password, never
//!    persisted. It is deliberately unsalted so that the same master
//!    password yields the same key in every session - otherwise secrets
//!    sealed yesterday could not be opened today.
//!
//! Passphrases are NFC-normalized before either derivation, so composed and
//! decomposed Unicode spellings of the same password are equivalent.

use std::num::NonZeroU32;

use ring::digest;
use ring::pbkdf2;
use ring::rand::{SecureRandom, SystemRandom};
use secrecy::SecretBox;
use subtle::ConstantTimeEq;
use thiserror::Error;
use unicode_normalization::UnicodeNormalization;
use zeroize::Zeroizing;

use crate::store::MasterRecord;

/// Length of the per-vault authentication salt in bytes.
pub const SALT_LEN: usize = 16;

/// Length of the derived authentication verifier in bytes.
pub const VERIFIER_LEN: usize = 32;

/// PBKDF2 iteration count for the authentication verifier.
///
/// Deliberately a named constant rather than a field of [`MasterRecord`]:
/// every vault this crate ever wrote used this count, so there is nothing to
/// negotiate at load time. Raising it would be a vault format change.
pub const PBKDF2_ITERATIONS: NonZeroU32 = NonZeroU32::new(100_000).unwrap();

static PBKDF2_ALGORITHM: pbkdf2::Algorithm = pbkdf2::PBKDF2_HMAC_SHA256;

/// Errors that can occur during key derivation.
#[derive(Error, Debug)]
pub enum KdfError {
    /// The system RNG failed to produce a salt.
    #[error("RNG failed to generate salt")]
    Rng,
}

/// Enroll a master password, producing the record to persist.
///
/// Generates a fresh random salt on every call, so enrolling the same
/// password twice yields unrelated records.
///
/// # Errors
///
/// - `KdfError::Rng`: the system RNG failed
pub fn enroll_master_password(password: &str) -> Result<MasterRecord, KdfError> {
    let mut salt = vec![0u8; SALT_LEN];
    SystemRandom::new().fill(&mut salt).map_err(|_| KdfError::Rng)?;

    let verifier = derive_verifier(password, &salt);

    Ok(MasterRecord {
        auth_hash: verifier.to_vec(),
        salt,
    })
}

/// Check a candidate password against a stored [`MasterRecord`].
///
/// Recomputes the verifier with the record's salt and compares in constant
/// time. Returns a plain accept/reject; the caller decides what a rejection
/// means.
#[must_use]
pub fn verify_master_password(password: &str, record: &MasterRecord) -> bool {
    let candidate = derive_verifier(password, &record.salt);
    candidate.ct_eq(&record.auth_hash).into()
}

/// Derive the 256-bit cipher key used to seal and open entry secrets.
///
/// Unsalted and deterministic: the same password always produces the same
/// key, which is what lets a fresh session open secrets sealed by an earlier
/// one. The key only ever lives inside a [`SecretBox`] and is zeroized on
/// drop.
#[must_use]
pub fn derive_cipher_key(password: &str) -> SecretBox<[u8; 32]> {
    let normalized = Zeroizing::new(password.nfc().collect::<String>());
    let digest = digest::digest(&digest::SHA256, normalized.as_bytes());

    let mut key = Zeroizing::new([0u8; 32]);
    key.copy_from_slice(digest.as_ref());
    SecretBox::new(Box::new(*key))
}

fn derive_verifier(password: &str, salt: &[u8]) -> Zeroizing<[u8; VERIFIER_LEN]> {
    // NFC-normalize so composed/decomposed forms derive identically
    let normalized = Zeroizing::new(password.nfc().collect::<String>());

    let mut verifier = Zeroizing::new([0u8; VERIFIER_LEN]);
    pbkdf2::derive(
        PBKDF2_ALGORITHM,
        PBKDF2_ITERATIONS,
        salt,
        normalized.as_bytes(),
        &mut verifier[..],
    );
    verifier
}
