//! Cryptographic building blocks for vault authentication and entry sealing.

pub mod envelope;
pub mod kdf;

// Re-export commonly used types
pub use envelope::{EnvelopeCipher, IntegrityError, SealError, SealedSecret};
pub use kdf::{KdfError, derive_cipher_key, enroll_master_password, verify_master_password};
