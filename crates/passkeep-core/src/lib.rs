//! Core engine for the passkeep credential vault.
//!
//! This crate implements everything with real security consequences and
//! nothing else: deriving keys from the master password, sealing and opening
//! per-entry secrets, the enroll/login state machine, and the contract that
//! credential storage has to satisfy. Presentation (prompting, tables, exit
//! codes) lives in the CLI crate.
//!
//! The pieces compose leaf-first:
//!
//! - [`crypto::kdf`] turns a master password into a verifier (for login) and
//!   a cipher key (for sealing secrets).
//! - [`crypto::envelope`] provides authenticated encryption of entry secrets
//!   under that cipher key.
//! - [`vault::Authenticator`] owns enrollment and login; a successful login
//!   yields a [`vault::Session`].
//! - [`vault::EntryRepository`] is the CRUD surface over sealed entries and
//!   can only be constructed from a live session.
//! - [`store`] defines the storage contract plus two reference stores: a
//!   durable JSON file and an in-memory store.

#![forbid(unsafe_code)]

pub mod crypto;
pub mod error;
pub mod passgen;
pub mod store;
pub mod vault;
