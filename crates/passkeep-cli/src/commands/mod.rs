//! Subcommand implementations.
//!
//! Each module exposes an `Args` struct for clap and an `execute`
//! function. Commands that read or modify entries receive a store and a
//! session from `main.rs`, which owns vault resolution and password
//! sourcing.

pub mod add;
pub mod r#gen;
pub mod init;
pub mod ls;
pub mod rm;
pub mod show;
pub mod status;
