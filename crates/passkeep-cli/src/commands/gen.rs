//! Gen command - generate a random password without touching any vault.
//!
//! With no class flags the full character set is used. Passing any flag
//! switches to exactly the named classes.
//!
//! # Examples
//!
//! ```bash
//! # 12 characters from all classes
//! passkeep gen
//!
//! # Numeric PIN
//! passkeep gen --length 6 --digits
//! ```

use anyhow::Result;
use clap::Args as ClapArgs;
use tracing::instrument;

use passkeep_core::passgen::{self, Charset};

#[allow(clippy::struct_excessive_bools)] // Command-line args naturally have multiple boolean flags
#[derive(ClapArgs, Clone)]
pub struct Args {
    /// Length of the generated password
    #[arg(short, long, default_value_t = passgen::DEFAULT_LENGTH)]
    pub length: usize,

    /// Include lowercase letters
    #[arg(long)]
    pub lowercase: bool,

    /// Include uppercase letters
    #[arg(long)]
    pub uppercase: bool,

    /// Include digits
    #[arg(long)]
    pub digits: bool,

    /// Include punctuation symbols
    #[arg(long)]
    pub symbols: bool,
}

#[instrument(level = "info", name = "cmd::gen", skip_all, fields(length = args.length))]
pub fn execute(args: &Args) -> Result<()> {
    let any_flag = args.lowercase || args.uppercase || args.digits || args.symbols;
    let charset = if any_flag {
        Charset::from_flags(args.lowercase, args.uppercase, args.digits, args.symbols)
    } else {
        Charset::all()
    };

    println!("{}", passgen::generate(args.length, &charset));
    Ok(())
}
