//! Random password generation.
//!
//! Stateless convenience, not part of the vault's security core: generated
//! values only become secrets once the caller stores them. Character pools
//! are configuration rather than hard-coded policy - [`Charset`] is built
//! from the standard four classes, or from arbitrary custom pools.
//!
//! Randomness comes from [`rand::rng`], which is cryptographically secure.

use std::collections::BTreeSet;

use rand::Rng;

/// Default length when the caller expresses no preference.
pub const DEFAULT_LENGTH: usize = 12;

const LOWERCASE: &str = "abcdefghijklmnopqrstuvwxyz";
const UPPERCASE: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZ";
const DIGITS: &str = "0123456789";
const SYMBOLS: &str = "!\"#$%&'()*+,-./:;<=>?@[\\]^_`{|}~";

/// The set of characters a password may be drawn from.
///
/// Built up from class toggles or custom pools:
///
/// ```
/// use passkeep_core::passgen::Charset;
///
/// let alnum = Charset::new().with_lowercase().with_uppercase().with_digits();
/// let hex = Charset::new().with_pool("0123456789abcdef");
/// ```
#[derive(Debug, Clone, Default)]
pub struct Charset {
    pools: Vec<String>,
}

impl Charset {
    /// An empty charset. Generating from it yields the empty string.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// All four standard classes enabled.
    #[must_use]
    pub fn all() -> Self {
        Self::from_flags(true, true, true, true)
    }

    /// Build from the four standard class toggles.
    #[must_use]
    pub fn from_flags(lowercase: bool, uppercase: bool, digits: bool, symbols: bool) -> Self {
        let mut charset = Self::new();
        if lowercase {
            charset = charset.with_lowercase();
        }
        if uppercase {
            charset = charset.with_uppercase();
        }
        if digits {
            charset = charset.with_digits();
        }
        if symbols {
            charset = charset.with_symbols();
        }
        charset
    }

    #[must_use]
    pub fn with_lowercase(self) -> Self {
        self.with_pool(LOWERCASE)
    }

    #[must_use]
    pub fn with_uppercase(self) -> Self {
        self.with_pool(UPPERCASE)
    }

    #[must_use]
    pub fn with_digits(self) -> Self {
        self.with_pool(DIGITS)
    }

    #[must_use]
    pub fn with_symbols(self) -> Self {
        self.with_pool(SYMBOLS)
    }

    /// Add an arbitrary pool of candidate characters.
    #[must_use]
    pub fn with_pool(mut self, pool: impl Into<String>) -> Self {
        self.pools.push(pool.into());
        self
    }

    /// True if no pool contributes any character.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pools.iter().all(|p| p.is_empty())
    }

    /// The deduplicated union of all pools.
    fn alphabet(&self) -> Vec<char> {
        self.pools
            .iter()
            .flat_map(|p| p.chars())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }
}

/// Generate a random string of `length` characters drawn uniformly from the
/// charset's alphabet.
///
/// An empty charset yields the empty string - the caller asked for a
/// password out of nothing, which is a configuration error to report, not a
/// reason to panic.
#[must_use]
pub fn generate(length: usize, charset: &Charset) -> String {
    let alphabet = charset.alphabet();
    if alphabet.is_empty() {
        return String::new();
    }

    let mut rng = rand::rng();
    (0..length)
        .map(|_| alphabet[rng.random_range(0..alphabet.len())])
        .collect()
}
