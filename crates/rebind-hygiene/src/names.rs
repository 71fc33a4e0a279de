//! Unique name generation.
//!
//! Every minted name is `original + separator + counter`. The counter is
//! shared by all names of one transform run, so the numeric suffix alone
//! makes each generated name distinct, whatever the original names were.

/// Default separator between the original name and the counter.
pub const DEFAULT_SEPARATOR: &str = "$";

/// Monotonic fresh-name source, owned by a single transform.
#[derive(Debug, Clone)]
pub struct NameGenerator {
    separator: String,
    counter: u32,
}

impl Default for NameGenerator {
    fn default() -> Self {
        Self::new(DEFAULT_SEPARATOR)
    }
}

impl NameGenerator {
    /// Create a generator starting at zero.
    ///
    /// `separator` is taken as given. Names stay distinct only when it is
    /// non-empty and does not end with a digit.
    pub fn new(separator: impl Into<String>) -> Self {
        Self {
            separator: separator.into(),
            counter: 0,
        }
    }

    /// Mint a fresh name derived from `name`.
    ///
    /// Never returns the same string twice: calling this twice with the
    /// same input yields two different names.
    pub fn fresh(&mut self, name: &str) -> String {
        let unique = format!("{name}{}{}", self.separator, self.counter);
        self.counter += 1;
        unique
    }

    /// Number of names minted so far.
    pub fn count(&self) -> u32 {
        self.counter
    }

    pub fn separator(&self) -> &str {
        &self.separator
    }
}
