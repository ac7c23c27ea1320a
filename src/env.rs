//! Environment variable lookup behind a swappable source.
//!
//! Config loading reads process environment variables through [`Env`] so
//! tests can substitute a fixed set of values instead of mutating the real
//! environment (which would race between parallel tests and require
//! `unsafe` on recent toolchains).

use std::collections::HashMap;

/// Where variable lookups are answered from.
#[derive(Clone, Debug)]
enum Source {
    /// The real process environment.
    Process,
    /// A fixed map, for tests.
    Fixed(HashMap<String, String>),
}

/// Environment variable reader.
#[derive(Clone, Debug)]
pub struct Env {
    source: Source,
}

impl Env {
    /// Read from the real process environment.
    pub fn real() -> Self {
        Self {
            source: Source::Process,
        }
    }

    /// Answer lookups from a fixed set of key-value pairs.
    #[cfg(test)]
    pub fn mock(vars: impl IntoIterator<Item = (impl Into<String>, impl Into<String>)>) -> Self {
        Self {
            source: Source::Fixed(
                vars.into_iter()
                    .map(|(k, v)| (k.into(), v.into()))
                    .collect(),
            ),
        }
    }

    /// Look up a variable by name.
    pub fn var(&self, name: &str) -> Result<String, std::env::VarError> {
        match &self.source {
            Source::Process => std::env::var(name),
            Source::Fixed(map) => map
                .get(name)
                .cloned()
                .ok_or(std::env::VarError::NotPresent),
        }
    }
}

impl Default for Env {
    fn default() -> Self {
        Self::real()
    }
}
