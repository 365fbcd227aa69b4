use std::fmt::{self, Display};
use std::str::FromStr;

use drift_core::{ErrorInfo, HashError};
use log::warn;
use serde::{Deserialize, Serialize};

use crate::hasher::{compute_hash, compute_hash_with};
use crate::opts::HashOpts;

/// Length of a hex encoded SHA-256 digest.
pub const FINGERPRINT_LEN: usize = 64;

/// Hex encoded structural fingerprint of a value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Fingerprint(String);

impl Fingerprint {
    /// Fingerprints `value` with default options.
    pub fn of<T>(value: &T) -> Result<Self, HashError>
    where
        T: Serialize + ?Sized,
    {
        compute_hash(value).map(Self)
    }

    /// Fingerprints `value` with the provided options.
    pub fn of_with<T>(value: &T, opts: &HashOpts) -> Result<Self, HashError>
    where
        T: Serialize + ?Sized,
    {
        compute_hash_with(value, opts).map(Self)
    }

    /// Returns the hex digest.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns true when `value` still hashes to this fingerprint.
    ///
    /// A value that cannot be hashed never matches.
    pub fn matches<T>(&self, value: &T) -> bool
    where
        T: Serialize + ?Sized,
    {
        match compute_hash(value) {
            Ok(current) => current == self.0,
            Err(err) => {
                warn!("fingerprint unavailable, treating value as changed: {err}");
                false
            }
        }
    }
}

impl Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Fingerprint {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<Fingerprint> for String {
    fn from(value: Fingerprint) -> Self {
        value.0
    }
}

impl TryFrom<String> for Fingerprint {
    type Error = HashError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        let well_formed = value.len() == FINGERPRINT_LEN
            && value.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'));
        if !well_formed {
            return Err(HashError::Serde(
                ErrorInfo::new("fingerprint-format", "expected 64 lowercase hex characters")
                    .with_context("input", value),
            ));
        }
        Ok(Self(value))
    }
}

impl FromStr for Fingerprint {
    type Err = HashError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::try_from(s.to_string())
    }
}

/// Reports whether `current` drifted away from a previously recorded
/// fingerprint.
///
/// A missing record or a hashing failure both count as a change.
pub fn has_changed<T>(recorded: Option<&str>, current: &T) -> bool
where
    T: Serialize + ?Sized,
{
    match recorded {
        Some(recorded) => match recorded.parse::<Fingerprint>() {
            Ok(fingerprint) => !fingerprint.matches(current),
            Err(err) => {
                warn!("recorded fingerprint is malformed: {err}");
                true
            }
        },
        None => true,
    }
}
