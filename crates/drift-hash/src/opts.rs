use drift_core::{ErrorInfo, HashError};
use serde::{Deserialize, Serialize};

/// Nesting limit applied when no explicit value is configured.
pub const DEFAULT_MAX_DEPTH: usize = 512;

fn default_max_depth() -> Option<usize> {
    Some(DEFAULT_MAX_DEPTH)
}

fn default_warn_on_collision() -> bool {
    true
}

/// Options controlling fingerprint computation.
///
/// None of the options change the bytes fed into the digest; a fingerprint
/// computed with any options either matches the default one or is an error.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct HashOpts {
    /// Maximum nesting depth accepted while building the hashable view.
    /// `None` disables the guard.
    #[serde(default = "default_max_depth")]
    pub max_depth: Option<usize>,
    /// Emit a warning when two map keys produce the same key hash.
    #[serde(default = "default_warn_on_collision")]
    pub warn_on_collision: bool,
}

impl Default for HashOpts {
    fn default() -> Self {
        Self {
            max_depth: default_max_depth(),
            warn_on_collision: default_warn_on_collision(),
        }
    }
}

impl HashOpts {
    /// Loads options from JSON bytes; missing keys take their defaults.
    pub fn from_json_slice(data: &[u8]) -> Result<Self, HashError> {
        serde_json::from_slice(data)
            .map_err(|err| HashError::Serde(ErrorInfo::new("opts-read", err.to_string())))
    }

    /// Returns options without a nesting limit.
    pub fn unbounded() -> Self {
        Self {
            max_depth: None,
            ..Self::default()
        }
    }
}
