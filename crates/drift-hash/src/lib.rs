#![deny(missing_docs)]
#![doc = include_str!("../docs/hashing-contract.md")]

mod fingerprint;
mod hasher;
mod opts;
mod ser;

pub use fingerprint::{has_changed, Fingerprint, FINGERPRINT_LEN};
pub use hasher::{compute_hash, compute_hash_with, hash_value, hash_value_with, Hasher};
pub use opts::{HashOpts, DEFAULT_MAX_DEPTH};
pub use ser::to_hash_value;

/// Re-export of the value model and error types for downstream crates.
pub use drift_core::{ErrorInfo, Field, HashError, HashValue, Primitive, Record, NIL_LEAF};
