use std::collections::BTreeMap;
use std::fmt::Display;
use std::io::Write;

use drift_core::{HashError, HashValue, Record, NIL_LEAF};
use log::{debug, warn};
use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::opts::HashOpts;
use crate::ser::to_hash_value;

/// Computes the fingerprint of any serialisable value with default options.
pub fn compute_hash<T>(value: &T) -> Result<String, HashError>
where
    T: Serialize + ?Sized,
{
    compute_hash_with(value, &HashOpts::default())
}

/// Computes the fingerprint of any serialisable value.
pub fn compute_hash_with<T>(value: &T, opts: &HashOpts) -> Result<String, HashError>
where
    T: Serialize + ?Sized,
{
    let view = to_hash_value(value, opts)?;
    let digest = hash_value_with(&view, opts)?;
    debug!("computed fingerprint {digest} for {} value", view.shape());
    Ok(digest)
}

/// Computes the fingerprint of an already built hashable view.
pub fn hash_value(value: &HashValue) -> Result<String, HashError> {
    hash_value_with(value, &HashOpts::default())
}

/// Computes the fingerprint of an already built hashable view with options.
pub fn hash_value_with(value: &HashValue, opts: &HashOpts) -> Result<String, HashError> {
    let mut hasher = Hasher::with_opts(*opts);
    hasher.write_value(value)?;
    Ok(hasher.finish())
}

/// Streaming SHA-256 canonicaliser for [`HashValue`] trees.
///
/// Each instance owns its digest; nested sequence elements and map entries
/// are hashed by fresh child instances and only their hex digests reach the
/// parent.
pub struct Hasher {
    digest: Sha256,
    opts: HashOpts,
}

impl Default for Hasher {
    fn default() -> Self {
        Self::new()
    }
}

impl Hasher {
    /// Creates a hasher with default options.
    pub fn new() -> Self {
        Self::with_opts(HashOpts::default())
    }

    /// Creates a hasher with the provided options.
    pub fn with_opts(opts: HashOpts) -> Self {
        Self {
            digest: Sha256::new(),
            opts,
        }
    }

    /// Feeds the canonical encoding of `value` into the digest.
    ///
    /// Zero values and nil pointers write nothing; an untyped nil writes the
    /// [`NIL_LEAF`] text.
    pub fn write_value(&mut self, value: &HashValue) -> Result<(), HashError> {
        match value {
            HashValue::Nil => self.write_leaf(&NIL_LEAF),
            HashValue::Pointer(None) => Ok(()),
            HashValue::Pointer(Some(target)) => self.write_value(target),
            other if other.is_zero() => Ok(()),
            HashValue::Record(record) => self.write_record(record),
            HashValue::Sequence(items) | HashValue::Array(items) => self.write_sequence(items),
            HashValue::Mapping(entries) => self.write_mapping(entries),
            HashValue::Primitive(primitive) => self.write_leaf(primitive),
        }
    }

    /// Consumes the hasher and returns the lowercase hex digest.
    pub fn finish(self) -> String {
        format!("{:x}", self.digest.finalize())
    }

    fn write_leaf(&mut self, leaf: &dyn Display) -> Result<(), HashError> {
        write!(self.digest, "{leaf}").map_err(|err| HashError::leaf(&leaf.to_string(), err))
    }

    fn write_record(&mut self, record: &Record) -> Result<(), HashError> {
        for field in &record.fields {
            if field.ignored || field.value.is_zero() {
                continue;
            }
            self.write_value(&field.value)?;
        }
        Ok(())
    }

    fn write_sequence(&mut self, items: &[HashValue]) -> Result<(), HashError> {
        for item in items {
            let item_hash = self.child_hash(item)?;
            self.digest.update(item_hash.as_bytes());
        }
        Ok(())
    }

    fn write_mapping(&mut self, entries: &[(HashValue, HashValue)]) -> Result<(), HashError> {
        // Sorted by key hash so the encoding ignores iteration order.
        let mut by_key_hash: BTreeMap<String, &HashValue> = BTreeMap::new();
        for (key, value) in entries {
            let key_hash = self.child_hash(key)?;
            if let Some(previous) = by_key_hash.insert(key_hash.clone(), value) {
                if self.opts.warn_on_collision {
                    warn!(
                        "map keys collide on hash {key_hash}; dropping earlier {} value",
                        previous.shape()
                    );
                }
            }
        }
        for (key_hash, value) in by_key_hash {
            self.digest.update(key_hash.as_bytes());
            let value_hash = self.child_hash(value)?;
            self.digest.update(value_hash.as_bytes());
        }
        Ok(())
    }

    fn child_hash(&self, value: &HashValue) -> Result<String, HashError> {
        hash_value_with(value, &self.opts)
    }
}
