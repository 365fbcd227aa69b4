//! Structured error types shared across drift crates.

use std::collections::BTreeMap;
use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Structured payload attached to every [`HashError`] variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorInfo {
    /// Stable machine readable error code.
    pub code: String,
    /// Human readable diagnostic message.
    pub message: String,
    /// Contextual key value pairs (field names, depths, etc.).
    #[serde(default)]
    pub context: BTreeMap<String, String>,
    /// Optional hint that may help the caller resolve the issue.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

impl ErrorInfo {
    /// Creates a new error payload with the provided code and message.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            context: BTreeMap::new(),
            hint: None,
        }
    }

    /// Adds a context entry to the payload.
    pub fn with_context(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.context.insert(key.into(), value.into());
        self
    }

    /// Sets a human readable hint for remediation.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

impl Display for ErrorInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (code: {})", self.message, self.code)?;
        if !self.context.is_empty() {
            write!(f, " | context: [")?;
            for (idx, (key, value)) in self.context.iter().enumerate() {
                if idx > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{key}={value}")?;
            }
            write!(f, "]")?;
        }
        if let Some(hint) = &self.hint {
            write!(f, " | hint: {hint}")?;
        }
        Ok(())
    }
}

/// Canonical error type for fingerprint computation.
///
/// A returned error means the fingerprint is unavailable; callers comparing
/// fingerprints should treat the value as changed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
#[serde(tag = "family", content = "detail")]
pub enum HashError {
    /// Writing the textual form of a leaf into the digest failed.
    #[error("leaf error: {0}")]
    Leaf(ErrorInfo),
    /// The value's `Serialize` implementation reported an error.
    #[error("serde error: {0}")]
    Serde(ErrorInfo),
    /// The value nests deeper than the configured limit.
    #[error("depth error: {0}")]
    Depth(ErrorInfo),
}

impl HashError {
    /// Returns a reference to the payload describing the error.
    pub fn info(&self) -> &ErrorInfo {
        match self {
            HashError::Leaf(info) | HashError::Serde(info) | HashError::Depth(info) => info,
        }
    }

    /// Builds a leaf encoding failure for the given leaf text.
    pub fn leaf(leaf: &str, err: impl ToString) -> Self {
        HashError::Leaf(ErrorInfo::new("leaf-encode", err.to_string()).with_context("leaf", leaf))
    }

    /// Builds a depth failure once `limit` nesting levels were exceeded.
    pub fn depth(limit: usize) -> Self {
        HashError::Depth(
            ErrorInfo::new("depth-exceeded", "value nests deeper than the configured limit")
                .with_context("max_depth", limit.to_string())
                .with_hint("check the value for self references or raise max_depth"),
        )
    }
}

impl serde::ser::Error for HashError {
    fn custom<T: Display>(msg: T) -> Self {
        HashError::Serde(ErrorInfo::new("serialize", msg.to_string()))
    }
}
