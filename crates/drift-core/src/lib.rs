#![deny(missing_docs)]
#![doc = "Hashable value model and error types shared by the drift fingerprint crates."]

pub mod errors;
pub mod value;

pub use errors::{ErrorInfo, HashError};
pub use value::{Field, HashValue, Primitive, Record, NIL_LEAF};
