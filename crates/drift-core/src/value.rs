//! Hashable value model.
//!
//! A [`HashValue`] is the transient, shape-classified view of an input that
//! the hasher walks. It is built fresh for every fingerprint and dropped
//! afterwards.

use std::fmt::{self, Display};

/// Text written for an absent value that carries no type at all.
///
/// Fingerprints persisted by existing consumers depend on this exact text.
pub const NIL_LEAF: &str = "<invalid reflect.Value>";

/// Scalar leaf of a [`HashValue`].
#[derive(Debug, Clone, PartialEq)]
pub enum Primitive {
    /// Boolean scalar.
    Bool(bool),
    /// Signed integer up to 64 bits.
    I64(i64),
    /// Unsigned integer up to 64 bits.
    U64(u64),
    /// Signed 128-bit integer.
    I128(i128),
    /// Unsigned 128-bit integer.
    U128(u128),
    /// 32-bit float.
    F32(f32),
    /// 64-bit float.
    F64(f64),
    /// Unicode scalar.
    Char(char),
    /// UTF-8 string.
    Str(String),
}

impl Primitive {
    /// Returns true when the scalar equals the default value of its type.
    ///
    /// Floats are zero only when every bit is zero, so `-0.0` is not.
    pub fn is_zero(&self) -> bool {
        match self {
            Primitive::Bool(v) => !*v,
            Primitive::I64(v) => *v == 0,
            Primitive::U64(v) => *v == 0,
            Primitive::I128(v) => *v == 0,
            Primitive::U128(v) => *v == 0,
            Primitive::F32(v) => v.to_bits() == 0,
            Primitive::F64(v) => v.to_bits() == 0,
            Primitive::Char(v) => *v == '\0',
            Primitive::Str(v) => v.is_empty(),
        }
    }
}

impl Display for Primitive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Primitive::Bool(v) => write!(f, "{v}"),
            Primitive::I64(v) => write!(f, "{v}"),
            Primitive::U64(v) => write!(f, "{v}"),
            Primitive::I128(v) => write!(f, "{v}"),
            Primitive::U128(v) => write!(f, "{v}"),
            Primitive::F32(v) => write!(f, "{v}"),
            Primitive::F64(v) => write!(f, "{v}"),
            Primitive::Char(v) => write!(f, "{v}"),
            Primitive::Str(v) => f.write_str(v),
        }
    }
}

/// Named field of a [`Record`].
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    /// Field identifier.
    pub name: String,
    /// Field payload.
    pub value: HashValue,
    /// Excluded from hashing regardless of `value`.
    pub ignored: bool,
}

/// Struct-shaped value with fields in declaration order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Record {
    /// Type name, informational only. It never reaches the digest.
    pub name: String,
    /// Fields in declaration order.
    pub fields: Vec<Field>,
}

impl Record {
    /// Creates an empty record with the given type name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
        }
    }

    /// Appends a hashed field.
    pub fn field(mut self, name: impl Into<String>, value: impl Into<HashValue>) -> Self {
        self.push(name, value.into(), false);
        self
    }

    /// Appends a field carrying the ignore marker.
    pub fn ignored_field(mut self, name: impl Into<String>, value: impl Into<HashValue>) -> Self {
        self.push(name, value.into(), true);
        self
    }

    /// Appends a field in place.
    pub fn push(&mut self, name: impl Into<String>, value: HashValue, ignored: bool) {
        self.fields.push(Field {
            name: name.into(),
            value,
            ignored,
        });
    }

    /// Looks up a field by name.
    pub fn get(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|field| field.name == name)
    }

    /// A record is zero when all of its fields are zero, ignored ones included.
    pub fn is_zero(&self) -> bool {
        self.fields.iter().all(|field| field.value.is_zero())
    }
}

/// Shape-classified view of an input value.
#[derive(Debug, Clone, PartialEq)]
pub enum HashValue {
    /// Untyped absent value.
    Nil,
    /// Scalar leaf.
    Primitive(Primitive),
    /// Nullable reference; `None` is a nil pointer.
    Pointer(Option<Box<HashValue>>),
    /// Struct-like aggregate.
    Record(Record),
    /// Ordered, growable collection.
    Sequence(Vec<HashValue>),
    /// Ordered collection of fixed length (arrays, tuples).
    Array(Vec<HashValue>),
    /// Key/value pairs; order carries no meaning.
    Mapping(Vec<(HashValue, HashValue)>),
}

impl HashValue {
    /// Wraps a value behind a non-nil pointer.
    pub fn pointer(value: impl Into<HashValue>) -> Self {
        HashValue::Pointer(Some(Box::new(value.into())))
    }

    /// Nil pointer.
    pub fn null_pointer() -> Self {
        HashValue::Pointer(None)
    }

    /// Follows pointers until a non-pointer value or a nil pointer is reached.
    pub fn resolve(&self) -> &HashValue {
        let mut current = self;
        while let HashValue::Pointer(Some(inner)) = current {
            current = inner;
        }
        current
    }

    /// Returns true when the value is the zero value of its shape.
    ///
    /// `Nil` counts as zero so that nil fields are skipped inside records. A
    /// sequence is zero only when empty, an array when every element is zero.
    pub fn is_zero(&self) -> bool {
        match self {
            HashValue::Nil | HashValue::Pointer(None) => true,
            HashValue::Pointer(Some(inner)) => inner.is_zero(),
            HashValue::Primitive(primitive) => primitive.is_zero(),
            HashValue::Record(record) => record.is_zero(),
            HashValue::Sequence(items) => items.is_empty(),
            HashValue::Array(items) => items.iter().all(HashValue::is_zero),
            HashValue::Mapping(entries) => entries.is_empty(),
        }
    }

    /// Short shape label used in log output.
    pub fn shape(&self) -> &'static str {
        match self {
            HashValue::Nil => "nil",
            HashValue::Primitive(_) => "primitive",
            HashValue::Pointer(_) => "pointer",
            HashValue::Record(_) => "record",
            HashValue::Sequence(_) => "sequence",
            HashValue::Array(_) => "array",
            HashValue::Mapping(_) => "mapping",
        }
    }
}

impl From<Primitive> for HashValue {
    fn from(value: Primitive) -> Self {
        HashValue::Primitive(value)
    }
}

impl From<Record> for HashValue {
    fn from(value: Record) -> Self {
        HashValue::Record(value)
    }
}

impl From<&str> for HashValue {
    fn from(value: &str) -> Self {
        HashValue::Primitive(Primitive::Str(value.to_string()))
    }
}

impl From<String> for HashValue {
    fn from(value: String) -> Self {
        HashValue::Primitive(Primitive::Str(value))
    }
}

impl From<bool> for HashValue {
    fn from(value: bool) -> Self {
        HashValue::Primitive(Primitive::Bool(value))
    }
}

impl From<i64> for HashValue {
    fn from(value: i64) -> Self {
        HashValue::Primitive(Primitive::I64(value))
    }
}

impl From<u64> for HashValue {
    fn from(value: u64) -> Self {
        HashValue::Primitive(Primitive::U64(value))
    }
}

impl From<f64> for HashValue {
    fn from(value: f64) -> Self {
        HashValue::Primitive(Primitive::F64(value))
    }
}

impl<T: Into<HashValue>> From<Option<T>> for HashValue {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(inner) => HashValue::pointer(inner),
            None => HashValue::Pointer(None),
        }
    }
}

impl<T: Into<HashValue>> From<Vec<T>> for HashValue {
    fn from(value: Vec<T>) -> Self {
        HashValue::Sequence(value.into_iter().map(Into::into).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn primitive_text_matches_display() {
        assert_eq!(Primitive::Str("test".into()).to_string(), "test");
        assert_eq!(Primitive::I64(-3).to_string(), "-3");
        assert_eq!(Primitive::Bool(true).to_string(), "true");
        assert_eq!(Primitive::F64(1.5).to_string(), "1.5");
        assert_eq!(Primitive::Char('x').to_string(), "x");
    }

    #[test]
    fn negative_zero_float_is_not_zero() {
        assert!(Primitive::F64(0.0).is_zero());
        assert!(!Primitive::F64(-0.0).is_zero());
        assert!(!Primitive::F32(-0.0).is_zero());
    }

    #[test]
    fn record_zero_counts_ignored_fields() {
        let cleared = Record::new("Spec").field("name", "").ignored_field("note", "");
        assert!(cleared.is_zero());

        let noted = Record::new("Spec").field("name", "").ignored_field("note", "x");
        assert!(!noted.is_zero());
    }

    #[test]
    fn pointer_zero_follows_target() {
        assert!(HashValue::null_pointer().is_zero());
        assert!(HashValue::pointer(0i64).is_zero());
        assert!(!HashValue::pointer(HashValue::pointer("a")).is_zero());
        assert_eq!(HashValue::pointer(HashValue::pointer("a")).resolve(), &HashValue::from("a"));
    }

    #[test]
    fn empty_collections_are_zero() {
        assert!(HashValue::Sequence(Vec::new()).is_zero());
        assert!(HashValue::Mapping(Vec::new()).is_zero());
        assert!(!HashValue::from(vec![""]).is_zero());
        assert!(HashValue::Nil.is_zero());
    }

    #[test]
    fn arrays_are_zero_when_every_element_is() {
        assert!(HashValue::Array(vec![0u64.into(), "".into()]).is_zero());
        assert!(!HashValue::Array(vec![0u64.into(), 1u64.into()]).is_zero());
        assert!(!HashValue::Sequence(vec![0u64.into()]).is_zero());
    }

    #[test]
    fn large_floats_print_without_exponent() {
        assert_eq!(Primitive::F64(1e21).to_string(), "1000000000000000000000");
        assert_eq!(Primitive::F64(1e6).to_string(), "1000000");
        assert_eq!(Primitive::F32(1.5).to_string(), "1.5");
        assert_eq!(Primitive::F64(-0.0).to_string(), "-0");
    }

    #[test]
    fn record_lookup_by_name() {
        let record = Record::new("Spec").field("replicas", 3i64);
        assert_eq!(record.get("replicas").map(|f| &f.value), Some(&HashValue::from(3i64)));
        assert!(record.get("missing").is_none());
    }
}
