//! Serde bridge building a [`HashValue`] from any `Serialize` type.
//!
//! Serde stands in for runtime reflection: the derived `Serialize`
//! implementation reports the value's shape (struct, sequence, map, scalar)
//! and the field names in declaration order. Fields dropped through
//! `skip_serializing_if` are kept as ignored record fields; fields marked
//! `#[serde(skip)]` never reach the serializer at all.

use drift_core::{HashError, HashValue, Primitive, Record};
use serde::ser::{self, Serialize};

use crate::opts::HashOpts;

/// Converts `value` into its hashable view.
pub fn to_hash_value<T>(value: &T, opts: &HashOpts) -> Result<HashValue, HashError>
where
    T: Serialize + ?Sized,
{
    value.serialize(ValueSerializer {
        depth: 0,
        limit: opts.max_depth,
    })
}

/// Data-carrying variants become a one-entry map from variant name to payload.
fn tagged_variant(variant: &'static str, payload: HashValue) -> HashValue {
    HashValue::Mapping(vec![(HashValue::from(variant), payload)])
}

#[derive(Clone, Copy)]
struct ValueSerializer {
    depth: usize,
    limit: Option<usize>,
}

impl ValueSerializer {
    fn nested(self) -> Result<Self, HashError> {
        let depth = self.depth + 1;
        if let Some(limit) = self.limit {
            if depth > limit {
                return Err(HashError::depth(limit));
            }
        }
        Ok(Self {
            depth,
            limit: self.limit,
        })
    }

    fn leaf(primitive: Primitive) -> Result<HashValue, HashError> {
        Ok(HashValue::Primitive(primitive))
    }
}

impl ser::Serializer for ValueSerializer {
    type Ok = HashValue;
    type Error = HashError;

    type SerializeSeq = SeqBuilder;
    type SerializeTuple = SeqBuilder;
    type SerializeTupleStruct = SeqBuilder;
    type SerializeTupleVariant = SeqBuilder;
    type SerializeMap = MapBuilder;
    type SerializeStruct = RecordBuilder;
    type SerializeStructVariant = RecordBuilder;

    fn serialize_bool(self, v: bool) -> Result<HashValue, HashError> {
        Self::leaf(Primitive::Bool(v))
    }

    fn serialize_i8(self, v: i8) -> Result<HashValue, HashError> {
        Self::leaf(Primitive::I64(v.into()))
    }

    fn serialize_i16(self, v: i16) -> Result<HashValue, HashError> {
        Self::leaf(Primitive::I64(v.into()))
    }

    fn serialize_i32(self, v: i32) -> Result<HashValue, HashError> {
        Self::leaf(Primitive::I64(v.into()))
    }

    fn serialize_i64(self, v: i64) -> Result<HashValue, HashError> {
        Self::leaf(Primitive::I64(v))
    }

    fn serialize_i128(self, v: i128) -> Result<HashValue, HashError> {
        Self::leaf(Primitive::I128(v))
    }

    fn serialize_u8(self, v: u8) -> Result<HashValue, HashError> {
        Self::leaf(Primitive::U64(v.into()))
    }

    fn serialize_u16(self, v: u16) -> Result<HashValue, HashError> {
        Self::leaf(Primitive::U64(v.into()))
    }

    fn serialize_u32(self, v: u32) -> Result<HashValue, HashError> {
        Self::leaf(Primitive::U64(v.into()))
    }

    fn serialize_u64(self, v: u64) -> Result<HashValue, HashError> {
        Self::leaf(Primitive::U64(v))
    }

    fn serialize_u128(self, v: u128) -> Result<HashValue, HashError> {
        Self::leaf(Primitive::U128(v))
    }

    fn serialize_f32(self, v: f32) -> Result<HashValue, HashError> {
        Self::leaf(Primitive::F32(v))
    }

    fn serialize_f64(self, v: f64) -> Result<HashValue, HashError> {
        Self::leaf(Primitive::F64(v))
    }

    fn serialize_char(self, v: char) -> Result<HashValue, HashError> {
        Self::leaf(Primitive::Char(v))
    }

    fn serialize_str(self, v: &str) -> Result<HashValue, HashError> {
        Self::leaf(Primitive::Str(v.to_string()))
    }

    fn serialize_bytes(self, v: &[u8]) -> Result<HashValue, HashError> {
        let items = v
            .iter()
            .map(|byte| HashValue::Primitive(Primitive::U64((*byte).into())))
            .collect();
        Ok(HashValue::Sequence(items))
    }

    fn serialize_none(self) -> Result<HashValue, HashError> {
        Ok(HashValue::Pointer(None))
    }

    fn serialize_some<T>(self, value: &T) -> Result<HashValue, HashError>
    where
        T: Serialize + ?Sized,
    {
        let inner = value.serialize(self.nested()?)?;
        Ok(HashValue::Pointer(Some(Box::new(inner))))
    }

    fn serialize_unit(self) -> Result<HashValue, HashError> {
        Ok(HashValue::Nil)
    }

    fn serialize_unit_struct(self, name: &'static str) -> Result<HashValue, HashError> {
        Ok(HashValue::Record(Record::new(name)))
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
    ) -> Result<HashValue, HashError> {
        Self::leaf(Primitive::Str(variant.to_string()))
    }

    fn serialize_newtype_struct<T>(self, _name: &'static str, value: &T) -> Result<HashValue, HashError>
    where
        T: Serialize + ?Sized,
    {
        value.serialize(self.nested()?)
    }

    fn serialize_newtype_variant<T>(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        value: &T,
    ) -> Result<HashValue, HashError>
    where
        T: Serialize + ?Sized,
    {
        let payload = value.serialize(self.nested()?)?;
        Ok(tagged_variant(variant, payload))
    }

    fn serialize_seq(self, len: Option<usize>) -> Result<SeqBuilder, HashError> {
        SeqBuilder::new(self, len.unwrap_or(0), false, None)
    }

    fn serialize_tuple(self, len: usize) -> Result<SeqBuilder, HashError> {
        SeqBuilder::new(self, len, true, None)
    }

    fn serialize_tuple_struct(self, _name: &'static str, len: usize) -> Result<SeqBuilder, HashError> {
        SeqBuilder::new(self, len, true, None)
    }

    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        len: usize,
    ) -> Result<SeqBuilder, HashError> {
        SeqBuilder::new(self, len, true, Some(variant))
    }

    fn serialize_map(self, len: Option<usize>) -> Result<MapBuilder, HashError> {
        Ok(MapBuilder {
            child: self.nested()?,
            entries: Vec::with_capacity(len.unwrap_or(0)),
            pending_key: None,
        })
    }

    fn serialize_struct(self, name: &'static str, _len: usize) -> Result<RecordBuilder, HashError> {
        Ok(RecordBuilder {
            child: self.nested()?,
            record: Record::new(name),
            variant: None,
        })
    }

    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        _len: usize,
    ) -> Result<RecordBuilder, HashError> {
        Ok(RecordBuilder {
            child: self.nested()?,
            record: Record::new(variant),
            variant: Some(variant),
        })
    }
}

/// Collects sequence, tuple and tuple-variant elements.
///
/// Tuples and fixed-size arrays become [`HashValue::Array`]; everything else
/// becomes a growable [`HashValue::Sequence`].
pub struct SeqBuilder {
    child: ValueSerializer,
    items: Vec<HashValue>,
    fixed: bool,
    variant: Option<&'static str>,
}

impl SeqBuilder {
    fn new(
        parent: ValueSerializer,
        len: usize,
        fixed: bool,
        variant: Option<&'static str>,
    ) -> Result<Self, HashError> {
        Ok(Self {
            child: parent.nested()?,
            items: Vec::with_capacity(len),
            fixed,
            variant,
        })
    }

    fn push<T>(&mut self, value: &T) -> Result<(), HashError>
    where
        T: Serialize + ?Sized,
    {
        self.items.push(value.serialize(self.child)?);
        Ok(())
    }

    fn finish(self) -> Result<HashValue, HashError> {
        let sequence = if self.fixed {
            HashValue::Array(self.items)
        } else {
            HashValue::Sequence(self.items)
        };
        Ok(match self.variant {
            Some(variant) => tagged_variant(variant, sequence),
            None => sequence,
        })
    }
}

impl ser::SerializeSeq for SeqBuilder {
    type Ok = HashValue;
    type Error = HashError;

    fn serialize_element<T>(&mut self, value: &T) -> Result<(), HashError>
    where
        T: Serialize + ?Sized,
    {
        self.push(value)
    }

    fn end(self) -> Result<HashValue, HashError> {
        self.finish()
    }
}

impl ser::SerializeTuple for SeqBuilder {
    type Ok = HashValue;
    type Error = HashError;

    fn serialize_element<T>(&mut self, value: &T) -> Result<(), HashError>
    where
        T: Serialize + ?Sized,
    {
        self.push(value)
    }

    fn end(self) -> Result<HashValue, HashError> {
        self.finish()
    }
}

impl ser::SerializeTupleStruct for SeqBuilder {
    type Ok = HashValue;
    type Error = HashError;

    fn serialize_field<T>(&mut self, value: &T) -> Result<(), HashError>
    where
        T: Serialize + ?Sized,
    {
        self.push(value)
    }

    fn end(self) -> Result<HashValue, HashError> {
        self.finish()
    }
}

impl ser::SerializeTupleVariant for SeqBuilder {
    type Ok = HashValue;
    type Error = HashError;

    fn serialize_field<T>(&mut self, value: &T) -> Result<(), HashError>
    where
        T: Serialize + ?Sized,
    {
        self.push(value)
    }

    fn end(self) -> Result<HashValue, HashError> {
        self.finish()
    }
}

/// Collects map entries in the order the map yields them.
pub struct MapBuilder {
    child: ValueSerializer,
    entries: Vec<(HashValue, HashValue)>,
    pending_key: Option<HashValue>,
}

impl ser::SerializeMap for MapBuilder {
    type Ok = HashValue;
    type Error = HashError;

    fn serialize_key<T>(&mut self, key: &T) -> Result<(), HashError>
    where
        T: Serialize + ?Sized,
    {
        self.pending_key = Some(key.serialize(self.child)?);
        Ok(())
    }

    fn serialize_value<T>(&mut self, value: &T) -> Result<(), HashError>
    where
        T: Serialize + ?Sized,
    {
        let key = self
            .pending_key
            .take()
            .ok_or_else(|| <HashError as ser::Error>::custom("map value serialized before its key"))?;
        let value = value.serialize(self.child)?;
        self.entries.push((key, value));
        Ok(())
    }

    fn end(self) -> Result<HashValue, HashError> {
        Ok(HashValue::Mapping(self.entries))
    }
}

/// Collects struct and struct-variant fields in declaration order.
pub struct RecordBuilder {
    child: ValueSerializer,
    record: Record,
    variant: Option<&'static str>,
}

impl RecordBuilder {
    fn push<T>(&mut self, key: &'static str, value: &T) -> Result<(), HashError>
    where
        T: Serialize + ?Sized,
    {
        let value = value.serialize(self.child)?;
        self.record.push(key, value, false);
        Ok(())
    }

    fn finish(self) -> Result<HashValue, HashError> {
        let record = HashValue::Record(self.record);
        Ok(match self.variant {
            Some(variant) => tagged_variant(variant, record),
            None => record,
        })
    }
}

impl ser::SerializeStruct for RecordBuilder {
    type Ok = HashValue;
    type Error = HashError;

    fn serialize_field<T>(&mut self, key: &'static str, value: &T) -> Result<(), HashError>
    where
        T: Serialize + ?Sized,
    {
        self.push(key, value)
    }

    fn skip_field(&mut self, key: &'static str) -> Result<(), HashError> {
        self.record.push(key, HashValue::Nil, true);
        Ok(())
    }

    fn end(self) -> Result<HashValue, HashError> {
        self.finish()
    }
}

impl ser::SerializeStructVariant for RecordBuilder {
    type Ok = HashValue;
    type Error = HashError;

    fn serialize_field<T>(&mut self, key: &'static str, value: &T) -> Result<(), HashError>
    where
        T: Serialize + ?Sized,
    {
        self.push(key, value)
    }

    fn skip_field(&mut self, key: &'static str) -> Result<(), HashError> {
        self.record.push(key, HashValue::Nil, true);
        Ok(())
    }

    fn end(self) -> Result<HashValue, HashError> {
        self.finish()
    }
}
