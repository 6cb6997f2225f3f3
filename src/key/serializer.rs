//! Key Serializer Module
//!
//! A `serde::Serializer` that lowers any `Serialize` value into a
//! [`KeyPart`] tree.

use std::fmt;

use serde::ser::{self, Serialize};
use thiserror::Error;

use super::KeyPart;

// == Key Error ==
/// Raised when a value's `Serialize` impl refuses to produce a key.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{0}")]
pub struct KeyError(String);

impl ser::Error for KeyError {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        KeyError(msg.to_string())
    }
}

/// Lowers `value` into a [`KeyPart`].
pub fn to_key_part<T>(value: &T) -> Result<KeyPart, KeyError>
where
    T: ?Sized + Serialize,
{
    value.serialize(KeySerializer)
}

// == Key Serializer ==
/// Serializer producing [`KeyPart`] values.
#[derive(Debug, Clone, Copy, Default)]
pub struct KeySerializer;

impl ser::Serializer for KeySerializer {
    type Ok = KeyPart;
    type Error = KeyError;

    type SerializeSeq = SeqBuilder;
    type SerializeTuple = SeqBuilder;
    type SerializeTupleStruct = SeqBuilder;
    type SerializeTupleVariant = TupleVariantBuilder;
    type SerializeMap = MapBuilder;
    type SerializeStruct = StructBuilder;
    type SerializeStructVariant = StructVariantBuilder;

    fn serialize_bool(self, v: bool) -> Result<KeyPart, KeyError> {
        Ok(KeyPart::Bool(v))
    }

    fn serialize_i8(self, v: i8) -> Result<KeyPart, KeyError> {
        Ok(KeyPart::Int(i128::from(v)))
    }

    fn serialize_i16(self, v: i16) -> Result<KeyPart, KeyError> {
        Ok(KeyPart::Int(i128::from(v)))
    }

    fn serialize_i32(self, v: i32) -> Result<KeyPart, KeyError> {
        Ok(KeyPart::Int(i128::from(v)))
    }

    fn serialize_i64(self, v: i64) -> Result<KeyPart, KeyError> {
        Ok(KeyPart::Int(i128::from(v)))
    }

    fn serialize_i128(self, v: i128) -> Result<KeyPart, KeyError> {
        Ok(KeyPart::Int(v))
    }

    fn serialize_u8(self, v: u8) -> Result<KeyPart, KeyError> {
        Ok(KeyPart::Int(i128::from(v)))
    }

    fn serialize_u16(self, v: u16) -> Result<KeyPart, KeyError> {
        Ok(KeyPart::Int(i128::from(v)))
    }

    fn serialize_u32(self, v: u32) -> Result<KeyPart, KeyError> {
        Ok(KeyPart::Int(i128::from(v)))
    }

    fn serialize_u64(self, v: u64) -> Result<KeyPart, KeyError> {
        Ok(KeyPart::Int(i128::from(v)))
    }

    fn serialize_u128(self, v: u128) -> Result<KeyPart, KeyError> {
        Ok(match i128::try_from(v) {
            Ok(small) => KeyPart::Int(small),
            Err(_) => KeyPart::BigUint(v),
        })
    }

    fn serialize_f32(self, v: f32) -> Result<KeyPart, KeyError> {
        Ok(KeyPart::float(f64::from(v)))
    }

    fn serialize_f64(self, v: f64) -> Result<KeyPart, KeyError> {
        Ok(KeyPart::float(v))
    }

    fn serialize_char(self, v: char) -> Result<KeyPart, KeyError> {
        Ok(KeyPart::Char(v))
    }

    fn serialize_str(self, v: &str) -> Result<KeyPart, KeyError> {
        Ok(KeyPart::Str(v.to_owned()))
    }

    fn serialize_bytes(self, v: &[u8]) -> Result<KeyPart, KeyError> {
        Ok(KeyPart::Bytes(v.to_vec()))
    }

    fn serialize_none(self) -> Result<KeyPart, KeyError> {
        Ok(KeyPart::Option(None))
    }

    fn serialize_some<T>(self, value: &T) -> Result<KeyPart, KeyError>
    where
        T: ?Sized + Serialize,
    {
        Ok(KeyPart::Option(Some(Box::new(to_key_part(value)?))))
    }

    fn serialize_unit(self) -> Result<KeyPart, KeyError> {
        Ok(KeyPart::Unit)
    }

    fn serialize_unit_struct(self, name: &'static str) -> Result<KeyPart, KeyError> {
        Ok(KeyPart::Struct {
            name,
            fields: Vec::new(),
        })
    }

    fn serialize_unit_variant(
        self,
        name: &'static str,
        _variant_index: u32,
        variant: &'static str,
    ) -> Result<KeyPart, KeyError> {
        Ok(KeyPart::Variant {
            name,
            variant,
            value: Box::new(KeyPart::Unit),
        })
    }

    fn serialize_newtype_struct<T>(
        self,
        _name: &'static str,
        value: &T,
    ) -> Result<KeyPart, KeyError>
    where
        T: ?Sized + Serialize,
    {
        to_key_part(value)
    }

    fn serialize_newtype_variant<T>(
        self,
        name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        value: &T,
    ) -> Result<KeyPart, KeyError>
    where
        T: ?Sized + Serialize,
    {
        Ok(KeyPart::Variant {
            name,
            variant,
            value: Box::new(to_key_part(value)?),
        })
    }

    fn serialize_seq(self, len: Option<usize>) -> Result<SeqBuilder, KeyError> {
        Ok(SeqBuilder::new(len.unwrap_or(0), false))
    }

    fn serialize_tuple(self, len: usize) -> Result<SeqBuilder, KeyError> {
        Ok(SeqBuilder::new(len, true))
    }

    fn serialize_tuple_struct(
        self,
        _name: &'static str,
        len: usize,
    ) -> Result<SeqBuilder, KeyError> {
        Ok(SeqBuilder::new(len, true))
    }

    fn serialize_tuple_variant(
        self,
        name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        len: usize,
    ) -> Result<TupleVariantBuilder, KeyError> {
        Ok(TupleVariantBuilder {
            name,
            variant,
            items: Vec::with_capacity(len),
        })
    }

    fn serialize_map(self, len: Option<usize>) -> Result<MapBuilder, KeyError> {
        Ok(MapBuilder {
            entries: Vec::with_capacity(len.unwrap_or(0)),
            pending_key: None,
        })
    }

    fn serialize_struct(
        self,
        name: &'static str,
        len: usize,
    ) -> Result<StructBuilder, KeyError> {
        Ok(StructBuilder {
            name,
            fields: Vec::with_capacity(len),
        })
    }

    fn serialize_struct_variant(
        self,
        name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        len: usize,
    ) -> Result<StructVariantBuilder, KeyError> {
        Ok(StructVariantBuilder {
            name,
            variant,
            fields: Vec::with_capacity(len),
        })
    }
}

// == Compound Builders ==

/// Collects sequence, tuple and tuple-struct elements.
pub struct SeqBuilder {
    items: Vec<KeyPart>,
    tuple: bool,
}

impl SeqBuilder {
    fn new(len: usize, tuple: bool) -> Self {
        Self {
            items: Vec::with_capacity(len),
            tuple,
        }
    }

    fn push<T>(&mut self, value: &T) -> Result<(), KeyError>
    where
        T: ?Sized + Serialize,
    {
        self.items.push(to_key_part(value)?);
        Ok(())
    }

    fn finish(self) -> KeyPart {
        if self.tuple {
            KeyPart::Tuple(self.items)
        } else {
            KeyPart::Seq(self.items)
        }
    }
}

impl ser::SerializeSeq for SeqBuilder {
    type Ok = KeyPart;
    type Error = KeyError;

    fn serialize_element<T>(&mut self, value: &T) -> Result<(), KeyError>
    where
        T: ?Sized + Serialize,
    {
        self.push(value)
    }

    fn end(self) -> Result<KeyPart, KeyError> {
        Ok(self.finish())
    }
}

impl ser::SerializeTuple for SeqBuilder {
    type Ok = KeyPart;
    type Error = KeyError;

    fn serialize_element<T>(&mut self, value: &T) -> Result<(), KeyError>
    where
        T: ?Sized + Serialize,
    {
        self.push(value)
    }

    fn end(self) -> Result<KeyPart, KeyError> {
        Ok(self.finish())
    }
}

impl ser::SerializeTupleStruct for SeqBuilder {
    type Ok = KeyPart;
    type Error = KeyError;

    fn serialize_field<T>(&mut self, value: &T) -> Result<(), KeyError>
    where
        T: ?Sized + Serialize,
    {
        self.push(value)
    }

    fn end(self) -> Result<KeyPart, KeyError> {
        Ok(self.finish())
    }
}

/// Collects tuple-variant fields.
pub struct TupleVariantBuilder {
    name: &'static str,
    variant: &'static str,
    items: Vec<KeyPart>,
}

impl ser::SerializeTupleVariant for TupleVariantBuilder {
    type Ok = KeyPart;
    type Error = KeyError;

    fn serialize_field<T>(&mut self, value: &T) -> Result<(), KeyError>
    where
        T: ?Sized + Serialize,
    {
        self.items.push(to_key_part(value)?);
        Ok(())
    }

    fn end(self) -> Result<KeyPart, KeyError> {
        Ok(KeyPart::Variant {
            name: self.name,
            variant: self.variant,
            value: Box::new(KeyPart::Tuple(self.items)),
        })
    }
}

/// Collects map entries; the result is sorted so iteration order is irrelevant.
pub struct MapBuilder {
    entries: Vec<(KeyPart, KeyPart)>,
    pending_key: Option<KeyPart>,
}

impl ser::SerializeMap for MapBuilder {
    type Ok = KeyPart;
    type Error = KeyError;

    fn serialize_key<T>(&mut self, key: &T) -> Result<(), KeyError>
    where
        T: ?Sized + Serialize,
    {
        self.pending_key = Some(to_key_part(key)?);
        Ok(())
    }

    fn serialize_value<T>(&mut self, value: &T) -> Result<(), KeyError>
    where
        T: ?Sized + Serialize,
    {
        let key = self
            .pending_key
            .take()
            .ok_or_else(|| KeyError("map value serialized before its key".to_string()))?;
        self.entries.push((key, to_key_part(value)?));
        Ok(())
    }

    fn end(self) -> Result<KeyPart, KeyError> {
        Ok(KeyPart::map(self.entries))
    }
}

/// Collects named struct fields in declaration order.
pub struct StructBuilder {
    name: &'static str,
    fields: Vec<(&'static str, KeyPart)>,
}

impl ser::SerializeStruct for StructBuilder {
    type Ok = KeyPart;
    type Error = KeyError;

    fn serialize_field<T>(&mut self, key: &'static str, value: &T) -> Result<(), KeyError>
    where
        T: ?Sized + Serialize,
    {
        self.fields.push((key, to_key_part(value)?));
        Ok(())
    }

    fn end(self) -> Result<KeyPart, KeyError> {
        Ok(KeyPart::Struct {
            name: self.name,
            fields: self.fields,
        })
    }
}

/// Collects struct-variant fields.
pub struct StructVariantBuilder {
    name: &'static str,
    variant: &'static str,
    fields: Vec<(&'static str, KeyPart)>,
}

impl ser::SerializeStructVariant for StructVariantBuilder {
    type Ok = KeyPart;
    type Error = KeyError;

    fn serialize_field<T>(&mut self, key: &'static str, value: &T) -> Result<(), KeyError>
    where
        T: ?Sized + Serialize,
    {
        self.fields.push((key, to_key_part(value)?));
        Ok(())
    }

    fn end(self) -> Result<KeyPart, KeyError> {
        Ok(KeyPart::Variant {
            name: self.name,
            variant: self.variant,
            value: Box::new(KeyPart::Struct {
                name: self.variant,
                fields: self.fields,
            }),
        })
    }
}
