// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

//! A serde serializer producing [`QueryValue`] trees.

use reqapi_core::hash::base64_encode;
use serde::ser::{self, Serialize};
use std::fmt::Display;

/// A value in the Query encoding, before it's flattened into key pairs.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum QueryValue {
    /// A scalar, already in its wire form.
    String(String),
    /// A structure, fields kept in declaration order.
    Object(Vec<(String, QueryValue)>),
    /// An ordered list.
    Array(Vec<QueryValue>),
    /// A string keyed map.
    Map(Vec<(String, QueryValue)>),
}

/// Error raised while building a [`QueryValue`].
#[derive(Debug, thiserror::Error)]
#[error("{0}")]
pub struct SerializeError(String);

impl ser::Error for SerializeError {
    fn custom<T: Display>(msg: T) -> Self {
        SerializeError(msg.to_string())
    }
}

type Result<T> = std::result::Result<T, SerializeError>;

/// Serialize `value` into a [`QueryValue`].
///
/// Returns `None` when the value carries nothing to send, such as `None`
/// or `()`.
pub fn to_value<T: Serialize + ?Sized>(value: &T) -> Result<Option<QueryValue>> {
    value.serialize(ValueSerializer)
}

struct ValueSerializer;

impl ValueSerializer {
    fn scalar(v: impl ToString) -> Result<Option<QueryValue>> {
        Ok(Some(QueryValue::String(v.to_string())))
    }
}

impl ser::Serializer for ValueSerializer {
    type Ok = Option<QueryValue>;
    type Error = SerializeError;

    type SerializeSeq = SeqSerializer;
    type SerializeTuple = SeqSerializer;
    type SerializeTupleStruct = SeqSerializer;
    type SerializeTupleVariant = ser::Impossible<Self::Ok, Self::Error>;
    type SerializeMap = MapSerializer;
    type SerializeStruct = StructSerializer;
    type SerializeStructVariant = ser::Impossible<Self::Ok, Self::Error>;

    fn serialize_bool(self, v: bool) -> Result<Self::Ok> {
        Self::scalar(v)
    }

    fn serialize_i8(self, v: i8) -> Result<Self::Ok> {
        Self::scalar(v)
    }

    fn serialize_i16(self, v: i16) -> Result<Self::Ok> {
        Self::scalar(v)
    }

    fn serialize_i32(self, v: i32) -> Result<Self::Ok> {
        Self::scalar(v)
    }

    fn serialize_i64(self, v: i64) -> Result<Self::Ok> {
        Self::scalar(v)
    }

    fn serialize_u8(self, v: u8) -> Result<Self::Ok> {
        Self::scalar(v)
    }

    fn serialize_u16(self, v: u16) -> Result<Self::Ok> {
        Self::scalar(v)
    }

    fn serialize_u32(self, v: u32) -> Result<Self::Ok> {
        Self::scalar(v)
    }

    fn serialize_u64(self, v: u64) -> Result<Self::Ok> {
        Self::scalar(v)
    }

    fn serialize_f32(self, v: f32) -> Result<Self::Ok> {
        Self::scalar(v)
    }

    fn serialize_f64(self, v: f64) -> Result<Self::Ok> {
        Self::scalar(v)
    }

    fn serialize_char(self, v: char) -> Result<Self::Ok> {
        Self::scalar(v)
    }

    fn serialize_str(self, v: &str) -> Result<Self::Ok> {
        Self::scalar(v)
    }

    fn serialize_bytes(self, v: &[u8]) -> Result<Self::Ok> {
        Self::scalar(base64_encode(v))
    }

    fn serialize_none(self) -> Result<Self::Ok> {
        Ok(None)
    }

    fn serialize_some<T: Serialize + ?Sized>(self, value: &T) -> Result<Self::Ok> {
        value.serialize(self)
    }

    fn serialize_unit(self) -> Result<Self::Ok> {
        Ok(None)
    }

    fn serialize_unit_struct(self, _: &'static str) -> Result<Self::Ok> {
        Ok(None)
    }

    fn serialize_unit_variant(
        self,
        _: &'static str,
        _: u32,
        variant: &'static str,
    ) -> Result<Self::Ok> {
        Self::scalar(variant)
    }

    fn serialize_newtype_struct<T: Serialize + ?Sized>(
        self,
        _: &'static str,
        value: &T,
    ) -> Result<Self::Ok> {
        value.serialize(self)
    }

    fn serialize_newtype_variant<T: Serialize + ?Sized>(
        self,
        _: &'static str,
        _: u32,
        variant: &'static str,
        value: &T,
    ) -> Result<Self::Ok> {
        Ok(value
            .serialize(self)?
            .map(|v| QueryValue::Object(vec![(variant.to_string(), v)])))
    }

    fn serialize_seq(self, len: Option<usize>) -> Result<Self::SerializeSeq> {
        Ok(SeqSerializer {
            items: Vec::with_capacity(len.unwrap_or_default()),
        })
    }

    fn serialize_tuple(self, len: usize) -> Result<Self::SerializeTuple> {
        ser::Serializer::serialize_seq(self, Some(len))
    }

    fn serialize_tuple_struct(
        self,
        _: &'static str,
        len: usize,
    ) -> Result<Self::SerializeTupleStruct> {
        ser::Serializer::serialize_seq(self, Some(len))
    }

    fn serialize_tuple_variant(
        self,
        name: &'static str,
        _: u32,
        variant: &'static str,
        _: usize,
    ) -> Result<Self::SerializeTupleVariant> {
        Err(SerializeError(format!(
            "tuple variant {name}::{variant} is not supported in query encoding"
        )))
    }

    fn serialize_map(self, len: Option<usize>) -> Result<Self::SerializeMap> {
        Ok(MapSerializer {
            entries: Vec::with_capacity(len.unwrap_or_default()),
            key: None,
        })
    }

    fn serialize_struct(self, _: &'static str, len: usize) -> Result<Self::SerializeStruct> {
        Ok(StructSerializer {
            fields: Vec::with_capacity(len),
        })
    }

    fn serialize_struct_variant(
        self,
        name: &'static str,
        _: u32,
        variant: &'static str,
        _: usize,
    ) -> Result<Self::SerializeStructVariant> {
        Err(SerializeError(format!(
            "struct variant {name}::{variant} is not supported in query encoding"
        )))
    }
}

struct SeqSerializer {
    items: Vec<QueryValue>,
}

impl ser::SerializeSeq for SeqSerializer {
    type Ok = Option<QueryValue>;
    type Error = SerializeError;

    fn serialize_element<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<()> {
        if let Some(v) = value.serialize(ValueSerializer)? {
            self.items.push(v);
        }
        Ok(())
    }

    fn end(self) -> Result<Self::Ok> {
        Ok(Some(QueryValue::Array(self.items)))
    }
}

impl ser::SerializeTuple for SeqSerializer {
    type Ok = Option<QueryValue>;
    type Error = SerializeError;

    fn serialize_element<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<()> {
        ser::SerializeSeq::serialize_element(self, value)
    }

    fn end(self) -> Result<Self::Ok> {
        ser::SerializeSeq::end(self)
    }
}

impl ser::SerializeTupleStruct for SeqSerializer {
    type Ok = Option<QueryValue>;
    type Error = SerializeError;

    fn serialize_field<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<()> {
        ser::SerializeSeq::serialize_element(self, value)
    }

    fn end(self) -> Result<Self::Ok> {
        ser::SerializeSeq::end(self)
    }
}

struct MapSerializer {
    entries: Vec<(String, QueryValue)>,
    key: Option<String>,
}

impl ser::SerializeMap for MapSerializer {
    type Ok = Option<QueryValue>;
    type Error = SerializeError;

    fn serialize_key<T: Serialize + ?Sized>(&mut self, key: &T) -> Result<()> {
        match key.serialize(ValueSerializer)? {
            Some(QueryValue::String(k)) => {
                self.key = Some(k);
                Ok(())
            }
            _ => Err(SerializeError(
                "map keys must be strings in query encoding".to_string(),
            )),
        }
    }

    fn serialize_value<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<()> {
        let key = self
            .key
            .take()
            .ok_or_else(|| SerializeError("map value without a key".to_string()))?;
        if let Some(v) = value.serialize(ValueSerializer)? {
            self.entries.push((key, v));
        }
        Ok(())
    }

    fn end(self) -> Result<Self::Ok> {
        Ok(Some(QueryValue::Map(self.entries)))
    }
}

struct StructSerializer {
    fields: Vec<(String, QueryValue)>,
}

impl ser::SerializeStruct for StructSerializer {
    type Ok = Option<QueryValue>;
    type Error = SerializeError;

    fn serialize_field<T: Serialize + ?Sized>(
        &mut self,
        key: &'static str,
        value: &T,
    ) -> Result<()> {
        if let Some(v) = value.serialize(ValueSerializer)? {
            self.fields.push((key.to_string(), v));
        }
        Ok(())
    }

    fn end(self) -> Result<Self::Ok> {
        Ok(Some(QueryValue::Object(self.fields)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde::Serialize;
    use std::collections::BTreeMap;

    #[derive(Serialize)]
    #[serde(rename_all = "PascalCase")]
    struct Parameter {
        parameter_key: String,
        use_previous_value: Option<bool>,
    }

    #[derive(Serialize)]
    #[serde(rename_all = "PascalCase")]
    struct Input {
        stack_name: String,
        timeout_in_minutes: Option<i32>,
        parameters: Vec<Parameter>,
        tags: BTreeMap<String, String>,
    }

    fn s(v: &str) -> QueryValue {
        QueryValue::String(v.to_string())
    }

    #[test]
    fn test_to_value() {
        let input = Input {
            stack_name: "demo".to_string(),
            timeout_in_minutes: None,
            parameters: vec![Parameter {
                parameter_key: "Env".to_string(),
                use_previous_value: Some(true),
            }],
            tags: BTreeMap::from([("team".to_string(), "infra".to_string())]),
        };

        assert_eq!(
            to_value(&input).unwrap(),
            Some(QueryValue::Object(vec![
                ("StackName".to_string(), s("demo")),
                (
                    "Parameters".to_string(),
                    QueryValue::Array(vec![QueryValue::Object(vec![
                        ("ParameterKey".to_string(), s("Env")),
                        ("UsePreviousValue".to_string(), s("true")),
                    ])])
                ),
                (
                    "Tags".to_string(),
                    QueryValue::Map(vec![("team".to_string(), s("infra"))])
                ),
            ]))
        );
    }

    #[test]
    fn test_absent_values() {
        assert_eq!(to_value(&None::<String>).unwrap(), None);
        assert_eq!(to_value(&()).unwrap(), None);
        assert_eq!(
            to_value(&vec![Some(1), None, Some(3)]).unwrap(),
            Some(QueryValue::Array(vec![s("1"), s("3")]))
        );
    }

    #[test]
    fn test_bytes_are_base64() {
        assert_eq!(
            to_value(&Raw(b"hello")).unwrap(),
            Some(s("aGVsbG8="))
        );
    }

    struct Raw<'a>(&'a [u8]);

    impl Serialize for Raw<'_> {
        fn serialize<S: ser::Serializer>(&self, s: S) -> std::result::Result<S::Ok, S::Error> {
            s.serialize_bytes(self.0)
        }
    }
}
