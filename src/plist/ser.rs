//! Serde support for native values.
//!
//! [`to_value`] runs any `Serialize` type through [`ValueSerializer`] to get a
//! [`Value`]; [`Value`] and [`Date`] in turn implement `Serialize`, so a
//! native tree can be handed to any other serde format.
//!
//! Shapes a property list cannot hold are rejected with `Error::Value`: unit
//! values, `None`, map keys that are not strings, and `u128` values above
//! `i128::MAX`. Enum variants follow the externally tagged layout
//! (`{"Variant": payload}`), unit variants become their name.
//!
//! `Vec<u8>` serializes as a sequence; wrap it with a bytes-aware adapter to
//! get a `<data>` payload.

use serde::ser::{self, Serialize, SerializeMap as _, SerializeSeq as _};

use super::{Dictionary, Value};
use crate::common::{Date, Error, Result};

/// Newtype name that marks a [`Date`] passing through a serializer.
///
/// Other formats see a plain newtype around the ISO-8601 string.
pub(crate) const DATE_TOKEN: &str = "$plistkit::Date";

impl ser::Error for Error {
    fn custom<T: std::fmt::Display>(msg: T) -> Self {
        Error::Value(msg.to_string())
    }
}

/// Convert any serializable value into a native [`Value`].
///
/// # Examples
///
/// ```
/// use plistkit::plist::{Value, to_value};
/// use serde::Serialize;
///
/// #[derive(Serialize)]
/// struct Entry {
///     name: &'static str,
///     size: u32,
///     tags: Vec<&'static str>,
/// }
///
/// let value = to_value(&Entry { name: "a", size: 3, tags: vec!["x"] }).unwrap();
/// let dict = value.as_dict().unwrap();
/// assert_eq!(dict["name"], Value::from("a"));
/// assert_eq!(dict["size"], Value::Integer(3));
/// assert_eq!(dict["tags"], Value::Array(vec![Value::from("x")]));
///
/// assert!(to_value(&()).is_err());
/// ```
pub fn to_value<T>(value: &T) -> Result<Value>
where
    T: Serialize + ?Sized,
{
    value.serialize(ValueSerializer)
}

impl Serialize for Value {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: ser::Serializer,
    {
        match self {
            Value::Dict(map) => {
                let mut state = serializer.serialize_map(Some(map.len()))?;
                for (key, value) in map {
                    state.serialize_entry(key, value)?;
                }
                state.end()
            },
            Value::Array(items) => {
                let mut state = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    state.serialize_element(item)?;
                }
                state.end()
            },
            Value::String(s) => serializer.serialize_str(s),
            Value::Integer(i) => {
                if let Ok(small) = i64::try_from(*i) {
                    serializer.serialize_i64(small)
                } else if let Ok(unsigned) = u64::try_from(*i) {
                    serializer.serialize_u64(unsigned)
                } else {
                    serializer.serialize_i128(*i)
                }
            },
            Value::Real(f) => serializer.serialize_f64(*f),
            Value::Boolean(b) => serializer.serialize_bool(*b),
            Value::Date(date) => date.serialize(serializer),
            Value::Data(bytes) => serializer.serialize_bytes(bytes),
        }
    }
}

impl Serialize for Date {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: ser::Serializer,
    {
        serializer.serialize_newtype_struct(DATE_TOKEN, &self.to_iso_string())
    }
}

/// Serializer whose output is a [`Value`].
#[derive(Debug, Clone, Copy, Default)]
pub struct ValueSerializer;

fn unsupported(what: &str) -> Error {
    Error::Value(format!("unsupported native type: {}", what))
}

fn tagged(variant: &str, value: Value) -> Value {
    let mut map = Dictionary::with_capacity(1);
    map.insert(variant.to_string(), value);
    Value::Dict(map)
}

impl ser::Serializer for ValueSerializer {
    type Ok = Value;
    type Error = Error;

    type SerializeSeq = SerializeArray;
    type SerializeTuple = SerializeArray;
    type SerializeTupleStruct = SerializeArray;
    type SerializeTupleVariant = SerializeTupleVariant;
    type SerializeMap = SerializeDict;
    type SerializeStruct = SerializeDict;
    type SerializeStructVariant = SerializeStructVariant;

    fn serialize_bool(self, v: bool) -> Result<Value> {
        Ok(Value::Boolean(v))
    }

    fn serialize_i8(self, v: i8) -> Result<Value> {
        Ok(Value::Integer(v.into()))
    }

    fn serialize_i16(self, v: i16) -> Result<Value> {
        Ok(Value::Integer(v.into()))
    }

    fn serialize_i32(self, v: i32) -> Result<Value> {
        Ok(Value::Integer(v.into()))
    }

    fn serialize_i64(self, v: i64) -> Result<Value> {
        Ok(Value::Integer(v.into()))
    }

    fn serialize_i128(self, v: i128) -> Result<Value> {
        Ok(Value::Integer(v))
    }

    fn serialize_u8(self, v: u8) -> Result<Value> {
        Ok(Value::Integer(v.into()))
    }

    fn serialize_u16(self, v: u16) -> Result<Value> {
        Ok(Value::Integer(v.into()))
    }

    fn serialize_u32(self, v: u32) -> Result<Value> {
        Ok(Value::Integer(v.into()))
    }

    fn serialize_u64(self, v: u64) -> Result<Value> {
        Ok(Value::Integer(v.into()))
    }

    fn serialize_u128(self, v: u128) -> Result<Value> {
        i128::try_from(v)
            .map(Value::Integer)
            .map_err(|_| Error::Value(format!("integer {} does not fit in 128 bits", v)))
    }

    fn serialize_f32(self, v: f32) -> Result<Value> {
        Ok(Value::Real(v.into()))
    }

    fn serialize_f64(self, v: f64) -> Result<Value> {
        Ok(Value::Real(v))
    }

    fn serialize_char(self, v: char) -> Result<Value> {
        Ok(Value::String(v.to_string()))
    }

    fn serialize_str(self, v: &str) -> Result<Value> {
        Ok(Value::String(v.to_string()))
    }

    fn serialize_bytes(self, v: &[u8]) -> Result<Value> {
        Ok(Value::Data(v.to_vec()))
    }

    fn serialize_none(self) -> Result<Value> {
        Err(unsupported("None"))
    }

    fn serialize_some<T>(self, value: &T) -> Result<Value>
    where
        T: Serialize + ?Sized,
    {
        value.serialize(self)
    }

    fn serialize_unit(self) -> Result<Value> {
        Err(unsupported("()"))
    }

    fn serialize_unit_struct(self, name: &'static str) -> Result<Value> {
        Err(unsupported(name))
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
    ) -> Result<Value> {
        Ok(Value::String(variant.to_string()))
    }

    fn serialize_newtype_struct<T>(self, name: &'static str, value: &T) -> Result<Value>
    where
        T: Serialize + ?Sized,
    {
        let inner = value.serialize(self)?;
        if name != DATE_TOKEN {
            return Ok(inner);
        }
        match inner {
            Value::String(text) => Ok(Value::Date(Date::parse(&text)?)),
            other => Err(Error::Value(format!(
                "date must serialize as a string, got {}",
                other.type_name()
            ))),
        }
    }

    fn serialize_newtype_variant<T>(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        value: &T,
    ) -> Result<Value>
    where
        T: Serialize + ?Sized,
    {
        Ok(tagged(variant, value.serialize(self)?))
    }

    fn serialize_seq(self, len: Option<usize>) -> Result<SerializeArray> {
        Ok(SerializeArray {
            items: Vec::with_capacity(len.unwrap_or(0)),
        })
    }

    fn serialize_tuple(self, len: usize) -> Result<SerializeArray> {
        self.serialize_seq(Some(len))
    }

    fn serialize_tuple_struct(self, _name: &'static str, len: usize) -> Result<SerializeArray> {
        self.serialize_seq(Some(len))
    }

    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        len: usize,
    ) -> Result<SerializeTupleVariant> {
        Ok(SerializeTupleVariant {
            variant,
            items: Vec::with_capacity(len),
        })
    }

    fn serialize_map(self, len: Option<usize>) -> Result<SerializeDict> {
        Ok(SerializeDict {
            map: Dictionary::with_capacity(len.unwrap_or(0)),
            next_key: None,
        })
    }

    fn serialize_struct(self, _name: &'static str, len: usize) -> Result<SerializeDict> {
        self.serialize_map(Some(len))
    }

    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        len: usize,
    ) -> Result<SerializeStructVariant> {
        Ok(SerializeStructVariant {
            variant,
            map: Dictionary::with_capacity(len),
        })
    }
}

#[doc(hidden)]
pub struct SerializeArray {
    items: Vec<Value>,
}

impl ser::SerializeSeq for SerializeArray {
    type Ok = Value;
    type Error = Error;

    fn serialize_element<T>(&mut self, value: &T) -> Result<()>
    where
        T: Serialize + ?Sized,
    {
        self.items.push(value.serialize(ValueSerializer)?);
        Ok(())
    }

    fn end(self) -> Result<Value> {
        Ok(Value::Array(self.items))
    }
}

impl ser::SerializeTuple for SerializeArray {
    type Ok = Value;
    type Error = Error;

    fn serialize_element<T>(&mut self, value: &T) -> Result<()>
    where
        T: Serialize + ?Sized,
    {
        ser::SerializeSeq::serialize_element(self, value)
    }

    fn end(self) -> Result<Value> {
        ser::SerializeSeq::end(self)
    }
}

impl ser::SerializeTupleStruct for SerializeArray {
    type Ok = Value;
    type Error = Error;

    fn serialize_field<T>(&mut self, value: &T) -> Result<()>
    where
        T: Serialize + ?Sized,
    {
        ser::SerializeSeq::serialize_element(self, value)
    }

    fn end(self) -> Result<Value> {
        ser::SerializeSeq::end(self)
    }
}

#[doc(hidden)]
pub struct SerializeTupleVariant {
    variant: &'static str,
    items: Vec<Value>,
}

impl ser::SerializeTupleVariant for SerializeTupleVariant {
    type Ok = Value;
    type Error = Error;

    fn serialize_field<T>(&mut self, value: &T) -> Result<()>
    where
        T: Serialize + ?Sized,
    {
        self.items.push(value.serialize(ValueSerializer)?);
        Ok(())
    }

    fn end(self) -> Result<Value> {
        Ok(tagged(self.variant, Value::Array(self.items)))
    }
}

#[doc(hidden)]
pub struct SerializeDict {
    map: Dictionary,
    next_key: Option<String>,
}

impl ser::SerializeMap for SerializeDict {
    type Ok = Value;
    type Error = Error;

    fn serialize_key<T>(&mut self, key: &T) -> Result<()>
    where
        T: Serialize + ?Sized,
    {
        match key.serialize(ValueSerializer)? {
            Value::String(key) => {
                self.next_key = Some(key);
                Ok(())
            },
            other => Err(unsupported(&format!("{} dictionary key", other.type_name()))),
        }
    }

    fn serialize_value<T>(&mut self, value: &T) -> Result<()>
    where
        T: Serialize + ?Sized,
    {
        let key = self
            .next_key
            .take()
            .ok_or_else(|| Error::Value("map value serialized before its key".to_string()))?;
        self.map.insert(key, value.serialize(ValueSerializer)?);
        Ok(())
    }

    fn end(self) -> Result<Value> {
        Ok(Value::Dict(self.map))
    }
}

impl ser::SerializeStruct for SerializeDict {
    type Ok = Value;
    type Error = Error;

    fn serialize_field<T>(&mut self, key: &'static str, value: &T) -> Result<()>
    where
        T: Serialize + ?Sized,
    {
        self.map
            .insert(key.to_string(), value.serialize(ValueSerializer)?);
        Ok(())
    }

    fn end(self) -> Result<Value> {
        Ok(Value::Dict(self.map))
    }
}

#[doc(hidden)]
pub struct SerializeStructVariant {
    variant: &'static str,
    map: Dictionary,
}

impl ser::SerializeStructVariant for SerializeStructVariant {
    type Ok = Value;
    type Error = Error;

    fn serialize_field<T>(&mut self, key: &'static str, value: &T) -> Result<()>
    where
        T: Serialize + ?Sized,
    {
        self.map
            .insert(key.to_string(), value.serialize(ValueSerializer)?);
        Ok(())
    }

    fn end(self) -> Result<Value> {
        Ok(tagged(self.variant, Value::Dict(self.map)))
    }
}
