//! Scalar values read from physical tiles.
//!
//! Tiles store Arrow arrays; [`Value`] is the owned, type-tagged copy of a single
//! cell that accessor calls hand back to operators. Null cells are
//! [`Value::Null`]. A row that was invalidated in a logical tile never produces a
//! `Value` at all; accessors return `None` for it instead.

use std::fmt;

use arrow::array::{Array, AsArray};
use arrow::datatypes::{
    DataType, Date32Type, Float32Type, Float64Type, Int8Type, Int16Type, Int32Type, Int64Type,
    UInt8Type, UInt16Type, UInt32Type, UInt64Type,
};
use lltile_result::{Error, Result};

/// A full physical row: one [`Value`] per column of the tile it came from.
pub type Row = Vec<Value>;

/// An owned scalar copied out of an Arrow array.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Boolean(bool),
    Int64(i64),
    UInt64(u64),
    Float64(f64),
    Utf8(String),
    Binary(Vec<u8>),
    /// Days since the Unix epoch (1970-01-01).
    Date32(i32),
}

macro_rules! impl_from_for_value {
    ($variant:ident, $($t:ty),*) => {
        $(
            impl From<$t> for Value {
                fn from(v: $t) -> Self {
                    Value::$variant(v.into())
                }
            }
        )*
    };
}

impl_from_for_value!(Int64, i8, i16, i32, i64);
impl_from_for_value!(UInt64, u8, u16, u32, u64);
impl_from_for_value!(Float64, f32, f64);
impl_from_for_value!(Boolean, bool);
impl_from_for_value!(Utf8, String);
impl_from_for_value!(Binary, Vec<u8>);

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Utf8(v.to_string())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Null, Into::into)
    }
}

impl Value {
    /// Copy the cell at `index` out of `array`.
    ///
    /// The caller is responsible for bounds; an index past the end of the array
    /// is reported as [`Error::BoundsError`] rather than panicking inside Arrow.
    pub fn from_array(array: &dyn Array, index: usize) -> Result<Value> {
        if index >= array.len() {
            return Err(Error::bounds("array index", index, array.len()));
        }
        if array.is_null(index) {
            return Ok(Value::Null);
        }

        let value = match array.data_type() {
            DataType::Boolean => Value::Boolean(array.as_boolean().value(index)),
            DataType::Int8 => Value::Int64(array.as_primitive::<Int8Type>().value(index).into()),
            DataType::Int16 => Value::Int64(array.as_primitive::<Int16Type>().value(index).into()),
            DataType::Int32 => Value::Int64(array.as_primitive::<Int32Type>().value(index).into()),
            DataType::Int64 => Value::Int64(array.as_primitive::<Int64Type>().value(index)),
            DataType::UInt8 => Value::UInt64(array.as_primitive::<UInt8Type>().value(index).into()),
            DataType::UInt16 => {
                Value::UInt64(array.as_primitive::<UInt16Type>().value(index).into())
            }
            DataType::UInt32 => {
                Value::UInt64(array.as_primitive::<UInt32Type>().value(index).into())
            }
            DataType::UInt64 => Value::UInt64(array.as_primitive::<UInt64Type>().value(index)),
            DataType::Float32 => {
                Value::Float64(array.as_primitive::<Float32Type>().value(index).into())
            }
            DataType::Float64 => Value::Float64(array.as_primitive::<Float64Type>().value(index)),
            DataType::Date32 => Value::Date32(array.as_primitive::<Date32Type>().value(index)),
            DataType::Utf8 => Value::Utf8(array.as_string::<i32>().value(index).to_string()),
            DataType::LargeUtf8 => Value::Utf8(array.as_string::<i64>().value(index).to_string()),
            DataType::Binary => Value::Binary(array.as_binary::<i32>().value(index).to_vec()),
            DataType::LargeBinary => Value::Binary(array.as_binary::<i64>().value(index).to_vec()),
            other => {
                return Err(Error::InvalidArgumentError(format!(
                    "unsupported column type for scalar access: {other:?}"
                )));
            }
        };
        Ok(value)
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Short type label used in diagnostics.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Boolean(_) => "boolean",
            Value::Int64(_) => "int64",
            Value::UInt64(_) => "uint64",
            Value::Float64(_) => "float64",
            Value::Utf8(_) => "utf8",
            Value::Binary(_) => "binary",
            Value::Date32(_) => "date32",
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "NULL"),
            Value::Boolean(b) => write!(f, "{b}"),
            Value::Int64(i) => write!(f, "{i}"),
            Value::UInt64(u) => write!(f, "{u}"),
            Value::Float64(v) => write!(f, "{v}"),
            Value::Utf8(s) => write!(f, "\"{}\"", s.escape_default()),
            Value::Binary(bytes) => {
                write!(f, "0x")?;
                for b in bytes {
                    write!(f, "{b:02x}")?;
                }
                Ok(())
            }
            Value::Date32(days) => write!(f, "DATE({days})"),
        }
    }
}
