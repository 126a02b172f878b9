//! Conversions between `Value` and Rust types
//!
//! Method bodies receive `&[Value]` and return `Value`. Implement
//! `FromValue` to accept a Rust type as an argument and `IntoValue` to
//! return one.
//!
//! # Example
//!
//! ```ignore
//! use rivet_sdk::{arg, IntoValue, ThrownError, Value};
//!
//! fn add(args: &[Value]) -> Result<Value, ThrownError> {
//!     let a: i32 = arg(args, 0)?;
//!     let b: i32 = arg(args, 1)?;
//!     Ok((a + b).into_value())
//! }
//! ```

use crate::error::ThrownError;
use crate::value::{ObjectRef, Value};

/// Convert from `Value` to a Rust type.
pub trait FromValue: Sized {
    /// Convert, raising a type mismatch if the variant doesn't fit
    fn from_value(value: &Value) -> Result<Self, ThrownError>;
}

/// Convert from a Rust type to `Value`.
pub trait IntoValue {
    /// Convert to Value
    fn into_value(self) -> Value;
}

/// Extract argument `index` as `T`
pub fn arg<T: FromValue>(args: &[Value], index: usize) -> Result<T, ThrownError> {
    let value = args.get(index).ok_or_else(|| {
        ThrownError::illegal_argument(format!(
            "missing argument {} (got {} arguments)",
            index,
            args.len()
        ))
    })?;
    T::from_value(value)
}

fn mismatch(expected: &str, value: &Value) -> ThrownError {
    ThrownError::type_mismatch(expected, value.type_name())
}

impl FromValue for Value {
    fn from_value(value: &Value) -> Result<Self, ThrownError> {
        Ok(value.clone())
    }
}

impl FromValue for bool {
    fn from_value(value: &Value) -> Result<Self, ThrownError> {
        value.as_bool().ok_or_else(|| mismatch("bool", value))
    }
}

impl FromValue for i8 {
    fn from_value(value: &Value) -> Result<Self, ThrownError> {
        value.as_i8().ok_or_else(|| mismatch("i8", value))
    }
}

impl FromValue for i16 {
    fn from_value(value: &Value) -> Result<Self, ThrownError> {
        match value {
            Value::I8(i) => Ok(*i as i16),
            Value::I16(i) => Ok(*i),
            _ => Err(mismatch("i16", value)),
        }
    }
}

impl FromValue for i32 {
    fn from_value(value: &Value) -> Result<Self, ThrownError> {
        match value {
            Value::I8(i) => Ok(*i as i32),
            Value::I16(i) => Ok(*i as i32),
            Value::I32(i) => Ok(*i),
            _ => Err(mismatch("i32", value)),
        }
    }
}

impl FromValue for i64 {
    fn from_value(value: &Value) -> Result<Self, ThrownError> {
        value.to_i64_lossless().ok_or_else(|| mismatch("i64", value))
    }
}

impl FromValue for f32 {
    fn from_value(value: &Value) -> Result<Self, ThrownError> {
        value.as_f32().ok_or_else(|| mismatch("f32", value))
    }
}

impl FromValue for f64 {
    fn from_value(value: &Value) -> Result<Self, ThrownError> {
        value.to_f64_lossy().ok_or_else(|| mismatch("f64", value))
    }
}

impl FromValue for char {
    fn from_value(value: &Value) -> Result<Self, ThrownError> {
        value.as_char().ok_or_else(|| mismatch("char", value))
    }
}

impl FromValue for String {
    fn from_value(value: &Value) -> Result<Self, ThrownError> {
        value
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| mismatch("string", value))
    }
}

impl FromValue for ObjectRef {
    fn from_value(value: &Value) -> Result<Self, ThrownError> {
        value.as_object().cloned().ok_or_else(|| mismatch("object", value))
    }
}

impl<T: FromValue> FromValue for Option<T> {
    fn from_value(value: &Value) -> Result<Self, ThrownError> {
        if value.is_null() {
            Ok(None)
        } else {
            T::from_value(value).map(Some)
        }
    }
}

impl<T: FromValue> FromValue for Vec<T> {
    fn from_value(value: &Value) -> Result<Self, ThrownError> {
        value
            .as_array()
            .ok_or_else(|| mismatch("array", value))?
            .iter()
            .map(T::from_value)
            .collect()
    }
}

impl<T: Into<Value>> IntoValue for T {
    fn into_value(self) -> Value {
        self.into()
    }
}
