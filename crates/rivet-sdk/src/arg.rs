//! Invocation arguments
//!
//! An argument crosses the invocation boundary either as a JSON descriptor
//! (class name + JSON text, coerced into a typed value by the runtime) or as
//! a value taken from an existing invocation handle.
//!
//! # Example
//!
//! ```ignore
//! use rivet_sdk::InvocationArg;
//!
//! let by_json = InvocationArg::from(3);                 // Integer, "3"
//! let by_serde = InvocationArg::new(&point, "Point")?;  // Point, "{\"x\":1,\"y\":2}"
//! let from_handle = InvocationArg::from(&result);        // value + declared class
//! ```

use serde::{Deserialize, Serialize};

use crate::error::InvocationResult;
use crate::value::{class_names, Value};

/// JSON descriptor of an argument: its class name and its JSON text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JsonArg {
    /// Class the JSON is coerced into
    pub class_name: String,
    /// JSON text of the value
    pub json: String,
}

impl JsonArg {
    /// Create a descriptor
    pub fn new(class_name: impl Into<String>, json: impl Into<String>) -> Self {
        Self {
            class_name: class_name.into(),
            json: json.into(),
        }
    }

    /// Parse the JSON text
    pub fn parse(&self) -> Result<serde_json::Value, serde_json::Error> {
        serde_json::from_str(&self.json)
    }
}

/// Argument passed to an invocation.
#[derive(Debug, Clone)]
pub enum InvocationArg {
    /// JSON descriptor, coerced by the runtime
    Json(JsonArg),
    /// Value taken from an invocation handle, with its declared class
    Handle {
        /// Wrapped value
        value: Value,
        /// Declared class of the originating handle
        class_name: String,
    },
}

impl InvocationArg {
    /// Serialize any `serde` value as an argument of the given class
    pub fn new<T: Serialize + ?Sized>(value: &T, class_name: impl Into<String>) -> InvocationResult<Self> {
        let json = serde_json::to_string(value)?;
        Ok(InvocationArg::Json(JsonArg::new(class_name, json)))
    }

    /// Null argument typed as `class_name`
    pub fn null(class_name: impl Into<String>) -> Self {
        InvocationArg::Json(JsonArg::new(class_name, "null"))
    }

    /// Pass an already typed value
    pub fn from_value(value: Value, class_name: impl Into<String>) -> Self {
        InvocationArg::Handle {
            value,
            class_name: class_name.into(),
        }
    }

    /// Declared class of the argument
    pub fn class_name(&self) -> &str {
        match self {
            InvocationArg::Json(arg) => &arg.class_name,
            InvocationArg::Handle { class_name, .. } => class_name,
        }
    }

    /// Render as a JSON descriptor (handles render their wrapped value)
    pub fn to_descriptor(&self) -> InvocationResult<JsonArg> {
        match self {
            InvocationArg::Json(arg) => Ok(arg.clone()),
            InvocationArg::Handle { value, class_name } => {
                Ok(JsonArg::new(class_name.clone(), value.to_json()?.to_string()))
            }
        }
    }
}

impl From<JsonArg> for InvocationArg {
    fn from(arg: JsonArg) -> Self {
        InvocationArg::Json(arg)
    }
}

macro_rules! impl_from_for_arg {
    ($($ty:ty => $class:expr),* $(,)?) => {
        $(
            impl From<$ty> for InvocationArg {
                fn from(v: $ty) -> Self {
                    InvocationArg::Json(JsonArg::new($class, serde_json::Value::from(v).to_string()))
                }
            }
        )*
    };
}

impl_from_for_arg! {
    bool => class_names::BOOLEAN,
    i8 => class_names::BYTE,
    i16 => class_names::SHORT,
    i32 => class_names::INTEGER,
    i64 => class_names::LONG,
    f32 => class_names::FLOAT,
    f64 => class_names::DOUBLE,
    &str => class_names::STRING,
    String => class_names::STRING,
}

impl From<char> for InvocationArg {
    fn from(c: char) -> Self {
        let json = serde_json::Value::String(c.to_string()).to_string();
        InvocationArg::Json(JsonArg::new(class_names::CHARACTER, json))
    }
}

impl From<&[&str]> for InvocationArg {
    fn from(items: &[&str]) -> Self {
        let json = serde_json::Value::from(items.to_vec()).to_string();
        InvocationArg::Json(JsonArg::new(class_names::ARRAY, json))
    }
}

impl From<Vec<String>> for InvocationArg {
    fn from(items: Vec<String>) -> Self {
        let json = serde_json::Value::from(items).to_string();
        InvocationArg::Json(JsonArg::new(class_names::ARRAY, json))
    }
}
