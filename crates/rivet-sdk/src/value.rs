//! The dynamically typed value passed through invocations
//!
//! Every receiver, argument and result crossing the invocation boundary is a
//! `Value`. The variant doubles as the runtime type tag:
//!
//! ```text
//! Null            no runtime class (assignable to every class)
//! Bool            Boolean
//! I8 / I16        Byte / Short
//! I32 / I64       Integer / Long
//! F32 / F64       Float / Double
//! Char            Character
//! String          String     (shared, immutable)
//! Array           Array      (shared, immutable list)
//! Object          <class>    (shared reference to a mutable field table)
//! ```

use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;
use rustc_hash::FxHashMap;

/// Names of the builtin classes every runtime registers.
pub mod class_names {
    /// Root of the class hierarchy
    pub const OBJECT: &str = "Object";
    /// Common parent of the numeric classes
    pub const NUMBER: &str = "Number";
    /// `bool`
    pub const BOOLEAN: &str = "Boolean";
    /// `i8`
    pub const BYTE: &str = "Byte";
    /// `i16`
    pub const SHORT: &str = "Short";
    /// `i32`
    pub const INTEGER: &str = "Integer";
    /// `i64`
    pub const LONG: &str = "Long";
    /// `f32`
    pub const FLOAT: &str = "Float";
    /// `f64`
    pub const DOUBLE: &str = "Double";
    /// `char`
    pub const CHARACTER: &str = "Character";
    /// Immutable UTF-8 string
    pub const STRING: &str = "String";
    /// Immutable list of values
    pub const ARRAY: &str = "Array";
    /// Return class of methods that produce nothing
    pub const VOID: &str = "Void";
}

// ============================================================================
// ObjectRef
// ============================================================================

struct ObjectData {
    class_id: usize,
    class_name: String,
    fields: RwLock<FxHashMap<String, Value>>,
}

/// Shared reference to a class instance.
///
/// Cloning the reference does not copy the instance; all clones observe the
/// same field table. Equality of objects is identity.
#[derive(Clone)]
pub struct ObjectRef(Arc<ObjectData>);

impl ObjectRef {
    /// Allocate an instance with an empty field table
    pub fn new(class_id: usize, class_name: impl Into<String>) -> Self {
        Self::with_fields(class_id, class_name, std::iter::empty())
    }

    /// Allocate an instance with initial field values
    pub fn with_fields(
        class_id: usize,
        class_name: impl Into<String>,
        fields: impl IntoIterator<Item = (String, Value)>,
    ) -> Self {
        ObjectRef(Arc::new(ObjectData {
            class_id,
            class_name: class_name.into(),
            fields: RwLock::new(fields.into_iter().collect()),
        }))
    }

    /// Registry id of the instance's class
    pub fn class_id(&self) -> usize {
        self.0.class_id
    }

    /// Name of the instance's class
    pub fn class_name(&self) -> &str {
        &self.0.class_name
    }

    /// Read a field
    pub fn get_field(&self, name: &str) -> Option<Value> {
        self.0.fields.read().get(name).cloned()
    }

    /// Write a field, returning the previous value
    pub fn set_field(&self, name: impl Into<String>, value: Value) -> Option<Value> {
        self.0.fields.write().insert(name.into(), value)
    }

    /// Check if the field table contains `name`
    pub fn has_field(&self, name: &str) -> bool {
        self.0.fields.read().contains_key(name)
    }

    /// Field names, sorted
    pub fn field_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.0.fields.read().keys().cloned().collect();
        names.sort();
        names
    }

    /// Snapshot of all fields, sorted by name
    pub fn fields(&self) -> Vec<(String, Value)> {
        let mut fields: Vec<(String, Value)> = self
            .0
            .fields
            .read()
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        fields.sort_by(|a, b| a.0.cmp(&b.0));
        fields
    }

    /// Identity comparison
    pub fn ptr_eq(&self, other: &ObjectRef) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    /// Address of the shared instance, stable for its lifetime
    pub fn addr(&self) -> usize {
        Arc::as_ptr(&self.0) as usize
    }
}

impl fmt::Debug for ObjectRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{:x}", self.class_name(), self.addr())
    }
}

// ============================================================================
// Value
// ============================================================================

/// Dynamically typed value.
#[derive(Clone, Default)]
pub enum Value {
    /// Absent value
    #[default]
    Null,
    /// Boolean
    Bool(bool),
    /// 8-bit integer
    I8(i8),
    /// 16-bit integer
    I16(i16),
    /// 32-bit integer
    I32(i32),
    /// 64-bit integer
    I64(i64),
    /// 32-bit float
    F32(f32),
    /// 64-bit float
    F64(f64),
    /// Unicode scalar
    Char(char),
    /// Shared immutable string
    String(Arc<str>),
    /// Shared immutable list
    Array(Arc<[Value]>),
    /// Class instance
    Object(ObjectRef),
}

impl Value {
    // ========================================================================
    // Constructors
    // ========================================================================

    /// Create a null value
    #[inline]
    pub const fn null() -> Self {
        Value::Null
    }

    /// Create a boolean value
    #[inline]
    pub const fn bool(b: bool) -> Self {
        Value::Bool(b)
    }

    /// Create an i8 value
    #[inline]
    pub const fn i8(i: i8) -> Self {
        Value::I8(i)
    }

    /// Create an i16 value
    #[inline]
    pub const fn i16(i: i16) -> Self {
        Value::I16(i)
    }

    /// Create an i32 value
    #[inline]
    pub const fn i32(i: i32) -> Self {
        Value::I32(i)
    }

    /// Create an i64 value
    #[inline]
    pub const fn i64(i: i64) -> Self {
        Value::I64(i)
    }

    /// Create an f32 value
    #[inline]
    pub const fn f32(f: f32) -> Self {
        Value::F32(f)
    }

    /// Create an f64 value
    #[inline]
    pub const fn f64(f: f64) -> Self {
        Value::F64(f)
    }

    /// Create a char value
    #[inline]
    pub const fn char(c: char) -> Self {
        Value::Char(c)
    }

    /// Create a string value
    pub fn string(s: impl AsRef<str>) -> Self {
        Value::String(Arc::from(s.as_ref()))
    }

    /// Create an array value
    pub fn array(items: Vec<Value>) -> Self {
        Value::Array(Arc::from(items))
    }

    /// Wrap an object reference
    pub fn object(obj: ObjectRef) -> Self {
        Value::Object(obj)
    }

    // ========================================================================
    // Type checks
    // ========================================================================

    /// Check if value is null
    #[inline]
    pub const fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Check if value is an object instance
    #[inline]
    pub const fn is_object(&self) -> bool {
        matches!(self, Value::Object(_))
    }

    /// Check if value is any integer or float
    #[inline]
    pub const fn is_numeric(&self) -> bool {
        matches!(
            self,
            Value::I8(_) | Value::I16(_) | Value::I32(_) | Value::I64(_) | Value::F32(_) | Value::F64(_)
        )
    }

    // ========================================================================
    // Extractors
    // ========================================================================

    /// Extract boolean value
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Extract i8 value
    pub fn as_i8(&self) -> Option<i8> {
        match self {
            Value::I8(i) => Some(*i),
            _ => None,
        }
    }

    /// Extract i16 value
    pub fn as_i16(&self) -> Option<i16> {
        match self {
            Value::I16(i) => Some(*i),
            _ => None,
        }
    }

    /// Extract i32 value
    pub fn as_i32(&self) -> Option<i32> {
        match self {
            Value::I32(i) => Some(*i),
            _ => None,
        }
    }

    /// Extract i64 value
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::I64(i) => Some(*i),
            _ => None,
        }
    }

    /// Extract f32 value
    pub fn as_f32(&self) -> Option<f32> {
        match self {
            Value::F32(f) => Some(*f),
            _ => None,
        }
    }

    /// Extract f64 value
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::F64(f) => Some(*f),
            _ => None,
        }
    }

    /// Extract char value
    pub fn as_char(&self) -> Option<char> {
        match self {
            Value::Char(c) => Some(*c),
            _ => None,
        }
    }

    /// Borrow string contents
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Borrow array elements
    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(items) => Some(items),
            _ => None,
        }
    }

    /// Borrow object reference
    pub fn as_object(&self) -> Option<&ObjectRef> {
        match self {
            Value::Object(obj) => Some(obj),
            _ => None,
        }
    }

    /// Any integer variant, sign-extended to i64
    pub fn to_i64_lossless(&self) -> Option<i64> {
        match self {
            Value::I8(i) => Some(*i as i64),
            Value::I16(i) => Some(*i as i64),
            Value::I32(i) => Some(*i as i64),
            Value::I64(i) => Some(*i),
            _ => None,
        }
    }

    /// Any numeric variant as f64
    pub fn to_f64_lossy(&self) -> Option<f64> {
        match self {
            Value::F32(f) => Some(*f as f64),
            Value::F64(f) => Some(*f),
            other => other.to_i64_lossless().map(|i| i as f64),
        }
    }

    // ========================================================================
    // Type information
    // ========================================================================

    /// Class of the value itself; `None` for null
    pub fn runtime_class(&self) -> Option<&str> {
        use class_names::*;
        Some(match self {
            Value::Null => return None,
            Value::Bool(_) => BOOLEAN,
            Value::I8(_) => BYTE,
            Value::I16(_) => SHORT,
            Value::I32(_) => INTEGER,
            Value::I64(_) => LONG,
            Value::F32(_) => FLOAT,
            Value::F64(_) => DOUBLE,
            Value::Char(_) => CHARACTER,
            Value::String(_) => STRING,
            Value::Array(_) => ARRAY,
            Value::Object(obj) => obj.class_name(),
        })
    }

    /// Get type name for debugging
    pub const fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::I8(_) => "i8",
            Value::I16(_) => "i16",
            Value::I32(_) => "i32",
            Value::I64(_) => "i64",
            Value::F32(_) => "f32",
            Value::F64(_) => "f64",
            Value::Char(_) => "char",
            Value::String(_) => "string",
            Value::Array(_) => "array",
            Value::Object(_) => "object",
        }
    }

    // ========================================================================
    // JSON rendering
    // ========================================================================

    /// Render as JSON.
    ///
    /// Objects render as a JSON object of their fields. Non-finite floats
    /// render as `null`. A cycle through object fields is an error.
    pub fn to_json(&self) -> Result<serde_json::Value, serde_json::Error> {
        let mut path = Vec::new();
        self.to_json_inner(&mut path)
    }

    fn to_json_inner(&self, path: &mut Vec<usize>) -> Result<serde_json::Value, serde_json::Error> {
        use serde_json::Value as Json;
        Ok(match self {
            Value::Null => Json::Null,
            Value::Bool(b) => Json::Bool(*b),
            Value::I8(i) => Json::from(*i),
            Value::I16(i) => Json::from(*i),
            Value::I32(i) => Json::from(*i),
            Value::I64(i) => Json::from(*i),
            Value::F32(f) => Json::from(*f as f64),
            Value::F64(f) => Json::from(*f),
            Value::Char(c) => Json::String(c.to_string()),
            Value::String(s) => Json::String(s.to_string()),
            Value::Array(items) => Json::Array(
                items
                    .iter()
                    .map(|item| item.to_json_inner(path))
                    .collect::<Result<_, _>>()?,
            ),
            Value::Object(obj) => {
                if path.contains(&obj.addr()) {
                    return Err(<serde_json::Error as serde::ser::Error>::custom(format!(
                        "cycle through instance of {}",
                        obj.class_name()
                    )));
                }
                path.push(obj.addr());
                let mut map = serde_json::Map::new();
                for (name, value) in obj.fields() {
                    map.insert(name, value.to_json_inner(path)?);
                }
                path.pop();
                Json::Object(map)
            }
        })
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::I8(a), Value::I8(b)) => a == b,
            (Value::I16(a), Value::I16(b)) => a == b,
            (Value::I32(a), Value::I32(b)) => a == b,
            (Value::I64(a), Value::I64(b)) => a == b,
            (Value::F32(a), Value::F32(b)) => a == b,
            (Value::F64(a), Value::F64(b)) => a == b,
            (Value::Char(a), Value::Char(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Array(a), Value::Array(b)) => a == b,
            (Value::Object(a), Value::Object(b)) => a.ptr_eq(b),
            _ => false,
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "Value::Null"),
            Value::Bool(b) => write!(f, "Value::Bool({})", b),
            Value::I8(i) => write!(f, "Value::I8({})", i),
            Value::I16(i) => write!(f, "Value::I16({})", i),
            Value::I32(i) => write!(f, "Value::I32({})", i),
            Value::I64(i) => write!(f, "Value::I64({})", i),
            Value::F32(v) => write!(f, "Value::F32({})", v),
            Value::F64(v) => write!(f, "Value::F64({})", v),
            Value::Char(c) => write!(f, "Value::Char({:?})", c),
            Value::String(s) => write!(f, "Value::String({:?})", s),
            Value::Array(items) => f.debug_list().entries(items.iter()).finish(),
            Value::Object(obj) => write!(f, "Value::Object({:?})", obj),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::I8(i) => write!(f, "{}", i),
            Value::I16(i) => write!(f, "{}", i),
            Value::I32(i) => write!(f, "{}", i),
            Value::I64(i) => write!(f, "{}", i),
            Value::F32(v) => write!(f, "{}", v),
            Value::F64(v) => write!(f, "{}", v),
            Value::Char(c) => write!(f, "{}", c),
            Value::String(s) => write!(f, "{}", s),
            Value::Array(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, "]")
            }
            Value::Object(obj) => write!(f, "{:?}", obj),
        }
    }
}

macro_rules! impl_from_for_value {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for Value {
                fn from(v: $ty) -> Self {
                    Value::$variant(v)
                }
            }
        )*
    };
}

impl_from_for_value! {
    bool => Bool,
    i8 => I8,
    i16 => I16,
    i32 => I32,
    i64 => I64,
    f32 => F32,
    f64 => F64,
    char => Char,
    ObjectRef => Object,
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::string(s)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(Arc::from(s))
    }
}

impl From<()> for Value {
    fn from(_: ()) -> Self {
        Value::Null
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Null, Into::into)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::array(items)
    }
}
