//! Builtin classes
//!
//! Registers the classes every runtime starts with. `Object` is the root;
//! the boxed primitives, `String`, `Array` and `Void` are value classes whose
//! instances are plain `Value` variants.
//!
//! ```text
//! Object
//! ├── Number
//! │   ├── Byte, Short, Integer, Long
//! │   └── Float, Double
//! ├── Boolean, Character
//! ├── String, Array
//! └── Void
//! ```

use std::hash::{Hash, Hasher};

use rivet_sdk::{arg, class_names, InvocationResult, ThrownError, Value};
use rustc_hash::FxHasher;

use crate::class::{CallFrame, ClassDef};
use crate::class_registry::ClassRegistry;

/// Register all builtin classes into an empty registry.
pub fn register_builtins(registry: &mut ClassRegistry) -> InvocationResult<()> {
    register_object(registry)?;
    register_numbers(registry)?;
    register_boolean(registry)?;
    register_character(registry)?;
    register_string(registry)?;
    register_array(registry)?;
    registry.register_builtin(ClassDef::builder(class_names::VOID).value_class().build())?;
    Ok(())
}

/// Names of the builtin classes in registration order
pub const BUILTIN_CLASSES: &[&str] = &[
    class_names::OBJECT,
    class_names::NUMBER,
    class_names::BYTE,
    class_names::SHORT,
    class_names::INTEGER,
    class_names::LONG,
    class_names::FLOAT,
    class_names::DOUBLE,
    class_names::BOOLEAN,
    class_names::CHARACTER,
    class_names::STRING,
    class_names::ARRAY,
    class_names::VOID,
];

/// Constructor of a value class taking one argument of the same class
fn copy_ctor(_frame: &CallFrame<'_>, args: &[Value]) -> Result<Value, ThrownError> {
    arg::<Value>(args, 0)
}

fn this_str<'a>(frame: &CallFrame<'a>) -> Result<&'a str, ThrownError> {
    let this = frame.this()?;
    this.as_str()
        .ok_or_else(|| ThrownError::type_mismatch("string", this.type_name()))
}

fn this_number<'a>(frame: &CallFrame<'a>) -> Result<&'a Value, ThrownError> {
    let this = frame.this()?;
    if this.is_numeric() {
        Ok(this)
    } else {
        Err(ThrownError::type_mismatch("number", this.type_name()))
    }
}

/// Truncating integer view of a numeric value
fn as_long(value: &Value) -> i64 {
    value
        .to_i64_lossless()
        .unwrap_or_else(|| value.to_f64_lossy().unwrap_or(0.0) as i64)
}

/// String hash as `s[0]*31^(n-1) + ... + s[n-1]` over the chars of `s`,
/// with wrapping arithmetic
fn string_hash(s: &str) -> i32 {
    s.chars()
        .fold(0i32, |h, c| h.wrapping_mul(31).wrapping_add(c as i32))
}

fn hash_code(value: &Value) -> i32 {
    match value {
        Value::Null => 0,
        Value::Bool(true) => 1231,
        Value::Bool(false) => 1237,
        Value::I8(i) => *i as i32,
        Value::I16(i) => *i as i32,
        Value::I32(i) => *i,
        Value::I64(i) => (*i ^ (*i >> 32)) as i32,
        Value::Char(c) => *c as i32,
        Value::String(s) => string_hash(s),
        Value::Object(obj) => {
            let addr = obj.addr() as u64;
            (addr ^ (addr >> 32)) as i32
        }
        other => {
            let mut hasher = FxHasher::default();
            other.to_string().hash(&mut hasher);
            hasher.finish() as i32
        }
    }
}

// ============================================================================
// Object
// ============================================================================

fn register_object(registry: &mut ClassRegistry) -> InvocationResult<()> {
    let object = ClassDef::builder(class_names::OBJECT)
        .root()
        .method("toString", &[], class_names::STRING, |frame, _| {
            Ok(Value::string(frame.this()?.to_string()))
        })
        .method("equals", &[class_names::OBJECT], class_names::BOOLEAN, |frame, args| {
            let other: Value = arg(args, 0)?;
            Ok(Value::Bool(frame.this()? == &other))
        })
        .method("hashCode", &[], class_names::INTEGER, |frame, _| {
            Ok(Value::I32(hash_code(frame.this()?)))
        })
        .method("getClassName", &[], class_names::STRING, |frame, _| {
            let this = frame.this()?;
            Ok(Value::string(this.runtime_class().unwrap_or(class_names::OBJECT)))
        })
        .build();
    registry.register_builtin(object)?;
    Ok(())
}

// ============================================================================
// Numbers
// ============================================================================

fn register_numbers(registry: &mut ClassRegistry) -> InvocationResult<()> {
    let number = ClassDef::builder(class_names::NUMBER)
        .value_class()
        .method("intValue", &[], class_names::INTEGER, |frame, _| {
            Ok(Value::I32(as_long(this_number(frame)?) as i32))
        })
        .method("longValue", &[], class_names::LONG, |frame, _| {
            Ok(Value::I64(as_long(this_number(frame)?)))
        })
        .method("doubleValue", &[], class_names::DOUBLE, |frame, _| {
            Ok(Value::F64(this_number(frame)?.to_f64_lossy().unwrap_or(0.0)))
        })
        .build();
    registry.register_builtin(number)?;

    for name in [class_names::BYTE, class_names::SHORT] {
        let class = ClassDef::builder(name)
            .extends(class_names::NUMBER)
            .value_class()
            .constructor(&[name], copy_ctor)
            .build();
        registry.register_builtin(class)?;
    }

    let integer = ClassDef::builder(class_names::INTEGER)
        .extends(class_names::NUMBER)
        .value_class()
        .constructor(&[class_names::INTEGER], copy_ctor)
        .static_method("parseInt", &[class_names::STRING], class_names::INTEGER, |_, args| {
            let s: String = arg(args, 0)?;
            s.trim()
                .parse::<i32>()
                .map(Value::I32)
                .map_err(|_| ThrownError::number_format(&s))
        })
        .static_method("valueOf", &[class_names::INTEGER], class_names::INTEGER, |_, args| {
            arg::<Value>(args, 0)
        })
        .static_method("valueOf", &[class_names::STRING], class_names::INTEGER, |_, args| {
            let s: String = arg(args, 0)?;
            s.trim()
                .parse::<i32>()
                .map(Value::I32)
                .map_err(|_| ThrownError::number_format(&s))
        })
        .static_method(
            "max",
            &[class_names::INTEGER, class_names::INTEGER],
            class_names::INTEGER,
            |_, args| {
                let a: i32 = arg(args, 0)?;
                let b: i32 = arg(args, 1)?;
                Ok(Value::I32(a.max(b)))
            },
        )
        .static_method(
            "min",
            &[class_names::INTEGER, class_names::INTEGER],
            class_names::INTEGER,
            |_, args| {
                let a: i32 = arg(args, 0)?;
                let b: i32 = arg(args, 1)?;
                Ok(Value::I32(a.min(b)))
            },
        )
        .build();
    registry.register_builtin(integer)?;

    for name in [class_names::LONG, class_names::FLOAT, class_names::DOUBLE] {
        let class = ClassDef::builder(name)
            .extends(class_names::NUMBER)
            .value_class()
            .constructor(&[name], copy_ctor)
            .build();
        registry.register_builtin(class)?;
    }
    Ok(())
}

// ============================================================================
// Boolean / Character
// ============================================================================

fn register_boolean(registry: &mut ClassRegistry) -> InvocationResult<()> {
    let boolean = ClassDef::builder(class_names::BOOLEAN)
        .value_class()
        .constructor(&[class_names::BOOLEAN], copy_ctor)
        .static_method("parseBoolean", &[class_names::STRING], class_names::BOOLEAN, |_, args| {
            let s: Option<String> = arg(args, 0)?;
            Ok(Value::Bool(s.is_some_and(|s| s.eq_ignore_ascii_case("true"))))
        })
        .build();
    registry.register_builtin(boolean)?;
    Ok(())
}

fn register_character(registry: &mut ClassRegistry) -> InvocationResult<()> {
    let character = ClassDef::builder(class_names::CHARACTER)
        .value_class()
        .constructor(&[class_names::CHARACTER], copy_ctor)
        .build();
    registry.register_builtin(character)?;
    Ok(())
}

// ============================================================================
// String
// ============================================================================

fn register_string(registry: &mut ClassRegistry) -> InvocationResult<()> {
    let string = ClassDef::builder(class_names::STRING)
        .value_class()
        .constructor(&[], |_, _| Ok(Value::string("")))
        .constructor(&[class_names::STRING], copy_ctor)
        .method("length", &[], class_names::INTEGER, |frame, _| {
            Ok(Value::I32(this_str(frame)?.chars().count() as i32))
        })
        .method("isEmpty", &[], class_names::BOOLEAN, |frame, _| {
            Ok(Value::Bool(this_str(frame)?.is_empty()))
        })
        .method("concat", &[class_names::STRING], class_names::STRING, |frame, args| {
            let other: String = arg(args, 0)?;
            Ok(Value::string(format!("{}{}", this_str(frame)?, other)))
        })
        .method("toUpperCase", &[], class_names::STRING, |frame, _| {
            Ok(Value::string(this_str(frame)?.to_uppercase()))
        })
        .method("toLowerCase", &[], class_names::STRING, |frame, _| {
            Ok(Value::string(this_str(frame)?.to_lowercase()))
        })
        .method("trim", &[], class_names::STRING, |frame, _| {
            Ok(Value::string(this_str(frame)?.trim()))
        })
        .method("contains", &[class_names::STRING], class_names::BOOLEAN, |frame, args| {
            let needle: String = arg(args, 0)?;
            Ok(Value::Bool(this_str(frame)?.contains(needle.as_str())))
        })
        .method("charAt", &[class_names::INTEGER], class_names::CHARACTER, |frame, args| {
            let s = this_str(frame)?;
            let index: i32 = arg(args, 0)?;
            usize::try_from(index)
                .ok()
                .and_then(|i| s.chars().nth(i))
                .map(Value::Char)
                .ok_or_else(|| ThrownError::index_out_of_bounds(index as i64, s.chars().count()))
        })
        .method("split", &[class_names::STRING], class_names::ARRAY, |frame, args| {
            let s = this_str(frame)?;
            let separator: String = arg(args, 0)?;
            let parts: Vec<Value> = if separator.is_empty() {
                s.chars().map(|c| Value::string(c.to_string())).collect()
            } else {
                s.split(separator.as_str()).map(Value::string).collect()
            };
            Ok(Value::array(parts))
        })
        .static_method("valueOf", &[class_names::OBJECT], class_names::STRING, |_, args| {
            let value: Value = arg(args, 0)?;
            Ok(Value::string(value.to_string()))
        })
        .build();
    registry.register_builtin(string)?;
    Ok(())
}

// ============================================================================
// Array
// ============================================================================

fn register_array(registry: &mut ClassRegistry) -> InvocationResult<()> {
    let array = ClassDef::builder(class_names::ARRAY)
        .value_class()
        .method("length", &[], class_names::INTEGER, |frame, _| {
            let this = frame.this()?;
            let items = this
                .as_array()
                .ok_or_else(|| ThrownError::type_mismatch("array", this.type_name()))?;
            Ok(Value::I32(items.len() as i32))
        })
        .method("get", &[class_names::INTEGER], class_names::OBJECT, |frame, args| {
            let this = frame.this()?;
            let items = this
                .as_array()
                .ok_or_else(|| ThrownError::type_mismatch("array", this.type_name()))?;
            let index: i32 = arg(args, 0)?;
            usize::try_from(index)
                .ok()
                .and_then(|i| items.get(i))
                .cloned()
                .ok_or_else(|| ThrownError::index_out_of_bounds(index as i64, items.len()))
        })
        .build();
    registry.register_builtin(array)?;
    Ok(())
}
