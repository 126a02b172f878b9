//! JSON argument coercion
//!
//! Turns a `JsonArg` descriptor into a typed `Value` for the named class.

use rivet_sdk::{class_names, InvocationError, InvocationResult, JsonArg, ObjectRef, Value};
use serde_json::Value as Json;
use tracing::trace;

use crate::class::ClassKind;
use crate::class_registry::ClassRegistry;
use crate::config::RuntimeConfig;
use crate::introspection::collect_fields;

/// Parse and coerce a JSON descriptor
pub fn coerce_arg(registry: &ClassRegistry, config: &RuntimeConfig, arg: &JsonArg) -> InvocationResult<Value> {
    let json = arg.parse()?;
    let value = coerce_json(registry, config, &arg.class_name, &json)?;
    trace!(target: "rivet::invoke", class = %arg.class_name, json = %arg.json, value = ?value, "coerced argument");
    Ok(value)
}

/// Coerce an already parsed JSON value into `class_name`
pub fn coerce_json(
    registry: &ClassRegistry,
    config: &RuntimeConfig,
    class_name: &str,
    json: &Json,
) -> InvocationResult<Value> {
    Coercer { registry, config }.coerce(class_name, json, 0)
}

struct Coercer<'a> {
    registry: &'a ClassRegistry,
    config: &'a RuntimeConfig,
}

fn mismatch(class_name: &str, json: &Json) -> InvocationError {
    InvocationError::Argument(format!("cannot coerce {} into {}", json, class_name))
}

impl Coercer<'_> {
    fn check_depth(&self, depth: usize) -> InvocationResult<()> {
        if depth > self.config.max_json_depth {
            return Err(InvocationError::Argument(format!(
                "JSON nesting exceeds the maximum depth of {}",
                self.config.max_json_depth
            )));
        }
        Ok(())
    }

    /// `depth` counts the arrays and objects enclosing `json`
    fn coerce(&self, class_name: &str, json: &Json, depth: usize) -> InvocationResult<Value> {
        let class = self.registry.require(class_name)?;

        if json.is_null() {
            return Ok(Value::Null);
        }

        match class_name {
            class_names::BOOLEAN => json.as_bool().map(Value::Bool).ok_or_else(|| mismatch(class_name, json)),
            class_names::BYTE => int_in_range(class_name, json).map(Value::I8),
            class_names::SHORT => int_in_range(class_name, json).map(Value::I16),
            class_names::INTEGER => int_in_range(class_name, json).map(Value::I32),
            class_names::LONG => int_in_range(class_name, json).map(Value::I64),
            class_names::FLOAT => json
                .as_f64()
                .map(|f| Value::F32(f as f32))
                .ok_or_else(|| mismatch(class_name, json)),
            class_names::DOUBLE => json.as_f64().map(Value::F64).ok_or_else(|| mismatch(class_name, json)),
            class_names::CHARACTER => {
                let s = json.as_str().ok_or_else(|| mismatch(class_name, json))?;
                let mut chars = s.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Ok(Value::Char(c)),
                    _ => Err(InvocationError::Argument(format!(
                        "Character needs exactly one char, got {:?}",
                        s
                    ))),
                }
            }
            class_names::STRING => json.as_str().map(Value::string).ok_or_else(|| mismatch(class_name, json)),
            class_names::NUMBER => {
                if json.is_number() {
                    self.infer(json, depth)
                } else {
                    Err(mismatch(class_name, json))
                }
            }
            class_names::ARRAY => {
                if json.is_array() {
                    self.infer(json, depth)
                } else {
                    Err(mismatch(class_name, json))
                }
            }
            class_names::OBJECT => self.infer(json, depth),
            class_names::VOID => Err(mismatch(class_name, json)),
            _ if class.kind == ClassKind::Object => self.instantiate(class.id, class_name, json, depth),
            _ => Err(InvocationError::Argument(format!(
                "value class {} cannot be built from JSON",
                class_name
            ))),
        }
    }

    /// Pick a builtin class from the JSON shape
    fn infer(&self, json: &Json, depth: usize) -> InvocationResult<Value> {
        match json {
            Json::Null => Ok(Value::Null),
            Json::Bool(b) => Ok(Value::Bool(*b)),
            Json::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Ok(i32::try_from(i).map(Value::I32).unwrap_or(Value::I64(i)))
                } else if let Some(f) = n.as_f64() {
                    Ok(Value::F64(f))
                } else {
                    Err(InvocationError::Argument(format!("number {} is out of range", n)))
                }
            }
            Json::String(s) => Ok(Value::string(s)),
            Json::Array(items) => {
                self.check_depth(depth + 1)?;
                let values = items
                    .iter()
                    .map(|item| self.infer(item, depth + 1))
                    .collect::<InvocationResult<Vec<_>>>()?;
                Ok(Value::array(values))
            }
            Json::Object(_) => Err(InvocationError::Argument(
                "cannot infer a class for a JSON object; name a concrete class".to_string(),
            )),
        }
    }

    /// Allocate an instance and fill its fields from a JSON object
    fn instantiate(&self, class_id: usize, class_name: &str, json: &Json, depth: usize) -> InvocationResult<Value> {
        let map = json.as_object().ok_or_else(|| mismatch(class_name, json))?;
        self.check_depth(depth + 1)?;
        let fields = collect_fields(self.registry, class_id);

        for key in map.keys() {
            if !fields.iter().any(|f| &f.name == key) {
                return Err(InvocationError::Argument(format!(
                    "{} has no field '{}'",
                    class_name, key
                )));
            }
        }

        let mut values = Vec::with_capacity(fields.len());
        for field in fields {
            let value = match map.get(&field.name) {
                Some(v) => self.coerce(&field.class_name, v, depth + 1)?,
                None => field.default.clone(),
            };
            values.push((field.name.clone(), value));
        }

        Ok(Value::Object(ObjectRef::with_fields(class_id, class_name, values)))
    }
}

fn int_in_range<T: TryFrom<i64>>(class_name: &str, json: &Json) -> InvocationResult<T> {
    let i = json.as_i64().ok_or_else(|| mismatch(class_name, json))?;
    T::try_from(i).map_err(|_| InvocationError::Argument(format!("{} is out of range for {}", i, class_name)))
}
