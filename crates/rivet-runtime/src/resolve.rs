//! Method and constructor resolution
//!
//! Candidates are collected along the hierarchy, most-derived class first,
//! so an override shadows the method it overrides. Among the applicable
//! candidates the one with the most exact argument matches wins.

use rivet_sdk::{class_names, InvocationError, InvocationResult, Value};

use crate::class::{Class, MethodDef};
use crate::class_registry::ClassRegistry;
use crate::config::{OverloadPolicy, RuntimeConfig};
use crate::introspection::{get_class_hierarchy, is_assignable, is_subclass_of};

/// An argument ready for resolution: its value and the class it is passed as
#[derive(Debug, Clone)]
pub struct TypedArg {
    /// Coerced value
    pub value: Value,
    /// Declared class of the argument
    pub class_name: String,
}

impl TypedArg {
    /// Create a typed argument
    pub fn new(value: Value, class_name: impl Into<String>) -> Self {
        Self {
            value,
            class_name: class_name.into(),
        }
    }
}

/// Outcome of a successful resolution
#[derive(Debug, Clone)]
pub struct Resolved {
    /// Class declaring the selected method
    pub class_id: usize,
    /// Name of that class
    pub class_name: String,
    /// Selected method
    pub method: MethodDef,
    /// Arguments after widening conversions
    pub args: Vec<Value>,
}

/// Resolve an instance (`is_static == false`) or static method on
/// `class_id` and its ancestors.
pub fn resolve_method(
    registry: &ClassRegistry,
    config: &RuntimeConfig,
    class_id: usize,
    name: &str,
    is_static: bool,
    args: &[TypedArg],
) -> InvocationResult<Resolved> {
    let mut candidates: Vec<(&Class, &MethodDef)> = Vec::new();
    for class in get_class_hierarchy(registry, class_id) {
        for method in class.methods_named(name) {
            if method.is_static != is_static || method.params.len() != args.len() {
                continue;
            }
            if candidates.iter().any(|(_, seen)| seen.same_signature(method)) {
                continue;
            }
            candidates.push((class, method));
        }
    }

    let class_name = class_label(registry, class_id);
    match select(registry, config, &candidates, args) {
        Selection::Found(resolved) => Ok(resolved),
        Selection::NotFound => Err(InvocationError::MethodNotFound {
            class: class_name,
            method: name.to_string(),
            args: arg_classes(args),
        }),
        Selection::Ambiguous(count) => Err(InvocationError::AmbiguousMethod {
            class: class_name,
            method: name.to_string(),
            candidates: count,
        }),
    }
}

/// Resolve a constructor declared by `class_id` itself
pub fn resolve_constructor(
    registry: &ClassRegistry,
    config: &RuntimeConfig,
    class_id: usize,
    args: &[TypedArg],
) -> InvocationResult<Resolved> {
    let class = registry
        .get_class(class_id)
        .ok_or_else(|| InvocationError::ClassNotFound(format!("#{}", class_id)))?;
    let candidates: Vec<(&Class, &MethodDef)> = class
        .constructors
        .iter()
        .filter(|ctor| ctor.params.len() == args.len())
        .map(|ctor| (class, ctor))
        .collect();

    match select(registry, config, &candidates, args) {
        Selection::Found(resolved) => Ok(resolved),
        Selection::NotFound => Err(InvocationError::ConstructorNotFound {
            class: class.name.clone(),
            args: arg_classes(args),
        }),
        Selection::Ambiguous(count) => Err(InvocationError::AmbiguousMethod {
            class: class.name.clone(),
            method: MethodDef::CONSTRUCTOR.to_string(),
            candidates: count,
        }),
    }
}

/// Find the override of `method` that a receiver of class `runtime_class_id`
/// actually runs. Classes from the runtime class up to (not including) the
/// declaring class are searched.
pub fn find_override(
    registry: &ClassRegistry,
    runtime_class_id: usize,
    declaring_class_id: usize,
    method: &MethodDef,
) -> Option<(usize, String, MethodDef)> {
    if runtime_class_id == declaring_class_id || !is_subclass_of(registry, runtime_class_id, declaring_class_id) {
        return None;
    }
    for class in get_class_hierarchy(registry, runtime_class_id) {
        if class.id == declaring_class_id {
            break;
        }
        let found = class
            .methods_named(&method.name)
            .find(|m| !m.is_static && m.params == method.params);
        if let Some(m) = found {
            return Some((class.id, class.name.clone(), m.clone()));
        }
    }
    None
}

fn class_label(registry: &ClassRegistry, class_id: usize) -> String {
    registry
        .get_class(class_id)
        .map(|c| c.name.clone())
        .unwrap_or_else(|| format!("#{}", class_id))
}

fn arg_classes(args: &[TypedArg]) -> Vec<String> {
    args.iter().map(|a| a.class_name.clone()).collect()
}

enum Selection {
    Found(Resolved),
    NotFound,
    Ambiguous(usize),
}

fn select(
    registry: &ClassRegistry,
    config: &RuntimeConfig,
    candidates: &[(&Class, &MethodDef)],
    args: &[TypedArg],
) -> Selection {
    let mut best: Option<(usize, usize, Vec<Value>)> = None;
    let mut ties = 0;

    for (index, (_, method)) in candidates.iter().enumerate() {
        let Some((exact, converted)) = applicable(registry, config, method, args) else {
            continue;
        };
        match best.as_ref().map(|(best_exact, _, _)| *best_exact) {
            Some(best_exact) if exact < best_exact => {}
            Some(best_exact) if exact == best_exact => ties += 1,
            _ => {
                best = Some((exact, index, converted));
                ties = 1;
            }
        }
    }

    match best {
        None => Selection::NotFound,
        Some(_) if ties > 1 && config.overloads == OverloadPolicy::RejectAmbiguous => Selection::Ambiguous(ties),
        Some((_, index, args)) => {
            let (class, method) = candidates[index];
            Selection::Found(Resolved {
                class_id: class.id,
                class_name: class.name.clone(),
                method: method.clone(),
                args,
            })
        }
    }
}

/// Number of exact matches and converted arguments, if every argument fits
fn applicable(
    registry: &ClassRegistry,
    config: &RuntimeConfig,
    method: &MethodDef,
    args: &[TypedArg],
) -> Option<(usize, Vec<Value>)> {
    let mut exact = 0;
    let mut converted = Vec::with_capacity(args.len());
    for (arg, param) in args.iter().zip(&method.params) {
        if arg.class_name == *param {
            exact += 1;
            converted.push(arg.value.clone());
        } else if arg.value.is_null() {
            if !registry.contains(param) {
                return None;
            }
            converted.push(Value::Null);
        } else if is_assignable(registry, &arg.class_name, param) {
            converted.push(arg.value.clone());
        } else if config.numeric_widening {
            converted.push(widen(&arg.value, &arg.class_name, param)?);
        } else {
            return None;
        }
    }
    Some((exact, converted))
}

/// Primitive widening conversion from class `from` to class `to`
pub fn widen(value: &Value, from: &str, to: &str) -> Option<Value> {
    use class_names::*;

    let allowed: &[&str] = match from {
        BYTE => &[SHORT, INTEGER, LONG, FLOAT, DOUBLE],
        SHORT | CHARACTER => &[INTEGER, LONG, FLOAT, DOUBLE],
        INTEGER => &[LONG, FLOAT, DOUBLE],
        LONG => &[FLOAT, DOUBLE],
        FLOAT => &[DOUBLE],
        _ => return None,
    };
    if !allowed.contains(&to) {
        return None;
    }

    let long = match value {
        Value::Char(c) => Some(*c as i64),
        other => other.to_i64_lossless(),
    };
    let double = long.map(|i| i as f64).or_else(|| value.to_f64_lossy())?;

    Some(match to {
        SHORT => Value::I16(i16::try_from(long?).ok()?),
        INTEGER => Value::I32(i32::try_from(long?).ok()?),
        LONG => Value::I64(long?),
        FLOAT => Value::F32(double as f32),
        _ => Value::F64(double),
    })
}
