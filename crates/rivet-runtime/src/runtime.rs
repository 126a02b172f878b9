//! Runtime facade
//!
//! `Runtime` owns the class registry and the configuration and implements
//! every invocation operation. It is cheap to clone; clones share state.
//!
//! The registry read lock is held while arguments are coerced and a method is
//! resolved, and released before the method body runs. Bodies are therefore
//! free to call back into the runtime.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use parking_lot::RwLock;
use rivet_sdk::{class_names, InvocationArg, InvocationError, InvocationResult, ObjectRef, ThrownError, Value};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::builtins::register_builtins;
use crate::class::{CallFrame, ClassDef, ClassKind, MethodDef};
use crate::class_registry::ClassRegistry;
use crate::coerce::coerce_arg;
use crate::config::RuntimeConfig;
use crate::introspection::{collect_fields, find_field, get_class_hierarchy, is_assignable, is_instance_of};
use crate::invocation::Invocation;
use crate::resolve::{find_override, resolve_constructor, resolve_method, Resolved, TypedArg};

struct RuntimeInner {
    registry: RwLock<ClassRegistry>,
    config: RuntimeConfig,
}

/// Dynamic invocation runtime
#[derive(Clone)]
pub struct Runtime {
    inner: Arc<RuntimeInner>,
}

/// Builder for `Runtime`
#[derive(Default)]
pub struct RuntimeBuilder {
    config: RuntimeConfig,
    classes: Vec<ClassDef>,
}

impl RuntimeBuilder {
    /// Create a builder with the default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Use `config`
    pub fn config(mut self, config: RuntimeConfig) -> Self {
        self.config = config;
        self
    }

    /// Register a class after the builtins
    pub fn class(mut self, def: ClassDef) -> Self {
        self.classes.push(def);
        self
    }

    /// Register several classes, in order
    pub fn classes(mut self, defs: impl IntoIterator<Item = ClassDef>) -> Self {
        self.classes.extend(defs);
        self
    }

    /// Build the runtime
    pub fn build(self) -> InvocationResult<Runtime> {
        self.config
            .validate()
            .map_err(|e| InvocationError::Config(e.to_string()))?;
        let mut registry = ClassRegistry::new();
        register_builtins(&mut registry)?;
        for def in self.classes {
            registry.register_class(def)?;
        }
        debug!(target: "rivet::invoke", classes = registry.len(), "runtime built");

        Ok(Runtime {
            inner: Arc::new(RuntimeInner {
                registry: RwLock::new(registry),
                config: self.config,
            }),
        })
    }
}

enum Instantiation {
    /// Value class: the constructor returns the instance
    Value(Resolved),
    /// Object class: run the constructor on a fresh allocation
    Object(ObjectRef, Resolved),
    /// Object class without constructors
    Allocated(ObjectRef),
}

impl Runtime {
    /// Start building a runtime
    pub fn builder() -> RuntimeBuilder {
        RuntimeBuilder::new()
    }

    /// Runtime with only the builtin classes and the default configuration
    pub fn new() -> InvocationResult<Self> {
        RuntimeBuilder::new().build()
    }

    /// Active configuration
    pub fn config(&self) -> &RuntimeConfig {
        &self.inner.config
    }

    // ========================================================================
    // Classes
    // ========================================================================

    /// Register a class on a running runtime
    pub fn register_class(&self, def: ClassDef) -> InvocationResult<usize> {
        let name = def.name().to_string();
        let id = self.inner.registry.write().register_class(def)?;
        debug!(target: "rivet::invoke", class = %name, id, "registered class");
        Ok(id)
    }

    /// Check if a class is registered
    pub fn has_class(&self, class_name: &str) -> bool {
        self.inner.registry.read().contains(class_name)
    }

    /// Class names from `class_name` up to the root
    pub fn class_hierarchy(&self, class_name: &str) -> InvocationResult<Vec<String>> {
        let registry = self.inner.registry.read();
        let class = registry.require(class_name)?;
        Ok(get_class_hierarchy(&registry, class.id)
            .into_iter()
            .map(|c| c.name.clone())
            .collect())
    }

    /// Check whether class `from` may be typed as `to`
    pub fn is_assignable(&self, from: &str, to: &str) -> bool {
        is_assignable(&self.inner.registry.read(), from, to)
    }

    // ========================================================================
    // Handles
    // ========================================================================

    /// Handle standing for a class, used as a static invocation target
    pub fn class_handle(&self, class_name: &str) -> InvocationResult<Invocation> {
        self.inner.registry.read().require(class_name)?;
        Ok(Invocation::for_class(self.clone(), class_name))
    }

    /// Wrap an existing value, declared as `class_name`
    pub fn wrap(&self, value: Value, class_name: &str) -> InvocationResult<Invocation> {
        {
            let registry = self.inner.registry.read();
            registry.require(class_name)?;
            if !is_instance_of(&registry, &value, class_name) {
                return Err(InvocationError::Casting {
                    from: value.runtime_class().unwrap_or("null").to_string(),
                    to: class_name.to_string(),
                });
            }
        }
        Ok(Invocation::new(self.clone(), value, class_name))
    }

    /// Instantiate `class_name` with a constructor matching `args`
    pub fn create_instance(&self, class_name: &str, args: &[InvocationArg]) -> InvocationResult<Invocation> {
        let plan = {
            let registry = self.inner.registry.read();
            let class = registry.require(class_name)?;
            let typed = self.prepare_args(&registry, args)?;
            match class.kind {
                ClassKind::Value => {
                    Instantiation::Value(resolve_constructor(&registry, &self.inner.config, class.id, &typed)?)
                }
                ClassKind::Object => {
                    let fields = collect_fields(&registry, class.id)
                        .into_iter()
                        .map(|f| (f.name.clone(), f.default.clone()));
                    let obj = ObjectRef::with_fields(class.id, class.name.clone(), fields);
                    if class.constructors.is_empty() && typed.is_empty() {
                        Instantiation::Allocated(obj)
                    } else {
                        let ctor = resolve_constructor(&registry, &self.inner.config, class.id, &typed)?;
                        Instantiation::Object(obj, ctor)
                    }
                }
            }
        };

        debug!(target: "rivet::invoke", class = %class_name, args = args.len(), "create instance");
        let value = match plan {
            Instantiation::Allocated(obj) => Value::Object(obj),
            Instantiation::Object(obj, ctor) => {
                let this = Value::Object(obj);
                self.call_body(class_name, &ctor.method, Some(&this), &ctor.args)?;
                this
            }
            Instantiation::Value(ctor) => {
                let value = self.call_body(class_name, &ctor.method, None, &ctor.args)?;
                self.check_returned(class_name, &ctor.method, &value)?;
                value
            }
        };
        Ok(Invocation::new(self.clone(), value, class_name))
    }

    // ========================================================================
    // Invocation
    // ========================================================================

    /// Invoke an instance method on the value wrapped by `target`
    pub fn invoke(&self, target: &Invocation, method: &str, args: &[InvocationArg]) -> InvocationResult<Invocation> {
        if target.is_class_handle() || target.value().is_null() {
            return Err(InvocationError::NoReceiver {
                class: target.class_name().to_string(),
                method: method.to_string(),
            });
        }

        let (declaring, method_def, call_args) = {
            let registry = self.inner.registry.read();
            let class = registry.require(target.class_name())?;
            let typed = self.prepare_args(&registry, args)?;
            let resolved = resolve_method(&registry, &self.inner.config, class.id, method, false, &typed)?;

            let runtime_class_id = match target.value() {
                Value::Object(obj) => Some(obj.class_id()),
                other => other.runtime_class().and_then(|name| registry.id_of(name)),
            };
            let overridden = runtime_class_id
                .and_then(|id| find_override(&registry, id, resolved.class_id, &resolved.method));
            match overridden {
                Some((_, class_name, method_def)) => (class_name, method_def, resolved.args),
                None => (resolved.class_name, resolved.method, resolved.args),
            }
        };

        debug!(
            target: "rivet::invoke",
            receiver = %target.class_name(),
            class = %declaring,
            method = %method_def.signature(),
            "invoke"
        );
        let value = self.call_body(&declaring, &method_def, Some(target.value()), &call_args)?;
        self.typed_result(&declaring, &method_def, value)
    }

    /// Invoke a static method of `class_name` (or one it inherits)
    pub fn invoke_static(&self, class_name: &str, method: &str, args: &[InvocationArg]) -> InvocationResult<Invocation> {
        let resolved = {
            let registry = self.inner.registry.read();
            let class = registry.require(class_name)?;
            let typed = self.prepare_args(&registry, args)?;
            resolve_method(&registry, &self.inner.config, class.id, method, true, &typed)?
        };

        debug!(
            target: "rivet::invoke",
            class = %resolved.class_name,
            method = %resolved.method.signature(),
            "invoke static"
        );
        let value = self.call_body(&resolved.class_name, &resolved.method, None, &resolved.args)?;
        self.typed_result(&resolved.class_name, &resolved.method, value)
    }

    /// Retype `from` as `class_name`.
    ///
    /// Assignability is checked against the wrapped value's runtime class, so
    /// a handle upcast earlier can be cast back down. Null casts to any class.
    pub fn cast(&self, from: &Invocation, class_name: &str) -> InvocationResult<Invocation> {
        {
            let registry = self.inner.registry.read();
            registry.require(class_name)?;
            if let Some(runtime_class) = from.value().runtime_class() {
                if !is_assignable(&registry, runtime_class, class_name) {
                    debug!(target: "rivet::invoke", from = %runtime_class, to = %class_name, "cast rejected");
                    return Err(InvocationError::Casting {
                        from: runtime_class.to_string(),
                        to: class_name.to_string(),
                    });
                }
            }
        }
        debug!(target: "rivet::invoke", from = %from.class_name(), to = %class_name, "cast");
        Ok(Invocation::new(self.clone(), from.value().clone(), class_name))
    }

    /// Read field `name` of the instance wrapped by `target`
    pub fn field(&self, target: &Invocation, name: &str) -> InvocationResult<Invocation> {
        let obj = match target.value() {
            Value::Object(obj) => obj,
            Value::Null => {
                return Err(InvocationError::NoReceiver {
                    class: target.class_name().to_string(),
                    method: name.to_string(),
                })
            }
            other => {
                return Err(InvocationError::FieldNotFound {
                    class: other.runtime_class().unwrap_or(class_names::OBJECT).to_string(),
                    field: name.to_string(),
                })
            }
        };

        let value = obj.get_field(name).ok_or_else(|| InvocationError::FieldNotFound {
            class: obj.class_name().to_string(),
            field: name.to_string(),
        })?;
        let declared = find_field(&self.inner.registry.read(), obj.class_id(), name).map(|f| f.class_name.clone());
        let declared = declared
            .unwrap_or_else(|| value.runtime_class().unwrap_or(class_names::OBJECT).to_string());
        Ok(Invocation::new(self.clone(), value, declared))
    }

    /// Deserialize the value wrapped by `invocation`
    pub fn to_rust<T: DeserializeOwned>(&self, invocation: Invocation) -> InvocationResult<T> {
        invocation.to_rust()
    }

    // ========================================================================
    // Internals
    // ========================================================================

    fn prepare_args(&self, registry: &ClassRegistry, args: &[InvocationArg]) -> InvocationResult<Vec<TypedArg>> {
        args.iter()
            .map(|arg| match arg {
                InvocationArg::Json(json) => Ok(TypedArg::new(
                    coerce_arg(registry, &self.inner.config, json)?,
                    json.class_name.clone(),
                )),
                InvocationArg::Handle { value, class_name } => {
                    registry.require(class_name)?;
                    if !is_instance_of(registry, value, class_name) {
                        return Err(InvocationError::Casting {
                            from: value.runtime_class().unwrap_or("null").to_string(),
                            to: class_name.clone(),
                        });
                    }
                    Ok(TypedArg::new(value.clone(), class_name.clone()))
                }
            })
            .collect()
    }

    fn call_body(
        &self,
        class_name: &str,
        method: &MethodDef,
        this: Option<&Value>,
        args: &[Value],
    ) -> InvocationResult<Value> {
        let frame = CallFrame {
            runtime: self,
            class_name,
            method_name: &method.name,
            this,
        };

        let outcome = if self.inner.config.catch_panics {
            panic::catch_unwind(AssertUnwindSafe(|| (method.body)(&frame, args))).unwrap_or_else(|panic| {
                let msg = panic_message(panic.as_ref());
                warn!(target: "rivet::invoke", class = %class_name, method = %method.name, panic = %msg, "method body panicked");
                Err(ThrownError::panic(msg))
            })
        } else {
            (method.body)(&frame, args)
        };

        outcome.map_err(|source| {
            warn!(target: "rivet::invoke", class = %class_name, method = %method.name, error = %source, "method body raised");
            InvocationError::Thrown {
                class: class_name.to_string(),
                method: method.name.clone(),
                source,
            }
        })
    }

    /// Fail when a body returned something its declared return class forbids
    fn check_returned(&self, class_name: &str, method: &MethodDef, value: &Value) -> InvocationResult<()> {
        let fits = if method.returns == class_names::VOID {
            value.is_null()
        } else {
            is_instance_of(&self.inner.registry.read(), value, &method.returns)
        };
        if fits {
            return Ok(());
        }
        Err(InvocationError::Thrown {
            class: class_name.to_string(),
            method: method.name.clone(),
            source: ThrownError::type_mismatch(&method.returns, value.runtime_class().unwrap_or("null")),
        })
    }

    fn typed_result(&self, class_name: &str, method: &MethodDef, value: Value) -> InvocationResult<Invocation> {
        self.check_returned(class_name, method, &value)?;
        Ok(Invocation::new(self.clone(), value, method.returns.clone()))
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "Unknown panic".to_string()
    }
}
