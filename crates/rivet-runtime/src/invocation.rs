//! Invocation handles
//!
//! An `Invocation` is the uniform result of every dynamic call: a value plus
//! the class it is declared as. Handles are the receivers of further calls,
//! can be cast along the hierarchy and can be passed back as arguments.
//!
//! ```ignore
//! let dummy = runtime.create_instance("ChildDummy", &[])?;
//! let i = dummy.invoke("getI", &[])?;
//! let as_parent = Invocation::cast(&dummy, "Dummy")?;
//! let n: i32 = i.to_rust()?;
//! ```

use std::fmt;

use rivet_sdk::{InvocationArg, InvocationResult, Value};
use serde::de::DeserializeOwned;

use crate::runtime::Runtime;

/// A value produced by, or targeted by, a dynamic method call
#[derive(Clone)]
pub struct Invocation {
    runtime: Runtime,
    value: Value,
    class_name: String,
    class_handle: bool,
}

impl Invocation {
    pub(crate) fn new(runtime: Runtime, value: Value, class_name: impl Into<String>) -> Self {
        Self {
            runtime,
            value,
            class_name: class_name.into(),
            class_handle: false,
        }
    }

    pub(crate) fn for_class(runtime: Runtime, class_name: impl Into<String>) -> Self {
        Self {
            runtime,
            value: Value::Null,
            class_name: class_name.into(),
            class_handle: true,
        }
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    /// Wrapped value
    pub fn value(&self) -> &Value {
        &self.value
    }

    /// Take the wrapped value
    pub fn into_value(self) -> Value {
        self.value
    }

    /// Declared class
    pub fn class_name(&self) -> &str {
        &self.class_name
    }

    /// Class of the wrapped value itself (`None` for null)
    pub fn runtime_class_name(&self) -> Option<&str> {
        self.value.runtime_class()
    }

    /// Whether the handle stands for a class rather than an instance
    pub fn is_class_handle(&self) -> bool {
        self.class_handle
    }

    /// Runtime owning this handle
    pub fn runtime(&self) -> &Runtime {
        &self.runtime
    }

    // ========================================================================
    // Operations
    // ========================================================================

    /// Invoke an instance method on the wrapped value
    pub fn invoke(&self, method: &str, args: &[InvocationArg]) -> InvocationResult<Invocation> {
        self.runtime.invoke(self, method, args)
    }

    /// Invoke a static method of the declared class
    pub fn invoke_static(&self, method: &str, args: &[InvocationArg]) -> InvocationResult<Invocation> {
        self.runtime.invoke_static(&self.class_name, method, args)
    }

    /// Retype `from` as `class_name`, failing with a casting error when the
    /// wrapped value is not assignable to it
    pub fn cast(from: &Invocation, class_name: &str) -> InvocationResult<Invocation> {
        from.runtime.cast(from, class_name)
    }

    /// Read an instance field
    pub fn field(&self, name: &str) -> InvocationResult<Invocation> {
        self.runtime.field(self, name)
    }

    /// Render the wrapped value as JSON text
    pub fn to_json(&self) -> InvocationResult<String> {
        Ok(self.value.to_json()?.to_string())
    }

    /// Deserialize the wrapped value into a Rust type
    pub fn to_rust<T: DeserializeOwned>(&self) -> InvocationResult<T> {
        Ok(serde_json::from_value(self.value.to_json()?)?)
    }
}

impl fmt::Debug for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Invocation")
            .field("class", &self.class_name)
            .field("value", &self.value)
            .field("class_handle", &self.class_handle)
            .finish()
    }
}

impl From<Invocation> for InvocationArg {
    fn from(invocation: Invocation) -> Self {
        InvocationArg::from_value(invocation.value, invocation.class_name)
    }
}

impl From<&Invocation> for InvocationArg {
    fn from(invocation: &Invocation) -> Self {
        InvocationArg::from_value(invocation.value.clone(), invocation.class_name.clone())
    }
}
