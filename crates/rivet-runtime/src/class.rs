//! Class definitions
//!
//! A class is a named table of fields, constructors and methods. Method
//! bodies are Rust closures receiving a `CallFrame` and the already coerced
//! arguments.
//!
//! ```ignore
//! let dummy = ClassDef::builder("Dummy")
//!     .field("i", "Integer", Value::i32(0))
//!     .constructor(&["Integer"], |frame, args| {
//!         frame.set_field("i", args[0].clone())?;
//!         Ok(Value::Null)
//!     })
//!     .method("getI", &[], "Integer", |frame, _| frame.get_field("i"))
//!     .build();
//! ```

use std::fmt;
use std::sync::Arc;

use rivet_sdk::{class_names, ObjectRef, ThrownError, Value};
use rustc_hash::FxHashMap;

use crate::runtime::Runtime;

/// Signature shared by constructors, instance methods and static methods.
pub type MethodBody = Arc<dyn Fn(&CallFrame<'_>, &[Value]) -> Result<Value, ThrownError> + Send + Sync>;

// ============================================================================
// CallFrame
// ============================================================================

/// Context handed to a running method body.
pub struct CallFrame<'a> {
    pub(crate) runtime: &'a Runtime,
    pub(crate) class_name: &'a str,
    pub(crate) method_name: &'a str,
    pub(crate) this: Option<&'a Value>,
}

impl<'a> CallFrame<'a> {
    /// Runtime executing the call, for nested invocations
    pub fn runtime(&self) -> &'a Runtime {
        self.runtime
    }

    /// Class declaring the running method
    pub fn class_name(&self) -> &'a str {
        self.class_name
    }

    /// Name of the running method
    pub fn method_name(&self) -> &'a str {
        self.method_name
    }

    /// Receiver of an instance method or constructor
    pub fn this(&self) -> Result<&'a Value, ThrownError> {
        self.this.ok_or_else(|| {
            ThrownError::runtime(format!(
                "{}.{} has no receiver",
                self.class_name, self.method_name
            ))
        })
    }

    /// Receiver as a class instance
    pub fn this_object(&self) -> Result<&'a ObjectRef, ThrownError> {
        let this = self.this()?;
        this.as_object()
            .ok_or_else(|| ThrownError::type_mismatch("object", this.type_name()))
    }

    /// Read a field of the receiver
    pub fn get_field(&self, name: &str) -> Result<Value, ThrownError> {
        let obj = self.this_object()?;
        obj.get_field(name).ok_or_else(|| {
            ThrownError::runtime(format!("no field '{}' on {}", name, obj.class_name()))
        })
    }

    /// Write a field of the receiver
    pub fn set_field(&self, name: &str, value: Value) -> Result<(), ThrownError> {
        let obj = self.this_object()?;
        if !obj.has_field(name) {
            return Err(ThrownError::runtime(format!(
                "no field '{}' on {}",
                name,
                obj.class_name()
            )));
        }
        obj.set_field(name, value);
        Ok(())
    }
}

// ============================================================================
// Definitions
// ============================================================================

/// Declared instance field
#[derive(Debug, Clone)]
pub struct FieldDef {
    /// Field name
    pub name: String,
    /// Declared class of the field
    pub class_name: String,
    /// Value the field holds after allocation
    pub default: Value,
}

/// Constructor, instance method or static method
#[derive(Clone)]
pub struct MethodDef {
    /// Method name (`new` for constructors)
    pub name: String,
    /// Declared parameter classes
    pub params: Vec<String>,
    /// Declared return class (`Void` for none)
    pub returns: String,
    /// Whether the method is static
    pub is_static: bool,
    /// Implementation
    pub body: MethodBody,
}

impl MethodDef {
    /// Name given to constructors
    pub const CONSTRUCTOR: &'static str = "new";

    /// Render as `name(P1, P2)`
    pub fn signature(&self) -> String {
        format!("{}({})", self.name, self.params.join(", "))
    }

    /// Same name and parameter list
    pub fn same_signature(&self, other: &MethodDef) -> bool {
        self.name == other.name && self.params == other.params
    }
}

impl fmt::Debug for MethodDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MethodDef")
            .field("signature", &self.signature())
            .field("returns", &self.returns)
            .field("is_static", &self.is_static)
            .finish()
    }
}

/// How instances of a class come into existence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClassKind {
    /// Instances are allocated objects with a field table
    Object,
    /// Instances are plain values; constructors return them
    Value,
}

/// Unregistered class definition, produced by `ClassDef::builder`
#[derive(Debug, Clone)]
pub struct ClassDef {
    pub(crate) name: String,
    pub(crate) parent: Option<String>,
    pub(crate) kind: ClassKind,
    pub(crate) fields: Vec<FieldDef>,
    pub(crate) constructors: Vec<MethodDef>,
    pub(crate) methods: Vec<MethodDef>,
}

impl ClassDef {
    /// Start a definition. The parent defaults to `Object`.
    pub fn builder(name: impl Into<String>) -> ClassBuilder {
        ClassBuilder {
            def: ClassDef {
                name: name.into(),
                parent: Some(class_names::OBJECT.to_string()),
                kind: ClassKind::Object,
                fields: Vec::new(),
                constructors: Vec::new(),
                methods: Vec::new(),
            },
        }
    }

    /// Class name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Parent class name
    pub fn parent(&self) -> Option<&str> {
        self.parent.as_deref()
    }
}

/// Builder for `ClassDef`
pub struct ClassBuilder {
    def: ClassDef,
}

fn method_def<F>(name: &str, params: &[&str], returns: &str, is_static: bool, body: F) -> MethodDef
where
    F: Fn(&CallFrame<'_>, &[Value]) -> Result<Value, ThrownError> + Send + Sync + 'static,
{
    MethodDef {
        name: name.to_string(),
        params: params.iter().map(|p| p.to_string()).collect(),
        returns: returns.to_string(),
        is_static,
        body: Arc::new(body),
    }
}

impl ClassBuilder {
    /// Set the parent class
    pub fn extends(mut self, parent: impl Into<String>) -> Self {
        self.def.parent = Some(parent.into());
        self
    }

    /// Make this a hierarchy root (only meaningful for `Object`)
    pub(crate) fn root(mut self) -> Self {
        self.def.parent = None;
        self
    }

    /// Instances are values returned by constructors, not allocated objects
    pub(crate) fn value_class(mut self) -> Self {
        self.def.kind = ClassKind::Value;
        self
    }

    /// Declare an instance field
    pub fn field(mut self, name: &str, class_name: &str, default: Value) -> Self {
        self.def.fields.push(FieldDef {
            name: name.to_string(),
            class_name: class_name.to_string(),
            default,
        });
        self
    }

    /// Declare a constructor.
    ///
    /// For object classes the frame's receiver is the freshly allocated
    /// instance and the returned value is ignored. For value classes there is
    /// no receiver and the returned value is the instance.
    pub fn constructor<F>(mut self, params: &[&str], body: F) -> Self
    where
        F: Fn(&CallFrame<'_>, &[Value]) -> Result<Value, ThrownError> + Send + Sync + 'static,
    {
        let returns = self.def.name.clone();
        self.def
            .constructors
            .push(method_def(MethodDef::CONSTRUCTOR, params, &returns, false, body));
        self
    }

    /// Declare an instance method
    pub fn method<F>(mut self, name: &str, params: &[&str], returns: &str, body: F) -> Self
    where
        F: Fn(&CallFrame<'_>, &[Value]) -> Result<Value, ThrownError> + Send + Sync + 'static,
    {
        self.def.methods.push(method_def(name, params, returns, false, body));
        self
    }

    /// Declare a static method
    pub fn static_method<F>(mut self, name: &str, params: &[&str], returns: &str, body: F) -> Self
    where
        F: Fn(&CallFrame<'_>, &[Value]) -> Result<Value, ThrownError> + Send + Sync + 'static,
    {
        self.def.methods.push(method_def(name, params, returns, true, body));
        self
    }

    /// Finish the definition
    pub fn build(self) -> ClassDef {
        self.def
    }
}

// ============================================================================
// Registered class
// ============================================================================

/// A class as stored in the registry
#[derive(Debug, Clone)]
pub struct Class {
    /// Class ID
    pub id: usize,
    /// Class name
    pub name: String,
    /// Parent class ID (None for the root)
    pub parent_id: Option<usize>,
    /// Instance kind
    pub kind: ClassKind,
    /// Fields declared by this class (inherited ones live on ancestors)
    pub fields: Vec<FieldDef>,
    /// Constructors
    pub constructors: Vec<MethodDef>,
    /// Instance and static methods in declaration order
    pub methods: Vec<MethodDef>,
    method_lookup: FxHashMap<String, Vec<usize>>,
}

impl Class {
    pub(crate) fn from_def(id: usize, parent_id: Option<usize>, def: ClassDef) -> Self {
        let mut method_lookup: FxHashMap<String, Vec<usize>> = FxHashMap::default();
        for (index, method) in def.methods.iter().enumerate() {
            method_lookup.entry(method.name.clone()).or_default().push(index);
        }
        Self {
            id,
            name: def.name,
            parent_id,
            kind: def.kind,
            fields: def.fields,
            constructors: def.constructors,
            methods: def.methods,
            method_lookup,
        }
    }

    /// Methods declared by this class under `name`, in declaration order
    pub fn methods_named<'a>(&'a self, name: &str) -> impl Iterator<Item = &'a MethodDef> + 'a {
        self.method_lookup
            .get(name)
            .into_iter()
            .flatten()
            .map(move |index| &self.methods[*index])
    }

    /// Check if this class declares a method called `name`
    pub fn has_method(&self, name: &str) -> bool {
        self.method_lookup.contains_key(name)
    }

    /// Field declared by this class
    pub fn field(&self, name: &str) -> Option<&FieldDef> {
        self.fields.iter().find(|f| f.name == name)
    }
}
