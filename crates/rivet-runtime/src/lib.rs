//! Rivet runtime - dynamic method invocation over a class registry
//!
//! Classes are registered with Rust closures as method bodies. Callers then
//! work entirely through `Invocation` handles: create instances, invoke
//! instance and static methods by name with JSON-described arguments, cast
//! handles along the hierarchy and convert results back to Rust types.
//!
//! # Example
//!
//! ```ignore
//! use rivet_runtime::{ClassDef, Invocation, InvocationArg, Runtime, Value};
//!
//! let runtime = Runtime::builder()
//!     .class(
//!         ClassDef::builder("Counter")
//!             .field("n", "Integer", Value::i32(0))
//!             .method("add", &["Integer"], "Integer", |frame, args| {
//!                 let n = frame.get_field("n")?.as_i32().unwrap_or(0) + args[0].as_i32().unwrap_or(0);
//!                 frame.set_field("n", Value::i32(n))?;
//!                 Ok(Value::i32(n))
//!             })
//!             .build(),
//!     )
//!     .build()?;
//!
//! let counter = runtime.create_instance("Counter", &[])?;
//! let n: i32 = counter.invoke("add", &[InvocationArg::from(2)])?.to_rust()?;
//! ```

#![warn(missing_docs)]

pub mod builtins;
pub mod class;
pub mod class_registry;
pub mod coerce;
pub mod config;
pub mod introspection;
pub mod invocation;
pub mod logging;
pub mod resolve;
pub mod runtime;

pub use class::{CallFrame, ClassBuilder, ClassDef, ClassKind, FieldDef, MethodBody, MethodDef};
pub use class_registry::ClassRegistry;
pub use config::{ConfigError, OverloadPolicy, RuntimeConfig};
pub use invocation::Invocation;
pub use runtime::{Runtime, RuntimeBuilder};

pub use rivet_sdk::{
    arg, class_names, FromValue, IntoValue, InvocationArg, InvocationError, InvocationResult, JsonArg, ObjectRef,
    ThrownError, Value,
};
