//! Rivet SDK - Lightweight types for writing rivet method bodies
//!
//! This crate provides the value, argument and error types shared by the
//! runtime and by code that registers classes with it, without depending on
//! the runtime itself.
//!
//! # Example
//!
//! ```ignore
//! use rivet_sdk::{arg, IntoValue, ThrownError, Value};
//!
//! fn method_with_arg(args: &[Value]) -> Result<Value, ThrownError> {
//!     let i: i32 = arg(args, 0)?;
//!     Ok(i.to_string().into_value())
//! }
//! ```

#![warn(missing_docs)]

pub mod arg;
pub mod convert;
pub mod error;
pub mod value;

pub use arg::{InvocationArg, JsonArg};
pub use convert::{arg, FromValue, IntoValue};
pub use error::{InvocationError, InvocationResult, ThrownError};
pub use value::{class_names, ObjectRef, Value};
