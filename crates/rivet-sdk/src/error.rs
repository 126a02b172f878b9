//! Error types for invocations

/// Result type for invocation operations
pub type InvocationResult<T> = Result<T, InvocationError>;

/// Error raised by a method body.
///
/// Carries the name of the error class and a message, rendered as
/// `Class: message`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{class_name}: {message}")]
pub struct ThrownError {
    /// Error class name (e.g., "IllegalArgumentError")
    pub class_name: String,
    /// Human-readable message
    pub message: String,
}

impl ThrownError {
    /// Class name used for panics caught inside method bodies
    pub const PANIC: &'static str = "Panic";

    /// Create a thrown error of the given class
    pub fn new(class_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            class_name: class_name.into(),
            message: message.into(),
        }
    }

    /// Generic runtime failure
    pub fn runtime(message: impl Into<String>) -> Self {
        Self::new("RuntimeError", message)
    }

    /// Argument rejected by the method body
    pub fn illegal_argument(message: impl Into<String>) -> Self {
        Self::new("IllegalArgumentError", message)
    }

    /// Index outside of `0..len`
    pub fn index_out_of_bounds(index: i64, len: usize) -> Self {
        Self::new(
            "IndexOutOfBoundsError",
            format!("Index {} out of bounds for length {}", index, len),
        )
    }

    /// Text that does not parse as a number
    pub fn number_format(input: &str) -> Self {
        Self::new("NumberFormatError", format!("For input string: \"{}\"", input))
    }

    /// Argument or field of the wrong type
    pub fn type_mismatch(expected: &str, got: &str) -> Self {
        Self::new("TypeMismatchError", format!("expected {}, got {}", expected, got))
    }

    /// Panic caught while running a method body
    pub fn panic(message: impl Into<String>) -> Self {
        Self::new(Self::PANIC, message)
    }

    /// Check if this error was produced from a caught panic
    pub fn is_panic(&self) -> bool {
        self.class_name == Self::PANIC
    }
}

/// Invocation error types
#[derive(Debug, thiserror::Error)]
pub enum InvocationError {
    /// No class registered under the name
    #[error("Class not found: {0}")]
    ClassNotFound(String),

    /// No method matches the name and argument classes
    #[error("No method {class}.{method}({}) found", .args.join(", "))]
    MethodNotFound {
        /// Class the lookup started from
        class: String,
        /// Requested method name
        method: String,
        /// Classes of the supplied arguments
        args: Vec<String>,
    },

    /// No constructor matches the argument classes
    #[error("No constructor {class}({}) found", .args.join(", "))]
    ConstructorNotFound {
        /// Class being instantiated
        class: String,
        /// Classes of the supplied arguments
        args: Vec<String>,
    },

    /// More than one method matches equally well
    #[error("Ambiguous call {class}.{method}: {candidates} candidates match equally")]
    AmbiguousMethod {
        /// Class the lookup started from
        class: String,
        /// Requested method name
        method: String,
        /// Number of equally ranked candidates
        candidates: usize,
    },

    /// Instance method invoked without an instance
    #[error("Cannot invoke instance method '{method}' without an instance of {class}")]
    NoReceiver {
        /// Declared class of the handle
        class: String,
        /// Requested method name
        method: String,
    },

    /// Field lookup failed
    #[error("Field '{field}' not found in class '{class}'")]
    FieldNotFound {
        /// Class searched
        class: String,
        /// Requested field name
        field: String,
    },

    /// The method body raised an error
    #[error("Error while invoking {class}.{method}: {source}")]
    Thrown {
        /// Class declaring the invoked method
        class: String,
        /// Invoked method name
        method: String,
        /// Error raised by the body
        #[source]
        source: ThrownError,
    },

    /// Value is not assignable to the requested class
    #[error("Cannot cast {from} to {to}")]
    Casting {
        /// Runtime class of the value
        from: String,
        /// Requested class
        to: String,
    },

    /// Argument could not be coerced into its declared class
    #[error("Argument error: {0}")]
    Argument(String),

    /// JSON parsing or rendering failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Class registration failed
    #[error("Registry error: {0}")]
    Registry(String),

    /// Runtime configuration was rejected
    #[error("Configuration error: {0}")]
    Config(String),
}

impl InvocationError {
    /// Check if this is a cast failure
    pub fn is_cast_error(&self) -> bool {
        matches!(self, InvocationError::Casting { .. })
    }

    /// Check if no method or constructor matched
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            InvocationError::MethodNotFound { .. }
                | InvocationError::ConstructorNotFound { .. }
                | InvocationError::ClassNotFound(_)
                | InvocationError::FieldNotFound { .. }
        )
    }

    /// The error raised by the method body, if any
    pub fn thrown(&self) -> Option<&ThrownError> {
        match self {
            InvocationError::Thrown { source, .. } => Some(source),
            _ => None,
        }
    }
}
