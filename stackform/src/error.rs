//! Error types for the stackform library.
//!
//! This module provides the error hierarchy for all operations in the
//! stackform library, using `thiserror` for ergonomic error handling.
//!
//! Hard failures are [`Error`] values. Recoverable, informational
//! conditions (unmodeled document features, dependency cycles, dangling
//! references) are [`Warning`] values returned alongside results and are
//! never raised as errors.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for operations that may fail with a stackform error.
///
/// # Examples
///
/// ```
/// use stackform::{Error, Result};
///
/// fn example_operation() -> Result<u16> {
///     Ok(8080)
/// }
/// ```
pub type Result<T> = std::result::Result<T, Error>;

/// The main error type for the stackform library.
#[derive(Debug, Error)]
pub enum Error {
    /// A service record or collection failed validation.
    ///
    /// Validation errors are always surfaced to the caller and never
    /// auto-corrected.
    #[error("validation error for '{field}': {message}")]
    Validation {
        /// The field that failed validation.
        field: String,
        /// A description of the validation failure.
        message: String,
    },

    /// A document being decoded has no recognizable structure.
    ///
    /// This aborts the whole import.
    #[error("format error: {message}")]
    Format {
        /// A description of the structural problem.
        message: String,
    },

    /// A YAML serialization or parse error occurred.
    #[error("document error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// A JSON serialization or parse error occurred.
    #[error("persistence error: {0}")]
    Json(#[from] serde_json::Error),

    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// An invalid filesystem path was provided.
    #[error("invalid path {}: {reason}", path.display())]
    InvalidPath {
        /// The invalid path.
        path: PathBuf,
        /// The reason the path is invalid.
        reason: String,
    },

    /// The requested resource was not found.
    #[error("not found: {resource}")]
    NotFound {
        /// The resource that was not found.
        resource: String,
    },
}

impl Error {
    /// Construct a validation error.
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Construct a format error.
    pub fn format(message: impl Into<String>) -> Self {
        Self::Format {
            message: message.into(),
        }
    }

    /// Check if error is a validation failure.
    ///
    /// # Examples
    ///
    /// ```
    /// use stackform::Error;
    ///
    /// let err = Error::validation("name", "must be non-empty");
    /// assert!(err.is_validation());
    /// ```
    #[must_use]
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation { .. })
    }

    /// Check if error indicates an unusable input document.
    ///
    /// # Examples
    ///
    /// ```
    /// use stackform::Error;
    ///
    /// let err = Error::format("no services section");
    /// assert!(err.is_format());
    /// ```
    #[must_use]
    pub fn is_format(&self) -> bool {
        matches!(self, Self::Format { .. })
    }
}

/// A non-blocking condition reported alongside an operation's result.
///
/// Warnings never abort the operation that produced them. Callers decide
/// whether to surface them to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Warning {
    /// The decoded document uses fields the record model does not represent.
    ///
    /// The named features are not reconstructed into service records; the
    /// caller must retain the original document if it needs them for a
    /// replace-vs-merge re-export decision.
    AdvancedFeatures {
        /// Names of the unmodeled features, in discovery order.
        features: Vec<String>,
    },

    /// A dependency cycle exists between the named services.
    Cycle {
        /// Service names forming the cycle, in traversal order.
        members: Vec<String>,
    },

    /// A `depends_on` entry names a service not present in the collection.
    ///
    /// Tolerated because collections are edited incrementally.
    DanglingDependency {
        /// The service carrying the reference.
        service: String,
        /// The missing dependency name.
        dependency: String,
    },

    /// A service entry was skipped during a lenient operation.
    SkippedService {
        /// The service name, or a positional placeholder if unnamed.
        name: String,
        /// Why the entry was skipped.
        reason: String,
    },
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AdvancedFeatures { features } => {
                write!(f, "advanced features detected: {}", features.join(", "))
            }
            Self::Cycle { members } => {
                write!(f, "dependency cycle: {}", members.join(" -> "))
            }
            Self::DanglingDependency {
                service,
                dependency,
            } => {
                write!(f, "'{service}' depends on unknown service '{dependency}'")
            }
            Self::SkippedService { name, reason } => {
                write!(f, "skipped service '{name}': {reason}")
            }
        }
    }
}
