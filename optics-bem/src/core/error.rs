//! Error types for excitation assignment and geometry validation.
//!
//! All of these are configuration errors of the current run: they are raised to the
//! immediate caller at assignment or construction time and are never retried here.

use thiserror::Error;

/// Errors raised by the geometry model and the excitation registry.
#[derive(Debug, Error)]
pub enum ExcitationError {
    /// An assignment referenced a name that is not a group of the geometry.
    #[error("unknown electrode group '{name}'")]
    UnknownGroup {
        /// The name that was not found
        name: String,
    },

    /// A boundary value cannot be used for the requested excitation kind.
    #[error("unsupported value for '{name}': {reason}")]
    UnsupportedValue {
        /// Group the value was assigned to
        name: String,
        /// Why the value was rejected
        reason: String,
    },

    /// The geometry tables are inconsistent.
    #[error("invalid geometry: {0}")]
    InvalidGeometry(String),

    /// An excitation configuration could not be read or parsed.
    #[error("excitation config error: {0}")]
    Config(String),
}

/// A specialized `Result` type for excitation operations.
pub type Result<T> = std::result::Result<T, ExcitationError>;

impl ExcitationError {
    /// Returns `true` if this error rejected an assignment.
    ///
    /// This includes `UnknownGroup` and `UnsupportedValue`.
    pub fn is_assignment_error(&self) -> bool {
        matches!(
            self,
            ExcitationError::UnknownGroup { .. } | ExcitationError::UnsupportedValue { .. }
        )
    }

    /// Returns `true` if the geometry itself was rejected.
    pub fn is_geometry_error(&self) -> bool {
        matches!(self, ExcitationError::InvalidGeometry(_))
    }

    /// Returns `true` if a configuration file or string was rejected.
    pub fn is_config_error(&self) -> bool {
        matches!(self, ExcitationError::Config(_))
    }

    pub(crate) fn unsupported(name: &str, reason: impl Into<String>) -> Self {
        ExcitationError::UnsupportedValue {
            name: name.to_string(),
            reason: reason.into(),
        }
    }
}
