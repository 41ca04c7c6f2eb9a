//! Errors raised while building a render mode.

use thiserror::Error;

use super::options::OptionTypeError;

/// Everything that can stop a render mode from being built.
///
/// Once a mode exists its hooks are infallible, so this type only ever comes
/// out of construction and registration.
#[derive(Error, Debug)]
pub enum RenderModeError {
    /// No registered primitive kind has this name.
    #[error("invalid primitive name: {0}")]
    NotFound(String),

    /// Storage for the primitives of a mode could not be reserved.
    #[error("failed to allocate {what}")]
    AllocationFailure {
        /// What was being allocated.
        what: String,
        #[source]
        source: std::collections::TryReserveError,
    },

    /// A primitive rejected its configuration in `start`.
    #[error("primitive \"{primitive}\" failed to start: {reason}")]
    ConstructionFailure {
        /// Kind name of the failing primitive.
        primitive: &'static str,
        /// Why it refused to start.
        reason: String,
    },

    /// An option had the wrong shape or type.
    #[error(transparent)]
    TypeMismatch(#[from] OptionTypeError),

    /// The mode description was not a list of primitives.
    #[error("mode is not a sequence type (found {0})")]
    SequenceTypeError(String),

    /// An entry of the mode description could not be read as a primitive.
    #[error("primitive descriptor {index} is malformed: {reason}")]
    InvalidDescriptor {
        /// Position of the entry in the mode description.
        index: usize,
        /// What was wrong with it.
        reason: String,
    },

    /// Two primitive kinds were registered under the same name.
    #[error("primitive kind \"{0}\" is already registered")]
    DuplicateKind(&'static str),
}

impl RenderModeError {
    /// Shorthand for a [`RenderModeError::ConstructionFailure`].
    pub fn construction(primitive: &'static str, reason: impl Into<String>) -> Self {
        Self::ConstructionFailure {
            primitive,
            reason: reason.into(),
        }
    }
}
