//! Top-level error type for the [`Model`](crate::Model) facade.

use thiserror::Error;

use objmodel_core::{CompilationError, RegistrationError};

/// Errors reported by [`Model`](crate::Model).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ModelError {
    /// A class or function declaration was rejected.
    #[error("registration failed: {0}")]
    Registration(#[from] RegistrationError),

    /// The completion pass found errors in the declared classes.
    #[error("completion failed with {} error(s)", .0.len())]
    CompletionFailed(Vec<RegistrationError>),

    /// A call site could not be resolved.
    #[error(transparent)]
    Compilation(#[from] CompilationError),

    /// The model is already complete; no more declarations are accepted.
    #[error("model is already complete - cannot declare after complete()")]
    AlreadyComplete,

    /// The model must be completed before resolving call sites.
    #[error("model is not complete - call complete() before resolving")]
    NotComplete,
}

impl ModelError {
    /// Split into the underlying registration errors.
    ///
    /// Variants without underlying registration errors return an empty vector.
    pub fn into_registration_errors(self) -> Vec<RegistrationError> {
        match self {
            ModelError::Registration(err) => vec![err],
            ModelError::CompletionFailed(errors) => errors,
            _ => Vec::new(),
        }
    }

    /// The call-site error, if this is one.
    pub fn as_compilation(&self) -> Option<&CompilationError> {
        match self {
            ModelError::Compilation(err) => Some(err),
            _ => None,
        }
    }
}
