//! Error types for registration and resolution.
//!
//! ## Error Hierarchy
//!
//! ```text
//! RegistrationError  - class/member declaration errors (registry, completion)
//! CompilationError   - call-site errors (lookup, dispatch, overloads, constant evaluation)
//! ```
//!
//! Every failure the model reports is a translation-time failure: nothing
//! here corresponds to a runtime exception.

use thiserror::Error;

use crate::{Span, Visibility};

// ============================================================================
// Registration Errors
// ============================================================================

/// Errors that occur while declaring classes and members.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RegistrationError {
    /// A referenced type was not found.
    #[error("type not found: {0}")]
    TypeNotFound(String),

    /// A type with this name already exists.
    #[error("duplicate type: {0}")]
    DuplicateType(String),

    /// A member with the same signature already exists in the class.
    #[error("duplicate member: '{type_name}::{member}' is already declared with this signature")]
    DuplicateMember {
        /// The class name.
        type_name: String,
        /// The member name.
        member: String,
    },

    /// A class derives from a class marked `final`.
    #[error("'{type_name}' cannot derive from final class '{base}'")]
    FinalBase {
        /// The derived class name.
        type_name: String,
        /// The final base class name.
        base: String,
    },

    /// The inheritance graph has a cycle.
    #[error("circular inheritance involving '{0}'")]
    CircularInheritance(String),

    /// A method is marked `override` but overrides nothing.
    #[error("'{type_name}::{method}' is marked override but does not override a virtual method")]
    NothingToOverride {
        /// The class name.
        type_name: String,
        /// The method name.
        method: String,
    },

    /// A method overrides a base method marked `final`.
    #[error("'{type_name}::{method}' overrides final method of '{base}'")]
    OverridesFinal {
        /// The class name.
        type_name: String,
        /// The method name.
        method: String,
        /// The class declaring the final method.
        base: String,
    },

    /// The declaration is invalid.
    #[error("invalid declaration: {0}")]
    InvalidDeclaration(String),
}

// ============================================================================
// Compilation Errors
// ============================================================================

/// Errors reported at a call site.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CompilationError {
    /// A referenced type could not be found.
    #[error("at {span}: unknown type '{name}'")]
    UnknownType {
        /// The type name or hash that wasn't found.
        name: String,
        /// Where the type was referenced.
        span: Span,
    },

    /// A class contains itself by value, so its size is unbounded.
    #[error("at {span}: '{name}' is incomplete where its size is required")]
    IncompleteType {
        /// The class name.
        name: String,
        /// Where the size was required.
        span: Span,
    },

    /// The member name is not visible from the declared type.
    #[error("at {span}: no member named '{member}' in '{type_name}'")]
    UnknownMember {
        /// The declared type searched.
        type_name: String,
        /// The member name.
        member: String,
        /// Where the member was named.
        span: Span,
    },

    /// The member was found but may not be named from outside the class.
    #[error("at {span}: '{type_name}::{member}' is {visibility}")]
    InaccessibleMember {
        /// The class declaring the member.
        type_name: String,
        /// The member name.
        member: String,
        /// The member's access specifier.
        visibility: Visibility,
        /// Where the member was named.
        span: Span,
    },

    /// The dynamic type is not the declared type or derived from it.
    #[error("at {span}: '{dynamic}' is not '{declared}' or derived from it")]
    NotDerived {
        /// The declared type.
        declared: String,
        /// The dynamic type.
        dynamic: String,
        /// Where the object was used.
        span: Span,
    },

    /// No candidate accepts the arguments.
    #[error("at {span}: no matching overload for '{name}({args})'")]
    NoMatchingOverload {
        /// The function name.
        name: String,
        /// Description of the argument expressions.
        args: String,
        /// Where the call occurred.
        span: Span,
    },

    /// More than one candidate is best.
    #[error("at {span}: ambiguous call to '{name}': {candidates}")]
    AmbiguousOverload {
        /// The function name.
        name: String,
        /// The tied candidates.
        candidates: String,
        /// Where the call occurred.
        span: Span,
    },

    /// Overload resolution selected a deleted function.
    #[error("at {span}: call to deleted function '{name}'")]
    DeletedFunction {
        /// The function name.
        name: String,
        /// Where the call occurred.
        span: Span,
    },

    /// An object of an abstract class is created.
    #[error("at {span}: cannot create an object of abstract class '{type_name}'")]
    AbstractInstantiation {
        /// The abstract class.
        type_name: String,
        /// Where the object was created.
        span: Span,
    },

    /// A virtual call resolves to a pure virtual function with no overrider.
    #[error("at {span}: pure virtual call to '{type_name}::{member}'")]
    PureVirtualCall {
        /// The dynamic type.
        type_name: String,
        /// The member name.
        member: String,
        /// Where the call occurred.
        span: Span,
    },

    /// An expression cannot bind to a parameter or variable.
    #[error("at {span}: {message}")]
    CannotBind {
        /// Which binding rule failed.
        message: String,
        /// Where the binding occurred.
        span: Span,
    },

    /// A call needs more or fewer arguments.
    #[error("at {span}: {name} expects {expected} argument(s), got {got}")]
    ArgumentCountMismatch {
        /// The function name.
        name: String,
        /// Number of parameters.
        expected: usize,
        /// Number of arguments.
        got: usize,
        /// Where the call occurred.
        span: Span,
    },

    /// A constant context used a function that is not constant-evaluable.
    #[error("at {span}: '{name}' is not constexpr")]
    NotConstexpr {
        /// The function name.
        name: String,
        /// Where the call occurred.
        span: Span,
    },

    /// A constant context received a non-constant argument.
    #[error("at {span}: argument {index} is not a constant expression")]
    NonConstantArgument {
        /// Zero-based argument position.
        index: usize,
        /// Where the call occurred.
        span: Span,
    },

    /// A constant context left a field uninitialized.
    #[error("at {span}: field '{type_name}::{field}' is uninitialized in a constant expression")]
    UninitializedInConstant {
        /// The class name.
        type_name: String,
        /// The field name.
        field: String,
        /// Where the object was declared.
        span: Span,
    },

    /// Constant evaluation failed (division by zero, overflow, runtime operation).
    #[error("at {span}: {message}")]
    ConstEvalFailed {
        /// What went wrong.
        message: String,
        /// Where evaluation was requested.
        span: Span,
    },

    /// A local name is declared twice in the same block.
    #[error("at {new_span}: '{name}' is already declared in this block (at {original_span})")]
    VariableRedeclaration {
        /// The variable name.
        name: String,
        /// The first declaration.
        original_span: Span,
        /// The second declaration.
        new_span: Span,
    },

    /// A local name is used but was never declared.
    #[error("at {span}: undefined variable '{name}'")]
    UndefinedVariable {
        /// The variable name.
        name: String,
        /// Where the name was used.
        span: Span,
    },

    /// An internal invariant was violated.
    #[error("internal error: {message}")]
    Internal {
        /// Description of the violated invariant.
        message: String,
    },
}

impl CompilationError {
    /// Get the span where this error occurred.
    pub fn span(&self) -> Span {
        match self {
            CompilationError::UnknownType { span, .. } => *span,
            CompilationError::IncompleteType { span, .. } => *span,
            CompilationError::UnknownMember { span, .. } => *span,
            CompilationError::InaccessibleMember { span, .. } => *span,
            CompilationError::NotDerived { span, .. } => *span,
            CompilationError::NoMatchingOverload { span, .. } => *span,
            CompilationError::AmbiguousOverload { span, .. } => *span,
            CompilationError::DeletedFunction { span, .. } => *span,
            CompilationError::AbstractInstantiation { span, .. } => *span,
            CompilationError::PureVirtualCall { span, .. } => *span,
            CompilationError::CannotBind { span, .. } => *span,
            CompilationError::ArgumentCountMismatch { span, .. } => *span,
            CompilationError::NotConstexpr { span, .. } => *span,
            CompilationError::NonConstantArgument { span, .. } => *span,
            CompilationError::UninitializedInConstant { span, .. } => *span,
            CompilationError::ConstEvalFailed { span, .. } => *span,
            CompilationError::VariableRedeclaration { new_span, .. } => *new_span,
            CompilationError::UndefinedVariable { span, .. } => *span,
            CompilationError::Internal { .. } => Span::default(),
        }
    }

    /// Attach a call-site span to an error created without one.
    pub fn with_span(mut self, at: Span) -> Self {
        match &mut self {
            CompilationError::UnknownType { span, .. }
            | CompilationError::IncompleteType { span, .. }
            | CompilationError::UnknownMember { span, .. }
            | CompilationError::InaccessibleMember { span, .. }
            | CompilationError::NotDerived { span, .. }
            | CompilationError::NoMatchingOverload { span, .. }
            | CompilationError::AmbiguousOverload { span, .. }
            | CompilationError::DeletedFunction { span, .. }
            | CompilationError::AbstractInstantiation { span, .. }
            | CompilationError::PureVirtualCall { span, .. }
            | CompilationError::CannotBind { span, .. }
            | CompilationError::ArgumentCountMismatch { span, .. }
            | CompilationError::NotConstexpr { span, .. }
            | CompilationError::NonConstantArgument { span, .. }
            | CompilationError::UninitializedInConstant { span, .. }
            | CompilationError::ConstEvalFailed { span, .. }
            | CompilationError::VariableRedeclaration { new_span: span, .. }
            | CompilationError::UndefinedVariable { span, .. } => {
                if span.is_unknown() {
                    *span = at;
                }
            }
            CompilationError::Internal { .. } => {}
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registration_error_display() {
        let err = RegistrationError::NothingToOverride {
            type_name: "B".to_string(),
            method: "get".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "'B::get' is marked override but does not override a virtual method"
        );
    }

    #[test]
    fn compilation_error_display() {
        let err = CompilationError::UnknownMember {
            type_name: "Base".to_string(),
            member: "onlyInDerived".to_string(),
            span: Span::new(12, 7, 13),
        };
        assert_eq!(err.to_string(), "at 12:7: no member named 'onlyInDerived' in 'Base'");
    }

    #[test]
    fn with_span_fills_unknown_span_only() {
        let err = CompilationError::DeletedFunction {
            name: "Data".to_string(),
            span: Span::default(),
        }
        .with_span(Span::new(4, 2, 0));
        assert_eq!(err.span(), Span::new(4, 2, 0));

        let kept = CompilationError::DeletedFunction {
            name: "Data".to_string(),
            span: Span::new(1, 1, 0),
        }
        .with_span(Span::new(4, 2, 0));
        assert_eq!(kept.span(), Span::new(1, 1, 0));
    }

    #[test]
    fn internal_has_default_span() {
        let err = CompilationError::Internal {
            message: "x".to_string(),
        };
        assert_eq!(err.span(), Span::default());
    }
}
