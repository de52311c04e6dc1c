//! objmodel - dispatch, value-category and layout rules of a class model.
//!
//! Classes are declared into a [`Model`], completed once, then queried:
//!
//! - which function a member call runs, and whether through the vtable
//! - which overload a call selects given its arguments' value categories
//! - which constructor or assignment operator copies, moves or converts
//! - what a `constexpr` constructor or static member evaluates to
//! - `sizeof`, alignment and member offsets
//!
//! The runtime side lives in [`objmodel_core::runtime`]: [`UniqueHandle`],
//! an owning handle with a custom release policy, and [`Categorized`], a
//! value forwarded as owned or borrowed.
//!
//! The layers are available on their own as `objmodel_core`,
//! `objmodel_registry` and `objmodel_resolver`.

mod error;
mod model;

pub use error::ModelError;
pub use model::Model;

pub use objmodel_core::{Categorized, UniqueHandle};

/// Everything needed to declare classes and query a model.
pub mod prelude {
    pub use crate::{Model, ModelError};
    pub use objmodel_core::runtime::*;
    pub use objmodel_core::{
        BaseInit, BinaryOp, ClassDecl, CompilationError, ConstExpr, ConstValue, DataType,
        ExprInfo, FieldEntry, FieldValue, FunctionDef, MemberInit, ModelConfig, ObjectValue,
        Param, PrimitiveKind, RefQualifier, RegistrationError, Span, StaticConstEntry,
        TargetLayout, TypeHash, UnaryOp, ValueCategory, Visibility, primitives,
    };
    pub use objmodel_registry::{FieldLayout, ObjectLayout};
    pub use objmodel_resolver::{
        ArgValue, Assignment, AssignmentKind, Binding, Construction, ConstructionKind,
        EvalContext, ImplicitObject, Invocation, MemberCall, OverloadMatch, ParamInit,
        Resolution, deduce_by_reference, deduce_by_value, deduce_forwarding, forward, move_cast,
    };
}
