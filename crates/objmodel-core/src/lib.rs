//! Core types for the object model.
//!
//! ## Modules
//!
//! - [`type_hash`]: Deterministic identities for classes and members
//! - [`primitives`]: Built-in scalar types
//! - `data_type`: Types with const, pointer and reference qualifiers
//! - `expr_info`: Types and value categories of argument expressions
//! - [`entries`]: Class and function declarations and registry entries
//! - `const_expr` / `const_value`: Constant expressions and their values
//! - [`runtime`]: Owning handles and categorized values
//! - `error`: Registration and call-site errors
//! - `config`: Layout target and completion options

mod config;
mod const_expr;
mod const_value;
mod data_type;
pub mod entries;
mod error;
mod expr_info;
pub mod primitives;
pub mod runtime;
mod span;
pub mod type_hash;
mod visibility;

pub use config::{ModelConfig, TargetLayout};
pub use const_expr::{BinaryOp, ConstExpr, UnaryOp};
pub use const_value::{ConstValue, FieldValue, ObjectValue};
pub use data_type::{DataType, RefKind};
pub use entries::{
    BaseInit, Behaviors, ClassDecl, ClassEntry, FieldEntry, FunctionBody, FunctionDef,
    FunctionEntry, FunctionKind, FunctionTraits, MemberInit, Param, RefQualifier, SpecialMember,
    StaticConstEntry, VTable,
};
pub use error::{CompilationError, RegistrationError};
pub use expr_info::{ExprInfo, ValueCategory};
pub use primitives::PrimitiveKind;
pub use runtime::{Capability, Categorized, DefaultRelease, ReleasePolicy, UniqueHandle};
pub use span::Span;
pub use type_hash::TypeHash;
pub use visibility::Visibility;
