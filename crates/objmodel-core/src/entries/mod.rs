//! Registry entry types.
//!
//! - [`ClassDecl`] / [`ClassEntry`]: classes, before and after registration
//! - [`FunctionDef`] / [`FunctionEntry`]: functions and their identities
//! - [`FieldEntry`], [`StaticConstEntry`]: data members
//! - [`VTable`], [`Behaviors`]: dispatch and lifecycle tables

mod behaviors;
mod class;
mod field;
mod function;
mod vtable;

pub use behaviors::Behaviors;
pub use class::{ClassDecl, ClassEntry};
pub use field::{FieldEntry, StaticConstEntry};
pub use function::{
    BaseInit, FunctionBody, FunctionDef, FunctionEntry, FunctionKind, FunctionTraits, MemberInit,
    Param, RefQualifier, SpecialMember,
};
pub use vtable::VTable;
