//! Call-site resolution over a completed registry.
//!
//! Every entry point takes a [`ResolutionContext`] borrowing a registry the
//! completion pass has finished, and answers one question about a call site:
//!
//! - [`dispatch`]: which function runs for `obj.member(args)`, statically or
//!   through the vtable, and what slicing keeps
//! - [`overload`]: which overload a call selects, by conversion rank and
//!   value category
//! - [`conversion`]: how one argument initializes one parameter
//! - [`construction`]: which constructor or assignment operator builds a
//!   by-value object
//! - [`deduction`]: forwarding-reference deduction and `forward`
//! - [`const_eval`]: constant evaluation of constructors and static members
//! - [`scope`]: locals, lifetime extension and destruction order

pub mod const_eval;
pub mod construction;
mod context;
pub mod conversion;
pub mod deduction;
pub mod dispatch;
pub mod lookup;
pub mod overload;
pub mod scope;

pub use const_eval::{
    ArgValue, EvalContext, eval_static, evaluate_constructor, evaluate_function, object_field_names,
};
pub use construction::{
    Assignment, AssignmentKind, Construction, ConstructionKind, ParamInit, initialize_parameter,
    select_assignment, select_constructor,
};
pub use context::ResolutionContext;
pub use conversion::{
    ArgMatch, BindFailure, Conversion, ConversionKind, ReferenceBinding, find_conversion,
    match_argument,
};
pub use deduction::{Deduction, deduce_by_reference, deduce_by_value, deduce_forwarding, forward, move_cast};
pub use dispatch::{Binding, Invocation, MemberCall, Resolution, resolve, resolve_call, resolve_destructor, slice};
pub use lookup::{FoundMember, MemberKind, check_access, lookup_member};
pub use overload::{ImplicitObject, ObjectMatch, OverloadMatch, resolve_method_overload, resolve_overload};
pub use scope::{Destroyed, LocalScope, LocalVar};
