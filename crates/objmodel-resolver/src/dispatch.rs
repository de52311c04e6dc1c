//! Member call dispatch: static binding, virtual dispatch and slicing.
//!
//! ## Two axes
//!
//! - Lookup and overload resolution use the declared (static) type. A
//!   member that is not visible from the declared type cannot be called,
//!   whatever the object really is.
//! - When the selected member is virtual and the object is reached through
//!   a reference or pointer, the call binds to the final overrider in the
//!   dynamic type's vtable. Otherwise the selected member itself runs.
//!
//! ```text
//! class Base    { int myFunc(); virtual int myVirtual(); };
//! class Derived : Base { int myFunc(); int myVirtual(); };
//!
//! Derived d; Base& b = d;
//! b.myFunc();     // Base::myFunc     (static)
//! b.myVirtual();  // Derived::myVirtual (virtual, slot 0)
//! Base s = d;     // slicing copy: s is a Base
//! s.myVirtual();  // Base::myVirtual
//! ```

use objmodel_core::{
    CompilationError, ExprInfo, ObjectValue, Span, TypeHash,
};
use objmodel_registry::destructor_signature;

use crate::const_eval::object_field_names;
use crate::context::ResolutionContext;
use crate::lookup::{check_access, lookup_member};
use crate::overload::{ImplicitObject, OverloadMatch, resolve_method_overload};

/// How the object of a member call is reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Invocation {
    /// Through a reference (`obj.m()` where `obj` is `D&`).
    Reference,
    /// Through a pointer (`ptr->m()`).
    Pointer,
    /// On an object of exactly the declared type (a by-value copy).
    Value,
    /// With a qualified name (`obj.Base::m()`), always statically bound.
    Qualified(TypeHash),
}

/// A member call site.
#[derive(Debug, Clone, PartialEq)]
pub struct MemberCall {
    /// Declared type of the object expression.
    pub declared: TypeHash,
    /// Most-derived type of the object.
    pub dynamic: TypeHash,
    /// Member name.
    pub member: String,
    /// Constness and value category of the object expression.
    pub object: ImplicitObject,
    /// Argument expressions.
    pub args: Vec<ExprInfo>,
    /// How the object is reached.
    pub invocation: Invocation,
    /// Class whose member function contains the call, if any.
    pub access_from: Option<TypeHash>,
    /// Call-site location.
    pub span: Span,
}

impl MemberCall {
    /// A call of `member` with no arguments on a modifiable lvalue whose
    /// dynamic type is its declared type, reached through a reference.
    pub fn new(declared: TypeHash, member: impl Into<String>) -> Self {
        Self {
            declared,
            dynamic: declared,
            member: member.into(),
            object: ImplicitObject::lvalue(),
            args: Vec::new(),
            invocation: Invocation::Reference,
            access_from: None,
            span: Span::default(),
        }
    }

    pub fn with_dynamic(mut self, dynamic: TypeHash) -> Self {
        self.dynamic = dynamic;
        self
    }

    pub fn with_args(mut self, args: Vec<ExprInfo>) -> Self {
        self.args = args;
        self
    }

    pub fn with_object(mut self, object: ImplicitObject) -> Self {
        self.object = object;
        self
    }

    pub fn with_invocation(mut self, invocation: Invocation) -> Self {
        self.invocation = invocation;
        self
    }

    pub fn from_class(mut self, class: TypeHash) -> Self {
        self.access_from = Some(class);
        self
    }

    pub fn at(mut self, span: Span) -> Self {
        self.span = span;
        self
    }
}

/// How a resolved call binds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Binding {
    /// Fixed at translation time.
    Static,
    /// Through the given vtable slot of the dynamic type.
    Virtual {
        /// The vtable slot.
        slot: u16,
    },
}

/// Outcome of resolving a member call.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    /// The member chosen by overload resolution from the declared type.
    pub selected: TypeHash,
    /// The function that runs.
    pub target: TypeHash,
    /// The class declaring `target`.
    pub owner: TypeHash,
    /// How the call binds.
    pub binding: Binding,
    /// Argument and object matches of the selected member.
    pub overload: OverloadMatch,
}

impl Resolution {
    /// Whether the call dispatches through the vtable.
    pub fn is_virtual(&self) -> bool {
        matches!(self.binding, Binding::Virtual { .. })
    }
}

/// Resolve a zero-argument call of `member` through a `declared`-typed
/// reference to an object whose most-derived type is `dynamic`.
pub fn resolve(
    ctx: &ResolutionContext<'_>,
    declared: TypeHash,
    dynamic: TypeHash,
    member: &str,
) -> Result<Resolution, CompilationError> {
    resolve_call(ctx, &MemberCall::new(declared, member).with_dynamic(dynamic))
}

/// Resolve a member call site.
#[tracing::instrument(level = "trace", skip(ctx, call), fields(member = %call.member))]
pub fn resolve_call(
    ctx: &ResolutionContext<'_>,
    call: &MemberCall,
) -> Result<Resolution, CompilationError> {
    let span = call.span;
    let declared = ctx.require_class(call.declared, span)?;

    // A by-value object is exactly its declared type.
    let dynamic_hash = match call.invocation {
        Invocation::Value => call.declared,
        _ => call.dynamic,
    };
    let dynamic = ctx.require_class(dynamic_hash, span)?;
    if !ctx.is_same_or_derived(dynamic_hash, call.declared) {
        return Err(CompilationError::NotDerived {
            declared: declared.name.clone(),
            dynamic: dynamic.name.clone(),
            span,
        });
    }

    let lookup_class = match call.invocation {
        Invocation::Qualified(qualifier) => {
            let named = ctx.require_class(qualifier, span)?;
            if !ctx.is_same_or_derived(call.declared, qualifier) {
                return Err(CompilationError::NotDerived {
                    declared: named.name.clone(),
                    dynamic: declared.name.clone(),
                    span,
                });
            }
            qualifier
        }
        _ => call.declared,
    };

    let found = lookup_member(ctx, lookup_class, &call.member, span)?;
    let candidates = found.methods().ok_or_else(|| CompilationError::CannotBind {
        message: format!("'{}::{}' is not a member function", found.owner.name, call.member),
        span,
    })?;
    let overload = resolve_method_overload(ctx, candidates, call.object, &call.args, span)?;
    let selected = ctx.require_function(overload.func_hash)?;
    check_access(
        ctx,
        found.owner,
        &call.member,
        selected.def.visibility,
        call.access_from,
        span,
    )?;

    let dispatches = matches!(call.invocation, Invocation::Reference | Invocation::Pointer);
    let (target, binding) = if selected.def.is_virtual() && dispatches {
        let slot = declared
            .vtable
            .slot_by_signature(selected.signature_hash)
            .ok_or_else(|| CompilationError::Internal {
                message: format!("virtual '{}' has no vtable slot", selected.qualified_name),
            })?;
        let target = dynamic
            .vtable
            .method_at(slot)
            .ok_or_else(|| CompilationError::Internal {
                message: format!("vtable of '{}' has no slot {slot}", dynamic.name),
            })?;
        (target, Binding::Virtual { slot })
    } else {
        (selected.func_hash, Binding::Static)
    };

    let target_fn = ctx.require_function(target)?;
    if target_fn.def.is_pure() {
        return Err(CompilationError::PureVirtualCall {
            type_name: dynamic.name.clone(),
            member: call.member.clone(),
            span,
        });
    }

    tracing::trace!(
        declared = %declared.name,
        dynamic = %dynamic.name,
        target = %target_fn.qualified_name,
        virtual_call = matches!(binding, Binding::Virtual { .. }),
        "resolved member call"
    );
    Ok(Resolution {
        selected: selected.func_hash,
        target,
        owner: target_fn.def.owner.unwrap_or(lookup_class),
        binding,
        overload,
    })
}

/// Resolve which destructor runs when an object of type `dynamic` is
/// destroyed through a `declared`-typed pointer.
///
/// Without a virtual destructor in `declared`, only `declared`'s
/// destructor runs.
pub fn resolve_destructor(
    ctx: &ResolutionContext<'_>,
    declared: TypeHash,
    dynamic: TypeHash,
    span: Span,
) -> Result<Resolution, CompilationError> {
    let declared_class = ctx.require_class(declared, span)?;
    let dynamic_class = ctx.require_class(dynamic, span)?;
    if !ctx.is_same_or_derived(dynamic, declared) {
        return Err(CompilationError::NotDerived {
            declared: declared_class.name.clone(),
            dynamic: dynamic_class.name.clone(),
            span,
        });
    }
    let selected = declared_class
        .behaviors
        .destructor
        .ok_or_else(|| CompilationError::Internal {
            message: format!("'{}' has no destructor", declared_class.name),
        })?;

    let (target, binding) = match declared_class.vtable.slot_by_signature(destructor_signature()) {
        Some(slot) => {
            let target = dynamic_class
                .vtable
                .method_at(slot)
                .ok_or_else(|| CompilationError::Internal {
                    message: format!("vtable of '{}' has no slot {slot}", dynamic_class.name),
                })?;
            (target, Binding::Virtual { slot })
        }
        None => (selected, Binding::Static),
    };
    let target_fn = ctx.require_function(target)?;
    Ok(Resolution {
        selected,
        target,
        owner: target_fn.def.owner.unwrap_or(declared),
        binding,
        overload: OverloadMatch {
            func_hash: selected,
            object: None,
            args: Vec::new(),
            total_cost: 0,
        },
    })
}

/// Copy the `target` subobject out of `value`, dropping every field the
/// derived part added. The result's dynamic type is `target`.
pub fn slice(
    ctx: &ResolutionContext<'_>,
    value: &ObjectValue,
    target: TypeHash,
    span: Span,
) -> Result<ObjectValue, CompilationError> {
    let target_class = ctx.require_class(target, span)?;
    if !ctx.is_same_or_derived(value.class, target) {
        return Err(CompilationError::NotDerived {
            declared: target_class.name.clone(),
            dynamic: ctx.type_name(value.class),
            span,
        });
    }

    let names = object_field_names(ctx, target, span)?;
    let fields: Vec<_> = value.fields.iter().take(names.len()).cloned().collect();
    if fields.len() != names.len() || fields.iter().zip(&names).any(|((got, _), want)| got != want) {
        return Err(CompilationError::Internal {
            message: format!(
                "object of '{}' does not start with a '{}' subobject",
                ctx.type_name(value.class),
                target_class.name
            ),
        });
    }
    tracing::trace!(from = %ctx.type_name(value.class), to = %target_class.name, "sliced object");
    Ok(ObjectValue {
        class: target,
        fields,
    })
}
