//! Member name lookup and access checking.
//!
//! Lookup starts at the declared class and walks toward the root. The first
//! class that declares the name ends the search: every same-named member
//! further up is hidden, whatever its parameter list.
//!
//! ```text
//! class Base    { int value(); int value(int); };
//! class Derived : Base { int value(double); };
//!
//! Derived d; d.value();   // error: Derived::value hides both Base overloads
//! Base& b = d; b.value(); // Base::value()
//! ```

use objmodel_core::{
    ClassEntry, CompilationError, FieldEntry, Span, StaticConstEntry, TypeHash, Visibility,
};

use crate::context::ResolutionContext;

/// What a member name denotes in the class that declares it.
#[derive(Debug, Clone, Copy)]
pub enum MemberKind<'a> {
    /// One or more member functions (an overload set).
    Methods(&'a [TypeHash]),
    /// An instance field.
    Field(&'a FieldEntry),
    /// A static constant member.
    Static(&'a StaticConstEntry),
}

/// Result of a successful lookup.
#[derive(Debug, Clone, Copy)]
pub struct FoundMember<'a> {
    /// The class whose declaration the lookup stopped at.
    pub owner: &'a ClassEntry,
    /// What the name denotes there.
    pub kind: MemberKind<'a>,
}

impl<'a> FoundMember<'a> {
    /// The overload set, if the name denotes member functions.
    pub fn methods(&self) -> Option<&'a [TypeHash]> {
        match self.kind {
            MemberKind::Methods(methods) => Some(methods),
            _ => None,
        }
    }
}

/// Find `name` as seen from `class`, applying name hiding.
pub fn lookup_member<'a>(
    ctx: &ResolutionContext<'a>,
    class: TypeHash,
    name: &str,
    span: Span,
) -> Result<FoundMember<'a>, CompilationError> {
    let start = ctx.require_class(class, span)?;

    for owner in ctx.registry().self_and_bases(class) {
        if !owner.declares(name) {
            continue;
        }
        let methods = owner.methods_named(name);
        let kind = if !methods.is_empty() {
            MemberKind::Methods(methods)
        } else if let Some(field) = owner.find_field(name) {
            MemberKind::Field(field)
        } else if let Some(member) = owner.find_static(name) {
            MemberKind::Static(member)
        } else {
            continue;
        };
        tracing::trace!(class = %start.name, owner = %owner.name, member = name, "member found");
        return Ok(FoundMember { owner, kind });
    }

    Err(CompilationError::UnknownMember {
        type_name: start.name.clone(),
        member: name.to_string(),
        span,
    })
}

/// Check that a member declared in `owner` with `visibility` may be named
/// from code in class `from` (`None` for code outside any class).
pub fn check_access(
    ctx: &ResolutionContext<'_>,
    owner: &ClassEntry,
    member: &str,
    visibility: Visibility,
    from: Option<TypeHash>,
    span: Span,
) -> Result<(), CompilationError> {
    let allowed = match visibility {
        Visibility::Public => true,
        Visibility::Protected => from.is_some_and(|f| ctx.is_same_or_derived(f, owner.type_hash)),
        Visibility::Private => from == Some(owner.type_hash),
    };
    if allowed {
        Ok(())
    } else {
        Err(CompilationError::InaccessibleMember {
            type_name: owner.name.clone(),
            member: member.to_string(),
            visibility,
            span,
        })
    }
}
