//! Constructor and assignment operator selection.
//!
//! A by-value parameter is a distinct local object. It is built from its
//! argument by one of the class's constructors, chosen by overload
//! resolution over the argument's value category:
//!
//! ```text
//! void take(Data d);
//!
//! Data x;
//! take(x);             // Data(const Data&)  copy
//! take(Data());        // Data(Data&&)       move
//! take(std::move(x));  // Data(Data&&)       move
//! ```
//!
//! A class that declares a copy constructor gets no implicit move
//! constructor, so rvalues fall back to the copy constructor.

use objmodel_core::{
    ClassEntry, CompilationError, DataType, ExprInfo, FunctionEntry, Span, SpecialMember, TypeHash,
};

use crate::context::ResolutionContext;
use crate::conversion::{ArgMatch, BindFailure, Conversion, find_conversion, match_argument};
use crate::overload::{ImplicitObject, OverloadMatch, resolve_method_overload, resolve_overload};

/// Which kind of constructor builds an object.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstructionKind {
    Default,
    Copy,
    Move,
    /// A single-argument constructor from another type.
    Converting,
    Other,
}

/// A selected constructor.
#[derive(Debug, Clone, PartialEq)]
pub struct Construction {
    /// The class being constructed.
    pub class: TypeHash,
    /// The selected constructor.
    pub constructor: TypeHash,
    /// What kind of constructor it is.
    pub kind: ConstructionKind,
    /// The argument matches.
    pub overload: OverloadMatch,
}

/// How a parameter is initialized from its argument.
#[derive(Debug, Clone, PartialEq)]
pub enum ParamInit {
    /// A reference parameter binds to the argument (or a temporary).
    Bound(ArgMatch),
    /// A scalar by-value parameter receives the converted value.
    Converted(Conversion),
    /// A class by-value parameter is constructed.
    Constructed {
        /// The constructor call.
        construction: Construction,
        /// The argument is of a derived class; only its base part is copied.
        sliced: bool,
    },
}

/// Which kind of assignment operator runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssignmentKind {
    Copy,
    Move,
    /// An assignment operator taking another type.
    Converting,
}

/// A resolved assignment.
#[derive(Debug, Clone, PartialEq)]
pub enum Assignment {
    /// Assignment to a scalar or pointer.
    Builtin(Conversion),
    /// A call of an assignment operator.
    Operator {
        /// What kind of operator it is.
        kind: AssignmentKind,
        /// The resolved call.
        overload: OverloadMatch,
    },
}

/// Select the constructor for direct initialization `T obj(args...)`.
pub fn select_constructor(
    ctx: &ResolutionContext<'_>,
    class: TypeHash,
    args: &[ExprInfo],
    span: Span,
) -> Result<Construction, CompilationError> {
    let entry = constructible(ctx, class, span)?;
    if entry.behaviors.constructors.is_empty() {
        return Err(no_constructor(ctx, entry, args, span));
    }
    let overload = resolve_overload(ctx, &entry.behaviors.constructors, args, span)?;
    construction(ctx, class, overload)
}

/// Determine how a parameter of type `param` is initialized from `arg`.
#[tracing::instrument(level = "trace", skip(ctx, arg, param))]
pub fn initialize_parameter(
    ctx: &ResolutionContext<'_>,
    arg: &ExprInfo,
    param: &DataType,
    span: Span,
) -> Result<ParamInit, CompilationError> {
    let bind_error = |failure: BindFailure| CompilationError::CannotBind {
        message: failure.to_string(),
        span,
    };

    if param.is_reference() {
        return match_argument(ctx, arg, param).map(ParamInit::Bound).map_err(bind_error);
    }

    let is_class = !param.is_pointer && ctx.get_class(param.type_hash).is_some();
    if !is_class {
        return find_conversion(ctx, arg, param, true)
            .map(ParamInit::Converted)
            .ok_or_else(|| {
                bind_error(BindFailure::NoConversion {
                    param: ctx.format_type(param),
                    arg: ctx.format_type(&arg.data_type),
                })
            });
    }

    let source = arg.data_type.referent().type_hash;
    let init = if ctx.is_same_or_derived(source, param.type_hash) {
        let construction = select_constructor(ctx, param.type_hash, std::slice::from_ref(arg), span)?;
        ParamInit::Constructed {
            construction,
            sliced: source != param.type_hash,
        }
    } else {
        // Copy-initialization from another type: only converting
        // constructors apply.
        let entry = constructible(ctx, param.type_hash, span)?;
        let converting: Vec<TypeHash> = entry
            .behaviors
            .constructors
            .iter()
            .copied()
            .filter(|h| {
                ctx.get_function(*h)
                    .is_some_and(|f| f.def.is_converting() && f.def.special_member().is_none())
            })
            .collect();
        if converting.is_empty() {
            return Err(bind_error(BindFailure::NoConversion {
                param: ctx.format_type(param),
                arg: ctx.format_type(&arg.data_type),
            }));
        }
        let overload = resolve_overload(ctx, &converting, std::slice::from_ref(arg), span)?;
        ParamInit::Constructed {
            construction: construction(ctx, param.type_hash, overload)?,
            sliced: false,
        }
    };
    if let ParamInit::Constructed { construction, sliced } = &init {
        tracing::trace!(kind = ?construction.kind, sliced, "parameter constructed");
    }
    Ok(init)
}

/// Select the assignment performed by `target = value`.
pub fn select_assignment(
    ctx: &ResolutionContext<'_>,
    target: &ExprInfo,
    value: &ExprInfo,
    span: Span,
) -> Result<Assignment, CompilationError> {
    let target_type = target.data_type;
    let class = (!target_type.is_pointer)
        .then(|| ctx.get_class(target_type.type_hash))
        .flatten();

    let Some(class) = class else {
        if target.is_const() {
            return Err(CompilationError::CannotBind {
                message: format!(
                    "cannot assign to '{}': it is const-qualified",
                    ctx.format_expr(target)
                ),
                span,
            });
        }
        if !target.is_lvalue() {
            return Err(CompilationError::CannotBind {
                message: format!("cannot assign to '{}': not an lvalue", ctx.format_expr(target)),
                span,
            });
        }
        return find_conversion(ctx, value, &target_type, true)
            .map(Assignment::Builtin)
            .ok_or_else(|| CompilationError::CannotBind {
                message: BindFailure::NoConversion {
                    param: ctx.format_type(&target_type),
                    arg: ctx.format_type(&value.data_type),
                }
                .to_string(),
                span,
            });
    };

    if class.behaviors.assignments.is_empty() {
        return Err(CompilationError::NoMatchingOverload {
            name: format!("{}::operator=", class.name),
            args: ctx.format_expr(value),
            span,
        });
    }
    let overload = resolve_method_overload(
        ctx,
        &class.behaviors.assignments,
        ImplicitObject::from_expr(target),
        std::slice::from_ref(value),
        span,
    )?;
    let func = ctx.require_function(overload.func_hash)?;
    let kind = match func.def.special_member() {
        Some(SpecialMember::CopyAssignment) => AssignmentKind::Copy,
        Some(SpecialMember::MoveAssignment) => AssignmentKind::Move,
        _ => AssignmentKind::Converting,
    };
    tracing::trace!(class = %class.name, ?kind, "assignment selected");
    Ok(Assignment::Operator { kind, overload })
}

fn constructible<'a>(
    ctx: &ResolutionContext<'a>,
    class: TypeHash,
    span: Span,
) -> Result<&'a ClassEntry, CompilationError> {
    let entry = ctx.require_class(class, span)?;
    if entry.is_abstract {
        return Err(CompilationError::AbstractInstantiation {
            type_name: entry.name.clone(),
            span,
        });
    }
    Ok(entry)
}

fn construction(
    ctx: &ResolutionContext<'_>,
    class: TypeHash,
    overload: OverloadMatch,
) -> Result<Construction, CompilationError> {
    let func = ctx.require_function(overload.func_hash)?;
    Ok(Construction {
        class,
        constructor: overload.func_hash,
        kind: construction_kind(func),
        overload,
    })
}

fn construction_kind(func: &FunctionEntry) -> ConstructionKind {
    match func.def.special_member() {
        Some(SpecialMember::DefaultConstructor) => ConstructionKind::Default,
        Some(SpecialMember::CopyConstructor) => ConstructionKind::Copy,
        Some(SpecialMember::MoveConstructor) => ConstructionKind::Move,
        _ if func.arity() == 1 => ConstructionKind::Converting,
        _ => ConstructionKind::Other,
    }
}

fn no_constructor(
    ctx: &ResolutionContext<'_>,
    class: &ClassEntry,
    args: &[ExprInfo],
    span: Span,
) -> CompilationError {
    CompilationError::NoMatchingOverload {
        name: class.name.clone(),
        args: args
            .iter()
            .map(|a| ctx.format_expr(a))
            .collect::<Vec<_>>()
            .join(", "),
        span,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use objmodel_core::{ClassDecl, FunctionDef, ModelConfig, Param, primitives};
    use objmodel_registry::{SymbolRegistry, TypeCompletionPass};

    fn completed(decls: Vec<ClassDecl>) -> SymbolRegistry {
        let mut registry = SymbolRegistry::new();
        for decl in decls {
            registry.declare_class(decl).unwrap();
        }
        let output = TypeCompletionPass::new(&mut registry, ModelConfig::default()).run();
        assert!(output.is_ok(), "{:?}", output.errors);
        registry
    }

    fn class(name: &str) -> DataType {
        DataType::simple(TypeHash::from_name(name))
    }

    fn constructed_kind(init: &ParamInit) -> ConstructionKind {
        match init {
            ParamInit::Constructed { construction, .. } => construction.kind,
            other => panic!("expected construction, got {other:?}"),
        }
    }

    #[test]
    fn by_value_parameter_copies_lvalues_and_moves_rvalues() {
        let registry = completed(vec![ClassDecl::new("Data")]);
        let ctx = ResolutionContext::new(&registry);
        let data = class("Data");
        let span = Span::default();

        let copy = initialize_parameter(&ctx, &ExprInfo::named(data), &data, span).unwrap();
        assert_eq!(constructed_kind(&copy), ConstructionKind::Copy);

        let from_const = initialize_parameter(&ctx, &ExprInfo::const_lvalue(data), &data, span).unwrap();
        assert_eq!(constructed_kind(&from_const), ConstructionKind::Copy);

        let temp = initialize_parameter(&ctx, &ExprInfo::temporary(data), &data, span).unwrap();
        assert_eq!(constructed_kind(&temp), ConstructionKind::Move);

        let moved = initialize_parameter(&ctx, &ExprInfo::named(data).moved(), &data, span).unwrap();
        assert_eq!(constructed_kind(&moved), ConstructionKind::Move);
    }

    #[test]
    fn declared_copy_constructor_suppresses_move() {
        let registry = completed(vec![ClassDecl::new("Legacy").with_function(FunctionDef::constructor(
            "Legacy",
            vec![Param::new("other", class("Legacy").as_const_ref())],
        ))]);
        let ctx = ResolutionContext::new(&registry);
        let legacy = class("Legacy");
        let init = initialize_parameter(&ctx, &ExprInfo::temporary(legacy), &legacy, Span::default()).unwrap();
        assert_eq!(constructed_kind(&init), ConstructionKind::Copy);
    }

    #[test]
    fn move_only_class_rejects_copies() {
        let registry = completed(vec![ClassDecl::new("Unique").with_function(FunctionDef::constructor(
            "Unique",
            vec![Param::new("other", class("Unique").as_rvalue_ref())],
        ))]);
        let ctx = ResolutionContext::new(&registry);
        let unique = class("Unique");
        let err = initialize_parameter(&ctx, &ExprInfo::named(unique), &unique, Span::default()).unwrap_err();
        assert!(matches!(err, CompilationError::DeletedFunction { .. }));
        assert!(initialize_parameter(&ctx, &ExprInfo::named(unique).moved(), &unique, Span::default()).is_ok());
    }

    #[test]
    fn derived_argument_is_sliced() {
        let registry = completed(vec![ClassDecl::new("Base"), ClassDecl::new("Derived").with_base("Base")]);
        let ctx = ResolutionContext::new(&registry);
        let init = initialize_parameter(
            &ctx,
            &ExprInfo::named(class("Derived")),
            &class("Base"),
            Span::default(),
        )
        .unwrap();
        assert!(matches!(
            init,
            ParamInit::Constructed { sliced: true, ref construction } if construction.kind == ConstructionKind::Copy
        ));
    }

    #[test]
    fn converting_constructor_must_not_be_explicit() {
        let int = DataType::simple(primitives::INT32);
        let registry = completed(vec![
            ClassDecl::new("Meters").with_function(FunctionDef::constructor("Meters", vec![Param::unnamed(int)])),
            ClassDecl::new("Seconds")
                .with_function(FunctionDef::constructor("Seconds", vec![Param::unnamed(int)]).as_explicit()),
        ]);
        let ctx = ResolutionContext::new(&registry);
        let arg = ExprInfo::temporary(int);
        let span = Span::default();

        let meters = initialize_parameter(&ctx, &arg, &class("Meters"), span).unwrap();
        assert_eq!(constructed_kind(&meters), ConstructionKind::Converting);
        assert!(matches!(
            initialize_parameter(&ctx, &arg, &class("Seconds"), span),
            Err(CompilationError::CannotBind { .. })
        ));
        // Direct initialization may use the explicit constructor.
        let direct = select_constructor(&ctx, TypeHash::from_name("Seconds"), &[arg], span).unwrap();
        assert_eq!(direct.kind, ConstructionKind::Converting);
    }

    #[test]
    fn scalar_and_reference_parameters() {
        let registry = completed(vec![]);
        let ctx = ResolutionContext::new(&registry);
        let int = DataType::simple(primitives::INT32);
        let double = DataType::simple(primitives::DOUBLE);
        let span = Span::default();

        assert!(matches!(
            initialize_parameter(&ctx, &ExprInfo::named(int), &double, span),
            Ok(ParamInit::Converted(_))
        ));
        assert!(matches!(
            initialize_parameter(&ctx, &ExprInfo::named(int), &int.as_lvalue_ref(), span),
            Ok(ParamInit::Bound(_))
        ));
        let err = initialize_parameter(&ctx, &ExprInfo::temporary(int), &int.as_lvalue_ref(), span).unwrap_err();
        assert_eq!(
            err.to_string(),
            format!("at {span}: cannot bind non-const lvalue reference of type 'int&' to an rvalue of type 'int'")
        );
    }

    #[test]
    fn abstract_class_cannot_be_constructed() {
        let registry = completed(vec![ClassDecl::new("Shape").with_function(
            FunctionDef::method("area", vec![], DataType::simple(primitives::DOUBLE)).as_pure(),
        )]);
        let ctx = ResolutionContext::new(&registry);
        assert!(matches!(
            select_constructor(&ctx, TypeHash::from_name("Shape"), &[], Span::default()),
            Err(CompilationError::AbstractInstantiation { .. })
        ));
    }

    #[test]
    fn assignment_follows_value_category() {
        let registry = completed(vec![ClassDecl::new("Data")]);
        let ctx = ResolutionContext::new(&registry);
        let data = class("Data");
        let target = ExprInfo::named(data);
        let span = Span::default();

        let copy = select_assignment(&ctx, &target, &ExprInfo::named(data), span).unwrap();
        assert!(matches!(copy, Assignment::Operator { kind: AssignmentKind::Copy, .. }));
        let mv = select_assignment(&ctx, &target, &ExprInfo::temporary(data), span).unwrap();
        assert!(matches!(mv, Assignment::Operator { kind: AssignmentKind::Move, .. }));

        let err = select_assignment(&ctx, &ExprInfo::const_lvalue(data), &ExprInfo::named(data), span)
            .unwrap_err();
        assert!(matches!(err, CompilationError::NoMatchingOverload { .. }));
    }

    #[test]
    fn builtin_assignment() {
        let registry = completed(vec![]);
        let ctx = ResolutionContext::new(&registry);
        let int = DataType::simple(primitives::INT32);
        let double = DataType::simple(primitives::DOUBLE);
        let span = Span::default();

        assert!(matches!(
            select_assignment(&ctx, &ExprInfo::named(int), &ExprInfo::temporary(double), span),
            Ok(Assignment::Builtin(_))
        ));
        assert!(select_assignment(&ctx, &ExprInfo::temporary(int), &ExprInfo::named(int), span).is_err());
        assert!(select_assignment(&ctx, &ExprInfo::const_lvalue(int), &ExprInfo::named(int), span).is_err());

        // `const int* p; p = q;` reassigns the pointer, not the pointee.
        let ptr = DataType::pointer(primitives::INT32, true);
        assert!(select_assignment(&ctx, &ExprInfo::named(ptr), &ExprInfo::named(ptr), span).is_ok());
    }
}
