//! Overload resolution for function and member calls.
//!
//! ## Algorithm
//!
//! 1. Filter candidates by argument count
//! 2. For member functions, check the implicit object parameter: a const
//!    object needs a const member, a `&`-qualified member needs an lvalue
//!    object (unless it is also const), a `&&`-qualified member needs an
//!    rvalue object
//! 3. Match each argument against its parameter (conversion plus reference
//!    binding)
//! 4. Rank viable candidates pairwise and select the one better than all
//!    others
//! 5. Report a deleted winner as an error: deleted functions take part in
//!    resolution but cannot be called

mod ranking;

pub use ranking::find_best_match;
pub(crate) use ranking::compare_args;

use objmodel_core::{
    CompilationError, ExprInfo, FunctionEntry, RefQualifier, Span, TypeHash, ValueCategory,
};

use crate::context::ResolutionContext;
use crate::conversion::{ArgMatch, BindFailure, match_argument};

/// The object expression of a member call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImplicitObject {
    /// Whether the object is const.
    pub is_const: bool,
    /// The object expression's value category.
    pub category: ValueCategory,
}

impl ImplicitObject {
    /// A modifiable lvalue object.
    pub fn lvalue() -> Self {
        Self {
            is_const: false,
            category: ValueCategory::Lvalue,
        }
    }

    /// The object designated by an expression.
    pub fn from_expr(expr: &ExprInfo) -> Self {
        Self {
            is_const: expr.is_const(),
            category: expr.category,
        }
    }
}

/// How a member function's implicit object parameter matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ObjectMatch {
    /// The member's ref-qualifier.
    pub ref_qualifier: RefQualifier,
    /// Whether the member is const.
    pub method_const: bool,
    /// Whether the object expression is an rvalue.
    pub object_is_rvalue: bool,
}

/// Result of successful overload resolution.
#[derive(Debug, Clone, PartialEq)]
pub struct OverloadMatch {
    /// The selected function.
    pub func_hash: TypeHash,
    /// The implicit object match, for member functions.
    pub object: Option<ObjectMatch>,
    /// Match of each argument, in order.
    pub args: Vec<ArgMatch>,
    /// Sum of argument conversion costs.
    pub total_cost: u32,
}

/// Why a candidate is not viable.
#[derive(Debug, Clone, PartialEq)]
enum Rejection {
    Arity { expected: usize, got: usize },
    Object(String),
    Argument(BindFailure),
}

/// Resolve a call among free functions or constructors.
pub fn resolve_overload(
    ctx: &ResolutionContext<'_>,
    candidates: &[TypeHash],
    args: &[ExprInfo],
    span: Span,
) -> Result<OverloadMatch, CompilationError> {
    resolve_candidates(ctx, candidates, None, args, span)
}

/// Resolve a member call, taking the object expression into account.
pub fn resolve_method_overload(
    ctx: &ResolutionContext<'_>,
    candidates: &[TypeHash],
    object: ImplicitObject,
    args: &[ExprInfo],
    span: Span,
) -> Result<OverloadMatch, CompilationError> {
    resolve_candidates(ctx, candidates, Some(object), args, span)
}

#[tracing::instrument(level = "trace", skip(ctx, candidates, args), fields(candidates = candidates.len()))]
fn resolve_candidates(
    ctx: &ResolutionContext<'_>,
    candidates: &[TypeHash],
    object: Option<ImplicitObject>,
    args: &[ExprInfo],
    span: Span,
) -> Result<OverloadMatch, CompilationError> {
    if candidates.is_empty() {
        return Err(CompilationError::Internal {
            message: "no candidates for overload resolution".to_string(),
        });
    }

    let mut viable = Vec::with_capacity(candidates.len());
    let mut rejections = Vec::new();
    for &hash in candidates {
        let func = ctx.require_function(hash)?;
        match try_match_candidate(ctx, func, object, args) {
            Ok(m) => viable.push(m),
            Err(rejection) => rejections.push(rejection),
        }
    }

    if viable.is_empty() {
        let func = ctx.require_function(candidates[0])?;
        return Err(match (candidates, rejections.pop()) {
            ([_], Some(rejection)) => single_candidate_error(func, rejection, span),
            _ => no_matching_overload_error(ctx, func, args, span),
        });
    }

    let best = find_best_match(ctx, &viable, span)?;
    let func = ctx.require_function(best.func_hash)?;
    if func.def.is_deleted() {
        return Err(CompilationError::DeletedFunction {
            name: ctx.format_signature(func),
            span,
        });
    }
    tracing::trace!(selected = %func.qualified_name, cost = best.total_cost, "overload selected");
    Ok(best)
}

fn try_match_candidate(
    ctx: &ResolutionContext<'_>,
    func: &FunctionEntry,
    object: Option<ImplicitObject>,
    args: &[ExprInfo],
) -> Result<OverloadMatch, Rejection> {
    let params = &func.def.params;
    if params.len() != args.len() {
        return Err(Rejection::Arity {
            expected: params.len(),
            got: args.len(),
        });
    }

    let object = match object {
        Some(object) if func.def.has_object_param() => {
            Some(match_object(func, object).map_err(Rejection::Object)?)
        }
        _ => None,
    };

    let mut matches = Vec::with_capacity(args.len());
    let mut total_cost = 0u32;
    for (arg, param) in args.iter().zip(params) {
        let m = match_argument(ctx, arg, &param.data_type).map_err(Rejection::Argument)?;
        total_cost = total_cost.saturating_add(m.conversion.cost);
        matches.push(m);
    }

    Ok(OverloadMatch {
        func_hash: func.func_hash,
        object,
        args: matches,
        total_cost,
    })
}

fn match_object(func: &FunctionEntry, object: ImplicitObject) -> Result<ObjectMatch, String> {
    let method_const = func.def.is_const();
    if object.is_const && !method_const {
        return Err(format!(
            "cannot call non-const member '{}' on a const object",
            func.qualified_name
        ));
    }
    match func.def.ref_qualifier {
        RefQualifier::Lvalue if object.category.is_rvalue() && !method_const => {
            return Err(format!(
                "'{}' is &-qualified and cannot be called on an rvalue",
                func.qualified_name
            ));
        }
        RefQualifier::Rvalue if !object.category.is_rvalue() => {
            return Err(format!(
                "'{}' is &&-qualified and cannot be called on an lvalue",
                func.qualified_name
            ));
        }
        _ => {}
    }
    Ok(ObjectMatch {
        ref_qualifier: func.def.ref_qualifier,
        method_const,
        object_is_rvalue: object.category.is_rvalue(),
    })
}

fn single_candidate_error(func: &FunctionEntry, rejection: Rejection, span: Span) -> CompilationError {
    match rejection {
        Rejection::Arity { expected, got } => CompilationError::ArgumentCountMismatch {
            name: func.qualified_name.clone(),
            expected,
            got,
            span,
        },
        Rejection::Object(message) => CompilationError::CannotBind { message, span },
        Rejection::Argument(failure) => CompilationError::CannotBind {
            message: failure.to_string(),
            span,
        },
    }
}

fn no_matching_overload_error(
    ctx: &ResolutionContext<'_>,
    func: &FunctionEntry,
    args: &[ExprInfo],
    span: Span,
) -> CompilationError {
    let args = args
        .iter()
        .map(|a| ctx.format_expr(a))
        .collect::<Vec<_>>()
        .join(", ");
    CompilationError::NoMatchingOverload {
        name: func.qualified_name.clone(),
        args,
        span,
    }
}
