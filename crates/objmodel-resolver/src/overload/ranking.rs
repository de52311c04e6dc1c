//! Pairwise ranking of viable candidates.
//!
//! Candidate F1 is better than F2 when no argument converts worse for F1
//! and at least one converts better. The best candidate must be better
//! than every other; otherwise the call is ambiguous.
//!
//! Per argument, in order:
//!
//! 1. lower conversion cost
//! 2. between two derived-to-base conversions, the nearer base
//! 3. identity over a qualification conversion
//! 4. between two reference bindings of an rvalue, `T&&` over `T&`
//! 5. between two reference bindings, the less const-qualified referent
//!
//! A by-value parameter and a reference parameter with the same cost are
//! indistinguishable.

use std::cmp::Ordering;

use objmodel_core::{CompilationError, RefQualifier, Span};

use super::{ObjectMatch, OverloadMatch};
use crate::context::ResolutionContext;
use crate::conversion::{ArgMatch, ConversionKind, ReferenceBinding};

/// Compare how well two parameters accept the same argument.
///
/// `Less` means `a` is the better match.
pub(crate) fn compare_args(a: &ArgMatch, b: &ArgMatch) -> Ordering {
    a.conversion
        .cost
        .cmp(&b.conversion.cost)
        .then_with(|| compare_kinds(&a.conversion.kind, &b.conversion.kind))
        .then_with(|| compare_bindings(a.binding, b.binding))
}

fn compare_kinds(a: &ConversionKind, b: &ConversionKind) -> Ordering {
    match (a, b) {
        (
            ConversionKind::DerivedToBase { depth: da, .. },
            ConversionKind::DerivedToBase { depth: db, .. },
        ) => da.cmp(db),
        (ConversionKind::Identity, ConversionKind::Qualification) => Ordering::Less,
        (ConversionKind::Qualification, ConversionKind::Identity) => Ordering::Greater,
        _ => Ordering::Equal,
    }
}

fn compare_bindings(a: Option<ReferenceBinding>, b: Option<ReferenceBinding>) -> Ordering {
    let (Some(a), Some(b)) = (a, b) else {
        return Ordering::Equal;
    };
    if a.binds_rvalue && b.binds_rvalue && a.to_rvalue_ref != b.to_rvalue_ref {
        return if a.to_rvalue_ref {
            Ordering::Less
        } else {
            Ordering::Greater
        };
    }
    a.referent_const.cmp(&b.referent_const)
}

/// Compare the implicit object parameters of two member functions.
fn compare_objects(a: &ObjectMatch, b: &ObjectMatch) -> Ordering {
    let both_qualified =
        a.ref_qualifier != RefQualifier::None && b.ref_qualifier != RefQualifier::None;
    if both_qualified && a.object_is_rvalue && a.ref_qualifier != b.ref_qualifier {
        return if a.ref_qualifier == RefQualifier::Rvalue {
            Ordering::Less
        } else {
            Ordering::Greater
        };
    }
    a.method_const.cmp(&b.method_const)
}

/// Whether `a` is a better candidate than `b`.
fn is_better(a: &OverloadMatch, b: &OverloadMatch) -> bool {
    let object = match (&a.object, &b.object) {
        (Some(oa), Some(ob)) => Some(compare_objects(oa, ob)),
        _ => None,
    };
    let mut any_better = false;
    for ordering in object
        .into_iter()
        .chain(a.args.iter().zip(&b.args).map(|(x, y)| compare_args(x, y)))
    {
        match ordering {
            Ordering::Greater => return false,
            Ordering::Less => any_better = true,
            Ordering::Equal => {}
        }
    }
    any_better
}

/// Select the single best candidate.
pub fn find_best_match(
    ctx: &ResolutionContext<'_>,
    viable: &[OverloadMatch],
    span: Span,
) -> Result<OverloadMatch, CompilationError> {
    match viable {
        [] => {
            return Err(CompilationError::Internal {
                message: "ranking called without viable candidates".to_string(),
            });
        }
        [only] => return Ok(only.clone()),
        _ => {}
    }

    for (i, candidate) in viable.iter().enumerate() {
        let beats_all = viable
            .iter()
            .enumerate()
            .all(|(j, other)| i == j || is_better(candidate, other));
        if beats_all {
            return Ok(candidate.clone());
        }
    }

    // Report every candidate no other candidate beats.
    let tied: Vec<&OverloadMatch> = viable
        .iter()
        .filter(|c| !viable.iter().any(|o| is_better(o, c)))
        .collect();
    Err(ambiguous_overload_error(ctx, &tied, span))
}

fn ambiguous_overload_error(
    ctx: &ResolutionContext<'_>,
    tied: &[&OverloadMatch],
    span: Span,
) -> CompilationError {
    let name = tied
        .first()
        .and_then(|m| ctx.get_function(m.func_hash))
        .map(|f| f.qualified_name.clone())
        .unwrap_or_else(|| "unknown".to_string());
    let candidates = tied
        .iter()
        .map(|m| {
            ctx.get_function(m.func_hash)
                .map(|f| ctx.format_signature(f))
                .unwrap_or_else(|| m.func_hash.to_string())
        })
        .collect::<Vec<_>>()
        .join(" and ");
    CompilationError::AmbiguousOverload {
        name,
        candidates,
        span,
    }
}
