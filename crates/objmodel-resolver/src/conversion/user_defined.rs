//! User-defined conversions through converting constructors.
//!
//! A converting constructor is a non-explicit constructor callable with a
//! single argument. Copy and move constructors are not conversions. The
//! constructor's parameter is matched with standard conversions only, so
//! chains of user-defined conversions never form.

use std::cmp::Ordering;

use objmodel_core::{ExprInfo, TypeHash};

use super::{ArgMatch, Conversion, ConversionKind, match_standard};
use crate::context::ResolutionContext;
use crate::overload::compare_args;

/// Find a user-defined conversion from `arg` to class `target`.
///
/// Returns `None` when no converting constructor accepts the argument, or
/// when two accept it equally well.
pub fn find_user_conversion(
    ctx: &ResolutionContext<'_>,
    arg: &ExprInfo,
    target: TypeHash,
) -> Option<Conversion> {
    let class = ctx.get_class(target)?;
    if class.is_abstract {
        return None;
    }

    let mut best: Option<(TypeHash, ArgMatch)> = None;
    let mut ambiguous = false;

    for &ctor_hash in &class.behaviors.constructors {
        let Some(ctor) = ctx.get_function(ctor_hash) else {
            continue;
        };
        if !ctor.def.is_converting() || ctor.def.is_deleted() {
            continue;
        }
        let param = &ctor.def.params[0].data_type;
        if param.type_hash == target && !param.is_pointer {
            continue;
        }
        let Ok(m) = match_standard(ctx, arg, param) else {
            continue;
        };
        match &best {
            None => best = Some((ctor_hash, m)),
            Some((_, current)) => match compare_args(&m, current) {
                Ordering::Less => {
                    best = Some((ctor_hash, m));
                    ambiguous = false;
                }
                Ordering::Equal => ambiguous = true,
                Ordering::Greater => {}
            },
        }
    }

    if ambiguous {
        tracing::trace!(target = %class.name, "ambiguous converting constructors");
        return None;
    }
    best.map(|(constructor, _)| Conversion {
        kind: ConversionKind::ConstructorConversion { constructor },
        cost: Conversion::COST_USER_DEFINED,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use objmodel_core::{ClassDecl, DataType, FunctionDef, Param, primitives};
    use objmodel_registry::SymbolRegistry;

    fn int() -> DataType {
        DataType::simple(primitives::INT32)
    }

    #[test]
    fn converting_constructor_is_found() {
        let mut registry = SymbolRegistry::new();
        registry
            .declare_class(
                ClassDecl::new("Meters")
                    .with_function(FunctionDef::constructor("Meters", vec![Param::new("v", int())])),
            )
            .unwrap();
        let ctx = ResolutionContext::new(&registry);
        let target = TypeHash::from_name("Meters");

        let conv = find_user_conversion(&ctx, &ExprInfo::temporary(int()), target).unwrap();
        assert!(conv.is_user_defined());
        // short promotes to int before the constructor runs
        let short = ExprInfo::temporary(DataType::simple(primitives::INT16));
        assert!(find_user_conversion(&ctx, &short, target).is_some());
    }

    #[test]
    fn explicit_constructor_does_not_convert() {
        let mut registry = SymbolRegistry::new();
        registry
            .declare_class(ClassDecl::new("Meters").with_function(
                FunctionDef::constructor("Meters", vec![Param::new("v", int())]).as_explicit(),
            ))
            .unwrap();
        let ctx = ResolutionContext::new(&registry);
        assert!(
            find_user_conversion(&ctx, &ExprInfo::temporary(int()), TypeHash::from_name("Meters"))
                .is_none()
        );
    }

    #[test]
    fn equally_good_constructors_are_ambiguous() {
        let mut registry = SymbolRegistry::new();
        registry
            .declare_class(
                ClassDecl::new("Value")
                    .with_function(FunctionDef::constructor(
                        "Value",
                        vec![Param::new("v", DataType::simple(primitives::INT64))],
                    ))
                    .with_function(FunctionDef::constructor(
                        "Value",
                        vec![Param::new("v", DataType::simple(primitives::DOUBLE))],
                    )),
            )
            .unwrap();
        let ctx = ResolutionContext::new(&registry);
        assert!(
            find_user_conversion(&ctx, &ExprInfo::temporary(int()), TypeHash::from_name("Value"))
                .is_none()
        );
    }
}
