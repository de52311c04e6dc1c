//! Parameter initialization: by-value conversion and reference binding.
//!
//! ## Reference binding rules
//!
//! | parameter  | modifiable lvalue | const lvalue | rvalue          |
//! |------------|-------------------|--------------|-----------------|
//! | `T&`       | binds             | drops const  | not an lvalue   |
//! | `const T&` | binds             | binds        | binds           |
//! | `T&&`      | not an rvalue     | not an rvalue| binds (non-const)|
//!
//! When the argument's type is not reference-compatible with the referent
//! (an `int` passed to `const long&`), the argument is converted into a
//! temporary and the reference binds to that temporary. A temporary is an
//! rvalue: it can bind to `const T&` and `T&&`, never to `T&`.

use objmodel_core::{DataType, ExprInfo, ValueCategory};
use thiserror::Error;

use super::{Conversion, ConversionKind, find_conversion};
use crate::context::ResolutionContext;

/// How a reference parameter binds to its argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReferenceBinding {
    /// The parameter is an rvalue reference.
    pub to_rvalue_ref: bool,
    /// The referent is const-qualified.
    pub referent_const: bool,
    /// The bound object is an rvalue (the argument, or a temporary).
    pub binds_rvalue: bool,
    /// The reference binds to a temporary object.
    pub binds_temporary: bool,
}

/// Result of matching one argument against one parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArgMatch {
    /// The value conversion applied.
    pub conversion: Conversion,
    /// How the parameter binds, for reference parameters.
    pub binding: Option<ReferenceBinding>,
}

/// Why an argument cannot initialize a parameter.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BindFailure {
    /// `T&` given an rvalue.
    #[error("cannot bind non-const lvalue reference of type '{param}' to an rvalue of type '{arg}'")]
    RvalueToLvalueRef {
        /// The parameter type.
        param: String,
        /// The argument type.
        arg: String,
    },

    /// `T&&` given an lvalue.
    #[error("cannot bind rvalue reference of type '{param}' to lvalue of type '{arg}'")]
    LvalueToRvalueRef {
        /// The parameter type.
        param: String,
        /// The argument type.
        arg: String,
    },

    /// The binding would discard the argument's const qualifier.
    #[error("binding reference of type '{param}' to '{arg}' discards const qualifier")]
    DropsConst {
        /// The parameter type.
        param: String,
        /// The argument type.
        arg: String,
    },

    /// `T&` given an argument that needs conversion.
    #[error("cannot bind non-const lvalue reference of type '{param}' to a temporary converted from '{arg}'")]
    TemporaryToLvalueRef {
        /// The parameter type.
        param: String,
        /// The argument type.
        arg: String,
    },

    /// No conversion exists.
    #[error("no viable conversion from '{arg}' to '{param}'")]
    NoConversion {
        /// The parameter type.
        param: String,
        /// The argument type.
        arg: String,
    },
}

/// Match an argument against a parameter, allowing one user-defined
/// conversion.
pub fn match_argument(
    ctx: &ResolutionContext<'_>,
    arg: &ExprInfo,
    param: &DataType,
) -> Result<ArgMatch, BindFailure> {
    match_with(ctx, arg, param, true)
}

/// Match with standard conversions only (the parameter of a converting
/// constructor).
pub(crate) fn match_standard(
    ctx: &ResolutionContext<'_>,
    arg: &ExprInfo,
    param: &DataType,
) -> Result<ArgMatch, BindFailure> {
    match_with(ctx, arg, param, false)
}

fn match_with(
    ctx: &ResolutionContext<'_>,
    arg: &ExprInfo,
    param: &DataType,
    allow_user_defined: bool,
) -> Result<ArgMatch, BindFailure> {
    if param.is_reference() {
        return bind_reference(ctx, arg, param, allow_user_defined);
    }
    find_conversion(ctx, arg, param, allow_user_defined)
        .map(|conversion| ArgMatch {
            conversion,
            binding: None,
        })
        .ok_or_else(|| BindFailure::NoConversion {
            param: ctx.format_type(param),
            arg: ctx.format_type(&arg.data_type),
        })
}

fn bind_reference(
    ctx: &ResolutionContext<'_>,
    arg: &ExprInfo,
    param: &DataType,
    allow_user_defined: bool,
) -> Result<ArgMatch, BindFailure> {
    let referent = param.referent();
    let names = || (ctx.format_type(param), ctx.format_type(&arg.data_type));

    if let Some(conversion) = reference_compatible(ctx, arg, &referent) {
        if arg.is_const() && !referent.is_const {
            let (param, arg) = names();
            return Err(BindFailure::DropsConst { param, arg });
        }
        if param.is_lvalue_ref() && !referent.is_const && arg.is_rvalue() {
            let (param, arg) = names();
            return Err(BindFailure::RvalueToLvalueRef { param, arg });
        }
        if param.is_rvalue_ref() && arg.is_lvalue() {
            let (param, arg) = names();
            return Err(BindFailure::LvalueToRvalueRef { param, arg });
        }
        return Ok(ArgMatch {
            conversion,
            binding: Some(ReferenceBinding {
                to_rvalue_ref: param.is_rvalue_ref(),
                referent_const: referent.is_const,
                binds_rvalue: arg.is_rvalue(),
                binds_temporary: arg.category == ValueCategory::Prvalue,
            }),
        });
    }

    let Some(conversion) = find_conversion(ctx, arg, &referent, allow_user_defined) else {
        let (param, arg) = names();
        return Err(BindFailure::NoConversion { param, arg });
    };
    if param.is_lvalue_ref() && !referent.is_const {
        let (param, arg) = names();
        return Err(BindFailure::TemporaryToLvalueRef { param, arg });
    }
    Ok(ArgMatch {
        conversion,
        binding: Some(ReferenceBinding {
            to_rvalue_ref: param.is_rvalue_ref(),
            referent_const: referent.is_const,
            binds_rvalue: true,
            binds_temporary: true,
        }),
    })
}

/// Whether a reference to `referent` can designate the argument's object
/// directly (same type, or a base class subobject of it).
fn reference_compatible(
    ctx: &ResolutionContext<'_>,
    arg: &ExprInfo,
    referent: &DataType,
) -> Option<Conversion> {
    let source = arg.data_type;
    if source.is_pointer != referent.is_pointer {
        return None;
    }
    if source.is_pointer && source.is_pointee_const != referent.is_pointee_const {
        return None;
    }
    if source.type_hash == referent.type_hash {
        return Some(Conversion::identity());
    }
    let depth = ctx.registry().derivation_depth(source.type_hash, referent.type_hash)?;
    Some(Conversion {
        kind: ConversionKind::DerivedToBase {
            base: referent.type_hash,
            depth,
        },
        cost: Conversion::COST_DERIVED_TO_BASE,
    })
}
