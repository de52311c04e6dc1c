//! Template argument deduction and forwarding.
//!
//! A forwarding parameter (`template<class T> void f(T&& x)`) accepts any
//! argument. What it was given is recorded as a [`Capability`]: an rvalue
//! argument is owned and may be moved on, an lvalue argument is borrowed.
//! Inside the function `x` is a named variable and therefore an lvalue;
//! [`forward`] restores the category the caller passed.
//!
//! ```text
//! template<class T> void relay(T&& x) { sink(std::forward<T>(x)); }
//!
//! int n;
//! relay(n);   // T = int&, x is int&,  sink gets an lvalue
//! relay(1);   // T = int,  x is int&&, sink gets an xvalue
//! ```

use objmodel_core::{Capability, DataType, ExprInfo, ValueCategory};

/// The result of deducing a forwarding parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Deduction {
    /// The deduced template argument `T`.
    pub deduced: DataType,
    /// The parameter's type after substitution.
    pub param_type: DataType,
    /// Whether the argument may be consumed.
    pub capability: Capability,
}

/// Deduce `T` for a `T&&` parameter from `arg`.
pub fn deduce_forwarding(arg: &ExprInfo) -> Deduction {
    let object = arg.data_type.referent();
    if arg.is_lvalue() {
        Deduction {
            deduced: object.as_lvalue_ref(),
            param_type: object.as_lvalue_ref(),
            capability: Capability::Borrowed,
        }
    } else {
        Deduction {
            deduced: object,
            param_type: object.as_rvalue_ref(),
            capability: Capability::Owned,
        }
    }
}

/// The forwarding parameter as named inside the function body.
///
/// Always an lvalue, whatever was passed.
pub fn parameter(deduction: &Deduction) -> ExprInfo {
    ExprInfo::named(deduction.param_type)
}

/// `std::forward<T>(param)`: pass the parameter on with the category its
/// argument had.
pub fn forward(param: &ExprInfo, deduction: &Deduction) -> ExprInfo {
    let category = match deduction.capability {
        Capability::Owned => ValueCategory::Xvalue,
        Capability::Borrowed => ValueCategory::Lvalue,
    };
    ExprInfo {
        data_type: param.data_type.referent(),
        category,
    }
}

/// `std::move(arg)`: an unconditional cast to an rvalue.
pub fn move_cast(arg: &ExprInfo) -> ExprInfo {
    arg.moved()
}

/// Deduce `T` for a by-value parameter `f(T)`.
///
/// Only the reference and top-level const are dropped; the constness of a
/// pointee is part of the type.
pub fn deduce_by_value(declared: &DataType) -> DataType {
    declared.decay()
}

/// Deduce `T` for an lvalue reference parameter `f(T&)`.
///
/// Constness is kept, so a const argument deduces `const U` and binds.
pub fn deduce_by_reference(arg: &ExprInfo) -> DataType {
    arg.data_type.referent()
}
