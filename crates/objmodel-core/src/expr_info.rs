//! ExprInfo - the static description of an argument expression.
//!
//! Overload resolution never looks at values, only at what an expression
//! *is*: its type, its constness and its value category. [`ExprInfo`]
//! captures exactly that.
//!
//! # Value categories
//!
//! - **Lvalue**: names an object with identity. Every named variable is an
//!   lvalue, including one whose declared type is `T&&`.
//! - **Xvalue**: an expiring object, produced by an explicit cast to `T&&`
//!   (a move).
//! - **Prvalue**: a temporary: literals, `T{}`, calls returning by value.
//!
//! Xvalues and prvalues together are the rvalues.
//!
//! # Examples
//!
//! ```
//! use objmodel_core::{DataType, ExprInfo, ValueCategory, primitives};
//!
//! let int = DataType::simple(primitives::INT32);
//!
//! // int&& d = ...;  `d` used as an expression is still an lvalue
//! let d = ExprInfo::named(int.as_rvalue_ref());
//! assert_eq!(d.category, ValueCategory::Lvalue);
//! assert!(d.is_modifiable());
//!
//! // std::move(d)
//! let moved = d.moved();
//! assert_eq!(moved.category, ValueCategory::Xvalue);
//! assert!(moved.is_rvalue());
//! ```

use std::fmt;

use crate::DataType;

/// The value category of an expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueCategory {
    /// Has identity and is not expiring (named variables, dereferences).
    Lvalue,
    /// Has identity and is expiring (explicit cast to an rvalue reference).
    Xvalue,
    /// A pure temporary.
    Prvalue,
}

impl ValueCategory {
    /// Whether this category is an rvalue (xvalue or prvalue).
    #[inline]
    pub fn is_rvalue(self) -> bool {
        !matches!(self, ValueCategory::Lvalue)
    }

    /// Whether an expression of this category has identity (lvalue or xvalue).
    #[inline]
    pub fn has_identity(self) -> bool {
        !matches!(self, ValueCategory::Prvalue)
    }
}

impl fmt::Display for ValueCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueCategory::Lvalue => write!(f, "lvalue"),
            ValueCategory::Xvalue => write!(f, "xvalue"),
            ValueCategory::Prvalue => write!(f, "prvalue"),
        }
    }
}

/// The type and value category of an expression.
///
/// `data_type` never carries a reference kind: an expression's type is the
/// referent type, the reference-ness lives in `category`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ExprInfo {
    /// The (non-reference) type of the expression, including const.
    pub data_type: DataType,
    /// The value category of the expression.
    pub category: ValueCategory,
}

impl ExprInfo {
    /// A named variable declared with `declared` type.
    ///
    /// The category is always lvalue, whatever the declared reference kind.
    #[inline]
    pub fn named(declared: DataType) -> Self {
        Self {
            data_type: declared.referent(),
            category: ValueCategory::Lvalue,
        }
    }

    /// A const lvalue (const variable, `const T&` parameter).
    #[inline]
    pub fn const_lvalue(data_type: DataType) -> Self {
        Self::named(data_type.referent().as_const())
    }

    /// A temporary of the given type (`T{}`, a literal, a by-value return).
    #[inline]
    pub fn temporary(data_type: DataType) -> Self {
        Self {
            data_type: data_type.referent(),
            category: ValueCategory::Prvalue,
        }
    }

    /// The result of calling a function returning `ret`.
    ///
    /// `T&` yields an lvalue, `T&&` an xvalue and by-value a prvalue.
    #[inline]
    pub fn call_result(ret: DataType) -> Self {
        let category = match ret.ref_kind {
            crate::RefKind::None => ValueCategory::Prvalue,
            crate::RefKind::Lvalue => ValueCategory::Lvalue,
            crate::RefKind::Rvalue => ValueCategory::Xvalue,
        };
        Self {
            data_type: ret.referent(),
            category,
        }
    }

    /// This expression cast to an rvalue reference (a move).
    ///
    /// Constness is preserved: moving a const object yields a const xvalue.
    #[inline]
    pub fn moved(self) -> Self {
        Self {
            data_type: self.data_type,
            category: ValueCategory::Xvalue,
        }
    }

    /// Whether the expression is an rvalue.
    #[inline]
    pub fn is_rvalue(&self) -> bool {
        self.category.is_rvalue()
    }

    /// Whether the expression is an lvalue.
    #[inline]
    pub fn is_lvalue(&self) -> bool {
        !self.is_rvalue()
    }

    /// Whether the expression's object is const.
    #[inline]
    pub fn is_const(&self) -> bool {
        self.data_type.is_object_const()
    }

    /// Whether this is a modifiable lvalue.
    #[inline]
    pub fn is_modifiable(&self) -> bool {
        self.is_lvalue() && !self.is_const()
    }
}

impl fmt::Display for ExprInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let konst = if self.is_const() { "const " } else { "" };
        write!(f, "{konst}{} {:?}", self.category, self.data_type.type_hash)
    }
}
