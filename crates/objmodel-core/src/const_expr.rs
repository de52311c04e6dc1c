//! Constant expressions used in constructor bodies and member initializers.
//!
//! A constant-evaluable constructor is described by its member initializer
//! list, each entry a [`ConstExpr`]. Anything that needs runtime state is
//! expressed as [`ConstExpr::Runtime`] and is rejected in constant contexts.

use std::fmt;

use crate::{ConstValue, TypeHash};

/// Unary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnaryOp {
    /// Arithmetic negation (`-x`).
    Neg,
    /// Logical not (`!x`).
    Not,
    /// Bitwise complement (`~x`).
    BitNot,
}

/// Binary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Rem,
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    And,
    Or,
    BitAnd,
    BitOr,
    BitXor,
    Shl,
    Shr,
}

impl BinaryOp {
    /// Whether the operator yields a boolean.
    pub fn is_comparison(self) -> bool {
        matches!(
            self,
            BinaryOp::Eq | BinaryOp::Ne | BinaryOp::Lt | BinaryOp::Le | BinaryOp::Gt | BinaryOp::Ge
        )
    }

    /// Whether the operator is logical `&&` / `||`.
    pub fn is_logical(self) -> bool {
        matches!(self, BinaryOp::And | BinaryOp::Or)
    }
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Rem => "%",
            BinaryOp::Eq => "==",
            BinaryOp::Ne => "!=",
            BinaryOp::Lt => "<",
            BinaryOp::Le => "<=",
            BinaryOp::Gt => ">",
            BinaryOp::Ge => ">=",
            BinaryOp::And => "&&",
            BinaryOp::Or => "||",
            BinaryOp::BitAnd => "&",
            BinaryOp::BitOr => "|",
            BinaryOp::BitXor => "^",
            BinaryOp::Shl => "<<",
            BinaryOp::Shr => ">>",
        };
        f.write_str(s)
    }
}

/// An expression in a constructor's member initializer list.
#[derive(Debug, Clone, PartialEq)]
pub enum ConstExpr {
    /// A literal value.
    Literal(ConstValue),
    /// The constructor parameter at this index.
    Param(usize),
    /// A static constant member of a class (`A::a`).
    StaticMember {
        /// The class declaring the member.
        class: TypeHash,
        /// The member name.
        name: String,
    },
    /// A unary operation.
    Unary(UnaryOp, Box<ConstExpr>),
    /// A binary operation.
    Binary(BinaryOp, Box<ConstExpr>, Box<ConstExpr>),
    /// `cond ? then : otherwise`.
    Conditional(Box<ConstExpr>, Box<ConstExpr>, Box<ConstExpr>),
    /// An operation that needs runtime state (I/O, a non-const global).
    Runtime(String),
}

impl ConstExpr {
    /// Integer literal.
    pub fn int(v: i64) -> Self {
        ConstExpr::Literal(ConstValue::Int(v))
    }

    /// Boolean literal.
    pub fn bool(v: bool) -> Self {
        ConstExpr::Literal(ConstValue::Bool(v))
    }

    /// Floating-point literal.
    pub fn float(v: f64) -> Self {
        ConstExpr::Literal(ConstValue::Float(v))
    }

    /// Reference to a constructor parameter.
    pub fn param(index: usize) -> Self {
        ConstExpr::Param(index)
    }

    /// Reference to a static constant member.
    pub fn static_member(class: TypeHash, name: impl Into<String>) -> Self {
        ConstExpr::StaticMember {
            class,
            name: name.into(),
        }
    }

    /// Build a binary expression.
    pub fn binary(op: BinaryOp, lhs: ConstExpr, rhs: ConstExpr) -> Self {
        ConstExpr::Binary(op, Box::new(lhs), Box::new(rhs))
    }

    /// Build a unary expression.
    pub fn unary(op: UnaryOp, operand: ConstExpr) -> Self {
        ConstExpr::Unary(op, Box::new(operand))
    }

    /// Build a conditional expression.
    pub fn conditional(cond: ConstExpr, then: ConstExpr, otherwise: ConstExpr) -> Self {
        ConstExpr::Conditional(Box::new(cond), Box::new(then), Box::new(otherwise))
    }

    /// A non-constant operation.
    pub fn runtime(description: impl Into<String>) -> Self {
        ConstExpr::Runtime(description.into())
    }

    /// Whether the expression contains a runtime-only operation.
    pub fn needs_runtime(&self) -> bool {
        match self {
            ConstExpr::Literal(_) | ConstExpr::Param(_) | ConstExpr::StaticMember { .. } => false,
            ConstExpr::Runtime(_) => true,
            ConstExpr::Unary(_, e) => e.needs_runtime(),
            ConstExpr::Binary(_, l, r) => l.needs_runtime() || r.needs_runtime(),
            ConstExpr::Conditional(c, t, e) => {
                c.needs_runtime() || t.needs_runtime() || e.needs_runtime()
            }
        }
    }
}
