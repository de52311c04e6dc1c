//! Built-in scalar types.
//!
//! Primitive types have fixed hashes so they can be named in `const`
//! contexts and matched in patterns. Sizes follow the common LP64 data model;
//! pointer size comes from [`TargetLayout`](crate::TargetLayout) instead.

use std::fmt;

use crate::TypeHash;

/// Hash for `void`.
pub const VOID: TypeHash = TypeHash::from_primitive(1);
/// Hash for `bool`.
pub const BOOL: TypeHash = TypeHash::from_primitive(2);
/// Hash for `char`.
pub const CHAR: TypeHash = TypeHash::from_primitive(3);
/// Hash for `short`.
pub const INT16: TypeHash = TypeHash::from_primitive(4);
/// Hash for `int`.
pub const INT32: TypeHash = TypeHash::from_primitive(5);
/// Hash for `long long`.
pub const INT64: TypeHash = TypeHash::from_primitive(6);
/// Hash for `unsigned int`.
pub const UINT32: TypeHash = TypeHash::from_primitive(7);
/// Hash for `unsigned long long`.
pub const UINT64: TypeHash = TypeHash::from_primitive(8);
/// Hash for `float`.
pub const FLOAT: TypeHash = TypeHash::from_primitive(9);
/// Hash for `double`.
pub const DOUBLE: TypeHash = TypeHash::from_primitive(10);

/// Primitive type kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveKind {
    Void,
    Bool,
    Char,
    Int16,
    Int32,
    Int64,
    Uint32,
    Uint64,
    Float,
    Double,
}

impl PrimitiveKind {
    /// Every primitive kind, in registration order.
    pub const ALL: [PrimitiveKind; 10] = [
        PrimitiveKind::Void,
        PrimitiveKind::Bool,
        PrimitiveKind::Char,
        PrimitiveKind::Int16,
        PrimitiveKind::Int32,
        PrimitiveKind::Int64,
        PrimitiveKind::Uint32,
        PrimitiveKind::Uint64,
        PrimitiveKind::Float,
        PrimitiveKind::Double,
    ];

    /// Get the hash for this primitive type.
    pub const fn type_hash(self) -> TypeHash {
        match self {
            PrimitiveKind::Void => VOID,
            PrimitiveKind::Bool => BOOL,
            PrimitiveKind::Char => CHAR,
            PrimitiveKind::Int16 => INT16,
            PrimitiveKind::Int32 => INT32,
            PrimitiveKind::Int64 => INT64,
            PrimitiveKind::Uint32 => UINT32,
            PrimitiveKind::Uint64 => UINT64,
            PrimitiveKind::Float => FLOAT,
            PrimitiveKind::Double => DOUBLE,
        }
    }

    /// Look up the primitive kind for a hash.
    pub fn from_hash(hash: TypeHash) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.type_hash() == hash)
    }

    /// Source-level spelling.
    pub const fn name(self) -> &'static str {
        match self {
            PrimitiveKind::Void => "void",
            PrimitiveKind::Bool => "bool",
            PrimitiveKind::Char => "char",
            PrimitiveKind::Int16 => "short",
            PrimitiveKind::Int32 => "int",
            PrimitiveKind::Int64 => "long long",
            PrimitiveKind::Uint32 => "unsigned int",
            PrimitiveKind::Uint64 => "unsigned long long",
            PrimitiveKind::Float => "float",
            PrimitiveKind::Double => "double",
        }
    }

    /// Size in bytes (`void` has none).
    pub const fn size(self) -> u64 {
        match self {
            PrimitiveKind::Void => 0,
            PrimitiveKind::Bool | PrimitiveKind::Char => 1,
            PrimitiveKind::Int16 => 2,
            PrimitiveKind::Int32 | PrimitiveKind::Uint32 | PrimitiveKind::Float => 4,
            PrimitiveKind::Int64 | PrimitiveKind::Uint64 | PrimitiveKind::Double => 8,
        }
    }

    /// Alignment in bytes. Scalars are naturally aligned.
    pub const fn align(self) -> u64 {
        match self {
            PrimitiveKind::Void => 1,
            other => other.size(),
        }
    }

    /// Whether the type is an integer type (`bool` and `char` included).
    pub const fn is_integral(self) -> bool {
        matches!(
            self,
            PrimitiveKind::Bool
                | PrimitiveKind::Char
                | PrimitiveKind::Int16
                | PrimitiveKind::Int32
                | PrimitiveKind::Int64
                | PrimitiveKind::Uint32
                | PrimitiveKind::Uint64
        )
    }

    /// Whether the type is a floating-point type.
    pub const fn is_floating(self) -> bool {
        matches!(self, PrimitiveKind::Float | PrimitiveKind::Double)
    }

    /// Whether the type is arithmetic (integral or floating).
    pub const fn is_arithmetic(self) -> bool {
        self.is_integral() || self.is_floating()
    }

    /// Inclusive value range of a signed integer type.
    pub const fn signed_range(self) -> Option<(i64, i64)> {
        match self {
            PrimitiveKind::Char => Some((i8::MIN as i64, i8::MAX as i64)),
            PrimitiveKind::Int16 => Some((i16::MIN as i64, i16::MAX as i64)),
            PrimitiveKind::Int32 => Some((i32::MIN as i64, i32::MAX as i64)),
            PrimitiveKind::Int64 => Some((i64::MIN, i64::MAX)),
            _ => None,
        }
    }

    /// Whether a conversion from `self` to `target` is an integral or
    /// floating-point promotion rather than a general conversion.
    pub const fn promotes_to(self, target: PrimitiveKind) -> bool {
        match (self, target) {
            (
                PrimitiveKind::Bool | PrimitiveKind::Char | PrimitiveKind::Int16,
                PrimitiveKind::Int32,
            ) => true,
            (PrimitiveKind::Float, PrimitiveKind::Double) => true,
            _ => false,
        }
    }
}

impl fmt::Display for PrimitiveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
