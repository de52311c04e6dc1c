//! DataType - a type together with its qualifiers.
//!
//! [`TypeHash`] identifies the base type only. [`DataType`] adds everything
//! overload resolution and deduction care about: const-qualification,
//! pointer indirection and the reference kind of a parameter or variable.
//!
//! # Example
//!
//! ```
//! use objmodel_core::{DataType, RefKind, primitives};
//!
//! // int
//! let int = DataType::simple(primitives::INT32);
//! // const int&
//! let cref = int.as_const().as_lvalue_ref();
//! // int&&
//! let rref = int.as_rvalue_ref();
//!
//! assert_eq!(cref.ref_kind, RefKind::Lvalue);
//! assert!(cref.is_const);
//! assert!(rref.is_rvalue_ref());
//! assert_eq!(cref.referent(), int.as_const());
//! ```

use std::fmt::{self, Display, Formatter};

use crate::TypeHash;

/// Reference kind of a declared type.
///
/// ```text
/// T      -> None
/// T&     -> Lvalue
/// T&&    -> Rvalue
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RefKind {
    /// Not a reference: a distinct object.
    #[default]
    None,
    /// Lvalue reference (`&`).
    Lvalue,
    /// Rvalue reference (`&&`).
    Rvalue,
}

impl Display for RefKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            RefKind::None => Ok(()),
            RefKind::Lvalue => write!(f, "&"),
            RefKind::Rvalue => write!(f, "&&"),
        }
    }
}

/// A complete type including all qualifiers.
///
/// # Qualifier placement
///
/// - For object and reference types, `is_const` qualifies the object (for a
///   reference: the referent, references themselves are never const).
/// - For pointer types, `is_const` is the top-level const of the pointer
///   itself and `is_pointee_const` qualifies the object pointed to.
///
/// ```text
/// const int          -> { INT32, is_const }
/// const int&         -> { INT32, is_const, ref_kind: Lvalue }
/// const int* const   -> { INT32, is_const, is_pointer, is_pointee_const }
/// int* const         -> { INT32, is_const, is_pointer }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DataType {
    /// The base type hash.
    pub type_hash: TypeHash,
    /// Object const (or pointer top-level const for pointers).
    pub is_const: bool,
    /// Whether this is a pointer to `type_hash`.
    pub is_pointer: bool,
    /// Whether the pointee is const (pointers only).
    pub is_pointee_const: bool,
    /// Reference kind.
    pub ref_kind: RefKind,
}

impl DataType {
    /// Create a type with no qualifiers.
    #[inline]
    pub const fn simple(type_hash: TypeHash) -> Self {
        Self {
            type_hash,
            is_const: false,
            is_pointer: false,
            is_pointee_const: false,
            ref_kind: RefKind::None,
        }
    }

    /// Create a const object type.
    #[inline]
    pub const fn with_const(type_hash: TypeHash) -> Self {
        Self {
            is_const: true,
            ..Self::simple(type_hash)
        }
    }

    /// Create a pointer type, optionally pointing to const.
    #[inline]
    pub const fn pointer(type_hash: TypeHash, is_pointee_const: bool) -> Self {
        Self {
            is_pointer: true,
            is_pointee_const,
            ..Self::simple(type_hash)
        }
    }

    /// The `void` type.
    #[inline]
    pub const fn void() -> Self {
        Self::simple(crate::primitives::VOID)
    }

    /// Return a copy with top-level const added.
    #[inline]
    pub const fn as_const(mut self) -> Self {
        self.is_const = true;
        self
    }

    /// Return a copy turned into an lvalue reference to this type.
    #[inline]
    pub const fn as_lvalue_ref(mut self) -> Self {
        self.ref_kind = RefKind::Lvalue;
        self
    }

    /// Return a copy turned into an rvalue reference to this type.
    #[inline]
    pub const fn as_rvalue_ref(mut self) -> Self {
        self.ref_kind = RefKind::Rvalue;
        self
    }

    /// Shorthand for `const T&`.
    #[inline]
    pub const fn as_const_ref(self) -> Self {
        self.as_const().as_lvalue_ref()
    }

    /// Whether this is any kind of reference.
    #[inline]
    pub fn is_reference(&self) -> bool {
        self.ref_kind != RefKind::None
    }

    /// Whether this is an lvalue reference.
    #[inline]
    pub fn is_lvalue_ref(&self) -> bool {
        self.ref_kind == RefKind::Lvalue
    }

    /// Whether this is an rvalue reference.
    #[inline]
    pub fn is_rvalue_ref(&self) -> bool {
        self.ref_kind == RefKind::Rvalue
    }

    /// The referred-to type: this type with the reference removed.
    #[inline]
    pub const fn referent(mut self) -> Self {
        self.ref_kind = RefKind::None;
        self
    }

    /// The type a by-value copy of this type has: reference and top-level
    /// const removed. The pointee's constness survives.
    ///
    /// ```
    /// use objmodel_core::{DataType, primitives};
    ///
    /// // const int* const  ->  const int*
    /// let p = DataType::pointer(primitives::INT32, true).as_const();
    /// let decayed = p.decay();
    /// assert!(!decayed.is_const);
    /// assert!(decayed.is_pointee_const);
    /// ```
    #[inline]
    pub const fn decay(mut self) -> Self {
        self.ref_kind = RefKind::None;
        self.is_const = false;
        self
    }

    /// Whether the object this type designates is const.
    ///
    /// For pointers this is the constness of the pointer object itself.
    #[inline]
    pub fn is_object_const(&self) -> bool {
        self.is_const
    }

    /// Whether a value of this type can be assigned to (rebinding a pointer
    /// counts, writing through it does not).
    #[inline]
    pub fn is_assignable(&self) -> bool {
        !self.is_const
    }

    /// Whether the object reached by dereferencing this pointer is writable.
    ///
    /// Returns `false` for non-pointers.
    #[inline]
    pub fn is_pointee_writable(&self) -> bool {
        self.is_pointer && !self.is_pointee_const
    }

    /// Whether two types name the same object type, ignoring references and
    /// top-level const.
    #[inline]
    pub fn same_unqualified(&self, other: &DataType) -> bool {
        self.decay() == other.decay()
    }

    /// Hash of all qualifiers, used to build function and method identities.
    ///
    /// `f(T)`, `f(const T&)` and `f(T&&)` are different overloads, so each
    /// qualifier contributes to the signature.
    pub fn signature_hash(&self) -> u64 {
        let ref_bits = match self.ref_kind {
            RefKind::None => 0u64,
            RefKind::Lvalue => 1,
            RefKind::Rvalue => 2,
        };
        let bits = ref_bits
            | (self.is_pointer as u64) << 2
            | (self.is_pointee_const as u64) << 3
            // top-level const of a by-value parameter is not part of the signature
            | ((self.is_const && (self.is_reference() || self.is_pointer)) as u64) << 4;
        self.type_hash.0.rotate_left(7) ^ bits.wrapping_mul(0x9e3779b97f4a7c15)
    }
}
