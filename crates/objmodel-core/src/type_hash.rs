//! Deterministic hash-based identity for classes, members and constructors.
//!
//! [`TypeHash`] is a 64-bit hash computed from names and signatures. Because it
//! is derived rather than allocated, a derived class can name its base before
//! the base is registered, and the same declaration always gets the same
//! identity.
//!
//! # Examples
//!
//! ```
//! use objmodel_core::TypeHash;
//!
//! let a = TypeHash::from_name("Base");
//! assert_eq!(a, TypeHash::from_name("Base"));
//!
//! let int = TypeHash::from_name("int");
//! let long = TypeHash::from_name("long");
//! let f = TypeHash::from_function("test", &[int.0]);
//! let g = TypeHash::from_function("test", &[long.0]);
//! assert_ne!(f, g);
//! ```

use std::fmt;
use xxhash_rust::xxh64::xxh64;

/// Domain-specific mixing constants for hash computation.
///
/// Types, free functions, methods and constructors sharing a name still get
/// distinct hashes.
pub mod hash_constants {
    /// Separator constant for chaining components.
    pub const SEP: u64 = 0x4bc94d6bd06053ad;

    /// Domain marker for type hashes.
    pub const TYPE: u64 = 0x2fac10b63a6cc57c;

    /// Domain marker for primitive type hashes.
    pub const PRIMITIVE: u64 = 0x6a09e667f3bcc908;

    /// Domain marker for free function hashes.
    pub const FUNCTION: u64 = 0x5ea77ffbcdf5f302;

    /// Domain marker for owner-independent method signatures.
    pub const SIGNATURE: u64 = 0x1a095090689d4647;

    /// Domain marker for instance method hashes.
    pub const METHOD: u64 = 0x7d3c8b4a92e15f6d;

    /// Domain marker for constructor hashes.
    pub const CONSTRUCTOR: u64 = 0x9a7f3d5e2b8c4601;

    /// Domain marker for assignment operator hashes.
    pub const ASSIGNMENT: u64 = 0x3e9f5d2a8c7b1403;

    /// Domain marker for destructor hashes.
    pub const DESTRUCTOR: u64 = 0xb5ad4eceda1ce2a9;

    /// Parameter position mixing constants so that parameter order matters.
    pub const PARAM_MARKERS: [u64; 16] = [
        0x9e3779b97f4a7c15,
        0xbf58476d1ce4e5b9,
        0x94d049bb133111eb,
        0xd6e8feb86659fd93,
        0xe7037ed1a0b428db,
        0xc6a4a7935bd1e995,
        0x8648dbbc94d49b8d,
        0xa2b48b2c69e0d657,
        0x7c3e9f2a5b8d1403,
        0x5d8c7b4a3e9f2106,
        0x3f1e9d8c7b5a4203,
        0x1a2b3c4d5e6f7089,
        0x9f8e7d6c5b4a3210,
        0x2468ace013579bdf,
        0xfdb97531eca86420,
        0x123456789abcdef0,
    ];
}

/// A deterministic 64-bit hash identifying a type, function, method or
/// constructor.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct TypeHash(pub u64);

impl TypeHash {
    /// Empty/invalid hash constant.
    pub const EMPTY: TypeHash = TypeHash(0);

    /// Create a type hash from a class name.
    #[inline]
    pub fn from_name(name: &str) -> Self {
        TypeHash(hash_constants::TYPE ^ xxh64(name.as_bytes(), 0))
    }

    /// Create the hash of a primitive type from its discriminant.
    ///
    /// Primitive hashes are `const` so they can be used in patterns.
    #[inline]
    pub const fn from_primitive(discriminant: u64) -> Self {
        TypeHash(hash_constants::PRIMITIVE ^ discriminant.wrapping_mul(hash_constants::SEP))
    }

    /// Create a free function hash from its name and parameter signature hashes.
    #[inline]
    pub fn from_function(name: &str, param_sigs: &[u64]) -> Self {
        let seed = hash_constants::FUNCTION ^ xxh64(name.as_bytes(), 0);
        TypeHash(mix_params(seed, param_sigs))
    }

    /// Create an owner-independent signature hash.
    ///
    /// Two methods with the same signature hash in a base and a derived class
    /// are the same slot: the derived one overrides the base one. The
    /// qualifier bits encode const and ref-qualification of the implicit
    /// object parameter.
    #[inline]
    pub fn from_signature(name: &str, param_sigs: &[u64], qualifier_bits: u64) -> Self {
        let seed = hash_constants::SIGNATURE ^ xxh64(name.as_bytes(), 0) ^ qualifier_bits;
        TypeHash(mix_params(seed, param_sigs))
    }

    /// Create a method hash from its owner and its signature hash.
    #[inline]
    pub fn from_method(owner: TypeHash, signature: TypeHash) -> Self {
        TypeHash(
            (hash_constants::METHOD ^ owner.0)
                .wrapping_mul(hash_constants::SEP)
                .wrapping_add(signature.0),
        )
    }

    /// Create a constructor hash from its owner and parameter signature hashes.
    #[inline]
    pub fn from_constructor(owner: TypeHash, param_sigs: &[u64]) -> Self {
        TypeHash(mix_params(hash_constants::CONSTRUCTOR ^ owner.0, param_sigs))
    }

    /// Create an assignment operator hash from its owner and parameter signature hash.
    #[inline]
    pub fn from_assignment(owner: TypeHash, param_sig: u64) -> Self {
        TypeHash(mix_params(hash_constants::ASSIGNMENT ^ owner.0, &[param_sig]))
    }

    /// Create the destructor hash for a class.
    #[inline]
    pub fn from_destructor(owner: TypeHash) -> Self {
        TypeHash(hash_constants::DESTRUCTOR ^ owner.0)
    }

    /// Whether this is the empty hash.
    #[inline]
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }
}

fn mix_params(seed: u64, param_sigs: &[u64]) -> u64 {
    let mut hash = seed;
    for (i, param) in param_sigs.iter().enumerate() {
        let marker = hash_constants::PARAM_MARKERS
            .get(i)
            .copied()
            .unwrap_or_else(|| hash_constants::PARAM_MARKERS[0].wrapping_add(i as u64));
        // wrapping_mul keeps the mix order-dependent
        hash = hash
            .wrapping_mul(hash_constants::SEP)
            .wrapping_add(marker ^ param);
    }
    hash
}

impl fmt::Debug for TypeHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TypeHash({:#018x})", self.0)
    }
}

impl fmt::Display for TypeHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#018x}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_name_is_deterministic() {
        assert_eq!(TypeHash::from_name("Derived"), TypeHash::from_name("Derived"));
        assert_ne!(TypeHash::from_name("Derived"), TypeHash::from_name("Base"));
    }

    #[test]
    fn parameter_order_matters() {
        let a = TypeHash::from_name("A").0;
        let b = TypeHash::from_name("B").0;
        assert_ne!(
            TypeHash::from_function("f", &[a, b]),
            TypeHash::from_function("f", &[b, a])
        );
    }

    #[test]
    fn domains_do_not_collide() {
        let owner = TypeHash::from_name("Data");
        let sig = TypeHash::from_name("Data").0;
        assert_ne!(
            TypeHash::from_constructor(owner, &[sig]),
            TypeHash::from_assignment(owner, sig)
        );
        assert_ne!(
            TypeHash::from_function("get", &[]),
            TypeHash::from_signature("get", &[], 0)
        );
    }

    #[test]
    fn qualifier_bits_distinguish_signatures() {
        let plain = TypeHash::from_signature("get", &[], 0);
        let konst = TypeHash::from_signature("get", &[], 1);
        assert_ne!(plain, konst);
    }

    #[test]
    fn same_signature_different_owner_gives_different_method() {
        let sig = TypeHash::from_signature("get", &[], 0);
        let a = TypeHash::from_method(TypeHash::from_name("A"), sig);
        let b = TypeHash::from_method(TypeHash::from_name("B"), sig);
        assert_ne!(a, b);
    }

    #[test]
    fn primitive_hashes_are_distinct() {
        assert_ne!(TypeHash::from_primitive(1), TypeHash::from_primitive(2));
        assert!(!TypeHash::from_primitive(1).is_empty());
    }
}
