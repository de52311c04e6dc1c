//! Argument conversions.
//!
//! Determines whether an argument expression can initialize a parameter,
//! and at what cost. Used for overload resolution, constructor selection
//! and user-defined conversions.
//!
//! ## Conversion ranks
//!
//! Lower cost is better:
//!
//! 1. exact match: identity, or adding const to a pointee
//! 2. promotion: `char`/`short`/`bool` to `int`, `float` to `double`
//! 3. conversion: other arithmetic conversions, derived to base
//! 4. user-defined: through a non-explicit converting constructor
//!
//! At most one user-defined conversion is applied per argument. A
//! converting constructor's own parameter is matched with standard
//! conversions only.

use objmodel_core::{DataType, ExprInfo, TypeHash};

use crate::context::ResolutionContext;

mod binding;
mod primitive;
mod user_defined;

pub use binding::{ArgMatch, BindFailure, ReferenceBinding, match_argument};
pub(crate) use binding::match_standard;
pub use primitive::find_primitive_conversion;
pub use user_defined::find_user_conversion;

/// A conversion with its cost for overload resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Conversion {
    /// The kind of conversion performed.
    pub kind: ConversionKind,
    /// The rank of this conversion (lower is better).
    pub cost: u32,
}

/// The kind of conversion performed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConversionKind {
    /// No conversion needed.
    Identity,

    /// Pointer to pointer-to-const (`T*` to `const T*`).
    Qualification,

    /// Arithmetic conversion between primitive types.
    Primitive {
        /// Source type.
        from: TypeHash,
        /// Target type.
        to: TypeHash,
    },

    /// Derived class to one of its bases. A by-value target slices.
    DerivedToBase {
        /// The base class.
        base: TypeHash,
        /// Derivation steps between the classes.
        depth: usize,
    },

    /// Implicit construction of the target through a converting constructor.
    ConstructorConversion {
        /// The constructor used.
        constructor: TypeHash,
    },
}

impl Conversion {
    /// Cost for an exact match.
    pub const COST_EXACT: u32 = 0;
    /// Cost for an integral or floating-point promotion.
    pub const COST_PROMOTION: u32 = 1;
    /// Cost for other arithmetic conversions.
    pub const COST_PRIMITIVE_CONVERSION: u32 = 2;
    /// Cost for derived-to-base conversion.
    pub const COST_DERIVED_TO_BASE: u32 = 2;
    /// Cost for a user-defined conversion.
    pub const COST_USER_DEFINED: u32 = 3;

    /// The identity conversion.
    pub fn identity() -> Self {
        Self {
            kind: ConversionKind::Identity,
            cost: Self::COST_EXACT,
        }
    }

    /// Check if this is an exact match (no conversion).
    pub fn is_exact(&self) -> bool {
        matches!(self.kind, ConversionKind::Identity)
    }

    /// Whether a user-defined conversion is involved.
    pub fn is_user_defined(&self) -> bool {
        matches!(self.kind, ConversionKind::ConstructorConversion { .. })
    }

    /// Whether the conversion creates a new object rather than designating
    /// (part of) the argument.
    pub fn creates_temporary(&self) -> bool {
        matches!(
            self.kind,
            ConversionKind::Primitive { .. } | ConversionKind::ConstructorConversion { .. }
        )
    }
}

/// Find the conversion from the value of `arg` to an object of type
/// `target`. References and top-level const on `target` are ignored.
pub fn find_conversion(
    ctx: &ResolutionContext<'_>,
    arg: &ExprInfo,
    target: &DataType,
    allow_user_defined: bool,
) -> Option<Conversion> {
    let source = arg.data_type.referent();
    let target = target.decay();

    if source.is_pointer || target.is_pointer {
        return find_pointer_conversion(ctx, &source, &target);
    }

    if source.type_hash == target.type_hash {
        return Some(Conversion::identity());
    }

    if let Some(conv) = find_primitive_conversion(source.type_hash, target.type_hash) {
        return Some(conv);
    }

    if let Some(conv) = find_derived_to_base(ctx, source.type_hash, target.type_hash) {
        return Some(conv);
    }

    if allow_user_defined {
        return find_user_conversion(ctx, arg, target.type_hash);
    }

    None
}

/// Conversion between two pointer types. Pointee const may be added, never
/// removed.
fn find_pointer_conversion(
    ctx: &ResolutionContext<'_>,
    source: &DataType,
    target: &DataType,
) -> Option<Conversion> {
    if !(source.is_pointer && target.is_pointer) {
        return None;
    }
    if source.is_pointee_const && !target.is_pointee_const {
        return None;
    }
    if source.type_hash == target.type_hash {
        let kind = if source.is_pointee_const == target.is_pointee_const {
            ConversionKind::Identity
        } else {
            ConversionKind::Qualification
        };
        return Some(Conversion {
            kind,
            cost: Conversion::COST_EXACT,
        });
    }
    find_derived_to_base(ctx, source.type_hash, target.type_hash)
}

fn find_derived_to_base(
    ctx: &ResolutionContext<'_>,
    derived: TypeHash,
    base: TypeHash,
) -> Option<Conversion> {
    let depth = ctx.registry().derivation_depth(derived, base)?;
    (depth > 0).then_some(Conversion {
        kind: ConversionKind::DerivedToBase { base, depth },
        cost: Conversion::COST_DERIVED_TO_BASE,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use objmodel_core::{ClassDecl, primitives};
    use objmodel_registry::SymbolRegistry;

    fn hierarchy() -> SymbolRegistry {
        let mut registry = SymbolRegistry::new();
        registry.declare_class(ClassDecl::new("A")).unwrap();
        registry.declare_class(ClassDecl::new("C").with_base("A")).unwrap();
        registry.declare_class(ClassDecl::new("B").with_base("C")).unwrap();
        registry
    }

    #[test]
    fn by_value_ignores_top_level_const() {
        let registry = hierarchy();
        let ctx = ResolutionContext::new(&registry);
        let int = DataType::simple(primitives::INT32);
        let arg = ExprInfo::const_lvalue(int);
        assert!(find_conversion(&ctx, &arg, &int, true).unwrap().is_exact());
    }

    #[test]
    fn derived_to_base_records_depth() {
        let registry = hierarchy();
        let ctx = ResolutionContext::new(&registry);
        let b = ExprInfo::named(DataType::simple(TypeHash::from_name("B")));
        let conv = find_conversion(&ctx, &b, &DataType::simple(TypeHash::from_name("A")), true).unwrap();
        assert_eq!(
            conv.kind,
            ConversionKind::DerivedToBase {
                base: TypeHash::from_name("A"),
                depth: 2
            }
        );
        // base to derived never converts implicitly
        let a = ExprInfo::named(DataType::simple(TypeHash::from_name("A")));
        assert!(find_conversion(&ctx, &a, &DataType::simple(TypeHash::from_name("B")), true).is_none());
    }

    #[test]
    fn pointer_const_can_be_added_not_removed() {
        let registry = hierarchy();
        let ctx = ResolutionContext::new(&registry);
        let to_mut = ExprInfo::named(DataType::pointer(primitives::INT32, false));
        let to_const = ExprInfo::named(DataType::pointer(primitives::INT32, true));

        let added = find_conversion(&ctx, &to_mut, &DataType::pointer(primitives::INT32, true), true)
            .unwrap();
        assert_eq!(added.kind, ConversionKind::Qualification);
        assert!(find_conversion(&ctx, &to_const, &DataType::pointer(primitives::INT32, false), true)
            .is_none());
    }

    #[test]
    fn pointer_and_value_do_not_mix() {
        let registry = hierarchy();
        let ctx = ResolutionContext::new(&registry);
        let ptr = ExprInfo::named(DataType::pointer(primitives::INT32, false));
        assert!(find_conversion(&ctx, &ptr, &DataType::simple(primitives::INT32), true).is_none());
    }
}
