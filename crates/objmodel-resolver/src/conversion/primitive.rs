//! Primitive type conversions.

use objmodel_core::{PrimitiveKind, TypeHash};

use super::{Conversion, ConversionKind};

/// Find a conversion between two arithmetic primitive types.
pub fn find_primitive_conversion(from: TypeHash, to: TypeHash) -> Option<Conversion> {
    let source = PrimitiveKind::from_hash(from)?;
    let target = PrimitiveKind::from_hash(to)?;
    if !(source.is_arithmetic() && target.is_arithmetic()) {
        return None;
    }

    if source == target {
        return Some(Conversion::identity());
    }

    let cost = if source.promotes_to(target) {
        Conversion::COST_PROMOTION
    } else {
        Conversion::COST_PRIMITIVE_CONVERSION
    };
    Some(Conversion {
        kind: ConversionKind::Primitive { from, to },
        cost,
    })
}
