//! Values produced by constant evaluation.

use std::fmt;

use crate::{PrimitiveKind, TypeHash};

/// A compile-time scalar value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ConstValue {
    /// Signed integer value.
    Int(i64),
    /// Unsigned integer value.
    UInt(u64),
    /// Floating-point value (f64 for precision).
    Float(f64),
    /// Boolean value.
    Bool(bool),
}

impl ConstValue {
    /// Try to convert this value to an i64.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            ConstValue::Int(v) => Some(*v),
            ConstValue::UInt(v) => i64::try_from(*v).ok(),
            ConstValue::Float(v) => Some(*v as i64),
            ConstValue::Bool(v) => Some(i64::from(*v)),
        }
    }

    /// Try to convert this value to a u64.
    pub fn as_uint(&self) -> Option<u64> {
        match self {
            ConstValue::Int(v) => u64::try_from(*v).ok(),
            ConstValue::UInt(v) => Some(*v),
            ConstValue::Float(v) if *v >= 0.0 => Some(*v as u64),
            ConstValue::Float(_) => None,
            ConstValue::Bool(v) => Some(u64::from(*v)),
        }
    }

    /// Convert this value to an f64.
    pub fn as_float(&self) -> f64 {
        match self {
            ConstValue::Int(v) => *v as f64,
            ConstValue::UInt(v) => *v as f64,
            ConstValue::Float(v) => *v,
            ConstValue::Bool(v) => f64::from(u8::from(*v)),
        }
    }

    /// Whether the value converts to `true` in a condition.
    pub fn is_truthy(&self) -> bool {
        match self {
            ConstValue::Int(v) => *v != 0,
            ConstValue::UInt(v) => *v != 0,
            ConstValue::Float(v) => *v != 0.0,
            ConstValue::Bool(v) => *v,
        }
    }

    /// Convert this value to the representation of a primitive field type.
    ///
    /// Narrowing follows two's-complement truncation the way a runtime
    /// conversion would. Returns `None` for `void`.
    pub fn convert_to(&self, kind: PrimitiveKind) -> Option<ConstValue> {
        let converted = match kind {
            PrimitiveKind::Void => return None,
            PrimitiveKind::Bool => ConstValue::Bool(self.is_truthy()),
            PrimitiveKind::Float | PrimitiveKind::Double => ConstValue::Float(self.as_float()),
            PrimitiveKind::Uint32 => ConstValue::UInt(u64::from(self.wrapping_bits() as u32)),
            PrimitiveKind::Uint64 => ConstValue::UInt(self.wrapping_bits()),
            PrimitiveKind::Char => ConstValue::Int(i64::from(self.wrapping_bits() as i8)),
            PrimitiveKind::Int16 => ConstValue::Int(i64::from(self.wrapping_bits() as i16)),
            PrimitiveKind::Int32 => ConstValue::Int(i64::from(self.wrapping_bits() as i32)),
            PrimitiveKind::Int64 => ConstValue::Int(self.wrapping_bits() as i64),
        };
        Some(converted)
    }

    /// Whether a signed integer value is representable in `kind`.
    ///
    /// Only signed results can overflow; other values and other kinds
    /// always fit.
    pub fn fits_in(&self, kind: PrimitiveKind) -> bool {
        match (self, kind.signed_range()) {
            (ConstValue::Int(v), Some((min, max))) => (min..=max).contains(v),
            _ => true,
        }
    }

    fn wrapping_bits(&self) -> u64 {
        match self {
            ConstValue::Int(v) => *v as u64,
            ConstValue::UInt(v) => *v,
            ConstValue::Float(v) => *v as i64 as u64,
            ConstValue::Bool(v) => u64::from(*v),
        }
    }
}

impl fmt::Display for ConstValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConstValue::Int(v) => write!(f, "{v}"),
            ConstValue::UInt(v) => write!(f, "{v}u"),
            ConstValue::Float(v) => write!(f, "{v:?}"),
            ConstValue::Bool(v) => write!(f, "{v}"),
        }
    }
}

/// The state of one field of an evaluated object.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldValue {
    /// The field holds a known value.
    Value(ConstValue),
    /// The field was initialized from an operation only performed at runtime.
    Dynamic,
    /// The field was never initialized; reading it has no defined value.
    Indeterminate,
}

impl FieldValue {
    /// The value, if initialized.
    pub fn value(&self) -> Option<ConstValue> {
        match self {
            FieldValue::Value(v) => Some(*v),
            FieldValue::Dynamic | FieldValue::Indeterminate => None,
        }
    }

    /// Whether the field was initialized.
    pub fn is_initialized(&self) -> bool {
        !matches!(self, FieldValue::Indeterminate)
    }
}

/// An object produced by evaluating a constructor.
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectValue {
    /// The class of the object.
    pub class: TypeHash,
    /// Field values in declaration order, base class fields first.
    pub fields: Vec<(String, FieldValue)>,
}

impl ObjectValue {
    /// Look up a field by name.
    pub fn field(&self, name: &str) -> Option<FieldValue> {
        self.fields
            .iter()
            .find(|(field, _)| field == name)
            .map(|(_, value)| *value)
    }

    /// Whether every field holds a value.
    pub fn is_fully_initialized(&self) -> bool {
        self.fields.iter().all(|(_, v)| v.is_initialized())
    }
}
