//! Instance fields and static constant members.

use crate::{ConstExpr, DataType, Visibility};

/// An instance field of a class.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldEntry {
    /// Field name.
    pub name: String,
    /// Field type.
    pub data_type: DataType,
    /// Access specifier.
    pub visibility: Visibility,
    /// Default member initializer (`int x = 1;`).
    pub default_init: Option<ConstExpr>,
}

impl FieldEntry {
    /// Create a public field with no default initializer.
    pub fn new(name: impl Into<String>, data_type: DataType) -> Self {
        Self {
            name: name.into(),
            data_type,
            visibility: Visibility::Public,
            default_init: None,
        }
    }

    /// Set the access specifier.
    pub fn with_visibility(mut self, visibility: Visibility) -> Self {
        self.visibility = visibility;
        self
    }

    /// Set the default member initializer.
    pub fn with_default(mut self, init: ConstExpr) -> Self {
        self.default_init = Some(init);
        self
    }
}

/// A `static const` (or `static constexpr`) data member.
///
/// Static members take no space in instances and their value is known
/// at translation time.
#[derive(Debug, Clone, PartialEq)]
pub struct StaticConstEntry {
    /// Member name.
    pub name: String,
    /// Declared type.
    pub data_type: DataType,
    /// Initializer. May refer to other static constants.
    pub value: ConstExpr,
}

impl StaticConstEntry {
    /// Create a static constant member.
    pub fn new(name: impl Into<String>, data_type: DataType, value: ConstExpr) -> Self {
        Self {
            name: name.into(),
            data_type: data_type.as_const(),
            value,
        }
    }
}
