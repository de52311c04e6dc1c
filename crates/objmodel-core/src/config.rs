//! Model configuration.
//!
//! Everything here has a default matching a common 64-bit target, so
//! `ModelConfig::default()` is what most callers want.

/// Pointer size and alignment of the target whose layouts are computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TargetLayout {
    /// Size of a data pointer (and of a vtable pointer) in bytes.
    pub pointer_size: u64,
    /// Alignment of a data pointer in bytes.
    pub pointer_align: u64,
}

impl TargetLayout {
    /// 64-bit pointers (Linux, macOS x86-64 and aarch64).
    pub const LP64: TargetLayout = TargetLayout {
        pointer_size: 8,
        pointer_align: 8,
    };

    /// 32-bit pointers.
    pub const ILP32: TargetLayout = TargetLayout {
        pointer_size: 4,
        pointer_align: 4,
    };
}

impl Default for TargetLayout {
    fn default() -> Self {
        TargetLayout::LP64
    }
}

/// Options consumed by the completion pass and layout computation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ModelConfig {
    /// Target used for object layout.
    pub target: TargetLayout,
    /// Let an empty base class occupy no storage in a derived object.
    pub empty_base_optimization: bool,
    /// Declare implicit copy/move constructors and assignment operators.
    pub implicit_special_members: bool,
}

impl ModelConfig {
    /// Create the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the layout target.
    pub fn with_target(mut self, target: TargetLayout) -> Self {
        self.target = target;
        self
    }

    /// Enable or disable the empty base optimization.
    pub fn with_empty_base_optimization(mut self, enabled: bool) -> Self {
        self.empty_base_optimization = enabled;
        self
    }

    /// Enable or disable implicit special member declaration.
    pub fn with_implicit_special_members(mut self, enabled: bool) -> Self {
        self.implicit_special_members = enabled;
        self
    }
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            target: TargetLayout::LP64,
            empty_base_optimization: true,
            implicit_special_members: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = ModelConfig::default();
        assert_eq!(config.target.pointer_size, 8);
        assert!(config.empty_base_optimization);
        assert!(config.implicit_special_members);
    }

    #[test]
    fn builders() {
        let config = ModelConfig::new()
            .with_target(TargetLayout::ILP32)
            .with_empty_base_optimization(false)
            .with_implicit_special_members(false);
        assert_eq!(config.target, TargetLayout::ILP32);
        assert!(!config.empty_base_optimization);
        assert!(!config.implicit_special_members);
    }
}
