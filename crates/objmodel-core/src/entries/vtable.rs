//! Virtual method table.
//!
//! Each virtual signature gets one slot. A derived class starts from a copy
//! of its base's table: overriding replaces the method in an existing slot,
//! a new virtual signature appends a slot.

use rustc_hash::FxHashMap;

use crate::TypeHash;

/// Method table for dynamic dispatch.
///
/// Maps owner-independent signature hashes to slot indices and keeps a
/// name index for overload resolution among virtual methods.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct VTable {
    /// Maps signature hash to slot index.
    pub index: FxHashMap<TypeHash, u16>,
    /// Maps method name to its slots (one per overload).
    pub slots_by_name: FxHashMap<String, Vec<u16>>,
    /// Final overrider hash per slot, in slot order.
    pub methods: Vec<TypeHash>,
}

impl VTable {
    /// Create an empty vtable.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the slot for a signature hash.
    pub fn slot_by_signature(&self, signature: TypeHash) -> Option<u16> {
        self.index.get(&signature).copied()
    }

    /// Get all slots for methods with a given name.
    pub fn slots_for_name(&self, name: &str) -> &[u16] {
        self.slots_by_name
            .get(name)
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    /// Get the method at a slot.
    pub fn method_at(&self, slot: u16) -> Option<TypeHash> {
        self.methods.get(slot as usize).copied()
    }

    /// Whether the table has no slots.
    pub fn is_empty(&self) -> bool {
        self.methods.is_empty()
    }

    /// Number of slots.
    pub fn len(&self) -> u16 {
        self.methods.len() as u16
    }

    /// Append a new slot. Returns its index.
    pub fn add_method(&mut self, name: &str, signature: TypeHash, func_hash: TypeHash) -> u16 {
        let slot = self.methods.len() as u16;
        self.methods.push(func_hash);
        self.index.insert(signature, slot);
        self.slots_by_name
            .entry(name.to_string())
            .or_default()
            .push(slot);
        slot
    }

    /// Replace the method in the slot for `signature`.
    ///
    /// Returns the replaced method, or `None` if no slot has this signature.
    pub fn override_method(&mut self, signature: TypeHash, func_hash: TypeHash) -> Option<TypeHash> {
        let slot = self.slot_by_signature(signature)?;
        let entry = self.methods.get_mut(slot as usize)?;
        Some(std::mem::replace(entry, func_hash))
    }

    /// All final overriders with a given name.
    pub fn find_methods(&self, name: &str) -> Vec<TypeHash> {
        self.slots_for_name(name)
            .iter()
            .filter_map(|&slot| self.method_at(slot))
            .collect()
    }
}
