//! Class entries and class declarations.
//!
//! [`ClassDecl`] captures what a caller declares, with the base class named
//! by string and members not yet hashed. The registry turns it into a
//! [`ClassEntry`], and the completion pass fills in the vtable, the
//! implicit special members and the abstract/polymorphic flags.

use rustc_hash::FxHashMap;

use crate::{FieldEntry, FunctionDef, StaticConstEntry, TypeHash};

use super::{Behaviors, VTable};

/// A class declaration before registration.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassDecl {
    /// Class name.
    pub name: String,
    /// Name of the direct base class (single inheritance).
    pub base: Option<String>,
    /// Class is marked `final`.
    pub is_final: bool,
    /// Instance fields in declaration order.
    pub fields: Vec<FieldEntry>,
    /// Static constant members.
    pub statics: Vec<StaticConstEntry>,
    /// Methods, constructors, assignment operators and the destructor.
    pub functions: Vec<FunctionDef>,
}

impl ClassDecl {
    /// Declare a class with no base and no members.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            base: None,
            is_final: false,
            fields: Vec::new(),
            statics: Vec::new(),
            functions: Vec::new(),
        }
    }

    /// Set the base class.
    pub fn with_base(mut self, base: impl Into<String>) -> Self {
        self.base = Some(base.into());
        self
    }

    /// Mark as final.
    pub fn with_final(mut self) -> Self {
        self.is_final = true;
        self
    }

    /// Add a field.
    pub fn with_field(mut self, field: FieldEntry) -> Self {
        self.fields.push(field);
        self
    }

    /// Add a static constant member.
    pub fn with_static(mut self, member: StaticConstEntry) -> Self {
        self.statics.push(member);
        self
    }

    /// Add a member function, constructor, assignment operator or destructor.
    pub fn with_function(mut self, def: FunctionDef) -> Self {
        self.functions.push(def);
        self
    }

    /// Hash of the declared class.
    pub fn type_hash(&self) -> TypeHash {
        TypeHash::from_name(&self.name)
    }
}

/// Registry entry for a class.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassEntry {
    /// Class name.
    pub name: String,
    /// Type hash for identity.
    pub type_hash: TypeHash,

    // === Inheritance ===
    /// Base class type hash (single inheritance).
    pub base_class: Option<TypeHash>,

    // === Members ===
    /// Lifecycle behaviors.
    pub behaviors: Behaviors,
    /// Member functions declared in this class, in declaration order.
    pub methods: Vec<TypeHash>,
    /// Member functions declared in this class, grouped by name.
    pub methods_by_name: FxHashMap<String, Vec<TypeHash>>,
    /// Instance fields in declaration order.
    pub fields: Vec<FieldEntry>,
    /// Static constant members.
    pub statics: Vec<StaticConstEntry>,

    // === Completion ===
    /// Dispatch table, built by the completion pass.
    pub vtable: VTable,

    // === Modifiers ===
    /// Class is marked `final`.
    pub is_final: bool,
    /// Some vtable slot has no non-pure overrider.
    pub is_abstract: bool,
}

impl ClassEntry {
    /// Create an empty class entry.
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        let type_hash = TypeHash::from_name(&name);
        Self {
            name,
            type_hash,
            base_class: None,
            behaviors: Behaviors::default(),
            methods: Vec::new(),
            methods_by_name: FxHashMap::default(),
            fields: Vec::new(),
            statics: Vec::new(),
            vtable: VTable::default(),
            is_final: false,
            is_abstract: false,
        }
    }

    /// Set the base class.
    pub fn with_base(mut self, base: TypeHash) -> Self {
        self.base_class = Some(base);
        self
    }

    /// Record a member function declared in this class.
    pub fn add_method(&mut self, name: &str, func_hash: TypeHash) {
        self.methods.push(func_hash);
        self.methods_by_name
            .entry(name.to_string())
            .or_default()
            .push(func_hash);
    }

    /// Member functions with this name declared directly in this class.
    pub fn methods_named(&self, name: &str) -> &[TypeHash] {
        self.methods_by_name
            .get(name)
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    /// Whether this class declares a member (function or field) with this name.
    ///
    /// A declaration here hides every same-named member of the bases.
    pub fn declares(&self, name: &str) -> bool {
        self.methods_by_name.contains_key(name)
            || self.fields.iter().any(|f| f.name == name)
            || self.statics.iter().any(|s| s.name == name)
    }

    /// Find a field declared directly in this class.
    pub fn find_field(&self, name: &str) -> Option<&FieldEntry> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Find a static constant declared directly in this class.
    pub fn find_static(&self, name: &str) -> Option<&StaticConstEntry> {
        self.statics.iter().find(|s| s.name == name)
    }

    /// Whether objects of this class carry a vtable pointer.
    pub fn is_polymorphic(&self) -> bool {
        !self.vtable.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ConstExpr, DataType, primitives};

    #[test]
    fn decl_builders() {
        let decl = ClassDecl::new("B")
            .with_base("C")
            .with_final()
            .with_field(FieldEntry::new("x", DataType::simple(primitives::INT32)))
            .with_function(FunctionDef::method("get", vec![], DataType::simple(primitives::INT32)));
        assert_eq!(decl.base.as_deref(), Some("C"));
        assert!(decl.is_final);
        assert_eq!(decl.type_hash(), TypeHash::from_name("B"));
        assert_eq!(decl.functions.len(), 1);
    }

    #[test]
    fn declares_covers_all_member_kinds() {
        let mut entry = ClassEntry::new("A");
        entry.add_method("get", TypeHash::from_name("A::get"));
        entry
            .fields
            .push(FieldEntry::new("x", DataType::simple(primitives::INT32)));
        entry.statics.push(StaticConstEntry::new(
            "a",
            DataType::simple(primitives::INT32),
            ConstExpr::int(10),
        ));

        assert!(entry.declares("get"));
        assert!(entry.declares("x"));
        assert!(entry.declares("a"));
        assert!(!entry.declares("missing"));
        assert_eq!(entry.methods_named("get").len(), 1);
        assert!(entry.find_static("a").is_some_and(|s| s.data_type.is_const));
    }

    #[test]
    fn polymorphic_follows_vtable() {
        let mut entry = ClassEntry::new("A");
        assert!(!entry.is_polymorphic());
        entry.vtable.add_method(
            "get",
            TypeHash::from_signature("get", &[], 0),
            TypeHash::from_name("A::get"),
        );
        assert!(entry.is_polymorphic());
    }
}
