//! SymbolRegistry - class and function storage.
//!
//! # Storage Model
//!
//! - **Classes**: `ClassEntry` by `TypeHash`, with a name index
//! - **Functions**: every function (free functions, methods, constructors,
//!   assignment operators, destructors) in one map by `TypeHash`. Classes
//!   reference their members by hash.
//!
//! # Thread Safety
//!
//! `SymbolRegistry` is not thread-safe. Classes are declared and completed
//! single-threaded; afterwards the registry is read-only and can be shared
//! by reference.
//!
//! # Example
//!
//! ```
//! use objmodel_core::{ClassDecl, DataType, FunctionDef, primitives};
//! use objmodel_registry::SymbolRegistry;
//!
//! let mut registry = SymbolRegistry::new();
//! let base = registry
//!     .declare_class(ClassDecl::new("Base").with_function(FunctionDef::method(
//!         "myFunc",
//!         vec![],
//!         DataType::simple(primitives::INT32),
//!     )))
//!     .unwrap();
//! let derived = registry
//!     .declare_class(ClassDecl::new("Derived").with_base("Base"))
//!     .unwrap();
//!
//! assert!(registry.is_derived_from(derived, base));
//! assert_eq!(registry.type_name(derived), "Derived");
//! ```

use rustc_hash::FxHashMap;

use objmodel_core::{
    ClassDecl, ClassEntry, FunctionDef, FunctionEntry, FunctionKind, PrimitiveKind,
    RegistrationError, TypeHash,
};

/// Class and function registry.
#[derive(Debug, Default)]
pub struct SymbolRegistry {
    /// Classes by hash.
    classes: FxHashMap<TypeHash, ClassEntry>,
    /// Class declaration order, for deterministic iteration.
    class_order: Vec<TypeHash>,
    /// Name index for classes.
    class_names: FxHashMap<String, TypeHash>,
    /// All functions by hash.
    functions: FxHashMap<TypeHash, FunctionEntry>,
    /// Free functions grouped by name (overload sets).
    free_functions: FxHashMap<String, Vec<TypeHash>>,
}

impl SymbolRegistry {
    /// Create an empty registry. Primitive types are always known.
    pub fn new() -> Self {
        Self::default()
    }

    // ==========================================================================
    // Registration
    // ==========================================================================

    /// Register a class and all of its member functions.
    ///
    /// The base class is recorded by hash and need not be declared yet; the
    /// completion pass verifies it.
    pub fn declare_class(&mut self, decl: ClassDecl) -> Result<TypeHash, RegistrationError> {
        let type_hash = decl.type_hash();
        if self.classes.contains_key(&type_hash) || PrimitiveKind::from_hash(type_hash).is_some() {
            return Err(RegistrationError::DuplicateType(decl.name));
        }

        let mut entry = ClassEntry::new(decl.name.clone());
        entry.base_class = decl.base.as_deref().map(TypeHash::from_name);
        entry.is_final = decl.is_final;

        for field in decl.fields {
            if entry.declares(&field.name) {
                return Err(RegistrationError::DuplicateMember {
                    type_name: decl.name,
                    member: field.name,
                });
            }
            entry.fields.push(field);
        }
        for member in decl.statics {
            if entry.declares(&member.name) {
                return Err(RegistrationError::DuplicateMember {
                    type_name: decl.name,
                    member: member.name,
                });
            }
            entry.statics.push(member);
        }

        // Functions are validated against a scratch entry before anything
        // reaches the function map, so a failed declaration leaves no trace.
        let mut pending = Vec::with_capacity(decl.functions.len());
        for def in decl.functions {
            let def = def.with_owner(type_hash);
            let func = FunctionEntry::new(def, Some(&decl.name));
            if pending
                .iter()
                .any(|f: &FunctionEntry| f.func_hash == func.func_hash)
            {
                return Err(RegistrationError::DuplicateMember {
                    type_name: decl.name,
                    member: func.def.name,
                });
            }
            Self::attach(&mut entry, &func)?;
            pending.push(func);
        }

        for func in pending {
            self.functions.insert(func.func_hash, func);
        }
        tracing::debug!(class = %decl.name, "declared class");
        self.class_names.insert(decl.name, type_hash);
        self.class_order.push(type_hash);
        self.classes.insert(type_hash, entry);
        Ok(type_hash)
    }

    /// Record a member function in its class's tables.
    fn attach(class: &mut ClassEntry, func: &FunctionEntry) -> Result<(), RegistrationError> {
        match func.def.kind {
            FunctionKind::Method => {
                if class.find_field(&func.def.name).is_some() {
                    return Err(RegistrationError::DuplicateMember {
                        type_name: class.name.clone(),
                        member: func.def.name.clone(),
                    });
                }
                class.add_method(&func.def.name, func.func_hash);
            }
            FunctionKind::Constructor => class.behaviors.add_constructor(func.func_hash),
            FunctionKind::Assignment => class.behaviors.add_assignment(func.func_hash),
            FunctionKind::Destructor => {
                if class.behaviors.destructor.is_some() {
                    return Err(RegistrationError::DuplicateMember {
                        type_name: class.name.clone(),
                        member: func.def.name.clone(),
                    });
                }
                class.behaviors.destructor = Some(func.func_hash);
            }
            FunctionKind::Function => {
                return Err(RegistrationError::InvalidDeclaration(format!(
                    "free function '{}' declared as a member of '{}'",
                    func.def.name, class.name
                )));
            }
        }
        Ok(())
    }

    /// Register a free function.
    pub fn register_function(&mut self, def: FunctionDef) -> Result<TypeHash, RegistrationError> {
        if def.kind != FunctionKind::Function {
            return Err(RegistrationError::InvalidDeclaration(format!(
                "'{}' is a member function; declare it with its class",
                def.name
            )));
        }
        let func = FunctionEntry::new(def, None);
        let hash = func.func_hash;
        if self.functions.contains_key(&hash) {
            return Err(RegistrationError::DuplicateMember {
                type_name: String::from("<global>"),
                member: func.def.name,
            });
        }
        self.free_functions
            .entry(func.def.name.clone())
            .or_default()
            .push(hash);
        self.functions.insert(hash, func);
        Ok(hash)
    }

    /// Add a member function to an already registered class.
    ///
    /// Used by the completion pass for implicitly declared members.
    pub fn add_member(&mut self, owner: TypeHash, def: FunctionDef) -> Result<TypeHash, RegistrationError> {
        let class = self
            .classes
            .get_mut(&owner)
            .ok_or_else(|| RegistrationError::TypeNotFound(owner.to_string()))?;
        let func = FunctionEntry::new(def.with_owner(owner), Some(&class.name));
        let hash = func.func_hash;
        if self.functions.contains_key(&hash) {
            return Err(RegistrationError::DuplicateMember {
                type_name: class.name.clone(),
                member: func.def.name,
            });
        }
        Self::attach(class, &func)?;
        self.functions.insert(hash, func);
        Ok(hash)
    }

    // ==========================================================================
    // Lookup
    // ==========================================================================

    /// Get a class by hash.
    pub fn get_class(&self, hash: TypeHash) -> Option<&ClassEntry> {
        self.classes.get(&hash)
    }

    /// Get a mutable class by hash.
    pub fn get_class_mut(&mut self, hash: TypeHash) -> Option<&mut ClassEntry> {
        self.classes.get_mut(&hash)
    }

    /// Get a class by name.
    pub fn get_class_by_name(&self, name: &str) -> Option<&ClassEntry> {
        self.class_names.get(name).and_then(|h| self.classes.get(h))
    }

    /// Whether a class with this hash exists.
    pub fn contains_class(&self, hash: TypeHash) -> bool {
        self.classes.contains_key(&hash)
    }

    /// Get a function by hash.
    pub fn get_function(&self, hash: TypeHash) -> Option<&FunctionEntry> {
        self.functions.get(&hash)
    }

    /// Get a mutable function by hash.
    pub fn get_function_mut(&mut self, hash: TypeHash) -> Option<&mut FunctionEntry> {
        self.functions.get_mut(&hash)
    }

    /// Free function overloads with this name.
    pub fn functions_named(&self, name: &str) -> &[TypeHash] {
        self.free_functions
            .get(name)
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    /// All classes in declaration order.
    pub fn classes(&self) -> impl Iterator<Item = &ClassEntry> {
        self.class_order.iter().filter_map(|h| self.classes.get(h))
    }

    /// Number of classes.
    pub fn class_count(&self) -> usize {
        self.classes.len()
    }

    /// Number of functions of every kind.
    pub fn function_count(&self) -> usize {
        self.functions.len()
    }

    /// Display name of a type: the primitive spelling, the class name, or
    /// the hash for unknown types.
    pub fn type_name(&self, hash: TypeHash) -> String {
        if let Some(kind) = PrimitiveKind::from_hash(hash) {
            return kind.name().to_string();
        }
        match self.classes.get(&hash) {
            Some(class) => class.name.clone(),
            None => hash.to_string(),
        }
    }

    // ==========================================================================
    // Inheritance
    // ==========================================================================

    /// Get the inheritance chain for a class (excluding the class itself).
    ///
    /// Returns base classes from immediate parent to root. Stops at an
    /// unknown base and never loops on a cyclic declaration.
    pub fn base_class_chain(&self, hash: TypeHash) -> Vec<&ClassEntry> {
        let mut chain: Vec<&ClassEntry> = Vec::new();
        let mut current = hash;

        while let Some(class) = self.classes.get(&current)
            && let Some(base) = class.base_class
            && let Some(base_class) = self.classes.get(&base)
        {
            if base == hash || chain.iter().any(|c| c.type_hash == base) {
                break;
            }
            chain.push(base_class);
            current = base;
        }

        chain
    }

    /// The class itself followed by its bases, most derived first.
    pub fn self_and_bases(&self, hash: TypeHash) -> Vec<&ClassEntry> {
        let mut chain: Vec<&ClassEntry> = self.classes.get(&hash).into_iter().collect();
        chain.extend(self.base_class_chain(hash));
        chain
    }

    /// Number of derivation steps from `derived` up to `base`.
    ///
    /// `Some(0)` when they are the same class, `None` when `base` is not an
    /// ancestor.
    pub fn derivation_depth(&self, derived: TypeHash, base: TypeHash) -> Option<usize> {
        if derived == base {
            return Some(0);
        }
        self.base_class_chain(derived)
            .iter()
            .position(|c| c.type_hash == base)
            .map(|i| i + 1)
    }

    /// Whether `derived` is a proper descendant of `base`.
    pub fn is_derived_from(&self, derived: TypeHash, base: TypeHash) -> bool {
        derived != base && self.derivation_depth(derived, base).is_some()
    }

    /// Whether `derived` is `base` or one of its descendants.
    pub fn is_same_or_derived(&self, derived: TypeHash, base: TypeHash) -> bool {
        self.derivation_depth(derived, base).is_some()
    }
}
