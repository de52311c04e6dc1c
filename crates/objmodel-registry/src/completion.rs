//! Type Completion Pass - finalize classes after declaration.
//!
//! ## Algorithm
//!
//! 1. Build the inheritance graph and sort it topologically (base before
//!    derived). Unknown bases and cycles are reported here.
//! 2. For each class in order:
//!    - reject derivation from a `final` class
//!    - declare the implicit special members the class did not declare
//!    - build the vtable from a copy of the base's: a method whose signature
//!      matches an existing slot overrides it (and becomes virtual whether
//!      or not it was marked), a new `virtual` method appends a slot
//!    - mark the class abstract if a slot still holds a pure method
//!
//! Because classes are processed in topological order, each base is already
//! complete when a derived class copies its vtable.
//!
//! ## Example
//!
//! ```text
//! class A { virtual int get(); virtual int gettwo(); };
//! class C : A { virtual int get(); virtual int gettwo(); };
//! class B : C { virtual int get(); };
//!
//! After completion:
//! - A: [get -> A::get, gettwo -> A::gettwo, ~ -> A::~A]
//! - C: [get -> C::get, gettwo -> C::gettwo, ~ -> C::~C]
//! - B: [get -> B::get, gettwo -> C::gettwo, ~ -> B::~B]
//! ```

use objmodel_core::{
    ClassEntry, DataType, FunctionDef, FunctionKind, FunctionTraits, ModelConfig, Param, RegistrationError,
    SpecialMember, TypeHash, VTable,
};

use crate::{ClassGraph, SymbolRegistry};

/// Vtable signature shared by every destructor, so that a derived
/// destructor overrides a virtual base destructor despite the name change.
pub fn destructor_signature() -> TypeHash {
    TypeHash::from_signature("~", &[], 0)
}

/// Output of the type completion pass.
#[derive(Debug, Default)]
pub struct CompletionOutput {
    /// Number of classes completed.
    pub classes_completed: usize,
    /// Number of vtable slots introduced.
    pub virtual_slots: usize,
    /// Number of methods that override a base slot.
    pub overrides: usize,
    /// Number of implicitly declared special members.
    pub implicit_members: usize,
    /// Collected errors.
    pub errors: Vec<RegistrationError>,
}

impl CompletionOutput {
    /// Whether the pass finished without errors.
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Type Completion Pass - builds vtables and implicit members.
pub struct TypeCompletionPass<'reg> {
    registry: &'reg mut SymbolRegistry,
    config: ModelConfig,
}

impl<'reg> TypeCompletionPass<'reg> {
    /// Create a new type completion pass.
    pub fn new(registry: &'reg mut SymbolRegistry, config: ModelConfig) -> Self {
        Self { registry, config }
    }

    /// Run the type completion pass.
    pub fn run(mut self) -> CompletionOutput {
        let mut output = CompletionOutput::default();

        let ordered = match ClassGraph::build(self.registry)
            .and_then(|graph| graph.topological_order(self.registry))
        {
            Ok(ordered) => ordered,
            Err(e) => {
                output.errors.push(e);
                return output;
            }
        };

        for class_hash in ordered {
            match self.complete_class(class_hash, &mut output) {
                Ok(()) => output.classes_completed += 1,
                Err(e) => output.errors.push(e),
            }
        }

        tracing::debug!(
            classes = output.classes_completed,
            slots = output.virtual_slots,
            overrides = output.overrides,
            implicit = output.implicit_members,
            errors = output.errors.len(),
            "type completion finished"
        );
        output
    }

    fn complete_class(
        &mut self,
        class_hash: TypeHash,
        output: &mut CompletionOutput,
    ) -> Result<(), RegistrationError> {
        let class = self.class(class_hash)?;
        if let Some(base) = class.base_class
            && let Some(base_class) = self.registry.get_class(base)
            && base_class.is_final
        {
            return Err(RegistrationError::FinalBase {
                type_name: class.name.clone(),
                base: base_class.name.clone(),
            });
        }

        if self.config.implicit_special_members {
            self.declare_implicit_members(class_hash, output)?;
        }
        self.build_vtable(class_hash, output)
    }

    fn class(&self, hash: TypeHash) -> Result<&ClassEntry, RegistrationError> {
        self.registry
            .get_class(hash)
            .ok_or_else(|| RegistrationError::TypeNotFound(hash.to_string()))
    }

    /// Special members declared for a class, with whether each is deleted.
    fn declared_specials(&self, class_hash: TypeHash) -> Result<Vec<(SpecialMember, bool)>, RegistrationError> {
        let class = self.class(class_hash)?;
        Ok(class
            .behaviors
            .constructors
            .iter()
            .chain(class.behaviors.assignments.iter())
            .chain(class.behaviors.destructor.iter())
            .filter_map(|h| self.registry.get_function(*h))
            .filter_map(|f| f.def.special_member().map(|s| (s, f.def.is_deleted())))
            .collect())
    }

    /// Declare the copy/move constructors, assignment operators, default
    /// constructor and destructor the class did not declare itself.
    fn declare_implicit_members(
        &mut self,
        class_hash: TypeHash,
        output: &mut CompletionOutput,
    ) -> Result<(), RegistrationError> {
        let class = self.class(class_hash)?;
        let name = class.name.clone();
        let has_any_constructor = class.behaviors.has_constructors();
        let base = class.base_class;

        let declared = self.declared_specials(class_hash)?;
        let has = |kind: SpecialMember| declared.iter().any(|(s, _)| *s == kind);

        // A base whose copy constructor, copy assignment or default
        // constructor is missing or deleted makes the implicit one deleted too.
        let (base_copy_unusable, base_copy_assign_unusable, base_default_unusable) = match base {
            Some(base) => {
                let base_specials = self.declared_specials(base)?;
                let unusable = |kind: SpecialMember| {
                    !base_specials.iter().any(|(s, deleted)| *s == kind && !deleted)
                };
                (
                    unusable(SpecialMember::CopyConstructor),
                    unusable(SpecialMember::CopyAssignment),
                    unusable(SpecialMember::DefaultConstructor),
                )
            }
            None => (false, false, false),
        };

        let this = DataType::simple(class_hash);
        let declares_move = has(SpecialMember::MoveConstructor) || has(SpecialMember::MoveAssignment);
        let declares_any_copy_control = has(SpecialMember::CopyConstructor)
            || has(SpecialMember::CopyAssignment)
            || declares_move
            || has(SpecialMember::Destructor);

        let mut implicit: Vec<FunctionDef> = Vec::new();

        if !has_any_constructor {
            implicit.push(
                FunctionDef::constructor(&name, vec![])
                    .as_constexpr()
                    .with_initializers(vec![])
                    .with_traits(deleted_if(base_default_unusable)),
            );
        }
        if !has(SpecialMember::CopyConstructor) {
            implicit.push(
                FunctionDef::constructor(&name, vec![Param::new("other", this.as_const_ref())])
                    .with_traits(deleted_if(declares_move || base_copy_unusable)),
            );
        }
        if !declares_any_copy_control {
            implicit.push(FunctionDef::constructor(
                &name,
                vec![Param::new("other", this.as_rvalue_ref())],
            ));
        }
        if !has(SpecialMember::CopyAssignment) {
            implicit.push(
                FunctionDef::assignment(&name, Param::new("other", this.as_const_ref()))
                    .with_traits(deleted_if(declares_move || base_copy_assign_unusable)),
            );
        }
        if !declares_any_copy_control {
            implicit.push(FunctionDef::assignment(
                &name,
                Param::new("other", this.as_rvalue_ref()),
            ));
        }
        if !has(SpecialMember::Destructor) {
            implicit.push(FunctionDef::destructor(&name));
        }

        for def in implicit {
            let def = def
                .with_owner(class_hash)
                .with_traits(FunctionTraits::IMPLICIT);
            tracing::debug!(
                class = %name,
                member = ?def.special_member(),
                deleted = def.is_deleted(),
                "declared implicit member"
            );
            self.registry.add_member(class_hash, def)?;
            output.implicit_members += 1;
        }
        Ok(())
    }

    fn build_vtable(
        &mut self,
        class_hash: TypeHash,
        output: &mut CompletionOutput,
    ) -> Result<(), RegistrationError> {
        // Phase 1: compute the table (immutable borrow)
        let (vtable, became_virtual) = {
            let class = self.class(class_hash)?;
            let mut vtable = match class.base_class {
                Some(base) => self.class(base)?.vtable.clone(),
                None => VTable::new(),
            };
            let mut became_virtual = Vec::new();

            let members = class.methods.iter().chain(class.behaviors.destructor.iter());
            for &func_hash in members {
                let Some(func) = self.registry.get_function(func_hash) else {
                    continue;
                };
                let (signature, slot_name) = if func.def.kind == FunctionKind::Destructor {
                    (destructor_signature(), "~")
                } else {
                    (func.signature_hash, func.def.name.as_str())
                };

                if let Some(slot) = vtable.slot_by_signature(signature) {
                    if let Some(overridden) = vtable.method_at(slot).and_then(|h| self.registry.get_function(h))
                        && overridden.def.traits.contains(FunctionTraits::FINAL)
                    {
                        return Err(RegistrationError::OverridesFinal {
                            type_name: class.name.clone(),
                            method: func.def.name.clone(),
                            base: overridden
                                .def
                                .owner
                                .map(|o| self.registry.type_name(o))
                                .unwrap_or_default(),
                        });
                    }
                    vtable.override_method(signature, func_hash);
                    if !func.def.is_virtual() {
                        became_virtual.push(func_hash);
                    }
                    output.overrides += 1;
                } else if func.def.is_virtual() {
                    vtable.add_method(slot_name, signature, func_hash);
                    output.virtual_slots += 1;
                } else if func.def.traits.contains(FunctionTraits::OVERRIDE) {
                    return Err(RegistrationError::NothingToOverride {
                        type_name: class.name.clone(),
                        method: func.def.name.clone(),
                    });
                } else if func.def.traits.contains(FunctionTraits::FINAL) {
                    return Err(RegistrationError::InvalidDeclaration(format!(
                        "'{}' is final but not virtual",
                        func.qualified_name
                    )));
                }
            }
            (vtable, became_virtual)
        };

        // Phase 2: apply (mutable borrow)
        for func_hash in became_virtual {
            if let Some(func) = self.registry.get_function_mut(func_hash) {
                func.def.traits |= FunctionTraits::VIRTUAL;
            }
        }
        let is_abstract = vtable.methods.iter().any(|h| {
            self.registry
                .get_function(*h)
                .is_some_and(|f| f.def.is_pure())
        });

        let class = self
            .registry
            .get_class_mut(class_hash)
            .ok_or_else(|| RegistrationError::TypeNotFound(class_hash.to_string()))?;
        tracing::debug!(
            class = %class.name,
            slots = vtable.len(),
            is_abstract,
            "built vtable"
        );
        class.vtable = vtable;
        class.is_abstract = is_abstract;
        Ok(())
    }
}

fn deleted_if(condition: bool) -> FunctionTraits {
    if condition {
        FunctionTraits::DELETED
    } else {
        FunctionTraits::empty()
    }
}
