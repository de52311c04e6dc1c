//! The `Model`: one registry, completed once, then queried.
//!
//! # Example
//!
//! ```
//! use objmodel::prelude::*;
//!
//! let mut model = Model::new(ModelConfig::default());
//! let int = DataType::simple(primitives::INT32);
//! let base = model
//!     .declare_class(ClassDecl::new("Base").with_function(FunctionDef::method("get", vec![], int)))
//!     .unwrap();
//! let derived = model
//!     .declare_class(
//!         ClassDecl::new("Derived")
//!             .with_base("Base")
//!             .with_function(FunctionDef::method("get", vec![], int)),
//!     )
//!     .unwrap();
//! model.complete().unwrap();
//!
//! // `get` is not virtual: a Base& always calls Base::get.
//! let resolution = model.resolve(base, derived, "get").unwrap();
//! assert_eq!(resolution.owner, base);
//! assert!(!resolution.is_virtual());
//! ```

use objmodel_core::{
    ClassDecl, ConstValue, DataType, ExprInfo, FunctionDef, ModelConfig, ObjectValue, Span,
    TypeHash,
};
use objmodel_registry::{ObjectLayout, SymbolRegistry, TypeCompletionPass, compute_layout};
use objmodel_resolver::{
    ArgValue, Assignment, Construction, EvalContext, MemberCall, OverloadMatch, ParamInit,
    Resolution, ResolutionContext,
};

use crate::error::ModelError;

/// A class model: declarations, then a single completion, then queries.
///
/// Declarations are only accepted before [`complete`](Model::complete);
/// every query is only answered after it.
#[derive(Debug, Default)]
pub struct Model {
    registry: SymbolRegistry,
    config: ModelConfig,
    complete: bool,
}

impl Model {
    /// Create an empty model.
    pub fn new(config: ModelConfig) -> Self {
        Self {
            registry: SymbolRegistry::new(),
            config,
            complete: false,
        }
    }

    /// The configuration the model was created with.
    pub fn config(&self) -> &ModelConfig {
        &self.config
    }

    /// Whether [`complete`](Model::complete) has succeeded.
    pub fn is_complete(&self) -> bool {
        self.complete
    }

    // ========================================================================
    // Declaration
    // ========================================================================

    /// Mutable access to the registry, for declarations.
    pub fn registry_mut(&mut self) -> Result<&mut SymbolRegistry, ModelError> {
        if self.complete {
            return Err(ModelError::AlreadyComplete);
        }
        Ok(&mut self.registry)
    }

    /// The registry.
    pub fn registry(&self) -> &SymbolRegistry {
        &self.registry
    }

    /// Declare a class.
    pub fn declare_class(&mut self, decl: ClassDecl) -> Result<TypeHash, ModelError> {
        Ok(self.registry_mut()?.declare_class(decl)?)
    }

    /// Declare a free function.
    pub fn declare_function(&mut self, def: FunctionDef) -> Result<TypeHash, ModelError> {
        Ok(self.registry_mut()?.register_function(def)?)
    }

    /// Run the completion pass: implicit members, vtables, abstractness.
    pub fn complete(&mut self) -> Result<(), ModelError> {
        if self.complete {
            return Err(ModelError::AlreadyComplete);
        }
        let output = TypeCompletionPass::new(&mut self.registry, self.config).run();
        if !output.is_ok() {
            tracing::debug!(errors = output.errors.len(), "completion failed");
            return Err(ModelError::CompletionFailed(output.errors));
        }
        self.complete = true;
        Ok(())
    }

    fn context(&self) -> Result<ResolutionContext<'_>, ModelError> {
        if !self.complete {
            return Err(ModelError::NotComplete);
        }
        Ok(ResolutionContext::new(&self.registry))
    }

    // ========================================================================
    // Dispatch and overloads
    // ========================================================================

    /// Resolve a zero-argument call of `member` through a `declared&`
    /// referring to a `dynamic` object.
    pub fn resolve(
        &self,
        declared: TypeHash,
        dynamic: TypeHash,
        member: &str,
    ) -> Result<Resolution, ModelError> {
        Ok(objmodel_resolver::resolve(&self.context()?, declared, dynamic, member)?)
    }

    /// Resolve a member call site.
    pub fn call(&self, call: &MemberCall) -> Result<Resolution, ModelError> {
        Ok(objmodel_resolver::resolve_call(&self.context()?, call)?)
    }

    /// Choose among free-function candidates for `args`.
    pub fn call_function(
        &self,
        candidates: &[TypeHash],
        args: &[ExprInfo],
    ) -> Result<OverloadMatch, ModelError> {
        let ctx = self.context()?;
        Ok(objmodel_resolver::resolve_overload(&ctx, candidates, args, Span::default())?)
    }

    // ========================================================================
    // Construction and assignment
    // ========================================================================

    /// Select the constructor for direct-initialization `class(args...)`.
    pub fn construct(&self, class: TypeHash, args: &[ExprInfo]) -> Result<Construction, ModelError> {
        let ctx = self.context()?;
        Ok(objmodel_resolver::select_constructor(&ctx, class, args, Span::default())?)
    }

    /// How `arg` initializes a parameter of type `param`.
    pub fn initialize_parameter(&self, arg: &ExprInfo, param: &DataType) -> Result<ParamInit, ModelError> {
        let ctx = self.context()?;
        Ok(objmodel_resolver::initialize_parameter(&ctx, arg, param, Span::default())?)
    }

    /// Select the assignment `lhs = rhs`.
    pub fn assign(&self, lhs: &ExprInfo, rhs: &ExprInfo) -> Result<Assignment, ModelError> {
        let ctx = self.context()?;
        Ok(objmodel_resolver::select_assignment(&ctx, lhs, rhs, Span::default())?)
    }

    // ========================================================================
    // Constant evaluation and layout
    // ========================================================================

    /// Evaluate a constructor call in the given context.
    pub fn evaluate(
        &self,
        ctor: TypeHash,
        args: &[ArgValue],
        mode: EvalContext,
    ) -> Result<ObjectValue, ModelError> {
        let ctx = self.context()?;
        Ok(objmodel_resolver::evaluate_constructor(&ctx, ctor, args, mode, Span::default())?)
    }

    /// The value of a `static constexpr` member.
    pub fn eval_static(&self, class: TypeHash, name: &str) -> Result<ConstValue, ModelError> {
        let ctx = self.context()?;
        Ok(objmodel_resolver::eval_static(&ctx, class, name, Span::default())?)
    }

    /// Size, alignment and member offsets of a class.
    pub fn layout(&self, class: TypeHash) -> Result<ObjectLayout, ModelError> {
        self.context()?;
        Ok(compute_layout(&self.registry, class, &self.config)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use objmodel_core::{RegistrationError, primitives};

    fn int() -> DataType {
        DataType::simple(primitives::INT32)
    }

    #[test]
    fn queries_require_completion() {
        let mut model = Model::new(ModelConfig::default());
        let a = model.declare_class(ClassDecl::new("A")).unwrap();
        assert_eq!(model.layout(a), Err(ModelError::NotComplete));
        assert!(matches!(model.resolve(a, a, "f"), Err(ModelError::NotComplete)));

        model.complete().unwrap();
        assert!(model.is_complete());
        assert_eq!(model.layout(a).unwrap().size, 1);
    }

    #[test]
    fn declarations_rejected_after_completion() {
        let mut model = Model::new(ModelConfig::default());
        model.complete().unwrap();
        assert_eq!(
            model.declare_class(ClassDecl::new("Late")),
            Err(ModelError::AlreadyComplete)
        );
        assert!(matches!(model.registry_mut(), Err(ModelError::AlreadyComplete)));
        assert_eq!(model.complete(), Err(ModelError::AlreadyComplete));
    }

    #[test]
    fn registration_errors_are_wrapped() {
        let mut model = Model::new(ModelConfig::default());
        model.declare_class(ClassDecl::new("A")).unwrap();
        assert_eq!(
            model.declare_class(ClassDecl::new("A")),
            Err(ModelError::Registration(RegistrationError::DuplicateType("A".into())))
        );
    }

    #[test]
    fn completion_errors_are_collected() {
        let mut model = Model::new(ModelConfig::default());
        model
            .declare_class(ClassDecl::new("Orphan").with_base("Missing"))
            .unwrap();
        let err = model.complete().unwrap_err();
        assert!(matches!(err, ModelError::CompletionFailed(ref errors) if !errors.is_empty()));
        assert!(!model.is_complete());
    }

    #[test]
    fn static_member_through_facade() {
        use objmodel_core::{ConstExpr, StaticConstEntry};

        let mut model = Model::new(ModelConfig::default());
        let limits = model
            .declare_class(
                ClassDecl::new("Limits")
                    .with_static(StaticConstEntry::new("max", int(), ConstExpr::int(40)))
                    .with_function(FunctionDef::method("noop", vec![], DataType::void())),
            )
            .unwrap();
        model.complete().unwrap();
        assert_eq!(model.eval_static(limits, "max").unwrap(), ConstValue::Int(40));
    }
}
