//! ResolutionContext - read-only view of a completed registry.
//!
//! Every resolution routine takes a `&ResolutionContext`. It never mutates
//! the registry, so one context can serve any number of call sites.

use objmodel_core::{
    ClassEntry, CompilationError, DataType, ExprInfo, FunctionEntry, Span, TypeHash,
};
use objmodel_registry::SymbolRegistry;

/// Lookup helpers shared by the resolver modules.
#[derive(Clone, Copy)]
pub struct ResolutionContext<'a> {
    registry: &'a SymbolRegistry,
}

impl<'a> ResolutionContext<'a> {
    /// Create a context over a completed registry.
    pub fn new(registry: &'a SymbolRegistry) -> Self {
        Self { registry }
    }

    /// The underlying registry.
    pub fn registry(&self) -> &'a SymbolRegistry {
        self.registry
    }

    /// Get a class by hash.
    pub fn get_class(&self, hash: TypeHash) -> Option<&'a ClassEntry> {
        self.registry.get_class(hash)
    }

    /// Get a class by hash or report it as unknown.
    pub fn require_class(&self, hash: TypeHash, span: Span) -> Result<&'a ClassEntry, CompilationError> {
        self.registry
            .get_class(hash)
            .ok_or_else(|| CompilationError::UnknownType {
                name: self.registry.type_name(hash),
                span,
            })
    }

    /// Get a function by hash.
    pub fn get_function(&self, hash: TypeHash) -> Option<&'a FunctionEntry> {
        self.registry.get_function(hash)
    }

    /// Get a function by hash, treating a dangling hash as an internal error.
    pub fn require_function(&self, hash: TypeHash) -> Result<&'a FunctionEntry, CompilationError> {
        self.registry
            .get_function(hash)
            .ok_or_else(|| CompilationError::Internal {
                message: format!("function {hash} is referenced but not registered"),
            })
    }

    /// Whether `derived` is `base` or derives from it.
    pub fn is_same_or_derived(&self, derived: TypeHash, base: TypeHash) -> bool {
        self.registry.is_same_or_derived(derived, base)
    }

    /// Display name of a type hash.
    pub fn type_name(&self, hash: TypeHash) -> String {
        self.registry.type_name(hash)
    }

    /// Render a declared type the way it is spelled (`const Data&`).
    pub fn format_type(&self, data_type: &DataType) -> String {
        let mut out = String::new();
        if data_type.is_pointer {
            if data_type.is_pointee_const {
                out.push_str("const ");
            }
            out.push_str(&self.type_name(data_type.type_hash));
            out.push('*');
            if data_type.is_const {
                out.push_str(" const");
            }
        } else {
            if data_type.is_const {
                out.push_str("const ");
            }
            out.push_str(&self.type_name(data_type.type_hash));
        }
        out.push_str(&data_type.ref_kind.to_string());
        out
    }

    /// Render an argument expression (`const Data lvalue`).
    pub fn format_expr(&self, expr: &ExprInfo) -> String {
        format!("{} {}", self.format_type(&expr.data_type), expr.category)
    }

    /// Render a function signature (`Data::Data(const Data&)`).
    pub fn format_signature(&self, func: &FunctionEntry) -> String {
        let params: Vec<String> = func
            .def
            .params
            .iter()
            .map(|p| self.format_type(&p.data_type))
            .collect();
        let mut out = format!("{}({})", func.qualified_name, params.join(", "));
        if func.def.is_const() {
            out.push_str(" const");
        }
        match func.def.ref_qualifier {
            objmodel_core::RefQualifier::None => {}
            objmodel_core::RefQualifier::Lvalue => out.push_str(" &"),
            objmodel_core::RefQualifier::Rvalue => out.push_str(" &&"),
        }
        out
    }
}
