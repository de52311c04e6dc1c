//! Local variables, block scopes and destruction order.
//!
//! `LocalScope` tracks the locals of one function body:
//! - declaration with redeclaration checks and shadowing across blocks
//! - initialization checked with the parameter initialization rules
//! - the objects each block owns, reported in reverse declaration order
//!   when the block ends
//!
//! A reference local owns nothing, except when it is bound to a temporary:
//! the temporary then lives until the reference's block ends.
//!
//! ```text
//! {
//!     Data a;
//!     const Data& r = Data();   // temporary extended to the block
//!     Data& alias = a;          // owns nothing
//!     Data b;
//! }                             // destroys b, the temporary, a
//! ```

use objmodel_core::{CompilationError, DataType, ExprInfo, Span, TypeHash};
use rustc_hash::FxHashMap;

use crate::construction::{ParamInit, initialize_parameter};
use crate::context::ResolutionContext;

// ============================================================================
// Types
// ============================================================================

/// Information about a local variable.
#[derive(Debug, Clone)]
pub struct LocalVar {
    /// Variable name
    pub name: String,
    /// Declared type, including reference kind
    pub data_type: DataType,
    /// Scope depth where declared
    pub depth: u32,
    /// Source location of declaration
    pub span: Span,
}

/// An object destroyed when a block ends.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Destroyed {
    /// The variable owning the object (or the reference extending it).
    pub name: String,
    /// The object's type.
    pub type_hash: TypeHash,
    /// Whether the object is a lifetime-extended temporary.
    pub is_temporary: bool,
}

#[derive(Debug, Clone)]
struct LiveObject {
    depth: u32,
    object: Destroyed,
}

// ============================================================================
// LocalScope
// ============================================================================

/// Local scope of one function body.
#[derive(Debug, Default)]
pub struct LocalScope {
    /// Variables by name in current scope chain
    variables: FxHashMap<String, LocalVar>,

    /// Current scope depth (0 = function scope)
    scope_depth: u32,

    /// Shadowed variables as (shadowing depth, name, old variable)
    shadowed: Vec<(u32, String, LocalVar)>,

    /// Objects alive, in construction order
    live: Vec<LiveObject>,
}

impl LocalScope {
    /// Create a new local scope for a function.
    pub fn new() -> Self {
        Self::default()
    }

    // ==========================================================================
    // Scope Management
    // ==========================================================================

    /// Enter a new block.
    pub fn push_scope(&mut self) {
        self.scope_depth += 1;
    }

    /// Leave the current block, returning the objects it destroys in
    /// destruction order.
    pub fn pop_scope(&mut self) -> Vec<Destroyed> {
        let depth = self.scope_depth;
        self.variables.retain(|_, var| var.depth < depth);

        while let Some((shadowing_depth, _, _)) = self.shadowed.last() {
            if *shadowing_depth != depth {
                break;
            }
            if let Some((_, name, var)) = self.shadowed.pop() {
                self.variables.insert(name, var);
            }
        }

        let split = self
            .live
            .iter()
            .position(|o| o.depth >= depth)
            .unwrap_or(self.live.len());
        let destroyed: Vec<Destroyed> = self.live.drain(split..).rev().map(|o| o.object).collect();
        tracing::trace!(depth, destroyed = destroyed.len(), "block ended");

        self.scope_depth = depth.saturating_sub(1);
        destroyed
    }

    /// Get current scope depth.
    pub fn depth(&self) -> u32 {
        self.scope_depth
    }

    // ==========================================================================
    // Variable Declaration
    // ==========================================================================

    /// Declare a local variable, optionally initialized from `init`.
    ///
    /// Returns how the variable is initialized. A reference must be
    /// initialized, and binds under the same rules as a reference parameter.
    pub fn declare(
        &mut self,
        ctx: &ResolutionContext<'_>,
        name: impl Into<String>,
        data_type: DataType,
        init: Option<&ExprInfo>,
        span: Span,
    ) -> Result<Option<ParamInit>, CompilationError> {
        let name = name.into();
        if let Some(existing) = self.variables.get(&name) {
            if existing.depth == self.scope_depth {
                return Err(CompilationError::VariableRedeclaration {
                    name,
                    original_span: existing.span,
                    new_span: span,
                });
            }
        }

        let init = match init {
            Some(expr) => Some(initialize_parameter(ctx, expr, &data_type, span)?),
            None if data_type.is_reference() => {
                return Err(CompilationError::CannotBind {
                    message: format!("reference '{name}' must be initialized"),
                    span,
                });
            }
            None => None,
        };

        let owned = if data_type.is_reference() {
            matches!(
                &init,
                Some(ParamInit::Bound(m)) if m.binding.is_some_and(|b| b.binds_temporary)
            )
            .then_some(true)
        } else {
            Some(false)
        };
        if let Some(is_temporary) = owned {
            self.live.push(LiveObject {
                depth: self.scope_depth,
                object: Destroyed {
                    name: name.clone(),
                    type_hash: data_type.type_hash,
                    is_temporary,
                },
            });
        }

        tracing::trace!(name = %name, depth = self.scope_depth, owns = owned.is_some(), "declared local");
        let local = LocalVar {
            name: name.clone(),
            data_type,
            depth: self.scope_depth,
            span,
        };
        if let Some(outer) = self.variables.insert(name.clone(), local) {
            self.shadowed.push((self.scope_depth, name, outer));
        }
        Ok(init)
    }

    // ==========================================================================
    // Variable Lookup
    // ==========================================================================

    /// Look up a variable by name.
    pub fn get(&self, name: &str) -> Option<&LocalVar> {
        self.variables.get(name)
    }

    /// The expression naming a variable. Always an lvalue.
    pub fn lookup(&self, name: &str, span: Span) -> Result<ExprInfo, CompilationError> {
        self.variables
            .get(name)
            .map(|var| ExprInfo::named(var.data_type))
            .ok_or_else(|| CompilationError::UndefinedVariable {
                name: name.to_string(),
                span,
            })
    }

    /// Check if a name is declared in the current block.
    pub fn is_declared_in_current_scope(&self, name: &str) -> bool {
        self.variables
            .get(name)
            .is_some_and(|v| v.depth == self.scope_depth)
    }
}
