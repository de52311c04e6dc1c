//! Function definitions and registry entries.
//!
//! [`FunctionDef`] is what a caller declares: name, parameters, return type,
//! traits and (for constant-evaluable functions) a body. [`FunctionEntry`]
//! is what the registry stores once the owner is known and the identity
//! hashes are computed.

use bitflags::bitflags;

use crate::{ConstExpr, DataType, TypeHash, Visibility};

bitflags! {
    /// Declaration traits of a function.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct FunctionTraits: u16 {
        /// Declared `virtual`, or found to override a virtual method.
        const VIRTUAL = 1 << 0;
        /// Declared `override`.
        const OVERRIDE = 1 << 1;
        /// Declared `final`: no further overriding.
        const FINAL = 1 << 2;
        /// Pure virtual (`= 0`).
        const PURE = 1 << 3;
        /// Const member function.
        const CONST = 1 << 4;
        /// Usable in constant evaluation.
        const CONSTEXPR = 1 << 5;
        /// Constructor not usable for implicit conversions.
        const EXPLICIT = 1 << 6;
        /// Declared `= delete`.
        const DELETED = 1 << 7;
        /// Declared by the completion pass rather than the user.
        const IMPLICIT = 1 << 8;
    }
}

/// Ref-qualifier of a member function's implicit object parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RefQualifier {
    /// No ref-qualifier: callable on lvalues and rvalues.
    #[default]
    None,
    /// `&`: callable on lvalue objects.
    Lvalue,
    /// `&&`: callable on rvalue objects.
    Rvalue,
}

/// What kind of function a definition declares.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FunctionKind {
    /// A free function.
    Function,
    /// A member function.
    Method,
    /// A constructor.
    Constructor,
    /// An assignment operator (`operator=`).
    Assignment,
    /// The destructor.
    Destructor,
}

/// Copy and move special members, as classified from their signatures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpecialMember {
    DefaultConstructor,
    CopyConstructor,
    MoveConstructor,
    CopyAssignment,
    MoveAssignment,
    Destructor,
}

/// A function parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct Param {
    /// Parameter name (may be empty).
    pub name: String,
    /// Declared type, including reference kind.
    pub data_type: DataType,
}

impl Param {
    /// Create a named parameter.
    pub fn new(name: impl Into<String>, data_type: DataType) -> Self {
        Self {
            name: name.into(),
            data_type,
        }
    }

    /// Create an unnamed parameter.
    pub fn unnamed(data_type: DataType) -> Self {
        Self::new("", data_type)
    }
}

/// One entry of a constructor's member initializer list.
#[derive(Debug, Clone, PartialEq)]
pub struct MemberInit {
    /// The field being initialized.
    pub field: String,
    /// Its initializer.
    pub value: ConstExpr,
}

/// Delegation to a base class constructor.
#[derive(Debug, Clone, PartialEq)]
pub struct BaseInit {
    /// The base constructor invoked.
    pub constructor: TypeHash,
    /// Arguments, in terms of the derived constructor's parameters.
    pub args: Vec<ConstExpr>,
}

/// The evaluable body of a function.
#[derive(Debug, Clone, PartialEq)]
pub enum FunctionBody {
    /// A constructor's base initializer and member initializer list.
    Initializers {
        base: Option<BaseInit>,
        members: Vec<MemberInit>,
    },
    /// A function that returns a single expression.
    Returns(ConstExpr),
}

/// A function declaration.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionDef {
    /// Function name. Constructors use the class name.
    pub name: String,
    /// Owning class, `None` for free functions.
    pub owner: Option<TypeHash>,
    /// What kind of function this is.
    pub kind: FunctionKind,
    /// Parameters in order.
    pub params: Vec<Param>,
    /// Return type.
    pub return_type: DataType,
    /// Declaration traits.
    pub traits: FunctionTraits,
    /// Ref-qualifier of the implicit object parameter.
    pub ref_qualifier: RefQualifier,
    /// Access specifier.
    pub visibility: Visibility,
    /// Body, when the function can be evaluated.
    pub body: Option<FunctionBody>,
}

impl FunctionDef {
    fn base(name: impl Into<String>, kind: FunctionKind, params: Vec<Param>) -> Self {
        Self {
            name: name.into(),
            owner: None,
            kind,
            params,
            return_type: DataType::void(),
            traits: FunctionTraits::empty(),
            ref_qualifier: RefQualifier::None,
            visibility: Visibility::Public,
            body: None,
        }
    }

    /// A free function.
    pub fn function(name: impl Into<String>, params: Vec<Param>, return_type: DataType) -> Self {
        Self {
            return_type,
            ..Self::base(name, FunctionKind::Function, params)
        }
    }

    /// A member function. The owner is filled in on declaration.
    pub fn method(name: impl Into<String>, params: Vec<Param>, return_type: DataType) -> Self {
        Self {
            return_type,
            ..Self::base(name, FunctionKind::Method, params)
        }
    }

    /// A constructor of `class`.
    pub fn constructor(class: &str, params: Vec<Param>) -> Self {
        Self::base(class, FunctionKind::Constructor, params)
    }

    /// An assignment operator taking `param`. Returns `class&`.
    pub fn assignment(class: &str, param: Param) -> Self {
        Self {
            return_type: DataType::simple(TypeHash::from_name(class)).as_lvalue_ref(),
            ..Self::base("operator=", FunctionKind::Assignment, vec![param])
        }
    }

    /// The destructor of `class`.
    pub fn destructor(class: &str) -> Self {
        Self::base(format!("~{class}"), FunctionKind::Destructor, Vec::new())
    }

    // === Builder Methods ===

    /// Set the owning class.
    pub fn with_owner(mut self, owner: TypeHash) -> Self {
        self.owner = Some(owner);
        self
    }

    /// Add traits.
    pub fn with_traits(mut self, traits: FunctionTraits) -> Self {
        self.traits |= traits;
        self
    }

    /// Mark `virtual`.
    pub fn as_virtual(self) -> Self {
        self.with_traits(FunctionTraits::VIRTUAL)
    }

    /// Mark `override`.
    pub fn as_override(self) -> Self {
        self.with_traits(FunctionTraits::OVERRIDE)
    }

    /// Mark `final`.
    pub fn as_final(self) -> Self {
        self.with_traits(FunctionTraits::FINAL)
    }

    /// Mark pure virtual.
    pub fn as_pure(self) -> Self {
        self.with_traits(FunctionTraits::VIRTUAL | FunctionTraits::PURE)
    }

    /// Mark as a const member function.
    pub fn as_const(self) -> Self {
        self.with_traits(FunctionTraits::CONST)
    }

    /// Mark constant-evaluable.
    pub fn as_constexpr(self) -> Self {
        self.with_traits(FunctionTraits::CONSTEXPR)
    }

    /// Mark `explicit`.
    pub fn as_explicit(self) -> Self {
        self.with_traits(FunctionTraits::EXPLICIT)
    }

    /// Mark `= delete`.
    pub fn as_deleted(self) -> Self {
        self.with_traits(FunctionTraits::DELETED)
    }

    /// Set the ref-qualifier.
    pub fn with_ref_qualifier(mut self, qualifier: RefQualifier) -> Self {
        self.ref_qualifier = qualifier;
        self
    }

    /// Set the access specifier.
    pub fn with_visibility(mut self, visibility: Visibility) -> Self {
        self.visibility = visibility;
        self
    }

    /// Set the member initializer list of a constructor.
    pub fn with_initializers(mut self, members: Vec<MemberInit>) -> Self {
        let base = match self.body.take() {
            Some(FunctionBody::Initializers { base, .. }) => base,
            _ => None,
        };
        self.body = Some(FunctionBody::Initializers { base, members });
        self
    }

    /// Delegate to a base class constructor.
    pub fn with_base_init(mut self, constructor: TypeHash, args: Vec<ConstExpr>) -> Self {
        let members = match self.body.take() {
            Some(FunctionBody::Initializers { members, .. }) => members,
            _ => Vec::new(),
        };
        self.body = Some(FunctionBody::Initializers {
            base: Some(BaseInit { constructor, args }),
            members,
        });
        self
    }

    /// Set the returned expression of an evaluable function.
    pub fn with_return(mut self, expr: ConstExpr) -> Self {
        self.body = Some(FunctionBody::Returns(expr));
        self
    }

    // === Query Methods ===

    /// Whether the function is (explicitly or implicitly) virtual.
    pub fn is_virtual(&self) -> bool {
        self.traits.contains(FunctionTraits::VIRTUAL)
    }

    /// Whether the function is pure virtual.
    pub fn is_pure(&self) -> bool {
        self.traits.contains(FunctionTraits::PURE)
    }

    /// Whether this is a const member function.
    pub fn is_const(&self) -> bool {
        self.traits.contains(FunctionTraits::CONST)
    }

    /// Whether the function is constant-evaluable.
    pub fn is_constexpr(&self) -> bool {
        self.traits.contains(FunctionTraits::CONSTEXPR)
    }

    /// Whether the function is deleted.
    pub fn is_deleted(&self) -> bool {
        self.traits.contains(FunctionTraits::DELETED)
    }

    /// Whether the constructor may be used for implicit conversions.
    pub fn is_converting(&self) -> bool {
        self.kind == FunctionKind::Constructor
            && self.params.len() == 1
            && !self.traits.contains(FunctionTraits::EXPLICIT)
    }

    /// Whether the function takes an implicit object parameter.
    pub fn has_object_param(&self) -> bool {
        matches!(self.kind, FunctionKind::Method | FunctionKind::Assignment)
    }

    /// Classify copy/move special members of `owner`.
    pub fn special_member(&self) -> Option<SpecialMember> {
        let owner = self.owner?;
        let takes_own = |ref_ok: fn(&DataType) -> bool| {
            self.params.len() == 1
                && self.params[0].data_type.type_hash == owner
                && !self.params[0].data_type.is_pointer
                && ref_ok(&self.params[0].data_type)
        };
        match self.kind {
            FunctionKind::Constructor if self.params.is_empty() => {
                Some(SpecialMember::DefaultConstructor)
            }
            FunctionKind::Constructor if takes_own(DataType::is_lvalue_ref) => {
                Some(SpecialMember::CopyConstructor)
            }
            FunctionKind::Constructor if takes_own(DataType::is_rvalue_ref) => {
                Some(SpecialMember::MoveConstructor)
            }
            FunctionKind::Assignment if takes_own(|t| !t.is_rvalue_ref()) => {
                Some(SpecialMember::CopyAssignment)
            }
            FunctionKind::Assignment if takes_own(DataType::is_rvalue_ref) => {
                Some(SpecialMember::MoveAssignment)
            }
            FunctionKind::Destructor => Some(SpecialMember::Destructor),
            _ => None,
        }
    }

    fn param_sigs(&self) -> Vec<u64> {
        self.params
            .iter()
            .map(|p| p.data_type.signature_hash())
            .collect()
    }

    /// Owner-independent signature: name, parameters and the qualifiers of
    /// the implicit object parameter.
    ///
    /// Methods with equal signatures in a base and a derived class occupy
    /// the same vtable slot.
    pub fn signature_hash(&self) -> TypeHash {
        let qualifiers = u64::from(self.is_const())
            | match self.ref_qualifier {
                RefQualifier::None => 0,
                RefQualifier::Lvalue => 2,
                RefQualifier::Rvalue => 4,
            };
        TypeHash::from_signature(&self.name, &self.param_sigs(), qualifiers)
    }

    /// The function's identity in the registry.
    pub fn func_hash(&self) -> TypeHash {
        let owner = self.owner.unwrap_or(TypeHash::EMPTY);
        match self.kind {
            FunctionKind::Function => TypeHash::from_function(&self.name, &self.param_sigs()),
            FunctionKind::Method => TypeHash::from_method(owner, self.signature_hash()),
            FunctionKind::Constructor => TypeHash::from_constructor(owner, &self.param_sigs()),
            FunctionKind::Assignment => TypeHash::from_assignment(owner, self.signature_hash().0),
            FunctionKind::Destructor => TypeHash::from_destructor(owner),
        }
    }
}

/// A registered function: its definition plus computed identities.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionEntry {
    /// The definition.
    pub def: FunctionDef,
    /// Registry identity.
    pub func_hash: TypeHash,
    /// Owner-independent signature identity.
    pub signature_hash: TypeHash,
    /// `Owner::name`, or just `name` for free functions.
    pub qualified_name: String,
}

impl FunctionEntry {
    /// Create an entry, computing identity hashes from the definition.
    pub fn new(def: FunctionDef, owner_name: Option<&str>) -> Self {
        let qualified_name = match owner_name {
            Some(owner) => format!("{owner}::{}", def.name),
            None => def.name.clone(),
        };
        Self {
            func_hash: def.func_hash(),
            signature_hash: def.signature_hash(),
            qualified_name,
            def,
        }
    }

    /// Number of parameters.
    pub fn arity(&self) -> usize {
        self.def.params.len()
    }
}
