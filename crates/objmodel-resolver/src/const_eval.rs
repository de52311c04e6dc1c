//! Constant evaluation of constructors, functions and static members.
//!
//! # Supported Expressions
//!
//! - Literals, constructor parameters, static constant members (`A::a`)
//! - Unary operations: negation, logical not, bitwise not
//! - Binary operations: arithmetic, bitwise, shifts, comparison, logical
//!   (short-circuiting)
//! - Conditionals
//!
//! Integer arithmetic is carried out in 64 bits. In a constant context an
//! overflowing operation is not a constant expression; in a runtime context
//! it wraps. The same holds when a signed result is stored into a field,
//! static or return value too narrow to hold it. Division by zero fails in
//! both.
//!
//! # Objects
//!
//! Evaluating a constructor produces an [`ObjectValue`] whose fields are in
//! layout order: the base subobject's fields first, then the class's own.
//! A field of class type is default-constructed and its fields appear as
//! `field.sub`.

use objmodel_core::{
    BinaryOp, ClassEntry, CompilationError, ConstExpr, ConstValue, DataType,
    FieldValue, FunctionBody, FunctionEntry, FunctionKind, ObjectValue, PrimitiveKind, Span,
    SpecialMember, TypeHash, UnaryOp,
};

use crate::context::ResolutionContext;
use crate::lookup::{MemberKind, lookup_member};

/// Whether an evaluation happens in a constant context.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EvalContext {
    /// The result must be fixed at translation time.
    Constant,
    /// Ordinary execution.
    Runtime,
}

/// An argument passed to an evaluated function.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ArgValue {
    /// A constant expression.
    Constant(ConstValue),
    /// A value only known when the program runs.
    Runtime(ConstValue),
    /// A runtime value the model does not track (read from input).
    Unknown,
}

impl ArgValue {
    /// Whether the argument is a constant expression.
    pub fn is_constant(&self) -> bool {
        matches!(self, ArgValue::Constant(_))
    }

    fn value(&self) -> Option<ConstValue> {
        match self {
            ArgValue::Constant(v) | ArgValue::Runtime(v) => Some(*v),
            ArgValue::Unknown => None,
        }
    }
}

impl From<ConstValue> for ArgValue {
    fn from(value: ConstValue) -> Self {
        ArgValue::Constant(value)
    }
}

/// Evaluate constructor `ctor` with `args`.
#[tracing::instrument(level = "trace", skip(ctx, args), fields(args = args.len()))]
pub fn evaluate_constructor(
    ctx: &ResolutionContext<'_>,
    ctor: TypeHash,
    args: &[ArgValue],
    mode: EvalContext,
    span: Span,
) -> Result<ObjectValue, CompilationError> {
    let func = ctx.require_function(ctor)?;
    check_call(func, args, mode, span)?;
    // Only the most-derived object must be concrete; abstract bases are
    // still constructed as subobjects.
    if let Some(class) = func.def.owner.and_then(|owner| ctx.get_class(owner)) {
        if class.is_abstract {
            return Err(CompilationError::AbstractInstantiation {
                type_name: class.name.clone(),
                span,
            });
        }
    }
    let values: Vec<Option<ConstValue>> = args.iter().map(ArgValue::value).collect();

    let mut evaluator = Evaluator::new(ctx, mode, span);
    let object = evaluator.construct(func, &values)?;
    tracing::trace!(
        constructor = %func.qualified_name,
        fields = object.fields.len(),
        ?mode,
        "evaluated constructor"
    );
    Ok(object)
}

/// Evaluate a function whose body returns a single expression.
///
/// `None` means the result depends on runtime state.
pub fn evaluate_function(
    ctx: &ResolutionContext<'_>,
    func: TypeHash,
    args: &[ArgValue],
    mode: EvalContext,
    span: Span,
) -> Result<Option<ConstValue>, CompilationError> {
    let func = ctx.require_function(func)?;
    check_call(func, args, mode, span)?;
    let Some(FunctionBody::Returns(expr)) = &func.def.body else {
        return Err(CompilationError::ConstEvalFailed {
            message: format!("'{}' has no evaluable body", func.qualified_name),
            span,
        });
    };
    let values: Vec<Option<ConstValue>> = args.iter().map(ArgValue::value).collect();
    let mut evaluator = Evaluator::new(ctx, mode, span);
    let params = evaluator.bind_params(func, &values)?;
    let result = evaluator.eval(expr, &params)?;
    result
        .map(|v| evaluator.store(&v, &func.def.return_type))
        .transpose()
}

/// Read the value of static constant member `name` as seen from `class`.
pub fn eval_static(
    ctx: &ResolutionContext<'_>,
    class: TypeHash,
    name: &str,
    span: Span,
) -> Result<ConstValue, CompilationError> {
    let mut evaluator = Evaluator::new(ctx, EvalContext::Constant, span);
    evaluator.static_value(class, name)
}

/// Field names of an object of `class`, in the order an evaluated
/// constructor reports them.
pub fn object_field_names(
    ctx: &ResolutionContext<'_>,
    class: TypeHash,
    span: Span,
) -> Result<Vec<String>, CompilationError> {
    let mut names = Vec::new();
    collect_field_names(ctx, class, "", &mut Vec::new(), &mut names, span)?;
    Ok(names)
}

fn collect_field_names(
    ctx: &ResolutionContext<'_>,
    class: TypeHash,
    prefix: &str,
    visiting: &mut Vec<TypeHash>,
    out: &mut Vec<String>,
    span: Span,
) -> Result<(), CompilationError> {
    let entry = ctx.require_class(class, span)?;
    if visiting.contains(&class) {
        return Err(CompilationError::IncompleteType {
            name: entry.name.clone(),
            span,
        });
    }
    visiting.push(class);
    if let Some(base) = entry.base_class {
        collect_field_names(ctx, base, prefix, visiting, out, span)?;
    }
    for field in &entry.fields {
        let name = format!("{prefix}{}", field.name);
        if is_class_object(ctx, &field.data_type) {
            collect_field_names(ctx, field.data_type.type_hash, &format!("{name}."), visiting, out, span)?;
        } else {
            out.push(name);
        }
    }
    visiting.pop();
    Ok(())
}

fn is_class_object(ctx: &ResolutionContext<'_>, data_type: &DataType) -> bool {
    !data_type.is_pointer && !data_type.is_reference() && ctx.get_class(data_type.type_hash).is_some()
}

/// Checks shared by every evaluated call.
fn check_call(
    func: &FunctionEntry,
    args: &[ArgValue],
    mode: EvalContext,
    span: Span,
) -> Result<(), CompilationError> {
    if func.def.is_deleted() {
        return Err(CompilationError::DeletedFunction {
            name: func.qualified_name.clone(),
            span,
        });
    }
    if args.len() != func.arity() {
        return Err(CompilationError::ArgumentCountMismatch {
            name: func.qualified_name.clone(),
            expected: func.arity(),
            got: args.len(),
            span,
        });
    }
    if mode == EvalContext::Constant {
        if !func.def.is_constexpr() {
            return Err(CompilationError::NotConstexpr {
                name: func.qualified_name.clone(),
                span,
            });
        }
        if let Some(index) = args.iter().position(|a| !a.is_constant()) {
            return Err(CompilationError::NonConstantArgument { index, span });
        }
    }
    Ok(())
}

fn convert(value: &ConstValue, target: &DataType, span: Span) -> Result<ConstValue, CompilationError> {
    if target.is_pointer || target.is_reference() {
        return Ok(*value);
    }
    match PrimitiveKind::from_hash(target.type_hash) {
        Some(kind) => value.convert_to(kind).ok_or_else(|| CompilationError::ConstEvalFailed {
            message: format!("cannot convert {value} to '{}'", kind.name()),
            span,
        }),
        None => Ok(*value),
    }
}

// =============================================================================
// Evaluator
// =============================================================================

struct Evaluator<'c, 'a> {
    ctx: &'c ResolutionContext<'a>,
    mode: EvalContext,
    span: Span,
    /// Static members being evaluated, for cycle detection.
    statics: Vec<(TypeHash, String)>,
    /// Classes being constructed as members of an enclosing object.
    constructing: Vec<TypeHash>,
}

impl<'c, 'a> Evaluator<'c, 'a> {
    fn new(ctx: &'c ResolutionContext<'a>, mode: EvalContext, span: Span) -> Self {
        Self {
            ctx,
            mode,
            span,
            statics: Vec::new(),
            constructing: Vec::new(),
        }
    }

    fn failed(&self, message: impl Into<String>) -> CompilationError {
        CompilationError::ConstEvalFailed {
            message: message.into(),
            span: self.span,
        }
    }

    /// Convert argument values to their parameter types.
    fn bind_params(
        &self,
        func: &FunctionEntry,
        values: &[Option<ConstValue>],
    ) -> Result<Vec<Option<ConstValue>>, CompilationError> {
        func.def
            .params
            .iter()
            .zip(values)
            .map(|(param, value)| {
                value
                    .map(|v| convert(&v, &param.data_type.referent(), self.span))
                    .transpose()
            })
            .collect()
    }

    /// Convert a computed value into an object of type `target`.
    ///
    /// In a constant context a signed integer result that does not fit the
    /// target is an overflow; at runtime it wraps.
    fn store(&self, value: &ConstValue, target: &DataType) -> Result<ConstValue, CompilationError> {
        if self.mode == EvalContext::Constant && !target.is_pointer && !target.is_reference() {
            if let Some(kind) = PrimitiveKind::from_hash(target.type_hash) {
                if !value.fits_in(kind) {
                    return Err(self.failed(format!("{value} overflows '{}'", kind.name())));
                }
            }
        }
        convert(value, target, self.span)
    }

    // === Objects ===

    fn construct(
        &mut self,
        func: &'a FunctionEntry,
        args: &[Option<ConstValue>],
    ) -> Result<ObjectValue, CompilationError> {
        if func.def.kind != FunctionKind::Constructor {
            return Err(CompilationError::Internal {
                message: format!("'{}' is not a constructor", func.qualified_name),
            });
        }
        let class_hash = func.def.owner.ok_or_else(|| CompilationError::Internal {
            message: format!("constructor '{}' has no owner", func.qualified_name),
        })?;
        let class = self.ctx.require_class(class_hash, self.span)?;
        let params = self.bind_params(func, args)?;

        let (base_init, member_inits) = match &func.def.body {
            Some(FunctionBody::Initializers { base, members }) => (base.as_ref(), members.as_slice()),
            Some(FunctionBody::Returns(_)) => {
                return Err(CompilationError::Internal {
                    message: format!("constructor '{}' has a return body", func.qualified_name),
                });
            }
            None if self.mode == EvalContext::Constant => {
                return Err(self.failed(format!(
                    "'{}' has no evaluable body",
                    func.qualified_name
                )));
            }
            None => (None, &[][..]),
        };

        for init in member_inits {
            if class.find_field(&init.field).is_none() {
                return Err(CompilationError::UnknownMember {
                    type_name: class.name.clone(),
                    member: init.field.clone(),
                    span: self.span,
                });
            }
        }

        let mut fields = Vec::new();

        // Base subobject first.
        if let Some(base_hash) = class.base_class {
            let base_object = match base_init {
                Some(init) => {
                    let base_ctor = self.ctx.require_function(init.constructor)?;
                    if base_ctor.def.owner != Some(base_hash) {
                        return Err(CompilationError::NotDerived {
                            declared: self.ctx.type_name(base_ctor.def.owner.unwrap_or(TypeHash::EMPTY)),
                            dynamic: class.name.clone(),
                            span: self.span,
                        });
                    }
                    let base_args = init
                        .args
                        .iter()
                        .map(|arg| self.eval(arg, &params))
                        .collect::<Result<Vec<_>, _>>()?;
                    self.call_constructor(base_ctor, &base_args)?
                }
                None => self.default_construct(base_hash)?,
            };
            fields.extend(base_object.fields);
        } else if base_init.is_some() {
            return Err(self.failed(format!("'{}' has no base class to initialize", class.name)));
        }

        for field in &class.fields {
            let init = member_inits
                .iter()
                .find(|m| m.field == field.name)
                .map(|m| &m.value)
                .or(field.default_init.as_ref());

            if is_class_object(self.ctx, &field.data_type) {
                if init.is_some() {
                    return Err(self.failed(format!(
                        "field '{}::{}' of class type cannot be initialized from a scalar",
                        class.name, field.name
                    )));
                }
                let member = self.default_construct_member(class, field.data_type.type_hash)?;
                fields.extend(
                    member
                        .fields
                        .into_iter()
                        .map(|(sub, value)| (format!("{}.{sub}", field.name), value)),
                );
                continue;
            }

            let value = match init {
                Some(expr) => match self.eval(expr, &params)? {
                    Some(v) => FieldValue::Value(self.store(&v, &field.data_type)?),
                    None => FieldValue::Dynamic,
                },
                None => FieldValue::Indeterminate,
            };
            if self.mode == EvalContext::Constant && !value.is_initialized() {
                return Err(CompilationError::UninitializedInConstant {
                    type_name: class.name.clone(),
                    field: field.name.clone(),
                    span: self.span,
                });
            }
            fields.push((field.name.clone(), value));
        }

        Ok(ObjectValue {
            class: class_hash,
            fields,
        })
    }

    /// Run a constructor reached from another one (base or member).
    fn call_constructor(
        &mut self,
        func: &'a FunctionEntry,
        args: &[Option<ConstValue>],
    ) -> Result<ObjectValue, CompilationError> {
        if func.def.is_deleted() {
            return Err(CompilationError::DeletedFunction {
                name: func.qualified_name.clone(),
                span: self.span,
            });
        }
        if args.len() != func.arity() {
            return Err(CompilationError::ArgumentCountMismatch {
                name: func.qualified_name.clone(),
                expected: func.arity(),
                got: args.len(),
                span: self.span,
            });
        }
        if self.mode == EvalContext::Constant && !func.def.is_constexpr() {
            return Err(CompilationError::NotConstexpr {
                name: func.qualified_name.clone(),
                span: self.span,
            });
        }
        self.construct(func, args)
    }

    fn default_construct(&mut self, class_hash: TypeHash) -> Result<ObjectValue, CompilationError> {
        let class = self.ctx.require_class(class_hash, self.span)?;
        let ctor = self.default_constructor(class)?;
        self.call_constructor(ctor, &[])
    }

    fn default_construct_member(
        &mut self,
        owner: &ClassEntry,
        member_class: TypeHash,
    ) -> Result<ObjectValue, CompilationError> {
        if member_class == owner.type_hash || self.constructing.contains(&member_class) {
            return Err(CompilationError::IncompleteType {
                name: self.ctx.type_name(member_class),
                span: self.span,
            });
        }
        self.constructing.push(owner.type_hash);
        let result = self.default_construct(member_class);
        self.constructing.pop();
        result
    }

    fn default_constructor(&self, class: &ClassEntry) -> Result<&'a FunctionEntry, CompilationError> {
        class
            .behaviors
            .constructors
            .iter()
            .filter_map(|h| self.ctx.get_function(*h))
            .find(|f| f.def.special_member() == Some(SpecialMember::DefaultConstructor))
            .ok_or_else(|| CompilationError::NoMatchingOverload {
                name: class.name.clone(),
                args: String::new(),
                span: self.span,
            })
    }

    // === Static members ===

    fn static_value(&mut self, class: TypeHash, name: &str) -> Result<ConstValue, CompilationError> {
        // A field or method of the same name in a derived class hides the
        // base's static.
        let found = lookup_member(self.ctx, class, name, self.span)?;
        let MemberKind::Static(member) = found.kind else {
            return Err(CompilationError::UnknownMember {
                type_name: self.ctx.type_name(class),
                member: name.to_string(),
                span: self.span,
            });
        };
        let owner = found.owner;
        let key = (owner.type_hash, member.name.clone());
        if self.statics.contains(&key) {
            return Err(self.failed(format!(
                "'{}::{}' depends on its own value",
                owner.name, member.name
            )));
        }

        // Static constants are always constant expressions.
        let saved = self.mode;
        self.mode = EvalContext::Constant;
        self.statics.push(key);
        let result = self.eval(&member.value, &[]).and_then(|value| {
            let value = value.ok_or_else(|| {
                self.failed(format!("'{}::{}' is not a constant", owner.name, member.name))
            })?;
            self.store(&value, &member.data_type)
        });
        self.statics.pop();
        self.mode = saved;
        result
    }

    // === Expressions ===

    /// Evaluate an expression. `None` means the value depends on runtime state.
    fn eval(
        &mut self,
        expr: &ConstExpr,
        params: &[Option<ConstValue>],
    ) -> Result<Option<ConstValue>, CompilationError> {
        match expr {
            ConstExpr::Literal(v) => Ok(Some(*v)),
            ConstExpr::Param(index) => params.get(*index).copied().ok_or_else(|| {
                self.failed(format!("parameter {index} is not available here"))
            }),
            ConstExpr::StaticMember { class, name } => self.static_value(*class, name).map(Some),
            ConstExpr::Unary(op, operand) => match self.eval(operand, params)? {
                Some(v) => self.eval_unary(*op, v).map(Some),
                None => Ok(None),
            },
            ConstExpr::Binary(op, lhs, rhs) => self.eval_binary(*op, lhs, rhs, params),
            ConstExpr::Conditional(cond, then, otherwise) => match self.eval(cond, params)? {
                Some(c) if c.is_truthy() => self.eval(then, params),
                Some(_) => self.eval(otherwise, params),
                None => Ok(None),
            },
            ConstExpr::Runtime(description) => match self.mode {
                EvalContext::Constant => Err(self.failed(format!(
                    "'{description}' is not allowed in a constant expression"
                ))),
                EvalContext::Runtime => Ok(None),
            },
        }
    }

    fn eval_unary(&self, op: UnaryOp, value: ConstValue) -> Result<ConstValue, CompilationError> {
        match (op, value) {
            (UnaryOp::Not, v) => Ok(ConstValue::Bool(!v.is_truthy())),
            (UnaryOp::Neg, ConstValue::Float(v)) => Ok(ConstValue::Float(-v)),
            (UnaryOp::Neg, ConstValue::UInt(v)) => Ok(ConstValue::UInt(v.wrapping_neg())),
            (UnaryOp::Neg, v) => {
                let v = int_of(v);
                self.checked(v.checked_neg(), v.wrapping_neg(), "negation overflows")
                    .map(ConstValue::Int)
            }
            (UnaryOp::BitNot, ConstValue::UInt(v)) => Ok(ConstValue::UInt(!v)),
            (UnaryOp::BitNot, ConstValue::Float(_)) => {
                Err(self.failed("invalid operand to '~': floating-point value"))
            }
            (UnaryOp::BitNot, v) => Ok(ConstValue::Int(!int_of(v))),
        }
    }

    fn eval_binary(
        &mut self,
        op: BinaryOp,
        lhs: &ConstExpr,
        rhs: &ConstExpr,
        params: &[Option<ConstValue>],
    ) -> Result<Option<ConstValue>, CompilationError> {
        let Some(left) = self.eval(lhs, params)? else {
            return Ok(None);
        };

        // Logical operators do not evaluate their right operand when the
        // left one decides the result.
        if op.is_logical() {
            let decided = match op {
                BinaryOp::And => !left.is_truthy(),
                _ => left.is_truthy(),
            };
            if decided {
                return Ok(Some(ConstValue::Bool(left.is_truthy())));
            }
            return Ok(self.eval(rhs, params)?.map(|r| ConstValue::Bool(r.is_truthy())));
        }

        let Some(right) = self.eval(rhs, params)? else {
            return Ok(None);
        };
        if op.is_comparison() {
            return Ok(Some(ConstValue::Bool(compare(op, left, right))));
        }
        self.arithmetic(op, left, right).map(Some)
    }

    fn arithmetic(
        &self,
        op: BinaryOp,
        left: ConstValue,
        right: ConstValue,
    ) -> Result<ConstValue, CompilationError> {
        if matches!(op, BinaryOp::Div | BinaryOp::Rem) && !right.is_truthy() && !is_float(right) {
            return Err(self.failed(format!("division by zero in '{left} {op} {right}'")));
        }
        if matches!(op, BinaryOp::Shl | BinaryOp::Shr) {
            return self.shift(op, left, right);
        }

        match operands(left, right) {
            Operands::Float(l, r) => {
                let v = match op {
                    BinaryOp::Add => l + r,
                    BinaryOp::Sub => l - r,
                    BinaryOp::Mul => l * r,
                    BinaryOp::Div => l / r,
                    BinaryOp::Rem => l % r,
                    _ => return Err(self.failed(format!("invalid floating-point operands to '{op}'"))),
                };
                Ok(ConstValue::Float(v))
            }
            Operands::UInt(l, r) => {
                let v = match op {
                    BinaryOp::Add => l.wrapping_add(r),
                    BinaryOp::Sub => l.wrapping_sub(r),
                    BinaryOp::Mul => l.wrapping_mul(r),
                    BinaryOp::Div => l / r,
                    BinaryOp::Rem => l % r,
                    BinaryOp::BitAnd => l & r,
                    BinaryOp::BitOr => l | r,
                    BinaryOp::BitXor => l ^ r,
                    _ => return Err(CompilationError::Internal {
                        message: format!("unexpected operator '{op}'"),
                    }),
                };
                Ok(ConstValue::UInt(v))
            }
            Operands::Int(l, r) => {
                let overflow = || format!("'{l} {op} {r}' overflows");
                let v = match op {
                    BinaryOp::Add => self.checked(l.checked_add(r), l.wrapping_add(r), overflow())?,
                    BinaryOp::Sub => self.checked(l.checked_sub(r), l.wrapping_sub(r), overflow())?,
                    BinaryOp::Mul => self.checked(l.checked_mul(r), l.wrapping_mul(r), overflow())?,
                    BinaryOp::Div => self.checked(l.checked_div(r), l.wrapping_div(r), overflow())?,
                    BinaryOp::Rem => self.checked(l.checked_rem(r), l.wrapping_rem(r), overflow())?,
                    BinaryOp::BitAnd => l & r,
                    BinaryOp::BitOr => l | r,
                    BinaryOp::BitXor => l ^ r,
                    _ => return Err(CompilationError::Internal {
                        message: format!("unexpected operator '{op}'"),
                    }),
                };
                Ok(ConstValue::Int(v))
            }
        }
    }

    fn shift(&self, op: BinaryOp, left: ConstValue, right: ConstValue) -> Result<ConstValue, CompilationError> {
        if is_float(left) || is_float(right) {
            return Err(self.failed(format!("invalid floating-point operands to '{op}'")));
        }
        let count = right
            .as_int()
            .and_then(|c| u32::try_from(c).ok())
            .filter(|c| *c < 64)
            .ok_or_else(|| self.failed(format!("shift count {right} is out of range")))?;
        Ok(match (op, left) {
            (BinaryOp::Shl, ConstValue::UInt(v)) => ConstValue::UInt(v << count),
            (BinaryOp::Shr, ConstValue::UInt(v)) => ConstValue::UInt(v >> count),
            (BinaryOp::Shl, v) => ConstValue::Int(int_of(v) << count),
            (_, v) => ConstValue::Int(int_of(v) >> count),
        })
    }

    /// Pick the checked result in a constant context and the wrapped one at
    /// runtime.
    fn checked(
        &self,
        checked: Option<i64>,
        wrapped: i64,
        message: impl Into<String>,
    ) -> Result<i64, CompilationError> {
        match (checked, self.mode) {
            (Some(v), _) => Ok(v),
            (None, EvalContext::Runtime) => Ok(wrapped),
            (None, EvalContext::Constant) => Err(self.failed(message)),
        }
    }
}

enum Operands {
    Int(i64, i64),
    UInt(u64, u64),
    Float(f64, f64),
}

/// Usual arithmetic conversions: floating point wins, then unsigned.
fn operands(left: ConstValue, right: ConstValue) -> Operands {
    match (left, right) {
        (l, r) if is_float(l) || is_float(r) => Operands::Float(l.as_float(), r.as_float()),
        (ConstValue::UInt(_), _) | (_, ConstValue::UInt(_)) => {
            Operands::UInt(int_of(left) as u64, int_of(right) as u64)
        }
        _ => Operands::Int(int_of(left), int_of(right)),
    }
}

fn is_float(value: ConstValue) -> bool {
    matches!(value, ConstValue::Float(_))
}

/// Integer bits of a non-float value; unsigned values reinterpret.
fn int_of(value: ConstValue) -> i64 {
    match value {
        ConstValue::Int(v) => v,
        ConstValue::UInt(v) => v as i64,
        ConstValue::Bool(v) => i64::from(v),
        ConstValue::Float(v) => v as i64,
    }
}

fn compare(op: BinaryOp, left: ConstValue, right: ConstValue) -> bool {
    let ordering = match operands(left, right) {
        Operands::Float(l, r) => l.partial_cmp(&r),
        Operands::UInt(l, r) => Some(l.cmp(&r)),
        Operands::Int(l, r) => Some(l.cmp(&r)),
    };
    let Some(ordering) = ordering else {
        // NaN compares unequal to everything.
        return op == BinaryOp::Ne;
    };
    match op {
        BinaryOp::Eq => ordering.is_eq(),
        BinaryOp::Ne => ordering.is_ne(),
        BinaryOp::Lt => ordering.is_lt(),
        BinaryOp::Le => ordering.is_le(),
        BinaryOp::Gt => ordering.is_gt(),
        _ => ordering.is_ge(),
    }
}
