//! Property tests over generated inheritance chains and call sites.

use std::cell::RefCell;
use std::rc::Rc;

use objmodel::prelude::*;
use objmodel_resolver::{ResolutionContext, evaluate_function};
use proptest::prelude::*;

fn int() -> DataType {
    DataType::simple(primitives::INT32)
}

fn level_name(level: usize) -> String {
    format!("L{level}")
}

/// A chain `L0 <- L1 <- ... <- Ln`. `L0` declares `m`, virtual or not; each
/// later level redeclares it when its flag is set. Every `m` returns the
/// level that declares it.
fn chain(root_virtual: bool, redeclares: &[bool]) -> Model {
    let mut model = Model::new(ModelConfig::default());
    let root_m = FunctionDef::method("m", vec![], int()).with_return(ConstExpr::int(0));
    let root_m = if root_virtual { root_m.as_virtual() } else { root_m };
    model
        .declare_class(ClassDecl::new(level_name(0)).with_function(root_m))
        .unwrap();
    for (i, &redeclare) in redeclares.iter().enumerate() {
        let level = i + 1;
        let mut decl = ClassDecl::new(level_name(level)).with_base(level_name(level - 1));
        if redeclare {
            decl = decl.with_function(
                FunctionDef::method("m", vec![], int()).with_return(ConstExpr::int(level as i64)),
            );
        }
        model.declare_class(decl).unwrap();
    }
    model.complete().unwrap();
    model
}

/// The nearest level at or above `level` that declares `m`.
fn declaring_level(redeclares: &[bool], level: usize) -> usize {
    (1..=level).rev().find(|&l| redeclares[l - 1]).unwrap_or(0)
}

fn chain_case() -> impl Strategy<Value = (bool, Vec<bool>, usize, usize)> {
    (any::<bool>(), prop::collection::vec(any::<bool>(), 1..6)).prop_flat_map(|(root_virtual, redeclares)| {
        let depth = redeclares.len();
        (Just(root_virtual), Just(redeclares), 0..=depth).prop_flat_map(move |(v, r, declared)| {
            (Just(v), Just(r), Just(declared), declared..=depth)
        })
    })
}

proptest! {
    #[test]
    fn dispatch_follows_virtuality((root_virtual, redeclares, declared, dynamic) in chain_case()) {
        let model = chain(root_virtual, &redeclares);
        let declared_hash = TypeHash::from_name(&level_name(declared));
        let dynamic_hash = TypeHash::from_name(&level_name(dynamic));

        let resolution = model.resolve(declared_hash, dynamic_hash, "m").unwrap();
        let expected = if root_virtual {
            declaring_level(&redeclares, dynamic)
        } else {
            declaring_level(&redeclares, declared)
        };
        prop_assert_eq!(resolution.is_virtual(), root_virtual);
        prop_assert_eq!(resolution.owner, TypeHash::from_name(&level_name(expected)));

        let ctx = ResolutionContext::new(model.registry());
        let value = evaluate_function(&ctx, resolution.target, &[], EvalContext::Runtime, Span::default())
            .unwrap();
        prop_assert_eq!(value, Some(ConstValue::Int(expected as i64)));
    }

    #[test]
    fn named_rvalue_reference_is_an_lvalue(index in 0..PrimitiveKind::ALL.len()) {
        let ty = DataType::simple(PrimitiveKind::ALL[index].type_hash());
        prop_assume!(ty.type_hash != primitives::VOID);

        let mut model = Model::new(ModelConfig::default());
        let by_lref = model
            .declare_function(FunctionDef::function("f", vec![Param::unnamed(ty.as_lvalue_ref())], DataType::void()))
            .unwrap();
        let by_rref = model
            .declare_function(FunctionDef::function("f", vec![Param::unnamed(ty.as_rvalue_ref())], DataType::void()))
            .unwrap();
        model.complete().unwrap();
        let candidates = [by_lref, by_rref];

        let named = ExprInfo::named(ty.as_rvalue_ref());
        prop_assert_eq!(model.call_function(&candidates, &[named]).unwrap().func_hash, by_lref);
        prop_assert_eq!(model.call_function(&candidates, &[move_cast(&named)]).unwrap().func_hash, by_rref);
        prop_assert_eq!(model.call_function(&candidates, &[ExprInfo::temporary(ty)]).unwrap().func_hash, by_rref);
    }

    #[test]
    fn constant_and_runtime_construction_agree(y in -1_000_000i64..1_000_000, base in -1000i64..1000) {
        let class = TypeHash::from_name("A");
        let mut model = Model::new(ModelConfig::default());
        model
            .declare_class(
                ClassDecl::new("A")
                    .with_static(StaticConstEntry::new("a", int(), ConstExpr::int(base)))
                    .with_field(FieldEntry::new("x", int()))
                    .with_field(FieldEntry::new("flag", DataType::simple(primitives::BOOL)).with_default(ConstExpr::bool(true)))
                    .with_function(
                        FunctionDef::constructor("A", vec![Param::new("y", int())])
                            .as_constexpr()
                            .with_initializers(vec![MemberInit {
                                field: "x".to_string(),
                                value: ConstExpr::binary(BinaryOp::Add, ConstExpr::static_member(class, "a"), ConstExpr::param(0)),
                            }]),
                    ),
            )
            .unwrap();
        model.complete().unwrap();
        let ctor = model
            .registry()
            .get_class(class)
            .unwrap()
            .behaviors
            .constructors
            .iter()
            .copied()
            .find(|h| model.registry().get_function(*h).unwrap().def.special_member().is_none())
            .unwrap();

        let constant = model.evaluate(ctor, &[ConstValue::Int(y).into()], EvalContext::Constant).unwrap();
        let runtime = model.evaluate(ctor, &[ArgValue::Runtime(ConstValue::Int(y))], EvalContext::Runtime).unwrap();
        prop_assert_eq!(constant.field("x"), Some(FieldValue::Value(ConstValue::Int(base + y))));
        prop_assert_eq!(constant, runtime);
    }

    #[test]
    fn handle_releases_each_value_once(ops in prop::collection::vec(0u8..3, 0..20)) {
        let released = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&released);
        let mut taken = Vec::new();
        let mut next = 1u32;
        {
            let mut handle = UniqueHandle::with_policy(Box::new(0u32), move |v: Box<u32>| {
                sink.borrow_mut().push(*v);
            });
            for op in ops {
                match op {
                    0 => handle.reset(),
                    1 => {
                        handle.replace(Box::new(next));
                        next += 1;
                    }
                    _ => taken.extend(handle.take().map(|v| *v)),
                }
            }
        }

        let mut seen: Vec<u32> = released.borrow().iter().chain(&taken).copied().collect();
        seen.sort_unstable();
        let created: Vec<u32> = (0..next).collect();
        // Every value is either released or taken, exactly once.
        prop_assert_eq!(seen, created);
    }
}
