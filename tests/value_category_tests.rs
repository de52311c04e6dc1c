//! Integration tests for value-category driven overload selection,
//! construction and forwarding.

use objmodel::prelude::*;

fn int() -> DataType {
    DataType::simple(primitives::INT32)
}

fn class(name: &str) -> DataType {
    DataType::simple(TypeHash::from_name(name))
}

/// `void take(int&); void take(int&&);`
fn reference_overloads() -> (Model, TypeHash, TypeHash) {
    let mut model = Model::new(ModelConfig::default());
    let by_lref = model
        .declare_function(FunctionDef::function(
            "take",
            vec![Param::new("x", int().as_lvalue_ref())],
            DataType::void(),
        ))
        .unwrap();
    let by_rref = model
        .declare_function(FunctionDef::function(
            "take",
            vec![Param::new("x", int().as_rvalue_ref())],
            DataType::void(),
        ))
        .unwrap();
    model.complete().unwrap();
    (model, by_lref, by_rref)
}

#[test]
fn named_rvalue_reference_selects_lvalue_overload() {
    let (model, by_lref, by_rref) = reference_overloads();
    let candidates = [by_lref, by_rref];

    // int&& v = ...; take(v);
    let v = ExprInfo::named(int().as_rvalue_ref());
    assert_eq!(model.call_function(&candidates, &[v]).unwrap().func_hash, by_lref);

    // take(std::move(v));
    assert_eq!(
        model.call_function(&candidates, &[move_cast(&v)]).unwrap().func_hash,
        by_rref
    );
}

#[test]
fn temporary_selects_rvalue_overload() {
    let (model, by_lref, by_rref) = reference_overloads();
    let temp = ExprInfo::temporary(int());
    assert_eq!(
        model.call_function(&[by_lref, by_rref], &[temp]).unwrap().func_hash,
        by_rref
    );
}

#[test]
fn temporary_cannot_bind_to_lvalue_reference() {
    let (model, by_lref, _) = reference_overloads();
    let err = model
        .call_function(&[by_lref], &[ExprInfo::temporary(int())])
        .unwrap_err();
    assert!(matches!(
        err,
        ModelError::Compilation(CompilationError::CannotBind { .. })
    ));
}

#[test]
fn const_lvalue_reference_binds_everything() {
    let mut model = Model::new(ModelConfig::default());
    model.declare_class(ClassDecl::new("Data")).unwrap();
    model.complete().unwrap();
    let param = class("Data").as_const_ref();

    for arg in [
        ExprInfo::named(class("Data")),
        ExprInfo::const_lvalue(class("Data")),
        ExprInfo::temporary(class("Data")),
    ] {
        assert!(matches!(
            model.initialize_parameter(&arg, &param).unwrap(),
            ParamInit::Bound(_)
        ));
    }
}

fn construction_kind(init: ParamInit) -> ConstructionKind {
    match init {
        ParamInit::Constructed { construction, .. } => construction.kind,
        other => panic!("expected a construction, got {other:?}"),
    }
}

#[test]
fn by_value_parameter_moves_temporaries_and_copies_names() {
    let mut model = Model::new(ModelConfig::default());
    model.declare_class(ClassDecl::new("Data")).unwrap();
    model
        .declare_class(ClassDecl::new("Legacy").with_function(FunctionDef::constructor(
            "Legacy",
            vec![Param::new("other", class("Legacy").as_const_ref())],
        )))
        .unwrap();
    model.complete().unwrap();

    let data = class("Data");
    assert_eq!(
        construction_kind(model.initialize_parameter(&ExprInfo::temporary(data), &data).unwrap()),
        ConstructionKind::Move
    );
    assert_eq!(
        construction_kind(model.initialize_parameter(&ExprInfo::named(data), &data).unwrap()),
        ConstructionKind::Copy
    );

    // A declared copy constructor and no move constructor: temporaries copy.
    let legacy = class("Legacy");
    assert_eq!(
        construction_kind(model.initialize_parameter(&ExprInfo::temporary(legacy), &legacy).unwrap()),
        ConstructionKind::Copy
    );
}

#[test]
fn assignment_from_temporary_moves() {
    let mut model = Model::new(ModelConfig::default());
    model.declare_class(ClassDecl::new("Data")).unwrap();
    model.complete().unwrap();
    let data = class("Data");
    let target = ExprInfo::named(data);

    assert!(matches!(
        model.assign(&target, &ExprInfo::temporary(data)).unwrap(),
        Assignment::Operator { kind: AssignmentKind::Move, .. }
    ));
    assert!(matches!(
        model.assign(&target, &ExprInfo::named(data)).unwrap(),
        Assignment::Operator { kind: AssignmentKind::Copy, .. }
    ));
}

#[test]
fn ref_qualified_members_follow_object_category() {
    let mut model = Model::new(ModelConfig::default());
    let buffer = model
        .declare_class(
            ClassDecl::new("Buffer")
                .with_function(
                    FunctionDef::method("data", vec![], int())
                        .with_ref_qualifier(RefQualifier::Lvalue),
                )
                .with_function(
                    FunctionDef::method("data", vec![], int())
                        .with_ref_qualifier(RefQualifier::Rvalue),
                ),
        )
        .unwrap();
    model.complete().unwrap();

    let on_lvalue = model.call(&MemberCall::new(buffer, "data")).unwrap();
    let on_temporary = model
        .call(&MemberCall::new(buffer, "data").with_object(ImplicitObject::from_expr(
            &ExprInfo::temporary(class("Buffer")),
        )))
        .unwrap();
    assert_ne!(on_lvalue.target, on_temporary.target);
    assert_eq!(
        model.registry().get_function(on_temporary.target).unwrap().def.ref_qualifier,
        RefQualifier::Rvalue
    );
}

#[test]
fn forwarding_preserves_argument_category() {
    let (model, by_lref, by_rref) = reference_overloads();
    let candidates = [by_lref, by_rref];

    for (arg, expected) in [
        (ExprInfo::named(int()), by_lref),
        (ExprInfo::temporary(int()), by_rref),
    ] {
        let deduction = deduce_forwarding(&arg);
        // Inside the forwarding function the parameter is a named lvalue.
        let param = ExprInfo::named(deduction.param_type);
        let forwarded = forward(&param, &deduction);
        assert_eq!(model.call_function(&candidates, &[forwarded]).unwrap().func_hash, expected);
    }
}

#[test]
fn runtime_forwarding_moves_owned_and_copies_borrowed() {
    fn relay(value: Categorized<'_, Vec<i32>>) -> Vec<i32> {
        value.forward().into_owned()
    }

    let kept = vec![1, 2, 3];
    assert_eq!(relay(Categorized::Borrowed(&kept)), kept);
    assert_eq!(kept.len(), 3);
    assert_eq!(relay(Categorized::Owned(vec![4])), vec![4]);
}
