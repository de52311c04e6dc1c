//! Integration tests for member call dispatch and slicing.

use objmodel::prelude::*;
use objmodel_resolver::{ResolutionContext, evaluate_function, resolve_destructor, slice};

fn int() -> DataType {
    DataType::simple(primitives::INT32)
}

fn hash(name: &str) -> TypeHash {
    TypeHash::from_name(name)
}

/// Run the resolved target's body in a runtime context.
fn run(model: &Model, resolution: &Resolution) -> ConstValue {
    let ctx = ResolutionContext::new(model.registry());
    evaluate_function(&ctx, resolution.target, &[], EvalContext::Runtime, Span::default())
        .unwrap()
        .unwrap()
}

/// ```text
/// struct Base    { int myFunc() { return 1; }  virtual int myVirtual() { return 1; } };
/// struct Derived : Base { int myFunc() { return 2; }  int myVirtual() { return 2; } };
/// ```
fn base_and_derived() -> Model {
    let mut model = Model::new(ModelConfig::default());
    model
        .declare_class(
            ClassDecl::new("Base")
                .with_function(FunctionDef::method("myFunc", vec![], int()).with_return(ConstExpr::int(1)))
                .with_function(
                    FunctionDef::method("myVirtual", vec![], int())
                        .as_virtual()
                        .with_return(ConstExpr::int(1)),
                ),
        )
        .unwrap();
    model
        .declare_class(
            ClassDecl::new("Derived")
                .with_base("Base")
                .with_function(FunctionDef::method("myFunc", vec![], int()).with_return(ConstExpr::int(2)))
                .with_function(FunctionDef::method("myVirtual", vec![], int()).with_return(ConstExpr::int(2))),
        )
        .unwrap();
    model.complete().unwrap();
    model
}

#[test]
fn non_virtual_through_base_reference_runs_base() {
    let model = base_and_derived();
    let r = model.resolve(hash("Base"), hash("Derived"), "myFunc").unwrap();
    assert_eq!(r.binding, Binding::Static);
    assert_eq!(r.owner, hash("Base"));
    assert_eq!(run(&model, &r), ConstValue::Int(1));
}

#[test]
fn virtual_through_base_reference_runs_override() {
    let model = base_and_derived();
    let r = model.resolve(hash("Base"), hash("Derived"), "myVirtual").unwrap();
    assert!(r.is_virtual());
    assert_eq!(r.owner, hash("Derived"));
    assert_eq!(run(&model, &r), ConstValue::Int(2));
}

#[test]
fn pointer_dispatch_matches_reference_dispatch() {
    let model = base_and_derived();
    let call = MemberCall::new(hash("Base"), "myVirtual")
        .with_dynamic(hash("Derived"))
        .with_invocation(Invocation::Pointer);
    assert_eq!(model.call(&call).unwrap().owner, hash("Derived"));
}

#[test]
fn derived_only_member_invisible_through_base() {
    let mut model = Model::new(ModelConfig::default());
    model.declare_class(ClassDecl::new("Base")).unwrap();
    model
        .declare_class(
            ClassDecl::new("Derived")
                .with_base("Base")
                .with_function(FunctionDef::method("extra", vec![], int())),
        )
        .unwrap();
    model.complete().unwrap();

    let err = model.resolve(hash("Base"), hash("Derived"), "extra").unwrap_err();
    assert!(matches!(
        err.as_compilation(),
        Some(CompilationError::UnknownMember { member, .. }) if member == "extra"
    ));
    assert!(model.resolve(hash("Derived"), hash("Derived"), "extra").is_ok());
}

#[test]
fn unrelated_dynamic_type_rejected() {
    let mut model = Model::new(ModelConfig::default());
    model
        .declare_class(ClassDecl::new("A").with_function(FunctionDef::method("f", vec![], int())))
        .unwrap();
    model.declare_class(ClassDecl::new("Other")).unwrap();
    model.complete().unwrap();
    assert!(matches!(
        model.resolve(hash("A"), hash("Other"), "f"),
        Err(ModelError::Compilation(CompilationError::NotDerived { .. }))
    ));
}

/// `A <- C <- B`, every method virtual, `B` overrides only `get`.
fn three_level_chain() -> Model {
    let mut model = Model::new(ModelConfig::default());
    model
        .declare_class(
            ClassDecl::new("A")
                .with_function(FunctionDef::method("get", vec![], int()).as_virtual().with_return(ConstExpr::int(1)))
                .with_function(
                    FunctionDef::method("gettwo", vec![], int())
                        .as_virtual()
                        .with_return(ConstExpr::int(1)),
                ),
        )
        .unwrap();
    model
        .declare_class(
            ClassDecl::new("C")
                .with_base("A")
                .with_function(FunctionDef::method("get", vec![], int()).as_override().with_return(ConstExpr::int(2)))
                .with_function(
                    FunctionDef::method("gettwo", vec![], int())
                        .as_override()
                        .with_return(ConstExpr::int(2)),
                ),
        )
        .unwrap();
    model
        .declare_class(
            ClassDecl::new("B")
                .with_base("C")
                .with_function(FunctionDef::method("get", vec![], int()).as_override().with_return(ConstExpr::int(3))),
        )
        .unwrap();
    model.complete().unwrap();
    model
}

#[test]
fn three_level_chain_dispatch_and_size() {
    let model = three_level_chain();

    let get = model.resolve(hash("A"), hash("B"), "get").unwrap();
    assert_eq!(get.owner, hash("B"));
    assert_eq!(run(&model, &get), ConstValue::Int(3));

    let gettwo = model.resolve(hash("A"), hash("B"), "gettwo").unwrap();
    assert_eq!(gettwo.owner, hash("C"));
    assert_eq!(run(&model, &gettwo), ConstValue::Int(2));

    // A single vtable pointer and no data.
    let layout = model.layout(hash("B")).unwrap();
    assert_eq!(layout.size, 8);
    assert_eq!(layout.vptr_offset, Some(0));
}

#[test]
fn virtual_destructor_dispatches_to_most_derived() {
    let mut model = Model::new(ModelConfig::default());
    model
        .declare_class(ClassDecl::new("Resource").with_function(FunctionDef::destructor("Resource").as_virtual()))
        .unwrap();
    model.declare_class(ClassDecl::new("File").with_base("Resource")).unwrap();
    model.declare_class(ClassDecl::new("Plain")).unwrap();
    model.declare_class(ClassDecl::new("Sub").with_base("Plain")).unwrap();
    model.complete().unwrap();

    let ctx = ResolutionContext::new(model.registry());
    let span = Span::default();
    let virtual_dtor = resolve_destructor(&ctx, hash("Resource"), hash("File"), span).unwrap();
    assert!(virtual_dtor.is_virtual());
    assert_eq!(virtual_dtor.owner, hash("File"));

    let static_dtor = resolve_destructor(&ctx, hash("Plain"), hash("Sub"), span).unwrap();
    assert!(!static_dtor.is_virtual());
    assert_eq!(static_dtor.owner, hash("Plain"));
}

#[test]
fn slicing_keeps_base_fields() {
    let mut model = Model::new(ModelConfig::default());
    model
        .declare_class(ClassDecl::new("Point").with_field(FieldEntry::new("x", int()).with_default(ConstExpr::int(1))))
        .unwrap();
    model
        .declare_class(
            ClassDecl::new("Point3")
                .with_base("Point")
                .with_field(FieldEntry::new("z", int()).with_default(ConstExpr::int(3))),
        )
        .unwrap();
    model.complete().unwrap();

    let default_ctor = model.construct(hash("Point3"), &[]).unwrap().constructor;
    let full = model.evaluate(default_ctor, &[], EvalContext::Runtime).unwrap();
    assert_eq!(full.fields.len(), 2);

    let ctx = ResolutionContext::new(model.registry());
    let sliced = slice(&ctx, &full, hash("Point"), Span::default()).unwrap();
    assert_eq!(sliced.class, hash("Point"));
    assert_eq!(sliced.field("x"), Some(FieldValue::Value(ConstValue::Int(1))));
    assert_eq!(sliced.field("z"), None);
}
