//! Integration tests for object layout through the model.

use objmodel::prelude::*;

fn int() -> DataType {
    DataType::simple(primitives::INT32)
}

fn shapes(config: ModelConfig) -> Model {
    let mut model = Model::new(config);
    model
        .declare_class(
            ClassDecl::new("Shape")
                .with_field(FieldEntry::new("id", int()))
                .with_function(FunctionDef::method("area", vec![], DataType::simple(primitives::DOUBLE)).as_pure())
                .with_function(FunctionDef::destructor("Shape").as_virtual()),
        )
        .unwrap();
    model
        .declare_class(
            ClassDecl::new("Circle")
                .with_base("Shape")
                .with_field(FieldEntry::new("radius", DataType::simple(primitives::DOUBLE)))
                .with_function(FunctionDef::method("area", vec![], DataType::simple(primitives::DOUBLE)).as_override()),
        )
        .unwrap();
    model
        .declare_class(
            ClassDecl::new("Pair")
                .with_field(FieldEntry::new("first", DataType::simple(TypeHash::from_name("Circle"))))
                .with_field(FieldEntry::new("tag", DataType::simple(primitives::CHAR))),
        )
        .unwrap();
    model.complete().unwrap();
    model
}

#[test]
fn polymorphic_base_with_fields() {
    let model = shapes(ModelConfig::default());

    let shape = model.layout(TypeHash::from_name("Shape")).unwrap();
    assert!(shape.has_vptr());
    assert_eq!(shape.field("id").unwrap().offset, 8);
    assert_eq!(shape.size, 16);

    // Circle reuses Shape's vptr; radius follows the base's data.
    let circle = model.layout(TypeHash::from_name("Circle")).unwrap();
    assert_eq!(circle.base_offset, Some(0));
    assert_eq!(circle.field("radius").unwrap().offset, 16);
    assert_eq!(circle.size, 24);
    assert_eq!(circle.align, 8);
}

#[test]
fn class_typed_field_is_embedded() {
    let model = shapes(ModelConfig::default());
    let pair = model.layout(TypeHash::from_name("Pair")).unwrap();
    assert_eq!(pair.field("first").unwrap().size, 24);
    assert_eq!(pair.field("tag").unwrap().offset, 24);
    assert_eq!(pair.size, 32);
}

#[test]
fn target_pointer_size_changes_layout() {
    let model = shapes(ModelConfig::default().with_target(TargetLayout::ILP32));
    let shape = model.layout(TypeHash::from_name("Shape")).unwrap();
    assert_eq!(shape.field("id").unwrap().offset, 4);
    assert_eq!(shape.size, 8);
}

#[test]
fn abstract_class_still_has_a_layout() {
    let model = shapes(ModelConfig::default());
    assert!(model.registry().get_class_by_name("Shape").unwrap().is_abstract);
    assert!(model.layout(TypeHash::from_name("Shape")).is_ok());
    assert!(matches!(
        model.construct(TypeHash::from_name("Shape"), &[]),
        Err(ModelError::Compilation(CompilationError::AbstractInstantiation { .. }))
    ));
}
