use super::common::{field, student, student_registry};
use sif_adk::element::RenderedElement;
use sif_adk::{AdkError, ElementTree, SifDataType, SifElement, SifValue, SifVersion, SimpleField};

#[test]
fn test_record_survives_render_and_parse() {
    let registry = student_registry();
    let original = student(&registry, "A1B2", "Jane", "Doe");

    let rendered = original.render(SifVersion::SIF21).unwrap();
    let json = serde_json::to_string(&rendered).unwrap();
    let decoded: RenderedElement = serde_json::from_str(&json).unwrap();
    let parsed = ElementTree::parse_rendered(&registry, &decoded, SifVersion::SIF21).unwrap();

    assert_eq!(parsed.name(), "StudentPersonal");
    assert_eq!(parsed.key(), Some("A1B2".to_string()));
    let name = parsed.child("Name").unwrap();
    let name = name.as_tree().unwrap();
    assert_eq!(
        name.field_value("FirstName"),
        Some(SifValue::string("Jane"))
    );
    assert_eq!(
        parsed.field_value("Active"),
        Some(SifValue::boolean(Some(true)))
    );
    let birth = parsed.field_value("BirthDate").unwrap();
    assert!(birth.is_absent());
    assert_eq!(birth.category(), SifDataType::Date);
}

#[test]
fn test_era_specific_lexical_forms() {
    let registry = student_registry();
    let student = student(&registry, "A1B2", "Jane", "Doe");
    student
        .add_child(field(
            &registry,
            "StudentPersonal.LocalId",
            SifValue::string("L-7"),
        ))
        .unwrap();

    let sif1 = student.render(SifVersion::SIF15R1).unwrap();
    assert_eq!(sif1.child("LocalID").unwrap().text.as_deref(), Some("L-7"));
    assert_eq!(sif1.child("Active").unwrap().text.as_deref(), Some("Yes"));

    let sif2 = student.render(SifVersion::SIF21).unwrap();
    assert!(sif2.child("LocalID").is_none());
    assert_eq!(sif2.child("LocalId").unwrap().text.as_deref(), Some("L-7"));
    assert_eq!(sif2.child("Active").unwrap().text.as_deref(), Some("true"));

    let reparsed = ElementTree::parse_rendered(&registry, &sif1, SifVersion::SIF15R1).unwrap();
    assert_eq!(
        reparsed.field_value("LocalId"),
        Some(SifValue::string("L-7"))
    );
}

#[test]
fn test_field_unknown_in_version_fails_fast() {
    let registry = student_registry();
    let err = SimpleField::from_path(
        &registry,
        "StudentPersonal.GradeLevel",
        SifVersion::SIF11,
        SifValue::int(Some(7)),
    )
    .unwrap_err();
    assert!(matches!(err, AdkError::SchemaMismatch { kind: "SimpleField", .. }));
}

#[test]
fn test_mismatched_value_type_is_rejected() {
    let registry = student_registry();
    let birth = registry.lookup("StudentPersonal.BirthDate").unwrap();
    let err = SimpleField::new(birth, SifValue::string("1990-01-01")).unwrap_err();
    assert!(matches!(err, AdkError::InvalidCast { .. }));

    let active = field(&registry, "StudentPersonal.Active", SifValue::boolean(Some(true)));
    assert!(matches!(
        active.set_value(SifValue::int(Some(1))),
        Err(AdkError::InvalidCast { .. })
    ));
    assert_eq!(active.value(), SifValue::boolean(Some(true)));
}

#[test]
fn test_change_flags_propagate_to_root() {
    let registry = student_registry();
    let student = student(&registry, "A1B2", "Jane", "Doe");
    let name = student.child("Name").unwrap();
    let first = name.as_tree().unwrap().field("FirstName").unwrap();

    student.set_changed(false);
    name.set_changed(false);
    first.set_changed(false);

    first.set_value(SifValue::string("Janet")).unwrap();
    assert!(first.is_changed());
    assert!(name.is_changed());
    assert!(student.is_changed());
}

#[test]
fn test_unknown_rendered_tag_is_schema_mismatch() {
    let registry = student_registry();
    let mut rendered = RenderedElement::new("StudentPersonal", None);
    rendered
        .children
        .push(RenderedElement::new("Nickname", Some("JJ".to_string())));
    assert!(matches!(
        ElementTree::parse_rendered(&registry, &rendered, SifVersion::SIF21),
        Err(AdkError::SchemaMismatch { .. })
    ));
}
