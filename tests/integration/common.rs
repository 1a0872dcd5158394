use sif_adk::schema::ElementDefBuilder;
use sif_adk::{ElementTree, SchemaRegistry, SifDataType, SifValue, SifVersion, SimpleField};

/// StudentPersonal with a small selection of fields across both eras.
pub fn student_registry() -> SchemaRegistry {
    let registry = SchemaRegistry::new();
    registry
        .define(None, ElementDefBuilder::object("StudentPersonal").keys(["RefId"]))
        .unwrap();
    let fields = [
        ElementDefBuilder::attribute("RefId", SifDataType::String).sequence(0),
        ElementDefBuilder::field("LocalId", SifDataType::String)
            .sequence(1)
            .renamed(SifVersion::SIF11, "LocalID")
            .renamed(SifVersion::SIF20, "LocalId"),
        ElementDefBuilder::field("BirthDate", SifDataType::Date).sequence(3),
        ElementDefBuilder::field("Active", SifDataType::Boolean).sequence(4),
        ElementDefBuilder::field("GradeLevel", SifDataType::Int)
            .sequence(5)
            .since(SifVersion::SIF20),
    ];
    for field in fields {
        registry.define(Some("StudentPersonal"), field).unwrap();
    }
    registry
        .define(
            Some("StudentPersonal"),
            ElementDefBuilder::complex("Name").sequence(2),
        )
        .unwrap();
    registry
        .define(
            Some("StudentPersonal.Name"),
            ElementDefBuilder::field("FirstName", SifDataType::String).sequence(1),
        )
        .unwrap();
    registry
        .define(
            Some("StudentPersonal.Name"),
            ElementDefBuilder::field("LastName", SifDataType::String).sequence(2),
        )
        .unwrap();
    registry
}

pub fn field(registry: &SchemaRegistry, path: &str, value: SifValue) -> SimpleField {
    SimpleField::from_path(registry, path, SifVersion::LATEST, value).unwrap()
}

/// A student with the given first name, an absent birth date and `Active`.
pub fn student(registry: &SchemaRegistry, ref_id: &str, first: &str, last: &str) -> ElementTree {
    let student = ElementTree::from_path(registry, "StudentPersonal", SifVersion::LATEST).unwrap();
    student
        .add_child(field(registry, "StudentPersonal.RefId", SifValue::string(ref_id)))
        .unwrap();
    let name = ElementTree::from_path(registry, "StudentPersonal.Name", SifVersion::LATEST).unwrap();
    name.add_child(field(registry, "StudentPersonal.Name.FirstName", SifValue::string(first)))
        .unwrap();
    name.add_child(field(registry, "StudentPersonal.Name.LastName", SifValue::string(last)))
        .unwrap();
    student.add_child(name).unwrap();
    student
        .add_child(field(registry, "StudentPersonal.BirthDate", SifValue::date(None)))
        .unwrap();
    student
        .add_child(field(registry, "StudentPersonal.Active", SifValue::boolean(Some(true))))
        .unwrap();
    student
}
