use sif_adk::element::{ElementCollection, ElementList, KeyedElementList};
use sif_adk::schema::ElementDefBuilder;
use sif_adk::{
    AdkError, Element, ElementTree, SchemaRegistry, SifDataType, SifElement, SifValue, SifVersion,
    SimpleField,
};

fn roster_registry() -> SchemaRegistry {
    let registry = SchemaRegistry::new();
    registry
        .define(None, ElementDefBuilder::object("SectionRoster"))
        .unwrap();
    registry
        .define(
            Some("SectionRoster"),
            ElementDefBuilder::complex("StudentList"),
        )
        .unwrap();
    registry
        .define(
            Some("SectionRoster.StudentList"),
            ElementDefBuilder::complex("Student").repeatable().keys(["Number"]),
        )
        .unwrap();
    registry
        .define(
            Some("SectionRoster.StudentList.Student"),
            ElementDefBuilder::attribute("Number", SifDataType::Int),
        )
        .unwrap();
    registry
        .define(
            Some("SectionRoster.StudentList.Student"),
            ElementDefBuilder::field("Name", SifDataType::String),
        )
        .unwrap();
    registry
        .define(Some("SectionRoster"), ElementDefBuilder::complex("Notes"))
        .unwrap();
    registry
        .define(
            Some("SectionRoster.Notes"),
            ElementDefBuilder::field("Note", SifDataType::String).repeatable(),
        )
        .unwrap();
    registry
}

fn roster_student(registry: &SchemaRegistry, number: i32, name: &str) -> ElementTree {
    let version = SifVersion::LATEST;
    let student =
        ElementTree::from_path(registry, "SectionRoster.StudentList.Student", version).unwrap();
    student
        .add_child(
            SimpleField::from_path(
                registry,
                "SectionRoster.StudentList.Student.Number",
                version,
                SifValue::int(Some(number)),
            )
            .unwrap(),
        )
        .unwrap();
    student
        .add_child(
            SimpleField::from_path(
                registry,
                "SectionRoster.StudentList.Student.Name",
                version,
                SifValue::string(name),
            )
            .unwrap(),
        )
        .unwrap();
    student
}

fn student_list(registry: &SchemaRegistry) -> KeyedElementList<ElementTree> {
    let container =
        ElementTree::from_path(registry, "SectionRoster.StudentList", SifVersion::LATEST).unwrap();
    let item_def = registry.lookup("SectionRoster.StudentList.Student").unwrap();
    KeyedElementList::new(container, item_def)
}

#[test]
fn test_keyed_lookup_by_native_value_and_text() {
    let registry = roster_registry();
    let list = student_list(&registry);
    for (number, name) in [(1, "Ann"), (2, "Ben"), (3, "Cal")] {
        list.add(roster_student(&registry, number, name)).unwrap();
    }
    assert_eq!(list.len(), 3);

    let ben = list.get_key(2).unwrap();
    assert_eq!(ben.field_value("Name"), Some(SifValue::string("Ben")));
    assert!(list.get_key("3").is_some());
    assert!(list.get_key(SifValue::int(Some(1))).is_some());
    assert!(!list.contains_key(9));
}

#[test]
fn test_duplicate_keys_resolve_to_first_inserted() {
    let registry = roster_registry();
    let list = student_list(&registry);
    list.add(roster_student(&registry, 7, "First")).unwrap();
    list.add(roster_student(&registry, 7, "Second")).unwrap();

    let found = list.get_key(7).unwrap();
    assert_eq!(found.field_value("Name"), Some(SifValue::string("First")));

    assert!(list.remove_key(7));
    assert_eq!(list.len(), 1);
    let remaining = list.get_key(7).unwrap();
    assert_eq!(
        remaining.field_value("Name"),
        Some(SifValue::string("Second"))
    );
    assert!(list.remove_key(7));
    assert!(!list.remove_key(7));
    assert!(list.is_empty());
}

#[test]
fn test_removed_item_is_detached() {
    let registry = roster_registry();
    let list = student_list(&registry);
    let student = roster_student(&registry, 4, "Dee");
    list.add(student.clone()).unwrap();
    assert!(student.parent().unwrap().ptr_eq(list.container()));

    assert!(list.remove_key(4));
    assert!(student.parent().is_none());
}

#[test]
fn test_field_list_rejects_wrong_items() {
    let registry = roster_registry();
    let notes =
        ElementTree::from_path(&registry, "SectionRoster.Notes", SifVersion::LATEST).unwrap();
    let note_def = registry.lookup("SectionRoster.Notes.Note").unwrap();
    let list: ElementList<SimpleField> = ElementList::new(notes, note_def.clone());

    list.add(SimpleField::new(note_def, SifValue::string("late bus")).unwrap())
        .unwrap();
    let name_def = registry
        .lookup("SectionRoster.StudentList.Student.Name")
        .unwrap();
    assert!(matches!(
        list.add(SimpleField::new(name_def, SifValue::string("Ann")).unwrap()),
        Err(AdkError::InvalidCast { .. })
    ));
    let tree = Element::Tree(roster_student(&registry, 1, "Ann"));
    assert!(matches!(
        list.add_element(tree),
        Err(AdkError::InvalidCast { .. })
    ));
    assert_eq!(list.len(), 1);
}

#[test]
fn test_read_only_view_refuses_mutation() {
    let registry = roster_registry();
    let list = student_list(&registry);
    list.add(roster_student(&registry, 1, "Ann")).unwrap();

    let view = list.as_list().as_read_only();
    assert_eq!(view.len(), 1);
    assert!(matches!(
        view.add(roster_student(&registry, 2, "Ben")),
        Err(AdkError::Unsupported(_))
    ));
    assert!(matches!(view.clear(), Err(AdkError::Unsupported(_))));
    assert_eq!(list.len(), 1);
}
