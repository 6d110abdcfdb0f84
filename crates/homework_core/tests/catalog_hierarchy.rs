use homework_core::db::open_db_in_memory;
use homework_core::{
    AssignmentService, CatalogConfig, CatalogInitializer, CatalogSeedError, Collection,
    HierarchyService, HierarchyServiceError, NewAssignment, RecordStore, SqliteRecordStore,
};
use uuid::Uuid;

fn small_catalog() -> CatalogConfig {
    CatalogConfig::new(["grade 1", "grade 2"], ["A", "B"])
}

#[test]
fn initialize_seeds_default_catalog_in_order() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteRecordStore::try_new(&conn).unwrap();
    let initializer = CatalogInitializer::new(store, CatalogConfig::default()).unwrap();

    let summary = initializer.initialize().unwrap();
    assert_eq!(summary.classes, 6);
    assert_eq!(summary.sections, 18);
    assert_eq!(summary.assignments_removed, 0);

    let service = HierarchyService::new(store);
    let classes = service.get_classes().unwrap();
    let names: Vec<&str> = classes.iter().map(|class| class.name.as_str()).collect();
    assert_eq!(
        names,
        vec![
            "الأول متوسط",
            "الثاني متوسط",
            "الثالث متوسط",
            "الأول ثانوي",
            "الثاني ثانوي",
            "الثالث ثانوي",
        ]
    );

    for class in &classes {
        let sections = service.get_sections(class.id).unwrap();
        let section_names: Vec<&str> = sections.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(section_names, vec!["أ", "ب", "ج"]);
        assert!(sections.iter().all(|section| section.class_id == class.id));
    }
}

#[test]
fn initialize_twice_duplicates_catalog() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteRecordStore::try_new(&conn).unwrap();
    let initializer = CatalogInitializer::new(store, small_catalog()).unwrap();

    initializer.initialize().unwrap();
    initializer.initialize().unwrap();

    assert_eq!(store.count(Collection::Classes).unwrap(), 4);
    assert_eq!(store.count(Collection::Sections).unwrap(), 8);
}

#[test]
fn reset_and_initialize_is_idempotent_in_shape() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteRecordStore::try_new(&conn).unwrap();
    let initializer = CatalogInitializer::new(store, CatalogConfig::default()).unwrap();

    for _ in 0..2 {
        let summary = initializer.reset_and_initialize().unwrap();
        assert_eq!(summary.classes, 6);
        assert_eq!(summary.sections, 18);
        assert_eq!(store.count(Collection::Classes).unwrap(), 6);
        assert_eq!(store.count(Collection::Sections).unwrap(), 18);
        assert_eq!(store.count(Collection::Assignments).unwrap(), 0);
    }
}

#[test]
fn reset_removes_assignments_before_sections_and_classes() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteRecordStore::try_new(&conn).unwrap();
    let initializer = CatalogInitializer::new(store, small_catalog()).unwrap();
    initializer.initialize().unwrap();

    let hierarchy = HierarchyService::new(store);
    let class = hierarchy.get_classes().unwrap().remove(0);
    let section = hierarchy.get_sections(class.id).unwrap().remove(0);
    let assignments = AssignmentService::new(store);
    for period in ["1", "2"] {
        assignments
            .add_assignment(&NewAssignment {
                class_id: class.id,
                section_id: section.id,
                date: "1445-03-01".to_string(),
                day_name: "الاثنين".to_string(),
                period: period.to_string(),
                subject: "علوم".to_string(),
                lesson_title: "الخلية".to_string(),
                homework: "حل السؤال الأول".to_string(),
            })
            .unwrap();
    }

    let summary = initializer.reset_and_initialize().unwrap();
    assert_eq!(summary.assignments_removed, 2);
    assert_eq!(store.count(Collection::Assignments).unwrap(), 0);
    assert!(hierarchy.get_class(class.id).unwrap().is_none());
    assert_eq!(hierarchy.get_classes().unwrap().len(), 2);
}

#[test]
fn initializer_rejects_invalid_config() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteRecordStore::try_new(&conn).unwrap();

    let config = CatalogConfig::new(["grade 1"], Vec::<String>::new());
    let result = CatalogInitializer::new(store, config);
    assert!(matches!(result, Err(CatalogSeedError::InvalidConfig(_))));
}

#[test]
fn get_sections_for_unknown_class_is_empty() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteRecordStore::try_new(&conn).unwrap();
    CatalogInitializer::new(store, small_catalog())
        .unwrap()
        .initialize()
        .unwrap();

    let service = HierarchyService::new(store);
    assert!(service.get_sections(Uuid::new_v4()).unwrap().is_empty());
}

#[test]
fn get_sections_ignores_catalog_of_other_database() {
    let seeded = open_db_in_memory().unwrap();
    let seeded_store = SqliteRecordStore::try_new(&seeded).unwrap();
    CatalogInitializer::new(seeded_store, small_catalog())
        .unwrap()
        .initialize()
        .unwrap();
    let foreign_class = HierarchyService::new(seeded_store).get_classes().unwrap()[0].id;

    let empty = open_db_in_memory().unwrap();
    let service = HierarchyService::new(SqliteRecordStore::try_new(&empty).unwrap());
    assert!(service.get_sections(foreign_class).unwrap().is_empty());
}

#[test]
fn add_class_and_section_round_trip() {
    let conn = open_db_in_memory().unwrap();
    let service = HierarchyService::new(SqliteRecordStore::try_new(&conn).unwrap());

    let class_id = service.add_class(" الأول متوسط ").unwrap();
    let section_id = service.add_section(class_id, "د").unwrap();

    let class = service.get_class(class_id).unwrap().unwrap();
    assert_eq!(class.name, "الأول متوسط");
    let section = service.get_section(section_id).unwrap().unwrap();
    assert_eq!(section.class_id, class_id);
    assert_eq!(section.name, "د");
}

#[test]
fn add_section_requires_existing_class() {
    let conn = open_db_in_memory().unwrap();
    let service = HierarchyService::new(SqliteRecordStore::try_new(&conn).unwrap());

    let missing = Uuid::new_v4();
    let err = service.add_section(missing, "أ").unwrap_err();
    assert!(matches!(err, HierarchyServiceError::ClassNotFound(id) if id == missing));
}

#[test]
fn add_class_rejects_blank_name() {
    let conn = open_db_in_memory().unwrap();
    let service = HierarchyService::new(SqliteRecordStore::try_new(&conn).unwrap());

    let err = service.add_class("  ").unwrap_err();
    assert!(matches!(err, HierarchyServiceError::Validation(_)));
    assert!(service.get_classes().unwrap().is_empty());
}

#[test]
fn seeded_section_count_matches_config_expectation() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteRecordStore::try_new(&conn).unwrap();
    let initializer = CatalogInitializer::new(store, small_catalog()).unwrap();

    let summary = initializer.initialize().unwrap();
    assert_eq!(initializer.config().class_names.len(), summary.classes);
    assert_eq!(initializer.config().expected_sections(), summary.sections);
    assert_eq!(
        store.count(Collection::Sections).unwrap(),
        initializer.config().expected_sections() as u64
    );
}
