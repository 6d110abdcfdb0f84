use homework_core::db::open_db_in_memory;
use homework_core::{
    Collection, NewAssignment, NewClass, NewSection, RecordStore, RecordValidationError,
    RepoError, SqliteRecordStore,
};
use rusqlite::Connection;
use uuid::Uuid;

fn assignment(class_id: Uuid, section_id: Uuid, date: &str, period: &str) -> NewAssignment {
    NewAssignment {
        class_id,
        section_id,
        date: date.to_string(),
        day_name: "الأحد".to_string(),
        period: period.to_string(),
        subject: "رياضيات".to_string(),
        lesson_title: "الجمع".to_string(),
        homework: "تمارين ص10".to_string(),
    }
}

fn class_with_section(store: &SqliteRecordStore<'_>, name: &str) -> (Uuid, Uuid) {
    let class_id = store.insert_class(&NewClass::new(name)).unwrap();
    let section_id = store
        .insert_section(&NewSection::new(class_id, "أ"))
        .unwrap();
    (class_id, section_id)
}

#[test]
fn insert_assigns_unique_ids_and_lists_in_insertion_order() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteRecordStore::try_new(&conn).unwrap();

    let first = store.insert_class(&NewClass::new("grade 1")).unwrap();
    let second = store.insert_class(&NewClass::new("grade 2")).unwrap();
    assert_ne!(first, second);

    let classes = store.list_classes().unwrap();
    let ids: Vec<Uuid> = classes.iter().map(|class| class.id).collect();
    assert_eq!(ids, vec![first, second]);
    assert_eq!(classes[0].name, "grade 1");
}

#[test]
fn insert_trims_names() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteRecordStore::try_new(&conn).unwrap();

    let id = store.insert_class(&NewClass::new("  الأول ثانوي  ")).unwrap();
    let loaded = store.get_class(id).unwrap().unwrap();
    assert_eq!(loaded.name, "الأول ثانوي");
}

#[test]
fn blank_class_name_is_rejected_before_sql() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteRecordStore::try_new(&conn).unwrap();

    let err = store.insert_class(&NewClass::new("   ")).unwrap_err();
    assert!(matches!(
        err,
        RepoError::Validation(RecordValidationError::BlankField {
            record: "class",
            field: "name"
        })
    ));
    assert_eq!(store.count(Collection::Classes).unwrap(), 0);
}

#[test]
fn sections_index_returns_only_matching_class() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteRecordStore::try_new(&conn).unwrap();

    let (class_a, section_a) = class_with_section(&store, "grade 1");
    let (class_b, _) = class_with_section(&store, "grade 2");
    let extra = store
        .insert_section(&NewSection::new(class_a, "ب"))
        .unwrap();

    let sections = store.list_sections_by_class(class_a).unwrap();
    let ids: Vec<Uuid> = sections.iter().map(|section| section.id).collect();
    assert_eq!(ids, vec![section_a, extra]);
    assert!(sections.iter().all(|section| section.class_id == class_a));

    assert_eq!(store.list_sections_by_class(class_b).unwrap().len(), 1);
    assert!(store
        .list_sections_by_class(Uuid::new_v4())
        .unwrap()
        .is_empty());
    assert_eq!(store.list_sections().unwrap().len(), 3);
}

#[test]
fn assignments_index_returns_only_matching_pair() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteRecordStore::try_new(&conn).unwrap();

    let (class_a, section_a) = class_with_section(&store, "grade 1");
    let section_a2 = store
        .insert_section(&NewSection::new(class_a, "ب"))
        .unwrap();
    let (class_b, section_b) = class_with_section(&store, "grade 2");

    store
        .insert_assignment(&assignment(class_a, section_a, "1445-01-01", "1"))
        .unwrap();
    store
        .insert_assignment(&assignment(class_a, section_a2, "1445-01-01", "1"))
        .unwrap();
    store
        .insert_assignment(&assignment(class_b, section_b, "1445-01-01", "1"))
        .unwrap();

    let rows = store
        .list_assignments_by_class_section(class_a, section_a)
        .unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].class_id, class_a);
    assert_eq!(rows[0].section_id, section_a);
    assert_eq!(store.list_assignments().unwrap().len(), 3);
}

#[test]
fn unique_index_rejects_same_slot_inserted_directly() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteRecordStore::try_new(&conn).unwrap();
    let (class_id, section_id) = class_with_section(&store, "grade 1");

    store
        .insert_assignment(&assignment(class_id, section_id, "1445-01-01", "1"))
        .unwrap();
    let err = store
        .insert_assignment(&assignment(class_id, section_id, "1445-01-01", " 1 "))
        .unwrap_err();

    match err {
        RepoError::DuplicateAssignment { date, period, .. } => {
            assert_eq!(date, "1445-01-01");
            assert_eq!(period, "1");
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(store.count(Collection::Assignments).unwrap(), 1);
}

#[test]
fn section_insert_with_unknown_class_is_a_storage_failure() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteRecordStore::try_new(&conn).unwrap();

    let err = store
        .insert_section(&NewSection::new(Uuid::new_v4(), "أ"))
        .unwrap_err();
    assert!(matches!(err, RepoError::Db(_)));
}

#[test]
fn delete_by_id_is_idempotent() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteRecordStore::try_new(&conn).unwrap();
    let (class_id, section_id) = class_with_section(&store, "grade 1");

    store.delete_by_id(Collection::Sections, section_id).unwrap();
    store.delete_by_id(Collection::Sections, section_id).unwrap();
    store
        .delete_by_id(Collection::Assignments, Uuid::new_v4())
        .unwrap();

    assert!(store.get_section(section_id).unwrap().is_none());
    assert!(store.get_class(class_id).unwrap().is_some());
}

#[test]
fn deleting_class_with_sections_does_not_cascade() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteRecordStore::try_new(&conn).unwrap();
    let (class_id, section_id) = class_with_section(&store, "grade 1");

    let err = store.delete_by_id(Collection::Classes, class_id).unwrap_err();
    assert!(matches!(err, RepoError::Db(_)));
    assert!(store.get_section(section_id).unwrap().is_some());
}

#[test]
fn invalid_persisted_uuid_is_reported() {
    let conn = open_db_in_memory().unwrap();
    conn.execute(
        "INSERT INTO classes (id, name) VALUES ('not-a-uuid', 'grade 1');",
        [],
    )
    .unwrap();
    let store = SqliteRecordStore::try_new(&conn).unwrap();

    let err = store.list_classes().unwrap_err();
    assert!(matches!(err, RepoError::InvalidData(message) if message.contains("classes.id")));
}

#[test]
fn separate_connections_share_the_unique_index() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("shared.sqlite3");
    let conn_a = homework_core::db::open_db(&path).unwrap();
    let conn_b = homework_core::db::open_db(&path).unwrap();
    let store_a = SqliteRecordStore::try_new(&conn_a).unwrap();
    let store_b = SqliteRecordStore::try_new(&conn_b).unwrap();

    let (class_id, section_id) = class_with_section(&store_a, "grade 1");
    let request = assignment(class_id, section_id, "1445-02-02", "3");

    // Both writers passed their read check; only one insert may land.
    assert!(store_a
        .list_assignments_by_class_section(class_id, section_id)
        .unwrap()
        .is_empty());
    assert!(store_b
        .list_assignments_by_class_section(class_id, section_id)
        .unwrap()
        .is_empty());
    store_a.insert_assignment(&request).unwrap();
    let err = store_b.insert_assignment(&request).unwrap_err();
    assert!(matches!(err, RepoError::DuplicateAssignment { .. }));

    let check = Connection::open(&path).unwrap();
    let count: i64 = check
        .query_row("SELECT COUNT(*) FROM assignments;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(count, 1);
}
