use rollbook_core::db::open_db_in_memory;
use rollbook_core::{
    ClassService, Enrollment, EntityRef, NewClassGroup, NoteService, ServiceError,
    SqliteClassRepository, SqliteNoteRepository, SqliteStudentRepository, StudentFields,
    StudentService, ValidationError,
};
use rusqlite::{params, Connection};

fn enrolled(conn: &mut Connection) -> Enrollment {
    let class = ClassService::new(SqliteClassRepository::try_new(conn).unwrap())
        .create_class(NewClassGroup::new("Algebra I"))
        .unwrap();
    let (_, enrollment) = StudentService::new(SqliteStudentRepository::try_new(conn).unwrap())
        .create_student_and_enroll(Some(class.id), StudentFields::new("Jane Doe"))
        .unwrap();
    enrollment.unwrap()
}

fn note_count(conn: &Connection) -> i64 {
    conn.query_row("SELECT COUNT(*) FROM notes;", [], |row| row.get(0))
        .unwrap()
}

#[test]
fn add_note_with_blank_content_is_a_silent_noop() {
    let mut conn = open_db_in_memory().unwrap();
    let enrollment = enrolled(&mut conn);
    let service = NoteService::new(SqliteNoteRepository::try_new(&conn).unwrap());

    assert_eq!(service.add_note(enrollment.id, "").unwrap(), None);
    assert_eq!(service.add_note(enrollment.id, "  \n\t").unwrap(), None);
    assert_eq!(note_count(&conn), 0);
}

#[test]
fn add_note_creates_exactly_one_note_with_equal_timestamps() {
    let mut conn = open_db_in_memory().unwrap();
    let enrollment = enrolled(&mut conn);
    let service = NoteService::new(SqliteNoteRepository::try_new(&conn).unwrap());

    let note = service
        .add_note(enrollment.id, "Struggles with factoring")
        .unwrap()
        .expect("non-blank content should create a note");
    assert_eq!(note.enrollment_id, enrollment.id);
    assert_eq!(note.content, "Struggles with factoring");
    assert_eq!(note.created_at, note.updated_at);
    assert_eq!(note_count(&conn), 1);
    assert_eq!(service.get_note(note.id).unwrap(), note);
}

#[test]
fn add_note_to_missing_enrollment_returns_not_found() {
    let conn = open_db_in_memory().unwrap();
    let service = NoteService::new(SqliteNoteRepository::try_new(&conn).unwrap());

    let err = service.add_note(5, "orphan").unwrap_err();
    assert!(matches!(err, ServiceError::NotFound(EntityRef::Enrollment(5))));
    assert_eq!(note_count(&conn), 0);
}

#[test]
fn edit_note_advances_updated_at_and_keeps_created_at() {
    let mut conn = open_db_in_memory().unwrap();
    let enrollment = enrolled(&mut conn);
    let service = NoteService::new(SqliteNoteRepository::try_new(&conn).unwrap());
    let note = service.add_note(enrollment.id, "draft").unwrap().unwrap();

    let first_edit = service.edit_note(note.id, "revised").unwrap();
    assert_eq!(first_edit.content, "revised");
    assert_eq!(first_edit.created_at, note.created_at);
    assert!(first_edit.updated_at > note.updated_at);

    let second_edit = service.edit_note(note.id, "revised again").unwrap();
    assert!(second_edit.updated_at > first_edit.updated_at);
    assert_eq!(second_edit.created_at, note.created_at);
}

#[test]
fn edit_note_rejects_blank_content_and_missing_note() {
    let mut conn = open_db_in_memory().unwrap();
    let enrollment = enrolled(&mut conn);
    let service = NoteService::new(SqliteNoteRepository::try_new(&conn).unwrap());
    let note = service.add_note(enrollment.id, "keep me").unwrap().unwrap();

    let blank = service.edit_note(note.id, "   ").unwrap_err();
    assert!(matches!(
        blank,
        ServiceError::Validation(ValidationError::Required { field: "content" })
    ));
    assert_eq!(service.get_note(note.id).unwrap().content, "keep me");

    let missing = service.edit_note(note.id + 100, "anything").unwrap_err();
    assert!(matches!(missing, ServiceError::NotFound(EntityRef::Note(_))));
}

#[test]
fn delete_note_removes_it_and_missing_delete_is_not_found() {
    let mut conn = open_db_in_memory().unwrap();
    let enrollment = enrolled(&mut conn);
    let service = NoteService::new(SqliteNoteRepository::try_new(&conn).unwrap());
    let doomed = service.add_note(enrollment.id, "temporary").unwrap().unwrap();
    service.add_note(enrollment.id, "permanent").unwrap().unwrap();

    service.delete_note(doomed.id).unwrap();
    assert_eq!(note_count(&conn), 1);
    assert!(matches!(
        service.get_note(doomed.id).unwrap_err(),
        ServiceError::NotFound(EntityRef::Note(_))
    ));

    let err = service.delete_note(doomed.id).unwrap_err();
    assert!(matches!(err, ServiceError::NotFound(EntityRef::Note(id)) if id == doomed.id));
    assert_eq!(note_count(&conn), 1);
}

#[test]
fn notes_are_listed_most_recently_updated_first() {
    let mut conn = open_db_in_memory().unwrap();
    let enrollment = enrolled(&mut conn);
    let (first_id, second_id) = {
        let service = NoteService::new(SqliteNoteRepository::try_new(&conn).unwrap());
        let first = service.add_note(enrollment.id, "first").unwrap().unwrap();
        let second = service.add_note(enrollment.id, "second").unwrap().unwrap();
        (first.id, second.id)
    };

    conn.execute(
        "UPDATE notes SET updated_at = 2000 WHERE id = ?1;",
        params![first_id],
    )
    .unwrap();
    conn.execute(
        "UPDATE notes SET updated_at = 1000 WHERE id = ?1;",
        params![second_id],
    )
    .unwrap();

    let service = NoteService::new(SqliteNoteRepository::try_new(&conn).unwrap());
    let listed = service.list_notes_for_enrollment(enrollment.id).unwrap();
    let ids: Vec<i64> = listed.iter().map(|note| note.id).collect();
    assert_eq!(ids, vec![first_id, second_id]);

    conn.execute("UPDATE notes SET updated_at = 1000;", []).unwrap();
    service.edit_note(second_id, "second, edited").unwrap();
    let listed = service.list_notes_for_enrollment(enrollment.id).unwrap();
    assert_eq!(listed[0].id, second_id);

    let err = service.list_notes_for_enrollment(enrollment.id + 1).unwrap_err();
    assert!(matches!(err, ServiceError::NotFound(EntityRef::Enrollment(_))));
}
