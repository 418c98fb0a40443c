use rollbook_core::db::open_db_in_memory;
use rollbook_core::{
    ClassService, EnrollmentService, EntityRef, NewClassGroup, NoteService, ServiceError,
    SqliteClassRepository, SqliteEnrollmentRepository, SqliteNoteRepository,
    SqliteStudentRepository, StudentFields, StudentService,
};

#[test]
fn class_with_one_student_then_deleting_missing_note() {
    let mut conn = open_db_in_memory().unwrap();
    let algebra = ClassService::new(SqliteClassRepository::try_new(&conn).unwrap())
        .create_class(NewClassGroup::new("Algebra I"))
        .unwrap();

    let (jane, _) = StudentService::new(SqliteStudentRepository::try_new(&mut conn).unwrap())
        .create_student_and_enroll(Some(algebra.id), StudentFields::new("Jane Doe"))
        .unwrap();

    let roster = EnrollmentService::new(SqliteEnrollmentRepository::try_new(&conn).unwrap())
        .list_enrollments_for_class(algebra.id)
        .unwrap();
    assert_eq!(roster.len(), 1);
    assert_eq!(roster[0].student, jane);

    let notes = NoteService::new(SqliteNoteRepository::try_new(&conn).unwrap());
    notes
        .add_note(roster[0].enrollment.id, "Joined mid-term")
        .unwrap();
    let before = notes
        .list_notes_for_enrollment(roster[0].enrollment.id)
        .unwrap();

    let err = notes.delete_note(9_999).unwrap_err();
    assert!(matches!(err, ServiceError::NotFound(EntityRef::Note(9_999))));
    let after = notes
        .list_notes_for_enrollment(roster[0].enrollment.id)
        .unwrap();
    assert_eq!(before, after);
}

#[test]
fn global_students_are_listed_alphabetically_without_enrollments() {
    let mut conn = open_db_in_memory().unwrap();
    let mut service = StudentService::new(SqliteStudentRepository::try_new(&mut conn).unwrap());
    service.create_student_global(StudentFields::new("Bob")).unwrap();
    service.create_student_global(StudentFields::new("Amy")).unwrap();

    let directory = service.list_students_with_enrollments().unwrap();
    let names: Vec<&str> = directory
        .iter()
        .map(|entry| entry.student.full_name.as_str())
        .collect();
    assert_eq!(names, vec!["Amy", "Bob"]);
    assert!(directory.iter().all(|entry| entry.enrollments.is_empty()));
}

#[test]
fn student_detail_serializes_for_external_renderers() {
    let mut conn = open_db_in_memory().unwrap();
    let class = ClassService::new(SqliteClassRepository::try_new(&conn).unwrap())
        .create_class(NewClassGroup::new("Chemistry"))
        .unwrap();
    let (student, enrollment) =
        StudentService::new(SqliteStudentRepository::try_new(&mut conn).unwrap())
            .create_student_and_enroll(Some(class.id), StudentFields::new("Ada"))
            .unwrap();
    NoteService::new(SqliteNoteRepository::try_new(&conn).unwrap())
        .add_note(enrollment.unwrap().id, "Lab partner: Bob")
        .unwrap();

    let detail = EnrollmentService::new(SqliteEnrollmentRepository::try_new(&conn).unwrap())
        .get_student_detail_in_class(class.id, student.id)
        .unwrap();
    let json = serde_json::to_value(&detail).unwrap();
    assert_eq!(json["classroom"]["name"], "Chemistry");
    assert_eq!(json["student"]["full_name"], "Ada");
    assert_eq!(json["notes"][0]["content"], "Lab partner: Bob");
    assert!(json["student"]["birth_date"].is_null());
}
