//! One handler per roster capability.
//!
//! # Responsibility
//! - Validate submitted forms, call one service use-case, shape a `Response`.
//! - Turn every service failure into a response; handlers never error out.
//!
//! # Invariants
//! - `ResponseMode` changes only the response shape, never the write path.
//! - A rejected form is returned together with the submitted values.

use crate::forms::{ClassForm, EnrollForm, FormErrors, NoteForm, StudentForm};
use crate::response::{Response, ResponseMode, Route, View};
use log::{error, warn};
use rollbook_core::{
    ClassGroup, ClassId, ClassService, EnrollmentId, EnrollmentService, NoteId, NoteService,
    ServiceError, ServiceResult, SqliteClassRepository, SqliteEnrollmentRepository,
    SqliteNoteRepository, SqliteStudentRepository, StudentId, StudentService,
};
use rusqlite::Connection;

const MSG_DUPLICATE_CLASS_NAME: &str = "Class with this Name already exists.";
// Only reachable if an enrollment write stops being get-or-create.
const MSG_DUPLICATE_ENROLLMENT: &str = "This student is already enrolled in this class.";

pub fn list_classes(conn: &Connection) -> Response {
    let result = class_service(conn)
        .and_then(|service| service.list_classes())
        .map(|classes| Response::Page(View::ClassList { classes }));
    respond("list_classes", result)
}

pub fn show_create_class_form() -> Response {
    Response::Page(View::ClassForm {
        form: ClassForm::default(),
    })
}

pub fn create_class(conn: &Connection, form: ClassForm) -> Response {
    let input = match form.clean() {
        Ok(input) => input,
        Err(errors) => return invalid(View::ClassForm { form }, errors),
    };
    match class_service(conn).and_then(|service| service.create_class(input)) {
        Ok(_) => Response::Redirect(Route::ClassList),
        Err(err) => match form_errors(&err) {
            Some(errors) => invalid(View::ClassForm { form }, errors),
            None => error_response("create_class", err),
        },
    }
}

pub fn class_detail(conn: &Connection, class_id: ClassId) -> Response {
    let result = class_service(conn)
        .and_then(|service| service.get_class(class_id))
        .and_then(|classroom| {
            let enrollments =
                enrollment_service(conn)?.list_enrollments_for_class(class_id)?;
            Ok(Response::Page(View::ClassDetail {
                classroom,
                enrollments,
            }))
        });
    respond("class_detail", result)
}

pub fn show_enroll_form(conn: &mut Connection, class_id: ClassId) -> Response {
    let result = load_class(conn, class_id).and_then(|classroom| {
        enroll_form_view(conn, classroom, EnrollForm::default()).map(Response::Page)
    });
    respond("show_enroll_form", result)
}

/// Enrolls an existing student. Enrolling an already enrolled student is a
/// successful no-op.
pub fn enroll_student(conn: &mut Connection, class_id: ClassId, form: EnrollForm) -> Response {
    let classroom = match load_class(conn, class_id) {
        Ok(classroom) => classroom,
        Err(err) => return error_response("enroll_student", err),
    };
    let student_id = match form.clean() {
        Ok(student_id) => student_id,
        Err(errors) => return invalid_enroll_form(conn, classroom, form, errors),
    };
    match student_service(conn).and_then(|service| service.get_student(student_id)) {
        Ok(_) => {}
        Err(ServiceError::NotFound(_)) => {
            return invalid_enroll_form(conn, classroom, form, EnrollForm::invalid_choice())
        }
        Err(err) => return error_response("enroll_student", err),
    }

    let result = enrollment_service(conn)
        .and_then(|service| service.enroll_existing_student(class_id, student_id));
    match result {
        Ok(_) => Response::Redirect(Route::ClassDetail { class_id }),
        Err(err) => match form_errors(&err) {
            Some(errors) => invalid_enroll_form(conn, classroom, form, errors),
            None => error_response("enroll_student", err),
        },
    }
}

pub fn show_add_student_form(conn: &Connection, class_id: ClassId) -> Response {
    let result = load_class(conn, class_id).map(|classroom| {
        Response::Page(View::AddStudentForm {
            classroom,
            form: StudentForm::default(),
        })
    });
    respond("show_add_student_form", result)
}

/// Creates a new student already enrolled in `class_id`.
pub fn add_student(conn: &mut Connection, class_id: ClassId, form: StudentForm) -> Response {
    let classroom = match load_class(conn, class_id) {
        Ok(classroom) => classroom,
        Err(err) => return error_response("add_student", err),
    };
    let fields = match form.clean() {
        Ok(fields) => fields,
        Err(errors) => return invalid(View::AddStudentForm { classroom, form }, errors),
    };
    let result = student_service(conn)
        .and_then(|mut service| service.create_student_and_enroll(Some(class_id), fields));
    match result {
        Ok(_) => Response::Redirect(Route::ClassDetail { class_id }),
        Err(err) => match form_errors(&err) {
            Some(errors) => invalid(View::AddStudentForm { classroom, form }, errors),
            None => error_response("add_student", err),
        },
    }
}

pub fn show_edit_student_form(
    conn: &mut Connection,
    student_id: StudentId,
    next: Option<String>,
) -> Response {
    let result = student_service(conn)
        .and_then(|service| service.get_student(student_id))
        .map(|student| {
            let form = StudentForm::from_student(&student);
            Response::Page(View::EditStudentForm {
                student,
                form,
                next,
            })
        });
    respond("show_edit_student_form", result)
}

/// Replaces every field of one student, then returns to `next` when it is a
/// local path or to the student directory otherwise.
pub fn edit_student(
    conn: &mut Connection,
    student_id: StudentId,
    form: StudentForm,
    next: Option<String>,
) -> Response {
    let student = match student_service(conn).and_then(|service| service.get_student(student_id))
    {
        Ok(student) => student,
        Err(err) => return error_response("edit_student", err),
    };
    let fields = match form.clean() {
        Ok(fields) => fields,
        Err(errors) => {
            return invalid(
                View::EditStudentForm {
                    student,
                    form,
                    next,
                },
                errors,
            )
        }
    };
    match student_service(conn).and_then(|service| service.edit_student(student_id, fields)) {
        Ok(_) => Response::Redirect(Route::local_or(next.as_deref(), Route::StudentDirectory)),
        Err(err) => match form_errors(&err) {
            Some(errors) => invalid(
                View::EditStudentForm {
                    student,
                    form,
                    next,
                },
                errors,
            ),
            None => error_response("edit_student", err),
        },
    }
}

pub fn student_class_detail(
    conn: &Connection,
    class_id: ClassId,
    student_id: StudentId,
) -> Response {
    let result = enrollment_service(conn)
        .and_then(|service| service.get_student_detail_in_class(class_id, student_id))
        .map(|detail| Response::Page(View::StudentClassDetail { detail }));
    respond("student_class_detail", result)
}

/// Adds a note to an enrollment. Blank content writes nothing and falls
/// through to the redirect.
pub fn add_note(
    conn: &Connection,
    enrollment_id: EnrollmentId,
    form: NoteForm,
    mode: ResponseMode,
) -> Response {
    let enrollment =
        match enrollment_service(conn).and_then(|service| service.get_enrollment(enrollment_id)) {
            Ok(enrollment) => enrollment,
            Err(err) => return error_response("add_note", err),
        };
    let back = Route::StudentClassDetail {
        class_id: enrollment.class_id,
        student_id: enrollment.student_id,
    };

    match note_service(conn).and_then(|service| service.add_note(enrollment_id, &form.content)) {
        Ok(Some(note)) if mode.is_fragment() => Response::Fragment(View::Note { note }),
        Ok(_) => Response::Redirect(back),
        Err(err) => error_response("add_note", err),
    }
}

pub fn show_edit_note_form(conn: &Connection, note_id: NoteId, mode: ResponseMode) -> Response {
    let result = note_service(conn)
        .and_then(|service| service.get_note(note_id))
        .map(|note| {
            let form = NoteForm {
                content: note.content.clone(),
            };
            Response::render(mode, View::NoteEditForm { note, form })
        });
    respond("show_edit_note_form", result)
}

pub fn edit_note(
    conn: &Connection,
    note_id: NoteId,
    form: NoteForm,
    next: Option<String>,
    mode: ResponseMode,
) -> Response {
    let service = match note_service(conn) {
        Ok(service) => service,
        Err(err) => return error_response("edit_note", err),
    };
    let note = match service.get_note(note_id) {
        Ok(note) => note,
        Err(err) => return error_response("edit_note", err),
    };
    match service.edit_note(note_id, &form.content) {
        Ok(note) if mode.is_fragment() => Response::Fragment(View::Note { note }),
        Ok(_) => Response::Redirect(Route::local_or(next.as_deref(), Route::ClassList)),
        Err(err) => match form_errors(&err) {
            Some(errors) => invalid(View::NoteEditForm { note, form }, errors),
            None => error_response("edit_note", err),
        },
    }
}

pub fn delete_note(conn: &Connection, note_id: NoteId) -> Response {
    let result = note_service(conn)
        .and_then(|service| service.delete_note(note_id))
        .map(|()| Response::Empty);
    respond("delete_note", result)
}

pub fn student_directory(conn: &mut Connection) -> Response {
    let result = student_service(conn)
        .and_then(|service| service.list_students_with_enrollments())
        .map(|students| Response::Page(View::StudentDirectory { students }));
    respond("student_directory", result)
}

pub fn global_student_detail(conn: &mut Connection, student_id: StudentId) -> Response {
    let result = student_service(conn)
        .and_then(|service| service.get_student_with_enrollments(student_id))
        .map(|profile| Response::Page(View::GlobalStudentDetail { profile }));
    respond("global_student_detail", result)
}

/// Lazy notes panel of one enrollment; always a fragment.
pub fn load_notes(conn: &Connection, enrollment_id: EnrollmentId) -> Response {
    let result = note_service(conn)
        .and_then(|service| service.list_notes_for_enrollment(enrollment_id))
        .map(|notes| Response::Fragment(View::NoteList { notes }));
    respond("load_notes", result)
}

pub fn show_add_student_global_form() -> Response {
    Response::Fragment(View::AddStudentGlobalForm {
        form: StudentForm::default(),
    })
}

/// Creates a student outside any class. Fragment callers are told to
/// navigate to the directory themselves.
pub fn add_student_global(conn: &mut Connection, form: StudentForm, mode: ResponseMode) -> Response {
    let fields = match form.clean() {
        Ok(fields) => fields,
        Err(errors) => return invalid(View::AddStudentGlobalForm { form }, errors),
    };
    match student_service(conn).and_then(|mut service| service.create_student_global(fields)) {
        Ok(_) if mode.is_fragment() => Response::ClientRedirect(Route::StudentDirectory),
        Ok(_) => Response::Redirect(Route::StudentDirectory),
        Err(err) => match form_errors(&err) {
            Some(errors) => invalid(View::AddStudentGlobalForm { form }, errors),
            None => error_response("add_student_global", err),
        },
    }
}

fn class_service(conn: &Connection) -> ServiceResult<ClassService<SqliteClassRepository<'_>>> {
    Ok(ClassService::new(SqliteClassRepository::try_new(conn)?))
}

fn enrollment_service(
    conn: &Connection,
) -> ServiceResult<EnrollmentService<SqliteEnrollmentRepository<'_>>> {
    Ok(EnrollmentService::new(SqliteEnrollmentRepository::try_new(
        conn,
    )?))
}

fn student_service(
    conn: &mut Connection,
) -> ServiceResult<StudentService<SqliteStudentRepository<'_>>> {
    Ok(StudentService::new(SqliteStudentRepository::try_new(conn)?))
}

fn note_service(conn: &Connection) -> ServiceResult<NoteService<SqliteNoteRepository<'_>>> {
    Ok(NoteService::new(SqliteNoteRepository::try_new(conn)?))
}

fn load_class(conn: &Connection, class_id: ClassId) -> ServiceResult<ClassGroup> {
    class_service(conn)?.get_class(class_id)
}

fn enroll_form_view(
    conn: &mut Connection,
    classroom: ClassGroup,
    form: EnrollForm,
) -> ServiceResult<View> {
    let students = student_service(conn)?.list_students()?;
    Ok(View::EnrollForm {
        classroom,
        students,
        form,
    })
}

fn invalid_enroll_form(
    conn: &mut Connection,
    classroom: ClassGroup,
    form: EnrollForm,
    errors: FormErrors,
) -> Response {
    match enroll_form_view(conn, classroom, form) {
        Ok(view) => invalid(view, errors),
        Err(err) => error_response("enroll_student", err),
    }
}

fn invalid(view: View, errors: FormErrors) -> Response {
    Response::Invalid { view, errors }
}

/// Field errors for failures the caller can fix by editing the form.
fn form_errors(err: &ServiceError) -> Option<FormErrors> {
    match err {
        ServiceError::Validation(err) => Some(FormErrors::from(err)),
        ServiceError::DuplicateName(_) => {
            Some(FormErrors::single("name", MSG_DUPLICATE_CLASS_NAME))
        }
        ServiceError::DuplicateEnrollment { .. } => {
            Some(FormErrors::single("student", MSG_DUPLICATE_ENROLLMENT))
        }
        ServiceError::NotFound(_) | ServiceError::Repo(_) => None,
    }
}

fn respond(operation: &'static str, result: ServiceResult<Response>) -> Response {
    result.unwrap_or_else(|err| error_response(operation, err))
}

fn error_response(operation: &'static str, err: ServiceError) -> Response {
    match err {
        ServiceError::NotFound(entity) => Response::NotFound {
            message: format!("{entity} not found"),
        },
        err if err.is_client_error() => {
            warn!("event=handler module=api status=rejected op={operation} error={err}");
            Response::Failure {
                message: format!("{operation} failed: {err}"),
            }
        }
        err => {
            error!("event=handler module=api status=error op={operation} error={err}");
            Response::Failure {
                message: format!("{operation} failed: {err}"),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rollbook_core::db::open_db_in_memory;

    fn conn() -> Connection {
        open_db_in_memory().expect("open in-memory db")
    }

    fn class_form(name: &str) -> ClassForm {
        ClassForm {
            name: name.to_string(),
            ..ClassForm::default()
        }
    }

    fn student_form(full_name: &str) -> StudentForm {
        StudentForm {
            full_name: full_name.to_string(),
            ..StudentForm::default()
        }
    }

    fn note_form(content: &str) -> NoteForm {
        NoteForm {
            content: content.to_string(),
        }
    }

    fn only_class_id(conn: &Connection) -> ClassId {
        conn.query_row("SELECT id FROM classes", [], |row| row.get(0))
            .expect("one class")
    }

    fn only_enrollment(conn: &Connection) -> (EnrollmentId, StudentId) {
        conn.query_row("SELECT id, student_id FROM enrollments", [], |row| {
            Ok((row.get(0)?, row.get(1)?))
        })
        .expect("one enrollment")
    }

    fn count(conn: &Connection, table: &str) -> i64 {
        conn.query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |row| {
            row.get(0)
        })
        .expect("count rows")
    }

    /// Class "Algebra I" with "Jane Doe" enrolled.
    fn seeded() -> (Connection, ClassId, EnrollmentId, StudentId) {
        let mut conn = conn();
        assert_eq!(
            create_class(&conn, class_form("Algebra I")),
            Response::Redirect(Route::ClassList)
        );
        let class_id = only_class_id(&conn);
        assert_eq!(
            add_student(&mut conn, class_id, student_form("Jane Doe")),
            Response::Redirect(Route::ClassDetail { class_id })
        );
        let (enrollment_id, student_id) = only_enrollment(&conn);
        (conn, class_id, enrollment_id, student_id)
    }

    #[test]
    fn create_class_rejects_duplicate_name_with_field_error() {
        let conn = conn();
        create_class(&conn, class_form("Algebra I"));

        match create_class(&conn, class_form(" Algebra I ")) {
            Response::Invalid { view, errors } => {
                assert_eq!(errors.get("name"), [MSG_DUPLICATE_CLASS_NAME.to_string()]);
                assert!(matches!(view, View::ClassForm { form } if form.name == " Algebra I "));
            }
            other => panic!("expected invalid form, got {other:?}"),
        }
        assert_eq!(count(&conn, "classes"), 1);
    }

    #[test]
    fn create_class_requires_name() {
        let conn = conn();
        let response = create_class(&conn, class_form("   "));
        assert!(
            matches!(&response, Response::Invalid { errors, .. } if !errors.get("name").is_empty())
        );
        assert_eq!(count(&conn, "classes"), 0);
    }

    #[test]
    fn class_detail_lists_roster_and_reports_missing_class() {
        let (conn, class_id, _, _) = seeded();
        match class_detail(&conn, class_id) {
            Response::Page(View::ClassDetail {
                classroom,
                enrollments,
            }) => {
                assert_eq!(classroom.name, "Algebra I");
                assert_eq!(enrollments.len(), 1);
                assert_eq!(enrollments[0].student.full_name, "Jane Doe");
            }
            other => panic!("expected class detail page, got {other:?}"),
        }
        assert!(matches!(
            class_detail(&conn, class_id + 100),
            Response::NotFound { .. }
        ));
    }

    #[test]
    fn enroll_student_validates_choice_and_is_idempotent() {
        let (mut conn, _, _, student_id) = seeded();
        create_class(&conn, class_form("Biology"));
        let biology: ClassId = conn
            .query_row("SELECT id FROM classes WHERE name = 'Biology'", [], |row| {
                row.get(0)
            })
            .expect("biology id");

        let missing = EnrollForm {
            student: (student_id + 50).to_string(),
        };
        match enroll_student(&mut conn, biology, missing) {
            Response::Invalid { view, errors } => {
                assert!(errors.get("student")[0].starts_with("Select a valid choice."));
                assert!(
                    matches!(view, View::EnrollForm { students, .. } if students.len() == 1)
                );
            }
            other => panic!("expected invalid enroll form, got {other:?}"),
        }

        let form = EnrollForm {
            student: student_id.to_string(),
        };
        let expected = Response::Redirect(Route::ClassDetail { class_id: biology });
        assert_eq!(enroll_student(&mut conn, biology, form.clone()), expected);
        assert_eq!(enroll_student(&mut conn, biology, form), expected);
        assert_eq!(count(&conn, "enrollments"), 2);
    }

    #[test]
    fn add_student_to_missing_class_writes_nothing() {
        let mut conn = conn();
        assert!(matches!(
            add_student(&mut conn, 42, student_form("Jane Doe")),
            Response::NotFound { .. }
        ));
        assert_eq!(count(&conn, "students"), 0);
    }

    #[test]
    fn add_note_shape_depends_on_mode() {
        let (conn, class_id, enrollment_id, student_id) = seeded();
        let back = Response::Redirect(Route::StudentClassDetail {
            class_id,
            student_id,
        });

        assert_eq!(
            add_note(&conn, enrollment_id, note_form("   "), ResponseMode::Fragment),
            back
        );
        assert_eq!(count(&conn, "notes"), 0);

        match add_note(
            &conn,
            enrollment_id,
            note_form("Great progress"),
            ResponseMode::Fragment,
        ) {
            Response::Fragment(View::Note { note }) => {
                assert_eq!(note.content, "Great progress");
                assert_eq!(note.short_content(), "Great progress");
                assert_eq!(note.created_at, note.updated_at);
            }
            other => panic!("expected note fragment, got {other:?}"),
        }
        assert_eq!(
            add_note(
                &conn,
                enrollment_id,
                note_form("Second"),
                ResponseMode::FullPage
            ),
            back
        );
        assert_eq!(count(&conn, "notes"), 2);
        assert!(matches!(
            add_note(&conn, enrollment_id + 9, note_form("x"), ResponseMode::FullPage),
            Response::NotFound { .. }
        ));
    }

    #[test]
    fn edit_note_redirects_only_to_local_next() {
        let (conn, _, enrollment_id, _) = seeded();
        add_note(&conn, enrollment_id, note_form("Draft"), ResponseMode::FullPage);
        let note_id: NoteId = conn
            .query_row("SELECT id FROM notes", [], |row| row.get(0))
            .expect("note id");

        assert_eq!(
            edit_note(
                &conn,
                note_id,
                note_form("Final"),
                Some("https://evil.example/".to_string()),
                ResponseMode::FullPage,
            ),
            Response::Redirect(Route::ClassList)
        );
        assert_eq!(
            edit_note(
                &conn,
                note_id,
                note_form("Final again"),
                Some("/students/".to_string()),
                ResponseMode::FullPage,
            ),
            Response::Redirect(Route::Local {
                path: "/students/".to_string()
            })
        );

        match edit_note(&conn, note_id, note_form(""), None, ResponseMode::Fragment) {
            Response::Invalid { view, errors } => {
                assert_eq!(errors.get("content"), ["This field is required.".to_string()]);
                assert!(matches!(view, View::NoteEditForm { note, .. } if note.content == "Final again"));
            }
            other => panic!("expected invalid note form, got {other:?}"),
        }
    }

    #[test]
    fn delete_note_returns_empty_then_not_found() {
        let (conn, _, enrollment_id, _) = seeded();
        add_note(&conn, enrollment_id, note_form("Temp"), ResponseMode::FullPage);
        let note_id: NoteId = conn
            .query_row("SELECT id FROM notes", [], |row| row.get(0))
            .expect("note id");

        assert_eq!(delete_note(&conn, note_id), Response::Empty);
        assert!(matches!(
            delete_note(&conn, note_id),
            Response::NotFound { .. }
        ));
        assert!(matches!(
            load_notes(&conn, enrollment_id),
            Response::Fragment(View::NoteList { notes }) if notes.is_empty()
        ));
    }

    #[test]
    fn edit_student_prefills_and_replaces_fields() {
        let (mut conn, _, _, student_id) = seeded();
        let next = Some("/class/1/".to_string());

        let form = match show_edit_student_form(&mut conn, student_id, next.clone()) {
            Response::Page(View::EditStudentForm { form, .. }) => form,
            other => panic!("expected edit form, got {other:?}"),
        };
        assert_eq!(form.full_name, "Jane Doe");

        let updated = StudentForm {
            email: "jane@school.example".to_string(),
            ..form
        };
        assert_eq!(
            edit_student(&mut conn, student_id, updated, next),
            Response::Redirect(Route::Local {
                path: "/class/1/".to_string()
            })
        );
        let email: Option<String> = conn
            .query_row("SELECT email FROM students", [], |row| row.get(0))
            .expect("student email");
        assert_eq!(email.as_deref(), Some("jane@school.example"));

        let bad_age = StudentForm {
            age: "old".to_string(),
            ..student_form("Jane Doe")
        };
        assert!(matches!(
            edit_student(&mut conn, student_id, bad_age, None),
            Response::Invalid { errors, .. } if errors.get("age") == ["Enter a whole number.".to_string()]
        ));
    }

    #[test]
    fn duplicate_enrollment_maps_to_student_field_error() {
        let err = ServiceError::DuplicateEnrollment {
            class_id: 1,
            student_id: 2,
        };
        let errors = form_errors(&err).expect("field error");
        assert_eq!(errors.get("student"), [MSG_DUPLICATE_ENROLLMENT.to_string()]);
        let missing = ServiceError::NotFound(rollbook_core::EntityRef::Class(1));
        assert!(form_errors(&missing).is_none());
    }

    #[test]
    fn add_student_global_redirects_per_mode() {
        let mut conn = conn();
        assert_eq!(
            add_student_global(&mut conn, student_form("Bob"), ResponseMode::Fragment),
            Response::ClientRedirect(Route::StudentDirectory)
        );
        assert_eq!(
            add_student_global(&mut conn, student_form("Amy"), ResponseMode::FullPage),
            Response::Redirect(Route::StudentDirectory)
        );

        match student_directory(&mut conn) {
            Response::Page(View::StudentDirectory { students }) => {
                let names: Vec<&str> = students
                    .iter()
                    .map(|entry| entry.student.full_name.as_str())
                    .collect();
                assert_eq!(names, vec!["Amy", "Bob"]);
                assert!(students.iter().all(|entry| entry.enrollments.is_empty()));
            }
            other => panic!("expected directory page, got {other:?}"),
        }
    }
}
