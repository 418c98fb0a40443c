//! Request routing: every capability as one `Request` variant.

use crate::forms::{ClassForm, EnrollForm, NoteForm, StudentForm};
use crate::handlers;
use crate::response::{Response, ResponseMode};
use log::info;
use rollbook_core::{ClassId, EnrollmentId, NoteId, StudentId};
use rusqlite::Connection;
use serde::Deserialize;
use std::time::Instant;

/// One roster request with its path parameters and submitted form.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Request {
    ListClasses,
    ShowCreateClassForm,
    CreateClass {
        form: ClassForm,
    },
    ClassDetail {
        class_id: ClassId,
    },
    ShowEnrollForm {
        class_id: ClassId,
    },
    EnrollStudent {
        class_id: ClassId,
        form: EnrollForm,
    },
    ShowAddStudentForm {
        class_id: ClassId,
    },
    AddStudent {
        class_id: ClassId,
        form: StudentForm,
    },
    ShowEditStudentForm {
        student_id: StudentId,
        #[serde(default)]
        next: Option<String>,
    },
    EditStudent {
        student_id: StudentId,
        form: StudentForm,
        #[serde(default)]
        next: Option<String>,
    },
    StudentClassDetail {
        class_id: ClassId,
        student_id: StudentId,
    },
    AddNote {
        enrollment_id: EnrollmentId,
        form: NoteForm,
    },
    ShowEditNoteForm {
        note_id: NoteId,
    },
    EditNote {
        note_id: NoteId,
        form: NoteForm,
        #[serde(default)]
        next: Option<String>,
    },
    DeleteNote {
        note_id: NoteId,
    },
    StudentDirectory,
    GlobalStudentDetail {
        student_id: StudentId,
    },
    LoadNotes {
        enrollment_id: EnrollmentId,
    },
    ShowAddStudentGlobalForm,
    AddStudentGlobal {
        form: StudentForm,
    },
}

impl Request {
    /// Stable operation name used in logs.
    pub fn operation(&self) -> &'static str {
        match self {
            Self::ListClasses => "list_classes",
            Self::ShowCreateClassForm => "show_create_class_form",
            Self::CreateClass { .. } => "create_class",
            Self::ClassDetail { .. } => "class_detail",
            Self::ShowEnrollForm { .. } => "show_enroll_form",
            Self::EnrollStudent { .. } => "enroll_student",
            Self::ShowAddStudentForm { .. } => "show_add_student_form",
            Self::AddStudent { .. } => "add_student",
            Self::ShowEditStudentForm { .. } => "show_edit_student_form",
            Self::EditStudent { .. } => "edit_student",
            Self::StudentClassDetail { .. } => "student_class_detail",
            Self::AddNote { .. } => "add_note",
            Self::ShowEditNoteForm { .. } => "show_edit_note_form",
            Self::EditNote { .. } => "edit_note",
            Self::DeleteNote { .. } => "delete_note",
            Self::StudentDirectory => "student_directory",
            Self::GlobalStudentDetail { .. } => "global_student_detail",
            Self::LoadNotes { .. } => "load_notes",
            Self::ShowAddStudentGlobalForm => "show_add_student_global_form",
            Self::AddStudentGlobal { .. } => "add_student_global",
        }
    }
}

/// Routes one request to its handler on `conn`.
pub fn dispatch(conn: &mut Connection, request: Request, mode: ResponseMode) -> Response {
    let operation = request.operation();
    let started_at = Instant::now();

    let response = match request {
        Request::ListClasses => handlers::list_classes(conn),
        Request::ShowCreateClassForm => handlers::show_create_class_form(),
        Request::CreateClass { form } => handlers::create_class(conn, form),
        Request::ClassDetail { class_id } => handlers::class_detail(conn, class_id),
        Request::ShowEnrollForm { class_id } => handlers::show_enroll_form(conn, class_id),
        Request::EnrollStudent { class_id, form } => {
            handlers::enroll_student(conn, class_id, form)
        }
        Request::ShowAddStudentForm { class_id } => {
            handlers::show_add_student_form(conn, class_id)
        }
        Request::AddStudent { class_id, form } => handlers::add_student(conn, class_id, form),
        Request::ShowEditStudentForm { student_id, next } => {
            handlers::show_edit_student_form(conn, student_id, next)
        }
        Request::EditStudent {
            student_id,
            form,
            next,
        } => handlers::edit_student(conn, student_id, form, next),
        Request::StudentClassDetail {
            class_id,
            student_id,
        } => handlers::student_class_detail(conn, class_id, student_id),
        Request::AddNote {
            enrollment_id,
            form,
        } => handlers::add_note(conn, enrollment_id, form, mode),
        Request::ShowEditNoteForm { note_id } => {
            handlers::show_edit_note_form(conn, note_id, mode)
        }
        Request::EditNote {
            note_id,
            form,
            next,
        } => handlers::edit_note(conn, note_id, form, next, mode),
        Request::DeleteNote { note_id } => handlers::delete_note(conn, note_id),
        Request::StudentDirectory => handlers::student_directory(conn),
        Request::GlobalStudentDetail { student_id } => {
            handlers::global_student_detail(conn, student_id)
        }
        Request::LoadNotes { enrollment_id } => handlers::load_notes(conn, enrollment_id),
        Request::ShowAddStudentGlobalForm => handlers::show_add_student_global_form(),
        Request::AddStudentGlobal { form } => handlers::add_student_global(conn, form, mode),
    };

    info!(
        "event=request module=api op={} status={} mode={:?} duration_ms={}",
        operation,
        response.status_label(),
        mode,
        started_at.elapsed().as_millis()
    );
    response
}
