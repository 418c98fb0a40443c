//! Response envelope returned by every roster handler.
//!
//! # Responsibility
//! - Describe what the caller should render or where it should navigate.
//! - Stay transport-agnostic: no HTML, no HTTP types.
//!
//! # Invariants
//! - Redirect targets are always local absolute paths.
//! - `Fragment` views are the partial rendition used for in-place updates.

use crate::forms::{ClassForm, EnrollForm, FormErrors, NoteForm, StudentForm};
use rollbook_core::{
    ClassEnrollment, ClassGroup, ClassId, Note, Student, StudentClassDetail, StudentId,
    StudentWithEnrollments,
};
use serde::{Deserialize, Serialize};

/// Whether the caller asked for a full page or an in-place fragment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseMode {
    #[default]
    FullPage,
    Fragment,
}

impl ResponseMode {
    pub fn from_partial_flag(is_partial: bool) -> Self {
        if is_partial {
            Self::Fragment
        } else {
            Self::FullPage
        }
    }

    pub fn is_fragment(self) -> bool {
        self == Self::Fragment
    }
}

/// Navigation target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "route", rename_all = "snake_case")]
pub enum Route {
    ClassList,
    ClassDetail {
        class_id: ClassId,
    },
    StudentClassDetail {
        class_id: ClassId,
        student_id: StudentId,
    },
    StudentDirectory,
    GlobalStudentDetail {
        student_id: StudentId,
    },
    /// Caller-supplied `next` target, already checked by [`Route::local`].
    Local {
        path: String,
    },
}

impl Route {
    /// Accepts `next` only when it is a path on this site.
    ///
    /// Rejects blank values, scheme-relative `//host` targets, absolute URLs
    /// and backslash tricks.
    pub fn local(next: &str) -> Option<Self> {
        let path = next.trim();
        let is_local = path.starts_with('/')
            && !path.starts_with("//")
            && !path.contains('\\')
            && !path.chars().any(char::is_control);
        is_local.then(|| Self::Local {
            path: path.to_string(),
        })
    }

    /// `next` when it is local, otherwise `fallback`.
    pub fn local_or(next: Option<&str>, fallback: Self) -> Self {
        next.and_then(Self::local).unwrap_or(fallback)
    }

    pub fn path(&self) -> String {
        match self {
            Self::ClassList => "/".to_string(),
            Self::ClassDetail { class_id } => format!("/class/{class_id}/"),
            Self::StudentClassDetail {
                class_id,
                student_id,
            } => format!("/class/{class_id}/student/{student_id}/"),
            Self::StudentDirectory => "/students/".to_string(),
            Self::GlobalStudentDetail { student_id } => format!("/student/{student_id}/"),
            Self::Local { path } => path.clone(),
        }
    }
}

/// Data for one rendered page or fragment.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "view", rename_all = "snake_case")]
pub enum View {
    ClassList {
        classes: Vec<ClassGroup>,
    },
    ClassForm {
        form: ClassForm,
    },
    ClassDetail {
        classroom: ClassGroup,
        enrollments: Vec<ClassEnrollment>,
    },
    EnrollForm {
        classroom: ClassGroup,
        /// Choices offered by the student picker.
        students: Vec<Student>,
        form: EnrollForm,
    },
    AddStudentForm {
        classroom: ClassGroup,
        form: StudentForm,
    },
    EditStudentForm {
        student: Student,
        form: StudentForm,
        next: Option<String>,
    },
    StudentClassDetail {
        detail: StudentClassDetail,
    },
    Note {
        note: Note,
    },
    NoteEditForm {
        note: Note,
        form: NoteForm,
    },
    NoteList {
        notes: Vec<Note>,
    },
    StudentDirectory {
        students: Vec<StudentWithEnrollments>,
    },
    GlobalStudentDetail {
        profile: StudentWithEnrollments,
    },
    AddStudentGlobalForm {
        form: StudentForm,
    },
}

/// Outcome of one handled request.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "body", rename_all = "snake_case")]
pub enum Response {
    Page(View),
    Fragment(View),
    Redirect(Route),
    /// Fragment-mode instruction for the client to navigate itself.
    ClientRedirect(Route),
    /// Form re-rendered with field errors.
    Invalid { view: View, errors: FormErrors },
    /// Success with nothing to render.
    Empty,
    NotFound { message: String },
    Failure { message: String },
}

impl Response {
    /// Renders `view` as a page or a fragment depending on `mode`.
    pub fn render(mode: ResponseMode, view: View) -> Self {
        match mode {
            ResponseMode::FullPage => Self::Page(view),
            ResponseMode::Fragment => Self::Fragment(view),
        }
    }

    /// HTTP-equivalent status for transports that need one.
    pub fn status_code(&self) -> u16 {
        match self {
            Self::Page(_) | Self::Fragment(_) | Self::ClientRedirect(_) | Self::Empty => 200,
            Self::Invalid { .. } => 200,
            Self::Redirect(_) => 302,
            Self::NotFound { .. } => 404,
            Self::Failure { .. } => 500,
        }
    }

    /// Short label used in dispatch logs.
    pub fn status_label(&self) -> &'static str {
        match self {
            Self::Page(_) | Self::Fragment(_) | Self::Empty => "ok",
            Self::Redirect(_) | Self::ClientRedirect(_) => "redirect",
            Self::Invalid { .. } => "invalid",
            Self::NotFound { .. } => "not_found",
            Self::Failure { .. } => "error",
        }
    }
}
