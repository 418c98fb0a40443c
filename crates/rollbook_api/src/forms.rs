//! Submitted form payloads and their boundary validation.
//!
//! # Responsibility
//! - Accept raw key/value input exactly as submitted (all text).
//! - Convert it into typed core inputs or field-level `FormErrors`.
//!
//! # Invariants
//! - `clean()` reports every failing field, not just the first one.
//! - Cleaned values are trimmed; blank optional values become `None`.

use chrono::NaiveDate;
use rollbook_core::model::validation::{
    check_email, normalize_optional, normalize_required, CLASS_NAME_MAX_CHARS,
    CLASS_SUBJECT_MAX_CHARS, STUDENT_NAME_MAX_CHARS, STUDENT_PHONE_MAX_CHARS,
};
use rollbook_core::{NewClassGroup, Student, StudentFields, StudentId, ValidationError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

const DATE_FORMAT: &str = "%Y-%m-%d";
const MSG_WHOLE_NUMBER: &str = "Enter a whole number.";
const MSG_NON_NEGATIVE: &str = "Ensure this value is greater than or equal to 0.";
const MSG_VALID_DATE: &str = "Enter a valid date.";
const MSG_INVALID_CHOICE: &str =
    "Select a valid choice. That choice is not one of the available choices.";

/// Field-level validation messages keyed by input name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FormErrors {
    fields: BTreeMap<&'static str, Vec<String>>,
}

impl FormErrors {
    pub fn single(field: &'static str, message: impl Into<String>) -> Self {
        let mut errors = Self::default();
        errors.add(field, message);
        errors
    }

    pub fn add(&mut self, field: &'static str, message: impl Into<String>) {
        self.fields.entry(field).or_default().push(message.into());
    }

    /// Records a failed rule and passes a successful value through.
    pub fn capture<T>(&mut self, result: Result<T, ValidationError>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(err) => {
                self.add(err.field(), err.message());
                None
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Messages for one field; empty when the field is valid.
    pub fn get(&self, field: &str) -> &[String] {
        self.fields.get(field).map_or(&[], Vec::as_slice)
    }

    pub fn fields(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.fields.keys().copied()
    }
}

impl From<&ValidationError> for FormErrors {
    fn from(value: &ValidationError) -> Self {
        Self::single(value.field(), value.message())
    }
}

/// Create-class form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassForm {
    pub name: String,
    pub subject: String,
    pub description: String,
}

impl ClassForm {
    pub fn clean(&self) -> Result<NewClassGroup, FormErrors> {
        let mut errors = FormErrors::default();
        let name = errors.capture(normalize_required(
            "name",
            &self.name,
            Some(CLASS_NAME_MAX_CHARS),
        ));
        let subject = errors.capture(normalize_optional(
            "subject",
            Some(&self.subject),
            Some(CLASS_SUBJECT_MAX_CHARS),
        ));
        let description = errors.capture(normalize_optional(
            "description",
            Some(&self.description),
            None,
        ));

        match (name, subject, description) {
            (Some(name), Some(subject), Some(description)) if errors.is_empty() => {
                Ok(NewClassGroup {
                    name,
                    subject,
                    description,
                })
            }
            _ => Err(errors),
        }
    }
}

/// Enroll-existing-student form. `student` carries the chosen student id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnrollForm {
    pub student: String,
}

impl EnrollForm {
    pub fn clean(&self) -> Result<StudentId, FormErrors> {
        let raw = self.student.trim();
        if raw.is_empty() {
            return Err(FormErrors::single(
                "student",
                ValidationError::Required { field: "student" }.message(),
            ));
        }
        raw.parse::<StudentId>()
            .map_err(|_| FormErrors::single("student", MSG_INVALID_CHOICE))
    }

    /// Error reported when the chosen id does not match any student.
    pub fn invalid_choice() -> FormErrors {
        FormErrors::single("student", MSG_INVALID_CHOICE)
    }
}

/// Student create/edit form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StudentForm {
    pub full_name: String,
    pub email: String,
    pub age: String,
    pub address: String,
    pub phone: String,
    pub birth_date: String,
}

impl StudentForm {
    /// Prefills the form from stored values.
    pub fn from_student(student: &Student) -> Self {
        Self {
            full_name: student.full_name.clone(),
            email: student.email.clone().unwrap_or_default(),
            age: student.age.map(|age| age.to_string()).unwrap_or_default(),
            address: student.address.clone().unwrap_or_default(),
            phone: student.phone.clone().unwrap_or_default(),
            birth_date: student
                .birth_date
                .map(|date| date.format(DATE_FORMAT).to_string())
                .unwrap_or_default(),
        }
    }

    pub fn clean(&self) -> Result<StudentFields, FormErrors> {
        let mut errors = FormErrors::default();
        let full_name = errors.capture(normalize_required(
            "full_name",
            &self.full_name,
            Some(STUDENT_NAME_MAX_CHARS),
        ));
        let email = errors
            .capture(normalize_optional("email", Some(&self.email), None))
            .and_then(|email| match email {
                Some(value) => errors.capture(check_email("email", &value)).map(|()| Some(value)),
                None => Some(None),
            });
        let phone = errors.capture(normalize_optional(
            "phone",
            Some(&self.phone),
            Some(STUDENT_PHONE_MAX_CHARS),
        ));
        let address = errors.capture(normalize_optional("address", Some(&self.address), None));
        let age = parse_age(&self.age).map_err(|message| errors.add("age", message)).ok();
        let birth_date = parse_birth_date(&self.birth_date)
            .map_err(|message| errors.add("birth_date", message))
            .ok();

        match (full_name, email, phone, address, age, birth_date) {
            (Some(full_name), Some(email), Some(phone), Some(address), Some(age), Some(birth_date))
                if errors.is_empty() =>
            {
                Ok(StudentFields {
                    full_name,
                    email,
                    phone,
                    age,
                    birth_date,
                    address,
                })
            }
            _ => Err(errors),
        }
    }
}

/// Add/edit note form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NoteForm {
    pub content: String,
}

fn parse_age(raw: &str) -> Result<Option<u32>, &'static str> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }
    let value: i64 = raw.parse().map_err(|_| MSG_WHOLE_NUMBER)?;
    if value < 0 {
        return Err(MSG_NON_NEGATIVE);
    }
    u32::try_from(value).map(Some).map_err(|_| MSG_WHOLE_NUMBER)
}

fn parse_birth_date(raw: &str) -> Result<Option<NaiveDate>, &'static str> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }
    NaiveDate::parse_from_str(raw, DATE_FORMAT)
        .map(Some)
        .map_err(|_| MSG_VALID_DATE)
}

#[cfg(test)]
mod tests {
    use super::{ClassForm, EnrollForm, StudentForm};
    use chrono::NaiveDate;

    #[test]
    fn class_form_trims_and_drops_blank_optionals() {
        let form = ClassForm {
            name: "  Algebra I ".to_string(),
            subject: "   ".to_string(),
            description: "Intro course".to_string(),
        };
        let cleaned = form.clean().expect("valid class form");
        assert_eq!(cleaned.name, "Algebra I");
        assert_eq!(cleaned.subject, None);
        assert_eq!(cleaned.description.as_deref(), Some("Intro course"));
    }

    #[test]
    fn class_form_reports_every_failing_field() {
        let form = ClassForm {
            name: String::new(),
            subject: "s".repeat(101),
            description: String::new(),
        };
        let errors = form.clean().expect_err("invalid class form");
        assert_eq!(errors.get("name"), ["This field is required.".to_string()]);
        assert_eq!(errors.get("subject").len(), 1);
        assert!(errors.get("description").is_empty());
    }

    #[test]
    fn student_form_parses_typed_fields() {
        let form = StudentForm {
            full_name: "Jane Doe".to_string(),
            email: " jane@school.example ".to_string(),
            age: "15".to_string(),
            birth_date: "2010-04-02".to_string(),
            ..StudentForm::default()
        };
        let fields = form.clean().expect("valid student form");
        assert_eq!(fields.email.as_deref(), Some("jane@school.example"));
        assert_eq!(fields.age, Some(15));
        assert_eq!(fields.birth_date, NaiveDate::from_ymd_opt(2010, 4, 2));
        assert_eq!(fields.phone, None);
    }

    #[test]
    fn student_form_collects_type_errors() {
        let form = StudentForm {
            full_name: "Jane".to_string(),
            email: "nope".to_string(),
            age: "-3".to_string(),
            birth_date: "02/04/2010".to_string(),
            phone: "0".repeat(25),
            ..StudentForm::default()
        };
        let errors = form.clean().expect_err("invalid student form");
        let fields: Vec<&str> = errors.fields().collect();
        assert_eq!(fields, vec!["age", "birth_date", "email", "phone"]);
        assert_eq!(
            errors.get("age"),
            ["Ensure this value is greater than or equal to 0.".to_string()]
        );
        assert_eq!(errors.get("birth_date"), ["Enter a valid date.".to_string()]);

        let not_a_number = StudentForm {
            full_name: "Jane".to_string(),
            age: "twelve".to_string(),
            ..StudentForm::default()
        };
        assert_eq!(
            not_a_number.clean().expect_err("bad age").get("age"),
            ["Enter a whole number.".to_string()]
        );
    }

    #[test]
    fn student_form_roundtrips_through_prefill() {
        let form = StudentForm {
            full_name: "Jane Doe".to_string(),
            age: "15".to_string(),
            birth_date: "2010-04-02".to_string(),
            address: "12 Elm Street".to_string(),
            ..StudentForm::default()
        };
        let fields = form.clean().expect("valid student form");
        let student = rollbook_core::Student {
            id: 1,
            full_name: fields.full_name,
            email: fields.email,
            phone: fields.phone,
            age: fields.age,
            birth_date: fields.birth_date,
            address: fields.address,
            created_at: 0,
        };
        assert_eq!(StudentForm::from_student(&student), form);
    }

    #[test]
    fn enroll_form_requires_numeric_choice() {
        assert_eq!(
            EnrollForm {
                student: " 7 ".to_string()
            }
            .clean(),
            Ok(7)
        );
        let missing = EnrollForm::default().clean().expect_err("blank choice");
        assert_eq!(missing.get("student"), ["This field is required.".to_string()]);
        let garbage = EnrollForm {
            student: "seven".to_string(),
        }
        .clean()
        .expect_err("non-numeric choice");
        assert!(garbage.get("student")[0].starts_with("Select a valid choice."));
    }
}
