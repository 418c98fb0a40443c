//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls into the roster's domain operations.
//! - Normalize and validate inputs once before persistence.
//! - Translate repository failures into the use-case error taxonomy.

pub mod class_service;
pub mod enrollment_service;
pub mod error;
pub mod note_service;
pub mod student_service;
