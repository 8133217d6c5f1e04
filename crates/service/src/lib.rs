//! Service layer for kotoba
//!
//! List controllers for each content kind and the [`StudyApp`] that wires
//! gateway, caches, generators and speech together from configuration.

#![allow(clippy::missing_errors_doc, reason = "Errors are self-explanatory from Result types")]
#![allow(clippy::implicit_return, reason = "Implicit return is idiomatic Rust")]
#![allow(clippy::question_mark_used, reason = "? operator is idiomatic Rust")]
#![allow(clippy::min_ident_chars, reason = "Short error vars are idiomatic")]

mod app;
#[cfg(test)]
mod app_tests;
mod error;
#[cfg(test)]
mod fake_gateway;
mod list_controller;

pub use app::StudyApp;
pub use error::ServiceError;
pub use list_controller::{ListController, ListView};
