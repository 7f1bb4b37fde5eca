//! Domain layer for Pearl Notes
//!
//! Contains the NCDC syllabus catalog, note and quiz entities, value objects
//! and domain errors. This layer performs no I/O and defines the ubiquitous
//! language shared by every other crate.

pub mod catalog;
pub mod entities;
pub mod errors;
pub mod value_objects;

pub use catalog::{APP_NAME, Subject, Topic};
pub use entities::*;
pub use errors::DomainError;
pub use value_objects::*;
