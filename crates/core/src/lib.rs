//! Domain layer for the Casa de Apoio administrative front-end.
//!
//! Holds entity types, pagination arithmetic, the presence board used by
//! the attendance roster screens, class enrollment diffing, the student
//! registration wizard state machine and form validation. This crate does
//! no I/O so it can be shared by the HTTP client and any UI shell.

pub mod attendance;
pub mod class;
pub mod enrollment;
pub mod error;
pub mod pagination;
pub mod roster;
pub mod sorting;
pub mod student;
pub mod types;
pub mod user;
pub mod validation;
pub mod wizard;
