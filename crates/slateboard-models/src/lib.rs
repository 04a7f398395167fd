//! Domain models and DTOs for the Slateboard API.
//!
//! One module per resource. Each module carries the database row structs,
//! the request/response DTOs and, where the resource has them, the
//! enumerated column types backed by Postgres enums.

pub mod assignments;
pub mod attendance;
pub mod auth;
pub mod classes;
pub mod grades;
pub mod students;
pub mod subjects;
pub mod teachers;
pub mod users;
