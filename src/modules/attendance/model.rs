//! Attendance data models and DTOs.
//!
//! Re-exported from the `slateboard-models` crate.

pub use slateboard_models::attendance::*;
