//! Authentication DTOs.
//!
//! Re-exported from the `slateboard-models` crate; the wire types are
//! shared with the CLI and the test suite.

pub use slateboard_models::auth::*;
