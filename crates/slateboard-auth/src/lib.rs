//! JWT claims and token helpers for the Slateboard API.
//!
//! Token issuance and verification live here so both the HTTP layer and
//! the CLI can mint tokens without pulling in the whole application.

pub mod claims;
pub mod jwt;

pub use claims::{Claims, RefreshClaims, REFRESH_TOKEN_TYPE};
