//! Application configuration, loaded from environment variables.
//!
//! - [`cors`]: allowed origins for the CORS layer
//! - [`database`]: PostgreSQL connection pool initialization
//! - [`jwt`]: token secret and expiries
//! - [`rate_limit`]: request-rate configs for the governor layer

pub mod cors;
pub mod database;
pub mod jwt;
pub mod rate_limit;
