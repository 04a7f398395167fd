//! Shared building blocks for the Slateboard API.
//!
//! This crate holds the pieces that every feature module leans on:
//! pagination and list-query parameters, ordering whitelists, and
//! serde helpers for lenient query-string deserialization.

pub mod pagination;
pub mod serde;
