// Re-export the shared pagination types so controllers keep a single
// import path.
pub use slateboard_core::pagination::{ListParams, PaginationMeta, order_clause};
