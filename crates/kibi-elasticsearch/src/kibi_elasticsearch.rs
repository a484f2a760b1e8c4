//! Elasticsearch backend for Kibi index patterns
//!
//! Resolves patterns against the cluster's alias and mapping APIs and stores
//! index patterns as documents in the saved-objects index.

mod backend;
#[cfg(test)]
mod backend_tests;
mod response;

pub use backend::*;
pub use response::{classify_error, flatten_mappings, index_names, to_field_type};
