//! Kibi Patterns - Date templates for time-partitioned index names
//!
//! This crate provides:
//! - Parsing of moment-style name templates such as `[logstash-]YYYY.MM.DD`
//! - Formatting, wildcard derivation and matching of index names
//! - The default template for each interval
//! - Generation of sample index lists around a point in time
//! - Index name validation

mod defaults;
mod error;
mod index_list;
pub mod template;
mod validate;

pub use defaults::{DEFAULT_PLACEHOLDER, is_pattern_default, pattern_default};
pub use error::{PatternError, PatternResult};
pub use index_list::to_index_list;
pub use template::{IntervalTemplate, Segment, Token};
pub use validate::{ILLEGAL_INDEX_CHARACTERS, validate_index_name};

// Re-export the interval type callers combine with templates
pub use kibi_core::Interval;
