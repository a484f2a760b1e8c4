//! Kibi Core - Shared abstractions for the index pattern tooling
//!
//! This crate provides the types and traits every other Kibi crate
//! depends on:
//!
//! - `IndexPatternBackend` - Trait for the search backend the wizard talks to
//! - `Notifier` - Sink for user-facing notifications (info, warning, fatal)
//! - `Clock` - Source of "now" for sample generation
//! - `Interval` - Time partition granularity of date-based index names
//! - Common types like `FieldSpec`, `IndexMatches`, `PatternQuery`, etc.

mod backend;
mod clock;
mod error;
mod interval;
mod notify;
mod types;

pub use backend::*;
pub use clock::*;
pub use error::*;
pub use interval::*;
pub use notify::*;
pub use types::*;
