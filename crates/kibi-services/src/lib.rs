//! Kibi Services Layer
//!
//! This crate provides the service layer that sits between a front-end and
//! the search backend. Services orchestrate the index pattern workflow and
//! expose plain state for a front-end to render.
//!
//! # Architecture
//!
//! ```text
//! Front-end (kibi-cli, or any UI)
//!     ↓
//! Service Layer (kibi-services) ← This crate
//!     ↓
//! Domain Layer (kibi-patterns, kibi-settings)
//!     ↓
//! Infrastructure Layer (kibi-core, kibi-elasticsearch)
//! ```
//!
//! # Services
//!
//! - [`IndexPatternMapper`] - Backend access with a field cache in front
//! - [`IndexPatternWizard`] - The index pattern creation draft and its
//!   reconciliation with the backend
//!
//! # Design Principles
//!
//! 1. **No UI dependencies** - The wizard never renders anything
//! 2. **Explicit asynchrony** - Backend work is handed out as requests and
//!    folded back in by generation, so stale answers are easy to drop
//! 3. **Injected collaborators** - Backend, notifier and clock are passed in

mod error;
mod field_cache;
mod mapper;
pub mod messages;
pub mod wizard;

pub use error::{ServiceError, ServiceResult};
pub use field_cache::FieldCache;
pub use mapper::IndexPatternMapper;
pub use wizard::{
    CreateOutcome, DerivedState, Draft, ExistingReport, FieldOrigin, FieldOutcome, FieldRequest,
    FieldResult, IndexPatternWizard, Reaction, SampleOutcome, SampleRequest, SampleResult,
};
