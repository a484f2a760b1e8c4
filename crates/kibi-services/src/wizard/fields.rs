//! Field discovery for the draft pattern

use kibi_core::{BackendError, FieldFetchOptions, FieldSpec, PatternQuery};

use crate::{IndexPatternMapper, messages};

/// Why a field fetch was issued
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldOrigin {
    /// Explicit refresh, or a change of `is_time_based` / `sample_count`
    Refresh,
    /// Follow-up of the sample recompute with this generation
    Samples(u64),
}

#[derive(Debug, Clone)]
pub(crate) enum FieldPlan {
    NotReady(&'static str),
    Fetch(PatternQuery),
}

/// A field fetch issued for one draft version
#[derive(Debug, Clone)]
pub struct FieldRequest {
    pub(crate) generation: u64,
    pub(crate) origin: FieldOrigin,
    pub(crate) plan: FieldPlan,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldResult {
    /// Name or interval missing; the backend was not asked
    NotReady(String),
    Fields(Vec<FieldSpec>),
    /// Missing indices or access denied, with the message to show inline
    Unavailable(String),
    Fatal(String),
}

#[derive(Debug, Clone)]
pub struct FieldOutcome {
    pub(crate) generation: u64,
    pub(crate) origin: FieldOrigin,
    pub result: FieldResult,
}

impl FieldOutcome {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn origin(&self) -> FieldOrigin {
        self.origin
    }
}

impl FieldRequest {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn origin(&self) -> FieldOrigin {
        self.origin
    }

    /// Whether executing this request will contact the backend
    pub fn is_ready(&self) -> bool {
        matches!(self.plan, FieldPlan::Fetch(_))
    }

    pub async fn execute(&self, mapper: &IndexPatternMapper) -> FieldOutcome {
        let result = match &self.plan {
            FieldPlan::NotReady(reason) => FieldResult::NotReady(reason.to_string()),
            FieldPlan::Fetch(query) => {
                mapper.clear_cache(&query.id);
                match mapper
                    .get_fields_for_pattern(query, FieldFetchOptions::force_refresh())
                    .await
                {
                    Ok(fields) => FieldResult::Fields(fields),
                    Err(BackendError::MissingIndices(_)) => {
                        FieldResult::Unavailable(messages::NO_INDICES_FOR_MAPPING.to_string())
                    }
                    Err(BackendError::Authorization(_)) => {
                        FieldResult::Unavailable(messages::MAPPING_ACCESS_DENIED.to_string())
                    }
                    Err(e) => FieldResult::Fatal(e.to_string()),
                }
            }
        };
        FieldOutcome {
            generation: self.generation,
            origin: self.origin,
            result,
        }
    }
}
