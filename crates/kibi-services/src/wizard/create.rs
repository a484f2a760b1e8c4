//! Persisting the draft as an index pattern

use kibi_core::{BackendError, IndexPatternSpec};
use kibi_patterns::validate_index_name;

use super::IndexPatternWizard;
use crate::{ServiceError, ServiceResult, messages};

/// Route of the pattern management page for a created pattern
const INDEX_PATTERN_ROUTE: &str = "/management/siren/indices";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CreateOutcome {
    /// Saved; `redirect` is the management page for the new pattern
    Created { id: String, redirect: String },
    /// The backend already holds a pattern with this id
    Declined,
    /// The backend refused for a reason already reported to the notifier
    Rejected,
}

impl IndexPatternWizard {
    /// Reasons the draft cannot be saved yet, empty when it can
    pub fn creation_blockers(&self) -> Vec<String> {
        let mut blockers = Vec::new();

        if let Err(e) = validate_index_name(&self.draft.name, true) {
            blockers.push(e.to_string());
        }
        blockers.extend(self.derived.pattern_errors.iter().cloned());
        if self.draft.is_time_based && self.draft.time_field.is_none() {
            blockers.push(messages::TIME_FIELD_REQUIRED.to_string());
        }
        if !self.samples_settled {
            blockers.push(messages::STILL_CHECKING.to_string());
        }

        blockers
    }

    pub fn can_create(&self) -> bool {
        self.creation_blockers().is_empty()
    }

    /// The entity `create_index_pattern` would persist
    pub fn pattern_spec(&self) -> IndexPatternSpec {
        let draft = &self.draft;
        let mut spec = IndexPatternSpec::named(draft.name.clone());
        if draft.is_time_based {
            spec.time_field_name = draft.time_field_name().map(str::to_string);
        }
        if draft.name_is_pattern {
            spec.interval_name = draft.name_interval.map(|i| i.name().to_string());
        }
        spec.not_expandable = !draft.expandable && draft.can_expand_indices();
        spec
    }

    pub async fn create_index_pattern(&mut self) -> ServiceResult<CreateOutcome> {
        let blockers = self.creation_blockers();
        if !blockers.is_empty() {
            return Err(ServiceError::CreationBlocked(blockers));
        }

        let spec = self.pattern_spec();
        match self.mapper.create_index_pattern(&spec).await {
            Ok(Some(id)) => {
                if let Err(e) = self.mapper.refresh_saved_objects().await {
                    tracing::warn!(id = %id, "saved objects refresh failed: {}", e);
                }
                self.mapper.clear_cache(&id);
                tracing::info!(id = %id, time_field = ?spec.time_field_name, "index pattern created");
                let redirect = format!("{}/{}", INDEX_PATTERN_ROUTE, id);
                Ok(CreateOutcome::Created { id, redirect })
            }
            Ok(None) => {
                tracing::debug!(id = %spec.id, "index pattern already exists");
                Ok(CreateOutcome::Declined)
            }
            Err(BackendError::MissingIndices(detail)) => {
                tracing::warn!(id = %spec.id, "no indices for new pattern: {}", detail);
                self.notifier.error(messages::NO_INDICES_MATCH);
                Ok(CreateOutcome::Rejected)
            }
            Err(BackendError::Authorization(detail)) => {
                tracing::warn!(id = %spec.id, "pattern creation denied: {}", detail);
                self.notifier.warning(messages::INDICES_ACCESS_DENIED);
                Ok(CreateOutcome::Rejected)
            }
            Err(e) => {
                self.notifier.fatal(&e.to_string());
                Err(e.into())
            }
        }
    }
}
