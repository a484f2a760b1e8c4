//! Index pattern creation wizard
//!
//! The wizard owns a [`Draft`] and keeps [`DerivedState`] consistent with it.
//! Every edit returns a [`Reaction`] listing the backend work the edit made
//! necessary. That work runs outside the wizard ([`SampleRequest::execute`],
//! [`FieldRequest::execute`]) and is folded back in with
//! [`IndexPatternWizard::apply_samples`] / [`IndexPatternWizard::apply_fields`].
//!
//! Requests are numbered when issued. Only the latest issued request of a
//! kind may write derived state, so answers to superseded edits are dropped
//! however late they arrive. [`IndexPatternWizard::run`] drives a reaction to
//! completion for callers that do not interleave edits.
//!
//! ```ignore
//! let (mut wizard, initial) = IndexPatternWizard::open(mapper, notifier, clock, settings);
//! wizard.run(initial).await?;
//!
//! let reaction = wizard.set_name_is_pattern(true);
//! wizard.run(reaction).await?;
//! assert_eq!(wizard.draft().name, "[logstash-]YYYY.MM.DD");
//! ```

mod create;
mod draft;
mod fields;
mod mode;
mod samples;


use std::sync::Arc;

use kibi_core::{BackendError, Clock, FieldSpec, Interval, Notifier};
use kibi_settings::{IndexPatternSettings, clamp_sample_count};

pub use create::CreateOutcome;
pub use draft::{DerivedState, Draft, ExistingReport};
pub use fields::{FieldOrigin, FieldOutcome, FieldRequest, FieldResult};
pub use samples::{SampleOutcome, SampleRequest, SampleResult, generate_samples};

use draft::{ModeWatch, RefreshWatch, SampleWatch};
use fields::FieldPlan;

use crate::{IndexPatternMapper, ServiceError, ServiceResult, messages};

/// Backend work made necessary by an edit
#[derive(Debug, Default)]
#[must_use = "a reaction does nothing until its requests are executed"]
pub struct Reaction {
    pub samples: Option<SampleRequest>,
    pub fields: Option<FieldRequest>,
}

pub struct IndexPatternWizard {
    mapper: Arc<IndexPatternMapper>,
    notifier: Arc<dyn Notifier>,
    clock: Arc<dyn Clock>,
    settings: IndexPatternSettings,

    draft: Draft,
    derived: DerivedState,

    mode_watch: ModeWatch,
    sample_watch: SampleWatch,
    refresh_watch: RefreshWatch,

    /// Generation of the latest issued sample request
    issued_samples: u64,
    /// Whether the latest issued sample request has been applied
    samples_settled: bool,
    /// Generation of the latest issued field request
    issued_fields: u64,
}

impl IndexPatternWizard {
    /// Start a new draft from `settings`.
    ///
    /// The returned reaction holds the initial sample check and field fetch.
    pub fn open(
        mapper: Arc<IndexPatternMapper>,
        notifier: Arc<dyn Notifier>,
        clock: Arc<dyn Clock>,
        settings: IndexPatternSettings,
    ) -> (Self, Reaction) {
        let draft = Draft::new(&settings);
        let mut wizard = Self {
            mapper,
            notifier,
            clock,
            mode_watch: ModeWatch::of(&draft),
            sample_watch: SampleWatch::of(&draft),
            refresh_watch: RefreshWatch::of(&draft),
            settings,
            draft,
            derived: DerivedState::loading(),
            issued_samples: 0,
            samples_settled: true,
            issued_fields: 0,
        };

        // First observation: the mode rules run once against unchanged
        // values, and neither the sample check nor the refresh count as edits.
        let interval = wizard.draft.name_interval;
        wizard.apply_mode_rules(interval);
        wizard.settle_mode();
        wizard.sample_watch = SampleWatch::of(&wizard.draft);
        wizard.refresh_watch = RefreshWatch::of(&wizard.draft);

        let reaction = Reaction {
            samples: Some(wizard.issue_samples(false)),
            fields: Some(wizard.issue_fields(FieldOrigin::Refresh)),
        };
        tracing::debug!(name = %wizard.draft.name, "index pattern wizard opened");
        (wizard, reaction)
    }

    pub fn draft(&self) -> &Draft {
        &self.draft
    }

    pub fn derived(&self) -> &DerivedState {
        &self.derived
    }

    pub fn mapper(&self) -> &Arc<IndexPatternMapper> {
        &self.mapper
    }

    pub fn can_expand_indices(&self) -> bool {
        self.draft.can_expand_indices()
    }

    // ---- edits ----

    pub fn set_name(&mut self, name: impl Into<String>) -> Reaction {
        self.draft.name = name.into();
        self.reconcile()
    }

    pub fn set_time_based(&mut self, is_time_based: bool) -> Reaction {
        self.draft.is_time_based = is_time_based;
        self.reconcile()
    }

    pub fn set_name_is_pattern(&mut self, name_is_pattern: bool) -> Reaction {
        self.draft.name_is_pattern = name_is_pattern;
        self.reconcile()
    }

    pub fn set_interval(&mut self, interval: Option<Interval>) -> Reaction {
        self.draft.name_interval = interval;
        self.reconcile()
    }

    pub fn set_expandable(&mut self, expandable: bool) {
        self.draft.expandable = expandable;
    }

    /// Pick the time field by name among the discovered date fields
    pub fn select_time_field(&mut self, name: &str) -> ServiceResult<()> {
        let field = self
            .derived
            .date_fields
            .as_ref()
            .and_then(|fields| fields.iter().find(|f| f.name == name))
            .cloned()
            .ok_or_else(|| ServiceError::UnknownTimeField(name.to_string()))?;
        self.draft.time_field = Some(field);
        Ok(())
    }

    /// Show more samples, up to `MAX_SAMPLE_COUNT`; with `and_update` the
    /// samples are regenerated now
    pub fn more_samples(&mut self, and_update: bool) -> Reaction {
        self.draft.sample_count =
            clamp_sample_count(self.draft.sample_count.saturating_add(self.settings.sample_step));
        let mut reaction = self.reconcile();
        if and_update && reaction.samples.is_none() {
            reaction.samples = Some(self.issue_samples(false));
        }
        reaction
    }

    pub fn refresh_fields(&mut self) -> FieldRequest {
        self.issue_fields(FieldOrigin::Refresh)
    }

    // ---- reconciliation ----

    /// Compare the draft with the last observed values and issue the work
    /// the differences call for.
    fn reconcile(&mut self) -> Reaction {
        self.settle_mode();

        let mut reaction = Reaction::default();

        let sample_watch = SampleWatch::of(&self.draft);
        if sample_watch != self.sample_watch {
            self.sample_watch = sample_watch;
            // Field fetches in flight were issued for the previous name or interval
            self.issued_fields += 1;
            reaction.samples = Some(self.issue_samples(true));
        }

        let refresh_watch = RefreshWatch::of(&self.draft);
        if refresh_watch != self.refresh_watch {
            self.refresh_watch = refresh_watch;
            reaction.fields = Some(self.issue_fields(FieldOrigin::Refresh));
        }

        reaction
    }

    fn issue_samples(&mut self, fetch_fields_after: bool) -> SampleRequest {
        self.issued_samples += 1;
        self.samples_settled = false;
        self.derived.reset();

        let query = match self.draft.name_interval {
            Some(_) if !self.draft.name.is_empty() => Some(self.draft.pattern_query()),
            _ => None,
        };
        tracing::debug!(
            generation = self.issued_samples,
            name = %self.draft.name,
            interval = ?self.draft.name_interval,
            "issuing sample recompute"
        );

        SampleRequest {
            generation: self.issued_samples,
            query,
            sample_count: self.draft.sample_count,
            now: self.clock.now(),
            fetch_fields_after,
        }
    }

    fn issue_fields(&mut self, origin: FieldOrigin) -> FieldRequest {
        self.issued_fields += 1;

        let plan = if self.draft.name.is_empty() {
            FieldPlan::NotReady(messages::SET_INDEX_NAME_FIRST)
        } else if self.draft.is_time_based
            && self.draft.name_is_pattern
            && self.draft.name_interval.is_none()
        {
            FieldPlan::NotReady(messages::INTERVAL_REQUIRED)
        } else {
            FieldPlan::Fetch(self.draft.pattern_query())
        };
        tracing::debug!(generation = self.issued_fields, origin = ?origin, "issuing field fetch");

        FieldRequest {
            generation: self.issued_fields,
            origin,
            plan,
        }
    }

    /// Fold a sample outcome back in.
    ///
    /// Returns the follow-up field fetch when the outcome is current and came
    /// from an edit. A superseded outcome is dropped; if the latest request
    /// is still outstanding the derived state goes back to loading instead.
    /// A current fatal outcome clears the field lists and the time field and
    /// leaves the "does not match" error in place.
    pub fn apply_samples(&mut self, outcome: SampleOutcome) -> ServiceResult<Option<FieldRequest>> {
        if outcome.generation != self.issued_samples {
            if let SampleResult::Fatal(message) = &outcome.result {
                tracing::warn!(
                    generation = outcome.generation,
                    "stale sample recompute failed: {}",
                    message
                );
            }
            if self.samples_settled {
                tracing::debug!(generation = outcome.generation, "dropping stale sample outcome");
            } else {
                tracing::debug!(
                    generation = outcome.generation,
                    latest = self.issued_samples,
                    "stale sample outcome while newer is pending, resetting"
                );
                self.derived.reset();
            }
            return Ok(None);
        }

        self.samples_settled = true;
        match outcome.result {
            SampleResult::NotReady => {
                self.derived.samples = None;
                self.derived.pattern_errors.clear();
            }
            SampleResult::Existing(report) => {
                tracing::info!(
                    all = report.all.len(),
                    matches = report.matches.len(),
                    match_percent = report.match_percent,
                    "pattern matches existing indices"
                );
                self.derived.existing = Some(report);
                self.derived.samples = None;
                self.derived.pattern_errors.clear();
            }
            SampleResult::NoMatches {
                errors,
                samples,
                access_denied,
            } => {
                if access_denied {
                    tracing::warn!(name = %self.draft.name, "index lookup was denied");
                    self.notifier.warning(messages::INDICES_ACCESS_DENIED);
                }
                self.derived.existing = None;
                self.derived.pattern_errors = errors;
                self.derived.samples = samples;
            }
            SampleResult::Fatal(message) => {
                // Nothing is known about the pattern: no fields, and creation stays blocked
                self.derived.existing = None;
                self.derived.samples = None;
                self.derived.pattern_errors = vec![messages::PATTERN_DOES_NOT_MATCH.to_string()];
                self.derived.fields = None;
                self.derived.date_fields = None;
                self.derived.fetch_fields_error = None;
                self.draft.time_field = None;
                self.notifier.fatal(&message);
                return Err(ServiceError::Backend(BackendError::Backend(message)));
            }
        }

        if outcome.fetch_fields_after {
            Ok(Some(self.issue_fields(FieldOrigin::Samples(outcome.generation))))
        } else {
            Ok(None)
        }
    }

    /// Fold a field outcome back in. Only the latest issued field fetch
    /// applies; one that follows a sample recompute also needs that
    /// recompute to still be the latest.
    pub fn apply_fields(&mut self, outcome: FieldOutcome) -> ServiceResult<()> {
        let current = outcome.generation == self.issued_fields
            && match outcome.origin {
                FieldOrigin::Refresh => true,
                FieldOrigin::Samples(generation) => generation == self.issued_samples,
            };

        if !current {
            if let FieldResult::Fatal(message) = &outcome.result {
                tracing::warn!(
                    generation = outcome.generation,
                    "stale field fetch failed: {}",
                    message
                );
            }
            tracing::debug!(
                generation = outcome.generation,
                latest = self.issued_fields,
                "dropping stale field outcome"
            );
            return Ok(());
        }

        match outcome.result {
            FieldResult::NotReady(message) => {
                self.derived.fetch_fields_error = Some(message);
                self.derived.fields = None;
                self.derived.date_fields = None;
            }
            FieldResult::Unavailable(message) => {
                tracing::warn!(name = %self.draft.name, "{}", message);
                self.derived.fetch_fields_error = Some(message);
                self.derived.fields = Some(Vec::new());
                self.derived.date_fields = Some(Vec::new());
            }
            FieldResult::Fields(fields) => self.update_field_list(fields),
            FieldResult::Fatal(message) => {
                self.notifier.fatal(&message);
                return Err(ServiceError::Backend(BackendError::Backend(message)));
            }
        }
        Ok(())
    }

    /// Install a fresh field list and re-bind the time field to one of its
    /// instances, by name.
    fn update_field_list(&mut self, fields: Vec<FieldSpec>) {
        let fields: Vec<Arc<FieldSpec>> = fields.into_iter().map(Arc::new).collect();
        let date_fields: Vec<Arc<FieldSpec>> =
            fields.iter().filter(|f| f.is_date()).cloned().collect();

        let selected = self.draft.time_field_name().and_then(|name| {
            date_fields.iter().find(|f| f.name == name).cloned()
        });
        self.draft.time_field = if self.draft.is_time_based {
            selected.or_else(|| date_fields.first().cloned())
        } else {
            None
        };

        tracing::info!(
            fields = fields.len(),
            date_fields = date_fields.len(),
            time_field = ?self.draft.time_field_name(),
            "field list updated"
        );
        self.derived.fetch_fields_error = None;
        self.derived.fields = Some(fields);
        self.derived.date_fields = Some(date_fields);
    }

    /// Execute and apply every request of `reaction`, follow-ups included.
    pub async fn run(&mut self, reaction: Reaction) -> ServiceResult<()> {
        if let Some(request) = reaction.fields {
            let outcome = request.execute(&self.mapper).await;
            self.apply_fields(outcome)?;
        }
        if let Some(request) = reaction.samples {
            let outcome = request.execute(&self.mapper).await;
            if let Some(follow_up) = self.apply_samples(outcome)? {
                let outcome = follow_up.execute(&self.mapper).await;
                self.apply_fields(outcome)?;
            }
        }
        Ok(())
    }
}
