//! Draft state and the values derived from it

use std::collections::HashSet;
use std::sync::Arc;

use kibi_core::{FieldSpec, IndexMatches, Interval, PatternQuery};
use kibi_settings::{IndexPatternSettings, clamp_sample_count};

use crate::messages;

/// The index pattern being edited
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Draft {
    /// Literal index name, wildcard, or date template when `name_is_pattern`
    pub name: String,
    pub is_time_based: bool,
    /// Name is a date template; only meaningful when time based
    pub name_is_pattern: bool,
    /// Set iff `name_is_pattern`
    pub name_interval: Option<Interval>,
    /// One of the latest discovered date fields, or none
    pub time_field: Option<Arc<FieldSpec>>,
    pub sample_count: usize,
    /// Keep the trailing wildcard expandable when the pattern is saved
    pub expandable: bool,
}

impl Draft {
    pub fn new(settings: &IndexPatternSettings) -> Self {
        Self {
            name: settings.placeholder.clone(),
            is_time_based: true,
            name_is_pattern: false,
            name_interval: Some(settings.default_interval),
            time_field: None,
            sample_count: clamp_sample_count(settings.default_sample_count),
            expandable: false,
        }
    }

    pub fn pattern_query(&self) -> PatternQuery {
        PatternQuery::new(self.name.clone(), self.name_interval)
    }

    /// A time-based wildcard name that is not a date template
    pub fn can_expand_indices(&self) -> bool {
        self.is_time_based && !self.name_is_pattern && self.name.contains('*')
    }

    pub fn time_field_name(&self) -> Option<&str> {
        self.time_field.as_deref().map(|f| f.name.as_str())
    }
}

/// Existing indices found for the current pattern
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExistingReport {
    pub all: Vec<String>,
    pub matches: Vec<String>,
    /// `matches / all` as a rounded percentage
    pub match_percent: u32,
    /// Names in `all` that are not in `matches`, in `all` order
    pub failures: Vec<String>,
}

impl ExistingReport {
    /// `None` when the pattern expanded to nothing
    pub fn from_matches(found: IndexMatches) -> Option<Self> {
        if found.all.is_empty() {
            return None;
        }

        let matched: HashSet<&str> = found.matches.iter().map(String::as_str).collect();
        let failures = found
            .all
            .iter()
            .filter(|name| !matched.contains(name.as_str()))
            .cloned()
            .collect();
        let match_percent =
            ((found.matches.len() as f64 / found.all.len() as f64) * 100.0).round() as u32;

        Some(Self {
            all: found.all,
            matches: found.matches,
            match_percent,
            failures,
        })
    }

    pub fn match_percent_label(&self) -> String {
        format!("{}%", self.match_percent)
    }
}

/// State recomputed from the draft and the backend, never edited directly
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DerivedState {
    pub existing: Option<ExistingReport>,
    /// Candidate names shown when no real index matches yet
    pub samples: Option<Vec<String>>,
    pub pattern_errors: Vec<String>,
    /// `None` until a field fetch has produced a list
    pub fields: Option<Vec<Arc<FieldSpec>>>,
    pub date_fields: Option<Vec<Arc<FieldSpec>>>,
    pub fetch_fields_error: Option<String>,
}

impl DerivedState {
    pub(crate) fn loading() -> Self {
        Self {
            existing: None,
            samples: None,
            pattern_errors: Vec::new(),
            fields: None,
            date_fields: None,
            fetch_fields_error: Some(messages::LOADING.to_string()),
        }
    }

    /// Back to the neutral marker while a sample recompute is outstanding.
    /// Field lists are kept.
    pub(crate) fn reset(&mut self) {
        self.pattern_errors.clear();
        self.samples = None;
        self.existing = None;
        self.fetch_fields_error = Some(messages::LOADING.to_string());
    }

    pub fn is_loading(&self) -> bool {
        self.fetch_fields_error.as_deref() == Some(messages::LOADING)
    }
}

/// Last observed values of the fields the mode rules react to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ModeWatch {
    pub is_time_based: bool,
    pub name_is_pattern: bool,
    pub name_interval: Option<Interval>,
}

impl ModeWatch {
    pub fn of(draft: &Draft) -> Self {
        Self {
            is_time_based: draft.is_time_based,
            name_is_pattern: draft.name_is_pattern,
            name_interval: draft.name_interval,
        }
    }
}

/// Last observed values that trigger a sample recompute
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct SampleWatch {
    pub name: String,
    pub name_interval: Option<Interval>,
}

impl SampleWatch {
    pub fn of(draft: &Draft) -> Self {
        Self {
            name: draft.name.clone(),
            name_interval: draft.name_interval,
        }
    }
}

/// Last observed values that trigger a plain field refresh
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct RefreshWatch {
    pub is_time_based: bool,
    pub sample_count: usize,
}

impl RefreshWatch {
    pub fn of(draft: &Draft) -> Self {
        Self {
            is_time_based: draft.is_time_based,
            sample_count: draft.sample_count,
        }
    }
}
