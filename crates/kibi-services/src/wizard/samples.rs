//! Sample and existence recomputation

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use kibi_core::{BackendError, Interval, PatternQuery};
use kibi_patterns::{IntervalTemplate, to_index_list};

use super::ExistingReport;
use crate::{IndexPatternMapper, messages};

/// A sample recompute issued for one draft version
///
/// Carries everything it needs, so executing it never touches the wizard.
#[derive(Debug, Clone)]
pub struct SampleRequest {
    pub(crate) generation: u64,
    /// `None` while the name or the interval is missing
    pub(crate) query: Option<PatternQuery>,
    pub(crate) sample_count: usize,
    pub(crate) now: DateTime<Utc>,
    /// Follow up with a field fetch once applied
    pub(crate) fetch_fields_after: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SampleResult {
    /// Name or interval not set yet; nothing was asked
    NotReady,
    /// At least one real index matched
    Existing(ExistingReport),
    /// Nothing exists yet: validation errors plus generated samples
    NoMatches {
        errors: Vec<String>,
        samples: Option<Vec<String>>,
        access_denied: bool,
    },
    /// Unexpected backend failure
    Fatal(String),
}

#[derive(Debug, Clone)]
pub struct SampleOutcome {
    pub(crate) generation: u64,
    pub(crate) fetch_fields_after: bool,
    pub result: SampleResult,
}

impl SampleOutcome {
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

impl SampleRequest {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn query(&self) -> Option<&PatternQuery> {
        self.query.as_ref()
    }

    pub async fn execute(&self, mapper: &IndexPatternMapper) -> SampleOutcome {
        let result = match &self.query {
            None => SampleResult::NotReady,
            Some(query) => self.resolve(mapper, query).await,
        };
        SampleOutcome {
            generation: self.generation,
            fetch_fields_after: self.fetch_fields_after,
            result,
        }
    }

    async fn resolve(&self, mapper: &IndexPatternMapper, query: &PatternQuery) -> SampleResult {
        let (found, access_denied) = match mapper.get_indices_for_pattern(query).await {
            Ok(found) => (found, false),
            Err(BackendError::MissingIndices(_)) => (Default::default(), false),
            Err(BackendError::Authorization(_)) => (Default::default(), true),
            Err(e) => return SampleResult::Fatal(e.to_string()),
        };

        if let Some(report) = ExistingReport::from_matches(found) {
            return SampleResult::Existing(report);
        }

        let mut errors = vec![messages::PATTERN_DOES_NOT_MATCH.to_string()];
        let samples = match query.interval {
            Some(interval) => {
                match generate_samples(&query.id, interval, self.sample_count, self.now) {
                    Ok(samples) if has_duplicates(&samples) => {
                        errors.push(messages::NON_UNIQUE_INDEX_NAMES.to_string());
                        None
                    }
                    Ok(samples) => Some(samples),
                    Err(e) => {
                        errors.push(format!("Invalid pattern: {}", e));
                        None
                    }
                }
            }
            None => None,
        };

        SampleResult::NoMatches {
            errors,
            samples,
            access_denied,
        }
    }
}

/// Half the sample count, rounded up
pub(crate) fn sample_radius(sample_count: usize) -> i64 {
    i64::try_from(sample_count.div_ceil(2)).unwrap_or(i64::MAX / 2)
}

/// Names `template` yields for `radius` intervals either side of `now`
pub fn generate_samples(
    template: &str,
    interval: Interval,
    sample_count: usize,
    now: DateTime<Utc>,
) -> kibi_patterns::PatternResult<Vec<String>> {
    let template = IntervalTemplate::parse(template)?;
    let radius = sample_radius(sample_count);
    to_index_list(&template, interval, -radius, radius, now)
}

fn has_duplicates(samples: &[String]) -> bool {
    let unique: HashSet<&String> = samples.iter().collect();
    unique.len() != samples.len()
}
