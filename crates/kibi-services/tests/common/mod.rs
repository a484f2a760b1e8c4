//! Common test utilities and mocks

#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;

use kibi_core::{
    BackendError, FieldFetchOptions, FieldSpec, FixedClock, IndexMatches, IndexPatternBackend,
    IndexPatternSpec, NotificationLevel, Notifier, PatternQuery, Result,
};
use kibi_services::{IndexPatternMapper, IndexPatternWizard, Reaction};
use kibi_settings::IndexPatternSettings;

/// Mock backend for testing the wizard without a search cluster.
///
/// Responses are scripted per pattern id. Lookups for unscripted ids fail
/// with `MissingIndices`, like a cluster with no data. Every call is logged
/// as `"<operation>:<pattern id>"` for assertions.
pub struct MockBackend {
    indices: Mutex<HashMap<String, Result<IndexMatches>>>,
    fields: Mutex<HashMap<String, Result<Vec<FieldSpec>>>>,
    create_response: Mutex<Option<Result<Option<String>>>>,
    refresh_response: Mutex<Result<()>>,
    call_log: Mutex<Vec<String>>,
    created: Mutex<Vec<IndexPatternSpec>>,
}

impl MockBackend {
    pub fn new() -> Self {
        Self {
            indices: Mutex::new(HashMap::new()),
            fields: Mutex::new(HashMap::new()),
            create_response: Mutex::new(None),
            refresh_response: Mutex::new(Ok(())),
            call_log: Mutex::new(Vec::new()),
            created: Mutex::new(Vec::new()),
        }
    }

    pub fn with_indices(self, pattern: &str, all: &[&str], matches: &[&str]) -> Self {
        self.indices.lock().insert(
            pattern.to_string(),
            Ok(IndexMatches {
                all: strings(all),
                matches: strings(matches),
            }),
        );
        self
    }

    pub fn with_indices_error(self, pattern: &str, error: BackendError) -> Self {
        self.indices.lock().insert(pattern.to_string(), Err(error));
        self
    }

    pub fn with_fields(self, pattern: &str, fields: Vec<FieldSpec>) -> Self {
        self.set_fields(pattern, Ok(fields));
        self
    }

    pub fn with_fields_error(self, pattern: &str, error: BackendError) -> Self {
        self.set_fields(pattern, Err(error));
        self
    }

    /// Answer every creation with `response` instead of the pattern id
    pub fn with_create_response(self, response: Result<Option<String>>) -> Self {
        *self.create_response.lock() = Some(response);
        self
    }

    pub fn with_refresh_error(self, error: BackendError) -> Self {
        *self.refresh_response.lock() = Err(error);
        self
    }

    /// Change the scripted fields after construction
    pub fn set_fields(&self, pattern: &str, fields: Result<Vec<FieldSpec>>) {
        self.fields.lock().insert(pattern.to_string(), fields);
    }

    pub fn call_log(&self) -> Vec<String> {
        self.call_log.lock().clone()
    }

    pub fn calls_to(&self, operation: &str) -> usize {
        let prefix = format!("{}:", operation);
        self.call_log
            .lock()
            .iter()
            .filter(|call| call.starts_with(&prefix))
            .count()
    }

    pub fn created(&self) -> Vec<IndexPatternSpec> {
        self.created.lock().clone()
    }

    fn log(&self, operation: &str, pattern: &str) {
        self.call_log.lock().push(format!("{}:{}", operation, pattern));
    }
}

#[async_trait]
impl IndexPatternBackend for MockBackend {
    fn name(&self) -> &str {
        "mock"
    }

    async fn get_indices_for_pattern(&self, query: &PatternQuery) -> Result<IndexMatches> {
        self.log("indices", &query.id);
        self.indices
            .lock()
            .get(&query.id)
            .cloned()
            .unwrap_or_else(|| Err(BackendError::MissingIndices(query.id.clone())))
    }

    async fn get_fields_for_pattern(
        &self,
        query: &PatternQuery,
        _options: FieldFetchOptions,
    ) -> Result<Vec<FieldSpec>> {
        self.log("fields", &query.id);
        self.fields
            .lock()
            .get(&query.id)
            .cloned()
            .unwrap_or_else(|| Err(BackendError::MissingIndices(query.id.clone())))
    }

    async fn create_index_pattern(&self, pattern: &IndexPatternSpec) -> Result<Option<String>> {
        self.log("create", &pattern.id);
        if let Some(response) = self.create_response.lock().clone() {
            return response;
        }
        self.created.lock().push(pattern.clone());
        Ok(Some(pattern.id.clone()))
    }

    async fn refresh_saved_objects(&self) -> Result<()> {
        self.log("refresh", "");
        self.refresh_response.lock().clone()
    }
}

/// Notifier that remembers everything it was told
#[derive(Default)]
pub struct RecordingNotifier {
    messages: Mutex<Vec<(NotificationLevel, String)>>,
}

impl RecordingNotifier {
    pub fn messages(&self) -> Vec<(NotificationLevel, String)> {
        self.messages.lock().clone()
    }

    pub fn at(&self, level: NotificationLevel) -> Vec<String> {
        self.messages
            .lock()
            .iter()
            .filter(|(l, _)| *l == level)
            .map(|(_, m)| m.clone())
            .collect()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, level: NotificationLevel, message: &str) {
        self.messages.lock().push((level, message.to_string()));
    }
}

/// Everything a test needs to drive one wizard session
pub struct Harness {
    pub backend: Arc<MockBackend>,
    pub mapper: Arc<IndexPatternMapper>,
    pub notifier: Arc<RecordingNotifier>,
    pub wizard: IndexPatternWizard,
}

impl Harness {
    /// Open a wizard and hand back its initial reaction unexecuted
    pub fn open(backend: MockBackend) -> (Self, Reaction) {
        Self::open_with(backend, IndexPatternSettings::default())
    }

    pub fn open_with(backend: MockBackend, settings: IndexPatternSettings) -> (Self, Reaction) {
        let backend = Arc::new(backend);
        let mapper = Arc::new(IndexPatternMapper::new(backend.clone()));
        let notifier = Arc::new(RecordingNotifier::default());
        let (wizard, reaction) = IndexPatternWizard::open(
            mapper.clone(),
            notifier.clone(),
            Arc::new(FixedClock(test_now())),
            settings,
        );
        (
            Self {
                backend,
                mapper,
                notifier,
                wizard,
            },
            reaction,
        )
    }

    /// Open a wizard and run its initial reaction to completion
    pub async fn opened(backend: MockBackend) -> Self {
        let (mut harness, reaction) = Self::open(backend);
        harness
            .wizard
            .run(reaction)
            .await
            .expect("initial reaction should succeed");
        harness
    }
}

/// Fixed instant all sample names are generated around
pub fn test_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2015, 3, 10, 13, 45, 0).unwrap()
}

pub fn field(name: &str, field_type: &str) -> FieldSpec {
    FieldSpec::new(name, field_type)
}

/// A typical log index mapping with two date fields
pub fn log_fields() -> Vec<FieldSpec> {
    vec![
        field("@timestamp", "date"),
        field("message", "string"),
        field("received", "date"),
        field("status", "number"),
    ]
}

pub fn strings(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}
