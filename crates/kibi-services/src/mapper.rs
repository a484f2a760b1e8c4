//! Backend access with field caching
//!
//! Index lookups always go to the backend; field discovery is cached per
//! pattern id and interval unless the caller forces a refresh.

use std::sync::Arc;

use kibi_core::{
    FieldFetchOptions, FieldSpec, IndexMatches, IndexPatternBackend, IndexPatternSpec,
    PatternQuery, Result,
};

use crate::FieldCache;

/// Service for index and field lookups against a backend
///
/// This service wraps the `FieldCache` and provides:
/// - Cached field discovery with an explicit bypass
/// - Per-pattern cache invalidation
/// - Pass-through of index lookups and pattern creation
pub struct IndexPatternMapper {
    backend: Arc<dyn IndexPatternBackend>,
    cache: Arc<FieldCache>,
}

impl IndexPatternMapper {
    pub fn new(backend: Arc<dyn IndexPatternBackend>) -> Self {
        Self {
            backend,
            cache: Arc::new(FieldCache::default()),
        }
    }

    pub fn with_cache(backend: Arc<dyn IndexPatternBackend>, cache: Arc<FieldCache>) -> Self {
        Self { backend, cache }
    }

    #[tracing::instrument(skip(self), fields(backend = %self.backend.name(), pattern = %query.id))]
    pub async fn get_indices_for_pattern(&self, query: &PatternQuery) -> Result<IndexMatches> {
        let result = self.backend.get_indices_for_pattern(query).await;
        match &result {
            Ok(found) => tracing::debug!(
                all = found.all.len(),
                matches = found.matches.len(),
                "indices resolved"
            ),
            Err(e) if e.is_recoverable() => tracing::debug!("no usable indices: {}", e),
            Err(e) => tracing::error!("index lookup failed: {}", e),
        }
        result
    }

    /// Fields of the indices behind `query`
    ///
    /// Served from the cache unless `options.force_refresh` is set. Only
    /// successful answers are cached.
    #[tracing::instrument(skip(self), fields(backend = %self.backend.name(), pattern = %query.id))]
    pub async fn get_fields_for_pattern(
        &self,
        query: &PatternQuery,
        options: FieldFetchOptions,
    ) -> Result<Vec<FieldSpec>> {
        if !options.force_refresh {
            if let Some(cached) = self.cache.get(query) {
                return Ok(cached);
            }
        }

        let fields = self.backend.get_fields_for_pattern(query, options).await?;
        self.cache.set(query, fields.clone());
        tracing::debug!(field_count = fields.len(), "fields loaded");
        Ok(fields)
    }

    #[tracing::instrument(skip(self, pattern), fields(backend = %self.backend.name(), pattern = %pattern.id))]
    pub async fn create_index_pattern(&self, pattern: &IndexPatternSpec) -> Result<Option<String>> {
        self.backend.create_index_pattern(pattern).await
    }

    pub async fn refresh_saved_objects(&self) -> Result<()> {
        self.backend.refresh_saved_objects().await
    }

    /// Forget cached fields for one pattern id, under every interval
    pub fn clear_cache(&self, pattern_id: &str) {
        self.cache.invalidate(pattern_id);
    }

    pub fn clear_all(&self) {
        self.cache.clear();
    }

    pub fn backend(&self) -> &Arc<dyn IndexPatternBackend> {
        &self.backend
    }

    pub fn cache(&self) -> Arc<FieldCache> {
        self.cache.clone()
    }
}
