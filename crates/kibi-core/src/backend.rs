//! Search backend interface consumed by the index pattern wizard

use async_trait::async_trait;

use crate::{FieldFetchOptions, FieldSpec, IndexMatches, IndexPatternSpec, PatternQuery, Result};

/// Backend holding the indices and the saved index patterns
///
/// Implementations report "nothing matches" as `BackendError::MissingIndices`
/// and access denial as `BackendError::Authorization`; callers treat both as
/// empty answers. Every other error is a real failure.
#[async_trait]
pub trait IndexPatternBackend: Send + Sync {
    /// Short identifier used in logs
    fn name(&self) -> &str;

    /// Indices the pattern expands to, and which of them fit its template
    async fn get_indices_for_pattern(&self, query: &PatternQuery) -> Result<IndexMatches>;

    /// Fields mapped by the indices the pattern resolves to
    async fn get_fields_for_pattern(
        &self,
        query: &PatternQuery,
        options: FieldFetchOptions,
    ) -> Result<Vec<FieldSpec>>;

    /// Persist a new index pattern.
    ///
    /// Returns the new id, or `None` when the backend declined to create it
    /// for a reason it already reported (for example, the id is taken).
    async fn create_index_pattern(&self, pattern: &IndexPatternSpec) -> Result<Option<String>>;

    /// Make freshly saved objects visible to subsequent reads
    async fn refresh_saved_objects(&self) -> Result<()> {
        Ok(())
    }
}
