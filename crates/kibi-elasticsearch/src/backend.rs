//! Elasticsearch backend implementation

use async_trait::async_trait;
use kibi_core::{
    BackendError, FieldFetchOptions, FieldSpec, IndexMatches, IndexPatternBackend,
    IndexPatternSpec, PatternQuery, Result,
};
use kibi_patterns::IntervalTemplate;
use kibi_settings::ElasticsearchSettings;
use reqwest::{Client, Method, RequestBuilder, StatusCode, Url};
use serde::Serialize;
use serde_json::Value;

use crate::response::{classify_error, flatten_mappings, index_names};

/// Document type index patterns are stored under
const INDEX_PATTERN_TYPE: &str = "index-pattern";

/// Index pattern backend talking to an Elasticsearch cluster over HTTP
///
/// Patterns are resolved with the `_alias` and `_mapping` APIs; created
/// patterns are stored in the saved-objects index (`kibana_index`).
pub struct ElasticsearchBackend {
    client: Client,
    base_url: Url,
    kibana_index: String,
    username: Option<String>,
    password: Option<String>,
}

/// Saved-object document of an index pattern
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct IndexPatternDocument<'a> {
    title: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    time_field_name: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    interval_name: Option<&'a str>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    not_expandable: bool,
    /// Field list, serialized as a JSON string
    fields: String,
}

impl ElasticsearchBackend {
    pub fn new(settings: &ElasticsearchSettings) -> Result<Self> {
        let base_url = Url::parse(&settings.url)
            .map_err(|e| BackendError::Http(format!("Invalid URL {}: {}", settings.url, e)))?;
        let client = Client::builder()
            .timeout(settings.request_timeout())
            .build()
            .map_err(|e| BackendError::Http(e.to_string()))?;

        tracing::debug!(
            url = %base_url,
            kibana_index = %settings.kibana_index,
            "Elasticsearch backend initialized"
        );
        Ok(Self {
            client,
            base_url,
            kibana_index: settings.kibana_index.clone(),
            username: settings.username.clone(),
            password: settings.password.clone(),
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn kibana_index(&self) -> &str {
        &self.kibana_index
    }

    /// URL of `segments` below the base URL, each segment percent-encoded
    pub(crate) fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        {
            let mut path = url.path_segments_mut().map_err(|_| {
                BackendError::Http(format!("{} cannot be used as a base URL", self.base_url))
            })?;
            path.pop_if_empty().extend(segments);
        }
        Ok(url)
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        let builder = self.client.request(method, url);
        match &self.username {
            Some(username) => builder.basic_auth(username, self.password.as_ref()),
            None => builder,
        }
    }

    async fn send_json(&self, builder: RequestBuilder) -> Result<Value> {
        let response = builder
            .send()
            .await
            .map_err(|e| BackendError::Http(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(classify_error(status.as_u16(), &body));
        }

        response
            .json()
            .await
            .map_err(|e| BackendError::InvalidResponse(e.to_string()))
    }
}

/// Wildcard to query for `query`, and its template when interval based
pub(crate) fn resolve_pattern(query: &PatternQuery) -> Result<(String, Option<IntervalTemplate>)> {
    if !query.is_interval_based() {
        return Ok((query.id.clone(), None));
    }
    let template = IntervalTemplate::parse(&query.id)
        .map_err(|e| BackendError::Backend(format!("Invalid pattern {}: {}", query.id, e)))?;
    Ok((template.to_wildcard(), Some(template)))
}

#[async_trait]
impl IndexPatternBackend for ElasticsearchBackend {
    fn name(&self) -> &str {
        "elasticsearch"
    }

    #[tracing::instrument(skip(self), fields(pattern = %query.id))]
    async fn get_indices_for_pattern(&self, query: &PatternQuery) -> Result<IndexMatches> {
        let (wildcard, template) = resolve_pattern(query)?;
        let url = self.endpoint(&[wildcard.as_str(), "_alias"])?;
        let body = self.send_json(self.request(Method::GET, url)).await?;

        let all = index_names(&body)?;
        let matches = match &template {
            Some(template) => all.iter().filter(|name| template.matches(name)).cloned().collect(),
            None => all.clone(),
        };
        tracing::debug!(wildcard = %wildcard, all = all.len(), matches = matches.len(), "aliases resolved");
        Ok(IndexMatches { all, matches })
    }

    #[tracing::instrument(skip(self), fields(pattern = %query.id))]
    async fn get_fields_for_pattern(
        &self,
        query: &PatternQuery,
        options: FieldFetchOptions,
    ) -> Result<Vec<FieldSpec>> {
        let (wildcard, _) = resolve_pattern(query)?;
        let url = self.endpoint(&[wildcard.as_str(), "_mapping"])?;
        let body = self.send_json(self.request(Method::GET, url)).await?;

        if body.as_object().is_some_and(|indices| indices.is_empty()) {
            return Err(BackendError::MissingIndices(query.id.clone()));
        }
        let fields = flatten_mappings(&body)?;
        tracing::debug!(
            field_count = fields.len(),
            force_refresh = options.force_refresh,
            "mapping flattened"
        );
        Ok(fields)
    }

    #[tracing::instrument(skip(self, pattern), fields(pattern = %pattern.id))]
    async fn create_index_pattern(&self, pattern: &IndexPatternSpec) -> Result<Option<String>> {
        let fields = self
            .get_fields_for_pattern(&pattern.query(), FieldFetchOptions::force_refresh())
            .await?;
        let document = IndexPatternDocument {
            title: &pattern.title,
            time_field_name: pattern.time_field_name.as_deref(),
            interval_name: pattern.interval_name.as_deref(),
            not_expandable: pattern.not_expandable,
            fields: serde_json::to_string(&fields)?,
        };

        let mut url = self.endpoint(&[
            self.kibana_index.as_str(),
            INDEX_PATTERN_TYPE,
            pattern.id.as_str(),
        ])?;
        url.query_pairs_mut().append_pair("op_type", "create");

        let response = self
            .request(Method::PUT, url)
            .json(&document)
            .send()
            .await
            .map_err(|e| BackendError::Http(e.to_string()))?;

        let status = response.status();
        if status == StatusCode::CONFLICT {
            tracing::warn!("index pattern already exists");
            return Ok(None);
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(classify_error(status.as_u16(), &body));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| BackendError::InvalidResponse(e.to_string()))?;
        let id = body
            .get("_id")
            .and_then(Value::as_str)
            .unwrap_or(pattern.id.as_str())
            .to_string();
        tracing::info!(id = %id, field_count = fields.len(), "index pattern stored");
        Ok(Some(id))
    }

    async fn refresh_saved_objects(&self) -> Result<()> {
        let url = self.endpoint(&[self.kibana_index.as_str(), "_refresh"])?;
        self.send_json(self.request(Method::POST, url)).await?;
        Ok(())
    }
}
