//! Common value types shared between the backend and the wizard

use serde::{Deserialize, Serialize};

use crate::Interval;

/// Field type name the backend uses for date fields
pub const DATE_FIELD_TYPE: &str = "date";

/// A field discovered for an index pattern
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FieldSpec {
    pub name: String,
    #[serde(rename = "type")]
    pub field_type: String,
}

impl FieldSpec {
    pub fn new(name: impl Into<String>, field_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            field_type: field_type.into(),
        }
    }

    pub fn is_date(&self) -> bool {
        self.field_type == DATE_FIELD_TYPE
    }
}

/// Indices found for a pattern
///
/// `all` holds every index the pattern's wildcard expands to, `matches` the
/// subset whose names actually fit the pattern's template.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexMatches {
    pub all: Vec<String>,
    pub matches: Vec<String>,
}

/// What the backend needs to know about a not-yet-saved pattern
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatternQuery {
    /// Pattern text, either a literal/wildcard name or a date template
    pub id: String,
    /// Set when `id` is a date template
    pub interval: Option<Interval>,
}

impl PatternQuery {
    pub fn new(id: impl Into<String>, interval: Option<Interval>) -> Self {
        Self {
            id: id.into(),
            interval,
        }
    }

    pub fn is_interval_based(&self) -> bool {
        self.interval.is_some()
    }
}

/// Options for field discovery
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FieldFetchOptions {
    /// Bypass any field cache and ask the backend again
    pub force_refresh: bool,
}

impl FieldFetchOptions {
    pub fn force_refresh() -> Self {
        Self {
            force_refresh: true,
        }
    }
}

/// Index pattern entity as persisted by the backend
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexPatternSpec {
    pub id: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_field_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interval_name: Option<String>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub not_expandable: bool,
}

impl IndexPatternSpec {
    /// A pattern whose id and title are both `name`
    pub fn named(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            id: name.clone(),
            title: name,
            time_field_name: None,
            interval_name: None,
            not_expandable: false,
        }
    }

    pub fn query(&self) -> PatternQuery {
        PatternQuery {
            id: self.id.clone(),
            interval: self.interval_name.as_deref().and_then(|n| n.parse().ok()),
        }
    }
}
