//! Kibi Settings
//!
//! Persisted user settings for the index pattern tools:
//! - Index pattern wizard defaults (placeholder name, sample counts, interval)
//! - Elasticsearch connection
//! - Logging verbosity

use anyhow::{Context, Result};
use kibi_core::Interval;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

mod settings_file;

pub use settings_file::*;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct KibiSettings {
    pub index_patterns: IndexPatternSettings,
    pub elasticsearch: ElasticsearchSettings,
    pub logging: LoggingSettings,
}

impl KibiSettings {
    /// Load from the user's settings file, falling back to defaults when it
    /// does not exist yet.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::settings_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!(path = ?path, "no settings file, using defaults");
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings from {:?}", path))?;
        let settings: Self =
            serde_json::from_str(&content).with_context(|| "Failed to parse settings JSON")?;
        Ok(settings.normalized())
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::settings_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write settings to {:?}", path))?;
        Ok(())
    }

    pub fn settings_path() -> Result<PathBuf> {
        settings_file()
    }

    /// Clamp values a hand-edited file may have put out of range
    fn normalized(mut self) -> Self {
        self.index_patterns.default_sample_count =
            clamp_sample_count(self.index_patterns.default_sample_count);
        self.index_patterns.sample_step = clamp_sample_count(self.index_patterns.sample_step);
        self.logging = self.logging.normalized();
        self
    }
}

/// Upper bound on generated sample names
pub const MAX_SAMPLE_COUNT: usize = 500;

/// Keep a sample count or step within `1..=MAX_SAMPLE_COUNT`
pub fn clamp_sample_count(count: usize) -> usize {
    count.clamp(1, MAX_SAMPLE_COUNT)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndexPatternSettings {
    /// Name a new draft starts with
    pub placeholder: String,
    /// Number of sample names generated around "now"
    pub default_sample_count: usize,
    /// How many samples "more samples" adds
    pub sample_step: usize,
    /// Interval picked when date-pattern mode is switched on
    pub default_interval: Interval,
    /// How long discovered field lists stay cached
    pub field_cache_ttl_secs: u64,
}

impl Default for IndexPatternSettings {
    fn default() -> Self {
        Self {
            placeholder: kibi_patterns::DEFAULT_PLACEHOLDER.to_string(),
            default_sample_count: 5,
            sample_step: 5,
            default_interval: Interval::Days,
            field_cache_ttl_secs: 300,
        }
    }
}

impl IndexPatternSettings {
    pub fn field_cache_ttl(&self) -> Duration {
        Duration::from_secs(self.field_cache_ttl_secs)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ElasticsearchSettings {
    pub url: String,
    /// Index holding saved objects such as index patterns
    pub kibana_index: String,
    pub request_timeout_ms: u64,
    pub username: Option<String>,
    pub password: Option<String>,
}

impl Default for ElasticsearchSettings {
    fn default() -> Self {
        Self {
            url: "http://localhost:9200".to_string(),
            kibana_index: ".kibi".to_string(),
            request_timeout_ms: 30_000,
            username: None,
            password: None,
        }
    }
}

impl ElasticsearchSettings {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}

/// Logging switches. `silent` implies `quiet`, and `quiet` wins over `verbose`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct LoggingSettings {
    pub silent: bool,
    pub quiet: bool,
    pub verbose: bool,
    pub json: bool,
}

impl LoggingSettings {
    fn normalized(mut self) -> Self {
        if self.silent {
            self.quiet = true;
        }
        if self.quiet {
            self.verbose = false;
        }
        self
    }

    /// Default `tracing` filter directive for these switches
    pub fn filter_directive(&self) -> &'static str {
        let this = self.normalized();
        if this.silent {
            "off"
        } else if this.quiet {
            "warn"
        } else if this.verbose {
            "debug"
        } else {
            "info"
        }
    }
}
