//! Logging setup for the `kibi` binary
//!
//! Logs go to stderr so command output on stdout stays machine readable.
//! `RUST_LOG` takes precedence over the filter derived from the settings.

use kibi_settings::LoggingSettings;
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

/// Logging configuration
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Emit one JSON object per event instead of human readable lines
    pub json: bool,

    /// Whether to include file/line information in logs
    pub include_location: bool,

    /// Whether to log span open/close (for timing backend calls)
    pub enable_spans: bool,

    /// Filter used when `RUST_LOG` is not set
    pub default_filter: String,
}

impl LoggingConfig {
    pub fn from_settings(settings: &LoggingSettings) -> Self {
        let level = settings.filter_directive();
        let default_filter = if level == "off" {
            level.to_string()
        } else {
            // Dependencies stay at warn unless asked for through RUST_LOG
            format!(
                "warn,kibi={level},kibi_core={level},kibi_patterns={level},kibi_services={level},kibi_settings={level},kibi_elasticsearch={level}"
            )
        };

        Self {
            json: settings.json,
            include_location: settings.verbose,
            enable_spans: settings.verbose,
            default_filter,
        }
    }
}

/// Install the global subscriber
pub fn init(config: LoggingConfig) -> anyhow::Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.default_filter))?;

    // NEW fires once per span; ENTER would repeat on every poll of a future
    let span_events = if config.enable_spans {
        FmtSpan::NEW | FmtSpan::CLOSE
    } else {
        FmtSpan::NONE
    };

    let layer = if config.json {
        fmt::layer()
            .with_target(true)
            .with_file(true)
            .with_line_number(true)
            .with_span_events(span_events)
            .with_ansi(false)
            .json()
            .with_current_span(true)
            .with_writer(std::io::stderr)
            .with_filter(env_filter)
            .boxed()
    } else {
        fmt::layer()
            .with_target(true)
            .with_file(config.include_location)
            .with_line_number(config.include_location)
            .with_span_events(span_events)
            .with_writer(std::io::stderr)
            .with_filter(env_filter)
            .boxed()
    };

    tracing_subscriber::registry().with(layer).try_init()?;

    tracing::debug!(
        json = config.json,
        filter = %config.default_filter,
        "Logging system initialized"
    );
    Ok(())
}
