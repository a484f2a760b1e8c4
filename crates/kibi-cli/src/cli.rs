//! `kibi` command line front-end
//!
//! Drives the index pattern wizard non-interactively against an
//! Elasticsearch cluster: preview what a pattern resolves to, create it, or
//! inspect the persisted settings.

mod commands;
mod logging;
mod report;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use kibi_core::Interval;
use kibi_settings::KibiSettings;

#[derive(Debug, Parser)]
#[command(name = "kibi", version, about = "Create and inspect Kibi index patterns")]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Args)]
pub struct GlobalArgs {
    /// Elasticsearch URL
    #[arg(long, global = true, env = "KIBI_ES_URL")]
    pub url: Option<String>,

    /// Index holding saved objects
    #[arg(long, global = true, env = "KIBI_INDEX")]
    pub kibana_index: Option<String>,

    /// Settings file to use instead of the one in the user config directory
    #[arg(long, global = true, env = "KIBI_SETTINGS")]
    pub settings: Option<PathBuf>,

    /// Debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Only log warnings and errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Log as JSON lines
    #[arg(long, global = true)]
    pub json_logs: bool,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Show what a pattern resolves to without saving it
    Preview(PatternArgs),
    /// Save a pattern
    Create(CreateArgs),
    /// Inspect or initialize the settings file
    #[command(subcommand)]
    Settings(SettingsCommand),
}

#[derive(Debug, Clone, Args)]
pub struct PatternArgs {
    /// Index name, wildcard, or date template such as `[logstash-]YYYY.MM.DD`
    pub name: String,

    /// Treat the name as a date template partitioned by this interval
    #[arg(long, short = 'i')]
    pub interval: Option<Interval>,

    /// The indices carry no time field
    #[arg(long)]
    pub not_time_based: bool,

    /// Time field to use instead of the first date field
    #[arg(long, short = 't')]
    pub time_field: Option<String>,

    /// Number of sample names to generate
    #[arg(long)]
    pub samples: Option<usize>,
}

#[derive(Debug, Args)]
pub struct CreateArgs {
    #[command(flatten)]
    pub pattern: PatternArgs,

    /// Keep a wildcard pattern expandable
    #[arg(long)]
    pub expandable: bool,
}

#[derive(Debug, Subcommand)]
pub enum SettingsCommand {
    /// Print the effective settings as JSON
    Show,
    /// Print the settings file location
    Path,
    /// Write the default settings file if none exists
    Init,
}

impl Cli {
    /// Settings from disk with command line overrides applied
    pub fn load_settings(&self) -> anyhow::Result<KibiSettings> {
        let mut settings = match &self.global.settings {
            Some(path) => KibiSettings::load_from(path)?,
            None => KibiSettings::load()?,
        };

        if let Some(url) = &self.global.url {
            settings.elasticsearch.url = url.clone();
        }
        if let Some(index) = &self.global.kibana_index {
            settings.elasticsearch.kibana_index = index.clone();
        }
        if self.global.verbose {
            settings.logging.verbose = true;
        }
        if self.global.quiet {
            settings.logging.quiet = true;
        }
        if self.global.json_logs {
            settings.logging.json = true;
        }
        Ok(settings)
    }

    pub fn settings_path(&self) -> anyhow::Result<PathBuf> {
        match &self.global.settings {
            Some(path) => Ok(path.clone()),
            None => KibiSettings::settings_path(),
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let settings = cli.load_settings()?;
    logging::init(logging::LoggingConfig::from_settings(&settings.logging))?;

    match &cli.command {
        Command::Preview(args) => commands::preview(&settings, args).await,
        Command::Create(args) => commands::create(&settings, args).await,
        Command::Settings(command) => commands::settings(&cli, &settings, command),
    }
}
