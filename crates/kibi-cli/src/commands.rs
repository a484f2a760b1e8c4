//! Command implementations

use std::sync::Arc;

use anyhow::{Context, Result, bail};
use kibi_core::{NotificationLevel, Notifier, SystemClock};
use kibi_elasticsearch::ElasticsearchBackend;
use kibi_services::{
    CreateOutcome, FieldCache, IndexPatternMapper, IndexPatternWizard, ServiceError,
};
use kibi_settings::{IndexPatternSettings, KibiSettings, clamp_sample_count, ensure_config_dir};

use crate::report;
use crate::{Cli, CreateArgs, PatternArgs, SettingsCommand};

/// Prints notifications to stderr, next to the log output
struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn notify(&self, level: NotificationLevel, message: &str) {
        tracing::debug!(level = %level, "notification: {}", message);
        eprintln!("{}: {}", level, message);
    }
}

pub async fn preview(settings: &KibiSettings, args: &PatternArgs) -> Result<()> {
    let wizard = open_wizard(settings, args).await?;
    print!("{}", report::render(&wizard));
    Ok(())
}

pub async fn create(settings: &KibiSettings, args: &CreateArgs) -> Result<()> {
    let mut wizard = open_wizard(settings, &args.pattern).await?;
    wizard.set_expandable(args.expandable);

    match wizard.create_index_pattern().await {
        Ok(CreateOutcome::Created { id, redirect }) => {
            println!("Created index pattern {}", id);
            println!("{}", redirect);
            Ok(())
        }
        Ok(CreateOutcome::Declined) => {
            bail!("An index pattern named {} already exists", wizard.draft().name)
        }
        Ok(CreateOutcome::Rejected) => bail!("The cluster rejected the index pattern"),
        Err(ServiceError::CreationBlocked(blockers)) => {
            eprint!("{}", report::render(&wizard));
            bail!("Index pattern cannot be created: {}", blockers.join("; "))
        }
        Err(e) => Err(e).context("Failed to create the index pattern"),
    }
}

pub fn settings(cli: &Cli, settings: &KibiSettings, command: &SettingsCommand) -> Result<()> {
    match command {
        SettingsCommand::Show => {
            println!("{}", serde_json::to_string_pretty(settings)?);
        }
        SettingsCommand::Path => {
            println!("{}", cli.settings_path()?.display());
        }
        SettingsCommand::Init => {
            let path = match &cli.global.settings {
                Some(path) => path.clone(),
                None => ensure_config_dir()?.join("settings.json"),
            };
            if path.exists() {
                println!("Settings already exist at {}", path.display());
            } else {
                KibiSettings::default().save_to(&path)?;
                println!("Wrote default settings to {}", path.display());
            }
        }
    }
    Ok(())
}

async fn open_wizard(settings: &KibiSettings, args: &PatternArgs) -> Result<IndexPatternWizard> {
    let backend = ElasticsearchBackend::new(&settings.elasticsearch)
        .context("Failed to set up the Elasticsearch client")?;
    let cache = Arc::new(FieldCache::new(settings.index_patterns.field_cache_ttl()));
    let mapper = Arc::new(IndexPatternMapper::with_cache(Arc::new(backend), cache));

    let (mut wizard, reaction) = IndexPatternWizard::open(
        mapper,
        Arc::new(ConsoleNotifier),
        Arc::new(SystemClock),
        pattern_settings(settings, args),
    );
    wizard.run(reaction).await?;
    apply_args(&mut wizard, args).await?;
    Ok(wizard)
}

/// Wizard defaults with `--samples` applied
fn pattern_settings(settings: &KibiSettings, args: &PatternArgs) -> IndexPatternSettings {
    let mut pattern_settings = settings.index_patterns.clone();
    if let Some(samples) = args.samples {
        let clamped = clamp_sample_count(samples);
        if clamped != samples {
            tracing::warn!(requested = samples, used = clamped, "sample count out of range");
        }
        pattern_settings.default_sample_count = clamped;
    }
    pattern_settings
}

/// Replay the command line onto a freshly opened wizard, in the order a
/// user would fill in the form.
async fn apply_args(wizard: &mut IndexPatternWizard, args: &PatternArgs) -> Result<()> {
    if args.not_time_based {
        if args.interval.is_some() {
            bail!("--interval needs a time-based pattern");
        }
        let reaction = wizard.set_time_based(false);
        wizard.run(reaction).await?;
    }

    if let Some(interval) = args.interval {
        let reaction = wizard.set_name_is_pattern(true);
        wizard.run(reaction).await?;
        let reaction = wizard.set_interval(Some(interval));
        wizard.run(reaction).await?;
    }

    let reaction = wizard.set_name(args.name.clone());
    wizard.run(reaction).await?;

    if let Some(field) = &args.time_field {
        wizard.select_time_field(field)?;
    }
    tracing::debug!(name = %wizard.draft().name, "draft ready");
    Ok(())
}
