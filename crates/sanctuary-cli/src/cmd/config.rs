use crate::output::{print_json, print_table};
use anyhow::Context;
use clap::Subcommand;
use sanctuary_core::config::{Config, WarnLevel};
use sanctuary_core::event::{weekday_name, Schedule};
use std::path::Path;

// ---------------------------------------------------------------------------
// Subcommand types
// ---------------------------------------------------------------------------

#[derive(Subcommand)]
pub enum ConfigSubcommand {
    /// Show the loaded configuration
    Show,

    /// Validate the config for common mistakes
    Validate,
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

pub fn run(root: &Path, subcmd: ConfigSubcommand, json: bool) -> anyhow::Result<()> {
    match subcmd {
        ConfigSubcommand::Show => show(root, json),
        ConfigSubcommand::Validate => validate(root, json),
    }
}

// ---------------------------------------------------------------------------
// show
// ---------------------------------------------------------------------------

fn show(root: &Path, json: bool) -> anyhow::Result<()> {
    let config = Config::load(root).context("failed to load config")?;

    if json {
        return print_json(&config);
    }

    println!("Site:     {}", config.site.name);
    if let Some(tagline) = &config.site.tagline {
        println!("Tagline:  {tagline}");
    }
    println!(
        "Window:   {} min imminent, tick every {}s",
        config.countdown.imminent_window_minutes, config.countdown.tick_seconds
    );
    println!(
        "Retry:    {} attempts, {}ms base, {}ms cap, {}ms jitter",
        config.retry.max_attempts,
        config.retry.base_delay_ms,
        config.retry.max_delay_ms,
        config.retry.jitter_ms
    );
    println!();

    let rows = config
        .events
        .iter()
        .map(|e| {
            let when = match &e.schedule {
                Schedule::Fixed { at } => at.clone(),
                Schedule::Recurring {
                    weekday,
                    hour,
                    minute,
                } => format!("every {} at {hour:02}:{minute:02}", weekday_name(*weekday)),
            };
            vec![e.title.clone(), when]
        })
        .collect();
    print_table(&["EVENT", "WHEN"], rows);
    Ok(())
}

// ---------------------------------------------------------------------------
// validate
// ---------------------------------------------------------------------------

fn validate(root: &Path, json: bool) -> anyhow::Result<()> {
    let config = Config::load(root).context("failed to load config")?;
    let warnings = config.validate();

    if json {
        let value = serde_json::json!({
            "warnings": warnings,
        });
        print_json(&value)?;
    } else if warnings.is_empty() {
        println!("Config is valid. No warnings.");
    } else {
        for w in &warnings {
            let prefix = match w.level {
                WarnLevel::Warning => "warning",
                WarnLevel::Error => "error",
            };
            println!("[{prefix}] {}", w.message);
        }
    }

    if warnings.iter().any(|w| w.level == WarnLevel::Error) {
        anyhow::bail!("config validation found errors");
    }

    Ok(())
}
