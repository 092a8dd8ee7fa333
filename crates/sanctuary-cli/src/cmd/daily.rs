use crate::cmd::{block_on, resolve_now};
use crate::output::print_json;
use anyhow::Context;
use sanctuary_core::{config::Config, verse::daily_verse};
use std::path::Path;
use verse_client::VerseService;

pub fn run(root: &Path, at: Option<&str>, offline: bool, json: bool) -> anyhow::Result<()> {
    let config = Config::load(root).context("failed to load config")?;
    let date = resolve_now(at)?.date();

    let verse = if offline {
        daily_verse(&config.verses, date)
    } else {
        match VerseService::from_config(&config) {
            Ok(service) => block_on(service.daily_or_fallback(date, &config.verses))?,
            Err(e) => {
                tracing::warn!(error = %e, "verse provider unavailable, using local rotation");
                daily_verse(&config.verses, date)
            }
        }
    };

    if json {
        let value = serde_json::json!({
            "date": date,
            "verse": verse,
        });
        print_json(&value)?;
    } else {
        println!("{verse}");
    }
    Ok(())
}
