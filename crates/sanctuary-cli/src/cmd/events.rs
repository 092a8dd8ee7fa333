use crate::cmd::{block_on, resolve_now};
use crate::output::{print_json, print_table};
use anyhow::Context;
use chrono::NaiveDateTime;
use sanctuary_core::{
    config::Config,
    display::{render_tick, DisplaySink, EventDisplay, NextEventSummary},
    season::Theme,
    verse::{daily_verse, Verse},
};
use serde::Serialize;
use std::path::Path;
use std::time::Duration;

// ---------------------------------------------------------------------------
// Snapshot sink
// ---------------------------------------------------------------------------

/// Everything one tick wrote, kept for printing.
#[derive(Debug, Serialize)]
pub struct Snapshot {
    pub now: NaiveDateTime,
    pub events: Vec<EventDisplay>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next: Option<NextEventSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub banner: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub theme: Option<Theme>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verse: Option<Verse>,
}

impl Snapshot {
    fn new(now: NaiveDateTime) -> Self {
        Self {
            now,
            events: Vec::new(),
            next: None,
            banner: None,
            theme: None,
            verse: None,
        }
    }

    /// Render one full tick for `config` at `now`.
    pub fn capture(config: &Config, now: NaiveDateTime) -> Self {
        let mut snapshot = Snapshot::new(now);
        render_tick(config, now, &mut snapshot);
        snapshot.set_verse(&daily_verse(&config.verses, now.date()));
        snapshot
    }

    fn print_text(&self) {
        let rows = self
            .events
            .iter()
            .map(|e| {
                vec![
                    e.title.clone(),
                    e.status.to_string(),
                    e.text.clone(),
                    e.date.clone().unwrap_or_else(|| "-".to_string()),
                ]
            })
            .collect();
        print_table(&["EVENT", "STATUS", "COUNTDOWN", "DATE"], rows);

        if let Some(next) = &self.next {
            println!("\nNext: {next}");
        }
        if let Some(banner) = &self.banner {
            println!("Banner: {banner}");
        }
        if let Some(theme) = &self.theme {
            println!("Theme: {} ({})", theme.css_class, theme.accent);
        }
        if let Some(verse) = &self.verse {
            println!("Verse: {verse}");
        }
    }
}

impl DisplaySink for Snapshot {
    fn set_countdown(&mut self, index: usize, display: &EventDisplay) {
        if index >= self.events.len() {
            self.events.resize(index + 1, display.clone());
        }
        self.events[index] = display.clone();
    }

    fn set_next_event(&mut self, summary: &NextEventSummary) {
        self.next = Some(summary.clone());
    }

    fn set_banner(&mut self, text: &str) {
        self.banner = Some(text.to_string());
    }

    fn set_theme(&mut self, theme: &Theme) {
        self.theme = Some(theme.clone());
    }

    fn set_verse(&mut self, verse: &Verse) {
        self.verse = Some(verse.clone());
    }
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

pub fn run(root: &Path, at: Option<&str>, watch: bool, json: bool) -> anyhow::Result<()> {
    let config = Config::load(root).context("failed to load config")?;

    if watch {
        return block_on(watch_loop(&config, json))?;
    }

    let snapshot = Snapshot::capture(&config, resolve_now(at)?);
    if json {
        print_json(&snapshot)?;
    } else if snapshot.events.is_empty() {
        println!("No events configured. Add some to sanctuary.yaml.");
    } else {
        snapshot.print_text();
    }
    Ok(())
}

/// Re-render every `countdown.tick_seconds` until Ctrl-C.
async fn watch_loop(config: &Config, json: bool) -> anyhow::Result<()> {
    let period = Duration::from_secs(config.countdown.tick_seconds.max(1));
    let mut ticker = tokio::time::interval(period);
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
    tracing::info!(tick_secs = period.as_secs(), "watching countdowns");

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("stopped");
                return Ok(());
            }
            _ = ticker.tick() => {
                let snapshot = Snapshot::capture(config, chrono::Local::now().naive_local());
                if json {
                    println!("{}", serde_json::to_string(&snapshot)?);
                } else {
                    // Clear the screen and home the cursor.
                    print!("\x1b[2J\x1b[H");
                    snapshot.print_text();
                }
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
