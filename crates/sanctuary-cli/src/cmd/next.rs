use crate::cmd::resolve_now;
use crate::output::print_json;
use anyhow::Context;
use sanctuary_core::{config::Config, display::NextEventSummary, select::select_next};
use std::path::Path;

pub fn run(root: &Path, at: Option<&str>, json: bool) -> anyhow::Result<()> {
    let config = Config::load(root).context("failed to load config")?;
    let now = resolve_now(at)?;
    let next = select_next(&config.events, now, config.imminent_window());

    if json {
        let value = serde_json::json!({
            "now": now,
            "next": NextEventSummary::from_selection(next.as_ref()),
            "occurrence": next.as_ref().map(|n| &n.occurrence),
        });
        print_json(&value)?;
    } else {
        println!("{}", NextEventSummary::from_selection(next.as_ref()));
    }
    Ok(())
}
