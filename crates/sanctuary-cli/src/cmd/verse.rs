use crate::cmd::block_on;
use crate::output::print_json;
use anyhow::Context;
use sanctuary_core::{config::Config, reference::Reference};
use std::path::Path;
use verse_client::VerseService;

pub fn run(root: &Path, input: &str, json: bool) -> anyhow::Result<()> {
    // Reject malformed input before touching config or the network.
    Reference::parse(input)
        .with_context(|| format!("'{}' is not a verse reference", input.trim()))?;

    let config = Config::load(root).context("failed to load config")?;
    let service = VerseService::from_config(&config).context("failed to set up verse provider")?;
    tracing::debug!(provider = service.provider_name(), "looking up verse");

    let verse = block_on(service.lookup(input))?.context("verse lookup failed")?;

    if json {
        print_json(&verse)?;
    } else {
        println!("{verse}");
    }
    Ok(())
}
