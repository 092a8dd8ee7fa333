use anyhow::Context;
use sanctuary_core::{config::Config, paths};
use std::path::Path;

pub fn run(root: &Path, name: Option<&str>) -> anyhow::Result<()> {
    let site_name = name.map(str::to_string).unwrap_or_else(|| {
        root.file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "Our Church".to_string())
    });

    println!("Initializing sanctuary in: {}", root.display());

    let created = Config::starter(&site_name)
        .save_if_missing(root)
        .with_context(|| format!("failed to write {}", paths::CONFIG_FILE))?;
    if created {
        println!("  created: {}", paths::CONFIG_FILE);
    } else {
        println!("  exists:  {}", paths::CONFIG_FILE);
    }

    println!("\nNext: edit the events list, then run `sanctuary events`.");
    Ok(())
}
