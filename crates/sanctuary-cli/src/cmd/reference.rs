use crate::output::print_json;
use anyhow::Context;
use sanctuary_core::reference::{correct_spelling, Reference};

pub fn run(input: &str, json: bool) -> anyhow::Result<()> {
    let corrected = correct_spelling(input.trim());
    let reference =
        Reference::parse(input).with_context(|| format!("'{}' is not a verse reference", input.trim()))?;

    if json {
        let value = serde_json::json!({
            "input": input,
            "corrected": corrected,
            "reference": reference,
            "canonical": reference.to_string(),
            "path": reference.url_path(),
        });
        print_json(&value)?;
    } else {
        if corrected != input.trim() {
            println!("Corrected: {corrected}");
        }
        println!("Valid: {reference}");
    }
    Ok(())
}
