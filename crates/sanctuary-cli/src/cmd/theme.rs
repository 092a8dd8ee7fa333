use crate::cmd::resolve_now;
use crate::output::print_json;
use chrono::Datelike;
use sanctuary_core::season::{easter_sunday, Theme};

pub fn run(at: Option<&str>, json: bool) -> anyhow::Result<()> {
    let date = resolve_now(at)?.date();
    let theme = Theme::for_date(date);

    if json {
        print_json(&theme)?;
    } else {
        println!("Season: {}", theme.season.as_str());
        println!("Class:  {}", theme.css_class);
        println!("Accent: {}", theme.accent);
        if let Some(easter) = easter_sunday(date.year()) {
            println!("Easter: {}", easter.format("%B %-d, %Y"));
        }
    }
    Ok(())
}
