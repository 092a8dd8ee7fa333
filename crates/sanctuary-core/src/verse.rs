use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A passage normalized across providers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Verse {
    pub reference: String,
    pub text: String,
}

impl Verse {
    pub fn new(reference: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            reference: reference.into(),
            text: text.into(),
        }
    }
}

impl fmt::Display for Verse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "\"{}\" ({})", self.text.trim(), self.reference)
    }
}

/// Built-in passages (KJV) used when the site lists none of its own, and as
/// the fallback when a remote lookup fails.
const BUILTIN_VERSES: &[(&str, &str)] = &[
    (
        "John 3:16",
        "For God so loved the world, that he gave his only begotten Son, that whosoever believeth in him should not perish, but have everlasting life.",
    ),
    ("Psalms 23:1", "The LORD is my shepherd; I shall not want."),
    (
        "Proverbs 3:5",
        "Trust in the LORD with all thine heart; and lean not unto thine own understanding.",
    ),
    (
        "Philippians 4:13",
        "I can do all things through Christ which strengtheneth me.",
    ),
    (
        "Isaiah 40:31",
        "But they that wait upon the LORD shall renew their strength; they shall mount up with wings as eagles; they shall run, and not be weary; and they shall walk, and not faint.",
    ),
    (
        "Romans 8:28",
        "And we know that all things work together for good to them that love God, to them who are the called according to his purpose.",
    ),
    ("1 John 4:8", "He that loveth not knoweth not God; for God is love."),
    (
        "Matthew 11:28",
        "Come unto me, all ye that labour and are heavy laden, and I will give you rest.",
    ),
    (
        "Joshua 1:9",
        "Have not I commanded thee? Be strong and of a good courage; be not afraid, neither be thou dismayed: for the LORD thy God is with thee whithersoever thou goest.",
    ),
    ("Psalms 46:1", "God is our refuge and strength, a very present help in trouble."),
];

/// Deterministic verse of the day: the same date always yields the same pick.
pub fn daily_verse(configured: &[Verse], date: NaiveDate) -> Verse {
    let idx = date.ordinal0() as usize;
    if configured.is_empty() {
        let (reference, text) = BUILTIN_VERSES[idx % BUILTIN_VERSES.len()];
        return Verse::new(reference, text);
    }
    configured[idx % configured.len()].clone()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn daily_verse_is_stable_for_a_date() {
        let d = date("2025-05-17");
        assert_eq!(daily_verse(&[], d), daily_verse(&[], d));
    }

    #[test]
    fn daily_verse_changes_day_to_day() {
        let a = daily_verse(&[], date("2025-05-17"));
        let b = daily_verse(&[], date("2025-05-18"));
        assert_ne!(a, b);
    }

    #[test]
    fn daily_verse_prefers_configured_list() {
        let own = vec![Verse::new("Micah 6:8", "do justly"), Verse::new("Ruth 1:16", "whither thou goest")];
        assert_eq!(daily_verse(&own, date("2025-01-01")).reference, "Micah 6:8");
        assert_eq!(daily_verse(&own, date("2025-01-02")).reference, "Ruth 1:16");
    }

    #[test]
    fn builtin_rotation_covers_every_verse() {
        let start = date("2025-01-01");
        let picks: std::collections::HashSet<_> = (0..BUILTIN_VERSES.len() as u64)
            .map(|n| daily_verse(&[], start + chrono::Days::new(n)).reference)
            .collect();
        assert_eq!(picks.len(), BUILTIN_VERSES.len());
        assert_eq!(daily_verse(&[], start).reference, "John 3:16");
    }

    #[test]
    fn display_quotes_text() {
        let v = Verse::new("Psalms 23:1", " The LORD is my shepherd; I shall not want. ");
        assert_eq!(v.to_string(), "\"The LORD is my shepherd; I shall not want.\" (Psalms 23:1)");
    }
}
