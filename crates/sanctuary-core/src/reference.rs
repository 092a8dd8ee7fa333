use crate::error::{Result, SanctuaryError};
use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::OnceLock;

// ---------------------------------------------------------------------------
// Spelling corrections
// ---------------------------------------------------------------------------

/// Common misspellings of book names, matched as whole words ignoring case.
const CORRECTIONS: &[(&str, &str)] = &[
    ("jhon", "John"),
    ("jonh", "John"),
    ("mathew", "Matthew"),
    ("matthw", "Matthew"),
    ("psalm", "Psalms"),
    ("pslams", "Psalms"),
    ("proverb", "Proverbs"),
    ("revelations", "Revelation"),
    ("genisis", "Genesis"),
    ("genesys", "Genesis"),
    ("exodis", "Exodus"),
    ("duetronomy", "Deuteronomy"),
    ("deutronomy", "Deuteronomy"),
    ("isiah", "Isaiah"),
    ("jeremaiah", "Jeremiah"),
    ("ezekial", "Ezekiel"),
    ("lamentation", "Lamentations"),
    ("romams", "Romans"),
    ("corinthans", "Corinthians"),
    ("phillipians", "Philippians"),
    ("philipians", "Philippians"),
    ("colosians", "Colossians"),
    ("thesalonians", "Thessalonians"),
    ("hebrew", "Hebrews"),
    ("ecclesiastics", "Ecclesiastes"),
];

fn correction_patterns() -> &'static [(Regex, &'static str)] {
    static PATTERNS: OnceLock<Vec<(Regex, &'static str)>> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        CORRECTIONS
            .iter()
            .filter_map(|(wrong, right)| {
                RegexBuilder::new(&format!(r"\b{}\b", regex::escape(wrong)))
                    .case_insensitive(true)
                    .build()
                    .ok()
                    .map(|re| (re, *right))
            })
            .collect()
    })
}

/// Replace known book-name misspellings.
pub fn correct_spelling(input: &str) -> String {
    let mut out = input.to_string();
    for (re, right) in correction_patterns() {
        if re.is_match(&out) {
            out = re.replace_all(&out, *right).into_owned();
        }
    }
    out
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn reference_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^(?:([1-3])\s*)?([A-Za-z][A-Za-z ]*?)\s+(\d{1,3}):(\d{1,3})$")
            .expect("reference pattern is valid")
    })
}

/// Whether `input` has the shape `[1-3] Book chapter:verse`.
pub fn is_valid_reference(input: &str) -> bool {
    reference_re().is_match(input.trim())
}

// ---------------------------------------------------------------------------
// Reference
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reference {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub book_number: Option<u8>,
    pub book: String,
    pub chapter: u16,
    pub verse: u16,
}

impl Reference {
    /// Correct spelling, then validate and split a user-entered reference.
    pub fn parse(input: &str) -> Result<Self> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(SanctuaryError::EmptyReference);
        }
        let corrected = correct_spelling(trimmed);
        let caps = reference_re()
            .captures(&corrected)
            .ok_or_else(|| SanctuaryError::InvalidReference(trimmed.to_string()))?;

        let invalid = || SanctuaryError::InvalidReference(trimmed.to_string());
        let book_number = caps.get(1).and_then(|m| m.as_str().parse().ok());
        let book = caps[2].split_whitespace().collect::<Vec<_>>().join(" ");
        let chapter = caps[3].parse().map_err(|_| invalid())?;
        let verse = caps[4].parse().map_err(|_| invalid())?;

        Ok(Self {
            book_number,
            book,
            chapter,
            verse,
        })
    }

    /// Form used in provider URLs, e.g. `1+john+4:8`.
    pub fn url_path(&self) -> String {
        self.to_string().to_lowercase().replace(' ', "+")
    }
}

impl fmt::Display for Reference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(n) = self.book_number {
            write!(f, "{n} ")?;
        }
        write!(f, "{} {}:{}", self.book, self.chapter, self.verse)
    }
}

impl std::str::FromStr for Reference {
    type Err = SanctuaryError;

    fn from_str(s: &str) -> Result<Self> {
        Reference::parse(s)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
