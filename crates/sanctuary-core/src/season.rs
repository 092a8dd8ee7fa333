use chrono::{Datelike, Days, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// Season
// ---------------------------------------------------------------------------

/// Liturgical season driving the site's visual theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Season {
    Advent,
    Christmas,
    Epiphany,
    Lent,
    Easter,
    Ordinary,
}

impl Season {
    pub fn as_str(self) -> &'static str {
        match self {
            Season::Advent => "advent",
            Season::Christmas => "christmas",
            Season::Epiphany => "epiphany",
            Season::Lent => "lent",
            Season::Easter => "easter",
            Season::Ordinary => "ordinary",
        }
    }

    pub fn for_date(date: NaiveDate) -> Season {
        let year = date.year();
        let (month, day) = (date.month(), date.day());

        if (month == 12 && day >= 25) || (month == 1 && day <= 5) {
            return Season::Christmas;
        }
        if advent_sunday(year).is_some_and(|advent| date >= advent) {
            return Season::Advent;
        }

        let Some(easter) = easter_sunday(year) else {
            return Season::Ordinary;
        };
        let ash_wednesday = easter - Days::new(46);
        let pentecost = easter + Days::new(49);

        if date >= ash_wednesday && date < easter {
            Season::Lent
        } else if date >= easter && date <= pentecost {
            Season::Easter
        } else if date < ash_wednesday {
            Season::Epiphany
        } else {
            Season::Ordinary
        }
    }
}

impl fmt::Display for Season {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Easter Sunday in the Gregorian calendar (anonymous algorithm).
pub fn easter_sunday(year: i32) -> Option<NaiveDate> {
    let a = year % 19;
    let b = year / 100;
    let c = year % 100;
    let d = b / 4;
    let e = b % 4;
    let f = (b + 8) / 25;
    let g = (b - f + 1) / 3;
    let h = (19 * a + b - d - g + 15) % 30;
    let i = c / 4;
    let k = c % 4;
    let l = (32 + 2 * e + 2 * i - h - k) % 7;
    let m = (a + 11 * h + 22 * l) / 451;
    let month = (h + l - 7 * m + 114) / 31;
    let day = (h + l - 7 * m + 114) % 31 + 1;
    NaiveDate::from_ymd_opt(year, month as u32, day as u32)
}

/// First Sunday of Advent: the fourth Sunday before Christmas Day.
pub fn advent_sunday(year: i32) -> Option<NaiveDate> {
    let christmas = NaiveDate::from_ymd_opt(year, 12, 25)?;
    let back = match christmas.weekday().num_days_from_sunday() {
        0 => 7,
        n => n,
    };
    christmas.checked_sub_days(Days::new(u64::from(back) + 21))
}

// ---------------------------------------------------------------------------
// Theme
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Theme {
    pub season: Season,
    /// CSS class applied to the page body.
    pub css_class: String,
    pub accent: String,
}

impl Theme {
    pub fn for_date(date: NaiveDate) -> Theme {
        let season = Season::for_date(date);
        let accent = match season {
            Season::Advent | Season::Lent => "#5b2a86",
            Season::Christmas | Season::Easter => "#d4af37",
            Season::Epiphany | Season::Ordinary => "#2e7d32",
        };
        Theme {
            season,
            css_class: format!("theme-{}", season.as_str()),
            accent: accent.to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn easter_known_years() {
        assert_eq!(easter_sunday(2024), Some(date("2024-03-31")));
        assert_eq!(easter_sunday(2025), Some(date("2025-04-20")));
        assert_eq!(easter_sunday(2026), Some(date("2026-04-05")));
        assert_eq!(easter_sunday(2000), Some(date("2000-04-23")));
    }

    #[test]
    fn advent_known_years() {
        assert_eq!(advent_sunday(2022), Some(date("2022-11-27")));
        assert_eq!(advent_sunday(2024), Some(date("2024-12-01")));
        assert_eq!(advent_sunday(2025), Some(date("2025-11-30")));
    }

    #[test]
    fn seasons_through_2025() {
        let cases = [
            ("2025-01-01", Season::Christmas),
            ("2025-01-05", Season::Christmas),
            ("2025-01-06", Season::Epiphany),
            ("2025-03-04", Season::Epiphany),
            ("2025-03-05", Season::Lent),
            ("2025-04-19", Season::Lent),
            ("2025-04-20", Season::Easter),
            ("2025-06-08", Season::Easter),
            ("2025-06-09", Season::Ordinary),
            ("2025-11-29", Season::Ordinary),
            ("2025-11-30", Season::Advent),
            ("2025-12-24", Season::Advent),
            ("2025-12-25", Season::Christmas),
        ];
        for (d, expected) in cases {
            assert_eq!(Season::for_date(date(d)), expected, "{d}");
        }
    }

    #[test]
    fn theme_carries_css_class() {
        let theme = Theme::for_date(date("2025-03-10"));
        assert_eq!(theme.season, Season::Lent);
        assert_eq!(theme.css_class, "theme-lent");
    }
}
