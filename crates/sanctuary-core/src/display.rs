//! Display state written on every countdown tick.
//!
//! The page (or terminal) owns rendering. Everything here produces derived
//! text and hands it to a [`DisplaySink`], so the same tick can drive a live
//! document, a terminal, or a recording sink in tests.

use crate::banner::rotate_banner;
use crate::config::Config;
use crate::event::EventDefinition;
use crate::occurrence::{Occurrence, Status, IMMINENT_PHRASE};
use crate::season::Theme;
use crate::select::{evaluate_all, select_next, NextEvent};
use crate::verse::Verse;
use chrono::{NaiveDateTime, TimeDelta};
use serde::{Deserialize, Serialize};
use std::fmt;

/// `Sunday, December 24, 2025 at 7:00 PM`
pub const DATE_FORMAT: &str = "%A, %B %-d, %Y at %-I:%M %p";

pub const NONE_SCHEDULED_PHRASE: &str = "No upcoming events scheduled";

// ---------------------------------------------------------------------------
// DisplaySink
// ---------------------------------------------------------------------------

/// Where derived display state goes.
pub trait DisplaySink {
    fn set_countdown(&mut self, index: usize, display: &EventDisplay);
    fn set_next_event(&mut self, summary: &NextEventSummary);
    fn set_banner(&mut self, text: &str);
    fn set_theme(&mut self, theme: &Theme);
    fn set_verse(&mut self, verse: &Verse);
}

// ---------------------------------------------------------------------------
// EventDisplay
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventDisplay {
    pub title: String,
    pub status: Status,
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
}

impl EventDisplay {
    pub fn new(event: &EventDefinition, occurrence: &Occurrence) -> Self {
        Self {
            title: event.title.clone(),
            status: occurrence.status,
            text: occurrence.phrase(),
            date: occurrence.at.map(format_date),
        }
    }
}

pub fn format_date(at: NaiveDateTime) -> String {
    at.format(DATE_FORMAT).to_string()
}

// ---------------------------------------------------------------------------
// NextEventSummary
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum NextEventSummary {
    Scheduled {
        title: String,
        date: String,
        remaining: String,
    },
    NoneScheduled,
}

impl NextEventSummary {
    pub fn from_selection(next: Option<&NextEvent<'_>>) -> Self {
        let Some(next) = next else {
            return NextEventSummary::NoneScheduled;
        };
        let remaining = match next.occurrence.status {
            Status::Imminent => IMMINENT_PHRASE.to_string(),
            _ => format!("in {}", next.occurrence.phrase()),
        };
        NextEventSummary::Scheduled {
            title: next.event.title.clone(),
            date: next.occurrence.at.map(format_date).unwrap_or_default(),
            remaining,
        }
    }
}

impl fmt::Display for NextEventSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NextEventSummary::Scheduled {
                title,
                date,
                remaining,
            } => write!(f, "{title}: {date} ({remaining})"),
            NextEventSummary::NoneScheduled => f.write_str(NONE_SCHEDULED_PHRASE),
        }
    }
}

// ---------------------------------------------------------------------------
// Tick rendering
// ---------------------------------------------------------------------------

/// Write every event's countdown and the next-event summary for `now`.
///
/// Returns the index of the selected next event, if any. Safe to call on
/// every tick: output depends only on the arguments.
pub fn render_events<S: DisplaySink + ?Sized>(
    events: &[EventDefinition],
    now: NaiveDateTime,
    window: TimeDelta,
    sink: &mut S,
) -> Option<usize> {
    for (index, (event, occurrence)) in events
        .iter()
        .zip(evaluate_all(events, now, window))
        .enumerate()
    {
        sink.set_countdown(index, &EventDisplay::new(event, &occurrence));
    }

    let next = select_next(events, now, window);
    sink.set_next_event(&NextEventSummary::from_selection(next.as_ref()));
    next.map(|n| n.index)
}

/// One full page tick: countdowns, rotating banner and seasonal theme.
pub fn render_tick<S: DisplaySink + ?Sized>(
    config: &Config,
    now: NaiveDateTime,
    sink: &mut S,
) -> Option<usize> {
    let next = render_events(&config.events, now, config.imminent_window(), sink);
    if let Some(text) = rotate_banner(&config.banner.messages, now, config.banner_period()) {
        sink.set_banner(text);
    }
    sink.set_theme(&Theme::for_date(now.date()));
    next
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::season::Season;

    #[derive(Default)]
    struct RecordingSink {
        countdowns: Vec<(usize, EventDisplay)>,
        next: Vec<NextEventSummary>,
        banners: Vec<String>,
        themes: Vec<Theme>,
        verses: Vec<Verse>,
    }

    impl DisplaySink for RecordingSink {
        fn set_countdown(&mut self, index: usize, display: &EventDisplay) {
            self.countdowns.push((index, display.clone()));
        }
        fn set_next_event(&mut self, summary: &NextEventSummary) {
            self.next.push(summary.clone());
        }
        fn set_banner(&mut self, text: &str) {
            self.banners.push(text.to_string());
        }
        fn set_theme(&mut self, theme: &Theme) {
            self.themes.push(theme.clone());
        }
        fn set_verse(&mut self, verse: &Verse) {
            self.verses.push(verse.clone());
        }
    }

    fn at(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").unwrap()
    }

    fn events() -> Vec<EventDefinition> {
        vec![
            EventDefinition::recurring("Youth Night", 5, 19, 0),
            EventDefinition::fixed("Broken", "whenever"),
            EventDefinition::fixed("Harvest Supper", "2024-10-01T18:00"),
        ]
    }

    #[test]
    fn render_events_writes_every_event_and_summary() {
        let mut sink = RecordingSink::default();
        let next = render_events(
            &events(),
            at("2025-01-01 10:00:00"),
            TimeDelta::hours(3),
            &mut sink,
        );
        assert_eq!(next, Some(0));
        assert_eq!(sink.countdowns.len(), 3);
        assert_eq!(sink.countdowns[0].1.text, "2d 9h 0m 0s");
        assert_eq!(sink.countdowns[1].1.status, Status::Invalid);
        assert_eq!(sink.countdowns[1].1.text, "Date unavailable");
        assert!(sink.countdowns[1].1.date.is_none());
        assert_eq!(sink.countdowns[2].1.text, "Event concluded");
        assert_eq!(
            sink.next[0],
            NextEventSummary::Scheduled {
                title: "Youth Night".into(),
                date: "Friday, January 3, 2025 at 7:00 PM".into(),
                remaining: "in 2d 9h 0m 0s".into(),
            }
        );
    }

    #[test]
    fn render_is_idempotent() {
        let now = at("2025-01-01 10:00:00");
        let mut a = RecordingSink::default();
        let mut b = RecordingSink::default();
        render_events(&events(), now, TimeDelta::hours(3), &mut a);
        render_events(&events(), now, TimeDelta::hours(3), &mut a);
        render_events(&events(), now, TimeDelta::hours(3), &mut b);
        assert_eq!(a.countdowns[..3], a.countdowns[3..]);
        assert_eq!(a.countdowns[..3], b.countdowns[..]);
        assert_eq!(a.next[0], a.next[1]);
    }

    #[test]
    fn no_qualifying_event_reports_none_scheduled() {
        let mut sink = RecordingSink::default();
        let only_past = vec![EventDefinition::fixed("Harvest Supper", "2024-10-01T18:00")];
        let next = render_events(&only_past, at("2025-01-01 10:00:00"), TimeDelta::hours(3), &mut sink);
        assert!(next.is_none());
        assert_eq!(sink.next[0], NextEventSummary::NoneScheduled);
        assert_eq!(sink.next[0].to_string(), NONE_SCHEDULED_PHRASE);
    }

    #[test]
    fn imminent_summary_says_happening_now() {
        let mut sink = RecordingSink::default();
        let events = vec![EventDefinition::fixed("Concert", "2025-01-01T09:30")];
        render_events(&events, at("2025-01-01 10:00:00"), TimeDelta::hours(3), &mut sink);
        let NextEventSummary::Scheduled { remaining, .. } = &sink.next[0] else {
            panic!("expected a scheduled summary")
        };
        assert_eq!(remaining, IMMINENT_PHRASE);
    }

    #[test]
    fn render_tick_sets_banner_and_theme() {
        let mut cfg = Config::new("Grace");
        cfg.events = events();
        let mut sink = RecordingSink::default();
        render_tick(&cfg, at("2025-12-01 10:00:00"), &mut sink);
        assert_eq!(sink.banners.len(), 1);
        assert_eq!(sink.themes[0].season, Season::Advent);
        assert!(sink.verses.is_empty());
    }

    #[test]
    fn summary_display_format() {
        let s = NextEventSummary::Scheduled {
            title: "Sunday Worship".into(),
            date: "Sunday, January 5, 2025 at 10:30 AM".into(),
            remaining: "in 3d 0h 30m 0s".into(),
        };
        assert_eq!(
            s.to_string(),
            "Sunday Worship: Sunday, January 5, 2025 at 10:30 AM (in 3d 0h 30m 0s)"
        );
    }
}
