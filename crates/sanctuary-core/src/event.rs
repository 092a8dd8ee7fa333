use crate::error::{Result, SanctuaryError};
use chrono::{DateTime, Datelike, Days, Local, NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Schedule
// ---------------------------------------------------------------------------

/// When an event happens.
///
/// `Fixed` keeps the raw timestamp from the page markup. A malformed value
/// only marks that one event invalid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Schedule {
    Fixed {
        at: String,
    },
    Recurring {
        /// 0 = Sunday … 6 = Saturday.
        weekday: u8,
        hour: u8,
        #[serde(default)]
        minute: u8,
    },
}

// ---------------------------------------------------------------------------
// EventDefinition
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventDefinition {
    pub title: String,
    pub schedule: Schedule,
}

impl EventDefinition {
    pub fn fixed(title: impl Into<String>, at: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            schedule: Schedule::Fixed { at: at.into() },
        }
    }

    pub fn recurring(title: impl Into<String>, weekday: u8, hour: u8, minute: u8) -> Self {
        Self {
            title: title.into(),
            schedule: Schedule::Recurring {
                weekday,
                hour,
                minute,
            },
        }
    }

    /// The concrete start time this event refers to relative to `now`.
    ///
    /// For a fixed event that is the parsed timestamp regardless of `now`.
    /// For a recurring event it is the next matching slot on or after `now`.
    pub fn resolve(&self, now: NaiveDateTime) -> Result<NaiveDateTime> {
        match &self.schedule {
            Schedule::Fixed { at } => parse_timestamp(at),
            Schedule::Recurring {
                weekday,
                hour,
                minute,
            } => next_weekly(now, *weekday, *hour, *minute),
        }
    }
}

// ---------------------------------------------------------------------------
// Timestamp parsing
// ---------------------------------------------------------------------------

const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
];

/// Parse a timestamp from page markup into local wall time.
///
/// Accepts ISO-like local forms with or without seconds, a bare date
/// (midnight), and RFC 3339 with an offset (converted to local time).
pub fn parse_timestamp(raw: &str) -> Result<NaiveDateTime> {
    let s = raw.trim();
    if s.is_empty() {
        return Err(SanctuaryError::InvalidTimestamp(raw.to_string()));
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Local).naive_local());
    }

    for fmt in NAIVE_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Ok(dt);
        }
    }

    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map(|d| d.and_time(NaiveTime::MIN))
        .map_err(|_| SanctuaryError::InvalidTimestamp(raw.to_string()))
}

// ---------------------------------------------------------------------------
// Weekly recurrence
// ---------------------------------------------------------------------------

/// Next instant on or after `now` falling on `weekday` at `hour:minute`.
///
/// Today's slot counts until its start second has passed; after that the
/// slot rolls to the same weekday next week.
pub fn next_weekly(now: NaiveDateTime, weekday: u8, hour: u8, minute: u8) -> Result<NaiveDateTime> {
    if weekday > 6 {
        return Err(SanctuaryError::InvalidSchedule(format!(
            "weekday {weekday} is outside 0-6"
        )));
    }
    let target = NaiveTime::from_hms_opt(hour.into(), minute.into(), 0).ok_or_else(|| {
        SanctuaryError::InvalidSchedule(format!("{hour:02}:{minute:02} is not a time of day"))
    })?;

    let today = now.weekday().num_days_from_sunday();
    let mut delta = (u32::from(weekday) + 7 - today) % 7;
    let now_hms = (now.hour(), now.minute(), now.second());
    if delta == 0 && now_hms > (target.hour(), target.minute(), 0) {
        delta = 7;
    }

    now.date()
        .checked_add_days(Days::new(delta.into()))
        .map(|date| date.and_time(target))
        .ok_or_else(|| SanctuaryError::InvalidSchedule("date out of range".to_string()))
}

pub fn weekday_name(weekday: u8) -> &'static str {
    match weekday {
        0 => "Sunday",
        1 => "Monday",
        2 => "Tuesday",
        3 => "Wednesday",
        4 => "Thursday",
        5 => "Friday",
        6 => "Saturday",
        _ => "Unknown",
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
