use crate::event::EventDefinition;
use chrono::{NaiveDateTime, TimeDelta};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Default span after an event's start during which it is "happening now".
pub const DEFAULT_IMMINENT_WINDOW_MINUTES: i64 = 180;

pub const IMMINENT_PHRASE: &str = "Happening now";
pub const CONCLUDED_PHRASE: &str = "Event concluded";
pub const INVALID_PHRASE: &str = "Date unavailable";

pub fn default_imminent_window() -> TimeDelta {
    TimeDelta::minutes(DEFAULT_IMMINENT_WINDOW_MINUTES)
}

// ---------------------------------------------------------------------------
// Status
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    Upcoming,
    Imminent,
    Concluded,
    Invalid,
}

impl Status {
    pub fn as_str(self) -> &'static str {
        match self {
            Status::Upcoming => "upcoming",
            Status::Imminent => "imminent",
            Status::Concluded => "concluded",
            Status::Invalid => "invalid",
        }
    }

    /// Whether an occurrence with this status may be picked as the next event.
    pub fn is_selectable(self) -> bool {
        matches!(self, Status::Upcoming | Status::Imminent)
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Remaining
// ---------------------------------------------------------------------------

/// Whole seconds until an occurrence, floored.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Remaining(i64);

impl Remaining {
    /// Floors `delta` to whole seconds; negative spans clamp to zero.
    pub fn from_delta(delta: TimeDelta) -> Self {
        Self(delta.num_seconds().max(0))
    }

    pub fn total_seconds(self) -> i64 {
        self.0
    }

    pub fn days(self) -> i64 {
        self.0 / 86_400
    }

    pub fn hours(self) -> i64 {
        self.0 % 86_400 / 3_600
    }

    pub fn minutes(self) -> i64 {
        self.0 % 3_600 / 60
    }

    pub fn seconds(self) -> i64 {
        self.0 % 60
    }
}

impl fmt::Display for Remaining {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}d {}h {}m {}s",
            self.days(),
            self.hours(),
            self.minutes(),
            self.seconds()
        )
    }
}

// ---------------------------------------------------------------------------
// Occurrence
// ---------------------------------------------------------------------------

/// One event evaluated against one reference instant.
///
/// Never cached: a new `Occurrence` is produced on every tick.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Occurrence {
    pub status: Status,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub at: Option<NaiveDateTime>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remaining: Option<Remaining>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Occurrence {
    fn invalid(error: String) -> Self {
        Self {
            status: Status::Invalid,
            at: None,
            remaining: None,
            error: Some(error),
        }
    }

    /// Human-readable countdown text for this occurrence.
    pub fn phrase(&self) -> String {
        match (self.status, self.remaining) {
            (Status::Upcoming, Some(r)) => r.to_string(),
            (Status::Upcoming, None) => Remaining::default().to_string(),
            (Status::Imminent, _) => IMMINENT_PHRASE.to_string(),
            (Status::Concluded, _) => CONCLUDED_PHRASE.to_string(),
            (Status::Invalid, _) => INVALID_PHRASE.to_string(),
        }
    }
}

/// Evaluate a concrete start time against `now`.
///
/// Strictly in the future is `upcoming`. At or before `now` but less than
/// `window` ago is `imminent`. Anything older is `concluded`.
pub fn classify(at: NaiveDateTime, now: NaiveDateTime, window: TimeDelta) -> Occurrence {
    let diff = at - now;
    if diff > TimeDelta::zero() {
        return Occurrence {
            status: Status::Upcoming,
            at: Some(at),
            remaining: Some(Remaining::from_delta(diff)),
            error: None,
        };
    }

    let status = if -diff < window {
        Status::Imminent
    } else {
        Status::Concluded
    };
    Occurrence {
        status,
        at: Some(at),
        remaining: None,
        error: None,
    }
}

/// Compute the next occurrence of `event` relative to `now`.
///
/// Malformed definitions come back as `invalid` rather than an error.
pub fn compute_occurrence(
    event: &EventDefinition,
    now: NaiveDateTime,
    window: TimeDelta,
) -> Occurrence {
    match event.resolve(now) {
        Ok(at) => classify(at, now, window),
        Err(e) => {
            tracing::debug!(title = %event.title, error = %e, "event degraded to invalid");
            Occurrence::invalid(e.to_string())
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
