use crate::event::EventDefinition;
use crate::occurrence::{compute_occurrence, Occurrence};
use chrono::{NaiveDateTime, TimeDelta};

/// The single soonest upcoming (or in-progress) event across a set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NextEvent<'a> {
    /// Position of the event in the input slice.
    pub index: usize,
    pub event: &'a EventDefinition,
    pub occurrence: Occurrence,
}

/// Evaluate every event against `now`, in input order.
pub fn evaluate_all(
    events: &[EventDefinition],
    now: NaiveDateTime,
    window: TimeDelta,
) -> Vec<Occurrence> {
    events
        .iter()
        .map(|e| compute_occurrence(e, now, window))
        .collect()
}

/// Pick the event whose occurrence is closest to `now`.
///
/// Only `upcoming` and `imminent` occurrences qualify. An in-progress event
/// has a negative offset so it sorts ahead of anything still to come. Ties go
/// to the event listed first.
pub fn select_next<'a>(
    events: &'a [EventDefinition],
    now: NaiveDateTime,
    window: TimeDelta,
) -> Option<NextEvent<'a>> {
    let mut best: Option<NextEvent<'a>> = None;

    for (index, event) in events.iter().enumerate() {
        let occurrence = compute_occurrence(event, now, window);
        if !occurrence.status.is_selectable() {
            continue;
        }
        let Some(at) = occurrence.at else {
            continue;
        };

        let closer = match best.as_ref().and_then(|b| b.occurrence.at) {
            Some(current) => at < current,
            None => true,
        };
        if closer {
            best = Some(NextEvent {
                index,
                event,
                occurrence,
            });
        }
    }

    best
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
