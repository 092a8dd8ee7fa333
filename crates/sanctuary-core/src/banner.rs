use chrono::{NaiveDateTime, TimeDelta};

/// Hero banner messages used when the site config lists none.
pub const DEFAULT_BANNERS: &[&str] = &[
    "Welcome home. All are welcome here.",
    "Join us Sunday for worship and fellowship.",
    "Grow in faith through weekly Bible study.",
];

/// Banner to show at `now` when rotating through `messages` every `period`.
///
/// Derived from the clock alone, so every tick inside the same period agrees.
pub fn rotate_banner<S: AsRef<str>>(
    messages: &[S],
    now: NaiveDateTime,
    period: TimeDelta,
) -> Option<&str> {
    if messages.is_empty() {
        return None;
    }
    let period_secs = period.num_seconds().max(1);
    let slot = now.and_utc().timestamp().div_euclid(period_secs);
    let idx = slot.rem_euclid(messages.len() as i64) as usize;
    Some(messages[idx].as_ref())
}
