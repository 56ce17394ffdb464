//! Repeat-rule expansion.
//!
//! Occurrences are computed on the reminder's *local* wall-clock: add whole
//! days to the naive local time, then reattach the recorded offset. For the
//! fixed offsets we persist this is exact, and it keeps the recorded
//! time-of-day stable instead of drifting through elapsed-seconds arithmetic.

use chrono::{DateTime, Duration, FixedOffset, TimeZone, Utc};

use wellkit_core::reminder::RepeatRule;

/// The single next occurrence after `current`, or `None` for one-shot
/// reminders.
pub fn next_occurrence(
    current: DateTime<FixedOffset>,
    rule: RepeatRule,
) -> Option<DateTime<FixedOffset>> {
    let days = match rule {
        RepeatRule::None => return None,
        RepeatRule::Daily => 1,
        RepeatRule::Weekly => 7,
    };
    let offset = *current.offset();
    let local = current.naive_local() + Duration::days(days);
    offset.from_local_datetime(&local).single()
}

/// The first occurrence after `current` that is strictly later than `now`.
///
/// When the engine was down across several periods, the intermediate
/// occurrences are skipped — they are never delivered retroactively.
pub fn next_after(
    current: DateTime<FixedOffset>,
    rule: RepeatRule,
    now: DateTime<Utc>,
) -> Option<DateTime<FixedOffset>> {
    let mut next = next_occurrence(current, rule)?;
    while next <= now {
        next = next_occurrence(next, rule)?;
    }
    Some(next)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(s: &str) -> DateTime<FixedOffset> {
        s.parse().expect("timestamp")
    }

    #[test]
    fn none_never_recurs() {
        assert!(next_occurrence(at("2025-10-21T15:30:00+05:30"), RepeatRule::None).is_none());
    }

    #[test]
    fn daily_adds_one_day_preserving_wall_clock() {
        let next = next_occurrence(at("2025-10-21T07:00:00+05:30"), RepeatRule::Daily).unwrap();
        assert_eq!(next.to_rfc3339(), "2025-10-22T07:00:00+05:30");
    }

    #[test]
    fn weekly_adds_seven_days_preserving_wall_clock() {
        let next = next_occurrence(at("2025-10-21T22:15:00-08:00"), RepeatRule::Weekly).unwrap();
        assert_eq!(next.to_rfc3339(), "2025-10-28T22:15:00-08:00");
    }

    #[test]
    fn two_daily_expansions_are_exactly_48h() {
        let start = at("2025-10-21T07:00:00+05:30");
        let once = next_occurrence(start, RepeatRule::Daily).unwrap();
        let twice = next_occurrence(once, RepeatRule::Daily).unwrap();
        assert_eq!(twice - start, Duration::hours(48));
        assert_eq!(twice.to_rfc3339(), "2025-10-23T07:00:00+05:30");
    }

    #[test]
    fn next_after_skips_missed_occurrences() {
        // Engine was down for three days; the catch-up lands on the first
        // strictly-future slot, not on the backlog.
        let last = at("2025-10-21T07:00:00+05:30");
        let now = at("2025-10-24T06:00:00+05:30").with_timezone(&Utc);
        let next = next_after(last, RepeatRule::Daily, now).unwrap();
        assert_eq!(next.to_rfc3339(), "2025-10-24T07:00:00+05:30");
    }

    #[test]
    fn next_after_is_strictly_future() {
        // now exactly on an occurrence boundary: that slot is already spent.
        let last = at("2025-10-21T07:00:00+00:00");
        let now = at("2025-10-22T07:00:00+00:00").with_timezone(&Utc);
        let next = next_after(last, RepeatRule::Daily, now).unwrap();
        assert_eq!(next.to_rfc3339(), "2025-10-23T07:00:00+00:00");
    }

    #[test]
    fn subsecond_precision_survives_expansion() {
        let next = next_occurrence(at("2025-10-21T07:00:00.250+02:00"), RepeatRule::Daily).unwrap();
        assert_eq!(next.to_rfc3339(), "2025-10-22T07:00:00.250+02:00");
    }
}
