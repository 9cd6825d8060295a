//! Streak tracking rules.
//!
//! Decides how a submission at `now` affects a user's consecutive-day
//! study count, based on the calendar-day distance to the last qualifying
//! submission. Calendar days are UTC: both timestamps are truncated to
//! UTC midnight and the distance is the difference in whole days, not
//! elapsed hours. The persistence side lives in the repository; this
//! module is the pure decision.

use chrono::{DateTime, Utc};

/// Outcome of classifying a submission against the stored streak state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreakAction {
    /// No prior study date recorded: start a streak of 1.
    Start,
    /// Same calendar day as the last submission: leave the record as-is.
    AlreadyCounted,
    /// Studied exactly one calendar day ago: increment the streak.
    Extend,
    /// Gap of two or more days: reset the streak to 1.
    Reset,
}

/// Classify a submission at `now` against the last recorded study date.
///
/// A negative day distance (clock skew, backdated rows) is treated the
/// same as a same-day repeat: the streak must never move backwards.
pub fn classify(last_study_date: Option<DateTime<Utc>>, now: DateTime<Utc>) -> StreakAction {
    let Some(last) = last_study_date else {
        return StreakAction::Start;
    };

    let distance = (now.date_naive() - last.date_naive()).num_days();

    match distance {
        d if d <= 0 => StreakAction::AlreadyCounted,
        1 => StreakAction::Extend,
        _ => StreakAction::Reset,
    }
}

/// The streak value that results from applying `action` to `current`.
pub fn next_streak(action: StreakAction, current: i64) -> i64 {
    match action {
        StreakAction::Start | StreakAction::Reset => 1,
        StreakAction::Extend => current + 1,
        StreakAction::AlreadyCounted => current,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, 30, 0).unwrap()
    }

    #[test]
    fn no_prior_date_starts_a_streak() {
        assert_eq!(classify(None, at(2024, 6, 10, 9)), StreakAction::Start);
        assert_eq!(next_streak(StreakAction::Start, 0), 1);
    }

    #[test]
    fn same_day_repeat_does_not_inflate() {
        // Morning then evening of the same UTC day.
        let last = at(2024, 6, 10, 8);
        let now = at(2024, 6, 10, 22);
        assert_eq!(classify(Some(last), now), StreakAction::AlreadyCounted);
        assert_eq!(next_streak(StreakAction::AlreadyCounted, 5), 5);
    }

    #[test]
    fn next_calendar_day_extends() {
        // 23:30 to 00:30 is one hour of elapsed time but one whole
        // calendar day, and must extend the streak.
        let last = Utc.with_ymd_and_hms(2024, 6, 10, 23, 30, 0).unwrap();
        let now = Utc.with_ymd_and_hms(2024, 6, 11, 0, 30, 0).unwrap();
        assert_eq!(classify(Some(last), now), StreakAction::Extend);
        assert_eq!(next_streak(StreakAction::Extend, 5), 6);
    }

    #[test]
    fn same_day_by_calendar_despite_long_elapsed_time() {
        // 00:30 to 23:30 is 23 hours but still the same calendar day.
        let last = Utc.with_ymd_and_hms(2024, 6, 10, 0, 30, 0).unwrap();
        let now = Utc.with_ymd_and_hms(2024, 6, 10, 23, 30, 0).unwrap();
        assert_eq!(classify(Some(last), now), StreakAction::AlreadyCounted);
    }

    #[test]
    fn two_day_gap_resets() {
        let last = at(2024, 6, 10, 12);
        let now = at(2024, 6, 12, 12);
        assert_eq!(classify(Some(last), now), StreakAction::Reset);
        assert_eq!(next_streak(StreakAction::Reset, 5), 1);
    }

    #[test]
    fn long_gap_resets() {
        let last = at(2024, 6, 10, 12);
        let now = at(2024, 6, 13, 12);
        assert_eq!(classify(Some(last), now), StreakAction::Reset);
    }

    #[test]
    fn backwards_clock_is_treated_as_already_counted() {
        let last = at(2024, 6, 12, 12);
        let now = at(2024, 6, 10, 12);
        assert_eq!(classify(Some(last), now), StreakAction::AlreadyCounted);
    }

    #[test]
    fn month_boundary_extends() {
        let last = at(2024, 6, 30, 20);
        let now = at(2024, 7, 1, 7);
        assert_eq!(classify(Some(last), now), StreakAction::Extend);
    }
}
