use chrono::{Datelike, NaiveDate};
use serde::Serialize;

use super::types::{GoalKind, Projection};

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GoalStatus {
    Completed,
    Overdue,
    Ahead,
    OnTrack,
    Behind,
}

pub fn due_date(kind: GoalKind, target_year: i32) -> Option<NaiveDate> {
    let (month, day) = kind.due_month_day();
    NaiveDate::from_ymd_opt(target_year, month, day)
}

/// Whole days from `as_of` until the goal falls due, never negative.
/// Years beyond the calendar's range saturate in their direction.
pub fn days_remaining(kind: GoalKind, target_year: i32, as_of: NaiveDate) -> i64 {
    match due_date(kind, target_year) {
        Some(due) => (due - as_of).num_days().max(0),
        None if target_year > as_of.year() => i64::MAX,
        None => 0,
    }
}

pub fn classify_status(progress_percent: f64, days_remaining: i64) -> GoalStatus {
    if progress_percent >= 100.0 {
        return GoalStatus::Completed;
    }
    if days_remaining <= 0 {
        return GoalStatus::Overdue;
    }

    let time_progress = (100.0 - days_remaining as f64 / 365.0 * 100.0).max(0.0);
    if progress_percent >= time_progress * 1.1 {
        GoalStatus::Ahead
    } else if progress_percent >= time_progress * 0.9 {
        GoalStatus::OnTrack
    } else {
        GoalStatus::Behind
    }
}

pub fn status_for(projection: &Projection, days_remaining: i64) -> GoalStatus {
    classify_status(projection.progress_projected_raw * 100.0, days_remaining)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    #[test]
    fn due_dates_follow_goal_kind() {
        assert_eq!(due_date(GoalKind::Education, 2030), Some(date(2030, 6, 1)));
        assert_eq!(due_date(GoalKind::Marriage, 2030), Some(date(2030, 6, 1)));
        assert_eq!(due_date(GoalKind::Investment, 2030), Some(date(2030, 12, 31)));
    }

    #[test]
    fn days_remaining_counts_to_due_date() {
        let as_of = date(2026, 10, 17);
        assert_eq!(days_remaining(GoalKind::Investment, 2026, as_of), 75);
        assert_eq!(days_remaining(GoalKind::Marriage, 2027, as_of), 227);
    }

    #[test]
    fn days_remaining_never_negative() {
        let as_of = date(2026, 10, 17);
        assert_eq!(days_remaining(GoalKind::Education, 2026, as_of), 0);
        assert_eq!(days_remaining(GoalKind::Investment, 2020, as_of), 0);
    }

    #[test]
    fn out_of_calendar_years_saturate() {
        let as_of = date(2026, 10, 17);
        let far = days_remaining(GoalKind::Investment, 300_000, as_of);
        assert_eq!(far, i64::MAX);
        assert_eq!(classify_status(10.0, far), GoalStatus::Ahead);
        assert_eq!(days_remaining(GoalKind::Marriage, -300_000, as_of), 0);
    }

    #[test]
    fn completed_wins_over_overdue() {
        assert_eq!(classify_status(100.0, 0), GoalStatus::Completed);
        assert_eq!(classify_status(250.0, 900), GoalStatus::Completed);
    }

    #[test]
    fn past_due_without_full_funding_is_overdue() {
        assert_eq!(classify_status(99.9, 0), GoalStatus::Overdue);
    }

    #[test]
    fn long_horizons_are_never_behind() {
        // More than a year out, the expected time progress is zero.
        assert_eq!(classify_status(0.0, 800), GoalStatus::Ahead);
    }

    #[test]
    fn short_horizons_compare_against_elapsed_time() {
        // 73 days left: expected progress is 80%.
        assert_eq!(classify_status(90.0, 73), GoalStatus::Ahead);
        assert_eq!(classify_status(80.0, 73), GoalStatus::OnTrack);
        assert_eq!(classify_status(50.0, 73), GoalStatus::Behind);
    }
}
