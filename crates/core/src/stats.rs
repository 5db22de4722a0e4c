//! Dashboard aggregates built on top of workout summaries.

use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::constants::DASHBOARD_RECENT_COUNT;
use crate::metrics::WorkoutSummary;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DashboardStats {
    pub workouts_this_month: usize,
    pub volume_this_month: f64,
    pub active_routines: usize,
    /// Consecutive training days ending today (or yesterday, if today is still open).
    pub current_streak: u32,
    pub total_workouts: usize,
    pub recent: Vec<WorkoutSummary>,
}

impl DashboardStats {
    /// `summaries` must be sorted most recent first.
    pub fn compute(summaries: &[WorkoutSummary], active_routines: usize, today: NaiveDate) -> Self {
        let this_month: Vec<&WorkoutSummary> = summaries
            .iter()
            .filter(|s| s.date.year() == today.year() && s.date.month() == today.month())
            .collect();
        Self {
            workouts_this_month: this_month.len(),
            volume_this_month: this_month.iter().map(|s| s.total_volume).sum(),
            active_routines,
            current_streak: current_streak(summaries.iter().map(|s| s.date), today),
            total_workouts: summaries.len(),
            recent: summaries.iter().take(DASHBOARD_RECENT_COUNT).cloned().collect(),
        }
    }
}

fn current_streak(dates: impl Iterator<Item = NaiveDate>, today: NaiveDate) -> u32 {
    let mut days: Vec<NaiveDate> = dates.filter(|d| *d <= today).collect();
    days.sort_unstable_by(|a, b| b.cmp(a));
    days.dedup();

    let mut expected = match days.first() {
        Some(first) if *first == today => today,
        Some(first) if *first == today - Duration::days(1) => *first,
        _ => return 0,
    };
    let mut streak = 0_u32;
    for day in days {
        if day != expected {
            break;
        }
        streak = streak.saturating_add(1);
        match expected.pred_opt() {
            Some(previous) => expected = previous,
            None => break,
        }
    }
    streak
}
