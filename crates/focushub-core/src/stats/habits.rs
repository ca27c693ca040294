//! Habit consistency: daily completion counts and streaks.

use chrono::NaiveDate;
use serde::Serialize;

use crate::date::last_n_dates;
use crate::habits::Habit;

/// Completions across all habits for one day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DailyCompletionCount {
    pub date: NaiveDate,
    pub completed: usize,
}

/// Per-day completion totals over an explicit window of days.
pub fn completion_counts(habits: &[Habit], window: &[NaiveDate]) -> Vec<DailyCompletionCount> {
    window
        .iter()
        .map(|&date| DailyCompletionCount {
            date,
            completed: habits.iter().filter(|h| h.is_complete_on(date)).count(),
        })
        .collect()
}

/// Totals for the `days` most recent days ending at `today`, oldest first.
/// The consistency chart uses a 30-day window of these.
pub fn trailing_window(habits: &[Habit], today: NaiveDate, days: usize) -> Vec<DailyCompletionCount> {
    completion_counts(habits, &last_n_dates(today, days))
}

/// Consecutive completed days ending today. When today is still open the
/// run may end yesterday instead, so an unbroken streak reads the same all
/// day long.
pub fn current_streak(habit: &Habit, today: NaiveDate) -> u32 {
    let mut cursor = if habit.is_complete_on(today) {
        Some(today)
    } else {
        today.pred_opt()
    };
    let mut streak = 0;
    while let Some(date) = cursor {
        if !habit.is_complete_on(date) {
            break;
        }
        streak += 1;
        cursor = date.pred_opt();
    }
    streak
}

/// Longest run of consecutive completed days on record.
pub fn best_streak(habit: &Habit) -> u32 {
    let mut best = 0;
    let mut run = 0;
    let mut prev: Option<NaiveDate> = None;
    for (&date, &done) in &habit.completions {
        if !done {
            continue;
        }
        run = match prev {
            Some(p) if p.succ_opt() == Some(date) => run + 1,
            _ => 1,
        };
        prev = Some(date);
        best = best.max(run);
    }
    best
}
