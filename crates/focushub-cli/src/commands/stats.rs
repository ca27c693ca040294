use chrono::Utc;
use clap::Subcommand;
use focushub_core::stats::{self, DailyCompletionCount};
use focushub_core::FocusSession;
use serde::Serialize;

use super::{print_json, Hub};

#[derive(Subcommand)]
pub enum StatsAction {
    /// Focus totals and recent sessions
    Overview,
    /// Habit completion counts and streaks
    Habits {
        /// Trailing window length in days
        #[arg(long, default_value = "30")]
        days: usize,
    },
}

#[derive(Serialize)]
struct OverviewReport {
    focus_ms: u64,
    total_uptime_ms: u64,
    focus_share_pct: u32,
    sessions_completed: u32,
    recent_sessions: Vec<FocusSession>,
}

#[derive(Serialize)]
struct HabitStreaks<'a> {
    id: &'a str,
    name: &'a str,
    current_streak: u32,
    best_streak: u32,
}

#[derive(Serialize)]
struct HabitsReport<'a> {
    window_days: usize,
    daily: Vec<DailyCompletionCount>,
    habits: Vec<HabitStreaks<'a>>,
}

pub fn run(action: StatsAction) -> Result<(), Box<dyn std::error::Error>> {
    let hub = Hub::open()?;

    match action {
        StatsAction::Overview => {
            let aggregates = hub.store.aggregates();
            let report = OverviewReport {
                focus_ms: aggregates.focus_ms,
                total_uptime_ms: aggregates.total_uptime_ms,
                focus_share_pct: aggregates.focus_share_pct(),
                sessions_completed: hub.store.timer().sessions_completed(),
                recent_sessions: hub.store.sessions().iter().take(10).cloned().collect(),
            };
            print_json(&report)?;
        }
        StatsAction::Habits { days } => {
            let today = Utc::now().date_naive();
            let habits = hub.store.habits();
            let report = HabitsReport {
                window_days: days,
                daily: stats::trailing_window(habits, today, days),
                habits: habits
                    .iter()
                    .map(|habit| HabitStreaks {
                        id: &habit.id,
                        name: &habit.name,
                        current_streak: stats::current_streak(habit, today),
                        best_streak: stats::best_streak(habit),
                    })
                    .collect(),
            };
            print_json(&report)?;
        }
    }

    Ok(())
}
