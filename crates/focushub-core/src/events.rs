use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::store::ViewKey;
use crate::timer::PomodoroMode;

/// Every timer state change in the hub produces an Event.
/// Hosts print or relay them; chime and notification side effects key on
/// `SessionCompleted`, which fires at most once per finished interval.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    TimerStarted {
        mode: PomodoroMode,
        remaining_ms: u64,
        at: DateTime<Utc>,
    },
    TimerPaused {
        remaining_ms: u64,
        at: DateTime<Utc>,
    },
    TimerReset {
        mode: PomodoroMode,
        remaining_ms: u64,
        at: DateTime<Utc>,
    },
    SessionSkipped {
        from: PomodoroMode,
        to: PomodoroMode,
        at: DateTime<Utc>,
    },
    /// A countdown ran out. `session_id` is set for work completions and
    /// names the focus session that was just recorded.
    SessionCompleted {
        completed: PomodoroMode,
        next: PomodoroMode,
        sessions_completed: u32,
        session_id: Option<String>,
        at: DateTime<Utc>,
    },
    /// Full hub status for host polling.
    StateSnapshot {
        view: ViewKey,
        mode: PomodoroMode,
        is_running: bool,
        remaining_ms: u64,
        session_duration_ms: u64,
        /// 0.0 .. 1.0 within the current interval.
        progress: f64,
        sessions_completed: u32,
        focus_ms: u64,
        total_uptime_ms: u64,
        habit_count: usize,
        task_count: usize,
        note_count: usize,
        at: DateTime<Utc>,
    },
}
