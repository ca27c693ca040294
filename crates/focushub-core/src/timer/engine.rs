//! Pomodoro engine implementation.
//!
//! The engine is a wall-clock-based state machine. It runs no threads of its
//! own - the host calls `tick(now_ms)` periodically (roughly once a second)
//! and every interval is accounted from the timestamp delta, so a burst of
//! missed ticks charges the whole gap in one step.
//!
//! ## Cycle
//!
//! ```text
//! work -> short-break -> work -> ... -> work -> long-break -> work
//! ```
//!
//! Every Nth completed work session (N = `long_break_every`) is followed by a
//! long break. Completing an interval stops the countdown; the next interval
//! is loaded but waits for an explicit `start`.

use serde::{Deserialize, Serialize};
use tracing::warn;

use super::settings::{PomodoroMode, PomodoroSettings};

/// Accounting produced by a single `tick`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickReport {
    /// Wall-clock delta since the previous tick, charged unconditionally.
    pub uptime_delta_ms: u64,
    /// Portion of the delta spent running in work mode.
    pub focus_delta_ms: u64,
    /// Present when the countdown reached zero on this tick.
    pub completion: Option<Completion>,
}

/// Details of a countdown that just finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Completion {
    pub completed: PomodoroMode,
    pub next: PomodoroMode,
    /// Total work sessions completed, including this one if it was work.
    pub sessions_completed: u32,
    /// Planned length of the finished interval.
    pub duration_ms: u64,
    /// Completion timestamp; doubles as the engine's completion marker.
    pub completion_ms: u64,
}

/// Core Pomodoro state machine.
///
/// Operates on wall-clock deltas - no internal thread. The host is
/// responsible for calling `tick(now_ms)` periodically with non-decreasing
/// timestamps; an out-of-order timestamp yields a zero delta and leaves the
/// anchor untouched, so no interval is ever charged twice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimerEngine {
    settings: PomodoroSettings,
    mode: PomodoroMode,
    is_running: bool,
    /// Remaining time in milliseconds for the current interval.
    remaining_ms: u64,
    /// Planned length of the current interval; `remaining_ms` counts down
    /// from it and completed work sessions are recorded with it.
    session_duration_ms: u64,
    sessions_completed: u32,
    /// Completion marker: timestamp of the most recent completion. Takes a
    /// fresh value on every completion, so hosts can key at-most-once side
    /// effects (chime, notification) on it.
    #[serde(default)]
    last_completion_ms: Option<u64>,
    /// Anchor for delta accounting, `None` until anchored. Never
    /// serialized: a restored engine is re-anchored at load time so the
    /// period the process was away is not charged to any accumulator.
    #[serde(skip)]
    last_tick_ms: Option<u64>,
}

impl TimerEngine {
    /// Create an idle engine in work mode, anchored at `now_ms`.
    ///
    /// Invalid settings (any zero field) fall back to the defaults.
    pub fn new(settings: PomodoroSettings, now_ms: u64) -> Self {
        let settings = if settings.is_valid() {
            settings
        } else {
            warn!(?settings, "invalid pomodoro settings, using defaults");
            PomodoroSettings::default()
        };
        let duration = settings.duration_ms(PomodoroMode::Work);
        Self {
            settings,
            mode: PomodoroMode::Work,
            is_running: false,
            remaining_ms: duration,
            session_duration_ms: duration,
            sessions_completed: 0,
            last_completion_ms: None,
            last_tick_ms: Some(now_ms),
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn settings(&self) -> PomodoroSettings {
        self.settings
    }

    pub fn mode(&self) -> PomodoroMode {
        self.mode
    }

    pub fn is_running(&self) -> bool {
        self.is_running
    }

    pub fn remaining_ms(&self) -> u64 {
        self.remaining_ms
    }

    pub fn session_duration_ms(&self) -> u64 {
        self.session_duration_ms
    }

    pub fn sessions_completed(&self) -> u32 {
        self.sessions_completed
    }

    pub fn last_completion_ms(&self) -> Option<u64> {
        self.last_completion_ms
    }

    /// 0.0 .. 1.0 progress within the current interval.
    pub fn progress(&self) -> f64 {
        if self.session_duration_ms == 0 {
            return 0.0;
        }
        1.0 - (self.remaining_ms as f64 / self.session_duration_ms as f64)
    }

    /// Absolute timestamp of the next completion, if the countdown is live.
    ///
    /// Lets a host schedule a single wake-up instead of polling.
    pub fn next_deadline_ms(&self) -> Option<u64> {
        if !self.is_running {
            return None;
        }
        self.last_tick_ms
            .map(|last| last.saturating_add(self.remaining_ms))
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Start or resume the countdown. Returns false when already running.
    ///
    /// An expired interval (remaining time zero) is reloaded to its full
    /// length first.
    pub fn start(&mut self) -> bool {
        if self.is_running {
            return false;
        }
        if self.remaining_ms == 0 {
            self.load_mode(self.mode);
        }
        self.is_running = true;
        true
    }

    /// Freeze the countdown in place. Returns false when not running.
    pub fn pause(&mut self) -> bool {
        if !self.is_running {
            return false;
        }
        self.is_running = false;
        true
    }

    /// Stop and reload the current mode to its full length.
    pub fn reset(&mut self) {
        self.is_running = false;
        self.load_mode(self.mode);
    }

    /// Abandon the current interval and move on, stopped.
    ///
    /// Work skips to a short break - never the long one - and breaks skip
    /// back to work. A skipped work session is not counted and records no
    /// focus session.
    pub fn skip(&mut self) -> (PomodoroMode, PomodoroMode) {
        let from = self.mode;
        let to = match from {
            PomodoroMode::Work => PomodoroMode::ShortBreak,
            _ => PomodoroMode::Work,
        };
        self.is_running = false;
        self.load_mode(to);
        (from, to)
    }

    /// Replace the cycle settings. Returns false (no change) when any field
    /// is zero.
    ///
    /// A stopped engine reloads the current mode at its new length; a
    /// running countdown keeps its in-progress durations and picks up the
    /// new lengths from the next interval on.
    pub fn set_settings(&mut self, settings: PomodoroSettings) -> bool {
        if !settings.is_valid() {
            return false;
        }
        self.settings = settings;
        if !self.is_running {
            self.load_mode(self.mode);
        }
        true
    }

    /// Advance the clock to `now_ms` and account the elapsed interval.
    ///
    /// Call periodically. The uptime delta accrues whether or not the
    /// countdown is live; focus time accrues only while running in work
    /// mode. A completion is reported at most once per finished interval.
    pub fn tick(&mut self, now_ms: u64) -> TickReport {
        let last = self.last_tick_ms.unwrap_or(now_ms);
        let delta = now_ms.saturating_sub(last);
        self.last_tick_ms = Some(last.max(now_ms));

        let mut focus_delta_ms = 0;
        let mut completion = None;

        if self.is_running {
            if self.mode == PomodoroMode::Work {
                focus_delta_ms = delta;
            }
            self.remaining_ms = self.remaining_ms.saturating_sub(delta);
            if self.remaining_ms == 0 {
                completion = Some(self.complete(now_ms));
            }
        }

        TickReport {
            uptime_delta_ms: delta,
            focus_delta_ms,
            completion,
        }
    }

    /// Re-anchor delta accounting at `now_ms` without charging the gap.
    ///
    /// Called after restoring a persisted engine.
    pub fn rebase(&mut self, now_ms: u64) {
        self.last_tick_ms = Some(now_ms);
    }

    /// Repair state read from disk. Invalid settings fall back to the
    /// defaults; the countdown is clamped to its planned length, reloading
    /// from the settings when the stored length is zero.
    ///
    /// `is_valid` gates the constructor and `set_settings`, but snapshot
    /// files can be edited by hand; values that parse but violate the
    /// engine's invariants must not reach the running state machine.
    pub fn sanitize(&mut self) {
        if !self.settings.is_valid() {
            warn!(settings = ?self.settings, "invalid persisted settings, using defaults");
            self.settings = PomodoroSettings::default();
        }
        if self.session_duration_ms == 0 {
            self.load_mode(self.mode);
        }
        self.remaining_ms = self.remaining_ms.min(self.session_duration_ms);
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn complete(&mut self, now_ms: u64) -> Completion {
        let completed = self.mode;
        let duration_ms = self.session_duration_ms;
        self.is_running = false;
        let next = if completed == PomodoroMode::Work {
            self.sessions_completed += 1;
            if self.sessions_completed % self.settings.long_break_every == 0 {
                PomodoroMode::LongBreak
            } else {
                PomodoroMode::ShortBreak
            }
        } else {
            PomodoroMode::Work
        };
        self.load_mode(next);
        self.last_completion_ms = Some(now_ms);
        Completion {
            completed,
            next,
            sessions_completed: self.sessions_completed,
            duration_ms,
            completion_ms: now_ms,
        }
    }

    fn load_mode(&mut self, mode: PomodoroMode) {
        let duration = self.settings.duration_ms(mode);
        self.mode = mode;
        self.remaining_ms = duration;
        self.session_duration_ms = duration;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WORK_MS: u64 = 25 * 60 * 1000;

    fn engine() -> TimerEngine {
        TimerEngine::new(PomodoroSettings::default(), 0)
    }

    #[test]
    fn starts_idle_in_work_mode() {
        let engine = engine();
        assert_eq!(engine.mode(), PomodoroMode::Work);
        assert!(!engine.is_running());
        assert_eq!(engine.remaining_ms(), WORK_MS);
        assert_eq!(engine.session_duration_ms(), WORK_MS);
    }

    #[test]
    fn start_and_pause_toggle_the_countdown() {
        let mut engine = engine();
        assert!(engine.start());
        assert!(!engine.start());
        assert!(engine.is_running());
        assert!(engine.pause());
        assert!(!engine.pause());
        assert!(!engine.is_running());
    }

    #[test]
    fn tick_counts_down_only_while_running() {
        let mut engine = engine();
        let report = engine.tick(5_000);
        assert_eq!(report.uptime_delta_ms, 5_000);
        assert_eq!(report.focus_delta_ms, 0);
        assert_eq!(engine.remaining_ms(), WORK_MS);

        engine.start();
        let report = engine.tick(8_000);
        assert_eq!(report.uptime_delta_ms, 3_000);
        assert_eq!(report.focus_delta_ms, 3_000);
        assert_eq!(engine.remaining_ms(), WORK_MS - 3_000);
    }

    #[test]
    fn work_completion_stops_and_loads_short_break() {
        let mut engine = engine();
        engine.start();
        let report = engine.tick(WORK_MS);
        let completion = report.completion.unwrap();
        assert_eq!(completion.completed, PomodoroMode::Work);
        assert_eq!(completion.next, PomodoroMode::ShortBreak);
        assert_eq!(completion.sessions_completed, 1);
        assert_eq!(completion.duration_ms, WORK_MS);
        assert!(!engine.is_running());
        assert_eq!(engine.mode(), PomodoroMode::ShortBreak);
        assert_eq!(engine.remaining_ms(), 5 * 60 * 1000);
        assert_eq!(engine.last_completion_ms(), Some(WORK_MS));
    }

    #[test]
    fn overshooting_tick_still_completes_once() {
        let mut engine = engine();
        engine.start();
        // One giant delta far past the interval end.
        let report = engine.tick(WORK_MS + 90_000);
        assert!(report.completion.is_some());
        assert_eq!(report.focus_delta_ms, WORK_MS + 90_000);
        // The next tick is an idle one.
        let report = engine.tick(WORK_MS + 91_000);
        assert!(report.completion.is_none());
        assert_eq!(report.focus_delta_ms, 0);
    }

    #[test]
    fn every_fourth_work_session_earns_a_long_break() {
        let mut engine = engine();
        let mut now = 0;
        for round in 1..=4 {
            engine.start();
            now += engine.remaining_ms();
            let completion = engine.tick(now).completion.unwrap();
            if round == 4 {
                assert_eq!(completion.next, PomodoroMode::LongBreak);
            } else {
                assert_eq!(completion.next, PomodoroMode::ShortBreak);
            }
            // Run the loaded break to completion.
            engine.start();
            now += engine.remaining_ms();
            let completion = engine.tick(now).completion.unwrap();
            assert_eq!(completion.next, PomodoroMode::Work);
            assert_eq!(completion.sessions_completed, round);
        }
    }

    #[test]
    fn break_completion_does_not_count_a_session() {
        let mut engine = engine();
        engine.skip();
        assert_eq!(engine.mode(), PomodoroMode::ShortBreak);
        engine.start();
        let completion = engine.tick(5 * 60 * 1000).completion.unwrap();
        assert_eq!(completion.completed, PomodoroMode::ShortBreak);
        assert_eq!(completion.next, PomodoroMode::Work);
        assert_eq!(completion.sessions_completed, 0);
    }

    #[test]
    fn skip_from_work_never_reaches_the_long_break() {
        let mut settings = PomodoroSettings::default();
        settings.long_break_every = 1;
        let mut engine = TimerEngine::new(settings, 0);
        // Even with a long break due on every completion, skipping work
        // lands on the short break and counts nothing.
        let (from, to) = engine.skip();
        assert_eq!(from, PomodoroMode::Work);
        assert_eq!(to, PomodoroMode::ShortBreak);
        assert_eq!(engine.sessions_completed(), 0);
        let (from, to) = engine.skip();
        assert_eq!(from, PomodoroMode::ShortBreak);
        assert_eq!(to, PomodoroMode::Work);
    }

    #[test]
    fn start_reloads_an_expired_interval() {
        // Normal completions always load the next interval, so a drained
        // countdown can only come in from persisted state.
        let json = serde_json::json!({
            "settings": PomodoroSettings::default(),
            "mode": "work",
            "is_running": false,
            "remaining_ms": 0,
            "session_duration_ms": WORK_MS,
            "sessions_completed": 2,
        });
        let mut engine: TimerEngine = serde_json::from_value(json).unwrap();
        assert!(engine.start());
        assert!(engine.is_running());
        assert_eq!(engine.remaining_ms(), WORK_MS);
        assert_eq!(engine.session_duration_ms(), WORK_MS);
    }

    #[test]
    fn reset_reloads_the_current_mode() {
        let mut engine = engine();
        engine.start();
        engine.tick(60_000);
        engine.reset();
        assert!(!engine.is_running());
        assert_eq!(engine.mode(), PomodoroMode::Work);
        assert_eq!(engine.remaining_ms(), WORK_MS);
    }

    #[test]
    fn settings_change_waits_for_a_running_countdown() {
        let mut engine = engine();
        engine.start();
        engine.tick(60_000);
        let mut settings = PomodoroSettings::default();
        settings.work_min = 50;
        assert!(engine.set_settings(settings));
        // In-progress interval keeps its original lengths.
        assert_eq!(engine.remaining_ms(), WORK_MS - 60_000);
        assert_eq!(engine.session_duration_ms(), WORK_MS);

        engine.pause();
        assert!(engine.set_settings(settings));
        // Stopped, the current mode reloads at the new length.
        assert_eq!(engine.remaining_ms(), 50 * 60 * 1000);
    }

    #[test]
    fn zero_settings_are_refused() {
        let mut engine = engine();
        let mut settings = PomodoroSettings::default();
        settings.short_break_min = 0;
        assert!(!engine.set_settings(settings));
        assert_eq!(engine.settings(), PomodoroSettings::default());
    }

    #[test]
    fn stale_timestamp_yields_zero_delta_and_keeps_the_anchor() {
        let mut engine = engine();
        engine.start();
        engine.tick(10_000);
        // Clock went backwards: nothing is charged.
        let report = engine.tick(4_000);
        assert_eq!(report.uptime_delta_ms, 0);
        assert_eq!(report.focus_delta_ms, 0);
        // The anchor did not rewind, so recovery charges only the real gap.
        let report = engine.tick(12_000);
        assert_eq!(report.uptime_delta_ms, 2_000);
    }

    #[test]
    fn invalid_initial_settings_fall_back_to_defaults() {
        let mut settings = PomodoroSettings::default();
        settings.work_min = 0;
        let engine = TimerEngine::new(settings, 0);
        assert_eq!(engine.settings(), PomodoroSettings::default());
        assert_eq!(engine.remaining_ms(), WORK_MS);
    }

    #[test]
    fn invalid_restored_settings_fall_back_to_defaults() {
        // The constructor and `set_settings` refuse a zero field, but a
        // hand-edited snapshot can carry one straight through serde.
        let json = serde_json::json!({
            "settings": {
                "work_min": 25,
                "short_break_min": 5,
                "long_break_min": 15,
                "long_break_every": 0,
            },
            "mode": "work",
            "is_running": true,
            "remaining_ms": 1_000,
            "session_duration_ms": WORK_MS,
            "sessions_completed": 3,
        });
        let mut engine: TimerEngine = serde_json::from_value(json).unwrap();
        engine.sanitize();
        engine.rebase(0);
        assert_eq!(engine.settings(), PomodoroSettings::default());
        // The completion cadence comes from the repaired settings.
        let completion = engine.tick(2_000).completion.unwrap();
        assert_eq!(completion.sessions_completed, 4);
        assert_eq!(completion.next, PomodoroMode::LongBreak);
    }

    #[test]
    fn restored_countdown_is_clamped_to_its_planned_length() {
        let json = serde_json::json!({
            "settings": PomodoroSettings::default(),
            "mode": "work",
            "is_running": false,
            "remaining_ms": WORK_MS * 10,
            "session_duration_ms": WORK_MS,
            "sessions_completed": 0,
        });
        let mut engine: TimerEngine = serde_json::from_value(json).unwrap();
        engine.sanitize();
        assert_eq!(engine.remaining_ms(), WORK_MS);
        assert_eq!(engine.progress(), 0.0);
    }

    #[test]
    fn progress_tracks_the_countdown() {
        let mut engine = engine();
        assert_eq!(engine.progress(), 0.0);
        engine.start();
        engine.tick(WORK_MS / 2);
        assert!((engine.progress() - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn deadline_exists_only_while_running() {
        let mut engine = engine();
        assert_eq!(engine.next_deadline_ms(), None);
        engine.start();
        assert_eq!(engine.next_deadline_ms(), Some(WORK_MS));
        // Steady ticking shrinks the remainder as the anchor advances, so
        // the deadline itself stays put.
        engine.tick(10_000);
        assert_eq!(engine.next_deadline_ms(), Some(WORK_MS));
        engine.pause();
        assert_eq!(engine.next_deadline_ms(), None);
    }

    #[test]
    fn serialization_skips_the_tick_anchor() {
        let mut engine = engine();
        engine.start();
        engine.tick(90_000);
        let json = serde_json::to_string(&engine).unwrap();
        assert!(!json.contains("last_tick_ms"));
        let mut revived: TimerEngine = serde_json::from_str(&json).unwrap();
        revived.rebase(500_000);
        assert_eq!(revived.remaining_ms(), engine.remaining_ms());
        // The offline gap is not charged after re-anchoring.
        let report = revived.tick(500_400);
        assert_eq!(report.uptime_delta_ms, 400);
    }
}
