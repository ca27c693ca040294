//! The hub store: single owner of all dashboard state.
//!
//! One `HubStore` is built at startup (fresh or from a snapshot) and handed
//! to the host by reference. Every mutation is synchronous, runs to
//! completion, and cannot fail: invalid input and unknown ids degrade to
//! "no state change", reported through the return value.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::date::epoch_ms;
use crate::events::Event;
use crate::habits::{Habit, HabitPatch, DEFAULT_HABIT_COLOR};
use crate::notes::{NoteItem, NotePatch, UNTITLED_NOTE_TITLE};
use crate::planner::{Slot, TaskCategory, TaskItem, TaskPatch};
use crate::quote::QuoteItem;
use crate::storage::snapshot::HubSnapshot;
use crate::timer::{FocusSession, PomodoroMode, PomodoroSettings, SessionLog, TimerEngine};

/// Top-level dashboard surface selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewKey {
    #[default]
    Dashboard,
    Planner,
    Stats,
    Settings,
}

impl std::fmt::Display for ViewKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let key = match self {
            ViewKey::Dashboard => "dashboard",
            ViewKey::Planner => "planner",
            ViewKey::Stats => "stats",
            ViewKey::Settings => "settings",
        };
        f.write_str(key)
    }
}

impl std::str::FromStr for ViewKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "dashboard" => Ok(ViewKey::Dashboard),
            "planner" => Ok(ViewKey::Planner),
            "stats" => Ok(ViewKey::Stats),
            "settings" => Ok(ViewKey::Settings),
            _ => Err(format!(
                "unknown view '{s}' (expected dashboard, planner, stats or settings)"
            )),
        }
    }
}

/// Monotone focus counters. Only `tick` moves them, and focused time is a
/// subset of uptime, so `focus_ms <= total_uptime_ms` always holds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Aggregates {
    pub focus_ms: u64,
    pub total_uptime_ms: u64,
}

impl Aggregates {
    /// Fraction of uptime spent focused, 0.0 when nothing has elapsed.
    pub fn focus_share(&self) -> f64 {
        if self.total_uptime_ms == 0 {
            return 0.0;
        }
        self.focus_ms as f64 / self.total_uptime_ms as f64
    }

    /// The dashboard figure: focus share as a rounded percentage.
    pub fn focus_share_pct(&self) -> u32 {
        (self.focus_share() * 100.0).round() as u32
    }
}

/// State owner for the whole dashboard.
#[derive(Debug, Clone)]
pub struct HubStore {
    view: ViewKey,
    timer: TimerEngine,
    aggregates: Aggregates,
    sessions: SessionLog,
    habits: Vec<Habit>,
    tasks: Vec<TaskItem>,
    notes: Vec<NoteItem>,
    quote: Option<QuoteItem>,
}

impl HubStore {
    /// Fresh hub: dashboard view, idle work timer, empty collections.
    pub fn new(settings: PomodoroSettings, now: DateTime<Utc>) -> Self {
        Self {
            view: ViewKey::Dashboard,
            timer: TimerEngine::new(settings, epoch_ms(now)),
            aggregates: Aggregates::default(),
            sessions: SessionLog::default(),
            habits: Vec::new(),
            tasks: Vec::new(),
            notes: Vec::new(),
            quote: None,
        }
    }

    /// Rebuild a hub from a snapshot, re-anchoring the timer at `now` so the
    /// time spent offline is never credited to any accumulator. The timer is
    /// sanitized first: a file that parses but carries out-of-range values
    /// is repaired, not trusted.
    pub fn restore(snapshot: HubSnapshot, now: DateTime<Utc>) -> Self {
        let mut timer = snapshot.timer;
        timer.sanitize();
        timer.rebase(epoch_ms(now));
        Self {
            view: snapshot.view,
            timer,
            aggregates: snapshot.aggregates,
            sessions: snapshot.focus_sessions,
            habits: snapshot.habits,
            tasks: snapshot.tasks,
            notes: snapshot.notes,
            quote: snapshot.quote,
        }
    }

    /// Full-state snapshot for persistence.
    pub fn snapshot(&self, saved_at: DateTime<Utc>) -> HubSnapshot {
        HubSnapshot {
            view: self.view,
            timer: self.timer.clone(),
            aggregates: self.aggregates,
            focus_sessions: self.sessions.clone(),
            habits: self.habits.clone(),
            tasks: self.tasks.clone(),
            notes: self.notes.clone(),
            quote: self.quote.clone(),
            saved_at,
        }
    }

    // ── Timer ────────────────────────────────────────────────────────

    pub fn start_timer(&mut self) -> Option<Event> {
        self.timer.start().then(|| Event::TimerStarted {
            mode: self.timer.mode(),
            remaining_ms: self.timer.remaining_ms(),
            at: Utc::now(),
        })
    }

    pub fn pause_timer(&mut self) -> Option<Event> {
        self.timer.pause().then(|| Event::TimerPaused {
            remaining_ms: self.timer.remaining_ms(),
            at: Utc::now(),
        })
    }

    pub fn reset_timer(&mut self) -> Event {
        self.timer.reset();
        Event::TimerReset {
            mode: self.timer.mode(),
            remaining_ms: self.timer.remaining_ms(),
            at: Utc::now(),
        }
    }

    pub fn skip_session(&mut self) -> Event {
        let (from, to) = self.timer.skip();
        Event::SessionSkipped {
            from,
            to,
            at: Utc::now(),
        }
    }

    /// Replace the cycle settings. False (no change) when any field is zero.
    pub fn set_settings(&mut self, settings: PomodoroSettings) -> bool {
        self.timer.set_settings(settings)
    }

    /// Advance the clock. Accrues uptime and focus time, and on a finished
    /// interval records the focus session (work only) and reports the
    /// completion. Fires at most one `SessionCompleted` per completion.
    pub fn tick(&mut self, now: DateTime<Utc>) -> Option<Event> {
        let report = self.timer.tick(epoch_ms(now));
        self.aggregates.total_uptime_ms = self
            .aggregates
            .total_uptime_ms
            .saturating_add(report.uptime_delta_ms);
        self.aggregates.focus_ms = self.aggregates.focus_ms.saturating_add(report.focus_delta_ms);

        let completion = report.completion?;
        let session_id = (completion.completed == PomodoroMode::Work).then(|| {
            let started_at = now - Duration::milliseconds(completion.duration_ms as i64);
            let session = FocusSession::new(started_at, completion.duration_ms);
            let id = session.id.clone();
            self.sessions.record(session);
            id
        });
        Some(Event::SessionCompleted {
            completed: completion.completed,
            next: completion.next,
            sessions_completed: completion.sessions_completed,
            session_id,
            at: now,
        })
    }

    // ── View ─────────────────────────────────────────────────────────

    pub fn view(&self) -> ViewKey {
        self.view
    }

    pub fn set_view(&mut self, view: ViewKey) {
        self.view = view;
    }

    // ── Quote ────────────────────────────────────────────────────────

    pub fn quote(&self) -> Option<&QuoteItem> {
        self.quote.as_ref()
    }

    /// True when there is no cached quote or the cache has outlived its TTL.
    pub fn needs_quote_refresh(&self, now: DateTime<Utc>) -> bool {
        self.quote.as_ref().is_none_or(|q| q.is_stale(now))
    }

    /// Install a freshly fetched quote. Refused while the cached quote is
    /// still fresh relative to the new stamp - a late result from a
    /// superseded fetch therefore falls on the floor - and refused for
    /// blank text.
    pub fn set_quote(&mut self, quote: QuoteItem) -> bool {
        if quote.text.trim().is_empty() {
            return false;
        }
        if !self.needs_quote_refresh(quote.fetched_at) {
            return false;
        }
        self.quote = Some(quote);
        true
    }

    /// Drop the cached quote so the next fetch is admissible.
    pub fn clear_quote(&mut self) {
        self.quote = None;
    }

    // ── Habits ───────────────────────────────────────────────────────

    pub fn habits(&self) -> &[Habit] {
        &self.habits
    }

    /// Track a new habit. A blank name is refused; a blank color falls back
    /// to the default swatch. Returns the new id.
    pub fn add_habit(&mut self, name: &str, color: &str, now: DateTime<Utc>) -> Option<String> {
        let name = name.trim();
        if name.is_empty() {
            return None;
        }
        let color = color.trim();
        let color = if color.is_empty() {
            DEFAULT_HABIT_COLOR
        } else {
            color
        };
        let habit = Habit::new(name, color, now);
        let id = habit.id.clone();
        self.habits.insert(0, habit);
        Some(id)
    }

    pub fn update_habit(&mut self, id: &str, patch: HabitPatch) -> bool {
        if !patch.is_valid() {
            return false;
        }
        match self.habits.iter_mut().find(|h| h.id == id) {
            Some(habit) => {
                patch.apply(habit);
                true
            }
            None => false,
        }
    }

    pub fn delete_habit(&mut self, id: &str) -> bool {
        let before = self.habits.len();
        self.habits.retain(|h| h.id != id);
        self.habits.len() != before
    }

    /// Flip a habit's completion for `date`, returning the new value.
    pub fn toggle_habit(&mut self, id: &str, date: NaiveDate) -> Option<bool> {
        self.habits
            .iter_mut()
            .find(|h| h.id == id)
            .map(|h| h.toggle(date))
    }

    // ── Tasks ────────────────────────────────────────────────────────

    pub fn tasks(&self) -> &[TaskItem] {
        &self.tasks
    }

    /// Capture a task into the backlog. A blank title is refused.
    pub fn add_task(&mut self, title: &str, category: TaskCategory) -> Option<String> {
        let title = title.trim();
        if title.is_empty() {
            return None;
        }
        let task = TaskItem::new(title, category);
        let id = task.id.clone();
        self.tasks.insert(0, task);
        Some(id)
    }

    pub fn update_task(&mut self, id: &str, patch: TaskPatch) -> bool {
        if !patch.is_valid() {
            return false;
        }
        match self.tasks.iter_mut().find(|t| t.id == id) {
            Some(task) => {
                patch.apply(task);
                true
            }
            None => false,
        }
    }

    pub fn delete_task(&mut self, id: &str) -> bool {
        let before = self.tasks.len();
        self.tasks.retain(|t| t.id != id);
        self.tasks.len() != before
    }

    /// Place a task on the grid, or return it to the backlog with `None`.
    /// Day and hour move together; an out-of-range slot is refused whole.
    pub fn assign_task(&mut self, id: &str, placement: Option<Slot>) -> bool {
        if let Some(slot) = placement {
            if !slot.is_valid() {
                return false;
            }
        }
        match self.tasks.iter_mut().find(|t| t.id == id) {
            Some(task) => {
                task.placement = placement;
                true
            }
            None => false,
        }
    }

    /// Tasks not yet placed on the grid.
    pub fn backlog(&self) -> impl Iterator<Item = &TaskItem> + '_ {
        self.tasks.iter().filter(|t| t.placement.is_none())
    }

    /// Tasks placed in one grid cell. Several may share it.
    pub fn tasks_in_slot(&self, slot: Slot) -> impl Iterator<Item = &TaskItem> + '_ {
        self.tasks.iter().filter(move |t| t.placement == Some(slot))
    }

    // ── Notes ────────────────────────────────────────────────────────

    pub fn notes(&self) -> &[NoteItem] {
        &self.notes
    }

    /// Add a note. Refused only when title and content are both blank; a
    /// blank title with real content becomes "Untitled".
    pub fn add_note(&mut self, title: &str, content: &str, now: DateTime<Utc>) -> Option<String> {
        let title = title.trim();
        if title.is_empty() && content.trim().is_empty() {
            return None;
        }
        let title = if title.is_empty() {
            UNTITLED_NOTE_TITLE
        } else {
            title
        };
        let note = NoteItem::new(title, content, now);
        let id = note.id.clone();
        self.notes.insert(0, note);
        Some(id)
    }

    /// Update a note and refresh its timestamp. A patch that would leave
    /// both title and content blank is refused whole; a blanked title with
    /// surviving content becomes "Untitled".
    pub fn update_note(&mut self, id: &str, patch: NotePatch, now: DateTime<Utc>) -> bool {
        let Some(note) = self.notes.iter_mut().find(|n| n.id == id) else {
            return false;
        };
        let title = match patch.title {
            Some(t) => t.trim().to_string(),
            None => note.title.clone(),
        };
        let content = match patch.content {
            Some(c) => c,
            None => note.content.clone(),
        };
        if title.is_empty() && content.trim().is_empty() {
            return false;
        }
        note.title = if title.is_empty() {
            UNTITLED_NOTE_TITLE.to_string()
        } else {
            title
        };
        note.content = content;
        note.updated_at = now;
        true
    }

    pub fn delete_note(&mut self, id: &str) -> bool {
        let before = self.notes.len();
        self.notes.retain(|n| n.id != id);
        self.notes.len() != before
    }

    // ── Read projections ─────────────────────────────────────────────

    pub fn timer(&self) -> &TimerEngine {
        &self.timer
    }

    pub fn aggregates(&self) -> Aggregates {
        self.aggregates
    }

    pub fn sessions(&self) -> &SessionLog {
        &self.sessions
    }

    /// Full hub status for host polling.
    pub fn status(&self) -> Event {
        Event::StateSnapshot {
            view: self.view,
            mode: self.timer.mode(),
            is_running: self.timer.is_running(),
            remaining_ms: self.timer.remaining_ms(),
            session_duration_ms: self.timer.session_duration_ms(),
            progress: self.timer.progress(),
            sessions_completed: self.timer.sessions_completed(),
            focus_ms: self.aggregates.focus_ms,
            total_uptime_ms: self.aggregates.total_uptime_ms,
            habit_count: self.habits.len(),
            task_count: self.tasks.len(),
            note_count: self.notes.len(),
            at: Utc::now(),
        }
    }
}
