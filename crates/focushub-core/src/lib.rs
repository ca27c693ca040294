//! # FocusHub Core Library
//!
//! Core business logic for the FocusHub productivity dashboard: a Pomodoro
//! focus timer, habit tracker, weekly planner, markdown notes and a cached
//! daily quote, all owned by a single state store. The CLI binary is a thin
//! host over this library; a GUI would sit on the same surface.
//!
//! ## Architecture
//!
//! - **Hub store**: one [`HubStore`] owns all state. Mutations are
//!   synchronous, run to completion, and never fail - invalid input and
//!   unknown ids degrade to "no state change".
//! - **Timer engine**: a wall-clock state machine. The host calls
//!   `tick(now)` about once a second; accounting is done from timestamp
//!   deltas, so missed ticks charge the whole gap at once.
//! - **Persistence**: full-state JSON snapshots, written fire-and-forget.
//!   The tick anchor is never persisted, so time spent offline is not
//!   credited.
//! - **Quote feed**: the only network boundary, fetched async and applied
//!   through a TTL gate.
//!
//! ## Key Components
//!
//! - [`HubStore`]: state owner and mutation surface
//! - [`TimerEngine`]: Pomodoro countdown and focus accounting
//! - [`SnapshotStore`]: snapshot file handling
//! - [`HubConfig`]: TOML configuration

pub mod date;
pub mod error;
pub mod events;
pub mod habits;
pub mod logging;
pub mod notes;
pub mod planner;
pub mod quote;
pub mod stats;
pub mod storage;
pub mod store;
pub mod timer;

pub use error::{ConfigError, CoreError, QuoteError, Result, StorageError};
pub use events::Event;
pub use habits::{Habit, HabitPatch, DEFAULT_HABIT_COLOR};
pub use notes::{NoteItem, NotePatch, UNTITLED_NOTE_TITLE};
pub use planner::{
    Slot, TaskCategory, TaskItem, TaskPatch, DEFAULT_TASK_DURATION_MIN, PLANNER_FIRST_HOUR,
    PLANNER_LAST_HOUR,
};
pub use quote::{QuoteFetcher, QuoteItem, DEFAULT_QUOTE_FEED, QUOTE_TTL_HOURS};
pub use storage::{HubConfig, HubSnapshot, SnapshotStore};
pub use store::{Aggregates, HubStore, ViewKey};
pub use timer::{
    FocusSession, PomodoroMode, PomodoroSettings, SessionLog, TimerEngine, SESSION_LOG_CAP,
};
