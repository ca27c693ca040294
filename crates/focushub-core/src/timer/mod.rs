mod engine;
mod sessions;
mod settings;

pub use engine::{Completion, TickReport, TimerEngine};
pub use sessions::{FocusSession, SessionLog, SESSION_LOG_CAP};
pub use settings::{PomodoroMode, PomodoroSettings};
