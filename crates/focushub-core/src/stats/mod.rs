//! Derived, read-only analytics. Everything here is computed on demand from
//! hub state; nothing is stored beyond the two aggregate counters.

mod habits;

pub use habits::{
    best_streak, completion_counts, current_streak, trailing_window, DailyCompletionCount,
};
