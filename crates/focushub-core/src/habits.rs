//! Habit records with day-keyed completion maps.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Swatch used when a habit is created without an explicit color.
pub const DEFAULT_HABIT_COLOR: &str = "#6e6bff";

/// A tracked habit. Completion flags are keyed by calendar day, so a day is
/// either done or not - there is no partial credit and no duplicate entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Habit {
    pub id: String,
    pub name: String,
    pub color: String,
    pub created_at: DateTime<Utc>,
    /// Keys serialize as `YYYY-MM-DD`.
    #[serde(default)]
    pub completions: BTreeMap<NaiveDate, bool>,
}

impl Habit {
    pub fn new(
        name: impl Into<String>,
        color: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            color: color.into(),
            created_at,
            completions: BTreeMap::new(),
        }
    }

    /// Flip the completion flag for `date`, returning the new value.
    ///
    /// A day with no entry counts as not done, so the first toggle marks it
    /// done and a second toggle takes it back.
    pub fn toggle(&mut self, date: NaiveDate) -> bool {
        let flag = self.completions.entry(date).or_insert(false);
        *flag = !*flag;
        *flag
    }

    pub fn is_complete_on(&self, date: NaiveDate) -> bool {
        self.completions.get(&date).copied().unwrap_or(false)
    }
}

/// Partial update for a habit. Applied whole: one bad field rejects all of it.
#[derive(Debug, Clone, Default)]
pub struct HabitPatch {
    pub name: Option<String>,
    pub color: Option<String>,
}

impl HabitPatch {
    pub fn is_valid(&self) -> bool {
        self.name.as_deref().is_none_or(|n| !n.trim().is_empty())
            && self.color.as_deref().is_none_or(|c| !c.trim().is_empty())
    }

    pub fn apply(self, habit: &mut Habit) {
        if let Some(name) = self.name {
            habit.name = name.trim().to_string();
        }
        if let Some(color) = self.color {
            habit.color = color.trim().to_string();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn habit() -> Habit {
        Habit::new("Read", DEFAULT_HABIT_COLOR, Utc::now())
    }

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, d).unwrap()
    }

    #[test]
    fn toggle_flips_and_flips_back() {
        let mut habit = habit();
        assert!(!habit.is_complete_on(day(9)));
        assert!(habit.toggle(day(9)));
        assert!(habit.is_complete_on(day(9)));
        assert!(!habit.toggle(day(9)));
        assert!(!habit.is_complete_on(day(9)));
    }

    #[test]
    fn completions_key_by_day() {
        let mut habit = habit();
        habit.toggle(day(9));
        habit.toggle(day(10));
        let json = serde_json::to_value(&habit).unwrap();
        assert_eq!(json["completions"]["2025-03-09"], true);
        assert_eq!(json["completions"]["2025-03-10"], true);
    }

    #[test]
    fn blank_patch_fields_are_invalid() {
        let patch = HabitPatch {
            name: Some("   ".into()),
            color: None,
        };
        assert!(!patch.is_valid());
        let patch = HabitPatch {
            name: Some("Stretch".into()),
            color: Some("".into()),
        };
        assert!(!patch.is_valid());
        assert!(HabitPatch::default().is_valid());
    }

    #[test]
    fn patch_applies_only_named_fields() {
        let mut habit = habit();
        let patch = HabitPatch {
            name: Some("  Read more  ".into()),
            color: None,
        };
        patch.apply(&mut habit);
        assert_eq!(habit.name, "Read more");
        assert_eq!(habit.color, DEFAULT_HABIT_COLOR);
    }
}
