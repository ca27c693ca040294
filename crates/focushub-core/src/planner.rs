//! Weekly planner tasks and grid placement.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// First and last hour rows hosts typically render. Assignment itself
/// accepts the full clock; the grid range is presentation only.
pub const PLANNER_FIRST_HOUR: u8 = 8;
pub const PLANNER_LAST_HOUR: u8 = 19;

/// Length given to a freshly captured task, in minutes.
pub const DEFAULT_TASK_DURATION_MIN: u32 = 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TaskCategory {
    Coursework,
    Personal,
    Coding,
}

impl TaskCategory {
    pub const ALL: [TaskCategory; 3] = [
        TaskCategory::Coursework,
        TaskCategory::Personal,
        TaskCategory::Coding,
    ];
}

impl fmt::Display for TaskCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TaskCategory::Coursework => "Coursework",
            TaskCategory::Personal => "Personal",
            TaskCategory::Coding => "Coding",
        };
        f.write_str(name)
    }
}

impl FromStr for TaskCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "coursework" => Ok(TaskCategory::Coursework),
            "personal" => Ok(TaskCategory::Personal),
            "coding" => Ok(TaskCategory::Coding),
            _ => Err(format!(
                "unknown category '{s}' (expected coursework, personal or coding)"
            )),
        }
    }
}

/// A planner grid cell: weekday (0 = Monday) and hour of day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slot {
    pub day_index: u8,
    pub hour: u8,
}

impl Slot {
    pub fn new(day_index: u8, hour: u8) -> Self {
        Self { day_index, hour }
    }

    pub fn is_valid(&self) -> bool {
        self.day_index <= 6 && self.hour <= 23
    }
}

/// A planner task: captured into the backlog, optionally placed on the grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskItem {
    pub id: String,
    pub title: String,
    pub category: TaskCategory,
    /// `None` keeps the task in the backlog column.
    #[serde(default)]
    pub placement: Option<Slot>,
    pub duration_min: u32,
}

impl TaskItem {
    /// New tasks land in the backlog with the default duration.
    pub fn new(title: impl Into<String>, category: TaskCategory) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            title: title.into(),
            category,
            placement: None,
            duration_min: DEFAULT_TASK_DURATION_MIN,
        }
    }

    pub fn is_scheduled(&self) -> bool {
        self.placement.is_some()
    }
}

/// Partial update for a task. Applied whole: one bad field rejects all of it.
/// Placement is not patchable; it only moves through the assignment
/// operation.
#[derive(Debug, Clone, Default)]
pub struct TaskPatch {
    pub title: Option<String>,
    pub category: Option<TaskCategory>,
    pub duration_min: Option<u32>,
}

impl TaskPatch {
    pub fn is_valid(&self) -> bool {
        self.title.as_deref().is_none_or(|t| !t.trim().is_empty())
            && self.duration_min.is_none_or(|d| d > 0)
    }

    pub fn apply(self, task: &mut TaskItem) {
        if let Some(title) = self.title {
            task.title = title.trim().to_string();
        }
        if let Some(category) = self.category {
            task.category = category;
        }
        if let Some(duration_min) = self.duration_min {
            task.duration_min = duration_min;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_tasks_are_unscheduled_hour_long() {
        let task = TaskItem::new("Lab report", TaskCategory::Coursework);
        assert!(task.placement.is_none());
        assert!(!task.is_scheduled());
        assert_eq!(task.duration_min, DEFAULT_TASK_DURATION_MIN);
    }

    #[test]
    fn slot_bounds() {
        assert!(Slot::new(0, 0).is_valid());
        assert!(Slot::new(6, 23).is_valid());
        assert!(!Slot::new(7, 10).is_valid());
        assert!(!Slot::new(3, 24).is_valid());
    }

    #[test]
    fn categories_parse_case_insensitively() {
        assert_eq!("coding".parse::<TaskCategory>(), Ok(TaskCategory::Coding));
        assert_eq!(
            "Coursework".parse::<TaskCategory>(),
            Ok(TaskCategory::Coursework)
        );
        assert!("chores".parse::<TaskCategory>().is_err());
    }

    #[test]
    fn categories_serialize_as_their_display_names() {
        let json = serde_json::to_string(&TaskCategory::Personal).unwrap();
        assert_eq!(json, "\"Personal\"");
    }

    #[test]
    fn zero_duration_patch_is_invalid() {
        let patch = TaskPatch {
            duration_min: Some(0),
            ..TaskPatch::default()
        };
        assert!(!patch.is_valid());
    }

    #[test]
    fn patch_leaves_placement_alone() {
        let mut task = TaskItem::new("Review PRs", TaskCategory::Coding);
        task.placement = Some(Slot::new(2, 14));
        let patch = TaskPatch {
            title: Some("Review pull requests".into()),
            category: None,
            duration_min: Some(90),
        };
        patch.apply(&mut task);
        assert_eq!(task.placement, Some(Slot::new(2, 14)));
        assert_eq!(task.duration_min, 90);
    }
}
