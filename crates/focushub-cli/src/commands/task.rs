use chrono::Utc;
use clap::Subcommand;
use focushub_core::date;
use focushub_core::{Slot, TaskCategory, TaskPatch, PLANNER_FIRST_HOUR, PLANNER_LAST_HOUR};

use super::{print_json, Hub};

#[derive(Subcommand)]
pub enum TaskAction {
    /// Create a task in the backlog
    Add {
        /// Task title
        title: String,
        /// Category: coursework, personal or coding
        #[arg(long, default_value = "personal")]
        category: String,
    },
    /// Update title, category or planned duration
    Update {
        /// Task ID
        id: String,
        /// New title
        #[arg(long)]
        title: Option<String>,
        /// New category
        #[arg(long)]
        category: Option<String>,
        /// New planned duration in minutes
        #[arg(long)]
        duration: Option<u32>,
    },
    /// Delete a task
    Rm {
        /// Task ID
        id: String,
    },
    /// Place a task into a week slot
    Assign {
        /// Task ID
        id: String,
        /// Day of week, 0 = Monday through 6 = Sunday
        day: u8,
        /// Hour of day, 0 through 23
        hour: u8,
    },
    /// Send a task back to the backlog
    Unassign {
        /// Task ID
        id: String,
    },
    /// List tasks as JSON
    List {
        /// Only unplaced tasks
        #[arg(long)]
        backlog: bool,
    },
    /// Print this week's grid, planner hours only
    Week,
}

pub fn run(action: TaskAction) -> Result<(), Box<dyn std::error::Error>> {
    let mut hub = Hub::open()?;

    match action {
        TaskAction::Add { title, category } => {
            let category: TaskCategory = category.parse()?;
            match hub.store.add_task(&title, category) {
                Some(id) => {
                    println!("task created: {id}");
                    if let Some(task) = hub.store.tasks().iter().find(|t| t.id == id) {
                        print_json(task)?;
                    }
                }
                None => return Err("task title cannot be blank".into()),
            }
        }
        TaskAction::Update {
            id,
            title,
            category,
            duration,
        } => {
            let category = match category {
                Some(raw) => Some(raw.parse::<TaskCategory>()?),
                None => None,
            };
            let patch = TaskPatch {
                title,
                category,
                duration_min: duration,
            };
            if !hub.store.update_task(&id, patch) {
                return Err(format!("nothing changed: unknown task or blank field ({id})").into());
            }
            println!("task updated: {id}");
        }
        TaskAction::Rm { id } => {
            if !hub.store.delete_task(&id) {
                return Err(format!("no such task: {id}").into());
            }
            println!("task deleted: {id}");
        }
        TaskAction::Assign { id, day, hour } => {
            let slot = Slot {
                day_index: day,
                hour,
            };
            if !hub.store.assign_task(&id, Some(slot)) {
                return Err(format!("no such task or slot out of range: {id}").into());
            }
            println!("task placed: {id} -> day {day}, {hour:02}:00");
        }
        TaskAction::Unassign { id } => {
            if !hub.store.assign_task(&id, None) {
                return Err(format!("no such task: {id}").into());
            }
            println!("task back in backlog: {id}");
        }
        TaskAction::List { backlog } => {
            // Reads leave the snapshot untouched.
            if backlog {
                let backlog: Vec<_> = hub.store.backlog().collect();
                print_json(&backlog)?;
            } else {
                print_json(&hub.store.tasks())?;
            }
            return Ok(());
        }
        TaskAction::Week => {
            let week = date::week_dates(date::start_of_week(Utc::now().date_naive()));
            for (day, date) in week.iter().enumerate() {
                for hour in PLANNER_FIRST_HOUR..=PLANNER_LAST_HOUR {
                    for task in hub.store.tasks_in_slot(Slot::new(day as u8, hour)) {
                        println!(
                            "{} {hour:02}:00  {} [{}]",
                            date::date_key(*date),
                            task.title,
                            task.category
                        );
                    }
                }
            }
            for category in TaskCategory::ALL {
                let count = hub
                    .store
                    .backlog()
                    .filter(|t| t.category == category)
                    .count();
                if count > 0 {
                    println!("backlog: {count} {category}");
                }
            }
            return Ok(());
        }
    }

    hub.commit()?;
    Ok(())
}
