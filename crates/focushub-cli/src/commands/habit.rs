use chrono::Utc;
use clap::Subcommand;
use focushub_core::date;
use focushub_core::HabitPatch;

use super::{print_json, Hub};

#[derive(Subcommand)]
pub enum HabitAction {
    /// Create a habit
    Add {
        /// Habit name
        name: String,
        /// Accent color as a hex string (stock purple when omitted)
        #[arg(long, default_value = "")]
        color: String,
    },
    /// Rename or recolor a habit
    Update {
        /// Habit ID
        id: String,
        /// New name
        #[arg(long)]
        name: Option<String>,
        /// New color
        #[arg(long)]
        color: Option<String>,
    },
    /// Delete a habit and its history
    Rm {
        /// Habit ID
        id: String,
    },
    /// Flip a habit's completion for a date
    Toggle {
        /// Habit ID
        id: String,
        /// Date as YYYY-MM-DD, defaults to today
        #[arg(long)]
        date: Option<String>,
    },
    /// List habits as JSON
    List,
}

pub fn run(action: HabitAction) -> Result<(), Box<dyn std::error::Error>> {
    let mut hub = Hub::open()?;

    match action {
        HabitAction::Add { name, color } => {
            match hub.store.add_habit(&name, &color, Utc::now()) {
                Some(id) => {
                    println!("habit created: {id}");
                    if let Some(habit) = hub.store.habits().iter().find(|h| h.id == id) {
                        print_json(habit)?;
                    }
                }
                None => return Err("habit name cannot be blank".into()),
            }
        }
        HabitAction::Update { id, name, color } => {
            let patch = HabitPatch { name, color };
            if !hub.store.update_habit(&id, patch) {
                return Err(format!("nothing changed: unknown habit or blank field ({id})").into());
            }
            println!("habit updated: {id}");
        }
        HabitAction::Rm { id } => {
            if !hub.store.delete_habit(&id) {
                return Err(format!("no such habit: {id}").into());
            }
            println!("habit deleted: {id}");
        }
        HabitAction::Toggle { id, date } => {
            let date = match date {
                Some(raw) => {
                    date::parse_date_key(&raw).ok_or(format!("bad date (want YYYY-MM-DD): {raw}"))?
                }
                None => Utc::now().date_naive(),
            };
            match hub.store.toggle_habit(&id, date) {
                Some(done) => println!(
                    "{}: {}",
                    date::date_key(date),
                    if done { "done" } else { "not done" }
                ),
                None => return Err(format!("no such habit: {id}").into()),
            }
        }
        HabitAction::List => {
            // Reads leave the snapshot untouched.
            return print_json(&hub.store.habits());
        }
    }

    hub.commit()?;
    Ok(())
}
