use chrono::Utc;
use clap::Subcommand;
use focushub_core::NotePatch;

use super::{print_json, Hub};

#[derive(Subcommand)]
pub enum NoteAction {
    /// Create a note (a blank title becomes "Untitled")
    Add {
        /// Note title
        #[arg(long, default_value = "")]
        title: String,
        /// Body text, markdown
        #[arg(long, default_value = "")]
        content: String,
    },
    /// Edit title or body
    Update {
        /// Note ID
        id: String,
        /// New title
        #[arg(long)]
        title: Option<String>,
        /// New body
        #[arg(long)]
        content: Option<String>,
    },
    /// Delete a note
    Rm {
        /// Note ID
        id: String,
    },
    /// List notes as JSON
    List,
}

pub fn run(action: NoteAction) -> Result<(), Box<dyn std::error::Error>> {
    let mut hub = Hub::open()?;

    match action {
        NoteAction::Add { title, content } => {
            match hub.store.add_note(&title, &content, Utc::now()) {
                Some(id) => {
                    println!("note created: {id}");
                    if let Some(note) = hub.store.notes().iter().find(|n| n.id == id) {
                        print_json(note)?;
                    }
                }
                None => return Err("refused: title and content are both blank".into()),
            }
        }
        NoteAction::Update { id, title, content } => {
            let patch = NotePatch { title, content };
            if !hub.store.update_note(&id, patch, Utc::now()) {
                return Err(format!("nothing changed: unknown note or blank result ({id})").into());
            }
            println!("note updated: {id}");
        }
        NoteAction::Rm { id } => {
            if !hub.store.delete_note(&id) {
                return Err(format!("no such note: {id}").into());
            }
            println!("note deleted: {id}");
        }
        NoteAction::List => {
            // Reads leave the snapshot untouched.
            return print_json(&hub.store.notes());
        }
    }

    hub.commit()?;
    Ok(())
}
