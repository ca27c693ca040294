use clap::Subcommand;
use focushub_core::ViewKey;

use super::Hub;

#[derive(Subcommand)]
pub enum ViewAction {
    /// Print the active view
    Get,
    /// Switch the active view
    Set {
        /// One of: dashboard, planner, stats, settings
        view: String,
    },
}

pub fn run(action: ViewAction) -> Result<(), Box<dyn std::error::Error>> {
    let mut hub = Hub::open()?;

    match action {
        ViewAction::Get => println!("{}", hub.store.view()),
        ViewAction::Set { view } => {
            let view: ViewKey = view.parse()?;
            hub.store.set_view(view);
            hub.commit()?;
            println!("view: {view}");
        }
    }

    Ok(())
}
