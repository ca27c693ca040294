use std::thread;
use std::time::Duration;

use chrono::Utc;
use clap::Subcommand;
use focushub_core::date;
use focushub_core::Event;

use super::{print_json, Hub};

#[derive(Subcommand)]
pub enum TimerAction {
    /// Start or resume the countdown
    Start,
    /// Pause the countdown in place
    Pause,
    /// Stop and reload the current interval at full length
    Reset,
    /// Abandon the current interval and move on
    Skip,
    /// Print the current hub state as JSON
    Status,
    /// Change the pomodoro cycle settings
    Set {
        /// Work interval in minutes
        #[arg(long)]
        work: Option<u32>,
        /// Short break in minutes
        #[arg(long)]
        short: Option<u32>,
        /// Long break in minutes
        #[arg(long)]
        long: Option<u32>,
        /// Work sessions per long break
        #[arg(long)]
        every: Option<u32>,
    },
    /// Drive the clock: tick once a second and print events as they happen
    ///
    /// The countdown only advances while a watcher (or another host) is
    /// ticking the store, so leave this running during a session.
    Watch,
}

pub fn run(action: TimerAction) -> Result<(), Box<dyn std::error::Error>> {
    let mut hub = Hub::open()?;

    match action {
        TimerAction::Start => match hub.store.start_timer() {
            Some(event) => print_json(&event)?,
            None => {
                println!("already running");
                return Ok(());
            }
        },
        TimerAction::Pause => match hub.store.pause_timer() {
            Some(event) => print_json(&event)?,
            None => {
                println!("not running");
                return Ok(());
            }
        },
        TimerAction::Reset => {
            let event = hub.store.reset_timer();
            print_json(&event)?;
        }
        TimerAction::Skip => {
            let event = hub.store.skip_session();
            print_json(&event)?;
        }
        TimerAction::Status => {
            // Reads leave the snapshot untouched.
            return print_json(&hub.store.status());
        }
        TimerAction::Set {
            work,
            short,
            long,
            every,
        } => {
            let mut settings = hub.store.timer().settings();
            if let Some(work) = work {
                settings.work_min = work;
            }
            if let Some(short) = short {
                settings.short_break_min = short;
            }
            if let Some(long) = long {
                settings.long_break_min = long;
            }
            if let Some(every) = every {
                settings.long_break_every = every;
            }
            if !hub.store.set_settings(settings) {
                return Err("refused: every setting must be positive".into());
            }
            // config seeds new stores with the same cycle
            hub.config.pomodoro = settings;
            hub.config.save()?;
            print_json(&settings)?;
        }
        TimerAction::Watch => {
            println!("watching; ctrl-c to stop");
            loop {
                // Tick once a second, except when the interval boundary
                // lands inside the next second: then wake exactly on it.
                let sleep_ms = hub
                    .store
                    .timer()
                    .next_deadline_ms()
                    .map(|deadline| {
                        deadline
                            .saturating_sub(date::epoch_ms(Utc::now()))
                            .clamp(50, 1_000)
                    })
                    .unwrap_or(1_000);
                thread::sleep(Duration::from_millis(sleep_ms));
                let event = hub.store.tick(Utc::now());
                if let Some(event) = &event {
                    print_json(event)?;
                    if let Event::SessionCompleted { completed, next, .. } = event {
                        println!("{} finished; {} is loaded", completed.label(), next.label());
                    }
                }
                if hub.config.storage.autosave || event.is_some() {
                    hub.commit_quietly();
                }
            }
        }
    }

    hub.commit()?;
    Ok(())
}
