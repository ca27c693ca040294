//! Subcommand implementations, one module per command family.

pub mod config;
pub mod habit;
pub mod note;
pub mod quote;
pub mod stats;
pub mod task;
pub mod timer;
pub mod view;

use chrono::Utc;
use focushub_core::{HubConfig, HubStore, SnapshotStore};
use tracing::warn;

/// A hub store hydrated from disk, plus the handles needed to write it back.
///
/// Every command works against the same snapshot file, so each invocation
/// picks up where the previous one left off. The restored timer is
/// re-anchored at open time; wall-clock time between invocations is never
/// charged to any accumulator.
pub struct Hub {
    pub store: HubStore,
    pub config: HubConfig,
    snapshots: SnapshotStore,
}

impl Hub {
    pub fn open() -> Result<Self, Box<dyn std::error::Error>> {
        let config = HubConfig::load_or_default();
        let snapshots = SnapshotStore::open_default()?;
        let now = Utc::now();
        let store = match snapshots.load() {
            Ok(Some(snapshot)) => HubStore::restore(snapshot, now),
            Ok(None) => HubStore::new(config.pomodoro, now),
            Err(e) => {
                // A broken snapshot stays on disk until the next commit.
                warn!(error = %e, "snapshot unreadable, starting fresh");
                HubStore::new(config.pomodoro, now)
            }
        };
        Ok(Self {
            store,
            config,
            snapshots,
        })
    }

    /// Persist the current state.
    pub fn commit(&self) -> Result<(), Box<dyn std::error::Error>> {
        self.snapshots.save(&self.store.snapshot(Utc::now()))?;
        Ok(())
    }

    /// Persist without failing the command, for high-frequency callers.
    pub fn commit_quietly(&self) {
        self.snapshots.save_quietly(&self.store.snapshot(Utc::now()));
    }
}

pub fn print_json<T: serde::Serialize>(value: &T) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
