//! Completed work-session history.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Upper bound on retained sessions; older entries fall off the end.
pub const SESSION_LOG_CAP: usize = 120;

/// One completed work interval. Immutable once recorded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FocusSession {
    pub id: String,
    pub started_at: DateTime<Utc>,
    pub duration_ms: u64,
}

impl FocusSession {
    /// Build a session with a fresh id.
    pub fn new(started_at: DateTime<Utc>, duration_ms: u64) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            started_at,
            duration_ms,
        }
    }
}

/// Most-recent-first log of completed work sessions, capped at
/// [`SESSION_LOG_CAP`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionLog(Vec<FocusSession>);

impl SessionLog {
    pub fn record(&mut self, session: FocusSession) {
        self.0.insert(0, session);
        self.0.truncate(SESSION_LOG_CAP);
    }

    pub fn latest(&self) -> Option<&FocusSession> {
        self.0.first()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FocusSession> + '_ {
        self.0.iter()
    }

    pub fn as_slice(&self) -> &[FocusSession] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(minute: i64) -> FocusSession {
        let at = DateTime::from_timestamp(minute * 60, 0).unwrap();
        FocusSession::new(at, 25 * 60 * 1000)
    }

    #[test]
    fn newest_session_comes_first() {
        let mut log = SessionLog::default();
        log.record(session(0));
        log.record(session(30));
        assert_eq!(log.len(), 2);
        assert_eq!(log.latest().unwrap().started_at.timestamp(), 30 * 60);
    }

    #[test]
    fn log_caps_at_120_dropping_the_oldest() {
        let mut log = SessionLog::default();
        for minute in 0..130 {
            log.record(session(minute));
        }
        assert_eq!(log.len(), SESSION_LOG_CAP);
        // Newest survives at the front, the ten oldest are gone.
        assert_eq!(log.latest().unwrap().started_at.timestamp(), 129 * 60);
        let oldest = log.iter().last().unwrap();
        assert_eq!(oldest.started_at.timestamp(), 10 * 60);
    }

    #[test]
    fn serializes_as_a_bare_array() {
        let mut log = SessionLog::default();
        log.record(session(1));
        let json = serde_json::to_value(&log).unwrap();
        assert!(json.is_array());
        assert_eq!(json.as_array().unwrap().len(), 1);
    }

    #[test]
    fn fresh_ids_are_unique() {
        let a = session(0);
        let b = session(0);
        assert_ne!(a.id, b.id);
    }
}
