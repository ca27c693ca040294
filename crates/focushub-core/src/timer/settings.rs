//! Pomodoro cycle configuration.

use serde::{Deserialize, Serialize};

/// Timer phase. `Work` counts toward focus totals; the breaks do not.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PomodoroMode {
    Work,
    ShortBreak,
    LongBreak,
}

impl PomodoroMode {
    pub fn is_break(self) -> bool {
        !matches!(self, PomodoroMode::Work)
    }

    /// Human-readable phase name for host display.
    pub fn label(self) -> &'static str {
        match self {
            PomodoroMode::Work => "Work",
            PomodoroMode::ShortBreak => "Short break",
            PomodoroMode::LongBreak => "Long break",
        }
    }
}

impl std::fmt::Display for PomodoroMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let key = match self {
            PomodoroMode::Work => "work",
            PomodoroMode::ShortBreak => "short-break",
            PomodoroMode::LongBreak => "long-break",
        };
        f.write_str(key)
    }
}

/// Cycle lengths in minutes plus the long-break cadence.
///
/// All four fields must be positive; `is_valid` gates every write path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PomodoroSettings {
    #[serde(default = "default_work_min")]
    pub work_min: u32,
    #[serde(default = "default_short_break_min")]
    pub short_break_min: u32,
    #[serde(default = "default_long_break_min")]
    pub long_break_min: u32,
    /// A long break replaces the short one after every Nth work session.
    #[serde(default = "default_long_break_every")]
    pub long_break_every: u32,
}

fn default_work_min() -> u32 {
    25
}

fn default_short_break_min() -> u32 {
    5
}

fn default_long_break_min() -> u32 {
    15
}

fn default_long_break_every() -> u32 {
    4
}

impl Default for PomodoroSettings {
    fn default() -> Self {
        Self {
            work_min: default_work_min(),
            short_break_min: default_short_break_min(),
            long_break_min: default_long_break_min(),
            long_break_every: default_long_break_every(),
        }
    }
}

impl PomodoroSettings {
    pub fn is_valid(&self) -> bool {
        self.work_min > 0
            && self.short_break_min > 0
            && self.long_break_min > 0
            && self.long_break_every > 0
    }

    /// Planned interval length for `mode`, in milliseconds.
    pub fn duration_ms(&self, mode: PomodoroMode) -> u64 {
        let minutes = match mode {
            PomodoroMode::Work => self.work_min,
            PomodoroMode::ShortBreak => self.short_break_min,
            PomodoroMode::LongBreak => self.long_break_min,
        };
        u64::from(minutes) * 60 * 1000
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_the_classic_cycle() {
        let settings = PomodoroSettings::default();
        assert_eq!(settings.work_min, 25);
        assert_eq!(settings.short_break_min, 5);
        assert_eq!(settings.long_break_min, 15);
        assert_eq!(settings.long_break_every, 4);
        assert!(settings.is_valid());
    }

    #[test]
    fn durations_convert_minutes_to_ms() {
        let settings = PomodoroSettings::default();
        assert_eq!(settings.duration_ms(PomodoroMode::Work), 25 * 60 * 1000);
        assert_eq!(settings.duration_ms(PomodoroMode::ShortBreak), 5 * 60 * 1000);
        assert_eq!(settings.duration_ms(PomodoroMode::LongBreak), 15 * 60 * 1000);
    }

    #[test]
    fn zero_fields_are_invalid() {
        let mut settings = PomodoroSettings::default();
        settings.long_break_every = 0;
        assert!(!settings.is_valid());
    }

    #[test]
    fn modes_serialize_kebab_case() {
        assert_eq!(
            serde_json::to_string(&PomodoroMode::ShortBreak).unwrap(),
            "\"short-break\""
        );
        assert_eq!(
            serde_json::from_str::<PomodoroMode>("\"long-break\"").unwrap(),
            PomodoroMode::LongBreak
        );
    }

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let settings: PomodoroSettings = serde_json::from_str("{\"work_min\": 50}").unwrap();
        assert_eq!(settings.work_min, 50);
        assert_eq!(settings.short_break_min, 5);
        assert_eq!(settings.long_break_every, 4);
    }
}
