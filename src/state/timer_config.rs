//! Timer modes and phase duration configuration

use std::{fmt, str::FromStr, time::Duration};

use serde::{Deserialize, Serialize};

use crate::error::TimerError;

/// Longest phase a timer accepts
pub const MAX_PHASE_DURATION: Duration = Duration::from_secs(24 * 60 * 60);

/// How a timer behaves once a phase completes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TimerMode {
    /// Phases keep advancing until the timer is paused, reset or deleted
    Continuous,
    /// Phases advance for a fixed number of work cycles, then the timer stops
    Classic,
}

impl TimerMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            TimerMode::Continuous => "CONTINUOUS",
            TimerMode::Classic => "CLASSIC",
        }
    }

    /// Number of completed work phases after which the timer halts, if any
    pub fn cycle_limit(&self, config: &TimerConfig) -> Option<u32> {
        match self {
            TimerMode::Continuous => None,
            TimerMode::Classic => Some(config.classic_cycles),
        }
    }
}

impl fmt::Display for TimerMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TimerMode {
    type Err = TimerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "CONTINUOUS" => Ok(TimerMode::Continuous),
            "CLASSIC" => Ok(TimerMode::Classic),
            other => Err(TimerError::Configuration(format!(
                "unknown timer mode '{}', expected CONTINUOUS or CLASSIC",
                other
            ))),
        }
    }
}

/// One contiguous countdown interval
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Phase {
    Work,
    ShortBreak,
    LongBreak,
}

/// Phase lengths and sequencing rules for one timer mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerConfig {
    pub work: Duration,
    pub short_break: Duration,
    pub long_break: Duration,
    /// Every n-th completed work phase is followed by a long break
    pub long_break_interval: u32,
    /// Work cycles a CLASSIC timer runs before halting
    pub classic_cycles: u32,
}

impl TimerConfig {
    /// Build a configuration from whole minutes
    pub fn from_minutes(
        work: u64,
        short_break: u64,
        long_break: u64,
        long_break_interval: u32,
        classic_cycles: u32,
    ) -> Result<Self, TimerError> {
        let config = Self {
            work: minutes("work", work)?,
            short_break: minutes("short break", short_break)?,
            long_break: minutes("long break", long_break)?,
            long_break_interval,
            classic_cycles,
        };
        config.validate()?;
        Ok(config)
    }

    /// Reject configurations that would stall or loop the engine
    pub fn validate(&self) -> Result<(), TimerError> {
        let phases = [
            ("work", self.work),
            ("short break", self.short_break),
            ("long break", self.long_break),
        ];
        for (name, duration) in phases {
            if duration.is_zero() {
                return Err(TimerError::Configuration(format!(
                    "{} duration must be greater than zero",
                    name
                )));
            }
            if duration > MAX_PHASE_DURATION {
                return Err(TimerError::Configuration(format!(
                    "{} duration must not exceed {} hours",
                    name,
                    MAX_PHASE_DURATION.as_secs() / 3600
                )));
            }
        }
        if self.long_break_interval == 0 {
            return Err(TimerError::Configuration(
                "long break interval must be at least 1".to_string(),
            ));
        }
        if self.classic_cycles == 0 {
            return Err(TimerError::Configuration(
                "classic cycle count must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    pub fn duration_of(&self, phase: Phase) -> Duration {
        match phase {
            Phase::Work => self.work,
            Phase::ShortBreak => self.short_break,
            Phase::LongBreak => self.long_break,
        }
    }
}

fn minutes(name: &str, value: u64) -> Result<Duration, TimerError> {
    value
        .checked_mul(60)
        .map(Duration::from_secs)
        .ok_or_else(|| {
            TimerError::Configuration(format!("{} duration of {} minutes is out of range", name, value))
        })
}

impl Default for TimerConfig {
    fn default() -> Self {
        Self {
            work: Duration::from_secs(25 * 60),
            short_break: Duration::from_secs(5 * 60),
            long_break: Duration::from_secs(15 * 60),
            long_break_interval: 4,
            classic_cycles: 4,
        }
    }
}

/// Phase lengths for each timer mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ModeProfiles {
    pub classic: TimerConfig,
    pub continuous: TimerConfig,
}

impl ModeProfiles {
    pub fn for_mode(&self, mode: TimerMode) -> TimerConfig {
        match mode {
            TimerMode::Classic => self.classic,
            TimerMode::Continuous => self.continuous,
        }
    }

    pub fn validate(&self) -> Result<(), TimerError> {
        self.classic.validate()?;
        self.continuous.validate()
    }
}

/// Use the same lengths for both modes
impl From<TimerConfig> for ModeProfiles {
    fn from(config: TimerConfig) -> Self {
        Self {
            classic: config,
            continuous: config,
        }
    }
}
