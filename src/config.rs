//! Configuration and CLI argument handling

use std::time::Duration;

use clap::Parser;

use crate::{
    error::TimerError,
    state::{ModeProfiles, TimerConfig},
};

/// CLI argument parsing structure
#[derive(Debug, Parser)]
#[command(name = "pomodoro-server")]
#[command(about = "A session-based HTTP server for focus timers")]
#[command(version = "1.0.0")]
pub struct Config {
    /// Port to bind the server to
    #[arg(short, long, default_value = "8080")]
    pub port: u16,

    /// Host address to bind to
    #[arg(long, default_value = "0.0.0.0")]
    pub host: String,

    /// CLASSIC mode work phase length in minutes
    #[arg(long, default_value = "25")]
    pub classic_work_minutes: u64,

    /// CLASSIC mode short break length in minutes
    #[arg(long, default_value = "5")]
    pub classic_short_break_minutes: u64,

    /// CLASSIC mode long break length in minutes
    #[arg(long, default_value = "15")]
    pub classic_long_break_minutes: u64,

    /// CONTINUOUS mode work phase length in minutes
    #[arg(long, default_value = "25")]
    pub continuous_work_minutes: u64,

    /// CONTINUOUS mode short break length in minutes
    #[arg(long, default_value = "5")]
    pub continuous_short_break_minutes: u64,

    /// CONTINUOUS mode long break length in minutes
    #[arg(long, default_value = "15")]
    pub continuous_long_break_minutes: u64,

    /// Take a long break after every N completed work phases
    #[arg(long, default_value = "4")]
    pub long_break_interval: u32,

    /// Work phases a CLASSIC timer runs before stopping
    #[arg(long, default_value = "4")]
    pub classic_cycles: u32,

    /// Evict sessions untouched for this many minutes (0 disables eviction)
    #[arg(long, default_value = "240")]
    pub session_ttl_minutes: u64,

    /// How often to look for idle sessions, in seconds
    #[arg(long, default_value = "60")]
    pub reap_interval_secs: u64,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Config {
    /// Parse configuration from command line arguments
    pub fn parse() -> Self {
        Parser::parse()
    }

    /// Get the server address as a formatted string
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Get the appropriate log level based on verbose flag
    pub fn log_level(&self) -> &'static str {
        if self.verbose { "debug" } else { "info" }
    }

    /// Per-mode phase durations for the session store
    pub fn mode_profiles(&self) -> Result<ModeProfiles, TimerError> {
        Ok(ModeProfiles {
            classic: TimerConfig::from_minutes(
                self.classic_work_minutes,
                self.classic_short_break_minutes,
                self.classic_long_break_minutes,
                self.long_break_interval,
                self.classic_cycles,
            )?,
            continuous: TimerConfig::from_minutes(
                self.continuous_work_minutes,
                self.continuous_short_break_minutes,
                self.continuous_long_break_minutes,
                self.long_break_interval,
                self.classic_cycles,
            )?,
        })
    }

    /// Idle session lifetime, or None when eviction is disabled
    pub fn session_ttl(&self) -> Option<Duration> {
        // An absurd TTL just means sessions are never evicted
        (self.session_ttl_minutes > 0)
            .then(|| Duration::from_secs(self.session_ttl_minutes.saturating_mul(60)))
    }

    pub fn reap_interval(&self) -> Duration {
        Duration::from_secs(self.reap_interval_secs.max(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::try_parse_from(["pomodoro-server"]).unwrap();
        assert_eq!(config.address(), "0.0.0.0:8080");
        assert_eq!(config.log_level(), "info");
        assert_eq!(config.mode_profiles().unwrap(), ModeProfiles::default());
        assert_eq!(config.session_ttl(), Some(Duration::from_secs(240 * 60)));
        assert_eq!(config.reap_interval(), Duration::from_secs(60));
    }

    #[test]
    fn test_custom_durations_per_mode() {
        let config = Config::try_parse_from([
            "pomodoro-server",
            "--continuous-work-minutes",
            "90",
            "--continuous-short-break-minutes",
            "10",
            "--classic-long-break-minutes",
            "20",
            "--long-break-interval",
            "3",
            "--session-ttl-minutes",
            "0",
            "-v",
        ])
        .unwrap();

        let profiles = config.mode_profiles().unwrap();
        assert_eq!(profiles.continuous.work, Duration::from_secs(90 * 60));
        assert_eq!(profiles.continuous.short_break, Duration::from_secs(10 * 60));
        assert_eq!(profiles.classic.work, Duration::from_secs(25 * 60));
        assert_eq!(profiles.classic.long_break, Duration::from_secs(20 * 60));
        assert_eq!(profiles.classic.long_break_interval, 3);
        assert_eq!(profiles.continuous.long_break_interval, 3);
        assert_eq!(config.session_ttl(), None);
        assert_eq!(config.log_level(), "debug");
    }

    #[test]
    fn test_zero_duration_is_configuration_error() {
        let config =
            Config::try_parse_from(["pomodoro-server", "--classic-work-minutes", "0"]).unwrap();
        assert!(matches!(
            config.mode_profiles(),
            Err(TimerError::Configuration(_))
        ));
    }

    #[test]
    fn test_huge_values_do_not_overflow() {
        let huge = u64::MAX.to_string();
        let config = Config::try_parse_from([
            "pomodoro-server",
            "--continuous-work-minutes",
            huge.as_str(),
            "--session-ttl-minutes",
            huge.as_str(),
        ])
        .unwrap();

        assert!(matches!(
            config.mode_profiles(),
            Err(TimerError::Configuration(_))
        ));
        assert_eq!(config.session_ttl(), Some(Duration::from_secs(u64::MAX)));
    }
}
