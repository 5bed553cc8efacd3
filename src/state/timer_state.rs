//! Timer engine: a countdown state machine derived from stored instants
//!
//! Nothing ticks in the background. Remaining time is recomputed from the
//! phase start instant and the elapsed time banked before the last pause, and
//! phase boundaries are applied lazily whenever the timer is observed or
//! mutated.

use std::{
    fmt,
    time::{Duration, Instant},
};

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::timer_config::{Phase, TimerConfig, TimerMode};
use crate::utils::format::{ceil_secs, format_mm_ss};

/// Externally visible timer state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TimerState {
    Idle,
    Work,
    ShortBreak,
    LongBreak,
    Paused,
}

impl TimerState {
    pub fn as_str(&self) -> &'static str {
        match self {
            TimerState::Idle => "IDLE",
            TimerState::Work => "WORK",
            TimerState::ShortBreak => "SHORT_BREAK",
            TimerState::LongBreak => "LONG_BREAK",
            TimerState::Paused => "PAUSED",
        }
    }
}

impl fmt::Display for TimerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<Phase> for TimerState {
    fn from(phase: Phase) -> Self {
        match phase {
            Phase::Work => TimerState::Work,
            Phase::ShortBreak => TimerState::ShortBreak,
            Phase::LongBreak => TimerState::LongBreak,
        }
    }
}

/// Internal run state; each variant carries exactly the data it needs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Run {
    Idle,
    Active {
        phase: Phase,
        started_at: Instant,
        elapsed_before_pause: Duration,
    },
    Paused {
        phase: Phase,
        elapsed: Duration,
    },
}

/// Point-in-time view of a timer, as returned to clients
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimerInfo {
    pub current_state: TimerState,
    /// Underlying phase, also reported while paused
    pub phase: Option<Phase>,
    /// Remaining seconds in the current phase
    pub remaining_time: u64,
    pub remaining_time_formatted: String,
    /// Full length of the current phase in seconds
    pub phase_duration: u64,
    pub is_running: bool,
    pub cycles_completed: u32,
    pub progress_percentage: f64,
}

/// Per-session countdown state machine
#[derive(Debug, Clone)]
pub struct Timer {
    mode: TimerMode,
    config: TimerConfig,
    run: Run,
    cycles_completed: u32,
}

impl Timer {
    /// Create an idle timer
    pub fn new(mode: TimerMode, config: TimerConfig) -> Self {
        Self {
            mode,
            config,
            run: Run::Idle,
            cycles_completed: 0,
        }
    }

    pub fn mode(&self) -> TimerMode {
        self.mode
    }

    pub fn config(&self) -> &TimerConfig {
        &self.config
    }

    pub fn cycles_completed(&self) -> u32 {
        self.cycles_completed
    }

    /// State as of the last evaluation; call [`Timer::advance`] first for a
    /// current answer
    pub fn state(&self) -> TimerState {
        match self.run {
            Run::Idle => TimerState::Idle,
            Run::Active { phase, .. } => phase.into(),
            Run::Paused { .. } => TimerState::Paused,
        }
    }

    pub fn is_running(&self) -> bool {
        matches!(self.run, Run::Active { .. })
    }

    /// Start from idle or resume from pause. Returns false when already active.
    pub fn start(&mut self, now: Instant) -> bool {
        self.advance(now);
        match self.run {
            Run::Idle => {
                self.cycles_completed = 0;
                self.run = Run::Active {
                    phase: Phase::Work,
                    started_at: now,
                    elapsed_before_pause: Duration::ZERO,
                };
                true
            }
            Run::Paused { phase, elapsed } => {
                self.run = Run::Active {
                    phase,
                    started_at: now,
                    elapsed_before_pause: elapsed,
                };
                true
            }
            Run::Active { .. } => false,
        }
    }

    /// Freeze the active phase. Returns false when idle or already paused.
    pub fn pause(&mut self, now: Instant) -> bool {
        self.advance(now);
        match self.run {
            Run::Active {
                phase,
                started_at,
                elapsed_before_pause,
            } => {
                let elapsed = elapsed_before_pause + now.saturating_duration_since(started_at);
                self.run = Run::Paused {
                    phase,
                    elapsed: elapsed.min(self.config.duration_of(phase)),
                };
                true
            }
            Run::Idle | Run::Paused { .. } => false,
        }
    }

    /// Return to idle, discarding all progress
    pub fn reset(&mut self) {
        self.run = Run::Idle;
        self.cycles_completed = 0;
    }

    /// Apply every phase boundary crossed up to `now`. Each new phase begins
    /// at the exact boundary instant, so the result does not depend on how
    /// often the timer is observed. Returns the number of boundaries crossed.
    pub fn advance(&mut self, now: Instant) -> u32 {
        let mut crossed = 0;

        while let Run::Active {
            phase,
            started_at,
            elapsed_before_pause,
        } = self.run
        {
            let left = self
                .config
                .duration_of(phase)
                .saturating_sub(elapsed_before_pause);
            let boundary = started_at + left;
            if now < boundary {
                break;
            }

            crossed += 1;
            self.run = match self.next_phase(phase) {
                Some(next) => {
                    debug!("Phase {:?} completed, advancing to {:?}", phase, next);
                    Run::Active {
                        phase: next,
                        started_at: boundary,
                        elapsed_before_pause: Duration::ZERO,
                    }
                }
                None => {
                    debug!(
                        "Phase {:?} completed after {} cycles, halting",
                        phase, self.cycles_completed
                    );
                    Run::Idle
                }
            };
        }

        crossed
    }

    /// Advance to `now` and take a snapshot
    pub fn info(&mut self, now: Instant) -> TimerInfo {
        self.advance(now);
        self.snapshot(now)
    }

    /// Snapshot without applying phase boundaries
    pub fn snapshot(&self, now: Instant) -> TimerInfo {
        let (phase, elapsed) = match self.run {
            Run::Idle => (None, Duration::ZERO),
            Run::Active {
                phase,
                started_at,
                elapsed_before_pause,
            } => (
                Some(phase),
                elapsed_before_pause + now.saturating_duration_since(started_at),
            ),
            Run::Paused { phase, elapsed } => (Some(phase), elapsed),
        };

        let duration = phase
            .map(|p| self.config.duration_of(p))
            .unwrap_or(Duration::ZERO);
        let elapsed = elapsed.min(duration);
        let remaining = duration - elapsed;

        let progress_percentage = if duration.is_zero() {
            0.0
        } else {
            let ratio = elapsed.as_secs_f64() / duration.as_secs_f64() * 100.0;
            (ratio * 100.0).round() / 100.0
        };

        TimerInfo {
            current_state: self.state(),
            phase,
            remaining_time: ceil_secs(remaining),
            remaining_time_formatted: format_mm_ss(remaining),
            phase_duration: duration.as_secs(),
            is_running: self.is_running(),
            cycles_completed: self.cycles_completed,
            progress_percentage,
        }
    }

    /// Phase that follows `finished`, or None when the mode's cycle limit is reached
    fn next_phase(&mut self, finished: Phase) -> Option<Phase> {
        match finished {
            Phase::Work => {
                self.cycles_completed += 1;
                if self.cycles_completed % self.config.long_break_interval == 0 {
                    Some(Phase::LongBreak)
                } else {
                    Some(Phase::ShortBreak)
                }
            }
            Phase::ShortBreak | Phase::LongBreak => match self.mode.cycle_limit(&self.config) {
                Some(limit) if self.cycles_completed >= limit => None,
                _ => Some(Phase::Work),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn secs(n: u64) -> Duration {
        Duration::from_secs(n)
    }

    fn short_config() -> TimerConfig {
        TimerConfig {
            work: secs(10),
            short_break: secs(2),
            long_break: secs(5),
            long_break_interval: 4,
            classic_cycles: 4,
        }
    }

    #[test]
    fn test_new_timer_is_idle() {
        let t0 = Instant::now();
        let mut timer = Timer::new(TimerMode::Continuous, TimerConfig::default());
        let info = timer.info(t0);
        assert_eq!(info.current_state, TimerState::Idle);
        assert_eq!(info.remaining_time_formatted, "00:00");
        assert!(!info.is_running);
        assert_eq!(info.phase, None);
    }

    #[test]
    fn test_continuous_scenario() {
        let t0 = Instant::now();
        let mut timer = Timer::new(TimerMode::Continuous, TimerConfig::default());
        assert!(timer.start(t0));

        let info = timer.info(t0);
        assert_eq!(info.current_state, TimerState::Work);
        assert_eq!(info.remaining_time_formatted, "25:00");
        assert!(info.is_running);

        let info = timer.info(t0 + secs(1500));
        assert_eq!(info.current_state, TimerState::ShortBreak);
        assert_eq!(info.remaining_time_formatted, "05:00");
        assert!(info.is_running);
        assert_eq!(info.cycles_completed, 1);
    }

    #[test]
    fn test_remaining_time_counts_down() {
        let t0 = Instant::now();
        let mut timer = Timer::new(TimerMode::Continuous, TimerConfig::default());
        timer.start(t0);

        let info = timer.info(t0 + secs(61));
        assert_eq!(info.remaining_time, 1439);
        assert_eq!(info.remaining_time_formatted, "23:59");
        assert_eq!(info.phase_duration, 1500);
    }

    #[test]
    fn test_repeated_start_is_noop() {
        let t0 = Instant::now();
        let mut timer = Timer::new(TimerMode::Continuous, TimerConfig::default());
        assert!(timer.start(t0));
        assert!(!timer.start(t0 + secs(30)));
        assert!(!timer.start(t0 + secs(60)));

        let info = timer.info(t0 + secs(60));
        assert_eq!(info.remaining_time, 1440);
    }

    #[test]
    fn test_pause_resume_preserves_remaining_time() {
        let t0 = Instant::now();
        let mut timer = Timer::new(TimerMode::Continuous, TimerConfig::default());
        timer.start(t0);

        assert!(timer.pause(t0 + secs(100)));
        let paused = timer.info(t0 + secs(100));
        assert_eq!(paused.current_state, TimerState::Paused);
        assert_eq!(paused.phase, Some(Phase::Work));
        assert!(!paused.is_running);

        // Time spent paused does not count
        let later = timer.info(t0 + secs(5000));
        assert_eq!(later.remaining_time, paused.remaining_time);

        assert!(timer.start(t0 + secs(5000)));
        let resumed = timer.info(t0 + secs(5000));
        assert_eq!(resumed.current_state, TimerState::Work);
        assert_eq!(resumed.remaining_time, paused.remaining_time);
        assert_eq!(resumed.remaining_time, 1400);
    }

    #[test]
    fn test_pause_preserves_sub_second_precision() {
        let t0 = Instant::now();
        let mut timer = Timer::new(TimerMode::Continuous, short_config());
        timer.start(t0);
        timer.pause(t0 + Duration::from_millis(2_500));
        timer.start(t0 + secs(100));

        // 7.5s were left; after 7.4s more the work phase is still running
        let info = timer.info(t0 + secs(100) + Duration::from_millis(7_400));
        assert_eq!(info.current_state, TimerState::Work);
        let info = timer.info(t0 + secs(100) + Duration::from_millis(7_500));
        assert_eq!(info.current_state, TimerState::ShortBreak);
    }

    #[test]
    fn test_pause_when_idle_or_paused_is_noop() {
        let t0 = Instant::now();
        let mut timer = Timer::new(TimerMode::Continuous, short_config());
        assert!(!timer.pause(t0));
        assert_eq!(timer.state(), TimerState::Idle);

        timer.start(t0);
        assert!(timer.pause(t0 + secs(3)));
        assert!(!timer.pause(t0 + secs(4)));
        assert_eq!(timer.info(t0 + secs(4)).remaining_time, 7);
    }

    #[test]
    fn test_reset_returns_to_idle() {
        let t0 = Instant::now();
        let mut timer = Timer::new(TimerMode::Continuous, short_config());
        timer.start(t0);
        timer.info(t0 + secs(30));
        assert!(timer.cycles_completed() > 0);

        timer.reset();
        let info = timer.info(t0 + secs(30));
        assert_eq!(info.current_state, TimerState::Idle);
        assert_eq!(info.remaining_time, 0);
        assert_eq!(info.remaining_time_formatted, "00:00");
        assert_eq!(info.cycles_completed, 0);
        assert_eq!(info.progress_percentage, 0.0);

        timer.reset();
        assert_eq!(timer.state(), TimerState::Idle);
    }

    #[test]
    fn test_fourth_work_completion_takes_long_break() {
        let t0 = Instant::now();
        let mut timer = Timer::new(TimerMode::Continuous, short_config());
        timer.start(t0);

        let mut now = t0;
        let mut breaks = Vec::new();
        for _ in 0..8 {
            // finish work, record the break, finish the break
            now += secs(10);
            let info = timer.info(now);
            breaks.push(info.current_state);
            now += Duration::from_secs(info.phase_duration);
            assert_eq!(timer.info(now).current_state, TimerState::Work);
        }

        assert_eq!(
            breaks,
            vec![
                TimerState::ShortBreak,
                TimerState::ShortBreak,
                TimerState::ShortBreak,
                TimerState::LongBreak,
                TimerState::ShortBreak,
                TimerState::ShortBreak,
                TimerState::ShortBreak,
                TimerState::LongBreak,
            ]
        );
        assert_eq!(timer.cycles_completed(), 8);
    }

    #[test]
    fn test_advance_applies_every_crossed_boundary() {
        let t0 = Instant::now();
        let mut timer = Timer::new(TimerMode::Continuous, short_config());
        timer.start(t0);

        // work 10 + short 2 + work 10 = 22, then 1s into the second short break
        let crossed = timer.advance(t0 + secs(23));
        assert_eq!(crossed, 3);
        let info = timer.snapshot(t0 + secs(23));
        assert_eq!(info.current_state, TimerState::ShortBreak);
        assert_eq!(info.remaining_time, 1);
        assert_eq!(info.cycles_completed, 2);
    }

    #[test]
    fn test_pause_after_boundary_pauses_next_phase() {
        let t0 = Instant::now();
        let mut timer = Timer::new(TimerMode::Continuous, short_config());
        timer.start(t0);

        assert!(timer.pause(t0 + secs(11)));
        let info = timer.info(t0 + secs(11));
        assert_eq!(info.current_state, TimerState::Paused);
        assert_eq!(info.phase, Some(Phase::ShortBreak));
        assert_eq!(info.remaining_time, 1);
    }

    #[test]
    fn test_classic_mode_halts_after_cycle_limit() {
        let t0 = Instant::now();
        let mut config = short_config();
        config.classic_cycles = 2;
        config.long_break_interval = 2;
        let mut timer = Timer::new(TimerMode::Classic, config);
        timer.start(t0);

        // work, short, work, long
        let end = t0 + secs(10 + 2 + 10 + 5);
        let before = timer.info(end - Duration::from_millis(1));
        assert_eq!(before.current_state, TimerState::LongBreak);

        let info = timer.info(end);
        assert_eq!(info.current_state, TimerState::Idle);
        assert!(!info.is_running);
        assert_eq!(info.cycles_completed, 2);

        // Long after halting it stays idle
        assert_eq!(timer.info(end + secs(600)).current_state, TimerState::Idle);

        // Starting again begins a fresh round
        assert!(timer.start(end + secs(600)));
        let info = timer.info(end + secs(600));
        assert_eq!(info.current_state, TimerState::Work);
        assert_eq!(info.cycles_completed, 0);
    }

    #[test]
    fn test_continuous_mode_never_halts() {
        let t0 = Instant::now();
        let mut timer = Timer::new(TimerMode::Continuous, short_config());
        timer.start(t0);
        let info = timer.info(t0 + secs(10_000));
        assert!(info.is_running);
        assert_ne!(info.current_state, TimerState::Idle);
    }

    #[test]
    fn test_progress_percentage() {
        let t0 = Instant::now();
        let mut timer = Timer::new(TimerMode::Continuous, TimerConfig::default());
        timer.start(t0);
        let info = timer.info(t0 + secs(500));
        assert_eq!(info.progress_percentage, 33.33);
    }

    #[test]
    fn test_info_serializes_camel_case() {
        let t0 = Instant::now();
        let mut timer = Timer::new(TimerMode::Continuous, TimerConfig::default());
        timer.start(t0);
        let value = serde_json::to_value(timer.info(t0)).unwrap();
        assert_eq!(value["currentState"], "WORK");
        assert_eq!(value["remainingTimeFormatted"], "25:00");
        assert_eq!(value["isRunning"], true);
    }
}
