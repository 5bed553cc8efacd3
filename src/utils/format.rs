//! Human-readable duration formatting

use std::time::Duration;

/// Whole seconds, rounding any fractional second up
pub fn ceil_secs(duration: Duration) -> u64 {
    if duration.subsec_nanos() > 0 {
        duration.as_secs() + 1
    } else {
        duration.as_secs()
    }
}

/// Format a countdown as `mm:ss`; minutes are not wrapped into hours
pub fn format_mm_ss(duration: Duration) -> String {
    let secs = ceil_secs(duration);
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

/// Format an uptime as `1h 2m 3s`, dropping leading zero units
pub fn format_uptime(duration: Duration) -> String {
    let hours = duration.as_secs() / 3600;
    let minutes = (duration.as_secs() % 3600) / 60;
    let seconds = duration.as_secs() % 60;

    if hours > 0 {
        format!("{}h {}m {}s", hours, minutes, seconds)
    } else if minutes > 0 {
        format!("{}m {}s", minutes, seconds)
    } else {
        format!("{}s", seconds)
    }
}
