//! Background task configuration.

use std::time::Duration;

use clap::Args;
use jiff::SignedDuration;

/// Gift expiry monitor settings.
#[derive(Debug, Clone, Copy, Args)]
pub struct ExpiryMonitorConfig {
    /// Seconds between expired-gift sweeps
    #[arg(long, env = "EXPIRY_SWEEP_SECS", default_value_t = 30)]
    pub sweep_secs: u64,

    /// Seconds between near-expiry warning scans
    #[arg(long, env = "EXPIRY_WARNING_SECS", default_value_t = 300)]
    pub warning_secs: u64,

    /// Size of the near-expiry warning window, in minutes
    #[arg(long, env = "EXPIRY_WARNING_WINDOW_MINS", default_value_t = 30)]
    pub warning_window_mins: u64,
}

impl ExpiryMonitorConfig {
    /// Interval between sweeps; the first sweep fires immediately.
    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_secs)
    }

    /// Interval between warning scans; the first scan fires one interval in.
    pub fn warning_interval(&self) -> Duration {
        Duration::from_secs(self.warning_secs)
    }

    /// The near-expiry warning window.
    pub fn warning_window(&self) -> SignedDuration {
        SignedDuration::from_mins(to_mins(self.warning_window_mins))
    }
}

impl Default for ExpiryMonitorConfig {
    fn default() -> Self {
        Self {
            sweep_secs: 30,
            warning_secs: 300,
            warning_window_mins: 30,
        }
    }
}

/// Abandoned-cart tracker settings.
#[derive(Debug, Clone, Copy, Args)]
pub struct AbandonedTrackerConfig {
    /// Minutes between abandoned-cart checks
    #[arg(long, env = "ABANDONED_CHECK_INTERVAL_MINS", default_value_t = 5)]
    pub check_interval_mins: u64,

    /// Minutes of inactivity before a cart counts as abandoned
    #[arg(long, env = "ABANDONED_DELAY_MINS", default_value_t = 30)]
    pub delay_mins: u64,
}

impl AbandonedTrackerConfig {
    /// Interval between idle checks.
    pub fn check_interval(&self) -> Duration {
        Duration::from_secs(self.check_interval_mins * 60)
    }

    /// Idle time after which a cart counts as abandoned.
    pub fn delay(&self) -> SignedDuration {
        SignedDuration::from_mins(to_mins(self.delay_mins))
    }
}

impl Default for AbandonedTrackerConfig {
    fn default() -> Self {
        Self {
            check_interval_mins: 5,
            delay_mins: 30,
        }
    }
}

fn to_mins(mins: u64) -> i64 {
    i64::try_from(mins).unwrap_or(i64::MAX)
}
