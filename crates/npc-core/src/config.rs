//! Run configuration.
//!
//! Typically loaded from a TOML file by the application crate and handed to
//! `npc_sim::SimBuilder`.  Every field has a default, so a config file only
//! needs to mention what it changes:
//!
//! ```toml
//! start_time           = "06:00"
//! minutes_per_tick     = 1
//! total_ticks          = 1440
//! idle_timeout_minutes = 10
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{CoreError, CoreResult, SimClock, TimeOfDay};

/// Top-level simulation configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SimConfig {
    /// Simulated time of the first tick.
    pub start_time: TimeOfDay,

    /// Simulated minutes per tick.  Must be > 0.
    pub minutes_per_tick: u32,

    /// Total ticks simulated by `Sim::run`.
    pub total_ticks: u64,

    /// Master RNG seed.  The same seed always produces identical results.
    pub seed: u64,

    /// How long an agent may sit in `Waiting` with nothing to do before it
    /// asks the decision service for something reactive.
    pub idle_timeout_minutes: u64,

    /// Gap inserted after a higher-importance activity when a conflicting
    /// one is pushed back.
    pub push_back_gap_minutes: u64,

    /// Emit an agent snapshot every N ticks.  0 disables snapshots.
    pub output_interval_ticks: u64,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            start_time:            TimeOfDay::hm(6, 0),
            minutes_per_tick:      1,
            total_ticks:           24 * 60,
            seed:                  0,
            idle_timeout_minutes:  10,
            push_back_gap_minutes: 1,
            output_interval_ticks: 60,
        }
    }
}

impl SimConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml_str(s: &str) -> CoreResult<Self> {
        let config: SimConfig = toml::from_str(s)?;
        config.validate()?;
        debug!(?config, "loaded simulation config");
        Ok(config)
    }

    /// Read, parse, and validate a TOML file.
    pub fn load(path: &Path) -> CoreResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    pub fn validate(&self) -> CoreResult<()> {
        if self.minutes_per_tick == 0 {
            return Err(CoreError::Config("minutes_per_tick must be > 0".into()));
        }
        if self.idle_timeout_minutes == 0 {
            return Err(CoreError::Config("idle_timeout_minutes must be > 0".into()));
        }
        Ok(())
    }

    /// Simulated time at which [`total_ticks`](Self::total_ticks) have elapsed.
    #[inline]
    pub fn end_time(&self) -> TimeOfDay {
        self.start_time + self.total_ticks * self.minutes_per_tick as u64
    }

    /// Construct a `SimClock` pre-configured for this run.
    pub fn make_clock(&self) -> SimClock {
        SimClock::new(self.start_time, self.minutes_per_tick)
    }
}
