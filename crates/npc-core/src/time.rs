//! Simulation time model.
//!
//! # Design
//!
//! Time is an integer count of simulated minutes since day 0, 00:00.  Using
//! whole minutes as the canonical unit means every schedule operation (push
//! back by one minute, window containment, cycle accumulation) is exact, with no
//! floating-point drift between ticks.
//!
//! `SimClock` advances `minutes_per_tick` minutes per simulation step and can
//! be paused.  Components that only need to *read* time take the [`Clock`]
//! trait so tests can drive them with any source.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};

use crate::CoreError;

pub const MINUTES_PER_HOUR: u64 = 60;
pub const MINUTES_PER_DAY: u64 = 24 * MINUTES_PER_HOUR;

// ── TimeOfDay ─────────────────────────────────────────────────────────────────

/// An absolute simulated time, in minutes since day 0 00:00.
///
/// Monotonically non-decreasing while the simulation runs.  Despite the name
/// it is not wrapped at midnight; day boundaries are derived with
/// [`day`](Self::day).
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default, Serialize)]
#[serde(transparent)]
pub struct TimeOfDay(pub u64);

impl TimeOfDay {
    pub const ZERO: TimeOfDay = TimeOfDay(0);

    /// `hour:minute` on day 0.
    #[inline]
    pub const fn hm(hour: u32, minute: u32) -> TimeOfDay {
        TimeOfDay(hour as u64 * MINUTES_PER_HOUR + minute as u64)
    }

    /// `hour:minute` on day `day`.
    #[inline]
    pub const fn dhm(day: u64, hour: u32, minute: u32) -> TimeOfDay {
        TimeOfDay(day * MINUTES_PER_DAY + hour as u64 * MINUTES_PER_HOUR + minute as u64)
    }

    /// Return the time `minutes` after `self`.
    #[inline]
    pub fn offset(self, minutes: u64) -> TimeOfDay {
        TimeOfDay(self.0 + minutes)
    }

    /// Minutes elapsed from `earlier` to `self`; zero if `earlier` is later.
    #[inline]
    pub fn since(self, earlier: TimeOfDay) -> u64 {
        self.0.saturating_sub(earlier.0)
    }

    #[inline]
    pub fn day(self) -> u64 {
        self.0 / MINUTES_PER_DAY
    }

    #[inline]
    pub fn hour(self) -> u32 {
        ((self.0 % MINUTES_PER_DAY) / MINUTES_PER_HOUR) as u32
    }

    #[inline]
    pub fn minute(self) -> u32 {
        (self.0 % MINUTES_PER_HOUR) as u32
    }
}

impl std::ops::Add<u64> for TimeOfDay {
    type Output = TimeOfDay;
    #[inline]
    fn add(self, rhs: u64) -> TimeOfDay {
        TimeOfDay(self.0 + rhs)
    }
}

impl std::ops::Sub for TimeOfDay {
    type Output = u64;
    #[inline]
    fn sub(self, rhs: TimeOfDay) -> u64 {
        self.since(rhs)
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.day() {
            0 => write!(f, "{:02}:{:02}", self.hour(), self.minute()),
            d => write!(f, "d{} {:02}:{:02}", d, self.hour(), self.minute()),
        }
    }
}

impl FromStr for TimeOfDay {
    type Err = CoreError;

    /// Accepts `HH:MM` or `dN HH:MM`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let bad = || CoreError::Parse(format!("invalid time {s:?}: expected \"HH:MM\" or \"dN HH:MM\""));

        let (day, clock) = match s.split_once(' ') {
            Some((d, rest)) => {
                let day = d
                    .strip_prefix('d')
                    .and_then(|n| n.parse::<u64>().ok())
                    .ok_or_else(bad)?;
                (day, rest.trim())
            }
            None => (0, s),
        };

        let (h, m) = clock.split_once(':').ok_or_else(bad)?;
        let hour: u32 = h.parse().map_err(|_| bad())?;
        let minute: u32 = m.parse().map_err(|_| bad())?;
        if hour >= 24 || minute >= 60 {
            return Err(bad());
        }
        Ok(TimeOfDay::dhm(day, hour, minute))
    }
}

impl<'de> Deserialize<'de> for TimeOfDay {
    /// Either a raw minute count or a clock string.
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Minutes(u64),
            Clock(String),
        }

        match Repr::deserialize(deserializer)? {
            Repr::Minutes(m) => Ok(TimeOfDay(m)),
            Repr::Clock(s) => s.parse().map_err(serde::de::Error::custom),
        }
    }
}

// ── Clock ─────────────────────────────────────────────────────────────────────

/// Read-only view of simulated time.
pub trait Clock {
    fn now(&self) -> TimeOfDay;
    fn is_paused(&self) -> bool;
}

// ── SimClock ──────────────────────────────────────────────────────────────────

/// The simulation's own clock: advanced once per step, pausable.
///
/// `SimClock` is cheap to copy and holds no heap data.
#[derive(Clone, Debug)]
pub struct SimClock {
    /// Current simulated time.
    pub current: TimeOfDay,
    /// Simulated minutes added by each [`advance`](Self::advance).
    pub minutes_per_tick: u32,
    /// Number of un-paused advances since construction.
    pub ticks_elapsed: u64,
    paused: bool,
}

impl SimClock {
    pub fn new(start: TimeOfDay, minutes_per_tick: u32) -> Self {
        Self {
            current: start,
            minutes_per_tick,
            ticks_elapsed: 0,
            paused: false,
        }
    }

    /// Advance by one tick.  A paused clock does not move.
    #[inline]
    pub fn advance(&mut self) {
        if self.paused {
            return;
        }
        self.current = self.current + self.minutes_per_tick as u64;
        self.ticks_elapsed += 1;
    }

    pub fn pause(&mut self) {
        self.paused = true;
    }

    pub fn resume(&mut self) {
        self.paused = false;
    }
}

impl Clock for SimClock {
    #[inline]
    fn now(&self) -> TimeOfDay {
        self.current
    }

    #[inline]
    fn is_paused(&self) -> bool {
        self.paused
    }
}

impl fmt::Display for SimClock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (tick {})", self.current, self.ticks_elapsed)?;
        if self.paused {
            write!(f, " [paused]")?;
        }
        Ok(())
    }
}
