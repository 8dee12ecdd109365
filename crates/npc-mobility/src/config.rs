//! Travel-time configuration for [`TimedMovement`](crate::TimedMovement).
//!
//! ```toml
//! default_travel_minutes = 10
//! approach_minutes = 1
//!
//! [[routes]]
//! from = "house"
//! to = "tavern"
//! minutes = 4
//! ```

use serde::Deserialize;

use crate::{MobilityError, MobilityResult};

/// Symmetric travel time between two named locations.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct RouteTime {
    pub from:    String,
    pub to:      String,
    pub minutes: u64,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MovementConfig {
    /// Travel time between locations with no `routes` entry.
    pub default_travel_minutes: u64,
    /// Time to walk from a location's entrance to an interactable in it.
    pub approach_minutes: u64,
    pub routes: Vec<RouteTime>,
}

impl Default for MovementConfig {
    fn default() -> Self {
        Self {
            default_travel_minutes: 10,
            approach_minutes:       1,
            routes:                 Vec::new(),
        }
    }
}

impl MovementConfig {
    /// Minutes from `from` to `to`.  Zero when they are the same place.
    pub fn travel_minutes(&self, from: &str, to: &str) -> u64 {
        if from == to {
            return 0;
        }
        self.routes
            .iter()
            .find(|r| (r.from == from && r.to == to) || (r.from == to && r.to == from))
            .map_or(self.default_travel_minutes, |r| r.minutes)
    }

    pub fn validate(&self) -> MobilityResult<()> {
        if let Some(r) = self.routes.iter().find(|r| r.from == r.to) {
            return Err(MobilityError::Config(format!("route from {:?} to itself", r.from)));
        }
        Ok(())
    }
}
