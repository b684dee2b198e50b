//! Admin dashboard decoration.
//!
//! Every number here is synthetic: a seeded counter with a random walk and
//! fixed splits. There is no telemetry source behind any of it, and nothing
//! else in the app reads these values.

use rand::Rng;

/// Seed for the fake active-user counter.
const ACTIVE_USERS_SEED: i64 = 124;

/// Seven days of fake traffic bars, oldest first.
pub const TRAFFIC_BARS: [u32; 7] = [45, 52, 49, 62, 58, 74, 85];

/// Fake acquisition split, percent.
pub const ACQUISITION_SPLIT: [(&str, u32); 3] = [("Direct", 45), ("Search", 30), ("Referral", 25)];

/// Fake time-spent distribution, percent per bucket.
pub const TIME_SPENT_SPLIT: [u32; 4] = [20, 40, 25, 15];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminDashboard {
    active_users: i64,
}

impl AdminDashboard {
    pub fn new() -> Self {
        Self {
            active_users: ACTIVE_USERS_SEED,
        }
    }

    /// Random-walk step, one every couple of seconds while the panel is
    /// open. Steps are in [-2, 2].
    pub fn tick<R: Rng>(&mut self, rng: &mut R) {
        self.active_users += rng.gen_range(0i64..5) - 2;
    }

    pub fn active_users(&self) -> i64 {
        self.active_users
    }
}

impl Default for AdminDashboard {
    fn default() -> Self {
        Self::new()
    }
}
