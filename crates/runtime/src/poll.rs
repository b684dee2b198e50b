/// Fixed-interval gate on the frame timebase.
///
/// The zoom-distance check runs every 200 ms rather than every frame; this
/// timer decides, per frame, whether the interval has elapsed. It is driven
/// exclusively by frame time so polling stays deterministic under replay.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PollTimer {
    period_s: f64,
    next_fire_s: f64,
}

impl PollTimer {
    pub fn new(period_s: f64) -> Self {
        Self {
            period_s,
            next_fire_s: 0.0,
        }
    }

    /// A timer that stays quiet until `start_s`, then fires on its period.
    pub fn starting_at(period_s: f64, start_s: f64) -> Self {
        Self {
            period_s,
            next_fire_s: start_s,
        }
    }

    /// True when the period has elapsed; rearms for the next interval.
    ///
    /// Rearming is relative to the observed time, not the scheduled time, so
    /// a stalled loop fires once after the stall instead of bursting.
    pub fn fire(&mut self, time_s: f64) -> bool {
        if time_s < self.next_fire_s {
            return false;
        }
        self.next_fire_s = time_s + self.period_s;
        true
    }
}
