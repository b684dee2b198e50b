use foundation::geo::GeoPoint;
use runtime::poll::PollTimer;

use crate::camera::OrbitCamera;
use crate::picking::pick_globe_center;

/// Camera distance below which the sphere view hands off to the map.
pub const ZOOM_TRANSITION_DISTANCE: f64 = 6.5;

/// How often the distance check runs (seconds of frame time).
pub const ZOOM_POLL_PERIOD_S: f64 = 0.2;

/// Quiet period after scene load; camera setup must not trigger a handoff.
pub const TRANSITION_GRACE_S: f64 = 1.5;

/// Edge-triggered sphere-to-map handoff.
///
/// Contract:
/// - Fires at most once per approach: after a fire it stays disarmed until
///   [`ZoomTransition::rearm`] (called on return to the sphere view), so a
///   camera lingering below the threshold cannot re-trigger every poll.
/// - Never fires during the initial grace period.
/// - Only fires when the view center actually intersects the globe; a miss
///   leaves the transition armed for the next poll.
#[derive(Debug, Clone, PartialEq)]
pub struct ZoomTransition {
    timer: PollTimer,
    armed: bool,
}

impl Default for ZoomTransition {
    fn default() -> Self {
        Self::new()
    }
}

impl ZoomTransition {
    pub fn new() -> Self {
        Self::starting_at(0.0)
    }

    /// Anchor the grace period at `now_s` (scene creation or re-creation;
    /// returning from the map rebuilds the sphere scene and must get a
    /// fresh quiet period, same as the initial load).
    pub fn starting_at(now_s: f64) -> Self {
        Self {
            timer: PollTimer::starting_at(ZOOM_POLL_PERIOD_S, now_s + TRANSITION_GRACE_S),
            armed: true,
        }
    }

    /// Run one poll step; returns the focus coordinate when the handoff
    /// should happen this frame.
    pub fn poll(&mut self, time_s: f64, camera: &OrbitCamera) -> Option<GeoPoint> {
        if !self.armed || !self.timer.fire(time_s) {
            return None;
        }
        if camera.distance() >= ZOOM_TRANSITION_DISTANCE {
            return None;
        }
        let focus = pick_globe_center(camera)?;
        self.armed = false;
        Some(focus)
    }

    /// Re-enable the handoff after leaving the map view.
    pub fn rearm(&mut self) {
        self.armed = true;
    }

    pub fn is_armed(&self) -> bool {
        self.armed
    }
}

#[cfg(test)]
mod tests {
    use super::{TRANSITION_GRACE_S, ZOOM_POLL_PERIOD_S, ZoomTransition};
    use crate::camera::OrbitCamera;

    fn near_camera() -> OrbitCamera {
        let mut camera = OrbitCamera::new();
        camera.set_distance(6.0);
        camera
    }

    #[test]
    fn grace_period_suppresses_early_fires() {
        let mut transition = ZoomTransition::new();
        let camera = near_camera();
        assert_eq!(transition.poll(0.0, &camera), None);
        assert_eq!(transition.poll(TRANSITION_GRACE_S - 0.1, &camera), None);
        assert!(transition.poll(TRANSITION_GRACE_S, &camera).is_some());
    }

    #[test]
    fn fires_at_most_once_per_approach() {
        let mut transition = ZoomTransition::new();
        let camera = near_camera();
        let mut fires = 0;
        let mut t = TRANSITION_GRACE_S;
        for _ in 0..50 {
            if transition.poll(t, &camera).is_some() {
                fires += 1;
            }
            t += ZOOM_POLL_PERIOD_S;
        }
        assert_eq!(fires, 1);
        assert!(!transition.is_armed());
    }

    #[test]
    fn rearm_allows_the_next_approach() {
        let mut transition = ZoomTransition::new();
        let camera = near_camera();
        assert!(transition.poll(2.0, &camera).is_some());
        assert_eq!(transition.poll(4.0, &camera), None);

        transition.rearm();
        assert!(transition.poll(6.0, &camera).is_some());
    }

    #[test]
    fn restarted_scene_gets_a_fresh_grace_period() {
        let mut transition = ZoomTransition::starting_at(100.0);
        let camera = near_camera();
        assert_eq!(transition.poll(100.0, &camera), None);
        assert_eq!(transition.poll(101.0, &camera), None);
        assert!(transition.poll(101.5, &camera).is_some());
    }

    #[test]
    fn far_camera_never_fires() {
        let mut transition = ZoomTransition::new();
        let camera = OrbitCamera::new(); // default distance is well outside
        let mut t = TRANSITION_GRACE_S;
        for _ in 0..20 {
            assert_eq!(transition.poll(t, &camera), None);
            t += ZOOM_POLL_PERIOD_S;
        }
        assert!(transition.is_armed());
    }

    #[test]
    fn polls_are_rate_limited() {
        let mut transition = ZoomTransition::new();
        let mut camera = OrbitCamera::new();
        // First poll after grace sees a far camera and stays armed.
        assert_eq!(transition.poll(TRANSITION_GRACE_S, &camera), None);
        // Distance drops immediately after, but the next poll slot is a
        // fifth of a second away.
        camera.set_distance(6.0);
        assert_eq!(
            transition.poll(TRANSITION_GRACE_S + ZOOM_POLL_PERIOD_S / 2.0, &camera),
            None
        );
        assert!(
            transition
                .poll(TRANSITION_GRACE_S + ZOOM_POLL_PERIOD_S, &camera)
                .is_some()
        );
    }
}
