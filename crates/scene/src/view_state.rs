use feed::filter::FilterMode;
use foundation::geo::GeoPoint;

/// Which spatial rendering is active.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum ProjectionMode {
    /// Rotating 3D globe.
    #[default]
    Sphere,
    /// 2D tile map centered on the focus coordinate.
    Map,
}

/// UI-owned view state. Never persisted; reset on mode toggles.
///
/// Invariant: `filter` always reflects the session guard; `History` is
/// never stored for an anonymous viewer, so every consumer can trust the
/// stored mode without re-checking the session.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewState {
    projection: ProjectionMode,
    filter: FilterMode,
    focus: GeoPoint,
    device_location: Option<GeoPoint>,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            projection: ProjectionMode::Sphere,
            filter: FilterMode::Live,
            // Mid-Atlantic default focus before any zoom has resolved one.
            focus: GeoPoint::new(20.0, 0.0),
            device_location: None,
        }
    }
}

impl ViewState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn projection(&self) -> ProjectionMode {
        self.projection
    }

    pub fn filter(&self) -> FilterMode {
        self.filter
    }

    pub fn focus(&self) -> GeoPoint {
        self.focus
    }

    pub fn device_location(&self) -> Option<GeoPoint> {
        self.device_location
    }

    /// Record the one-shot device location result.
    pub fn set_device_location(&mut self, location: GeoPoint) {
        if location.is_finite() {
            self.device_location = Some(location.normalized());
        }
    }

    /// Switch to the map view centered on `focus`.
    ///
    /// Non-finite coordinates are ignored and leave the state untouched
    /// (a degenerate pick must not strand the user on a broken map).
    pub fn enter_map(&mut self, focus: GeoPoint) -> bool {
        if !focus.is_finite() {
            return false;
        }
        self.focus = focus.normalized();
        self.projection = ProjectionMode::Map;
        true
    }

    /// Return to the sphere view. The focus is kept so the globe can spin
    /// back up over the same region.
    pub fn return_to_sphere(&mut self) {
        self.projection = ProjectionMode::Sphere;
    }

    /// Request a filter mode; returns the mode actually applied after the
    /// anonymous-session guard.
    pub fn set_filter(&mut self, requested: FilterMode, viewer_is_anonymous: bool) -> FilterMode {
        self.filter = requested.guarded(viewer_is_anonymous);
        self.filter
    }

    /// Flip between live feed and personal history, subject to the guard.
    pub fn toggle_filter(&mut self, viewer_is_anonymous: bool) -> FilterMode {
        let requested = match self.filter {
            FilterMode::Live => FilterMode::History,
            FilterMode::History => FilterMode::Live,
        };
        self.set_filter(requested, viewer_is_anonymous)
    }

    /// Re-apply the guard after a session change (sign-out drops history).
    pub fn on_session_changed(&mut self, viewer_is_anonymous: bool) {
        self.filter = self.filter.guarded(viewer_is_anonymous);
    }
}

#[cfg(test)]
mod tests {
    use super::{ProjectionMode, ViewState};
    use feed::filter::FilterMode;
    use foundation::geo::GeoPoint;

    #[test]
    fn starts_on_the_sphere_live_feed() {
        let state = ViewState::new();
        assert_eq!(state.projection(), ProjectionMode::Sphere);
        assert_eq!(state.filter(), FilterMode::Live);
        assert_eq!(state.focus(), GeoPoint::new(20.0, 0.0));
    }

    #[test]
    fn enter_map_sets_focus_and_mode() {
        let mut state = ViewState::new();
        assert!(state.enter_map(GeoPoint::new(35.0, 139.7)));
        assert_eq!(state.projection(), ProjectionMode::Map);
        assert_eq!(state.focus(), GeoPoint::new(35.0, 139.7));
    }

    #[test]
    fn enter_map_rejects_non_finite_focus() {
        let mut state = ViewState::new();
        assert!(!state.enter_map(GeoPoint::new(f64::NAN, 0.0)));
        assert_eq!(state.projection(), ProjectionMode::Sphere);
    }

    #[test]
    fn return_to_sphere_keeps_the_focus() {
        let mut state = ViewState::new();
        state.enter_map(GeoPoint::new(-33.9, 18.4));
        state.return_to_sphere();
        assert_eq!(state.projection(), ProjectionMode::Sphere);
        assert_eq!(state.focus(), GeoPoint::new(-33.9, 18.4));
    }

    #[test]
    fn anonymous_toggle_never_lands_on_history() {
        let mut state = ViewState::new();
        assert_eq!(state.toggle_filter(true), FilterMode::Live);
        assert_eq!(state.filter(), FilterMode::Live);

        assert_eq!(state.toggle_filter(false), FilterMode::History);
        assert_eq!(state.filter(), FilterMode::History);
    }

    #[test]
    fn session_change_drops_history_for_anonymous() {
        let mut state = ViewState::new();
        state.set_filter(FilterMode::History, false);
        assert_eq!(state.filter(), FilterMode::History);

        // Sign-out: the replacement session is anonymous again.
        state.on_session_changed(true);
        assert_eq!(state.filter(), FilterMode::Live);
    }

    #[test]
    fn device_location_is_normalized_and_validated() {
        let mut state = ViewState::new();
        state.set_device_location(GeoPoint::new(f64::NAN, 0.0));
        assert_eq!(state.device_location(), None);

        state.set_device_location(GeoPoint::new(51.5, 200.0));
        assert_eq!(state.device_location(), Some(GeoPoint::new(51.5, -160.0)));
    }
}
