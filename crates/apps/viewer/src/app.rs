//! View composition root.
//!
//! `App` owns the record set, the view state and the camera, and talks to
//! the injected services. Everything runs on one cooperative loop:
//! snapshots and session changes are applied between frames, so a frame
//! never observes a half-updated record set. Marker sets are recomputed
//! from the full record set whenever the data, the filter or the session
//! changes, never patched incrementally.

use feed::counters::{StatCounts, stat_counts};
use feed::draft::{DraftError, RecordDraft};
use feed::filter::{FilterMode, ViewerIdentity, visible_records};
use feed::record::Record;
use feed::set::RecordSet;
use foundation::geo::GeoPoint;
use foundation::math::Vec3;
use layers::basemap::{BasemapLayer, DEFAULT_SURFACE_ZOOM};
use layers::orbit::OrbitMarkersLayer;
use layers::surface::SurfaceMarkersLayer;
use render::renderer::{Camera2D, Camera3D, RenderFrame, Renderer};
use runtime::event_bus::{Event, EventBus, kinds};
use runtime::frame::Frame;
use scene::camera::OrbitCamera;
use scene::transition::ZoomTransition;
use scene::view_state::{ProjectionMode, ViewState};
use sync::services::{
    DeviceLocator, RecordStore, SessionProvider, SnapshotReceiver, StoreError, system_now,
};
use sync::session::Session;
use tokio::sync::watch;
use tracing::{info, warn};

use crate::admin::AdminDashboard;
use crate::hud::HudModel;

/// Fixed frame step (seconds).
pub const FRAME_DT_S: f64 = 1.0 / 60.0;

/// Vertical field of view for the sphere camera.
const FOV_Y_RAD: f64 = 45.0 * std::f64::consts::PI / 180.0;

/// Tile block enumerated around the surface focus.
const SURFACE_VIEW_COLS: u32 = 5;
const SURFACE_VIEW_ROWS: u32 = 3;

/// Fallback author id when no session resolved (the store accepts it; the
/// record is simply unattributable).
const ANON_AUTHOR_ID: &str = "anon";

#[derive(Debug)]
pub enum SubmitError {
    Draft(DraftError),
    Store(StoreError),
}

impl std::fmt::Display for SubmitError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SubmitError::Draft(err) => write!(f, "rejected: {err}"),
            SubmitError::Store(err) => write!(f, "write failed: {err}"),
        }
    }
}

impl std::error::Error for SubmitError {}

/// What one frame produced.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameOutput {
    pub frame: Frame,
    pub render: RenderFrame,
    /// Set on the single frame where the sphere hands off to the map.
    pub transitioned: Option<GeoPoint>,
}

pub struct App {
    sessions: Box<dyn SessionProvider>,
    store: Box<dyn RecordStore>,
    locator: Box<dyn DeviceLocator>,

    records: RecordSet,
    visible: Vec<Record>,
    counts: StatCounts,
    session: Option<Session>,

    view: ViewState,
    camera: OrbitCamera,
    transition: ZoomTransition,
    orbit_layer: OrbitMarkersLayer,
    surface_layer: SurfaceMarkersLayer,

    frame: Frame,
    bus: EventBus,
    admin: Option<AdminDashboard>,
    alert: Option<String>,
    loading: bool,
}

impl App {
    pub fn new(
        sessions: Box<dyn SessionProvider>,
        store: Box<dyn RecordStore>,
        locator: Box<dyn DeviceLocator>,
    ) -> Self {
        Self {
            sessions,
            store,
            locator,
            records: RecordSet::new(),
            visible: Vec::new(),
            counts: StatCounts::default(),
            session: None,
            view: ViewState::new(),
            camera: OrbitCamera::new(),
            transition: ZoomTransition::new(),
            orbit_layer: OrbitMarkersLayer::new(1),
            surface_layer: SurfaceMarkersLayer::new(2),
            frame: Frame::new(0, FRAME_DT_S),
            bus: EventBus::new(),
            admin: None,
            alert: None,
            loading: true,
        }
    }

    /// Sign in, resolve the device location and open the record
    /// subscription. Sign-in and location failures are non-fatal; only a
    /// failed subscription aborts startup.
    pub async fn start(
        &mut self,
        auth_token: Option<String>,
    ) -> Result<SnapshotReceiver, StoreError> {
        let sign_in = async {
            match auth_token {
                Some(token) => self.sessions.sign_in_custom_token(token).await,
                None => self.sessions.sign_in_anonymous().await,
            }
        };
        let (session, location) = tokio::join!(sign_in, self.locator.locate());

        match session {
            Ok(session) => self.on_session(Some(session)),
            Err(err) => warn!(%err, "initial sign-in failed"),
        }
        match location {
            Ok(location) => self.view.set_device_location(location),
            Err(err) => info!(%err, "device location unresolved"),
        }

        self.store.subscribe().await
    }

    /// Advance one frame: camera, transition poll, layer extraction.
    pub fn tick(&mut self) -> FrameOutput {
        let frame = self.frame;
        self.camera.update(frame.dt_s);

        let mut transitioned = None;
        if self.view.projection() == ProjectionMode::Sphere {
            if let Some(focus) = self.transition.poll(frame.elapsed_s(), &self.camera) {
                if self.view.enter_map(focus) {
                    self.bus.emit(
                        frame,
                        kinds::TRANSITION,
                        format!("sphere -> map at {:.2},{:.2}", focus.lat_deg, focus.lng_deg),
                    );
                    transitioned = Some(focus);
                } else {
                    // Degenerate pick; stay on the sphere and keep polling.
                    self.transition.rearm();
                }
            }
        }

        let visible: Vec<&Record> = self.visible.iter().collect();
        let render = match self.view.projection() {
            ProjectionMode::Sphere => {
                let snapshot = self.orbit_layer.extract(&visible, frame.elapsed_s());
                let camera = Camera3D::look_at(self.camera.eye_position(), Vec3::ZERO, FOV_Y_RAD);
                Renderer::collect_sphere(&snapshot, camera)
            }
            ProjectionMode::Map => {
                let snapshot = self.surface_layer.extract(&visible);
                let tiles = BasemapLayer::visible_tiles(
                    self.view.focus(),
                    DEFAULT_SURFACE_ZOOM,
                    SURFACE_VIEW_COLS,
                    SURFACE_VIEW_ROWS,
                );
                let camera = Camera2D::new(self.view.focus(), DEFAULT_SURFACE_ZOOM);
                Renderer::collect_surface(&tiles, &snapshot, camera)
            }
        };

        self.frame = frame.next();
        FrameOutput {
            frame,
            render,
            transitioned,
        }
    }

    /// Atomically replace the record set with a pushed snapshot.
    pub fn apply_snapshot(&mut self, records: Vec<Record>) {
        self.records.apply_snapshot(records);
        self.counts = stat_counts(&self.records, system_now());
        self.loading = false;
        self.recompute_visible();
        self.bus.emit(
            self.frame,
            kinds::SNAPSHOT,
            format!("{} records (rev {})", self.records.len(), self.records.revision()),
        );
    }

    /// Apply an observed session transition.
    pub fn on_session(&mut self, session: Option<Session>) {
        self.session = session;
        let anonymous = self.viewer_is_anonymous();
        self.view.on_session_changed(anonymous);
        if anonymous {
            self.admin = None;
        }
        self.recompute_visible();
        let label = match &self.session {
            Some(s) => format!("{} (anonymous: {})", s.id, s.is_anonymous),
            None => "signed out".to_string(),
        };
        self.bus.emit(self.frame, kinds::SESSION, label);
    }

    /// Validate, place and append a confession.
    ///
    /// A draft that fails validation never reaches the store. A store
    /// failure drops the submission (no offline queue); the caller gets the
    /// error and the user resubmits by hand.
    pub async fn submit(&mut self, draft: RecordDraft) -> Result<(), SubmitError> {
        let author_id = self
            .session
            .as_ref()
            .map(|s| s.id.clone())
            .unwrap_or_else(|| ANON_AUTHOR_ID.to_string());
        let record = draft
            .compose(&author_id, self.view.device_location())
            .map_err(SubmitError::Draft)?;

        self.bus.emit(
            self.frame,
            kinds::SUBMISSION,
            format!("record by {author_id}"),
        );
        self.store.append(record).await.map_err(|err| {
            warn!(%err, "submission lost; manual resubmission required");
            SubmitError::Store(err)
        })
    }

    /// Federated sign-in. Success lands directly in personal history; the
    /// only blocking alert in the app is raised on failure.
    pub async fn sign_in_google(&mut self) -> Result<(), String> {
        match self.sessions.sign_in_federated().await {
            Ok(session) => {
                self.on_session(Some(session));
                self.set_filter(FilterMode::History);
                Ok(())
            }
            Err(err) => {
                let alert = if err.code.as_deref() == Some("auth/unauthorized-domain") {
                    "Login unavailable: this domain is not authorized with the identity provider."
                        .to_string()
                } else {
                    format!("Login failed: {}", err.message)
                };
                warn!(%err, "federated sign-in failed");
                self.alert = Some(alert.clone());
                Err(alert)
            }
        }
    }

    /// Sign out and immediately fall back to a fresh anonymous session.
    pub async fn sign_out(&mut self) {
        if let Err(err) = self.sessions.sign_out().await {
            info!(%err, "sign-out cleanup error");
        }
        self.on_session(None);
        match self.sessions.sign_in_anonymous().await {
            Ok(session) => self.on_session(Some(session)),
            Err(err) => warn!(%err, "anonymous re-sign-in failed"),
        }
    }

    pub fn set_filter(&mut self, mode: FilterMode) -> FilterMode {
        let applied = self.view.set_filter(mode, self.viewer_is_anonymous());
        self.recompute_visible();
        self.bus
            .emit(self.frame, kinds::FILTER, format!("{applied:?}"));
        applied
    }

    /// Flip live/history. Anonymous sessions stay on the live feed; the
    /// shell is expected to offer sign-in instead.
    pub fn toggle_history(&mut self) -> FilterMode {
        let applied = self.view.toggle_filter(self.viewer_is_anonymous());
        self.recompute_visible();
        self.bus
            .emit(self.frame, kinds::FILTER, format!("{applied:?}"));
        applied
    }

    /// Leave the map: rebuild the sphere scene with a fresh camera and a
    /// fresh transition grace period, exactly like the initial load.
    pub fn return_to_orbit(&mut self) {
        if self.view.projection() == ProjectionMode::Sphere {
            return;
        }
        self.view.return_to_sphere();
        self.camera = OrbitCamera::new();
        self.transition = ZoomTransition::starting_at(self.frame.elapsed_s());
        self.bus.emit(self.frame, kinds::TRANSITION, "map -> sphere");
    }

    /// The dashboard is decoration and members-only.
    pub fn open_admin(&mut self) -> Option<&mut AdminDashboard> {
        if self.viewer_is_anonymous() {
            return None;
        }
        Some(self.admin.get_or_insert_with(AdminDashboard::new))
    }

    pub fn hud(&self) -> HudModel {
        HudModel::compose(
            self.session.as_ref(),
            self.view.filter(),
            self.counts,
            self.loading,
            self.alert.clone(),
        )
    }

    /// Hand the pending blocking alert to the shell, clearing it.
    pub fn take_alert(&mut self) -> Option<String> {
        self.alert.take()
    }

    pub fn watch_session(&self) -> watch::Receiver<Option<Session>> {
        self.sessions.watch_session()
    }

    pub fn drain_events(&mut self) -> Vec<Event> {
        self.bus.drain()
    }

    pub fn camera_mut(&mut self) -> &mut OrbitCamera {
        &mut self.camera
    }

    pub fn projection(&self) -> ProjectionMode {
        self.view.projection()
    }

    pub fn filter(&self) -> FilterMode {
        self.view.filter()
    }

    pub fn focus(&self) -> GeoPoint {
        self.view.focus()
    }

    pub fn visible(&self) -> &[Record] {
        &self.visible
    }

    pub fn counts(&self) -> StatCounts {
        self.counts
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    fn viewer_is_anonymous(&self) -> bool {
        self.session.as_ref().map(|s| s.is_anonymous).unwrap_or(true)
    }

    fn viewer_identity(&self) -> ViewerIdentity {
        self.session
            .as_ref()
            .map(|s| s.viewer_identity())
            .unwrap_or(ViewerIdentity {
                id: ANON_AUTHOR_ID.to_string(),
                is_anonymous: true,
            })
    }

    /// Rebuild the visible slice from the full set. The `now` used by the
    /// live window is captured here; records age out on the next data or
    /// view change, matching the push-driven model.
    fn recompute_visible(&mut self) {
        let viewer = self.viewer_identity();
        self.visible = visible_records(&self.records, self.view.filter(), &viewer, system_now())
            .into_iter()
            .cloned()
            .collect();
    }
}
