//! Quaternion orbit camera for the globe view.
//!
//! The camera orbits a radius-5 globe at the origin:
//! - Quaternion orientation, so dragging over the poles never gimbal-locks
//! - Arcball (virtual trackball) rotation from pointer input
//! - Exponential smooth zoom toward a target distance
//! - Slow automatic rotation while the user is not dragging
//! - Interaction sensitivity scales with camera distance, so close-up
//!   drags stay controllable

use foundation::math::Vec3;

/// Closest approach to the globe surface (render units).
pub const MIN_DISTANCE: f64 = 5.5;

/// Farthest orbit distance (render units).
pub const MAX_DISTANCE: f64 = 30.0;

/// Starting orbit distance.
pub const DEFAULT_DISTANCE: f64 = 19.7;

/// Idle rotation rate (radians per second, eastward drift).
const AUTO_ROTATE_RAD_PER_S: f64 = 0.052;

/// Zoom smoothing factor (higher = faster response).
const ZOOM_SMOOTHING: f64 = 8.0;

/// Per-unit-distance rotation sensitivity.
const ROTATE_SENSITIVITY: f64 = 0.02;

#[derive(Debug, Clone)]
pub struct OrbitCamera {
    /// Camera orientation around the globe as a unit quaternion [x, y, z, w].
    orientation: [f64; 4],
    distance: f64,
    target_distance: f64,
    canvas_width: f64,
    canvas_height: f64,
    dragging: bool,
    arcball_last_unit: Option<Vec3>,
}

impl Default for OrbitCamera {
    fn default() -> Self {
        // Start tilted slightly north, mid-Atlantic in view.
        let orientation = quat_from_yaw_pitch(160f64.to_radians(), 24f64.to_radians());
        Self {
            orientation,
            distance: DEFAULT_DISTANCE,
            target_distance: DEFAULT_DISTANCE,
            canvas_width: 1280.0,
            canvas_height: 720.0,
            dragging: false,
            arcball_last_unit: None,
        }
    }
}

impl OrbitCamera {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_canvas_size(&mut self, width: f64, height: f64) {
        self.canvas_width = width.max(1.0);
        self.canvas_height = height.max(1.0);
    }

    pub fn on_pointer_down(&mut self, pos_px: [f64; 2]) {
        self.dragging = true;
        self.arcball_last_unit = Some(self.screen_to_arcball(pos_px));
    }

    pub fn on_pointer_move(&mut self, pos_px: [f64; 2]) {
        if !self.dragging {
            return;
        }
        let next_unit = self.screen_to_arcball(pos_px);
        if let Some(prev_unit) = self.arcball_last_unit {
            let delta = quat_from_unit_vectors(prev_unit, next_unit);
            // Damp the full arcball delta when close to the surface.
            let scaled = quat_slerp(QUAT_IDENTITY, delta, self.rotate_scale());
            self.orientation = quat_normalize(quat_mul(scaled, self.orientation));
        }
        self.arcball_last_unit = Some(next_unit);
    }

    pub fn on_pointer_up(&mut self) {
        self.dragging = false;
        self.arcball_last_unit = None;
    }

    /// Wheel zoom: positive delta zooms out, negative zooms in.
    pub fn on_wheel(&mut self, delta: f64) {
        let zoom_factor = (delta * 0.002).exp();
        self.target_distance =
            (self.target_distance * zoom_factor).clamp(MIN_DISTANCE, MAX_DISTANCE);
    }

    /// Advance the camera by one frame.
    pub fn update(&mut self, dt_s: f64) {
        let dt = dt_s.clamp(0.0, 0.1);

        if !self.dragging {
            let half = AUTO_ROTATE_RAD_PER_S * dt * 0.5;
            let spin = [0.0, half.sin(), 0.0, half.cos()];
            self.orientation = quat_normalize(quat_mul(spin, self.orientation));
        }

        let zoom_alpha = 1.0 - (-ZOOM_SMOOTHING * dt).exp();
        self.distance += (self.target_distance - self.distance) * zoom_alpha;
        self.distance = self.distance.clamp(MIN_DISTANCE, MAX_DISTANCE);
    }

    /// Eye position in render space (the globe center is the orbit target).
    pub fn eye_position(&self) -> Vec3 {
        quat_rotate_vec3(self.orientation, Vec3::new(0.0, 0.0, self.distance))
    }

    /// Normalized direction from the eye toward the globe center.
    pub fn forward_direction(&self) -> Vec3 {
        (Vec3::ZERO - self.eye_position())
            .normalized()
            .unwrap_or(Vec3::new(0.0, 0.0, -1.0))
    }

    pub fn distance(&self) -> f64 {
        self.distance
    }

    /// Snap the distance, bypassing zoom smoothing (used when syncing from
    /// the surface view).
    pub fn set_distance(&mut self, distance: f64) {
        let clamped = distance.clamp(MIN_DISTANCE, MAX_DISTANCE);
        self.distance = clamped;
        self.target_distance = clamped;
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    fn rotate_scale(&self) -> f64 {
        (self.distance * ROTATE_SENSITIVITY).clamp(0.05, 1.0)
    }

    /// Map a pixel position onto the arcball sphere.
    fn screen_to_arcball(&self, pos_px: [f64; 2]) -> Vec3 {
        let min_dim = self.canvas_width.min(self.canvas_height).max(1.0);
        let nx = (2.0 * pos_px[0] - self.canvas_width) / min_dim;
        let ny = (self.canvas_height - 2.0 * pos_px[1]) / min_dim;

        let r2 = nx * nx + ny * ny;
        let v = if r2 <= 1.0 {
            Vec3::new(nx, ny, (1.0 - r2).sqrt())
        } else {
            let inv_r = 1.0 / r2.sqrt();
            Vec3::new(nx * inv_r, ny * inv_r, 0.0)
        };
        v.normalized().unwrap_or(Vec3::new(0.0, 0.0, 1.0))
    }
}

// Quaternion helpers ([x, y, z, w]).

const QUAT_IDENTITY: [f64; 4] = [0.0, 0.0, 0.0, 1.0];

fn quat_from_yaw_pitch(yaw_rad: f64, pitch_rad: f64) -> [f64; 4] {
    // q = quat_yaw(Y axis) * quat_pitch(X axis)
    let half_yaw = yaw_rad * 0.5;
    let half_pitch = pitch_rad * 0.5;

    let cy = half_yaw.cos();
    let sy = half_yaw.sin();
    let cp = half_pitch.cos();
    let sp = half_pitch.sin();

    [cy * sp, sy * cp, -sy * sp, cy * cp]
}

fn quat_mul(a: [f64; 4], b: [f64; 4]) -> [f64; 4] {
    [
        a[3] * b[0] + a[0] * b[3] + a[1] * b[2] - a[2] * b[1],
        a[3] * b[1] - a[0] * b[2] + a[1] * b[3] + a[2] * b[0],
        a[3] * b[2] + a[0] * b[1] - a[1] * b[0] + a[2] * b[3],
        a[3] * b[3] - a[0] * b[0] - a[1] * b[1] - a[2] * b[2],
    ]
}

fn quat_normalize(q: [f64; 4]) -> [f64; 4] {
    let n = (q[0] * q[0] + q[1] * q[1] + q[2] * q[2] + q[3] * q[3]).sqrt();
    if n > 1e-10 {
        [q[0] / n, q[1] / n, q[2] / n, q[3] / n]
    } else {
        QUAT_IDENTITY
    }
}

fn quat_rotate_vec3(q: [f64; 4], v: Vec3) -> Vec3 {
    let qv = Vec3::new(q[0], q[1], q[2]);
    let t = qv.cross(v).scale(2.0);
    v + t.scale(q[3]) + qv.cross(t)
}

/// Quaternion rotating unit vector `a` onto unit vector `b`.
fn quat_from_unit_vectors(a: Vec3, b: Vec3) -> [f64; 4] {
    let dot = a.dot(b).clamp(-1.0, 1.0);

    // Nearly opposite: rotate half a turn around any orthogonal axis.
    if dot < -0.999999 {
        let mut axis = Vec3::new(1.0, 0.0, 0.0).cross(a);
        if axis.dot(axis) < 1e-12 {
            axis = Vec3::new(0.0, 1.0, 0.0).cross(a);
        }
        let axis = axis.normalized().unwrap_or(Vec3::new(0.0, 1.0, 0.0));
        return [axis.x, axis.y, axis.z, 0.0];
    }
    if dot > 0.999999 {
        return QUAT_IDENTITY;
    }

    let axis = a.cross(b);
    quat_normalize([axis.x, axis.y, axis.z, 1.0 + dot])
}

fn quat_slerp(a: [f64; 4], b: [f64; 4], t: f64) -> [f64; 4] {
    let mut dot = a[0] * b[0] + a[1] * b[1] + a[2] * b[2] + a[3] * b[3];

    let mut b = b;
    if dot < 0.0 {
        b = [-b[0], -b[1], -b[2], -b[3]];
        dot = -dot;
    }

    if dot > 0.9995 {
        return quat_normalize([
            a[0] + t * (b[0] - a[0]),
            a[1] + t * (b[1] - a[1]),
            a[2] + t * (b[2] - a[2]),
            a[3] + t * (b[3] - a[3]),
        ]);
    }

    let theta_0 = dot.clamp(-1.0, 1.0).acos();
    let theta = theta_0 * t;
    let sin_theta_0 = theta_0.sin();

    let s0 = theta.cos() - dot * theta.sin() / sin_theta_0;
    let s1 = theta.sin() / sin_theta_0;

    [
        s0 * a[0] + s1 * b[0],
        s0 * a[1] + s1 * b[1],
        s0 * a[2] + s1 * b[2],
        s0 * a[3] + s1 * b[3],
    ]
}
