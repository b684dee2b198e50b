use foundation::geo::GeoPoint;
use foundation::math::{GLOBE_RADIUS, Ray, Vec3, globe_to_geo, ray_sphere_intersect};

use crate::camera::OrbitCamera;

/// Resolve the geographic coordinate under the view center.
///
/// Casts a ray from the eye through the globe's visual center and inverts
/// the sphere projection at the first intersection. Returns `None` when the
/// view center misses the globe (only possible at wide zoom with the globe
/// partly off-frame, or a degenerate camera).
pub fn pick_globe_center(camera: &OrbitCamera) -> Option<GeoPoint> {
    let ray = Ray::new(camera.eye_position(), camera.forward_direction());
    let hit = ray_sphere_intersect(ray, Vec3::ZERO, GLOBE_RADIUS)?;
    let geo = globe_to_geo(hit, GLOBE_RADIUS).normalized();
    geo.is_finite().then_some(geo)
}
