use super::Vec3;
use crate::geo::{GeoPoint, normalize_lng_deg};

/// Render-space globe radius (scene units, not meters).
pub const GLOBE_RADIUS: f64 = 5.0;

/// Project a geographic coordinate onto the render globe.
///
/// Polar angle comes from latitude, azimuth from longitude with a fixed
/// 180-degree offset so the texture seam lands on the antimeridian:
/// phi = 90 - lat, theta = lng + 180,
/// x = -r sin(phi) cos(theta), y = r cos(phi), z = r sin(phi) sin(theta).
pub fn geo_to_globe(point: GeoPoint, radius: f64) -> Vec3 {
    let phi = (90.0 - point.lat_deg).to_radians();
    let theta = (point.lng_deg + 180.0).to_radians();
    Vec3::new(
        -(radius * phi.sin() * theta.cos()),
        radius * phi.cos(),
        radius * phi.sin() * theta.sin(),
    )
}

/// Invert [`geo_to_globe`] for a point on (or near) the globe surface.
///
/// Longitude is normalized into [-180, 180). At the exact poles longitude is
/// indeterminate and comes back as -180.
pub fn globe_to_geo(p: Vec3, radius: f64) -> GeoPoint {
    let phi = (p.y / radius).clamp(-1.0, 1.0).acos();
    let lat = 90.0 - phi.to_degrees();
    let theta = p.z.atan2(-p.x);
    let lng = normalize_lng_deg(theta.to_degrees() - 180.0);
    GeoPoint::new(lat, lng)
}

/// A ray in render space.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub dir: Vec3,
}

impl Ray {
    pub fn new(origin: Vec3, dir: Vec3) -> Self {
        Self { origin, dir }
    }
}

/// First intersection of a ray with a sphere centered at `center`.
///
/// Returns the nearest hit point with a non-negative ray parameter, or
/// `None` when the ray misses or the direction degenerates.
pub fn ray_sphere_intersect(ray: Ray, center: Vec3, radius: f64) -> Option<Vec3> {
    let dir = ray.dir.normalized()?;
    let oc = ray.origin - center;

    let b = 2.0 * dir.dot(oc);
    let c = oc.dot(oc) - radius * radius;
    let disc = b * b - 4.0 * c;
    if disc < 0.0 {
        return None;
    }

    let sqrt_disc = disc.sqrt();
    let t_near = (-b - sqrt_disc) / 2.0;
    let t_far = (-b + sqrt_disc) / 2.0;
    let t = if t_near >= 0.0 {
        t_near
    } else if t_far >= 0.0 {
        t_far
    } else {
        return None;
    };

    Some(ray.origin + dir.scale(t))
}

#[cfg(test)]
mod tests {
    use super::{GLOBE_RADIUS, Ray, geo_to_globe, globe_to_geo, ray_sphere_intersect};
    use crate::geo::GeoPoint;
    use crate::math::Vec3;

    fn assert_close(a: f64, b: f64, eps: f64) {
        let diff = (a - b).abs();
        assert!(diff <= eps, "expected {a} ~= {b} (diff {diff})");
    }

    #[test]
    fn equator_prime_meridian_faces_positive_x() {
        let p = geo_to_globe(GeoPoint::new(0.0, 0.0), GLOBE_RADIUS);
        assert_close(p.x, GLOBE_RADIUS, 1e-9);
        assert_close(p.y, 0.0, 1e-9);
        assert_close(p.z, 0.0, 1e-9);
    }

    #[test]
    fn north_pole_is_up() {
        let p = geo_to_globe(GeoPoint::new(90.0, 0.0), GLOBE_RADIUS);
        assert_close(p.x, 0.0, 1e-9);
        assert_close(p.y, GLOBE_RADIUS, 1e-9);
        assert_close(p.z, 0.0, 1e-9);
    }

    #[test]
    fn projection_round_trips_across_the_domain() {
        // Pole latitudes are excluded: longitude is indeterminate there.
        for lat_i in -8..=8 {
            for lng_i in -11..=10 {
                let original = GeoPoint::new(lat_i as f64 * 11.0, lng_i as f64 * 16.0);
                let rt = globe_to_geo(geo_to_globe(original, GLOBE_RADIUS), GLOBE_RADIUS);
                assert_close(rt.lat_deg, original.lat_deg, 1e-9);
                assert_close(rt.lng_deg, original.lng_deg, 1e-9);
            }
        }
    }

    #[test]
    fn ray_hits_near_side_of_sphere() {
        let ray = Ray::new(Vec3::new(20.0, 0.0, 0.0), Vec3::new(-1.0, 0.0, 0.0));
        let hit = ray_sphere_intersect(ray, Vec3::ZERO, GLOBE_RADIUS).expect("hit");
        assert_close(hit.x, GLOBE_RADIUS, 1e-9);
        assert_close(hit.y, 0.0, 1e-9);
    }

    #[test]
    fn ray_misses_off_axis() {
        let ray = Ray::new(Vec3::new(20.0, 10.0, 0.0), Vec3::new(-1.0, 0.0, 0.0));
        assert!(ray_sphere_intersect(ray, Vec3::ZERO, GLOBE_RADIUS).is_none());
    }

    #[test]
    fn origin_inside_sphere_hits_forward() {
        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, 1.0, 0.0));
        let hit = ray_sphere_intersect(ray, Vec3::ZERO, GLOBE_RADIUS).expect("hit");
        assert_close(hit.y, GLOBE_RADIUS, 1e-9);
    }

    #[test]
    fn zero_direction_is_rejected() {
        let ray = Ray::new(Vec3::new(20.0, 0.0, 0.0), Vec3::ZERO);
        assert!(ray_sphere_intersect(ray, Vec3::ZERO, GLOBE_RADIUS).is_none());
    }

    #[test]
    fn screen_center_hit_recovers_coordinate() {
        // Eye straight above (0, 0): the nearest intersection must invert to
        // the same coordinate.
        let target = GeoPoint::new(0.0, 0.0);
        let surface = geo_to_globe(target, GLOBE_RADIUS);
        let eye = surface.scale(3.0);
        let ray = Ray::new(eye, Vec3::ZERO - eye);
        let hit = ray_sphere_intersect(ray, Vec3::ZERO, GLOBE_RADIUS).expect("hit");
        let geo = globe_to_geo(hit, GLOBE_RADIUS);
        assert_close(geo.lat_deg, target.lat_deg, 1e-9);
        assert_close(geo.lng_deg, target.lng_deg, 1e-9);
    }
}
