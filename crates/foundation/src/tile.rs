use crate::geo::GeoPoint;

/// Web-mercator latitude limit; poleward of this the projection diverges.
pub const MERCATOR_LAT_LIMIT: f64 = 85.051_128_78;

/// Tile coordinate in the ZXY scheme used by raster basemap endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TileCoord {
    pub z: u8,
    pub x: u32,
    pub y: u32,
}

impl TileCoord {
    pub fn new(z: u8, x: u32, y: u32) -> Self {
        Self { z, x, y }
    }

    /// Number of tiles along one axis at this zoom level.
    pub fn tiles_per_axis(z: u8) -> u32 {
        1u32 << z
    }

    /// Geographic bounds of this tile as (lng_min, lat_min, lng_max, lat_max).
    pub fn bounds(&self) -> (f64, f64, f64, f64) {
        let n = Self::tiles_per_axis(self.z) as f64;
        let lng_min = (self.x as f64 / n) * 360.0 - 180.0;
        let lng_max = ((self.x + 1) as f64 / n) * 360.0 - 180.0;

        // Web-mercator Y grows southward.
        let lat_max = tile_y_to_lat(self.y, self.z);
        let lat_min = tile_y_to_lat(self.y + 1, self.z);

        (lng_min, lat_min, lng_max, lat_max)
    }
}

fn tile_y_to_lat(y: u32, z: u8) -> f64 {
    let n = std::f64::consts::PI
        - 2.0 * std::f64::consts::PI * (y as f64) / TileCoord::tiles_per_axis(z) as f64;
    (0.5 * (n.exp() - (-n).exp())).atan().to_degrees()
}

/// The tile containing a geographic coordinate at the given zoom.
///
/// Latitude is clamped to the mercator limit; longitude wraps are the
/// caller's concern (basemap layers do not wrap).
pub fn geo_to_tile(point: GeoPoint, z: u8) -> TileCoord {
    let n = TileCoord::tiles_per_axis(z);
    let max_index = n - 1;

    let x = ((point.lng_deg + 180.0) / 360.0 * n as f64).floor();
    let x = (x.max(0.0) as u32).min(max_index);

    let lat = point
        .lat_deg
        .clamp(-MERCATOR_LAT_LIMIT, MERCATOR_LAT_LIMIT)
        .to_radians();
    let y = ((1.0 - lat.tan().asinh() / std::f64::consts::PI) / 2.0 * n as f64).floor();
    let y = (y.max(0.0) as u32).min(max_index);

    TileCoord::new(z, x, y)
}
