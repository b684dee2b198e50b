//! Raster basemap for the surface view.
//!
//! Two endpoints: satellite imagery (note the y-before-x path segment
//! order) and a label overlay drawn above it. Tiles are enumerated around
//! the focus coordinate and clamped at the antimeridian; the map does not
//! wrap.

use foundation::geo::GeoPoint;
use foundation::tile::{TileCoord, geo_to_tile};

use crate::{Layer, LayerId};

pub const IMAGERY_TILE_URL: &str =
    "https://server.arcgisonline.com/ArcGIS/rest/services/World_Imagery/MapServer/tile/{z}/{y}/{x}";
pub const LABEL_TILE_URL: &str = "https://basemaps.cartocdn.com/light_only_labels/{z}/{x}/{y}.png";
pub const IMAGERY_ATTRIBUTION: &str =
    "Tiles (c) Esri - Source: Esri, i-cubed, USDA, USGS, AEX, GeoEye, Getmapping, Aerogrid, IGN, IGP, UPR-EGP, and the GIS User Community";

pub const MIN_ZOOM: u8 = 2;
pub const MAX_ZOOM: u8 = 19;

/// Zoom the surface view opens at after a globe handoff.
pub const DEFAULT_SURFACE_ZOOM: u8 = 5;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum TileEndpoint {
    Imagery,
    Labels,
}

impl TileEndpoint {
    pub fn url_for(self, coord: TileCoord) -> String {
        let template = match self {
            TileEndpoint::Imagery => IMAGERY_TILE_URL,
            TileEndpoint::Labels => LABEL_TILE_URL,
        };
        template
            .replace("{z}", &coord.z.to_string())
            .replace("{x}", &coord.x.to_string())
            .replace("{y}", &coord.y.to_string())
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct BasemapLayer {
    id: LayerId,
}

impl BasemapLayer {
    pub fn new(id: u64) -> Self {
        Self { id: LayerId(id) }
    }

    pub fn clamp_zoom(zoom: u8) -> u8 {
        zoom.clamp(MIN_ZOOM, MAX_ZOOM)
    }

    /// Enumerate the tile block covering a viewport of `cols` x `rows`
    /// tiles centered on `center`.
    ///
    /// Ordering contract: row-major, top-left first. The block is clamped
    /// to the world extent on all sides rather than wrapping, so fewer
    /// tiles come back near the antimeridian and the poles.
    pub fn visible_tiles(center: GeoPoint, zoom: u8, cols: u32, rows: u32) -> Vec<TileCoord> {
        let zoom = Self::clamp_zoom(zoom);
        let n = TileCoord::tiles_per_axis(zoom);
        let center_tile = geo_to_tile(center.normalized(), zoom);

        let x_min = center_tile.x.saturating_sub(cols / 2);
        let x_max = (center_tile.x + cols / 2).min(n - 1);
        let y_min = center_tile.y.saturating_sub(rows / 2);
        let y_max = (center_tile.y + rows / 2).min(n - 1);

        let mut out = Vec::with_capacity(((x_max - x_min + 1) * (y_max - y_min + 1)) as usize);
        for y in y_min..=y_max {
            for x in x_min..=x_max {
                out.push(TileCoord::new(zoom, x, y));
            }
        }
        out
    }
}

impl Layer for BasemapLayer {
    fn id(&self) -> LayerId {
        self.id
    }

    fn name(&self) -> &'static str {
        "basemap"
    }
}

#[cfg(test)]
mod tests {
    use super::{BasemapLayer, MAX_ZOOM, MIN_ZOOM, TileEndpoint};
    use foundation::geo::GeoPoint;
    use foundation::tile::TileCoord;

    #[test]
    fn imagery_url_is_y_before_x() {
        let url = TileEndpoint::Imagery.url_for(TileCoord::new(5, 17, 11));
        assert!(url.ends_with("/5/11/17"), "{url}");
    }

    #[test]
    fn label_url_is_x_before_y() {
        let url = TileEndpoint::Labels.url_for(TileCoord::new(5, 17, 11));
        assert!(url.ends_with("/5/17/11.png"), "{url}");
    }

    #[test]
    fn zoom_is_clamped_to_the_map_limits() {
        assert_eq!(BasemapLayer::clamp_zoom(0), MIN_ZOOM);
        assert_eq!(BasemapLayer::clamp_zoom(7), 7);
        assert_eq!(BasemapLayer::clamp_zoom(22), MAX_ZOOM);
    }

    #[test]
    fn visible_block_is_centered_and_row_major() {
        let tiles = BasemapLayer::visible_tiles(GeoPoint::new(0.0, 0.0), 4, 3, 3);
        assert_eq!(tiles.len(), 9);
        // z=4 world is 16x16; the origin sits at tile (8, 8).
        assert_eq!(tiles[0], TileCoord::new(4, 7, 7));
        assert_eq!(tiles[4], TileCoord::new(4, 8, 8));
        assert_eq!(tiles[8], TileCoord::new(4, 9, 9));
    }

    #[test]
    fn block_clamps_at_the_world_edge_instead_of_wrapping() {
        let tiles = BasemapLayer::visible_tiles(GeoPoint::new(0.0, 179.9), 3, 5, 3);
        let n = TileCoord::tiles_per_axis(3);
        assert!(tiles.iter().all(|t| t.x < n));
        // The column block is cut short at the antimeridian.
        assert!(tiles.len() < 15);
        assert!(!tiles.is_empty());
    }

    #[test]
    fn polar_center_clamps_rows() {
        let tiles = BasemapLayer::visible_tiles(GeoPoint::new(89.0, 0.0), 3, 3, 5);
        assert!(tiles.iter().all(|t| t.y < TileCoord::tiles_per_axis(3)));
        assert!(!tiles.is_empty());
    }
}
