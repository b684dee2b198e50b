//! CPU-side render command collection.
//!
//! Layer snapshots are flattened into an ordered command list a backend can
//! replay. Command order encodes draw order: in the sphere view beams come
//! before hearts (translucent under solid), in the surface view imagery
//! under labels under halos under pins.

use foundation::geo::GeoPoint;
use foundation::math::Vec3;
use foundation::tile::TileCoord;
use layers::basemap::TileEndpoint;
use layers::orbit::OrbitMarkersSnapshot;
use layers::surface::SurfaceMarkersSnapshot;
use layers::symbology::MarkerStyle;

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Camera3D {
    pub position: Vec3,
    pub target: Vec3,
    pub fov_y_rad: f64,
}

impl Camera3D {
    pub fn look_at(position: Vec3, target: Vec3, fov_y_rad: f64) -> Self {
        Self {
            position,
            target,
            fov_y_rad,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Camera2D {
    pub center: GeoPoint,
    pub zoom: u8,
}

impl Camera2D {
    pub fn new(center: GeoPoint, zoom: u8) -> Self {
        Self { center, zoom }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum RenderCommand {
    Beam {
        base: Vec3,
        height: f64,
        opacity: f64,
        emissive_intensity: f64,
        style: MarkerStyle,
    },
    Heart3D {
        position: Vec3,
        scale: f64,
        emissive_intensity: f64,
        style: MarkerStyle,
    },
    Tile {
        endpoint: TileEndpoint,
        coord: TileCoord,
        url: String,
    },
    Halo {
        location: GeoPoint,
        radius_px: f64,
        fill_opacity: f32,
    },
    Pin {
        location: GeoPoint,
    },
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct RenderFrame {
    pub commands: Vec<RenderCommand>,
}

pub struct Renderer;

impl Renderer {
    pub fn collect_sphere(snapshot: &OrbitMarkersSnapshot, _camera: Camera3D) -> RenderFrame {
        let mut frame = RenderFrame::default();
        for beam in &snapshot.beams {
            frame.commands.push(RenderCommand::Beam {
                base: beam.base,
                height: beam.height,
                opacity: beam.opacity,
                emissive_intensity: beam.emissive_intensity,
                style: MarkerStyle::beam(),
            });
        }
        for heart in &snapshot.hearts {
            frame.commands.push(RenderCommand::Heart3D {
                position: heart.position,
                scale: heart.scale,
                emissive_intensity: heart.emissive_intensity,
                style: MarkerStyle::heart(),
            });
        }
        frame
    }

    pub fn collect_surface(
        tiles: &[TileCoord],
        snapshot: &SurfaceMarkersSnapshot,
        _camera: Camera2D,
    ) -> RenderFrame {
        let mut frame = RenderFrame::default();
        for endpoint in [TileEndpoint::Imagery, TileEndpoint::Labels] {
            for &coord in tiles {
                frame.commands.push(RenderCommand::Tile {
                    endpoint,
                    coord,
                    url: endpoint.url_for(coord),
                });
            }
        }
        for halo in &snapshot.halos {
            frame.commands.push(RenderCommand::Halo {
                location: halo.location,
                radius_px: halo.radius_px,
                fill_opacity: halo.fill_opacity,
            });
        }
        for pin in &snapshot.pins {
            frame.commands.push(RenderCommand::Pin {
                location: pin.location,
            });
        }
        frame
    }
}
