//! 2D marker extraction for the surface (tile map) view.
//!
//! Each visible record becomes a heart pin plus a translucent halo, with a
//! popup carrying the confession text, an author label and a creation date.
//! Unlike the orbit layer this is not re-extracted per frame; the map only
//! rebuilds when the visible record set changes.

use chrono::{DateTime, Utc};
use feed::record::Record;
use foundation::geo::GeoPoint;

use crate::{Layer, LayerId};

/// Halo radius in screen pixels.
pub const HALO_RADIUS_PX: f64 = 20.0;

/// Halo fill opacity.
pub const HALO_FILL_OPACITY: f32 = 0.2;

/// Popup content for one pin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Popup {
    pub text: String,
    pub author_label: String,
    pub date_label: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PinMarker {
    pub record_index: usize,
    pub location: GeoPoint,
    pub popup: Popup,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HaloMarker {
    pub record_index: usize,
    pub location: GeoPoint,
    pub radius_px: f64,
    pub fill_opacity: f32,
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct SurfaceMarkersSnapshot {
    pub pins: Vec<PinMarker>,
    pub halos: Vec<HaloMarker>,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct SurfaceMarkersLayer {
    id: LayerId,
}

impl SurfaceMarkersLayer {
    pub fn new(id: u64) -> Self {
        Self { id: LayerId(id) }
    }

    pub fn extract(&self, records: &[&Record]) -> SurfaceMarkersSnapshot {
        let mut out = SurfaceMarkersSnapshot::default();
        for (index, record) in records.iter().enumerate() {
            let location = record.location().normalized();
            out.pins.push(PinMarker {
                record_index: index,
                location,
                popup: Popup {
                    text: record.text.clone(),
                    author_label: author_label(record),
                    date_label: date_label(record),
                },
            });
            out.halos.push(HaloMarker {
                record_index: index,
                location,
                radius_px: HALO_RADIUS_PX,
                fill_opacity: HALO_FILL_OPACITY,
            });
        }
        out
    }
}

impl Layer for SurfaceMarkersLayer {
    fn id(&self) -> LayerId {
        self.id
    }

    fn name(&self) -> &'static str {
        "surface-markers"
    }
}

fn author_label(record: &Record) -> String {
    if record.is_anonymous {
        return "Anonymous".to_string();
    }
    match record.author_name.as_deref() {
        Some(name) if !name.is_empty() => name.to_string(),
        _ => "Unknown".to_string(),
    }
}

/// "Just now" until the server assigns a timestamp.
fn date_label(record: &Record) -> String {
    let Some(at) = record.created_at else {
        return "Just now".to_string();
    };
    match DateTime::<Utc>::from_timestamp_millis(at.millis()) {
        Some(dt) => dt.format("%b %-d, %Y").to_string(),
        None => "Just now".to_string(),
    }
}
