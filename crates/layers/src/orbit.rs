//! 3D marker extraction for the sphere view.
//!
//! Each visible record becomes two primitives anchored at its projected
//! surface point, both oriented toward the globe center:
//! - a light beam rising off the surface, with a per-record height
//! - a heart at the beam base
//!
//! The pulse animation is a pure function of elapsed frame time, so
//! extraction stays deterministic and replayable. Beams pulse in opacity,
//! hearts in scale; both share the emissive pulse.

use feed::record::Record;
use foundation::math::{GLOBE_RADIUS, Vec3, geo_to_globe};

use crate::{Layer, LayerId};

const BEAM_HEIGHT_MIN: f64 = 0.5;
const BEAM_HEIGHT_MAX: f64 = 1.3;
const PULSE_HZ_RAD: f64 = 5.0;

/// Pulse scale applied to hearts.
pub fn pulse_scale(elapsed_s: f64) -> f64 {
    (elapsed_s * PULSE_HZ_RAD).sin() * 0.2 + 1.2
}

/// Pulse emissive intensity shared by beams and hearts.
pub fn pulse_intensity(elapsed_s: f64) -> f64 {
    (elapsed_s * PULSE_HZ_RAD).sin() * 0.5 + 1.5
}

/// Pulse opacity applied to beams.
pub fn pulse_opacity(elapsed_s: f64) -> f64 {
    (elapsed_s * PULSE_HZ_RAD).sin() * 0.3 + 0.6
}

/// A light beam rising from the record's surface point.
#[derive(Debug, Clone, PartialEq)]
pub struct BeamMarker {
    /// Index into the visible-record slice this snapshot was built from.
    pub record_index: usize,
    /// Anchor on the globe surface.
    pub base: Vec3,
    /// Beam length outward along the surface normal.
    pub height: f64,
    pub opacity: f64,
    pub emissive_intensity: f64,
}

/// A heart at the record's surface point.
#[derive(Debug, Clone, PartialEq)]
pub struct HeartMarker {
    pub record_index: usize,
    pub position: Vec3,
    pub scale: f64,
    pub emissive_intensity: f64,
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct OrbitMarkersSnapshot {
    pub beams: Vec<BeamMarker>,
    pub hearts: Vec<HeartMarker>,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct OrbitMarkersLayer {
    id: LayerId,
}

impl OrbitMarkersLayer {
    pub fn new(id: u64) -> Self {
        Self { id: LayerId(id) }
    }

    /// Build the marker set for one frame.
    ///
    /// Ordering contract: markers follow the input record order, so the
    /// snapshot inherits the feed's newest-first ordering.
    pub fn extract(&self, records: &[&Record], elapsed_s: f64) -> OrbitMarkersSnapshot {
        let opacity = pulse_opacity(elapsed_s);
        let intensity = pulse_intensity(elapsed_s);
        let scale = pulse_scale(elapsed_s);

        let mut out = OrbitMarkersSnapshot::default();
        for (index, record) in records.iter().enumerate() {
            let base = geo_to_globe(record.location().normalized(), GLOBE_RADIUS);
            out.beams.push(BeamMarker {
                record_index: index,
                base,
                height: beam_height(&record.id),
                opacity,
                emissive_intensity: intensity,
            });
            out.hearts.push(HeartMarker {
                record_index: index,
                position: base,
                scale,
                emissive_intensity: intensity * 1.5,
            });
        }
        out
    }
}

impl Layer for OrbitMarkersLayer {
    fn id(&self) -> LayerId {
        self.id
    }

    fn name(&self) -> &'static str {
        "orbit-markers"
    }
}

/// Deterministic per-record beam height in [0.5, 1.3).
///
/// Hashing the record id keeps a marker's height stable across snapshot
/// reorderings and filter toggles.
fn beam_height(record_id: &str) -> f64 {
    // FNV-1a over the id bytes.
    let mut hash: u64 = 0xcbf2_9ce4_8422_2325;
    for byte in record_id.bytes() {
        hash ^= byte as u64;
        hash = hash.wrapping_mul(0x100_0000_01b3);
    }
    let unit = (hash >> 11) as f64 / (1u64 << 53) as f64;
    BEAM_HEIGHT_MIN + unit * (BEAM_HEIGHT_MAX - BEAM_HEIGHT_MIN)
}
