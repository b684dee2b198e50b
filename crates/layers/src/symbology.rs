/// RGBA color, linear 0..1 per channel.
pub type Color = [f32; 4];

/// Deep pink beam body.
pub const BEAM_COLOR: Color = [1.0, 0.078, 0.576, 1.0];
/// Shared emissive glow for beams and hearts.
pub const GLOW_COLOR: Color = [1.0, 0.0, 0.5, 1.0];
/// Heart body; the glow does the coloring.
pub const HEART_COLOR: Color = [1.0, 1.0, 1.0, 1.0];
/// Surface pin and halo fill.
pub const PIN_COLOR: Color = [0.925, 0.282, 0.6, 1.0];

/// Static appearance of a marker primitive; per-frame pulse values live on
/// the extracted markers themselves.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct MarkerStyle {
    pub color: Color,
    pub emissive: Color,
    pub base_opacity: f32,
}

impl MarkerStyle {
    pub const fn new(color: Color, emissive: Color, base_opacity: f32) -> Self {
        Self {
            color,
            emissive,
            base_opacity,
        }
    }

    pub const fn beam() -> Self {
        Self::new(BEAM_COLOR, GLOW_COLOR, 0.8)
    }

    pub const fn heart() -> Self {
        Self::new(HEART_COLOR, GLOW_COLOR, 1.0)
    }
}
