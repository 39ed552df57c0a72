use serde::{Deserialize, Serialize};

/// pH the neutral band is centred on.
pub const NEUTRAL_PH: f64 = 7.0;

/// An RGB triple with each channel in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rgb {
    pub r: f64,
    pub g: f64,
    pub b: f64,
}

/// Acid form of the indicator (yellow).
pub const ACID_COLOR: Rgb = Rgb::new(1.0, 1.0, 0.0);
/// Base form of the indicator (blue).
pub const BASE_COLOR: Rgb = Rgb::new(0.0, 0.0, 1.0);
/// Color shown around neutral pH (green).
pub const NEUTRAL_COLOR: Rgb = Rgb::new(0.0, 1.0, 0.0);

impl Rgb {
    pub const fn new(r: f64, g: f64, b: f64) -> Self {
        Rgb { r, g, b }
    }

    /// Weighted sum `wx * x + wy * y`, channel by channel.
    fn blend(x: Rgb, wx: f64, y: Rgb, wy: f64) -> Rgb {
        Rgb {
            r: wx * x.r + wy * y.r,
            g: wx * x.g + wy * y.g,
            b: wx * x.b + wy * y.b,
        }
    }

    pub fn to_array(self) -> [f64; 3] {
        [self.r, self.g, self.b]
    }
}

/// Indicator color for a solution at `ph`.
///
/// The acid and base forms are mixed by the indicator's own acid/base
/// equilibrium. Within `neutral_band` of pH 7 the result is pulled linearly
/// towards green, reaching pure green at pH 7 and fading out at the band edge.
pub fn color_from_ph(ph: f64, indicator_pka: f64, neutral_band: f64) -> Rgb {
    let f_base = (1.0 / (1.0 + 10f64.powf(indicator_pka - ph))).clamp(0.0, 1.0);
    let base_mix = Rgb::blend(ACID_COLOR, 1.0 - f_base, BASE_COLOR, f_base);

    let distance = (ph - NEUTRAL_PH).abs();
    if distance >= neutral_band {
        return base_mix;
    }

    let w = 1.0 - distance / neutral_band;
    Rgb::blend(base_mix, 1.0 - w, NEUTRAL_COLOR, w)
}
