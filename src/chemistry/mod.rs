//! Pure chemistry: the weak-acid / strong-base titration curve and the
//! indicator color response. No state lives here.

mod indicator;
mod ph;

pub use indicator::{color_from_ph, Rgb, ACID_COLOR, BASE_COLOR, NEUTRAL_COLOR, NEUTRAL_PH};
pub use ph::{classify_regime, compute_ph, PhRegime, KW, MOLE_FLOOR, MOLE_TOLERANCE, OH_FLOOR};
