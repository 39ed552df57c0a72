/// Ion product of water at 25 °C.
pub const KW: f64 = 1e-14;

/// Absolute tolerance (mol) used to decide regime boundaries.
pub const MOLE_TOLERANCE: f64 = 1e-12;

/// Floor applied to both buffer species before taking their ratio.
pub const MOLE_FLOOR: f64 = 1e-16;

/// Floor applied to hydroxide concentration before taking a logarithm.
/// At equivalence it bounds `Kb * [A-]` instead, so `[OH-]` stays above 1e-10.
pub const OH_FLOOR: f64 = 1e-20;

const NEUTRAL_DEFAULT: f64 = 7.0;

/// Which part of the titration curve a solution sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhRegime {
    /// No titrant added yet: pure weak-acid equilibrium.
    NoTitrant,
    /// Weak acid and its conjugate base coexist (Henderson–Hasselbalch).
    Buffer,
    /// Moles of base equal the initial moles of acid.
    Equivalence,
    /// Excess strong base dominates.
    ExcessBase,
}

/// Classify a mixture by comparing moles of added hydroxide to initial acid moles.
pub fn classify_regime(n_oh: f64, n_ha0: f64) -> PhRegime {
    if n_oh.abs() <= MOLE_TOLERANCE {
        PhRegime::NoTitrant
    } else if (n_oh - n_ha0).abs() <= MOLE_TOLERANCE {
        PhRegime::Equivalence
    } else if n_oh < n_ha0 {
        PhRegime::Buffer
    } else {
        PhRegime::ExcessBase
    }
}

/// pH of a monoprotic weak acid titrated with a strong base.
///
/// Volumes are in litres, concentrations in mol/L. The function is total:
/// degenerate inputs are floored rather than rejected, and the result is
/// always clamped to `[0, 14]`.
pub fn compute_ph(
    acid_volume_l: f64,
    acid_concentration: f64,
    base_volume_l: f64,
    base_concentration: f64,
    pka: f64,
) -> f64 {
    let total_volume_l = acid_volume_l + base_volume_l;
    if total_volume_l <= 0.0 {
        return NEUTRAL_DEFAULT;
    }

    let ka = 10f64.powf(-pka);
    let n_ha0 = acid_concentration * acid_volume_l;
    let n_oh = base_concentration * base_volume_l;

    let ph = match classify_regime(n_oh, n_ha0) {
        PhRegime::NoTitrant => {
            let h = (ka * acid_concentration).sqrt();
            -h.log10()
        }
        PhRegime::Buffer => {
            let n_a = n_oh.max(MOLE_FLOOR);
            let n_ha = (n_ha0 - n_oh).max(MOLE_FLOOR);
            pka + (n_a / n_ha).log10()
        }
        PhRegime::Equivalence => {
            let kb = KW / ka;
            let conjugate_base = n_ha0 / total_volume_l;
            let oh = (kb * conjugate_base).max(OH_FLOOR).sqrt();
            14.0 - (-oh.log10())
        }
        PhRegime::ExcessBase => {
            let oh = ((n_oh - n_ha0) / total_volume_l).max(OH_FLOOR);
            14.0 - (-oh.log10())
        }
    };

    ph.clamp(0.0, 14.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const VA: f64 = 0.050;
    const CA: f64 = 0.1;
    const CB: f64 = 0.1;
    const PKA: f64 = 4.76;

    #[test]
    fn test_zero_titrant_matches_weak_acid_formula() {
        let ka = 10f64.powf(-PKA);
        let expected = -(ka * CA).sqrt().log10();
        let ph = compute_ph(VA, CA, 0.0, CB, PKA);
        assert!((ph - expected).abs() < 1e-12);
        assert!((ph - 2.88).abs() < 0.01);
    }

    #[test]
    fn test_equivalence_floor_applies_before_square_root() {
        // Kb * [A-] = 1e-12 * 5e-11 falls below the floor: [OH-] = sqrt(1e-20).
        let ph = compute_ph(0.05, 1e-10, 0.05, 1e-10, 2.0);
        assert_eq!(
            classify_regime(1e-10 * 0.05, 1e-10 * 0.05),
            PhRegime::Equivalence
        );
        assert!((ph - 4.0).abs() < 1e-9, "got {ph}");
    }

    #[test]
    fn test_half_equivalence_equals_pka() {
        let ph = compute_ph(VA, CA, 0.025, CB, PKA);
        assert!((ph - PKA).abs() < 1e-9, "got {ph}");
    }

    #[test]
    fn test_equivalence_is_basic() {
        let ph = compute_ph(VA, CA, 0.050, CB, PKA);
        assert_eq!(classify_regime(CB * 0.050, CA * VA), PhRegime::Equivalence);
        assert!(ph > 7.0);
        assert!(ph > 8.7 && ph < 8.8, "got {ph}");
    }

    #[test]
    fn test_excess_base() {
        // 10 mL excess of 0.1 M base in 110 mL total.
        let ph = compute_ph(VA, CA, 0.060, CB, PKA);
        let expected = 14.0 + (0.001f64 / 0.110).log10();
        assert!((ph - expected).abs() < 1e-9);
        assert!(ph > 11.9 && ph < 12.1);
    }

    #[test]
    fn test_non_positive_total_volume_is_neutral() {
        assert_eq!(compute_ph(0.0, CA, 0.0, CB, PKA), 7.0);
        assert_eq!(compute_ph(-0.01, CA, 0.0, CB, PKA), 7.0);
    }

    #[test]
    fn test_classify_regime_boundaries() {
        let n_ha0 = 0.005;
        assert_eq!(classify_regime(0.0, n_ha0), PhRegime::NoTitrant);
        assert_eq!(classify_regime(5e-13, n_ha0), PhRegime::NoTitrant);
        assert_eq!(classify_regime(1e-6, n_ha0), PhRegime::Buffer);
        assert_eq!(classify_regime(n_ha0 - 5e-13, n_ha0), PhRegime::Equivalence);
        assert_eq!(classify_regime(n_ha0 + 5e-13, n_ha0), PhRegime::Equivalence);
        assert_eq!(classify_regime(n_ha0 + 1e-6, n_ha0), PhRegime::ExcessBase);
    }

    #[test]
    fn test_buffer_region_is_monotonic_and_smooth() {
        // 0.1 mL grid strictly inside the buffer region.
        let mut prev = compute_ph(VA, CA, 0.0001, CB, PKA);
        for i in 2..500 {
            let vb = i as f64 * 0.0001;
            let ph = compute_ph(VA, CA, vb, CB, PKA);
            assert!(ph >= prev, "pH decreased at {vb} L");
            prev = ph;
        }
        // Around the midpoint the curve is flat: neighbouring samples stay close.
        let a = compute_ph(VA, CA, 0.0249, CB, PKA);
        let b = compute_ph(VA, CA, 0.0250, CB, PKA);
        assert!((b - a).abs() < 0.01);
    }

    #[test]
    fn test_curve_rises_through_equivalence() {
        let before = compute_ph(VA, CA, 0.0499, CB, PKA);
        let at = compute_ph(VA, CA, 0.0500, CB, PKA);
        let after = compute_ph(VA, CA, 0.0501, CB, PKA);
        assert!(before < at && at < after);
        assert!(after - before < 3.0);
    }

    #[test]
    fn test_excess_region_is_monotonic() {
        let mut prev = compute_ph(VA, CA, 0.0501, CB, PKA);
        for i in 502..1000 {
            let vb = i as f64 * 0.0001;
            let ph = compute_ph(VA, CA, vb, CB, PKA);
            assert!(ph >= prev, "pH decreased at {vb} L");
            prev = ph;
        }
    }

    proptest! {
        #[test]
        fn prop_ph_is_always_in_range(
            acid_ml in 1.0f64..200.0,
            ca in 0.001f64..1.0,
            cb in 0.001f64..1.0,
            pka in 2.0f64..12.0,
            base_ml in 0.0f64..300.0,
        ) {
            let ph = compute_ph(acid_ml / 1000.0, ca, base_ml / 1000.0, cb, pka);
            prop_assert!(ph.is_finite());
            prop_assert!((0.0..=14.0).contains(&ph));
        }
    }
}
