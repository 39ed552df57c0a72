//! Reward shaping for the titration environment.
//!
//! The step reward is a sum of independent shaping terms. Every term reads the
//! same post-transition [`RewardSnapshot`] and returns its own contribution, so
//! each one can be inspected and tested on its own.

use serde::{Deserialize, Serialize};

/// Penalty applied when the burette cannot supply the requested volume.
pub const OUT_OF_TITRANT_PENALTY: f64 = 100.0;

const CLOSENESS_SCALE: f64 = 50.0;
const CLOSENESS_LENGTH: f64 = 0.8;
const STEP_COST: f64 = 0.005;

/// Everything the shaping terms may look at after a transition.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RewardSnapshot {
    /// Distance to target after the previous step; `None` on the first step.
    pub previous_distance: Option<f64>,
    pub ph: f64,
    pub target_ph: f64,
    pub distance: f64,
    pub volume_ml: f64,
    pub equivalence_volume_ml: f64,
    pub terminated: bool,
    pub truncated: bool,
    pub extreme_ph: bool,
    pub over_hard_limit: bool,
}

impl RewardSnapshot {
    fn above_target(&self) -> bool {
        self.ph > self.target_ph
    }

    fn overshoot(&self) -> f64 {
        self.ph - self.target_ph
    }

    fn volume_ratio(&self) -> f64 {
        self.volume_ml / self.equivalence_volume_ml
    }
}

/// Per-term contributions to one step's reward.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RewardBreakdown {
    pub closeness: f64,
    pub overshoot: f64,
    pub progress: f64,
    pub sweet_spot_linger: f64,
    pub zone: f64,
    pub volume_ratio: f64,
    pub stopping: f64,
    pub truncation: f64,
    pub extreme_ph: f64,
    pub hard_limit: f64,
    pub out_of_titrant: f64,
}

impl RewardBreakdown {
    /// Evaluate every shaping term against one snapshot.
    pub fn shape(s: &RewardSnapshot) -> Self {
        RewardBreakdown {
            closeness: closeness(s.distance),
            overshoot: overshoot_penalty(s),
            progress: progress(s),
            sweet_spot_linger: sweet_spot_linger(s),
            zone: zone_bonus(s),
            volume_ratio: volume_ratio_bonus(s),
            stopping: stopping(s),
            truncation: truncation_bonus(s),
            extreme_ph: extreme_ph_penalty(s),
            hard_limit: hard_limit_penalty(s),
            out_of_titrant: 0.0,
        }
    }

    /// Reward for a refused addition: closeness at the unchanged pH, minus
    /// the out-of-titrant penalty. No other term applies.
    pub fn out_of_titrant(distance: f64) -> Self {
        RewardBreakdown {
            closeness: closeness(distance),
            out_of_titrant: -OUT_OF_TITRANT_PENALTY,
            ..Default::default()
        }
    }

    /// Named contributions in evaluation order.
    pub fn terms(&self) -> [(&'static str, f64); 11] {
        [
            ("closeness", self.closeness),
            ("overshoot", self.overshoot),
            ("progress", self.progress),
            ("sweet_spot_linger", self.sweet_spot_linger),
            ("zone", self.zone),
            ("volume_ratio", self.volume_ratio),
            ("stopping", self.stopping),
            ("truncation", self.truncation),
            ("extreme_ph", self.extreme_ph),
            ("hard_limit", self.hard_limit),
            ("out_of_titrant", self.out_of_titrant),
        ]
    }

    pub fn total(&self) -> f64 {
        self.terms().iter().map(|(_, v)| v).sum()
    }
}

/// Dense exponential pull towards the target, minus a tiny step cost.
pub fn closeness(distance: f64) -> f64 {
    CLOSENESS_SCALE * (-distance / CLOSENESS_LENGTH).exp() - STEP_COST
}

/// Tiered penalty whenever the pH is above target.
pub fn overshoot_penalty(s: &RewardSnapshot) -> f64 {
    if !s.above_target() {
        return 0.0;
    }
    match s.overshoot() {
        o if o > 1.0 => -500.0,
        o if o > 0.5 => -200.0,
        o if o > 0.2 => -100.0,
        o if o > 0.1 => -50.0,
        _ => -10.0,
    }
}

/// Reward for closing the distance since the previous step.
pub fn progress(s: &RewardSnapshot) -> f64 {
    let Some(previous) = s.previous_distance else {
        return 0.0;
    };
    let progress = previous - s.distance;
    if progress > 0.0 {
        5.0 * progress
    } else if s.above_target() {
        2.0 * progress - 20.0
    } else {
        2.0 * progress
    }
}

/// Small cost for continuing once already in the sweet spot.
pub fn sweet_spot_linger(s: &RewardSnapshot) -> f64 {
    if (6.9..=7.0).contains(&s.ph) && !s.terminated {
        -1.0
    } else {
        0.0
    }
}

/// Additive bonuses for the pH zones leading up to the target.
pub fn zone_bonus(s: &RewardSnapshot) -> f64 {
    let mut bonus = 0.0;
    if (3.0..=6.0).contains(&s.ph) {
        bonus += 1.0;
    }
    if (6.5..=7.0).contains(&s.ph) {
        bonus += 5.0;
    }
    if (6.9..=7.0).contains(&s.ph) {
        bonus += 20.0;
    }
    bonus
}

/// Bonuses for approaching the equivalence volume, penalty for passing it
/// with the pH above target.
pub fn volume_ratio_bonus(s: &RewardSnapshot) -> f64 {
    let r = s.volume_ratio();
    let mut bonus = 0.0;
    if (0.8..=1.0).contains(&r) {
        bonus += 2.0;
    }
    if (0.95..=1.0).contains(&r) {
        bonus += 5.0;
    }
    if r > 1.0 && s.above_target() {
        bonus -= 15.0;
    }
    bonus
}

/// Bonus or penalty for the pH and volume at which the episode ended.
pub fn stopping(s: &RewardSnapshot) -> f64 {
    if !s.terminated {
        return 0.0;
    }

    let ph_term = if !s.above_target() {
        match s.distance {
            d if d < 0.02 => 500.0,
            d if d < 0.05 => 300.0,
            d if d < 0.1 => 150.0,
            d if d < 0.2 => 50.0,
            d if d < 0.5 => 10.0,
            _ => 0.0,
        }
    } else {
        match s.overshoot() {
            o if o > 1.0 => -1000.0,
            o if o > 0.5 => -500.0,
            o if o > 0.2 => -200.0,
            o if o > 0.1 => -100.0,
            _ => -30.0,
        }
    };

    let veq = s.equivalence_volume_ml;
    let mut volume_term = if s.volume_ml < 0.01 * veq {
        -50.0
    } else if s.volume_ml < 0.3 * veq {
        -15.0
    } else if s.volume_ml < 0.7 * veq {
        -5.0
    } else {
        0.0
    };
    if s.volume_ml > veq && s.above_target() {
        volume_term -= 100.0;
    }

    ph_term + volume_term
}

/// Small bonus when the step limit is hit close to the target.
pub fn truncation_bonus(s: &RewardSnapshot) -> f64 {
    if !s.truncated {
        0.0
    } else if s.distance < 0.1 {
        10.0
    } else if s.distance < 0.5 {
        2.0
    } else {
        0.0
    }
}

pub fn extreme_ph_penalty(s: &RewardSnapshot) -> f64 {
    if s.extreme_ph {
        -30.0
    } else {
        0.0
    }
}

pub fn hard_limit_penalty(s: &RewardSnapshot) -> f64 {
    if s.over_hard_limit {
        -25.0
    } else {
        0.0
    }
}
