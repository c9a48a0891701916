//! Immunity configuration and the fixed kinetic constants.
//!
//! [`ImmunityParams`] is the read-only configuration every lineage update
//! consults. It is supplied once per simulation run and may be shared across
//! any number of concurrently updating lineages; nothing in this crate mutates it.
//!
//! # Invariants
//!
//! - The kinetics never validate parameters. [`ImmunityParams::validate`] is
//!   opt-in for hosts that load configuration from outside.
//! - [`basic_sigmoid`] is 0 for non-positive input and saturates toward 1.

use crate::error::KineticsError;

// ─── Kinetic constants ──────────────────────────────────────────────────────

// The three thresholds are double precision and state is widened before the
// comparison, so an f32 state exactly at 0.4, 0.3 or 1e-7 sits above them.

/// Concentrations at or below this level are treated as zero by decay.
pub const NON_TRIVIAL_ANTIBODY_THRESHOLD: f64 = 0.000_000_1;

/// Per-day concentration decay rate (twenty-day time constant).
pub const TWENTY_DAY_DECAY_CONSTANT: f32 = 0.05;

/// Capacity above which B-cell growth switches to rapid proliferation.
pub const B_CELL_PROLIFERATION_THRESHOLD: f64 = 0.4;

/// Per-day rate of the rapid proliferation term.
pub const B_CELL_PROLIFERATION_CONSTANT: f32 = 0.33;

/// Capacity above which antibody is released into circulation.
pub const ANTIBODY_RELEASE_THRESHOLD: f64 = 0.3;

/// Relaxation rate of concentration toward capacity once release begins.
pub const ANTIBODY_RELEASE_FACTOR: f32 = 4.0;

/// Saturating dose-response `x / (x + c50)`.
///
/// ```text
/// x = 0    → 0.0
/// x = c50  → 0.5
/// x → ∞    → 1.0
/// ```
///
/// Non-positive stimulation produces no response.
pub fn basic_sigmoid(c50: f32, x: f32) -> f32 {
    if x > 0.0 {
        x / (x + c50)
    } else {
        0.0
    }
}

// ─── ImmunityParams ─────────────────────────────────────────────────────────

/// Per-run immunity configuration consumed by lineage updates.
///
/// With the `serde` feature, missing fields in a loaded document fall back to
/// [`ImmunityParams::default`].
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ImmunityParams {
    /// Floor that capacity relaxes toward in the absence of stimulation.
    pub memory_level: f32,
    /// Per-day relaxation rate of capacity toward `memory_level`.
    pub hyperimmune_decay_rate: f32,
    /// Time constant (days) of anti-CSP decay above capacity, e.g. after boosting.
    pub antibody_csp_decay_days: f32,
    /// Growth rate of merozoite-surface (MSP1) capacity.
    pub msp1_antibody_growthrate: f32,
    /// Antigen density giving half-maximal stimulation.
    pub antibody_stimulation_c50: f32,
    /// Baseline stimulation of variant-surface lineages, as a fraction of c50.
    pub minimum_adapted_response: f32,
    /// Scaling of minor variant-surface growth relative to major.
    pub non_specific_growth: f32,
    /// Growth rate of variant-surface (PfEMP1) capacity.
    pub antibody_capacity_growthrate: f32,
}

impl ImmunityParams {
    /// Construct the default parameter set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Check that every parameter lies in a domain the kinetics can use.
    ///
    /// Divisors (`antibody_csp_decay_days`, `antibody_stimulation_c50`) must be
    /// strictly positive; every other field must be finite and non-negative.
    pub fn validate(&self) -> Result<(), KineticsError> {
        let positive = [
            ("antibody_csp_decay_days", self.antibody_csp_decay_days),
            ("antibody_stimulation_c50", self.antibody_stimulation_c50),
        ];
        for (name, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(KineticsError::InvalidParameter { name, value });
            }
        }

        let non_negative = [
            ("memory_level", self.memory_level),
            ("hyperimmune_decay_rate", self.hyperimmune_decay_rate),
            ("msp1_antibody_growthrate", self.msp1_antibody_growthrate),
            ("minimum_adapted_response", self.minimum_adapted_response),
            ("non_specific_growth", self.non_specific_growth),
            ("antibody_capacity_growthrate", self.antibody_capacity_growthrate),
        ];
        for (name, value) in non_negative {
            if !(value.is_finite() && value >= 0.0) {
                return Err(KineticsError::InvalidParameter { name, value });
            }
        }
        Ok(())
    }
}

impl Default for ImmunityParams {
    fn default() -> Self {
        Self {
            memory_level: 0.2,
            hyperimmune_decay_rate: 0.01,
            antibody_csp_decay_days: 90.0,
            msp1_antibody_growthrate: 0.02,
            antibody_stimulation_c50: 30.0,
            minimum_adapted_response: 0.02,
            non_specific_growth: 0.5,
            antibody_capacity_growthrate: 0.1,
        }
    }
}
