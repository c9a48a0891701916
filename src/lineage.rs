//! Antibody lineage kinetics.
//!
//! One [`AntibodyLineage`] tracks the response against a single antigenic
//! variant: production `capacity` (affinity-matured fraction of maximum, in
//! [0.0, 1.0]) and circulating `concentration`. The host advances it once per
//! timestep:
//!
//! ```text
//! increase_antigen_count → decay → update_capacity → update_concentration → reset_counters
//! ```
//!
//! The four lineage kinds share one update skeleton and differ only where
//! [`AntibodyType`] selects a different rule:
//!
//! | Kind | decay | capacity growth | concentration release |
//! |------|-------|-----------------|-----------------------|
//! | [`AntibodyType::Csp`] | own time constant when boosted above capacity | MSP law | own time constant when boosted above capacity |
//! | [`AntibodyType::Msp1`] | base | MSP law | base |
//! | [`AntibodyType::Pfemp1Minor`] | base | two-regime, non-specific scaling, always clamped | base |
//! | [`AntibodyType::Pfemp1Major`] | base | two-regime, clamped only while stimulated | base |
//!
//! # Invariants
//!
//! - Capacity is clamped to at most 1.0 after growth, except the major
//!   variant-surface rapid-proliferation branch which is left unclamped.
//! - Concentration is clamped to at most capacity after release, except CSP
//!   lineages boosted above capacity, which decay on their own time constant.
//! - Non-positive antigen increments are ignored.
//! - No validation: out-of-range inputs produce whatever the arithmetic gives.

use core::fmt;

use crate::error::KineticsError;
use crate::params::{
    basic_sigmoid, ImmunityParams, ANTIBODY_RELEASE_FACTOR, ANTIBODY_RELEASE_THRESHOLD,
    B_CELL_PROLIFERATION_CONSTANT, B_CELL_PROLIFERATION_THRESHOLD,
    NON_TRIVIAL_ANTIBODY_THRESHOLD, TWENTY_DAY_DECAY_CONSTANT,
};

// ─── AntibodyType ───────────────────────────────────────────────────────────

/// Antigen class a lineage responds to. Fixed at creation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AntibodyType {
    /// Circumsporozoite protein, the sporozoite surface coat.
    Csp,
    /// Merozoite surface protein 1.
    Msp1,
    /// Minor epitopes of the PfEMP1 variant surface antigen.
    Pfemp1Minor,
    /// Major epitopes of the PfEMP1 variant surface antigen.
    Pfemp1Major,
}

impl AntibodyType {
    /// Every kind, in type-code order.
    pub const ALL: [AntibodyType; 4] = [
        AntibodyType::Csp,
        AntibodyType::Msp1,
        AntibodyType::Pfemp1Minor,
        AntibodyType::Pfemp1Major,
    ];

    /// Stable integer code used by persisted records.
    pub fn code(self) -> i32 {
        match self {
            AntibodyType::Csp => 0,
            AntibodyType::Msp1 => 1,
            AntibodyType::Pfemp1Minor => 2,
            AntibodyType::Pfemp1Major => 3,
        }
    }

    /// Short display name.
    pub fn name(self) -> &'static str {
        match self {
            AntibodyType::Csp => "CSP",
            AntibodyType::Msp1 => "MSP1",
            AntibodyType::Pfemp1Minor => "PfEMP1_minor",
            AntibodyType::Pfemp1Major => "PfEMP1_major",
        }
    }

    /// Factory: create a lineage of this kind with zero concentration.
    pub fn create_lineage(self, variant: i32, capacity: f32) -> AntibodyLineage {
        AntibodyLineage::new(self, variant, capacity, 0.0)
    }
}

impl TryFrom<i32> for AntibodyType {
    type Error = KineticsError;

    fn try_from(code: i32) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(AntibodyType::Csp),
            1 => Ok(AntibodyType::Msp1),
            2 => Ok(AntibodyType::Pfemp1Minor),
            3 => Ok(AntibodyType::Pfemp1Major),
            other => Err(KineticsError::UnknownAntibodyType(other)),
        }
    }
}

impl fmt::Display for AntibodyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.name())
    }
}

/// Identity of a lineage within one host: kind plus antigenic variant.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LineageKey {
    /// Antigen class.
    pub kind: AntibodyType,
    /// Variant within the class.
    pub variant: i32,
}

impl LineageKey {
    /// Construct a key.
    pub fn new(kind: AntibodyType, variant: i32) -> Self {
        Self { kind, variant }
    }
}

// ─── AntibodyLineage ────────────────────────────────────────────────────────

/// Kinetic state of one antibody lineage.
#[derive(Clone, Debug, PartialEq)]
pub struct AntibodyLineage {
    kind: AntibodyType,
    variant: i32,
    capacity: f32,
    concentration: f32,
    antigen_count: i64,
    antigen_present: bool,
}

impl AntibodyLineage {
    /// Initialise identity and kinetic state. Counters start empty.
    pub fn new(kind: AntibodyType, variant: i32, capacity: f32, concentration: f32) -> Self {
        Self {
            kind,
            variant,
            capacity,
            concentration,
            antigen_count: 0,
            antigen_present: false,
        }
    }

    /// Create an anti-CSP lineage.
    pub fn csp(variant: i32, capacity: f32) -> Self {
        AntibodyType::Csp.create_lineage(variant, capacity)
    }

    /// Create an anti-MSP1 lineage.
    pub fn msp1(variant: i32, capacity: f32) -> Self {
        AntibodyType::Msp1.create_lineage(variant, capacity)
    }

    /// Create a lineage against a minor PfEMP1 epitope.
    pub fn pfemp1_minor(variant: i32, capacity: f32) -> Self {
        AntibodyType::Pfemp1Minor.create_lineage(variant, capacity)
    }

    /// Create a lineage against a major PfEMP1 epitope.
    pub fn pfemp1_major(variant: i32, capacity: f32) -> Self {
        AntibodyType::Pfemp1Major.create_lineage(variant, capacity)
    }

    // ── Decay ──────────────────────────────────────────────────────────────

    /// Relax concentration toward zero and capacity toward `memory_level`.
    ///
    /// ```text
    /// concentration -= concentration × 0.05 × dt              (if > 1e-7)
    /// capacity      -= (capacity − memory_level) × rate × dt   (if > memory_level)
    /// ```
    ///
    /// CSP lineages boosted above capacity instead decay on
    /// `antibody_csp_decay_days` and leave capacity untouched.
    pub fn decay(&mut self, dt: f32, params: &ImmunityParams) {
        debug_assert!(dt >= 0.0, "negative timestep: {}", dt);
        match self.kind {
            AntibodyType::Csp if self.concentration > self.capacity => {
                self.decay_boosted(dt, params)
            }
            _ => self.decay_toward_memory(dt, params),
        }
    }

    fn decay_toward_memory(&mut self, dt: f32, params: &ImmunityParams) {
        if f64::from(self.concentration) > NON_TRIVIAL_ANTIBODY_THRESHOLD {
            self.concentration -= self.concentration * TWENTY_DAY_DECAY_CONSTANT * dt;
        }
        if self.capacity > params.memory_level {
            self.capacity -=
                (self.capacity - params.memory_level) * params.hyperimmune_decay_rate * dt;
        }
    }

    fn decay_boosted(&mut self, dt: f32, params: &ImmunityParams) {
        self.concentration -= self.concentration * dt / params.antibody_csp_decay_days;
    }

    // ── Cytokines ──────────────────────────────────────────────────────────

    /// Cytokine release signal: `(1 − concentration) × antigen_count × inv_ul_blood`.
    ///
    /// Strongest when antigen load is high and existing antibody is low.
    pub fn stimulate_cytokines(&self, _dt: f32, inv_ul_blood: f32) -> f32 {
        (1.0 - self.concentration) * self.antigen_count as f32 * inv_ul_blood
    }

    // ── Capacity growth ────────────────────────────────────────────────────

    /// Grow capacity from this cycle's antigen exposure.
    ///
    /// `inv_ul_blood` converts the raw antigen count to a density.
    pub fn update_capacity(&mut self, dt: f32, params: &ImmunityParams, inv_ul_blood: f32) {
        debug_assert!(dt >= 0.0, "negative timestep: {}", dt);
        match self.kind {
            AntibodyType::Csp | AntibodyType::Msp1 => {
                self.grow_merozoite_surface(dt, params, inv_ul_blood)
            }
            AntibodyType::Pfemp1Minor => {
                let growth_rate = params.antibody_capacity_growthrate * params.non_specific_growth;
                self.grow_variant_surface(dt, growth_rate, params, inv_ul_blood);
                self.clamp_capacity();
            }
            AntibodyType::Pfemp1Major => {
                let growth_rate = params.antibody_capacity_growthrate;
                // Rapid proliferation is not clamped for major epitopes.
                if self.grow_variant_surface(dt, growth_rate, params, inv_ul_blood) {
                    self.clamp_capacity();
                }
            }
        }
    }

    /// Grow capacity at an externally computed rate:
    /// `capacity += growth_rate × dt × (1 − capacity)`, clamped to 1.0.
    pub fn update_capacity_with_rate(&mut self, dt: f32, growth_rate: f32) {
        debug_assert!(dt >= 0.0, "negative timestep: {}", dt);
        self.capacity += growth_rate * dt * (1.0 - self.capacity);
        self.clamp_capacity();
    }

    fn grow_merozoite_surface(&mut self, dt: f32, params: &ImmunityParams, inv_ul_blood: f32) {
        let growth_rate = params.msp1_antibody_growthrate;
        let threshold = params.antibody_stimulation_c50;
        let stimulation = self.antigen_count as f32 * inv_ul_blood;

        self.capacity += growth_rate * (1.0 - self.capacity) * basic_sigmoid(threshold, stimulation);

        if f64::from(self.capacity) > B_CELL_PROLIFERATION_THRESHOLD {
            self.proliferate(dt);
        }
        self.clamp_capacity();
    }

    /// Two-regime variant-surface growth. Returns `true` when the stimulated
    /// (below-threshold) regime ran, `false` for rapid proliferation.
    fn grow_variant_surface(
        &mut self,
        dt: f32,
        growth_rate: f32,
        params: &ImmunityParams,
        inv_ul_blood: f32,
    ) -> bool {
        let threshold = params.antibody_stimulation_c50;
        if f64::from(self.capacity) <= B_CELL_PROLIFERATION_THRESHOLD {
            let min_stimulation = threshold * params.minimum_adapted_response;
            let stimulation = self.antigen_count as f32 * inv_ul_blood + min_stimulation;
            self.capacity += growth_rate
                * dt
                * (1.0 - self.capacity)
                * basic_sigmoid(threshold, stimulation);
            true
        } else {
            self.proliferate(dt);
            false
        }
    }

    fn proliferate(&mut self, dt: f32) {
        self.capacity += (1.0 - self.capacity) * B_CELL_PROLIFERATION_CONSTANT * dt;
    }

    fn clamp_capacity(&mut self) {
        if self.capacity > 1.0 {
            self.capacity = 1.0;
        }
    }

    // ── Concentration release ──────────────────────────────────────────────

    /// Release antibody once capacity passes 0.3, relaxing concentration
    /// toward capacity at rate 4, then clamp concentration to capacity.
    ///
    /// CSP lineages boosted above capacity decay on `antibody_csp_decay_days`
    /// instead and are not clamped.
    pub fn update_concentration(&mut self, dt: f32, params: &ImmunityParams) {
        debug_assert!(dt >= 0.0, "negative timestep: {}", dt);
        match self.kind {
            AntibodyType::Csp if self.concentration > self.capacity => {
                self.decay_boosted(dt, params)
            }
            _ => self.release(dt),
        }
    }

    fn release(&mut self, dt: f32) {
        if f64::from(self.capacity) > ANTIBODY_RELEASE_THRESHOLD {
            self.concentration +=
                (self.capacity - self.concentration) * ANTIBODY_RELEASE_FACTOR * dt;
        }
        if self.concentration > self.capacity {
            self.concentration = self.capacity;
        }
    }

    // ── Antigen bookkeeping ────────────────────────────────────────────────

    /// Clear this cycle's antigen count and presence flag.
    pub fn reset_counters(&mut self) {
        self.antigen_present = false;
        self.antigen_count = 0;
    }

    /// Attribute `count` antigen to this lineage. Non-positive counts are ignored.
    pub fn increase_antigen_count(&mut self, count: i64) {
        if count > 0 {
            self.antigen_count += count;
            self.antigen_present = true;
        }
    }

    /// Override the presence flag without touching the count.
    pub fn set_antigenic_presence(&mut self, present: bool) {
        self.antigen_present = present;
    }

    // ── Accessors ──────────────────────────────────────────────────────────

    /// Antigen class.
    pub fn kind(&self) -> AntibodyType {
        self.kind
    }

    /// Antigenic variant within the class.
    pub fn variant(&self) -> i32 {
        self.variant
    }

    /// Map key for this lineage.
    pub fn key(&self) -> LineageKey {
        LineageKey::new(self.kind, self.variant)
    }

    /// Production capacity.
    pub fn capacity(&self) -> f32 {
        self.capacity
    }

    /// Circulating concentration.
    pub fn concentration(&self) -> f32 {
        self.concentration
    }

    /// Antigen attributed since the last reset.
    pub fn antigen_count(&self) -> i64 {
        self.antigen_count
    }

    /// Whether antigen was seen since the last reset.
    pub fn antigen_present(&self) -> bool {
        self.antigen_present
    }

    /// Overwrite capacity. No clamping.
    pub fn set_capacity(&mut self, capacity: f32) {
        self.capacity = capacity;
    }

    /// Overwrite concentration. No clamping, so boosting above capacity is allowed.
    pub fn set_concentration(&mut self, concentration: f32) {
        self.concentration = concentration;
    }

    /// Overwrite the antigen count. Used when restoring persisted state.
    pub fn set_antigen_count(&mut self, count: i64) {
        self.antigen_count = count;
    }
}

// ─── Tests ──────────────────────────────────────────────────────────────────
