//! A host's antibody repertoire: every tracked lineage, keyed by kind and variant.
//!
//! [`AntibodyRepertoire`] owns its lineages exclusively and drives the
//! per-timestep exposure cycle the host calls once per step:
//!
//! ```text
//! increase_antigen_count (any number of times)
//!     → step: cytokine signal → decay → update_capacity → update_concentration → reset_counters
//! ```
//!
//! Lookups go through a `hashbrown::HashMap` so per-variant antigen
//! attribution is a keyed access, not a scan. Lineages never interact, and the
//! summed cytokine signal is accumulated in [`sorted_keys`] order so its
//! rounding does not depend on hash iteration order.
//!
//! [`sorted_keys`]: AntibodyRepertoire::sorted_keys

extern crate alloc;

use alloc::vec::Vec;

use hashbrown::HashMap;

use crate::lineage::{AntibodyLineage, AntibodyType, LineageKey};
use crate::params::ImmunityParams;

/// Owning, keyed collection of antibody lineages for one host.
#[derive(Clone, Default)]
pub struct AntibodyRepertoire {
    lineages: HashMap<LineageKey, AntibodyLineage>,
}

impl AntibodyRepertoire {
    /// Construct an empty repertoire.
    pub fn new() -> Self {
        Self {
            lineages: HashMap::new(),
        }
    }

    // ── Membership ─────────────────────────────────────────────────────────

    /// Get the lineage for `(kind, variant)`, creating it at `capacity` if unseen.
    ///
    /// `capacity` is ignored when the lineage already exists.
    pub fn get_or_create(
        &mut self,
        kind: AntibodyType,
        variant: i32,
        capacity: f32,
    ) -> &mut AntibodyLineage {
        self.lineages
            .entry(LineageKey::new(kind, variant))
            .or_insert_with(|| {
                log::debug!("new {} antibody lineage, variant {}", kind, variant);
                kind.create_lineage(variant, capacity)
            })
    }

    /// Insert a lineage, returning any lineage previously held under the same key.
    pub fn insert(&mut self, lineage: AntibodyLineage) -> Option<AntibodyLineage> {
        self.lineages.insert(lineage.key(), lineage)
    }

    /// Remove and return the lineage for `(kind, variant)`.
    pub fn remove(&mut self, kind: AntibodyType, variant: i32) -> Option<AntibodyLineage> {
        self.lineages.remove(&LineageKey::new(kind, variant))
    }

    /// Look up a lineage.
    pub fn get(&self, kind: AntibodyType, variant: i32) -> Option<&AntibodyLineage> {
        self.lineages.get(&LineageKey::new(kind, variant))
    }

    /// Look up a lineage mutably.
    pub fn get_mut(&mut self, kind: AntibodyType, variant: i32) -> Option<&mut AntibodyLineage> {
        self.lineages.get_mut(&LineageKey::new(kind, variant))
    }

    /// Number of tracked lineages.
    pub fn len(&self) -> usize {
        self.lineages.len()
    }

    /// `true` when no lineage is tracked.
    pub fn is_empty(&self) -> bool {
        self.lineages.is_empty()
    }

    /// Iterate over all lineages in unspecified order.
    pub fn iter(&self) -> impl Iterator<Item = &AntibodyLineage> {
        self.lineages.values()
    }

    /// All keys ordered by type code, then variant.
    pub fn sorted_keys(&self) -> Vec<LineageKey> {
        let mut keys: Vec<LineageKey> = self.lineages.keys().copied().collect();
        keys.sort_unstable();
        keys
    }

    // ── Exposure ───────────────────────────────────────────────────────────

    /// Attribute antigen to `(kind, variant)`, creating the lineage at zero
    /// capacity if unseen. Non-positive counts still create the lineage but
    /// leave its counters untouched.
    pub fn increase_antigen_count(&mut self, kind: AntibodyType, variant: i32, count: i64) {
        self.get_or_create(kind, variant, 0.0)
            .increase_antigen_count(count);
    }

    /// External boosting event (e.g. vaccination): add `amount` to the
    /// lineage's concentration without clamping to capacity.
    pub fn boost_concentration(&mut self, kind: AntibodyType, variant: i32, amount: f32) {
        let lineage = self.get_or_create(kind, variant, 0.0);
        let boosted = lineage.concentration() + amount;
        lineage.set_concentration(boosted);
    }

    /// Summed cytokine signal over every lineage, in key order. Does not
    /// mutate state.
    pub fn stimulate_cytokines(&self, dt: f32, inv_ul_blood: f32) -> f32 {
        self.sorted_keys()
            .iter()
            .filter_map(|key| self.lineages.get(key))
            .map(|l| l.stimulate_cytokines(dt, inv_ul_blood))
            .sum()
    }

    // ── Timestep ───────────────────────────────────────────────────────────

    /// Advance every lineage by one timestep and return the cytokine signal
    /// computed from this cycle's antigen counts before they are consumed.
    pub fn step(&mut self, dt: f32, params: &ImmunityParams, inv_ul_blood: f32) -> f32 {
        log::trace!("repertoire step: {} lineages, dt={}", self.lineages.len(), dt);
        let mut cytokines = 0.0;
        for key in self.sorted_keys() {
            let Some(lineage) = self.lineages.get_mut(&key) else {
                continue;
            };
            cytokines += lineage.stimulate_cytokines(dt, inv_ul_blood);
            lineage.decay(dt, params);
            lineage.update_capacity(dt, params, inv_ul_blood);
            lineage.update_concentration(dt, params);
            lineage.reset_counters();
        }
        cytokines
    }
}

impl core::fmt::Debug for AntibodyRepertoire {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("AntibodyRepertoire")
            .field("lineage_count", &self.lineages.len())
            .finish()
    }
}

// ─── Tests ──────────────────────────────────────────────────────────────────
