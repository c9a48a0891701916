//! Persistence records for lineages and whole repertoires.
//!
//! Each lineage is written as a flat six-field [`LineageRecord`]:
//!
//! ```text
//! { "capacity": f32, "concentration": f32, "antigen_count": i64,
//!   "antigen_present": bool, "type": i32, "variant_id": i32 }
//! ```
//!
//! `type` is the [`AntibodyType::code`] of the lineage. Decoding a record
//! rebuilds the concrete kind from that code, so a restored lineage dispatches
//! to the same decay, growth and release rules as the one that was saved.
//!
//! # no_std
//!
//! This module requires the `serde` feature. It uses `alloc::vec::Vec` and is
//! compatible with no_std + alloc environments.

extern crate alloc;

use alloc::vec::Vec;

use crate::error::KineticsError;
use crate::lineage::{AntibodyLineage, AntibodyType};
use crate::repertoire::AntibodyRepertoire;

/// Current snapshot format version.
pub const SNAPSHOT_VERSION: u16 = 1;

/// Serializable state of one antibody lineage.
///
/// # Example
///
/// ```rust,ignore
/// use malaria_antibody::lineage::AntibodyLineage;
/// use malaria_antibody::snapshot::LineageRecord;
///
/// let record = LineageRecord::from(&AntibodyLineage::csp(0, 0.4));
/// let json = serde_json::to_string(&record).unwrap();
/// let restored = AntibodyLineage::try_from(&serde_json::from_str::<LineageRecord>(&json).unwrap()).unwrap();
/// ```
#[derive(serde::Serialize, serde::Deserialize, Clone, Debug, PartialEq)]
pub struct LineageRecord {
    /// Production capacity.
    pub capacity: f32,
    /// Circulating concentration.
    pub concentration: f32,
    /// Antigen attributed in the current cycle.
    pub antigen_count: i64,
    /// Antigen presence flag for the current cycle.
    pub antigen_present: bool,
    /// [`AntibodyType::code`] of the lineage.
    #[serde(rename = "type")]
    pub antibody_type: i32,
    /// Antigenic variant within the type.
    pub variant_id: i32,
}

impl From<&AntibodyLineage> for LineageRecord {
    fn from(lineage: &AntibodyLineage) -> Self {
        Self {
            capacity: lineage.capacity(),
            concentration: lineage.concentration(),
            antigen_count: lineage.antigen_count(),
            antigen_present: lineage.antigen_present(),
            antibody_type: lineage.kind().code(),
            variant_id: lineage.variant(),
        }
    }
}

impl TryFrom<&LineageRecord> for AntibodyLineage {
    type Error = KineticsError;

    fn try_from(record: &LineageRecord) -> Result<Self, Self::Error> {
        let kind = AntibodyType::try_from(record.antibody_type).map_err(|e| {
            log::warn!(
                "lineage record for variant {} has unknown type code {}",
                record.variant_id,
                record.antibody_type
            );
            e
        })?;
        let mut lineage =
            AntibodyLineage::new(kind, record.variant_id, record.capacity, record.concentration);
        lineage.set_antigen_count(record.antigen_count);
        lineage.set_antigenic_presence(record.antigen_present);
        Ok(lineage)
    }
}

/// Serializable snapshot of a host's whole [`AntibodyRepertoire`].
#[derive(serde::Serialize, serde::Deserialize, Clone, Debug, PartialEq)]
pub struct RepertoireSnapshot {
    /// Format version — always [`SNAPSHOT_VERSION`] for newly created snapshots.
    pub version: u16,
    /// Every lineage, ordered by type code then variant.
    pub lineages: Vec<LineageRecord>,
}

impl RepertoireSnapshot {
    /// Capture every lineage in `repertoire`.
    pub fn from_repertoire(repertoire: &AntibodyRepertoire) -> Self {
        let lineages: Vec<LineageRecord> = repertoire
            .sorted_keys()
            .into_iter()
            .filter_map(|key| repertoire.get(key.kind, key.variant))
            .map(LineageRecord::from)
            .collect();
        log::debug!("snapshot of {} antibody lineages", lineages.len());

        Self {
            version: SNAPSHOT_VERSION,
            lineages,
        }
    }

    /// Number of lineage records in this snapshot.
    pub fn lineage_count(&self) -> usize {
        self.lineages.len()
    }

    /// Look up a record by type and variant.
    pub fn find(&self, kind: AntibodyType, variant: i32) -> Option<&LineageRecord> {
        self.lineages
            .iter()
            .find(|r| r.antibody_type == kind.code() && r.variant_id == variant)
    }

    /// Rebuild a repertoire.
    ///
    /// Fails on a newer format version or any record with an unknown type
    /// code. Later records replace earlier ones with the same key.
    pub fn restore(&self) -> Result<AntibodyRepertoire, KineticsError> {
        if self.version > SNAPSHOT_VERSION {
            return Err(KineticsError::UnsupportedSnapshotVersion(self.version));
        }
        log::debug!("restoring {} antibody lineages", self.lineages.len());

        let mut repertoire = AntibodyRepertoire::new();
        for record in &self.lineages {
            repertoire.insert(AntibodyLineage::try_from(record)?);
        }
        Ok(repertoire)
    }
}
