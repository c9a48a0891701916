//! Python FFI bindings via PyO3.
//!
//! Exposes lineages, the repertoire and the immunity parameters to Python so
//! that a host model written in Python can drive the kinetics.
//!
//! # Building the Python extension
//!
//! ```bash
//! pip install maturin
//! maturin develop --features python-ffi
//! ```
//!
//! # Usage
//!
//! ```python
//! from malaria_antibody import AntibodyRepertoire, AntibodyType, ImmunityParams
//!
//! params = ImmunityParams(antibody_stimulation_c50=20.0)
//! rep = AntibodyRepertoire()
//!
//! for day in range(30):
//!     rep.increase_antigen_count(AntibodyType.MSP1, 0, 5000)
//!     cytokines = rep.step(1.0, params, inv_ul_blood=1.0 / 5000.0)
//!
//! msp = rep.get(AntibodyType.MSP1, 0)   # a copy
//! msp.capacity = 0.5
//! rep.insert(msp)                        # write the edit back
//! ```

#![allow(non_snake_case)]

use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;

use crate::error::KineticsError;
use crate::lineage::{AntibodyLineage as RustLineage, AntibodyType as RustAntibodyType};
use crate::params::ImmunityParams as RustImmunityParams;
use crate::repertoire::AntibodyRepertoire as RustRepertoire;

fn to_py_err(e: KineticsError) -> PyErr {
    PyValueError::new_err(e.to_string())
}

// ── ImmunityParams ────────────────────────────────────────────────────────────

/// Per-run immunity configuration. Every argument defaults to the model default.
#[pyclass(name = "ImmunityParams")]
#[derive(Clone)]
pub struct PyImmunityParams {
    inner: RustImmunityParams,
}

#[pymethods]
impl PyImmunityParams {
    /// Create a parameter set.
    ///
    /// Args:
    ///     memory_level: capacity floor reached without stimulation
    ///     hyperimmune_decay_rate: per-day relaxation of capacity toward memory_level
    ///     antibody_csp_decay_days: time constant of boosted anti-CSP decay
    ///     msp1_antibody_growthrate: MSP1 capacity growth rate
    ///     antibody_stimulation_c50: antigen density of half-maximal stimulation
    ///     minimum_adapted_response: PfEMP1 baseline stimulation, fraction of c50
    ///     non_specific_growth: minor PfEMP1 growth scaling
    ///     antibody_capacity_growthrate: PfEMP1 capacity growth rate
    #[new]
    #[pyo3(signature = (
        memory_level=0.2,
        hyperimmune_decay_rate=0.01,
        antibody_csp_decay_days=90.0,
        msp1_antibody_growthrate=0.02,
        antibody_stimulation_c50=30.0,
        minimum_adapted_response=0.02,
        non_specific_growth=0.5,
        antibody_capacity_growthrate=0.1
    ))]
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        memory_level: f32,
        hyperimmune_decay_rate: f32,
        antibody_csp_decay_days: f32,
        msp1_antibody_growthrate: f32,
        antibody_stimulation_c50: f32,
        minimum_adapted_response: f32,
        non_specific_growth: f32,
        antibody_capacity_growthrate: f32,
    ) -> Self {
        Self {
            inner: RustImmunityParams {
                memory_level,
                hyperimmune_decay_rate,
                antibody_csp_decay_days,
                msp1_antibody_growthrate,
                antibody_stimulation_c50,
                minimum_adapted_response,
                non_specific_growth,
                antibody_capacity_growthrate,
            },
        }
    }

    /// Raise ValueError if any parameter is outside its usable domain.
    pub fn validate(&self) -> PyResult<()> {
        self.inner.validate().map_err(to_py_err)
    }

    /// Capacity floor reached without stimulation.
    #[getter]
    pub fn memory_level(&self) -> f32 {
        self.inner.memory_level
    }

    /// Per-day relaxation of capacity toward memory_level.
    #[getter]
    pub fn hyperimmune_decay_rate(&self) -> f32 {
        self.inner.hyperimmune_decay_rate
    }

    /// Time constant of boosted anti-CSP decay, in days.
    #[getter]
    pub fn antibody_csp_decay_days(&self) -> f32 {
        self.inner.antibody_csp_decay_days
    }

    /// MSP1 capacity growth rate.
    #[getter]
    pub fn msp1_antibody_growthrate(&self) -> f32 {
        self.inner.msp1_antibody_growthrate
    }

    /// Antigen density of half-maximal stimulation.
    #[getter]
    pub fn antibody_stimulation_c50(&self) -> f32 {
        self.inner.antibody_stimulation_c50
    }

    /// PfEMP1 baseline stimulation, fraction of c50.
    #[getter]
    pub fn minimum_adapted_response(&self) -> f32 {
        self.inner.minimum_adapted_response
    }

    /// Minor PfEMP1 growth scaling.
    #[getter]
    pub fn non_specific_growth(&self) -> f32 {
        self.inner.non_specific_growth
    }

    /// PfEMP1 capacity growth rate.
    #[getter]
    pub fn antibody_capacity_growthrate(&self) -> f32 {
        self.inner.antibody_capacity_growthrate
    }

    /// Python repr string.
    pub fn __repr__(&self) -> String {
        let p = &self.inner;
        format!(
            "ImmunityParams(memory_level={}, hyperimmune_decay_rate={}, \
             antibody_csp_decay_days={}, msp1_antibody_growthrate={}, \
             antibody_stimulation_c50={}, minimum_adapted_response={}, \
             non_specific_growth={}, antibody_capacity_growthrate={})",
            p.memory_level,
            p.hyperimmune_decay_rate,
            p.antibody_csp_decay_days,
            p.msp1_antibody_growthrate,
            p.antibody_stimulation_c50,
            p.minimum_adapted_response,
            p.non_specific_growth,
            p.antibody_capacity_growthrate,
        )
    }
}

// ── AntibodyType ──────────────────────────────────────────────────────────────

/// Antigen class a lineage responds to.
///
/// Kinds:
///     CSP           — sporozoite surface coat
///     MSP1          — merozoite surface
///     PfEMP1_minor  — variant surface antigen, minor epitopes
///     PfEMP1_major  — variant surface antigen, major epitopes
#[pyclass(name = "AntibodyType")]
#[derive(Clone)]
pub struct PyAntibodyType {
    inner: RustAntibodyType,
}

#[pymethods]
impl PyAntibodyType {
    /// CSP class attribute.
    #[classattr]
    pub fn CSP() -> Self {
        Self { inner: RustAntibodyType::Csp }
    }

    /// MSP1 class attribute.
    #[classattr]
    pub fn MSP1() -> Self {
        Self { inner: RustAntibodyType::Msp1 }
    }

    /// PfEMP1_minor class attribute.
    #[classattr]
    pub fn PfEMP1_minor() -> Self {
        Self { inner: RustAntibodyType::Pfemp1Minor }
    }

    /// PfEMP1_major class attribute.
    #[classattr]
    pub fn PfEMP1_major() -> Self {
        Self { inner: RustAntibodyType::Pfemp1Major }
    }

    /// Decode a persisted integer type code.
    #[staticmethod]
    pub fn from_code(code: i32) -> PyResult<Self> {
        let inner = RustAntibodyType::try_from(code).map_err(to_py_err)?;
        Ok(Self { inner })
    }

    /// Integer type code used in persisted records.
    pub fn code(&self) -> i32 {
        self.inner.code()
    }

    /// Python repr string.
    pub fn __repr__(&self) -> String {
        format!("AntibodyType.{}", self.inner.name())
    }

    /// Python equality comparison.
    pub fn __eq__(&self, other: &PyAntibodyType) -> bool {
        self.inner == other.inner
    }
}

// ── AntibodyLineage ───────────────────────────────────────────────────────────

/// Kinetic state of one antibody lineage.
///
/// ```python
/// params = ImmunityParams()
/// ab = AntibodyLineage.create(AntibodyType.MSP1, 0, 0.2)
/// ab.increase_antigen_count(1000)
/// ab.decay(1.0, params)
/// ab.update_capacity(1.0, params, 0.01)
/// ab.update_concentration(1.0, params)
/// ab.reset_counters()
/// ```
#[pyclass(name = "AntibodyLineage")]
#[derive(Clone)]
pub struct PyAntibodyLineage {
    inner: RustLineage,
}

#[pymethods]
impl PyAntibodyLineage {
    /// Create a lineage with explicit initial concentration.
    #[new]
    #[pyo3(signature = (kind, variant, capacity, concentration=0.0))]
    pub fn new(kind: &PyAntibodyType, variant: i32, capacity: f32, concentration: f32) -> Self {
        Self {
            inner: RustLineage::new(kind.inner, variant, capacity, concentration),
        }
    }

    /// Factory: create a lineage of `kind` with zero concentration.
    #[staticmethod]
    pub fn create(kind: &PyAntibodyType, variant: i32, capacity: f32) -> Self {
        Self {
            inner: kind.inner.create_lineage(variant, capacity),
        }
    }

    /// Relax concentration and capacity for one timestep.
    pub fn decay(&mut self, dt: f32, params: &PyImmunityParams) {
        self.inner.decay(dt, &params.inner);
    }

    /// Cytokine release signal for this cycle's antigen count.
    pub fn stimulate_cytokines(&self, dt: f32, inv_ul_blood: f32) -> f32 {
        self.inner.stimulate_cytokines(dt, inv_ul_blood)
    }

    /// Grow capacity from this cycle's antigen exposure.
    pub fn update_capacity(&mut self, dt: f32, params: &PyImmunityParams, inv_ul_blood: f32) {
        self.inner.update_capacity(dt, &params.inner, inv_ul_blood);
    }

    /// Grow capacity at an externally computed rate.
    pub fn update_capacity_with_rate(&mut self, dt: f32, growth_rate: f32) {
        self.inner.update_capacity_with_rate(dt, growth_rate);
    }

    /// Release antibody toward capacity.
    pub fn update_concentration(&mut self, dt: f32, params: &PyImmunityParams) {
        self.inner.update_concentration(dt, &params.inner);
    }

    /// Attribute antigen to this lineage. Non-positive counts are ignored.
    pub fn increase_antigen_count(&mut self, count: i64) {
        self.inner.increase_antigen_count(count);
    }

    /// Override the antigen presence flag.
    pub fn set_antigenic_presence(&mut self, present: bool) {
        self.inner.set_antigenic_presence(present);
    }

    /// Clear this cycle's antigen count and presence flag.
    pub fn reset_counters(&mut self) {
        self.inner.reset_counters();
    }

    /// Antigen class.
    #[getter]
    pub fn kind(&self) -> PyAntibodyType {
        PyAntibodyType { inner: self.inner.kind() }
    }

    /// Antigenic variant.
    #[getter]
    pub fn variant(&self) -> i32 {
        self.inner.variant()
    }

    /// Production capacity.
    #[getter]
    pub fn capacity(&self) -> f32 {
        self.inner.capacity()
    }

    /// Overwrite capacity.
    #[setter]
    pub fn set_capacity(&mut self, capacity: f32) {
        self.inner.set_capacity(capacity);
    }

    /// Circulating concentration.
    #[getter]
    pub fn concentration(&self) -> f32 {
        self.inner.concentration()
    }

    /// Overwrite concentration.
    #[setter]
    pub fn set_concentration(&mut self, concentration: f32) {
        self.inner.set_concentration(concentration);
    }

    /// Antigen attributed since the last reset.
    #[getter]
    pub fn antigen_count(&self) -> i64 {
        self.inner.antigen_count()
    }

    /// Whether antigen was seen since the last reset.
    #[getter]
    pub fn antigen_present(&self) -> bool {
        self.inner.antigen_present()
    }

    /// Python repr string.
    pub fn __repr__(&self) -> String {
        format!(
            "AntibodyLineage({}, variant={}, capacity={:.4}, concentration={:.4})",
            self.inner.kind().name(),
            self.inner.variant(),
            self.inner.capacity(),
            self.inner.concentration(),
        )
    }
}

// ── AntibodyRepertoire ────────────────────────────────────────────────────────

/// All lineages of one host, keyed by (kind, variant).
#[pyclass(name = "AntibodyRepertoire")]
pub struct PyAntibodyRepertoire {
    inner: RustRepertoire,
}

#[pymethods]
impl PyAntibodyRepertoire {
    /// Create an empty repertoire.
    #[new]
    pub fn new() -> Self {
        Self {
            inner: RustRepertoire::new(),
        }
    }

    /// Attribute antigen to (kind, variant), creating the lineage if unseen.
    pub fn increase_antigen_count(&mut self, kind: &PyAntibodyType, variant: i32, count: i64) {
        self.inner.increase_antigen_count(kind.inner, variant, count);
    }

    /// Add to a lineage's concentration without clamping (e.g. vaccine boost).
    pub fn boost_concentration(&mut self, kind: &PyAntibodyType, variant: i32, amount: f32) {
        self.inner.boost_concentration(kind.inner, variant, amount);
    }

    /// Advance every lineage one timestep; returns the cytokine signal.
    pub fn step(&mut self, dt: f32, params: &PyImmunityParams, inv_ul_blood: f32) -> f32 {
        self.inner.step(dt, &params.inner, inv_ul_blood)
    }

    /// Summed cytokine signal without advancing state.
    pub fn stimulate_cytokines(&self, dt: f32, inv_ul_blood: f32) -> f32 {
        self.inner.stimulate_cytokines(dt, inv_ul_blood)
    }

    /// Copy of the lineage for (kind, variant), or None.
    ///
    /// The result is detached from the repertoire: setting attributes on it
    /// does not change the stored lineage. Write edits back with `insert`.
    pub fn get(&self, kind: &PyAntibodyType, variant: i32) -> Option<PyAntibodyLineage> {
        self.inner
            .get(kind.inner, variant)
            .map(|l| PyAntibodyLineage { inner: l.clone() })
    }

    /// Store a copy of `lineage` under its own (kind, variant), returning the
    /// lineage it replaced, if any.
    pub fn insert(&mut self, lineage: &PyAntibodyLineage) -> Option<PyAntibodyLineage> {
        self.inner
            .insert(lineage.inner.clone())
            .map(|inner| PyAntibodyLineage { inner })
    }

    /// Number of tracked lineages.
    pub fn __len__(&self) -> usize {
        self.inner.len()
    }

    /// Python repr string.
    pub fn __repr__(&self) -> String {
        format!("AntibodyRepertoire(lineages={})", self.inner.len())
    }
}

// ── Module entry point ────────────────────────────────────────────────────────

/// Antibody lineage kinetics for within-host malaria immunity.
#[pymodule]
pub fn malaria_antibody(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<PyImmunityParams>()?;
    m.add_class::<PyAntibodyType>()?;
    m.add_class::<PyAntibodyLineage>()?;
    m.add_class::<PyAntibodyRepertoire>()?;
    m.add("__version__", env!("CARGO_PKG_VERSION"))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_params_expose_every_field() {
        let p = PyImmunityParams::new(0.1, 0.2, 30.0, 0.4, 25.0, 0.06, 0.7, 0.8);
        assert_eq!(p.memory_level(), 0.1);
        assert_eq!(p.hyperimmune_decay_rate(), 0.2);
        assert_eq!(p.antibody_csp_decay_days(), 30.0);
        assert_eq!(p.msp1_antibody_growthrate(), 0.4);
        assert_eq!(p.antibody_stimulation_c50(), 25.0);
        assert_eq!(p.minimum_adapted_response(), 0.06);
        assert_eq!(p.non_specific_growth(), 0.7);
        assert_eq!(p.antibody_capacity_growthrate(), 0.8);
        assert!(p.__repr__().contains("antibody_capacity_growthrate=0.8"));
    }

    #[test]
    fn test_repertoire_get_is_a_copy_until_inserted() {
        let msp1 = PyAntibodyType::MSP1();
        let mut rep = PyAntibodyRepertoire::new();
        rep.increase_antigen_count(&msp1, 0, 10);

        let mut copy = rep.get(&msp1, 0).map(|l| l.inner).expect("lineage");
        copy.set_capacity(0.5);
        assert_eq!(rep.inner.get(RustAntibodyType::Msp1, 0).map(|l| l.capacity()), Some(0.0));

        let replaced = rep.insert(&PyAntibodyLineage { inner: copy });
        assert_eq!(replaced.map(|l| l.inner.capacity()), Some(0.0));
        assert_eq!(rep.inner.get(RustAntibodyType::Msp1, 0).map(|l| l.capacity()), Some(0.5));
    }
}
