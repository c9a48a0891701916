//! # malaria-antibody
//!
//! Antibody lineage kinetics for within-host malaria immunity.
//!
//! ---
//!
//! A host tracks one antibody lineage per (antigen class, variant) it has met.
//! Each lineage carries two coupled state variables:
//!
//! **Capacity** — the matured ability of the B-cell population to produce
//! antibody against this variant, in [0.0, 1.0]. It grows under antigen
//! stimulation through a saturating dose-response, switches to rapid clonal
//! expansion once it passes 0.4, and relaxes back toward a memory floor when
//! stimulation stops.
//!
//! **Concentration** — the circulating titer. Once capacity passes 0.3, antibody
//! is released and concentration is driven toward capacity; otherwise it decays
//! on a twenty-day time constant.
//!
//! The update is deterministic: given the current state, this cycle's antigen
//! count and the read-only [`ImmunityParams`], the next state is fixed.
//!
//! ---
//!
//! ## The cycle
//!
//! ```text
//! antigen counts ──► AntibodyRepertoire::step ──► cytokine signal
//!                         │
//!                         ▼  per lineage
//!        decay → update_capacity → update_concentration → reset_counters
//!                         ↑
//!                  ImmunityParams (shared, read-only)
//! ```
//!
//! ## Module overview
//!
//! | Module | Key types | What it does |
//! |--------|-----------|--------------|
//! | [`params`] | [`ImmunityParams`], [`basic_sigmoid`] | Configuration, kinetic constants, dose-response |
//! | [`lineage`] | [`AntibodyLineage`], [`AntibodyType`] | Per-lineage decay, growth and release; factory |
//! | [`repertoire`] | [`AntibodyRepertoire`] | Keyed lineage container and per-timestep cycle |
//! | [`error`] | [`KineticsError`] | Config validation and persistence failures |
//! | [`snapshot`] | [`snapshot::LineageRecord`], [`snapshot::RepertoireSnapshot`] | Serialisable state (requires `serde` feature) |
//!
//! ## Lineage kinds
//!
//! | Kind | Antigen | Differs from the base rules in |
//! |------|---------|-------------------------------|
//! | [`AntibodyType::Csp`] | sporozoite surface coat | decay and release when boosted above capacity |
//! | [`AntibodyType::Msp1`] | merozoite surface | nothing |
//! | [`AntibodyType::Pfemp1Minor`] | variant surface, minor epitopes | capacity growth |
//! | [`AntibodyType::Pfemp1Major`] | variant surface, major epitopes | capacity growth |
//!
//! ## `no_std`
//!
//! This crate is `#![no_std]` by default. The repertoire and snapshot types use
//! `alloc`. [`KineticsError`] implements `core::error::Error` either way. Enable
//! `std` to link the standard library, `serde` for persistence, and
//! `python-ffi` for the PyO3 bindings.
//!
//! ## Logging
//!
//! Diagnostics go through the [`log`](https://docs.rs/log) facade. The crate
//! never installs a logger.

#![cfg_attr(not(any(feature = "std", feature = "python-ffi")), no_std)]
#![deny(unsafe_code)]
#![deny(missing_docs)]
#![cfg_attr(docsrs, feature(doc_cfg))]

#[cfg(any(feature = "std", feature = "python-ffi"))]
extern crate std;

pub mod error;
pub mod lineage;
pub mod params;
pub mod repertoire;
#[cfg(feature = "serde")]
pub mod snapshot;

#[cfg(feature = "python-ffi")]
pub mod ffi;

pub use error::KineticsError;
pub use lineage::{AntibodyLineage, AntibodyType, LineageKey};
pub use params::{basic_sigmoid, ImmunityParams};
pub use repertoire::AntibodyRepertoire;
