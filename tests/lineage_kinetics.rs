//! Integration tests for lineage kinetics across all four lineage kinds.
//!
//! Exercises the public API only: the per-cycle update order, the clamping
//! properties each kind guarantees, and the worked numerical scenarios.

use malaria_antibody::lineage::{AntibodyLineage, AntibodyType};
use malaria_antibody::params::ImmunityParams;
use malaria_antibody::repertoire::AntibodyRepertoire;

// ── Helpers ──────────────────────────────────────────────────────────────────

const EPS: f32 = 1e-5;

fn params() -> ImmunityParams {
    ImmunityParams {
        memory_level: 0.3,
        hyperimmune_decay_rate: 0.01,
        antibody_csp_decay_days: 90.0,
        msp1_antibody_growthrate: 0.05,
        antibody_stimulation_c50: 20.0,
        minimum_adapted_response: 0.02,
        non_specific_growth: 0.5,
        antibody_capacity_growthrate: 0.1,
    }
}

/// One full host cycle on a single lineage.
fn cycle(lineage: &mut AntibodyLineage, antigen: i64, dt: f32, p: &ImmunityParams, inv: f32) {
    lineage.increase_antigen_count(antigen);
    lineage.decay(dt, p);
    lineage.update_capacity(dt, p, inv);
    lineage.update_concentration(dt, p);
    lineage.reset_counters();
}

const CAPACITY_GRID: [f32; 7] = [0.0, 0.1, 0.3, 0.4, 0.41, 0.8, 1.0];
const ANTIGEN_GRID: [i64; 4] = [0, 10, 1_000, 1_000_000];

// ── Scenarios ────────────────────────────────────────────────────────────────

#[test]
fn test_scenario_a_msp_capacity_growth() {
    let p = params();
    let mut ab = AntibodyLineage::msp1(0, 0.2);
    ab.increase_antigen_count(1000);
    ab.update_capacity(1.0, &p, 0.01);
    assert!((ab.capacity() - 0.213_333).abs() < EPS, "capacity={}", ab.capacity());
}

#[test]
fn test_scenario_b_concentration_decay() {
    let p = params();
    let mut ab = AntibodyLineage::new(AntibodyType::Msp1, 0, 0.0, 0.5);
    ab.decay(1.0, &p);
    assert!((ab.concentration() - 0.475).abs() < EPS);
}

#[test]
fn test_scenario_c_capacity_decay() {
    let p = params();
    let mut ab = AntibodyLineage::msp1(0, 0.95);
    ab.decay(1.0, &p);
    assert!((ab.capacity() - 0.9435).abs() < EPS);
}

#[test]
fn test_scenario_d_release() {
    let p = params();
    let mut ab = AntibodyLineage::new(AntibodyType::Msp1, 0, 0.5, 0.1);
    ab.update_concentration(0.1, &p);
    assert!((ab.concentration() - 0.26).abs() < EPS);
    assert!(ab.concentration() <= ab.capacity());
}

// ── Properties ───────────────────────────────────────────────────────────────

#[test]
fn test_capacity_bounded_after_growth() {
    let p = params();
    let kinds = [AntibodyType::Csp, AntibodyType::Msp1, AntibodyType::Pfemp1Minor];
    for kind in kinds {
        for &cap in &CAPACITY_GRID {
            for &antigen in &ANTIGEN_GRID {
                for dt in [0.1_f32, 1.0, 5.0] {
                    let mut ab = kind.create_lineage(0, cap);
                    ab.increase_antigen_count(antigen);
                    ab.update_capacity(dt, &p, 0.01);
                    assert!(
                        ab.capacity() >= 0.0 && ab.capacity() <= 1.0,
                        "{} cap={} antigen={} dt={} → {}",
                        kind,
                        cap,
                        antigen,
                        dt,
                        ab.capacity()
                    );
                }
            }
        }
    }
}

#[test]
fn test_major_bounded_while_stimulated_only() {
    let p = params();
    for &cap in CAPACITY_GRID.iter().filter(|&&c| c < 0.4) {
        let mut ab = AntibodyLineage::pfemp1_major(0, cap);
        ab.increase_antigen_count(1_000_000);
        ab.update_capacity(50.0, &p, 1.0);
        assert!(ab.capacity() <= 1.0, "cap={} → {}", cap, ab.capacity());
    }

    // Rapid proliferation with a long step overshoots and is left that way.
    let mut ab = AntibodyLineage::pfemp1_major(0, 0.8);
    ab.update_capacity(5.0, &p, 0.01);
    assert!(ab.capacity() > 1.0, "capacity={}", ab.capacity());

    // Capacity stored as exactly 0.4 already counts as above the threshold.
    let mut ab = AntibodyLineage::pfemp1_major(0, 0.4);
    ab.update_capacity(5.0, &p, 0.01);
    assert!((ab.capacity() - 1.39).abs() < EPS, "capacity={}", ab.capacity());
}

#[test]
fn test_thresholds_compare_after_widening() {
    let p = params();

    let mut major = AntibodyLineage::pfemp1_major(0, 0.4);
    major.update_capacity(1.0, &p, 0.01);
    assert!((major.capacity() - 0.598).abs() < EPS, "capacity={}", major.capacity());

    let mut msp = AntibodyLineage::new(AntibodyType::Msp1, 0, 0.3, 0.1);
    msp.update_concentration(0.1, &p);
    assert!((msp.concentration() - 0.18).abs() < EPS, "concentration={}", msp.concentration());

    let mut faint = AntibodyLineage::new(AntibodyType::Msp1, 0, 0.0, 1.0e-7);
    faint.decay(1.0, &p);
    assert!((faint.concentration() - 0.95e-7).abs() < 1e-12);
}

#[test]
fn test_concentration_bounded_after_release_except_csp() {
    let p = params();
    let kinds = [AntibodyType::Msp1, AntibodyType::Pfemp1Minor, AntibodyType::Pfemp1Major];
    for kind in kinds {
        for &cap in &CAPACITY_GRID {
            for conc in [0.0_f32, 0.2, 0.9, 2.5] {
                let mut ab = AntibodyLineage::new(kind, 0, cap, conc);
                ab.update_concentration(1.0, &p);
                assert!(
                    ab.concentration() <= ab.capacity(),
                    "{} cap={} conc={} → {}",
                    kind,
                    cap,
                    conc,
                    ab.concentration()
                );
            }
        }
    }
}

#[test]
fn test_csp_boosted_follows_own_time_constant() {
    let p = params();
    for dt in [0.5_f32, 1.0, 3.0] {
        let mut decayed = AntibodyLineage::new(AntibodyType::Csp, 0, 0.4, 1.5);
        decayed.decay(dt, &p);
        let expected = 1.5 * (1.0 - dt / p.antibody_csp_decay_days);
        assert!((decayed.concentration() - expected).abs() < EPS);
        assert_eq!(decayed.capacity(), 0.4);

        let mut released = AntibodyLineage::new(AntibodyType::Csp, 0, 0.4, 1.5);
        released.update_concentration(dt, &p);
        assert!((released.concentration() - expected).abs() < EPS);
        assert!(released.concentration() > released.capacity());
    }
}

#[test]
fn test_non_positive_antigen_is_noop() {
    for kind in AntibodyType::ALL {
        let mut ab = kind.create_lineage(0, 0.1);
        ab.increase_antigen_count(0);
        ab.increase_antigen_count(-5);
        assert_eq!(ab.antigen_count(), 0);
        assert!(!ab.antigen_present());
    }
}

#[test]
fn test_reset_after_any_sequence() {
    for kind in AntibodyType::ALL {
        let mut ab = kind.create_lineage(3, 0.1);
        for n in [5_i64, -2, 0, 1_000, 17] {
            ab.increase_antigen_count(n);
        }
        assert_eq!(ab.antigen_count(), 1_022);
        ab.reset_counters();
        assert_eq!(ab.antigen_count(), 0);
        assert!(!ab.antigen_present());
    }
}

// ── Longer courses ───────────────────────────────────────────────────────────

#[test]
fn test_sustained_exposure_drives_capacity_to_saturation() {
    let p = params();
    for kind in [AntibodyType::Msp1, AntibodyType::Pfemp1Minor] {
        let mut ab = kind.create_lineage(0, 0.0);
        for _ in 0..120 {
            cycle(&mut ab, 20_000, 1.0, &p, 0.01);
        }
        assert!(ab.capacity() > 0.9, "{} capacity={}", kind, ab.capacity());
        assert!(ab.capacity() <= 1.0);
        assert!(ab.concentration() > 0.3, "{} concentration={}", kind, ab.concentration());
    }
}

#[test]
fn test_concentration_wanes_after_exposure_ends() {
    let p = params();
    let mut ab = AntibodyLineage::msp1(0, 0.0);
    for _ in 0..120 {
        cycle(&mut ab, 20_000, 1.0, &p, 0.01);
    }
    let peak_capacity = ab.capacity();

    // Drop capacity under the release threshold so only decay acts on titer.
    ab.set_capacity(0.25);
    let before = ab.concentration();
    for _ in 0..60 {
        cycle(&mut ab, 0, 1.0, &p, 0.01);
    }
    assert!(peak_capacity > 0.9);
    assert!(ab.concentration() < before * 0.1, "concentration={}", ab.concentration());
}

#[test]
fn test_repertoire_step_equivalent_to_lineage_cycle() {
    let p = params();
    let mut rep = AntibodyRepertoire::new();
    let mut lone = AntibodyLineage::pfemp1_minor(9, 0.1);
    rep.insert(lone.clone());

    for day in 0..50_i64 {
        let antigen = (day % 7) * 300;
        rep.increase_antigen_count(AntibodyType::Pfemp1Minor, 9, antigen);
        rep.step(1.0, &p, 0.01);
        cycle(&mut lone, antigen, 1.0, &p, 0.01);
    }
    assert_eq!(rep.get(AntibodyType::Pfemp1Minor, 9), Some(&lone));
}
