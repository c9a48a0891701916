//! # Antibody course of a single blood-stage infection
//!
//! Follows one host through a 60-day infection and a 120-day recovery.
//! Shows MSP1 capacity maturing under merozoite load, PfEMP1 variants being
//! switched on in waves, the cytokine signal falling as titers rise, and
//! capacity relaxing to the memory floor once parasites are cleared. A
//! vaccine boost on day 150 pushes anti-CSP above its capacity ceiling to show
//! the separate CSP decay path.
//!
//! Run with: `cargo run --example infection_course`

use malaria_antibody::lineage::AntibodyType;
use malaria_antibody::params::ImmunityParams;
use malaria_antibody::repertoire::AntibodyRepertoire;

/// Inverse of sampled blood volume (1 / 5 L in µL).
const INV_UL_BLOOD: f32 = 1.0 / 5.0e6;

/// Parasite density over time: exponential rise, then clearance.
fn parasites_on(day: u32) -> i64 {
    match day {
        0..=20 => 10_i64.pow(day / 3 + 4),
        21..=60 => 10_000_000_000 / (day as i64 - 19),
        _ => 0,
    }
}

/// PfEMP1 major variant expressed on `day`: a new variant every 12 days.
fn expressed_variant(day: u32) -> i32 {
    (day / 12) as i32
}

fn main() {
    let params = ImmunityParams::default();
    if let Err(e) = params.validate() {
        eprintln!("invalid parameters: {}", e);
        return;
    }

    let mut rep = AntibodyRepertoire::new();
    rep.get_or_create(AntibodyType::Csp, 0, 0.1);

    println!("day  parasites      cytokines  MSP1 cap  MSP1 conc  PfEMP1 lineages  CSP conc");
    for day in 0..180_u32 {
        let parasites = parasites_on(day);
        if parasites > 0 {
            rep.increase_antigen_count(AntibodyType::Msp1, 0, parasites);
            rep.increase_antigen_count(AntibodyType::Pfemp1Major, expressed_variant(day), parasites);
            for minor in 0..5 {
                rep.increase_antigen_count(AntibodyType::Pfemp1Minor, minor, parasites / 5);
            }
        }

        if day == 150 {
            rep.boost_concentration(AntibodyType::Csp, 0, 2.0);
            println!("---- day 150: CSP vaccine boost ----");
        }

        let cytokines = rep.step(1.0, &params, INV_UL_BLOOD);

        if day % 10 == 0 || day == 151 {
            let msp = rep.get(AntibodyType::Msp1, 0);
            let pfemp1 = rep
                .iter()
                .filter(|l| l.kind() == AntibodyType::Pfemp1Major)
                .count();
            let csp = rep.get(AntibodyType::Csp, 0).map_or(0.0, |l| l.concentration());
            println!(
                "{:>3}  {:>12}  {:>9.3}  {:>8.3}  {:>9.3}  {:>15}  {:>8.3}",
                day,
                parasites,
                cytokines,
                msp.map_or(0.0, |l| l.capacity()),
                msp.map_or(0.0, |l| l.concentration()),
                pfemp1,
                csp,
            );
        }
    }

    println!();
    println!("final repertoire:");
    for key in rep.sorted_keys() {
        if let Some(l) = rep.get(key.kind, key.variant) {
            println!(
                "  {:<13} variant {:>2}  capacity {:.3}  concentration {:.3}",
                l.kind(),
                l.variant(),
                l.capacity(),
                l.concentration()
            );
        }
    }
}
