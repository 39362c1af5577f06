//! Printing-needs and printing-price calculators.
//!
//! The needs calculator derives plates and press runs from the chosen
//! technique; the price calculator applies a machine's cost model to
//! them. Each technique used to be a strategy class in older
//! implementations of this estimator; here a single dispatch on the
//! [`Technique`] enum keeps the same extensibility without virtual
//! calls.

use crate::model::{
    EstimateError, JobDetails, Machine, Material, PrintNeeds, PrintRun, PrintingPrice,
};
use crate::types::Technique;

/// Derives plate counts and press runs for one technique.
///
/// Run shapes are fixed per technique:
/// * SIMPLEX - one run, front side only
/// * DUPLEX - two runs (front posture, back posture), each passing the
///   full sheet count through the press
/// * WORK_AND_TURN - one run printing both sides by turning the sheet
///
/// SIMPLEX charges `front_inks` passes per sheet. Two historical
/// variants of this rule exist (1 pass vs one per ink); the per-ink
/// variant is the confirmed business rule.
///
/// # Parameters
/// * `technique` - The printing technique
/// * `total_sheets` - Printing sheets incl. overage going through the press
/// * `front_inks`, `back_inks` - Ink counts per side
/// * `same_plates_for_back` - Reuse front plates for the back (duplex only)
pub fn printing_needs(
    technique: Technique,
    total_sheets: f64,
    front_inks: u32,
    back_inks: u32,
    same_plates_for_back: bool,
) -> PrintNeeds {
    match technique {
        Technique::Simplex => PrintNeeds {
            technique,
            total_plates: front_inks,
            print_runs: vec![PrintRun {
                sheets_to_print: total_sheets,
                impressions_per_sheet_front: front_inks,
                impressions_per_sheet_back: 0,
            }],
        },
        Technique::Duplex => {
            let back_plates = if same_plates_for_back { 0 } else { back_inks };
            PrintNeeds {
                technique,
                total_plates: front_inks + back_plates,
                print_runs: vec![
                    // Front posture.
                    PrintRun {
                        sheets_to_print: total_sheets,
                        impressions_per_sheet_front: front_inks,
                        impressions_per_sheet_back: 0,
                    },
                    // Back posture.
                    PrintRun {
                        sheets_to_print: total_sheets,
                        impressions_per_sheet_front: 0,
                        impressions_per_sheet_back: back_inks,
                    },
                ],
            }
        }
        Technique::WorkAndTurn => {
            let plates = front_inks.max(back_inks);
            PrintNeeds {
                technique,
                total_plates: plates,
                print_runs: vec![PrintRun {
                    sheets_to_print: total_sheets,
                    impressions_per_sheet_front: plates,
                    impressions_per_sheet_back: 0,
                }],
            }
        }
    }
}

/// Variant of [`printing_needs`] taking a catalog technique name.
///
/// # Returns
/// `Err(EstimateError::UnknownTechnique)` for names outside
/// {SIMPLEX, DUPLEX, WORK_AND_TURN}.
pub fn printing_needs_named(
    technique_name: &str,
    total_sheets: f64,
    front_inks: u32,
    back_inks: u32,
    same_plates_for_back: bool,
) -> Result<PrintNeeds, EstimateError> {
    let technique = Technique::from_name(technique_name)
        .ok_or_else(|| EstimateError::UnknownTechnique(technique_name.to_string()))?;
    Ok(printing_needs(
        technique,
        total_sheets,
        front_inks,
        back_inks,
        same_plates_for_back,
    ))
}

/// Applies a machine's cost model to derived printing needs.
///
/// Charging rules:
/// * Setup and wash are per plate when flagged `per_ink`, otherwise
///   once per physical run.
/// * DUPLEX impressions are charged per posture, each posture meeting
///   the machine's minimum impression charge on its own.
/// * SIMPLEX and WORK_AND_TURN are one posture; WORK_AND_TURN sheets
///   count twice (both sides printed in the pass).
/// * The duplex surcharge applies only to single-posture both-sides
///   techniques (WORK_AND_TURN); a true DUPLEX job already pays two
///   full setups and runs.
/// * Special materials add a flat setup charge plus a per-thousand
///   impression charge when the machine defines them.
///
/// # Parameters
/// * `machine` - Press cost model
/// * `needs` - Output of [`printing_needs`]
/// * `material` - Material, for the special-material flag
/// * `net_sheets` - Net sheets, the billing basis for impressions
/// * `job` - Ink configuration of the job
pub fn printing_price(
    machine: &Machine,
    needs: &PrintNeeds,
    material: &Material,
    net_sheets: f64,
    job: &JobDetails,
) -> PrintingPrice {
    let number_of_runs = needs.print_runs.len() as f64;

    let setup_cost = if machine.setup_cost.per_ink {
        machine.setup_cost.price * f64::from(needs.total_plates)
    } else {
        machine.setup_cost.price * number_of_runs
    };
    let wash_cost = if machine.wash_cost.per_ink {
        machine.wash_cost.price * f64::from(needs.total_plates)
    } else {
        machine.wash_cost.price * number_of_runs
    };

    let price_per_thousand = machine.impression_cost.price_per_thousand;
    let impression_cost = match needs.technique {
        Technique::Duplex => {
            // Each posture is billed independently against the minimum.
            let mut cost = 0.0;
            for side_inks in [job.front_inks, job.back_inks] {
                let sheets_to_charge = net_sheets.max(machine.min_impressions_charge);
                let passes = if machine.impression_cost.per_ink_pass {
                    f64::from(side_inks)
                } else {
                    1.0
                };
                cost += (sheets_to_charge / 1000.0) * price_per_thousand * passes;
            }
            cost
        }
        Technique::Simplex | Technique::WorkAndTurn => {
            let sides = if needs.technique == Technique::WorkAndTurn {
                2.0
            } else {
                1.0
            };
            let costable_impressions = net_sheets * sides;
            let sheets_to_charge = costable_impressions.max(machine.min_impressions_charge);
            let inks_for_pass = if needs.technique == Technique::WorkAndTurn {
                job.front_inks.max(job.back_inks)
            } else {
                job.front_inks
            };
            let passes = if machine.impression_cost.per_ink_pass {
                f64::from(inks_for_pass)
            } else {
                1.0
            };
            (sheets_to_charge / 1000.0) * price_per_thousand * passes
        }
    };

    let duplex_charge_cost = match machine.duplex_charge_price {
        Some(price) if needs.technique.is_single_posture_both_sides() => price,
        _ => 0.0,
    };

    let special_material_charge_cost = match &machine.special_material_charges {
        Some(charges) if material.is_special_material => {
            let sheets_to_charge = net_sheets.max(machine.min_impressions_charge);
            charges.setup_charge.unwrap_or(0.0)
                + (sheets_to_charge / 1000.0) * charges.impression_charge.unwrap_or(0.0)
        }
        _ => 0.0,
    };

    let total_printing_cost = setup_cost
        + wash_cost
        + impression_cost
        + duplex_charge_cost
        + special_material_charge_cost;

    PrintingPrice {
        setup_cost,
        wash_cost,
        impression_cost,
        duplex_charge_cost,
        special_material_charge_cost,
        total_printing_cost,
    }
}
