//! Estimate service: evaluates every feasible technique for one job
//! on one machine/sheet-size pair and returns the cheapest option.

use std::cmp::Ordering;

use crate::material::calculate_material_needs;
use crate::model::{
    CostBreakdown, Estimate, EstimateError, EstimateRequest, PhysicalNeeds, ProductionPlanSummary,
};
use crate::printing::{printing_needs, printing_price};
use crate::types::Technique;

/// Determines which techniques can produce the job at all.
///
/// A job without back inks is plain SIMPLEX. Jobs with back inks run
/// DUPLEX, plus WORK_AND_TURN when the layout is symmetrical under
/// turning.
pub fn technique_candidates(back_inks: u32, is_symmetrical_turn: bool) -> Vec<Technique> {
    if back_inks == 0 {
        vec![Technique::Simplex]
    } else if is_symmetrical_turn {
        vec![Technique::Duplex, Technique::WorkAndTurn]
    } else {
        vec![Technique::Duplex]
    }
}

/// Calculates the cheapest estimate for a single job.
///
/// Every feasible technique is priced independently (material
/// consumption, plates, runs, machine cost model); the candidates are
/// then sorted by total cost and the cheapest wins.
///
/// # Returns
/// The cheapest `Estimate`, or an error when material consumption is
/// infeasible. `NoEstimateProduced` is a defensive check; the
/// candidate branching above always yields at least one technique.
pub fn calculate_estimate(request: &EstimateRequest) -> Result<Estimate, EstimateError> {
    let job = &request.job_details;
    let plan = &request.production_plan;

    let candidates = technique_candidates(job.back_inks, plan.is_symmetrical_turn);

    let mut estimates = Vec::with_capacity(candidates.len());
    for technique in candidates {
        let material_needs = calculate_material_needs(
            &job.material,
            plan.sheet_size,
            plan.net_sheets_to_print,
            &plan.machine,
            job.front_inks,
            job.back_inks,
            job.dollar_rate,
        )?;

        let print_needs = printing_needs(
            technique,
            material_needs.printing_sheets.total_sheets,
            job.front_inks,
            job.back_inks,
            job.same_plates_for_back,
        );

        let price = printing_price(
            &plan.machine,
            &print_needs,
            &job.material,
            plan.net_sheets_to_print,
            job,
        );

        let total_cost = material_needs.total_material_cost + price.total_printing_cost;

        estimates.push(Estimate {
            total_cost,
            cost_breakdown: CostBreakdown {
                material_cost: material_needs.total_material_cost,
                printing_cost: price,
            },
            physical_needs: PhysicalNeeds {
                material: material_needs,
                printing: print_needs,
            },
            production_plan: ProductionPlanSummary {
                machine_name: plan.machine.name.clone(),
                paper_name: job.material.name.clone(),
                sheet_size: plan.sheet_size,
                printing_technique: technique,
            },
        });
    }

    estimates.sort_by(|a, b| {
        a.total_cost
            .partial_cmp(&b.total_cost)
            .unwrap_or(Ordering::Equal)
    });

    estimates
        .into_iter()
        .next()
        .ok_or(EstimateError::NoEstimateProduced)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{
        FactorySize, ImpressionCost, JobDetails, Machine, Margins, Material, OverageRule,
        ProductionPlanRequest, RunCost, SheetFeedOrientation,
    };
    use crate::types::{EPSILON_COST, Size};

    fn test_machine() -> Machine {
        Machine {
            id: 1,
            name: "Speedmaster 72".to_string(),
            printing_bodies: 4,
            sheet_feed_orientation: SheetFeedOrientation::LongEdge,
            margins: Margins {
                clamp: 10.0,
                tail: 5.0,
                sides: 4.0,
            },
            min_sheet_size: Size::new(210.0, 280.0),
            max_sheet_size: Size::new(720.0, 1020.0),
            overage: OverageRule {
                amount: 100.0,
                per_ink: true,
            },
            min_impressions_charge: 1000.0,
            setup_cost: RunCost {
                price: 500.0,
                per_ink: true,
            },
            wash_cost: RunCost {
                price: 200.0,
                per_ink: false,
            },
            impression_cost: ImpressionCost {
                price_per_thousand: 80.0,
                per_ink_pass: true,
            },
            duplex_charge_price: Some(350.0),
            special_material_charges: None,
        }
    }

    fn test_material() -> Material {
        Material {
            id: 1,
            name: "Couche 150".to_string(),
            grammage: 150.0,
            is_special_material: false,
            factory_sizes: vec![FactorySize {
                width: 720.0,
                length: 1020.0,
                usd_per_ton: Some(1200.0),
            }],
        }
    }

    fn request(front_inks: u32, back_inks: u32, symmetrical_turn: bool) -> EstimateRequest {
        EstimateRequest {
            job_details: JobDetails {
                material: test_material(),
                dollar_rate: 40.5,
                front_inks,
                back_inks,
                same_plates_for_back: false,
            },
            production_plan: ProductionPlanRequest {
                machine: test_machine(),
                sheet_size: Size::new(360.0, 510.0),
                net_sheets_to_print: 5000.0,
                is_symmetrical_turn: symmetrical_turn,
                is_symmetrical_tumble: false,
            },
        }
    }

    #[test]
    fn test_single_sided_job_is_always_simplex() {
        let estimate = calculate_estimate(&request(4, 0, true)).unwrap();
        assert_eq!(
            estimate.production_plan.printing_technique,
            Technique::Simplex
        );
    }

    #[test]
    fn test_candidates_for_two_sided_jobs() {
        assert_eq!(technique_candidates(0, false), vec![Technique::Simplex]);
        assert_eq!(technique_candidates(4, false), vec![Technique::Duplex]);
        assert_eq!(
            technique_candidates(4, true),
            vec![Technique::Duplex, Technique::WorkAndTurn]
        );
    }

    #[test]
    fn test_cost_additivity() {
        let estimate = calculate_estimate(&request(4, 4, true)).unwrap();
        let expected = estimate.cost_breakdown.material_cost
            + estimate.cost_breakdown.printing_cost.total_printing_cost;
        assert!(
            (estimate.total_cost - expected).abs() < EPSILON_COST,
            "total {} != material + printing {}",
            estimate.total_cost,
            expected
        );
    }

    #[test]
    fn test_symmetrical_job_picks_cheaper_technique() {
        // WORK_AND_TURN halves the plates and runs once; with this
        // cost model it must undercut true DUPLEX.
        let estimate = calculate_estimate(&request(4, 4, true)).unwrap();
        assert_eq!(
            estimate.production_plan.printing_technique,
            Technique::WorkAndTurn
        );

        let duplex_only = calculate_estimate(&request(4, 4, false)).unwrap();
        assert_eq!(
            duplex_only.production_plan.printing_technique,
            Technique::Duplex
        );
        assert!(estimate.total_cost <= duplex_only.total_cost);
    }

    #[test]
    fn test_duplex_estimate_has_two_runs() {
        let estimate = calculate_estimate(&request(4, 4, false)).unwrap();
        assert_eq!(estimate.physical_needs.printing.print_runs.len(), 2);
    }

    #[test]
    fn test_infeasible_cut_propagates() {
        let mut request = request(4, 0, false);
        request.production_plan.sheet_size = Size::new(800.0, 1100.0);
        let result = calculate_estimate(&request);
        assert!(matches!(result, Err(EstimateError::NoFeasibleCut(_))));
    }

    #[test]
    fn test_plan_summary_reflects_inputs() {
        let estimate = calculate_estimate(&request(4, 0, false)).unwrap();
        assert_eq!(estimate.production_plan.machine_name, "Speedmaster 72");
        assert_eq!(estimate.production_plan.paper_name, "Couche 150");
        assert_eq!(estimate.production_plan.sheet_size, Size::new(360.0, 510.0));
    }
}
