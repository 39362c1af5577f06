//! Imposition planner for ganged runs.
//!
//! Validates that a set of jobs can share production, estimates how
//! many sheets a gang occupies, and searches every machine × cut-size
//! combination for the globally cheapest production plans.

use serde::Serialize;
use utoipa::ToSchema;

use crate::estimate::calculate_estimate;
use crate::model::{
    Estimate, EstimateError, EstimateRequest, GangJob, ImpositionRequest, JobDetails,
    ProductionPlanRequest,
};
use crate::types::{Rectangular, Size, Technique};

/// Result of the packing estimate for one candidate sheet size.
///
/// `total_sheets_needed` is `f64::INFINITY` for an unusable sheet.
#[derive(Clone, Copy, Debug)]
pub struct PackingEstimate {
    pub total_sheets_needed: f64,
    pub is_symmetrical_turn: bool,
    pub is_symmetrical_tumble: bool,
}

/// Estimates how many shared sheets a gang of jobs occupies.
///
/// Explodes every job into its individual pieces, sorts them largest
/// first (the placement order a future rectangle packer would use),
/// and derives the sheet count as an area-based lower bound:
/// `ceil(total piece area / sheet area)`, at least one sheet.
///
/// This is a known, deliberately optimistic approximation: it is not
/// a verified feasible layout, and the symmetry flags are constant
/// placeholders until a real packer determines them. Downstream cost
/// ranking assumes exactly this estimate; do not tighten it quietly.
pub fn pack_jobs_on_sheets(jobs: &[GangJob], sheet_size: Size) -> PackingEstimate {
    let mut piece_areas: Vec<f64> = jobs
        .iter()
        .flat_map(|job| std::iter::repeat_n(job.area_mm2(), job.quantity as usize))
        .collect();
    piece_areas.sort_by(|a, b| b.partial_cmp(a).unwrap_or(std::cmp::Ordering::Equal));

    let sheet_area = sheet_size.area_mm2();
    if sheet_area <= 0.0 {
        return PackingEstimate {
            total_sheets_needed: f64::INFINITY,
            is_symmetrical_turn: false,
            is_symmetrical_tumble: false,
        };
    }

    let total_piece_area: f64 = piece_areas.iter().sum();
    let total_sheets_needed = (total_piece_area / sheet_area).ceil().max(1.0);

    PackingEstimate {
        total_sheets_needed,
        // Placeholders; a real packer would derive these from the layout.
        is_symmetrical_turn: true,
        is_symmetrical_tumble: false,
    }
}

/// Validates that all jobs of a gang can be produced together.
///
/// Jobs may restate the shared attributes (material, inks, duplex
/// mode); any restated value must match the gang's common details.
///
/// # Returns
/// `Err(MissingInput)` for an empty job list,
/// `Err(IncompatibleJobs)` when a job deviates from the gang.
pub fn validate_gangeable_jobs(request: &ImpositionRequest) -> Result<(), EstimateError> {
    if request.jobs.is_empty() {
        return Err(EstimateError::MissingInput("the job list is empty".into()));
    }

    let common = &request.common_details;
    for job in &request.jobs {
        let material_ok = job
            .material_id
            .is_none_or(|id| id == common.material.id);
        let front_ok = job.front_inks.is_none_or(|inks| inks == common.front_inks);
        let back_ok = job.back_inks.is_none_or(|inks| inks == common.back_inks);
        let duplex_ok = job.is_duplex.is_none_or(|duplex| duplex == common.is_duplex);

        if !(material_ok && front_ok && back_ok && duplex_ok) {
            return Err(EstimateError::IncompatibleJobs(format!(
                "job {} differs from the gang in material, inks or duplex mode",
                job.id
            )));
        }
    }
    Ok(())
}

/// Events emitted while the planner walks the combination space,
/// suitable for live streaming to a client.
#[derive(Clone, Debug, Serialize, ToSchema)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum PlanEvent {
    /// One machine × sheet-size combination was priced.
    #[serde(rename_all = "camelCase")]
    CombinationEvaluated {
        machine_name: String,
        sheet_size: Size,
        sheets_needed: f64,
        technique: Technique,
        total_cost: f64,
    },
    /// A combination was skipped because the gang cannot be packed on
    /// that sheet.
    #[serde(rename_all = "camelCase")]
    CombinationSkipped {
        machine_name: String,
        sheet_size: Size,
        reason: String,
    },
    /// Planning finished.
    #[serde(rename_all = "camelCase")]
    Finished { evaluated: usize, returned: usize },
}

/// Finds the cheapest production plans for a gang of jobs.
///
/// Enumerates every machine × cut-size combination, prices each via
/// the estimate service, and returns the `number_of_results` cheapest
/// plans in ascending cost order.
pub fn find_best_imposition_plan(
    request: &ImpositionRequest,
) -> Result<Vec<Estimate>, EstimateError> {
    find_best_imposition_plan_with_progress(request, |_| {})
}

/// Variant of [`find_best_imposition_plan`] with a progress callback.
///
/// Calls `on_event` once per combination and once on completion
/// (suitable for SSE streaming). Each iteration only reads the shared
/// catalogs and produces an independent estimate.
pub fn find_best_imposition_plan_with_progress(
    request: &ImpositionRequest,
    mut on_event: impl FnMut(&PlanEvent),
) -> Result<Vec<Estimate>, EstimateError> {
    validate_gangeable_jobs(request)?;

    let common = &request.common_details;
    let job_details = JobDetails {
        material: common.material.clone(),
        dollar_rate: common.dollar_rate,
        front_inks: common.front_inks,
        back_inks: common.back_inks,
        same_plates_for_back: common.same_plates_for_back,
    };

    let mut all_estimates: Vec<Estimate> = Vec::new();
    let mut evaluated = 0usize;

    for machine in &request.available_machines {
        for cut_group in &request.available_cuts {
            for &sheet_size in &cut_group.sheet_sizes {
                let packing = pack_jobs_on_sheets(&request.jobs, sheet_size);
                if packing.total_sheets_needed.is_infinite() {
                    on_event(&PlanEvent::CombinationSkipped {
                        machine_name: machine.name.clone(),
                        sheet_size,
                        reason: "gang cannot be packed on this sheet".to_string(),
                    });
                    continue;
                }

                let estimate_request = EstimateRequest {
                    job_details: job_details.clone(),
                    production_plan: ProductionPlanRequest {
                        machine: machine.clone(),
                        sheet_size,
                        net_sheets_to_print: packing.total_sheets_needed,
                        is_symmetrical_turn: packing.is_symmetrical_turn,
                        is_symmetrical_tumble: packing.is_symmetrical_tumble,
                    },
                };

                let estimate = calculate_estimate(&estimate_request)?;
                evaluated += 1;
                on_event(&PlanEvent::CombinationEvaluated {
                    machine_name: machine.name.clone(),
                    sheet_size,
                    sheets_needed: packing.total_sheets_needed,
                    technique: estimate.production_plan.printing_technique,
                    total_cost: estimate.total_cost,
                });
                all_estimates.push(estimate);
            }
        }
    }

    all_estimates.sort_by(|a, b| {
        a.total_cost
            .partial_cmp(&b.total_cost)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    all_estimates.truncate(request.options.number_of_results);

    on_event(&PlanEvent::Finished {
        evaluated,
        returned: all_estimates.len(),
    });

    Ok(all_estimates)
}
