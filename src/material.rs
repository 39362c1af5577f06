//! Material consumption calculator.
//!
//! Determines how many factory sheets must be purchased to print a
//! job on a chosen printing-sheet size, and what they cost. Every
//! factory size the material is available in is evaluated with the
//! cutting optimizer; the size needing the fewest factory sheets wins.

use crate::cutting::find_best_cut;
use crate::model::{
    EstimateError, FactorySheets, Machine, Material, MaterialNeeds, PrintingSheets,
};
use crate::types::Size;

/// Calculates material consumption and cost for one production plan.
///
/// # Parameters
/// * `material` - Catalog material with its factory sizes
/// * `printing_sheet_size` - The sheet size the job will be printed on
/// * `net_sheets` - Sheets that must come out good
/// * `machine` - Press whose overage rule applies
/// * `front_inks`, `back_inks` - Ink counts, drive per-ink overage
/// * `dollar_rate` - USD → quoting-currency exchange rate
///
/// # Returns
/// `Ok(MaterialNeeds)`, or `Err(EstimateError::NoFeasibleCut)` when no
/// factory size of the material yields a single valid cut.
pub fn calculate_material_needs(
    material: &Material,
    printing_sheet_size: Size,
    net_sheets: f64,
    machine: &Machine,
    front_inks: u32,
    back_inks: u32,
    dollar_rate: f64,
) -> Result<MaterialNeeds, EstimateError> {
    // 1. Overage: spoilage allowance, optionally per ink.
    let ink_count_for_overage = if machine.overage.per_ink {
        f64::from(front_inks + back_inks)
    } else {
        1.0
    };
    let overage_sheets = machine.overage.amount * ink_count_for_overage;
    let total_printing_sheets = net_sheets + overage_sheets;

    // 2. Evaluate every factory size with the cutting optimizer and
    //    keep the one that needs the fewest factory sheets.
    let mut best: Option<(FactorySheets, f64)> = None;
    for factory_size in &material.factory_sizes {
        let plan = find_best_cut(factory_size.size(), printing_sheet_size);
        if plan.cuts_per_sheet == 0 {
            continue;
        }
        let quantity_needed = (total_printing_sheets / f64::from(plan.cuts_per_sheet)).ceil();

        let is_better = match &best {
            Some((current, _)) => quantity_needed < current.quantity_needed,
            None => true,
        };
        if is_better {
            // Cost per factory sheet: area → weight → price per ton.
            let sheet_weight_kg = factory_size.size().area_m2() * material.grammage / 1000.0;
            let cost_per_sheet_usd = (sheet_weight_kg / 1000.0) * factory_size.usd_per_ton_or_zero();
            best = Some((
                FactorySheets {
                    size: factory_size.size(),
                    quantity_needed,
                    cutting_plan: plan,
                },
                cost_per_sheet_usd,
            ));
        }
    }

    let (factory_sheets, cost_per_sheet_usd) = best.ok_or_else(|| {
        EstimateError::NoFeasibleCut(format!(
            "no factory size of material '{}' can be cut to {:.0}x{:.0} mm",
            material.name, printing_sheet_size.width, printing_sheet_size.length
        ))
    })?;

    let total_material_cost = factory_sheets.quantity_needed * cost_per_sheet_usd * dollar_rate;

    Ok(MaterialNeeds {
        factory_sheets,
        printing_sheets: PrintingSheets {
            net_sheets,
            overage_sheets,
            total_sheets: total_printing_sheets,
        },
        total_material_cost,
    })
}
