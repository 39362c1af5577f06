//! Data models for the print production estimator.
//!
//! This module defines the catalog records the core consumes
//! (`Material`, `Machine`, `CutGroup`, `JobItem`), the request shapes
//! of the two entry points, and the value records produced during one
//! estimation. All of them are per-request values; nothing here
//! persists or is shared between requests.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::types::{Rectangular, Size, Technique};

/// Validation error for catalog and job data.
#[derive(Debug, Clone)]
pub enum ValidationError {
    InvalidDimension(String),
    InvalidQuantity(String),
    InvalidConfiguration(String),
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationError::InvalidDimension(msg) => write!(f, "Invalid dimension: {}", msg),
            ValidationError::InvalidQuantity(msg) => write!(f, "Invalid quantity: {}", msg),
            ValidationError::InvalidConfiguration(msg) => {
                write!(f, "Invalid configuration: {}", msg)
            }
        }
    }
}

impl std::error::Error for ValidationError {}

/// Helper function to validate a single dimension (DRY principle).
fn validate_dimension(value: f64, name: &str) -> Result<(), ValidationError> {
    if value <= 0.0 || value.is_nan() || value.is_infinite() {
        return Err(ValidationError::InvalidDimension(format!(
            "{} must be positive, got: {}",
            name, value
        )));
    }
    Ok(())
}

/// Errors produced by the estimation core.
///
/// All of them are fatal for the request that triggered them; the
/// computation is deterministic, so a failure is an input-data
/// problem, never a transient one. The core itself does not log or
/// retry; the HTTP boundary turns these into responses.
#[derive(Debug, Clone)]
pub enum EstimateError {
    /// The request lacks a machine or a material.
    MissingInput(String),
    /// No factory size of the material yields any valid guillotine cut
    /// for the requested printing-sheet size.
    NoFeasibleCut(String),
    /// A technique name outside {SIMPLEX, DUPLEX, WORK_AND_TURN}.
    UnknownTechnique(String),
    /// Gang validation failed (differing material, inks or duplex flag).
    IncompatibleJobs(String),
    /// The technique candidate list was empty. Defensive: the candidate
    /// branching should make this unreachable.
    NoEstimateProduced,
}

impl EstimateError {
    /// Stable machine-readable code for API clients.
    pub fn code(&self) -> &'static str {
        match self {
            EstimateError::MissingInput(_) => "missing_input",
            EstimateError::NoFeasibleCut(_) => "no_feasible_cut",
            EstimateError::UnknownTechnique(_) => "unknown_technique",
            EstimateError::IncompatibleJobs(_) => "incompatible_jobs",
            EstimateError::NoEstimateProduced => "no_estimate_produced",
        }
    }
}

impl std::fmt::Display for EstimateError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EstimateError::MissingInput(msg) => write!(f, "Missing input: {}", msg),
            EstimateError::NoFeasibleCut(msg) => write!(f, "No feasible cut: {}", msg),
            EstimateError::UnknownTechnique(name) => write!(f, "Unknown technique: {}", name),
            EstimateError::IncompatibleJobs(msg) => write!(f, "Incompatible jobs: {}", msg),
            EstimateError::NoEstimateProduced => {
                write!(f, "No estimate could be produced for the request")
            }
        }
    }
}

impl std::error::Error for EstimateError {}

/// One factory sheet size a material can be purchased in.
///
/// # Fields
/// * `width`, `length` - Sheet dimensions in mm
/// * `usd_per_ton` - Purchase price; `None` means the catalog has no
///   price data for this size and the cost contribution is zero
#[derive(Clone, Copy, Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FactorySize {
    pub width: f64,
    pub length: f64,
    #[serde(default)]
    #[schema(nullable = true)]
    pub usd_per_ton: Option<f64>,
}

impl FactorySize {
    /// Returns the sheet dimensions as a `Size`.
    #[inline]
    pub fn size(&self) -> Size {
        Size::new(self.width, self.length)
    }

    /// Price per ton, treating missing catalog data as zero.
    #[inline]
    pub fn usd_per_ton_or_zero(&self) -> f64 {
        self.usd_per_ton.unwrap_or(0.0)
    }
}

impl Rectangular for FactorySize {
    fn footprint(&self) -> Size {
        self.size()
    }
}

/// A printable material (paper, board, ...) from the catalog.
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Material {
    pub id: u64,
    pub name: String,
    /// Weight in g/m².
    pub grammage: f64,
    pub is_special_material: bool,
    /// Factory sheet sizes this material can be bought in, each with
    /// its own price.
    pub factory_sizes: Vec<FactorySize>,
}

impl Material {
    /// Validates the catalog record.
    ///
    /// # Returns
    /// `Ok(())` for a usable material, otherwise `Err(ValidationError)`
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_dimension(self.grammage, "Grammage")?;
        if self.factory_sizes.is_empty() {
            return Err(ValidationError::InvalidConfiguration(format!(
                "Material '{}' has no factory sizes",
                self.name
            )));
        }
        for fs in &self.factory_sizes {
            validate_dimension(fs.width, "Factory sheet width")?;
            validate_dimension(fs.length, "Factory sheet length")?;
        }
        Ok(())
    }
}

/// How sheets are fed into the press.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum SheetFeedOrientation {
    LongEdge,
    ShortEdge,
}

/// Non-printable margins of a machine, in mm.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Margins {
    pub clamp: f64,
    pub tail: f64,
    pub sides: f64,
}

/// Sheet overage (spoilage allowance) rule of a machine.
///
/// `per_ink` multiplies the allowance by the total ink count of the
/// job instead of charging it once per run.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OverageRule {
    pub amount: f64,
    pub per_ink: bool,
}

/// A flat-or-per-plate cost entry (setup, wash).
#[derive(Clone, Copy, Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RunCost {
    pub price: f64,
    pub per_ink: bool,
}

/// Impression pricing of a machine.
///
/// `per_ink_pass` charges every ink pass over the sheet instead of one
/// pass per posture.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ImpressionCost {
    pub price_per_thousand: f64,
    pub per_ink_pass: bool,
}

/// Surcharges a machine applies when running a special material.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SpecialMaterialCharges {
    #[serde(default)]
    #[schema(nullable = true)]
    pub setup_charge: Option<f64>,
    #[serde(default)]
    #[schema(nullable = true)]
    pub impression_charge: Option<f64>,
}

/// A printing press from the catalog with its full cost model.
///
/// Every cost entry is either flat per run or multiplied by the ink /
/// plate count: the `per_ink` flags are the recurring invariant of
/// this cost model.
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Machine {
    pub id: u64,
    pub name: String,
    pub printing_bodies: u32,
    pub sheet_feed_orientation: SheetFeedOrientation,
    pub margins: Margins,
    pub min_sheet_size: Size,
    pub max_sheet_size: Size,
    pub overage: OverageRule,
    /// Impressions are billed on at least this many sheets.
    pub min_impressions_charge: f64,
    pub setup_cost: RunCost,
    pub wash_cost: RunCost,
    pub impression_cost: ImpressionCost,
    #[serde(default)]
    #[schema(nullable = true)]
    pub duplex_charge_price: Option<f64>,
    #[serde(default)]
    #[schema(nullable = true)]
    pub special_material_charges: Option<SpecialMaterialCharges>,
}

/// A named group of candidate printing-sheet (cut) sizes.
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CutGroup {
    pub id: u64,
    pub name: String,
    pub sheet_sizes: Vec<Size>,
}

/// One job in a ganged run: geometry and copy count.
///
/// Material, inks and duplex mode are shared across the whole gang and
/// live in [`CommonJobDetails`], not per job.
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct JobItem {
    pub id: u64,
    pub width: f64,
    pub length: f64,
    pub quantity: u32,
}

impl JobItem {
    /// Creates a new job item with validation.
    ///
    /// # Returns
    /// `Ok(JobItem)` for valid values, otherwise `Err(ValidationError)`
    pub fn new(id: u64, width: f64, length: f64, quantity: u32) -> Result<Self, ValidationError> {
        validate_dimension(width, "Job width")?;
        validate_dimension(length, "Job length")?;
        if quantity == 0 {
            return Err(ValidationError::InvalidQuantity(format!(
                "Job {} has quantity 0",
                id
            )));
        }
        Ok(Self {
            id,
            width,
            length,
            quantity,
        })
    }

    /// Returns the piece dimensions as a `Size`.
    #[inline]
    pub fn size(&self) -> Size {
        Size::new(self.width, self.length)
    }
}

impl Rectangular for JobItem {
    fn footprint(&self) -> Size {
        self.size()
    }
}

/// One job as submitted to the imposition planner.
///
/// Geometry and copy count are per job; the shared attributes
/// (material, inks, duplex mode) live in [`CommonJobDetails`] but may
/// be restated per job, in which case gang validation checks they
/// match.
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GangJob {
    pub id: u64,
    pub width: f64,
    pub length: f64,
    pub quantity: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(nullable = true)]
    pub material_id: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(nullable = true)]
    pub front_inks: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(nullable = true)]
    pub back_inks: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(nullable = true)]
    pub is_duplex: Option<bool>,
}

impl GangJob {
    /// Returns the piece dimensions as a `Size`.
    #[inline]
    pub fn size(&self) -> Size {
        Size::new(self.width, self.length)
    }
}

impl Rectangular for GangJob {
    fn footprint(&self) -> Size {
        self.size()
    }
}

// --- Request shapes of the two entry points ---

/// Job attributes shared by every technique candidate of one estimate.
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct JobDetails {
    pub material: Material,
    /// Exchange rate from USD to the quoting currency.
    pub dollar_rate: f64,
    pub front_inks: u32,
    pub back_inks: u32,
    /// Reuse the front plates for the back (turning the set), saving
    /// `back_inks` plates on a duplex job.
    pub same_plates_for_back: bool,
}

/// The production plan a single estimate is evaluated against.
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductionPlanRequest {
    pub machine: Machine,
    pub sheet_size: Size,
    pub net_sheets_to_print: f64,
    pub is_symmetrical_turn: bool,
    pub is_symmetrical_tumble: bool,
}

/// Request for a single-job estimate against one machine/sheet pair.
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EstimateRequest {
    pub job_details: JobDetails,
    pub production_plan: ProductionPlanRequest,
}

/// Job attributes shared by all jobs of a gang.
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CommonJobDetails {
    pub material: Material,
    pub front_inks: u32,
    pub back_inks: u32,
    pub is_duplex: bool,
    pub same_plates_for_back: bool,
    pub dollar_rate: f64,
}

/// Cost penalties the caller may configure for plan ranking.
///
/// Accepted for request compatibility; the current planner ranks by
/// raw production cost and applies none of them.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PenaltyOptions {
    #[serde(default)]
    pub different_press_sheet_penalty: f64,
    #[serde(default)]
    pub different_machine_penalty: f64,
}

/// Planner options of an imposition request.
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PlannerOptions {
    pub number_of_results: usize,
    #[serde(default)]
    pub penalties: PenaltyOptions,
}

/// Request for a multi-job ganged imposition plan.
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ImpositionRequest {
    pub jobs: Vec<GangJob>,
    pub common_details: CommonJobDetails,
    pub available_machines: Vec<Machine>,
    pub available_cuts: Vec<CutGroup>,
    pub options: PlannerOptions,
}

// --- Value records produced during one estimation ---

/// Position of one cut piece on a factory sheet, in mm.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CutPosition {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub length: f64,
}

impl Rectangular for CutPosition {
    fn footprint(&self) -> Size {
        Size::new(self.width, self.length)
    }
}

/// How one factory sheet is subdivided into printing sheets.
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CuttingPlan {
    pub cuts_per_sheet: u32,
    pub positions: Vec<CutPosition>,
    pub waste_percentage: f64,
}

/// Factory sheet purchase derived for one estimate.
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FactorySheets {
    pub size: Size,
    pub quantity_needed: f64,
    pub cutting_plan: CuttingPlan,
}

/// Printing-sheet counts for one estimate.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PrintingSheets {
    pub net_sheets: f64,
    pub overage_sheets: f64,
    pub total_sheets: f64,
}

/// Material consumption and cost for one estimate.
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MaterialNeeds {
    pub factory_sheets: FactorySheets,
    pub printing_sheets: PrintingSheets,
    pub total_material_cost: f64,
}

/// One pass of the sheets through the press.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PrintRun {
    pub sheets_to_print: f64,
    pub impressions_per_sheet_front: u32,
    pub impressions_per_sheet_back: u32,
}

/// Plates and press runs a technique requires.
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PrintNeeds {
    pub technique: Technique,
    pub total_plates: u32,
    pub print_runs: Vec<PrintRun>,
}

/// Printing cost breakdown for one technique on one machine.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PrintingPrice {
    pub setup_cost: f64,
    pub wash_cost: f64,
    pub impression_cost: f64,
    pub duplex_charge_cost: f64,
    pub special_material_charge_cost: f64,
    pub total_printing_cost: f64,
}

/// Material and printing cost components of an estimate.
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CostBreakdown {
    pub material_cost: f64,
    pub printing_cost: PrintingPrice,
}

/// Physical consumption behind an estimate.
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PhysicalNeeds {
    pub material: MaterialNeeds,
    pub printing: PrintNeeds,
}

/// Human-readable summary of the production plan behind an estimate.
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductionPlanSummary {
    pub machine_name: String,
    pub paper_name: String,
    pub sheet_size: Size,
    pub printing_technique: Technique,
}

/// A fully priced production option.
///
/// Invariant: `total_cost == cost_breakdown.material_cost +
/// cost_breakdown.printing_cost.total_printing_cost`.
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Estimate {
    pub total_cost: f64,
    pub cost_breakdown: CostBreakdown,
    pub physical_needs: PhysicalNeeds,
    pub production_plan: ProductionPlanSummary,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_job_item_validation() {
        assert!(JobItem::new(1, 100.0, 150.0, 500).is_ok());
        assert!(JobItem::new(1, 0.0, 150.0, 500).is_err());
        assert!(JobItem::new(1, 100.0, -1.0, 500).is_err());
        assert!(JobItem::new(1, 100.0, 150.0, 0).is_err());
    }

    #[test]
    fn test_material_validation() {
        let mut material = Material {
            id: 1,
            name: "Couche 150".to_string(),
            grammage: 150.0,
            is_special_material: false,
            factory_sizes: vec![FactorySize {
                width: 720.0,
                length: 1020.0,
                usd_per_ton: Some(1200.0),
            }],
        };
        assert!(material.validate().is_ok());

        material.factory_sizes.clear();
        assert!(material.validate().is_err());

        material.factory_sizes.push(FactorySize {
            width: -720.0,
            length: 1020.0,
            usd_per_ton: None,
        });
        assert!(material.validate().is_err());
    }

    #[test]
    fn test_factory_size_missing_price_is_zero() {
        let fs = FactorySize {
            width: 720.0,
            length: 1020.0,
            usd_per_ton: None,
        };
        assert_eq!(fs.usd_per_ton_or_zero(), 0.0);
    }

    #[test]
    fn test_estimate_error_codes_are_stable() {
        assert_eq!(
            EstimateError::MissingInput("machine".into()).code(),
            "missing_input"
        );
        assert_eq!(
            EstimateError::NoFeasibleCut("x".into()).code(),
            "no_feasible_cut"
        );
        assert_eq!(
            EstimateError::UnknownTechnique("FOO".into()).code(),
            "unknown_technique"
        );
        assert_eq!(
            EstimateError::IncompatibleJobs("x".into()).code(),
            "incompatible_jobs"
        );
        assert_eq!(EstimateError::NoEstimateProduced.code(), "no_estimate_produced");
    }

    #[test]
    fn test_machine_wire_field_names() {
        let json = r#"{
            "id": 7,
            "name": "GTO 52",
            "printingBodies": 2,
            "sheetFeedOrientation": "long_edge",
            "margins": { "clamp": 10.0, "tail": 5.0, "sides": 4.0 },
            "minSheetSize": { "width": 210.0, "length": 280.0 },
            "maxSheetSize": { "width": 360.0, "length": 520.0 },
            "overage": { "amount": 100.0, "perInk": true },
            "minImpressionsCharge": 1000.0,
            "setupCost": { "price": 500.0, "perInk": true },
            "washCost": { "price": 200.0, "perInk": false },
            "impressionCost": { "pricePerThousand": 80.0, "perInkPass": true },
            "duplexChargePrice": 350.0
        }"#;
        let machine: Machine = serde_json::from_str(json).expect("machine should deserialize");
        assert_eq!(machine.name, "GTO 52");
        assert!(machine.overage.per_ink);
        assert_eq!(machine.duplex_charge_price, Some(350.0));
        assert!(machine.special_material_charges.is_none());

        let round = serde_json::to_value(&machine).unwrap();
        assert!(round.get("minImpressionsCharge").is_some());
        assert!(round.get("sheetFeedOrientation").is_some());
    }

    #[test]
    fn test_imposition_request_defaults() {
        let json = r#"{
            "jobs": [{ "id": 1, "width": 100.0, "length": 150.0, "quantity": 1000 }],
            "commonDetails": {
                "material": {
                    "id": 1, "name": "Obra 80", "grammage": 80.0,
                    "isSpecialMaterial": false,
                    "factorySizes": [{ "width": 760.0, "length": 1120.0, "usdPerTon": 1100.0 }]
                },
                "frontInks": 4, "backInks": 0, "isDuplex": false,
                "samePlatesForBack": false, "dollarRate": 40.5
            },
            "availableMachines": [],
            "availableCuts": [],
            "options": { "numberOfResults": 3 }
        }"#;
        let request: ImpositionRequest =
            serde_json::from_str(json).expect("request should deserialize");
        assert_eq!(request.options.number_of_results, 3);
        assert_eq!(request.options.penalties.different_machine_penalty, 0.0);
    }
}
