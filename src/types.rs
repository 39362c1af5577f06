//! Common types and traits for 2D sheet geometry.
//!
//! This module defines reusable primitives shared by the cutting
//! optimizer, the consumption calculators and the imposition planner.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Global numerical tolerance for floating-point comparisons.
///
/// Used for dimension and area comparisons throughout the estimator.
pub const EPSILON_GENERAL: f64 = 1e-6;

/// Tolerance for cost comparisons.
///
/// Costs are sums of several multiplied terms; a slightly larger
/// tolerance keeps equality checks stable in tests.
pub const EPSILON_COST: f64 = 1e-4;

/// A rectangular dimension in millimeters.
///
/// `Size` carries no inherent orientation; callers that need a
/// canonical orientation normalize via [`Size::normalized`].
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Size {
    pub width: f64,
    pub length: f64,
}

impl Size {
    /// Creates a new size.
    ///
    /// # Parameters
    /// * `width` - Width in mm
    /// * `length` - Length in mm
    #[inline]
    pub const fn new(width: f64, length: f64) -> Self {
        Self { width, length }
    }

    /// Returns the longer of the two edges.
    #[inline]
    pub fn long_edge(&self) -> f64 {
        self.width.max(self.length)
    }

    /// Returns the shorter of the two edges.
    #[inline]
    pub fn short_edge(&self) -> f64 {
        self.width.min(self.length)
    }

    /// Returns the size normalized to (long edge, short edge).
    ///
    /// The cutting optimizer works on orientation-free rectangles and
    /// handles rotation itself, so both inputs are normalized first.
    #[inline]
    pub fn normalized(&self) -> Self {
        Self::new(self.long_edge(), self.short_edge())
    }

    /// Calculates the area in square millimeters.
    #[inline]
    pub fn area_mm2(&self) -> f64 {
        self.width * self.length
    }

    /// Calculates the area in square meters.
    ///
    /// Material weight is priced per ton via g/m², so the material
    /// calculator needs metric area.
    #[inline]
    pub fn area_m2(&self) -> f64 {
        (self.width / 1000.0) * (self.length / 1000.0)
    }

    /// Checks if both edges are positive and finite.
    #[inline]
    pub fn is_valid_dimension(&self) -> bool {
        self.width > 0.0 && self.length > 0.0 && self.width.is_finite() && self.length.is_finite()
    }

    /// Checks if this rectangle fits within another, allowing rotation.
    ///
    /// Compares normalized edges with tolerance.
    #[inline]
    pub fn fits_within(&self, container: &Self, tolerance: f64) -> bool {
        self.long_edge() <= container.long_edge() + tolerance
            && self.short_edge() <= container.short_edge() + tolerance
    }
}

/// Trait for objects with a rectangular footprint.
///
/// Provides a common interface for everything the planner treats as a
/// rectangle: catalog sheet sizes, job pieces and cut positions.
pub trait Rectangular {
    /// Returns the footprint of the object.
    fn footprint(&self) -> Size;

    /// Calculates the footprint area in mm².
    fn area_mm2(&self) -> f64 {
        self.footprint().area_mm2()
    }
}

impl Rectangular for Size {
    fn footprint(&self) -> Size {
        *self
    }
}

/// Printing technique for a production plan.
///
/// Serialized with the catalog's historical names (`SIMPLEX`,
/// `DUPLEX`, `WORK_AND_TURN`).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Technique {
    /// One-sided printing, one posture.
    Simplex,
    /// Two-sided printing in two separate postures (front run, back run).
    Duplex,
    /// Two-sided printing in a single posture by turning the sheet;
    /// requires a symmetrical layout.
    WorkAndTurn,
}

impl Technique {
    /// Canonical catalog name of the technique.
    pub const fn name(&self) -> &'static str {
        match self {
            Technique::Simplex => "SIMPLEX",
            Technique::Duplex => "DUPLEX",
            Technique::WorkAndTurn => "WORK_AND_TURN",
        }
    }

    /// Parses a catalog technique name.
    ///
    /// # Returns
    /// `Some(Technique)` for a known name, otherwise `None`
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "SIMPLEX" => Some(Technique::Simplex),
            "DUPLEX" => Some(Technique::Duplex),
            "WORK_AND_TURN" => Some(Technique::WorkAndTurn),
            _ => None,
        }
    }

    /// Whether the technique prints both sides of the sheet in a
    /// single posture.
    ///
    /// These techniques pay the machine's duplex surcharge; a true
    /// duplex job pays two full runs instead.
    #[inline]
    pub const fn is_single_posture_both_sides(&self) -> bool {
        matches!(self, Technique::WorkAndTurn)
    }
}

impl std::fmt::Display for Technique {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_size_normalization() {
        let portrait = Size::new(360.0, 510.0);
        let landscape = Size::new(510.0, 360.0);

        assert_eq!(portrait.normalized(), landscape.normalized());
        assert_eq!(portrait.normalized().width, 510.0);
        assert_eq!(portrait.normalized().length, 360.0);
    }

    #[test]
    fn test_cost_tolerance_is_coarser_than_general() {
        assert!(EPSILON_COST > EPSILON_GENERAL);
    }

    #[test]
    fn test_size_areas() {
        let sheet = Size::new(720.0, 1020.0);
        assert!((sheet.area_mm2() - 734_400.0).abs() < EPSILON_GENERAL);
        assert!((sheet.area_m2() - 0.7344).abs() < EPSILON_GENERAL);
    }

    #[test]
    fn test_fits_within_allows_rotation() {
        let cut = Size::new(510.0, 360.0);
        let sheet = Size::new(360.0, 1020.0);

        // The long edge of the cut fits the long edge of the sheet.
        assert!(cut.fits_within(&sheet, EPSILON_GENERAL));
        assert!(!sheet.fits_within(&cut, EPSILON_GENERAL));
    }

    #[test]
    fn test_invalid_dimensions() {
        assert!(Size::new(100.0, 200.0).is_valid_dimension());
        assert!(!Size::new(0.0, 200.0).is_valid_dimension());
        assert!(!Size::new(-10.0, 200.0).is_valid_dimension());
        assert!(!Size::new(f64::NAN, 200.0).is_valid_dimension());
        assert!(!Size::new(f64::INFINITY, 200.0).is_valid_dimension());
    }

    #[test]
    fn test_technique_names_round_trip() {
        for technique in [Technique::Simplex, Technique::Duplex, Technique::WorkAndTurn] {
            assert_eq!(Technique::from_name(technique.name()), Some(technique));
        }
        assert_eq!(Technique::from_name("WORK_AND_TUMBLE"), None);
        assert_eq!(Technique::from_name("simplex"), None);
    }

    #[test]
    fn test_technique_serde_uses_catalog_names() {
        let json = serde_json::to_string(&Technique::WorkAndTurn).unwrap();
        assert_eq!(json, "\"WORK_AND_TURN\"");
        let parsed: Technique = serde_json::from_str("\"DUPLEX\"").unwrap();
        assert_eq!(parsed, Technique::Duplex);
    }
}
