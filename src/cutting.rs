//! Guillotine cutting-stock optimizer.
//!
//! Computes how many printing sheets can be cut from a factory sheet
//! with straight edge-to-edge cuts. Two strategies are evaluated: a
//! horizontal-first layout that fills whole columns of the cut and
//! retries the leftover strip with the cut rotated, and the symmetric
//! vertical-first layout. The better of the two wins.
//!
//! This is a deliberate heuristic, not an optimal guillotine solver:
//! layouts that need mixed-orientation multi-strip partitions are not
//! found. Downstream cost comparisons depend on reproducing exactly
//! this heuristic, so its behavior is part of the contract.

use crate::geometry::{GridFit, grid_fit};
use crate::model::{CutPosition, CuttingPlan};
use crate::types::Size;

/// Finds the best guillotine subdivision of `sheet` into `cut` pieces.
///
/// Both rectangles are normalized to (long, short) first; rotation of
/// the cut inside leftover strips is handled by the strategies.
///
/// # Parameters
/// * `sheet` - Factory sheet dimensions
/// * `cut` - Target printing-sheet dimensions
///
/// # Returns
/// A `CuttingPlan` with piece count, positions and waste percentage.
/// A degenerate cut, or a cut larger than the sheet in either axis,
/// yields `cuts_per_sheet == 0`; callers must treat that as
/// infeasible rather than as a 100%-waste layout.
pub fn find_best_cut(sheet: Size, cut: Size) -> CuttingPlan {
    let b = sheet.long_edge();
    let h = sheet.short_edge();
    let cb = cut.long_edge();
    let ch = cut.short_edge();

    let horizontal = best_horizontal(b, h, cb, ch);
    let vertical = best_vertical(b, h, cb, ch);

    // Ties go to the horizontal strategy.
    let best = if horizontal.count >= vertical.count {
        horizontal
    } else {
        vertical
    };

    let sheet_area = sheet.area_mm2();
    let used_area = f64::from(best.count) * cut.area_mm2();
    let waste_percentage = if sheet_area > 0.0 {
        100.0 - (used_area / sheet_area) * 100.0
    } else {
        100.0
    };

    CuttingPlan {
        cuts_per_sheet: best.count,
        positions: best.positions,
        waste_percentage,
    }
}

/// A candidate layout produced by one strategy.
struct Layout {
    count: u32,
    positions: Vec<CutPosition>,
}

impl Layout {
    fn from_fit(fit: GridFit) -> Self {
        Self {
            count: fit.count,
            positions: fit.positions,
        }
    }
}

/// Horizontal-first strategy: fill `i` full columns of the unrotated
/// cut along the long axis, then grid the leftover strip with the cut
/// rotated. Every split point `i` is tried.
fn best_horizontal(b: f64, h: f64, cb: f64, ch: f64) -> Layout {
    let initial = grid_fit(b, h, cb, ch);
    let cols = initial.cols;
    let mut best = Layout::from_fit(initial);

    for i in 1..=cols {
        let main_w = f64::from(i) * cb;
        let remaining_w = b - main_w;

        let main_cut = grid_fit(main_w, h, cb, ch);
        let remaining_cut = grid_fit(remaining_w, h, ch, cb);

        if main_cut.count + remaining_cut.count > best.count {
            let mut combined = main_cut.positions;
            combined.extend(remaining_cut.positions.into_iter().map(|p| CutPosition {
                x: p.x + main_w,
                ..p
            }));
            best = Layout {
                count: main_cut.count + remaining_cut.count,
                positions: combined,
            };
        }
    }

    best
}

/// Vertical-first strategy: symmetric to [`best_horizontal`], starting
/// from the rotated cut and rotating the leftover back.
fn best_vertical(b: f64, h: f64, cb: f64, ch: f64) -> Layout {
    let initial = grid_fit(b, h, ch, cb);
    let rows = initial.rows;
    let mut best = Layout::from_fit(initial);

    for i in 1..=rows {
        // The main band holds rotated cuts, so its height steps in cb.
        let main_h = f64::from(i) * cb;
        let remaining_h = h - main_h;

        let main_cut = grid_fit(b, main_h, ch, cb);
        let remaining_cut = grid_fit(b, remaining_h, cb, ch);

        if main_cut.count + remaining_cut.count > best.count {
            let mut combined = main_cut.positions;
            combined.extend(remaining_cut.positions.into_iter().map(|p| CutPosition {
                y: p.y + main_h,
                ..p
            }));
            best = Layout {
                count: main_cut.count + remaining_cut.count,
                positions: combined,
            };
        }
    }

    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::EPSILON_GENERAL;

    #[test]
    fn test_quarter_fold_is_exact() {
        let plan = find_best_cut(Size::new(720.0, 1020.0), Size::new(360.0, 510.0));
        assert_eq!(plan.cuts_per_sheet, 4);
        assert_eq!(plan.positions.len(), 4);
        assert!(
            plan.waste_percentage.abs() < EPSILON_GENERAL,
            "quarter fold should have zero waste, got {}",
            plan.waste_percentage
        );
    }

    #[test]
    fn test_rotated_leftover_beats_plain_grid() {
        // Plain grid fits 1×3 = 3 pieces; one column of unrotated cuts
        // plus a rotated leftover strip fits 5.
        let plan = find_best_cut(Size::new(1000.0, 700.0), Size::new(600.0, 200.0));
        assert_eq!(plan.cuts_per_sheet, 5);
        assert_eq!(plan.positions.len(), 5);
    }

    #[test]
    fn test_orientation_of_inputs_is_irrelevant() {
        let a = find_best_cut(Size::new(720.0, 1020.0), Size::new(360.0, 510.0));
        let b = find_best_cut(Size::new(1020.0, 720.0), Size::new(510.0, 360.0));
        assert_eq!(a.cuts_per_sheet, b.cuts_per_sheet);
    }

    #[test]
    fn test_cut_larger_than_sheet_is_infeasible() {
        let plan = find_best_cut(Size::new(720.0, 1020.0), Size::new(800.0, 1100.0));
        assert_eq!(plan.cuts_per_sheet, 0);
        assert!(plan.positions.is_empty());
    }

    #[test]
    fn test_degenerate_cut_is_infeasible() {
        let plan = find_best_cut(Size::new(720.0, 1020.0), Size::new(0.0, 510.0));
        assert_eq!(plan.cuts_per_sheet, 0);
        assert!(plan.positions.is_empty());
    }

    #[test]
    fn test_yield_bound_and_waste_range() {
        let cases = [
            (Size::new(720.0, 1020.0), Size::new(360.0, 510.0)),
            (Size::new(1000.0, 700.0), Size::new(600.0, 200.0)),
            (Size::new(880.0, 630.0), Size::new(210.0, 297.0)),
            (Size::new(760.0, 1120.0), Size::new(320.0, 450.0)),
        ];
        for (sheet, cut) in cases {
            let plan = find_best_cut(sheet, cut);
            let used = f64::from(plan.cuts_per_sheet) * cut.area_mm2();
            assert!(
                used <= sheet.area_mm2() + EPSILON_GENERAL,
                "cut area {} exceeds sheet area {}",
                used,
                sheet.area_mm2()
            );
            assert!(
                (0.0 - EPSILON_GENERAL..=100.0 + EPSILON_GENERAL)
                    .contains(&plan.waste_percentage),
                "waste percentage {} out of range",
                plan.waste_percentage
            );
        }
    }

    #[test]
    fn test_positions_stay_inside_sheet() {
        let sheet = Size::new(880.0, 630.0);
        let cut = Size::new(210.0, 297.0);
        let plan = find_best_cut(sheet, cut);
        let (b, h) = (sheet.long_edge(), sheet.short_edge());
        for p in &plan.positions {
            assert!(p.x >= 0.0 && p.y >= 0.0);
            assert!(p.x + p.width <= b + EPSILON_GENERAL);
            assert!(p.y + p.length <= h + EPSILON_GENERAL);
        }
    }

    #[test]
    fn test_positions_do_not_overlap() {
        let plan = find_best_cut(Size::new(1000.0, 700.0), Size::new(600.0, 200.0));
        for (i, a) in plan.positions.iter().enumerate() {
            for b in plan.positions.iter().skip(i + 1) {
                let separated = a.x + a.width <= b.x + EPSILON_GENERAL
                    || b.x + b.width <= a.x + EPSILON_GENERAL
                    || a.y + a.length <= b.y + EPSILON_GENERAL
                    || b.y + b.length <= a.y + EPSILON_GENERAL;
                assert!(separated, "positions {:?} and {:?} overlap", a, b);
            }
        }
    }
}
