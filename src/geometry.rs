//! Geometric helpers for axis-aligned sheet subdivision.
//!
//! The cutting optimizer builds its guillotine layouts from simple
//! rectangular grids; this module computes how many copies of a cut
//! rectangle fit into a region and where they land.

use crate::model::CutPosition;

/// A rectangular grid of cut pieces inside a region.
///
/// # Fields
/// * `count` - Number of pieces (`cols × rows`)
/// * `positions` - Piece origins relative to the region origin
/// * `cols`, `rows` - Grid dimensions
#[derive(Clone, Debug, Default)]
pub struct GridFit {
    pub count: u32,
    pub positions: Vec<CutPosition>,
    pub cols: u32,
    pub rows: u32,
}

impl GridFit {
    /// An empty fit (nothing placed).
    pub fn empty() -> Self {
        Self::default()
    }
}

/// Packs as many `cut_w × cut_h` pieces as possible into a
/// `region_w × region_h` rectangle as a plain grid, without rotation.
///
/// Degenerate cuts and cuts larger than the region in either axis
/// yield an empty fit.
///
/// # Parameters
/// * `region_w`, `region_h` - Region dimensions in mm
/// * `cut_w`, `cut_h` - Cut piece dimensions in mm
pub fn grid_fit(region_w: f64, region_h: f64, cut_w: f64, cut_h: f64) -> GridFit {
    if cut_w <= 0.0 || cut_h <= 0.0 || region_w < cut_w || region_h < cut_h {
        return GridFit::empty();
    }

    let cols = (region_w / cut_w).floor() as u32;
    let rows = (region_h / cut_h).floor() as u32;
    let count = cols * rows;

    let mut positions = Vec::with_capacity(count as usize);
    for j in 0..rows {
        for i in 0..cols {
            positions.push(CutPosition {
                x: f64::from(i) * cut_w,
                y: f64::from(j) * cut_h,
                width: cut_w,
                length: cut_h,
            });
        }
    }

    GridFit {
        count,
        positions,
        cols,
        rows,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_fit_exact_quarters() {
        let fit = grid_fit(1020.0, 720.0, 510.0, 360.0);
        assert_eq!(fit.cols, 2);
        assert_eq!(fit.rows, 2);
        assert_eq!(fit.count, 4);
        assert_eq!(fit.positions.len(), 4);
        assert_eq!(fit.positions[0].x, 0.0);
        assert_eq!(fit.positions[3].x, 510.0);
        assert_eq!(fit.positions[3].y, 360.0);
    }

    #[test]
    fn test_grid_fit_with_leftover() {
        let fit = grid_fit(1000.0, 700.0, 300.0, 200.0);
        assert_eq!(fit.cols, 3);
        assert_eq!(fit.rows, 3);
        assert_eq!(fit.count, 9);
    }

    #[test]
    fn test_grid_fit_cut_larger_than_region() {
        let fit = grid_fit(500.0, 700.0, 600.0, 200.0);
        assert_eq!(fit.count, 0);
        assert!(fit.positions.is_empty());
    }

    #[test]
    fn test_grid_fit_degenerate_cut() {
        assert_eq!(grid_fit(1000.0, 700.0, 0.0, 200.0).count, 0);
        assert_eq!(grid_fit(1000.0, 700.0, 300.0, -5.0).count, 0);
    }

    #[test]
    fn test_grid_fit_zero_region() {
        assert_eq!(grid_fit(0.0, 0.0, 300.0, 200.0).count, 0);
    }
}
