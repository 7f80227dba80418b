//! Grid vertex generators.
//!
//! Pure functions that synthesize, per flattened cell index, the
//! point-index tuples for quad grids, triangulated grids, and curve
//! networks. Configuration is immutable, there is no shared mutable state,
//! and output for a cell depends only on the cell index, so a build can be
//! chunked across workers and each chunk's output concatenated.
//!
//! All generators are generic over the index integer type and share the
//! same chunk-resumption arithmetic: a sub-range `[begin, end)` of the
//! flattened cell space resumes mid-grid (and, for curves, mid-curve) by
//! division and modulo, never by replaying from the start.
//!
//! The interrupt poll is checked once per output row. On interruption the
//! generator stops writing at a row boundary and reports
//! [`MeshWeaveError::Interrupted`]; the partial output is not valid and the
//! caller must discard the whole batch.

pub mod curve;
pub mod quad;
pub mod tri;

pub use curve::{CurveGridSpec, CurveOrder, curve_grid_vertices};
pub use quad::{quad_cell_arity, quad_grid_vertices};
pub use tri::{DiagonalMode, tri_cell_arity, tri_grid_vertices};

use num_traits::PrimInt;

use crate::mesh_error::MeshWeaveError;

/// Index integer type a generator emits (`i32`, `u32`, `i64`, ...).
pub trait GridIndex: PrimInt + Send + Sync + 'static {}
impl<T: PrimInt + Send + Sync + 'static> GridIndex for T {}

#[inline]
pub(crate) fn cast_index<I: GridIndex>(value: usize) -> Result<I, MeshWeaveError> {
    I::from(value).ok_or(MeshWeaveError::IndexOverflow { value })
}

/// Shape of a quad or tri grid: `rows` × `cols` points, with optional wrap
/// in either direction and optional pole collapse at the first/last row.
///
/// Wrap in U closes each row into a loop (tube seam); wrap in V closes the
/// rows themselves (torus). A pole flag collapses the first or last point
/// row into a single apex point and turns the corresponding cell row into a
/// fan of triangles. Pole flags take precedence over wrap in V: a V seam
/// into a collapsed row is contradictory, so `wrap_v` is ignored when
/// either pole is set.
///
/// Spheres are wrap U + both poles (+ `triangular_poles` for true
/// 3-tuples), tubes wrap U only, tori wrap both, plain grids neither.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct GridTopologySpec {
    /// Point rows (apex rows included when a pole flag is set).
    pub rows: usize,
    /// Points per row.
    pub cols: usize,
    pub wrap_u: bool,
    pub wrap_v: bool,
    pub start_pole: bool,
    pub end_pole: bool,
    /// Emit pole fans as true 3-tuples instead of 4-tuples with the apex
    /// index duplicated.
    pub triangular_poles: bool,
    /// Point number of the first point in the grid.
    pub start_point: usize,
}

/// What a cell row connects.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum Band {
    /// Fan from the start apex down to the first regular row.
    StartFan,
    /// Quads between two regular rows.
    Interior { upper: usize, lower: usize },
    /// Fan from the last regular row up to the end apex.
    EndFan,
}

impl GridTopologySpec {
    pub(crate) fn poles(&self) -> usize {
        self.start_pole as usize + self.end_pole as usize
    }

    /// Rows of points that are not collapsed into an apex.
    pub(crate) fn regular_rows(&self) -> usize {
        self.rows - self.poles()
    }

    /// Cells per cell row: `cols − 1`, or `cols` when wrapped in U.
    pub fn cells_per_row(&self) -> usize {
        if self.wrap_u { self.cols } else { self.cols - 1 }
    }

    /// Cell rows: `rows − 1`, or `rows` when wrapped in V (poles override
    /// wrap V; the end rows then become fans).
    pub fn cell_rows(&self) -> usize {
        if self.poles() == 0 && self.wrap_v {
            self.rows
        } else {
            self.rows - 1
        }
    }

    /// Total cells in the flattened index space.
    pub fn cell_count(&self) -> usize {
        self.cell_rows() * self.cells_per_row()
    }

    /// Total points the grid references, apexes included.
    pub fn point_count(&self) -> usize {
        self.regular_rows() * self.cols + self.poles()
    }

    pub(crate) fn validate(&self) -> Result<(), MeshWeaveError> {
        if self.cols < 2 {
            return Err(MeshWeaveError::InvalidGrid(format!(
                "need at least 2 columns, got {}",
                self.cols
            )));
        }
        if self.rows < 2 || self.rows <= self.poles() {
            return Err(MeshWeaveError::InvalidGrid(format!(
                "{} rows cannot carry {} pole(s)",
                self.rows,
                self.poles()
            )));
        }
        Ok(())
    }

    /// Point number at regular row `r`, column `c` (`c` may be `cols` at a
    /// U seam and wraps back to 0).
    pub(crate) fn point(&self, r: usize, c: usize) -> usize {
        let c = if c >= self.cols { c - self.cols } else { c };
        self.start_point + self.start_pole as usize + r * self.cols + c
    }

    pub(crate) fn start_apex(&self) -> usize {
        self.start_point
    }

    pub(crate) fn end_apex(&self) -> usize {
        self.start_point + self.start_pole as usize + self.regular_rows() * self.cols
    }

    pub(crate) fn band(&self, b: usize) -> Band {
        debug_assert!(b < self.cell_rows());
        if self.start_pole && b == 0 {
            return Band::StartFan;
        }
        if self.end_pole && b == self.cell_rows() - 1 {
            return Band::EndFan;
        }
        let upper = b - self.start_pole as usize;
        let lower = if self.poles() == 0 && self.wrap_v {
            (upper + 1) % self.regular_rows()
        } else {
            upper + 1
        };
        Band::Interior { upper, lower }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plain(rows: usize, cols: usize) -> GridTopologySpec {
        GridTopologySpec {
            rows,
            cols,
            wrap_u: false,
            wrap_v: false,
            start_pole: false,
            end_pole: false,
            triangular_poles: false,
            start_point: 0,
        }
    }

    #[test]
    fn plain_grid_counts() {
        let spec = plain(4, 4);
        assert_eq!(spec.cells_per_row(), 3);
        assert_eq!(spec.cell_rows(), 3);
        assert_eq!(spec.cell_count(), 9);
        assert_eq!(spec.point_count(), 16);
    }

    #[test]
    fn torus_counts() {
        let spec = GridTopologySpec {
            wrap_u: true,
            wrap_v: true,
            ..plain(4, 4)
        };
        assert_eq!(spec.cell_count(), 16);
        assert_eq!(spec.point_count(), 16);
    }

    #[test]
    fn sphere_counts() {
        let spec = GridTopologySpec {
            wrap_u: true,
            start_pole: true,
            end_pole: true,
            triangular_poles: true,
            ..plain(5, 6)
        };
        assert_eq!(spec.cells_per_row(), 6);
        assert_eq!(spec.cell_rows(), 4);
        assert_eq!(spec.regular_rows(), 3);
        // apex + 3 regular rows of 6 + apex
        assert_eq!(spec.point_count(), 20);
        assert_eq!(spec.band(0), Band::StartFan);
        assert_eq!(spec.band(1), Band::Interior { upper: 0, lower: 1 });
        assert_eq!(spec.band(3), Band::EndFan);
    }

    #[test]
    fn torus_last_band_wraps_to_row_zero() {
        let spec = GridTopologySpec {
            wrap_u: true,
            wrap_v: true,
            ..plain(3, 4)
        };
        assert_eq!(spec.band(2), Band::Interior { upper: 2, lower: 0 });
    }

    #[test]
    fn degenerate_specs_are_rejected() {
        assert!(plain(1, 4).validate().is_err());
        assert!(plain(4, 1).validate().is_err());
        let spec = GridTopologySpec {
            start_pole: true,
            end_pole: true,
            ..plain(2, 4)
        };
        assert!(spec.validate().is_err());
    }

    #[test]
    fn point_numbering_with_poles() {
        let spec = GridTopologySpec {
            wrap_u: true,
            start_pole: true,
            end_pole: true,
            start_point: 100,
            ..plain(5, 6)
        };
        assert_eq!(spec.start_apex(), 100);
        assert_eq!(spec.point(0, 0), 101);
        assert_eq!(spec.point(2, 5), 118);
        assert_eq!(spec.point(0, 6), 101); // U seam wraps
        assert_eq!(spec.end_apex(), 119);
    }
}
