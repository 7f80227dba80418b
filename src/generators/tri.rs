//! Triangulated-grid generation: each quad cell split into 2 triangles.
//!
//! Interior cells emit 6 indices; pole cells are already triangles and emit
//! 3. Diagonal selection must match exactly across chunks, otherwise
//! adjacent triangle fans from a multi-chunk parallel build disagree at the
//! chunk seam, so it is a pure function of the cell coordinates.

use std::ops::Range;

use crate::generators::{Band, GridIndex, GridTopologySpec, cast_index};
use crate::interrupt::InterruptPoll;
use crate::mesh_error::MeshWeaveError;

/// Which diagonal splits each quad.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum DiagonalMode {
    /// Always the (r,c)–(r+1,c+1) diagonal.
    Fixed,
    /// Checkerboard, keyed on `(row ^ col) & 1`.
    Alternate,
    /// Always the (r,c+1)–(r+1,c) diagonal.
    Reversed,
}

impl DiagonalMode {
    /// Whether cell (`row`, `col`) uses the reversed diagonal.
    #[inline]
    fn reversed(self, row: usize, col: usize) -> bool {
        match self {
            DiagonalMode::Fixed => false,
            DiagonalMode::Alternate => (row ^ col) & 1 == 1,
            DiagonalMode::Reversed => true,
        }
    }
}

/// Indices a single tri cell emits: 3 for a pole cell, else 6.
pub fn tri_cell_arity(spec: &GridTopologySpec, cell: usize) -> usize {
    let band = cell / spec.cells_per_row();
    let is_fan = (spec.start_pole && band == 0)
        || (spec.end_pole && band == spec.cell_rows() - 1);
    if is_fan { 3 } else { 6 }
}

/// Appends the triangle tuples for cells `[cells.start, cells.end)` to
/// `out`. Same cell space, point numbering, wrap/pole handling, and
/// interruption contract as
/// [`quad_grid_vertices`](crate::generators::quad::quad_grid_vertices);
/// pole fans ignore the diagonal mode and `triangular_poles` (they are
/// always true triangles here).
pub fn tri_grid_vertices<I: GridIndex>(
    spec: &GridTopologySpec,
    mode: DiagonalMode,
    cells: Range<usize>,
    out: &mut Vec<I>,
    interrupt: &impl InterruptPoll,
) -> Result<(), MeshWeaveError> {
    spec.validate()?;
    debug_assert!(cells.end <= spec.cell_count());

    let cpr = spec.cells_per_row();
    let mut current_band = usize::MAX;
    for i in cells {
        let b = i / cpr;
        let c = i % cpr;
        if b != current_band {
            if interrupt.interrupted() {
                log::trace!("tri_grid_vertices: interrupted at cell row {b}");
                return Err(MeshWeaveError::Interrupted);
            }
            current_band = b;
        }
        match spec.band(b) {
            Band::StartFan => {
                out.push(cast_index(spec.start_apex())?);
                out.push(cast_index(spec.point(0, c + 1))?);
                out.push(cast_index(spec.point(0, c))?);
            }
            Band::Interior { upper, lower } => {
                let p00 = cast_index(spec.point(upper, c))?;
                let p01 = cast_index(spec.point(upper, c + 1))?;
                let p11 = cast_index(spec.point(lower, c + 1))?;
                let p10 = cast_index(spec.point(lower, c))?;
                if mode.reversed(b, c) {
                    out.extend_from_slice(&[p00, p01, p10]);
                    out.extend_from_slice(&[p01, p11, p10]);
                } else {
                    out.extend_from_slice(&[p00, p01, p11]);
                    out.extend_from_slice(&[p00, p11, p10]);
                }
            }
            Band::EndFan => {
                let last = spec.regular_rows() - 1;
                out.push(cast_index(spec.point(last, c))?);
                out.push(cast_index(spec.point(last, c + 1))?);
                out.push(cast_index(spec.end_apex())?);
            }
        }
    }
    Ok(())
}
