//! Quad-grid generation: 4 point indices per cell in row-major order.
//!
//! Covers plain grids (no wrap, no poles), tubes (wrap U), tori (wrap U and
//! V), and spheres (wrap U, both poles). Pole cell rows emit apex fans,
//! either as 4-tuples with the apex duplicated or as true 3-tuples when
//! `triangular_poles` is set.

use std::ops::Range;

use crate::generators::{Band, GridIndex, GridTopologySpec, cast_index};
use crate::interrupt::InterruptPoll;
use crate::mesh_error::MeshWeaveError;

/// Indices a single quad cell emits: 3 for a triangular pole cell, else 4.
pub fn quad_cell_arity(spec: &GridTopologySpec, cell: usize) -> usize {
    let band = cell / spec.cells_per_row();
    let is_fan = (spec.start_pole && band == 0)
        || (spec.end_pole && band == spec.cell_rows() - 1);
    if is_fan && spec.triangular_poles { 3 } else { 4 }
}

/// Appends the point-index tuples for quad cells `[cells.start, cells.end)`
/// of the flattened cell space to `out`.
///
/// Cell `i` lives in cell row `i / cells_per_row`, column
/// `i % cells_per_row`. Interior cells emit
/// `(p(r,c), p(r,c+1), p(r+1,c+1), p(r+1,c))`; the column index wraps at a
/// U seam. The interrupt poll is checked once per cell row.
///
/// # Errors
/// - `InvalidGrid` for a shape the flags cannot describe;
/// - `IndexOverflow` when a point number does not fit `I`;
/// - `Interrupted` when the poll fires; output then ends at a row boundary
///   and the whole operation must be discarded.
pub fn quad_grid_vertices<I: GridIndex>(
    spec: &GridTopologySpec,
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
                log::trace!("quad_grid_vertices: interrupted at cell row {b}");
                return Err(MeshWeaveError::Interrupted);
            }
            current_band = b;
        }
        match spec.band(b) {
            Band::StartFan => {
                let apex = cast_index(spec.start_apex())?;
                out.push(apex);
                if !spec.triangular_poles {
                    out.push(apex);
                }
                out.push(cast_index(spec.point(0, c + 1))?);
                out.push(cast_index(spec.point(0, c))?);
            }
            Band::Interior { upper, lower } => {
                out.push(cast_index(spec.point(upper, c))?);
                out.push(cast_index(spec.point(upper, c + 1))?);
                out.push(cast_index(spec.point(lower, c + 1))?);
                out.push(cast_index(spec.point(lower, c))?);
            }
            Band::EndFan => {
                let last = spec.regular_rows() - 1;
                out.push(cast_index(spec.point(last, c))?);
                out.push(cast_index(spec.point(last, c + 1))?);
                let apex = cast_index(spec.end_apex())?;
                out.push(apex);
                if !spec.triangular_poles {
                    out.push(apex);
                }
            }
        }
    }
    Ok(())
}
