//! Curve-network generation: `rows` × `cols` points interpreted as
//! independent curves, one per row or one per column.
//!
//! The flattened cell space has one cell per point of a curve, visited
//! curve by curve. With `unroll` set, each curve additionally repeats its
//! first point index after its last cell, closing it. A chunk boundary that
//! falls inside a curve resumes mid-curve by division and modulo on the
//! cell index; nothing is replayed from the curve start.

use std::ops::Range;

use crate::generators::{GridIndex, cast_index};
use crate::interrupt::InterruptPoll;
use crate::mesh_error::MeshWeaveError;

/// Which way the point grid is cut into curves.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum CurveOrder {
    /// Each row is one curve of `cols` points.
    RowMajor,
    /// Each column is one curve of `rows` points.
    ColumnMajor,
}

/// Shape of a curve network over a `rows` × `cols` point grid.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct CurveGridSpec {
    pub rows: usize,
    pub cols: usize,
    pub order: CurveOrder,
    /// Repeat each curve's first point index after its last cell.
    pub unroll: bool,
    /// Point number of the first point in the grid.
    pub start_point: usize,
}

impl CurveGridSpec {
    /// Total cells in the flattened index space (one per grid point).
    pub fn cell_count(&self) -> usize {
        self.rows * self.cols
    }

    /// Points per curve.
    pub fn curve_len(&self) -> usize {
        match self.order {
            CurveOrder::RowMajor => self.cols,
            CurveOrder::ColumnMajor => self.rows,
        }
    }

    fn validate(&self) -> Result<(), MeshWeaveError> {
        if self.rows == 0 || self.cols == 0 {
            return Err(MeshWeaveError::InvalidGrid(format!(
                "curve grid must be non-empty, got {}x{}",
                self.rows, self.cols
            )));
        }
        Ok(())
    }
}

/// Appends the point indices for cells `[cells.start, cells.end)` to `out`.
///
/// Cell `i` belongs to curve `i / curve_len` at position `i % curve_len`;
/// point numbering is row-major over the grid regardless of curve order.
/// The interrupt poll is checked once per curve; on interruption the output
/// ends at a curve boundary and the whole operation must be discarded.
pub fn curve_grid_vertices<I: GridIndex>(
    spec: &CurveGridSpec,
    cells: Range<usize>,
    out: &mut Vec<I>,
    interrupt: &impl InterruptPoll,
) -> Result<(), MeshWeaveError> {
    spec.validate()?;
    debug_assert!(cells.end <= spec.cell_count());

    let len = spec.curve_len();
    let mut current_curve = usize::MAX;
    for i in cells {
        let curve = i / len;
        let pos = i % len;
        if curve != current_curve {
            if interrupt.interrupted() {
                log::trace!("curve_grid_vertices: interrupted at curve {curve}");
                return Err(MeshWeaveError::Interrupted);
            }
            current_curve = curve;
        }
        let (first, point) = match spec.order {
            CurveOrder::RowMajor => {
                let first = spec.start_point + curve * spec.cols;
                (first, first + pos)
            }
            CurveOrder::ColumnMajor => {
                let first = spec.start_point + curve;
                (first, first + pos * spec.cols)
            }
        };
        out.push(cast_index(point)?);
        if spec.unroll && pos == len - 1 {
            out.push(cast_index(first)?);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interrupt::NeverInterrupted;

    fn generate(spec: &CurveGridSpec, cells: Range<usize>) -> Vec<u32> {
        let mut out = Vec::new();
        curve_grid_vertices(spec, cells, &mut out, &NeverInterrupted).unwrap();
        out
    }

    #[test]
    fn row_major_unrolled_repeats_first_point() {
        let spec = CurveGridSpec {
            rows: 3,
            cols: 4,
            order: CurveOrder::RowMajor,
            unroll: true,
            start_point: 0,
        };
        let out = generate(&spec, 0..spec.cell_count());
        assert_eq!(
            out,
            vec![0, 1, 2, 3, 0, 4, 5, 6, 7, 4, 8, 9, 10, 11, 8]
        );
    }

    #[test]
    fn column_major_walks_down_columns() {
        let spec = CurveGridSpec {
            rows: 3,
            cols: 4,
            order: CurveOrder::ColumnMajor,
            unroll: false,
            start_point: 10,
        };
        let out = generate(&spec, 0..spec.cell_count());
        assert_eq!(
            out,
            vec![10, 14, 18, 11, 15, 19, 12, 16, 20, 13, 17, 21]
        );
    }

    #[test]
    fn resumes_mid_curve_without_replaying() {
        let spec = CurveGridSpec {
            rows: 3,
            cols: 4,
            order: CurveOrder::RowMajor,
            unroll: true,
            start_point: 0,
        };
        let full = generate(&spec, 0..12);
        let mut split = generate(&spec, 0..7);
        split.extend(generate(&spec, 7..12));
        assert_eq!(split, full);

        let col = CurveGridSpec {
            order: CurveOrder::ColumnMajor,
            ..spec
        };
        let full = generate(&col, 0..12);
        let mut split = generate(&col, 0..5);
        split.extend(generate(&col, 5..12));
        assert_eq!(split, full);
    }

    #[test]
    fn interruption_stops_at_curve_boundary() {
        let spec = CurveGridSpec {
            rows: 2,
            cols: 3,
            order: CurveOrder::RowMajor,
            unroll: false,
            start_point: 0,
        };
        let flag = crate::interrupt::InterruptFlag::new();
        flag.request();
        let mut out = Vec::<u32>::new();
        assert_eq!(
            curve_grid_vertices(&spec, 0..spec.cell_count(), &mut out, &flag),
            Err(MeshWeaveError::Interrupted)
        );
        assert!(out.is_empty());
    }
}
