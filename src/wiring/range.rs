//! Offset-range reduction and relative-index projection.
//!
//! Callers that hold only a vertex list can recover the implied point range
//! with [`point_range_of_vertices`], then turn absolute offsets into the
//! compact signed assignment arrays the wiring engine consumes with
//! [`relative_indices`].

use rayon::prelude::*;

use crate::mesh_error::MeshWeaveError;
use crate::topology::attr::TopologyAttr;
use crate::topology::batch::OffsetRange;
use crate::topology::offset::{OffsetLike, PointOffset, VertexOffset};

/// Tight half-open range `[min, max + 1)` of all points referenced by
/// `vertices`, computed as a parallel min/max reduction.
///
/// # Errors
/// Returns `Err(EmptyVertexList)` when `vertices` is empty or none of its
/// entries carries a point reference.
pub fn point_range_of_vertices<VP>(
    vertices: &[VertexOffset],
    vertex_to_point: &VP,
) -> Result<OffsetRange<PointOffset>, MeshWeaveError>
where
    VP: TopologyAttr<VertexOffset, PointOffset>,
{
    if vertices.is_empty() {
        return Err(MeshWeaveError::EmptyVertexList);
    }
    let (lo, hi) = vertices
        .par_iter()
        .filter_map(|&v| vertex_to_point.get(v))
        .map(|p| (p.get(), p.get()))
        .reduce(
            || (u64::MAX, 0),
            |a, b| (a.0.min(b.0), a.1.max(b.1)),
        );
    if lo > hi {
        return Err(MeshWeaveError::EmptyVertexList);
    }
    Ok(OffsetRange {
        start: PointOffset::new(lo)?,
        end: PointOffset::new(hi + 1)?,
    })
}

/// Parallel elementwise `offsets[i] − base`, producing a relative-index
/// array usable as an explicit point assignment.
///
/// Order-preserving and pure; entries are negative when the offset lies
/// before `base`.
pub fn relative_indices<T: OffsetLike>(offsets: &[T], base: T) -> Vec<i64> {
    offsets
        .par_iter()
        .map(|&o| o.get() as i64 - base.get() as i64)
        .collect()
}
