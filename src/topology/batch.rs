//! Batch descriptors: contiguous ranges of freshly allocated offsets.
//!
//! A batch is created by the caller immediately before invoking the wiring
//! kernel. The kernel only ever writes within the vertex batch and to
//! points reachable from it (which may include pre-existing points outside
//! any batch). Relative indices are plain signed integers
//! `offset − batch.start`; see [`REL_NONE`](crate::topology::offset::REL_NONE)
//! for the "no link" sentinel.

use crate::topology::offset::{OffsetLike, PointOffset, REL_NONE, VertexOffset};
use std::ops::Range;

/// Contiguous range `[start, start + count)` of freshly allocated vertex
/// offsets.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct VertexBatch {
    pub start: VertexOffset,
    pub count: usize,
}

impl VertexBatch {
    pub fn new(start: VertexOffset, count: usize) -> Self {
        Self { start, count }
    }

    /// One past the last raw offset in the batch.
    #[inline]
    pub fn end(self) -> u64 {
        self.start.get() + self.count as u64
    }

    /// Whether `v` lies inside the batch.
    #[inline]
    pub fn contains(self, v: VertexOffset) -> bool {
        v.get() >= self.start.get() && v.get() < self.end()
    }

    /// The vertex at relative index `rel` (must be in `[0, count)`).
    #[inline]
    pub fn vertex(self, rel: usize) -> VertexOffset {
        debug_assert!(rel < self.count);
        VertexOffset::from_slot(self.start.slot() + rel)
    }

    /// Relative index of `v` against this batch; negative for vertices
    /// before the batch start (pre-existing geometry).
    #[inline]
    pub fn rel_of(self, v: VertexOffset) -> i64 {
        v.get() as i64 - self.start.get() as i64
    }

    /// Resolve a scratch relative index back to an absolute vertex, with
    /// the sentinel mapping to "no link".
    #[inline]
    pub fn resolve(self, rel: i64) -> Option<VertexOffset> {
        if rel == REL_NONE {
            return None;
        }
        let raw = self.start.get() as i64 + rel;
        debug_assert!(raw > 0, "relative index resolves outside the offset space");
        Some(VertexOffset::from_slot(raw as usize - 1))
    }
}

/// Start of a contiguous range of freshly allocated point offsets.
///
/// The count is implied by the assignment array (or the vertex batch count
/// under the identity rule), so only the origin is carried.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct PointBatch {
    pub start: PointOffset,
}

impl PointBatch {
    pub fn new(start: PointOffset) -> Self {
        Self { start }
    }

    /// The point at relative index `rel`; `rel` may be negative for
    /// pre-existing points before the batch start.
    #[inline]
    pub fn point(self, rel: i64) -> PointOffset {
        let raw = self.start.get() as i64 + rel;
        debug_assert!(raw > 0, "point relative index resolves outside the offset space");
        PointOffset::from_slot(raw as usize - 1)
    }
}

/// Half-open range `[start, end)` of offsets in one space.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct OffsetRange<T: OffsetLike> {
    pub start: T,
    /// Exclusive upper bound (`max + 1`).
    pub end: T,
}

impl<T: OffsetLike> OffsetRange<T> {
    pub fn len(&self) -> usize {
        (self.end.get() - self.start.get()) as usize
    }

    pub fn is_empty(&self) -> bool {
        self.end.get() <= self.start.get()
    }

    /// Raw offset values in the range.
    pub fn raw(&self) -> Range<u64> {
        self.start.get()..self.end.get()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(raw: u64) -> VertexOffset {
        VertexOffset::new(raw).unwrap()
    }
    fn p(raw: u64) -> PointOffset {
        PointOffset::new(raw).unwrap()
    }

    #[test]
    fn batch_membership_and_translation() {
        let batch = VertexBatch::new(v(10), 4);
        assert!(batch.contains(v(10)));
        assert!(batch.contains(v(13)));
        assert!(!batch.contains(v(14)));
        assert!(!batch.contains(v(9)));
        assert_eq!(batch.vertex(0), v(10));
        assert_eq!(batch.vertex(3), v(13));
        assert_eq!(batch.rel_of(v(12)), 2);
        assert_eq!(batch.rel_of(v(7)), -3);
    }

    #[test]
    fn resolve_handles_sentinel_and_negatives() {
        let batch = VertexBatch::new(v(10), 4);
        assert_eq!(batch.resolve(REL_NONE), None);
        assert_eq!(batch.resolve(0), Some(v(10)));
        assert_eq!(batch.resolve(-3), Some(v(7)));
    }

    #[test]
    fn point_batch_negative_relative_index() {
        let batch = PointBatch::new(p(100));
        assert_eq!(batch.point(0), p(100));
        assert_eq!(batch.point(5), p(105));
        assert_eq!(batch.point(-99), p(1));
    }

    #[test]
    fn offset_range_len() {
        let r = OffsetRange {
            start: p(3),
            end: p(8),
        };
        assert_eq!(r.len(), 5);
        assert!(!r.is_empty());
        assert_eq!(r.raw(), 3..8);
    }
}
