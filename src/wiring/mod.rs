//! The topology wiring engine.
//!
//! Given a batch of new vertices and a point assignment, the engine wires
//! the mesh's four adjacency attributes in a lock-minimized, deterministic,
//! parallel pipeline:
//!
//! 1. vertex → point assignment (data-parallel);
//! 2. order-array initialization;
//! 3. sort by assigned point with an explicit index tie-break (the parallel
//!    sort primitive is not stable, and output must be platform-independent);
//! 4. canonical vertex per point, write-disjoint by point chunks;
//! 5. next/prev linking of per-point runs, sequential within each worker's
//!    slice of the sorted order, splicing into pre-existing chains with the
//!    external edges applied under one shared lock;
//! 6. materialization of the relative scratch links into the attributes;
//! 7. singleton collapse over page-aligned subranges, returning the
//!    non-singleton vertex list.
//!
//! The engine performs no I/O, allocates bounded scratch (the order array
//! and two relative-index arrays), and has no failure mode of its own:
//! inputs are caller-validated and internal checks are debug assertions.

pub mod range;

pub use range::{point_range_of_vertices, relative_indices};

use parking_lot::Mutex;
use rayon::prelude::*;
use std::sync::atomic::{AtomicI64, AtomicUsize, Ordering};

use crate::parallel;
use crate::topology::attr::{MeshTopology, TopologyAttr};
use crate::topology::batch::{PointBatch, VertexBatch};
use crate::topology::offset::{OffsetLike, PointOffset, REL_NONE, VertexOffset};

/// How batch vertices map to points.
#[derive(Copy, Clone, Debug)]
pub enum PointAssignment<'a> {
    /// Vertex `i` maps to point `points.start + i`. Used for freshly minted
    /// independent curves where every vertex gets its own point.
    Identity,
    /// Explicit point-relative index per vertex. Entries may be negative:
    /// they then designate pre-existing points before the batch start.
    Explicit(&'a [i64]),
}

impl PointAssignment<'_> {
    #[inline]
    fn rel(&self, i: usize) -> i64 {
        match self {
            PointAssignment::Identity => i as i64,
            PointAssignment::Explicit(a) => a[i],
        }
    }
}

/// Wires `vertices` into the mesh topology and returns the vertices that
/// still participate in a chain (the non-singleton list), in ascending
/// offset order.
///
/// Postconditions:
/// - every point with ≥ 2 referencing vertices has a consistent
///   doubly-linked chain, possibly spanning pre-existing vertices outside
///   the batch;
/// - every point with exactly one referencing vertex has no chain at all:
///   its vertex → point and point → vertex entries are cleared.
///
/// `splice_lock` serializes the rare cross-batch edge writes when a run
/// lands on a point that already has a canonical vertex from pre-existing
/// geometry; it is the only cross-worker contention in the pipeline and is
/// shared by the caller across invocations.
///
/// Batches touching overlapping pre-existing points must be serialized by
/// the caller; the collapse pass assumes a point is not concurrently being
/// linked by another in-flight batch. The result is byte-for-byte
/// reproducible for identical inputs regardless of worker count.
pub fn wire_vertex_batch<VP, PV, VN, VR>(
    topo: &MeshTopology<VP, PV, VN, VR>,
    vertices: VertexBatch,
    points: PointBatch,
    assignment: PointAssignment<'_>,
    splice_lock: &Mutex<()>,
) -> Vec<VertexOffset>
where
    VP: TopologyAttr<VertexOffset, PointOffset>,
    PV: TopologyAttr<PointOffset, VertexOffset>,
    VN: TopologyAttr<VertexOffset, VertexOffset>,
    VR: TopologyAttr<VertexOffset, VertexOffset>,
{
    let count = vertices.count;
    if count == 0 {
        return Vec::new();
    }
    if let PointAssignment::Explicit(a) = assignment {
        debug_assert_eq!(a.len(), count, "assignment length must match the batch");
    }
    debug_assert!(
        vertices.end() - 1 <= topo.vertex_to_next.len() as u64,
        "vertex batch exceeds attribute capacity"
    );

    let key = move |i: usize| assignment.rel(i);

    // Key extent, used for bounds checks and the stage-4 point partition.
    let (key_lo, key_hi) = match assignment {
        PointAssignment::Identity => (0i64, count as i64 - 1),
        PointAssignment::Explicit(a) => a
            .par_iter()
            .fold(|| (i64::MAX, i64::MIN), |acc, &k| (acc.0.min(k), acc.1.max(k)))
            .reduce(|| (i64::MAX, i64::MIN), |a, b| (a.0.min(b.0), a.1.max(b.1))),
    };
    debug_assert!(
        points.start.get() as i64 + key_lo > 0,
        "assignment resolves below the point offset space"
    );
    debug_assert!(
        points.start.get() as i64 + key_hi <= topo.point_to_vertex.len() as i64,
        "assignment exceeds point attribute capacity"
    );

    log::trace!(
        "wire_vertex_batch: {} vertices at {}, points at {}, key extent [{key_lo}, {key_hi}]",
        count,
        vertices.start,
        points.start
    );

    // Stage 1: vertex -> point. No cross-vertex dependency.
    (0..count).into_par_iter().for_each(|i| {
        topo.vertex_to_point
            .set(vertices.vertex(i), Some(points.point(key(i))));
    });

    // Stage 2: order array.
    let mut order: Vec<usize> = (0..count).into_par_iter().collect();

    // Stage 3: sort by assigned point, ties broken by relative index. The
    // composite key makes the unstable parallel sort deterministic.
    order.par_sort_unstable_by_key(|&i| (key(i), i));
    let order = order;

    // Stage 4: canonical vertex per point. Chunks never overlap in the
    // point dimension, so the writes need no lock. A point that already has
    // a canonical vertex (pre-existing geometry) keeps it; stage 5 splices
    // into its chain instead.
    {
        let span = (key_hi - key_lo + 1) as u64;
        let pieces = (rayon::current_num_threads().max(1) * 4).min(span.max(1) as usize) as u64;
        let per_piece = span.div_ceil(pieces).max(1) as i64;
        let windows: Vec<(i64, i64)> = (0..pieces as i64)
            .map(|n| {
                let k0 = key_lo + n * per_piece;
                (k0, (k0 + per_piece).min(key_hi + 1))
            })
            .filter(|&(k0, k1)| k0 < k1)
            .collect();
        windows.into_par_iter().for_each(|(k0, k1)| {
            let mut idx = order.partition_point(|&o| key(o) < k0);
            while idx < count {
                let k = key(order[idx]);
                if k >= k1 {
                    break;
                }
                let p = points.point(k);
                if topo.point_to_vertex.get(p).is_none() {
                    topo.point_to_vertex
                        .set(p, Some(vertices.vertex(order[idx])));
                }
                // skip the remaining vertices on the same point
                idx += 1;
                while idx < count && key(order[idx]) == k {
                    idx += 1;
                }
            }
        });
    }

    // Stage 5: next/prev construction over relative scratch arrays. Workers
    // take contiguous slices of the sorted order; a run of equal keys is
    // owned by the worker whose slice contains its first entry, so slices
    // that start mid-run skip forward and runs may extend past a slice end.
    // Each scratch index is written by exactly one worker.
    let next: Vec<AtomicI64> = (0..count)
        .into_par_iter()
        .map(|_| AtomicI64::new(REL_NONE))
        .collect();
    let prev: Vec<AtomicI64> = (0..count)
        .into_par_iter()
        .map(|_| AtomicI64::new(REL_NONE))
        .collect();
    let splices = AtomicUsize::new(0);

    let slices = parallel::chunk_ranges(count, parallel::chunk_len(count));
    slices.into_par_iter().for_each(|slice| {
        let mut s = slice.start;
        if s > 0 {
            while s < slice.end && key(order[s]) == key(order[s - 1]) {
                s += 1;
            }
        }
        // Cross-batch edges are buffered and applied once per slice; the
        // lock is only touched when sharing with pre-existing geometry
        // actually occurs.
        let mut ext_next: Vec<(VertexOffset, VertexOffset)> = Vec::new();
        let mut ext_prev: Vec<(VertexOffset, VertexOffset)> = Vec::new();
        while s < slice.end {
            let k = key(order[s]);
            let mut t = s;
            while t + 1 < count && key(order[t + 1]) == k {
                t += 1;
            }
            for j in s..t {
                let a = order[j];
                let b = order[j + 1];
                next[a].store(b as i64, Ordering::Relaxed);
                prev[b].store(a as i64, Ordering::Relaxed);
            }
            let p = points.point(k);
            if let Some(existing) = topo.point_to_vertex.get(p) {
                if !vertices.contains(existing) {
                    // Splice the run in right after the pre-existing
                    // canonical vertex. Reads of its links are safe without
                    // the lock: one worker owns each point's run, and the
                    // caller serializes batches touching the same
                    // pre-existing points.
                    let head = vertices.vertex(order[s]);
                    let tail = vertices.vertex(order[t]);
                    prev[order[s]].store(vertices.rel_of(existing), Ordering::Relaxed);
                    if let Some(old) = topo.vertex_to_next.get(existing) {
                        next[order[t]].store(vertices.rel_of(old), Ordering::Relaxed);
                        ext_prev.push((old, tail));
                    }
                    ext_next.push((existing, head));
                }
            }
            s = t + 1;
        }
        if !ext_next.is_empty() || !ext_prev.is_empty() {
            splices.fetch_add(ext_next.len(), Ordering::Relaxed);
            let _guard = splice_lock.lock();
            for (at, link) in ext_next {
                topo.vertex_to_next.set(at, Some(link));
            }
            for (at, link) in ext_prev {
                topo.vertex_to_prev.set(at, Some(link));
            }
        }
    });

    // Stage 6: materialize the relative scratch links (sentinel -> invalid,
    // otherwise absolute; negative values resolve to pre-existing vertices).
    (0..count).into_par_iter().for_each(|i| {
        let v = vertices.vertex(i);
        topo.vertex_to_next
            .set(v, vertices.resolve(next[i].load(Ordering::Relaxed)));
        topo.vertex_to_prev
            .set(v, vertices.resolve(prev[i].load(Ordering::Relaxed)));
    });

    // Stage 7: singleton collapse. A vertex with no links is the only one
    // on its point; the chain representation for the pair is dropped
    // entirely. Iteration is over page-aligned subranges so no two workers
    // share a storage page, and the per-worker lists concatenate in range
    // order, keeping the output deterministic.
    let non_singleton: Vec<VertexOffset> = parallel::page_chunks(vertices.start.get(), vertices.end())
        .into_par_iter()
        .fold(Vec::new, |mut acc, raws| {
            for raw in raws {
                let v = VertexOffset::from_slot(raw as usize - 1);
                if topo.vertex_to_next.get(v).is_none() && topo.vertex_to_prev.get(v).is_none() {
                    if let Some(p) = topo.vertex_to_point.get(v) {
                        topo.vertex_to_point.set(v, None);
                        topo.point_to_vertex.set(p, None);
                    }
                } else {
                    acc.push(v);
                }
            }
            acc
        })
        .reduce(Vec::new, |mut a, mut b| {
            a.append(&mut b);
            a
        });

    log::debug!(
        "wire_vertex_batch: {} vertices wired, {} splices, {} singletons collapsed",
        count,
        splices.load(Ordering::Relaxed),
        count - non_singleton.len()
    );
    non_singleton
}
