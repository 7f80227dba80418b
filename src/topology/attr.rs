//! Topology attributes: flat `Offset → Option<Offset>` adjacency storage.
//!
//! A topology attribute is a get/set mapping from one offset space into
//! another. Four roles together encode point/vertex adjacency:
//!
//! - vertex → point: the point each vertex references;
//! - point → vertex: one canonical (first) vertex per point;
//! - vertex → next / vertex → prev: the doubly-linked chain of all
//!   vertices sharing a point.
//!
//! Points referenced by exactly one vertex carry **no** chain (both links
//! invalid and the canonical entry cleared); that is the singleton
//! compaction invariant the wiring kernel enforces.
//!
//! Chains are arena + index from the start: storage is a flat array keyed
//! by offset, never heap-allocated list nodes. That representation is what
//! makes the kernel's page-disjoint parallel passes sound.

use std::marker::PhantomData;
use std::num::NonZeroU64;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::mesh_error::MeshWeaveError;
use crate::topology::offset::OffsetLike;

/// Get/set mapping from offsets in space `K` to optional offsets in space
/// `V`, usable concurrently.
///
/// Implementations must tolerate concurrent `get`/`set` from multiple
/// workers; the kernel guarantees each index is written by at most one
/// worker per pass (write-disjointness), except for the splice edges it
/// serializes through a lock.
pub trait TopologyAttr<K: OffsetLike, V: OffsetLike>: Sync {
    /// The link stored at `at`, or `None` for "no link".
    fn get(&self, at: K) -> Option<V>;

    /// Store `link` at `at` (`None` clears).
    fn set(&self, at: K, link: Option<V>);

    /// Capacity in offsets (valid keys are `1..=len`).
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Flat atomic storage for one topology attribute.
///
/// Each slot holds the raw value of the linked offset, with 0 encoding "no
/// link" (the dense in-band sentinel; the nullable encoding only appears at
/// the API boundary as `Option`). All accesses are relaxed: the kernel's
/// passes are write-disjoint per index and join through rayon's fork-join
/// edges, so no slot ordering is needed.
pub struct AtomicTopologyAttr<K, V> {
    data: Vec<AtomicU64>,
    _marker: PhantomData<fn(K) -> V>,
}

impl<K: OffsetLike, V: OffsetLike> AtomicTopologyAttr<K, V> {
    /// Storage for offsets `1..=len`, all links initially invalid.
    pub fn with_len(len: usize) -> Self {
        let mut data = Vec::with_capacity(len);
        data.resize_with(len, || AtomicU64::new(0));
        Self {
            data,
            _marker: PhantomData,
        }
    }

    /// Grow to `new_len` offsets. Requires exclusive access, so it cannot
    /// race with concurrent kernel passes.
    pub fn grow(&mut self, new_len: usize) {
        if new_len > self.data.len() {
            self.data.resize_with(new_len, || AtomicU64::new(0));
        }
    }

    /// Raw slot contents, for byte-for-byte reproducibility checks.
    pub fn snapshot(&self) -> Vec<u64> {
        self.data
            .iter()
            .map(|slot| slot.load(Ordering::Relaxed))
            .collect()
    }
}

impl<K: OffsetLike, V: OffsetLike> TopologyAttr<K, V> for AtomicTopologyAttr<K, V> {
    #[inline]
    fn get(&self, at: K) -> Option<V> {
        let raw = self.data[at.slot()].load(Ordering::Relaxed);
        NonZeroU64::new(raw).map(V::from_nonzero)
    }

    #[inline]
    fn set(&self, at: K, link: Option<V>) {
        let raw = link.map_or(0, |v| v.get());
        self.data[at.slot()].store(raw, Ordering::Relaxed);
    }

    #[inline]
    fn len(&self) -> usize {
        self.data.len()
    }
}

impl<K: OffsetLike, V: OffsetLike> std::fmt::Debug for AtomicTopologyAttr<K, V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AtomicTopologyAttr")
            .field("len", &self.data.len())
            .finish()
    }
}

/// The four adjacency attributes of a mesh, bundled for the wiring kernel.
#[derive(Debug)]
pub struct MeshTopology<VP, PV, VN, VR> {
    /// vertex → point
    pub vertex_to_point: VP,
    /// point → canonical vertex
    pub point_to_vertex: PV,
    /// vertex → next vertex on the same point
    pub vertex_to_next: VN,
    /// vertex → previous vertex on the same point
    pub vertex_to_prev: VR,
}

/// Default atomic-array bundle.
pub type AtomicMeshTopology = MeshTopology<
    AtomicTopologyAttr<crate::topology::offset::VertexOffset, crate::topology::offset::PointOffset>,
    AtomicTopologyAttr<crate::topology::offset::PointOffset, crate::topology::offset::VertexOffset>,
    AtomicTopologyAttr<
        crate::topology::offset::VertexOffset,
        crate::topology::offset::VertexOffset,
    >,
    AtomicTopologyAttr<
        crate::topology::offset::VertexOffset,
        crate::topology::offset::VertexOffset,
    >,
>;

impl AtomicMeshTopology {
    /// Fresh topology for `point_len` points and `vertex_len` vertices,
    /// all links invalid.
    pub fn with_capacity(point_len: usize, vertex_len: usize) -> Self {
        Self {
            vertex_to_point: AtomicTopologyAttr::with_len(vertex_len),
            point_to_vertex: AtomicTopologyAttr::with_len(point_len),
            vertex_to_next: AtomicTopologyAttr::with_len(vertex_len),
            vertex_to_prev: AtomicTopologyAttr::with_len(vertex_len),
        }
    }
}

mod invariants {
    use super::*;
    use crate::debug_invariants::DebugInvariants;
    use crate::topology::offset::{PointOffset, VertexOffset};

    impl<VP, PV, VN, VR> DebugInvariants for MeshTopology<VP, PV, VN, VR>
    where
        VP: TopologyAttr<VertexOffset, PointOffset>,
        PV: TopologyAttr<PointOffset, VertexOffset>,
        VN: TopologyAttr<VertexOffset, VertexOffset>,
        VR: TopologyAttr<VertexOffset, VertexOffset>,
    {
        fn debug_assert_invariants(&self) {
            crate::debug_invariants!(self.validate_invariants(), "MeshTopology");
        }

        /// Checks, for every vertex `v`: `next(v)` valid ⇒
        /// `prev(next(v)) == v` and `point(next(v)) == point(v)`, and the
        /// symmetric condition through `prev`.
        fn validate_invariants(&self) -> Result<(), MeshWeaveError> {
            for slot in 0..self.vertex_to_next.len() {
                let v = VertexOffset::from_slot(slot);
                let p = self.vertex_to_point.get(v);
                if let Some(n) = self.vertex_to_next.get(v) {
                    if self.vertex_to_prev.get(n) != Some(v) {
                        return Err(MeshWeaveError::ChainInvariant {
                            vertex: v.get(),
                            reason: "prev(next(v)) != v",
                        });
                    }
                    if self.vertex_to_point.get(n) != p {
                        return Err(MeshWeaveError::ChainInvariant {
                            vertex: v.get(),
                            reason: "point(next(v)) != point(v)",
                        });
                    }
                }
                if let Some(q) = self.vertex_to_prev.get(v) {
                    if self.vertex_to_next.get(q) != Some(v) {
                        return Err(MeshWeaveError::ChainInvariant {
                            vertex: v.get(),
                            reason: "next(prev(v)) != v",
                        });
                    }
                }
            }
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::debug_invariants::DebugInvariants;
    use crate::topology::offset::{PointOffset, VertexOffset};

    fn v(raw: u64) -> VertexOffset {
        VertexOffset::new(raw).unwrap()
    }
    fn p(raw: u64) -> PointOffset {
        PointOffset::new(raw).unwrap()
    }

    #[test]
    fn get_set_clear() {
        let attr = AtomicTopologyAttr::<VertexOffset, PointOffset>::with_len(4);
        assert_eq!(attr.get(v(1)), None);
        attr.set(v(1), Some(p(3)));
        assert_eq!(attr.get(v(1)), Some(p(3)));
        attr.set(v(1), None);
        assert_eq!(attr.get(v(1)), None);
    }

    #[test]
    fn snapshot_reflects_raw_contents() {
        let attr = AtomicTopologyAttr::<VertexOffset, PointOffset>::with_len(3);
        attr.set(v(2), Some(p(9)));
        assert_eq!(attr.snapshot(), vec![0, 9, 0]);
    }

    #[test]
    fn grow_preserves_existing_links() {
        let mut attr = AtomicTopologyAttr::<VertexOffset, PointOffset>::with_len(2);
        attr.set(v(2), Some(p(5)));
        attr.grow(5);
        assert_eq!(attr.len(), 5);
        assert_eq!(attr.get(v(2)), Some(p(5)));
        assert_eq!(attr.get(v(5)), None);
    }

    #[test]
    fn invariants_catch_asymmetric_chain() {
        let topo = AtomicMeshTopology::with_capacity(2, 2);
        topo.vertex_to_point.set(v(1), Some(p(1)));
        topo.vertex_to_point.set(v(2), Some(p(1)));
        topo.vertex_to_next.set(v(1), Some(v(2)));
        // missing prev(v2) = v1
        assert!(matches!(
            topo.validate_invariants(),
            Err(MeshWeaveError::ChainInvariant { .. })
        ));
        topo.vertex_to_prev.set(v(2), Some(v(1)));
        topo.validate_invariants().unwrap();
    }

    #[test]
    fn invariants_catch_point_disagreement() {
        let topo = AtomicMeshTopology::with_capacity(2, 2);
        topo.vertex_to_point.set(v(1), Some(p(1)));
        topo.vertex_to_point.set(v(2), Some(p(2)));
        topo.vertex_to_next.set(v(1), Some(v(2)));
        topo.vertex_to_prev.set(v(2), Some(v(1)));
        assert!(matches!(
            topo.validate_invariants(),
            Err(MeshWeaveError::ChainInvariant {
                reason: "point(next(v)) != point(v)",
                ..
            })
        ));
    }
}
