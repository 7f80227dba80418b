//! # mesh-weave
//!
//! mesh-weave is a parallel mesh-topology wiring kernel for building
//! polygonal and curve geometry in bulk. Given a batch of freshly allocated
//! vertices and an assignment of vertices to points, it wires the mesh's
//! four adjacency attributes — vertex→point, point→canonical-vertex, and
//! the doubly-linked next/prev chains of vertices sharing a point — in a
//! lock-minimized fork-join pipeline over flat index arrays, splicing into
//! pre-existing topology where batches land on shared points and
//! collapsing the chain representation for points referenced by a single
//! vertex.
//!
//! ## Features
//! - Grid vertex generators for quad grids, triangulated grids, and curve
//!   networks, with wrap and pole handling (planes, tubes, tori, spheres),
//!   generic over the index integer type
//! - Offset-range reduction and relative-index projection utilities for
//!   callers that start from raw vertex lists
//! - The wiring engine itself: deterministic (explicit sort tie-breaking),
//!   write-disjoint by construction, with one narrow mutex for the rare
//!   cross-batch splice edges
//! - Cooperative interruption polled at row granularity by the generators
//!
//! ## Determinism
//!
//! Running the kernel twice on identical inputs yields byte-identical
//! attribute contents regardless of worker count or scheduling: the only
//! order-sensitive step sorts by a composite key that includes the relative
//! vertex index as an explicit tie-break.
//!
//! ## Usage
//! ```toml
//! [dependencies]
//! mesh-weave = "0.1"
//! # Optional features: "check-invariants", "strict-invariants"
//! ```

// Re-export our major subsystems:
pub mod debug_invariants;
pub mod generators;
pub mod interrupt;
pub mod mesh_error;
pub mod parallel;
pub mod topology;
pub mod wiring;

pub use debug_invariants::DebugInvariants;

/// A convenient prelude to import the most-used traits & types:
pub mod prelude {
    pub use crate::debug_invariants::DebugInvariants;
    pub use crate::generators::{
        CurveGridSpec, CurveOrder, DiagonalMode, GridIndex, GridTopologySpec,
        curve_grid_vertices, quad_grid_vertices, tri_grid_vertices,
    };
    pub use crate::interrupt::{InterruptFlag, InterruptPoll, NeverInterrupted};
    pub use crate::mesh_error::MeshWeaveError;
    pub use crate::topology::attr::{
        AtomicMeshTopology, AtomicTopologyAttr, MeshTopology, TopologyAttr,
    };
    pub use crate::topology::batch::{OffsetRange, PointBatch, VertexBatch};
    pub use crate::topology::offset::{OffsetLike, PointOffset, VertexOffset};
    pub use crate::wiring::{
        PointAssignment, point_range_of_vertices, relative_indices, wire_vertex_batch,
    };
}
