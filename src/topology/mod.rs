//! Offset handles, topology attributes, and batch bookkeeping.

pub mod attr;
pub mod batch;
pub mod offset;

pub use attr::{AtomicMeshTopology, AtomicTopologyAttr, MeshTopology, TopologyAttr};
pub use batch::{OffsetRange, PointBatch, VertexBatch};
pub use offset::{OffsetLike, PointOffset, REL_NONE, VertexOffset};
