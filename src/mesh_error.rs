//! MeshWeaveError: unified error type for mesh-weave public APIs
//!
//! This error type is used throughout the mesh-weave library to provide
//! robust, non-panicking error handling for all public APIs. The wiring
//! kernel itself has no recoverable-error taxonomy (inputs are
//! caller-validated); the variants here cover the crate's API boundary.

use thiserror::Error;

/// Unified error type for mesh-weave operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MeshWeaveError {
    /// Attempted to construct an offset handle with a zero value (invalid).
    #[error("offset must be non-zero (0 is reserved as invalid/sentinel)")]
    InvalidOffset,
    /// A generator observed the cooperative interrupt flag and stopped at a
    /// row boundary. The caller must discard the whole batch.
    #[error("operation interrupted by caller; partial output must be discarded")]
    Interrupted,
    /// A grid coordinate does not fit the caller's chosen index integer type.
    #[error("grid index {value} does not fit the requested index type")]
    IndexOverflow { value: usize },
    /// A grid configuration that cannot describe a valid topology
    /// (too few rows/columns for the requested wrap and pole flags).
    #[error("invalid grid configuration: {0}")]
    InvalidGrid(String),
    /// The point range of an empty vertex list is undefined.
    #[error("offset range of an empty vertex list is undefined")]
    EmptyVertexList,
    /// A chain invariant does not hold (next/prev asymmetry or point
    /// disagreement along a chain).
    #[error("topology chain invariant violated at vertex {vertex}: {reason}")]
    ChainInvariant { vertex: u64, reason: &'static str },
}
