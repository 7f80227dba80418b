//! `PointOffset` / `VertexOffset`: strong, zero-cost handles into the two
//! offset spaces of a mesh.
//!
//! Every point and every vertex is represented by an opaque integer handle
//! into a dense index space. The two spaces are disjoint and the handle
//! types are never interchangeable without explicit translation. Both wrap
//! a nonzero `u64` so that 0 can be reserved as the invalid/sentinel
//! encoding inside flat attribute storage.
//!
//! This module provides:
//! - Transparent newtypes around `NonZeroU64` for zero-cost memory layout
//!   guarantees.
//! - Fallible constructors (`0` is rejected) and accessors.
//! - The [`OffsetLike`] trait the attribute storage and batch bookkeeping
//!   are generic over.
//! - The relative-index sentinel used by the kernel's scratch arrays.

use crate::mesh_error::MeshWeaveError;
use std::{fmt, num::NonZeroU64};

/// "No link" sentinel for relative-index scratch arrays.
///
/// Relative indices are `offset − batchStart` and may legitimately be
/// **negative** when they designate pre-existing geometry outside the
/// current batch, so `-1` cannot mean "none"; the most-negative value can
/// never be a real relative index and is reserved instead.
pub const REL_NONE: i64 = i64::MIN;

/// Common surface of the two offset handle types.
pub trait OffsetLike:
    Copy + Eq + Ord + std::hash::Hash + fmt::Debug + Send + Sync + 'static
{
    /// Wrap a raw nonzero value.
    fn from_nonzero(raw: NonZeroU64) -> Self;

    /// Create a handle from a raw value, rejecting 0.
    fn new(raw: u64) -> Result<Self, MeshWeaveError> {
        NonZeroU64::new(raw)
            .map(Self::from_nonzero)
            .ok_or(MeshWeaveError::InvalidOffset)
    }

    /// The raw integer value of this handle.
    fn get(self) -> u64;

    /// Slot in a dense zero-based array (offset 1 lives in slot 0).
    #[inline]
    fn slot(self) -> usize {
        (self.get() - 1) as usize
    }

    /// Inverse of [`slot`](Self::slot).
    #[inline]
    fn from_slot(slot: usize) -> Self {
        let raw = NonZeroU64::MIN
            .checked_add(slot as u64)
            .expect("offset slot overflows u64");
        Self::from_nonzero(raw)
    }
}

/// Opaque handle into the **point** offset space.
///
/// # Memory layout
/// `repr(transparent)` over `NonZeroU64`: same ABI and alignment as a
/// `u64`, and `Option<PointOffset>` is also `u64`-sized (the 0 niche
/// encodes `None`).
#[derive(
    Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize,
)]
#[repr(transparent)]
pub struct PointOffset(NonZeroU64);

impl PointOffset {
    /// Creates a new `PointOffset` from a raw `u64` value.
    ///
    /// # Errors
    /// Returns `Err(InvalidOffset)` if `raw == 0`; 0 is reserved as the
    /// invalid/sentinel encoding.
    #[inline]
    pub fn new(raw: u64) -> Result<Self, MeshWeaveError> {
        <Self as OffsetLike>::new(raw)
    }

    /// Returns the raw `u64` value of this handle.
    #[inline]
    pub const fn get(self) -> u64 {
        self.0.get()
    }
}

impl OffsetLike for PointOffset {
    #[inline]
    fn from_nonzero(raw: NonZeroU64) -> Self {
        PointOffset(raw)
    }

    #[inline]
    fn get(self) -> u64 {
        self.0.get()
    }
}

impl fmt::Debug for PointOffset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("PointOffset").field(&self.get()).finish()
    }
}

impl fmt::Display for PointOffset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.get())
    }
}

/// Opaque handle into the **vertex** offset space.
#[derive(
    Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize,
)]
#[repr(transparent)]
pub struct VertexOffset(NonZeroU64);

impl VertexOffset {
    /// Creates a new `VertexOffset` from a raw `u64` value.
    ///
    /// # Errors
    /// Returns `Err(InvalidOffset)` if `raw == 0`.
    #[inline]
    pub fn new(raw: u64) -> Result<Self, MeshWeaveError> {
        <Self as OffsetLike>::new(raw)
    }

    /// Returns the raw `u64` value of this handle.
    #[inline]
    pub const fn get(self) -> u64 {
        self.0.get()
    }
}

impl OffsetLike for VertexOffset {
    #[inline]
    fn from_nonzero(raw: NonZeroU64) -> Self {
        VertexOffset(raw)
    }

    #[inline]
    fn get(self) -> u64 {
        self.0.get()
    }
}

impl fmt::Debug for VertexOffset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("VertexOffset").field(&self.get()).finish()
    }
}

impl fmt::Display for VertexOffset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.get())
    }
}



#[cfg(test)]
mod serde_tests {
    use super::*;

    #[test]
    fn json_roundtrip() {
        let p = PointOffset::new(123).unwrap();
        let s = serde_json::to_string(&p).unwrap();
        let p2: PointOffset = serde_json::from_str(&s).unwrap();
        assert_eq!(p2, p);

        let v = VertexOffset::new(456).unwrap();
        let s = serde_json::to_string(&v).unwrap();
        let v2: VertexOffset = serde_json::from_str(&s).unwrap();
        assert_eq!(v2, v);
    }
}
