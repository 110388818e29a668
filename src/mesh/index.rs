//! Handle types for mesh elements.
//!
//! Mesh entities live in arenas owned by the mesh and are referenced by
//! stable `u32`-backed handles. A handle stays valid for the lifetime of the
//! mesh regardless of later insertions, which is what lets half-edges hold
//! mutual references (twin, next) without aliasing concerns.
//!
//! `u32::MAX` is reserved as the "absent" sentinel. The only place an absent
//! handle is part of the data model is a boundary half-edge's missing twin.

use std::fmt::{self, Debug};

const INVALID: u32 = u32::MAX;

/// A stable handle to a vertex.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[repr(transparent)]
pub struct VertexId(u32);

/// A stable handle to a half-edge.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[repr(transparent)]
pub struct HalfEdgeId(u32);

/// A stable handle to an undirected edge.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[repr(transparent)]
pub struct EdgeId(u32);

/// A stable handle to a triangular face.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[repr(transparent)]
pub struct FaceId(u32);

macro_rules! impl_handle {
    ($name:ident, $display:literal) => {
        impl $name {
            /// Create a handle from an arena position.
            #[inline]
            pub fn new(index: usize) -> Self {
                debug_assert!(index < INVALID as usize, "arena index {} overflows handle", index);
                Self(index as u32)
            }

            /// The absent/null handle.
            #[inline]
            pub fn absent() -> Self {
                Self(INVALID)
            }

            /// The arena position this handle refers to.
            #[inline]
            pub fn index(self) -> usize {
                self.0 as usize
            }

            /// Whether this handle refers to an element (is not the sentinel).
            #[inline]
            pub fn is_present(self) -> bool {
                self.0 != INVALID
            }
        }

        impl Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                if self.is_present() {
                    write!(f, "{}({})", $display, self.index())
                } else {
                    write!(f, "{}(-)", $display)
                }
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::absent()
            }
        }
    };
}

impl_handle!(VertexId, "V");
impl_handle!(HalfEdgeId, "HE");
impl_handle!(EdgeId, "E");
impl_handle!(FaceId, "F");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn handle_roundtrip() {
        let v = VertexId::new(42);
        assert_eq!(v.index(), 42);
        assert!(v.is_present());

        let absent = HalfEdgeId::absent();
        assert!(!absent.is_present());
    }

    #[test]
    fn handles_are_distinct_types() {
        let v = VertexId::new(0);
        let he = HalfEdgeId::new(0);
        let e = EdgeId::new(0);
        let f = FaceId::new(0);

        // Same raw value, four distinct types.
        assert_eq!(v.index(), he.index());
        assert_eq!(e.index(), f.index());
    }

    #[test]
    fn debug_format() {
        assert_eq!(format!("{:?}", VertexId::new(7)), "V(7)");
        assert_eq!(format!("{:?}", HalfEdgeId::absent()), "HE(-)");
    }
}
