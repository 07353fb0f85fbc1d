//! Error types for geometry operations.

use thiserror::Error;

use crate::MaterialId;

/// Result type for geometry operations.
pub type GeometryResult<T> = Result<T, GeometryError>;

/// Errors that can occur while building or combining geometry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GeometryError {
    /// A face references a vertex that does not exist.
    #[error("face {face} references vertex {index}, but only {vertex_count} vertices exist")]
    IndexOutOfRange {
        /// Index of the offending face.
        face: usize,
        /// The out-of-range vertex index.
        index: u32,
        /// Number of vertices available.
        vertex_count: usize,
    },

    /// Two batches with different materials were merged.
    #[error("cannot merge geometry of material {found} into batch of material {expected}")]
    MaterialMismatch {
        /// Material of the receiving batch.
        expected: MaterialId,
        /// Material of the batch being merged in.
        found: MaterialId,
    },

    /// The merged vertex count no longer fits in `u32` indices.
    #[error("vertex count {count} exceeds the u32 index range")]
    TooManyVertices {
        /// The vertex count that overflowed.
        count: usize,
    },
}
