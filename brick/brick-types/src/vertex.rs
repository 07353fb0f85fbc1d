//! Vertex type.

use nalgebra::{Point3, Vector3};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A vertex in 3D space.
///
/// Shape files always carry a normal per vertex; texture coordinates are
/// only present for decorated shapes. Both are optional so that hand-built
/// geometry does not need them.
///
/// # Example
///
/// ```
/// use brick_types::{Point3, Vector3, Vertex};
///
/// let v1 = Vertex::new(Point3::new(1.0, 2.0, 3.0));
/// let v2 = Vertex::from_coords(1.0, 2.0, 3.0);
/// assert_eq!(v1, v2);
///
/// let lit = Vertex::with_normal(Point3::origin(), Vector3::z());
/// assert!(lit.normal.is_some());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Vertex {
    /// 3D position.
    pub position: Point3<f64>,

    /// Surface normal, if known.
    pub normal: Option<Vector3<f64>>,

    /// Texture coordinate (U, V), if the shape is decorated.
    pub uv: Option<[f64; 2]>,
}

impl Vertex {
    /// Create a new vertex with only position set.
    #[inline]
    #[must_use]
    pub const fn new(position: Point3<f64>) -> Self {
        Self {
            position,
            normal: None,
            uv: None,
        }
    }

    /// Create a vertex from raw coordinates.
    #[inline]
    #[must_use]
    #[allow(clippy::missing_const_for_fn)] // Point3::new is not const in nalgebra
    pub fn from_coords(x: f64, y: f64, z: f64) -> Self {
        Self::new(Point3::new(x, y, z))
    }

    /// Create a vertex with position and normal.
    #[inline]
    #[must_use]
    pub const fn with_normal(position: Point3<f64>, normal: Vector3<f64>) -> Self {
        Self {
            position,
            normal: Some(normal),
            uv: None,
        }
    }

    /// Set the texture coordinate (builder pattern).
    #[inline]
    #[must_use]
    pub const fn with_uv(mut self, u: f64, v: f64) -> Self {
        self.uv = Some([u, v]);
        self
    }
}
