//! Indexed triangle geometry.

use nalgebra::Matrix4;

use crate::{Aabb, GeometryError, GeometryResult, Vertex};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Indexed triangle geometry for one shape, or for a merged batch of shapes.
///
/// # Memory Layout
///
/// - `vertices`: `Vec<Vertex>` - Positions plus optional normals and texture coordinates
/// - `faces`: `Vec<[u32; 3]>` - Triangles as indices into `vertices`
///
/// Geometry decoded from a shape file is in local shape space; the part
/// loader moves it into world space with [`ShapeGeometry::apply_transform`].
///
/// # Example
///
/// ```
/// use brick_types::{ShapeGeometry, Vertex};
///
/// let geometry = ShapeGeometry::from_parts(
///     vec![
///         Vertex::from_coords(0.0, 0.0, 0.0),
///         Vertex::from_coords(1.0, 0.0, 0.0),
///         Vertex::from_coords(0.0, 1.0, 0.0),
///     ],
///     vec![[0, 1, 2]],
/// );
///
/// assert_eq!(geometry.vertex_count(), 3);
/// assert_eq!(geometry.face_count(), 1);
/// assert!(geometry.validate().is_ok());
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ShapeGeometry {
    /// Vertex data.
    pub vertices: Vec<Vertex>,

    /// Triangle faces as indices into the vertex array.
    pub faces: Vec<[u32; 3]>,
}

impl ShapeGeometry {
    /// Create new empty geometry.
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self {
            vertices: Vec::new(),
            faces: Vec::new(),
        }
    }

    /// Create geometry with pre-allocated capacity.
    #[inline]
    #[must_use]
    pub fn with_capacity(vertex_count: usize, face_count: usize) -> Self {
        Self {
            vertices: Vec::with_capacity(vertex_count),
            faces: Vec::with_capacity(face_count),
        }
    }

    /// Create geometry from vertices and faces.
    #[inline]
    #[must_use]
    pub const fn from_parts(vertices: Vec<Vertex>, faces: Vec<[u32; 3]>) -> Self {
        Self { vertices, faces }
    }

    /// Number of vertices.
    #[inline]
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Number of triangles.
    #[inline]
    #[must_use]
    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    /// Check whether there is no drawable content.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty() || self.faces.is_empty()
    }

    /// Flattened triangle index list, three entries per face.
    #[must_use]
    pub fn indices(&self) -> Vec<u32> {
        self.faces.iter().flatten().copied().collect()
    }

    /// Check that every face index refers to an existing vertex.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::IndexOutOfRange`] for the first bad index.
    pub fn validate(&self) -> GeometryResult<()> {
        let vertex_count = self.vertices.len();
        for (face, indices) in self.faces.iter().enumerate() {
            for &index in indices {
                if index as usize >= vertex_count {
                    return Err(GeometryError::IndexOutOfRange {
                        face,
                        index,
                        vertex_count,
                    });
                }
            }
        }
        Ok(())
    }

    /// Append another geometry to this one.
    ///
    /// The other geometry's vertices follow this geometry's vertices, and its
    /// face indices are offset by this geometry's previous vertex count, so
    /// concatenation order is preserved.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::TooManyVertices`] if the combined vertex
    /// count no longer fits `u32` indices. `self` is unchanged in that case.
    pub fn merge(&mut self, other: &Self) -> GeometryResult<()> {
        let combined = self.vertices.len() + other.vertices.len();
        if u32::try_from(combined).is_err() {
            return Err(GeometryError::TooManyVertices { count: combined });
        }
        #[allow(clippy::cast_possible_truncation)]
        // Truncation: checked against u32::MAX above
        let vertex_offset = self.vertices.len() as u32;

        self.vertices.extend(other.vertices.iter().cloned());
        self.faces.extend(other.faces.iter().map(|f| {
            [
                f[0].saturating_add(vertex_offset),
                f[1].saturating_add(vertex_offset),
                f[2].saturating_add(vertex_offset),
            ]
        }));
        Ok(())
    }

    /// Transform the geometry in place with a homogeneous 4x4 matrix.
    ///
    /// Positions receive the full affine transform. Normals are direction-only
    /// and receive the upper-left 3x3 linear block, translation ignored.
    /// Texture coordinates are unchanged.
    ///
    /// # Example
    ///
    /// ```
    /// use brick_types::{Matrix4, Point3, ShapeGeometry, Vector3, Vertex};
    ///
    /// let mut geometry = ShapeGeometry::new();
    /// geometry.vertices.push(Vertex::with_normal(Point3::new(1.0, 0.0, 0.0), Vector3::x()));
    ///
    /// let shift = Matrix4::new_translation(&Vector3::new(0.0, 0.0, 5.0));
    /// geometry.apply_transform(&shift);
    ///
    /// assert_eq!(geometry.vertices[0].position, Point3::new(1.0, 0.0, 5.0));
    /// assert_eq!(geometry.vertices[0].normal, Some(Vector3::x()));
    /// ```
    pub fn apply_transform(&mut self, matrix: &Matrix4<f64>) {
        for vertex in &mut self.vertices {
            vertex.position = matrix.transform_point(&vertex.position);
            if let Some(normal) = vertex.normal.as_mut() {
                *normal = matrix.transform_vector(normal);
            }
        }
    }

    /// Return a transformed copy, leaving `self` untouched.
    #[must_use]
    pub fn transformed(&self, matrix: &Matrix4<f64>) -> Self {
        let mut copy = self.clone();
        copy.apply_transform(matrix);
        copy
    }

    /// Compute the axis-aligned bounding box of all vertex positions.
    #[must_use]
    pub fn bounds(&self) -> Aabb {
        Aabb::from_points(self.vertices.iter().map(|v| &v.position))
    }
}
