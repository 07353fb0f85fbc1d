//! Material batches and the loaded model.

use crate::{Aabb, GeometryError, GeometryResult, Material, MaterialId, ShapeGeometry};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Geometry paired with the material it is drawn with.
///
/// A freshly loaded part produces one of these; the aggregator then merges
/// all parts sharing a material into a single batch.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GeometryWithMaterial {
    /// World-space geometry.
    pub geometry: ShapeGeometry,

    /// The material all of `geometry` uses.
    pub material: Material,
}

impl GeometryWithMaterial {
    /// Pair geometry with a material.
    #[must_use]
    pub const fn new(geometry: ShapeGeometry, material: Material) -> Self {
        Self { geometry, material }
    }

    /// Append another batch of the same material.
    ///
    /// The other batch's vertices and faces follow this batch's, with face
    /// indices re-based (see [`ShapeGeometry::merge`]).
    ///
    /// # Errors
    ///
    /// - [`GeometryError::MaterialMismatch`] if the materials differ
    /// - [`GeometryError::TooManyVertices`] if the merged batch overflows `u32` indices
    pub fn merge(&mut self, other: Self) -> GeometryResult<()> {
        if self.material != other.material {
            return Err(GeometryError::MaterialMismatch {
                expected: self.material.id(),
                found: other.material.id(),
            });
        }
        if self.geometry.vertices.is_empty() {
            self.geometry = other.geometry;
            return Ok(());
        }
        self.geometry.merge(&other.geometry)
    }
}

/// A loaded brick model: one geometry batch per distinct material.
///
/// Batch order carries no meaning; look batches up by material instead.
///
/// # Example
///
/// ```
/// use brick_types::{BrickMesh, GeometryWithMaterial, Material, MaterialColor, ShapeGeometry};
///
/// let mesh = BrickMesh::from_batches(vec![GeometryWithMaterial::new(
///     ShapeGeometry::new(),
///     Material::new(1, MaterialColor::opaque(244, 244, 244)),
/// )]);
///
/// assert_eq!(mesh.batch_count(), 1);
/// assert!(mesh.batch_for(1).is_some());
/// assert!(mesh.batch_for(2).is_none());
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BrickMesh {
    batches: Vec<GeometryWithMaterial>,
}

impl BrickMesh {
    /// Create an empty model.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            batches: Vec::new(),
        }
    }

    /// Create a model from already-merged batches.
    #[must_use]
    pub const fn from_batches(batches: Vec<GeometryWithMaterial>) -> Self {
        Self { batches }
    }

    /// All batches.
    #[must_use]
    pub fn batches(&self) -> &[GeometryWithMaterial] {
        &self.batches
    }

    /// Consume the model, returning its batches.
    #[must_use]
    pub fn into_batches(self) -> Vec<GeometryWithMaterial> {
        self.batches
    }

    /// Iterate over batches.
    pub fn iter(&self) -> std::slice::Iter<'_, GeometryWithMaterial> {
        self.batches.iter()
    }

    /// Number of batches (distinct materials).
    #[must_use]
    pub fn batch_count(&self) -> usize {
        self.batches.len()
    }

    /// Check whether the model has no batches.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.batches.is_empty()
    }

    /// Find the batch for a material identifier.
    #[must_use]
    pub fn batch_for(&self, material_id: MaterialId) -> Option<&GeometryWithMaterial> {
        self.batches.iter().find(|b| b.material.id() == material_id)
    }

    /// Iterate over the materials used by the model.
    pub fn materials(&self) -> impl Iterator<Item = &Material> {
        self.batches.iter().map(|b| &b.material)
    }

    /// Total vertices across all batches.
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.batches.iter().map(|b| b.geometry.vertex_count()).sum()
    }

    /// Total triangles across all batches.
    #[must_use]
    pub fn face_count(&self) -> usize {
        self.batches.iter().map(|b| b.geometry.face_count()).sum()
    }

    /// World-space bounding box of the whole model.
    #[must_use]
    pub fn bounds(&self) -> Aabb {
        self.batches
            .iter()
            .fold(Aabb::empty(), |acc, b| acc.union(&b.geometry.bounds()))
    }
}

impl<'a> IntoIterator for &'a BrickMesh {
    type Item = &'a GeometryWithMaterial;
    type IntoIter = std::slice::Iter<'a, GeometryWithMaterial>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
