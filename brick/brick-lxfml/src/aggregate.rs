//! Per-material geometry aggregation.

use brick_types::{BrickMesh, GeometryResult, GeometryWithMaterial, Material};
use hashbrown::HashMap;

/// Folds part geometry into one batch per material.
///
/// Parts are merged in the order they are added. Batches come out in the
/// order their material was first seen, so the same input always produces
/// the same mesh.
///
/// # Example
///
/// ```
/// use brick_lxfml::GeometryAggregator;
/// use brick_types::{GeometryWithMaterial, Material, MaterialColor, ShapeGeometry, Vertex};
///
/// let red = Material::new(21, MaterialColor::opaque(180, 0, 0));
/// let mut triangle = ShapeGeometry::new();
/// triangle.vertices.extend([
///     Vertex::from_coords(0.0, 0.0, 0.0),
///     Vertex::from_coords(1.0, 0.0, 0.0),
///     Vertex::from_coords(0.0, 1.0, 0.0),
/// ]);
/// triangle.faces.push([0, 1, 2]);
///
/// let mut aggregator = GeometryAggregator::new();
/// aggregator.add(GeometryWithMaterial::new(triangle.clone(), red.clone())).unwrap();
/// aggregator.add(GeometryWithMaterial::new(triangle, red)).unwrap();
///
/// let mesh = aggregator.finish();
/// assert_eq!(mesh.batch_count(), 1);
/// assert_eq!(mesh.face_count(), 2);
/// ```
#[derive(Debug, Clone, Default)]
pub struct GeometryAggregator {
    index: HashMap<Material, usize>,
    batches: Vec<GeometryWithMaterial>,
}

impl GeometryAggregator {
    /// Create an empty aggregator.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge a part's geometry into the batch for its material.
    ///
    /// # Errors
    ///
    /// Returns [`brick_types::GeometryError::TooManyVertices`] if the batch
    /// would outgrow `u32` indices. The aggregator is unchanged in that case.
    pub fn add(&mut self, part: GeometryWithMaterial) -> GeometryResult<()> {
        if let Some(&slot) = self.index.get(&part.material) {
            return self.batches[slot].merge(part);
        }
        self.index.insert(part.material.clone(), self.batches.len());
        self.batches.push(part);
        Ok(())
    }

    /// Number of distinct materials seen so far.
    #[must_use]
    pub fn batch_count(&self) -> usize {
        self.batches.len()
    }

    /// Check whether nothing has been added.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.batches.is_empty()
    }

    /// Finish aggregation and produce the mesh.
    #[must_use]
    pub fn finish(self) -> BrickMesh {
        BrickMesh::from_batches(self.batches)
    }
}

/// Aggregate a sequence of parts in one go.
///
/// # Errors
///
/// Returns the first merge failure from [`GeometryAggregator::add`].
pub fn aggregate<I>(parts: I) -> GeometryResult<BrickMesh>
where
    I: IntoIterator<Item = GeometryWithMaterial>,
{
    let mut aggregator = GeometryAggregator::new();
    for part in parts {
        aggregator.add(part)?;
    }
    Ok(aggregator.finish())
}

#[cfg(test)]
mod tests {
    use super::*;
    use brick_types::{MaterialColor, ShapeGeometry, Vertex};

    fn material(id: i32) -> Material {
        Material::new(id, MaterialColor::opaque(10, 20, 30))
    }

    fn triangle(x: f64) -> ShapeGeometry {
        ShapeGeometry::from_parts(
            vec![
                Vertex::from_coords(x, 0.0, 0.0),
                Vertex::from_coords(x + 1.0, 0.0, 0.0),
                Vertex::from_coords(x, 1.0, 0.0),
            ],
            vec![[0, 1, 2]],
        )
    }

    #[test]
    fn same_material_merges_in_order() {
        let mesh = aggregate([
            GeometryWithMaterial::new(triangle(0.0), material(1)),
            GeometryWithMaterial::new(triangle(5.0), material(1)),
        ])
        .unwrap();

        assert_eq!(mesh.batch_count(), 1);
        let batch = mesh.batch_for(1).unwrap();
        assert_eq!(batch.geometry.faces, vec![[0, 1, 2], [3, 4, 5]]);
        assert!((batch.geometry.vertices[0].position.x - 0.0).abs() < f64::EPSILON);
        assert!((batch.geometry.vertices[3].position.x - 5.0).abs() < f64::EPSILON);
    }

    #[test]
    fn batches_follow_first_seen_order() {
        let mesh = aggregate([
            GeometryWithMaterial::new(triangle(0.0), material(9)),
            GeometryWithMaterial::new(triangle(1.0), material(2)),
            GeometryWithMaterial::new(triangle(2.0), material(9)),
            GeometryWithMaterial::new(triangle(3.0), material(5)),
        ])
        .unwrap();

        let ids: Vec<_> = mesh.materials().map(Material::id).collect();
        assert_eq!(ids, [9, 2, 5]);
        assert_eq!(mesh.batch_for(9).unwrap().geometry.face_count(), 2);
    }

    #[test]
    fn materials_differing_only_in_type_stay_apart() {
        let glossy = material(1);
        let matte = material(1).with_material_type("metallic");

        let mut aggregator = GeometryAggregator::new();
        aggregator.add(GeometryWithMaterial::new(triangle(0.0), glossy)).unwrap();
        aggregator.add(GeometryWithMaterial::new(triangle(0.0), matte)).unwrap();
        assert_eq!(aggregator.batch_count(), 2);
    }

    #[test]
    fn empty_input_gives_empty_mesh() {
        let aggregator = GeometryAggregator::new();
        assert!(aggregator.is_empty());
        assert!(aggregator.finish().is_empty());
    }
}
