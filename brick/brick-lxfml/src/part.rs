//! Loading a single part.

use brick_archive::{ArchiveError, KeyedStore, MaterialTable, load_shape, shape_entry_path};
use brick_types::GeometryWithMaterial;
use tracing::debug;

use crate::config::LoaderConfig;
use crate::document::{
    BONE_TAG, DESIGN_ID_ATTR, Element, MATERIALS_ATTR, TRANSFORMATION_ATTR,
};
use crate::error::{LoadError, LoadResult};
use crate::resolve::{parse_shape_id, resolve_material};
use crate::transform::decode_transformation;

/// Load one `Part` element into world-space geometry with its material.
///
/// The part's shape is fetched from the store, then moved into place by the
/// `Bone` child's transformation: positions get the full affine transform,
/// normals only the linear block.
///
/// # Errors
///
/// - [`LoadError::MissingAttribute`] / [`LoadError::InvalidAttribute`] for a
///   missing or malformed `designID` or `materials`, or a missing
///   `transformation`
/// - [`LoadError::InvalidTransformToken`] / [`LoadError::TooManyTransformValues`]
///   for a malformed `transformation`
/// - [`LoadError::UnknownMaterial`] if the material is not in `materials`
/// - [`LoadError::MissingChild`] if there is no `Bone` child
/// - [`LoadError::ShapeNotFound`] if the shape has no archive entry
/// - [`LoadError::Archive`] if the shape data is malformed
pub fn load_part<S: KeyedStore + ?Sized>(
    part: &Element,
    store: &S,
    materials: &MaterialTable,
    config: &LoaderConfig,
) -> LoadResult<GeometryWithMaterial> {
    let shape_id = parse_shape_id(required_attribute(part, DESIGN_ID_ATTR)?)?;
    let material = resolve_material(required_attribute(part, MATERIALS_ATTR)?, materials)?;

    let bone = part.first_child(BONE_TAG).ok_or_else(|| LoadError::MissingChild {
        parent: part.name().to_string(),
        child: BONE_TAG,
    })?;
    let transform = decode_transformation(required_attribute(bone, TRANSFORMATION_ATTR)?)?;

    let mut geometry =
        load_shape(store, &config.primitives_dir, shape_id).map_err(|e| match e {
            ArchiveError::EntryNotFound { .. } => LoadError::ShapeNotFound {
                shape_id,
                path: shape_entry_path(&config.primitives_dir, shape_id, 0),
            },
            other => LoadError::Archive(other),
        })?;
    geometry.apply_transform(&transform);

    debug!(
        "Loaded part: shape {} material {} ({} vertices, {} faces)",
        shape_id,
        material.id(),
        geometry.vertex_count(),
        geometry.face_count()
    );

    Ok(GeometryWithMaterial::new(geometry, material.clone()))
}

fn required_attribute<'a>(element: &'a Element, attribute: &'static str) -> LoadResult<&'a str> {
    element
        .attribute(attribute)
        .ok_or_else(|| LoadError::MissingAttribute {
            element: element.name().to_string(),
            attribute,
        })
}
