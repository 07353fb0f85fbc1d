//! Document traversal.
//!
//! Loading happens in three steps:
//!
//! 1. **Preconditions** - the store must carry the sentinel entry and the
//!    document must declare the supported major version. Nothing else is
//!    read from the store until both hold.
//! 2. **Materials** - the material table is loaded once.
//! 3. **Parts** - every `Part` of every `Brick` under `Bricks` is loaded in
//!    document order and folded into per-material batches.
//!
//! The first failure aborts the load; there is no partial result.

use brick_archive::{ArchiveError, KeyedStore, MaterialTable, load_materials};
use brick_types::BrickMesh;
use tracing::{debug, info, warn};

use crate::aggregate::GeometryAggregator;
use crate::config::LoaderConfig;
use crate::document::{
    BRICK_TAG, BRICKS_TAG, DESIGN_ID_ATTR, Element, LXFML_TAG, PART_TAG, VERSION_MAJOR_ATTR,
};
use crate::error::{LoadError, LoadResult};
use crate::part::load_part;
use crate::resolve::parse_shape_id;

/// Walk a parsed document and build its mesh.
///
/// # Errors
///
/// - [`LoadError::MissingSentinel`], [`LoadError::UnsupportedVersion`] or
///   [`LoadError::MissingMaterialTable`] if a precondition fails
/// - [`LoadError::MissingChild`] if the root has no `Bricks` element
/// - [`LoadError::Part`] wrapping the first part that fails to load
pub fn walk_document<S: KeyedStore + ?Sized>(
    root: &Element,
    store: &S,
    config: &LoaderConfig,
) -> LoadResult<BrickMesh> {
    check_preconditions(root, store, config)?;
    let materials = load_material_table(store, config)?;

    let bricks = root.first_child(BRICKS_TAG).ok_or_else(|| LoadError::MissingChild {
        parent: root.name().to_string(),
        child: BRICKS_TAG,
    })?;

    let mut aggregator = GeometryAggregator::new();
    let mut part_count = 0usize;
    let mut brick_count = 0usize;

    for (brick_index, brick) in bricks.children_named(BRICK_TAG).enumerate() {
        brick_count += 1;
        for (part_index, part) in brick.children_named(PART_TAG).enumerate() {
            let wrap = |source: LoadError| LoadError::Part {
                brick_index,
                part_index,
                shape_id: part
                    .attribute(DESIGN_ID_ATTR)
                    .and_then(|v| parse_shape_id(v).ok()),
                source: Box::new(source),
            };

            let batch = load_part(part, store, &materials, config).map_err(wrap)?;
            aggregator
                .add(batch)
                .map_err(|e| wrap(LoadError::Geometry(e)))?;
            part_count += 1;
        }
    }

    let mesh = aggregator.finish();
    info!(
        "Loaded {} parts in {} bricks: {} material batches, {} vertices, {} faces",
        part_count,
        brick_count,
        mesh.batch_count(),
        mesh.vertex_count(),
        mesh.face_count()
    );
    Ok(mesh)
}

/// Check the sentinel entry and the document version.
///
/// Only [`KeyedStore::has_entry`] is called on the store.
///
/// # Errors
///
/// Returns [`LoadError::MissingSentinel`] or [`LoadError::UnsupportedVersion`].
pub fn check_preconditions<S: KeyedStore + ?Sized>(
    root: &Element,
    store: &S,
    config: &LoaderConfig,
) -> LoadResult<()> {
    if !store.has_entry(&config.sentinel_path) {
        return Err(LoadError::MissingSentinel {
            path: config.sentinel_path.clone(),
        });
    }

    let version = root.attribute(VERSION_MAJOR_ATTR);
    if version != Some(config.supported_major_version.as_str()) {
        return Err(LoadError::UnsupportedVersion {
            expected: config.supported_major_version.clone(),
            found: version.map(str::to_string),
        });
    }

    if root.name() != LXFML_TAG {
        warn!("Root element is <{}>, expected <{}>", root.name(), LXFML_TAG);
    }
    Ok(())
}

fn load_material_table<S: KeyedStore + ?Sized>(
    store: &S,
    config: &LoaderConfig,
) -> LoadResult<MaterialTable> {
    let materials = load_materials(store, &config.materials_path).map_err(|e| match e {
        ArchiveError::EntryNotFound { .. } => LoadError::MissingMaterialTable {
            path: config.materials_path.clone(),
        },
        other => LoadError::Archive(other),
    })?;
    debug!(
        "Loaded {} materials from {}",
        materials.len(),
        config.materials_path
    );
    Ok(materials)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;
    use brick_archive::{MemoryStore, encode_shape};
    use brick_types::{ShapeGeometry, Vertex};

    const MATERIALS: &str = r#"<Materials>
        <Material MatID="1" Red="244" Green="244" Blue="244"/>
        <Material MatID="21" Red="180" Green="0" Blue="0"/>
    </Materials>"#;

    fn triangle() -> ShapeGeometry {
        ShapeGeometry::from_parts(
            vec![
                Vertex::from_coords(0.0, 0.0, 0.0),
                Vertex::from_coords(1.0, 0.0, 0.0),
                Vertex::from_coords(0.0, 1.0, 0.0),
            ],
            vec![[0, 1, 2]],
        )
    }

    fn store() -> MemoryStore {
        let mut store = MemoryStore::new();
        store.insert("/info.xml", b"<ApplicationInfo/>".to_vec()).unwrap();
        store.insert("/Materials.xml", MATERIALS.as_bytes()).unwrap();
        store
            .insert("/Primitives/LOD0/3001.g", encode_shape(&triangle()).unwrap())
            .unwrap();
        store
    }

    fn part(design: &str, materials: &str) -> Element {
        Element::new("Part")
            .with_attribute("designID", design)
            .with_attribute("materials", materials)
            .with_child(
                Element::new("Bone").with_attribute("transformation", "1,0,0,0,1,0,0,0,1,0,0,0"),
            )
    }

    fn document(bricks: Vec<Element>) -> Element {
        let mut container = Element::new("Bricks");
        for brick in bricks {
            container.push_child(brick);
        }
        Element::new("LXFML")
            .with_attribute("versionMajor", "5")
            .with_child(container)
    }

    #[test]
    fn merges_parts_across_bricks() {
        let root = document(vec![
            Element::new("Brick").with_child(part("3001", "21")),
            Element::new("Brick")
                .with_child(part("3001", "1"))
                .with_child(part("3001", "21")),
        ]);

        let mesh = walk_document(&root, &store(), &LoaderConfig::default()).unwrap();
        assert_eq!(mesh.batch_count(), 2);
        assert_eq!(mesh.batch_for(21).unwrap().geometry.face_count(), 2);
        assert_eq!(mesh.batch_for(1).unwrap().geometry.face_count(), 1);
    }

    #[test]
    fn non_part_children_are_skipped() {
        let root = document(vec![
            Element::new("Brick")
                .with_child(Element::new("Decoration"))
                .with_child(part("3001", "21")),
            Element::new("Group"),
        ]);
        let mesh = walk_document(&root, &store(), &LoaderConfig::default()).unwrap();
        assert_eq!(mesh.face_count(), 1);
    }

    #[test]
    fn empty_bricks_give_empty_mesh() {
        let mesh = walk_document(&document(Vec::new()), &store(), &LoaderConfig::default()).unwrap();
        assert!(mesh.is_empty());
    }

    #[test]
    fn missing_sentinel_is_precondition() {
        let mut store = MemoryStore::new();
        store.insert("/Materials.xml", MATERIALS.as_bytes()).unwrap();
        let err = walk_document(&document(Vec::new()), &store, &LoaderConfig::default()).unwrap_err();
        assert!(matches!(err, LoadError::MissingSentinel { .. }));
        assert_eq!(err.kind(), ErrorKind::Precondition);
    }

    #[test]
    fn version_must_match() {
        let store = store();
        for version in [Some("4"), Some("6"), Some(""), Some(" 5"), Some("5 "), None] {
            let mut root = Element::new("LXFML").with_child(Element::new("Bricks"));
            if let Some(v) = version {
                root.set_attribute("versionMajor", v);
            }
            let err = walk_document(&root, &store, &LoaderConfig::default()).unwrap_err();
            assert!(matches!(err, LoadError::UnsupportedVersion { .. }), "{version:?}");
        }
    }

    #[test]
    fn configured_version_is_honored() {
        let root = Element::new("LXFML")
            .with_attribute("versionMajor", "6")
            .with_child(Element::new("Bricks"));
        let config = LoaderConfig::default().with_supported_major_version("6");
        assert!(walk_document(&root, &store(), &config).is_ok());
    }

    #[test]
    fn missing_material_table_is_precondition() {
        let mut store = MemoryStore::new();
        store.insert("/info.xml", Vec::new()).unwrap();
        let err = walk_document(&document(Vec::new()), &store, &LoaderConfig::default()).unwrap_err();
        assert!(matches!(err, LoadError::MissingMaterialTable { .. }));
    }

    #[test]
    fn malformed_material_table_is_format() {
        let mut store = store();
        store.insert("/Materials.xml", b"<Materials><Material/>".to_vec()).unwrap();
        let err = walk_document(&document(Vec::new()), &store, &LoaderConfig::default()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Format);
    }

    #[test]
    fn missing_bricks_is_missing_child() {
        let root = Element::new("LXFML").with_attribute("versionMajor", "5");
        let err = walk_document(&root, &store(), &LoaderConfig::default()).unwrap_err();
        assert!(matches!(err, LoadError::MissingChild { child: "Bricks", .. }));
    }

    #[test]
    fn part_failure_carries_position() {
        let root = document(vec![
            Element::new("Brick").with_child(part("3001", "21")),
            Element::new("Brick")
                .with_child(part("3001", "21"))
                .with_child(part("3001", "99")),
        ]);

        let err = walk_document(&root, &store(), &LoaderConfig::default()).unwrap_err();
        match &err {
            LoadError::Part {
                brick_index,
                part_index,
                shape_id,
                ..
            } => {
                assert_eq!((*brick_index, *part_index), (1, 1));
                assert_eq!(*shape_id, Some(3001));
            }
            other => panic!("expected a part error, got {other}"),
        }
        assert_eq!(err.kind(), ErrorKind::Reference);
        assert!(matches!(err.root_cause(), LoadError::UnknownMaterial { id: 99 }));
    }
}
