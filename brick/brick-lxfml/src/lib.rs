//! LXFML brick model loading.
//!
//! Turns a brick model document into renderable geometry: one merged
//! triangle batch per material.
//!
//! Loading a document:
//!
//! 1. checks that the store is a brick asset archive and that the document
//!    declares the supported format version,
//! 2. loads the archive's material table,
//! 3. for every part, resolves its material, fetches its shape and moves it
//!    into world space with the part's placement,
//! 4. merges parts that share a material into one batch.
//!
//! Any failure aborts the load with a [`LoadError`]; [`LoadError::kind`]
//! classifies it.
//!
//! # Example
//!
//! ```
//! use brick_archive::{MemoryStore, encode_shape};
//! use brick_lxfml::load_document;
//! use brick_types::{ShapeGeometry, Vertex};
//!
//! let mut triangle = ShapeGeometry::new();
//! triangle.vertices.push(Vertex::from_coords(0.0, 0.0, 0.0));
//! triangle.vertices.push(Vertex::from_coords(1.0, 0.0, 0.0));
//! triangle.vertices.push(Vertex::from_coords(0.0, 1.0, 0.0));
//! triangle.faces.push([0, 1, 2]);
//!
//! let mut store = MemoryStore::new();
//! store.insert("/info.xml", b"<ApplicationInfo/>".to_vec()).unwrap();
//! store
//!     .insert("/Materials.xml", br#"<Materials><Material MatID="21" Red="180" Green="0" Blue="0"/></Materials>"#.to_vec())
//!     .unwrap();
//! store.insert("/Primitives/LOD0/3001.g", encode_shape(&triangle).unwrap()).unwrap();
//!
//! let document = r#"<LXFML versionMajor="5">
//!   <Bricks>
//!     <Brick><Part designID="3001" materials="21"><Bone transformation="1,0,0,0,1,0,0,0,1,0,0,8"/></Part></Brick>
//!   </Bricks>
//! </LXFML>"#;
//!
//! let mesh = load_document(document, &store).unwrap();
//! assert_eq!(mesh.batch_count(), 1);
//! assert_eq!(mesh.batch_for(21).unwrap().geometry.vertices[0].position.z, 8.0);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]

mod aggregate;
mod config;
mod document;
mod error;
mod lxf;
mod part;
mod resolve;
mod transform;
mod walker;

pub use aggregate::{GeometryAggregator, aggregate};
pub use config::{LoaderConfig, MATERIALS_PATH, PRIMITIVES_DIR, SENTINEL_PATH, SUPPORTED_MAJOR_VERSION};
pub use document::{
    BONE_TAG, BRICK_TAG, BRICKS_TAG, DESIGN_ID_ATTR, Element, LXFML_TAG, MATERIALS_ATTR,
    PART_TAG, TRANSFORMATION_ATTR, VERSION_MAJOR_ATTR, parse_document,
};
pub use error::{ErrorKind, LoadError, LoadResult};
pub use lxf::{read_lxf_document, read_lxf_from};
pub use part::load_part;
pub use resolve::{parse_shape_id, resolve_material};
pub use transform::{AFFINE_PARAMETER_COUNT, affine_from_parameters, decode_transformation};
pub use walker::{check_preconditions, walk_document};

use std::path::Path;

use brick_archive::KeyedStore;
use brick_types::BrickMesh;

/// Load a document from its XML text with the default configuration.
///
/// # Errors
///
/// Returns an error if the text is not valid XML or the document fails to
/// load; see [`walk_document`].
pub fn load_document<S: KeyedStore + ?Sized>(source: &str, store: &S) -> LoadResult<BrickMesh> {
    load_document_with_config(source, store, &LoaderConfig::default())
}

/// Load a document from its XML text.
///
/// # Errors
///
/// Returns an error if the text is not valid XML or the document fails to
/// load; see [`walk_document`].
pub fn load_document_with_config<S: KeyedStore + ?Sized>(
    source: &str,
    store: &S,
    config: &LoaderConfig,
) -> LoadResult<BrickMesh> {
    let root = parse_document(source)?;
    load_element(&root, store, config)
}

/// Load an already parsed document.
///
/// # Errors
///
/// See [`walk_document`].
pub fn load_element<S: KeyedStore + ?Sized>(
    root: &Element,
    store: &S,
    config: &LoaderConfig,
) -> LoadResult<BrickMesh> {
    walk_document(root, store, config)
}

/// Load a `.lxfml` file from disk.
///
/// # Errors
///
/// Returns [`LoadError::Io`] if the file cannot be read, or any error from
/// [`load_document`].
///
/// # Example
///
/// ```no_run
/// use brick_archive::DirectoryStore;
/// use brick_lxfml::load_lxfml_file;
///
/// let store = DirectoryStore::open("assets").unwrap();
/// let mesh = load_lxfml_file("house.lxfml", &store).unwrap();
/// println!("{} batches", mesh.batch_count());
/// ```
pub fn load_lxfml_file<P: AsRef<Path>, S: KeyedStore + ?Sized>(
    path: P,
    store: &S,
) -> LoadResult<BrickMesh> {
    let path = path.as_ref();
    let source = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    load_document(&source, store)
}

/// Load the document inside a `.lxf` file.
///
/// # Errors
///
/// Returns any error from [`read_lxf_document`] or [`load_document`].
///
/// # Example
///
/// ```no_run
/// use brick_archive::MemoryStore;
/// use brick_lxfml::load_lxf;
///
/// let store = MemoryStore::open_zip("assets.zip").unwrap();
/// let mesh = load_lxf("house.lxf", &store).unwrap();
/// ```
pub fn load_lxf<P: AsRef<Path>, S: KeyedStore + ?Sized>(path: P, store: &S) -> LoadResult<BrickMesh> {
    let source = read_lxf_document(path)?;
    load_document(&source, store)
}
