//! Archive access for brick model loading.
//!
//! A brick model refers to shapes and materials by identifier; the data
//! behind those identifiers lives in an asset archive. This crate provides:
//!
//! - [`KeyedStore`] - Read-only, path-keyed access to archive entries
//! - [`MemoryStore`] / [`DirectoryStore`] - In-memory (or zip-backed) and
//!   directory-backed stores
//! - [`decode_materials`] - The XML material table
//! - [`decode_shape`] / [`load_shape`] - Binary `.g` shape geometry
//!
//! Entries decode into `brick-types` values; `brick-lxfml` drives the
//! lookups from a model document.
//!
//! # Example
//!
//! ```
//! use brick_archive::{MemoryStore, encode_shape, load_materials, load_shape};
//! use brick_types::{ShapeGeometry, Vertex};
//!
//! let mut triangle = ShapeGeometry::new();
//! triangle.vertices.push(Vertex::from_coords(0.0, 0.0, 0.0));
//! triangle.vertices.push(Vertex::from_coords(1.0, 0.0, 0.0));
//! triangle.vertices.push(Vertex::from_coords(0.0, 1.0, 0.0));
//! triangle.faces.push([0, 1, 2]);
//!
//! let mut store = MemoryStore::new();
//! store.insert("/Primitives/LOD0/3001.g", encode_shape(&triangle).unwrap()).unwrap();
//! store
//!     .insert("/Materials.xml", br#"<Materials><Material MatID="21" Red="180" Green="0" Blue="0"/></Materials>"#.to_vec())
//!     .unwrap();
//!
//! let shape = load_shape(&store, "/Primitives/LOD0", 3001).unwrap();
//! assert_eq!(shape.face_count(), 1);
//!
//! let materials = load_materials(&store, "/Materials.xml").unwrap();
//! assert!(materials.contains_key(&21));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]

mod error;
mod materials;
mod shape;
mod store;

pub use error::{ArchiveError, ArchiveResult};
pub use materials::{MaterialTable, decode_materials, load_materials};
pub use shape::{
    SHAPE_MAGIC, ShapeId, TEXTURE_COORDS_FLAG, decode_shape, encode_shape, load_shape,
    shape_entry_path,
};
pub use store::{DirectoryStore, KeyedStore, MemoryStore, normalize_path};
