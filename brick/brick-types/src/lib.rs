//! Core value types for loading brick models.
//!
//! This crate provides the data that flows through the brick loading
//! pipeline:
//!
//! - [`Vertex`] - A point in 3D space with an optional normal and texture coordinate
//! - [`ShapeGeometry`] - Indexed triangle geometry for one shape (or a merged batch)
//! - [`Material`] - A resolved visual-appearance record, usable as a map key
//! - [`GeometryWithMaterial`] - Geometry paired with the material it is drawn with
//! - [`BrickMesh`] - The loaded model: one batch per distinct material
//! - [`Aabb`] - Axis-aligned bounding box
//!
//! This crate has no I/O of its own; decoding lives in `brick-archive` and
//! document loading in `brick-lxfml`, both of which build on these types.
//!
//! # Coordinate System
//!
//! Coordinates are `f64` and unit-agnostic. Shapes are stored in local shape
//! space; [`ShapeGeometry::apply_transform`] moves them into world space with
//! a column-major homogeneous 4x4 matrix.
//!
//! # Example
//!
//! ```
//! use brick_types::{GeometryWithMaterial, Material, MaterialColor, ShapeGeometry, Vertex};
//!
//! let red = Material::new(21, MaterialColor::new(180, 0, 0, 255));
//!
//! let mut geometry = ShapeGeometry::new();
//! geometry.vertices.push(Vertex::from_coords(0.0, 0.0, 0.0));
//! geometry.vertices.push(Vertex::from_coords(1.0, 0.0, 0.0));
//! geometry.vertices.push(Vertex::from_coords(0.0, 1.0, 0.0));
//! geometry.faces.push([0, 1, 2]);
//!
//! let mut batch = GeometryWithMaterial::new(geometry.clone(), red.clone());
//! batch.merge(GeometryWithMaterial::new(geometry, red)).unwrap();
//!
//! assert_eq!(batch.geometry.vertex_count(), 6);
//! assert_eq!(batch.geometry.faces[1], [3, 4, 5]);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]

mod batch;
mod bounds;
mod error;
mod geometry;
mod material;
mod vertex;

pub use batch::{BrickMesh, GeometryWithMaterial};
pub use bounds::Aabb;
pub use error::{GeometryError, GeometryResult};
pub use geometry::ShapeGeometry;
pub use material::{DEFAULT_MATERIAL_TYPE, Material, MaterialColor, MaterialId};
pub use vertex::Vertex;

// Re-export nalgebra types for convenience
pub use nalgebra::{Matrix4, Point3, Vector3};
