//! Zip-backed store tests.
//!
//! Builds small asset archives on disk and reads them back through
//! [`MemoryStore::open_zip`].

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::fs::File;
use std::io::Write;
use std::path::Path;

use brick_archive::{
    ArchiveError, KeyedStore, MemoryStore, encode_shape, load_materials, load_shape,
};
use brick_types::{ShapeGeometry, Vertex};
use tempfile::tempdir;
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

fn triangle() -> ShapeGeometry {
    let mut geometry = ShapeGeometry::new();
    geometry.vertices.push(Vertex::from_coords(0.0, 0.0, 0.0));
    geometry.vertices.push(Vertex::from_coords(1.0, 0.0, 0.0));
    geometry.vertices.push(Vertex::from_coords(0.0, 1.0, 0.0));
    geometry.faces.push([0, 1, 2]);
    geometry
}

fn write_zip(path: &Path, entries: &[(&str, Vec<u8>)]) {
    let file = File::create(path).expect("create zip");
    let mut zip = ZipWriter::new(file);
    let options = SimpleFileOptions::default().compression_method(zip::CompressionMethod::Deflated);

    zip.add_directory("Primitives/", options).unwrap();
    for (name, bytes) in entries {
        zip.start_file(*name, options).unwrap();
        zip.write_all(bytes).unwrap();
    }
    zip.finish().unwrap();
}

#[test]
fn zip_entries_are_served_by_path() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("assets.zip");
    write_zip(
        &path,
        &[
            ("info.xml", b"<info/>".to_vec()),
            (
                "Materials.xml",
                br#"<Materials><Material MatID="1" Red="1" Green="2" Blue="3"/></Materials>"#.to_vec(),
            ),
            ("Primitives/LOD0/3001.g", encode_shape(&triangle()).unwrap()),
        ],
    );

    let store = MemoryStore::open_zip(&path).unwrap();

    // The directory entry is skipped.
    assert_eq!(store.len(), 3);
    assert!(store.has_entry("/info.xml"));
    assert!(!store.has_entry("/Primitives"));

    let materials = load_materials(&store, "/Materials.xml").unwrap();
    assert_eq!(materials[&1].color().b, 3);

    let shape = load_shape(&store, "/Primitives/LOD0", 3001).unwrap();
    assert_eq!(shape.faces, triangle().faces);
    assert_eq!(shape.vertices[1].position, triangle().vertices[1].position);
    // Shape files always carry normals.
    assert!(shape.vertices.iter().all(|v| v.normal.is_some()));
}

#[test]
fn missing_zip_is_archive_not_found() {
    let dir = tempdir().unwrap();
    let result = MemoryStore::open_zip(dir.path().join("missing.zip"));
    assert!(matches!(result, Err(ArchiveError::ArchiveNotFound { .. })));
}

#[test]
fn non_zip_data_is_zip_error() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("broken.zip");
    std::fs::write(&path, b"definitely not a zip").unwrap();

    let result = MemoryStore::open_zip(&path);
    assert!(matches!(result, Err(ArchiveError::Zip { .. })));
}
