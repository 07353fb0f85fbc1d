//! Shape geometry decoding.
//!
//! Each shape lives in the archive as a little-endian binary `.g` file:
//!
//! | Field          | Size                      | Notes                                    |
//! |----------------|---------------------------|------------------------------------------|
//! | magic          | 4 bytes                   | `10GB`                                   |
//! | `vertex_count` | u32                       |                                          |
//! | `index_count`  | u32                       | multiple of 3                            |
//! | options        | u32                       | `options & 0x3 == 0x3`: texture coords   |
//! | positions      | `vertex_count` * 3 * f32  |                                          |
//! | normals        | `vertex_count` * 3 * f32  |                                          |
//! | uvs            | `vertex_count` * 2 * f32  | only when flagged                        |
//! | indices        | `index_count` * u32       |                                          |
//!
//! Anything after the indices (bone and edge tables) is ignored.
//!
//! Shapes made of several pieces continue in `.g1`, `.g2`, ... next to the
//! base `.g` file; [`load_shape`] reads them in order and merges them.

use brick_types::{Point3, ShapeGeometry, Vector3, Vertex};
use tracing::debug;

use crate::error::{ArchiveError, ArchiveResult};
use crate::store::KeyedStore;

/// Integer identifier of a shape (design) in the archive.
pub type ShapeId = i32;

/// Magic bytes at the start of every shape file.
pub const SHAPE_MAGIC: [u8; 4] = *b"10GB";

/// Option bits marking the presence of texture coordinates.
pub const TEXTURE_COORDS_FLAG: u32 = 0x3;

const HEADER_SIZE: usize = 16;
const ENTRY: &str = "shape geometry";

/// Decode one shape file.
///
/// Positions and normals are widened from `f32` to `f64`.
///
/// # Errors
///
/// - [`ArchiveError::InvalidContent`] for a bad magic, an index count that is
///   not a multiple of 3, or an index referring past the vertex array
/// - [`ArchiveError::UnexpectedEof`] if the data ends early
pub fn decode_shape(bytes: &[u8]) -> ArchiveResult<ShapeGeometry> {
    decode_shape_entry(bytes, ENTRY)
}

/// Archive path of a shape piece: `{dir}/{id}.g` for piece 0, `{dir}/{id}.g{n}` after.
///
/// # Example
///
/// ```
/// use brick_archive::shape_entry_path;
///
/// assert_eq!(shape_entry_path("/Primitives/LOD0", 3001, 0), "/Primitives/LOD0/3001.g");
/// assert_eq!(shape_entry_path("/Primitives/LOD0/", 3001, 2), "/Primitives/LOD0/3001.g2");
/// ```
#[must_use]
pub fn shape_entry_path(primitives_dir: &str, shape_id: ShapeId, piece: u32) -> String {
    let dir = primitives_dir.trim_end_matches('/');
    if piece == 0 {
        format!("{dir}/{shape_id}.g")
    } else {
        format!("{dir}/{shape_id}.g{piece}")
    }
}

/// Fetch and decode a shape, including its continuation pieces.
///
/// # Errors
///
/// Returns [`ArchiveError::EntryNotFound`] if the base `.g` entry is missing,
/// or a decoding error for any piece.
pub fn load_shape<S: KeyedStore + ?Sized>(
    store: &S,
    primitives_dir: &str,
    shape_id: ShapeId,
) -> ArchiveResult<ShapeGeometry> {
    let base = shape_entry_path(primitives_dir, shape_id, 0);
    let bytes = store.read_entry(&base)?;
    let mut geometry = decode_shape_entry(&bytes, &base)?;

    let mut piece = 1;
    loop {
        let path = shape_entry_path(primitives_dir, shape_id, piece);
        if !store.has_entry(&path) {
            break;
        }
        let bytes = store.read_entry(&path)?;
        let extra = decode_shape_entry(&bytes, &path)?;
        geometry
            .merge(&extra)
            .map_err(|e| ArchiveError::invalid_content(&path, e.to_string()))?;
        piece += 1;
    }

    debug!(
        "Loaded shape {} ({} pieces, {} vertices, {} faces)",
        shape_id,
        piece,
        geometry.vertex_count(),
        geometry.face_count()
    );
    Ok(geometry)
}

/// Encode geometry as a shape file.
///
/// Vertices without a normal are written with a zero normal. Texture
/// coordinates are written (and flagged) when any vertex has one; vertices
/// without one get `(0, 0)`. Coordinates are narrowed to `f32`.
///
/// # Errors
///
/// Returns [`ArchiveError::InvalidContent`] if the vertex or index count does
/// not fit in `u32`.
pub fn encode_shape(geometry: &ShapeGeometry) -> ArchiveResult<Vec<u8>> {
    let vertex_count = u32::try_from(geometry.vertex_count())
        .map_err(|_| ArchiveError::invalid_content(ENTRY, "too many vertices"))?;
    let index_count = u32::try_from(geometry.face_count() * 3)
        .map_err(|_| ArchiveError::invalid_content(ENTRY, "too many indices"))?;
    let has_uvs = geometry.vertices.iter().any(|v| v.uv.is_some());
    let options = if has_uvs { TEXTURE_COORDS_FLAG } else { 0 };

    let per_vertex = if has_uvs { 32 } else { 24 };
    let mut out = Vec::with_capacity(
        HEADER_SIZE + geometry.vertex_count() * per_vertex + geometry.face_count() * 12,
    );
    out.extend_from_slice(&SHAPE_MAGIC);
    out.extend_from_slice(&vertex_count.to_le_bytes());
    out.extend_from_slice(&index_count.to_le_bytes());
    out.extend_from_slice(&options.to_le_bytes());

    for v in &geometry.vertices {
        push_f32(&mut out, v.position.x);
        push_f32(&mut out, v.position.y);
        push_f32(&mut out, v.position.z);
    }
    for v in &geometry.vertices {
        let n = v.normal.unwrap_or_else(Vector3::zeros);
        push_f32(&mut out, n.x);
        push_f32(&mut out, n.y);
        push_f32(&mut out, n.z);
    }
    if has_uvs {
        for v in &geometry.vertices {
            let [u, w] = v.uv.unwrap_or([0.0, 0.0]);
            push_f32(&mut out, u);
            push_f32(&mut out, w);
        }
    }
    for index in geometry.faces.iter().flatten() {
        out.extend_from_slice(&index.to_le_bytes());
    }

    Ok(out)
}

#[allow(clippy::cast_possible_truncation)]
// Truncation: the file format stores f32
fn push_f32(out: &mut Vec<u8>, value: f64) {
    out.extend_from_slice(&(value as f32).to_le_bytes());
}

fn decode_shape_entry(bytes: &[u8], entry: &str) -> ArchiveResult<ShapeGeometry> {
    let mut reader = ByteReader::new(bytes, entry);

    let magic = reader.take(4)?;
    if magic != SHAPE_MAGIC {
        return Err(ArchiveError::invalid_content(
            entry,
            format!("bad magic {magic:02x?}, expected \"10GB\""),
        ));
    }

    let vertex_count = reader.read_u32()? as usize;
    let index_count = reader.read_u32()? as usize;
    let options = reader.read_u32()?;
    let has_uvs = options & TEXTURE_COORDS_FLAG == TEXTURE_COORDS_FLAG;

    if index_count % 3 != 0 {
        return Err(ArchiveError::invalid_content(
            entry,
            format!("index count {index_count} is not a multiple of 3"),
        ));
    }

    // Reject impossible counts before allocating for them.
    let per_vertex = if has_uvs { 32 } else { 24 };
    let required = vertex_count
        .checked_mul(per_vertex)
        .and_then(|v| index_count.checked_mul(4).and_then(|i| v.checked_add(i)));
    match required {
        Some(n) if n <= reader.remaining() => {}
        _ => {
            return Err(ArchiveError::UnexpectedEof {
                entry: entry.to_string(),
                position: bytes.len(),
            });
        }
    }

    let mut positions = Vec::with_capacity(vertex_count);
    for _ in 0..vertex_count {
        let [x, y, z] = reader.read_vec3()?;
        positions.push(Point3::new(x, y, z));
    }

    let mut vertices = Vec::with_capacity(vertex_count);
    for position in positions {
        let [x, y, z] = reader.read_vec3()?;
        vertices.push(Vertex::with_normal(position, Vector3::new(x, y, z)));
    }

    if has_uvs {
        for vertex in &mut vertices {
            let u = reader.read_f32()?;
            let v = reader.read_f32()?;
            vertex.uv = Some([u, v]);
        }
    }

    let mut faces = Vec::with_capacity(index_count / 3);
    for face in 0..index_count / 3 {
        let tri = [reader.read_u32()?, reader.read_u32()?, reader.read_u32()?];
        if let Some(&bad) = tri.iter().find(|&&i| i as usize >= vertex_count) {
            return Err(ArchiveError::invalid_content(
                entry,
                format!("face {face} references vertex {bad}, but only {vertex_count} vertices exist"),
            ));
        }
        faces.push(tri);
    }

    Ok(ShapeGeometry::from_parts(vertices, faces))
}

/// Little-endian cursor over a byte slice.
struct ByteReader<'a> {
    data: &'a [u8],
    pos: usize,
    entry: &'a str,
}

impl<'a> ByteReader<'a> {
    const fn new(data: &'a [u8], entry: &'a str) -> Self {
        Self { data, pos: 0, entry }
    }

    const fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    fn take(&mut self, len: usize) -> ArchiveResult<&'a [u8]> {
        let end = self.pos + len;
        let slice = self.data.get(self.pos..end).ok_or_else(|| ArchiveError::UnexpectedEof {
            entry: self.entry.to_string(),
            position: self.pos,
        })?;
        self.pos = end;
        Ok(slice)
    }

    fn read_u32(&mut self) -> ArchiveResult<u32> {
        let b = self.take(4)?;
        Ok(u32::from_le_bytes([b[0], b[1], b[2], b[3]]))
    }

    fn read_f32(&mut self) -> ArchiveResult<f64> {
        let b = self.take(4)?;
        Ok(f64::from(f32::from_le_bytes([b[0], b[1], b[2], b[3]])))
    }

    fn read_vec3(&mut self) -> ArchiveResult<[f64; 3]> {
        Ok([self.read_f32()?, self.read_f32()?, self.read_f32()?])
    }
}
