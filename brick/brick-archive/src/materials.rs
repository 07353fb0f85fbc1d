//! Material table decoding.
//!
//! The archive keeps every material in one XML table:
//!
//! ```xml
//! <Materials>
//!   <Material MatID="21" Red="180" Green="0" Blue="0" Alpha="255" MaterialType="shinyPlastic"/>
//!   <Material MatID="40" Red="238" Green="238" Blue="238" Alpha="128" MaterialType="transparent"/>
//! </Materials>
//! ```
//!
//! `MatID`, `Red`, `Green` and `Blue` are required. `Alpha` defaults to 255
//! and `MaterialType` to [`DEFAULT_MATERIAL_TYPE`]. Other elements and
//! attributes are ignored.

use brick_types::{DEFAULT_MATERIAL_TYPE, Material, MaterialColor, MaterialId};
use hashbrown::HashMap;
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use tracing::{debug, warn};

use crate::error::{ArchiveError, ArchiveResult};
use crate::store::KeyedStore;

/// Materials keyed by their identifier.
pub type MaterialTable = HashMap<MaterialId, Material>;

const ENTRY: &str = "material table";

/// Decode a material table.
///
/// When an identifier is defined twice the later definition wins.
///
/// # Errors
///
/// Returns [`ArchiveError::InvalidContent`] if the data is not UTF-8, is not
/// well-formed XML, or a `Material` element has a missing or malformed
/// attribute.
///
/// # Example
///
/// ```
/// use brick_archive::decode_materials;
///
/// let xml = br#"<Materials><Material MatID="21" Red="180" Green="0" Blue="0"/></Materials>"#;
/// let table = decode_materials(xml).unwrap();
///
/// let red = &table[&21];
/// assert_eq!(red.color().r, 180);
/// assert_eq!(red.color().a, 255);
/// ```
pub fn decode_materials(bytes: &[u8]) -> ArchiveResult<MaterialTable> {
    let content = std::str::from_utf8(bytes)
        .map_err(|e| ArchiveError::invalid_content(ENTRY, format!("invalid UTF-8: {e}")))?;
    let content = content.trim_start_matches('\u{feff}');

    let mut reader = Reader::from_str(content);
    reader.config_mut().trim_text(true);

    let mut table = MaterialTable::new();

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e) | Event::Empty(ref e)) => {
                if e.local_name().as_ref() == b"Material" {
                    let material = parse_material_element(e)?;
                    let id = material.id();
                    if table.insert(id, material).is_some() {
                        warn!("Material {} defined more than once; keeping the last definition", id);
                    }
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(ArchiveError::invalid_content(
                    ENTRY,
                    format!("XML parse error at byte {}: {e}", reader.buffer_position()),
                ));
            }
            _ => {}
        }
    }

    debug!("Decoded {} materials", table.len());
    Ok(table)
}

/// Read and decode the material table stored at `path`.
///
/// # Errors
///
/// Returns [`ArchiveError::EntryNotFound`] if the table is missing, or any
/// error from [`decode_materials`].
pub fn load_materials<S: KeyedStore + ?Sized>(store: &S, path: &str) -> ArchiveResult<MaterialTable> {
    let bytes = store.read_entry(path)?;
    decode_materials(&bytes)
}

/// Parse one `Material` element.
fn parse_material_element(element: &BytesStart<'_>) -> ArchiveResult<Material> {
    let mut id: Option<MaterialId> = None;
    let mut red: Option<u8> = None;
    let mut green: Option<u8> = None;
    let mut blue: Option<u8> = None;
    let mut alpha: u8 = 255;
    let mut material_type: Option<String> = None;

    for attr in element.attributes() {
        let attr = attr.map_err(|e| {
            ArchiveError::invalid_content(ENTRY, format!("malformed attribute: {e}"))
        })?;
        let value = std::str::from_utf8(&attr.value).map_err(|e| {
            ArchiveError::invalid_content(ENTRY, format!("invalid UTF-8 in attribute: {e}"))
        })?;

        match attr.key.local_name().as_ref() {
            b"MatID" => id = Some(parse_number(value, "MatID")?),
            b"Red" => red = Some(parse_number(value, "Red")?),
            b"Green" => green = Some(parse_number(value, "Green")?),
            b"Blue" => blue = Some(parse_number(value, "Blue")?),
            b"Alpha" => alpha = parse_number(value, "Alpha")?,
            b"MaterialType" => material_type = Some(value.to_string()),
            _ => {}
        }
    }

    let id = id.ok_or_else(|| missing("MatID"))?;
    let color = MaterialColor::new(
        red.ok_or_else(|| missing("Red"))?,
        green.ok_or_else(|| missing("Green"))?,
        blue.ok_or_else(|| missing("Blue"))?,
        alpha,
    );

    let material = Material::new(id, color);
    Ok(match material_type {
        Some(kind) if !kind.is_empty() && kind != DEFAULT_MATERIAL_TYPE => {
            material.with_material_type(kind)
        }
        _ => material,
    })
}

fn parse_number<T: std::str::FromStr>(value: &str, attribute: &str) -> ArchiveResult<T>
where
    T::Err: std::fmt::Display,
{
    value.trim().parse().map_err(|e| {
        ArchiveError::invalid_content(ENTRY, format!("invalid {attribute} value '{value}': {e}"))
    })
}

fn missing(attribute: &str) -> ArchiveError {
    ArchiveError::invalid_content(ENTRY, format!("Material element missing {attribute}"))
}
