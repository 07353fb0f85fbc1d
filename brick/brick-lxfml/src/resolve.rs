//! Material and shape reference resolution.

use brick_archive::{MaterialTable, ShapeId};
use brick_types::{Material, MaterialId};
use tracing::debug;

use crate::document::{DESIGN_ID_ATTR, MATERIALS_ATTR, PART_TAG};
use crate::error::{LoadError, LoadResult};

/// Resolve a part's `materials` attribute against the material table.
///
/// Parts can list several comma-separated material identifiers, one per
/// decoration area. Only the first is used; the whole part is drawn with it.
///
/// # Errors
///
/// - [`LoadError::InvalidAttribute`] if the first entry is not an integer
/// - [`LoadError::UnknownMaterial`] if the identifier is not in the table
///
/// # Example
///
/// ```
/// use brick_archive::MaterialTable;
/// use brick_lxfml::resolve_material;
/// use brick_types::{Material, MaterialColor};
///
/// let mut table = MaterialTable::new();
/// table.insert(3, Material::new(3, MaterialColor::opaque(0, 0, 255)));
///
/// assert_eq!(resolve_material("3,7", &table).unwrap().id(), 3);
/// assert!(resolve_material("7", &table).is_err());
/// ```
pub fn resolve_material<'a>(attribute: &str, materials: &'a MaterialTable) -> LoadResult<&'a Material> {
    let mut entries = attribute.split(',');
    let first = entries.next().unwrap_or_default().trim();
    let id: MaterialId = first.parse().map_err(|_| LoadError::InvalidAttribute {
        element: PART_TAG.to_string(),
        attribute: MATERIALS_ATTR,
        value: attribute.to_string(),
    })?;

    let dropped: Vec<&str> = entries.map(str::trim).filter(|e| !e.is_empty()).collect();
    if !dropped.is_empty() {
        debug!(
            "Part lists materials '{}'; using {} and ignoring {:?}",
            attribute, id, dropped
        );
    }

    materials.get(&id).ok_or(LoadError::UnknownMaterial { id })
}

/// Parse a part's `designID` attribute.
///
/// # Errors
///
/// Returns [`LoadError::InvalidAttribute`] if the value is not an integer.
pub fn parse_shape_id(attribute: &str) -> LoadResult<ShapeId> {
    attribute.trim().parse().map_err(|_| LoadError::InvalidAttribute {
        element: PART_TAG.to_string(),
        attribute: DESIGN_ID_ATTR,
        value: attribute.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use brick_types::MaterialColor;

    fn table() -> MaterialTable {
        let mut table = MaterialTable::new();
        table.insert(3, Material::new(3, MaterialColor::opaque(0, 0, 255)));
        table.insert(7, Material::new(7, MaterialColor::opaque(255, 255, 0)));
        table
    }

    #[test]
    fn single_identifier() {
        let table = table();
        assert_eq!(resolve_material("7", &table).unwrap().id(), 7);
        assert_eq!(resolve_material(" 3 ", &table).unwrap().id(), 3);
    }

    #[test]
    fn first_of_list_wins() {
        let table = table();
        assert_eq!(resolve_material("3,7", &table).unwrap().id(), 3);
        assert_eq!(resolve_material("7,3,0", &table).unwrap().id(), 7);
        // The later entries are never looked up.
        assert_eq!(resolve_material("3,999", &table).unwrap().id(), 3);
    }

    #[test]
    fn unknown_identifier_is_reference_error() {
        let err = resolve_material("42", &table()).unwrap_err();
        assert!(matches!(err, LoadError::UnknownMaterial { id: 42 }));
        assert_eq!(err.kind(), crate::ErrorKind::Reference);
    }

    #[test]
    fn negative_identifier_is_looked_up() {
        let err = resolve_material("-1", &table()).unwrap_err();
        assert!(matches!(err, LoadError::UnknownMaterial { id: -1 }));
        assert_eq!(err.kind(), crate::ErrorKind::Reference);

        let mut table = table();
        table.insert(-1, Material::new(-1, MaterialColor::opaque(0, 0, 0)));
        assert_eq!(resolve_material("-1,3", &table).unwrap().id(), -1);
    }

    #[test]
    fn malformed_identifier_is_format_error() {
        for value in ["", "red", ",3", "1.5", "99999999999"] {
            let err = resolve_material(value, &table()).unwrap_err();
            assert_eq!(err.kind(), crate::ErrorKind::Format, "{value:?}");
        }
    }

    #[test]
    fn shape_ids() {
        assert_eq!(parse_shape_id("3001").unwrap(), 3001);
        assert_eq!(parse_shape_id(" 3003 ").unwrap(), 3003);
        assert_eq!(parse_shape_id("-1").unwrap(), -1);
        assert!(matches!(
            parse_shape_id("30x1"),
            Err(LoadError::InvalidAttribute { attribute: "designID", .. })
        ));
    }
}
