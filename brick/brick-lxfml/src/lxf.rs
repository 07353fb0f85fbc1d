//! `.lxf` container support.
//!
//! An `.lxf` file is a zip archive holding the LXFML document (usually
//! `IMAGE100.LXFML`) next to a thumbnail.

use std::fs::File;
use std::io::{BufReader, Read, Seek};
use std::path::Path;

use brick_archive::ArchiveError;
use tracing::debug;
use zip::ZipArchive;

use crate::error::{LoadError, LoadResult};

/// Read the LXFML document out of an `.lxf` file.
///
/// The first member with an `lxfml` extension (any case) is used.
///
/// # Errors
///
/// - [`LoadError::Io`] if the file cannot be opened
/// - [`LoadError::Archive`] if it is not a valid zip archive
/// - [`LoadError::NoDocumentInContainer`] if no member is an LXFML document
/// - [`LoadError::Xml`] if the document is not UTF-8
pub fn read_lxf_document<P: AsRef<Path>>(path: P) -> LoadResult<String> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    read_lxf_from(BufReader::new(file))?.ok_or_else(|| LoadError::NoDocumentInContainer {
        path: path.to_path_buf(),
    })
}

/// Read the LXFML document from `.lxf` data, if the archive has one.
///
/// # Errors
///
/// Returns [`LoadError::Archive`] for zip failures and [`LoadError::Xml`]
/// if the document is not UTF-8.
pub fn read_lxf_from<R: Read + Seek>(reader: R) -> LoadResult<Option<String>> {
    let mut archive = ZipArchive::new(reader).map_err(ArchiveError::from)?;

    for i in 0..archive.len() {
        let mut entry = archive.by_index(i).map_err(ArchiveError::from)?;
        if entry.is_dir() || !is_lxfml_name(entry.name()) {
            continue;
        }

        let name = entry.name().to_string();
        let mut bytes = Vec::new();
        entry.read_to_end(&mut bytes).map_err(ArchiveError::from)?;
        let content = String::from_utf8(bytes).map_err(|e| LoadError::Xml {
            position: e.utf8_error().valid_up_to() as u64,
            message: format!("document '{name}' is not valid UTF-8"),
        })?;

        debug!("Read LXFML document '{}' ({} bytes)", name, content.len());
        return Ok(Some(content));
    }

    Ok(None)
}

fn is_lxfml_name(name: &str) -> bool {
    Path::new(name)
        .extension()
        .is_some_and(|e| e.eq_ignore_ascii_case("lxfml"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Cursor, Write};
    use zip::ZipWriter;
    use zip::write::SimpleFileOptions;

    fn container(entries: &[(&str, &[u8])]) -> Cursor<Vec<u8>> {
        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
        let options = SimpleFileOptions::default();
        for (name, bytes) in entries {
            zip.start_file(*name, options).unwrap();
            zip.write_all(bytes).unwrap();
        }
        let mut cursor = zip.finish().unwrap();
        cursor.set_position(0);
        cursor
    }

    #[test]
    fn finds_document_by_extension() {
        let data = container(&[
            ("IMAGE100.PNG", b"\x89PNG"),
            ("IMAGE100.LXFML", b"<LXFML versionMajor=\"5\"/>"),
        ]);
        let document = read_lxf_from(data).unwrap().unwrap();
        assert!(document.starts_with("<LXFML"));
    }

    #[test]
    fn extension_match_ignores_case() {
        assert!(is_lxfml_name("IMAGE100.LXFML"));
        assert!(is_lxfml_name("model.lxfml"));
        assert!(!is_lxfml_name("model.lxf"));
        assert!(!is_lxfml_name("lxfml"));
    }

    #[test]
    fn no_document_is_none() {
        let data = container(&[("IMAGE100.PNG", b"\x89PNG")]);
        assert!(read_lxf_from(data).unwrap().is_none());
    }

    #[test]
    fn non_utf8_document_is_xml_error() {
        let data = container(&[("IMAGE100.LXFML", b"<LXFML \xff/>")]);
        assert!(matches!(read_lxf_from(data), Err(LoadError::Xml { position: 7, .. })));
    }

    #[test]
    fn not_a_zip_is_archive_error() {
        let err = read_lxf_from(Cursor::new(b"plain text".to_vec())).unwrap_err();
        assert!(matches!(err, LoadError::Archive(ArchiveError::Zip { .. })));
    }
}
