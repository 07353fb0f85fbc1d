//! Error types for document loading.

use std::path::PathBuf;

use brick_archive::{ArchiveError, ShapeId};
use brick_types::{GeometryError, MaterialId};
use thiserror::Error;

/// Result type for document loading.
pub type LoadResult<T> = Result<T, LoadError>;

/// Broad classification of a [`LoadError`].
///
/// Use [`LoadError::kind`] to branch on the failure class without matching
/// every variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The store or document is not something this loader accepts.
    /// Raised before any part is loaded.
    Precondition,
    /// Malformed content: numbers, attributes, XML or archive entries.
    Format,
    /// A material identifier is not in the material table.
    Reference,
    /// A shape identifier has no archive entry.
    NotFound,
    /// A required child element is absent.
    MissingChild,
    /// File-system failure.
    Io,
}

/// Errors that can occur while loading a brick model.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The store lacks the sentinel entry that marks a brick asset archive.
    #[error("store is not a brick asset archive: missing '{path}'")]
    MissingSentinel {
        /// Sentinel path that was checked.
        path: String,
    },

    /// The document's major version is missing or not supported.
    #[error("unsupported document version {}: only versionMajor=\"{expected}\" is supported", version_label(.found.as_deref()))]
    UnsupportedVersion {
        /// The supported version.
        expected: String,
        /// The version found on the root element, if any.
        found: Option<String>,
    },

    /// The material table is not in the store.
    #[error("material table '{path}' not found in archive")]
    MissingMaterialTable {
        /// Path of the material table.
        path: String,
    },

    /// A transformation token is not a number.
    #[error("invalid transformation value '{token}' at position {position}")]
    InvalidTransformToken {
        /// The offending token, trimmed.
        token: String,
        /// Zero-based position of the token.
        position: usize,
    },

    /// A transformation has more values than the 3x4 affine block holds.
    #[error("transformation has {count} values, at most 12 are allowed")]
    TooManyTransformValues {
        /// Number of values found.
        count: usize,
    },

    /// A required attribute is absent.
    #[error("<{element}> is missing required attribute '{attribute}'")]
    MissingAttribute {
        /// Tag name of the element.
        element: String,
        /// Attribute name.
        attribute: &'static str,
    },

    /// An attribute value cannot be parsed.
    #[error("<{element}> has invalid {attribute} value '{value}'")]
    InvalidAttribute {
        /// Tag name of the element.
        element: String,
        /// Attribute name.
        attribute: &'static str,
        /// The raw value.
        value: String,
    },

    /// A material identifier is not in the material table.
    #[error("material {id} is not defined in the material table")]
    UnknownMaterial {
        /// The missing material identifier.
        id: MaterialId,
    },

    /// A shape has no archive entry.
    #[error("shape {shape_id} not found in archive (expected '{path}')")]
    ShapeNotFound {
        /// The shape identifier.
        shape_id: ShapeId,
        /// Entry path that was looked up.
        path: String,
    },

    /// A required child element is absent.
    #[error("<{parent}> has no <{child}> child")]
    MissingChild {
        /// Tag name of the parent element.
        parent: String,
        /// Tag name of the missing child.
        child: &'static str,
    },

    /// The document is not well-formed XML.
    #[error("XML error at byte {position}: {message}")]
    Xml {
        /// Byte offset where the error was detected.
        position: u64,
        /// Description from the XML reader.
        message: String,
    },

    /// An `.lxf` container holds no LXFML document.
    #[error("no LXFML document found in '{path}'")]
    NoDocumentInContainer {
        /// Path of the container.
        path: PathBuf,
    },

    /// Geometry could not be merged.
    #[error("geometry error: {0}")]
    Geometry(#[from] GeometryError),

    /// Archive access or decoding failed.
    #[error("archive error: {0}")]
    Archive(#[from] ArchiveError),

    /// I/O error while reading an input file.
    #[error("I/O error at '{path}': {source}")]
    Io {
        /// The path where the error occurred.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// A part failed to load.
    #[error("brick {brick_index}, part {part_index}{}: {source}", shape_label(.shape_id.as_ref()))]
    Part {
        /// Zero-based index of the brick within `Bricks`.
        brick_index: usize,
        /// Zero-based index of the part within its brick.
        part_index: usize,
        /// The part's shape identifier, if it could be read.
        shape_id: Option<ShapeId>,
        /// The underlying failure.
        #[source]
        source: Box<LoadError>,
    },
}

impl LoadError {
    /// Classify this error.
    ///
    /// Per-part wrappers report the kind of the underlying failure.
    ///
    /// # Example
    ///
    /// ```
    /// use brick_lxfml::{ErrorKind, LoadError};
    ///
    /// let err = LoadError::UnknownMaterial { id: 7 };
    /// assert_eq!(err.kind(), ErrorKind::Reference);
    /// ```
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::MissingSentinel { .. }
            | Self::UnsupportedVersion { .. }
            | Self::MissingMaterialTable { .. } => ErrorKind::Precondition,
            Self::InvalidTransformToken { .. }
            | Self::TooManyTransformValues { .. }
            | Self::MissingAttribute { .. }
            | Self::InvalidAttribute { .. }
            | Self::Xml { .. }
            | Self::NoDocumentInContainer { .. }
            | Self::Geometry(_) => ErrorKind::Format,
            Self::UnknownMaterial { .. } => ErrorKind::Reference,
            Self::ShapeNotFound { .. } => ErrorKind::NotFound,
            Self::MissingChild { .. } => ErrorKind::MissingChild,
            Self::Io { .. } => ErrorKind::Io,
            Self::Archive(e) => match e {
                ArchiveError::EntryNotFound { .. } => ErrorKind::NotFound,
                ArchiveError::Io(_) | ArchiveError::ArchiveNotFound { .. } => ErrorKind::Io,
                _ => ErrorKind::Format,
            },
            Self::Part { source, .. } => source.kind(),
        }
    }

    /// The innermost error, looking through per-part wrappers.
    #[must_use]
    pub fn root_cause(&self) -> &Self {
        let mut current = self;
        while let Self::Part { source, .. } = current {
            current = source;
        }
        current
    }
}

fn version_label(found: Option<&str>) -> String {
    found.map_or_else(|| "(missing)".to_string(), |v| format!("\"{v}\""))
}

fn shape_label(shape_id: Option<&ShapeId>) -> String {
    shape_id.map_or_else(String::new, |id| format!(" (shape {id})"))
}
