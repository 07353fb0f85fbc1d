//! Loader configuration.
//!
//! [`LoaderConfig`] names the document version this loader accepts and the
//! archive locations it reads from. The defaults match the layout of the
//! design tool's asset archive:
//!
//! ```text
//! /info.xml                    sentinel
//! /Materials.xml               material table
//! /Primitives/LOD0/<id>.g      shape geometry (+ .g1, .g2, ... pieces)
//! ```
//!
//! # Example
//!
//! ```
//! use brick_lxfml::LoaderConfig;
//!
//! let config = LoaderConfig::default().with_primitives_dir("/Primitives/LOD1");
//! assert_eq!(config.primitives_dir, "/Primitives/LOD1");
//! assert_eq!(config.supported_major_version, "5");
//! ```

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The only document major version the loader accepts.
pub const SUPPORTED_MAJOR_VERSION: &str = "5";

/// Entry whose presence marks a store as a brick asset archive.
pub const SENTINEL_PATH: &str = "/info.xml";

/// Location of the material table.
pub const MATERIALS_PATH: &str = "/Materials.xml";

/// Directory holding shape geometry files.
pub const PRIMITIVES_DIR: &str = "/Primitives/LOD0";

/// Configuration for loading a document.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct LoaderConfig {
    /// Required value of the root element's `versionMajor` attribute.
    pub supported_major_version: String,

    /// Entry that must exist in the store before anything else is read.
    pub sentinel_path: String,

    /// Entry holding the material table.
    pub materials_path: String,

    /// Directory of `.g` shape files.
    pub primitives_dir: String,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            supported_major_version: SUPPORTED_MAJOR_VERSION.to_string(),
            sentinel_path: SENTINEL_PATH.to_string(),
            materials_path: MATERIALS_PATH.to_string(),
            primitives_dir: PRIMITIVES_DIR.to_string(),
        }
    }
}

impl LoaderConfig {
    /// Set the accepted document major version.
    #[must_use]
    pub fn with_supported_major_version(mut self, version: impl Into<String>) -> Self {
        self.supported_major_version = version.into();
        self
    }

    /// Set the sentinel entry path.
    #[must_use]
    pub fn with_sentinel_path(mut self, path: impl Into<String>) -> Self {
        self.sentinel_path = path.into();
        self
    }

    /// Set the material table path.
    #[must_use]
    pub fn with_materials_path(mut self, path: impl Into<String>) -> Self {
        self.materials_path = path.into();
        self
    }

    /// Set the shape geometry directory.
    #[must_use]
    pub fn with_primitives_dir(mut self, dir: impl Into<String>) -> Self {
        self.primitives_dir = dir.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_constants() {
        let config = LoaderConfig::default();
        assert_eq!(config.supported_major_version, SUPPORTED_MAJOR_VERSION);
        assert_eq!(config.sentinel_path, SENTINEL_PATH);
        assert_eq!(config.materials_path, MATERIALS_PATH);
        assert_eq!(config.primitives_dir, PRIMITIVES_DIR);
    }

    #[test]
    fn builders_override_fields() {
        let config = LoaderConfig::default()
            .with_supported_major_version("6")
            .with_sentinel_path("/meta.xml")
            .with_materials_path("/Colors.xml");
        assert_eq!(config.supported_major_version, "6");
        assert_eq!(config.sentinel_path, "/meta.xml");
        assert_eq!(config.materials_path, "/Colors.xml");
        assert_eq!(config.primitives_dir, PRIMITIVES_DIR);
    }
}
