//! Materials resolved from the archive's material table.
//!
//! A [`Material`] is compared and hashed by value, which lets it serve
//! directly as the key when per-part geometry is merged into batches.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Integer identifier of a material in the material table.
pub type MaterialId = i32;

/// Surface type assumed when the material table does not name one.
pub const DEFAULT_MATERIAL_TYPE: &str = "shinyPlastic";

/// RGBA color with 8-bit components.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MaterialColor {
    /// Red component (0-255).
    pub r: u8,
    /// Green component (0-255).
    pub g: u8,
    /// Blue component (0-255).
    pub b: u8,
    /// Alpha component (0-255, 255 is opaque).
    pub a: u8,
}

impl MaterialColor {
    /// Create a new color from RGBA components.
    #[inline]
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Create an opaque color from RGB components.
    #[inline]
    #[must_use]
    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }

    /// Check whether the color is partially transparent.
    #[inline]
    #[must_use]
    pub const fn is_transparent(self) -> bool {
        self.a < 255
    }

    /// Convert to floating point values in [0, 1] range, in RGBA order.
    ///
    /// # Example
    ///
    /// ```
    /// use brick_types::MaterialColor;
    ///
    /// let [r, g, b, a] = MaterialColor::new(255, 0, 0, 255).to_float();
    /// assert!((r - 1.0).abs() < 1e-6);
    /// assert!(g.abs() < 1e-6 && b.abs() < 1e-6);
    /// assert!((a - 1.0).abs() < 1e-6);
    /// ```
    #[inline]
    #[must_use]
    pub fn to_float(self) -> [f32; 4] {
        [
            f32::from(self.r) / 255.0,
            f32::from(self.g) / 255.0,
            f32::from(self.b) / 255.0,
            f32::from(self.a) / 255.0,
        ]
    }
}

/// A visual-appearance record from the material table.
///
/// # Example
///
/// ```
/// use brick_types::{Material, MaterialColor};
///
/// let red = Material::new(21, MaterialColor::opaque(180, 0, 0));
/// assert_eq!(red.id(), 21);
/// assert_eq!(red.material_type(), "shinyPlastic");
///
/// let glass = Material::new(40, MaterialColor::new(238, 238, 238, 128))
///     .with_material_type("transparent");
/// assert!(glass.color().is_transparent());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Material {
    id: MaterialId,
    color: MaterialColor,
    material_type: String,
}

impl Material {
    /// Create a material with the default surface type.
    #[must_use]
    pub fn new(id: MaterialId, color: MaterialColor) -> Self {
        Self {
            id,
            color,
            material_type: DEFAULT_MATERIAL_TYPE.to_string(),
        }
    }

    /// Set the surface type (builder pattern).
    #[must_use]
    pub fn with_material_type(mut self, material_type: impl Into<String>) -> Self {
        self.material_type = material_type.into();
        self
    }

    /// Get the material identifier.
    #[inline]
    #[must_use]
    pub const fn id(&self) -> MaterialId {
        self.id
    }

    /// Get the material color.
    #[inline]
    #[must_use]
    pub const fn color(&self) -> MaterialColor {
        self.color
    }

    /// Get the surface type name, e.g. `shinyPlastic` or `transparent`.
    #[must_use]
    pub fn material_type(&self) -> &str {
        &self.material_type
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn equal_by_value() {
        let a = Material::new(1, MaterialColor::opaque(244, 244, 244));
        let b = Material::new(1, MaterialColor::opaque(244, 244, 244));
        assert_eq!(a, b);

        let mut set = HashSet::new();
        set.insert(a);
        assert!(set.contains(&b));
    }

    #[test]
    fn differing_fields_are_distinct() {
        let base = Material::new(1, MaterialColor::opaque(244, 244, 244));
        assert_ne!(base, Material::new(2, MaterialColor::opaque(244, 244, 244)));
        assert_ne!(base, Material::new(1, MaterialColor::opaque(0, 0, 0)));
        assert_ne!(base, base.clone().with_material_type("metallic"));
    }

    #[test]
    fn opaque_is_not_transparent() {
        assert!(!MaterialColor::opaque(1, 2, 3).is_transparent());
        assert!(MaterialColor::new(1, 2, 3, 200).is_transparent());
    }
}
