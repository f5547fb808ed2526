//! Color values for diagram styling.
//!
//! [`Color`] wraps `DynamicColor` from the color crate so that configuration
//! can accept any CSS color string while renderers receive a normalized
//! `#rrggbb[aa]` value.

use std::{
    fmt,
    hash::{Hash, Hasher},
    str::FromStr,
};

use color::{DynamicColor, Srgb};

/// A parsed CSS color.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Color {
    color: DynamicColor,
}

impl Eq for Color {}

impl Hash for Color {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.to_hex().hash(state);
    }
}

impl Color {
    /// Parses a CSS color string such as `"#ff9900"`, `"rgb(255, 0, 0)"` or `"white"`.
    ///
    /// # Examples
    ///
    /// ```
    /// use topograph_core::color::Color;
    ///
    /// let orange = Color::new("#ff9900").unwrap();
    /// assert_eq!(orange.to_hex(), "#ff9900");
    /// assert!(Color::new("not-a-color").is_err());
    /// ```
    pub fn new(color_str: &str) -> Result<Self, String> {
        DynamicColor::from_str(color_str)
            .map(|color| Self { color })
            .map_err(|err| format!("invalid color `{color_str}`: {err}"))
    }

    /// Returns the color as `#rrggbb`, or `#rrggbbaa` when not fully opaque.
    pub fn to_hex(self) -> String {
        let rgba = self.color.to_alpha_color::<Srgb>().to_rgba8();
        if rgba.a == u8::MAX {
            format!("#{:02x}{:02x}{:02x}", rgba.r, rgba.g, rgba.b)
        } else {
            format!("#{:02x}{:02x}{:02x}{:02x}", rgba.r, rgba.g, rgba.b, rgba.a)
        }
    }

    /// Returns the alpha component between 0.0 and 1.0.
    pub fn alpha(&self) -> f32 {
        self.color.components[3]
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::new("black").expect("'black' is a valid CSS color")
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.color)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn test_color_new() {
        assert!(Color::new("#ff0000").is_ok());
        assert!(Color::new("steelblue").is_ok());

        let err = Color::new("not-a-color").unwrap_err();
        assert!(err.contains("not-a-color"));
    }

    #[test]
    fn test_to_hex_named() {
        assert_eq!(Color::new("white").unwrap().to_hex(), "#ffffff");
        assert_eq!(Color::new("red").unwrap().to_hex(), "#ff0000");
    }

    #[test]
    fn test_to_hex_translucent() {
        let hex = Color::new("rgba(0, 0, 255, 0.5)").unwrap().to_hex();
        assert_eq!(hex.len(), 9);
        assert!(hex.starts_with("#0000ff"));
    }

    #[test]
    fn test_default_is_black() {
        assert_eq!(Color::default().to_hex(), "#000000");
        assert!((Color::default().alpha() - 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_eq_hash() {
        let mut set = HashSet::new();
        set.insert(Color::new("red").unwrap());

        assert!(set.contains(&Color::new("red").unwrap()));
        assert!(!set.contains(&Color::new("blue").unwrap()));
    }
}
