//! Color handling for schemagraph scenes
//!
//! This module provides the [`Color`] type which wraps the `DynamicColor` type
//! from the color crate, and the categorical [`CATEGORY10`] scheme used to
//! color edge types.

use std::{
    hash::{Hash, Hasher},
    str::FromStr,
};

use color::DynamicColor;

/// The ten-color categorical scheme used by default for edge types.
pub const CATEGORY10: [&str; 10] = [
    "#1f77b4", "#ff7f0e", "#2ca02c", "#d62728", "#9467bd", "#8c564b", "#e377c2", "#7f7f7f",
    "#bcbd22", "#17becf",
];

/// Wrapper around the `DynamicColor` type from the color crate
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Color {
    color: DynamicColor,
}

impl Eq for Color {}

impl Hash for Color {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.to_string().hash(state);
    }
}

impl Color {
    /// Create a new `Color` from a string
    /// This will parse CSS color strings such as "#ff0000", "rgb(255, 0, 0)", "red", etc.
    ///
    /// # Examples
    ///
    /// ```
    /// use schemagraph_core::color::Color;
    ///
    /// let red = Color::new("#ff0000").unwrap();
    /// let blue = Color::new("blue").unwrap();
    /// ```
    pub fn new(color_str: &str) -> Result<Self, String> {
        match DynamicColor::from_str(color_str) {
            Ok(color) => Ok(Self { color }),
            Err(err) => Err(format!("invalid color `{color_str}`: {err}")),
        }
    }

    /// Parses every entry of a color scheme, failing on the first invalid one.
    ///
    /// # Examples
    ///
    /// ```
    /// use schemagraph_core::color::{CATEGORY10, Color};
    ///
    /// let scheme = Color::scheme(CATEGORY10).unwrap();
    /// assert_eq!(scheme.len(), 10);
    /// ```
    pub fn scheme<I, S>(colors: I) -> Result<Vec<Self>, String>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        colors
            .into_iter()
            .map(|color| Self::new(color.as_ref()))
            .collect()
    }

    /// Returns the alpha (transparency) component of this color.
    pub fn alpha(&self) -> f32 {
        self.color.components[3]
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::new("black").expect("'black' is a valid CSS color")
    }
}

impl std::fmt::Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.color)
    }
}

impl From<&Color> for svg::node::Value {
    fn from(color: &Color) -> Self {
        Self::from(color.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_new() {
        let red = Color::new("#ff0000");
        assert!(red.is_ok());

        let invalid = Color::new("not-a-color");
        assert!(invalid.is_err());
    }

    #[test]
    fn test_color_default_is_black() {
        assert_eq!(Color::default(), Color::new("black").unwrap());
    }

    #[test]
    fn test_category10_parses() {
        let scheme = Color::scheme(CATEGORY10).unwrap();
        assert_eq!(scheme.len(), CATEGORY10.len());
        assert!(scheme.iter().all(|c| c.alpha() == 1.0));
    }

    #[test]
    fn test_scheme_reports_invalid_entry() {
        let err = Color::scheme(["red", "bogus", "blue"]).unwrap_err();
        assert!(err.contains("bogus"), "unexpected error: {err}");
    }

    #[test]
    fn test_hash_matches_eq() {
        use std::collections::HashSet;

        let mut set = HashSet::new();
        set.insert(Color::new("#1f77b4").unwrap());
        set.insert(Color::new("#1f77b4").unwrap());
        assert_eq!(set.len(), 1);
    }
}
