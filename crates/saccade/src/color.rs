use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ColorError {
    #[error("no color configured for category \"{0}\"")]
    Unmapped(String),
    #[error("invalid color \"{0}\", expected #rrggbb")]
    InvalidHex(String),
}

/// Display color, written as `#rrggbb` in configuration files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    fn from_palette(c: colorous::Color) -> Self {
        Self::new(c.r, c.g, c.b)
    }

    pub fn parse_hex(s: &str) -> Result<Self, ColorError> {
        let invalid = || ColorError::InvalidHex(s.to_string());
        let hex = s.strip_prefix('#').ok_or_else(invalid)?;
        if hex.len() != 6 || !hex.is_ascii() {
            return Err(invalid());
        }
        let channel = |i: usize| {
            u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| invalid())
        };
        Ok(Self::new(channel(0)?, channel(2)?, channel(4)?))
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl TryFrom<String> for Rgb {
    type Error = ColorError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Rgb::parse_hex(&s)
    }
}

impl From<Rgb> for String {
    fn from(c: Rgb) -> Self {
        c.to_string()
    }
}

// Category10 slots: blue, orange, green, red, gray
pub const BLUE: Rgb = Rgb::new(0x1f, 0x77, 0xb4);
pub const ORANGE: Rgb = Rgb::new(0xff, 0x7f, 0x0e);
pub const GREEN: Rgb = Rgb::new(0x2c, 0xa0, 0x2c);
pub const RED: Rgb = Rgb::new(0xd6, 0x27, 0x28);
pub const GRAY: Rgb = Rgb::new(0x7f, 0x7f, 0x7f);
pub const INK: Rgb = Rgb::new(0x28, 0x28, 0x28);

/// Category label -> color, with a fallback for labels not listed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryColors {
    pub colors: BTreeMap<String, Rgb>,
    pub fallback: Rgb,
}

impl Default for CategoryColors {
    fn default() -> Self {
        let palette = colorous::CATEGORY10;
        let colors = ["GAP", "MGS", "VGS"]
            .into_iter()
            .zip(palette)
            .map(|(label, c)| (label.to_string(), Rgb::from_palette(c)))
            .collect();
        Self {
            colors,
            fallback: Rgb::from_palette(palette[7]),
        }
    }
}

impl CategoryColors {
    pub fn lookup(&self, category: &str) -> Result<Rgb, ColorError> {
        self.colors
            .get(category)
            .copied()
            .ok_or_else(|| ColorError::Unmapped(category.to_string()))
    }

    /// Lookup that never fails: an unmapped category gets the fallback
    /// color and the error is handed back for reporting.
    pub fn resolve(&self, category: &str) -> (Rgb, Option<ColorError>) {
        match self.lookup(category) {
            Ok(c) => (c, None),
            Err(e) => {
                tracing::warn!(category, fallback = %self.fallback, "{e}");
                (self.fallback, Some(e))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_mapping_uses_category10() {
        let colors = CategoryColors::default();
        assert_eq!(colors.lookup("GAP"), Ok(BLUE));
        assert_eq!(colors.lookup("MGS"), Ok(ORANGE));
        assert_eq!(colors.lookup("VGS"), Ok(GREEN));
        assert_eq!(colors.fallback, GRAY);
    }

    #[test]
    fn unmapped_category_falls_back() {
        let colors = CategoryColors::default();
        let (c, err) = colors.resolve("AS");
        assert_eq!(c, GRAY);
        assert_eq!(err, Some(ColorError::Unmapped("AS".into())));
        assert_eq!(colors.resolve("GAP"), (BLUE, None));
    }

    #[test]
    fn hex_parsing() {
        assert_eq!(Rgb::parse_hex("#1f77b4"), Ok(BLUE));
        assert_eq!(BLUE.to_string(), "#1f77b4");
        assert!(Rgb::parse_hex("1f77b4").is_err());
        assert!(Rgb::parse_hex("#1f77b").is_err());
        assert!(Rgb::parse_hex("#zz77b4").is_err());
    }

    #[test]
    fn config_json_uses_hex_strings() {
        let colors: CategoryColors = serde_json::from_str(
            r##"{"colors":{"GAP":"#000000"},"fallback":"#ffffff"}"##,
        )
        .unwrap();
        assert_eq!(colors.lookup("GAP"), Ok(Rgb::new(0, 0, 0)));
        assert!(colors.lookup("MGS").is_err());

        let bad = serde_json::from_str::<CategoryColors>(
            r##"{"colors":{},"fallback":"white"}"##,
        );
        assert!(bad.is_err());
    }
}
