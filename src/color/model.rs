use std::fmt;

use crate::foundation::error::{TideloopError, TideloopResult};

/// Substitute for any color token that is not `#RRGGBB`.
pub const FALLBACK_COLOR: Color = Color::rgb(0xFF, 0x00, 0x00);

/// Normalized 24-bit sRGB color, serialized as `#RRGGBB`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const WHITE: Self = Self::rgb(0xFF, 0xFF, 0xFF);
    pub const BLACK: Self = Self::rgb(0x00, 0x00, 0x00);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Strict `#RRGGBB` parser (case-insensitive, surrounding whitespace ignored).
    pub fn parse_hex(input: &str) -> TideloopResult<Self> {
        let s = input.trim();
        let Some(digits) = s.strip_prefix('#') else {
            return Err(TideloopError::validation(format!(
                "color \"{input}\" must start with '#'"
            )));
        };
        if digits.len() != 6 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(TideloopError::validation(format!(
                "color \"{input}\" must be #RRGGBB (6 hex digits)"
            )));
        }

        fn hex_byte(pair: &str) -> TideloopResult<u8> {
            u8::from_str_radix(pair, 16)
                .map_err(|_| TideloopError::validation(format!("invalid hex byte \"{pair}\"")))
        }

        Ok(Self::rgb(
            hex_byte(&digits[0..2])?,
            hex_byte(&digits[2..4])?,
            hex_byte(&digits[4..6])?,
        ))
    }

    pub fn to_hex(self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }

    pub fn opaque(self) -> Rgba8 {
        Rgba8::new(self.r, self.g, self.b, 255)
    }

    /// Same channels with `alpha` in `[0, 1]` (naive byte arithmetic, no color management).
    pub fn with_alpha(self, alpha: f64) -> Rgba8 {
        let a = (alpha.clamp(0.0, 1.0) * 255.0).round() as u8;
        Rgba8::new(self.r, self.g, self.b, a)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

impl std::str::FromStr for Color {
    type Err = TideloopError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_hex(s)
    }
}

impl serde::Serialize for Color {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> serde::Deserialize<'de> for Color {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Self::parse_hex(&s).map_err(serde::de::Error::custom)
    }
}

/// Straight (non-premultiplied) RGBA8.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Rgba8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba8 {
    pub const TRANSPARENT: Self = Self::new(0, 0, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }
}

/// Accept any color token and return a usable color.
///
/// `#RRGGBB` (any case) is canonicalized; everything else, including color functions such as
/// `oklch(...)`, maps to [`FALLBACK_COLOR`] with a warning.
pub fn normalize(input: &str) -> Color {
    if let Ok(c) = Color::parse_hex(input) {
        return c;
    }

    if input.trim_start().starts_with("oklch(") {
        tracing::warn!(
            color = input,
            fallback = %FALLBACK_COLOR,
            "oklch color detected, converting to default color"
        );
    } else {
        tracing::warn!(
            color = input,
            fallback = %FALLBACK_COLOR,
            "unsupported color format, using default color"
        );
    }
    FALLBACK_COLOR
}

/// Weighted channel sum on raw 0..=255 values (no gamma decoding).
pub fn luminance(c: Color) -> f64 {
    0.2126 * f64::from(c.r) + 0.7152 * f64::from(c.g) + 0.0722 * f64::from(c.b)
}

/// `(brightest + 0.05) / (darkest + 0.05)` over [`luminance`].
pub fn contrast_ratio(a: Color, b: Color) -> f64 {
    let la = luminance(a);
    let lb = luminance(b);
    let brightest = la.max(lb);
    let darkest = la.min(lb);
    (brightest + 0.05) / (darkest + 0.05)
}

/// Ordered two-color input: index 0 is the base/background, index 1 the accent/wave color.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(from = "[Color; 2]", into = "[Color; 2]")]
pub struct Palette {
    pub base: Color,
    pub accent: Color,
}

impl Palette {
    pub fn new(base: Color, accent: Color) -> Self {
        Self { base, accent }
    }

    /// Build a palette from raw user tokens, normalizing each.
    pub fn from_tokens(base: &str, accent: &str) -> Self {
        Self::new(normalize(base), normalize(accent))
    }

    pub fn colors(self) -> [Color; 2] {
        [self.base, self.accent]
    }

    pub fn swapped(self) -> Self {
        Self::new(self.accent, self.base)
    }

    pub fn contrast_ratio(self) -> f64 {
        contrast_ratio(self.base, self.accent)
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self::new(Color::rgb(0xFF, 0x00, 0xCC), Color::rgb(0x33, 0x33, 0xFF))
    }
}

impl From<[Color; 2]> for Palette {
    fn from([base, accent]: [Color; 2]) -> Self {
        Self::new(base, accent)
    }
}

impl From<Palette> for [Color; 2] {
    fn from(p: Palette) -> Self {
        p.colors()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/color/model.rs"]
mod tests;
