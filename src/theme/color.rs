//! Hex color decoding and the small amount of color math the shell needs.
//!
//! Two parsers live here:
//! - `Rgb::parse_strict` accepts exactly `#RRGGBB` and is used wherever user input
//!   is about to replace stored state.
//! - `Rgb::decode` is lenient (trims, optional `#`, 3-digit shorthand) and falls back
//!   to black so derivation never fails on a value that slipped through.

use std::fmt;

/// Foreground used on dark accents.
pub const LIGHT_FOREGROUND: &str = "#FFFFFF";
/// Foreground used on light accents.
pub const DARK_FOREGROUND: &str = "#0F172A";

/// Luminance above which the dark foreground is chosen.
const LUMINANCE_THRESHOLD: f64 = 0.55;

/// An opaque 8-bit RGB triple.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

/// Rejection reasons for color input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColorError {
    /// Input is not `#` followed by exactly six hex digits.
    Malformed(String),
}

impl fmt::Display for ColorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Malformed(s) => write!(f, "'{s}' is not a #RRGGBB color"),
        }
    }
}

impl std::error::Error for ColorError {}

impl Rgb {
    pub const BLACK: Self = Self::new(0, 0, 0);
    pub const WHITE: Self = Self::new(255, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse `#RRGGBB` (either case). Anything else is rejected.
    pub fn parse_strict(hex: &str) -> Result<Self, ColorError> {
        let malformed = || ColorError::Malformed(hex.to_string());
        let digits = hex.strip_prefix('#').ok_or_else(malformed)?;
        if digits.len() != 6 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(malformed());
        }
        Self::from_six(digits).ok_or_else(malformed)
    }

    /// Lenient decode; unparseable input becomes black.
    pub fn decode(hex: &str) -> Self {
        let cleaned = hex.trim().trim_start_matches('#');
        if !cleaned.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Self::BLACK;
        }
        match cleaned.len() {
            6 => Self::from_six(cleaned).unwrap_or(Self::BLACK),
            3 => {
                let expanded: String = cleaned.chars().flat_map(|c| [c, c]).collect();
                Self::from_six(&expanded).unwrap_or(Self::BLACK)
            }
            _ => Self::BLACK,
        }
    }

    fn from_six(digits: &str) -> Option<Self> {
        let r = u8::from_str_radix(digits.get(0..2)?, 16).ok()?;
        let g = u8::from_str_radix(digits.get(2..4)?, 16).ok()?;
        let b = u8::from_str_radix(digits.get(4..6)?, 16).ok()?;
        Some(Self { r, g, b })
    }

    /// Relative luminance approximation in `[0, 1]` (Rec. 709 weights).
    pub fn luminance(self) -> f64 {
        (0.2126 * f64::from(self.r) + 0.7152 * f64::from(self.g) + 0.0722 * f64::from(self.b))
            / 255.0
    }

    /// Composite `self` at `alpha` over an opaque `base`.
    pub fn blend_over(self, base: Self, alpha: f64) -> Self {
        let a = clamp_unit(alpha);
        let mix = |top: u8, bottom: u8| {
            (f64::from(top) * a + f64::from(bottom) * (1.0 - a)).round() as u8
        };
        Self::new(mix(self.r, base.r), mix(self.g, base.g), mix(self.b, base.b))
    }

    pub fn to_hex(self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

impl From<Rgb> for cursive::theme::Color {
    fn from(c: Rgb) -> Self {
        Self::Rgb(c.r, c.g, c.b)
    }
}

/// Pick a foreground that stays readable on `hex`.
pub fn compute_foreground(hex: &str) -> &'static str {
    if Rgb::decode(hex).luminance() > LUMINANCE_THRESHOLD {
        DARK_FOREGROUND
    } else {
        LIGHT_FOREGROUND
    }
}

/// `rgba(r, g, b, a)` string for `hex` with `alpha` clamped to `[0, 1]`.
pub fn apply_alpha(hex: &str, alpha: f64) -> String {
    let Rgb { r, g, b } = Rgb::decode(hex);
    format!("rgba({r}, {g}, {b}, {})", clamp_unit(alpha))
}

/// Normalise any decodable color to `#RRGGBB`.
pub fn normalize_hex(hex: &str) -> String {
    Rgb::decode(hex).to_hex()
}

// NaN maps to 0.
fn clamp_unit(v: f64) -> f64 {
    if v.is_nan() { 0.0 } else { v.clamp(0.0, 1.0) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strict_parse_accepts_only_hash_six() {
        assert_eq!(Rgb::parse_strict("#030213"), Ok(Rgb::new(3, 2, 19)));
        assert_eq!(Rgb::parse_strict("#aBcDeF"), Ok(Rgb::new(0xAB, 0xCD, 0xEF)));
        for bad in ["not-a-color", "030213", "#fff", "#0302131", "#03021g", "", "#"] {
            assert!(Rgb::parse_strict(bad).is_err(), "{bad} should be rejected");
        }
    }

    #[test]
    fn lenient_decode_expands_shorthand_and_falls_back_to_black() {
        assert_eq!(Rgb::decode(" #fff "), Rgb::WHITE);
        assert_eq!(Rgb::decode("3B82F6"), Rgb::new(0x3B, 0x82, 0xF6));
        assert_eq!(Rgb::decode("garbage"), Rgb::BLACK);
        assert_eq!(Rgb::decode("#12345"), Rgb::BLACK);
    }

    #[test]
    fn foreground_is_two_valued_and_deterministic() {
        let on_black = compute_foreground("#000000");
        let on_white = compute_foreground("#FFFFFF");
        assert_eq!(on_black, LIGHT_FOREGROUND);
        assert_eq!(on_white, DARK_FOREGROUND);
        assert_ne!(on_black, on_white);
        assert_eq!(compute_foreground("#3B82F6"), compute_foreground("#3B82F6"));
    }

    #[test]
    fn foreground_threshold() {
        // Default accent is near-black.
        assert_eq!(compute_foreground("#030213"), LIGHT_FOREGROUND);
        // Amber sits above the threshold, blue below it.
        assert_eq!(compute_foreground("#F59E0B"), DARK_FOREGROUND);
        assert_eq!(compute_foreground("#3B82F6"), LIGHT_FOREGROUND);
    }

    #[test]
    fn alpha_is_clamped() {
        assert_eq!(apply_alpha("#030213", 0.12), "rgba(3, 2, 19, 0.12)");
        assert_eq!(apply_alpha("#030213", 1.5), apply_alpha("#030213", 1.0));
        assert_eq!(apply_alpha("#030213", -1.0), apply_alpha("#030213", 0.0));
        assert_eq!(apply_alpha("#030213", f64::NAN), apply_alpha("#030213", 0.0));
        assert_eq!(apply_alpha("#FFFFFF", 1.0), "rgba(255, 255, 255, 1)");
    }

    #[test]
    fn blending_and_normalising() {
        assert_eq!(Rgb::new(0, 0, 255).blend_over(Rgb::WHITE, 0.5), Rgb::new(128, 128, 255));
        assert_eq!(Rgb::WHITE.blend_over(Rgb::BLACK, 0.0), Rgb::BLACK);
        assert_eq!(Rgb::WHITE.blend_over(Rgb::BLACK, 1.0), Rgb::WHITE);
        assert_eq!(normalize_hex("#abc"), "#AABBCC");
    }
}
