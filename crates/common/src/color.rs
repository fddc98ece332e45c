use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Errors from parsing `#rrggbb` color strings.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ColorParseError {
    #[error("expected 6 hex digits, got {0:?}")]
    Length(String),
    #[error("invalid hex digit in {0:?}")]
    Digit(String),
}

/// RGB color with channels in `[0, 1]`.
///
/// Values are display-encoded, exactly as typed in a hex string. Shader
/// uniforms and the clear color receive them unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rgb {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb::new(0.0, 0.0, 0.0);
    pub const WHITE: Rgb = Rgb::new(1.0, 1.0, 1.0);

    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Parse `#rrggbb` (leading `#` optional).
    pub fn from_hex(s: &str) -> Result<Self, ColorParseError> {
        let digits = s.trim().trim_start_matches('#');
        if digits.len() != 6 {
            return Err(ColorParseError::Length(s.to_string()));
        }
        if !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(ColorParseError::Digit(s.to_string()));
        }
        let value =
            u32::from_str_radix(digits, 16).map_err(|_| ColorParseError::Digit(s.to_string()))?;
        Ok(Self::from_rgb8([
            (value >> 16) as u8,
            (value >> 8) as u8,
            value as u8,
        ]))
    }

    pub fn from_rgb8(rgb: [u8; 3]) -> Self {
        Self::new(
            rgb[0] as f32 / 255.0,
            rgb[1] as f32 / 255.0,
            rgb[2] as f32 / 255.0,
        )
    }

    pub fn to_rgb8(self) -> [u8; 3] {
        let quantize = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
        [quantize(self.r), quantize(self.g), quantize(self.b)]
    }

    pub fn to_hex(self) -> String {
        let [r, g, b] = self.to_rgb8();
        format!("#{r:02x}{g:02x}{b:02x}")
    }

    pub fn to_array(self) -> [f32; 3] {
        [self.r, self.g, self.b]
    }
}

impl FromStr for Rgb {
    type Err = ColorParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl TryFrom<String> for Rgb {
    type Error = ColorParseError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::from_hex(&s)
    }
}

impl From<Rgb> for String {
    fn from(c: Rgb) -> Self {
        c.to_hex()
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_portal_defaults() {
        let start = Rgb::from_hex("#cd62cd").unwrap();
        assert_eq!(start.to_rgb8(), [0xcd, 0x62, 0xcd]);
        assert_eq!(Rgb::from_hex("#ffffff").unwrap(), Rgb::WHITE);
        assert_eq!(Rgb::from_hex("000000").unwrap(), Rgb::BLACK);
    }

    #[test]
    fn hex_is_lowercase_with_hash() {
        let c = Rgb::from_hex("#B4D0FF").unwrap();
        assert_eq!(c.to_hex(), "#b4d0ff");
        assert_eq!(c.to_string(), "#b4d0ff");
    }

    #[test]
    fn rejects_malformed() {
        assert!(matches!(
            Rgb::from_hex("#fff"),
            Err(ColorParseError::Length(_))
        ));
        assert!(matches!(
            Rgb::from_hex("#gggggg"),
            Err(ColorParseError::Digit(_))
        ));
    }

    #[test]
    fn sign_prefix_is_not_a_digit() {
        assert!(matches!(
            Rgb::from_hex("+abcde"),
            Err(ColorParseError::Digit(_))
        ));
        assert!(matches!(
            Rgb::from_hex("#-abcde"),
            Err(ColorParseError::Digit(_))
        ));
    }

    #[test]
    fn serde_uses_hex_strings() {
        let json = serde_json::to_string(&Rgb::from_hex("#cd62cd").unwrap()).unwrap();
        assert_eq!(json, "\"#cd62cd\"");
        let back: Rgb = serde_json::from_str("\"#ffffff\"").unwrap();
        assert_eq!(back, Rgb::WHITE);
        assert!(serde_json::from_str::<Rgb>("\"nope\"").is_err());
    }
}
