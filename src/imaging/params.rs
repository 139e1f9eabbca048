//! Parameter types for image operations.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid color: {0} (expected RRGGBB or #RRGGBB)")]
pub struct ParseColorError(pub String);

/// Background fill color for letterboxed areas when fitting an image into a
/// box that has a different aspect ratio.
///
/// The hex form (`RRGGBB`, uppercase, no `#`) is part of the thumbnail cache
/// filename format and must stay stable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BackColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl BackColor {
    pub const BLACK: BackColor = BackColor { r: 0, g: 0, b: 0 };
    pub const WHITE: BackColor = BackColor {
        r: 255,
        g: 255,
        b: 255,
    };

    /// Hex encoding used in thumbnail cache filenames.
    pub fn hex(self) -> String {
        format!("{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }

    pub fn rgb(self) -> image::Rgb<u8> {
        image::Rgb([self.r, self.g, self.b])
    }
}

impl Default for BackColor {
    fn default() -> Self {
        Self::BLACK
    }
}

impl std::fmt::Display for BackColor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.hex())
    }
}

impl std::str::FromStr for BackColor {
    type Err = ParseColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let hex = s.strip_prefix('#').unwrap_or(s);
        // Byte check also guards the slicing below against multi-byte chars.
        if hex.len() != 6 || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(ParseColorError(s.to_string()));
        }
        let channel = |i: usize| {
            u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| ParseColorError(s.to_string()))
        };
        Ok(BackColor {
            r: channel(0)?,
            g: channel(2)?,
            b: channel(4)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_is_uppercase_six_digits() {
        assert_eq!(BackColor::BLACK.hex(), "000000");
        assert_eq!(BackColor::WHITE.hex(), "FFFFFF");
        assert_eq!(BackColor { r: 10, g: 160, b: 255 }.hex(), "0AA0FF");
    }

    #[test]
    fn parses_with_and_without_hash() {
        let expected = BackColor { r: 0x1a, g: 0x2b, b: 0x3c };
        assert_eq!("1A2B3C".parse::<BackColor>().unwrap(), expected);
        assert_eq!("#1a2b3c".parse::<BackColor>().unwrap(), expected);
    }

    #[test]
    fn rejects_malformed_strings() {
        assert!("fff".parse::<BackColor>().is_err());
        assert!("#GGGGGG".parse::<BackColor>().is_err());
        assert!("1A2B3C4D".parse::<BackColor>().is_err());
        assert!("".parse::<BackColor>().is_err());
    }

    #[test]
    fn display_round_trips() {
        let color = BackColor { r: 1, g: 2, b: 3 };
        assert_eq!(color.to_string().parse::<BackColor>().unwrap(), color);
    }
}
