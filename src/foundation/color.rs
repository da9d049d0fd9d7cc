use crate::foundation::core::Rgba8;
use crate::foundation::error::{CountdownError, CountdownResult};
use serde::{Deserialize, Serialize};

/// Display color of a countdown: a 24-bit RGB value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb8 {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
}

impl Rgb8 {
    /// Construct from channels.
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse `#RRGGBB`, `RRGGBB` or `#RGB` (case-insensitive).
    pub fn parse_hex(s: &str) -> CountdownResult<Self> {
        let s = s.trim();
        let s = s.strip_prefix('#').unwrap_or(s);

        fn hex_byte(pair: &str) -> CountdownResult<u8> {
            u8::from_str_radix(pair, 16)
                .map_err(|_| CountdownError::validation(format!("invalid hex byte \"{pair}\"")))
        }

        if !s.is_ascii() {
            return Err(CountdownError::validation(
                "hex color must be #RRGGBB or #RGB",
            ));
        }

        match s.len() {
            6 => Ok(Self::new(
                hex_byte(&s[0..2])?,
                hex_byte(&s[2..4])?,
                hex_byte(&s[4..6])?,
            )),
            3 => {
                let nib = |i: usize| -> CountdownResult<u8> {
                    let v = hex_byte(&s[i..i + 1])?;
                    Ok(v * 17)
                };
                Ok(Self::new(nib(0)?, nib(1)?, nib(2)?))
            }
            _ => Err(CountdownError::validation(
                "hex color must be #RRGGBB or #RGB",
            )),
        }
    }

    /// Lowercase `#rrggbb`.
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// Packed `0xRRGGBB`.
    pub fn to_u32(self) -> u32 {
        (u32::from(self.r) << 16) | (u32::from(self.g) << 8) | u32::from(self.b)
    }

    /// Opaque straight-alpha form.
    pub fn to_rgba8(self) -> Rgba8 {
        Rgba8::opaque(self.r, self.g, self.b)
    }

    /// Brighten (or darken, for negative `percent`) every channel by `round(2.55 * percent)`,
    /// clamped into `[0, 255]`.
    ///
    /// Rounding is half-up (`floor(x + 0.5)`) on the IEEE product, so `adjust(30)` adds 77,
    /// `adjust(50)` adds 127 and `adjust(100)` adds 255.
    pub fn adjust(self, percent: i32) -> Self {
        let amt = (2.55 * f64::from(percent) + 0.5).floor() as i32;
        let ch = |c: u8| -> u8 { (i32::from(c) + amt).clamp(0, 255) as u8 };
        Self::new(ch(self.r), ch(self.g), ch(self.b))
    }
}

/// Hex-string convenience over [`Rgb8::adjust`].
pub fn adjust_color(hex: &str, percent: i32) -> CountdownResult<String> {
    Ok(Rgb8::parse_hex(hex)?.adjust(percent).to_hex())
}

impl Serialize for Rgb8 {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Rgb8 {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Self::parse_hex(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/color.rs"]
mod tests;
