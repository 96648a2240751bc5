//! Stamp colors

use crate::error::StampError;
use serde::{Deserialize, Serialize};

/// RGB color with channels in `0.0..=1.0`, ready for the PDF `rg` operator
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rgb {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb {
        r: 0.0,
        g: 0.0,
        b: 0.0,
    };

    /// Parse hex color string (e.g., "#FF0000" or "ff0000")
    pub fn from_hex(color: &str) -> Result<Self, StampError> {
        let hex = color.trim();
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(StampError::InvalidColor(color.to_string()));
        }

        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&hex[range], 16)
                .map(|value| f32::from(value) / 255.0)
                .map_err(|_| StampError::InvalidColor(color.to_string()))
        };

        Ok(Self {
            r: channel(0..2)?,
            g: channel(2..4)?,
            b: channel(4..6)?,
        })
    }

    /// Channels as 8-bit values, for drawing on preview images
    pub fn to_bytes(self) -> [u8; 3] {
        let scale = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
        [scale(self.r), scale(self.g), scale(self.b)]
    }

    pub fn to_hex(self) -> String {
        let [r, g, b] = self.to_bytes();
        format!("#{:02x}{:02x}{:02x}", r, g, b)
    }
}

impl Default for Rgb {
    fn default() -> Self {
        Self::BLACK
    }
}
