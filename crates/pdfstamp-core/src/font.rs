//! Stamp fonts
//!
//! Stamps are drawn with PDF standard 14 fonts so nothing has to be embedded.

use crate::error::StampError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StampFont {
    #[default]
    Sans,
    Serif,
    Mono,
}

impl StampFont {
    pub const ALL: [StampFont; 3] = [StampFont::Sans, StampFont::Serif, StampFont::Mono];

    /// PDF standard font name used as `/BaseFont`
    pub fn base_font(self) -> &'static str {
        match self {
            StampFont::Sans => "Helvetica",
            StampFont::Serif => "Times-Roman",
            StampFont::Mono => "Courier",
        }
    }

    /// Rough average glyph advance as a fraction of the font size.
    ///
    /// Only used to size the preview guide mark.
    pub fn average_advance(self) -> f64 {
        match self {
            StampFont::Sans => 0.55,
            StampFont::Serif => 0.5,
            StampFont::Mono => 0.6,
        }
    }
}

impl FromStr for StampFont {
    type Err = StampError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "sans" | "sans-serif" | "helv" | "helvetica" => Ok(StampFont::Sans),
            "serif" | "times" | "tiro" | "times-roman" => Ok(StampFont::Serif),
            "mono" | "monospace" | "cour" | "courier" => Ok(StampFont::Mono),
            _ => Err(StampError::InvalidFont(s.to_string())),
        }
    }
}

impl fmt::Display for StampFont {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            StampFont::Sans => "sans",
            StampFont::Serif => "serif",
            StampFont::Mono => "mono",
        };
        f.write_str(label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_aliases() {
        assert_eq!("Helvetica".parse::<StampFont>().unwrap(), StampFont::Sans);
        assert_eq!(" tiro ".parse::<StampFont>().unwrap(), StampFont::Serif);
        assert_eq!("COUR".parse::<StampFont>().unwrap(), StampFont::Mono);
        assert!("comic".parse::<StampFont>().is_err());
    }

    #[test]
    fn test_display_parses_back() {
        for font in StampFont::ALL {
            assert_eq!(font.to_string().parse::<StampFont>().unwrap(), font);
        }
    }

    #[test]
    fn test_base_fonts_are_standard() {
        assert_eq!(StampFont::Sans.base_font(), "Helvetica");
        assert_eq!(StampFont::Serif.base_font(), "Times-Roman");
        assert_eq!(StampFont::Mono.base_font(), "Courier");
    }
}
