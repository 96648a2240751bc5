//! The stamp to draw: label text plus its placement and style

use crate::color::Rgb;
use crate::coords::DocPoint;
use crate::font::StampFont;
use serde::{Deserialize, Serialize};

pub const DEFAULT_FONT_SIZE: u32 = 12;

/// Immutable description of one stamp.
///
/// `anchor` is the user-facing position in document units; the text is
/// drawn at [`StampSpec::baseline`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StampSpec {
    pub text: String,
    pub font: StampFont,
    pub font_size: u32,
    pub color: Rgb,
    pub anchor: DocPoint,
}

impl StampSpec {
    pub fn new(text: impl Into<String>, anchor: DocPoint) -> Self {
        Self {
            text: text.into(),
            font: StampFont::default(),
            font_size: DEFAULT_FONT_SIZE,
            color: Rgb::BLACK,
            anchor,
        }
    }

    pub fn with_font(mut self, font: StampFont) -> Self {
        self.font = font;
        self
    }

    /// Font size is kept positive
    pub fn with_font_size(mut self, font_size: u32) -> Self {
        self.font_size = font_size.max(1);
        self
    }

    pub fn with_color(mut self, color: Rgb) -> Self {
        self.color = color;
        self
    }

    /// Blank text means pages are copied without a stamp
    pub fn has_text(&self) -> bool {
        !self.text.trim().is_empty()
    }

    pub fn baseline(&self) -> DocPoint {
        DocPoint {
            x: self.anchor.x,
            y: self.anchor.y.saturating_add(self.font_size),
        }
    }
}
