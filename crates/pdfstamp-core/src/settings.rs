//! Stamp settings
//!
//! The caller owns one [`StampSettings`] value per session and passes it into
//! every preview/export call. Settings can be loaded from JSON; missing
//! fields take the defaults below.

use crate::color::Rgb;
use crate::coords::{CoordinateMapper, DocPoint, DEFAULT_ZOOM};
use crate::error::StampError;
use crate::font::StampFont;
use crate::stamp::{StampSpec, DEFAULT_FONT_SIZE};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::ops::RangeInclusive;
use std::path::Path;
use std::str::FromStr;

pub const FONT_SIZE_RANGE: RangeInclusive<u32> = 6..=72;
pub const MAX_COORDINATE: u32 = 5000;

/// How stamped pages are delivered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExportMode {
    /// One PDF containing every selected page
    #[default]
    Group,
    /// One PDF per selected page, zipped
    PerPage,
}

impl FromStr for ExportMode {
    type Err = StampError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "group" | "merged" | "pdf" => Ok(ExportMode::Group),
            "per_page" | "per-page" | "perpage" | "zip" => Ok(ExportMode::PerPage),
            other => Err(StampError::InvalidSettings(format!(
                "unknown export mode {:?}: use group or per-page",
                other
            ))),
        }
    }
}

impl fmt::Display for ExportMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExportMode::Group => f.write_str("group"),
            ExportMode::PerPage => f.write_str("per-page"),
        }
    }
}

/// Everything the user can set for a stamp run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StampSettings {
    /// First half of the label; an empty event id means no label
    #[serde(default)]
    pub event_id: String,
    /// Second half of the label
    #[serde(default = "default_banner_id")]
    pub banner_id: String,
    /// Page range expression, empty for all pages
    #[serde(default)]
    pub pages: String,
    #[serde(default = "default_x")]
    pub x: u32,
    #[serde(default = "default_y")]
    pub y: u32,
    #[serde(default = "default_font_size")]
    pub font_size: u32,
    #[serde(default)]
    pub font: StampFont,
    /// Hex color, `#rrggbb`
    #[serde(default = "default_color")]
    pub color: String,
    #[serde(default)]
    pub mode: ExportMode,
    /// Preview zoom factor
    #[serde(default = "default_zoom")]
    pub zoom: f64,
}

fn default_banner_id() -> String {
    "1000".to_string()
}

fn default_x() -> u32 {
    105
}

fn default_y() -> u32 {
    72
}

fn default_font_size() -> u32 {
    DEFAULT_FONT_SIZE
}

fn default_color() -> String {
    "#000000".to_string()
}

fn default_zoom() -> f64 {
    DEFAULT_ZOOM
}

impl Default for StampSettings {
    fn default() -> Self {
        Self {
            event_id: String::new(),
            banner_id: default_banner_id(),
            pages: String::new(),
            x: default_x(),
            y: default_y(),
            font_size: default_font_size(),
            font: StampFont::default(),
            color: default_color(),
            mode: ExportMode::default(),
            zoom: default_zoom(),
        }
    }
}

impl StampSettings {
    /// Load settings from a JSON file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, StampError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            StampError::InvalidSettings(format!("failed to read {}: {}", path.display(), e))
        })?;
        Self::from_json(&content)
    }

    pub fn from_json(s: &str) -> Result<Self, StampError> {
        serde_json::from_str(s).map_err(|e| StampError::InvalidSettings(e.to_string()))
    }

    pub fn to_json(&self) -> Result<String, StampError> {
        serde_json::to_string_pretty(self).map_err(|e| StampError::InvalidSettings(e.to_string()))
    }

    /// `"{event_id}_{banner_id}"`, or empty when no event id is set
    pub fn label(&self) -> String {
        let event_id = self.event_id.trim();
        if event_id.is_empty() {
            String::new()
        } else {
            format!("{}_{}", event_id, self.banner_id.trim())
        }
    }

    /// Check every field against the accepted input ranges
    pub fn validate(&self) -> Result<(), StampError> {
        if !FONT_SIZE_RANGE.contains(&self.font_size) {
            return Err(StampError::InvalidSettings(format!(
                "font size {} is outside {}..={}",
                self.font_size,
                FONT_SIZE_RANGE.start(),
                FONT_SIZE_RANGE.end()
            )));
        }
        for (axis, value) in [("x", self.x), ("y", self.y)] {
            if value > MAX_COORDINATE {
                return Err(StampError::InvalidSettings(format!(
                    "{} = {} exceeds maximum of {}",
                    axis, value, MAX_COORDINATE
                )));
            }
        }
        if !self.zoom.is_finite() || self.zoom <= 0.0 {
            return Err(StampError::InvalidSettings(format!(
                "zoom must be a positive number, got {}",
                self.zoom
            )));
        }
        Rgb::from_hex(&self.color)?;
        Ok(())
    }

    pub fn anchor(&self) -> DocPoint {
        DocPoint::new(self.x, self.y)
    }

    pub fn mapper(&self) -> CoordinateMapper {
        CoordinateMapper::new(self.zoom, self.font_size)
    }

    /// Build the stamp described by these settings
    pub fn stamp_spec(&self) -> Result<StampSpec, StampError> {
        let color = Rgb::from_hex(&self.color)?;
        Ok(StampSpec::new(self.label(), self.anchor())
            .with_font(self.font)
            .with_font_size(self.font_size)
            .with_color(color))
    }

    /// Move the anchor to where a preview click lands
    pub fn place_at_pixel(&mut self, pixel_x: f64, pixel_y: f64) {
        let point = self.mapper().to_document(pixel_x, pixel_y);
        self.x = point.x.min(MAX_COORDINATE);
        self.y = point.y.min(MAX_COORDINATE);
    }
}
