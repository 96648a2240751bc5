//! Coordinate transformation between document, baseline and preview space
//!
//! Stamp positions are entered in document units with a top-left origin.
//! The text primitive wants a baseline anchor, which sits `font_size` units
//! below the entered point. Previews are the page rasterized at `zoom`.

use serde::{Deserialize, Serialize};

pub const DEFAULT_ZOOM: f64 = 1.25;

/// A point in document units, origin top-left, y growing downward
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DocPoint {
    pub x: u32,
    pub y: u32,
}

impl DocPoint {
    pub fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }
}

/// A pixel in a rasterized preview image
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PixelPoint {
    pub x: u32,
    pub y: u32,
}

/// Page box in PDF user space (bottom-left origin)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MediaBox {
    pub llx: f64,
    pub lly: f64,
    pub urx: f64,
    pub ury: f64,
}

impl MediaBox {
    /// US Letter, the fallback when a page carries no usable box
    pub const LETTER: MediaBox = MediaBox {
        llx: 0.0,
        lly: 0.0,
        urx: 612.0,
        ury: 792.0,
    };

    /// Build from a PDF `[x1 y1 x2 y2]` array, normalizing corner order.
    pub fn from_corners(values: [f64; 4]) -> Self {
        let [x1, y1, x2, y2] = values;
        Self {
            llx: x1.min(x2),
            lly: y1.min(y2),
            urx: x1.max(x2),
            ury: y1.max(y2),
        }
    }

    pub fn width(&self) -> f64 {
        self.urx - self.llx
    }

    pub fn height(&self) -> f64 {
        self.ury - self.lly
    }
}

/// Maps between document points and preview pixels for one zoom/font size.
///
/// Forward: `pixel = round((doc + baseline offset) * zoom)`.
/// Inverse: `doc = max(0, round(pixel / zoom) - baseline offset)`.
/// The baseline offset is `font_size` on the y axis and zero on x.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoordinateMapper {
    zoom: f64,
    font_size: u32,
}

impl CoordinateMapper {
    /// Inputs are never rejected: a non-finite or non-positive zoom becomes
    /// [`DEFAULT_ZOOM`], and font size is at least 1. Any other zoom is used
    /// as given.
    pub fn new(zoom: f64, font_size: u32) -> Self {
        let zoom = if zoom.is_finite() && zoom > 0.0 {
            zoom
        } else {
            DEFAULT_ZOOM
        };
        Self {
            zoom,
            font_size: font_size.max(1),
        }
    }

    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    pub fn font_size(&self) -> u32 {
        self.font_size
    }

    /// The text-drawing anchor for a user-facing position
    pub fn baseline(&self, point: DocPoint) -> DocPoint {
        DocPoint {
            x: point.x,
            y: point.y.saturating_add(self.font_size),
        }
    }

    /// Document → preview without rounding
    pub fn project(&self, x: f64, y: f64) -> (f64, f64) {
        (x * self.zoom, (y + f64::from(self.font_size)) * self.zoom)
    }

    /// Preview → document without rounding or clamping
    pub fn unproject(&self, pixel_x: f64, pixel_y: f64) -> (f64, f64) {
        (
            pixel_x / self.zoom,
            pixel_y / self.zoom - f64::from(self.font_size),
        )
    }

    /// Where the guide mark for `point` lands in the preview image
    pub fn to_preview(&self, point: DocPoint) -> PixelPoint {
        let (x, y) = self.project(f64::from(point.x), f64::from(point.y));
        PixelPoint {
            x: x.round() as u32,
            y: y.round() as u32,
        }
    }

    /// Document position for a click at `(pixel_x, pixel_y)` in the preview
    pub fn to_document(&self, pixel_x: f64, pixel_y: f64) -> DocPoint {
        let x = (pixel_x / self.zoom).round() as i64;
        let y = (pixel_y / self.zoom).round() as i64 - i64::from(self.font_size);
        DocPoint {
            x: clamp_to_u32(x),
            y: clamp_to_u32(y),
        }
    }
}

impl Default for CoordinateMapper {
    fn default() -> Self {
        Self::new(DEFAULT_ZOOM, 12)
    }
}

fn clamp_to_u32(value: i64) -> u32 {
    value.clamp(0, i64::from(u32::MAX)) as u32
}

/// Convert a top-left-origin baseline point into PDF user space.
pub fn to_pdf_space(baseline: DocPoint, media_box: MediaBox) -> (f64, f64) {
    (
        media_box.llx + f64::from(baseline.x),
        media_box.ury - f64::from(baseline.y),
    )
}
