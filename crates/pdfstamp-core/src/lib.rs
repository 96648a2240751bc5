//! PDF label stamping
//!
//! This crate copies selected pages out of a PDF and draws a short text label
//! on each of them using lopdf.
//!
//! - [`page_ranges`]: lenient `"1-3,5"` page selection
//! - [`coords`]: document / baseline / preview pixel mapping
//! - [`PdfStamper`]: the lopdf [`DocumentStampingService`]
//! - [`render_preview`] / [`export`]: the two user-facing actions, driven by
//!   a caller-owned [`StampSettings`]

pub mod color;
pub mod coords;
pub mod document;
pub mod error;
pub mod export;
pub mod font;
pub mod page_ranges;
pub mod preview;
pub mod service;
pub mod settings;
pub mod stamp;
pub mod stamper;

pub use color::Rgb;
pub use coords::{CoordinateMapper, DocPoint, MediaBox, PixelPoint};
pub use document::SourceDocument;
pub use error::StampError;
pub use export::{export, ExportArtifact};
pub use font::StampFont;
pub use page_ranges::{parse_page_ranges, PageSelection};
pub use preview::{render_preview, Preview};
pub use service::DocumentStampingService;
pub use settings::{ExportMode, StampSettings};
pub use stamp::StampSpec;
pub use stamper::PdfStamper;

/// Parse PDF bytes and return page count
pub fn get_page_count(bytes: &[u8]) -> Result<usize, StampError> {
    Ok(SourceDocument::load(bytes)?.page_count())
}
