//! The document operations the preview and export steps depend on

use crate::error::StampError;
use crate::stamp::StampSpec;
use image::RgbImage;

/// Rasterizes pages and produces stamped copies of one source document.
///
/// [`crate::PdfStamper`] is the lopdf implementation. Front ends with a real
/// renderer (pdfium, PDF.js) implement this to get content-accurate previews.
pub trait DocumentStampingService {
    fn page_count(&self) -> usize;

    /// Render a page (0-based) at `zoom` pixels per document unit
    fn rasterize(&self, page_index: usize, zoom: f64) -> Result<RgbImage, StampError>;

    /// New PDF with `pages` (0-based, ascending) copied from the source and
    /// `spec` drawn on each of them when its text is non-blank.
    fn stamp(&self, pages: &[usize], spec: &StampSpec) -> Result<Vec<u8>, StampError>;
}
