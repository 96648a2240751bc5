//! Stamp previews
//!
//! The first selected page is rasterized and a guide mark is drawn where the
//! label baseline will start, using the same baseline convention as export.

use crate::coords::PixelPoint;
use crate::error::StampError;
use crate::page_ranges::PageSelection;
use crate::service::DocumentStampingService;
use crate::settings::StampSettings;
use image::{ImageFormat, RgbImage};
use std::io::Cursor;

const GUIDE_COLOR: image::Rgb<u8> = image::Rgb([220, 30, 30]);
const GUIDE_ARM: u32 = 6;
const GUIDE_TICK: u32 = 4;

/// A rendered preview of the first selected page
#[derive(Debug, Clone)]
pub struct Preview {
    pub image: RgbImage,
    /// 1-based
    pub page_number: usize,
    pub total_pages: usize,
    pub selection: PageSelection,
    /// Where the guide mark was drawn, `None` for a blank label
    pub guide: Option<PixelPoint>,
}

impl Preview {
    pub fn caption(&self) -> String {
        format!("Page {} / {}", self.page_number, self.total_pages)
    }

    pub fn to_png(&self) -> Result<Vec<u8>, StampError> {
        let mut buffer = Cursor::new(Vec::new());
        self.image
            .write_to(&mut buffer, ImageFormat::Png)
            .map_err(|e| StampError::RenderError(e.to_string()))?;
        Ok(buffer.into_inner())
    }
}

/// Render the preview described by `settings`
///
/// The label text itself is not drawn, since there is no font rasterizer.
/// The guide mark is a crosshair at the mapped anchor plus a baseline rule
/// as long as the estimated label width.
pub fn render_preview<S>(service: &S, settings: &StampSettings) -> Result<Preview, StampError>
where
    S: DocumentStampingService + ?Sized,
{
    let total_pages = service.page_count();
    let selection = PageSelection::resolve(&settings.pages, total_pages);
    let page_index = selection
        .first()
        .ok_or_else(|| StampError::RenderError("document has no pages".to_string()))?;

    let mapper = settings.mapper();
    let mut image = service.rasterize(page_index, mapper.zoom())?;

    let label = settings.label();
    let guide = if label.trim().is_empty() {
        None
    } else {
        let at = mapper.to_preview(settings.anchor());
        let width = label.chars().count() as f64
            * f64::from(mapper.font_size())
            * settings.font.average_advance()
            * mapper.zoom();
        draw_guide_mark(&mut image, at, width.round() as u32);
        Some(at)
    };

    tracing::debug!(
        page = page_index + 1,
        total_pages,
        ?guide,
        "rendered preview"
    );

    Ok(Preview {
        image,
        page_number: page_index + 1,
        total_pages,
        selection,
        guide,
    })
}

/// Crosshair at `at` plus a baseline `width` pixels long ending in a tick.
/// Pixels falling outside the image are skipped.
pub fn draw_guide_mark(image: &mut RgbImage, at: PixelPoint, width: u32) {
    let mut plot = |x: i64, y: i64| {
        if x >= 0 && y >= 0 && x < i64::from(image.width()) && y < i64::from(image.height()) {
            image.put_pixel(x as u32, y as u32, GUIDE_COLOR);
        }
    };

    let (cx, cy) = (i64::from(at.x), i64::from(at.y));
    let arm = i64::from(GUIDE_ARM);
    for d in -arm..=arm {
        plot(cx + d, cy);
        plot(cx, cy + d);
    }

    let end = cx + i64::from(width);
    for x in cx..=end {
        plot(x, cy);
    }
    for d in 0..=i64::from(GUIDE_TICK) {
        plot(end, cy - d);
    }
}
