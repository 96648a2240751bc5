//! Drawing stamps into PDF pages with lopdf

use crate::coords::{to_pdf_space, CoordinateMapper};
use crate::document::{
    inherited_attribute, page_box, page_dict, resolve, save_document, SourceDocument,
};
use crate::error::StampError;
use crate::font::StampFont;
use crate::service::DocumentStampingService;
use crate::stamp::StampSpec;
use image::RgbImage;
use lopdf::content::{Content, Operation};
use lopdf::{Dictionary, Document, Object, ObjectId, Stream, StringFormat};
use tracing::instrument;

/// Largest preview edge in pixels
const MAX_RASTER_SIDE: f64 = 16384.0;

const PAGE_BACKGROUND: image::Rgb<u8> = image::Rgb([255, 255, 255]);
const PAGE_OUTLINE: image::Rgb<u8> = image::Rgb([160, 160, 160]);

/// lopdf-backed stamping service for one source document.
///
/// Its rasterizer has no content renderer: pages come out as a blank canvas
/// of the right size with a thin outline, which is enough to place a stamp.
#[derive(Debug, Clone)]
pub struct PdfStamper {
    source: SourceDocument,
}

impl PdfStamper {
    pub fn load(bytes: &[u8]) -> Result<Self, StampError> {
        Ok(Self::new(SourceDocument::load(bytes)?))
    }

    pub fn new(source: SourceDocument) -> Self {
        Self { source }
    }

    pub fn source(&self) -> &SourceDocument {
        &self.source
    }
}

impl DocumentStampingService for PdfStamper {
    fn page_count(&self) -> usize {
        self.source.page_count()
    }

    fn rasterize(&self, page_index: usize, zoom: f64) -> Result<RgbImage, StampError> {
        let page_box = self.source.page_box(page_index)?;
        let zoom = CoordinateMapper::new(zoom, 1).zoom();
        let width = (page_box.width() * zoom).ceil().max(1.0);
        let height = (page_box.height() * zoom).ceil().max(1.0);
        if width > MAX_RASTER_SIDE || height > MAX_RASTER_SIDE {
            return Err(StampError::RenderError(format!(
                "page {} would render at {}x{} pixels",
                page_index + 1,
                width,
                height
            )));
        }

        let mut image = RgbImage::from_pixel(width as u32, height as u32, PAGE_BACKGROUND);
        draw_outline(&mut image);
        Ok(image)
    }

    #[instrument(skip(self, spec), fields(text = %spec.text))]
    fn stamp(&self, pages: &[usize], spec: &StampSpec) -> Result<Vec<u8>, StampError> {
        let mut doc = self.source.extract_pages(pages)?;

        if spec.has_text() {
            let page_ids: Vec<ObjectId> = doc.get_pages().into_values().collect();
            for page_id in page_ids {
                draw_text(&mut doc, page_id, spec)?;
            }
        } else {
            tracing::debug!("blank label, copying pages without a stamp");
        }

        save_document(&mut doc)
    }
}

fn draw_outline(image: &mut RgbImage) {
    let (width, height) = image.dimensions();
    for x in 0..width {
        image.put_pixel(x, 0, PAGE_OUTLINE);
        image.put_pixel(x, height - 1, PAGE_OUTLINE);
    }
    for y in 0..height {
        image.put_pixel(0, y, PAGE_OUTLINE);
        image.put_pixel(width - 1, y, PAGE_OUTLINE);
    }
}

/// Draw `spec` on one page at its baseline anchor
fn draw_text(doc: &mut Document, page_id: ObjectId, spec: &StampSpec) -> Result<(), StampError> {
    let (x, y) = to_pdf_space(spec.baseline(), page_box(doc, page_id));
    let font_name = register_font(doc, page_id, spec.font)?;

    let content = Content {
        operations: vec![
            // Closes the q that wraps the original page content
            Operation::new("Q", vec![]),
            Operation::new("q", vec![]),
            Operation::new("BT", vec![]),
            Operation::new(
                "Tf",
                vec![
                    Object::Name(font_name),
                    Object::Integer(i64::from(spec.font_size)),
                ],
            ),
            Operation::new(
                "rg",
                vec![
                    Object::Real(spec.color.r),
                    Object::Real(spec.color.g),
                    Object::Real(spec.color.b),
                ],
            ),
            Operation::new("Td", vec![Object::Real(x as f32), Object::Real(y as f32)]),
            Operation::new(
                "Tj",
                vec![Object::String(
                    encode_win_ansi(&spec.text),
                    StringFormat::Literal,
                )],
            ),
            Operation::new("ET", vec![]),
            Operation::new("Q", vec![]),
        ],
    };

    let mut bytes = b"\n".to_vec();
    bytes.extend(
        content
            .encode()
            .map_err(|e| StampError::OperationError(format!("Content encoding failed: {}", e)))?,
    );

    wrap_page_contents(doc, page_id, bytes)
}

/// Surround the existing content with `q` ... and append the stamp stream.
fn wrap_page_contents(
    doc: &mut Document,
    page_id: ObjectId,
    stamp: Vec<u8>,
) -> Result<(), StampError> {
    let existing: Vec<Object> = match page_dict(doc, page_id)?.get(b"Contents") {
        Ok(Object::Reference(id)) => match doc.get_object(*id) {
            Ok(Object::Array(items)) => items.clone(),
            _ => vec![Object::Reference(*id)],
        },
        Ok(Object::Array(items)) => items.clone(),
        _ => Vec::new(),
    };

    let open_id = doc.add_object(Stream::new(Dictionary::new(), b"q\n".to_vec()));
    let stamp_id = doc.add_object(Stream::new(Dictionary::new(), stamp));

    let mut contents = Vec::with_capacity(existing.len() + 2);
    contents.push(Object::Reference(open_id));
    contents.extend(existing);
    contents.push(Object::Reference(stamp_id));

    let page = doc
        .get_object_mut(page_id)
        .and_then(Object::as_dict_mut)
        .map_err(|e| StampError::OperationError(e.to_string()))?;
    page.set("Contents", Object::Array(contents));
    Ok(())
}

/// Add a standard-14 font to the page resources, returning its resource name.
///
/// Resources are copied onto the page first so that inherited or shared
/// dictionaries are left untouched.
fn register_font(
    doc: &mut Document,
    page_id: ObjectId,
    font: StampFont,
) -> Result<Vec<u8>, StampError> {
    let mut resources = inherited_attribute(doc, page_id, b"Resources")
        .map(|object| resolve(doc, object))
        .and_then(|object| object.as_dict().ok())
        .cloned()
        .unwrap_or_else(Dictionary::new);

    let mut fonts = resources
        .get(b"Font")
        .ok()
        .map(|object| resolve(doc, object))
        .and_then(|object| object.as_dict().ok())
        .cloned()
        .unwrap_or_else(Dictionary::new);

    let name = unique_font_name(&fonts);
    let font_id = doc.add_object(Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Font".to_vec())),
        ("Subtype", Object::Name(b"Type1".to_vec())),
        ("BaseFont", Object::Name(font.base_font().as_bytes().to_vec())),
        ("Encoding", Object::Name(b"WinAnsiEncoding".to_vec())),
    ]));
    fonts.set(name.clone(), Object::Reference(font_id));
    resources.set("Font", Object::Dictionary(fonts));

    let page = doc
        .get_object_mut(page_id)
        .and_then(Object::as_dict_mut)
        .map_err(|e| StampError::OperationError(e.to_string()))?;
    page.set("Resources", Object::Dictionary(resources));

    Ok(name)
}

fn unique_font_name(fonts: &Dictionary) -> Vec<u8> {
    let mut n = 1;
    loop {
        let name = format!("FStamp{}", n).into_bytes();
        if !fonts.has(&name) {
            return name;
        }
        n += 1;
    }
}

/// Encode text for a WinAnsi simple font; anything outside Latin-1 becomes `?`
fn encode_win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| match c as u32 {
            code @ (0x20..=0x7E | 0xA0..=0xFF) => code as u8,
            _ => b'?',
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Rgb;
    use crate::coords::DocPoint;
    use crate::document::test_support::{create_test_pdf, create_test_pdf_sized, set_crop_box};

    fn number(object: &Object) -> f64 {
        match object {
            Object::Integer(value) => *value as f64,
            Object::Real(value) => *value as f64,
            other => panic!("not a number: {:?}", other),
        }
    }

    fn page_operations(doc: &Document, page_id: ObjectId) -> Vec<Operation> {
        let content = doc.get_page_content(page_id).unwrap();
        Content::decode(&content).unwrap().operations
    }

    fn find_op<'a>(ops: &'a [Operation], operator: &str) -> Vec<&'a Operation> {
        ops.iter().filter(|op| op.operator == operator).collect()
    }

    fn stamped(pages: &[usize], spec: &StampSpec, num_pages: u32) -> Document {
        let stamper = PdfStamper::load(&create_test_pdf(num_pages)).unwrap();
        let bytes = stamper.stamp(pages, spec).unwrap();
        Document::load_mem(&bytes).unwrap()
    }

    #[test]
    fn test_stamp_keeps_selected_page_count() {
        let spec = StampSpec::new("EV1_1000", DocPoint::new(105, 72));
        let doc = stamped(&[0, 2, 4], &spec, 6);
        assert_eq!(doc.get_pages().len(), 3);
    }

    #[test]
    fn test_stamp_draws_label_at_baseline() {
        let spec = StampSpec::new("EV1_1000", DocPoint::new(105, 72)).with_font_size(12);
        let doc = stamped(&[0], &spec, 2);
        let page_id = doc.get_pages().into_values().next().unwrap();
        let ops = page_operations(&doc, page_id);

        let shows = find_op(&ops, "Tj");
        let texts: Vec<&[u8]> = shows
            .iter()
            .filter_map(|op| op.operands[0].as_str().ok())
            .collect();
        assert!(texts.contains(&b"EV1_1000".as_slice()), "{:?}", texts);

        // Original "Page 1" Td comes first, the stamp Td last
        let td = find_op(&ops, "Td");
        let stamp_td = td.last().unwrap();
        assert_eq!(number(&stamp_td.operands[0]), 105.0);
        assert_eq!(number(&stamp_td.operands[1]), 792.0 - 84.0);
    }

    #[test]
    fn test_stamp_uses_page_height_for_flip() {
        let stamper = PdfStamper::load(&create_test_pdf_sized(1, 595, 842)).unwrap();
        let spec = StampSpec::new("A4", DocPoint::new(10, 20)).with_font_size(10);
        let doc = Document::load_mem(&stamper.stamp(&[0], &spec).unwrap()).unwrap();
        let page_id = doc.get_pages().into_values().next().unwrap();
        let ops = page_operations(&doc, page_id);
        let stamp_td = *find_op(&ops, "Td").last().unwrap();
        assert_eq!(number(&stamp_td.operands[1]), 842.0 - 30.0);
    }

    #[test]
    fn test_stamp_flips_against_crop_box() {
        let mut source = Document::load_mem(&create_test_pdf(1)).unwrap();
        let page_id = source.get_pages()[&1];
        set_crop_box(&mut source, page_id, [0, 0, 612, 700]);

        let stamper = PdfStamper::new(SourceDocument::from_document(source));
        let spec = StampSpec::new("CROP", DocPoint::new(105, 72)).with_font_size(12);
        let doc = Document::load_mem(&stamper.stamp(&[0], &spec).unwrap()).unwrap();
        let page_id = doc.get_pages().into_values().next().unwrap();
        let ops = page_operations(&doc, page_id);
        let stamp_td = *find_op(&ops, "Td").last().unwrap();
        assert_eq!(number(&stamp_td.operands[0]), 105.0);
        assert_eq!(number(&stamp_td.operands[1]), 700.0 - 84.0);
    }

    #[test]
    fn test_stamp_sets_font_and_color() {
        let spec = StampSpec::new("X", DocPoint::new(0, 0))
            .with_font(StampFont::Mono)
            .with_font_size(18)
            .with_color(Rgb::from_hex("#ff0000").unwrap());
        let doc = stamped(&[0], &spec, 1);
        let page_id = doc.get_pages().into_values().next().unwrap();
        let ops = page_operations(&doc, page_id);

        let tf = *find_op(&ops, "Tf").last().unwrap();
        let font_name = tf.operands[0].as_name().unwrap().to_vec();
        assert_eq!(number(&tf.operands[1]), 18.0);

        let rg = *find_op(&ops, "rg").last().unwrap();
        let channels: Vec<f64> = rg.operands.iter().map(number).collect();
        assert_eq!(channels, vec![1.0, 0.0, 0.0]);

        let resources = page_dict(&doc, page_id)
            .unwrap()
            .get(b"Resources")
            .unwrap()
            .as_dict()
            .unwrap();
        let fonts = resources.get(b"Font").unwrap().as_dict().unwrap();
        let font = doc
            .get_object(fonts.get(&font_name).unwrap().as_reference().unwrap())
            .unwrap()
            .as_dict()
            .unwrap();
        assert_eq!(font.get(b"BaseFont").unwrap().as_name().unwrap(), b"Courier");
        // The inherited F1 stays reachable next to the stamp font
        assert!(fonts.has(b"F1"));
    }

    #[test]
    fn test_stamp_wraps_original_content() {
        let spec = StampSpec::new("W", DocPoint::new(1, 1));
        let doc = stamped(&[0], &spec, 1);
        let page_id = doc.get_pages().into_values().next().unwrap();
        let ops = page_operations(&doc, page_id);
        assert_eq!(ops.first().unwrap().operator, "q");
        assert_eq!(ops.last().unwrap().operator, "Q");
        assert_eq!(find_op(&ops, "q").len(), find_op(&ops, "Q").len());
    }

    #[test]
    fn test_blank_label_copies_pages_unstamped() {
        let spec = StampSpec::new("   ", DocPoint::new(105, 72));
        let doc = stamped(&[1], &spec, 3);
        let page_id = doc.get_pages().into_values().next().unwrap();
        let ops = page_operations(&doc, page_id);
        assert_eq!(find_op(&ops, "Tj").len(), 1);
    }

    #[test]
    fn test_stamp_rejects_missing_page() {
        let stamper = PdfStamper::load(&create_test_pdf(2)).unwrap();
        let spec = StampSpec::new("X", DocPoint::default());
        assert!(matches!(
            stamper.stamp(&[5], &spec),
            Err(StampError::PageOutOfRange { index: 5, total: 2 })
        ));
    }

    #[test]
    fn test_rasterize_matches_page_size() {
        let stamper = PdfStamper::load(&create_test_pdf(1)).unwrap();
        let image = stamper.rasterize(0, 1.25).unwrap();
        assert_eq!(image.dimensions(), (765, 990));
        assert_eq!(*image.get_pixel(10, 10), PAGE_BACKGROUND);
        assert_eq!(*image.get_pixel(0, 0), PAGE_OUTLINE);
    }

    #[test]
    fn test_rasterize_uses_crop_box() {
        let mut source = Document::load_mem(&create_test_pdf(1)).unwrap();
        let page_id = source.get_pages()[&1];
        set_crop_box(&mut source, page_id, [0, 0, 612, 700]);

        let stamper = PdfStamper::new(SourceDocument::from_document(source));
        assert_eq!(stamper.rasterize(0, 1.0).unwrap().dimensions(), (612, 700));
    }

    #[test]
    fn test_rasterize_high_zoom_is_not_capped_below_size_limit() {
        let stamper = PdfStamper::load(&create_test_pdf_sized(1, 100, 50)).unwrap();
        assert_eq!(stamper.rasterize(0, 10.0).unwrap().dimensions(), (1000, 500));
        assert!(matches!(
            stamper.rasterize(0, 200.0),
            Err(StampError::RenderError(_))
        ));
    }

    #[test]
    fn test_rasterize_out_of_range() {
        let stamper = PdfStamper::load(&create_test_pdf(1)).unwrap();
        assert!(stamper.rasterize(1, 1.0).is_err());
    }

    #[test]
    fn test_encode_win_ansi() {
        assert_eq!(encode_win_ansi("Café 1"), b"Caf\xe9 1".to_vec());
        assert_eq!(encode_win_ansi("日本"), b"??".to_vec());
    }
}
