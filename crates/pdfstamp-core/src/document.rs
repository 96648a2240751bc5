//! Source PDF loading and page extraction
//!
//! Pages are copied by "Construction by Whitelist": clone the document,
//! delete every page that was not selected, then prune the objects that
//! became unreachable.

use crate::coords::MediaBox;
use crate::error::StampError;
use lopdf::{Dictionary, Document, Object, ObjectId};
use std::collections::HashSet;

/// Page tree nesting we are willing to follow when resolving inherited keys
const MAX_TREE_DEPTH: usize = 64;

/// A parsed source PDF that stamped copies are made from
#[derive(Debug, Clone)]
pub struct SourceDocument {
    doc: Document,
    page_ids: Vec<ObjectId>,
}

impl SourceDocument {
    pub fn load(bytes: &[u8]) -> Result<Self, StampError> {
        let doc = Document::load_mem(bytes).map_err(|e| StampError::ParseError(e.to_string()))?;
        if doc.is_encrypted() {
            return Err(StampError::ParseError(
                "document is encrypted".to_string(),
            ));
        }
        Ok(Self::from_document(doc))
    }

    pub fn from_document(doc: Document) -> Self {
        let page_ids = doc.get_pages().into_values().collect();
        Self { doc, page_ids }
    }

    pub fn page_count(&self) -> usize {
        self.page_ids.len()
    }

    pub fn page_id(&self, index: usize) -> Result<ObjectId, StampError> {
        self.page_ids
            .get(index)
            .copied()
            .ok_or(StampError::PageOutOfRange {
                index,
                total: self.page_count(),
            })
    }

    /// Visible box of a page (0-based), following inheritance from the page tree
    pub fn page_box(&self, index: usize) -> Result<MediaBox, StampError> {
        let page_id = self.page_id(index)?;
        Ok(page_box(&self.doc, page_id))
    }

    /// Build a new document holding only `indices` (0-based, ascending).
    pub fn extract_pages(&self, indices: &[usize]) -> Result<Document, StampError> {
        if indices.is_empty() {
            return Err(StampError::OperationError("No pages specified".into()));
        }

        let page_count = self.page_count();
        if let Some(&index) = indices.iter().find(|&&index| index >= page_count) {
            return Err(StampError::PageOutOfRange {
                index,
                total: page_count,
            });
        }

        let mut new_doc = self.doc.clone();

        // lopdf numbers pages from 1
        let pages_to_keep: HashSet<u32> = indices.iter().map(|&i| i as u32 + 1).collect();
        let mut pages_to_delete: Vec<u32> = (1..=page_count as u32)
            .filter(|p| !pages_to_keep.contains(p))
            .collect();

        // Delete unwanted pages in reverse order to keep numbering stable
        pages_to_delete.reverse();
        for page_num in pages_to_delete {
            new_doc.delete_pages(&[page_num]);
        }

        new_doc.prune_objects();

        tracing::debug!(
            kept = indices.len(),
            source_pages = page_count,
            "extracted pages"
        );

        Ok(new_doc)
    }
}

/// Compress and serialize a document
pub fn save_document(doc: &mut Document) -> Result<Vec<u8>, StampError> {
    doc.compress();

    let mut buffer = Vec::new();
    doc.save_to(&mut buffer)
        .map_err(|e| StampError::OperationError(format!("Save failed: {}", e)))?;

    Ok(buffer)
}

/// Look up `key` on a page, walking up `/Parent` links for inheritable keys.
pub(crate) fn inherited_attribute<'a>(
    doc: &'a Document,
    page_id: ObjectId,
    key: &[u8],
) -> Option<&'a Object> {
    let mut node_id = page_id;
    for _ in 0..MAX_TREE_DEPTH {
        let node = doc.get_object(node_id).and_then(Object::as_dict).ok()?;
        if let Ok(value) = node.get(key) {
            return Some(value);
        }
        node_id = node.get(b"Parent").and_then(Object::as_reference).ok()?;
    }
    None
}

/// Follow a single level of indirection
pub(crate) fn resolve<'a>(doc: &'a Document, object: &'a Object) -> &'a Object {
    match object {
        Object::Reference(id) => doc.get_object(*id).unwrap_or(object),
        other => other,
    }
}

/// The box viewers display: `/CropBox` when present and usable, otherwise
/// `/MediaBox`, otherwise US Letter.
pub(crate) fn page_box(doc: &Document, page_id: ObjectId) -> MediaBox {
    page_rect(doc, page_id, b"CropBox")
        .or_else(|| page_rect(doc, page_id, b"MediaBox"))
        .unwrap_or(MediaBox::LETTER)
}

fn page_rect(doc: &Document, page_id: ObjectId, key: &[u8]) -> Option<MediaBox> {
    inherited_attribute(doc, page_id, key)
        .map(|object| resolve(doc, object))
        .and_then(|object| object.as_array().ok())
        .and_then(|values| parse_rect(values))
}

fn parse_rect(values: &[Object]) -> Option<MediaBox> {
    if values.len() != 4 {
        return None;
    }
    let mut corners = [0.0f64; 4];
    for (slot, value) in corners.iter_mut().zip(values) {
        *slot = number(value)?;
    }
    let media_box = MediaBox::from_corners(corners);
    (media_box.width() > 0.0 && media_box.height() > 0.0).then_some(media_box)
}

fn number(object: &Object) -> Option<f64> {
    match object {
        Object::Integer(value) => Some(*value as f64),
        Object::Real(value) => Some(*value as f64),
        _ => None,
    }
}

/// Page dictionary for `page_id`
pub(crate) fn page_dict(doc: &Document, page_id: ObjectId) -> Result<&Dictionary, StampError> {
    doc.get_object(page_id)
        .and_then(Object::as_dict)
        .map_err(|e| StampError::OperationError(format!("Invalid page object: {}", e)))
}
