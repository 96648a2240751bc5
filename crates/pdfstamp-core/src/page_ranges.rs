//! Page range parsing for stamp page selection
//!
//! Users type 1-based expressions such as `"1-3, 5"`. Parsing is lenient:
//! malformed segments are dropped instead of reported, and the result is
//! always a sorted, deduplicated list of 0-based page indices.

use std::collections::BTreeSet;
use std::num::IntErrorKind;

/// Parse a page range string into sorted, deduplicated 0-based page indices.
///
/// # Arguments
/// * `range_str` - Range string like "1-3, 5, 8-10" (1-based)
/// * `total_pages` - Total pages in the document (for bounds checking)
///
/// An empty or whitespace-only string selects every page. Reversed ranges
/// are swapped, ranges are clamped to the document, and anything that is
/// not a number or a `a-b` pair is skipped.
///
/// # Examples
/// ```
/// use pdfstamp_core::page_ranges::parse_page_ranges;
///
/// assert_eq!(parse_page_ranges("1-3,5", 10), vec![0, 1, 2, 4]);
/// assert_eq!(parse_page_ranges("5-2", 10), vec![1, 2, 3, 4]);
/// assert_eq!(parse_page_ranges("", 3), vec![0, 1, 2]);
/// ```
pub fn parse_page_ranges(range_str: &str, total_pages: usize) -> Vec<usize> {
    if range_str.trim().is_empty() {
        return (0..total_pages).collect();
    }

    let mut pages = BTreeSet::new();

    for part in range_str.split(',') {
        let part = part.trim();
        if part.is_empty() {
            continue;
        }

        if let Some((start, end)) = part.split_once('-') {
            // Range like "1-3"
            let (Some(start), Some(end)) = (range_endpoint(start), range_endpoint(end)) else {
                continue;
            };
            let (start, end) = if start > end { (end, start) } else { (start, end) };
            let start = start.max(1);
            let end = end.min(total_pages);
            pages.extend(start..=end);
        } else if let Ok(num) = part.parse::<usize>() {
            // Single page like "5"
            if (1..=total_pages).contains(&num) {
                pages.insert(num);
            }
        }
    }

    pages.into_iter().map(|page| page - 1).collect()
}

/// A range endpoint too large for `usize` still bounds the range; it is
/// clamped to the document like any other out-of-range endpoint.
fn range_endpoint(text: &str) -> Option<usize> {
    match text.trim().parse::<usize>() {
        Ok(value) => Some(value),
        Err(e) if *e.kind() == IntErrorKind::PosOverflow => Some(usize::MAX),
        Err(_) => None,
    }
}

/// Render 0-based indices as the 1-based list shown to users ("1, 2, 4").
pub fn format_page_list(indices: &[usize]) -> String {
    indices
        .iter()
        .map(|index| (index + 1).to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Pages a stamp applies to, already resolved against a document.
///
/// Unlike [`parse_page_ranges`], resolving never yields an empty selection
/// for a non-empty document: an expression that matches nothing falls back
/// to every page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageSelection {
    indices: Vec<usize>,
    total_pages: usize,
}

impl PageSelection {
    pub fn resolve(range_str: &str, total_pages: usize) -> Self {
        let mut indices = parse_page_ranges(range_str, total_pages);
        if indices.is_empty() {
            tracing::debug!(
                range = range_str,
                total_pages,
                "page range matched nothing, selecting all pages"
            );
            indices = (0..total_pages).collect();
        }
        Self {
            indices,
            total_pages,
        }
    }

    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    pub fn first(&self) -> Option<usize> {
        self.indices.first().copied()
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn total_pages(&self) -> usize {
        self.total_pages
    }

    /// 1-based, comma separated
    pub fn display(&self) -> String {
        format_page_list(&self.indices)
    }
}
