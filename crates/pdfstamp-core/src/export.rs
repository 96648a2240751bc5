//! Exporting stamped documents
//!
//! Group mode yields one PDF with every selected page. Per-page mode stamps
//! each page into its own PDF and bundles them into a deflated zip.

use crate::error::StampError;
use crate::page_ranges::PageSelection;
use crate::service::DocumentStampingService;
use crate::settings::{ExportMode, StampSettings};
use crate::stamp::StampSpec;
use std::io::{Cursor, Write};
use tracing::instrument;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

pub const GROUP_FILE_NAME: &str = "stamped_group.pdf";
pub const PER_PAGE_ARCHIVE_NAME: &str = "stamped_per_page.zip";
pub const PDF_MIME: &str = "application/pdf";
pub const ZIP_MIME: &str = "application/zip";

/// A finished download
#[derive(Debug, Clone)]
pub struct ExportArtifact {
    pub file_name: String,
    pub mime_type: &'static str,
    pub data: Vec<u8>,
    /// 0-based pages that were stamped
    pub pages: Vec<usize>,
}

/// Stamp the pages selected in `settings` and package them per its mode.
#[instrument(skip_all, fields(mode = %settings.mode, pages = %settings.pages))]
pub fn export<S>(service: &S, settings: &StampSettings) -> Result<ExportArtifact, StampError>
where
    S: DocumentStampingService + ?Sized,
{
    settings.validate()?;
    let spec = settings.stamp_spec()?;
    if !spec.has_text() {
        return Err(StampError::EmptyLabel);
    }

    let selection = PageSelection::resolve(&settings.pages, service.page_count());
    if selection.is_empty() {
        return Err(StampError::OperationError(
            "document has no pages".to_string(),
        ));
    }

    let artifact = match settings.mode {
        ExportMode::Group => ExportArtifact {
            file_name: GROUP_FILE_NAME.to_string(),
            mime_type: PDF_MIME,
            data: service.stamp(selection.indices(), &spec)?,
            pages: selection.indices().to_vec(),
        },
        ExportMode::PerPage => {
            let files = stamp_per_page(service, selection.indices(), &spec)?;
            ExportArtifact {
                file_name: PER_PAGE_ARCHIVE_NAME.to_string(),
                mime_type: ZIP_MIME,
                data: write_zip(&files)?,
                pages: selection.indices().to_vec(),
            }
        }
    };

    tracing::info!(
        file = %artifact.file_name,
        pages = %selection.display(),
        bytes = artifact.data.len(),
        "export ready"
    );

    Ok(artifact)
}

/// One stamped single-page PDF per index, named `stamped_p{N}.pdf`
pub fn stamp_per_page<S>(
    service: &S,
    pages: &[usize],
    spec: &StampSpec,
) -> Result<Vec<(String, Vec<u8>)>, StampError>
where
    S: DocumentStampingService + ?Sized,
{
    pages
        .iter()
        .map(|&page| Ok((per_page_file_name(page), service.stamp(&[page], spec)?)))
        .collect()
}

/// File name for a 0-based page index
pub fn per_page_file_name(page_index: usize) -> String {
    format!("stamped_p{}.pdf", page_index + 1)
}

/// Bundle named files into a deflated zip archive
pub fn write_zip(files: &[(String, Vec<u8>)]) -> Result<Vec<u8>, StampError> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    for (name, data) in files {
        writer.start_file(name.as_str(), options)?;
        writer.write_all(data)?;
    }

    Ok(writer.finish()?.into_inner())
}
