use thiserror::Error;

#[derive(Error, Debug)]
pub enum StampError {
    #[error("Could not read PDF: {0}")]
    ParseError(String),

    #[error("Invalid color {0:?}: expected 6 hex digits like #1a2b3c")]
    InvalidColor(String),

    #[error("Unknown font {0:?}: use sans, serif or mono")]
    InvalidFont(String),

    #[error("Invalid settings: {0}")]
    InvalidSettings(String),

    #[error("Page index {index} does not exist (document has {total} pages)")]
    PageOutOfRange { index: usize, total: usize },

    #[error("Label cannot be empty: enter an Event ID")]
    EmptyLabel,

    #[error("PDF operation failed: {0}")]
    OperationError(String),

    #[error("Preview failed: {0}")]
    RenderError(String),

    #[error("Archive failed: {0}")]
    ArchiveError(#[from] zip::result::ZipError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
