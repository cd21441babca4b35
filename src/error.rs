//! Error types for pdf-outline.

use std::io;
use thiserror::Error;

/// Result type alias for outline extraction.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while extracting an outline.
///
/// Errors never cross a document boundary during batch processing: the batch
/// driver turns any of them into a minimal `{"title":"","outline":[]}` result.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading inputs or writing results.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The input does not start with a PDF header.
    #[error("Unknown file format: not a valid PDF")]
    UnknownFormat,

    /// Error parsing PDF structure.
    #[error("PDF parsing error: {0}")]
    PdfParse(String),

    /// The PDF document is encrypted.
    #[error("Document is encrypted")]
    Encrypted,

    /// The PDF structure is corrupted or malformed.
    #[error("Corrupted PDF structure: {0}")]
    Corrupted(String),

    /// Page number is out of range.
    #[error("Page {0} is out of range (document has {1} pages)")]
    PageOutOfRange(u32, u32),

    /// Error extracting text content from a page.
    #[error("Text extraction error: {0}")]
    TextExtract(String),

    /// Error encoding the JSON result.
    #[error("Rendering error: {0}")]
    Render(String),

    /// Invalid configuration value or configuration file.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<lopdf::Error> for Error {
    fn from(err: lopdf::Error) -> Self {
        match err {
            lopdf::Error::IO(e) => Error::Io(e),
            lopdf::Error::Decryption(_) => Error::Encrypted,
            _ => Error::PdfParse(err.to_string()),
        }
    }
}
