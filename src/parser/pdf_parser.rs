//! PDF document parser using lopdf.

use std::collections::BTreeMap;
use std::io::Read;
use std::path::Path;

use crate::detect::{detect_format_from_bytes, detect_format_from_path};
use crate::error::{Error, Result};
use crate::model::PageContent;

use super::backend::{LopdfBackend, PageId, PdfBackend};
use super::layout::RunExtractor;
use super::source::PageSource;

/// PDF document parser.
///
/// Pages are decoded lazily: [`PageSource::load_page`] interprets one content
/// stream per call, so a caller can stop early without paying for the rest of
/// the document.
pub struct PdfParser {
    backend: LopdfBackend,
    pages: BTreeMap<u32, PageId>,
}

impl PdfParser {
    /// Open a PDF file.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        // Verify it's a PDF
        let format = detect_format_from_path(path)?;
        log::debug!("{}: {}", path.display(), format);

        Self::from_backend(LopdfBackend::load_file(path)?)
    }

    /// Parse a PDF from bytes.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        detect_format_from_bytes(data)?;
        Self::from_backend(LopdfBackend::load_bytes(data)?)
    }

    /// Parse a PDF from a reader.
    pub fn from_reader<R: Read>(mut reader: R) -> Result<Self> {
        let mut data = Vec::new();
        reader.read_to_end(&mut data)?;
        Self::from_bytes(&data)
    }

    fn from_backend(backend: LopdfBackend) -> Result<Self> {
        if backend.is_encrypted() {
            log::warn!("document is encrypted; text may not decode");
        }

        let pages = backend.pages();
        if pages.is_empty() {
            return Err(Error::Corrupted("document has no pages".to_string()));
        }

        Ok(Self { backend, pages })
    }

    /// Check if the document is encrypted.
    pub fn is_encrypted(&self) -> bool {
        self.backend.is_encrypted()
    }
}

impl PageSource for PdfParser {
    fn page_count(&self) -> u32 {
        self.pages.len() as u32
    }

    fn load_page(&self, number: u32) -> Result<PageContent> {
        // Page numbers in the outline are positional, whatever the page labels say.
        let page_id = self
            .pages
            .values()
            .nth((number as usize).wrapping_sub(1))
            .copied()
            .ok_or(Error::PageOutOfRange(number, self.page_count()))?;

        RunExtractor::new(&self.backend)
            .extract_page(number, page_id)
            .map_err(|e| match e {
                Error::PdfParse(msg) => Error::TextExtract(format!("page {}: {}", number, msg)),
                other => other,
            })
    }
}
