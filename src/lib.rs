//! # pdf-outline
//!
//! Offline outline extraction for PDF documents.
//!
//! This library reads a PDF and produces its title and a three-level
//! heading outline (H1, H2, H3) with page numbers, using font statistics
//! and multilingual lexical patterns rather than the PDF's own bookmarks.
//!
//! ## Quick Start
//!
//! ```no_run
//! use pdf_outline::{extract_file, render};
//!
//! fn main() -> pdf_outline::Result<()> {
//!     let outline = extract_file("document.pdf")?;
//!
//!     let json = render::to_json(&outline, render::JsonFormat::Pretty)?;
//!     println!("{}", json);
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Multi-signal detection**: font size, weight, isolation, numbering and keywords
//! - **Noise filtering**: tables of contents, form fields, lists and table cells
//! - **Multilingual**: keyword tables for nine languages, RTL and CJK text
//! - **Time budget**: slow documents return a partial outline instead of failing
//! - **Batch processing**: a bounded Rayon pool over a directory of PDFs

pub mod batch;
pub mod config;
pub mod detect;
pub mod error;
pub mod model;
pub mod parser;
pub mod patterns;
pub mod pipeline;
pub mod render;
pub mod script;

// Re-export commonly used types
pub use batch::{process_directory, BatchSummary, DocumentReport, DocumentStatus};
pub use config::OutlineConfig;
pub use detect::{detect_format_from_bytes, detect_format_from_path, has_pdf_extension, PdfFormat};
pub use error::{Error, Result};
pub use model::{
    BoundingBox, DocumentOutline, HeadingLevel, OutlineEntry, PageContent, RawRun, TextOrder,
    TextRun,
};
pub use parser::{InMemorySource, NoTables, PageSource, PdfParser, TableDetector, TableSource};
pub use patterns::PatternTables;
pub use pipeline::{Deadline, Extraction};
pub use render::JsonFormat;
pub use script::Script;

use std::io::Read;
use std::path::Path;

/// Extract the outline of a PDF file with the default configuration.
///
/// # Example
///
/// ```no_run
/// use pdf_outline::extract_file;
///
/// let outline = extract_file("report.pdf").unwrap();
/// println!("{}: {} headings", outline.title, outline.outline.len());
/// ```
pub fn extract_file<P: AsRef<Path>>(path: P) -> Result<DocumentOutline> {
    OutlineExtractor::new()
        .extract_file(path)
        .map(|extraction| extraction.outline)
}

/// Extract the outline of a PDF held in memory.
pub fn extract_bytes(data: &[u8]) -> Result<DocumentOutline> {
    OutlineExtractor::new()
        .extract_bytes(data)
        .map(|extraction| extraction.outline)
}

/// Extract the outline of a PDF read from a reader.
pub fn extract_reader<R: Read>(reader: R) -> Result<DocumentOutline> {
    let parser = PdfParser::from_reader(reader)?;
    OutlineExtractor::new()
        .extract_source(&parser)
        .map(|extraction| extraction.outline)
}

/// Builder-style entry point for outline extraction.
///
/// # Example
///
/// ```no_run
/// use std::time::Duration;
/// use pdf_outline::{OutlineConfig, OutlineExtractor};
///
/// let extraction = OutlineExtractor::new()
///     .with_config(OutlineConfig::default().with_time_budget(Duration::from_secs(5)))
///     .extract_file("document.pdf")?;
///
/// if !extraction.complete {
///     eprintln!("partial outline: {} of {} pages", extraction.pages_processed, extraction.page_count);
/// }
/// # Ok::<(), pdf_outline::Error>(())
/// ```
pub struct OutlineExtractor {
    config: OutlineConfig,
    tables: TableDetector,
    detect_tables: bool,
}

impl OutlineExtractor {
    /// Create an extractor with the default configuration.
    pub fn new() -> Self {
        Self {
            config: OutlineConfig::default(),
            tables: TableDetector::new(),
            detect_tables: true,
        }
    }

    /// Use the given thresholds.
    pub fn with_config(mut self, config: OutlineConfig) -> Self {
        self.config = config;
        self
    }

    /// Use a custom table detector.
    pub fn with_table_detector(mut self, detector: TableDetector) -> Self {
        self.tables = detector;
        self.detect_tables = true;
        self
    }

    /// Treat every page as table-free.
    pub fn without_table_detection(mut self) -> Self {
        self.detect_tables = false;
        self
    }

    /// The active configuration.
    pub fn config(&self) -> &OutlineConfig {
        &self.config
    }

    /// Extract the outline of a PDF file.
    pub fn extract_file<P: AsRef<Path>>(&self, path: P) -> Result<Extraction> {
        let parser = PdfParser::open(path)?;
        self.extract_source(&parser)
    }

    /// Extract the outline of a PDF held in memory.
    pub fn extract_bytes(&self, data: &[u8]) -> Result<Extraction> {
        let parser = PdfParser::from_bytes(data)?;
        self.extract_source(&parser)
    }

    /// Extract the outline from any page source.
    pub fn extract_source<S: PageSource + ?Sized>(&self, source: &S) -> Result<Extraction> {
        let patterns = PatternTables::shared();
        if self.detect_tables {
            pipeline::extract_outline(source, &self.tables, &self.config, patterns)
        } else {
            pipeline::extract_outline(source, &NoTables, &self.config, patterns)
        }
    }

    /// Extract the outline of a PDF file, never failing.
    ///
    /// Any error or panic while processing the document yields
    /// [`DocumentOutline::empty`] and a warning.
    pub fn extract_file_lenient<P: AsRef<Path>>(&self, path: P) -> DocumentOutline {
        batch::process_document(path.as_ref(), self).outline
    }
}

impl Default for OutlineExtractor {
    fn default() -> Self {
        Self::new()
    }
}
