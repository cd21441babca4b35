//! PDF parsing module.
//!
//! Turns a PDF into pages of positioned text runs, and finds table regions
//! on those pages.

mod backend;
mod layout;
mod pdf_parser;
mod source;
mod table_detector;

pub use backend::{
    BackendFontInfo, ContentOp, LopdfBackend, PageId, PdfBackend, PdfValue, DEFAULT_PAGE_SIZE,
};
pub use layout::{spans_to_runs, RunExtractor, TextSpan};
pub use pdf_parser::PdfParser;
pub use source::{InMemorySource, KnownTables, NoTables, PageSource, TableSource};
pub use table_detector::{DetectedTable, TableDetector, TableDetectorConfig};
