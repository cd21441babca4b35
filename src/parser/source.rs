//! Collaborator seams for page ingestion and table detection.
//!
//! The pipeline pulls pages one at a time through [`PageSource`] and asks a
//! [`TableSource`] for table regions, so that it can be driven by a real PDF
//! or by pages built in memory.

use crate::error::{Error, Result};
use crate::model::{BoundingBox, PageContent};

/// Supplies the text runs of a document, one page at a time.
pub trait PageSource {
    /// Number of pages in the document.
    fn page_count(&self) -> u32;

    /// Load the runs of page `number` (1-based).
    fn load_page(&self, number: u32) -> Result<PageContent>;
}

/// Locates table regions on a page.
pub trait TableSource {
    /// Bounding boxes of the tables on the page, in top-down coordinates.
    fn detect_tables(&self, page: &PageContent) -> Vec<BoundingBox>;
}

/// Pages already held in memory.
#[derive(Debug, Clone, Default)]
pub struct InMemorySource {
    pages: Vec<PageContent>,
}

impl InMemorySource {
    /// Create a source from pages. Pages are renumbered 1..=n in order.
    pub fn new(pages: Vec<PageContent>) -> Self {
        let pages = pages
            .into_iter()
            .enumerate()
            .map(|(i, mut page)| {
                page.number = i as u32 + 1;
                page
            })
            .collect();
        Self { pages }
    }

    /// Append a page, numbering it after the existing ones.
    pub fn push(&mut self, mut page: PageContent) {
        page.number = self.pages.len() as u32 + 1;
        self.pages.push(page);
    }
}

impl PageSource for InMemorySource {
    fn page_count(&self) -> u32 {
        self.pages.len() as u32
    }

    fn load_page(&self, number: u32) -> Result<PageContent> {
        number
            .checked_sub(1)
            .and_then(|i| self.pages.get(i as usize))
            .cloned()
            .ok_or(Error::PageOutOfRange(number, self.page_count()))
    }
}

/// Table source that never finds a table.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoTables;

impl TableSource for NoTables {
    fn detect_tables(&self, _page: &PageContent) -> Vec<BoundingBox> {
        Vec::new()
    }
}

/// Fixed table regions per page number, for callers that detect tables elsewhere.
#[derive(Debug, Clone, Default)]
pub struct KnownTables {
    regions: Vec<(u32, BoundingBox)>,
}

impl KnownTables {
    /// Create an empty set of regions.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a table region on a page.
    pub fn with_table(mut self, page: u32, bbox: BoundingBox) -> Self {
        self.regions.push((page, bbox));
        self
    }
}

impl TableSource for KnownTables {
    fn detect_tables(&self, page: &PageContent) -> Vec<BoundingBox> {
        self.regions
            .iter()
            .filter(|(number, _)| *number == page.number)
            .map(|(_, bbox)| *bbox)
            .collect()
    }
}
