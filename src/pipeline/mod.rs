//! Heading and title classification pipeline.
//!
//! Stages run strictly in sequence, each consuming the output of the
//! previous one:
//!
//! 1. [`normalize`]: clean and join raw runs, tag scripts, logical order
//! 2. [`stats`]: document font profile
//! 3. [`title`]: title from page 1
//! 4. [`candidates`]: formatting and pattern scoring
//! 5. [`filters`]: TOC, form field, list and table noise
//! 6. [`levels`]: H1/H2/H3 from size buckets and numbering depth
//! 7. [`assemble`]: ordered, deduplicated outline
//!
//! Pages are ingested one at a time and a [`Deadline`] is checked between
//! pages, so a slow document yields a partial outline instead of an error.

pub mod assemble;
pub mod candidates;
pub mod filters;
pub mod levels;
pub mod normalize;
pub mod stats;
pub mod title;

use std::time::{Duration, Instant};

use crate::config::OutlineConfig;
use crate::error::Result;
use crate::model::{DocumentOutline, PageInfo, TextRun};
use crate::parser::{PageSource, TableSource, DEFAULT_PAGE_SIZE};
use crate::patterns::PatternTables;

pub use title::TitleResult;

/// Soft time budget for one document.
#[derive(Debug, Clone, Copy)]
pub struct Deadline {
    start: Instant,
    budget: Option<Duration>,
}

impl Deadline {
    /// Start a deadline; `None` never expires.
    pub fn new(budget: Option<Duration>) -> Self {
        Self {
            start: Instant::now(),
            budget,
        }
    }

    pub fn unbounded() -> Self {
        Self::new(None)
    }

    /// Time since the deadline started.
    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    /// Whether the budget is used up.
    pub fn expired(&self) -> bool {
        self.budget.is_some_and(|budget| self.elapsed() >= budget)
    }
}

/// Outline of one document together with how much of it was read.
#[derive(Debug, Clone, PartialEq)]
pub struct Extraction {
    /// The result to persist
    pub outline: DocumentOutline,
    /// Pages in the document
    pub page_count: u32,
    /// Pages ingested before the budget ran out
    pub pages_processed: u32,
    /// False when the time budget cut ingestion short
    pub complete: bool,
}

/// Run the whole pipeline over a document.
///
/// Page 1 is always ingested. After each page the deadline from
/// `config.time_budget_ms` is checked, and once it has expired the remaining
/// pages are skipped. A page that fails to load is logged and treated as
/// empty.
pub fn extract_outline<S, T>(
    source: &S,
    tables: &T,
    config: &OutlineConfig,
    patterns: &PatternTables,
) -> Result<Extraction>
where
    S: PageSource + ?Sized,
    T: TableSource + ?Sized,
{
    config.validate()?;
    let deadline = Deadline::new(config.time_budget());
    let page_count = source.page_count();

    let mut runs: Vec<TextRun> = Vec::new();
    let mut pages: Vec<PageInfo> = Vec::with_capacity(page_count as usize);
    let mut complete = true;

    for number in 1..=page_count {
        if number > 1 && deadline.expired() {
            log::warn!(
                "time budget exceeded after {} of {} pages ({:?})",
                number - 1,
                page_count,
                deadline.elapsed()
            );
            complete = false;
            break;
        }

        match source.load_page(number) {
            Ok(page) => {
                let tables = tables.detect_tables(&page);
                runs.extend(normalize::normalize_page(&page, config, patterns));
                pages.push(
                    PageInfo::new(number, page.width, page.height)
                        .with_tables(tables)
                        .with_boxes(page.boxes),
                );
            }
            Err(e) => {
                log::warn!("skipping page {}: {}", number, e);
                let (width, height) = DEFAULT_PAGE_SIZE;
                pages.push(PageInfo::new(number, width, height));
            }
        }
    }

    let pages_processed = pages.len() as u32;
    let profile = stats::build_profile(&runs, config);
    let title = title::extract_title(
        &runs,
        pages.first().filter(|p| p.number == 1),
        &profile,
        config,
        patterns,
    );

    let candidates = candidates::detect_candidates(&runs, &pages, &profile, config, patterns);
    let candidates = filters::apply_filters(candidates, &runs, &pages, config, patterns);
    let candidates = title::suppress_title_lines(candidates, &runs, &title);
    let candidates = levels::assign_levels(candidates, &runs, &profile, title.size, config);
    let outline = assemble::assemble(&candidates, &runs, page_count);

    log::info!(
        "{} headings, title {:?}, {}/{} pages in {:?}",
        outline.len(),
        title.text,
        pages_processed,
        page_count,
        deadline.elapsed()
    );

    Ok(Extraction {
        outline: DocumentOutline::new(title.text, outline),
        page_count,
        pages_processed,
        complete,
    })
}
