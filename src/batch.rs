//! Batch processing of a directory of PDFs.
//!
//! Each document is processed end to end by one worker of a bounded Rayon
//! pool. Failures never leave a document: errors and panics become the
//! minimal `{"title":"","outline":[]}` result and a warning.

use std::fs;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::path::{Path, PathBuf};

use rayon::prelude::*;

use crate::config::OutlineConfig;
use crate::detect::has_pdf_extension;
use crate::error::{Error, Result};
use crate::model::DocumentOutline;
use crate::render::{write_json_file, JsonFormat};
use crate::OutlineExtractor;

/// How a document came through processing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentStatus {
    /// Every page was processed.
    Complete,
    /// The time budget cut processing short; the outline covers the pages read.
    Partial,
    /// Processing failed; the outline is the minimal empty result.
    Degraded,
}

/// Result of processing one document.
#[derive(Debug, Clone)]
pub struct DocumentReport {
    /// Input file
    pub path: PathBuf,
    /// Outline to persist
    pub outline: DocumentOutline,
    /// Outcome
    pub status: DocumentStatus,
    /// Pages ingested
    pub pages_processed: u32,
    /// Pages in the document (0 when it could not be opened)
    pub page_count: u32,
}

/// Counts for a finished batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchSummary {
    /// Documents for which processing ran, whatever the outcome
    pub processed: usize,
    /// Documents that fell back to the minimal result
    pub degraded: usize,
    /// Documents cut short by the time budget
    pub partial: usize,
    /// Results that could not be written
    pub write_failures: usize,
}

/// List the PDFs to process: a single file, or the `*.pdf` files of a
/// directory (case-insensitive), sorted by name.
pub fn collect_inputs(input: &Path) -> Result<Vec<PathBuf>> {
    let metadata = fs::metadata(input)?;
    if metadata.is_file() {
        return Ok(vec![input.to_path_buf()]);
    }

    let mut inputs = Vec::new();
    for entry in fs::read_dir(input)? {
        let path = entry?.path();
        if path.is_file() && has_pdf_extension(&path) {
            inputs.push(path);
        }
    }
    inputs.sort();
    Ok(inputs)
}

/// Where the result for `document` goes.
///
/// An `output` ending in `.json` is used as is; anything else is a directory
/// receiving `<stem>.json`.
pub fn output_path(document: &Path, output: &Path) -> PathBuf {
    if is_json_path(output) {
        return output.to_path_buf();
    }
    let stem = document.file_stem().unwrap_or_default().to_string_lossy();
    output.join(format!("{}.json", stem))
}

fn is_json_path(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("json"))
}

/// Process one document, containing any error or panic.
pub fn process_document(path: &Path, extractor: &OutlineExtractor) -> DocumentReport {
    let degraded = |reason: String| {
        log::warn!("{}: {}; writing empty outline", path.display(), reason);
        DocumentReport {
            path: path.to_path_buf(),
            outline: DocumentOutline::empty(),
            status: DocumentStatus::Degraded,
            pages_processed: 0,
            page_count: 0,
        }
    };

    match catch_unwind(AssertUnwindSafe(|| extractor.extract_file(path))) {
        Ok(Ok(extraction)) => {
            let status = if extraction.complete {
                DocumentStatus::Complete
            } else {
                log::warn!(
                    "{}: partial outline ({} of {} pages)",
                    path.display(),
                    extraction.pages_processed,
                    extraction.page_count
                );
                DocumentStatus::Partial
            };
            DocumentReport {
                path: path.to_path_buf(),
                outline: extraction.outline,
                status,
                pages_processed: extraction.pages_processed,
                page_count: extraction.page_count,
            }
        }
        Ok(Err(e)) => degraded(e.to_string()),
        Err(panic) => {
            let message = panic
                .downcast_ref::<&str>()
                .map(|s| s.to_string())
                .or_else(|| panic.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "unknown panic".to_string());
            degraded(format!("panicked: {}", message))
        }
    }
}

/// Process every PDF under `input` and write one JSON result per document
/// into `output`.
///
/// Fails only when `input` does not exist, `output` cannot be created,
/// `output` is a `.json` file but `input` holds several PDFs, or the worker
/// pool cannot start. Individual documents never fail the batch.
pub fn process_directory(input: &Path, output: &Path, config: &OutlineConfig) -> Result<BatchSummary> {
    process_directory_with_progress(input, output, config, |_| {})
}

/// Like [`process_directory`], calling `on_done` after each document.
pub fn process_directory_with_progress<F>(
    input: &Path,
    output: &Path,
    config: &OutlineConfig,
    on_done: F,
) -> Result<BatchSummary>
where
    F: Fn(&DocumentReport) + Sync,
{
    config.validate()?;
    let inputs = collect_inputs(input)?;

    // A single result file can only hold one document.
    if is_json_path(output) && inputs.len() > 1 {
        return Err(Error::Config(format!(
            "{} PDFs in {} cannot share the output file {}; use a directory",
            inputs.len(),
            input.display(),
            output.display()
        )));
    }

    let output_dir = if is_json_path(output) {
        output.parent().unwrap_or(Path::new("."))
    } else {
        output
    };
    if !output_dir.as_os_str().is_empty() {
        fs::create_dir_all(output_dir)?;
    }

    log::info!(
        "processing {} document(s) from {}",
        inputs.len(),
        input.display()
    );

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(config.jobs)
        .build()
        .map_err(|e| Error::Config(format!("worker pool: {}", e)))?;
    let extractor = OutlineExtractor::new().with_config(config.clone());

    let results: Vec<(DocumentStatus, bool)> = pool.install(|| {
        inputs
            .par_iter()
            .map(|path| {
                let report = process_document(path, &extractor);
                let target = output_path(path, output);
                let written = match write_json_file(&report.outline, JsonFormat::Pretty, &target) {
                    Ok(()) => true,
                    Err(e) => {
                        log::warn!("{}: cannot write result: {}", target.display(), e);
                        false
                    }
                };
                on_done(&report);
                (report.status, written)
            })
            .collect()
    });

    let mut summary = BatchSummary {
        processed: results.len(),
        ..BatchSummary::default()
    };
    for (status, written) in results {
        match status {
            DocumentStatus::Degraded => summary.degraded += 1,
            DocumentStatus::Partial => summary.partial += 1,
            DocumentStatus::Complete => {}
        }
        if !written {
            summary.write_failures += 1;
        }
    }

    log::info!(
        "batch done: {} processed, {} degraded, {} partial, {} write failures",
        summary.processed,
        summary.degraded,
        summary.partial,
        summary.write_failures
    );
    Ok(summary)
}
