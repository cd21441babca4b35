//! Table detection using text position analysis (Stream mode algorithm).
//!
//! Inspired by Camelot's Stream mode, this module detects tables by analyzing
//! text alignment patterns without relying on graphical lines. Runs are split
//! at wide gaps during extraction, so each table cell arrives as its own run.

use std::collections::{HashMap, HashSet};

use crate::model::{BoundingBox, PageContent, RawRun};

use super::source::TableSource;

/// A detected table region.
#[derive(Debug, Clone)]
pub struct DetectedTable {
    /// Region covering every cell, top-down coordinates
    pub bbox: BoundingBox,
    /// Detected column boundaries (X coordinates)
    pub columns: Vec<f32>,
    /// Number of rows in the region
    pub row_count: usize,
}

/// A row of runs sharing a vertical position.
#[derive(Debug, Clone)]
struct TableRowData<'a> {
    /// Vertical center of this row
    y: f32,
    /// Runs in this row, sorted by X
    runs: Vec<&'a RawRun>,
}

/// Table detector configuration.
#[derive(Debug, Clone)]
pub struct TableDetectorConfig {
    /// Minimum number of rows to consider as table
    pub min_rows: usize,
    /// Minimum number of columns to consider as table
    pub min_columns: usize,
    /// Maximum number of columns (above this, likely word-level splitting)
    pub max_columns: usize,
    /// Y tolerance for grouping runs into rows (fraction of font size)
    pub y_tolerance_factor: f32,
    /// Minimum column alignment ratio (0.0-1.0)
    pub min_alignment_ratio: f32,
    /// Minimum gap between columns (points)
    pub min_column_gap: f32,
    /// Above this mean words per cell, aligned runs are prose columns
    pub max_mean_cell_words: f32,
}

impl Default for TableDetectorConfig {
    fn default() -> Self {
        Self {
            min_rows: 3,
            min_columns: 2,
            max_columns: 6,
            y_tolerance_factor: 0.4,
            min_alignment_ratio: 0.3,
            min_column_gap: 15.0,
            max_mean_cell_words: 6.0,
        }
    }
}

/// Detects tables among the runs of a page.
pub struct TableDetector {
    config: TableDetectorConfig,
}

impl TableDetector {
    /// Create a new table detector with default configuration.
    pub fn new() -> Self {
        Self {
            config: TableDetectorConfig::default(),
        }
    }

    /// Create a new table detector with custom configuration.
    pub fn with_config(config: TableDetectorConfig) -> Self {
        Self { config }
    }

    /// Detect tables in the given runs.
    pub fn detect(&self, runs: &[RawRun]) -> Vec<DetectedTable> {
        if runs.len() < self.config.min_rows * self.config.min_columns {
            return vec![];
        }

        // Step 1: Group runs into rows by vertical position
        let rows = self.group_into_rows(runs);
        if rows.len() < self.config.min_rows {
            return vec![];
        }

        // Step 2: Detect column boundaries from text edges
        let columns = self.detect_columns(&rows);
        log::debug!(
            "TableDetector: {} rows, columns at {:?}",
            rows.len(),
            columns
        );
        if columns.len() < self.config.min_columns {
            return vec![];
        }

        // Step 3: Find contiguous rows with consistent column alignment
        let mut detected = Vec::new();
        for (start_row, end_row) in self.find_table_regions(&rows, &columns) {
            let table_rows = &rows[start_row..=end_row];

            // Re-detect columns for this specific region
            let table_columns = self.detect_columns(table_rows);
            if table_columns.len() < self.config.min_columns {
                continue;
            }
            if table_columns.len() > self.config.max_columns {
                log::debug!(
                    "TableDetector: skipping region, too many columns ({} > {})",
                    table_columns.len(),
                    self.config.max_columns
                );
                continue;
            }
            if self.is_list_pattern(table_rows, &table_columns) {
                log::debug!("TableDetector: skipping region, detected as list pattern");
                continue;
            }
            if self.is_prose_columns(table_rows) {
                log::debug!("TableDetector: skipping region, cells read as prose");
                continue;
            }

            let bbox = table_rows
                .iter()
                .flat_map(|r| r.runs.iter())
                .map(|r| r.bbox)
                .reduce(|a, b| a.union(&b));

            if let Some(bbox) = bbox {
                detected.push(DetectedTable {
                    bbox,
                    columns: table_columns,
                    row_count: table_rows.len(),
                });
            }
        }

        detected
    }

    /// Group runs into rows by vertical center, top of the page first.
    fn group_into_rows<'a>(&self, runs: &'a [RawRun]) -> Vec<TableRowData<'a>> {
        let mut sorted: Vec<&RawRun> = runs.iter().collect();
        sorted.sort_by(|a, b| {
            a.bbox
                .center_y()
                .partial_cmp(&b.bbox.center_y())
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(
                    a.bbox
                        .x0
                        .partial_cmp(&b.bbox.x0)
                        .unwrap_or(std::cmp::Ordering::Equal),
                )
        });

        let mut rows: Vec<TableRowData> = Vec::new();
        let mut current: Vec<&RawRun> = Vec::new();
        let mut current_y: Option<f32> = None;

        for run in sorted {
            let y = run.bbox.center_y();
            let tolerance = run.font_size * self.config.y_tolerance_factor;
            match current_y {
                Some(row_y) if (y - row_y).abs() <= tolerance => current.push(run),
                _ => {
                    if !current.is_empty() {
                        rows.push(make_row(std::mem::take(&mut current)));
                    }
                    current_y = Some(y);
                    current.push(run);
                }
            }
        }
        if !current.is_empty() {
            rows.push(make_row(current));
        }

        rows
    }

    /// Detect column boundaries from left edges that align across rows.
    fn detect_columns(&self, rows: &[TableRowData]) -> Vec<f32> {
        let multi_run_rows: Vec<&TableRowData> =
            rows.iter().filter(|r| r.runs.len() >= 2).collect();
        if multi_run_rows.len() < self.config.min_rows {
            return vec![];
        }

        // Group X positions within 5pt, counting each bucket once per row
        let bucket_size = 5.0;
        let mut edge_counts: HashMap<i32, usize> = HashMap::new();
        for row in &multi_run_rows {
            let buckets: HashSet<i32> = row
                .runs
                .iter()
                .map(|r| (r.bbox.x0 / bucket_size).round() as i32)
                .collect();
            for bucket in buckets {
                *edge_counts.entry(bucket).or_insert(0) += 1;
            }
        }

        let min_occurrences =
            ((multi_run_rows.len() as f32 * self.config.min_alignment_ratio) as usize).max(2);

        let mut column_edges: Vec<f32> = edge_counts
            .iter()
            .filter(|(_, count)| **count >= min_occurrences)
            .map(|(bucket, _)| *bucket as f32 * bucket_size)
            .collect();
        column_edges.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

        let mut merged_edges: Vec<f32> = Vec::new();
        for edge in column_edges {
            match merged_edges.last() {
                Some(last) if edge - last < self.config.min_column_gap => {}
                _ => merged_edges.push(edge),
            }
        }
        merged_edges
    }

    /// Find contiguous row regions that form tables.
    fn find_table_regions(&self, rows: &[TableRowData], columns: &[f32]) -> Vec<(usize, usize)> {
        let mut regions: Vec<(usize, usize)> = Vec::new();
        let mut current_start: Option<usize> = None;

        for (i, row) in rows.iter().enumerate() {
            let aligned = row.runs.len() >= 2
                && self.calculate_alignment_score(row, columns) >= self.config.min_alignment_ratio;

            match (aligned, current_start) {
                (true, None) => current_start = Some(i),
                (false, Some(start)) => {
                    if i - start >= self.config.min_rows {
                        regions.push((start, i - 1));
                    }
                    current_start = None;
                }
                _ => {}
            }
        }
        if let Some(start) = current_start {
            if rows.len() - start >= self.config.min_rows {
                regions.push((start, rows.len() - 1));
            }
        }

        regions
    }

    /// Fraction of a row's runs that start on a column edge.
    fn calculate_alignment_score(&self, row: &TableRowData, columns: &[f32]) -> f32 {
        if row.runs.is_empty() || columns.is_empty() {
            return 0.0;
        }
        let tolerance = 5.0;
        let aligned = row
            .runs
            .iter()
            .filter(|r| columns.iter().any(|col| (r.bbox.x0 - col).abs() <= tolerance))
            .count();
        aligned as f32 / row.runs.len() as f32
    }

    /// Check if the rows are a numbered or bulleted list split into marker and text.
    fn is_list_pattern(&self, rows: &[TableRowData], columns: &[f32]) -> bool {
        if columns.len() < 2 || rows.is_empty() {
            return false;
        }

        let mut bullet_count = 0;
        let mut number_count = 0;
        for row in rows {
            if let Some(first) = row.runs.first() {
                let text = first.text.trim();
                if is_bullet_marker(text) {
                    bullet_count += 1;
                } else if is_number_marker(text) {
                    number_count += 1;
                }
            }
        }

        let bullet_ratio = bullet_count as f32 / rows.len() as f32;
        let total_ratio = (bullet_count + number_count) as f32 / rows.len() as f32;

        // Bullet markers are almost never real table data; numbered first
        // columns are only rejected for two-column regions.
        bullet_ratio >= 0.5 || (columns.len() == 2 && total_ratio >= 0.5)
    }

    /// Check if the aligned runs are long lines of a multi-column text layout.
    fn is_prose_columns(&self, rows: &[TableRowData]) -> bool {
        let (cells, words) = rows
            .iter()
            .flat_map(|r| r.runs.iter())
            .fold((0usize, 0usize), |(cells, words), r| {
                (cells + 1, words + r.text.split_whitespace().count())
            });
        cells > 0 && words as f32 / cells as f32 > self.config.max_mean_cell_words
    }
}

fn make_row(mut runs: Vec<&RawRun>) -> TableRowData<'_> {
    runs.sort_by(|a, b| {
        a.bbox
            .x0
            .partial_cmp(&b.bbox.x0)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    let y = runs.iter().map(|r| r.bbox.center_y()).sum::<f32>() / runs.len() as f32;
    TableRowData { y, runs }
}

impl Default for TableDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl TableSource for TableDetector {
    fn detect_tables(&self, page: &PageContent) -> Vec<BoundingBox> {
        let tables = self.detect(&page.runs);
        if !tables.is_empty() {
            log::debug!("page {}: {} table region(s)", page.number, tables.len());
        }
        tables.into_iter().map(|t| t.bbox).collect()
    }
}

/// Check if text is a bullet marker (•, -, etc.).
fn is_bullet_marker(text: &str) -> bool {
    matches!(
        text.trim(),
        "-" | "–" | "—" | "•" | "·" | "*" | "○" | "▪" | "◦" | "▸" | "▹" | "►" | "■" | "●" | "※" | "□" | "◆" | "◇" | "▶" | "▷" | "☞" | "➤" | "➜"
    )
}

/// Check if text is a number-style list marker (1., 2), a., etc.).
fn is_number_marker(text: &str) -> bool {
    let cleaned: String = text.chars().filter(|c| !c.is_whitespace()).collect();
    if cleaned.is_empty() {
        return false;
    }

    // Digits followed by "." or ")", or a bare number
    if let Some(pos) = cleaned.find(|c: char| !c.is_ascii_digit()) {
        let (prefix, suffix) = cleaned.split_at(pos);
        if !prefix.is_empty() && (suffix == "." || suffix == ")") {
            return true;
        }
    } else {
        return true;
    }

    // Letter marker: "a.", "B)"
    let chars: Vec<char> = cleaned.chars().collect();
    chars.len() == 2 && chars[0].is_alphabetic() && (chars[1] == '.' || chars[1] == ')')
}
