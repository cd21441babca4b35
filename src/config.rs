//! Heuristic thresholds for outline extraction.
//!
//! Every magic number used by the pipeline lives here, with the documented
//! default in [`Default`]. A configuration can be built in code with the
//! `with_*` methods or loaded from a JSON file in which any field may be
//! omitted.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Thresholds for every pipeline stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutlineConfig {
    /// Above this many runs, font statistics use a deterministic stride sample.
    pub stats_max_sample_runs: usize,
    /// A size counts as larger than the baseline only beyond this delta (points).
    pub min_size_delta: f32,
    /// Above this bold ratio, boldness is not a heading signal.
    pub bold_dominance_ratio: f32,

    /// Size ratio for the strongest formatting tier.
    pub h1_size_ratio: f32,
    /// Size ratio for the middle formatting tier.
    pub h2_size_ratio: f32,
    /// Smallest size ratio that counts as enlarged.
    pub min_size_ratio: f32,
    /// Formatting score needed to become a candidate.
    pub formatting_threshold: f32,
    /// Pattern score needed to become a candidate.
    pub pattern_threshold: f32,

    /// Shortest heading text, in characters.
    pub min_heading_chars: usize,
    /// Longest heading text, in characters.
    pub max_heading_chars: usize,
    /// Longest heading text, in words.
    pub max_heading_words: usize,
    /// Longest pattern-only heading (no formatting support), in words.
    pub max_pattern_only_words: usize,
    /// Left-to-right headings start before this fraction of the page width;
    /// right-to-left ones start after its complement.
    pub heading_position_ratio: f32,

    /// Minimum TOC entry lines on a page before it can be a TOC page.
    pub toc_min_entries: usize,
    /// Fraction of a page's lines that must be TOC entries.
    pub toc_page_ratio: f32,

    /// Minimum consecutive marker lines that form a list.
    pub list_min_run: usize,
    /// Longest line, in characters, that can be a list item.
    pub list_max_chars: usize,

    /// Title size must be at least this multiple of the baseline.
    pub title_min_size_ratio: f32,
    /// Fraction of the first page, from the top, searched for the title.
    pub title_region_ratio: f32,
    /// Maximum vertical gap between title lines, as a multiple of the size.
    pub title_line_gap_ratio: f32,
    /// Title lines within this many points of the largest size form one cluster.
    pub title_size_tolerance: f32,
    /// Lines starting beyond this fraction of the page width are right-aligned.
    pub right_aligned_ratio: f32,

    /// Maximum vertical gap for joining line fragments, as a multiple of the size.
    pub line_join_gap_ratio: f32,
    /// Maximum size difference for joining line fragments (points).
    pub line_join_size_tolerance: f32,
    /// Repair words split by extraction, e.g. "Y ou".
    pub repair_split_words: bool,

    /// Soft per-document time budget in milliseconds; `None` disables it.
    pub time_budget_ms: Option<u64>,
    /// Worker threads for batch processing (0 = available cores).
    pub jobs: usize,
}

impl OutlineConfig {
    /// Create a configuration with the documented defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a configuration from a JSON file. Missing fields keep their defaults.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let data = std::fs::read_to_string(path)?;
        Self::from_json_str(&data)
            .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))
    }

    /// Parse a configuration from a JSON string.
    pub fn from_json_str(data: &str) -> Result<Self> {
        let config: Self =
            serde_json::from_str(data).map_err(|e| Error::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Check that thresholds are mutually consistent.
    pub fn validate(&self) -> Result<()> {
        let ratios = [
            ("h1_size_ratio", self.h1_size_ratio),
            ("h2_size_ratio", self.h2_size_ratio),
            ("min_size_ratio", self.min_size_ratio),
            ("title_min_size_ratio", self.title_min_size_ratio),
            ("line_join_gap_ratio", self.line_join_gap_ratio),
            ("title_line_gap_ratio", self.title_line_gap_ratio),
        ];
        for (name, value) in ratios {
            if !value.is_finite() || value <= 0.0 {
                return Err(Error::Config(format!("{} must be positive", name)));
            }
        }

        if !(self.h1_size_ratio >= self.h2_size_ratio && self.h2_size_ratio >= self.min_size_ratio)
        {
            return Err(Error::Config(
                "size ratios must satisfy h1 >= h2 >= min".to_string(),
            ));
        }

        let fractions = [
            ("bold_dominance_ratio", self.bold_dominance_ratio),
            ("toc_page_ratio", self.toc_page_ratio),
            ("title_region_ratio", self.title_region_ratio),
            ("right_aligned_ratio", self.right_aligned_ratio),
            ("heading_position_ratio", self.heading_position_ratio),
        ];
        for (name, value) in fractions {
            if !(value > 0.0 && value <= 1.0) {
                return Err(Error::Config(format!("{} must be in (0, 1]", name)));
            }
        }

        if self.min_heading_chars > self.max_heading_chars {
            return Err(Error::Config(
                "min_heading_chars exceeds max_heading_chars".to_string(),
            ));
        }
        if self.list_min_run < 2 {
            return Err(Error::Config("list_min_run must be at least 2".to_string()));
        }
        if self.stats_max_sample_runs == 0 {
            return Err(Error::Config(
                "stats_max_sample_runs must be positive".to_string(),
            ));
        }

        Ok(())
    }

    /// The time budget as a duration, if any.
    pub fn time_budget(&self) -> Option<Duration> {
        self.time_budget_ms.map(Duration::from_millis)
    }

    /// Set the per-document time budget.
    pub fn with_time_budget(mut self, budget: Duration) -> Self {
        self.time_budget_ms = Some(budget.as_millis() as u64);
        self
    }

    /// Disable the per-document time budget.
    pub fn without_time_budget(mut self) -> Self {
        self.time_budget_ms = None;
        self
    }

    /// Set the number of batch worker threads (0 = available cores).
    pub fn with_jobs(mut self, jobs: usize) -> Self {
        self.jobs = jobs;
        self
    }

    /// Set the formatting and pattern score thresholds.
    pub fn with_thresholds(mut self, formatting: f32, pattern: f32) -> Self {
        self.formatting_threshold = formatting;
        self.pattern_threshold = pattern;
        self
    }

    /// Set the maximum heading length in characters and words.
    pub fn with_max_heading_len(mut self, chars: usize, words: usize) -> Self {
        self.max_heading_chars = chars;
        self.max_heading_words = words;
        self
    }

    /// Set TOC page detection parameters.
    pub fn with_toc(mut self, min_entries: usize, page_ratio: f32) -> Self {
        self.toc_min_entries = min_entries;
        self.toc_page_ratio = page_ratio;
        self
    }

    /// Set list detection parameters.
    pub fn with_list(mut self, min_run: usize, max_chars: usize) -> Self {
        self.list_min_run = min_run;
        self.list_max_chars = max_chars;
        self
    }

    /// Enable or disable split-word repair.
    pub fn with_split_word_repair(mut self, enabled: bool) -> Self {
        self.repair_split_words = enabled;
        self
    }
}

impl Default for OutlineConfig {
    fn default() -> Self {
        Self {
            stats_max_sample_runs: 5000,
            min_size_delta: 0.5,
            bold_dominance_ratio: 0.6,
            h1_size_ratio: 1.4,
            h2_size_ratio: 1.2,
            min_size_ratio: 1.08,
            formatting_threshold: 1.5,
            pattern_threshold: 2.0,
            min_heading_chars: 2,
            max_heading_chars: 200,
            max_heading_words: 30,
            max_pattern_only_words: 12,
            heading_position_ratio: 0.7,
            toc_min_entries: 3,
            toc_page_ratio: 0.5,
            list_min_run: 3,
            list_max_chars: 80,
            title_min_size_ratio: 1.15,
            title_region_ratio: 0.6,
            title_line_gap_ratio: 2.0,
            title_size_tolerance: 1.0,
            right_aligned_ratio: 0.6,
            line_join_gap_ratio: 1.5,
            line_join_size_tolerance: 1.0,
            repair_split_words: true,
            time_budget_ms: Some(10_000),
            jobs: 0,
        }
    }
}
