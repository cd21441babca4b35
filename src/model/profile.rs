//! Document-wide font profile.

use std::collections::BTreeMap;

use crate::script::Script;

/// Font statistics for one document. Computed once, read-only thereafter.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentProfile {
    /// Body text font size (most common, character-weighted). Never zero.
    pub baseline: f32,
    /// Distinct sizes larger than the baseline, largest first
    pub larger_sizes: Vec<f32>,
    /// Characters per size, keyed by size in tenths of a point
    pub histogram: BTreeMap<i32, usize>,
    /// Fraction of characters set in bold
    pub bold_ratio: f32,
    /// Script with the most characters
    pub dominant_script: Script,
    /// False when every run has the same size, so size carries no signal
    pub size_discriminative: bool,
}

impl DocumentProfile {
    /// Default body size when a document has no text.
    pub const FALLBACK_BASELINE: f32 = 12.0;

    /// Profile for a document without usable text.
    pub fn degenerate() -> Self {
        Self {
            baseline: Self::FALLBACK_BASELINE,
            larger_sizes: Vec::new(),
            histogram: BTreeMap::new(),
            bold_ratio: 0.0,
            dominant_script: Script::Common,
            size_discriminative: false,
        }
    }

    /// Size relative to the baseline.
    pub fn ratio(&self, size: f32) -> f32 {
        size / self.baseline
    }
}
