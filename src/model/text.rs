//! Text runs before and after normalization.

use serde::{Deserialize, Serialize};

use crate::script::Script;

use super::BoundingBox;

/// Character order of a raw run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TextOrder {
    /// Characters are in reading order.
    #[default]
    Logical,
    /// Characters are in left-to-right display order, as produced by
    /// positional glyph extraction.
    Visual,
}

/// A run of text as produced by the PDF collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawRun {
    /// The text content
    pub text: String,
    /// Font size in points
    pub font_size: f32,
    /// Whether the run is set in a bold face
    pub bold: bool,
    /// Position on the page
    pub bbox: BoundingBox,
    /// Character order of `text`
    pub order: TextOrder,
}

impl RawRun {
    /// Create a logically ordered run.
    pub fn new(text: impl Into<String>, font_size: f32, bold: bool, bbox: BoundingBox) -> Self {
        Self {
            text: text.into(),
            font_size,
            bold,
            bbox,
            order: TextOrder::Logical,
        }
    }

    /// Mark the run as visually ordered.
    pub fn visual(mut self) -> Self {
        self.order = TextOrder::Visual;
        self
    }
}

/// A normalized run of text. Immutable once produced by the run normalizer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextRun {
    /// Cleaned text in logical order
    pub text: String,
    /// Font size in points
    pub font_size: f32,
    /// Whether the run is set in a bold face
    pub bold: bool,
    /// Page number (1-indexed)
    pub page: u32,
    /// Position on the page
    pub bbox: BoundingBox,
    /// Detected script
    pub script: Script,
    /// Reading-order index within the page
    pub order: usize,
}

impl TextRun {
    /// Number of non-whitespace characters.
    pub fn char_count(&self) -> usize {
        self.text.chars().filter(|c| !c.is_whitespace()).count()
    }

    /// Number of whitespace-separated words.
    pub fn word_count(&self) -> usize {
        self.text.split_whitespace().count()
    }

    /// Whether two runs share size and weight.
    pub fn same_formatting(&self, other: &TextRun, size_tolerance: f32) -> bool {
        self.bold == other.bold && (self.font_size - other.font_size).abs() <= size_tolerance
    }
}
