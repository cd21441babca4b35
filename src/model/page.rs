//! Page-level types.

use serde::{Deserialize, Serialize};

use super::{BoundingBox, RawRun};

/// The raw content of one page, as yielded by a page source.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageContent {
    /// Page number (1-indexed)
    pub number: u32,

    /// Page width in points (1 point = 1/72 inch)
    pub width: f32,

    /// Page height in points
    pub height: f32,

    /// Text runs in extraction order
    pub runs: Vec<RawRun>,

    /// Drawn rectangles framing text, such as callouts and sidebars
    #[serde(default)]
    pub boxes: Vec<BoundingBox>,
}

impl PageContent {
    /// Create an empty page with the given dimensions.
    pub fn new(number: u32, width: f32, height: f32) -> Self {
        Self {
            number,
            width,
            height,
            runs: Vec::new(),
            boxes: Vec::new(),
        }
    }

    /// Create an empty page with standard Letter size (8.5 x 11 inches).
    pub fn letter(number: u32) -> Self {
        Self::new(number, 612.0, 792.0)
    }

    /// Create an empty page with standard A4 size (210 x 297 mm).
    pub fn a4(number: u32) -> Self {
        Self::new(number, 595.0, 842.0)
    }

    /// Add a run to the page.
    pub fn push(&mut self, run: RawRun) {
        self.runs.push(run);
    }

    /// Builder-style variant of [`push`](Self::push).
    pub fn with_run(mut self, run: RawRun) -> Self {
        self.runs.push(run);
        self
    }

    /// Builder-style addition of a drawn text box.
    pub fn with_box(mut self, bbox: BoundingBox) -> Self {
        self.boxes.push(bbox);
        self
    }

    /// Check if the page has no text.
    pub fn is_empty(&self) -> bool {
        self.runs.iter().all(|r| r.text.trim().is_empty())
    }
}

/// What the pipeline keeps about a page once its runs are normalized.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageInfo {
    /// Page number (1-indexed)
    pub number: u32,
    /// Page width in points
    pub width: f32,
    /// Page height in points
    pub height: f32,
    /// Table regions reported by the table collaborator
    pub tables: Vec<BoundingBox>,
    /// Drawn text boxes carried over from the page content
    #[serde(default)]
    pub boxes: Vec<BoundingBox>,
}

impl PageInfo {
    /// Page geometry with no tables or boxes.
    pub fn new(number: u32, width: f32, height: f32) -> Self {
        Self {
            number,
            width,
            height,
            tables: Vec::new(),
            boxes: Vec::new(),
        }
    }

    pub fn with_tables(mut self, tables: Vec<BoundingBox>) -> Self {
        self.tables = tables;
        self
    }

    pub fn with_boxes(mut self, boxes: Vec<BoundingBox>) -> Self {
        self.boxes = boxes;
        self
    }

    /// Whether a box intersects any table region on this page.
    pub fn in_table(&self, bbox: &BoundingBox) -> bool {
        self.tables.iter().any(|t| t.intersects(bbox))
    }

    /// Whether the center of a box falls inside a drawn text box.
    pub fn in_box(&self, bbox: &BoundingBox) -> bool {
        let (x, y) = (bbox.center_x(), bbox.center_y());
        self.boxes.iter().any(|b| b.contains_point(x, y))
    }
}
