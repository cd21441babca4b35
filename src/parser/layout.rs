//! Positional text extraction for PDF pages.
//!
//! Walks a page's content stream through the [`PdfBackend`] trait, tracking
//! the text matrix to place each shown string, then groups the placed spans
//! into lines and splits lines at wide gaps. The result is one [`RawRun`] per
//! visually contiguous fragment, with a top-down bounding box. Rectangles
//! sized like a framed text box are kept alongside the runs.

use std::collections::HashMap;

use log::debug;

use super::backend::{get_number_from_value, ContentOp, PageId, PdfBackend, PdfValue};
use crate::error::Result;
use crate::model::{BoundingBox, PageContent, RawRun};
use crate::script::is_spaceless_script_char;

/// Text rotated more than this many degrees off an axis is ignored.
const MAX_SKEW_DEGREES: f32 = 5.0;

/// TJ adjustments beyond this (thousandths of an em) are word spaces.
const TJ_SPACE_THRESHOLD: f32 = 200.0;

/// Estimated glyph advance as a fraction of the font size.
const AVG_CHAR_WIDTH_RATIO: f32 = 0.5;

/// Width range (points, exclusive) of a rectangle read as a text box.
const TEXT_BOX_WIDTH: (f32, f32) = (200.0, 600.0);

/// Height range (points, exclusive) of a rectangle read as a text box.
const TEXT_BOX_HEIGHT: (f32, f32) = (50.0, 700.0);

/// A shown string placed on the page.
#[derive(Debug, Clone)]
pub struct TextSpan {
    /// The text content
    pub text: String,
    /// X position (left edge)
    pub x: f32,
    /// Y position (baseline, PDF bottom-up coordinates)
    pub y: f32,
    /// Estimated width of the text
    pub width: f32,
    /// Effective font size in points
    pub font_size: f32,
    /// Whether the font appears to be bold
    pub is_bold: bool,
}

impl TextSpan {
    /// Create a new text span, deriving weight from the font name.
    pub fn new(text: String, x: f32, y: f32, font_size: f32, font_name: &str) -> Self {
        let lower = font_name.to_lowercase();
        let is_bold =
            lower.contains("bold") || lower.contains("black") || lower.contains("heavy");
        let width = text.chars().count() as f32 * font_size * AVG_CHAR_WIDTH_RATIO;

        Self {
            text,
            x,
            y,
            width,
            font_size,
            is_bold,
        }
    }

    /// Right edge of the span.
    pub fn right(&self) -> f32 {
        self.x + self.width
    }
}

/// Extracts positioned runs from pages of a document.
pub struct RunExtractor<'a, B: PdfBackend + ?Sized> {
    backend: &'a B,
}

impl<'a, B: PdfBackend + ?Sized> RunExtractor<'a, B> {
    /// Create an extractor over a backend.
    pub fn new(backend: &'a B) -> Self {
        Self { backend }
    }

    /// Extract the runs of one page.
    pub fn extract_page(&self, number: u32, page_id: PageId) -> Result<PageContent> {
        let (width, height) = self.backend.page_size(page_id);
        let mut page = PageContent::new(number, width, height);

        let content = self.backend.page_content(page_id)?;
        let ops = self.backend.decode_content(&content)?;
        let (spans, boxes) = self.collect_marks(page_id, &ops, height)?;
        debug!(
            "page {}: {} text spans, {} text boxes",
            number,
            spans.len(),
            boxes.len()
        );

        for run in spans_to_runs(spans, height) {
            page.push(run);
        }
        page.boxes = boxes;
        Ok(page)
    }

    /// Interpret text operators to place every shown string, and collect
    /// rectangles that frame text.
    fn collect_marks(
        &self,
        page_id: PageId,
        ops: &[ContentOp],
        page_height: f32,
    ) -> Result<(Vec<TextSpan>, Vec<BoundingBox>)> {
        let fonts: HashMap<Vec<u8>, String> = self
            .backend
            .page_fonts(page_id)?
            .into_iter()
            .map(|f| (f.name, f.base_font))
            .collect();

        let mut spans = Vec::new();
        let mut boxes = Vec::new();
        let mut current_font = String::new();
        let mut current_font_name: Vec<u8> = Vec::new();
        let mut current_font_size: f32 = 12.0;
        let mut text_matrix = TextMatrix::default();
        let mut in_text_block = false;

        for op in ops {
            match op.operator.as_str() {
                "BT" => {
                    in_text_block = true;
                    text_matrix = TextMatrix {
                        leading: text_matrix.leading,
                        ..TextMatrix::default()
                    };
                }
                "ET" => {
                    in_text_block = false;
                }
                "Tf" => {
                    if op.operands.len() >= 2 {
                        if let PdfValue::Name(font_name) = &op.operands[0] {
                            current_font_name = font_name.clone();
                            current_font = fonts.get(font_name).cloned().unwrap_or_else(|| {
                                String::from_utf8_lossy(font_name).to_string()
                            });
                        }
                        current_font_size = get_number_from_value(&op.operands[1]).unwrap_or(12.0);
                    }
                }
                "TL" => {
                    if let Some(leading) = op.operands.first().and_then(get_number_from_value) {
                        text_matrix.leading = leading;
                    }
                }
                "Td" | "TD" => {
                    if op.operands.len() >= 2 {
                        let tx = get_number_from_value(&op.operands[0]).unwrap_or(0.0);
                        let ty = get_number_from_value(&op.operands[1]).unwrap_or(0.0);
                        if op.operator == "TD" {
                            text_matrix.leading = -ty;
                        }
                        text_matrix.translate(tx, ty);
                    }
                }
                "Tm" => {
                    if op.operands.len() >= 6 {
                        let n: Vec<f32> = op.operands[..6]
                            .iter()
                            .map(|v| get_number_from_value(v).unwrap_or(0.0))
                            .collect();
                        text_matrix.set(n[0], n[1], n[2], n[3], n[4], n[5]);
                    }
                }
                "T*" => {
                    text_matrix.next_line();
                }
                "Tj" | "TJ" | "'" | "\"" => {
                    if matches!(op.operator.as_str(), "'" | "\"") {
                        text_matrix.next_line();
                    }
                    if !in_text_block {
                        continue;
                    }

                    let text = self.shown_text(page_id, &current_font_name, op);
                    if text.trim().is_empty() {
                        continue;
                    }

                    let effective_size = current_font_size * text_matrix.scale();
                    let span = TextSpan::new(
                        text,
                        text_matrix.e,
                        text_matrix.f,
                        effective_size,
                        &current_font,
                    );
                    let advance = span.width;

                    if text_matrix.is_axis_aligned() {
                        spans.push(span);
                    } else {
                        debug!("skipping rotated text: {:?}", span.text);
                    }
                    text_matrix.advance(advance / text_matrix.scale().max(f32::EPSILON));
                }
                "re" => {
                    if let Some(rect) = rect_from_operands(&op.operands, page_height) {
                        if is_text_box(&rect) {
                            boxes.push(rect);
                        }
                    }
                }
                _ => {}
            }
        }

        Ok((spans, boxes))
    }

    /// Decode the string operand(s) of a text-showing operator.
    fn shown_text(&self, page_id: PageId, font_name: &[u8], op: &ContentOp) -> String {
        match op.operator.as_str() {
            "TJ" => {
                let Some(PdfValue::Array(items)) = op.operands.first() else {
                    return String::new();
                };
                let mut combined = String::new();
                for item in items {
                    match item {
                        PdfValue::Str(bytes) => {
                            combined.push_str(&self.backend.decode_text(page_id, font_name, bytes));
                        }
                        PdfValue::Integer(_) | PdfValue::Real(_) => {
                            // Negative adjustments advance the pen; large ones are word breaks.
                            let adjustment = -get_number_from_value(item).unwrap_or(0.0);
                            if adjustment > TJ_SPACE_THRESHOLD
                                && combined
                                    .chars()
                                    .last()
                                    .is_some_and(|c| !c.is_whitespace() && !is_spaceless_script_char(c))
                            {
                                combined.push(' ');
                            }
                        }
                        _ => {}
                    }
                }
                combined
            }
            op_name => {
                let index = if op_name == "\"" { 2 } else { 0 };
                match op.operands.get(index) {
                    Some(PdfValue::Str(bytes)) => self.backend.decode_text(page_id, font_name, bytes),
                    _ => String::new(),
                }
            }
        }
    }
}

/// Read the `x y w h` operands of `re` as a top-down box.
fn rect_from_operands(operands: &[PdfValue], page_height: f32) -> Option<BoundingBox> {
    let [x, y, w, h] = operands else {
        return None;
    };
    let x = get_number_from_value(x)?;
    let y = get_number_from_value(y)?;
    let w = get_number_from_value(w)?;
    let h = get_number_from_value(h)?;
    Some(BoundingBox::new(x, page_height - y, x + w, page_height - (y + h)))
}

/// Whether a rectangle is sized like a box drawn around text, rather than a
/// rule, a table cell or a full-page frame.
pub fn is_text_box(rect: &BoundingBox) -> bool {
    let (w, h) = (rect.width(), rect.height());
    w > TEXT_BOX_WIDTH.0 && w < TEXT_BOX_WIDTH.1 && h > TEXT_BOX_HEIGHT.0 && h < TEXT_BOX_HEIGHT.1
}

/// Group placed spans into lines, split lines at wide gaps, and emit runs.
///
/// Runs are tagged as visually ordered since spans are joined left to right.
pub fn spans_to_runs(spans: Vec<TextSpan>, page_height: f32) -> Vec<RawRun> {
    group_spans_into_lines(spans)
        .into_iter()
        .flat_map(split_line_at_gaps)
        .filter_map(|segment| segment_to_run(&segment, page_height))
        .collect()
}

/// Group spans sharing a baseline, top of the page first.
fn group_spans_into_lines(mut spans: Vec<TextSpan>) -> Vec<Vec<TextSpan>> {
    spans.sort_by(|a, b| {
        b.y.partial_cmp(&a.y)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then(a.x.partial_cmp(&b.x).unwrap_or(std::cmp::Ordering::Equal))
    });

    let mut lines: Vec<Vec<TextSpan>> = Vec::new();
    for span in spans {
        match lines.last_mut() {
            Some(line) if same_baseline(&line[0], &span) => line.push(span),
            _ => lines.push(vec![span]),
        }
    }

    for line in &mut lines {
        line.sort_by(|a, b| a.x.partial_cmp(&b.x).unwrap_or(std::cmp::Ordering::Equal));
    }
    lines
}

fn same_baseline(a: &TextSpan, b: &TextSpan) -> bool {
    let tolerance = a.font_size.max(b.font_size) * 0.3;
    (a.y - b.y).abs() <= tolerance
}

/// Split a line wherever the horizontal gap exceeds twice the font size.
fn split_line_at_gaps(line: Vec<TextSpan>) -> Vec<Vec<TextSpan>> {
    let mut segments: Vec<Vec<TextSpan>> = Vec::new();
    for span in line {
        match segments.last_mut() {
            Some(segment) => {
                let prev = &segment[segment.len() - 1];
                let gap = span.x - prev.right();
                if gap > 2.0 * prev.font_size.max(span.font_size) {
                    segments.push(vec![span]);
                } else {
                    segment.push(span);
                }
            }
            None => segments.push(vec![span]),
        }
    }
    segments
}

fn segment_to_run(segment: &[TextSpan], page_height: f32) -> Option<RawRun> {
    let first = segment.first()?;

    let mut text = String::new();
    for (i, span) in segment.iter().enumerate() {
        if i > 0 {
            let prev = &segment[i - 1];
            if needs_space(prev, span) {
                text.push(' ');
            }
        }
        text.push_str(&span.text);
    }
    if text.trim().is_empty() {
        return None;
    }

    // Size and weight are weighted by character count.
    let total_chars: usize = segment.iter().map(|s| s.text.chars().count()).sum();
    let font_size = if total_chars > 0 {
        segment
            .iter()
            .map(|s| s.font_size * s.text.chars().count() as f32)
            .sum::<f32>()
            / total_chars as f32
    } else {
        first.font_size
    };
    let bold_chars: usize = segment
        .iter()
        .filter(|s| s.is_bold)
        .map(|s| s.text.chars().count())
        .sum();
    let bold = total_chars > 0 && bold_chars as f32 / total_chars as f32 > 0.5;

    let x0 = segment.iter().map(|s| s.x).fold(f32::INFINITY, f32::min);
    let x1 = segment.iter().map(|s| s.right()).fold(f32::NEG_INFINITY, f32::max);
    let baseline = segment.iter().map(|s| s.y).sum::<f32>() / segment.len() as f32;
    let top = page_height - (baseline + font_size * 0.8);
    let bottom = page_height - (baseline - font_size * 0.2);

    Some(
        RawRun::new(
            text.trim().to_string(),
            font_size,
            bold,
            BoundingBox::new(x0, top, x1, bottom),
        )
        .visual(),
    )
}

/// Insert a space between spans separated by a visible gap, except between
/// characters of scripts written without word spaces.
fn needs_space(prev: &TextSpan, curr: &TextSpan) -> bool {
    if prev.text.ends_with(char::is_whitespace) || curr.text.starts_with(char::is_whitespace) {
        return false;
    }
    let gap = curr.x - prev.right();
    let avg_char_width = curr.font_size * AVG_CHAR_WIDTH_RATIO;
    if gap <= avg_char_width * 0.2 {
        return false;
    }
    let prev_spaceless = prev.text.chars().last().is_some_and(is_spaceless_script_char);
    let curr_spaceless = curr.text.chars().next().is_some_and(is_spaceless_script_char);
    !(prev_spaceless && curr_spaceless)
}

/// Text matrix state for positioning.
#[derive(Debug, Clone, Copy)]
struct TextMatrix {
    a: f32,
    b: f32,
    c: f32,
    d: f32,
    e: f32, // X translation
    f: f32, // Y translation
    /// Start of the current line, for Td/T* relative moves.
    line_e: f32,
    line_f: f32,
    leading: f32,
}

impl Default for TextMatrix {
    fn default() -> Self {
        Self {
            a: 1.0,
            b: 0.0,
            c: 0.0,
            d: 1.0,
            e: 0.0,
            f: 0.0,
            line_e: 0.0,
            line_f: 0.0,
            leading: 0.0,
        }
    }
}

impl TextMatrix {
    fn set(&mut self, a: f32, b: f32, c: f32, d: f32, e: f32, f: f32) {
        self.a = a;
        self.b = b;
        self.c = c;
        self.d = d;
        self.e = e;
        self.f = f;
        self.line_e = e;
        self.line_f = f;
    }

    fn translate(&mut self, tx: f32, ty: f32) {
        self.line_e += tx * self.a + ty * self.c;
        self.line_f += tx * self.b + ty * self.d;
        self.e = self.line_e;
        self.f = self.line_f;
    }

    fn next_line(&mut self) {
        let leading = if self.leading > 0.0 { self.leading } else { 12.0 };
        self.translate(0.0, -leading);
    }

    /// Move the pen along the baseline by `tx` unscaled text units.
    fn advance(&mut self, tx: f32) {
        self.e += tx * self.a;
        self.f += tx * self.b;
    }

    fn scale(&self) -> f32 {
        (self.a * self.a + self.c * self.c).sqrt()
    }

    /// Whether the baseline runs along a page axis.
    fn is_axis_aligned(&self) -> bool {
        let angle = self.b.atan2(self.a).to_degrees().rem_euclid(90.0);
        angle <= MAX_SKEW_DEGREES || angle >= 90.0 - MAX_SKEW_DEGREES
    }
}
