//! Shared builders for integration tests.
#![allow(dead_code)]

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream};

use pdf_outline::{BoundingBox, PageContent, RawRun};

/// Ordinary prose lines, each distinct so that none look like repeated headers.
pub const BODY_LINES: [&str; 8] = [
    "The committee met twice during the quarter to review the budget figures.",
    "Most of the discussion concerned staffing levels in the regional offices.",
    "A revised schedule was circulated to all members before the second meeting.",
    "Several members asked for more detail on the procurement of new equipment.",
    "The finance team agreed to prepare a breakdown by department and by month.",
    "Questions about the timeline were deferred until the vendor responds again.",
    "Overall the plan remains on track, with minor delays in two work streams.",
    "Further updates will be shared once the external review has been completed.",
];

/// A line of text in top-down page coordinates.
pub fn line(text: &str, size: f32, bold: bool, x: f32, y: f32) -> RawRun {
    let width = 0.5 * size * text.chars().count() as f32;
    RawRun::new(text, size, bold, BoundingBox::new(x, y, x + width, y + size))
}

/// Append body paragraphs separated by blank space, starting at `y`.
pub fn with_body(mut page: PageContent, y: f32, count: usize) -> PageContent {
    for i in 0..count {
        let text = BODY_LINES[i % BODY_LINES.len()];
        page.push(line(text, 11.0, false, 72.0, y + 30.0 * i as f32));
    }
    page
}

/// A US-letter page with body text only.
pub fn body_page(count: usize) -> PageContent {
    with_body(PageContent::letter(1), 300.0, count)
}

/// One line to draw in a generated PDF (PDF user space, y up).
#[derive(Debug, Clone)]
pub struct PdfLine {
    pub text: String,
    pub size: i64,
    pub bold: bool,
    pub x: i64,
    pub y: i64,
}

impl PdfLine {
    pub fn new(text: &str, size: i64, bold: bool, x: i64, y: i64) -> Self {
        Self {
            text: text.to_string(),
            size,
            bold,
            x,
            y,
        }
    }
}

/// Body lines for a generated PDF page, from `top` downward.
pub fn pdf_body(top: i64, count: usize) -> Vec<PdfLine> {
    (0..count)
        .map(|i| PdfLine::new(BODY_LINES[i % BODY_LINES.len()], 11, false, 72, top - 14 * i as i64))
        .collect()
}

/// Build a real PDF with one content stream per page.
pub fn build_pdf(pages: &[Vec<PdfLine>]) -> Vec<u8> {
    build_pdf_with_boxes(pages, &[])
}

/// Like [`build_pdf`], also stroking `[x, y, w, h]` rectangles on each page.
pub fn build_pdf_with_boxes(pages: &[Vec<PdfLine>], boxes: &[Vec<[i64; 4]>]) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let regular = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
    });
    let bold = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica-Bold",
    });
    let resources = doc.add_object(dictionary! {
        "Font" => dictionary! {
            "F1" => regular,
            "F2" => bold,
        },
    });

    let mut kids: Vec<Object> = Vec::new();
    for (i, lines) in pages.iter().enumerate() {
        let mut operations = Vec::new();
        for [x, y, w, h] in boxes.get(i).into_iter().flatten() {
            operations.push(Operation::new("re", vec![(*x).into(), (*y).into(), (*w).into(), (*h).into()]));
            operations.push(Operation::new("S", vec![]));
        }
        for l in lines {
            let font = if l.bold { "F2" } else { "F1" };
            operations.push(Operation::new("BT", vec![]));
            operations.push(Operation::new("Tf", vec![font.into(), l.size.into()]));
            operations.push(Operation::new("Td", vec![l.x.into(), l.y.into()]));
            operations.push(Operation::new("Tj", vec![Object::string_literal(l.text.as_str())]));
            operations.push(Operation::new("ET", vec![]));
        }
        let content = Content { operations };
        let content_id = doc.add_object(Stream::new(
            dictionary! {},
            content.encode().expect("encode content stream"),
        ));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
            "Resources" => resources,
        });
        kids.push(page_id.into());
    }

    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
            "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes).expect("save generated pdf");
    bytes
}

/// The three-page "Project Plan" document.
pub fn project_plan_pdf() -> Vec<u8> {
    build_pdf(&[
        vec![
            PdfLine::new("Project Plan", 28, true, 200, 720),
            PdfLine::new("1. Introduction", 18, true, 72, 640),
        ],
        vec![PdfLine::new("1.1 Background", 14, true, 72, 720)],
        pdf_body(720, 12),
    ])
}
