//! Integration tests over generated PDF files.

mod common;

use common::{build_pdf, build_pdf_with_boxes, pdf_body, project_plan_pdf, PdfLine};
use pdf_outline::render::to_json;
use pdf_outline::{
    extract_bytes, extract_reader, Error, HeadingLevel, JsonFormat, OutlineExtractor, PageSource,
    PdfParser, TableDetector, TableSource,
};

const PROJECT_PLAN_JSON: &str = r#"{"title":"Project Plan","outline":[{"level":"H1","text":"1. Introduction","page":1},{"level":"H2","text":"1.1 Background","page":2}]}"#;

#[test]
fn test_parser_counts_pages() {
    let parser = PdfParser::from_bytes(&project_plan_pdf()).unwrap();
    assert_eq!(parser.page_count(), 3);
    assert!(!parser.is_encrypted());
}

#[test]
fn test_parser_reads_runs_with_weight_and_size() {
    let parser = PdfParser::from_bytes(&project_plan_pdf()).unwrap();
    let page = parser.load_page(1).unwrap();

    assert_eq!(page.number, 1);
    assert_eq!((page.width, page.height), (612.0, 792.0));
    assert_eq!(page.runs.len(), 2);

    let title = &page.runs[0];
    assert_eq!(title.text, "Project Plan");
    assert!(title.bold);
    assert!((title.font_size - 28.0).abs() < 0.01);
    // Top-down coordinates: the title sits near the top of the page.
    assert!(title.bbox.y0 < 60.0);

    let heading = &page.runs[1];
    assert_eq!(heading.text, "1. Introduction");
    assert!(heading.bbox.y0 > title.bbox.y1);
}

#[test]
fn test_parser_page_out_of_range() {
    let parser = PdfParser::from_bytes(&project_plan_pdf()).unwrap();
    assert!(matches!(
        parser.load_page(4),
        Err(Error::PageOutOfRange(4, 3))
    ));
    assert!(parser.load_page(0).is_err());
}

#[test]
fn test_extract_bytes_project_plan() {
    let outline = extract_bytes(&project_plan_pdf()).unwrap();
    assert_eq!(to_json(&outline, JsonFormat::Compact).unwrap(), PROJECT_PLAN_JSON);
}

#[test]
fn test_extract_reader_matches_bytes() {
    let data = project_plan_pdf();
    let from_reader = extract_reader(std::io::Cursor::new(data.clone())).unwrap();
    let from_bytes = extract_bytes(&data).unwrap();
    assert_eq!(from_reader, from_bytes);
}

#[test]
fn test_extract_file_project_plan() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("plan.pdf");
    std::fs::write(&path, project_plan_pdf()).unwrap();

    let extraction = OutlineExtractor::new().extract_file(&path).unwrap();
    assert!(extraction.complete);
    assert_eq!(extraction.page_count, 3);
    assert_eq!(extraction.outline.title, "Project Plan");
    assert_eq!(extraction.outline.count_level(HeadingLevel::H1), 1);
    assert_eq!(extraction.outline.count_level(HeadingLevel::H2), 1);
}

#[test]
fn test_table_detector_on_generated_table() {
    let mut lines = vec![PdfLine::new("Regional Sales", 18, true, 72, 740)];
    let rows = [
        ("Region", "Units", "Revenue"),
        ("North", "120", "4800"),
        ("South", "95", "3650"),
        ("East", "143", "5720"),
        ("West", "88", "3410"),
    ];
    for (i, (region, units, revenue)) in rows.iter().enumerate() {
        let y = 680 - 20 * i as i64;
        lines.push(PdfLine::new(region, 11, false, 72, y));
        lines.push(PdfLine::new(units, 11, false, 240, y));
        lines.push(PdfLine::new(revenue, 11, false, 400, y));
    }
    lines.extend(pdf_body(520, 4));

    let data = build_pdf(&[lines]);
    let parser = PdfParser::from_bytes(&data).unwrap();
    let page = parser.load_page(1).unwrap();

    let tables = TableDetector::new().detect_tables(&page);
    assert_eq!(tables.len(), 1);
    let region = tables[0];
    let inside = page
        .runs
        .iter()
        .filter(|r| region.contains(&r.bbox))
        .count();
    assert_eq!(inside, 15);
    assert!(page
        .runs
        .iter()
        .filter(|r| r.text == "Regional Sales")
        .all(|r| !region.intersects(&r.bbox)));
}

#[test]
fn test_body_only_pdf_has_empty_outline() {
    let data = build_pdf(&[pdf_body(720, 10), pdf_body(720, 10)]);
    let outline = extract_bytes(&data).unwrap();
    assert!(outline.is_empty());
    assert_eq!(to_json(&outline, JsonFormat::Compact).unwrap(), r#"{"title":"","outline":[]}"#);
}

#[test]
fn test_boxed_callout_is_not_a_heading() {
    let mut first = vec![
        PdfLine::new("Field Notes", 24, true, 72, 740),
        PdfLine::new("1. Summary", 16, true, 72, 690),
        PdfLine::new("Did You Know", 16, true, 90, 350),
    ];
    first.extend(pdf_body(650, 8));
    let mut second = vec![PdfLine::new("2. Details", 16, true, 72, 740)];
    second.extend(pdf_body(700, 8));
    let data = build_pdf_with_boxes(
        &[first, second],
        &[vec![[72, 300, 300, 80], [40, 40, 532, 2]], vec![]],
    );

    let parser = PdfParser::from_bytes(&data).unwrap();
    let page = parser.load_page(1).unwrap();
    // the thin rule is not a text box
    assert_eq!(page.boxes.len(), 1);
    assert!((page.boxes[0].y0 - 412.0).abs() < 0.01);
    assert!(parser.load_page(2).unwrap().boxes.is_empty());

    let outline = extract_bytes(&data).unwrap();
    assert_eq!(outline.title, "Field Notes");
    let entries: Vec<(HeadingLevel, &str, u32)> = outline
        .outline
        .iter()
        .map(|e| (e.level, e.text.as_str(), e.page))
        .collect();
    assert_eq!(
        entries,
        vec![(HeadingLevel::H1, "1. Summary", 1), (HeadingLevel::H1, "2. Details", 2)]
    );
}
