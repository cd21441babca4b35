//! Integration tests for the outline pipeline over in-memory pages.

mod common;

use std::time::Duration;

use common::{body_page, line, with_body};
use pdf_outline::parser::KnownTables;
use pdf_outline::pipeline::extract_outline;
use pdf_outline::render::to_json;
use pdf_outline::{
    BoundingBox, DocumentOutline, Error, HeadingLevel, InMemorySource, JsonFormat, OutlineConfig,
    OutlineExtractor, PageContent, PageSource, PatternTables, Result,
};

fn outline_of(pages: Vec<PageContent>) -> DocumentOutline {
    OutlineExtractor::new()
        .extract_source(&InMemorySource::new(pages))
        .unwrap()
        .outline
}

fn entries(outline: &DocumentOutline) -> Vec<(HeadingLevel, &str, u32)> {
    outline
        .outline
        .iter()
        .map(|e| (e.level, e.text.as_str(), e.page))
        .collect()
}

fn project_plan() -> Vec<PageContent> {
    vec![
        PageContent::letter(1)
            .with_run(line("Project Plan", 28.0, true, 200.0, 60.0))
            .with_run(line("1. Introduction", 18.0, true, 72.0, 150.0)),
        PageContent::letter(2).with_run(line("1.1 Background", 14.0, true, 72.0, 72.0)),
        with_body(PageContent::letter(3), 72.0, 8),
    ]
}

#[test]
fn test_project_plan_end_to_end() {
    let outline = outline_of(project_plan());
    let json = to_json(&outline, JsonFormat::Compact).unwrap();
    assert_eq!(
        json,
        r#"{"title":"Project Plan","outline":[{"level":"H1","text":"1. Introduction","page":1},{"level":"H2","text":"1.1 Background","page":2}]}"#
    );
}

#[test]
fn test_processing_is_idempotent() {
    let first = to_json(&outline_of(project_plan()), JsonFormat::Pretty).unwrap();
    let second = to_json(&outline_of(project_plan()), JsonFormat::Pretty).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_repeated_title_appears_once() {
    let page = PageContent::letter(1)
        .with_run(line("Annual Report", 26.0, true, 150.0, 60.0))
        .with_run(line("Annual Report", 26.0, true, 150.0, 90.0))
        .with_run(line("Annual Report", 26.0, true, 150.0, 120.0))
        .with_run(line("Overview", 16.0, true, 72.0, 250.0))
        .with_run(line("Annual Report", 26.0, true, 150.0, 700.0));
    let page = with_body(page, 300.0, 8);

    let outline = outline_of(vec![page]);
    assert_eq!(outline.title, "Annual Report");
    assert!(outline.outline.iter().all(|e| e.text != "Annual Report"));
    assert_eq!(entries(&outline), vec![(HeadingLevel::H1, "Overview", 1)]);
}

#[test]
fn test_sizes_map_to_levels_regardless_of_order() {
    let pages = vec![
        body_page(6),
        with_body(
            PageContent::letter(2).with_run(line("Budget Details", 14.0, true, 72.0, 80.0)),
            150.0,
            4,
        ),
        with_body(
            PageContent::letter(3).with_run(line("Program Goals", 20.0, true, 72.0, 80.0)),
            150.0,
            4,
        ),
        with_body(
            PageContent::letter(4).with_run(line("Delivery Approach", 17.0, true, 72.0, 80.0)),
            150.0,
            4,
        ),
    ];

    let outline = outline_of(pages);
    assert_eq!(outline.title, "");
    assert_eq!(
        entries(&outline),
        vec![
            (HeadingLevel::H3, "Budget Details", 2),
            (HeadingLevel::H1, "Program Goals", 3),
            (HeadingLevel::H2, "Delivery Approach", 4),
        ]
    );
}

#[test]
fn test_deep_numbering_never_h1() {
    let pages = vec![
        body_page(6),
        with_body(
            PageContent::letter(2)
                .with_run(line("2 Methods", 20.0, true, 72.0, 80.0))
                .with_run(line("2.1 Design", 16.0, true, 72.0, 400.0)),
            150.0,
            4,
        ),
        with_body(
            PageContent::letter(3).with_run(line("2.1.1 Sampling Frame", 20.0, true, 72.0, 80.0)),
            150.0,
            4,
        ),
    ];

    let outline = outline_of(pages);
    assert_eq!(
        entries(&outline),
        vec![
            (HeadingLevel::H1, "2 Methods", 2),
            (HeadingLevel::H2, "2.1 Design", 2),
            (HeadingLevel::H3, "2.1.1 Sampling Frame", 3),
        ]
    );
}

#[test]
fn test_table_region_excluded() {
    let pages = vec![
        body_page(6),
        with_body(
            PageContent::letter(2)
                .with_run(line("Quarterly Results", 18.0, true, 72.0, 80.0))
                .with_run(line("Region Totals", 18.0, true, 80.0, 300.0)),
            400.0,
            4,
        ),
    ];
    let tables = KnownTables::new().with_table(2, BoundingBox::new(60.0, 290.0, 550.0, 380.0));

    let extraction = extract_outline(
        &InMemorySource::new(pages),
        &tables,
        &OutlineConfig::default(),
        PatternTables::shared(),
    )
    .unwrap();

    assert_eq!(
        entries(&extraction.outline),
        vec![(HeadingLevel::H1, "Quarterly Results", 2)]
    );
}

#[test]
fn test_rtl_keyword_in_visual_order() {
    let page = with_body(
        PageContent::letter(1).with_run(line("1 لصف", 11.0, false, 450.0, 80.0).visual()),
        150.0,
        6,
    );

    let outline = outline_of(vec![page]);
    assert_eq!(entries(&outline), vec![(HeadingLevel::H1, "فصل 1", 1)]);
}

#[test]
fn test_toc_page_contributes_nothing() {
    let toc = PageContent::letter(2)
        .with_run(line("Contents", 16.0, true, 72.0, 60.0))
        .with_run(line("1 Introduction ........ 3", 11.0, false, 72.0, 100.0))
        .with_run(line("2 Methods ........ 5", 11.0, false, 72.0, 120.0))
        .with_run(line("3 Results ........ 8", 11.0, false, 72.0, 140.0));
    let pages = vec![
        body_page(6),
        toc,
        with_body(
            PageContent::letter(3).with_run(line("1 Introduction", 16.0, true, 72.0, 80.0)),
            150.0,
            4,
        ),
    ];

    let outline = outline_of(pages);
    assert_eq!(entries(&outline), vec![(HeadingLevel::H1, "1 Introduction", 3)]);
}

#[test]
fn test_lists_and_form_fields_dropped() {
    let page = PageContent::letter(2)
        .with_run(line("Requirements", 16.0, true, 72.0, 60.0))
        .with_run(line("1. Install the package", 11.0, true, 90.0, 100.0))
        .with_run(line("2. Configure the server", 11.0, true, 90.0, 116.0))
        .with_run(line("3. Start the service", 11.0, true, 90.0, 132.0))
        .with_run(line("Name:", 14.0, true, 72.0, 200.0))
        .with_run(line("www.example.org", 14.0, true, 72.0, 240.0));
    let pages = vec![body_page(6), with_body(page, 300.0, 4)];

    let outline = outline_of(pages);
    assert_eq!(entries(&outline), vec![(HeadingLevel::H1, "Requirements", 2)]);
}

#[test]
fn test_flat_document_uses_numbering_depth() {
    let page = PageContent::letter(1)
        .with_run(line("1 Scope", 11.0, false, 72.0, 60.0))
        .with_run(line("1.1 Terms Used", 11.0, false, 72.0, 200.0))
        .with_run(line("1.1.1 Abbreviations", 11.0, false, 72.0, 340.0));
    let page = with_body(page, 90.0, 3);

    let outline = outline_of(vec![page]);
    assert_eq!(outline.title, "");
    let levels: Vec<HeadingLevel> = outline.outline.iter().map(|e| e.level).collect();
    assert_eq!(levels, vec![HeadingLevel::H1, HeadingLevel::H2, HeadingLevel::H3]);
}

#[test]
fn test_outline_properties_hold() {
    let mut pages = vec![PageContent::letter(1).with_run(line("Field Guide", 26.0, true, 150.0, 60.0))];
    for (i, heading) in ["Preparation", "Equipment", "Safety", "Navigation"].iter().enumerate() {
        let page = PageContent::letter(i as u32 + 2)
            .with_run(line(heading, 18.0, true, 72.0, 60.0))
            .with_run(line(heading, 18.0, true, 72.0, 90.0))
            .with_run(line("Checklist", 14.0, true, 72.0, 400.0));
        pages.push(with_body(page, 150.0, 5));
    }
    let page_count = pages.len() as u32;

    let outline = outline_of(pages);
    assert_eq!(outline.title, "Field Guide");
    assert!(!outline.outline.is_empty());
    for entry in &outline.outline {
        assert!(entry.page >= 1 && entry.page <= page_count);
    }
    for pair in outline.outline.windows(2) {
        assert!(pair[0].page <= pair[1].page);
        assert_ne!(pair[0], pair[1]);
    }
}

#[test]
fn test_zero_budget_returns_first_page_only() {
    let config = OutlineConfig::default().with_time_budget(Duration::ZERO);
    let extraction = OutlineExtractor::new()
        .with_config(config)
        .extract_source(&InMemorySource::new(project_plan()))
        .unwrap();

    assert!(!extraction.complete);
    assert_eq!(extraction.page_count, 3);
    assert_eq!(extraction.pages_processed, 1);
    assert!(extraction.outline.outline.iter().all(|e| e.page == 1));
}

/// Serves in-memory pages but fails to load one of them.
struct UnreadablePage {
    pages: InMemorySource,
    broken: u32,
}

impl PageSource for UnreadablePage {
    fn page_count(&self) -> u32 {
        self.pages.page_count()
    }

    fn load_page(&self, number: u32) -> Result<PageContent> {
        if number == self.broken {
            return Err(Error::Corrupted(format!("page {} content stream", number)));
        }
        self.pages.load_page(number)
    }
}

#[test]
fn test_unreadable_page_is_skipped() {
    let pages = vec![
        with_body(
            PageContent::letter(1)
                .with_run(line("Annual Review", 28.0, true, 180.0, 60.0))
                .with_run(line("1. Overview", 18.0, true, 72.0, 150.0)),
            200.0,
            8,
        ),
        with_body(
            PageContent::letter(2).with_run(line("2. Lost Section", 18.0, true, 72.0, 72.0)),
            120.0,
            8,
        ),
        with_body(
            PageContent::letter(3).with_run(line("3. Findings", 18.0, true, 72.0, 72.0)),
            120.0,
            8,
        ),
    ];
    let source = UnreadablePage {
        pages: InMemorySource::new(pages),
        broken: 2,
    };

    let extraction = OutlineExtractor::new().extract_source(&source).unwrap();

    assert!(extraction.complete);
    assert_eq!(extraction.page_count, 3);
    assert_eq!(extraction.pages_processed, 3);
    assert_eq!(extraction.outline.title, "Annual Review");
    assert_eq!(
        entries(&extraction.outline),
        vec![
            (HeadingLevel::H1, "1. Overview", 1),
            (HeadingLevel::H1, "3. Findings", 3),
        ]
    );
}

#[test]
fn test_right_margin_label_is_not_heading() {
    let mut pages = project_plan();
    pages[1].push(line("Confidential", 16.0, true, 520.0, 30.0));
    pages[1] = with_body(pages[1].clone(), 140.0, 6);

    let outline = outline_of(pages);
    assert_eq!(
        entries(&outline),
        vec![
            (HeadingLevel::H1, "1. Introduction", 1),
            (HeadingLevel::H2, "1.1 Background", 2),
        ]
    );
}

#[test]
fn test_boxed_sidebar_is_not_heading() {
    let mut pages = project_plan();
    pages[1] = with_body(
        pages[1]
            .clone()
            .with_box(BoundingBox::new(72.0, 420.0, 400.0, 520.0))
            .with_run(line("Lessons Learned", 18.0, true, 90.0, 440.0)),
        140.0,
        6,
    );

    let outline = outline_of(pages);
    assert!(outline.outline.iter().all(|e| e.text != "Lessons Learned"));
    assert_eq!(outline.outline.len(), 2);
}

#[test]
fn test_number_wrapped_to_line_start_is_not_heading() {
    let page = with_body(
        PageContent::letter(1)
            .with_run(line("Staffing Review", 26.0, true, 150.0, 50.0))
            .with_run(line("1. Findings", 18.0, true, 72.0, 140.0))
            .with_run(line(
                "Most of the discussion concerned staffing levels across the",
                11.0,
                false,
                72.0,
                200.0,
            ))
            .with_run(line("3 Regional offices before the end of March.", 11.0, false, 72.0, 214.0)),
        300.0,
        8,
    );

    let outline = outline_of(vec![page]);
    assert_eq!(outline.title, "Staffing Review");
    assert_eq!(entries(&outline), vec![(HeadingLevel::H1, "1. Findings", 1)]);
}
