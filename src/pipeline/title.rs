//! Title extraction from the first page.

use std::collections::HashSet;

use crate::config::OutlineConfig;
use crate::model::{Candidate, DocumentProfile, DropReason, PageInfo, TextRun};
use crate::parser::DEFAULT_PAGE_SIZE;
use crate::patterns::PatternTables;

use super::normalize::on_same_line;

/// The document title and the runs it was assembled from.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TitleResult {
    /// Title text; empty when nothing stands out on page 1
    pub text: String,
    /// Font size of the title cluster
    pub size: Option<f32>,
    /// Arena indices of the runs that make up the title
    pub runs: Vec<usize>,
}

impl TitleResult {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

/// Case- and whitespace-insensitive form of a line.
fn normalized(text: &str) -> String {
    text.split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Find the title: the largest size cluster near the top of page 1.
pub fn extract_title(
    runs: &[TextRun],
    first_page: Option<&PageInfo>,
    profile: &DocumentProfile,
    config: &OutlineConfig,
    patterns: &PatternTables,
) -> TitleResult {
    if !profile.size_discriminative {
        return TitleResult::empty();
    }

    let (width, height) = first_page
        .map(|p| (p.width, p.height))
        .unwrap_or(DEFAULT_PAGE_SIZE);
    let min_size = config.title_min_size_ratio * profile.baseline;

    let eligible: Vec<usize> = runs
        .iter()
        .enumerate()
        .take_while(|(_, run)| run.page == 1)
        .filter(|(_, run)| {
            let right_aligned = run.bbox.x0 > config.right_aligned_ratio * width;
            run.font_size >= min_size
                && run.bbox.y0 <= config.title_region_ratio * height
                && (!right_aligned || run.script.is_rtl())
                && !first_page.is_some_and(|p| p.in_table(&run.bbox) || p.in_box(&run.bbox))
                && !patterns.is_form_noise(&run.text)
                && !patterns.is_date(&run.text, run.script)
                && !patterns.is_toc_entry(&run.text)
        })
        .map(|(idx, _)| idx)
        .collect();

    let Some(largest) = eligible
        .iter()
        .map(|&idx| runs[idx].font_size)
        .max_by(|a, b| a.total_cmp(b))
    else {
        return TitleResult::empty();
    };

    let mut cluster: Vec<usize> = eligible
        .into_iter()
        .filter(|&idx| runs[idx].font_size >= largest - config.title_size_tolerance)
        .collect();
    cluster.sort_by(|&a, &b| {
        let (a, b) = (&runs[a].bbox, &runs[b].bbox);
        a.y0.total_cmp(&b.y0).then(a.x0.total_cmp(&b.x0))
    });

    // First contiguous block from the top.
    let mut block: Vec<usize> = Vec::new();
    let mut bottom = f32::MIN;
    for idx in cluster {
        let run = &runs[idx];
        if let Some(&last) = block.last() {
            let gap = run.bbox.y0 - bottom;
            if !on_same_line(&runs[last], run) && gap > config.title_line_gap_ratio * run.font_size {
                break;
            }
        }
        bottom = bottom.max(run.bbox.y1);
        block.push(idx);
    }

    let mut seen = HashSet::new();
    let lines: Vec<&str> = block
        .iter()
        .map(|&idx| runs[idx].text.trim())
        .filter(|text| seen.insert(normalized(text)))
        .collect();

    let text = clean_title_fragments(&lines.join(" "), patterns);
    log::debug!("title: {:?} ({:.1}pt, {} runs)", text, largest, block.len());

    TitleResult {
        text,
        size: Some(largest),
        runs: block,
    }
}

/// Remove extraction debris from an assembled title.
///
/// Stray single letters go (except "a", "A" and "I"), as do short tokens
/// that are a prefix or suffix of a neighbouring longer token. Adjacent
/// repeated words collapse into one.
pub fn clean_title_fragments(text: &str, patterns: &PatternTables) -> String {
    let tokens: Vec<&str> = text
        .split_whitespace()
        .filter(|token| {
            let mut chars = token.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => {
                    !(c.is_uppercase() || c.is_lowercase()) || matches!(c, 'a' | 'A' | 'I')
                }
                _ => true,
            }
        })
        .collect();

    let is_debris = |token: &str, neighbour: Option<&&str>| {
        neighbour.is_some_and(|n| {
            n.chars().count() >= token.chars().count() + 2
                && (n.starts_with(token) || n.ends_with(token))
        })
    };

    let mut kept: Vec<&str> = Vec::with_capacity(tokens.len());
    for (i, token) in tokens.iter().enumerate() {
        let short = token.chars().count() <= 3;
        let function_word = patterns.ends_with_function_word(&format!(" {}", token));
        if short
            && !function_word
            && (is_debris(token, i.checked_sub(1).and_then(|j| tokens.get(j)))
                || is_debris(token, tokens.get(i + 1)))
        {
            continue;
        }
        if kept
            .last()
            .is_some_and(|last| last.to_lowercase() == token.to_lowercase())
        {
            continue;
        }
        kept.push(token);
    }

    kept.join(" ")
}

/// Drop page-1 candidates that repeat the title.
pub fn suppress_title_lines(
    candidates: Vec<Candidate>,
    runs: &[TextRun],
    title: &TitleResult,
) -> Vec<Candidate> {
    if title.is_empty() {
        return candidates;
    }

    let title_text = normalized(&title.text);
    let title_words: HashSet<String> = title
        .text
        .split_whitespace()
        .map(|w| w.trim_matches(|ch: char| !ch.is_alphanumeric()).to_lowercase())
        .filter(|w| !w.is_empty())
        .collect();

    candidates
        .iter()
        .map(|c| {
            let run = &runs[c.run];
            if run.page != 1 {
                return c.clone();
            }
            let words: Vec<String> = run
                .text
                .split_whitespace()
                .map(|w| w.trim_matches(|ch: char| !ch.is_alphanumeric()).to_lowercase())
                .filter(|w| !w.is_empty())
                .collect();
            let subset = !words.is_empty()
                && words.len() <= 3
                && words.iter().all(|w| title_words.contains(w));

            if title.runs.contains(&c.run) || normalized(&run.text) == title_text || subset {
                c.dropped(DropReason::Title)
            } else {
                c.clone()
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{BoundingBox, CandidateStatus, PatternKind};
    use crate::pipeline::stats::build_profile;
    use crate::script::detect_script;

    fn run(text: &str, size: f32, x: f32, y: f32, page: u32) -> TextRun {
        TextRun {
            text: text.to_string(),
            font_size: size,
            bold: true,
            page,
            bbox: BoundingBox::new(x, y, x + 0.5 * size * text.len() as f32, y + size),
            script: detect_script(text),
            order: 0,
        }
    }

    fn body(y: f32, page: u32) -> TextRun {
        TextRun {
            bold: false,
            ..run(
                "Ordinary paragraph text set at the body size of the document, long enough to dominate.",
                11.0,
                72.0,
                y,
                page,
            )
        }
    }

    fn title_of(runs: &[TextRun]) -> TitleResult {
        let config = OutlineConfig::default();
        let profile = build_profile(runs, &config);
        extract_title(
            runs,
            Some(&PageInfo::new(1, 612.0, 792.0)),
            &profile,
            &config,
            PatternTables::shared(),
        )
    }

    #[test]
    fn test_largest_top_line_is_title() {
        let runs = vec![
            run("Project Plan", 28.0, 200.0, 80.0, 1),
            run("1. Introduction", 18.0, 72.0, 200.0, 1),
            body(240.0, 1),
            body(260.0, 1),
        ];
        let title = title_of(&runs);
        assert_eq!(title.text, "Project Plan");
        assert_eq!(title.size, Some(28.0));
        assert_eq!(title.runs, vec![0]);
    }

    #[test]
    fn test_boxed_banner_is_not_title() {
        let runs = vec![
            run("Special Offer", 30.0, 100.0, 80.0, 1),
            run("Field Guide", 26.0, 100.0, 200.0, 1),
            body(300.0, 1),
            body(320.0, 1),
        ];
        let config = OutlineConfig::default();
        let profile = build_profile(&runs, &config);
        let page = PageInfo::new(1, 612.0, 792.0)
            .with_boxes(vec![BoundingBox::new(80.0, 60.0, 400.0, 130.0)]);

        let title = extract_title(&runs, Some(&page), &profile, &config, PatternTables::shared());
        assert_eq!(title.text, "Field Guide");
        assert_eq!(title.runs, vec![1]);
    }

    #[test]
    fn test_multi_line_title_joined() {
        let runs = vec![
            run("Understanding Outline", 24.0, 100.0, 80.0, 1),
            run("Extraction at Scale", 24.0, 100.0, 110.0, 1),
            body(300.0, 1),
            body(320.0, 1),
        ];
        assert_eq!(title_of(&runs).text, "Understanding Outline Extraction at Scale");
    }

    #[test]
    fn test_repeated_title_kept_once() {
        let runs = vec![
            run("Annual Report", 26.0, 150.0, 60.0, 1),
            run("Annual Report", 26.0, 150.0, 90.0, 1),
            run("ANNUAL  REPORT", 26.0, 150.0, 120.0, 1),
            body(300.0, 1),
            body(320.0, 1),
        ];
        let title = title_of(&runs);
        assert_eq!(title.text, "Annual Report");
        assert_eq!(title.runs.len(), 3);
    }

    #[test]
    fn test_no_title_without_standout_size() {
        let runs = vec![body(80.0, 1), body(100.0, 1)];
        assert!(title_of(&runs).is_empty());
    }

    #[test]
    fn test_title_ignores_later_pages_and_bottom_region() {
        let runs = vec![
            body(80.0, 1),
            run("Footer Banner", 30.0, 72.0, 700.0, 1),
            run("Second Page Heading", 30.0, 72.0, 80.0, 2),
            body(80.0, 2),
        ];
        assert!(title_of(&runs).is_empty());
    }

    #[test]
    fn test_right_aligned_label_skipped() {
        let runs = vec![
            run("Draft", 30.0, 480.0, 40.0, 1),
            run("Service Agreement", 24.0, 150.0, 80.0, 1),
            body(300.0, 1),
            body(320.0, 1),
        ];
        assert_eq!(title_of(&runs).text, "Service Agreement");
    }

    #[test]
    fn test_fragment_cleanup() {
        let patterns = PatternTables::shared();
        assert_eq!(
            clean_title_fragments("RFP: R Request for Pro Proposal", patterns),
            "RFP: Request for Proposal"
        );
        assert_eq!(clean_title_fragments("Plan Plan for a Year", patterns), "Plan for a Year");
        assert_eq!(
            clean_title_fragments("Welcome to Toronto in introduction", patterns),
            "Welcome to Toronto in introduction"
        );
    }

    #[test]
    fn test_suppress_title_lines() {
        let runs = vec![
            run("Project Plan", 28.0, 200.0, 80.0, 1),
            run("Project Plan", 14.0, 200.0, 400.0, 1),
            run("Plan", 14.0, 72.0, 450.0, 1),
            run("1. Introduction", 18.0, 72.0, 500.0, 1),
            run("Project Plan", 14.0, 72.0, 80.0, 2),
        ];
        let title = TitleResult {
            text: "Project Plan".to_string(),
            size: Some(28.0),
            runs: vec![0],
        };
        let candidates: Vec<Candidate> = (0..runs.len())
            .map(|i| Candidate::new(i, 2.0, 0.0, PatternKind::None))
            .collect();

        let filtered = suppress_title_lines(candidates, &runs, &title);
        for idx in 0..3 {
            assert_eq!(filtered[idx].status, CandidateStatus::Dropped(DropReason::Title));
        }
        assert!(filtered[3].is_active());
        assert!(filtered[4].is_active());
    }
}
