//! Candidate detection.
//!
//! Every run is scored twice: a formatting score from size, weight and
//! isolation, and a pattern score from numbering, keywords and case. A run
//! clearing either threshold becomes a [`Candidate`]. Runs that start on the
//! far side of the page for their reading direction never qualify.

use crate::config::OutlineConfig;
use crate::model::{Candidate, DocumentProfile, PageInfo, PatternKind, TextRun};
use crate::parser::DEFAULT_PAGE_SIZE;
use crate::patterns::PatternTables;

use super::normalize::on_same_line;

/// Words after which a trailing full stop marks a sentence, not a heading.
const SENTENCE_MIN_WORDS: usize = 8;

/// Score every run and keep the ones that look like headings.
///
/// `runs` is the document arena, ordered by page then reading order.
/// `pages` supplies page widths; a page missing from it is taken as Letter.
pub fn detect_candidates(
    runs: &[TextRun],
    pages: &[PageInfo],
    profile: &DocumentProfile,
    config: &OutlineConfig,
    patterns: &PatternTables,
) -> Vec<Candidate> {
    let mut candidates = Vec::new();

    for (idx, run) in runs.iter().enumerate() {
        if !within_length_caps(run, config) {
            continue;
        }
        if !starts_on_reading_side(run, page_width(pages, run.page), config) {
            log::trace!("rejected off-side run on page {}: {:?}", run.page, run.text);
            continue;
        }

        let formatting = formatting_score(runs, idx, profile, config);
        let (pattern, kind) = pattern_score(run, patterns);

        let by_formatting = formatting >= config.formatting_threshold;
        let by_pattern = pattern >= config.pattern_threshold;
        if !(by_formatting || by_pattern) {
            continue;
        }

        if !by_formatting && run.word_count() > config.max_pattern_only_words {
            continue;
        }
        if !by_pattern && is_prose_fragment(run, patterns) {
            log::trace!("rejected prose fragment on page {}: {:?}", run.page, run.text);
            continue;
        }

        candidates.push(Candidate::new(idx, formatting, pattern, kind));
    }

    log::debug!("{} candidates from {} runs", candidates.len(), runs.len());
    candidates
}

fn page_width(pages: &[PageInfo], number: u32) -> f32 {
    pages
        .iter()
        .find(|p| p.number == number)
        .map_or(DEFAULT_PAGE_SIZE.0, |p| p.width)
}

/// Left-to-right headings start in the left part of the page; right-to-left
/// ones in the right part.
fn starts_on_reading_side(run: &TextRun, width: f32, config: &OutlineConfig) -> bool {
    let x = run.bbox.x0;
    if run.script.is_rtl() {
        x > (1.0 - config.heading_position_ratio) * width
    } else {
        x < config.heading_position_ratio * width
    }
}

fn within_length_caps(run: &TextRun, config: &OutlineConfig) -> bool {
    let chars = run.char_count();
    chars >= config.min_heading_chars
        && chars <= config.max_heading_chars
        && run.word_count() <= config.max_heading_words
}

/// Score from relative size, weight and whether the run stands on its own.
fn formatting_score(
    runs: &[TextRun],
    idx: usize,
    profile: &DocumentProfile,
    config: &OutlineConfig,
) -> f32 {
    let run = &runs[idx];
    let ratio = profile.ratio(run.font_size);
    let mut score = 0.0;

    if profile.size_discriminative {
        if ratio >= config.h1_size_ratio {
            score += 2.0;
        } else if ratio >= config.h2_size_ratio {
            score += 1.5;
        } else if ratio >= config.min_size_ratio {
            score += 1.0;
        }
    }

    // In a mostly-bold document, bold says nothing.
    if run.bold && profile.bold_ratio <= config.bold_dominance_ratio {
        score += if ratio >= 0.95 { 1.0 } else { 0.5 };
    }

    let same_page = |j: usize| runs.get(j).filter(|r| r.page == run.page);
    let prev = idx.checked_sub(1).and_then(same_page);
    let next = same_page(idx + 1);

    let shares_line = [prev, next]
        .into_iter()
        .flatten()
        .any(|other| on_same_line(run, other));
    let near_same_format = |other: &TextRun| {
        !on_same_line(run, other)
            && other.same_formatting(run, 0.5)
            && vertical_gap(run, other) <= config.line_join_gap_ratio * run.font_size
    };

    match (prev, next) {
        (Some(p), Some(n)) if near_same_format(p) && near_same_format(n) => score -= 1.0,
        _ if !shares_line && ![prev, next].into_iter().flatten().any(near_same_format) => {
            score += 0.5
        }
        _ => {}
    }

    score
}

fn vertical_gap(a: &TextRun, b: &TextRun) -> f32 {
    if a.bbox.y0 <= b.bbox.y0 {
        (b.bbox.y0 - a.bbox.y1).max(0.0)
    } else {
        (a.bbox.y0 - b.bbox.y1).max(0.0)
    }
}

/// Score from lexical patterns, with the strongest pattern matched.
fn pattern_score(run: &TextRun, patterns: &PatternTables) -> (f32, PatternKind) {
    let text = run.text.trim();

    let (mut score, kind) = if let Some(numbering) = patterns.numbering(text) {
        let score = if numbering.alphabetic { 1.5 } else { 2.0 };
        (score, PatternKind::Numbered { depth: numbering.depth })
    } else if let Some(class) = patterns.keyword(text, run.script) {
        (2.0, PatternKind::Keyword { class })
    } else if is_short_all_caps(run) {
        (2.0, PatternKind::AllCaps)
    } else {
        (0.0, PatternKind::None)
    };

    if ends_like_sentence(text) && run.word_count() > SENTENCE_MIN_WORDS {
        score -= 1.0;
    }

    (score, kind)
}

fn is_short_all_caps(run: &TextRun) -> bool {
    if !run.script.is_cased() || run.word_count() > 8 {
        return false;
    }
    let mut letters = 0;
    for c in run.text.chars().filter(|c| c.is_alphabetic()) {
        if c.is_lowercase() {
            return false;
        }
        letters += 1;
    }
    letters >= 4
}

fn ends_like_sentence(text: &str) -> bool {
    text.ends_with(['.', '。']) && !text.ends_with("...")
}

/// Whether a formatting-only candidate reads like a piece of running text.
fn is_prose_fragment(run: &TextRun, patterns: &PatternTables) -> bool {
    let text = run.text.trim();
    let starts_lowercase = text
        .chars()
        .next()
        .is_some_and(|c| c.is_ascii_lowercase());

    starts_lowercase
        || patterns.ends_with_function_word(text)
        || (ends_like_sentence(text) && run.word_count() > SENTENCE_MIN_WORDS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::BoundingBox;
    use crate::patterns::KeywordClass;
    use crate::pipeline::stats::build_profile;
    use crate::script::detect_script;

    fn run(text: &str, size: f32, bold: bool, page: u32, y: f32) -> TextRun {
        TextRun {
            text: text.to_string(),
            font_size: size,
            bold,
            page,
            bbox: BoundingBox::new(72.0, y, 72.0 + 6.0 * text.len() as f32, y + size),
            script: detect_script(text),
            order: 0,
        }
    }

    fn body(page: u32, y: f32) -> TextRun {
        run(
            "Body text that runs across the page and continues for a while in small type",
            11.0,
            false,
            page,
            y,
        )
    }

    fn detect(runs: &[TextRun]) -> Vec<Candidate> {
        let config = OutlineConfig::default();
        let profile = build_profile(runs, &config);
        detect_candidates(runs, &[], &profile, &config, PatternTables::shared())
    }

    fn moved_to(mut run: TextRun, x: f32) -> TextRun {
        let width = run.bbox.width();
        run.bbox = BoundingBox::new(x, run.bbox.y0, x + width, run.bbox.y1);
        run
    }

    fn texts(runs: &[TextRun], candidates: &[Candidate]) -> Vec<String> {
        candidates.iter().map(|c| runs[c.run].text.clone()).collect()
    }

    #[test]
    fn test_large_bold_line_is_candidate() {
        let runs = vec![
            run("Methods", 18.0, true, 1, 100.0),
            body(1, 140.0),
            body(1, 160.0),
        ];
        let candidates = detect(&runs);
        assert_eq!(texts(&runs, &candidates), vec!["Methods"]);
        assert!(candidates[0].formatting_score >= 3.0);
        assert_eq!(candidates[0].pattern, PatternKind::None);
    }

    #[test]
    fn test_run_on_far_side_is_not_candidate() {
        let runs = vec![
            moved_to(run("Confidential", 16.0, true, 1, 40.0), 520.0),
            run("Methods", 18.0, true, 1, 100.0),
            body(1, 140.0),
            body(1, 160.0),
        ];
        assert_eq!(texts(&runs, &detect(&runs)), vec!["Methods"]);
    }

    #[test]
    fn test_far_side_depends_on_script_and_page_width() {
        let runs = vec![
            moved_to(run("Résumé", 18.0, true, 1, 60.0), 450.0),
            moved_to(run("مقدمة", 18.0, true, 1, 160.0), 450.0),
            moved_to(run("ملخص", 18.0, true, 1, 260.0), 100.0),
            body(1, 340.0),
            body(1, 360.0),
        ];
        let texts_on = |width: f32| {
            let config = OutlineConfig::default();
            let profile = build_profile(&runs, &config);
            let pages = [PageInfo::new(1, width, 792.0)];
            texts(&runs, &detect_candidates(&runs, &pages, &profile, &config, PatternTables::shared()))
        };

        assert_eq!(texts_on(612.0), vec!["مقدمة"]);
        // on a landscape page x = 450 is no longer far right
        assert_eq!(texts_on(1008.0), vec!["Résumé", "مقدمة"]);
    }

    #[test]
    fn test_numbered_body_size_line_is_candidate() {
        let runs = vec![
            body(1, 80.0),
            run("2.3 Sampling Strategy", 11.0, false, 1, 120.0),
            body(1, 160.0),
        ];
        let candidates = detect(&runs);
        assert_eq!(texts(&runs, &candidates), vec!["2.3 Sampling Strategy"]);
        assert_eq!(candidates[0].pattern, PatternKind::Numbered { depth: 2 });
    }

    #[test]
    fn test_keyword_and_all_caps() {
        let runs = vec![
            run("Chapter 4: Results", 11.0, false, 1, 60.0),
            body(1, 100.0),
            run("FINDINGS", 11.0, false, 1, 140.0),
            body(1, 180.0),
        ];
        let candidates = detect(&runs);
        assert_eq!(candidates.len(), 2);
        assert_eq!(
            candidates[0].pattern,
            PatternKind::Keyword {
                class: KeywordClass::Chapter
            }
        );
        assert_eq!(candidates[1].pattern, PatternKind::AllCaps);
    }

    #[test]
    fn test_long_paragraph_rejected_regardless_of_size() {
        let long = "word ".repeat(40);
        let runs = vec![run(&long, 24.0, true, 1, 100.0), body(1, 200.0), body(1, 220.0)];
        assert!(detect(&runs).is_empty());
    }

    #[test]
    fn test_prose_fragments_rejected() {
        let runs = vec![
            run("continued from the previous page", 16.0, true, 1, 60.0),
            body(1, 100.0),
            run("Results of the survey and", 16.0, true, 1, 140.0),
            body(1, 180.0),
            body(1, 200.0),
        ];
        assert!(detect(&runs).is_empty());
    }

    #[test]
    fn test_plain_body_lines_are_not_candidates() {
        let runs = vec![body(1, 100.0), body(1, 120.0), body(2, 100.0)];
        assert!(detect(&runs).is_empty());
    }

    #[test]
    fn test_bold_ignored_when_dominant() {
        let runs = vec![
            run("Overview of scope", 11.0, true, 1, 60.0),
            run("Everything in this document is set in bold type face", 11.0, true, 1, 100.0),
            run("Even the ordinary paragraphs of running text here", 11.0, true, 1, 120.0),
        ];
        assert!(detect(&runs).is_empty());
    }

    #[test]
    fn test_sentence_penalty() {
        let text = "1. This numbered line is really a sentence that ends with a full stop.";
        let runs = vec![body(1, 60.0), run(text, 11.0, false, 1, 100.0), body(1, 140.0)];
        assert!(detect(&runs).is_empty());
    }
}
