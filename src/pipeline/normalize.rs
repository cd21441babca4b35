//! Run normalization.
//!
//! Turns the raw runs of one page into [`TextRun`]s: cleaned text, script tag,
//! logical character order, reading order, and wrapped heading lines joined
//! back into a single run.

use unicode_normalization::UnicodeNormalization;

use crate::config::OutlineConfig;
use crate::model::{PageContent, TextOrder, TextRun};
use crate::patterns::PatternTables;
use crate::script::{detect_script, is_spaceless_script_char, visual_to_logical};

/// Words a line needs before a missing final stop reads as a line wrap.
const WRAPPED_LINE_MIN_WORDS: usize = 8;

/// Expand a typographic ligature.
fn ligature(c: char) -> Option<&'static str> {
    match c {
        'ﬀ' => Some("ff"),
        'ﬁ' => Some("fi"),
        'ﬂ' => Some("fl"),
        'ﬃ' => Some("ffi"),
        'ﬄ' => Some("ffl"),
        'ﬅ' | 'ﬆ' => Some("st"),
        _ => None,
    }
}

/// Clean extraction artifacts from a run's text.
///
/// Applies NFC, expands ligatures, drops replacement and control characters,
/// collapses whitespace and removes spaces before punctuation. With
/// `repair_split_words`, a capital split from the rest of its word is rejoined.
pub fn clean_text(text: &str, repair_split_words: bool, patterns: &PatternTables) -> String {
    let mut expanded = String::with_capacity(text.len());
    for c in text.nfc() {
        if let Some(expansion) = ligature(c) {
            expanded.push_str(expansion);
        } else if c == '\u{FFFD}' {
            continue;
        } else if c.is_control() {
            if c.is_whitespace() {
                expanded.push(' ');
            }
        } else {
            expanded.push(c);
        }
    }

    let collapsed = expanded.split_whitespace().collect::<Vec<_>>().join(" ");
    let punctuated = patterns.tighten_punctuation(&collapsed);

    if repair_split_words {
        patterns.repair_split_capitals(&punctuated).into_owned()
    } else {
        punctuated.into_owned()
    }
}

/// Normalize the runs of one page into reading-ordered text runs.
pub fn normalize_page(
    page: &PageContent,
    config: &OutlineConfig,
    patterns: &PatternTables,
) -> Vec<TextRun> {
    let runs: Vec<TextRun> = page
        .runs
        .iter()
        .filter_map(|raw| {
            let cleaned = clean_text(&raw.text, config.repair_split_words, patterns);
            if cleaned.is_empty() {
                return None;
            }
            let script = detect_script(&cleaned);
            let text = if raw.order == TextOrder::Visual && script.is_rtl() {
                visual_to_logical(&cleaned)
            } else {
                cleaned
            };
            Some(TextRun {
                text,
                font_size: raw.font_size,
                bold: raw.bold,
                page: page.number,
                bbox: raw.bbox,
                script,
                order: 0,
            })
        })
        .collect();

    let ordered = reading_order(runs);
    let mut joined = join_fragments(ordered, config, patterns);
    for (i, run) in joined.iter_mut().enumerate() {
        run.order = i;
    }
    joined
}

/// Sort runs top to bottom, then along each line in its writing direction.
fn reading_order(mut runs: Vec<TextRun>) -> Vec<TextRun> {
    runs.sort_by(|a, b| {
        a.bbox
            .y0
            .partial_cmp(&b.bbox.y0)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let mut lines: Vec<Vec<TextRun>> = Vec::new();
    for run in runs {
        match lines.last_mut() {
            Some(line) if on_same_line(&line[0], &run) => line.push(run),
            _ => lines.push(vec![run]),
        }
    }

    lines
        .into_iter()
        .flat_map(|mut line| {
            let rtl_chars: usize = line
                .iter()
                .filter(|r| r.script.is_rtl())
                .map(|r| r.char_count())
                .sum();
            let total_chars: usize = line.iter().map(|r| r.char_count()).sum();
            if rtl_chars * 2 > total_chars {
                line.sort_by(|a, b| {
                    b.bbox
                        .x1
                        .partial_cmp(&a.bbox.x1)
                        .unwrap_or(std::cmp::Ordering::Equal)
                });
            } else {
                line.sort_by(|a, b| {
                    a.bbox
                        .x0
                        .partial_cmp(&b.bbox.x0)
                        .unwrap_or(std::cmp::Ordering::Equal)
                });
            }
            line
        })
        .collect()
}

/// Whether two runs share a visual line (at least half of the shorter one overlaps).
pub fn on_same_line(a: &TextRun, b: &TextRun) -> bool {
    let min_height = a.bbox.height().min(b.bbox.height());
    min_height > 0.0 && a.bbox.vertical_overlap(&b.bbox) >= 0.5 * min_height
}

/// Group reading-ordered runs of one page into visual lines (indices into `runs`).
pub fn visual_lines(runs: &[TextRun]) -> Vec<Vec<usize>> {
    let mut lines: Vec<Vec<usize>> = Vec::new();
    for (i, run) in runs.iter().enumerate() {
        match lines.last_mut() {
            Some(line) if line.first().is_some_and(|&f| on_same_line(&runs[f], run)) => {
                line.push(i)
            }
            _ => lines.push(vec![i]),
        }
    }
    lines
}

/// Join a line that continues the previous run on the next line.
fn join_fragments(
    runs: Vec<TextRun>,
    config: &OutlineConfig,
    patterns: &PatternTables,
) -> Vec<TextRun> {
    let mut out: Vec<TextRun> = Vec::with_capacity(runs.len());
    for run in runs {
        match out.last_mut() {
            Some(prev) if can_join(prev, &run, config, patterns) => merge_into(prev, run),
            _ => out.push(run),
        }
    }
    out
}

fn can_join(prev: &TextRun, next: &TextRun, config: &OutlineConfig, patterns: &PatternTables) -> bool {
    if on_same_line(prev, next) || next.bbox.y0 <= prev.bbox.y0 {
        return false;
    }
    if !prev.same_formatting(next, config.line_join_size_tolerance) {
        return false;
    }
    if prev.script.is_rtl() != next.script.is_rtl() {
        return false;
    }

    let gap = next.bbox.y0 - prev.bbox.y1;
    if gap > config.line_join_gap_ratio * prev.font_size {
        return false;
    }
    let overlaps_horizontally = next.bbox.x0 < prev.bbox.x1 && prev.bbox.x0 < next.bbox.x1;
    if !overlaps_horizontally {
        return false;
    }

    // Repeated headers, TOC lines and new list items or sections stay separate.
    if prev.text.to_lowercase() == next.text.to_lowercase() {
        return false;
    }
    if patterns.is_toc_entry(&prev.text) || patterns.is_toc_entry(&next.text) {
        return false;
    }
    if patterns.list_marker(&next.text).is_some()
        || patterns.keyword(&next.text, next.script).is_some()
    {
        return false;
    }
    // A number opening the next line continues a sentence cut by the wrap.
    if patterns.numbering(&next.text).is_some() && !breaks_mid_sentence(prev, patterns) {
        return false;
    }

    true
}

/// Whether a long prose line stops without closing its sentence.
fn breaks_mid_sentence(run: &TextRun, patterns: &PatternTables) -> bool {
    let text = run.text.trim_end();
    run.word_count() >= WRAPPED_LINE_MIN_WORDS
        && !text.ends_with(['.', ':', ';', '!', '?', '。'])
        && patterns.numbering(text).is_none()
        && patterns.list_marker(text).is_none()
}

fn merge_into(prev: &mut TextRun, next: TextRun) {
    let prev_chars = prev.char_count().max(1) as f32;
    let next_chars = next.char_count().max(1) as f32;
    prev.font_size =
        (prev.font_size * prev_chars + next.font_size * next_chars) / (prev_chars + next_chars);

    let last = prev.text.chars().last();
    let first = next.text.chars().next();
    let hyphenated = last == Some('-') && first.is_some_and(|c| c.is_lowercase());
    if hyphenated {
        prev.text.pop();
    } else if !(last.is_some_and(is_spaceless_script_char)
        && first.is_some_and(is_spaceless_script_char))
    {
        prev.text.push(' ');
    }
    prev.text.push_str(&next.text);

    prev.bbox = prev.bbox.union(&next.bbox);
    prev.script = detect_script(&prev.text);
}
