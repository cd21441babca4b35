//! Noise filters.
//!
//! Each filter takes the candidate vector and returns a new one in which
//! noise is marked [`CandidateStatus::Dropped`](crate::model::CandidateStatus).
//! Filters never add candidates and never revive a dropped one. Right-to-left
//! runs are already in logical order here; the normalizer converts them.

use std::collections::{BTreeSet, HashMap};
use std::ops::Range;

use crate::config::OutlineConfig;
use crate::model::{Candidate, DropReason, PageInfo, TextRun};
use crate::patterns::{KeywordClass, ListMarker, PatternTables};

use super::normalize::visual_lines;

/// Separator used when cells of one visual line are read as a single line.
const CELL_SEPARATOR: &str = "    ";

/// Run all filters in order: TOC, form fields, lists, tables, text boxes.
pub fn apply_filters(
    candidates: Vec<Candidate>,
    runs: &[TextRun],
    pages: &[PageInfo],
    config: &OutlineConfig,
    patterns: &PatternTables,
) -> Vec<Candidate> {
    let candidates = filter_toc(candidates, runs, config, patterns);
    let candidates = filter_form_fields(candidates, runs, patterns);
    let candidates = filter_lists(candidates, runs, config, patterns);
    let candidates = filter_tables(candidates, runs, pages);
    filter_text_boxes(candidates, runs, pages)
}

/// Contiguous arena range of each page's runs.
fn page_ranges(runs: &[TextRun]) -> Vec<(u32, Range<usize>)> {
    let mut ranges: Vec<(u32, Range<usize>)> = Vec::new();
    for (idx, run) in runs.iter().enumerate() {
        match ranges.last_mut() {
            Some((page, range)) if *page == run.page => range.end = idx + 1,
            _ => ranges.push((run.page, idx..idx + 1)),
        }
    }
    ranges
}

fn count_dropped(before: &[Candidate], after: &[Candidate]) -> usize {
    let active = |cs: &[Candidate]| cs.iter().filter(|c| c.is_active()).count();
    active(before) - active(after)
}

/// Pages whose lines are mostly table-of-contents entries.
///
/// A page qualifies when enough of its visual lines read as "label, leader,
/// page number" and it either has dot leaders inside runs or a contents
/// heading. The second condition keeps numeric tables from looking like a TOC.
pub fn toc_pages(runs: &[TextRun], config: &OutlineConfig, patterns: &PatternTables) -> BTreeSet<u32> {
    let mut pages = BTreeSet::new();

    for (page, range) in page_ranges(runs) {
        let page_runs = &runs[range];
        let lines = visual_lines(page_runs);
        if lines.is_empty() {
            continue;
        }

        let mut entries = 0;
        let mut leader_entries = 0;
        let mut contents_heading = false;
        for line in &lines {
            let text = line
                .iter()
                .map(|&i| page_runs[i].text.as_str())
                .collect::<Vec<_>>()
                .join(CELL_SEPARATOR);
            if patterns.is_toc_entry(&text) {
                entries += 1;
                if line.iter().any(|&i| patterns.is_toc_entry(&page_runs[i].text)) {
                    leader_entries += 1;
                }
            } else if line.iter().any(|&i| {
                let run = &page_runs[i];
                patterns.keyword(&run.text, run.script) == Some(KeywordClass::Contents)
            }) {
                contents_heading = true;
            }
        }

        let ratio = entries as f32 / lines.len() as f32;
        if entries >= config.toc_min_entries
            && ratio >= config.toc_page_ratio
            && (leader_entries >= config.toc_min_entries || contents_heading)
        {
            log::debug!("page {} is a table of contents ({} entries)", page, entries);
            pages.insert(page);
        }
    }

    pages
}

/// Drop candidates on TOC pages and individual TOC entry lines.
pub fn filter_toc(
    candidates: Vec<Candidate>,
    runs: &[TextRun],
    config: &OutlineConfig,
    patterns: &PatternTables,
) -> Vec<Candidate> {
    let mut toc = toc_pages(runs, config, patterns);

    // A document that is nothing but a TOC-like page keeps its headings.
    let text_pages = page_ranges(runs).len();
    if !toc.is_empty() && toc.len() == text_pages {
        log::debug!("every page looks like a table of contents; keeping candidates");
        toc.clear();
    }

    let filtered: Vec<Candidate> = candidates
        .iter()
        .map(|c| {
            let run = &runs[c.run];
            if toc.contains(&run.page) || patterns.is_toc_entry(&run.text) {
                c.dropped(DropReason::TableOfContents)
            } else {
                c.clone()
            }
        })
        .collect();

    log::debug!("toc filter dropped {}", count_dropped(&candidates, &filtered));
    filtered
}

/// Drop placeholders, dates, addresses, URLs and instruction lines.
pub fn filter_form_fields(
    candidates: Vec<Candidate>,
    runs: &[TextRun],
    patterns: &PatternTables,
) -> Vec<Candidate> {
    let filtered: Vec<Candidate> = candidates
        .iter()
        .map(|c| {
            let run = &runs[c.run];
            if patterns.is_form_noise(&run.text)
                || patterns.is_date(&run.text, run.script)
                || patterns.is_instruction(&run.text, run.script)
            {
                c.dropped(DropReason::FormField)
            } else {
                c.clone()
            }
        })
        .collect();

    log::debug!("form filter dropped {}", count_dropped(&candidates, &filtered));
    filtered
}

/// Runs that belong to a list: consecutive short lines with identical
/// formatting and a strictly sequential marker, none of them a keyword.
pub fn list_runs(runs: &[TextRun], config: &OutlineConfig, patterns: &PatternTables) -> BTreeSet<usize> {
    let mut members = BTreeSet::new();

    for (_, range) in page_ranges(runs) {
        let mut sequence: Vec<(usize, ListMarker)> = Vec::new();
        let mut flush = |sequence: &mut Vec<(usize, ListMarker)>| {
            if sequence.len() >= config.list_min_run {
                members.extend(sequence.iter().map(|(idx, _)| *idx));
            }
            sequence.clear();
        };

        for idx in range {
            let run = &runs[idx];
            let marker = if run.char_count() <= config.list_max_chars
                && patterns.keyword(&run.text, run.script).is_none()
            {
                patterns.list_marker(&run.text)
            } else {
                None
            };
            let Some(marker) = marker else {
                flush(&mut sequence);
                continue;
            };

            let continues = sequence.last().is_some_and(|(last, last_marker)| {
                runs[*last].same_formatting(run, 0.1) && last_marker.is_followed_by(&marker)
            });
            if !continues {
                flush(&mut sequence);
            }
            sequence.push((idx, marker));
        }
        flush(&mut sequence);
    }

    members
}

/// Drop candidates that are items of a list.
pub fn filter_lists(
    candidates: Vec<Candidate>,
    runs: &[TextRun],
    config: &OutlineConfig,
    patterns: &PatternTables,
) -> Vec<Candidate> {
    let members = list_runs(runs, config, patterns);

    let filtered: Vec<Candidate> = candidates
        .iter()
        .map(|c| {
            if members.contains(&c.run) {
                c.dropped(DropReason::ListItem)
            } else {
                c.clone()
            }
        })
        .collect();

    log::debug!("list filter dropped {}", count_dropped(&candidates, &filtered));
    filtered
}

/// Drop candidates that intersect a detected table region.
pub fn filter_tables(candidates: Vec<Candidate>, runs: &[TextRun], pages: &[PageInfo]) -> Vec<Candidate> {
    let filtered = drop_on_page(&candidates, runs, pages, DropReason::TableInterior, |page, run| {
        page.in_table(&run.bbox)
    });
    log::debug!("table filter dropped {}", count_dropped(&candidates, &filtered));
    filtered
}

/// Drop candidates centered inside a drawn text box (callouts, sidebars).
pub fn filter_text_boxes(candidates: Vec<Candidate>, runs: &[TextRun], pages: &[PageInfo]) -> Vec<Candidate> {
    let filtered = drop_on_page(&candidates, runs, pages, DropReason::TextBox, |page, run| {
        page.in_box(&run.bbox)
    });
    log::debug!("text box filter dropped {}", count_dropped(&candidates, &filtered));
    filtered
}

fn drop_on_page<F>(
    candidates: &[Candidate],
    runs: &[TextRun],
    pages: &[PageInfo],
    reason: DropReason,
    inside: F,
) -> Vec<Candidate>
where
    F: Fn(&PageInfo, &TextRun) -> bool,
{
    let by_number: HashMap<u32, &PageInfo> = pages.iter().map(|p| (p.number, p)).collect();

    candidates
        .iter()
        .map(|c| {
            let run = &runs[c.run];
            let hit = by_number.get(&run.page).is_some_and(|page| inside(page, run));
            if hit {
                c.dropped(reason)
            } else {
                c.clone()
            }
        })
        .collect()
}
