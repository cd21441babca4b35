//! Output assembly.

use crate::model::{Candidate, OutlineEntry, TextRun};

/// Build the ordered outline from leveled candidates.
///
/// Entries are sorted by page and reading order. Adjacent duplicates collapse
/// into one, and pages outside `1..=page_count` are discarded.
pub fn assemble(candidates: &[Candidate], runs: &[TextRun], page_count: u32) -> Vec<OutlineEntry> {
    let mut leveled: Vec<(&TextRun, &Candidate)> = candidates
        .iter()
        .filter(|c| c.is_active())
        .filter_map(|c| c.level.map(|_| (&runs[c.run], c)))
        .filter(|(run, _)| (1..=page_count).contains(&run.page))
        .collect();
    leveled.sort_by_key(|(run, _)| (run.page, run.order));

    let mut outline: Vec<OutlineEntry> = Vec::with_capacity(leveled.len());
    for (run, candidate) in leveled {
        let Some(level) = candidate.level else {
            continue;
        };
        let entry = OutlineEntry::new(level, run.text.trim(), run.page);
        if outline.last() == Some(&entry) {
            continue;
        }
        outline.push(entry);
    }
    outline
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{BoundingBox, DropReason, HeadingLevel, PatternKind};
    use crate::script::Script;

    fn run(text: &str, page: u32, order: usize) -> TextRun {
        TextRun {
            text: text.to_string(),
            font_size: 16.0,
            bold: true,
            page,
            bbox: BoundingBox::default(),
            script: Script::Latin,
            order,
        }
    }

    fn leveled(idx: usize, level: HeadingLevel) -> Candidate {
        Candidate::new(idx, 3.0, 0.0, PatternKind::None).leveled(level)
    }

    #[test]
    fn test_sorted_by_page_and_order() {
        let runs = vec![run("Later", 2, 0), run("Second", 1, 5), run("First", 1, 1)];
        let candidates = vec![
            leveled(0, HeadingLevel::H1),
            leveled(1, HeadingLevel::H2),
            leveled(2, HeadingLevel::H1),
        ];
        let outline = assemble(&candidates, &runs, 2);
        let texts: Vec<&str> = outline.iter().map(|e| e.text.as_str()).collect();
        assert_eq!(texts, vec!["First", "Second", "Later"]);
    }

    #[test]
    fn test_adjacent_duplicates_collapse() {
        let runs = vec![run("Summary", 1, 0), run("Summary", 1, 1), run("Summary", 2, 0)];
        let candidates = vec![
            leveled(0, HeadingLevel::H1),
            leveled(1, HeadingLevel::H1),
            leveled(2, HeadingLevel::H1),
        ];
        let outline = assemble(&candidates, &runs, 2);
        assert_eq!(outline.len(), 2);
        assert_eq!(outline[1].page, 2);
    }

    #[test]
    fn test_skips_dropped_unleveled_and_out_of_range() {
        let runs = vec![run("Kept", 1, 0), run("Dropped", 1, 1), run("Bare", 1, 2), run("Ghost", 9, 0)];
        let candidates = vec![
            leveled(0, HeadingLevel::H2),
            leveled(1, HeadingLevel::H1).dropped(DropReason::FormField),
            Candidate::new(2, 3.0, 0.0, PatternKind::None),
            leveled(3, HeadingLevel::H1),
        ];
        let outline = assemble(&candidates, &runs, 3);
        assert_eq!(outline, vec![OutlineEntry::new(HeadingLevel::H2, "Kept", 1)]);
    }
}
