//! Level assignment.
//!
//! The largest candidate sizes map to H1, H2 and H3. Numbering depth acts
//! as a floor: a size may make a heading deeper than its number says, never
//! shallower. Without size signal, numbering depth alone decides.

use crate::config::OutlineConfig;
use crate::model::{Candidate, DocumentProfile, DropReason, HeadingLevel, PatternKind, TextRun};

/// Number of supported outline levels.
const MAX_DEPTH: usize = 3;

/// Round a size to the nearest half point.
fn bucket(size: f32) -> f32 {
    (size * 2.0).round() / 2.0
}

/// Distinct heading size buckets, largest first.
///
/// Only active candidates above the baseline count; the title's size is
/// left out so that it does not claim H1.
pub fn size_buckets(
    candidates: &[Candidate],
    runs: &[TextRun],
    profile: &DocumentProfile,
    title_size: Option<f32>,
    config: &OutlineConfig,
) -> Vec<f32> {
    if !profile.size_discriminative {
        return Vec::new();
    }
    let title_bucket = title_size.map(bucket);
    let floor = profile.baseline + config.min_size_delta;

    let mut buckets: Vec<f32> = candidates
        .iter()
        .filter(|c| c.is_active())
        .map(|c| runs[c.run].font_size)
        .filter(|size| *size > floor)
        .map(bucket)
        .filter(|b| Some(*b) != title_bucket)
        .collect();
    buckets.sort_by(|a, b| b.total_cmp(a));
    buckets.dedup();
    buckets
}

/// Depth implied by font size: one plus the number of larger buckets.
fn size_depth(size: f32, buckets: &[f32], profile: &DocumentProfile, config: &OutlineConfig) -> Option<usize> {
    if buckets.is_empty() || size <= profile.baseline + config.min_size_delta {
        return None;
    }
    let b = bucket(size);
    Some(1 + buckets.iter().filter(|larger| **larger > b).count())
}

/// Give every active candidate a level, dropping those outside H1..H3.
pub fn assign_levels(
    candidates: Vec<Candidate>,
    runs: &[TextRun],
    profile: &DocumentProfile,
    title_size: Option<f32>,
    config: &OutlineConfig,
) -> Vec<Candidate> {
    let buckets = size_buckets(&candidates, runs, profile, title_size, config);
    let size_levels = buckets.len().min(MAX_DEPTH);
    log::debug!("level buckets: {:?}", buckets);

    candidates
        .iter()
        .map(|c| {
            if !c.is_active() {
                return c.clone();
            }
            let run = &runs[c.run];
            let pattern_depth = c.pattern.depth();

            let depth = match size_depth(run.font_size, &buckets, profile, config) {
                Some(by_size) => Some(by_size.max(pattern_depth.unwrap_or(1))),
                None => match (pattern_depth, c.pattern) {
                    (Some(depth), _) => Some(depth),
                    (None, PatternKind::AllCaps) => Some(1),
                    // Body-size bold sits below every size level.
                    (None, _) if run.bold => Some(size_levels + 1),
                    _ => None,
                },
            };

            match depth.and_then(HeadingLevel::from_depth) {
                Some(level) => c.leveled(level),
                None => {
                    log::trace!("out of range on page {}: {:?}", run.page, run.text);
                    c.dropped(DropReason::OutOfRange)
                }
            }
        })
        .collect()
}
