//! Font statistics engine.
//!
//! Builds the [`DocumentProfile`]: character-weighted size histogram, modal
//! body size, distinct larger sizes, bold ratio and dominant script.

use std::collections::{BTreeMap, HashMap};

use crate::config::OutlineConfig;
use crate::model::{DocumentProfile, TextRun};
use crate::script::Script;

/// Histogram key for a font size (0.1 pt precision).
fn size_key(size: f32) -> i32 {
    (size * 10.0).round() as i32
}

fn key_size(key: i32) -> f32 {
    key as f32 / 10.0
}

/// Compute the document profile from its runs.
///
/// Above `stats_max_sample_runs` runs, every n-th run is used so that the
/// cost stays bounded and the result is deterministic.
pub fn build_profile(runs: &[TextRun], config: &OutlineConfig) -> DocumentProfile {
    let stride = runs.len().div_ceil(config.stats_max_sample_runs.max(1)).max(1);

    let mut histogram: BTreeMap<i32, usize> = BTreeMap::new();
    let mut script_chars: HashMap<Script, usize> = HashMap::new();
    let mut total_chars = 0usize;
    let mut bold_chars = 0usize;

    for run in runs.iter().step_by(stride) {
        if !run.font_size.is_finite() || run.font_size <= 0.0 {
            continue;
        }
        let chars = run.char_count();
        if chars == 0 {
            continue;
        }
        *histogram.entry(size_key(run.font_size)).or_insert(0) += chars;
        if run.script != Script::Common {
            *script_chars.entry(run.script).or_insert(0) += chars;
        }
        total_chars += chars;
        if run.bold {
            bold_chars += chars;
        }
    }

    // Most frequent size; ties go to the smaller size.
    let Some(baseline_key) = histogram
        .iter()
        .max_by_key(|(key, count)| (**count, std::cmp::Reverse(**key)))
        .map(|(key, _)| *key)
    else {
        return DocumentProfile::degenerate();
    };
    let baseline = key_size(baseline_key);
    if baseline <= 0.0 {
        return DocumentProfile::degenerate();
    }

    let larger_sizes: Vec<f32> = histogram
        .keys()
        .rev()
        .map(|k| key_size(*k))
        .filter(|size| *size > baseline + config.min_size_delta)
        .collect();

    let dominant_script = script_chars
        .iter()
        .max_by_key(|(script, count)| (**count, std::cmp::Reverse(**script)))
        .map(|(script, _)| *script)
        .unwrap_or(Script::Common);

    let profile = DocumentProfile {
        baseline,
        size_discriminative: !larger_sizes.is_empty(),
        larger_sizes,
        histogram,
        bold_ratio: bold_chars as f32 / total_chars.max(1) as f32,
        dominant_script,
    };

    log::debug!(
        "profile: baseline {:.1}pt, larger sizes {:?}, bold ratio {:.2}, script {:?}",
        profile.baseline,
        profile.larger_sizes,
        profile.bold_ratio,
        profile.dominant_script
    );
    profile
}
