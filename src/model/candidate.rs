//! Heading candidates and their per-stage status.

use crate::patterns::KeywordClass;

use super::HeadingLevel;

/// Which lexical pattern a candidate matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatternKind {
    /// Numbered section with its depth ("1.1" → 2).
    Numbered { depth: u8 },
    /// Section keyword.
    Keyword { class: KeywordClass },
    /// Short all-caps line.
    AllCaps,
    /// Formatting only.
    None,
}

impl PatternKind {
    /// Outline depth implied by the pattern, if any.
    pub fn depth(self) -> Option<usize> {
        match self {
            PatternKind::Numbered { depth } => Some(depth as usize),
            PatternKind::Keyword { class } => Some(class.depth() as usize),
            PatternKind::AllCaps | PatternKind::None => None,
        }
    }
}

/// Why a filter dropped a candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DropReason {
    TableOfContents,
    FormField,
    ListItem,
    TableInterior,
    TextBox,
    Title,
    OutOfRange,
}

/// Survival status of a candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CandidateStatus {
    Active,
    Dropped(DropReason),
}

/// A run provisionally identified as a heading.
///
/// `run` indexes the document's run arena. Stages never mutate a candidate
/// in place; they return a new sequence with updated `status` or `level`.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    /// Index into the run arena
    pub run: usize,
    /// Score from size, weight and isolation
    pub formatting_score: f32,
    /// Score from numbering, keywords and case
    pub pattern_score: f32,
    /// Strongest pattern matched
    pub pattern: PatternKind,
    /// Set by the noise filters
    pub status: CandidateStatus,
    /// Set by the level assigner
    pub level: Option<HeadingLevel>,
}

impl Candidate {
    /// Create an active, unleveled candidate.
    pub fn new(run: usize, formatting_score: f32, pattern_score: f32, pattern: PatternKind) -> Self {
        Self {
            run,
            formatting_score,
            pattern_score,
            pattern,
            status: CandidateStatus::Active,
            level: None,
        }
    }

    pub fn is_active(&self) -> bool {
        self.status == CandidateStatus::Active
    }

    /// Return a copy marked as dropped. Already dropped candidates keep their first reason.
    pub fn dropped(&self, reason: DropReason) -> Self {
        let status = match self.status {
            CandidateStatus::Active => CandidateStatus::Dropped(reason),
            dropped => dropped,
        };
        Self {
            status,
            ..self.clone()
        }
    }

    /// Return a copy with the given level.
    pub fn leveled(&self, level: HeadingLevel) -> Self {
        Self {
            level: Some(level),
            ..self.clone()
        }
    }
}
