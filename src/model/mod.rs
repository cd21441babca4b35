//! Data model for outline extraction.
//!
//! Raw runs come from the PDF collaborator, text runs from the run
//! normalizer; candidates carry per-stage status, and the outline types are
//! what gets serialized.

mod candidate;
mod document;
mod geometry;
mod page;
mod profile;
mod text;

pub use candidate::{Candidate, CandidateStatus, DropReason, PatternKind};
pub use document::{DocumentOutline, HeadingLevel, OutlineEntry};
pub use geometry::BoundingBox;
pub use page::{PageContent, PageInfo};
pub use profile::DocumentProfile;
pub use text::{RawRun, TextOrder, TextRun};
