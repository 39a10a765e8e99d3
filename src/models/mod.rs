//! Core data models for normalized records and resolution reports.

mod record;
mod report;

pub use record::{is_placeholder_author, BibRecord, BookRecord, Summary, UNKNOWN, UNKNOWN_YEAR};
pub use report::{Attempt, AttemptStatus, ResolutionReport, WireResponse};
