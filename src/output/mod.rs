//! Output module for persisting articles and reporting runs
//!
//! This module handles:
//! - Writing one JSON file of articles per source
//! - Summarizing a run for the terminal and the log

mod json;
pub mod stats;

pub use json::JsonOutput;
pub use stats::{print_summary, RunSummary, SourceReport};
