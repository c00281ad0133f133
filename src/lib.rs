//! A Rust library for extracting dated laboratory results from exported
//! report text and consolidating them into test-by-date tables.

pub mod batch;
pub mod config;
pub mod consolidate;
pub mod error;
pub mod export;
pub mod models;
pub mod normalize;
pub mod pipeline;
pub mod rules;
pub mod scan;
pub mod utils;

// Re-export the most common types for easier use
// Core types
pub use config::{ExtractorConfig, OutputFormat, Passes};
pub use error::{LabExtractError, Result};
pub use models::{CellValue, Observation, PLACEHOLDER, PartialTable, ResultTable, ScanStats};
pub use rules::{ExtractionRule, ResultShape, RuleDef, RuleRegistry, SectionRuleSet};

// Entry points
pub use batch::{BatchSummary, process_folder};
pub use consolidate::consolidate_tables;
pub use pipeline::{DocumentResult, Extractor, consolidate, extract, extract_text};
