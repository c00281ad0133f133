//! Data model for extracted laboratory results

pub mod observation;
pub mod table;

pub use observation::{DropReason, Observation, ScanStats};
pub use table::{CellValue, PLACEHOLDER, PartialTable, ResultTable};
