//! Logging utilities for output and progress tracking
//!
//! This module provides utilities for logging and progress tracking.

pub mod log;
pub mod progress;

// Re-export commonly used functions for convenience
pub use self::log::{log_document_skipped, log_operation_complete, log_operation_start, log_warning};
pub use progress::{create_document_progress_bar, finish_progress_bar};
