//! Utility modules for dates, report files and logging

pub mod date_utils;
pub mod io;
pub mod logging;
