//! Scanning passes over report text
//!
//! The three passes are independent reads of the same text and each
//! produces its own [`PartialTable`](crate::models::PartialTable).

pub mod date_context;
pub mod episode;
pub mod panel;

pub use date_context::{DateContextScanner, DateState, scan_lines};
pub use episode::{EpisodeScanner, split_episodes};
pub use panel::{PANEL_HEADER, PanelParser, repair_label};
