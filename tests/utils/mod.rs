use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

use chrono::NaiveDate;

static DIR_COUNTER: AtomicUsize = AtomicUsize::new(0);

/// Shorthand for building calendar dates in assertions
#[must_use]
pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid test date")
}

/// Fresh scratch directory under the system temp dir
#[must_use]
pub fn scratch_dir(name: &str) -> PathBuf {
    let n = DIR_COUNTER.fetch_add(1, Ordering::SeqCst);
    let dir = std::env::temp_dir().join(format!(
        "lab_extract_{name}_{}_{n}",
        std::process::id()
    ));
    if dir.exists() {
        std::fs::remove_dir_all(&dir).expect("clear scratch dir");
    }
    std::fs::create_dir_all(&dir).expect("create scratch dir");
    dir
}

/// Write a report file into `dir`
pub fn write_report(dir: &Path, name: &str, contents: &[u8]) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, contents).expect("write report");
    path
}

/// A two-date full blood count panel
pub const FBC_PANEL: &str = "Full Blood Count\n\
Date Collected\t15/01/2024\t01/02/2024\n\
Platelet Count\t250\t260\n\
White Cell Cou\t6.1\t7.4\n\
Haemoglobin\t131\t128\n\
\n\
Comment: reviewed\n";

/// Two dated episodes and one without a date
pub const EPISODES: &str = "Patient header\n\
Episode 24AB001\n\
Date collected 01/02/2024\n\
Sodium 139 mmol/L\n\
Urea 6.4 mmol/L\n\
Episode 24AB002\n\
Date collected 15/01/2024\n\
Creatinine 88 umol/L\n\
CLINICAL: skin biopsy PATHOLOGIST: Dr A\n\
Episode 24AB003\n\
Calcium 2.30 mmol/L\n";

/// A line-oriented report
pub const LINE_REPORT: &str = "Date collected 15/01/2024\n\
Sodium 140 mmol/L\n\
Anti-nuclear antibodies Positive Titre 160\n\
Date collected 01/02/2024\n\
Sodium 138 mmol/L\n\
Anti-nuclear antibodies Negative\n\
HBsAg: Negative\n";
