use lab_extract::config::DateFormatConfig;
use lab_extract::rules::RuleRegistry;
use lab_extract::scan::{DateContextScanner, DateState, scan_lines};

use crate::utils::{LINE_REPORT, date};

#[test]
fn test_lines_before_first_date_are_dropped() {
    let registry = RuleRegistry::standard().unwrap();
    let (table, stats) = scan_lines(
        &registry,
        &DateFormatConfig::default(),
        [
            "Patient: Jane Doe",
            "Ward 5",
            "Sodium 141 mmol/L",
            "Date collected 01/01/2024",
            "Urea 5.0 mmol/L",
        ],
    );
    assert!(table.get("Sodium", date(2024, 1, 1)).is_none());
    assert_eq!(table.get("Urea", date(2024, 1, 1)).unwrap().render(), "5.0");
    assert_eq!(stats.missing_date_context, 1);
}

#[test]
fn test_state_machine_transitions() {
    let registry = RuleRegistry::standard().unwrap();
    let mut scanner = DateContextScanner::new(&registry);
    assert_eq!(scanner.state(), DateState::NoDate);

    scanner.feed_line("Date collected 15/01/2024");
    assert_eq!(scanner.state(), DateState::HaveDate(date(2024, 1, 15)));

    scanner.feed_line("Date collected 31/02/2024");
    assert_eq!(scanner.state(), DateState::NoDate);

    scanner.feed_line("Sodium 140 mmol/L");
    let (table, stats) = scanner.finish();
    assert!(table.is_empty());
    assert_eq!(stats.missing_date_context, 1);
}

#[test]
fn test_later_match_overwrites_same_date() {
    let registry = RuleRegistry::standard().unwrap();
    let (table, _) = scan_lines(
        &registry,
        &DateFormatConfig::default(),
        [
            "Date collected 01/01/2024",
            "Sodium 140 mmol/L",
            "Sodium 142 mmol/L",
        ],
    );
    assert_eq!(table.get("Sodium", date(2024, 1, 1)).unwrap().render(), "142");
}

#[test]
fn test_titre_pair_forms_share_a_row() {
    let registry = RuleRegistry::standard().unwrap();
    let (table, _) = scan_lines(&registry, &DateFormatConfig::default(), LINE_REPORT.lines());
    assert_eq!(
        table.get("ANAIF", date(2024, 1, 15)).unwrap().render(),
        "Positive - 160"
    );
    assert_eq!(table.get("ANAIF", date(2024, 2, 1)).unwrap().render(), "Negative");
}

#[test]
fn test_marker_keyed_row_named_after_marker() {
    let registry = RuleRegistry::standard().unwrap();
    let (table, _) = scan_lines(&registry, &DateFormatConfig::default(), LINE_REPORT.lines());
    assert_eq!(table.get("HBsAg", date(2024, 2, 1)).unwrap().render(), "Negative");
    assert!(table.tests().all(|t| t != "Hep B"));
}

#[test]
fn test_date_line_is_not_scanned_for_results() {
    let registry = RuleRegistry::standard().unwrap();
    let (table, stats) = scan_lines(
        &registry,
        &DateFormatConfig::default(),
        ["Date collected 01/01/2024 Sodium 140 mmol/L"],
    );
    assert!(table.is_empty());
    assert_eq!(stats.observations, 0);
}

#[test]
fn test_negative_after_pending_titre_is_kept() {
    let registry = RuleRegistry::standard().unwrap();
    let (table, _) = scan_lines(
        &registry,
        &DateFormatConfig::default(),
        [
            "Date collected 01/01/2024",
            "Anti-nuclear antibodies Negative Titre pending; repeat Negative",
        ],
    );
    assert_eq!(table.get("ANAIF", date(2024, 1, 1)).unwrap().render(), "Negative");
}
