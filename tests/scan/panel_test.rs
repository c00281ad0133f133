use lab_extract::LabExtractError;
use lab_extract::config::DEFAULT_PANEL_TESTS;
use lab_extract::scan::PanelParser;
use rustc_hash::FxHashSet;

use crate::utils::{FBC_PANEL, date};

fn allow() -> FxHashSet<String> {
    DEFAULT_PANEL_TESTS.iter().map(|t| (*t).to_string()).collect()
}

#[test]
fn test_two_date_panel_aligns_by_position() {
    let allow = allow();
    let text = "Date Collected\t01/01/2024\t02/01/2024\nPlatelet Count\t250\t260\n";
    let (table, _) = PanelParser::new(&allow).parse(text).unwrap();
    assert_eq!(table.get("Platelet Count", date(2024, 1, 1)).unwrap().render(), "250");
    assert_eq!(table.get("Platelet Count", date(2024, 1, 2)).unwrap().render(), "260");
}

#[test]
fn test_extra_value_raises_mismatch() {
    let allow = allow();
    let text = "Date Collected\t01/01/2024\t02/01/2024\nPlatelet Count\t250\t260\t270\n";
    let err = PanelParser::new(&allow).parse(text).unwrap_err();
    match err {
        LabExtractError::PanelAlignmentMismatch {
            test,
            dates,
            values,
        } => {
            assert_eq!(test, "Platelet Count");
            assert_eq!(dates, 2);
            assert_eq!(values, 3);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_truncated_label_repaired() {
    let allow = allow();
    let (table, stats) = PanelParser::new(&allow).parse(FBC_PANEL).unwrap();
    assert_eq!(
        table.get("White Cell Count", date(2024, 2, 1)).unwrap().render(),
        "7.4"
    );
    assert_eq!(stats.units_seen, 1);
    assert_eq!(stats.observations, 6);
}

#[test]
fn test_repeated_panels_append() {
    let allow = allow();
    let text = "Date Collected\t01/01/2024\nMCV\t88\n\n\
                Date Collected\t01/01/2024\nMCV\t90\n";
    let (table, _) = PanelParser::new(&allow).parse(text).unwrap();
    let cell = table.get("MCV", date(2024, 1, 1)).unwrap();
    assert_eq!(cell.values(), ["88".to_string(), "90".to_string()]);
}

#[test]
fn test_interior_gap_keeps_alignment() {
    let allow = allow();
    let text = "Date Collected\t01/01/2024\t02/01/2024\t03/01/2024\nMCH\t29\t\t31\n";
    let (table, _) = PanelParser::new(&allow).parse(text).unwrap();
    assert!(table.get("MCH", date(2024, 1, 2)).is_none());
    assert_eq!(table.get("MCH", date(2024, 1, 3)).unwrap().render(), "31");
}

#[test]
fn test_unreadable_header_skipped() {
    let allow = allow();
    let text = "Date Collected\t32/13/2024\nMCV\t88\n";
    let (table, stats) = PanelParser::new(&allow).parse(text).unwrap();
    assert!(table.is_empty());
    assert_eq!(stats.undiscoverable_section_dates, 1);
}
