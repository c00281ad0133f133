use lab_extract::models::PartialTable;
use lab_extract::{CellValue, PLACEHOLDER, consolidate, consolidate_tables, extract};

use crate::utils::{EPISODES, FBC_PANEL, date};

#[test]
fn test_columns_in_calendar_order() {
    let table = extract([
        "Date collected 01/02/2024",
        "Sodium 138 mmol/L",
        "Date collected 15/01/2024",
        "Sodium 140 mmol/L",
    ]);
    assert_eq!(table.iso_dates(), vec!["2024-01-15", "2024-02-01"]);
    assert_eq!(
        table.row("Sodium").unwrap(),
        [CellValue::from("140"), CellValue::from("138")]
    );
}

#[test]
fn test_unobserved_cells_hold_placeholder() {
    let table = extract([
        "Date collected 15/01/2024",
        "Sodium 140 mmol/L",
        "Date collected 01/02/2024",
        "Urea 6.1 mmol/L",
    ]);
    for (_, cells) in table.rows() {
        assert_eq!(cells.len(), table.dates().len());
    }
    assert_eq!(table.get("Sodium", date(2024, 2, 1)).unwrap().render(), PLACEHOLDER);
    assert_eq!(table.get("Urea", date(2024, 1, 15)).unwrap().render(), PLACEHOLDER);
}

#[test]
fn test_extract_is_idempotent() {
    let lines = [
        "Date collected 01/01/2024",
        "Sodium 140 mmol/L",
        "Anti-nuclear antibodies Positive Titre 160",
    ];
    let first = serde_json::to_value(extract(lines)).unwrap();
    let second = serde_json::to_value(extract(lines)).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_sodium_example() {
    let table = extract(["Date collected 01/01/2024", "Sodium 140 mmol/L"]);
    assert_eq!(
        serde_json::to_value(&table).unwrap(),
        serde_json::json!({"Sodium": {"2024-01-01": "140"}})
    );
}

#[test]
fn test_consolidate_panels_and_episodes() {
    let text = format!("{FBC_PANEL}\n{EPISODES}");
    let table = consolidate(&text).unwrap();

    assert_eq!(table.iso_dates(), vec!["2024-01-15", "2024-02-01"]);
    assert_eq!(table.get("Platelet Count", date(2024, 1, 15)).unwrap().render(), "250");
    assert_eq!(table.get("Sodium", date(2024, 2, 1)).unwrap().render(), "139");
    // Sodium was never observed on the earlier date
    assert_eq!(table.get("Sodium", date(2024, 1, 15)).unwrap().render(), PLACEHOLDER);
}

#[test]
fn test_rows_keep_first_seen_order() {
    let mut first = PartialTable::new();
    first.overwrite("Urea", date(2024, 1, 1), "5.0".to_string());
    let mut second = PartialTable::new();
    second.overwrite("Calcium", date(2024, 1, 2), "2.31".to_string());
    second.overwrite("Urea", date(2024, 1, 2), "5.2".to_string());

    let table = consolidate_tables([first, second]);
    assert_eq!(table.tests(), ["Urea".to_string(), "Calcium".to_string()]);
}

#[test]
fn test_repeated_panel_values_joined() {
    let text = "Date Collected\t01/01/2024\nMCV\t88\n\nDate Collected\t01/01/2024\nMCV\t90\n";
    let table = consolidate(text).unwrap();
    assert_eq!(table.get("MCV", date(2024, 1, 1)).unwrap().render(), "88; 90");
}
