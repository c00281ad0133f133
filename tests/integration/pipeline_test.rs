use lab_extract::{Extractor, ExtractorConfig, LabExtractError, PLACEHOLDER, Passes};

use crate::utils::{EPISODES, FBC_PANEL, LINE_REPORT, date};

#[test]
fn test_line_mode_document() {
    let extractor = Extractor::new(ExtractorConfig::default()).unwrap();
    let doc = extractor.process_document("patient_a", LINE_REPORT).unwrap();

    assert_eq!(doc.id, "patient_a");
    assert_eq!(doc.table.iso_dates(), vec!["2024-01-15", "2024-02-01"]);
    assert_eq!(doc.table.get("Sodium", date(2024, 2, 1)).unwrap().render(), "138");
    assert_eq!(doc.table.get("HBsAg", date(2024, 1, 15)).unwrap().render(), PLACEHOLDER);
    assert_eq!(doc.stats.observations, 5);
}

#[test]
fn test_empty_document_reported() {
    let extractor = Extractor::new(ExtractorConfig::default()).unwrap();
    let err = extractor
        .process_document("blank", "Nothing of interest here\n")
        .unwrap_err();
    assert!(err.is_empty_extraction());
}

#[test]
fn test_placeholders_alone_are_empty() {
    let config = ExtractorConfig::new().with_passes(Passes::panels());
    let extractor = Extractor::new(config).unwrap();
    let err = extractor
        .process_document("dated_only", "Episode Z9\nDate collected 01/01/2024\n")
        .unwrap_err();
    assert!(matches!(err, LabExtractError::EmptyExtraction { .. }));
}

#[test]
fn test_all_passes_share_one_table() {
    let config = ExtractorConfig::new().with_passes(Passes::all());
    let extractor = Extractor::new(config).unwrap();
    let text = format!("{LINE_REPORT}\n{FBC_PANEL}\n{EPISODES}");
    let doc = extractor.process_document("mixed", &text).unwrap();

    assert_eq!(doc.table.get("ANAIF", date(2024, 1, 15)).unwrap().render(), "Positive - 160");
    assert_eq!(doc.table.get("Platelet Count", date(2024, 2, 1)).unwrap().render(), "260");
    assert_eq!(doc.table.get("Histopathology", date(2024, 1, 15)).unwrap().render(), "skin biopsy");
}

#[test]
fn test_date_window_applied() {
    let config = ExtractorConfig::new().with_start_date(date(2024, 2, 1));
    let extractor = Extractor::new(config).unwrap();
    let doc = extractor.process_document("windowed", LINE_REPORT).unwrap();
    assert_eq!(doc.table.dates(), [date(2024, 2, 1)]);
    assert_eq!(doc.stats.outside_date_range, 2);
}

#[test]
fn test_lenient_panels_drop_bad_rows() {
    let text = "Date Collected\t01/01/2024\t02/01/2024\nMCV\t88\nMCH\t29\t30\n";

    let strict = Extractor::new(ExtractorConfig::new().with_passes(Passes::panels())).unwrap();
    assert!(matches!(
        strict.process_document("strict", text),
        Err(LabExtractError::PanelAlignmentMismatch { .. })
    ));

    let lenient = Extractor::new(
        ExtractorConfig::new()
            .with_passes(Passes::panels())
            .lenient_panels(),
    )
    .unwrap();
    let doc = lenient.process_document("lenient", text).unwrap();
    assert!(doc.table.row("MCV").is_none());
    assert_eq!(doc.table.get("MCH", date(2024, 1, 2)).unwrap().render(), "30");
    assert_eq!(doc.stats.misaligned_panel_rows, 1);
}

#[test]
fn test_invalid_date_range_rejected() {
    let config = ExtractorConfig::new().with_date_range(date(2024, 3, 1), date(2024, 1, 1));
    assert!(Extractor::new(config).is_err());
}

#[test]
fn test_extra_panel_row_kept() {
    let text = "Date Collected\t01/01/2024\nNeutrophils\t4.1\nMCV\t88\n";
    let mut config = ExtractorConfig::new().with_passes(Passes::panels());
    config.add_panel_test("Neutrophils");
    let extractor = Extractor::new(config).unwrap();
    let doc = extractor.process_document("wider_panel", text).unwrap();
    assert_eq!(doc.table.get("Neutrophils", date(2024, 1, 1)).unwrap().render(), "4.1");
    assert_eq!(doc.table.get("MCV", date(2024, 1, 1)).unwrap().render(), "88");
}
