use lab_extract::batch::{DocumentOutcome, process_file};
use lab_extract::export::INDEX_LABEL;
use lab_extract::{Extractor, ExtractorConfig, OutputFormat, process_folder};

use crate::utils::{LINE_REPORT, scratch_dir, write_report};

#[test]
fn test_folder_writes_one_table_per_document() {
    let input = scratch_dir("batch_in");
    let output = scratch_dir("batch_out");
    write_report(&input, "patient_a.txt", LINE_REPORT.as_bytes());
    write_report(&input, "patient_b.txt", b"No results in this export\n");
    write_report(&input, "notes.md", b"Date collected 01/01/2024\nSodium 140 mmol/L\n");

    let extractor = Extractor::new(ExtractorConfig::default().with_threads(2)).unwrap();
    let summary = process_folder(&extractor, &input, &output).unwrap();

    assert_eq!(summary.total(), 2);
    assert_eq!(summary.written, vec![output.join("patient_a.tsv")]);
    assert_eq!(summary.empty, vec!["patient_b".to_string()]);
    assert!(summary.failed.is_empty());

    let tsv = std::fs::read_to_string(output.join("patient_a.tsv")).unwrap();
    let header = tsv.lines().next().unwrap();
    assert_eq!(header, format!("{INDEX_LABEL}\t2024-01-15\t2024-02-01"));
    assert!(!output.join("patient_b.tsv").exists());
}

#[test]
fn test_undecodable_bytes_dropped() {
    let input = scratch_dir("lossy_in");
    let output = scratch_dir("lossy_out");
    let mut bytes = b"Date collected 01/01/2024\nSod".to_vec();
    bytes.push(0xFF);
    bytes.extend_from_slice(b"ium 140 mmol/L\n");
    let path = write_report(&input, "lossy.txt", &bytes);

    let config = ExtractorConfig::default().with_output_format(OutputFormat::Json);
    let extractor = Extractor::new(config).unwrap();
    let DocumentOutcome::Written(written) = process_file(&extractor, &path, &output) else {
        panic!("document should produce a table");
    };

    let json: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(written).unwrap()).unwrap();
    assert_eq!(json, serde_json::json!({"Sodium": {"2024-01-01": "140"}}));
}

#[test]
fn test_missing_input_folder_is_an_error() {
    let output = scratch_dir("missing_out");
    let extractor = Extractor::new(ExtractorConfig::default()).unwrap();
    let missing = output.join("does_not_exist");
    assert!(process_folder(&extractor, &missing, &output).is_err());
}
