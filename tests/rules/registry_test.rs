use lab_extract::LabExtractError;
use lab_extract::config::DateFormatConfig;
use lab_extract::rules::{ResultShape, RuleDef, RuleRegistry, SectionRuleSet};
use lab_extract::scan::scan_lines;

use crate::utils::date;

#[test]
fn test_new_test_is_a_data_addition() {
    let mut registry = RuleRegistry::standard().unwrap();
    let before = registry.len();
    registry
        .register(&RuleDef::numeric("Potassium", r"Potassium\s+{value}\s+mmol/L"))
        .unwrap();
    assert_eq!(registry.len(), before + 1);

    let (table, _) = scan_lines(
        &registry,
        &DateFormatConfig::default(),
        ["Date collected 01/01/2024", "Potassium 5.9 H mmol/L"],
    );
    assert_eq!(table.get("Potassium", date(2024, 1, 1)).unwrap().render(), "5.9 H");
}

#[test]
fn test_invalid_pattern_reported_with_key() {
    let err = RuleRegistry::from_defs([RuleDef::numeric("Broken", r"Broken\s+({value}")]).unwrap_err();
    assert!(matches!(err, LabExtractError::InvalidPattern { ref key, .. } if key == "Broken"));
}

#[test]
fn test_shapes_in_standard_catalogue() {
    let registry = RuleRegistry::standard().unwrap();
    assert_eq!(
        registry.get("AB2GPEL IgM").unwrap().shape(),
        &ResultShape::labelled("IgM")
    );
    assert_eq!(registry.get("ACCP").unwrap().shape(), &ResultShape::unlabelled());
    assert_eq!(
        registry.get("Hep B").unwrap().shape(),
        &ResultShape::marker_keyed("IU/mL")
    );
}

#[test]
fn test_standard_section_rules() {
    let rules = SectionRuleSet::standard().unwrap();
    let names: Vec<&str> = rules.test_names().collect();
    assert!(names.contains(&"Histopathology"));
    assert!(names.contains(&"LA"));
    assert_eq!(rules.len(), 8);
}
