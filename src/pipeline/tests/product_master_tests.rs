//! Tests for product master resolution

use super::super::product_master::ProductMaster;
use super::{master_table, production_record, quality_record, raw_table};
use crate::error::PipelineError;
use crate::models::ProductMasterEntry;

fn sample_master() -> ProductMaster {
    ProductMaster::from_table(&master_table(&[
        [" abc ", "std-abc", "f1"],
        ["XYZ", "STD-XYZ", "F2"],
    ]))
    .unwrap()
}

#[test]
fn test_master_is_normalized_on_load() {
    let master = sample_master();

    assert_eq!(master.len(), 2);
    let entry = master.lookup("abc").unwrap();
    assert_eq!(entry.product_code_raw, "ABC");
    assert_eq!(entry.product_code_std, "STD-ABC");
    assert_eq!(entry.product_family, "F1");
    assert_eq!(entry.to_string(), "STD-ABC (F1)");
}

#[test]
fn test_lookup_ignores_case_and_spacing() {
    let master = sample_master();

    assert!(master.lookup(" x y z ").is_some());
    assert!(master.lookup("Abc").is_some());
    assert!(master.lookup("ABD").is_none());
}

#[test]
fn test_map_records_drops_unmatched() {
    let master = sample_master();
    let records = vec![
        production_record("P1", "LINE01", " abc ", None, Some(1.0), Some(1.0), 0.0),
        production_record("P1", "LINE01", "UNKNOWN", None, Some(1.0), Some(1.0), 0.0),
        production_record("P1", "LINE01", "xyz", None, Some(1.0), Some(1.0), 0.0),
        production_record("P1", "LINE01", "NAN", None, Some(1.0), Some(1.0), 0.0),
    ];

    let outcome = master.map_records(records);

    assert_eq!(outcome.mapped.len(), 2);
    assert_eq!(outcome.unmatched, 2);
    assert!(
        outcome
            .mapped
            .iter()
            .all(|enriched| master.lookup(&enriched.record.product_code).is_some())
    );

    let first = &outcome.mapped[0];
    assert_eq!(first.record.product_code, "ABC");
    assert_eq!(first.product_code_std, "STD-ABC");
    assert_eq!(first.product_family, "F1");
    assert_eq!(first.month, None);
    assert_eq!(outcome.mapped[1].product_code_std, "STD-XYZ");
}

#[test]
fn test_map_quality_records() {
    let master = sample_master();
    let outcome = master.map_records(vec![
        quality_record("P1", "abc", Some("2024-01-01"), Some(10.0), Some(1.0)),
        quality_record("P1", "nope", Some("2024-01-01"), Some(10.0), Some(1.0)),
    ]);

    assert_eq!(outcome.mapped.len(), 1);
    assert_eq!(outcome.unmatched, 1);
}

#[test]
fn test_identical_duplicates_collapse() {
    let master = ProductMaster::from_table(&master_table(&[
        ["ABC", "STD-ABC", "F1"],
        ["abc ", "std-abc", "f1"],
    ]))
    .unwrap();

    assert_eq!(master.len(), 1);

    // One input row still maps to exactly one output row
    let outcome = master.map_records(vec![production_record(
        "P1",
        "LINE01",
        "ABC",
        None,
        Some(1.0),
        Some(1.0),
        0.0,
    )]);
    assert_eq!(outcome.mapped.len(), 1);
}

#[test]
fn test_conflicting_duplicates_rejected() {
    let result = ProductMaster::from_entries([
        ProductMasterEntry::new("ABC", "STD-ABC", "F1"),
        ProductMasterEntry::new("abc", "STD-OTHER", "F1"),
    ]);

    match result {
        Err(PipelineError::DuplicateProductCode {
            code,
            first,
            second,
        }) => {
            assert_eq!(code, "ABC");
            assert_eq!(first, "STD-ABC (F1)");
            assert_eq!(second, "STD-OTHER (F1)");
        }
        other => panic!("expected DuplicateProductCode, got {other:?}"),
    }
}

#[test]
fn test_master_missing_column() {
    let table = raw_table("product_master", ["product_code_raw", "product_code_std"], &[[
        "ABC", "STD-ABC",
    ]]);

    assert!(matches!(
        ProductMaster::from_table(&table),
        Err(PipelineError::MissingColumn { column, .. }) if column == "product_family"
    ));
}
