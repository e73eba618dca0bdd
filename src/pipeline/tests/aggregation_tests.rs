//! Tests for month alignment and monthly aggregation

use super::super::aggregation::{
    MonthAligner, aggregate_production, aggregate_quality, count_unaligned,
};
use super::{assert_close, production_record, quality_record};
use crate::models::{EnrichedRecord, ProductMasterEntry};
use chrono::NaiveDate;

fn entry() -> ProductMasterEntry {
    ProductMasterEntry::new("ABC", "STD-ABC", "F1")
}

#[test]
fn test_parse_date_default_formats() {
    let aligner = MonthAligner::default();
    let expected = NaiveDate::from_ymd_opt(2024, 3, 7);

    assert_eq!(aligner.parse_date("2024-03-07"), expected);
    assert_eq!(aligner.parse_date(" 2024/03/07 "), expected);
    assert_eq!(aligner.parse_date("03/07/2024"), expected);
    assert_eq!(aligner.parse_date("07-Mar-2024"), expected);
    assert_eq!(aligner.parse_date("2024-03-07 13:45:00"), expected);
    assert_eq!(aligner.parse_date("2024-03-07T13:45:00"), expected);
    assert_eq!(aligner.parse_date("2024-03-07T13:45:00+02:00"), expected);
}

#[test]
fn test_parse_date_rejects_garbage() {
    let aligner = MonthAligner::default();

    assert_eq!(aligner.parse_date(""), None);
    assert_eq!(aligner.parse_date("not a date"), None);
    assert_eq!(aligner.parse_date("2024-13-01"), None);
    assert_eq!(aligner.parse_date("2024-02-30"), None);
}

#[test]
fn test_month_key() {
    let aligner = MonthAligner::default();

    assert_eq!(aligner.month_key(Some("2024-01-31")), Some("2024-01".to_string()));
    assert_eq!(aligner.month_key(Some("12/01/2023")), Some("2023-12".to_string()));
    assert_eq!(aligner.month_key(Some("soon")), None);
    assert_eq!(aligner.month_key(None), None);
}

#[test]
fn test_custom_formats_replace_defaults() {
    let aligner = MonthAligner::new(["%d.%m.%Y".to_string()]);

    assert_eq!(aligner.formats().len(), 1);
    assert_eq!(aligner.month_key(Some("05.02.2024")), Some("2024-02".to_string()));
    assert_eq!(aligner.month_key(Some("2024-02-05")), None);
}

#[test]
fn test_align_sets_month_and_counts_unparsed() {
    let records = vec![
        EnrichedRecord::new(
            production_record("P1", "LINE01", "ABC", Some("2024-01-05"), Some(1.0), Some(1.0), 0.0),
            &entry(),
        ),
        EnrichedRecord::new(
            production_record("P1", "LINE01", "ABC", Some("bad"), Some(1.0), Some(1.0), 0.0),
            &entry(),
        ),
        EnrichedRecord::new(
            production_record("P1", "LINE01", "ABC", None, Some(1.0), Some(1.0), 0.0),
            &entry(),
        ),
    ];

    let aligned = MonthAligner::default().align(records);

    assert_eq!(aligned[0].month.as_deref(), Some("2024-01"));
    assert_eq!(count_unaligned(&aligned), 2);
}

#[test]
fn test_aggregate_production_sums_per_group() {
    let aligner = MonthAligner::default();
    let records = aligner.align(vec![
        EnrichedRecord::new(
            production_record("P1", "LINE01", "ABC", Some("2024-01-05"), Some(100.0), Some(120.0), 10.0),
            &entry(),
        ),
        EnrichedRecord::new(
            production_record("P1", "LINE01", "ABC", Some("2024-01-20"), Some(50.0), Some(60.0), 5.0),
            &entry(),
        ),
        EnrichedRecord::new(
            production_record("P1", "LINE02", "ABC", Some("2024-01-20"), Some(40.0), Some(40.0), 0.0),
            &entry(),
        ),
        EnrichedRecord::new(
            production_record("P1", "LINE01", "ABC", Some("2024-02-01"), Some(30.0), Some(30.0), 1.0),
            &entry(),
        ),
        // No month: excluded from every group
        EnrichedRecord::new(
            production_record("P1", "LINE01", "ABC", Some("??"), Some(999.0), Some(999.0), 99.0),
            &entry(),
        ),
    ]);

    let monthly = aggregate_production(&records);

    assert_eq!(monthly.len(), 3);

    // Ordered by grouping key
    let keys: Vec<(&str, &str)> = monthly
        .iter()
        .map(|a| (a.production_line.as_str(), a.month.as_str()))
        .collect();
    assert_eq!(
        keys,
        vec![("LINE01", "2024-01"), ("LINE01", "2024-02"), ("LINE02", "2024-01")]
    );

    let january = &monthly[0];
    assert_close(january.units_produced, 150.0);
    assert_close(january.planned_units, 180.0);
    assert_close(january.downtime_minutes, 15.0);
    assert_eq!(january.product_code_std, "STD-ABC");
    assert_eq!(january.product_family, "F1");
}

#[test]
fn test_aggregate_quality_ignores_production_line() {
    let aligner = MonthAligner::default();
    let records = aligner.align(vec![
        EnrichedRecord::new(
            quality_record("P1", "ABC", Some("2024-01-02"), Some(50.0), Some(5.0)),
            &entry(),
        ),
        EnrichedRecord::new(
            quality_record("P1", "ABC", Some("2024-01-30"), Some(30.0), Some(1.0)),
            &entry(),
        ),
        EnrichedRecord::new(
            quality_record("P2", "ABC", Some("2024-01-30"), Some(10.0), Some(0.0)),
            &entry(),
        ),
    ]);

    let monthly = aggregate_quality(&records);

    assert_eq!(monthly.len(), 2);
    assert_eq!(monthly[0].plant_id, "P1");
    assert_close(monthly[0].units_inspected, 80.0);
    assert_close(monthly[0].defect_units, 6.0);
    assert_eq!(monthly[1].plant_id, "P2");
}

#[test]
fn test_aggregate_empty_input() {
    assert!(aggregate_production(&[]).is_empty());
    assert!(aggregate_quality(&[]).is_empty());
}
