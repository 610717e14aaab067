use std::path::PathBuf;

use energy_data::aggregator::aggregate;
use energy_data::analysis::analyze;
use energy_data::core::models::{FillMode, Period};
use energy_data::reader::load_measurements;

fn fixture() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/household_sample.csv")
}

#[test]
fn test_forward_fill_then_day_totals() {
    let loaded = load_measurements(&fixture(), FillMode::ForwardFill).expect("load");
    assert_eq!(loaded.report.total_rows, 8);
    assert_eq!(loaded.report.corrupted_rows, 4);
    assert_eq!(loaded.report.retained_rows, 8);
    assert!(loaded.report.warning.is_none());

    let by_day = aggregate(&loaded.measurements, Period::Day);
    assert_eq!(by_day.bucket_keys, vec![1.0, 2.0]);
    assert_eq!(by_day.readings[0], [455.0, 315.0, 155.0, 1150.0]);
    assert_eq!(by_day.readings[1], [470.0, 325.0, 163.0, 1180.0]);
    assert_eq!(by_day.totals(), loaded.measurements.grand_total());
}

#[test]
fn test_backward_fill_falls_back_on_corrupted_last_row() {
    let loaded = load_measurements(&fixture(), FillMode::BackwardFill).expect("load");
    let dropped = load_measurements(&fixture(), FillMode::Drop).expect("load");

    assert_eq!(loaded.measurements, dropped.measurements);
    assert_eq!(loaded.report.retained_rows, 4);
    let warning = loaded.report.warning.expect("warning");
    assert!(warning.to_string().contains("50.0%"));
}

#[test]
fn test_hour_of_day_pipeline() {
    let result = analyze(&fixture(), FillMode::ForwardFill, Period::HourOfTheDay).expect("analyze");
    let agg = &result.aggregated;

    assert_eq!(agg.len(), 24);
    assert_eq!(agg.readings[0], [130.0, 85.0, 45.0, 305.0]);
    assert_eq!(agg.readings[6], [105.0, 77.5, 36.5, 285.0]);
    assert_eq!(agg.readings[1], [0.0; 4]);

    let stats = result.statistics.expect("statistics");
    assert_eq!(stats.all.min, 0.0);
    assert_eq!(stats.zones[3].max, 305.0);
}

#[test]
fn test_minute_pipeline_keeps_every_row() {
    let result = analyze(&fixture(), FillMode::ForwardFill, Period::Minute).expect("analyze");
    let keys = &result.aggregated.bucket_keys;

    assert_eq!(keys.len(), 8);
    assert_eq!(keys[0], 0.0);
    assert_eq!(keys[1], 360.0);
    assert_eq!(keys[7], 1440.0 + 18.0 * 60.0);
    assert!(keys.windows(2).all(|w| w[0] <= w[1]));
}
