//! End-to-end analysis pipeline for one measurement file.
//!
//! Loads and repairs the file, aggregates it by the requested period and
//! computes summary statistics, returning an [`AnalysisResult`] ready for
//! rendering.

use std::path::{Path, PathBuf};
use std::time::Instant;

use chrono::NaiveDateTime;
use energy_core::error::Result;
use energy_core::models::{Aggregated, FillMode, Measurements, Period};
use energy_core::statistics::{compute_statistics, StatisticsReport};
use serde::Serialize;
use tracing::info;

use crate::aggregator::aggregate;
use crate::reader::{load_measurements, LoadReport};

// ── Public types ──────────────────────────────────────────────────────────────

/// Metadata produced alongside the analysis result.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisMetadata {
    /// File the measurements were read from.
    pub source: PathBuf,
    /// Timestamp of the first retained row, when it forms a valid date.
    pub first_timestamp: Option<NaiveDateTime>,
    /// Timestamp of the last retained row, when it forms a valid date.
    pub last_timestamp: Option<NaiveDateTime>,
    /// Wall-clock seconds spent reading and repairing the file.
    pub load_time_seconds: f64,
    /// Wall-clock seconds spent aggregating and summarising.
    pub aggregate_time_seconds: f64,
}

/// The complete output of [`analyze`].
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisResult {
    pub load: LoadReport,
    pub aggregated: Aggregated,
    /// `None` when no rows survived loading.
    pub statistics: Option<StatisticsReport>,
    pub metadata: AnalysisMetadata,
}

impl AnalysisResult {
    /// `true` when loading left no rows to analyse.
    pub fn has_no_data(&self) -> bool {
        self.load.retained_rows == 0
    }
}

// ── Public function ───────────────────────────────────────────────────────────

/// Run the full analysis pipeline.
///
/// 1. Load and repair `path` with `fill_mode`.
/// 2. Aggregate the readings by `period`.
/// 3. Summarise the aggregated readings.
pub fn analyze(path: &Path, fill_mode: FillMode, period: Period) -> Result<AnalysisResult> {
    let load_start = Instant::now();
    let loaded = load_measurements(path, fill_mode)?;
    let load_time_seconds = load_start.elapsed().as_secs_f64();

    let aggregate_start = Instant::now();
    let aggregated = aggregate(&loaded.measurements, period);
    // Hour-of-the-day yields zero buckets even for an empty table.
    let statistics = if loaded.measurements.is_empty() {
        None
    } else {
        compute_statistics(&aggregated.readings)
    };
    let aggregate_time_seconds = aggregate_start.elapsed().as_secs_f64();

    let (first_timestamp, last_timestamp) = span(&loaded.measurements);

    info!(
        "Analysed {}: {} of {} rows kept, {} {} buckets",
        path.display(),
        loaded.report.retained_rows,
        loaded.report.total_rows,
        aggregated.len(),
        period,
    );

    Ok(AnalysisResult {
        load: loaded.report,
        aggregated,
        statistics,
        metadata: AnalysisMetadata {
            source: path.to_path_buf(),
            first_timestamp,
            last_timestamp,
            load_time_seconds,
            aggregate_time_seconds,
        },
    })
}

fn span(measurements: &Measurements) -> (Option<NaiveDateTime>, Option<NaiveDateTime>) {
    let first = measurements.time_keys.first().and_then(|k| k.to_datetime());
    let last = measurements.time_keys.last().and_then(|k| k.to_datetime());
    (first, last)
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_csv(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().expect("tempfile");
        file.write_all(content.as_bytes()).expect("write");
        file
    }

    #[test]
    fn test_analyze_day_period() {
        let file = write_csv(
            "2008,3,1,0,0,0,1,2,3,4\n\
             2008,3,1,0,1,0,1,2,3,4\n\
             2008,3,2,0,0,0,5,5,5,5\n",
        );
        let result = analyze(file.path(), FillMode::Drop, Period::Day).expect("analyze");

        assert_eq!(result.aggregated.bucket_keys, vec![1.0, 2.0]);
        assert_eq!(result.aggregated.readings[0], [2.0, 4.0, 6.0, 8.0]);
        let stats = result.statistics.as_ref().expect("statistics");
        assert_eq!(stats.zones[0].max, 5.0);
        assert_eq!(
            result.metadata.first_timestamp.map(|t| t.to_string()),
            Some("2008-03-01 00:00:00".to_string())
        );
        assert_eq!(
            result.metadata.last_timestamp.map(|t| t.to_string()),
            Some("2008-03-02 00:00:00".to_string())
        );
        assert!(!result.has_no_data());
    }

    #[test]
    fn test_analyze_all_corrupted_has_no_statistics() {
        let file = write_csv("2008,3,1,0,0,0,-1,2,3,4\n");
        let result =
            analyze(file.path(), FillMode::Drop, Period::HourOfTheDay).expect("analyze");

        assert!(result.has_no_data());
        assert!(result.statistics.is_none());
        // Hour-of-the-day keeps its 24 zero buckets even without data.
        assert_eq!(result.aggregated.len(), 24);
        assert!(result.metadata.first_timestamp.is_none());
    }

    #[test]
    fn test_analyze_reports_fallback_warning() {
        let file = write_csv(
            "2008,3,1,0,0,0,1,2,3,4\n\
             2008,3,1,0,1,0,1,2,-1,4\n",
        );
        let result =
            analyze(file.path(), FillMode::BackwardFill, Period::Minute).expect("analyze");
        assert!(result.load.warning.is_some());
        assert_eq!(result.aggregated.len(), 1);
    }

    #[test]
    fn test_analyze_propagates_parse_errors() {
        let file = write_csv("2008,3,1\n");
        assert!(analyze(file.path(), FillMode::Drop, Period::Minute).is_err());
    }

    #[test]
    fn test_analysis_result_serializes() {
        let file = write_csv("2008,3,1,0,0,0,1,2,3,4\n");
        let result = analyze(file.path(), FillMode::Drop, Period::Hour).expect("analyze");
        let json = serde_json::to_value(&result).expect("json");
        assert_eq!(json["aggregated"]["period"], "hour");
        assert_eq!(json["load"]["applied"], "drop");
        assert_eq!(json["aggregated"]["bucket_keys"][0], 0.0);
    }
}
