//! Summary statistics over zone readings.

use serde::Serialize;

use crate::models::{ZoneReadings, ZONE_COUNT};

// ── Percentile helper ─────────────────────────────────────────────────────────

/// Compute the `p`-th percentile of a **sorted** slice using linear
/// interpolation between closest ranks (NumPy's default quantile method).
///
/// Returns `0.0` for an empty slice.
pub fn percentile(sorted_data: &[f64], p: f64) -> f64 {
    if sorted_data.is_empty() {
        return 0.0;
    }
    let len = sorted_data.len();
    if len == 1 {
        return sorted_data[0];
    }
    let rank = (p / 100.0) * (len as f64 - 1.0);
    let lo = rank.floor() as usize;
    let hi = rank.ceil() as usize;
    if lo == hi {
        return sorted_data[lo];
    }
    let frac = rank - lo as f64;
    sorted_data[lo] + frac * (sorted_data[hi] - sorted_data[lo])
}

// ── Summary ───────────────────────────────────────────────────────────────────

/// Five-number summary of one series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Summary {
    pub min: f64,
    pub first_quartile: f64,
    pub median: f64,
    pub third_quartile: f64,
    pub max: f64,
}

impl Summary {
    /// Summarise `values`; `None` when empty.
    pub fn from_values(mut values: Vec<f64>) -> Option<Self> {
        if values.is_empty() {
            return None;
        }
        values.sort_by(f64::total_cmp);
        Some(Self {
            min: values[0],
            first_quartile: percentile(&values, 25.0),
            median: percentile(&values, 50.0),
            third_quartile: percentile(&values, 75.0),
            max: values[values.len() - 1],
        })
    }
}

/// Per-zone summaries plus one over every cell of the table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatisticsReport {
    pub zones: [Summary; ZONE_COUNT],
    pub all: Summary,
}

/// Compute the statistics report for `readings`.
///
/// Returns `None` for an empty table. A single row is valid: every
/// statistic of a zone then equals that row's value.
pub fn compute_statistics(readings: &[ZoneReadings]) -> Option<StatisticsReport> {
    let column = |zone: usize| readings.iter().map(|row| row[zone]).collect::<Vec<_>>();

    let zones = [
        Summary::from_values(column(0))?,
        Summary::from_values(column(1))?,
        Summary::from_values(column(2))?,
        Summary::from_values(column(3))?,
    ];
    let all = Summary::from_values(readings.iter().flatten().copied().collect())?;

    Some(StatisticsReport { zones, all })
}

// ── Tests ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percentile_empty() {
        assert_eq!(percentile(&[], 50.0), 0.0);
    }

    #[test]
    fn test_percentile_single() {
        assert_eq!(percentile(&[42.0], 25.0), 42.0);
    }

    #[test]
    fn test_percentile_interpolates() {
        // numpy.quantile([1, 2, 3, 4], 0.25) == 1.75
        let data = [1.0, 2.0, 3.0, 4.0];
        assert!((percentile(&data, 25.0) - 1.75).abs() < 1e-12);
        assert!((percentile(&data, 50.0) - 2.5).abs() < 1e-12);
        assert!((percentile(&data, 75.0) - 3.25).abs() < 1e-12);
        assert_eq!(percentile(&data, 100.0), 4.0);
        assert_eq!(percentile(&data, 0.0), 1.0);
    }

    #[test]
    fn test_summary_sorts_input() {
        let summary = Summary::from_values(vec![9.0, 1.0, 5.0]).unwrap();
        assert_eq!(summary.min, 1.0);
        assert_eq!(summary.median, 5.0);
        assert_eq!(summary.max, 9.0);
        assert_eq!(summary.first_quartile, 3.0);
        assert_eq!(summary.third_quartile, 7.0);
    }

    #[test]
    fn test_compute_statistics_empty_is_none() {
        assert!(compute_statistics(&[]).is_none());
    }

    #[test]
    fn test_compute_statistics_single_row() {
        let report = compute_statistics(&[[1.0, 2.0, 3.0, 4.0]]).unwrap();
        for (zone, summary) in report.zones.iter().enumerate() {
            let v = (zone + 1) as f64;
            assert_eq!(summary.min, v);
            assert_eq!(summary.median, v);
            assert_eq!(summary.max, v);
        }
        assert_eq!(report.all.min, 1.0);
        assert_eq!(report.all.max, 4.0);
        assert!((report.all.median - 2.5).abs() < 1e-12);
    }

    #[test]
    fn test_compute_statistics_per_zone() {
        let rows = [
            [1.0, 10.0, 0.0, 5.0],
            [3.0, 30.0, 0.0, 5.0],
            [2.0, 20.0, 0.0, 5.0],
        ];
        let report = compute_statistics(&rows).unwrap();
        assert_eq!(report.zones[0].median, 2.0);
        assert_eq!(report.zones[1].max, 30.0);
        assert_eq!(report.zones[2].max, 0.0);
        assert_eq!(report.zones[3].first_quartile, 5.0);
        assert_eq!(report.all.max, 30.0);
        assert_eq!(report.all.min, 0.0);
    }
}
