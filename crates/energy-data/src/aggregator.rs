//! Time-bucketed aggregation of zone readings.
//!
//! Every [`Period`] is dispatched through [`aggregate`]; the input table is
//! never modified.

use energy_core::models::{
    sum_rows, Aggregated, Measurements, Period, TimeKey, ZoneReadings, TIME_FIELDS,
    ZONE_COUNT,
};

/// Minutes per unit of each time-key field, used by [`Period::Minute`].
///
/// Year and month use the mean Gregorian lengths; the sixth field is unused.
pub const MINUTE_WEIGHTS: [f64; TIME_FIELDS] = [525_948.766, 43_829.0639, 1440.0, 60.0, 1.0, 0.0];

/// Number of fixed buckets for [`Period::HourOfTheDay`].
pub const HOURS_PER_DAY: usize = 24;

// ── Public API ────────────────────────────────────────────────────────────────

/// Bucket `measurements` by `period` and reduce each bucket to one row.
///
/// Buckets are always ordered by ascending key.
pub fn aggregate(measurements: &Measurements, period: Period) -> Aggregated {
    let (bucket_keys, readings) = match period.time_column() {
        None => minute_offsets(measurements),
        Some(col) if period == Period::HourOfTheDay => hour_of_day_means(measurements, col),
        Some(col) => distinct_key_sums(measurements, col),
    };

    tracing::debug!(
        "Aggregated {} rows into {} {} buckets ({:?})",
        measurements.len(),
        bucket_keys.len(),
        period,
        period.reducer(),
    );

    Aggregated {
        period,
        bucket_keys,
        readings,
    }
}

/// Offset of `key` from `origin` in whole minutes.
///
/// Each weighted field delta is truncated toward zero before summing.
pub fn minute_offset(origin: &TimeKey, key: &TimeKey) -> i64 {
    key.0
        .iter()
        .zip(&origin.0)
        .zip(&MINUTE_WEIGHTS)
        .map(|((value, start), weight)| ((value - start) * weight) as i64)
        .sum()
}

// ── Reducers ──────────────────────────────────────────────────────────────────

/// One key per row: minutes elapsed since the first row. Readings unchanged.
fn minute_offsets(measurements: &Measurements) -> (Vec<f64>, Vec<ZoneReadings>) {
    let keys = match measurements.time_keys.first() {
        Some(origin) => measurements
            .time_keys
            .iter()
            .map(|key| minute_offset(origin, key) as f64)
            .collect(),
        None => Vec::new(),
    };
    (keys, measurements.readings.clone())
}

/// 24 buckets keyed 0..23 by the hour column, each the mean of its rows.
///
/// Hours without rows yield a zero vector.
fn hour_of_day_means(measurements: &Measurements, col: usize) -> (Vec<f64>, Vec<ZoneReadings>) {
    let mut sums = [[0.0; ZONE_COUNT]; HOURS_PER_DAY];
    let mut counts = [0usize; HOURS_PER_DAY];

    for (key, row) in rows_of(measurements) {
        let hour = key.field(col);
        if hour.fract() != 0.0 || !(0.0..HOURS_PER_DAY as f64).contains(&hour) {
            continue;
        }
        let bucket = hour as usize;
        counts[bucket] += 1;
        for (total, value) in sums[bucket].iter_mut().zip(row) {
            *total += value;
        }
    }

    let readings = sums
        .iter()
        .zip(&counts)
        .map(|(sum, &count)| match count {
            0 => [0.0; ZONE_COUNT],
            n => (*sum).map(|v| v / n as f64),
        })
        .collect();
    let keys = (0..HOURS_PER_DAY).map(|h| h as f64).collect();
    (keys, readings)
}

/// One bucket per distinct raw value of `col`, each the element-wise sum.
fn distinct_key_sums(measurements: &Measurements, col: usize) -> (Vec<f64>, Vec<ZoneReadings>) {
    let mut keys: Vec<f64> = measurements.time_keys.iter().map(|k| k.field(col)).collect();
    keys.sort_by(f64::total_cmp);
    keys.dedup();

    let readings = keys
        .iter()
        .map(|&bucket| {
            sum_rows(
                rows_of(measurements)
                    .filter(|(key, _)| key.field(col) == bucket)
                    .map(|(_, row)| row),
            )
        })
        .collect();
    (keys, readings)
}

fn rows_of(measurements: &Measurements) -> impl Iterator<Item = (&TimeKey, &ZoneReadings)> {
    measurements.time_keys.iter().zip(&measurements.readings)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
