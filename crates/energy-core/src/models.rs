use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::EnergyError;

/// Cell value marking a corrupted or missing measurement in the input files.
pub const SENTINEL: f64 = -1.0;

/// Number of time-key fields at the start of every row.
pub const TIME_FIELDS: usize = 6;

/// Number of measurement channels (zones) after the time key.
pub const ZONE_COUNT: usize = 4;

/// Total number of fields in one input row.
pub const ROW_FIELDS: usize = TIME_FIELDS + ZONE_COUNT;

/// Consumption of the four zones for one row or one bucket.
pub type ZoneReadings = [f64; ZONE_COUNT];

// ── FillMode ──────────────────────────────────────────────────────────────────

/// Policy for resolving corrupted cells while loading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FillMode {
    /// Remove every row that contains a corrupted cell.
    Drop,
    /// Copy the nearest earlier valid value in the same column.
    ForwardFill,
    /// Copy the nearest later valid value in the same column.
    BackwardFill,
}

impl FillMode {
    /// Canonical command-line spelling.
    pub fn as_str(&self) -> &'static str {
        match self {
            FillMode::Drop => "drop",
            FillMode::ForwardFill => "forward-fill",
            FillMode::BackwardFill => "backward-fill",
        }
    }
}

impl fmt::Display for FillMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FillMode {
    type Err = EnergyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "drop" => Ok(FillMode::Drop),
            "forward-fill" | "forward fill" | "ffill" => Ok(FillMode::ForwardFill),
            "backward-fill" | "backward fill" | "bfill" => Ok(FillMode::BackwardFill),
            _ => Err(EnergyError::InvalidFillMode(s.to_string())),
        }
    }
}

// ── Period ────────────────────────────────────────────────────────────────────

/// How the rows of a bucket are reduced to one row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Reducer {
    Sum,
    Mean,
}

/// Aggregation bucket granularity.
///
/// `Hour`, `Day` and `Month` key on the raw calendar field without the
/// year, so the same month of two different years lands in one bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Period {
    /// No bucketing; rows are keyed by their minute offset from the first row.
    Minute,
    Hour,
    Day,
    Month,
    /// 24 fixed buckets by hour column, averaged.
    HourOfTheDay,
}

impl Period {
    /// All periods in menu order.
    pub const ALL: [Period; 5] = [
        Period::Minute,
        Period::Hour,
        Period::Day,
        Period::Month,
        Period::HourOfTheDay,
    ];

    /// Canonical command-line spelling.
    pub fn as_str(&self) -> &'static str {
        match self {
            Period::Minute => "minute",
            Period::Hour => "hour",
            Period::Day => "day",
            Period::Month => "month",
            Period::HourOfTheDay => "hour-of-the-day",
        }
    }

    /// Time-key column the period buckets on, `None` for `Minute`.
    pub fn time_column(&self) -> Option<usize> {
        match self {
            Period::Minute => None,
            Period::Hour | Period::HourOfTheDay => Some(3),
            Period::Day => Some(2),
            Period::Month => Some(1),
        }
    }

    pub fn reducer(&self) -> Reducer {
        match self {
            Period::HourOfTheDay => Reducer::Mean,
            _ => Reducer::Sum,
        }
    }

    /// Unit used in table headings, e.g. `"Consumption per day"`.
    pub fn label(&self) -> &'static str {
        match self {
            Period::Minute => "minute",
            Period::Hour => "hour",
            Period::Day => "day",
            Period::Month => "month",
            Period::HourOfTheDay => "hour of the day",
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Period {
    type Err = EnergyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "minute" => Ok(Period::Minute),
            "hour" => Ok(Period::Hour),
            "day" => Ok(Period::Day),
            "month" => Ok(Period::Month),
            "hour-of-the-day" | "hour of the day" | "hotd" => Ok(Period::HourOfTheDay),
            _ => Err(EnergyError::InvalidPeriod(s.to_string())),
        }
    }
}

// ── TimeKey ───────────────────────────────────────────────────────────────────

/// The six leading fields of a row: year, month, day, hour, minute and an
/// unused sixth field.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct TimeKey(pub [f64; TIME_FIELDS]);

impl TimeKey {
    pub fn year(&self) -> f64 {
        self.0[0]
    }

    pub fn month(&self) -> f64 {
        self.0[1]
    }

    pub fn day(&self) -> f64 {
        self.0[2]
    }

    pub fn hour(&self) -> f64 {
        self.0[3]
    }

    pub fn minute(&self) -> f64 {
        self.0[4]
    }

    /// Raw value of time-key column `index` (0..6).
    pub fn field(&self, index: usize) -> f64 {
        self.0[index]
    }

    /// Interpret the key as a calendar timestamp, ignoring the sixth field.
    ///
    /// Returns `None` when any field is fractional or outside the calendar.
    pub fn to_datetime(&self) -> Option<NaiveDateTime> {
        let whole = |v: f64| (v.fract() == 0.0 && v >= 0.0).then_some(v as u32);
        let year = self.year();
        if year.fract() != 0.0 {
            return None;
        }
        NaiveDate::from_ymd_opt(year as i32, whole(self.month())?, whole(self.day())?)?
            .and_hms_opt(whole(self.hour())?, whole(self.minute())?, 0)
    }
}

// ── Measurements ──────────────────────────────────────────────────────────────

/// A loaded, repaired measurement table split into time keys and readings.
///
/// `time_keys` and `readings` always have the same length.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Measurements {
    pub time_keys: Vec<TimeKey>,
    pub readings: Vec<ZoneReadings>,
}

impl Measurements {
    /// Split complete 10-field rows into time keys and readings.
    pub fn from_rows<I>(rows: I) -> Self
    where
        I: IntoIterator<Item = [f64; ROW_FIELDS]>,
    {
        let mut table = Self::default();
        for row in rows {
            let mut key = [0.0; TIME_FIELDS];
            let mut zones = [0.0; ZONE_COUNT];
            key.copy_from_slice(&row[..TIME_FIELDS]);
            zones.copy_from_slice(&row[TIME_FIELDS..]);
            table.push(TimeKey(key), zones);
        }
        table
    }

    pub fn push(&mut self, key: TimeKey, readings: ZoneReadings) {
        self.time_keys.push(key);
        self.readings.push(readings);
    }

    pub fn len(&self) -> usize {
        self.readings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.readings.is_empty()
    }

    /// Element-wise sum of all rows.
    pub fn grand_total(&self) -> ZoneReadings {
        sum_rows(self.readings.iter())
    }

    /// Substitute a single all-zero row when the table is empty.
    ///
    /// Reproduces the legacy fallback for consumers that cannot handle an
    /// empty table. Non-empty tables are returned unchanged.
    pub fn or_zero_row(mut self) -> Self {
        if self.is_empty() {
            self.push(TimeKey::default(), [0.0; ZONE_COUNT]);
        }
        self
    }
}

// ── Aggregated ────────────────────────────────────────────────────────────────

/// Output of one aggregation: one reading row per bucket key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Aggregated {
    pub period: Period,
    /// Ascending bucket keys (minute offsets for `Period::Minute`).
    pub bucket_keys: Vec<f64>,
    pub readings: Vec<ZoneReadings>,
}

impl Aggregated {
    pub fn len(&self) -> usize {
        self.bucket_keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bucket_keys.is_empty()
    }

    /// Element-wise sum over all buckets.
    pub fn totals(&self) -> ZoneReadings {
        sum_rows(self.readings.iter())
    }
}

/// Element-wise sum of a sequence of zone rows.
pub fn sum_rows<'a, I>(rows: I) -> ZoneReadings
where
    I: IntoIterator<Item = &'a ZoneReadings>,
{
    rows.into_iter().fold([0.0; ZONE_COUNT], |mut acc, row| {
        for (total, value) in acc.iter_mut().zip(row) {
            *total += value;
        }
        acc
    })
}

// ── Tests ─────────────────────────────────────────────────────────────────────
