//! Measurement file loading for the household energy tools.
//!
//! Reads comma-separated rows of ten numeric fields, marks cells holding the
//! `-1` sentinel as missing, and resolves them according to a [`FillMode`]
//! before splitting the table into time keys and zone readings.

use std::fmt;
use std::path::Path;

use energy_core::error::{EnergyError, Result};
use energy_core::formatting::format_fraction;
use energy_core::models::{FillMode, Measurements, ROW_FIELDS, SENTINEL};
use serde::Serialize;
use tracing::{debug, warn};

/// One parsed row; `None` marks a corrupted cell.
type RawRow = [Option<f64>; ROW_FIELDS];

// ── Public types ──────────────────────────────────────────────────────────────

/// Emitted when the requested fill mode had to fall back to dropping rows.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FillWarning {
    /// The fill mode that could not be applied.
    pub requested: FillMode,
    /// Share of input rows that were corrupted (and therefore removed).
    pub corrupted_fraction: f64,
}

impl fmt::Display for FillWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (name, edge) = match self.requested {
            FillMode::BackwardFill => ("Backward fill", "last"),
            _ => ("Forward fill", "first"),
        };
        write!(
            f,
            "{name} cannot be performed since the {edge} row is corrupted, \
             {} of the data was corrupted and has been removed instead.",
            format_fraction(self.corrupted_fraction)
        )
    }
}

/// What happened while loading one file.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LoadReport {
    /// Non-blank rows read from the input.
    pub total_rows: usize,
    /// Rows with at least one corrupted cell.
    pub corrupted_rows: usize,
    /// Rows in the returned table.
    pub retained_rows: usize,
    pub requested: FillMode,
    /// The mode actually applied; differs from `requested` after a fallback.
    pub applied: FillMode,
    pub warning: Option<FillWarning>,
}

impl LoadReport {
    /// `corrupted_rows / total_rows`, or `0.0` for an empty input.
    pub fn corrupted_fraction(&self) -> f64 {
        if self.total_rows == 0 {
            0.0
        } else {
            self.corrupted_rows as f64 / self.total_rows as f64
        }
    }
}

/// A repaired measurement table together with its [`LoadReport`].
#[derive(Debug, Clone)]
pub struct LoadedMeasurements {
    pub measurements: Measurements,
    pub report: LoadReport,
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Read and repair the measurement file at `path`.
///
/// The whole file is read at once. An empty result is returned as an empty
/// [`Measurements`]; see [`Measurements::or_zero_row`] for the legacy
/// single-zero-row fallback.
pub fn load_measurements(path: &Path, fill_mode: FillMode) -> Result<LoadedMeasurements> {
    let content = std::fs::read_to_string(path).map_err(|source| EnergyError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;

    let loaded = parse_measurements(&content, fill_mode)?;

    debug!(
        "File {}: {} rows read, {} corrupted, {} retained ({})",
        path.display(),
        loaded.report.total_rows,
        loaded.report.corrupted_rows,
        loaded.report.retained_rows,
        loaded.report.applied,
    );

    Ok(loaded)
}

/// Parse and repair measurement rows from in-memory text.
pub fn parse_measurements(content: &str, fill_mode: FillMode) -> Result<LoadedMeasurements> {
    let rows = content
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(idx, line)| parse_row(line, idx + 1))
        .collect::<Result<Vec<RawRow>>>()?;

    let total_rows = rows.len();
    let corrupted_rows = rows.iter().filter(|row| is_corrupted(row)).count();

    let applied = effective_mode(&rows, fill_mode);
    let warning = (applied != fill_mode).then(|| FillWarning {
        requested: fill_mode,
        // A fallback implies a corrupted edge row, so `total_rows > 0`.
        corrupted_fraction: corrupted_rows as f64 / total_rows as f64,
    });
    if let Some(w) = &warning {
        warn!("{}", w);
    }

    let repaired = match applied {
        FillMode::Drop => drop_corrupted(&rows),
        FillMode::ForwardFill => forward_fill(&rows),
        FillMode::BackwardFill => backward_fill(&rows),
    };
    let measurements = Measurements::from_rows(repaired);

    let report = LoadReport {
        total_rows,
        corrupted_rows,
        retained_rows: measurements.len(),
        requested: fill_mode,
        applied,
        warning,
    };

    Ok(LoadedMeasurements {
        measurements,
        report,
    })
}

// ── Internal helpers ──────────────────────────────────────────────────────────

/// Parse one comma-separated line into ten cells.
///
/// `line_no` is 1-based and only used for error messages.
fn parse_row(line: &str, line_no: usize) -> Result<RawRow> {
    let fields: Vec<&str> = line.split(',').map(str::trim).collect();
    if fields.len() != ROW_FIELDS {
        return Err(EnergyError::Parse {
            line: line_no,
            reason: format!("expected {} fields, found {}", ROW_FIELDS, fields.len()),
        });
    }

    let mut row: RawRow = [None; ROW_FIELDS];
    for (cell, field) in row.iter_mut().zip(&fields) {
        let value: f64 = field
            .parse()
            .ok()
            .filter(|v: &f64| v.is_finite())
            .ok_or_else(|| EnergyError::Parse {
                line: line_no,
                reason: format!("field {field:?} is not a number"),
            })?;
        *cell = (value != SENTINEL).then_some(value);
    }
    Ok(row)
}

fn is_corrupted(row: &RawRow) -> bool {
    row.iter().any(Option::is_none)
}

/// Resolve the fill mode that can actually be applied to `rows`.
///
/// Forward fill needs a clean first row and backward fill a clean last row;
/// otherwise both degrade to dropping.
fn effective_mode(rows: &[RawRow], requested: FillMode) -> FillMode {
    let edge = match requested {
        FillMode::Drop => return FillMode::Drop,
        FillMode::ForwardFill => rows.first(),
        FillMode::BackwardFill => rows.last(),
    };
    match edge {
        Some(row) if is_corrupted(row) => FillMode::Drop,
        _ => requested,
    }
}

fn complete(row: &RawRow) -> Option<[f64; ROW_FIELDS]> {
    let mut out = [0.0; ROW_FIELDS];
    for (dst, cell) in out.iter_mut().zip(row) {
        *dst = (*cell)?;
    }
    Some(out)
}

fn drop_corrupted(rows: &[RawRow]) -> Vec<[f64; ROW_FIELDS]> {
    rows.iter().filter_map(complete).collect()
}

/// Replace every missing cell by the last valid value above it.
///
/// The caller guarantees the first row is complete.
fn forward_fill(rows: &[RawRow]) -> Vec<[f64; ROW_FIELDS]> {
    fill_in_order(rows.iter())
}

/// Replace every missing cell by the next valid value below it.
///
/// The caller guarantees the last row is complete.
fn backward_fill(rows: &[RawRow]) -> Vec<[f64; ROW_FIELDS]> {
    let mut filled = fill_in_order(rows.iter().rev());
    filled.reverse();
    filled
}

/// Carry the most recent valid value of each column over missing cells.
fn fill_in_order<'a, I>(rows: I) -> Vec<[f64; ROW_FIELDS]>
where
    I: Iterator<Item = &'a RawRow>,
{
    let mut carried = [0.0; ROW_FIELDS];
    rows.map(|row| {
        for (slot, cell) in carried.iter_mut().zip(row) {
            if let Some(v) = cell {
                *slot = *v;
            }
        }
        carried
    })
    .collect()
}

// ── Tests ─────────────────────────────────────────────────────────────────────
