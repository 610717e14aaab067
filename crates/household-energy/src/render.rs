//! Plain-text rendering of an [`AnalysisResult`].

use energy_core::formatting::{format_energy, format_fraction, format_number};
use energy_core::models::{Period, Reducer, ZoneReadings};
use energy_core::statistics::{StatisticsReport, Summary};
use energy_data::analysis::AnalysisResult;

const RULE_WIDTH: usize = 78;

/// Render the load summary, the bucket table and (optionally) statistics.
pub fn render_report(result: &AnalysisResult, with_stats: bool) -> String {
    let mut out = String::new();
    let load = &result.load;

    out.push_str(&format!("Source: {}\n", result.metadata.source.display()));
    if let (Some(first), Some(last)) = (
        result.metadata.first_timestamp,
        result.metadata.last_timestamp,
    ) {
        out.push_str(&format!("Span:   {first} .. {last}\n"));
    }
    out.push_str(&format!(
        "Rows:   {} read, {} kept, {} corrupted ({}), fill mode {}\n",
        load.total_rows,
        load.retained_rows,
        load.corrupted_rows,
        format_fraction(load.corrupted_fraction()),
        load.applied,
    ));
    if let Some(warning) = &load.warning {
        out.push_str(&format!("Warning: {warning}\n"));
    }
    out.push('\n');

    if result.has_no_data() {
        out.push_str("No valid data remains after loading.\n");
        return out;
    }

    out.push_str(&render_buckets(result));

    if with_stats {
        if let Some(stats) = &result.statistics {
            out.push('\n');
            out.push_str(&render_statistics(stats));
        }
    }
    out
}

fn heading(period: Period) -> String {
    match period.reducer() {
        Reducer::Mean => format!("Average consumption per {}", period.label()),
        Reducer::Sum => format!("Consumption per {}", period.label()),
    }
}

fn zone_cells(row: &ZoneReadings) -> String {
    row.iter().map(|v| format!("{:>15}", format_energy(*v))).collect()
}

fn render_buckets(result: &AnalysisResult) -> String {
    let agg = &result.aggregated;
    let rule = "-".repeat(RULE_WIDTH);
    let mut out = format!("{}\n", heading(agg.period));

    out.push_str(&format!(
        "{:>12}{:>15}{:>15}{:>15}{:>15}\n",
        agg.period.label(),
        "Zone 1",
        "Zone 2",
        "Zone 3",
        "Zone 4"
    ));
    out.push_str(&rule);
    out.push('\n');
    for (key, row) in agg.bucket_keys.iter().zip(&agg.readings) {
        out.push_str(&format!("{:>12}{}\n", format_number(*key, 0), zone_cells(row)));
    }

    if agg.period.reducer() == Reducer::Sum {
        out.push_str(&rule);
        out.push_str(&format!("\n{:>12}{}\n", "Total", zone_cells(&agg.totals())));
    }
    out
}

fn summary_row(label: &str, s: &Summary) -> String {
    let cells: String = [s.min, s.first_quartile, s.median, s.third_quartile, s.max]
        .iter()
        .map(|v| format!("{:>12}", format_number(*v, 1)))
        .collect();
    format!("{label:<8}{cells}\n")
}

/// Render the min / quartile / max table, one line per zone plus "All".
pub fn render_statistics(stats: &StatisticsReport) -> String {
    let mut out = format!(
        "{:<8}{:>12}{:>12}{:>12}{:>12}{:>12}\n",
        "Zone", "Minimum", "1. quart", "2. quart", "3. quart", "Maximum"
    );
    out.push_str(&"-".repeat(68));
    out.push('\n');
    for (i, zone) in stats.zones.iter().enumerate() {
        out.push_str(&summary_row(&(i + 1).to_string(), zone));
    }
    out.push_str(&summary_row("All", &stats.all));
    out
}

// ── Tests ──────────────────────────────────────────────────────────────────────
