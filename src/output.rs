//! Presentation of dashboard views.
//!
//! Supports a terminal rendering, JSON serialization, and CSV export of the
//! derived tables.

use anyhow::{Context, Result};
use csv::WriterBuilder;
use serde::Serialize;
use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::analyzers::types::DashboardView;

const CHART_WIDTH: usize = 40;
const HOURLY_FILE: &str = "hourly_usage.csv";
const WEATHER_FILE: &str = "weather_effect.csv";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Renders a view in the requested format.
pub fn render(view: &DashboardView, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Text => Ok(render_text(view)),
        OutputFormat::Json => to_json(view),
    }
}

/// Logs a view using Rust's debug pretty-print format.
pub fn print_pretty(view: &DashboardView) {
    debug!("{:#?}", view);
}

/// Serializes a view as pretty-printed JSON.
pub fn to_json(view: &DashboardView) -> Result<String> {
    Ok(serde_json::to_string_pretty(view)?)
}

fn scaled(value: f64, max: f64) -> usize {
    if max <= 0.0 || value <= 0.0 {
        return 0;
    }
    ((value / max) * CHART_WIDTH as f64).round() as usize
}

/// Renders the metrics and both charts as plain text.
///
/// The hourly chart plots one point per hour; the weather chart draws the
/// maximum-average bar solid and the others shaded, each annotated with its
/// value.
pub fn render_text(view: &DashboardView) -> String {
    let mut out = String::new();
    let summary = &view.summary;

    // Writing into a String cannot fail.
    let _ = writeln!(
        out,
        "Bike rentals {} .. {} ({} days)",
        view.range.start(),
        view.range.end(),
        view.range.days()
    );
    let _ = writeln!(out);
    let _ = writeln!(out, "  Total usage              {}", summary.total_usage);
    let _ = writeln!(out, "  Average usage per hour   {:.2}", summary.average_hourly_usage);
    if let Some(peak) = summary.peak_hour {
        let _ = writeln!(out, "  Busiest hour             {:02}:00", peak);
    }
    let _ = writeln!(out);

    if view.hourly.is_empty() {
        let _ = writeln!(out, "No rentals in the selected range.");
        return out;
    }

    let _ = writeln!(out, "Usage by hour");
    let max_total = view
        .hourly
        .iter()
        .map(|h| h.total_usage)
        .max()
        .unwrap_or_default() as f64;
    for row in &view.hourly {
        let pos = scaled(row.total_usage as f64, max_total);
        let _ = writeln!(
            out,
            "  {:02} │{}●{} {}",
            row.hour,
            "·".repeat(pos),
            " ".repeat(CHART_WIDTH - pos),
            row.total_usage
        );
    }
    let _ = writeln!(out);

    let _ = writeln!(out, "Weather effect on rentals (average per record)");
    let label_width = view
        .weather
        .iter()
        .map(|bar| bar.label.chars().count())
        .max()
        .unwrap_or_default();
    let max_avg = view
        .weather
        .iter()
        .map(|bar| bar.average_usage)
        .fold(0.0, f64::max);
    for bar in &view.weather {
        let fill = if bar.highlighted { "█" } else { "░" };
        let len = scaled(bar.average_usage, max_avg);
        let _ = writeln!(
            out,
            "  {:<width$} │{}{} {:.1}{}",
            bar.label,
            fill.repeat(len),
            " ".repeat(CHART_WIDTH - len),
            bar.average_usage,
            if bar.highlighted { "  ◀ max" } else { "" },
            width = label_width
        );
    }

    out
}

/// Writes rows to a CSV file with a header, replacing any existing file.
pub fn write_csv<T: Serialize>(path: &Path, rows: &[T]) -> Result<()> {
    debug!(path = %path.display(), rows = rows.len(), "Writing CSV");

    let mut writer = WriterBuilder::new()
        .has_headers(true)
        .from_path(path)
        .with_context(|| format!("failed to create {}", path.display()))?;

    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;

    Ok(())
}

/// Writes `hourly_usage.csv` and `weather_effect.csv` into `dir`.
pub fn export_tables(dir: &Path, view: &DashboardView) -> Result<(PathBuf, PathBuf)> {
    fs::create_dir_all(dir).with_context(|| format!("failed to create {}", dir.display()))?;

    let hourly_path = dir.join(HOURLY_FILE);
    let weather_path = dir.join(WEATHER_FILE);
    write_csv(&hourly_path, &view.hourly)?;
    write_csv(&weather_path, &view.weather)?;

    info!(
        dir = %dir.display(),
        hourly_rows = view.hourly.len(),
        weather_rows = view.weather.len(),
        "Exported derived tables"
    );
    Ok((hourly_path, weather_path))
}
