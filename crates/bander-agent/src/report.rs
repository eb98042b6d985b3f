//! Report rendering: text tables for a terminal, or JSON for tooling.

use std::fmt::Write as _;

use bander_core::channel::Band;
use bander_core::{BandRecommendations, Region, ScanReport};
use chrono::{DateTime, Local, Utc};
use serde::Serialize;

use crate::config::OutputFormat;

/// Render a cycle's report in the configured format.
pub fn render(
    report: &ScanReport,
    format: OutputFormat,
    region: Region,
    at: DateTime<Local>,
) -> Result<String, serde_json::Error> {
    match format {
        OutputFormat::Text => Ok(render_text(report, at)),
        OutputFormat::Json => render_json(report, region, at.with_timezone(&Utc)),
    }
}

#[derive(Serialize)]
struct JsonReport<'a> {
    timestamp: DateTime<Utc>,
    region: Region,
    #[serde(flatten)]
    report: &'a ScanReport,
}

pub fn render_json(
    report: &ScanReport,
    region: Region,
    timestamp: DateTime<Utc>,
) -> Result<String, serde_json::Error> {
    serde_json::to_string(&JsonReport {
        timestamp,
        region,
        report,
    })
}

// ── Text ────────────────────────────────────────────────────────────

/// Left-aligned, space-padded columns.
struct Table {
    rows: Vec<Vec<String>>,
}

impl Table {
    fn new<const N: usize>(header: [&str; N]) -> Self {
        let underline = header.iter().map(|h| "-".repeat(h.chars().count())).collect();
        Table {
            rows: vec![header.iter().map(|h| h.to_string()).collect(), underline],
        }
    }

    fn row(&mut self, cells: Vec<String>) {
        self.rows.push(cells);
    }

    fn render(&self, out: &mut String, indent: &str) {
        let columns = self.rows.iter().map(Vec::len).max().unwrap_or(0);
        let widths: Vec<usize> = (0..columns)
            .map(|c| {
                self.rows
                    .iter()
                    .filter_map(|r| r.get(c))
                    .map(|cell| cell.chars().count())
                    .max()
                    .unwrap_or(0)
            })
            .collect();

        for row in &self.rows {
            let mut line = String::from(indent);
            for (cell, width) in row.iter().zip(&widths) {
                let pad = width - cell.chars().count();
                line.push_str(cell);
                line.extend(std::iter::repeat_n(' ', pad + 2));
            }
            out.push_str(line.trim_end());
            out.push('\n');
        }
    }
}

/// Shorten to at most `max` characters, marking the cut with `...`.
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    if max <= 3 {
        return s.chars().take(max).collect();
    }
    let mut cut: String = s.chars().take(max - 3).collect();
    cut.push_str("...");
    cut
}

fn or_unknown(value: Option<&str>) -> &str {
    value.filter(|v| !v.is_empty()).unwrap_or("Unknown")
}

fn band_advice(band: Band) -> &'static str {
    match band {
        Band::Ghz24 => {
            "Prefer channels 1, 6 or 11 (non-overlapping). Avoid channels with strong nearby signals."
        }
        Band::Ghz5 => {
            "More spectrum available. DFS channels may require radar detection but are often less congested."
        }
    }
}

pub fn render_text(report: &ScanReport, at: DateTime<Local>) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "\n=== WiFi Network Analysis - {} ===", at.format("%H:%M:%S"));

    if report.networks.is_empty() {
        out.push_str("No networks detected.\n");
    } else {
        let mut table = Table::new([
            "SSID", "Band", "Ch", "Signal", "Quality", "Security", "PHY Mode", "Width", "Vendor",
            "Congestion", "Freq",
        ]);
        for net in &report.networks {
            let obs = &net.observation;
            let ssid = if obs.ssid.is_empty() {
                "<hidden>"
            } else {
                obs.ssid.as_str()
            };
            table.row(vec![
                truncate(ssid, 16),
                obs.band.to_string(),
                obs.channel.to_string(),
                format!("{} dBm", obs.signal_dbm),
                format!("{}%", obs.quality_percent()),
                truncate(or_unknown(obs.security.as_deref()), 18),
                truncate(or_unknown(obs.phy_mode.as_deref()), 15),
                obs.effective_width().to_string(),
                truncate(or_unknown(obs.vendor.as_deref()), 8),
                net.congestion_level.to_string(),
                obs.frequency_mhz().to_string(),
            ]);
        }
        table.render(&mut out, "");
        let _ = writeln!(out, "\nTotal networks detected: {}", report.networks.len());
    }

    out.push_str("\n=== Channel Recommendations ===\n");
    for recs in &report.recommendations {
        render_band_recommendations(&mut out, recs);
    }

    render_usage(&mut out, report);
    out
}

fn render_band_recommendations(out: &mut String, recs: &BandRecommendations) {
    let _ = writeln!(out, "\n{} band:", recs.band);
    if recs.recommendations.is_empty() {
        let _ = writeln!(out, "  No recommendations available for {}", recs.band);
        return;
    }

    let mut table = Table::new(["Rank", "Channel", "Freq(MHz)", "Interference", "Gap(MHz)", "Reasoning"]);
    for (i, rec) in recs.recommendations.iter().enumerate() {
        table.row(vec![
            format!("#{}", i + 1),
            rec.channel.to_string(),
            rec.frequency_mhz.to_string(),
            rec.interference_level.to_string(),
            rec.frequency_gap_mhz
                .map_or_else(|| "N/A".to_string(), |gap| gap.to_string()),
            rec.reasoning.clone(),
        ]);
    }
    table.render(out, "  ");

    if !recs.separations.is_empty() {
        out.push_str("\n  Frequency separation:\n");
        for sep in &recs.separations {
            let _ = writeln!(
                out,
                "    Channel {} <-> Channel {}: {} MHz",
                sep.from_channel, sep.to_channel, sep.separation_mhz
            );
        }
    }
    let _ = writeln!(out, "\n  Advice: {}", band_advice(recs.band));
}

fn render_usage(out: &mut String, report: &ScanReport) {
    out.push_str("\n=== Channel Usage ===\n");
    for usage in &report.usage {
        if usage.detected.is_empty() && usage.band == Band::Ghz5 {
            let _ = writeln!(out, "\n{}: no networks detected", usage.band);
            continue;
        }
        let _ = writeln!(out, "\n{}:", usage.band);
        let mut channels = vec!["Channel".to_string()];
        let mut counts = vec!["Networks".to_string()];
        for (ch, count) in &usage.counts {
            channels.push(ch.to_string());
            counts.push(count.to_string());
        }
        let mut table = Table { rows: vec![channels] };
        table.row(counts);
        table.render(out, "  ");
    }
}
