//! Command payloads written to stdout.
//!
//! JSON reports carry a schema version, the run id and a generation
//! timestamp so pipeline output can be traced back to its log lines.

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use clap::ValueEnum;
use riser_math::{PdfTable, RangeSummary};
use serde::{Deserialize, Serialize};

use crate::analysis::{IntervalReport, PdfStats};
use crate::pdf_file::{write_pdf, PdfFileError};
use crate::resample::ResampleStats;

/// Version of the JSON report layout.
pub const REPORT_SCHEMA_VERSION: &str = "1.0.0";

/// Supported payload formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Structured JSON document.
    #[default]
    Json,
    /// Short human-readable text.
    Summary,
}

/// Result of a full `resample` run.
#[derive(Debug, Clone, Serialize)]
pub struct ResampleReport<'a> {
    pub schema_version: &'static str,
    pub run_id: &'a str,
    pub generated_at: DateTime<Utc>,
    pub markers: Vec<&'a str>,
    pub stats: &'a ResampleStats,
    pub acceptance_rate: f64,
    pub intervals: &'a [IntervalReport],
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub pdf_files: Vec<PathBuf>,
}

impl<'a> ResampleReport<'a> {
    pub fn new(
        run_id: &'a str,
        markers: Vec<&'a str>,
        stats: &'a ResampleStats,
        intervals: &'a [IntervalReport],
    ) -> Self {
        Self {
            schema_version: REPORT_SCHEMA_VERSION,
            run_id,
            generated_at: Utc::now(),
            markers,
            stats,
            acceptance_rate: stats.acceptance_rate(),
            intervals,
            pdf_files: Vec::new(),
        }
    }

    pub fn with_pdf_files(mut self, files: Vec<PathBuf>) -> Self {
        self.pdf_files = files;
        self
    }
}

/// Result of `analyze` on a single PDF file.
#[derive(Debug, Clone, Serialize)]
pub struct AnalyzeReport<'a> {
    pub schema_version: &'static str,
    pub run_id: &'a str,
    pub generated_at: DateTime<Utc>,
    pub source: &'a Path,
    pub stats: PdfStats,
    pub ranges: &'a [RangeSummary],
}

impl<'a> AnalyzeReport<'a> {
    pub fn new(run_id: &'a str, source: &'a Path, pdf: &PdfTable, ranges: &'a [RangeSummary]) -> Self {
        Self {
            schema_version: REPORT_SCHEMA_VERSION,
            run_id,
            generated_at: Utc::now(),
            source,
            stats: PdfStats::of(pdf),
            ranges,
        }
    }
}

fn format_range(out: &mut String, range: &RangeSummary) {
    match range {
        RangeSummary::Iqr(q) => {
            let _ = writeln!(
                out,
                "  IQR {:.0}%: {:.4} to {:.4}",
                q.mass * 100.0,
                q.low,
                q.high
            );
        }
        RangeSummary::Hpd(h) => {
            let _ = writeln!(
                out,
                "  HPD {:.0}% (encloses {:.2}%):",
                h.requested_mass * 100.0,
                h.mass * 100.0
            );
            for piece in &h.intervals {
                let _ = writeln!(
                    out,
                    "    {:.4} to {:.4} ({:.2}%)",
                    piece.low,
                    piece.high,
                    piece.mass * 100.0
                );
            }
        }
    }
}

fn format_stats(out: &mut String, stats: &PdfStats) {
    let _ = writeln!(
        out,
        "  mode {:.4}, median {:.4}, mean {:.4}",
        stats.mode, stats.median, stats.mean
    );
}

/// Human summary of a resample run.
pub fn render_resample_summary(report: &ResampleReport<'_>) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Accepted {} of {} draws ({:.2}%) across {} worker(s)",
        report.stats.accepted,
        report.stats.iterations,
        report.acceptance_rate * 100.0,
        report.stats.workers
    );
    for interval in report.intervals {
        let _ = writeln!(out, "Interval {}:", interval.label);
        format_stats(&mut out, &interval.stats);
        for range in &interval.ranges {
            format_range(&mut out, range);
        }
    }
    for file in &report.pdf_files {
        let _ = writeln!(out, "Wrote {}", file.display());
    }
    out
}

/// Human summary of a single-PDF analysis.
pub fn render_analyze_summary(report: &AnalyzeReport<'_>) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}:", report.source.display());
    format_stats(&mut out, &report.stats);
    for range in report.ranges {
        format_range(&mut out, range);
    }
    out
}

/// File name for an interval's output PDF.
pub fn interval_file_name(report: &IntervalReport) -> String {
    let label: String = report
        .label
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect();
    format!("rate_{:02}_{}.txt", report.index + 1, label)
}

/// Write one PDF file per interval into `dir`, creating it if needed.
pub fn write_interval_pdfs(
    dir: &Path,
    intervals: &[IntervalReport],
) -> Result<Vec<PathBuf>, PdfFileError> {
    std::fs::create_dir_all(dir).map_err(|source| PdfFileError::Io {
        path: dir.to_path_buf(),
        source,
    })?;
    intervals
        .iter()
        .map(|interval| {
            let path = dir.join(interval_file_name(interval));
            write_pdf(&path, &interval.pdf)?;
            Ok(path)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::SampleStats;
    use riser_math::{iqr, QuantileRange};
    use tempfile::TempDir;

    fn interval(label: &str) -> IntervalReport {
        let pdf = PdfTable::new(vec![0.0, 1.0, 2.0], vec![0.0, 1.0, 0.0]).unwrap();
        let range = iqr(&pdf, 0.5).unwrap();
        IntervalReport {
            index: 0,
            label: label.to_string(),
            samples: SampleStats::of(&[0.5, 1.0, 1.5]),
            stats: PdfStats::of(&pdf),
            ranges: vec![RangeSummary::Iqr(range)],
            pdf,
        }
    }

    #[test]
    fn resample_report_json_shape() {
        let stats = ResampleStats {
            iterations: 20,
            accepted: 10,
            workers: 1,
            ..ResampleStats::default()
        };
        let intervals = vec![interval("A-B")];
        let report = ResampleReport::new("run-abc", vec!["A", "B"], &stats, &intervals);
        let json = serde_json::to_value(&report).unwrap();

        assert_eq!(json["schema_version"], REPORT_SCHEMA_VERSION);
        assert_eq!(json["run_id"], "run-abc");
        assert_eq!(json["acceptance_rate"], 0.5);
        assert_eq!(json["intervals"][0]["label"], "A-B");
        assert_eq!(json["intervals"][0]["ranges"][0]["method"], "iqr");
        assert!(json["intervals"][0].get("pdf").is_none());
        assert!(json.get("pdf_files").is_none());
        assert!(json["generated_at"].as_str().is_some());
    }

    #[test]
    fn summary_lists_ranges() {
        let stats = ResampleStats {
            iterations: 4,
            accepted: 2,
            workers: 1,
            ..ResampleStats::default()
        };
        let intervals = vec![interval("A-B")];
        let report = ResampleReport::new("run-abc", vec!["A", "B"], &stats, &intervals);
        let text = render_resample_summary(&report);
        assert!(text.contains("Accepted 2 of 4 draws (50.00%)"));
        assert!(text.contains("Interval A-B:"));
        assert!(text.contains("IQR 50%"));
    }

    #[test]
    fn analyze_summary_shows_source() {
        let pdf = PdfTable::new(vec![0.0, 1.0], vec![1.0, 1.0]).unwrap();
        let ranges = vec![RangeSummary::Iqr(QuantileRange {
            mass: 0.5,
            low: 0.25,
            high: 0.75,
        })];
        let source = Path::new("rate.txt");
        let report = AnalyzeReport::new("run-1", source, &pdf, &ranges);
        let text = render_analyze_summary(&report);
        assert!(text.starts_with("rate.txt:"));
        assert!(text.contains("0.2500 to 0.7500"));
    }

    #[test]
    fn interval_files_are_sanitized_and_written() {
        let dir = TempDir::new().unwrap();
        let out = dir.path().join("pdfs");
        let files = write_interval_pdfs(&out, &[interval("T1 a-T2/b")]).unwrap();
        assert_eq!(files.len(), 1);
        assert_eq!(
            files[0].file_name().unwrap().to_str().unwrap(),
            "rate_01_T1_a-T2_b.txt"
        );
        assert!(files[0].exists());
    }
}
