//! Text and JSON report generation.
//!
//! Renders the computed summaries as line-oriented text (the default)
//! or as pretty-printed JSON.

use crate::models::{Report, Summary};
use anyhow::Result;
use std::io::Write;
use std::path::Path;

/// Generate the complete line-oriented text report.
pub fn generate_text_report(report: &Report) -> String {
    let mut output = String::new();

    output.push_str(&generate_header(report));
    output.push_str(&generate_tally_section(
        "Incidents by shift",
        &report.summary.by_shift.sorted_by_count(),
    ));
    output.push_str(&generate_tally_section(
        "Incidents by report hour",
        &report.summary.by_hour.sorted_by_label(),
    ));
    output.push_str(&generate_tally_section(
        "Incidents by offense",
        &report.summary.by_offense.sorted_by_count(),
    ));
    output.push_str(&generate_duration_section(&report.summary));
    output.push_str(&generate_footer(report));

    output
}

fn generate_header(report: &Report) -> String {
    let mut section = String::new();

    section.push_str("Crime incident summary\n");
    section.push_str(&format!("Input: {}\n", report.metadata.input_path));
    section.push_str(&format!(
        "Generated: {}\n\n",
        report.metadata.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));

    section
}

/// Render one tally as a titled block of `label: count` lines.
fn generate_tally_section(title: &str, entries: &[(&str, u64)]) -> String {
    let mut section = String::new();

    section.push_str(&format!("{}:\n", title));
    if entries.is_empty() {
        section.push_str("  (no records)\n");
    }
    for (label, count) in entries {
        section.push_str(&format!("  {}: {}\n", label, count));
    }
    section.push('\n');

    section
}

fn generate_duration_section(summary: &Summary) -> String {
    let mut section = String::new();

    section.push_str("Average duration by offense:\n");
    for average in &summary.average_duration_minutes {
        section.push_str(&format!(
            "  {}: {:.1} minutes\n",
            average.offense, average.minutes
        ));
    }
    section.push('\n');

    section
}

fn generate_footer(report: &Report) -> String {
    let mut footer = String::new();

    footer.push_str(&format!(
        "{} records read in {:.2}s\n",
        report.summary.records_read, report.metadata.duration_seconds
    ));
    if report.summary.records_skipped > 0 {
        footer.push_str(&format!(
            "{} malformed records skipped\n",
            report.summary.records_skipped
        ));
    }

    footer
}

/// Generate a pretty-printed JSON report.
pub fn generate_json_report(report: &Report) -> Result<String> {
    serde_json::to_string_pretty(report).map_err(Into::into)
}

/// Write an already-rendered report to a file.
pub fn write_report(content: &str, path: &Path) -> Result<()> {
    let mut file = std::fs::File::create(path)?;
    file.write_all(content.as_bytes())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DurationAverage, Offense, ReportMetadata, Tally};
    use chrono::Utc;

    fn create_test_report() -> Report {
        let mut by_shift = Tally::new();
        by_shift.record("DAY");
        by_shift.record("DAY");
        by_shift.record("NIGHT");

        let mut by_hour = Tally::new();
        by_hour.record("14");
        by_hour.record("14");
        by_hour.record("23");

        let mut by_offense = Tally::new();
        by_offense.record("ROBBERY");
        by_offense.record("ROBBERY");
        by_offense.record("ARSON");

        let average_duration_minutes = Offense::ALL
            .iter()
            .map(|&offense| DurationAverage {
                offense,
                minutes: if offense == Offense::Robbery { 15.0 } else { 0.0 },
            })
            .collect();

        Report {
            metadata: ReportMetadata {
                input_path: "Crimes.csv".to_string(),
                generated_at: Utc::now(),
                records_loaded: 3,
                duration_seconds: 0.02,
            },
            summary: Summary {
                by_shift,
                by_hour,
                by_offense,
                average_duration_minutes,
                records_read: 3,
                records_skipped: 0,
            },
        }
    }

    #[test]
    fn test_text_report_contains_all_summaries() {
        let report = create_test_report();
        let text = generate_text_report(&report);

        assert!(text.contains("Incidents by shift"));
        assert!(text.contains("DAY: 2"));
        assert!(text.contains("NIGHT: 1"));
        assert!(text.contains("Incidents by report hour"));
        assert!(text.contains("14: 2"));
        assert!(text.contains("Incidents by offense"));
        assert!(text.contains("ROBBERY: 2"));
        assert!(text.contains("Average duration by offense"));
        assert!(text.contains("ROBBERY: 15.0 minutes"));
        assert!(text.contains("SA: 0.0 minutes"));
        assert!(text.contains("3 records read in"));
    }

    #[test]
    fn test_text_report_mentions_skipped_rows() {
        let mut report = create_test_report();
        assert!(!generate_text_report(&report).contains("skipped"));

        report.summary.records_skipped = 2;
        assert!(generate_text_report(&report).contains("2 malformed records skipped"));
    }

    #[test]
    fn test_json_report_structure() {
        let report = create_test_report();
        let json = generate_json_report(&report).unwrap();

        assert!(json.contains("\"by_shift\""));
        assert!(json.contains("\"by_hour\""));
        assert!(json.contains("\"by_offense\""));
        assert!(json.contains("\"average_duration_minutes\""));
        assert!(json.contains("\"THEFT F/AUTO\""));
        assert!(json.contains("\"records_read\": 3"));
    }

    #[test]
    fn test_write_report() {
        let report = create_test_report();
        let text = generate_text_report(&report);

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.txt");
        write_report(&text, &path).unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert_eq!(written, text);
    }
}
