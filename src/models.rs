//! Data models for the incident summarizer.
//!
//! This module contains the core data structures used throughout
//! the application for representing incidents, tallies, and reports.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize, Serializer};
use std::collections::HashMap;
use std::fmt;

/// Known offense categories in the source data.
///
/// The input file carries offenses as free-form strings; the duration
/// summary buckets them into this closed set. Anything that does not
/// match a known label lands in [`Offense::Other`], which displays as
/// `SA` to match the reference dataset's catch-all bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Offense {
    TheftFromAuto,
    TheftOther,
    Homicide,
    MotorVehicleTheft,
    Robbery,
    AssaultWithWeapon,
    Arson,
    Burglary,
    /// All other offenses.
    Other,
}

impl Offense {
    /// Every category, in report display order.
    pub const ALL: [Offense; 9] = [
        Offense::TheftFromAuto,
        Offense::TheftOther,
        Offense::Homicide,
        Offense::MotorVehicleTheft,
        Offense::Robbery,
        Offense::AssaultWithWeapon,
        Offense::Arson,
        Offense::Burglary,
        Offense::Other,
    ];

    /// Classify a raw offense string from the input file.
    pub fn classify(raw: &str) -> Self {
        match raw {
            "THEFT F/AUTO" => Offense::TheftFromAuto,
            "THEFT/OTHER" => Offense::TheftOther,
            "HOMICIDE" => Offense::Homicide,
            "MOTOR VEHICLE THEFT" => Offense::MotorVehicleTheft,
            "ROBBERY" => Offense::Robbery,
            "ASSAULT W/DANGEROUS WEAPON" => Offense::AssaultWithWeapon,
            "ARSON" => Offense::Arson,
            "BURGLARY" => Offense::Burglary,
            _ => Offense::Other,
        }
    }

    /// The label used in the source data and in reports.
    pub fn label(&self) -> &'static str {
        match self {
            Offense::TheftFromAuto => "THEFT F/AUTO",
            Offense::TheftOther => "THEFT/OTHER",
            Offense::Homicide => "HOMICIDE",
            Offense::MotorVehicleTheft => "MOTOR VEHICLE THEFT",
            Offense::Robbery => "ROBBERY",
            Offense::AssaultWithWeapon => "ASSAULT W/DANGEROUS WEAPON",
            Offense::Arson => "ARSON",
            Offense::Burglary => "BURGLARY",
            Offense::Other => "SA",
        }
    }
}

impl fmt::Display for Offense {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl Serialize for Offense {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

/// A single incident row from the input file.
///
/// Field values are kept verbatim as strings; columns absent from the
/// file are `None`. What each field is called in the file is decided by
/// the loader's field mapping, not hardcoded here.
#[derive(Debug, Clone, Default)]
pub struct Incident {
    /// Patrol shift label (e.g. `DAY`, `EVENING`, `MIDNIGHT`).
    pub shift: Option<String>,
    /// Raw offense label.
    pub offense: Option<String>,
    /// Timestamp the incident was reported, fixed positional format.
    pub reported_at: Option<String>,
    /// Timestamp the incident started.
    pub started_at: Option<String>,
    /// Timestamp the incident ended. Often empty in the source data.
    pub ended_at: Option<String>,
}

/// Occurrence counts keyed by category label.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Tally {
    counts: HashMap<String, u64>,
}

impl Tally {
    /// Creates an empty tally.
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one occurrence of `key`, initializing to 1 on first sight.
    pub fn record(&mut self, key: impl Into<String>) {
        *self.counts.entry(key.into()).or_insert(0) += 1;
    }

    /// The count for a single category (0 if never seen).
    #[allow(dead_code)] // Lookup utility, exercised in tests
    pub fn count(&self, key: &str) -> u64 {
        self.counts.get(key).copied().unwrap_or(0)
    }

    /// Sum of all counts. Equals the number of records tallied.
    #[allow(dead_code)] // Invariant check, exercised in tests
    pub fn total(&self) -> u64 {
        self.counts.values().sum()
    }

    /// Number of distinct categories observed.
    #[allow(dead_code)] // Utility accessor
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    #[allow(dead_code)] // Paired with len
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Iterate over (label, count) pairs in unspecified order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.counts.iter().map(|(k, v)| (k.as_str(), *v))
    }

    /// Entries sorted by descending count, ties broken by label.
    pub fn sorted_by_count(&self) -> Vec<(&str, u64)> {
        let mut entries: Vec<_> = self.iter().collect();
        entries.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        entries
    }

    /// Entries sorted by label.
    pub fn sorted_by_label(&self) -> Vec<(&str, u64)> {
        let mut entries: Vec<_> = self.iter().collect();
        entries.sort_by(|a, b| a.0.cmp(b.0));
        entries
    }
}

/// Average incident duration for one offense category.
#[derive(Debug, Clone, Serialize)]
pub struct DurationAverage {
    /// The offense category.
    pub offense: Offense,
    /// Arithmetic mean duration in minutes; 0.0 when the category
    /// collected no valid durations.
    pub minutes: f64,
}

/// The four summaries derived from one pass over the records.
#[derive(Debug, Clone, Serialize)]
pub struct Summary {
    /// Counts by patrol shift.
    pub by_shift: Tally,
    /// Counts by hour-of-day of the report timestamp.
    pub by_hour: Tally,
    /// Counts by raw offense label.
    pub by_offense: Tally,
    /// Average duration per offense category, one entry per
    /// [`Offense::ALL`] in display order.
    pub average_duration_minutes: Vec<DurationAverage>,
    /// Records counted into the summaries.
    pub records_read: usize,
    /// Malformed records skipped (only with skip-malformed enabled).
    pub records_skipped: usize,
}

/// Metadata about a report run.
#[derive(Debug, Clone, Serialize)]
pub struct ReportMetadata {
    /// Path of the input file.
    pub input_path: String,
    /// When the report was generated.
    pub generated_at: DateTime<Utc>,
    /// Total data rows loaded from the file.
    pub records_loaded: usize,
    /// Wall-clock duration of the run in seconds.
    pub duration_seconds: f64,
}

/// The complete incident report.
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    /// Metadata about the run.
    pub metadata: ReportMetadata,
    /// The computed summaries.
    pub summary: Summary,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offense_classify_known_labels() {
        assert_eq!(Offense::classify("THEFT F/AUTO"), Offense::TheftFromAuto);
        assert_eq!(Offense::classify("HOMICIDE"), Offense::Homicide);
        assert_eq!(Offense::classify("BURGLARY"), Offense::Burglary);
        assert_eq!(
            Offense::classify("ASSAULT W/DANGEROUS WEAPON"),
            Offense::AssaultWithWeapon
        );
    }

    #[test]
    fn test_offense_classify_catch_all() {
        assert_eq!(Offense::classify("SEX ABUSE"), Offense::Other);
        assert_eq!(Offense::classify(""), Offense::Other);
        // Classification is exact, not case-insensitive.
        assert_eq!(Offense::classify("homicide"), Offense::Other);
    }

    #[test]
    fn test_offense_label_round_trip() {
        for offense in Offense::ALL {
            if offense == Offense::Other {
                assert_eq!(offense.label(), "SA");
            } else {
                assert_eq!(Offense::classify(offense.label()), offense);
            }
        }
    }

    #[test]
    fn test_tally_record_and_count() {
        let mut tally = Tally::new();
        tally.record("DAY");
        tally.record("DAY");
        tally.record("NIGHT");

        assert_eq!(tally.count("DAY"), 2);
        assert_eq!(tally.count("NIGHT"), 1);
        assert_eq!(tally.count("EVENING"), 0);
        assert_eq!(tally.total(), 3);
        assert_eq!(tally.len(), 2);
    }

    #[test]
    fn test_tally_sorted_by_count() {
        let mut tally = Tally::new();
        tally.record("B");
        tally.record("A");
        tally.record("A");
        tally.record("C");

        let sorted = tally.sorted_by_count();
        assert_eq!(sorted[0], ("A", 2));
        // Ties fall back to label order.
        assert_eq!(sorted[1], ("B", 1));
        assert_eq!(sorted[2], ("C", 1));
    }

    #[test]
    fn test_offense_serializes_as_label() {
        let json = serde_json::to_string(&Offense::Other).unwrap();
        assert_eq!(json, "\"SA\"");

        let json = serde_json::to_string(&Offense::TheftFromAuto).unwrap();
        assert_eq!(json, "\"THEFT F/AUTO\"");
    }
}
