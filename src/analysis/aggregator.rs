//! Record aggregation.
//!
//! One linear pass over the loaded incidents builds all four summaries:
//! counts by shift, by report hour, by offense, and average duration per
//! offense category.

use crate::analysis::duration::{
    duration_minutes, parse_clock_time, DurationAccumulator, DurationPolicy,
};
use crate::models::{Incident, Offense, Summary, Tally};
use anyhow::{bail, Result};
use tracing::{debug, warn};

/// Options controlling the aggregation pass.
#[derive(Debug, Clone, Copy, Default)]
pub struct AggregateOptions {
    /// Skip and count records missing a required field instead of
    /// failing the run.
    pub skip_malformed: bool,
    /// Duration arithmetic to apply.
    pub policy: DurationPolicy,
}

/// Extract the hour-of-day bucket from a positional report timestamp.
///
/// Cuts the `HH:MM` portion at byte offset 11 and keeps everything up
/// to the colon, so `"2023-01-05 14:32:00"` buckets under `"14"`.
pub fn hour_bucket(timestamp: &str) -> Option<&str> {
    let time = timestamp.get(11..16)?;
    let hour = time.split(':').next()?;
    if hour.is_empty() {
        return None;
    }
    Some(hour)
}

/// Summarize incidents in a single pass.
///
/// Every record lands in exactly one bucket per dimension. A record
/// missing its shift, offense, or report timestamp is malformed: the
/// run fails naming the row, unless `skip_malformed` is set, in which
/// case the record is counted in `records_skipped` and contributes to
/// no summary. Records without a parseable start or end clock time
/// still count in the offense tally but are excluded from that
/// category's duration average.
pub fn summarize(records: &[Incident], options: &AggregateOptions) -> Result<Summary> {
    let mut by_shift = Tally::new();
    let mut by_hour = Tally::new();
    let mut by_offense = Tally::new();
    let mut durations = DurationAccumulator::new();
    let mut skipped = 0usize;

    for (index, record) in records.iter().enumerate() {
        // Data rows are 1-based in diagnostics, matching what a user
        // sees in a spreadsheet below the header.
        let row = index + 1;

        let (shift, offense, reported_at) = match required_fields(record, row, options) {
            Ok(Some(fields)) => fields,
            Ok(None) => {
                skipped += 1;
                continue;
            }
            Err(e) => return Err(e),
        };

        let hour = match hour_bucket(reported_at) {
            Some(hour) => hour,
            None if options.skip_malformed => {
                warn!("row {}: report timestamp too short, skipping", row);
                skipped += 1;
                continue;
            }
            None => bail!(
                "row {}: report timestamp {:?} has no HH:MM at offset 11",
                row,
                reported_at
            ),
        };

        by_shift.record(shift);
        by_hour.record(hour);
        by_offense.record(offense);

        let category = Offense::classify(offense);
        if let Some(minutes) = record_duration(record, options.policy) {
            durations.observe(category, minutes);
        } else {
            debug!("row {}: no usable start/end time, excluded from average", row);
        }
    }

    Ok(Summary {
        by_shift,
        by_hour,
        by_offense,
        average_duration_minutes: durations.finalize(),
        records_read: records.len() - skipped,
        records_skipped: skipped,
    })
}

/// Resolve the three required fields of a record.
///
/// `Ok(None)` means the record should be skipped (skip-malformed mode).
fn required_fields<'a>(
    record: &'a Incident,
    row: usize,
    options: &AggregateOptions,
) -> Result<Option<(&'a str, &'a str, &'a str)>> {
    let missing = if record.shift.is_none() {
        Some("shift")
    } else if record.offense.is_none() {
        Some("offense")
    } else if record.reported_at.is_none() {
        Some("report timestamp")
    } else {
        None
    };

    if let Some(field) = missing {
        if options.skip_malformed {
            warn!("row {}: missing {} field, skipping", row, field);
            return Ok(None);
        }
        bail!("row {}: missing required {} field", row, field);
    }

    Ok(Some((
        record.shift.as_deref().unwrap_or_default(),
        record.offense.as_deref().unwrap_or_default(),
        record.reported_at.as_deref().unwrap_or_default(),
    )))
}

/// Duration in minutes for one record, or `None` when either clock
/// time is missing or unparseable (an empty end time is the common
/// case in the source data).
fn record_duration(record: &Incident, policy: DurationPolicy) -> Option<i64> {
    let start = parse_clock_time(record.started_at.as_deref()?)?;
    let end = parse_clock_time(record.ended_at.as_deref()?)?;
    Some(duration_minutes(start, end, policy))
}
