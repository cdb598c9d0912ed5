//! CSV export of summaries.
//!
//! Writes sessions and weekly progress rows to CSV files so summaries can
//! be inspected or charted outside the app.

use crate::types::{DailyProgress, HeartRateSession, HeartRateSummary};
use crate::Result;
use chrono::{TimeZone, Utc};
use std::path::Path;

/// A session row in the CSV output
#[derive(Debug, serde::Serialize)]
struct SessionRow {
    start_time: String,
    end_time: String,
    average_bpm: u16,
    max_bpm: u16,
    min_bpm: u16,
    credited_minutes: u32,
}

impl From<&HeartRateSession> for SessionRow {
    fn from(session: &HeartRateSession) -> Self {
        SessionRow {
            start_time: rfc3339(session.start_time_ms),
            end_time: rfc3339(session.end_time_ms),
            average_bpm: session.average_bpm,
            max_bpm: session.max_bpm,
            min_bpm: session.min_bpm,
            credited_minutes: session.credited_minutes(),
        }
    }
}

/// A zone breakdown row in the CSV output
#[derive(Debug, serde::Serialize)]
struct ZoneRow<'a> {
    zone_id: &'a str,
    minutes: u32,
}

/// A weekly progress row in the CSV output
#[derive(Debug, serde::Serialize)]
struct ProgressRow {
    date: String,
    zone2_plus_minutes: u32,
}

fn rfc3339(timestamp_ms: i64) -> String {
    Utc.timestamp_millis_opt(timestamp_ms)
        .single()
        .map(|dt| dt.to_rfc3339())
        .unwrap_or_else(|| timestamp_ms.to_string())
}

fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    Ok(())
}

/// Write a summary's sessions to a CSV file, replacing any existing file
pub fn write_sessions_csv(summary: &HeartRateSummary, path: &Path) -> Result<usize> {
    ensure_parent_dir(path)?;

    let mut writer = csv::Writer::from_path(path)?;
    for session in &summary.sessions {
        writer.serialize(SessionRow::from(session))?;
    }
    writer.flush()?;

    tracing::info!("Wrote {} sessions to {:?}", summary.sessions.len(), path);
    Ok(summary.sessions.len())
}

/// Write a summary's zone breakdown to a CSV file
pub fn write_zone_breakdown_csv(summary: &HeartRateSummary, path: &Path) -> Result<usize> {
    ensure_parent_dir(path)?;

    let mut writer = csv::Writer::from_path(path)?;
    for (zone_id, minutes) in &summary.zone_breakdown {
        writer.serialize(ZoneRow {
            zone_id,
            minutes: *minutes,
        })?;
    }
    writer.flush()?;

    Ok(summary.zone_breakdown.len())
}

/// Write weekly progress rows to a CSV file
pub fn write_progress_csv(progress: &[DailyProgress], path: &Path) -> Result<usize> {
    ensure_parent_dir(path)?;

    let mut writer = csv::Writer::from_path(path)?;
    for row in progress {
        writer.serialize(ProgressRow {
            date: row.date.to_string(),
            zone2_plus_minutes: row.zone2_plus_minutes,
        })?;
    }
    writer.flush()?;

    tracing::info!("Wrote {} progress rows to {:?}", progress.len(), path);
    Ok(progress.len())
}
