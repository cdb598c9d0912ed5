//! Zone aggregation over heart rate samples.
//!
//! This module turns a time-ordered batch of samples into a window summary:
//! per-zone minutes, contiguous sessions, and BPM statistics. It is a pure,
//! total function of its inputs — no I/O, no shared state, and every
//! well-formed input (including the empty batch) produces a summary.
//!
//! Accounting model: each sample is worth one minute of activity, credited
//! to the zone its BPM classifies into. `total_minutes` is the sum of all
//! credits, so it always equals the sum of the zone breakdown.

use crate::types::{HeartRateSample, HeartRateSession, HeartRateSummary, HeartRateZone};
use crate::zones::{classify, classify_clamped};
use std::borrow::Cow;
use std::collections::BTreeMap;

/// Default gap between consecutive samples that splits sessions (5 minutes)
pub const DEFAULT_SESSION_GAP_MS: i64 = 5 * 60 * 1000;

/// How to account samples whose BPM falls outside every zone
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutOfRangePolicy {
    /// Credit no zone; the sample still counts toward BPM statistics
    #[default]
    Drop,
    /// Credit the nearest band
    Clamp,
}

/// Tunable aggregation behavior.
///
/// The defaults reproduce the plain aggregator: 5-minute session gap, no
/// minimum session length, out-of-range samples dropped from zone credit.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AggregateOptions {
    /// Gap between consecutive samples that starts a new session
    pub session_gap_ms: i64,
    /// When set, sessions with fewer samples are omitted from the session
    /// list. Their samples still count toward the zone breakdown and BPM
    /// statistics.
    pub min_session_samples: Option<usize>,
    pub out_of_range: OutOfRangePolicy,
}

impl Default for AggregateOptions {
    fn default() -> Self {
        Self {
            session_gap_ms: DEFAULT_SESSION_GAP_MS,
            min_session_samples: None,
            out_of_range: OutOfRangePolicy::Drop,
        }
    }
}

fn credit<'a>(
    bpm: u16,
    zones: &'a [HeartRateZone],
    policy: OutOfRangePolicy,
) -> Option<&'a HeartRateZone> {
    match policy {
        OutOfRangePolicy::Drop => classify(bpm, zones),
        OutOfRangePolicy::Clamp => classify_clamped(bpm, zones),
    }
}

/// Split sorted samples into maximal contiguous runs.
///
/// A new run starts whenever consecutive timestamps are more than
/// `session_gap_ms` apart; the final run is always included. Input must be
/// sorted ascending by timestamp.
pub fn group_into_sessions(
    samples: &[HeartRateSample],
    session_gap_ms: i64,
) -> Vec<&[HeartRateSample]> {
    let mut runs = Vec::new();
    let mut run_start = 0;

    for i in 1..samples.len() {
        if samples[i].timestamp_ms - samples[i - 1].timestamp_ms > session_gap_ms {
            runs.push(&samples[run_start..i]);
            run_start = i;
        }
    }

    if !samples.is_empty() {
        runs.push(&samples[run_start..]);
    }

    runs
}

/// Build a session from one contiguous run of samples.
///
/// Every zone id appears in the minute map, zero-credited zones included.
/// Runs are never empty by construction of `group_into_sessions`.
fn build_session(
    run: &[HeartRateSample],
    zones: &[HeartRateZone],
    policy: OutOfRangePolicy,
) -> HeartRateSession {
    let mut zone_minutes: BTreeMap<String, u32> =
        zones.iter().map(|z| (z.id.clone(), 0)).collect();

    let mut bpm_total: u64 = 0;
    let mut max_bpm: u16 = 0;
    let mut min_bpm: u16 = u16::MAX;

    for sample in run {
        bpm_total += u64::from(sample.bpm);
        max_bpm = max_bpm.max(sample.bpm);
        min_bpm = min_bpm.min(sample.bpm);

        if let Some(zone) = credit(sample.bpm, zones, policy) {
            *zone_minutes.entry(zone.id.clone()).or_insert(0) += 1;
        }
    }

    let average_bpm = (bpm_total as f64 / run.len() as f64).round() as u16;

    HeartRateSession {
        start_time_ms: run[0].timestamp_ms,
        end_time_ms: run[run.len() - 1].timestamp_ms,
        average_bpm,
        max_bpm,
        min_bpm,
        zone_minutes,
    }
}

/// Aggregate a window of samples into a summary.
///
/// The window bounds are descriptive only; callers filter samples to the
/// window before invoking. Samples are expected sorted ascending by
/// timestamp — unsorted input is detected and sorted on entry rather than
/// producing undefined session splits.
pub fn summarize(
    samples: &[HeartRateSample],
    zones: &[HeartRateZone],
    window_start_ms: i64,
    window_end_ms: i64,
    opts: &AggregateOptions,
) -> HeartRateSummary {
    if samples.is_empty() {
        return HeartRateSummary::empty(window_start_ms, window_end_ms);
    }

    let samples = ensure_sorted(samples);

    let mut zone_breakdown: BTreeMap<String, u32> =
        zones.iter().map(|z| (z.id.clone(), 0)).collect();

    let mut bpm_total: u64 = 0;
    let mut max_heart_rate: u16 = 0;
    let mut min_heart_rate: u16 = u16::MAX;

    for sample in samples.iter() {
        bpm_total += u64::from(sample.bpm);
        max_heart_rate = max_heart_rate.max(sample.bpm);
        min_heart_rate = min_heart_rate.min(sample.bpm);

        if let Some(zone) = credit(sample.bpm, zones, opts.out_of_range) {
            *zone_breakdown.entry(zone.id.clone()).or_insert(0) += 1;
        }
    }

    let min_len = opts.min_session_samples.unwrap_or(1).max(1);
    let sessions: Vec<HeartRateSession> = group_into_sessions(&samples, opts.session_gap_ms)
        .into_iter()
        .filter(|run| run.len() >= min_len)
        .map(|run| build_session(run, zones, opts.out_of_range))
        .collect();

    let total_minutes = zone_breakdown.values().sum();
    let average_heart_rate = (bpm_total as f64 / samples.len() as f64).round() as u16;

    tracing::debug!(
        samples = samples.len(),
        sessions = sessions.len(),
        total_minutes,
        "Aggregated window {}..{}",
        window_start_ms,
        window_end_ms
    );

    HeartRateSummary {
        window_start_ms,
        window_end_ms,
        total_minutes,
        zone_breakdown,
        sessions,
        average_heart_rate,
        max_heart_rate,
        min_heart_rate,
    }
}

/// Sort a copy only when the caller hands us unsorted input
fn ensure_sorted(samples: &[HeartRateSample]) -> Cow<'_, [HeartRateSample]> {
    let sorted = samples
        .windows(2)
        .all(|w| w[0].timestamp_ms <= w[1].timestamp_ms);
    if sorted {
        Cow::Borrowed(samples)
    } else {
        tracing::warn!("Received unsorted samples, sorting before aggregation");
        let mut owned = samples.to_vec();
        owned.sort_by_key(|s| s.timestamp_ms);
        Cow::Owned(owned)
    }
}
