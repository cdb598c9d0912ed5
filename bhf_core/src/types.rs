//! Core domain types for Brain Heart Fitness.
//!
//! This module defines the fundamental types used throughout the system:
//! - Heart rate samples and their origin
//! - Heart rate zones (intensity bands)
//! - Derived sessions and window summaries
//! - Weekly progress rows and goals

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Milliseconds in one minute, the credit unit for zone accounting.
pub const MINUTE_MS: i64 = 60 * 1000;

// ============================================================================
// Sample Types
// ============================================================================

/// Origin of a heart rate sample
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SampleSource {
    HealthConnect,
    GoogleFit,
    Synthetic,
}

/// A single heart rate observation
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct HeartRateSample {
    /// Unix timestamp in milliseconds
    pub timestamp_ms: i64,
    /// Heart rate in beats per minute
    pub bpm: u16,
    pub source: SampleSource,
}

impl HeartRateSample {
    pub fn new(timestamp_ms: i64, bpm: u16, source: SampleSource) -> Self {
        Self {
            timestamp_ms,
            bpm,
            source,
        }
    }

    /// Timestamp as a chrono instant (UTC)
    pub fn timestamp(&self) -> DateTime<Utc> {
        Utc.timestamp_millis_opt(self.timestamp_ms)
            .single()
            .unwrap_or_else(Utc::now)
    }
}

// ============================================================================
// Zone Types
// ============================================================================

/// A heart rate intensity band.
///
/// Bounds are inclusive on both ends. The top zone of a table uses a
/// sentinel upper bound (999) rather than an open range.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct HeartRateZone {
    pub id: String,
    pub name: String,
    pub description: String,
    pub min_bpm: u16,
    pub max_bpm: u16,
    /// Display colour (hex), carried for UI layers
    pub color: String,
}

impl HeartRateZone {
    /// Whether a BPM value falls inside this band
    pub fn contains(&self, bpm: u16) -> bool {
        bpm >= self.min_bpm && bpm <= self.max_bpm
    }
}

// ============================================================================
// Derived Types
// ============================================================================

/// A maximal contiguous run of samples treated as one activity period.
///
/// Constructed once per aggregation pass and never mutated afterwards.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct HeartRateSession {
    pub start_time_ms: i64,
    pub end_time_ms: i64,
    pub average_bpm: u16,
    pub max_bpm: u16,
    pub min_bpm: u16,
    /// Zone id -> minutes credited within this session
    pub zone_minutes: BTreeMap<String, u32>,
}

impl HeartRateSession {
    /// Minutes credited to any zone by this session
    pub fn credited_minutes(&self) -> u32 {
        self.zone_minutes.values().sum()
    }
}

/// Aggregate over a time window.
///
/// `total_minutes` is the sum of all zone-minute credits, so
/// `total_minutes == zone_breakdown.values().sum()` holds for every
/// summary the aggregator produces. BPM statistics cover every sample in
/// the window, including samples outside any session or zone.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct HeartRateSummary {
    pub window_start_ms: i64,
    pub window_end_ms: i64,
    pub total_minutes: u32,
    /// Zone id -> minutes across all samples in the window
    pub zone_breakdown: BTreeMap<String, u32>,
    pub sessions: Vec<HeartRateSession>,
    pub average_heart_rate: u16,
    pub max_heart_rate: u16,
    pub min_heart_rate: u16,
}

impl HeartRateSummary {
    /// The zero-valued summary for an empty window
    pub fn empty(window_start_ms: i64, window_end_ms: i64) -> Self {
        Self {
            window_start_ms,
            window_end_ms,
            total_minutes: 0,
            zone_breakdown: BTreeMap::new(),
            sessions: Vec::new(),
            average_heart_rate: 0,
            max_heart_rate: 0,
            min_heart_rate: 0,
        }
    }

    /// Minutes credited to the given zone ids
    pub fn minutes_in(&self, zone_ids: &[&str]) -> u32 {
        zone_ids
            .iter()
            .filter_map(|id| self.zone_breakdown.get(*id))
            .sum()
    }
}

/// A daily summary tagged with its calendar date
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct DailySummary {
    pub date: NaiveDate,
    pub summary: HeartRateSummary,
}

/// One row of the weekly progress view: Zone 2+ minutes for a day
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct DailyProgress {
    pub date: NaiveDate,
    pub zone2_plus_minutes: u32,
}

/// Daily and weekly Zone 2+ minute targets
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Goals {
    pub daily_zone2_plus: u32,
    pub weekly_zone2_plus: u32,
}

impl Default for Goals {
    fn default() -> Self {
        Self {
            daily_zone2_plus: 30,
            weekly_zone2_plus: 150,
        }
    }
}
