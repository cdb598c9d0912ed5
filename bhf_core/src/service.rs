//! Health data service.
//!
//! Orchestrates fetching samples from a provider and aggregating them into
//! weekly and daily summaries and the Zone 2+ progress view. The service is
//! explicitly constructed and passed where needed rather than living behind
//! a global singleton, so callers can inject any provider.
//!
//! When the provider fails, the service logs the error and falls back to
//! the synthetic generator, so every query returns a usable summary.

use crate::aggregate::{summarize, AggregateOptions};
use crate::config::Config;
use crate::provider::HeartRateProvider;
use crate::synthetic::SyntheticGenerator;
use crate::types::{
    DailyProgress, DailySummary, Goals, HeartRateSample, HeartRateSummary, HeartRateZone,
    MINUTE_MS,
};
use crate::zones::zone_ids_from;
use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveTime, Utc};

const DAY_MS: i64 = 24 * 60 * MINUTE_MS;

/// Dependency-injected facade over provider + aggregator
pub struct HealthDataService {
    provider: Box<dyn HeartRateProvider>,
    zones: Vec<HeartRateZone>,
    options: AggregateOptions,
    goals: Goals,
    floor_zone_id: String,
}

impl HealthDataService {
    pub fn new(
        provider: Box<dyn HeartRateProvider>,
        zones: Vec<HeartRateZone>,
        options: AggregateOptions,
        goals: Goals,
        floor_zone_id: impl Into<String>,
    ) -> Self {
        Self {
            provider,
            zones,
            options,
            goals,
            floor_zone_id: floor_zone_id.into(),
        }
    }

    /// Build a service from the application config and a provider
    pub fn from_config(config: &Config, provider: Box<dyn HeartRateProvider>) -> Self {
        Self::new(
            provider,
            config.zone_table(),
            config.aggregate_options(),
            config.goals(),
            config.zones.floor_zone_id.clone(),
        )
    }

    pub fn zones(&self) -> &[HeartRateZone] {
        &self.zones
    }

    pub fn goals(&self) -> &Goals {
        &self.goals
    }

    /// Summary for the current week, Monday through `now`
    pub fn weekly_summary(&self, now: DateTime<Utc>) -> HeartRateSummary {
        let start_ms = day_start_ms(week_start(now));
        let end_ms = now.timestamp_millis();

        let samples = self.fetch_with_fallback(start_ms, end_ms);
        summarize(&samples, &self.zones, start_ms, end_ms, &self.options)
    }

    /// Summary for one calendar day
    pub fn daily_summary(&self, date: NaiveDate) -> DailySummary {
        let start_ms = day_start_ms(date);
        let end_ms = start_ms + DAY_MS - 1;

        let samples = self.fetch_with_fallback(start_ms, end_ms);
        DailySummary {
            date,
            summary: summarize(&samples, &self.zones, start_ms, end_ms, &self.options),
        }
    }

    /// Zone 2+ minutes per day for the week containing `today`.
    ///
    /// Always returns seven rows, Monday first; days after `today` are zero
    /// without touching the provider.
    pub fn weekly_progress(&self, today: NaiveDate) -> Vec<DailyProgress> {
        let monday = today - Duration::days(i64::from(today.weekday().num_days_from_monday()));

        (0..7)
            .map(|offset| {
                let date = monday + Duration::days(offset);
                let zone2_plus_minutes = if date <= today {
                    self.zone2_plus_minutes(&self.daily_summary(date).summary)
                } else {
                    0
                };
                DailyProgress {
                    date,
                    zone2_plus_minutes,
                }
            })
            .collect()
    }

    /// Minutes in the configured floor zone and above
    pub fn zone2_plus_minutes(&self, summary: &HeartRateSummary) -> u32 {
        let ids = zone_ids_from(&self.zones, &self.floor_zone_id);
        summary.minutes_in(&ids)
    }

    fn fetch_with_fallback(&self, start_ms: i64, end_ms: i64) -> Vec<HeartRateSample> {
        match self.provider.fetch(start_ms, end_ms) {
            Ok(samples) => {
                tracing::debug!(
                    "Fetched {} samples from provider '{}'",
                    samples.len(),
                    self.provider.name()
                );
                samples
            }
            Err(e) => {
                tracing::warn!(
                    "Provider '{}' failed ({}); falling back to synthetic data",
                    self.provider.name(),
                    e
                );
                SyntheticGenerator::from_entropy().generate(start_ms, end_ms)
            }
        }
    }
}

/// Monday of the week containing the given instant
pub fn week_start(now: DateTime<Utc>) -> NaiveDate {
    let today = now.date_naive();
    today - Duration::days(i64::from(today.weekday().num_days_from_monday()))
}

/// Midnight UTC of a date, in epoch milliseconds
pub fn day_start_ms(date: NaiveDate) -> i64 {
    date.and_time(NaiveTime::MIN).and_utc().timestamp_millis()
}
