#![forbid(unsafe_code)]

//! Core domain model and business logic for Brain Heart Fitness.
//!
//! This crate provides:
//! - Domain types (samples, zones, sessions, summaries)
//! - Zone tables and BPM classification
//! - The zone aggregator (sessions, zone minutes, BPM statistics)
//! - Synthetic data generation and the local sample store
//! - The health data service and CSV export

pub mod types;
pub mod error;
pub mod zones;
pub mod config;
pub mod logging;
pub mod aggregate;
pub mod synthetic;
pub mod store;
pub mod provider;
pub mod service;
pub mod export;

// Re-export commonly used types
pub use error::{Error, Result};
pub use types::*;
pub use zones::{build_default_zones, classify, default_zones, karvonen_zones};
pub use config::Config;
pub use aggregate::{summarize, AggregateOptions, OutOfRangePolicy};
pub use synthetic::SyntheticGenerator;
pub use store::SampleStore;
pub use provider::{HeartRateProvider, StoreProvider, SyntheticProvider};
pub use service::{week_start, HealthDataService};
