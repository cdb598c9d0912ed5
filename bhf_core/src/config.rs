//! Configuration file support for Brain Heart Fitness.
//!
//! Configuration is loaded from `$XDG_CONFIG_HOME/bhf/config.toml`.

use crate::aggregate::{AggregateOptions, OutOfRangePolicy};
use crate::types::{Goals, HeartRateZone, MINUTE_MS};
use crate::zones;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application configuration
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub data: DataConfig,

    #[serde(default)]
    pub zones: ZonesConfig,

    #[serde(default)]
    pub aggregation: AggregationConfig,

    #[serde(default)]
    pub goals: GoalsConfig,
}

/// Data storage configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DataConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
        }
    }
}

/// Zone personalization configuration.
///
/// When both heart rates are set the zone table is derived from
/// heart-rate reserve; otherwise the built-in table is used.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ZonesConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_heart_rate: Option<u16>,

    #[serde(default = "default_resting_heart_rate")]
    pub resting_heart_rate: u16,

    /// Floor of the "Zone 2+" progress metric
    #[serde(default = "default_floor_zone_id")]
    pub floor_zone_id: String,
}

impl Default for ZonesConfig {
    fn default() -> Self {
        Self {
            max_heart_rate: None,
            resting_heart_rate: default_resting_heart_rate(),
            floor_zone_id: default_floor_zone_id(),
        }
    }
}

/// Aggregator tuning configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AggregationConfig {
    #[serde(default = "default_session_gap_minutes")]
    pub session_gap_minutes: u32,

    /// Minimum samples per session; 0 disables the filter
    #[serde(default)]
    pub min_session_samples: usize,

    #[serde(default)]
    pub out_of_range: OutOfRangePolicy,
}

impl Default for AggregationConfig {
    fn default() -> Self {
        Self {
            session_gap_minutes: default_session_gap_minutes(),
            min_session_samples: 0,
            out_of_range: OutOfRangePolicy::default(),
        }
    }
}

/// Zone 2+ minute goals configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GoalsConfig {
    #[serde(default = "default_daily_goal")]
    pub daily_zone2_plus: u32,

    #[serde(default = "default_weekly_goal")]
    pub weekly_zone2_plus: u32,
}

impl Default for GoalsConfig {
    fn default() -> Self {
        Self {
            daily_zone2_plus: default_daily_goal(),
            weekly_zone2_plus: default_weekly_goal(),
        }
    }
}

// Default value functions
fn default_data_dir() -> PathBuf {
    let base = dirs::data_local_dir().unwrap_or_else(|| {
        let home = std::env::var("HOME").expect("HOME environment variable not set");
        PathBuf::from(home).join(".local/share")
    });
    base.join("bhf")
}

fn default_resting_heart_rate() -> u16 {
    60
}

fn default_floor_zone_id() -> String {
    "zone2".into()
}

fn default_session_gap_minutes() -> u32 {
    5
}

fn default_daily_goal() -> u32 {
    Goals::default().daily_zone2_plus
}

fn default_weekly_goal() -> u32 {
    Goals::default().weekly_zone2_plus
}

impl Config {
    /// Load configuration from the standard config path
    pub fn load() -> Result<Self> {
        let config_path = Self::default_config_path();
        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            tracing::info!("No config file found at {:?}, using defaults", config_path);
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        tracing::info!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// Get the default config file path
    pub fn default_config_path() -> PathBuf {
        let base = dirs::config_dir().unwrap_or_else(|| {
            let home = std::env::var("HOME").expect("HOME environment variable not set");
            PathBuf::from(home).join(".config")
        });
        base.join("bhf").join("config.toml")
    }

    /// Save the current configuration to the default path
    pub fn save(&self) -> Result<()> {
        let config_path = Self::default_config_path();
        self.save_to(&config_path)
    }

    /// Save the current configuration to a specific path
    pub fn save_to(&self, path: &Path) -> Result<()> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, contents)?;
        tracing::info!("Saved config to {:?}", path);
        Ok(())
    }

    /// Resolve the zone table: personalized when a max heart rate is
    /// configured, built-in otherwise
    pub fn zone_table(&self) -> Vec<HeartRateZone> {
        match self.zones.max_heart_rate {
            Some(max_hr) => zones::karvonen_zones(max_hr, self.zones.resting_heart_rate),
            None => zones::build_default_zones(),
        }
    }

    /// Aggregator options derived from the config
    pub fn aggregate_options(&self) -> AggregateOptions {
        AggregateOptions {
            session_gap_ms: i64::from(self.aggregation.session_gap_minutes) * MINUTE_MS,
            min_session_samples: match self.aggregation.min_session_samples {
                0 => None,
                n => Some(n),
            },
            out_of_range: self.aggregation.out_of_range,
        }
    }

    /// Zone 2+ goals from the config
    pub fn goals(&self) -> Goals {
        Goals {
            daily_zone2_plus: self.goals.daily_zone2_plus,
            weekly_zone2_plus: self.goals.weekly_zone2_plus,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.aggregation.session_gap_minutes, 5);
        assert_eq!(config.aggregation.min_session_samples, 0);
        assert_eq!(config.goals.daily_zone2_plus, 30);
        assert_eq!(config.goals.weekly_zone2_plus, 150);
        assert_eq!(config.zones.max_heart_rate, None);
        assert_eq!(config.zones.resting_heart_rate, 60);
        assert_eq!(config.zones.floor_zone_id, "zone2");
    }

    #[test]
    fn test_default_matches_empty_toml() {
        // Config::default() and the serde per-field defaults must agree,
        // otherwise running with no config file behaves differently from
        // running with an empty one
        let parsed: Config = toml::from_str("").unwrap();
        let defaults = Config::default();

        assert_eq!(parsed.zones.max_heart_rate, defaults.zones.max_heart_rate);
        assert_eq!(
            parsed.zones.resting_heart_rate,
            defaults.zones.resting_heart_rate
        );
        assert_eq!(parsed.zones.floor_zone_id, defaults.zones.floor_zone_id);
        assert_eq!(
            parsed.aggregation.session_gap_minutes,
            defaults.aggregation.session_gap_minutes
        );
        assert_eq!(parsed.goals.daily_zone2_plus, defaults.goals.daily_zone2_plus);
        assert_eq!(parsed.data.data_dir, defaults.data.data_dir);
    }

    #[test]
    fn test_default_resting_rate_keeps_karvonen_sane() {
        // A zeroed resting rate would shift every derived band downward
        let mut config = Config::default();
        config.zones.max_heart_rate = Some(190);

        let table = config.zone_table();
        // (190 - 60) * 0.5 + 60 = 125
        assert_eq!(table[0].min_bpm, 125);
    }

    #[test]
    fn test_config_roundtrip() {
        let config = Config::default();
        let toml_str = toml::to_string(&config).unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();

        assert_eq!(
            config.aggregation.session_gap_minutes,
            parsed.aggregation.session_gap_minutes
        );
        assert_eq!(config.goals.daily_zone2_plus, parsed.goals.daily_zone2_plus);
    }

    #[test]
    fn test_partial_config() {
        let toml_str = r#"
[aggregation]
min_session_samples = 3
out_of_range = "clamp"
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.aggregation.min_session_samples, 3);
        assert_eq!(config.aggregation.out_of_range, OutOfRangePolicy::Clamp);
        assert_eq!(config.aggregation.session_gap_minutes, 5); // default

        let opts = config.aggregate_options();
        assert_eq!(opts.min_session_samples, Some(3));
        assert_eq!(opts.session_gap_ms, 5 * 60 * 1000);
    }

    #[test]
    fn test_personalized_zone_table() {
        let toml_str = r#"
[zones]
max_heart_rate = 190
resting_heart_rate = 55
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        let table = config.zone_table();
        assert_eq!(table.len(), 5);
        assert_eq!(table[4].max_bpm, 190);
    }
}
