//! Heart rate zone tables.
//!
//! Provides the built-in five-zone table, personalized tables derived from
//! heart-rate reserve, classification of BPM values into zones, and table
//! validation.

use crate::types::HeartRateZone;
use once_cell::sync::Lazy;

/// Sentinel upper bound for the top zone of a table
pub const TOP_ZONE_MAX_BPM: u16 = 999;

/// Cached default zone table - built once and reused across all operations
static DEFAULT_ZONES: Lazy<Vec<HeartRateZone>> = Lazy::new(build_default_zones);

/// Get a reference to the cached default zone table
pub fn default_zones() -> &'static [HeartRateZone] {
    &DEFAULT_ZONES
}

/// Builds the default five-zone table.
///
/// **Note**: For production use, prefer `default_zones()` which returns a
/// cached reference. This function is retained for testing and custom table
/// construction.
pub fn build_default_zones() -> Vec<HeartRateZone> {
    vec![
        HeartRateZone {
            id: "zone1".into(),
            name: "Zone 1".into(),
            description: "Recovery".into(),
            min_bpm: 0,
            max_bpm: 120,
            color: "#81C784".into(),
        },
        HeartRateZone {
            id: "zone2".into(),
            name: "Zone 2".into(),
            description: "Aerobic Base".into(),
            min_bpm: 121,
            max_bpm: 140,
            color: "#64B5F6".into(),
        },
        HeartRateZone {
            id: "zone3".into(),
            name: "Zone 3".into(),
            description: "Tempo".into(),
            min_bpm: 141,
            max_bpm: 160,
            color: "#FFB74D".into(),
        },
        HeartRateZone {
            id: "zone4".into(),
            name: "Zone 4".into(),
            description: "Threshold".into(),
            min_bpm: 161,
            max_bpm: 180,
            color: "#F44336".into(),
        },
        HeartRateZone {
            id: "zone5".into(),
            name: "Zone 5".into(),
            description: "VO2 Max".into(),
            min_bpm: 181,
            max_bpm: TOP_ZONE_MAX_BPM,
            color: "#9C27B0".into(),
        },
    ]
}

/// Classify a BPM value against an ordered zone table.
///
/// Returns the first zone whose inclusive bounds contain the value, or
/// `None` when nothing matches (the caller decides whether to drop or
/// clamp such samples).
pub fn classify(bpm: u16, zones: &[HeartRateZone]) -> Option<&HeartRateZone> {
    zones.iter().find(|z| z.contains(bpm))
}

/// Classify with clamping: out-of-range values credit the nearest band,
/// measured by BPM distance to the band's bounds. Works for values below,
/// above, or (in an unvalidated table) between bands; ties go to the lower
/// band. An empty table returns `None`.
pub fn classify_clamped(bpm: u16, zones: &[HeartRateZone]) -> Option<&HeartRateZone> {
    classify(bpm, zones).or_else(|| {
        zones.iter().min_by_key(|z| {
            if bpm < z.min_bpm {
                u32::from(z.min_bpm - bpm)
            } else {
                u32::from(bpm - z.max_bpm)
            }
        })
    })
}

/// Validate an ordered zone table, returning a list of problems.
///
/// The aggregator depends on the table being non-empty, sorted, gap-free
/// and non-overlapping: every in-range BPM must map to exactly one zone.
pub fn validate(zones: &[HeartRateZone]) -> Vec<String> {
    let mut errors = Vec::new();

    if zones.is_empty() {
        errors.push("Zone table is empty".to_string());
        return errors;
    }

    for zone in zones {
        if zone.min_bpm > zone.max_bpm {
            errors.push(format!(
                "Zone '{}' has min_bpm {} above max_bpm {}",
                zone.id, zone.min_bpm, zone.max_bpm
            ));
        }
    }

    for pair in zones.windows(2) {
        let (lower, upper) = (&pair[0], &pair[1]);
        if upper.min_bpm <= lower.max_bpm {
            errors.push(format!(
                "Zones '{}' and '{}' overlap ({}..={} vs {}..={})",
                lower.id, upper.id, lower.min_bpm, lower.max_bpm, upper.min_bpm, upper.max_bpm
            ));
        } else if upper.min_bpm > lower.max_bpm + 1 {
            errors.push(format!(
                "Gap between zones '{}' (max {}) and '{}' (min {})",
                lower.id, lower.max_bpm, upper.id, upper.min_bpm
            ));
        }
    }

    let mut ids: Vec<&str> = zones.iter().map(|z| z.id.as_str()).collect();
    ids.sort_unstable();
    ids.dedup();
    if ids.len() != zones.len() {
        errors.push("Zone ids are not unique".to_string());
    }

    errors
}

/// Derive personalized zones from heart-rate reserve.
///
/// Karvonen formula: target = (max_hr - resting_hr) * intensity + resting_hr.
/// The five bands use intensities 0.5/0.6/0.7/0.8/0.9; the top band runs up
/// to max_hr.
pub fn karvonen_zones(max_hr: u16, resting_hr: u16) -> Vec<HeartRateZone> {
    const BANDS: [(&str, &str, f64, &str); 5] = [
        ("Zone 1", "Recovery", 0.5, "#81C784"),
        ("Zone 2", "Aerobic Base", 0.6, "#64B5F6"),
        ("Zone 3", "Tempo", 0.7, "#FFB74D"),
        ("Zone 4", "Threshold", 0.8, "#F44336"),
        ("Zone 5", "VO2 Max", 0.9, "#9C27B0"),
    ];

    let reserve = f64::from(max_hr.saturating_sub(resting_hr));
    let target = |intensity: f64| (reserve * intensity + f64::from(resting_hr)).round() as u16;

    BANDS
        .iter()
        .enumerate()
        .map(|(i, (name, description, intensity, color))| {
            let min_bpm = target(*intensity);
            let max_bpm = if i + 1 < BANDS.len() {
                target(BANDS[i + 1].2).saturating_sub(1)
            } else {
                max_hr
            };
            HeartRateZone {
                id: format!("zone{}", i + 1),
                name: (*name).into(),
                description: (*description).into(),
                min_bpm,
                max_bpm,
                color: (*color).into(),
            }
        })
        .collect()
}

/// Ids of every zone at or above the given floor zone (Zone 2+ by default).
///
/// Falls back to everything above the first band when the floor id is not
/// present in the table.
pub fn zone_ids_from<'a>(zones: &'a [HeartRateZone], floor_id: &str) -> Vec<&'a str> {
    let start = zones
        .iter()
        .position(|z| z.id == floor_id)
        .unwrap_or_else(|| 1.min(zones.len()));
    zones[start..].iter().map(|z| z.id.as_str()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_table_is_valid() {
        let errors = validate(default_zones());
        assert!(errors.is_empty(), "unexpected errors: {:?}", errors);
    }

    #[test]
    fn test_every_bpm_maps_to_exactly_one_zone() {
        let zones = default_zones();
        for bpm in 0..=300u16 {
            let matching = zones.iter().filter(|z| z.contains(bpm)).count();
            assert_eq!(matching, 1, "bpm {} matched {} zones", bpm, matching);
        }
    }

    #[test]
    fn test_classify_boundaries() {
        let zones = default_zones();
        assert_eq!(classify(120, zones).unwrap().id, "zone1");
        assert_eq!(classify(121, zones).unwrap().id, "zone2");
        assert_eq!(classify(181, zones).unwrap().id, "zone5");
        assert!(classify(1000, zones).is_none());
    }

    #[test]
    fn test_classify_clamped() {
        let zones = default_zones();
        assert_eq!(classify_clamped(1000, zones).unwrap().id, "zone5");
        assert_eq!(classify_clamped(0, zones).unwrap().id, "zone1");
        assert!(classify_clamped(70, &[]).is_none());
    }

    #[test]
    fn test_classify_clamped_gap_goes_to_nearest_band() {
        // Deliberately gapped table: 101..=120 is uncovered
        let mut zones = build_default_zones();
        zones[0].max_bpm = 100;

        // 105 is 5 from zone1's top, 16 from zone2's floor
        assert_eq!(classify_clamped(105, &zones).unwrap().id, "zone1");
        // 118 is 18 from zone1's top, 3 from zone2's floor
        assert_eq!(classify_clamped(118, &zones).unwrap().id, "zone2");
    }

    #[test]
    fn test_validate_detects_gap_and_overlap() {
        let mut zones = build_default_zones();
        zones[1].min_bpm = 125; // leaves 121..=124 uncovered
        let errors = validate(&zones);
        assert!(errors.iter().any(|e| e.contains("Gap")));

        let mut zones = build_default_zones();
        zones[1].min_bpm = 115; // overlaps zone1
        let errors = validate(&zones);
        assert!(errors.iter().any(|e| e.contains("overlap")));
    }

    #[test]
    fn test_karvonen_zones_cover_reserve() {
        let zones = karvonen_zones(190, 60);
        let errors = validate(&zones);
        assert!(errors.is_empty(), "unexpected errors: {:?}", errors);

        // (190 - 60) * 0.5 + 60 = 125
        assert_eq!(zones[0].min_bpm, 125);
        // Top zone runs to max heart rate
        assert_eq!(zones[4].max_bpm, 190);
    }

    #[test]
    fn test_zone_ids_from_floor() {
        let ids = zone_ids_from(default_zones(), "zone2");
        assert_eq!(ids, vec!["zone2", "zone3", "zone4", "zone5"]);

        // Unknown floor falls back to everything above the first band
        let ids = zone_ids_from(default_zones(), "nope");
        assert_eq!(ids.len(), 4);
    }
}
