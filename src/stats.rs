//! Statistic selection and value formatting for the card's stats row.
//!
//! Pure helpers: the host supplies raw state strings, presentation renders
//! the formatted results.

use crate::config::{CardConfig, StatSpec};

/// Pick the statistic list for a status key, falling back to the `default`
/// list when the key has no entry
pub fn select_stats<'a>(config: &'a CardConfig, state_key: &str) -> &'a [StatSpec] {
    config
        .stats
        .get(state_key)
        .or_else(|| config.stats.get("default"))
        .map(Vec::as_slice)
        .unwrap_or(&[])
}

/// Format a raw state value according to a statistic spec.
///
/// `divide_by` is applied first, then `scale` fixes the decimal places.
/// Without either the raw value passes through untouched; an unparseable
/// value also passes through rather than rendering `NaN`.
pub fn format_stat_value(raw: &str, spec: &StatSpec) -> String {
    if spec.scale.is_none() && spec.divide_by.is_none() {
        return raw.to_string();
    }

    let Ok(mut value) = raw.parse::<f64>() else {
        log::warn!("Stat value {:?} is not numeric", raw);
        return raw.to_string();
    };

    if let Some(divide_by) = spec.divide_by {
        if divide_by > 0.0 {
            value /= divide_by;
        }
    }

    match spec.scale {
        Some(scale) => {
            let scale = scale as usize;
            format!("{value:.scale$}")
        }
        None => value.to_string(),
    }
}

/// Format a duration in seconds as `"2h 5min"` / `"45min"` / `"0s"`
pub fn format_time(seconds: u64) -> String {
    if seconds == 0 {
        return "0s".to_string();
    }

    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;

    let hours_part = if hours > 0 {
        format!("{hours}h ")
    } else {
        String::new()
    };
    let minutes_part = if minutes > 0 {
        format!("{minutes}min")
    } else {
        String::new()
    };

    let result = format!("{hours_part}{minutes_part}");
    result.trim_end().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{CardConfig, RawCardConfig};
    use std::collections::HashMap;

    fn config_with_stats() -> CardConfig {
        let mut stats = HashMap::new();
        stats.insert(
            "default".to_string(),
            vec![StatSpec {
                title: Some("Filter".to_string()),
                ..StatSpec::default()
            }],
        );
        stats.insert(
            "cleaning".to_string(),
            vec![
                StatSpec::default(),
                StatSpec::default(),
            ],
        );

        CardConfig::build(Some(RawCardConfig {
            entity: Some("vacuum.x".to_string()),
            stats: Some(stats),
            ..RawCardConfig::default()
        }))
        .unwrap()
    }

    #[test]
    fn test_select_stats_with_fallback() {
        let config = config_with_stats();

        assert_eq!(select_stats(&config, "cleaning").len(), 2);
        // Unknown key falls back to the default list
        assert_eq!(select_stats(&config, "docked").len(), 1);
    }

    #[test]
    fn test_select_stats_empty_without_default() {
        let config = CardConfig::build(Some(RawCardConfig {
            entity: Some("vacuum.x".to_string()),
            ..RawCardConfig::default()
        }))
        .unwrap();
        assert!(select_stats(&config, "cleaning").is_empty());
    }

    #[test]
    fn test_format_passthrough() {
        let spec = StatSpec::default();
        assert_eq!(format_stat_value("docked", &spec), "docked");
        assert_eq!(format_stat_value("42.5", &spec), "42.5");
    }

    #[test]
    fn test_format_divide_and_scale() {
        let spec = StatSpec {
            divide_by: Some(3600.0),
            scale: Some(1),
            ..StatSpec::default()
        };
        assert_eq!(format_stat_value("5400", &spec), "1.5");

        let scale_only = StatSpec {
            scale: Some(0),
            ..StatSpec::default()
        };
        assert_eq!(format_stat_value("99.7", &scale_only), "100");
    }

    #[test]
    fn test_format_non_numeric_passthrough() {
        let spec = StatSpec {
            scale: Some(2),
            ..StatSpec::default()
        };
        assert_eq!(format_stat_value("unknown", &spec), "unknown");
    }

    #[test]
    fn test_format_time() {
        assert_eq!(format_time(0), "0s");
        assert_eq!(format_time(45 * 60), "45min");
        assert_eq!(format_time(2 * 3600 + 5 * 60), "2h 5min");
        assert_eq!(format_time(3600), "1h");
        // Sub-minute durations collapse to nothing, matching the card
        assert_eq!(format_time(30), "");
    }
}
