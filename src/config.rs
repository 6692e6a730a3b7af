//! Card configuration: raw user input and its normalized form.
//!
//! A [`RawCardConfig`] is what the hosting environment hands over (TOML file
//! or any serde source); [`CardConfig::build`] normalizes it once at setup
//! time into the immutable configuration that backs one card instance for
//! its entire lifetime.

use crate::error::{Error, Result};
use crate::modes::{default_parameters, CleaningMode, CleaningParameters};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// One displayed statistic: where its value comes from and how to format it
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StatSpec {
    /// Source entity id; falls back to the card entity when only
    /// `attribute` is set
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entity: Option<String>,
    /// Attribute to read instead of the entity state
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attribute: Option<String>,
    /// Fixed number of decimal places
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scale: Option<u32>,
    /// Divisor applied before formatting
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub divide_by: Option<f64>,
    /// Unit suffix shown after the value
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    /// Caption shown under the value
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

/// Configured mapping from a host area id to the device-facing numeric id
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AreaMapping {
    /// Host area registry id
    pub area_id: String,
    /// Device-facing numeric area id
    pub device_area_id: u32,
}

/// User-supplied, partially-filled card configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawCardConfig {
    pub entity: Option<String>,
    pub stats: Option<HashMap<String, Vec<StatSpec>>>,
    pub areas: Option<Vec<AreaMapping>>,
    pub default_mode: Option<CleaningMode>,
    pub default_modes: Option<HashMap<CleaningMode, CleaningParameters>>,
}

impl RawCardConfig {
    /// Load a raw configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        let config: RawCardConfig = toml::from_str(&contents)?;
        Ok(config)
    }
}

/// Fully-populated, internally consistent card configuration
#[derive(Debug, Clone)]
pub struct CardConfig {
    /// Vacuum entity id, e.g. `vacuum.kitchen`
    pub entity: String,
    /// Displayed statistics per status key
    pub stats: HashMap<String, Vec<StatSpec>>,
    /// Host area id ↔ device area id mappings
    pub areas: Vec<AreaMapping>,
    /// Cleaning mode a fresh session falls back to
    pub default_mode: CleaningMode,
    /// Effective per-mode parameter table
    pub default_modes: HashMap<CleaningMode, CleaningParameters>,
}

impl CardConfig {
    /// Normalize a raw configuration into the immutable card configuration.
    ///
    /// Fails with [`Error::InvalidConfig`] when no configuration is given at
    /// all and with [`Error::MissingEntity`] when `entity` is absent or
    /// empty. `default_mode` is fixed to `VacAndMop`; it is not currently
    /// configurable by the caller.
    ///
    /// The effective `default_modes` table takes the built-in parameter
    /// table as authoritative over caller-supplied overrides for the same
    /// cleaning mode: the built-ins win on key collision. Observed behavior
    /// of the legacy card, preserved as-is; see the precedence note in
    /// DESIGN.md before changing it.
    pub fn build(raw: Option<RawCardConfig>) -> Result<Self> {
        let raw = raw.ok_or(Error::InvalidConfig)?;

        let entity = match raw.entity {
            Some(e) if !e.is_empty() => e,
            _ => return Err(Error::MissingEntity),
        };

        let mut default_modes = raw.default_modes.unwrap_or_default();
        for mode in CleaningMode::ALL {
            default_modes.insert(mode, default_parameters(mode));
        }

        log::debug!("Card configuration built for entity {}", entity);

        Ok(Self {
            entity,
            stats: raw.stats.unwrap_or_default(),
            areas: raw.areas.unwrap_or_default(),
            default_mode: CleaningMode::VacAndMop,
            default_modes,
        })
    }

    /// Load and normalize a configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::build(Some(RawCardConfig::from_file(path)?))
    }

    /// Short device name: the entity id without its `vacuum.` prefix
    pub fn device_name(&self) -> &str {
        self.entity.strip_prefix("vacuum.").unwrap_or(&self.entity)
    }

    /// Companion sensor entity ids derived from the card entity
    pub fn sensor_ids(&self) -> SensorIds {
        SensorIds::for_entity(self.device_name())
    }
}

/// Companion sensor entity ids for one vacuum device
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SensorIds {
    pub status: String,
    pub cleaning: String,
    pub mop_drying: String,
    pub mop_drying_remaining_time: String,
    pub battery: String,
    pub vacuum_error: String,
    pub dock_error: String,
}

impl SensorIds {
    /// Derive the sensor ids for a device short name (entity id without the
    /// `vacuum.` prefix)
    pub fn for_entity(name: &str) -> Self {
        Self {
            status: format!("sensor.{name}_status"),
            cleaning: format!("binary_sensor.{name}_cleaning"),
            mop_drying: format!("binary_sensor.{name}_mop_drying"),
            mop_drying_remaining_time: format!("sensor.{name}_mop_drying_remaining_time"),
            battery: format!("sensor.{name}_battery"),
            vacuum_error: format!("sensor.{name}_vacuum_error"),
            dock_error: format!("sensor.{name}_dock_error"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modes::{MopMode, RouteMode, SuctionMode};

    fn raw_with_entity() -> RawCardConfig {
        RawCardConfig {
            entity: Some("vacuum.x".to_string()),
            ..RawCardConfig::default()
        }
    }

    #[test]
    fn test_build_defaults() {
        let config = CardConfig::build(Some(raw_with_entity())).unwrap();

        assert_eq!(config.entity, "vacuum.x");
        assert!(config.stats.is_empty());
        assert!(config.areas.is_empty());
        assert_eq!(config.default_mode, CleaningMode::VacAndMop);
        for mode in CleaningMode::ALL {
            assert_eq!(config.default_modes[&mode], default_parameters(mode));
        }
    }

    #[test]
    fn test_build_without_config_fails() {
        assert!(matches!(CardConfig::build(None), Err(Error::InvalidConfig)));
    }

    #[test]
    fn test_build_without_entity_fails() {
        let err = CardConfig::build(Some(RawCardConfig::default())).unwrap_err();
        assert!(matches!(err, Error::MissingEntity));

        let raw = RawCardConfig {
            entity: Some(String::new()),
            ..RawCardConfig::default()
        };
        assert!(matches!(
            CardConfig::build(Some(raw)),
            Err(Error::MissingEntity)
        ));
    }

    /// The built-in table beats caller overrides for the same cleaning
    /// mode. This precedence is preserved from the legacy card on purpose:
    /// it means user `default_modes` overrides are effectively discarded.
    #[test]
    fn test_builtin_defaults_win_over_caller_overrides() {
        let mut overrides = HashMap::new();
        overrides.insert(
            CleaningMode::Vac,
            CleaningParameters {
                suction: Some(SuctionMode::MaxPlus),
                mop: Some(MopMode::Off),
                route: Some(RouteMode::Fast),
            },
        );

        let raw = RawCardConfig {
            entity: Some("vacuum.x".to_string()),
            default_modes: Some(overrides),
            ..RawCardConfig::default()
        };
        let config = CardConfig::build(Some(raw)).unwrap();

        // The override lost: the effective table equals the built-in table.
        for mode in CleaningMode::ALL {
            assert_eq!(config.default_modes[&mode], default_parameters(mode));
        }
    }

    #[test]
    fn test_from_toml() {
        let toml_str = r#"
entity = "vacuum.living_room"

[[areas]]
area_id = "kitchen"
device_area_id = 16

[[areas]]
area_id = "hallway"
device_area_id = 17

[stats]
default = [{ attribute = "filter_left", divide_by = 3600.0, scale = 0, unit = "h", title = "Filter" }]
cleaning = [{ entity = "sensor.x_cleaning_area", unit = "m2", title = "Area" }]
"#;
        let raw: RawCardConfig = toml::from_str(toml_str).unwrap();
        let config = CardConfig::build(Some(raw)).unwrap();

        assert_eq!(config.areas.len(), 2);
        assert_eq!(config.areas[0].device_area_id, 16);
        assert_eq!(config.stats["default"].len(), 1);
        assert_eq!(config.stats["default"][0].scale, Some(0));
        assert_eq!(config.device_name(), "living_room");
    }

    #[test]
    fn test_sensor_ids() {
        let config = CardConfig::build(Some(raw_with_entity())).unwrap();
        let ids = config.sensor_ids();

        assert_eq!(ids.status, "sensor.x_status");
        assert_eq!(ids.cleaning, "binary_sensor.x_cleaning");
        assert_eq!(ids.mop_drying, "binary_sensor.x_mop_drying");
        assert_eq!(ids.battery, "sensor.x_battery");
        assert_eq!(ids.vacuum_error, "sensor.x_vacuum_error");
        assert_eq!(ids.dock_error, "sensor.x_dock_error");
    }
}
