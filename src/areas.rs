//! Cleanable areas and the per-session area selection set.

use crate::config::AreaMapping;
use std::collections::{HashMap, HashSet};

/// One cleanable zone, read-only to the core.
///
/// `area_id` comes from the host area registry, `device_area_id` is the
/// numeric id the device job API expects, name and icon are display hints.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Area {
    pub area_id: String,
    pub device_area_id: u32,
    pub name: Option<String>,
    pub icon: Option<String>,
}

/// Display information the host area registry holds for one area id
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AreaInfo {
    pub name: Option<String>,
    pub icon: Option<String>,
}

/// Intersect the configured mappings with the host area registry.
///
/// Mappings whose area id the host does not know are skipped; the result
/// keeps the configured order.
pub fn resolve_areas(
    mappings: &[AreaMapping],
    registry: &HashMap<String, AreaInfo>,
) -> Vec<Area> {
    let mut areas = Vec::new();

    for mapping in mappings {
        let Some(info) = registry.get(&mapping.area_id) else {
            log::warn!("Configured area {} not in host registry", mapping.area_id);
            continue;
        };

        areas.push(Area {
            area_id: mapping.area_id.clone(),
            device_area_id: mapping.device_area_id,
            name: info.name.clone(),
            icon: info.icon.clone(),
        });
    }

    areas
}

/// Toggle-set over host area ids.
///
/// Unordered; toggling the same id twice restores the original state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AreaSelection {
    selected: HashSet<String>,
}

impl AreaSelection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flip membership of `id`; returns whether it is now selected
    pub fn toggle(&mut self, id: &str) -> bool {
        if self.selected.remove(id) {
            false
        } else {
            self.selected.insert(id.to_string());
            true
        }
    }

    /// Is `id` currently selected?
    pub fn contains(&self, id: &str) -> bool {
        self.selected.contains(id)
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    pub fn len(&self) -> usize {
        self.selected.len()
    }

    /// Drop the whole selection
    pub fn clear(&mut self) {
        self.selected.clear();
    }

    /// Iterate the selected host area ids (no ordering guarantee)
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.selected.iter().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle_is_idempotent_over_pairs() {
        let mut selection = AreaSelection::new();

        assert!(selection.toggle("kitchen"));
        assert!(selection.contains("kitchen"));
        assert!(!selection.toggle("kitchen"));
        assert!(!selection.contains("kitchen"));
        assert!(selection.is_empty());
    }

    #[test]
    fn test_clear() {
        let mut selection = AreaSelection::new();
        selection.toggle("a");
        selection.toggle("b");
        assert_eq!(selection.len(), 2);

        selection.clear();
        assert!(selection.is_empty());
    }

    #[test]
    fn test_resolve_skips_unknown_host_areas() {
        let mappings = vec![
            AreaMapping {
                area_id: "kitchen".to_string(),
                device_area_id: 16,
            },
            AreaMapping {
                area_id: "attic".to_string(),
                device_area_id: 99,
            },
        ];

        let mut registry = HashMap::new();
        registry.insert(
            "kitchen".to_string(),
            AreaInfo {
                name: Some("Kitchen".to_string()),
                icon: Some("mdi:stove".to_string()),
            },
        );

        let areas = resolve_areas(&mappings, &registry);
        assert_eq!(areas.len(), 1);
        assert_eq!(areas[0].area_id, "kitchen");
        assert_eq!(areas[0].device_area_id, 16);
        assert_eq!(areas[0].name.as_deref(), Some("Kitchen"));
    }
}
