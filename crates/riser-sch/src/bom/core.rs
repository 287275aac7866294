use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::Tower;
use crate::settings::Settings;

/// Aggregated equipment and cabling totals for a whole inventory.
///
/// Built from merged towers only; no layout is required.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bom {
    pub project: String,
    pub tower_count: usize,
    /// Every catalog device type, in catalog order, including zero totals.
    pub devices: Vec<DeviceTotal>,
    /// Switch roles present in at least one tower, by role name.
    pub switches: Vec<SwitchTotal>,
    pub total_points: u64,
    pub utp_label: String,
    pub utp_meters: u64,
    pub fiber_meters: u64,
    pub notes: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceTotal {
    pub key: String,
    pub label: String,
    pub quantity: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwitchTotal {
    pub role: String,
    /// Towers with an instance of this role.
    pub instances: u64,
    /// Instances with a known model, naturally sorted by model.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub models: Vec<ModelCount>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelCount {
    pub model: String,
    pub count: u64,
}

impl Bom {
    pub fn from_towers(towers: &[Tower], settings: &Settings) -> Self {
        let devices: Vec<DeviceTotal> = settings
            .devices
            .iter()
            .map(|device| DeviceTotal {
                key: device.key.clone(),
                label: device.label.clone(),
                quantity: towers
                    .iter()
                    .flat_map(|tower| tower.levels.values())
                    .map(|level| level.quantity(&device.key))
                    .sum(),
            })
            .collect();

        let mut roles = BTreeMap::<&str, (u64, BTreeMap<&str, u64>)>::new();
        for tower in towers {
            for (role, model) in &tower.switches {
                let (instances, models) = roles.entry(role.as_str()).or_default();
                *instances += 1;
                if let Some(model) = model.as_deref() {
                    *models.entry(model).or_default() += 1;
                }
            }
        }

        let switches: Vec<SwitchTotal> = roles
            .into_iter()
            .map(|(role, (instances, models))| {
                let mut models: Vec<ModelCount> = models
                    .into_iter()
                    .map(|(model, count)| ModelCount {
                        model: model.to_string(),
                        count,
                    })
                    .collect();
                models.sort_by(|a, b| natord::compare(&a.model, &b.model));
                SwitchTotal {
                    role: role.to_string(),
                    instances,
                    models,
                }
            })
            .collect();

        let cabling = &settings.cabling;
        let total_points: u64 = devices.iter().map(|d| d.quantity).sum();
        let links = towers.len().saturating_sub(1) as u64 * switches.len() as u64;

        let bom = Bom {
            project: settings.project.clone(),
            tower_count: towers.len(),
            devices,
            switches,
            total_points,
            utp_label: cabling.utp_label.clone(),
            utp_meters: total_points.saturating_mul(cabling.meters_per_point),
            fiber_meters: links.saturating_mul(cabling.fiber_meters_per_link),
            notes: settings.notes.clone(),
        };
        log::info!(
            "BOM: {} towers, {} network points, {} switch roles",
            bom.tower_count,
            bom.total_points,
            bom.switches.len()
        );
        bom
    }

    #[cfg(test)]
    pub fn device(&self, key: &str) -> Option<&DeviceTotal> {
        self.devices.iter().find(|d| d.key == key)
    }

    #[cfg(test)]
    pub fn switch(&self, role: &str) -> Option<&SwitchTotal> {
        self.switches.iter().find(|s| s.role == role)
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inventory::{RawRow, merge};
    use crate::settings::tests::sample_settings;

    fn towers(rows: &[&[(&str, &str)]]) -> Vec<Tower> {
        let rows = rows
            .iter()
            .enumerate()
            .map(|(i, fields)| RawRow::new(i as u64 + 2, fields.iter().copied()));
        merge(rows).towers
    }

    #[test]
    fn two_tower_scenario() {
        let towers = towers(&[
            &[
                ("TORRE", "0"),
                ("NIVEL", "0"),
                ("torre_nombre", "MDF"),
                ("switch_core", "1"),
                ("switch_core_modelo", "X1"),
            ],
            &[
                ("TORRE", "1"),
                ("NIVEL", "0"),
                ("torre_nombre", "IDF1"),
                ("apQty", "2"),
                ("switch_core", "1"),
            ],
        ]);
        let bom = Bom::from_towers(&towers, &sample_settings());

        assert_eq!(bom.tower_count, 2);
        assert_eq!(bom.device("apQty").map(|d| d.quantity), Some(2));
        assert_eq!(bom.device("camQty").map(|d| d.quantity), Some(0));
        assert_eq!(
            bom.switches,
            vec![SwitchTotal {
                role: "SW-CORE".into(),
                instances: 2,
                models: vec![ModelCount {
                    model: "X1".into(),
                    count: 1
                }],
            }]
        );
        assert_eq!(bom.total_points, 2);
        assert_eq!(bom.utp_meters, 30);
        assert_eq!(bom.fiber_meters, 50);
    }

    #[test]
    fn unused_roles_never_appear() {
        let towers = towers(&[
            &[("TORRE", "0"), ("NIVEL", "0"), ("switch_ap", "0"), ("switch_ups", "")],
            &[("TORRE", "0"), ("NIVEL", "1"), ("datQty", "4")],
        ]);
        let bom = Bom::from_towers(&towers, &sample_settings());
        assert!(bom.switches.is_empty());
        assert_eq!(bom.fiber_meters, 0);
        assert_eq!(bom.total_points, 4);
    }

    #[test]
    fn models_sort_naturally() {
        let towers = towers(&[
            &[("TORRE", "0"), ("NIVEL", "0"), ("switch_ap", "1"), ("switch_ap_modelo", "AP-10")],
            &[("TORRE", "1"), ("NIVEL", "0"), ("switch_ap", "1"), ("switch_ap_modelo", "AP-9")],
            &[("TORRE", "2"), ("NIVEL", "0"), ("switch_ap", "1"), ("switch_ap_modelo", "AP-9")],
            &[("TORRE", "3"), ("NIVEL", "0"), ("switch_ap", "1")],
        ]);
        let bom = Bom::from_towers(&towers, &sample_settings());
        let ap = bom.switch("SW-AP").unwrap();
        assert_eq!(ap.instances, 4);
        let models: Vec<_> = ap.models.iter().map(|m| (m.model.as_str(), m.count)).collect();
        assert_eq!(models, vec![("AP-9", 2), ("AP-10", 1)]);
        assert_eq!(bom.fiber_meters, 3 * 50);
    }

    #[test]
    fn json_round_trips() {
        let towers = towers(&[&[("TORRE", "0"), ("NIVEL", "0"), ("apQty", "3")]]);
        let bom = Bom::from_towers(&towers, &sample_settings());
        let parsed: Bom = serde_json::from_str(&bom.to_json().unwrap()).unwrap();
        assert_eq!(parsed, bom);
    }
}
