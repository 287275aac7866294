//! Intra-tower UTP trunks and inter-tower fiber backbone runs.
//!
//! Each device whose catalog entry names a switch role present in its tower
//! gets a horizontal drop to the tower's trunk channel. Drops for the same
//! role are consolidated into one trunk running down the channel to the
//! rack's port. Backbone runs connect every IDF instance of a role to the
//! MDF instance through a shared horizontal channel below the drawing.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::layout::{Layout, SwitchPlacement, TowerPlacement};
use crate::position::Point;
use crate::settings::{BackboneStyle, Settings};
use crate::{LevelId, TowerId};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Cabling {
    /// Per-tower UTP cabling, ascending tower id.
    pub towers: Vec<TowerCabling>,
    /// Fiber runs, one per MDF switch role, in lane order.
    pub backbone: Vec<BackboneRun>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TowerCabling {
    pub tower_id: TowerId,
    pub channel_x: f64,
    /// Device drops in emission order (levels top-down, catalog order).
    pub drops: Vec<CableDrop>,
    /// One trunk per switch role, ordered by first drop.
    pub trunks: Vec<Trunk>,
}

/// A device's patch to the trunk channel.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CableDrop {
    pub level_id: LevelId,
    pub device_key: String,
    pub role: String,
    pub quantity: u64,
    pub from: Point,
    pub to: Point,
}

/// Consolidated UTP run for one (tower, switch role).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Trunk {
    pub role: String,
    /// Connections terminated on the rack through this trunk.
    pub count: u64,
    /// Top of the trunk: the channel point of the first drop seen.
    pub anchor: Point,
    /// Bottom of the trunk, level with the rack port.
    pub foot: Point,
    pub port: Point,
}

impl Trunk {
    pub fn label(&self, unit: &str) -> String {
        format!("{}x{unit}", self.count)
    }

    pub fn midpoint(&self) -> Point {
        self.anchor.midpoint(self.foot)
    }
}

/// Fiber run for one MDF switch role.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BackboneRun {
    pub role: String,
    pub style: BackboneStyle,
    /// Uplink of the MDF rack.
    pub mdf_exit: Point,
    pub channel_y: f64,
    /// IDF connections, ascending tower id. Empty when no IDF has the role.
    pub drops: Vec<BackboneDrop>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BackboneDrop {
    pub tower_id: TowerId,
    /// Point on the shared channel below the IDF rack.
    pub channel: Point,
    pub uplink: Point,
}

impl BackboneRun {
    pub fn channel_start(&self) -> Point {
        self.mdf_exit.with_y(self.channel_y)
    }

    /// Channel end, below the last connected IDF.
    pub fn channel_end(&self) -> Option<Point> {
        self.drops.last().map(|drop| drop.channel)
    }

    pub fn label(&self) -> String {
        format!("{}x {}", self.drops.len(), self.style.label)
    }
}

/// Build trunks and backbone runs from placed towers.
pub fn aggregate(layout: &Layout, settings: &Settings) -> Cabling {
    let towers: Vec<TowerCabling> = layout
        .towers
        .iter()
        .map(|tower| tower_cabling(tower, settings))
        .collect();
    let backbone = backbone(layout, settings);

    log::info!(
        "Aggregated {} trunks and {} backbone runs",
        towers.iter().map(|t| t.trunks.len()).sum::<usize>(),
        backbone.len()
    );
    Cabling { towers, backbone }
}

fn tower_cabling(tower: &TowerPlacement, settings: &Settings) -> TowerCabling {
    let channel_x = tower.x + tower.width + settings.spacing.trunk_offset_x;
    let mut drops = Vec::new();
    let mut trunks: Vec<Trunk> = Vec::new();

    for level in tower.levels.iter().rev() {
        for device in &level.devices {
            let Some(role) = device.switch_role.as_deref() else {
                continue;
            };
            let Some(rack) = tower.switch(role) else {
                log::debug!(
                    "Tower {}: no {role} rack for {}, not cabled",
                    tower.id,
                    device.key
                );
                continue;
            };

            let channel = device.origin.with_x(channel_x);
            drops.push(CableDrop {
                level_id: level.id,
                device_key: device.key.clone(),
                role: role.to_string(),
                quantity: device.quantity,
                from: device.origin,
                to: channel,
            });

            match trunks.iter_mut().find(|trunk| trunk.role == role) {
                Some(trunk) => trunk.count += device.quantity,
                None => trunks.push(new_trunk(rack, channel, device.quantity)),
            }
        }
    }

    TowerCabling {
        tower_id: tower.id,
        channel_x,
        drops,
        trunks,
    }
}

fn new_trunk(rack: &SwitchPlacement, anchor: Point, quantity: u64) -> Trunk {
    let port = rack.port();
    Trunk {
        role: rack.role.clone(),
        count: quantity,
        anchor,
        foot: port.with_x(anchor.x),
        port,
    }
}

fn backbone(layout: &Layout, settings: &Settings) -> Vec<BackboneRun> {
    let spacing = &settings.spacing;
    let Some(mdf) = layout.towers.iter().find(|tower| tower.is_mdf()) else {
        if layout.towers.len() > 1 {
            log::warn!("No MDF tower (id 0) in inventory, skipping backbone cabling");
        }
        return Vec::new();
    };

    let mut racks: Vec<&SwitchPlacement> = mdf.switches.iter().collect();
    racks.sort_by(|a, b| {
        a.uplink()
            .y
            .total_cmp(&b.uplink().y)
            .then_with(|| a.role.cmp(&b.role))
    });

    let mut channel_y =
        spacing.initial_y - spacing.tower_label_offset - spacing.backbone_offset_y;
    let mut runs = Vec::with_capacity(racks.len());
    for rack in racks {
        let drops: Vec<BackboneDrop> = layout
            .towers
            .iter()
            .filter(|tower| !tower.is_mdf())
            .filter_map(|tower| {
                let uplink = tower.switch(&rack.role)?.uplink();
                Some(BackboneDrop {
                    tower_id: tower.id,
                    channel: uplink.with_y(channel_y),
                    uplink,
                })
            })
            .collect();

        log::debug!("Backbone {}: {} IDF connections", rack.role, drops.len());
        runs.push(BackboneRun {
            role: rack.role.clone(),
            style: settings.backbone_style(&rack.role).clone(),
            mdf_exit: rack.uplink(),
            channel_y,
            drops,
        });
        channel_y -= spacing.backbone_lane_spacing;
    }
    runs
}

/// Trunk counts per (tower, role), for checks against the inventory.
pub fn trunk_totals(cabling: &Cabling) -> BTreeMap<(TowerId, String), u64> {
    cabling
        .towers
        .iter()
        .flat_map(|tower| {
            tower
                .trunks
                .iter()
                .map(move |trunk| ((tower.tower_id, trunk.role.clone()), trunk.count))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Tower;
    use crate::layout::layout;
    use crate::layout::tests::sample_towers;
    use crate::settings::tests::sample_settings;

    fn cabled(towers: &[Tower]) -> Cabling {
        let settings = sample_settings();
        let layout = layout(towers, &settings).unwrap();
        aggregate(&layout, &settings)
    }

    #[test]
    fn trunk_counts_match_inventory() {
        let settings = sample_settings();
        let towers = sample_towers();
        let cabling = cabled(&towers);
        let totals = trunk_totals(&cabling);

        for tower in &towers {
            for role in tower.switches.keys() {
                let expected: u64 = tower
                    .levels
                    .values()
                    .flat_map(|level| {
                        settings
                            .devices
                            .iter()
                            .filter(|d| d.switch_role.as_deref() == Some(role.as_str()))
                            .map(move |d| level.quantity(&d.key))
                    })
                    .sum();
                let actual = totals.get(&(tower.id, role.clone())).copied().unwrap_or(0);
                assert_eq!(actual, expected, "tower {} role {role}", tower.id);
            }
        }
        assert_eq!(totals.get(&(1, "SW-AP".to_string())), Some(&6));
        assert_eq!(totals.get(&(1, "SW-CORE".to_string())), Some(&3));
    }

    #[test]
    fn anchor_is_first_drop_from_top() {
        let cabling = cabled(&sample_towers());
        let idf1 = &cabling.towers[1];
        assert_eq!(idf1.channel_x, 900.0 + 600.0 + 40.0);

        let ap = idf1.trunks.iter().find(|t| t.role == "SW-AP").unwrap();
        // Level 2 sits at y=600, devices 40 above it.
        assert_eq!(ap.anchor, Point::new(1540.0, 640.0));
        assert_eq!(ap.foot.x, 1540.0);
        assert_eq!(ap.foot.y, ap.port.y);
        assert_eq!(ap.label("CAT6A"), "6xCAT6A");

        let roles: Vec<_> = idf1.trunks.iter().map(|t| t.role.as_str()).collect();
        assert_eq!(roles, vec!["SW-AP", "SW-CORE"]);
        // datQty has no switch: three cabled device groups in total.
        assert_eq!(idf1.drops.len(), 3);
    }

    #[test]
    fn devices_without_rack_are_not_cabled() {
        let cabling = cabled(&sample_towers());
        let idf2 = &cabling.towers[2];
        assert!(idf2.drops.is_empty());
        assert!(idf2.trunks.is_empty());
    }

    #[test]
    fn backbone_connects_each_idf_once() {
        let cabling = cabled(&sample_towers());
        let runs: Vec<_> = cabling
            .backbone
            .iter()
            .map(|run| {
                let ids: Vec<_> = run.drops.iter().map(|d| d.tower_id).collect();
                (run.role.as_str(), run.channel_y, ids)
            })
            .collect();

        // SW-CORE sits lower in the MDF so its lane comes first.
        assert_eq!(
            runs,
            vec![("SW-CORE", -460.0, vec![1]), ("SW-AP", -490.0, vec![1])]
        );

        let ap = &cabling.backbone[1];
        assert_eq!(ap.label(), "1x FO-AP");
        assert_eq!(ap.channel_start(), Point::new(125.0, -490.0));
        assert_eq!(ap.channel_end(), Some(Point::new(1025.0, -490.0)));
        assert_eq!(cabling.backbone[0].style.label, "FO");
    }

    #[test]
    fn no_backbone_without_mdf() {
        let towers: Vec<Tower> = sample_towers()
            .into_iter()
            .filter(|tower| !tower.is_mdf())
            .collect();
        let cabling = cabled(&towers);
        assert!(cabling.backbone.is_empty());
        assert_eq!(cabling.towers.len(), 2);
    }
}
