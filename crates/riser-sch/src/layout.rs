//! Coordinate assignment for towers, levels, switch racks and devices.
//!
//! Towers are laid out left to right in ascending id order, levels bottom to
//! top in ascending id order. Levels are global: every tower that has level
//! 3 draws it at the same height. Racks hang below each tower's lowest level,
//! sorted by role name; devices sit on their level in catalog order.

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;
use thiserror::Error;

use crate::position::Point;
use crate::settings::{IconKind, Settings};
use crate::{LevelId, MDF_TOWER_ID, Tower, TowerId};

/// Nothing to lay out: the merged inventory contains no towers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("no tower data to lay out")]
pub struct NoDataError;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Layout {
    /// Every level observed in any tower, ascending.
    pub levels: Vec<LevelPlacement>,
    /// Towers in ascending id order.
    pub towers: Vec<TowerPlacement>,
    /// Horizontal extent of the level guide lines.
    pub guide_start_x: f64,
    pub guide_end_x: f64,
    /// Baseline for tower name labels, below the lowest level.
    pub tower_label_y: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LevelPlacement {
    pub id: LevelId,
    pub y: f64,
    pub label: String,
    /// Largest device count on this level across towers.
    pub max_device_count: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TowerPlacement {
    pub id: TowerId,
    pub name: String,
    /// Left edge of the tower.
    pub x: f64,
    pub width: f64,
    /// Offset of the tower's lowest level; racks stack below it.
    pub baseline_y: f64,
    pub switches: Vec<SwitchPlacement>,
    /// The tower's levels, ascending.
    pub levels: Vec<TowerLevel>,
}

impl TowerPlacement {
    pub fn is_mdf(&self) -> bool {
        self.id == MDF_TOWER_ID
    }

    pub fn switch(&self, role: &str) -> Option<&SwitchPlacement> {
        self.switches.iter().find(|sw| sw.role == role)
    }

    pub fn label_point(&self, label_y: f64) -> Point {
        Point::new(self.x + self.width / 2.0, label_y)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SwitchPlacement {
    pub role: String,
    pub model: Option<String>,
    /// Lower-left corner of the rack.
    pub origin: Point,
    pub width: f64,
    pub height: f64,
}

impl SwitchPlacement {
    pub fn opposite(&self) -> Point {
        self.origin.offset(self.width, self.height)
    }

    pub fn center(&self) -> Point {
        self.origin.offset(self.width / 2.0, self.height / 2.0)
    }

    /// Right edge midpoint, where UTP trunks terminate.
    pub fn port(&self) -> Point {
        self.origin.offset(self.width, self.height / 2.0)
    }

    /// Bottom edge midpoint, where backbone fiber leaves the rack.
    pub fn uplink(&self) -> Point {
        self.origin.offset(self.width / 2.0, 0.0)
    }

    pub fn label(&self) -> String {
        match &self.model {
            Some(model) => format!("{} ({model})", self.role),
            None => self.role.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TowerLevel {
    pub id: LevelId,
    pub y: f64,
    pub devices: Vec<DevicePlacement>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DevicePlacement {
    pub level_id: LevelId,
    pub key: String,
    pub icon: IconKind,
    pub label: String,
    pub layer: String,
    pub quantity: u64,
    /// Icon anchor: bottom centre of the icon.
    pub origin: Point,
    pub switch_role: Option<String>,
}

impl DevicePlacement {
    pub fn caption(&self) -> String {
        format!("{}x{}", self.quantity, self.label)
    }
}

/// Assign coordinates to every tower, level, rack and device.
pub fn layout(towers: &[Tower], settings: &Settings) -> Result<Layout, NoDataError> {
    if towers.is_empty() {
        return Err(NoDataError);
    }

    let spacing = &settings.spacing;
    let mut ordered: Vec<&Tower> = towers.iter().collect();
    ordered.sort_by_key(|tower| tower.id);

    let levels = level_offsets(&ordered, settings);
    let level_y: BTreeMap<LevelId, f64> = levels.iter().map(|l| (l.id, l.y)).collect();
    let lowest_y = levels.first().map(|l| l.y).unwrap_or(spacing.initial_y);

    let step = spacing.tower_width + spacing.tower_gap;
    let placements: Vec<TowerPlacement> = ordered
        .iter()
        .enumerate()
        .map(|(index, tower)| {
            let x = spacing.initial_x + index as f64 * step;
            place_tower(tower, x, &level_y, settings)
        })
        .collect();

    let last_x = placements.last().map(|t| t.x).unwrap_or(spacing.initial_x);
    log::info!(
        "Laid out {} towers across {} levels",
        placements.len(),
        levels.len()
    );

    Ok(Layout {
        levels,
        towers: placements,
        guide_start_x: spacing.initial_x - spacing.guide_overhang,
        guide_end_x: last_x + spacing.tower_width + spacing.guide_overhang,
        tower_label_y: lowest_y - spacing.tower_label_offset,
    })
}

fn level_offsets(towers: &[&Tower], settings: &Settings) -> Vec<LevelPlacement> {
    let ids: BTreeSet<LevelId> = towers
        .iter()
        .flat_map(|tower| tower.levels.keys().copied())
        .collect();

    let mut y = settings.spacing.initial_y;
    let mut placements = Vec::with_capacity(ids.len());
    for id in ids {
        let max_device_count = towers
            .iter()
            .filter_map(|tower| tower.levels.get(&id))
            .map(|level| level.device_count(settings))
            .max()
            .unwrap_or(0);
        let label = towers
            .iter()
            .filter_map(|tower| tower.levels.get(&id)?.name.clone())
            .next()
            .unwrap_or_else(|| format!("LEVEL {id}"));

        placements.push(LevelPlacement {
            id,
            y,
            label,
            max_device_count,
        });
        y += settings.spacing.levels.increment(max_device_count);
    }
    placements
}

fn place_tower(
    tower: &Tower,
    x: f64,
    level_y: &BTreeMap<LevelId, f64>,
    settings: &Settings,
) -> TowerPlacement {
    let spacing = &settings.spacing;
    let baseline_y = tower
        .lowest_level()
        .and_then(|id| level_y.get(&id).copied())
        .unwrap_or(spacing.initial_y);

    // BTreeMap keys keep racks in role-name order.
    let first_y = baseline_y - spacing.switch_baseline_spacings * spacing.switch_spacing;
    let switches = tower
        .switches
        .iter()
        .enumerate()
        .map(|(index, (role, model))| SwitchPlacement {
            role: role.clone(),
            model: model.clone(),
            origin: Point::new(
                x + spacing.device_inset,
                first_y - index as f64 * spacing.switch_spacing,
            ),
            width: spacing.switch_width,
            height: spacing.switch_height,
        })
        .collect::<Vec<_>>();

    let levels = tower
        .levels
        .values()
        .map(|level| {
            let y = level_y.get(&level.id).copied().unwrap_or(spacing.initial_y);
            let anchor_y = y + spacing.device_y_offset;
            let devices = settings
                .devices
                .iter()
                .filter_map(|device| {
                    let quantity = level.quantity(&device.key);
                    (quantity > 0).then_some((device, quantity))
                })
                .enumerate()
                .map(|(slot, (device, quantity))| DevicePlacement {
                    level_id: level.id,
                    key: device.key.clone(),
                    icon: device.icon,
                    label: device.label.clone(),
                    layer: device.layer.clone(),
                    quantity,
                    origin: Point::new(
                        x + spacing.device_inset + slot as f64 * spacing.device_slot_width,
                        anchor_y,
                    ),
                    switch_role: device.switch_role.clone(),
                })
                .collect();
            TowerLevel {
                id: level.id,
                y,
                devices,
            }
        })
        .collect();

    log::debug!(
        "Tower {} '{}' at x={x} with {} racks",
        tower.id,
        tower.name,
        switches.len()
    );

    TowerPlacement {
        id: tower.id,
        name: tower.name.clone(),
        x,
        width: spacing.tower_width,
        baseline_y,
        switches,
        levels,
    }
}
