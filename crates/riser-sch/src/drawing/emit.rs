use std::collections::BTreeMap;

use super::{DrawOp, Justification};
use crate::LevelId;
use crate::cabling::{CableDrop, Cabling, TowerCabling};
use crate::layout::{Layout, TowerPlacement};
use crate::position::Point;
use crate::settings::{DEFAULT_COLOR, Settings};

/// Translate a layout and its cabling into drawing operations.
///
/// Order: layers, level guides, then per tower its label, racks, devices
/// and trunks, then the backbone, then [`DrawOp::Finalize`].
pub fn emit(settings: &Settings, layout: &Layout, cabling: &Cabling) -> Vec<DrawOp> {
    let mut emitter = Emitter::new(settings);

    emitter.section("Layers");
    for layer in &settings.layers {
        emitter.push(DrawOp::CreateLayer {
            name: layer.name.clone(),
            color: layer.color,
        });
    }

    emitter.level_guides(layout);
    for tower in &layout.towers {
        let tower_cabling = cabling.towers.iter().find(|c| c.tower_id == tower.id);
        emitter.tower(tower, tower_cabling, layout.tower_label_y);
    }
    emitter.backbone(cabling);
    emitter.push(DrawOp::Finalize);

    log::info!("Emitted {} drawing operations", emitter.ops.len());
    emitter.ops
}

struct Emitter<'a> {
    settings: &'a Settings,
    ops: Vec<DrawOp>,
    /// Layer and colour the renderer currently has selected.
    active: Option<(String, u16)>,
}

impl<'a> Emitter<'a> {
    fn new(settings: &'a Settings) -> Self {
        Emitter {
            settings,
            ops: Vec::new(),
            active: None,
        }
    }

    fn push(&mut self, op: DrawOp) {
        self.ops.push(op);
    }

    fn section(&mut self, title: impl Into<String>) {
        self.push(DrawOp::Section {
            title: title.into(),
        });
    }

    fn color_of(&self, layer: &str) -> u16 {
        self.settings.layer_color(layer).unwrap_or(DEFAULT_COLOR)
    }

    fn select(&mut self, layer: &str, color: u16) {
        let unchanged = self
            .active
            .as_ref()
            .is_some_and(|(name, active)| name == layer && *active == color);
        if unchanged {
            return;
        }
        self.active = Some((layer.to_string(), color));
        self.push(DrawOp::SelectLayer {
            name: layer.to_string(),
            color,
        });
    }

    fn select_layer(&mut self, layer: &str) {
        let color = self.color_of(layer);
        self.select(layer, color);
    }

    fn text(&mut self, at: Point, height: f64, text: String, justification: Justification) {
        let layer = self.settings.drawing_layers.text.clone();
        let color = self.color_of(&layer);
        self.active = Some((layer.clone(), color));
        self.push(DrawOp::Text {
            at,
            height,
            text,
            justification,
            layer,
            color,
        });
    }

    fn level_guides(&mut self, layout: &Layout) {
        let settings = self.settings;
        let spacing = &settings.spacing;
        let label_x = layout.guide_start_x - spacing.level_label_gap;
        let height = spacing.level_label_height;
        let levels_layer = &settings.drawing_layers.levels;

        self.section("Level guides");
        for level in &layout.levels {
            self.select_layer(levels_layer);
            self.push(DrawOp::line(
                Point::new(layout.guide_start_x, level.y),
                Point::new(layout.guide_end_x, level.y),
            ));
            self.text(
                Point::new(label_x, level.y),
                height,
                level.label.clone(),
                Justification::MiddleRight,
            );
        }
    }

    fn tower(&mut self, tower: &TowerPlacement, cabling: Option<&TowerCabling>, label_y: f64) {
        let settings = self.settings;
        let spacing = &settings.spacing;
        self.section(format!("Tower {}", tower.name));
        self.text(
            tower.label_point(label_y),
            spacing.tower_label_height,
            tower.name.clone(),
            Justification::Center,
        );

        for rack in &tower.switches {
            self.select_layer(settings.rack_layer(&rack.role));
            self.push(DrawOp::rectangle(rack.origin, rack.opposite()));
            self.text(
                rack.center(),
                spacing.switch_text_height,
                rack.label(),
                Justification::Center,
            );
        }

        let drops: BTreeMap<(LevelId, &str), &CableDrop> = cabling
            .map(|c| c.drops.as_slice())
            .unwrap_or_default()
            .iter()
            .map(|drop| ((drop.level_id, drop.device_key.as_str()), drop))
            .collect();
        let cables_layer = &settings.drawing_layers.cables;

        for level in tower.levels.iter().rev() {
            for device in &level.devices {
                self.select_layer(&device.layer);
                self.ops.extend(device.icon.draw(device.origin));
                self.text(
                    device.origin.offset(0.0, -spacing.device_label_offset),
                    spacing.device_label_height,
                    device.caption(),
                    Justification::Center,
                );
                if let Some(drop) = drops.get(&(level.id, device.key.as_str())) {
                    self.select_layer(cables_layer);
                    self.push(DrawOp::line(drop.from, drop.to));
                }
            }
        }

        let Some(cabling) = cabling else {
            return;
        };
        let unit = &settings.cabling.utp_label;
        for trunk in &cabling.trunks {
            self.select_layer(cables_layer);
            self.push(DrawOp::line(trunk.anchor, trunk.foot));
            self.push(DrawOp::line(trunk.foot, trunk.port));
            self.text(
                trunk
                    .midpoint()
                    .with_x(cabling.channel_x + spacing.trunk_label_gap),
                spacing.trunk_label_height,
                trunk.label(unit),
                Justification::MiddleLeft,
            );
        }
    }

    fn backbone(&mut self, cabling: &Cabling) {
        let settings = self.settings;
        let spacing = &settings.spacing;
        self.section("Backbone cabling");
        for run in &cabling.backbone {
            let style = &run.style;
            self.select(&style.layer, style.color);
            let start = run.channel_start();
            self.push(DrawOp::line(run.mdf_exit, start));

            let Some(end) = run.channel_end() else {
                continue;
            };
            self.push(DrawOp::line(start, end));
            self.text(
                start.midpoint(end).offset(0.0, spacing.backbone_label_gap),
                spacing.backbone_label_height,
                run.label(),
                Justification::Center,
            );
            self.select(&style.layer, style.color);
            for drop in &run.drops {
                self.push(DrawOp::line(drop.channel, drop.uplink));
            }
        }
    }
}
