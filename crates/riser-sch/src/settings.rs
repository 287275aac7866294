//! Drawing and BOM settings.
//!
//! Settings are loaded from a JSON document and validated once up front, so
//! the rest of the pipeline can treat layer names, the device catalog and
//! spacing constants as trusted.

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// AutoCAD colour index used when a layer has no explicit colour.
pub const DEFAULT_COLOR: u16 = 7;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read settings file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid settings JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("device catalog is empty")]
    EmptyCatalog,

    #[error("layer '{0}' is defined more than once")]
    DuplicateLayer(String),

    #[error("device type '{0}' is defined more than once")]
    DuplicateDevice(String),

    #[error("{context} references unknown layer '{layer}'")]
    UnknownLayer { context: String, layer: String },

    #[error("spacing.{field} must be positive, got {value}")]
    NonPositive { field: &'static str, value: f64 },

    #[error("spacing.{field} must be a finite value of zero or more, got {value}")]
    Negative { field: &'static str, value: f64 },
}

/// Closed set of icon templates a device type can be drawn with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum IconKind {
    #[serde(rename = "ap")]
    AccessPoint,
    #[serde(rename = "phone")]
    Phone,
    #[serde(rename = "tv")]
    Television,
    #[serde(rename = "camera")]
    Camera,
    #[serde(rename = "data")]
    DataOutlet,
}

/// One entry of the device-type catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceType {
    /// Inventory column holding the quantity, e.g. `apQty`.
    pub key: String,
    pub icon: IconKind,
    pub label: String,
    pub layer: String,
    /// Switch role the device is cabled to, e.g. `SW-AP`.
    #[serde(default, rename = "switch", skip_serializing_if = "Option::is_none")]
    pub switch_role: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayerDef {
    pub name: String,
    pub color: u16,
}

/// How a backbone run for one switch role is drawn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackboneStyle {
    pub layer: String,
    pub color: u16,
    pub label: String,
}

impl Default for BackboneStyle {
    fn default() -> Self {
        BackboneStyle {
            layer: "Fiber_Data".to_string(),
            color: 1,
            label: "FO".to_string(),
        }
    }
}

/// Fixed layers used by the drawing independently of the device catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DrawingLayers {
    pub levels: String,
    pub text: String,
    pub switches: String,
    pub cables: String,
}

impl Default for DrawingLayers {
    fn default() -> Self {
        DrawingLayers {
            levels: "Levels".to_string(),
            text: "Text".to_string(),
            switches: "Switches".to_string(),
            cables: "UTP_Cables".to_string(),
        }
    }
}

/// Vertical distance between consecutive levels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum LevelSpacing {
    Fixed {
        increment: f64,
    },
    /// Grows the gap above dense levels so their icons do not overlap.
    Dynamic {
        base_increment: f64,
        threshold: u64,
        per_device_increment: f64,
    },
}

impl LevelSpacing {
    /// Increment applied above a level whose densest tower holds
    /// `max_device_count` devices.
    pub fn increment(&self, max_device_count: u64) -> f64 {
        match *self {
            LevelSpacing::Fixed { increment } => increment,
            LevelSpacing::Dynamic {
                base_increment,
                threshold,
                per_device_increment,
            } => {
                let excess = max_device_count.saturating_sub(threshold);
                base_increment + excess as f64 * per_device_increment
            }
        }
    }

    fn base(&self) -> f64 {
        match *self {
            LevelSpacing::Fixed { increment } => increment,
            LevelSpacing::Dynamic { base_increment, .. } => base_increment,
        }
    }

    /// Growth per device above the threshold; zero for fixed spacing.
    fn growth(&self) -> f64 {
        match *self {
            LevelSpacing::Fixed { .. } => 0.0,
            LevelSpacing::Dynamic {
                per_device_increment,
                ..
            } => per_device_increment,
        }
    }
}

impl Default for LevelSpacing {
    fn default() -> Self {
        LevelSpacing::Dynamic {
            base_increment: 300.0,
            threshold: 10,
            per_device_increment: 5.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Spacing {
    pub initial_x: f64,
    pub initial_y: f64,
    pub tower_width: f64,
    pub tower_gap: f64,
    pub levels: LevelSpacing,

    pub device_inset: f64,
    pub device_slot_width: f64,
    pub device_y_offset: f64,
    pub device_label_offset: f64,
    pub device_label_height: f64,

    pub switch_width: f64,
    pub switch_height: f64,
    pub switch_text_height: f64,
    pub switch_spacing: f64,
    /// Gap between a tower's lowest level and its first rack, in spacings.
    pub switch_baseline_spacings: f64,

    pub tower_label_offset: f64,
    pub tower_label_height: f64,
    pub level_label_height: f64,
    pub level_label_gap: f64,
    pub guide_overhang: f64,

    pub trunk_offset_x: f64,
    pub trunk_label_gap: f64,
    pub trunk_label_height: f64,

    pub backbone_offset_y: f64,
    pub backbone_lane_spacing: f64,
    pub backbone_label_gap: f64,
    pub backbone_label_height: f64,
}

impl Default for Spacing {
    fn default() -> Self {
        Spacing {
            initial_x: 0.0,
            initial_y: 0.0,
            tower_width: 600.0,
            tower_gap: 300.0,
            levels: LevelSpacing::default(),

            device_inset: 50.0,
            device_slot_width: 70.0,
            device_y_offset: 40.0,
            device_label_offset: 20.0,
            device_label_height: 10.0,

            switch_width: 150.0,
            switch_height: 30.0,
            switch_text_height: 8.0,
            switch_spacing: 60.0,
            switch_baseline_spacings: 2.0,

            tower_label_offset: 60.0,
            tower_label_height: 20.0,
            level_label_height: 15.0,
            level_label_gap: 10.0,
            guide_overhang: 100.0,

            trunk_offset_x: 40.0,
            trunk_label_gap: 5.0,
            trunk_label_height: 8.0,

            backbone_offset_y: 400.0,
            backbone_lane_spacing: 30.0,
            backbone_label_gap: 5.0,
            backbone_label_height: 8.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CablingSettings {
    /// Unit printed on UTP trunk labels and in the BOM.
    pub utp_label: String,
    pub meters_per_point: u64,
    pub fiber_meters_per_link: u64,
}

impl Default for CablingSettings {
    fn default() -> Self {
        CablingSettings {
            utp_label: "CAT6A".to_string(),
            meters_per_point: 15,
            fiber_meters_per_link: 50,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default = "default_project")]
    pub project: String,
    /// Layers in creation order.
    pub layers: Vec<LayerDef>,
    /// Device-type catalog in drawing order.
    pub devices: Vec<DeviceType>,
    /// Backbone style per switch role.
    #[serde(default)]
    pub switches: BTreeMap<String, BackboneStyle>,
    #[serde(default)]
    pub backbone_default: BackboneStyle,
    #[serde(default)]
    pub drawing_layers: DrawingLayers,
    /// Switch role -> layer for its rack, overriding `drawing_layers.switches`.
    #[serde(default)]
    pub rack_layers: BTreeMap<String, String>,
    #[serde(default)]
    pub spacing: Spacing,
    #[serde(default)]
    pub cabling: CablingSettings,
    #[serde(default = "default_notes")]
    pub notes: Vec<String>,
}

fn default_project() -> String {
    "RISER".to_string()
}

fn default_notes() -> Vec<String> {
    vec![
        "Quantities are taken from the tower inventory file.".to_string(),
        "Cable lengths are estimates and must be verified on site.".to_string(),
        "Includes 1 centralized UPS in the MDF.".to_string(),
    ]
}

impl Settings {
    /// Parse settings from a JSON string and validate them.
    pub fn from_json_str(json: &str) -> Result<Self, SettingsError> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn from_path(path: &Path) -> Result<Self, SettingsError> {
        let json = std::fs::read_to_string(path).map_err(|source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        log::info!("Loading settings from {}", path.display());
        Self::from_json_str(&json)
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.devices.is_empty() {
            return Err(SettingsError::EmptyCatalog);
        }

        let mut layers = BTreeSet::new();
        for layer in &self.layers {
            if !layers.insert(layer.name.as_str()) {
                return Err(SettingsError::DuplicateLayer(layer.name.clone()));
            }
        }

        let mut keys = BTreeSet::new();
        for device in &self.devices {
            if !keys.insert(device.key.as_str()) {
                return Err(SettingsError::DuplicateDevice(device.key.clone()));
            }
        }

        let check = |context: String, layer: &str| {
            if layers.contains(layer) {
                Ok(())
            } else {
                Err(SettingsError::UnknownLayer {
                    context,
                    layer: layer.to_string(),
                })
            }
        };

        for device in &self.devices {
            check(format!("device '{}'", device.key), &device.layer)?;
        }
        for (role, style) in &self.switches {
            check(format!("switch '{role}'"), &style.layer)?;
        }
        for (role, layer) in &self.rack_layers {
            check(format!("rack layer for '{role}'"), layer)?;
        }
        check("backbone_default".to_string(), &self.backbone_default.layer)?;
        let fixed = &self.drawing_layers;
        check("drawing_layers.levels".to_string(), &fixed.levels)?;
        check("drawing_layers.text".to_string(), &fixed.text)?;
        check("drawing_layers.switches".to_string(), &fixed.switches)?;
        check("drawing_layers.cables".to_string(), &fixed.cables)?;

        let spacing = &self.spacing;
        for (field, value) in [
            ("tower_width", spacing.tower_width),
            ("device_slot_width", spacing.device_slot_width),
            ("switch_spacing", spacing.switch_spacing),
            ("levels", spacing.levels.base()),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(SettingsError::NonPositive { field, value });
            }
        }
        // Levels must only ever stack upward.
        let growth = spacing.levels.growth();
        if !growth.is_finite() || growth < 0.0 {
            return Err(SettingsError::Negative {
                field: "levels.per_device_increment",
                value: growth,
            });
        }

        Ok(())
    }

    pub fn layer_color(&self, name: &str) -> Option<u16> {
        self.layers
            .iter()
            .find(|layer| layer.name == name)
            .map(|layer| layer.color)
    }

    pub fn backbone_style(&self, role: &str) -> &BackboneStyle {
        self.switches.get(role).unwrap_or(&self.backbone_default)
    }

    pub fn rack_layer(&self, role: &str) -> &str {
        self.rack_layers
            .get(role)
            .map(String::as_str)
            .unwrap_or(&self.drawing_layers.switches)
    }
}
