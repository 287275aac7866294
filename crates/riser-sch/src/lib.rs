//! Riser schematic generation for multi-tower network inventories.
//!
//! The crate turns a tabular inventory (rows keyed by tower and level) into
//! two artifacts:
//!
//! * an ordered stream of abstract [`drawing::DrawOp`]s describing the riser
//!   diagram (level guides, switch racks, device icons, UTP trunks and the
//!   fiber backbone), rendered to a concrete CAD syntax by a separate crate;
//! * a [`bom::Bom`] aggregating device and switch counts with cabling
//!   estimates.
//!
//! The pipeline is a single synchronous pass:
//!
//! ```text
//! rows -> inventory::merge -> layout::layout -> cabling::aggregate -> drawing::emit
//!                         \-> bom::Bom::from_towers
//! ```
//!
//! Every stage after the merge is a pure function of its inputs, so the same
//! inventory and [`settings::Settings`] always produce identical output.

pub mod bom;
#[cfg(feature = "table")]
mod bom_table;
pub mod cabling;
pub mod drawing;
pub mod inventory;
pub mod layout;
pub mod position;
pub mod settings;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

pub use crate::bom::Bom;
pub use crate::drawing::DrawOp;
pub use crate::inventory::{InventoryError, MalformedRowError, MergeOutcome, RawRow, merge};
pub use crate::layout::{Layout, NoDataError};
pub use crate::position::Point;
pub use crate::settings::{Settings, SettingsError};

/// Tower identifier as it appears in the inventory.
pub type TowerId = i64;

/// Level identifier. Shared across towers: the same id is the same floor.
pub type LevelId = i64;

/// The main distribution frame is always tower 0.
pub const MDF_TOWER_ID: TowerId = 0;

/// A single floor of a tower after merging every inventory row for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Level {
    pub id: LevelId,
    /// Display name override (`nivel_nombre`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Quantity columns (`*Qty` and switch indicators), summed across rows.
    #[serde(default)]
    pub quantities: BTreeMap<String, u64>,
    /// Remaining string columns (`*_modelo`, `*_nombre`), last write wins.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub attributes: BTreeMap<String, String>,
}

impl Level {
    pub fn new(id: LevelId) -> Self {
        Level {
            id,
            name: None,
            quantities: BTreeMap::new(),
            attributes: BTreeMap::new(),
        }
    }

    /// Quantity recorded for `key`, zero when the column never appeared.
    pub fn quantity(&self, key: &str) -> u64 {
        self.quantities.get(key).copied().unwrap_or(0)
    }

    /// Sum of the quantities of every catalog device type on this level.
    ///
    /// Switch indicator columns are not devices and are not counted.
    pub fn device_count(&self, settings: &Settings) -> u64 {
        settings
            .devices
            .iter()
            .map(|device| self.quantity(&device.key))
            .sum()
    }
}

/// A tower (MDF or IDF) with its levels and switch assignments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tower {
    pub id: TowerId,
    pub name: String,
    pub levels: BTreeMap<LevelId, Level>,
    /// Switch role (e.g. `SW-CORE`) -> model, when one was given.
    pub switches: BTreeMap<String, Option<String>>,
}

impl Tower {
    pub fn new(id: TowerId) -> Self {
        Tower {
            id,
            name: String::new(),
            levels: BTreeMap::new(),
            switches: BTreeMap::new(),
        }
    }

    pub fn is_mdf(&self) -> bool {
        self.id == MDF_TOWER_ID
    }

    pub fn lowest_level(&self) -> Option<LevelId> {
        self.levels.keys().next().copied()
    }

    pub fn has_switch(&self, role: &str) -> bool {
        self.switches.contains_key(role)
    }
}

/// Lay out, cable and emit the drawing for already merged towers.
pub fn draw(settings: &Settings, towers: &[Tower]) -> Result<Vec<DrawOp>, NoDataError> {
    let layout = layout::layout(towers, settings)?;
    let cabling = cabling::aggregate(&layout, settings);
    Ok(drawing::emit(settings, &layout, &cabling))
}
