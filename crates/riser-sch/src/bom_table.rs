use std::io::{self, Write};

use comfy_table::{Cell, CellAlignment, Color, Table};

use crate::Bom;
use crate::bom::group_thousands;

impl Bom {
    /// Write the BOM as formatted tables to the given writer
    pub fn write_table<W: Write>(&self, mut writer: W) -> io::Result<()> {
        writeln!(
            writer,
            "{}: {} towers, {} network points",
            self.project, self.tower_count, self.total_points
        )?;

        let mut devices = Table::new();
        devices.load_preset(comfy_table::presets::UTF8_FULL_CONDENSED);
        devices.set_content_arrangement(comfy_table::ContentArrangement::DynamicFullWidth);
        devices.set_header(vec!["Device", "Column", "Qty"]);
        for device in &self.devices {
            // Zero rows stay visible so missing columns are easy to spot
            let qty = Cell::new(device.quantity).set_alignment(CellAlignment::Right);
            let qty = if device.quantity == 0 {
                qty.fg(Color::DarkGrey)
            } else {
                qty
            };
            devices.add_row(vec![
                Cell::new(&device.label),
                Cell::new(&device.key),
                qty,
            ]);
        }
        writeln!(writer, "{devices}")?;

        let mut switches = Table::new();
        switches.load_preset(comfy_table::presets::UTF8_FULL_CONDENSED);
        switches.set_content_arrangement(comfy_table::ContentArrangement::DynamicFullWidth);
        switches.set_header(vec!["Switch", "Qty", "Models"]);
        for switch in &self.switches {
            let models = switch
                .models
                .iter()
                .map(|m| format!("{} x{}", m.model, m.count))
                .collect::<Vec<_>>()
                .join(", ");
            // Instances without a model are highlighted
            let known: u64 = switch.models.iter().map(|m| m.count).sum();
            let role = if known < switch.instances {
                Cell::new(&switch.role).fg(Color::Yellow)
            } else {
                Cell::new(&switch.role)
            };
            switches.add_row(vec![
                role,
                Cell::new(switch.instances).set_alignment(CellAlignment::Right),
                Cell::new(models),
            ]);
        }
        writeln!(writer, "{switches}")?;

        writeln!(
            writer,
            "UTP {}: ~{} m    Fiber: ~{} m",
            self.utp_label,
            group_thousands(self.utp_meters),
            group_thousands(self.fiber_meters)
        )?;
        Ok(())
    }
}
