use std::fmt::Write;

use chrono::NaiveDateTime;

use super::Bom;

const RULE: &str = "============================================================";

impl Bom {
    /// Plain-text BOM report, as written next to the drawing.
    pub fn report(&self, generated_at: NaiveDateTime) -> String {
        let mut out = String::new();
        // Writing into a String cannot fail.
        let _ = self.write_report(&mut out, generated_at);
        out
    }

    fn write_report(&self, out: &mut String, generated_at: NaiveDateTime) -> std::fmt::Result {
        writeln!(out, "{RULE}")?;
        writeln!(out, "      BILL OF MATERIALS (BOM) - PROJECT {}", self.project)?;
        writeln!(out, "{RULE}")?;
        writeln!(out, "Generated: {}", generated_at.format("%Y-%m-%d %H:%M:%S"))?;
        writeln!(out)?;

        writeln!(out, "--- PROJECT SUMMARY ---")?;
        writeln!(out, "Towers (MDF+IDF): {}", self.tower_count)?;
        writeln!(out, "Network points:   {}", self.total_points)?;
        writeln!(out)?;

        writeln!(out, "--- DEVICE TOTALS ---")?;
        for device in &self.devices {
            writeln!(out, "- {:<10}: {} units", device.label, device.quantity)?;
        }
        writeln!(out)?;

        writeln!(out, "--- SWITCHES BY ROLE AND MODEL ---")?;
        for switch in &self.switches {
            writeln!(out, "- {:<15}: {} units", switch.role, switch.instances)?;
            for model in &switch.models {
                writeln!(out, "    - Model: {} ({} units)", model.model, model.count)?;
            }
        }
        writeln!(out)?;

        writeln!(out, "--- CABLING ESTIMATE ---")?;
        writeln!(
            out,
            "- UTP cable {}: ~{} meters",
            self.utp_label,
            group_thousands(self.utp_meters)
        )?;
        writeln!(
            out,
            "- Fiber optic:     ~{} meters (rough estimate)",
            group_thousands(self.fiber_meters)
        )?;
        writeln!(out)?;

        writeln!(out, "--- NOTES ---")?;
        for note in &self.notes {
            writeln!(out, "- {note}")?;
        }
        writeln!(out, "{RULE}")
    }
}

/// `1234567` -> `1,234,567`.
pub fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inventory::{RawRow, merge};
    use crate::settings::tests::sample_settings;
    use chrono::NaiveDate;

    #[test]
    fn thousands_grouping() {
        assert_eq!(group_thousands(0), "0");
        assert_eq!(group_thousands(999), "999");
        assert_eq!(group_thousands(1000), "1,000");
        assert_eq!(group_thousands(1234567), "1,234,567");
    }

    #[test]
    fn report_layout() {
        let rows = [
            RawRow::new(
                2,
                [
                    ("TORRE", "0"),
                    ("NIVEL", "0"),
                    ("switch_core", "1"),
                    ("switch_core_modelo", "X1"),
                ],
            ),
            RawRow::new(3, [("TORRE", "1"), ("NIVEL", "0"), ("apQty", "80"), ("switch_core", "1")]),
        ];
        let towers = merge(rows).towers;
        let bom = Bom::from_towers(&towers, &sample_settings());
        let at = NaiveDate::from_ymd_opt(2024, 5, 1)
            .unwrap()
            .and_hms_opt(9, 30, 0)
            .unwrap();

        insta::assert_snapshot!(bom.report(at), @r"
        ============================================================
              BILL OF MATERIALS (BOM) - PROJECT HARBOR
        ============================================================
        Generated: 2024-05-01 09:30:00

        --- PROJECT SUMMARY ---
        Towers (MDF+IDF): 2
        Network points:   80

        --- DEVICE TOTALS ---
        - AP        : 80 units
        - PHONE     : 0 units
        - TV        : 0 units
        - CAM       : 0 units
        - DATA      : 0 units

        --- SWITCHES BY ROLE AND MODEL ---
        - SW-CORE        : 2 units
            - Model: X1 (1 units)

        --- CABLING ESTIMATE ---
        - UTP cable CAT6A: ~1,200 meters
        - Fiber optic:     ~50 meters (rough estimate)

        --- NOTES ---
        - Quantities are taken from the tower inventory file.
        - Cable lengths are estimates and must be verified on site.
        - Includes 1 centralized UPS in the MDF.
        ============================================================
        ");
    }
}
