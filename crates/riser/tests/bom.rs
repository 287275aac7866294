#![cfg(not(target_os = "windows"))]

use riser_test_utils::fixtures::{CONFIG_JSON, EMPTY_CSV, TWO_TOWERS_CSV};
use riser_test_utils::sandbox::Sandbox;

fn two_tower_sandbox() -> Sandbox {
    let mut sb = Sandbox::new();
    sb.write("config.json", CONFIG_JSON)
        .write("towers.csv", TWO_TOWERS_CSV);
    sb
}

#[test]
fn test_bom_json() {
    let sb = two_tower_sandbox();
    let stdout = sb.run("riser", ["bom", "-f", "json"]).unwrap();

    let bom: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(bom["project"], "HARBOR");
    assert_eq!(bom["tower_count"], 2);
    assert_eq!(bom["total_points"], 2);
    assert_eq!(bom["utp_meters"], 30);
    assert_eq!(bom["fiber_meters"], 50);

    let switches = bom["switches"].as_array().unwrap();
    assert_eq!(switches.len(), 1);
    assert_eq!(switches[0]["role"], "SW-CORE");
    assert_eq!(switches[0]["instances"], 2);
    assert_eq!(switches[0]["models"][0]["model"], "X1");
}

#[test]
fn test_bom_table() {
    let sb = two_tower_sandbox();
    let stdout = sb.run("riser", ["bom"]).unwrap();
    assert!(stdout.contains("SW-CORE"), "stdout: {stdout}");
    assert!(stdout.contains("X1"), "stdout: {stdout}");
    assert!(!sb.exists("bom.txt"));
}

#[test]
fn test_bom_text_report() {
    let sb = two_tower_sandbox();
    let stdout = sb.run("riser", ["bom", "--format", "text"]).unwrap();

    insta::with_settings!({filters => vec![(r"Generated: .*", "Generated: [TIMESTAMP]")]}, {
        insta::assert_snapshot!(stdout, @r"
============================================================
      BILL OF MATERIALS (BOM) - PROJECT HARBOR
============================================================
Generated: [TIMESTAMP]

--- PROJECT SUMMARY ---
Towers (MDF+IDF): 2
Network points:   2

--- DEVICE TOTALS ---
- AP        : 2 units
- PHONE     : 0 units
- TV        : 0 units
- CAM       : 0 units
- DATA      : 0 units

--- SWITCHES BY ROLE AND MODEL ---
- SW-CORE        : 2 units
    - Model: X1 (1 units)

--- CABLING ESTIMATE ---
- UTP cable CAT6A: ~30 meters
- Fiber optic:     ~50 meters (rough estimate)

--- NOTES ---
- Quantities are taken from the tower inventory file.
- Cable lengths are estimates and must be verified on site.
- Includes 1 centralized UPS in the MDF.
============================================================
");
    });
}

#[test]
fn test_bom_empty_inventory() {
    let mut sb = Sandbox::new();
    sb.write("config.json", CONFIG_JSON)
        .write("towers.csv", EMPTY_CSV);

    let output = sb.run_unchecked("riser", ["bom", "-f", "json"]);
    assert!(output.status.success());
    assert!(output.stdout.is_empty());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("nothing to report"), "stderr: {stderr}");
}

#[test]
fn test_bom_custom_paths() {
    let mut sb = Sandbox::new();
    sb.write("inputs/harbor.json", CONFIG_JSON)
        .write("inputs/harbor.csv", TWO_TOWERS_CSV);

    let stdout = sb
        .run(
            "riser",
            ["bom", "-c", "inputs/harbor.json", "-i", "inputs/harbor.csv", "-f", "json"],
        )
        .unwrap();
    assert!(stdout.contains("\"HARBOR\""));
}
