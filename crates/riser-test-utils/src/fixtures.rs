//! Shared inputs for CLI tests.

/// A complete settings file with the five icon kinds and two backbone styles.
pub const CONFIG_JSON: &str = r#"{
    "project": "HARBOR",
    "layers": [
        {"name": "Levels", "color": 8},
        {"name": "Text", "color": 7},
        {"name": "Switches", "color": 5},
        {"name": "UPS", "color": 1},
        {"name": "UTP_Cables", "color": 3},
        {"name": "Fiber_Data", "color": 1},
        {"name": "Fiber_AP", "color": 4},
        {"name": "APs", "color": 4},
        {"name": "Phones", "color": 2},
        {"name": "TVs", "color": 6},
        {"name": "Cameras", "color": 30},
        {"name": "Data", "color": 1}
    ],
    "devices": [
        {"key": "apQty", "icon": "ap", "label": "AP", "layer": "APs", "switch": "SW-AP"},
        {"key": "telQty", "icon": "phone", "label": "PHONE", "layer": "Phones", "switch": "SW-CORE"},
        {"key": "tvQty", "icon": "tv", "label": "TV", "layer": "TVs", "switch": "SW-CORE"},
        {"key": "camQty", "icon": "camera", "label": "CAM", "layer": "Cameras", "switch": "SW-CCTV"},
        {"key": "datQty", "icon": "data", "label": "DATA", "layer": "Data"}
    ],
    "switches": {
        "SW-AP": {"layer": "Fiber_AP", "color": 4, "label": "FO-AP"}
    },
    "rack_layers": {"SW-UPS": "UPS"},
    "spacing": {
        "levels": {"mode": "dynamic", "base_increment": 300, "threshold": 10, "per_device_increment": 5}
    }
}
"#;

/// The two-tower scenario: an MDF with a core switch and one IDF with APs.
pub const TWO_TOWERS_CSV: &str = "\
TORRE,NIVEL,torre_nombre,nivel_nombre,apQty,switch_core,switch_core_modelo
0,0,MDF,,,1,X1
1,0,IDF1,,2,1,
";

/// Header only.
pub const EMPTY_CSV: &str = "TORRE,NIVEL,torre_nombre,apQty\n";
