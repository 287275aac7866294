use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use riser_sch::inventory;
use riser_sch::{Settings, Tower};

#[derive(Args, Debug, Clone)]
pub struct InputArgs {
    /// Settings file (layers, device catalog, spacing)
    #[arg(short = 'c', long = "config", default_value = "config.json", value_hint = clap::ValueHint::FilePath)]
    pub config: PathBuf,

    /// Tower inventory CSV
    #[arg(short = 'i', long = "inventory", default_value = "towers.csv", value_hint = clap::ValueHint::FilePath)]
    pub inventory: PathBuf,
}

/// Settings plus the merged inventory.
pub struct Inputs {
    pub settings: Settings,
    pub towers: Vec<Tower>,
}

/// Load settings and merge the inventory. Bad rows are logged and skipped;
/// an unreadable config or inventory aborts.
pub fn load(args: &InputArgs) -> Result<Inputs> {
    let settings = Settings::from_path(&args.config)
        .with_context(|| format!("Invalid configuration {}", args.config.display()))?;

    let rows = inventory::read_rows(&args.inventory)
        .with_context(|| format!("Cannot read inventory {}", args.inventory.display()))?;
    let outcome = riser_sch::merge(rows);
    if !outcome.rejected.is_empty() {
        log::warn!(
            "{} inventory rows were skipped, see warnings above",
            outcome.rejected.len()
        );
    }

    Ok(Inputs {
        settings,
        towers: outcome.towers,
    })
}
