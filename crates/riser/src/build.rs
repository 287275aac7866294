use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use atomicwrites::{AtomicFile, OverwriteBehavior};
use clap::Args;
use colored::Colorize;
use riser_sch::{Bom, NoDataError};

use crate::inputs::{self, InputArgs};

#[derive(Args, Debug, Clone)]
#[command(about = "Generate the AutoLISP riser drawing and the BOM report")]
pub struct BuildArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Directory the drawing and BOM are written to
    #[arg(short = 'o', long = "out-dir", default_value = ".", value_hint = clap::ValueHint::DirPath)]
    pub out_dir: PathBuf,

    /// Drawing script file name, relative to the output directory
    #[arg(long = "drawing", default_value = "network_drawing.lsp")]
    pub drawing: PathBuf,

    /// BOM report file name, relative to the output directory
    #[arg(long = "bom", default_value = "bom.txt")]
    pub bom: PathBuf,

    /// Also write the drawing operations as JSON to this path
    #[arg(long = "ops", value_name = "PATH")]
    pub ops: Option<PathBuf>,
}

pub fn execute(args: BuildArgs) -> Result<()> {
    log::info!("Starting riser build");
    let inputs = inputs::load(&args.input)?;
    let settings = &inputs.settings;

    let ops = match riser_sch::draw(settings, &inputs.towers) {
        Ok(ops) => ops,
        Err(NoDataError) => {
            log::warn!(
                "No tower data in {}, nothing to draw",
                args.input.inventory.display()
            );
            return Ok(());
        }
    };
    let script = riser_lisp::render(&settings.project, &ops);
    let report = Bom::from_towers(&inputs.towers, settings)
        .report(chrono::Local::now().naive_local());
    let ops_json = args
        .ops
        .as_ref()
        .map(|_| serde_json::to_string_pretty(&ops))
        .transpose()
        .context("Failed to serialize drawing ops")?;

    // Nothing is written until every output has been produced
    fs::create_dir_all(&args.out_dir).with_context(|| {
        format!("Failed to create output directory {}", args.out_dir.display())
    })?;
    let drawing_path = args.out_dir.join(&args.drawing);
    let bom_path = args.out_dir.join(&args.bom);
    write_output(&drawing_path, &script)?;
    write_output(&bom_path, &report)?;
    if let (Some(path), Some(json)) = (&args.ops, &ops_json) {
        write_output(path, json)?;
    }

    println!(
        "{} {} towers drawn to {}",
        "✓".green().bold(),
        inputs.towers.len(),
        drawing_path.display()
    );
    println!("{} BOM written to {}", "✓".green().bold(), bom_path.display());
    log::info!("Riser build complete");
    Ok(())
}

fn write_output(path: &Path, contents: &str) -> Result<()> {
    AtomicFile::new(path, OverwriteBehavior::AllowOverwrite)
        .write(|f| {
            f.write_all(contents.as_bytes())?;
            f.flush()
        })
        .map_err(|err| anyhow::anyhow!("Failed to write {}: {err}", path.display()))?;
    log::info!("Wrote {}", path.display());
    Ok(())
}
