use std::io::{self, Write};

use anyhow::Result;
use clap::{Args, ValueEnum};
use riser_sch::Bom;

use crate::inputs::{self, InputArgs};

#[derive(ValueEnum, Debug, Clone, Default)]
pub enum BomFormat {
    #[default]
    Table,
    Json,
    Text,
}

impl std::fmt::Display for BomFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BomFormat::Table => write!(f, "table"),
            BomFormat::Json => write!(f, "json"),
            BomFormat::Text => write!(f, "text"),
        }
    }
}

#[derive(Args, Debug, Clone)]
#[command(about = "Print the bill of materials for a tower inventory")]
pub struct BomArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Output format
    #[arg(short, long, default_value_t = BomFormat::Table)]
    pub format: BomFormat,
}

pub fn execute(args: BomArgs) -> Result<()> {
    let inputs = inputs::load(&args.input)?;
    if inputs.towers.is_empty() {
        log::warn!(
            "No tower data in {}, nothing to report",
            args.input.inventory.display()
        );
        return Ok(());
    }

    let bom = Bom::from_towers(&inputs.towers, &inputs.settings);
    let mut writer = io::stdout().lock();
    match args.format {
        BomFormat::Json => writeln!(writer, "{}", bom.to_json()?)?,
        BomFormat::Table => bom.write_table(writer)?,
        BomFormat::Text => write!(
            writer,
            "{}",
            bom.report(chrono::Local::now().naive_local())
        )?,
    };

    Ok(())
}
