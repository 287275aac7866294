#[cfg(all(feature = "mimalloc", not(target_family = "wasm")))]
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::PathBuf;

mod bom;
mod build;
mod inputs;
mod logging;

#[derive(Parser)]
#[command(name = "riser")]
#[command(about = "Riser diagrams and bills of materials for tower network inventories", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable debug logging
    #[arg(short = 'd', long = "debug", global = true)]
    debug: bool,

    /// Also write log records to this file
    #[arg(long = "log-file", global = true, value_name = "PATH")]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate the AutoLISP riser drawing and the BOM report
    #[command(alias = "b")]
    Build(build::BuildArgs),

    /// Print the bill of materials
    Bom(bom::BomArgs),
}

fn main() {
    if let Err(e) = run() {
        eprintln!("{} {e}", "Error:".red());
        for cause in e.chain().skip(1) {
            eprintln!("  {cause}");
        }
        std::process::exit(1);
    }
}

fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Held until the end of the run so buffered records reach the log file
    let _log = logging::LogSession::init(cli.debug, cli.log_file.as_deref())?;

    match cli.command {
        Commands::Build(args) => build::execute(args),
        Commands::Bom(args) => bom::execute(args),
    }
}
