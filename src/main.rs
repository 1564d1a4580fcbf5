use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing::error;

use schedule_reflow::loader;
use schedule_reflow::logging;
use schedule_reflow::reflow::reflow;

/// Reflow a manufacturing schedule against shifts, maintenance windows,
/// work-center exclusivity and dependencies.
#[derive(Parser)]
#[command(name = "schedule-reflow", version)]
struct Cli {
    /// Work center documents (JSON array)
    #[arg(long, value_name = "FILE")]
    work_centers: PathBuf,

    /// Work order documents (JSON array)
    #[arg(long, value_name = "FILE")]
    work_orders: PathBuf,

    /// Pretty-print the result
    #[arg(long)]
    pretty: bool,
}

fn run(cli: &Cli) -> Result<String, Box<dyn std::error::Error>> {
    let centers = loader::load_work_centers(&cli.work_centers)?;
    let orders = loader::load_work_orders(&cli.work_orders)?;

    let outcome = reflow(&centers, &orders)?;

    let json = if cli.pretty {
        serde_json::to_string_pretty(&outcome)?
    } else {
        serde_json::to_string(&outcome)?
    };
    Ok(json)
}

fn main() -> ExitCode {
    logging::init();
    let cli = Cli::parse();

    // The outcome is printed even when result.success is false; only a
    // fatal engine or I/O error exits non-zero.
    match run(&cli) {
        Ok(json) => {
            println!("{json}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("reflow failed: {e}");
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
