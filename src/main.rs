use clap::Parser;
use eyre::Result;
use staleusers::{Config, Quoting, RunConfig};
use std::path::PathBuf;
use tracing::info;

#[derive(Parser)]
#[command(name = "staleusers")]
#[command(about = "Format a CSV file for downgrading inactive users")]
#[command(version)]
struct Cli {
    /// INI file with [Paths] database and [Data] year
    config: PathBuf,

    /// User export CSV from the platform
    export: PathBuf,

    /// Where to write the downgrade file
    #[arg(short, long, default_value = "out.csv")]
    output: PathBuf,

    /// Quote fields containing commas, quotes or newlines
    #[arg(long)]
    quote: bool,
}

fn main() -> Result<()> {
    // Setup tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    info!(config = %cli.config.display(), "Loading config");

    let config = Config::load(&cli.config)?;
    let quoting = if cli.quote { Quoting::Necessary } else { Quoting::Never };
    let run_config = RunConfig::new(&config, &cli.export, &cli.output, quoting)?;

    let summary = staleusers::run(&run_config)?;
    println!(
        "Imported {} users, exported {} to {}",
        summary.imported,
        summary.exported,
        run_config.output.display()
    );

    Ok(())
}
