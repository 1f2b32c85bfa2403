use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

#[derive(Parser)]
#[command(name = "drugdeck")]
#[command(version, about = "Compile a drug report (JSON and PDF) for an NDC code")]
struct Cli {
    /// Configuration file (default: config/config.yaml)
    #[arg(long, short)]
    config: Option<PathBuf>,

    /// NDC code in any common format; prompted for when omitted
    ndc: Option<String>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    drugdeck_lib::run(cli.config, cli.ndc)
}
