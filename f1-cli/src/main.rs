//! F1 CLI - inspect season results and export timeline and grid charts.

use clap::Parser;

#[derive(Parser)]
#[command(
    name = "f1-cli",
    version,
    about = "Formula 1 season data toolkit"
)]
struct Cli {
    #[command(flatten)]
    source: f1_cmd::SourceArgs,

    /// Print JSON instead of text tables
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: f1_cmd::Command,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    f1_cmd::run(cli.source, cli.command, cli.json).await
}
