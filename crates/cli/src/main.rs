use clap::Parser;
use wavefront_cli::{cli_args::Cli, startup};

/// Resolves the Wavefront api token, then starts exporting metrics.
fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    startup::run(cli)
}
