use anyhow::Result;
use clap::Parser;

fn main() -> Result<()> {
    let cli = xtask::cli::Cli::parse();
    xtask::app::run(cli)
}
