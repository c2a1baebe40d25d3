use anyhow::Result;
use clap::Parser;
use wincare::cli::Cli;

fn main() -> Result<()> {
    let cli = Cli::parse();
    cli.run()
}
