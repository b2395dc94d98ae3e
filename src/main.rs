use anyhow::Result;
use clap::Parser;
use souvenir_machine::cli::Cli;

fn main() -> Result<()> {
    let cli = Cli::parse();
    cli.run()
}
