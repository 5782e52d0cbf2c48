//! sqlconf CLI - parse descriptors and render configuration stored in SQL tables

use anyhow::Result;
use clap::Parser;

mod cli;
mod commands;

use cli::Cli;
use commands::{cat, common, parse, render};

fn main() -> Result<()> {
    let cli = Cli::parse();
    common::init_logging(&cli.global);

    match &cli.command {
        cli::Commands::Parse(args) => parse::execute(args, &cli.global),
        cli::Commands::Render(args) => render::execute(args, &cli.global),
        cli::Commands::Cat(args) => cat::execute(args, &cli.global),
    }
}
