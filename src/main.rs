//! CLI entry point for the layered edition generator

use clap::Parser;
use env_logger::Env;
use layergen::io::cli::{Cli, CommandRunner};

fn main() -> layergen::Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.quiet { "warn" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(default_filter)).init();

    let mut runner = CommandRunner::new(cli);
    runner.run()
}
