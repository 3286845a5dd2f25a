use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use chorograph::cli::{Cli, Commands};
use chorograph::commands::{info, render};

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match &cli.command {
        Commands::Render(args) => render::run(args),
        Commands::Info(args) => info::run(args),
        #[cfg(feature = "download")]
        Commands::Fetch(args) => chorograph::commands::fetch::run(args),
    }
}

/// Console logging; `-v` raises the default level, RUST_LOG overrides.
fn init_tracing(verbose: u8) {
    let fallback = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
    tracing_subscriber::fmt().with_env_filter(filter).with_target(false).init();
}
