//! Music Organizer - command-line front end.

use clap::Parser;
use music_organizer::{cli, config};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

fn main() -> anyhow::Result<()> {
    let args = cli::Cli::parse();

    // Initialize logging
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env().add_directive("music_organizer=info".parse()?))
        .init();

    let config = config::load();
    cli::run_command(&args, &config)
}
