//! CLI command definitions and dispatch.
//!
//! Each subcommand is implemented in its own submodule:
//! - `migrate`: copy a music folder into the organized layout
//! - `init_config`: write a default configuration file

mod init_config;
mod migrate;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tokio::runtime::Runtime;

use crate::config::Config;

pub use init_config::cmd_init_config;
pub use migrate::cmd_migrate;

/// Music Organizer CLI
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands
#[derive(Subcommand)]
pub enum Commands {
    /// Copy music files into MusicOrganizerOutput/<artist>/<album>/<title>.<ext>
    Migrate {
        /// Folder to organize (opens a folder picker when omitted)
        source: Option<PathBuf>,
        /// Output root (defaults to the configured root, then the documents folder)
        #[arg(short, long, env = "MUSIC_ORGANIZER_OUTPUT")]
        output: Option<PathBuf>,
    },
    /// Write a default config file
    InitConfig {
        /// Overwrite an existing config file
        #[arg(long)]
        force: bool,
    },
}

/// Run the specified CLI command.
///
/// With no subcommand, a migration is started from the folder picker.
pub fn run_command(cli: &Cli, config: &Config) -> anyhow::Result<()> {
    match &cli.command {
        Some(Commands::Migrate { source, output }) => {
            let rt = Runtime::new()?;
            cmd_migrate(&rt, config, source.as_ref(), output.as_ref())
        }
        Some(Commands::InitConfig { force }) => cmd_init_config(*force),
        None => {
            let rt = Runtime::new()?;
            cmd_migrate(&rt, config, None, None)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_migrate_args() {
        let cli = Cli::try_parse_from(["music-organizer", "migrate", "/music", "-o", "/out"]).unwrap();
        match cli.command {
            Some(Commands::Migrate { source, output }) => {
                assert_eq!(source, Some(PathBuf::from("/music")));
                assert_eq!(output, Some(PathBuf::from("/out")));
            }
            _ => panic!("expected migrate"),
        }
    }

    #[test]
    fn test_no_subcommand() {
        let cli = Cli::try_parse_from(["music-organizer"]).unwrap();
        assert!(cli.command.is_none());
    }
}
