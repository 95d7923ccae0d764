//! Config file bootstrap command.

use anyhow::bail;

use crate::config::{self, Config};

/// Write the default configuration to the standard location
pub fn cmd_init_config(force: bool) -> anyhow::Result<()> {
    if let Some(path) = config::config_path()
        && path.exists()
        && !force
    {
        bail!(
            "Config file already exists at {} (use --force to overwrite)",
            path.display()
        );
    }

    let path = config::save(&Config::default())?;
    println!("Wrote default config to {}", path.display());
    Ok(())
}
