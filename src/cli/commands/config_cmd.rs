//! Configuration management commands.

use crate::cli::icons::dim_arrow;
use crate::config::Config;

/// Print the effective configuration (file values plus env overrides).
pub fn cmd_config_show(config: &Config) -> anyhow::Result<()> {
    match &config.source_path {
        Some(path) => eprintln!("{} Loaded from {}", dim_arrow(), path.display()),
        None => eprintln!("{} No config file found, using defaults", dim_arrow()),
    }

    print!("{}", config.to_toml()?);
    Ok(())
}
