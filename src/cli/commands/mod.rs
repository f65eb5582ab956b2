//! CLI commands implementation.
//!
//! This module contains the CLI parser and dispatches to command-specific modules.

mod config_cmd;
mod discover;
mod extract;
mod pipeline;

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};

use crate::config::Config;

#[derive(Parser)]
#[command(name = "catscrape")]
#[command(about = "Discover product URLs on catalog listing pages and extract product details")]
#[command(version)]
pub struct Cli {
    /// Config file path (overrides auto-discovery)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Check if verbose mode is enabled (for early logging setup).
pub fn is_verbose() -> bool {
    std::env::args().any(|arg| arg == "-v" || arg == "--verbose")
}

#[derive(Subcommand)]
enum Commands {
    /// Collect product URLs from a category listing page
    Discover {
        /// Listing page URL
        url: String,
        /// Stop after this many distinct URLs
        #[arg(short = 'n', long)]
        target: Option<usize>,
        /// Seconds to wait after each scroll
        #[arg(long)]
        scroll_pause: Option<f64>,
        /// Where to write the URL table
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Skip clicking the "show more" control
        #[arg(long)]
        no_expand: bool,
    },

    /// Fetch every URL in a URL table and extract product details
    Extract {
        /// URL table to read (needs a "Product URL" column)
        #[arg(short, long)]
        input: Option<PathBuf>,
        /// Where to write the product table
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Only process the first N URLs (0 = all)
        #[arg(short, long, default_value = "0")]
        limit: usize,
    },

    /// Discover then extract in one go
    Run {
        /// Listing page URL
        url: String,
        /// Stop discovery after this many distinct URLs
        #[arg(short = 'n', long)]
        target: Option<usize>,
        /// Where to write the URL table
        #[arg(long)]
        urls_output: Option<PathBuf>,
        /// Where to write the product table
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Configuration management
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Print the effective configuration as TOML
    Show,
}

/// Run the CLI.
pub async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = Config::load(cli.config.as_deref()).context("Failed to load configuration")?;

    match cli.command {
        Commands::Discover {
            url,
            target,
            scroll_pause,
            output,
            no_expand,
        } => {
            apply_discovery_overrides(&mut config, target, scroll_pause, output, no_expand);
            discover::cmd_discover(&config, &url).await
        }
        Commands::Extract {
            input,
            output,
            limit,
        } => {
            let input = input.unwrap_or_else(|| config.discovery.output.clone());
            if let Some(output) = output {
                config.extraction.output = output;
            }
            extract::cmd_extract(&config, &input, limit).await
        }
        Commands::Run {
            url,
            target,
            urls_output,
            output,
        } => {
            apply_discovery_overrides(&mut config, target, None, urls_output, false);
            if let Some(output) = output {
                config.extraction.output = output;
            }
            pipeline::cmd_run(&config, &url).await
        }
        Commands::Config { command } => match command {
            ConfigCommands::Show => config_cmd::cmd_config_show(&config),
        },
    }
}

fn apply_discovery_overrides(
    config: &mut Config,
    target: Option<usize>,
    scroll_pause: Option<f64>,
    output: Option<PathBuf>,
    no_expand: bool,
) {
    if let Some(target) = target {
        config.discovery.target_count = target;
    }
    if let Some(pause) = scroll_pause {
        config.discovery.scroll_pause_secs = pause;
    }
    if let Some(output) = output {
        config.discovery.output = output;
    }
    if no_expand {
        config.discovery.expand = false;
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
    fn test_parse_discover_flags() {
        let cli = Cli::parse_from([
            "catscrape",
            "discover",
            "https://shop.example/c/skincare",
            "-n",
            "40",
            "--scroll-pause",
            "1.5",
            "--no-expand",
        ]);
        match cli.command {
            Commands::Discover {
                url,
                target,
                scroll_pause,
                output,
                no_expand,
            } => {
                assert_eq!(url, "https://shop.example/c/skincare");
                assert_eq!(target, Some(40));
                assert_eq!(scroll_pause, Some(1.5));
                assert!(output.is_none());
                assert!(no_expand);
            }
            _ => panic!("expected discover"),
        }
    }

    #[test]
    fn test_overrides_only_touch_given_values() {
        let mut config = Config::default();
        apply_discovery_overrides(&mut config, Some(7), None, None, false);
        assert_eq!(config.discovery.target_count, 7);
        assert_eq!(config.discovery.scroll_pause_secs, 3.0);
        assert!(config.discovery.expand);

        apply_discovery_overrides(
            &mut config,
            None,
            Some(0.5),
            Some(PathBuf::from("out/urls.csv")),
            true,
        );
        assert_eq!(config.discovery.target_count, 7);
        assert_eq!(config.discovery.scroll_pause_secs, 0.5);
        assert_eq!(config.discovery.output, PathBuf::from("out/urls.csv"));
        assert!(!config.discovery.expand);
    }
}
