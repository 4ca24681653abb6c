// src/cli.rs

use std::path::PathBuf;

use clap::Parser;

use koch_snowflake::config::{LogLevel, SnowflakeConfig};
use koch_snowflake::subdivision::Bulge;

/// Command-line arguments; anything given here overrides the config file.
#[derive(Parser, Debug)]
#[command(name = "koch_snowflake", version, about = "Animated Koch snowflake")]
pub struct CliArgs {
    /// Path to TOML configuration file.
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,
    /// Number of stages per cycle, seed included.
    #[arg(long, value_name = "N")]
    pub iterations: Option<usize>,
    /// Delay between stages in milliseconds.
    #[arg(long, value_name = "MS")]
    pub interval_ms: Option<u64>,
    /// Side of each edge the bumps grow on.
    #[arg(long, value_enum)]
    pub bulge: Option<Bulge>,
    /// Log verbosity level.
    #[arg(long, value_enum)]
    pub log_level: Option<LogLevel>,
    /// Log each stage instead of opening a window.
    #[arg(long)]
    pub headless: bool,
    /// Stop after this many stages (headless only).
    #[arg(
        long,
        value_name = "N",
        requires = "headless",
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub frames: Option<u64>,
}

pub fn load_config(cli: &CliArgs) -> koch_snowflake::Result<SnowflakeConfig> {
    match &cli.config {
        Some(path) => SnowflakeConfig::load(path),
        None => Ok(SnowflakeConfig::default()),
    }
}

pub fn resolve_log_level(cli: &CliArgs, config: &SnowflakeConfig) -> String {
    pick_log_level(cli.log_level, std::env::var("RUST_LOG").ok(), config.log_level)
}

/// CLI flag, then a non-blank `RUST_LOG`, then the config file, then `info`.
fn pick_log_level(
    cli: Option<LogLevel>,
    env: Option<String>,
    config: Option<LogLevel>,
) -> String {
    if let Some(level) = cli {
        return level.as_str().to_string();
    }
    if let Some(level) = env.filter(|level| !level.trim().is_empty()) {
        return level;
    }
    config.unwrap_or(LogLevel::Info).as_str().to_string()
}

/// A bare level applies to this crate only, leaving dependencies at `warn`;
/// anything else is read as a full `RUST_LOG` directive list.
#[cfg(not(target_arch = "wasm32"))]
fn logger_builder(level: &str) -> env_logger::Builder {
    let mut builder = env_logger::Builder::new();
    builder.target(env_logger::Target::Stderr);
    builder.filter_level(log::LevelFilter::Warn);
    match level.trim().parse::<log::LevelFilter>() {
        Ok(filter) => {
            builder.filter_module(env!("CARGO_CRATE_NAME"), filter);
        }
        Err(_) => {
            builder.parse_filters(level);
        }
    }
    builder
        .format_timestamp_millis()
        .format_module_path(false)
        .format_target(true);
    builder
}

pub fn init_logger(level: &str) {
    cfg_if::cfg_if! {
        if #[cfg(target_arch = "wasm32")] {
            std::panic::set_hook(Box::new(console_error_panic_hook::hook));
            let level = level.parse::<log::Level>().unwrap_or(log::Level::Info);
            // A second init only fails because a logger is already set.
            let _ = console_log::init_with_level(level);
        } else {
            if let Err(err) = logger_builder(level).try_init() {
                eprintln!("Failed to initialize logger: {}", err);
            }
        }
    }
}

/// Applies CLI values over the loaded config, returning a description of
/// each value that changed.
pub fn apply_overrides(config: &mut SnowflakeConfig, cli: &CliArgs) -> Vec<String> {
    let mut overrides = Vec::new();

    if let Some(iterations) = cli.iterations {
        if config.max_iterations != iterations {
            overrides.push(format!("max_iterations = {}", iterations));
        }
        config.max_iterations = iterations;
    }

    if let Some(interval_ms) = cli.interval_ms {
        if config.interval_ms != interval_ms {
            overrides.push(format!("interval_ms = {}", interval_ms));
        }
        config.interval_ms = interval_ms;
    }

    if let Some(bulge) = cli.bulge {
        if config.bulge != bulge {
            overrides.push(format!("bulge = {:?}", bulge));
        }
        config.bulge = bulge;
    }

    if let Some(level) = cli.log_level {
        if config.log_level != Some(level) {
            overrides.push(format!("log_level = {:?}", level));
        }
        config.log_level = Some(level);
    }

    overrides
}
