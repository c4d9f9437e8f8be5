//! # hgcal_link_load_cli
//!
//! Part of the hgcal_link_load crate family.
//!
//! This is the command line application for the HGCAL link load analysis.
//!
//! ## Install
//!
//! Use `cargo install --path ./hgcal_link_load_cli`
//!
//! ## Use
//!
//! Make a template configuration file
//!
//! ```bash
//! hgcal_link_load_cli -p config.yml new
//! ```
//!
//! Edit the paths and options, then run the analysis
//!
//! ```bash
//! hgcal_link_load_cli -p config.yml
//! ```
//!
//! Progress is logged to the terminal and, in more detail, to `hgcal_link_load.log`.
use clap::{Arg, Command};
use std::fs::File;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use libhgcal_link_load::config::Config;
use libhgcal_link_load::process::process;

const LOG_FILE: &str = "hgcal_link_load.log";

fn init_logging() -> Result<(), Box<dyn std::error::Error>> {
    let log_file = File::create(LOG_FILE)?;
    simplelog::CombinedLogger::init(vec![
        simplelog::TermLogger::new(
            simplelog::LevelFilter::Info,
            simplelog::Config::default(),
            simplelog::TerminalMode::Mixed,
            simplelog::ColorChoice::Auto,
        ),
        simplelog::WriteLogger::new(
            simplelog::LevelFilter::Debug,
            simplelog::Config::default(),
            log_file,
        ),
    ])?;
    Ok(())
}

fn make_template_config(path: &Path) -> ExitCode {
    log::info!("Making a template config at {}...", path.to_string_lossy());
    match Config::default().write_config_file(path) {
        Ok(()) => {
            log::info!("Done.");
            ExitCode::SUCCESS
        }
        Err(e) => {
            log::error!("Could not create template config: {e}");
            ExitCode::FAILURE
        }
    }
}

fn main() -> ExitCode {
    // Create a cli
    let matches = Command::new("hgcal_link_load_cli")
        .about("Histogram the data load on HGCAL trigger modules and lpGBTs")
        .arg_required_else_help(true)
        .subcommand(Command::new("new").about("Make a template configuration yaml file"))
        .arg(
            Arg::new("path")
                .short('p')
                .long("path")
                .required(true)
                .help("Path to the configuration file"),
        )
        .get_matches();

    // Initialize feedback
    if let Err(e) = init_logging() {
        eprintln!("Could not create logging: {e}");
        return ExitCode::FAILURE;
    }

    // Parse the cli
    let config_path = match matches.get_one::<String>("path") {
        Some(p) => PathBuf::from(p),
        None => {
            log::error!("A configuration path is required");
            return ExitCode::FAILURE;
        }
    };

    if let Some(("new", _)) = matches.subcommand() {
        return make_template_config(&config_path);
    }

    // Load our config
    log::info!("Loading config from {}...", config_path.to_string_lossy());
    let config = match Config::read_config_file(&config_path) {
        Ok(c) => c,
        Err(e) => {
            log::error!("{e}");
            return ExitCode::FAILURE;
        }
    };
    log::info!("Config successfully loaded.");
    log::info!("Mapping Path: {}", config.mapping_path.to_string_lossy());
    log::info!("Load Table Path: {}", config.load_table_path.to_string_lossy());
    log::info!("Output Path: {}", config.output_path.to_string_lossy());
    log::info!("Mode: {:?}", config.mode);
    log::info!("Ignored Density: {}", config.ignored_density);

    match process(&config) {
        Ok(_) => {
            log::info!("Successfully computed loads!");
            log::info!("Done.");
            ExitCode::SUCCESS
        }
        Err(e) => {
            log::error!("Load analysis failed with error: {e}");
            ExitCode::FAILURE
        }
    }
}
