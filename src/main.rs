/* src/main.rs */

use bind_zone_builder::config::{Command, ENV_LOG_LEVEL, Settings};
use bind_zone_builder::sync::ZoneSync;
use bind_zone_builder::xml::load_config;
use dotenvy::dotenv;
use fancy_log::{LogLevel, log, set_log_level};
use lazy_motd::lazy_motd;
use std::env;
use std::error::Error;
use std::process::ExitCode;

fn main() -> ExitCode {
    // --- Initialization ---
    dotenv().ok();
    set_log_level(parse_log_level(
        &env::var(ENV_LOG_LEVEL).unwrap_or_default(),
    ));
    lazy_motd!();

    // --- Load Settings ---
    let args: Vec<String> = env::args().collect();
    let settings = match Command::from_args(&args, |key| env::var(key).ok()) {
        Ok(Command::Help(usage)) => {
            print!("{}", usage);
            return ExitCode::SUCCESS;
        }
        Ok(Command::Run(settings)) => settings,
        Err(e) => {
            log(LogLevel::Error, &e.to_string());
            return ExitCode::FAILURE;
        }
    };
    set_log_level(parse_log_level(&settings.log_level));

    // --- Build & Sync Zones ---
    match run(&settings) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log(LogLevel::Error, &e.to_string());
            ExitCode::FAILURE
        }
    }
}

fn run(settings: &Settings) -> Result<(), Box<dyn Error>> {
    let zones = load_config(&settings.config_file)?;
    if zones.is_empty() {
        log(
            LogLevel::Warn,
            "Configuration loaded, but no domains are defined.",
        );
    }

    ZoneSync::new(settings.target_dir.clone()).sync(&zones, settings.dry_run)?;
    Ok(())
}

fn parse_log_level(level: &str) -> LogLevel {
    match level.to_lowercase().as_str() {
        "debug" => LogLevel::Debug,
        "warn" => LogLevel::Warn,
        "error" => LogLevel::Error,
        _ => LogLevel::Info,
    }
}
