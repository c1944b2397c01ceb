use anyhow::Result;
use log::{error, info, LevelFilter};
use quadpulse::config::core::ConfigSource;
use quadpulse::{app, AppConfig, FailureKind};
use simple_logger::SimpleLogger;
use std::path::PathBuf;
use std::process::ExitCode;

fn run() -> Result<()> {
    let config_path = std::env::args_os().nth(1).map(PathBuf::from);
    let (config, source) = AppConfig::load(config_path.as_deref())?;
    log::set_max_level(config.log_level_filter()?);

    match source {
        ConfigSource::File(path) => info!("Loaded config from {}", path.display()),
        ConfigSource::Defaults => info!("No config file found, using defaults"),
    }

    app::run(&config)
}

fn main() -> ExitCode {
    // The logger accepts everything; the configured level is applied through
    // the global max level once the config has been read.
    if let Err(err) = SimpleLogger::new().with_level(LevelFilter::Trace).init() {
        eprintln!("Failed to initialise logger: {err}");
    }
    log::set_max_level(LevelFilter::Info);
    info!("Starting quadpulse...");

    match run() {
        Ok(()) => {
            info!("Shut down cleanly");
            ExitCode::SUCCESS
        }
        Err(err) => {
            let kind = FailureKind::of(&err);
            error!("{:#}", err);
            ExitCode::from(kind.code())
        }
    }
}
