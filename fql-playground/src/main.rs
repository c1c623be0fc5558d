//! `fqlp`: the FQL parse playground.
//! Usage:
//!   fqlp [--config PATH] [--loading immediate|suspense]
//!   fqlp parse <FILTER> [--json]
//!   fqlp facts|properties|operands <FILTER>

use std::io::{self, Write};
use std::path::PathBuf;

use clap::ArgMatches;
use fql_config::{user_config_path, ConfigLayers, PlaygroundConfig};
use fql_playground::cli::build_cli;
use fql_playground::commands;
use fql_playground::engine::{EngineError, EngineHandle, EngineLoader};
use fql_playground::fql_engine::FqlEngine;
use fql_playground::logging::{init_logging, LogConfig, LogTarget};
use fql_playground::playground::run_playground;
use fql_playground::PlaygroundError;

fn main() {
    let matches = build_cli().get_matches();
    if let Err(err) = run(&matches) {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}

fn run(matches: &ArgMatches) -> Result<(), PlaygroundError> {
    let config = load_config(matches)?;
    let log_file = matches.get_one::<PathBuf>("log-file").cloned();

    let Some((name, sub)) = matches.subcommand() else {
        let target = log_file.map_or(LogTarget::Off, LogTarget::File);
        init_logging(&LogConfig::new(&config.logging.level, target))?;
        return run_playground(&config);
    };

    let target = log_file.map_or(LogTarget::Stderr, LogTarget::File);
    init_logging(&LogConfig::new(&config.logging.level, target))?;

    let filter = sub
        .get_one::<String>("filter")
        .map(String::as_str)
        .unwrap_or_default();
    let stdout = io::stdout();
    let mut out = stdout.lock();

    match name {
        "parse" => {
            let engine = load_engine()?;
            commands::parse(engine.as_ref(), filter, sub.get_flag("json"), &mut out)?
        }
        "facts" => commands::facts(filter, &mut out)?,
        "properties" => commands::properties(filter, &mut out)?,
        "operands" => commands::operands(filter, &mut out)?,
        _ => unreachable!("unknown subcommand {name}"),
    }
    out.flush()?;
    Ok(())
}

/// Defaults, the user's config file, `--config`, then the remaining flags.
fn load_config(matches: &ArgMatches) -> Result<PlaygroundConfig, PlaygroundError> {
    let mut layers = ConfigLayers::defaults();
    if let Some(path) = user_config_path() {
        layers = layers.user_file(path);
    }
    if let Some(path) = matches.get_one::<PathBuf>("config") {
        layers = layers.explicit_file(path);
    }
    if let Some(placeholder) = matches.get_one::<String>("placeholder") {
        layers = layers.flag("view.placeholder_text", placeholder.as_str())?;
    }
    if matches.get_flag("no-range-selection") {
        layers = layers.flag("view.enable_range_selection", false)?;
    }
    if let Some(strategy) = matches.get_one::<String>("loading") {
        layers = layers.flag("engine.loading_strategy", strategy.as_str())?;
    }
    if let Some(level) = matches.get_one::<String>("log-level") {
        layers = layers.flag("logging.level", level.as_str())?;
    }
    Ok(layers.resolve()?)
}

/// Load the engine through the same one-shot loader the UI uses.
fn load_engine() -> Result<EngineHandle, PlaygroundError> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    runtime.block_on(async {
        let mut loader = EngineLoader::new();
        loader.load(FqlEngine::initialize());
        let state = loader.resolve().await;
        match (state.engine(), state.error()) {
            (Some(engine), _) => Ok(engine.clone()),
            (None, Some(err)) => Err(err.clone().into()),
            (None, None) => Err(EngineError::Aborted.into()),
        }
    })
}
