use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use std::{
    env, fs,
    io::{stdin, stdout, IsTerminal},
    path::{Path, PathBuf},
    process,
};
use tracing::{error, info, warn};
use tracing_appender::rolling::RollingFileAppender;
use tracing_subscriber::EnvFilter;

use se_material_checker_lib::{
    blueprint::BlueprintChecker,
    game_data::{GameDataLoader, LoadReport},
};

/// A submodule that handles the command line arguments and the interactive prompts
mod args;
use args::Args;

/// A submodule that handles the config file
mod config;
use config::{Config, LoggingConfig};

/// A submodule that locates the game and its workshop mods through Steam
mod steam;
use steam::{get_game_path, get_library_path};

/// A submodule that renders the report for the terminal
mod display;
use display::render_report;

/// Creates the log file writer, rotating it if the config asks for it.
fn log_file_appender(config: &LoggingConfig) -> Option<Result<RollingFileAppender, String>> {
    let path = config.file.as_ref()?;
    let Some(file_name) = path.file_name() else {
        return Some(Err(format!("{} is not a file name", path.display())));
    };
    let dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    Some(
        RollingFileAppender::builder()
            .rotation(config.rotation.into())
            .filename_prefix(file_name.to_string_lossy())
            .build(dir)
            .map_err(|e| e.to_string()),
    )
}

/// Sets up the global tracing subscriber according to the config.
fn init_logging(config: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.level))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    match log_file_appender(config) {
        Some(Ok(appender)) => {
            builder.with_writer(appender).with_ansi(false).init();
            return;
        }
        Some(Err(e)) => eprintln!("Could not open the log file: {}", e),
        None => {}
    }
    builder.with_writer(std::io::stderr).init();
}

/// Decides where the game data lives. A flag wins over the config, which wins
/// over the Steam installation.
fn resolve_game_path(args: &Args, config: &Config) -> Option<PathBuf> {
    if let Some(path) = args.game_path.as_ref().or(config.se_path.as_ref()) {
        return Some(path.clone());
    }
    match get_library_path().and_then(|library| get_game_path(&library)) {
        Ok(path) => {
            info!(path = %path.display(), "Found the game through Steam");
            Some(path)
        }
        Err(e) => {
            warn!("Could not locate the game through Steam: {}", e);
            None
        }
    }
}

/// Collects the mod directories to load, in load order.
fn collect_mod_paths(args: &Args, config: &Config) -> Vec<PathBuf> {
    let mut paths = Vec::new();
    if args.modded_blocks {
        match args.mods_path.as_ref().or(config.mods_path.as_ref()) {
            Some(mods_path) => match fs::read_dir(mods_path) {
                Ok(entries) => {
                    let mut mods: Vec<PathBuf> = entries
                        .flatten()
                        .map(|entry| entry.path())
                        .filter(|path| path.is_dir())
                        .collect();
                    mods.sort();
                    paths.extend(mods);
                }
                Err(e) => warn!(
                    "Could not read the mods directory {}: {}",
                    mods_path.display(),
                    e
                ),
            },
            None => warn!("Modded blocks requested, but no mods path is configured"),
        }
    }
    paths.extend(args.include.iter().cloned());
    paths
}

/// Main function. This is the entry point of the program.
///
/// # Arguments
///
/// 1. `filename` - The blueprint to check. If not provided, the program will prompt the user for everything.
/// 2. `--config` - A config file to use instead of `config.toml`.
/// 3. `--game-path` - Where to find the game's `Data` directory. Defaults to the config, then to the Steam installation.
/// 4. `--mods-path` - The directory holding one directory per mod.
/// 5. `--modded-blocks` - A flag that tells the program to load every mod in the mods path.
/// 6. `--include` - Additional mod directories to load.
/// 7. `--fallback-attribute` - Name blocks without a subtype after this attribute only.
/// 8. `--dump` - A file to dump the report to, as json.
/// 9. `--no-interaction` - A flag that tells the program not to interact with the user.
///
/// # Process
///
/// 1. Reads the arguments and the config file
/// 2. Loads the block definitions and the recipes of the game
/// 3. Loads the block definitions and the recipes of each mod, in order
/// 4. Counts the blocks of the blueprint and resolves them into components and materials
/// 5. Prints the report, and dumps it if asked to
fn main() {
    if !cfg!(debug_assertions) {
        human_panic::setup_panic!();
    }
    let args = if env::args().len() < 2 && stdin().is_terminal() {
        Args::get_from_user()
    } else {
        Args::parse()
    };
    let config = match Config::load(args.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", e);
            process::exit(1);
        }
    };
    init_logging(&config.logging);
    let mut loader = GameDataLoader::new();
    let mut report = LoadReport::default();
    match resolve_game_path(&args, &config) {
        Some(game_path) => report.merge(loader.process_game_path(game_path)),
        None => warn!("No game path available, only mod definitions will be used"),
    }
    let mod_paths = collect_mod_paths(&args, &config);
    if !mod_paths.is_empty() {
        let bar_style = ProgressStyle::default_bar()
            .template("[{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-");
        let progress_bar = ProgressBar::new(mod_paths.len() as u64);
        progress_bar.set_style(bar_style);
        for path in progress_bar.wrap_iter(mod_paths.iter()) {
            progress_bar.set_message(path.to_string_lossy().into_owned());
            report.merge(loader.process_mod_path(path));
        }
        progress_bar.finish_with_message("Mods loaded");
    }
    if !report.is_clean() {
        println!(
            "{} definition source(s) were skipped, see the log for details",
            report.skipped.len()
        );
    }
    let catalog = loader.finalize();
    let checker = BlueprintChecker::new(&catalog).with_naming(args.naming_policy());
    let result = match checker.check_blueprint(&args.filename) {
        Ok(result) => result,
        Err(e) => {
            eprintln!("{}", e);
            process::exit(1);
        }
    };
    print!("{}", render_report(&result));
    if let Some(dump) = &args.dump {
        let written = serde_json::to_string_pretty(&result)
            .map_err(|e| e.to_string())
            .and_then(|json| fs::write(dump, json).map_err(|e| e.to_string()));
        match written {
            Ok(()) => info!(path = %dump.display(), "Report dumped"),
            Err(e) => {
                error!("Could not dump the report to {}: {}", dump.display(), e);
                eprintln!("Could not dump the report to {}: {}", dump.display(), e);
                process::exit(1);
            }
        }
    }
    if stdin().is_terminal() && stdout().is_terminal() && !args.no_interaction {
        let _ = dialoguer::Input::<String>::new()
            .with_prompt("Press enter to exit")
            .allow_empty(true)
            .interact();
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;
    use super::config::LogRotation;

    #[test]
    fn test_log_file_appender() {
        assert!(log_file_appender(&LoggingConfig::default()).is_none());
        let dir = TempDir::new().unwrap();
        let config = LoggingConfig {
            file: Some(dir.path().join("checker.log")),
            rotation: LogRotation::Daily,
            ..Default::default()
        };
        assert!(matches!(log_file_appender(&config), Some(Ok(_))));
    }
}
