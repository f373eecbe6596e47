use std::{
    fs, io,
    path::{Path, PathBuf},
};

use derive_more::{Display, Error, From};
use serde::Deserialize;
use tracing_appender::rolling::Rotation;

/// The config file looked up when none is given.
pub const DEFAULT_CONFIG: &str = "config.toml";

/// An error that occurred while reading the config file.
#[derive(Debug, From, Display, Error)]
pub enum ConfigError {
    #[display("could not read the config file: {}", _0)]
    IoError(io::Error),
    #[display("invalid config file: {}", _0)]
    ParseError(toml::de::Error),
}

/// How often the log file is started anew.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogRotation {
    /// Keep appending to the one file
    #[default]
    Never,
    Minutely,
    Hourly,
    Daily,
}

impl From<LogRotation> for Rotation {
    fn from(value: LogRotation) -> Self {
        match value {
            LogRotation::Never => Rotation::NEVER,
            LogRotation::Minutely => Rotation::MINUTELY,
            LogRotation::Hourly => Rotation::HOURLY,
            LogRotation::Daily => Rotation::DAILY,
        }
    }
}

/// Where and how much to log.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// A filter directive, like `info` or `se_material_checker_lib=debug`
    pub level: String,
    /// Log into this file instead of stderr. With rotation the file name
    /// gets the date appended.
    pub file: Option<PathBuf>,
    pub rotation: LogRotation,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        LoggingConfig {
            level: "info".to_owned(),
            file: None,
            rotation: LogRotation::default(),
        }
    }
}

/// The contents of the config file.
///
/// ```toml
/// se_path = "/mnt/games/SteamLibrary/steamapps/common/SpaceEngineers/Content"
/// mods_path = "/home/user/.config/SpaceEngineers/Mods"
///
/// [logging]
/// level = "debug"
/// file = "log/se_material_checker.log"
/// rotation = "daily"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// The directory holding the game's `Data` directory
    pub se_path: Option<PathBuf>,
    /// The directory holding one directory per mod
    pub mods_path: Option<PathBuf>,
    pub logging: LoggingConfig,
}

impl Config {
    pub fn parse(contents: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(contents)?)
    }

    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        Config::parse(&fs::read_to_string(path)?)
    }

    /// Load the config file the user asked for, or if they didn't, the
    /// default one if it exists.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        match explicit {
            Some(path) => Config::open(path),
            None => {
                let path = Path::new(DEFAULT_CONFIG);
                if path.is_file() {
                    Config::open(path)
                } else {
                    Ok(Config::default())
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    #[test]
    fn test_parse() {
        let config = Config::parse(
            r#"
            se_path = "/games/SpaceEngineers/Content"

            [logging]
            level = "debug"
            "#,
        )
        .unwrap();
        assert_eq!(
            config.se_path,
            Some(PathBuf::from("/games/SpaceEngineers/Content"))
        );
        assert!(config.mods_path.is_none());
        assert_eq!(config.logging.level, "debug");
        assert!(config.logging.file.is_none());
    }

    #[test]
    fn test_rotation() {
        let config = Config::parse(
            r#"
            [logging]
            file = "checker.log"
            rotation = "hourly"
            "#,
        )
        .unwrap();
        assert_eq!(config.logging.rotation, LogRotation::Hourly);
        assert_eq!(Rotation::from(config.logging.rotation), Rotation::HOURLY);
        assert_eq!(Config::default().logging.rotation, LogRotation::Never);
        assert!(matches!(
            Config::parse("[logging]\nrotation = \"weekly\""),
            Err(ConfigError::ParseError(_))
        ));
    }

    #[test]
    fn test_empty() {
        assert_eq!(Config::parse("").unwrap(), Config::default());
        assert_eq!(Config::default().logging.level, "info");
    }

    #[test]
    fn test_invalid() {
        assert!(matches!(
            Config::parse("se_path = 12"),
            Err(ConfigError::ParseError(_))
        ));
    }

    #[test]
    fn test_explicit_missing() {
        let dir = TempDir::new().unwrap();
        assert!(matches!(
            Config::load(Some(dir.path().join("missing.toml").as_path())),
            Err(ConfigError::IoError(_))
        ));
    }

    #[test]
    fn test_open() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "mods_path = \"/mods\"").unwrap();
        let config = Config::load(Some(path.as_path())).unwrap();
        assert_eq!(config.mods_path, Some(PathBuf::from("/mods")));
    }
}
