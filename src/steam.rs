use std::{
    fs::{read_dir, read_to_string},
    io,
    path::{Path, PathBuf},
};

use derive_more::{Display, From};
use keyvalues_parser::{Value, Vdf};

/// The Steam ID for Space Engineers.
/// Source: https://steamdb.info/app/244850/
const SE_ID: &str = "244850";

#[cfg(target_os = "linux")]
const DEFAULT_STEAM_PATH: &str = ".local/share/Steam/steamapps/";
#[cfg(target_os = "windows")]
const DEFAULT_STEAM_PATH: &str = "C:/Program Files (x86)/Steam/steamapps/";
#[cfg(target_os = "macos")]
const DEFAULT_STEAM_PATH: &str = "Library/Application Support/Steam/steamapps/";
#[cfg(not(any(target_os = "linux", target_os = "windows", target_os = "macos")))]
const DEFAULT_STEAM_PATH: &str = "";

/// The default path from the Steam directory to the libraryfolders.vdf file.
const DEFAULT_VDF_PATH: &str = "libraryfolders.vdf";

/// The default path from the library to the directory holding `Data`.
pub const SE_PATH: &str = "steamapps/common/SpaceEngineers/Content";

/// The path from the library to the downloaded workshop mods.
const WORKSHOP_PATH: &str = "steamapps/workshop/content";

#[derive(Debug, Display, From)]
pub enum SteamError {
    /// The Steam directory was not found.
    #[display("Steam directory not found")]
    SteamDirNotFound,
    /// The VDF file was not found.
    #[display("VDF file not found")]
    VdfNotFound,
    /// An error occurred while parsing the VDF file.
    #[display("Library error parsing VDF file: {:?}", _0)]
    #[from]
    VdfParseError(keyvalues_parser::error::Error),
    /// An error occurred while processing the VDF file.
    #[display("Error processing VDF file: {}", _0)]
    VdfProcessingError(&'static str),
    /// The game directory was not found.
    #[display("Space Engineers directory pointed to not found")]
    SeNotFound,
    /// Space Engineers is missing from the library.
    #[display("Space Engineers missing from library")]
    SeMissing,
    /// Something went wrong with stdlib IO.
    #[display("{}", _0)]
    #[from]
    IoError(io::Error),
}

/// Finds the library holding Space Engineers in the contents of a
/// libraryfolders.vdf file.
///
/// Generally speaking error checking regarding VDF expected format is not
/// performed. So if the VDF file is weird, then [None] will be returned.
fn find_library(vdf_contents: &str) -> Result<Option<PathBuf>, SteamError> {
    let vdf = Vdf::parse(vdf_contents)?;
    let folders = match vdf.value {
        Value::Obj(folders) => folders,
        _ => {
            return Err(SteamError::VdfProcessingError(
                "Root of VDF file is not an object",
            ))
        }
    };
    // foreach value set in the root object
    for folder_objs in folders.values() {
        for folder in folder_objs {
            let folder = match folder {
                Value::Obj(folder) => folder,
                _ => continue,
            };
            let apps_objs = match folder.get("apps") {
                Some(apps) => apps,
                // we could error here, but what's the point?
                None => continue,
            };
            for app in apps_objs {
                if let Value::Obj(app) = app {
                    if app.keys().any(|k| *k == SE_ID) {
                        return match folder.get("path").and_then(|p| p.first()) {
                            Some(Value::Str(path)) => Ok(Some(PathBuf::from(path.to_string()))),
                            Some(_) => Err(SteamError::VdfProcessingError("Path is not a string")),
                            None => Err(SteamError::VdfProcessingError("Library without a path")),
                        };
                    }
                }
            }
        }
    }
    Ok(None)
}

/// Get the path to the Steam library that holds Space Engineers.
pub fn get_library_path() -> Result<PathBuf, SteamError> {
    let steam_path = if cfg!(target_os = "windows") {
        PathBuf::from(DEFAULT_STEAM_PATH)
    } else if cfg!(target_os = "linux") || cfg!(target_os = "macos") {
        #[allow(deprecated)] // home_dir is deprecated, because Windows is bad, but we don't care since we are only using it for Linux and macOS
        let home = std::env::home_dir().ok_or(SteamError::SteamDirNotFound)?;
        home.join(DEFAULT_STEAM_PATH)
    } else {
        return Err(SteamError::SteamDirNotFound);
    };
    if !steam_path.exists() {
        return Err(SteamError::SteamDirNotFound);
    }
    let vdf_path = steam_path.join(DEFAULT_VDF_PATH);
    if !vdf_path.exists() {
        return Err(SteamError::VdfNotFound);
    }
    let vdf_contents = read_to_string(&vdf_path)?;
    find_library(&vdf_contents)?.ok_or(SteamError::SeMissing)
}

/// Get the path to the game data within the library.
pub fn get_game_path(library: &Path) -> Result<PathBuf, SteamError> {
    let se_path = library.join(SE_PATH);
    if se_path.is_dir() {
        Ok(se_path)
    } else {
        Err(SteamError::SeNotFound)
    }
}

/// Appends the downloaded workshop mods of the library to `out`, sorted.
pub fn get_mod_paths(library: &Path, out: &mut Vec<PathBuf>) -> Result<(), SteamError> {
    let workshop = library.join(WORKSHOP_PATH).join(SE_ID);
    if !workshop.is_dir() {
        return Ok(()); // no mods is fine
    }
    let mut mods = Vec::new();
    for entry in read_dir(workshop)? {
        let path = entry?.path();
        if path.is_dir() {
            mods.push(path);
        }
    }
    mods.sort();
    out.extend(mods);
    Ok(())
}
