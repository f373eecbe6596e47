use clap_derive::Parser;
use derive_more::Display;
use dialoguer::{Completion, Confirm, Input, MultiSelect};

use std::{
    error, fs,
    path::{Path, PathBuf},
};

use se_material_checker_lib::{blueprint::NamingPolicy, game_data::BLOCK_EXTENSION};

use super::steam::{get_game_path, get_library_path, get_mod_paths, SteamError};

/// A [Completion] struct for blueprint file names, that also acts as a list of blueprint files in the current directory.
struct BlueprintNameCompletion {
    blueprint_files: Vec<String>,
}

impl Default for BlueprintNameCompletion {
    fn default() -> Self {
        let mut res = Vec::new();
        if let Ok(entries) = fs::read_dir(".") {
            for entry in entries.flatten() {
                let entry = entry.path();
                if entry.is_file()
                    && entry
                        .extension()
                        .is_some_and(|ext| ext.eq_ignore_ascii_case(BLOCK_EXTENSION))
                {
                    res.push(entry.to_string_lossy().into_owned());
                }
            }
        }
        res.sort();
        BlueprintNameCompletion {
            blueprint_files: res,
        }
    }
}

impl Completion for BlueprintNameCompletion {
    fn get(&self, input: &str) -> Option<String> {
        self.blueprint_files
            .iter()
            .find(|x| x.contains(input))
            .cloned()
    }
}

#[derive(Debug, Display)]
enum InvalidPath {
    #[display("invalid path (does not exist)")]
    InvalidPath,
    #[display("not a file")]
    NotAFile,
    #[display("not a directory")]
    NotADir,
}

impl error::Error for InvalidPath {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        None
    }
}

/// A function to validate the file path input.
fn validate_file_path(input: &String) -> Result<(), InvalidPath> {
    let p = Path::new(input);
    if !p.exists() {
        Err(InvalidPath::InvalidPath)
    } else if !p.is_file() {
        Err(InvalidPath::NotAFile)
    } else {
        Ok(())
    }
}

/// A function to validate the path input.
fn validate_dir_path(input: &String) -> Result<(), InvalidPath> {
    if input.is_empty() {
        return Ok(());
    }
    let p = Path::new(input);
    if !p.exists() {
        Err(InvalidPath::InvalidPath)
    } else if !p.is_dir() {
        Err(InvalidPath::NotADir)
    } else {
        Ok(())
    }
}

/// A function to parse the file path argument.
fn parse_file_arg(input: &str) -> Result<PathBuf, &'static str> {
    let p = PathBuf::from(input);
    if p.is_file() {
        Ok(p)
    } else {
        Err("Invalid file path")
    }
}

/// A function to parse the directory path argument.
fn parse_dir_arg(input: &str) -> Result<PathBuf, &'static str> {
    let p = PathBuf::from(input);
    if p.is_dir() {
        Ok(p)
    } else {
        Err("Invalid directory path")
    }
}

/// The arguments to the program.
#[derive(Parser)]
#[command(
    version,
    about = "Determine the blocks, components and materials that make up a blueprint"
)]
pub struct Args {
    #[arg(value_parser = parse_file_arg)]
    /// The blueprint to check.
    pub filename: PathBuf,
    #[arg(short, long, default_value = None)]
    /// A config file to use instead of config.toml.
    pub config: Option<PathBuf>,
    #[arg(short, long, default_value = None, value_parser = parse_dir_arg)]
    /// The directory holding the game's Data directory.
    pub game_path: Option<PathBuf>,
    #[arg(long, default_value = None, value_parser = parse_dir_arg)]
    /// The directory holding one directory per mod.
    pub mods_path: Option<PathBuf>,
    #[arg(short, long, default_value_t = false)]
    /// A flag that tells the program to load every mod found in the mods path.
    pub modded_blocks: bool,
    #[arg(short, long, value_parser = parse_dir_arg)]
    /// Additional mod directories to load, after the mods path.
    pub include: Vec<PathBuf>,
    #[arg(long, default_value = None)]
    /// Name blocks without a subtype after this attribute only, instead of guessing.
    pub fallback_attribute: Option<String>,
    #[arg(long, default_value = None)]
    /// A path to a file to dump the report to, as json.
    pub dump: Option<PathBuf>,
    #[arg(short, long, default_value_t = false)]
    /// A flag that tells the program not to interact with the user.
    pub no_interaction: bool,
}

impl Args {
    /// The policy for naming blocks that do not declare a subtype.
    pub fn naming_policy(&self) -> NamingPolicy {
        match &self.fallback_attribute {
            Some(attribute) => NamingPolicy::Attribute(attribute.clone()),
            None => NamingPolicy::LastAttribute,
        }
    }

    /// Create the object based on user input.
    pub fn get_from_user() -> Self {
        println!("Welcome to the Space Engineers blueprint checker!\nTab autocompletes the query, arrows cycle through possible options, space toggles selection and enter confirms the selection.");
        //console interface only if we are in a terminal
        let completion = BlueprintNameCompletion::default();
        let filename = PathBuf::from(
            Input::<String>::new()
                .with_prompt("Enter the blueprint file path")
                .validate_with(validate_file_path)
                .with_initial_text(completion.blueprint_files.first().cloned().unwrap_or_default())
                .completion_with(&completion)
                .interact_text()
                .unwrap(),
        );
        let mut se_path = None;
        let mut mod_paths = Vec::new();
        match get_library_path() {
            Ok(p) => {
                se_path = get_game_path(&p)
                    .map_err(|e| eprintln!("Error trying to find your Space Engineers installation: {}", e))
                    .ok();
                get_mod_paths(&p, &mut mod_paths).unwrap_or_else(|e| {
                    eprintln!("Error trying to find your Space Engineers mods: {}", e);
                });
            }
            Err(e) => {
                if !matches!(e, SteamError::SteamDirNotFound | SteamError::SeMissing) {
                    eprintln!("Error trying to find your Space Engineers installation: {}", e);
                }
            }
        };
        let game_path = Input::<String>::new()
            .with_prompt("Enter the game path [empty for config]")
            .allow_empty(true)
            .validate_with(validate_dir_path)
            .with_initial_text(
                se_path
                    .map(|p| p.to_string_lossy().into_owned())
                    .unwrap_or_default(),
            )
            .interact_text()
            .map_or(None, |x| {
                if x.is_empty() {
                    None
                } else {
                    Some(PathBuf::from(x))
                }
            });
        let include = if !mod_paths.is_empty() {
            let mod_selection = MultiSelect::new()
                .with_prompt("Select the mods to include")
                .items(
                    &mod_paths
                        .iter()
                        .map(|p| p.to_string_lossy())
                        .collect::<Vec<_>>(),
                )
                .interact()
                .unwrap();
            mod_selection
                .iter()
                .map(|i| mod_paths[*i].clone())
                .collect::<Vec<_>>()
        } else {
            Vec::new()
        };
        let modded_blocks = Confirm::new()
            .with_prompt("Load every mod in the configured mods path?")
            .default(false)
            .interact()
            .unwrap();
        Args {
            filename,
            config: None,
            game_path,
            mods_path: None,
            modded_blocks,
            include,
            fallback_attribute: None,
            dump: None,
            no_interaction: false,
        }
    }
}
