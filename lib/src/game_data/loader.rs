use std::{
    fs::read_dir,
    mem,
    path::{Path, PathBuf},
};

use derive_more::Display;
use tracing::{debug, info, warn};

use super::{
    super::markup::{MarkupElement, MarkupError},
    BlockRecord, Catalog, DefinitionError, RecipeRecord,
};

/// The extension of the game's definition files.
pub const BLOCK_EXTENSION: &str = "sbc";

const DEFINITION: &str = "Definition";
const BLUEPRINT: &str = "Blueprint";

// File system stuff

const CUBE_BLOCKS_PATH: &str = "Data/CubeBlocks";
const BLUEPRINTS_PATH: &str = "Data/Blueprints.sbc";

/// Why something was left out of the [Catalog] during loading.
#[derive(Debug, Display)]
pub enum SkipReason {
    /// The path handed to the loader does not exist, or is of the wrong kind
    #[display("{} does not exist", _0.display())]
    MissingSource(PathBuf),
    /// A whole file could not be read
    #[display("{} could not be parsed: {}", _0.display(), _1)]
    MalformedSourceFile(PathBuf, MarkupError),
    /// A definition lacks a field it cannot exist without
    #[display("a definition in {} is missing {}", _0.display(), _1)]
    MissingRequiredField(PathBuf, &'static str),
    /// A definition has all the fields, but some of them are garbage
    #[display("a definition in {} is malformed: {}", _0.display(), _1)]
    MalformedDefinition(PathBuf, DefinitionError),
}

impl SkipReason {
    /// The path the skip concerns.
    pub fn path(&self) -> &Path {
        match self {
            SkipReason::MissingSource(p)
            | SkipReason::MalformedSourceFile(p, _)
            | SkipReason::MissingRequiredField(p, _)
            | SkipReason::MalformedDefinition(p, _) => p,
        }
    }

    fn from_definition_error(path: &Path, err: DefinitionError) -> Self {
        match err {
            DefinitionError::MissingField(field) => {
                SkipReason::MissingRequiredField(path.to_owned(), field)
            }
            err => SkipReason::MalformedDefinition(path.to_owned(), err),
        }
    }
}

/// The outcome of a load call. Loading never fails as a whole, instead
/// whatever could not be loaded is listed here.
#[derive(Debug, Default)]
pub struct LoadReport {
    /// Number of records that made it into the catalog
    pub loaded: usize,
    /// Everything that was left out, in encounter order
    pub skipped: Vec<SkipReason>,
}

impl LoadReport {
    /// Whether nothing at all was skipped.
    pub fn is_clean(&self) -> bool {
        self.skipped.is_empty()
    }

    /// Appends another report onto this one.
    pub fn merge(&mut self, other: LoadReport) {
        self.loaded += other.loaded;
        self.skipped.extend(other.skipped);
    }

    fn skip(&mut self, reason: SkipReason) {
        warn!("Skipped: {}", reason);
        self.skipped.push(reason);
    }
}

/// Lists the definition files directly within a directory, sorted so that
/// the load order does not depend on the file system.
fn definition_files(dir: &Path) -> Result<Vec<PathBuf>, MarkupError> {
    let mut files = Vec::new();
    for entry in read_dir(dir)? {
        let path = entry?.path();
        if !path.is_file() {
            continue;
        }
        if path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case(BLOCK_EXTENSION))
        {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// A loader for game data.
///
/// Owns the [Catalog] while it is being built. Each call merges into the same
/// catalog, so the order of calls is the override order. Once everything is
/// loaded, [GameDataLoader::finalize] hands the catalog out for read only use.
#[derive(Default)]
pub struct GameDataLoader {
    catalog: Catalog,
}

impl GameDataLoader {
    pub fn new() -> Self {
        GameDataLoader::default()
    }

    /// Load every block definition file in the given directory.
    /// The path may be invalid, in which case the function will warn and do
    /// nothing.
    pub fn load_blocks<P: AsRef<Path>>(&mut self, path: P) -> LoadReport {
        let path = path.as_ref();
        let mut report = LoadReport::default();
        if !path.is_dir() {
            report.skip(SkipReason::MissingSource(path.to_owned()));
            return report;
        }
        let files = match definition_files(path) {
            Ok(files) => files,
            Err(e) => {
                report.skip(SkipReason::MalformedSourceFile(path.to_owned(), e));
                return report;
            }
        };
        for file in files {
            let root = match MarkupElement::open(&file) {
                Ok(root) => root,
                Err(e) => {
                    report.skip(SkipReason::MalformedSourceFile(file, e));
                    continue;
                }
            };
            let mut accepted = 0;
            for element in root.descendants_named(DEFINITION) {
                match BlockRecord::from_element(element) {
                    Ok(block) => {
                        self.catalog.insert_block(block);
                        accepted += 1;
                    }
                    Err(e) => report.skip(SkipReason::from_definition_error(&file, e)),
                }
            }
            debug!("Loaded {} blocks from {}", accepted, file.display());
            report.loaded += accepted;
        }
        report
    }

    /// Load the component recipes from a single blueprints file.
    /// Blueprints that do not produce components are skipped silently.
    pub fn load_recipes<P: AsRef<Path>>(&mut self, path: P) -> LoadReport {
        let path = path.as_ref();
        let mut report = LoadReport::default();
        if !path.is_file() {
            report.skip(SkipReason::MissingSource(path.to_owned()));
            return report;
        }
        let root = match MarkupElement::open(path) {
            Ok(root) => root,
            Err(e) => {
                report.skip(SkipReason::MalformedSourceFile(path.to_owned(), e));
                return report;
            }
        };
        for element in root.descendants_named(BLUEPRINT) {
            match RecipeRecord::from_element(element) {
                Ok(Some(recipe)) => {
                    self.catalog.insert_recipe(recipe);
                    report.loaded += 1;
                }
                Ok(None) => {}
                Err(e) => report.skip(SkipReason::from_definition_error(path, e)),
            }
        }
        debug!("Loaded {} recipes from {}", report.loaded, path.display());
        report
    }

    /// Loads the blocks and recipes of a game installation. The path is the
    /// directory that holds `Data`.
    pub fn process_game_path<P: AsRef<Path>>(&mut self, path: P) -> LoadReport {
        let path = path.as_ref();
        let mut report = self.load_blocks(path.join(CUBE_BLOCKS_PATH));
        report.merge(self.load_recipes(path.join(BLUEPRINTS_PATH)));
        info!(
            "Loaded {} definitions from {}",
            report.loaded,
            path.display()
        );
        report
    }

    /// Loads the blocks and recipes of a single mod. Unlike the base game,
    /// mods are free to not have either of them.
    pub fn process_mod_path<P: AsRef<Path>>(&mut self, path: P) -> LoadReport {
        let path = path.as_ref();
        let mut report = LoadReport::default();
        let blocks_path = path.join(CUBE_BLOCKS_PATH);
        if blocks_path.is_dir() {
            report.merge(self.load_blocks(blocks_path));
        }
        let recipes_path = path.join(BLUEPRINTS_PATH);
        if recipes_path.is_file() {
            report.merge(self.load_recipes(recipes_path));
        }
        debug!("Loaded {} definitions from mod {}", report.loaded, path.display());
        report
    }

    /// The catalog as it stands right now.
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Finalize the loading, handing out the built catalog
    pub fn finalize(&mut self) -> Catalog {
        mem::take(&mut self.catalog)
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use super::*;

    const RAIL: &str = r#"<?xml version="1.0"?>
<Definitions xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance">
  <CubeBlocks>
    <Definition xsi:type="MyObjectBuilder_CubeBlockDefinition">
      <Id>
        <TypeId>CubeBlock</TypeId>
        <SubtypeId>LargeRailStraight</SubtypeId>
      </Id>
      <DisplayName>DisplayName_Block_Rail</DisplayName>
      <Components>
        <Component Subtype="SteelPlate" Count="12" />
        <Component Subtype="Construction" Count="8" />
      </Components>
    </Definition>
    <Definition>
      <Id>
        <TypeId></TypeId>
        <SubtypeId>Nameless</SubtypeId>
      </Id>
    </Definition>
  </CubeBlocks>
</Definitions>"#;

    const RECIPES: &str = r#"<?xml version="1.0"?>
<Definitions>
  <Blueprints>
    <Blueprint>
      <Id><TypeId>BlueprintDefinition</TypeId><SubtypeId>SteelPlate</SubtypeId></Id>
      <Prerequisites>
        <Item Amount="21" TypeId="Ingot" SubtypeId="Iron" />
      </Prerequisites>
      <Result Amount="1" TypeId="Component" SubtypeId="SteelPlate" />
    </Blueprint>
    <Blueprint>
      <Id><TypeId>BlueprintDefinition</TypeId><SubtypeId>IronOreToIngot</SubtypeId></Id>
      <Prerequisites>
        <Item Amount="1" TypeId="Ore" SubtypeId="Iron" />
      </Prerequisites>
      <Result Amount="0.7" TypeId="Ingot" SubtypeId="Iron" />
    </Blueprint>
  </Blueprints>
</Definitions>"#;

    #[test]
    fn test_load_blocks() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("CubeBlocks_Rail.sbc"), RAIL).unwrap();
        let mut loader = GameDataLoader::new();
        let report = loader.load_blocks(dir.path());
        assert_eq!(report.loaded, 1);
        assert_eq!(report.skipped.len(), 1);
        assert!(matches!(
            report.skipped[0],
            SkipReason::MissingRequiredField(_, "TypeId")
        ));
        let catalog = loader.finalize();
        let rail = catalog.block("LargeRailStraight").unwrap();
        assert_eq!(rail.type_id(), "CubeBlock");
        assert_eq!(rail.display_name(), "DisplayName_Block_Rail");
        assert_eq!(rail.components()["SteelPlate"], 12);
        assert_eq!(rail.components()["Construction"], 8);
        assert!(catalog.block("Nameless").is_none());
    }

    #[test]
    fn test_load_blocks_malformed_file() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("a.sbc"), RAIL).unwrap();
        fs::write(dir.path().join("b.sbc"), "My non-XML content").unwrap();
        let mut loader = GameDataLoader::new();
        let report = loader.load_blocks(dir.path());
        assert_eq!(report.loaded, 1);
        assert!(report
            .skipped
            .iter()
            .any(|s| matches!(s, SkipReason::MalformedSourceFile(p, _) if p.ends_with("b.sbc"))));
        assert_eq!(loader.catalog().blocks().len(), 1);
        assert!(loader.catalog().block("LargeRailStraight").is_some());
    }

    #[test]
    fn test_load_blocks_other_extension() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("my_xml_file.xml"), RAIL).unwrap();
        fs::write(dir.path().join("UPPER.SBC"), RAIL).unwrap();
        let mut loader = GameDataLoader::new();
        let report = loader.load_blocks(dir.path());
        assert_eq!(report.loaded, 1);
    }

    #[cfg(unix)]
    #[test]
    fn test_load_blocks_symlink() {
        let source = TempDir::new().unwrap();
        let target = source.path().join("rail.txt");
        fs::write(&target, RAIL).unwrap();
        let dir = TempDir::new().unwrap();
        std::os::unix::fs::symlink(&target, dir.path().join("linked.sbc")).unwrap();
        let mut loader = GameDataLoader::new();
        let report = loader.load_blocks(dir.path());
        assert_eq!(report.loaded, 1);
        assert!(loader.catalog().block("LargeRailStraight").is_some());
    }

    #[test]
    fn test_load_blocks_missing_dir() {
        let dir = TempDir::new().unwrap();
        let mut loader = GameDataLoader::new();
        let report = loader.load_blocks(dir.path().join("nope"));
        assert_eq!(report.loaded, 0);
        assert!(matches!(report.skipped[0], SkipReason::MissingSource(_)));
        assert!(loader.catalog().is_empty());
    }

    #[test]
    fn test_load_recipes() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("Blueprints.sbc");
        fs::write(&path, RECIPES).unwrap();
        let mut loader = GameDataLoader::new();
        let report = loader.load_recipes(&path);
        assert_eq!(report.loaded, 1);
        assert!(report.is_clean());
        let catalog = loader.finalize();
        let plate = catalog.recipe("SteelPlate").unwrap();
        assert_eq!(plate.output_quantity(), 1.0);
        assert_eq!(plate.materials()["Iron"], 21.0);
        assert!(catalog.recipe("Iron").is_none());
    }

    #[test]
    fn test_load_recipes_malformed() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("Blueprints.sbc");
        fs::write(&path, "<Definitions><Blueprints>").unwrap();
        let mut loader = GameDataLoader::new();
        let report = loader.load_recipes(&path);
        assert_eq!(report.loaded, 0);
        assert!(matches!(
            report.skipped[0],
            SkipReason::MalformedSourceFile(_, _)
        ));
        let report = loader.load_recipes(dir.path().join("missing.sbc"));
        assert!(matches!(report.skipped[0], SkipReason::MissingSource(_)));
        assert!(loader.catalog().recipes().is_empty());
    }

    #[test]
    fn test_mod_overrides_base() {
        let base = TempDir::new().unwrap();
        let blocks = base.path().join(CUBE_BLOCKS_PATH);
        fs::create_dir_all(&blocks).unwrap();
        fs::write(blocks.join("rail.sbc"), RAIL).unwrap();
        fs::write(base.path().join(BLUEPRINTS_PATH), RECIPES).unwrap();

        let modded = TempDir::new().unwrap();
        let blocks = modded.path().join(CUBE_BLOCKS_PATH);
        fs::create_dir_all(&blocks).unwrap();
        fs::write(
            blocks.join("rail.sbc"),
            RAIL.replace(r#"Subtype="SteelPlate" Count="12""#, r#"Subtype="SteelPlate" Count="1""#),
        )
        .unwrap();

        let mut loader = GameDataLoader::new();
        let report = loader.process_game_path(base.path());
        assert_eq!(report.loaded, 2);
        let report = loader.process_mod_path(modded.path());
        assert_eq!(report.loaded, 1);
        let catalog = loader.finalize();
        assert_eq!(
            catalog.block("LargeRailStraight").unwrap().components()["SteelPlate"],
            1
        );
        assert!(catalog.recipe("SteelPlate").is_some());
    }

    #[test]
    fn test_mod_without_data() {
        let modded = TempDir::new().unwrap();
        let mut loader = GameDataLoader::new();
        let report = loader.process_mod_path(modded.path());
        assert_eq!(report.loaded, 0);
        assert!(report.is_clean());
    }
}
