/// Blueprint checking. Turns a blueprint into the blocks, components and
/// raw materials it is made of.
///
/// ## Getting Started
///
/// First build a [game_data::Catalog] using the [game_data::GameDataLoader],
/// then hand it to a [blueprint::BlueprintChecker]. The checker returns an
/// [blueprint::AggregationReport] for each blueprint it checks.
///
/// ## Loading order
///
/// Each load call merges into the same catalog, and later definitions replace
/// earlier ones with the same id. Load the base game first, and the mods
/// after it, in the order they should override each other.
///
/// ## Example
///
/// ```rust,no_run
/// use se_material_checker_lib::{blueprint::BlueprintChecker, game_data::GameDataLoader};
///
/// let mut loader = GameDataLoader::new();
/// loader.process_game_path("/path/to/SpaceEngineers/Content");
/// let catalog = loader.finalize();
/// let checker = BlueprintChecker::new(&catalog);
/// if let Ok(report) = checker.check_blueprint("/path/to/bp.sbc") {
///     for (material, amount) in &report.materials_estimate {
///         println!("{}: {}", material, amount);
///     }
/// }
/// ```
pub mod blueprint;

/// A submodule for handling the game data
pub mod game_data;

/// A small owned XML tree, the intermediate representation of every file we
/// read.
pub mod markup;
