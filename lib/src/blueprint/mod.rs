/// A submodule that names block nodes, see [NamingPolicy].
mod naming;
pub use naming::{resolve_block_name, BlockName, NamingPolicy};

/// A submodule that provides the [BlockInventory] of a blueprint.
mod inventory;
pub use inventory::{count_blocks, BlockAnomaly, BlockInventory, CUBE_BLOCK};

/// The two catalog lookups and the [BlueprintChecker] facade
mod resolver;
pub use resolver::{
    open_blueprint, resolve_components, resolve_materials, BlueprintChecker, BlueprintError,
    ComponentResolution, MaterialResolution,
};

mod report;
pub use report::AggregationReport;
