use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
};

use derive_more::{Display, Error};
use tracing::{debug, error, info};

use super::{
    super::{
        game_data::Catalog,
        markup::{MarkupElement, MarkupError},
    },
    inventory::count_blocks,
    naming::NamingPolicy,
    report::AggregationReport,
};

/// An error that aborts checking a blueprint.
#[derive(Debug, Display, Error)]
pub enum BlueprintError {
    /// The blueprint could not be read or parsed
    #[display("invalid blueprint format in {}: {}", _0.display(), _1)]
    InvalidBlueprintFormat(PathBuf, #[error(source)] MarkupError),
}

/// Component totals of a set of blocks.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ComponentResolution {
    pub components: BTreeMap<String, u64>,
    /// Blocks that are not in the catalog, each listed once
    pub unknown_blocks: Vec<String>,
}

/// Raw material totals of a set of components.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MaterialResolution {
    pub materials: BTreeMap<String, f64>,
    /// Components that are not in the catalog, each listed once
    pub unknown_components: Vec<String>,
}

/// Open a blueprint.
/// A blueprint that does not parse is an error, we never proceed with a
/// partial tree.
pub fn open_blueprint<P: AsRef<Path>>(path: P) -> Result<MarkupElement, BlueprintError> {
    let path = path.as_ref();
    MarkupElement::open(path).map_err(|e| {
        error!("Could not open blueprint {}: {}", path.display(), e);
        BlueprintError::InvalidBlueprintFormat(path.to_owned(), e)
    })
}

/// Sums up the components needed for the given blocks.
/// Blocks missing from the catalog count for nothing and are listed instead.
pub fn resolve_components(
    block_counts: &BTreeMap<String, u64>,
    catalog: &Catalog,
) -> ComponentResolution {
    let mut resolution = ComponentResolution::default();
    for (name, count) in block_counts {
        let block = match catalog.block(name) {
            Some(block) => block,
            None => {
                debug!("Unknown block: {}", name);
                resolution.unknown_blocks.push(name.clone());
                continue;
            }
        };
        for (component, per_block) in block.components() {
            let total = resolution.components.entry(component.clone()).or_insert(0);
            *total = total.saturating_add(per_block.saturating_mul(*count));
        }
    }
    resolution
}

/// Sums up the raw materials needed for the given components.
/// Components missing from the catalog count for nothing and are listed
/// instead. Amounts are per component, the output quantity of a craft is not
/// taken into account.
pub fn resolve_materials(
    component_totals: &BTreeMap<String, u64>,
    catalog: &Catalog,
) -> MaterialResolution {
    let mut resolution = MaterialResolution::default();
    for (component, count) in component_totals {
        let recipe = match catalog.recipe(component) {
            Some(recipe) => recipe,
            None => {
                debug!("Unknown component: {}", component);
                resolution.unknown_components.push(component.clone());
                continue;
            }
        };
        for (material, per_component) in recipe.materials() {
            *resolution.materials.entry(material.clone()).or_insert(0.0) +=
                per_component * *count as f64;
        }
    }
    resolution
}

/// Checks blueprints against a finished [Catalog].
///
/// Holds no state of its own besides the catalog reference and the naming
/// policy, so checking the same blueprint twice yields the same report.
pub struct BlueprintChecker<'a> {
    catalog: &'a Catalog,
    naming: NamingPolicy,
}

impl<'a> BlueprintChecker<'a> {
    pub fn new(catalog: &'a Catalog) -> Self {
        BlueprintChecker {
            catalog,
            naming: NamingPolicy::default(),
        }
    }

    /// Replace the policy used for naming blocks without a subtype.
    pub fn with_naming(mut self, naming: NamingPolicy) -> Self {
        self.naming = naming;
        self
    }

    /// Check an already parsed blueprint.
    pub fn check_tree(&self, tree: &MarkupElement) -> AggregationReport {
        let inventory = count_blocks(tree, &self.naming);
        let components = resolve_components(&inventory.counts, self.catalog);
        let materials = resolve_materials(&components.components, self.catalog);
        AggregationReport::assemble(inventory, components, materials)
    }

    /// Check a blueprint file.
    /// Only failing to open the blueprint is an error, unknown identifiers are
    /// reported within the [AggregationReport].
    pub fn check_blueprint<P: AsRef<Path>>(
        &self,
        path: P,
    ) -> Result<AggregationReport, BlueprintError> {
        let path = path.as_ref();
        let tree = open_blueprint(path)?;
        let report = self.check_tree(&tree);
        info!(
            "Checked {}: {} blocks, {} unknown blocks, {} unknown components",
            path.display(),
            report.total_blocks(),
            report.unknown_blocks.len(),
            report.unknown_components.len()
        );
        Ok(report)
    }
}
