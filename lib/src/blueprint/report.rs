use std::collections::BTreeMap;

use super::{
    inventory::{BlockAnomaly, BlockInventory},
    resolver::{ComponentResolution, MaterialResolution},
};

/// Everything we know about the cost of a blueprint.
///
/// All lookups are ordered by key, so two reports built from the same inputs
/// compare, print and serialize identically. An identifier in one of the
/// unknown lists contributed nothing to the totals, which is how "not used"
/// can be told apart from "not recognized".
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct AggregationReport {
    /// Block name to the number of placed instances
    pub blocks: BTreeMap<String, u64>,
    /// Component totals over all recognized blocks
    pub components: BTreeMap<String, u64>,
    /// Blocks missing from the catalog
    pub unknown_blocks: Vec<String>,
    /// Raw material totals over all recognized components
    pub materials_estimate: BTreeMap<String, f64>,
    /// Components missing from the catalog
    pub unknown_components: Vec<String>,
    /// Block names that were made up by the fallback heuristic
    pub fallback_names: Vec<String>,
    /// Block nodes that could not be named at all
    pub anomalies: Vec<BlockAnomaly>,
}

impl AggregationReport {
    /// Combine the results of all the resolution stages.
    pub fn assemble(
        inventory: BlockInventory,
        components: ComponentResolution,
        materials: MaterialResolution,
    ) -> Self {
        AggregationReport {
            blocks: inventory.counts,
            components: components.components,
            unknown_blocks: components.unknown_blocks,
            materials_estimate: materials.materials,
            unknown_components: materials.unknown_components,
            fallback_names: inventory.fallback_names.into_iter().collect(),
            anomalies: inventory.anomalies,
        }
    }

    /// The number of placed blocks, recognized or not.
    pub fn total_blocks(&self) -> u64 {
        self.blocks.values().sum()
    }

    /// Whether every block node was named and every identifier resolved.
    pub fn is_complete(&self) -> bool {
        self.unknown_blocks.is_empty()
            && self.unknown_components.is_empty()
            && self.anomalies.is_empty()
    }
}
