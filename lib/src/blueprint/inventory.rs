use std::{
    collections::{BTreeMap, BTreeSet},
    fmt,
};

use tracing::{debug, warn};

use super::{
    super::markup::MarkupElement,
    naming::{resolve_block_name, BlockName, NamingPolicy},
};

/// The element type of a single placed block, regardless of which grid it
/// belongs to.
pub const CUBE_BLOCK: &str = "MyObjectBuilder_CubeBlock";

/// A block node that could not be named.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct BlockAnomaly {
    /// Byte offset of the node within the blueprint
    pub position: u64,
    /// The attributes of the node, in source order
    pub attributes: Vec<(String, String)>,
}

impl BlockAnomaly {
    fn new(block: &MarkupElement) -> Self {
        BlockAnomaly {
            position: block.position(),
            attributes: block.attributes().to_vec(),
        }
    }
}

impl fmt::Display for BlockAnomaly {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unnamed block at offset {}", self.position)?;
        if !self.attributes.is_empty() {
            f.write_str(" (")?;
            for (i, (key, value)) in self.attributes.iter().enumerate() {
                if i > 0 {
                    f.write_str(", ")?;
                }
                write!(f, "{}=\"{}\"", key, value)?;
            }
            f.write_str(")")?;
        }
        Ok(())
    }
}

/// The blocks that make up a blueprint.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BlockInventory {
    /// Block name to the number of placed instances
    pub counts: BTreeMap<String, u64>,
    /// Names that were made up with the fallback heuristic
    pub fallback_names: BTreeSet<String>,
    /// Block nodes that could not be named
    pub anomalies: Vec<BlockAnomaly>,
}

impl BlockInventory {
    fn add(&mut self, name: BlockName) {
        if let BlockName::Fallback(name) = name {
            if !self.fallback_names.contains(name) {
                debug!("Trying block name: {}", name);
                self.fallback_names.insert(name.to_owned());
            }
        }
        *self.counts.entry(name.as_str().to_owned()).or_insert(0) += 1;
    }
}

/// Counts the blocks of a blueprint.
/// Every block node in the document is visited, however many grids there are
/// and however deep they are nested.
pub fn count_blocks(tree: &MarkupElement, policy: &NamingPolicy) -> BlockInventory {
    let mut inventory = BlockInventory::default();
    for block in tree.descendants_named(CUBE_BLOCK) {
        match resolve_block_name(block, policy) {
            Some(name) => inventory.add(name),
            None => {
                let anomaly = BlockAnomaly::new(block);
                warn!("Could not name a block: {}", anomaly);
                inventory.anomalies.push(anomaly);
            }
        }
    }
    inventory
}
