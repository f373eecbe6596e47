use std::collections::HashMap;

/// A submodule that provides the [BlockRecord] object.
mod block;
pub use block::BlockRecord;

/// A submodule that provides the [RecipeRecord] object.
mod recipe;
pub use recipe::{RecipeRecord, COMPONENT_CATEGORY};

/// Shared helpers for reading definition entries
mod definition;
pub use definition::DefinitionError;

mod loader;
pub use loader::{GameDataLoader, LoadReport, SkipReason, BLOCK_EXTENSION};

/// The lookup tables the blueprint checker works against.
///
/// Keys are the block subtype ids and the recipe output subtype ids
/// respectively. Inserting an existing key replaces the previous record, so
/// data loaded later (mods) wins over data loaded earlier (the base game).
#[derive(Debug, Default, Clone)]
pub struct Catalog {
    blocks: HashMap<String, BlockRecord>,
    recipes: HashMap<String, RecipeRecord>,
}

impl Catalog {
    pub fn new() -> Self {
        Catalog::default()
    }

    /// Inserts a block, returning the record it replaced, if any.
    pub fn insert_block(&mut self, block: BlockRecord) -> Option<BlockRecord> {
        self.blocks.insert(block.sub_type_id().to_owned(), block)
    }

    /// Inserts a recipe, returning the record it replaced, if any.
    pub fn insert_recipe(&mut self, recipe: RecipeRecord) -> Option<RecipeRecord> {
        self.recipes
            .insert(recipe.output_type_id().to_owned(), recipe)
    }

    pub fn block(&self, sub_type_id: &str) -> Option<&BlockRecord> {
        self.blocks.get(sub_type_id)
    }

    pub fn recipe(&self, component: &str) -> Option<&RecipeRecord> {
        self.recipes.get(component)
    }

    pub fn blocks(&self) -> &HashMap<String, BlockRecord> {
        &self.blocks
    }

    pub fn recipes(&self) -> &HashMap<String, RecipeRecord> {
        &self.recipes
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty() && self.recipes.is_empty()
    }
}
