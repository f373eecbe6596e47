use std::collections::BTreeMap;

use super::{
    super::markup::MarkupElement,
    definition::{amount_attribute, required_attribute, DefinitionError},
};

const RESULT: &str = "Result";
const PREREQUISITES: &str = "Prerequisites";
const TYPE_ID: &str = "TypeId";
const SUBTYPE_ID: &str = "SubtypeId";
const AMOUNT: &str = "Amount";

/// The only output category we care about. Ingots, tools and the like have
/// their own recipes, but blocks are built out of components.
pub const COMPONENT_CATEGORY: &str = "Component";

/// How a single component is crafted, as defined in the game's
/// `Blueprints.sbc`.
#[derive(Debug, Clone, PartialEq)]
pub struct RecipeRecord {
    output_type_id: String,
    output_quantity: f64,
    materials: BTreeMap<String, f64>,
}

impl RecipeRecord {
    /// Create a new record by hand.
    pub fn new<S: Into<String>>(
        output_type_id: S,
        output_quantity: f64,
        materials: BTreeMap<String, f64>,
    ) -> Self {
        RecipeRecord {
            output_type_id: output_type_id.into(),
            output_quantity,
            materials,
        }
    }

    /// Builds a record from a single `Blueprint` element.
    ///
    /// ```xml
    /// <Blueprint>
    ///     <Prerequisites>
    ///         <Item Amount="21" TypeId="Ingot" SubtypeId="Iron" />
    ///     </Prerequisites>
    ///     <Result Amount="1" TypeId="Component" SubtypeId="SteelPlate" />
    /// </Blueprint>
    /// ```
    ///
    /// Returns [None] for blueprints that do not produce a component, or that
    /// have no `Result` at all. That is expected and not an error.
    pub fn from_element(element: &MarkupElement) -> Result<Option<Self>, DefinitionError> {
        let result = match element.child(RESULT) {
            Some(result) => result,
            None => return Ok(None),
        };
        if result.attribute(TYPE_ID).map(str::trim) != Some(COMPONENT_CATEGORY) {
            return Ok(None);
        }
        let output_type_id = required_attribute(result, SUBTYPE_ID)?;
        let output_quantity = amount_attribute(result, AMOUNT)?;
        let mut materials = BTreeMap::new();
        if let Some(list) = element.child(PREREQUISITES) {
            for item in list.children() {
                let material = required_attribute(item, SUBTYPE_ID)?;
                let amount = amount_attribute(item, AMOUNT)?;
                *materials.entry(material.to_owned()).or_insert(0.0) += amount;
            }
        }
        Ok(Some(RecipeRecord {
            output_type_id: output_type_id.to_owned(),
            output_quantity,
            materials,
        }))
    }

    /// The key of this recipe in the catalog.
    pub fn output_type_id(&self) -> &str {
        &self.output_type_id
    }

    /// How many components a single craft produces.
    pub fn output_quantity(&self) -> f64 {
        self.output_quantity
    }

    /// Raw materials consumed by a single craft.
    pub fn materials(&self) -> &BTreeMap<String, f64> {
        &self.materials
    }
}
