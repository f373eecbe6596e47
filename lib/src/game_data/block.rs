use std::collections::BTreeMap;

use super::{
    super::markup::MarkupElement,
    definition::{quantity_attribute, required_attribute, DefinitionError},
};

const ID: &str = "Id";
const TYPE_ID: &str = "TypeId";
const SUBTYPE_ID: &str = "SubtypeId";
const DISPLAY_NAME: &str = "DisplayName";
const COMPONENTS: &str = "Components";
const COMPONENT_SUBTYPE: &str = "Subtype";
const COMPONENT_COUNT: &str = "Count";

/// A placeable block type, as defined in the game's `CubeBlocks` files.
#[derive(Debug, Clone, PartialEq)]
pub struct BlockRecord {
    type_id: String,
    sub_type_id: String,
    display_name: String,
    components: BTreeMap<String, u64>,
}

impl BlockRecord {
    /// Create a new record by hand.
    /// An empty `sub_type_id` falls back onto `type_id`, same as when loading.
    pub fn new<T: Into<String>, S: Into<String>, D: Into<String>>(
        type_id: T,
        sub_type_id: S,
        display_name: D,
        components: BTreeMap<String, u64>,
    ) -> Self {
        let type_id = type_id.into();
        let mut sub_type_id = sub_type_id.into();
        if sub_type_id.is_empty() {
            sub_type_id = type_id.clone();
        }
        BlockRecord {
            type_id,
            sub_type_id,
            display_name: display_name.into(),
            components,
        }
    }

    /// Builds a record from a single `Definition` element.
    ///
    /// ```xml
    /// <Definition>
    ///     <Id>
    ///         <TypeId>CubeBlock</TypeId>
    ///         <SubtypeId>LargeRailStraight</SubtypeId>
    ///     </Id>
    ///     <DisplayName>Straight Rail</DisplayName>
    ///     <Components>
    ///         <Component Subtype="SteelPlate" Count="8" />
    ///         <Component Subtype="SteelPlate" Count="4" />
    ///     </Components>
    /// </Definition>
    /// ```
    ///
    /// Repeated components are summed up. A definition without a type id is
    /// rejected with [DefinitionError::MissingField].
    pub fn from_element(element: &MarkupElement) -> Result<Self, DefinitionError> {
        let id = element
            .child(ID)
            .ok_or(DefinitionError::MissingField(TYPE_ID))?;
        let type_id = id
            .child_text(TYPE_ID)
            .ok_or(DefinitionError::MissingField(TYPE_ID))?;
        // weird case where the subtype is sometimes left empty
        let sub_type_id = id.child_text(SUBTYPE_ID).unwrap_or(type_id);
        let display_name = element.child_text(DISPLAY_NAME).unwrap_or_default();
        let mut components = BTreeMap::new();
        if let Some(list) = element.child(COMPONENTS) {
            for component in list.children() {
                let subtype = required_attribute(component, COMPONENT_SUBTYPE)?;
                let count: u64 = quantity_attribute(component, COMPONENT_COUNT)?;
                *components.entry(subtype.to_owned()).or_insert(0) += count;
            }
        }
        Ok(BlockRecord {
            type_id: type_id.to_owned(),
            sub_type_id: sub_type_id.to_owned(),
            display_name: display_name.to_owned(),
            components,
        })
    }

    pub fn type_id(&self) -> &str {
        &self.type_id
    }

    /// The key of this block in the catalog. Never empty.
    pub fn sub_type_id(&self) -> &str {
        &self.sub_type_id
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    /// Components needed to build a single block of this type.
    pub fn components(&self) -> &BTreeMap<String, u64> {
        &self.components
    }
}
