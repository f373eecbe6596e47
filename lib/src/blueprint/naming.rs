use super::super::markup::MarkupElement;

/// The child element holding the block name.
const SUBTYPE_NAME: &str = "SubtypeName";

/// How to name a block node that does not declare its subtype.
///
/// Neither option is a guarantee. The fallback reads the naming convention of
/// the element's type attribute (`MyObjectBuilder_Door` → `Door`), which
/// gives the block type rather than the exact subtype.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum NamingPolicy {
    /// Take the suffix of every attribute in source order, the last one wins
    #[default]
    LastAttribute,
    /// Only ever look at the attribute with this name
    Attribute(String),
}

/// A resolved block name, and where it came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockName<'a> {
    /// From the `SubtypeName` child
    Declared(&'a str),
    /// Made up from the attributes
    Fallback(&'a str),
}

impl<'a> BlockName<'a> {
    pub fn as_str(&self) -> &'a str {
        match *self {
            BlockName::Declared(name) | BlockName::Fallback(name) => name,
        }
    }
}

/// The segment between the first and the second `_`, if there is anything.
fn suffix(value: &str) -> Option<&str> {
    value
        .split('_')
        .nth(1)
        .map(str::trim)
        .filter(|segment| !segment.is_empty())
}

/// Get the name of a single block node.
///
/// The `SubtypeName` child is preferred. It's possible there is no subtype
/// name, or that it is empty, in which case one is made up from the
/// attributes according to the [NamingPolicy]. Returns [None] if neither
/// works out.
pub fn resolve_block_name<'a>(
    block: &'a MarkupElement,
    policy: &NamingPolicy,
) -> Option<BlockName<'a>> {
    if let Some(name) = block.child_text(SUBTYPE_NAME) {
        return Some(BlockName::Declared(name));
    }
    let fallback = match policy {
        NamingPolicy::LastAttribute => block
            .attributes()
            .iter()
            .filter_map(|(_, value)| suffix(value))
            .last(),
        NamingPolicy::Attribute(key) => block.attribute(key).and_then(suffix),
    };
    fallback.map(BlockName::Fallback)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_declared() {
        let block = MarkupElement::new("MyObjectBuilder_CubeBlock")
            .with_attribute("xsi:type", "xyz_SomeBlock")
            .with_child(MarkupElement::new(SUBTYPE_NAME).with_text("FancyBlockName"));
        assert_eq!(
            resolve_block_name(&block, &NamingPolicy::default()),
            Some(BlockName::Declared("FancyBlockName"))
        );
    }

    #[test]
    fn test_fallback() {
        let block = MarkupElement::new("MyObjectBuilder_CubeBlock")
            .with_attribute("xsi:type", "xyz_Foo")
            .with_child(MarkupElement::new(SUBTYPE_NAME));
        assert_eq!(
            resolve_block_name(&block, &NamingPolicy::default()),
            Some(BlockName::Fallback("Foo"))
        );
    }

    #[test]
    fn test_fallback_second_segment() {
        let block = MarkupElement::new("MyObjectBuilder_CubeBlock")
            .with_attribute("xsi:type", "MyObjectBuilder_Cockpit_Seat");
        assert_eq!(
            resolve_block_name(&block, &NamingPolicy::default()).map(|n| n.as_str()),
            Some("Cockpit")
        );
        let block = MarkupElement::new("MyObjectBuilder_CubeBlock")
            .with_attribute("xsi:type", "MyObjectBuilder__Seat");
        assert!(resolve_block_name(&block, &NamingPolicy::default()).is_none());
    }

    #[test]
    fn test_fallback_last_attribute() {
        let block = MarkupElement::new("MyObjectBuilder_CubeBlock")
            .with_attribute("xsi:type", "MyObjectBuilder_Door")
            .with_attribute("Extra", "x_Other")
            .with_attribute("Plain", "nounderscore");
        assert_eq!(
            resolve_block_name(&block, &NamingPolicy::LastAttribute),
            Some(BlockName::Fallback("Other"))
        );
        assert_eq!(
            resolve_block_name(&block, &NamingPolicy::Attribute("xsi:type".to_owned())),
            Some(BlockName::Fallback("Door"))
        );
    }

    #[test]
    fn test_unresolvable() {
        let block = MarkupElement::new("MyObjectBuilder_CubeBlock")
            .with_attribute("Plain", "nounderscore")
            .with_attribute("Trailing", "trailing_");
        assert!(resolve_block_name(&block, &NamingPolicy::default()).is_none());
        let block = MarkupElement::new("MyObjectBuilder_CubeBlock");
        assert!(resolve_block_name(&block, &NamingPolicy::default()).is_none());
        let block = MarkupElement::new("MyObjectBuilder_CubeBlock")
            .with_attribute("xsi:type", "x_Door");
        assert!(resolve_block_name(&block, &NamingPolicy::Attribute("Other".to_owned())).is_none());
    }
}
