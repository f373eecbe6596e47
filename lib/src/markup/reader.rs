use std::str;

use quick_xml::{
    events::{BytesStart, Event},
    Reader,
};

use super::{MarkupElement, MarkupError};

/// Creates an element from a start tag, copying over the attributes in order.
fn start_element(tag: &BytesStart, position: u64) -> Result<MarkupElement, MarkupError> {
    let mut element = MarkupElement::new(String::from_utf8_lossy(tag.name().as_ref()));
    element.set_position(position);
    for attribute in tag.attributes() {
        let attribute = attribute?;
        let key = String::from_utf8_lossy(attribute.key.as_ref()).into_owned();
        let value = attribute.unescape_value()?.into_owned();
        element.push_attribute(key, value);
    }
    Ok(element)
}

/// Attaches a finished element either to its parent or, if there is no
/// parent, makes it the document root.
fn close_element(
    element: MarkupElement,
    stack: &mut Vec<MarkupElement>,
    root: &mut Option<MarkupElement>,
) -> Result<(), MarkupError> {
    if let Some(parent) = stack.last_mut() {
        parent.push_child(element);
    } else if root.is_some() {
        return Err(MarkupError::StructureError("multiple root elements"));
    } else {
        *root = Some(element);
    }
    Ok(())
}

/// Builds the element tree out of the reader events.
pub(super) fn read_document(contents: &str) -> Result<MarkupElement, MarkupError> {
    let mut reader = Reader::from_str(contents);
    reader.config_mut().trim_text(true);
    let mut stack: Vec<MarkupElement> = Vec::new();
    let mut root = None;
    loop {
        let position = reader.buffer_position() as u64;
        match reader.read_event()? {
            Event::Start(tag) => {
                if root.is_some() && stack.is_empty() {
                    return Err(MarkupError::StructureError("multiple root elements"));
                }
                stack.push(start_element(&tag, position)?);
            }
            Event::Empty(tag) => {
                let element = start_element(&tag, position)?;
                close_element(element, &mut stack, &mut root)?;
            }
            Event::End(_) => {
                // the reader checks that end tags match, so this is the element being closed
                let element = stack
                    .pop()
                    .ok_or(MarkupError::StructureError("unexpected end tag"))?;
                close_element(element, &mut stack, &mut root)?;
            }
            Event::Text(text) => {
                let text = text.unescape()?;
                if let Some(current) = stack.last_mut() {
                    current.push_text(&text);
                } else if !text.trim().is_empty() {
                    return Err(MarkupError::StructureError(
                        "text outside of the root element",
                    ));
                }
            }
            Event::CData(data) => {
                let text = str::from_utf8(&data)?;
                if let Some(current) = stack.last_mut() {
                    current.push_text(text);
                } else {
                    return Err(MarkupError::StructureError(
                        "character data outside of the root element",
                    ));
                }
            }
            Event::Eof => break,
            // declarations, comments, processing instructions and doctypes carry nothing for us
            _ => {}
        }
    }
    if !stack.is_empty() {
        return Err(MarkupError::StructureError("unclosed element"));
    }
    root.ok_or(MarkupError::StructureError("no root element"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_document() {
        let root = MarkupElement::parse(
            r#"<?xml version="1.0"?>
            <Definitions>
                <Item Subtype="SteelPlate" Count="3" />
                <Name>  Some &amp; thing </Name>
            </Definitions>"#,
        )
        .unwrap();
        assert_eq!(root.name(), "Definitions");
        assert_eq!(root.children().len(), 2);
        let item = root.child("Item").unwrap();
        assert_eq!(item.attribute("Subtype"), Some("SteelPlate"));
        assert_eq!(item.attribute("Count"), Some("3"));
        assert_eq!(root.child_text("Name"), Some("Some & thing"));
    }

    #[test]
    fn test_attribute_source_order() {
        let root = MarkupElement::parse(r#"<a xsi:type="x_One" b="y_Two" aa="z_Three"/>"#).unwrap();
        let keys: Vec<&str> = root.attributes().iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, vec!["xsi:type", "b", "aa"]);
    }

    #[test]
    fn test_bom() {
        let root = MarkupElement::parse("\u{feff}<a/>").unwrap();
        assert_eq!(root.name(), "a");
    }

    #[test]
    fn test_cdata() {
        let root = MarkupElement::parse("<a><![CDATA[x < y]]></a>").unwrap();
        assert_eq!(root.text(), "x < y");
    }

    #[test]
    fn test_not_markup() {
        assert!(MarkupElement::parse("Some non-XML text").is_err());
    }

    #[test]
    fn test_empty() {
        assert!(MarkupElement::parse("").is_err());
        assert!(MarkupElement::parse("   \n ").is_err());
    }

    #[test]
    fn test_unclosed() {
        assert!(MarkupElement::parse("<a><b></b>").is_err());
    }

    #[test]
    fn test_mismatched() {
        assert!(MarkupElement::parse("<a><b></a></b>").is_err());
    }

    #[test]
    fn test_multiple_roots() {
        assert!(MarkupElement::parse("<a/><b/>").is_err());
        assert!(MarkupElement::parse("<a></a><b></b>").is_err());
    }

    #[test]
    fn test_duplicate_attribute() {
        assert!(MarkupElement::parse(r#"<a b="1" b="2"/>"#).is_err());
    }

    #[test]
    fn test_positions() {
        let root = MarkupElement::parse("<a><b/><c/></a>").unwrap();
        assert_eq!(root.position(), 0);
        assert_eq!(root.children()[0].position(), 3);
        assert_eq!(root.children()[1].position(), 7);
    }
}
