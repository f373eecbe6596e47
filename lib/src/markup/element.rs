use std::{fs, path::Path};

use super::{reader::read_document, MarkupError};

/// The byte order mark some of the game files start with.
const BOM: char = '\u{feff}';

/// A single element of a markup document, owning its subtree.
///
/// Names are kept exactly as written, prefix included (`xsi:type`), because
/// the game files are not namespace clean. Attributes are an ordered
/// association list, in the order they appear in the source document.
#[derive(Debug, Clone, PartialEq)]
pub struct MarkupElement {
    name: String,
    attributes: Vec<(String, String)>,
    children: Vec<MarkupElement>,
    text: String,
    position: u64,
}

impl MarkupElement {
    /// Create a new empty element with the given name.
    pub fn new<S: Into<String>>(name: S) -> Self {
        MarkupElement {
            name: name.into(),
            attributes: Vec::new(),
            children: Vec::new(),
            text: String::new(),
            position: 0,
        }
    }

    /// Builder style helper that appends an attribute.
    pub fn with_attribute<K: Into<String>, V: Into<String>>(mut self, key: K, value: V) -> Self {
        self.attributes.push((key.into(), value.into()));
        self
    }

    /// Builder style helper that appends a child element.
    pub fn with_child(mut self, child: MarkupElement) -> Self {
        self.children.push(child);
        self
    }

    /// Builder style helper that appends text.
    pub fn with_text<S: AsRef<str>>(mut self, text: S) -> Self {
        self.text.push_str(text.as_ref());
        self
    }

    /// Parse a whole document, returning its root element.
    pub fn parse(contents: &str) -> Result<Self, MarkupError> {
        read_document(contents.trim_start_matches(BOM))
    }

    /// Read and parse the document at the given path.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, MarkupError> {
        let contents = String::from_utf8(fs::read(path)?)?;
        MarkupElement::parse(&contents)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The byte offset in the source document where reading of this element
    /// began. Zero for elements built by hand.
    pub fn position(&self) -> u64 {
        self.position
    }

    pub(super) fn set_position(&mut self, position: u64) {
        self.position = position;
    }

    pub(super) fn push_attribute(&mut self, key: String, value: String) {
        self.attributes.push((key, value));
    }

    pub(super) fn push_child(&mut self, child: MarkupElement) {
        self.children.push(child);
    }

    pub(super) fn push_text(&mut self, text: &str) {
        self.text.push_str(text);
    }

    /// The attributes of this element in source order.
    pub fn attributes(&self) -> &[(String, String)] {
        &self.attributes
    }

    /// Returns the value of the first attribute with the given name.
    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// The direct children of this element.
    pub fn children(&self) -> &[MarkupElement] {
        &self.children
    }

    /// Returns the first direct child with the given name.
    pub fn child(&self, name: &str) -> Option<&MarkupElement> {
        self.children.iter().find(|c| c.name == name)
    }

    /// Returns all direct children with the given name.
    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a MarkupElement> {
        self.children.iter().filter(move |c| c.name == name)
    }

    /// The text of this element, trimmed.
    pub fn text(&self) -> &str {
        self.text.trim()
    }

    /// The trimmed text of the first child with the given name, or [None]
    /// if the child is missing or has no text.
    pub fn child_text(&self, name: &str) -> Option<&str> {
        self.child(name).map(|c| c.text()).filter(|t| !t.is_empty())
    }

    /// Iterates over this element and all of its descendants in document
    /// order.
    pub fn descendants(&self) -> Descendants<'_> {
        Descendants { stack: vec![self] }
    }

    /// Like [MarkupElement::descendants], but only yields elements with the
    /// given name.
    pub fn descendants_named<'a>(
        &'a self,
        name: &'a str,
    ) -> impl Iterator<Item = &'a MarkupElement> {
        self.descendants().filter(move |e| e.name == name)
    }
}

/// A pre-order iterator over a subtree.
pub struct Descendants<'a> {
    stack: Vec<&'a MarkupElement>,
}

impl<'a> Iterator for Descendants<'a> {
    type Item = &'a MarkupElement;

    fn next(&mut self) -> Option<Self::Item> {
        let element = self.stack.pop()?;
        // reversed so that the first child is visited first
        self.stack.extend(element.children.iter().rev());
        Some(element)
    }
}
