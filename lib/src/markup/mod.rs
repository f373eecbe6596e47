/// A submodule that provides the [MarkupElement] tree and its queries.
mod element;
pub use element::{Descendants, MarkupElement};

/// The [quick_xml] event loop building the tree
mod reader;

mod error;
pub use error::MarkupError;
