use std::{io, str::Utf8Error, string::FromUtf8Error};

use derive_more::{Display, Error, From};

/// An error that can occur when reading a markup document.
/// Any of these means the document as a whole is unusable, we never hand out
/// a partial tree.
#[derive(Debug, From, Display, Error)]
pub enum MarkupError {
    /// Something went wrong with stdlib IO.
    IoError(io::Error),
    /// The underlying reader rejected the document.
    XmlError(quick_xml::Error),
    /// The file is not valid UTF-8
    DecodingError(FromUtf8Error),
    /// A CDATA section is not valid UTF-8
    CDataError(Utf8Error),
    /// The document is well tokenized, but its structure is wrong
    #[display("malformed document: {}", _0)]
    StructureError(#[error(not(source))] &'static str),
}

impl From<quick_xml::events::attributes::AttrError> for MarkupError {
    fn from(e: quick_xml::events::attributes::AttrError) -> Self {
        MarkupError::XmlError(e.into())
    }
}
