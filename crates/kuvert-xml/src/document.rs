#![forbid(unsafe_code)]

//! Parsing entry points over roxmltree.

use kuvert_core::Error;

/// Parse `xml` into a roxmltree document borrowing from it.
pub fn parse(xml: &str) -> Result<roxmltree::Document<'_>, Error> {
    roxmltree::Document::parse_with_options(xml, crate::parsing_options())
        .map_err(|e| Error::XmlParse(e.to_string()))
}

/// View raw input bytes as XML text, rejecting invalid UTF-8.
pub fn text_from_bytes(data: &[u8]) -> Result<&str, Error> {
    std::str::from_utf8(data).map_err(|e| Error::XmlParse(format!("invalid UTF-8: {e}")))
}
