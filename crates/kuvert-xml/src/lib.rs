#![forbid(unsafe_code)]

//! XML support for the kuvert XML Encryption library.
//!
//! Provides parsing over `roxmltree`, a small [`XmlNode`]
//! abstraction with namespace-agnostic lookups on top of it, and the string
//! templates used to render `EncryptedData` / `EncryptedKey` markup.

pub mod document;
pub mod lookup;
pub mod node;
pub mod template;

pub use document::{parse, text_from_bytes};
pub use node::XmlNode;
pub use template::{BuiltinTemplates, TemplateParams, TemplateRenderer};

/// Return roxmltree parsing options that allow DTD.
///
/// roxmltree never expands external entities, so accepting a DOCTYPE is safe
/// and some producers emit one in front of SAML responses.
pub fn parsing_options() -> roxmltree::ParsingOptions {
    roxmltree::ParsingOptions {
        allow_dtd: true,
        ..roxmltree::ParsingOptions::default()
    }
}
