#![forbid(unsafe_code)]

//! String templates for XML-Enc markup.
//!
//! Templates use two placeholder forms:
//! - `{{name}}` inserts the value XML-escaped (text and attribute values)
//! - `{{{name}}}` inserts the value verbatim (pre-rendered fragments)
//!
//! Values are never reordered or reformatted beyond escaping.

use kuvert_core::Error;
use std::collections::BTreeMap;

/// Template rendering the `KeyInfo` / `EncryptedKey` fragment.
pub const KEY_INFO: &str = "keyinfo";

/// Template rendering the top-level `EncryptedData` document.
pub const ENCRYPTED_KEY: &str = "encrypted-key";

/// Flat key/value parameters handed to a template.
pub type TemplateParams<'a> = BTreeMap<&'a str, &'a str>;

/// Renders a named template with a flat parameter map.
pub trait TemplateRenderer: Send + Sync {
    fn render(&self, name: &str, params: &TemplateParams<'_>) -> Result<String, Error>;
}

/// The templates shipped with the library.
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinTemplates;

const KEY_INFO_TEMPLATE: &str = r#"<KeyInfo xmlns="http://www.w3.org/2000/09/xmldsig#">
  <e:EncryptedKey xmlns:e="http://www.w3.org/2001/04/xmlenc#">
    <e:EncryptionMethod Algorithm="{{keyEncryptionMethod}}">
      <DigestMethod Algorithm="http://www.w3.org/2000/09/xmldsig#sha1" />
    </e:EncryptionMethod>
    <KeyInfo>
      <X509Data><X509Certificate>{{encryptionPublicCert}}</X509Certificate></X509Data>
    </KeyInfo>
    <e:CipherData>
      <e:CipherValue>{{encryptedKey}}</e:CipherValue>
    </e:CipherData>
  </e:EncryptedKey>
</KeyInfo>"#;

const ENCRYPTED_KEY_TEMPLATE: &str = r#"<xenc:EncryptedData Type="http://www.w3.org/2001/04/xmlenc#Element" xmlns:xenc="http://www.w3.org/2001/04/xmlenc#">
  <xenc:EncryptionMethod Algorithm="{{contentEncryptionMethod}}" />
  {{{keyInfo}}}
  <xenc:CipherData>
    <xenc:CipherValue>{{encryptedContent}}</xenc:CipherValue>
  </xenc:CipherData>
</xenc:EncryptedData>"#;

impl BuiltinTemplates {
    /// Look up the source text of a builtin template.
    pub fn source(name: &str) -> Option<&'static str> {
        match name {
            KEY_INFO => Some(KEY_INFO_TEMPLATE),
            ENCRYPTED_KEY => Some(ENCRYPTED_KEY_TEMPLATE),
            _ => None,
        }
    }
}

impl TemplateRenderer for BuiltinTemplates {
    fn render(&self, name: &str, params: &TemplateParams<'_>) -> Result<String, Error> {
        let source = Self::source(name)
            .ok_or_else(|| Error::Template(format!("unknown template: {name}")))?;
        render_str(source, params)
    }
}

/// Render template text, substituting every placeholder from `params`.
///
/// A placeholder without a matching parameter is an error.
pub fn render_str(template: &str, params: &TemplateParams<'_>) -> Result<String, Error> {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find("{{") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];

        let (raw, body, close) = match after.strip_prefix('{') {
            Some(inner) => (true, inner, "}}}"),
            None => (false, after, "}}"),
        };
        let end = body
            .find(close)
            .ok_or_else(|| Error::Template("unterminated placeholder".into()))?;
        let key = body[..end].trim();
        let value = params
            .get(key)
            .ok_or_else(|| Error::Template(format!("missing template parameter: {key}")))?;

        if raw {
            out.push_str(value);
        } else {
            escape_into(value, &mut out);
        }
        rest = &body[end + close.len()..];
    }
    out.push_str(rest);
    Ok(out)
}

/// Escape a value for use as XML text or inside a double-quoted attribute.
fn escape_into(value: &str, out: &mut String) {
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
}
