#![forbid(unsafe_code)]

//! Extraction of algorithms and ciphertext from envelope markup.
//!
//! Lookups match on local names so that `xenc:`, `e:` and default-namespace
//! producers are all accepted.  Only `KeyInfo` is pinned to the XML-DSig
//! namespace.

use base64::Engine;
use kuvert_core::{ns, Error};
use kuvert_xml::{lookup, XmlNode};

/// Everything needed to open an envelope, decoded from its markup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedEnvelope {
    pub content_uri: String,
    /// `IV ‖ ciphertext` from `EncryptedData/CipherData/CipherValue`.
    pub content_cipher: Vec<u8>,
    pub key_wrap_uri: String,
    /// RSA-wrapped content-key from `EncryptedKey/CipherData/CipherValue`.
    pub wrapped_key: Vec<u8>,
}

/// Parse an envelope document.
///
/// The first `EncryptedData` anywhere in the document is used, so an
/// envelope embedded in a larger document (a SAML `EncryptedAssertion` for
/// instance) is accepted as well.
pub fn parse(xml: &str) -> Result<ParsedEnvelope, Error> {
    let doc = kuvert_xml::parse(xml)?;

    let encrypted_data = locate_encrypted_data(doc.root())?;
    let content_uri = locate_encryption_method(encrypted_data)?;
    let content_cipher = locate_cipher_value(encrypted_data)?;

    let key_info = locate_key_info(encrypted_data).or_else(|_| locate_key_info(doc.root()))?;
    let encrypted_key = locate_encrypted_key(key_info)?;
    let key_wrap_uri = locate_encryption_method(encrypted_key)?;
    let wrapped_key = locate_cipher_value(encrypted_key)?;

    tracing::debug!(
        content = %content_uri,
        key_wrap = %key_wrap_uri,
        cipher_len = content_cipher.len(),
        wrapped_len = wrapped_key.len(),
        "parsed envelope"
    );

    Ok(ParsedEnvelope {
        content_uri,
        content_cipher,
        key_wrap_uri,
        wrapped_key,
    })
}

/// First `EncryptedData` element at or below `scope`.
pub fn locate_encrypted_data<N: XmlNode>(scope: N) -> Result<N, Error> {
    lookup::find_descendant(scope, ns::node::ENCRYPTED_DATA, None)
        .ok_or_else(|| Error::MalformedEnvelope("no EncryptedData element".into()))
}

/// `Algorithm` of the `EncryptionMethod` child of `scope`.
///
/// `scope` is an `EncryptedData` or an `EncryptedKey`.
pub fn locate_encryption_method<N: XmlNode>(scope: N) -> Result<String, Error> {
    let method = lookup::find_child(scope, ns::node::ENCRYPTION_METHOD).ok_or_else(|| {
        Error::MalformedEnvelope(format!("no EncryptionMethod in {}", scope.local_name()))
    })?;
    method
        .attribute(ns::attr::ALGORITHM)
        .map(str::trim)
        .filter(|uri| !uri.is_empty())
        .map(str::to_owned)
        .ok_or_else(|| {
            Error::MalformedEnvelope(format!(
                "EncryptionMethod in {} has no Algorithm",
                scope.local_name()
            ))
        })
}

/// Decoded `scope/CipherData/CipherValue`.
///
/// Only direct children are followed, so the `CipherData` of an
/// `EncryptedKey` nested in the `KeyInfo` of `scope` is never picked up.
pub fn locate_cipher_value<N: XmlNode>(scope: N) -> Result<Vec<u8>, Error> {
    let cipher_value = lookup::find_path(scope, &[ns::node::CIPHER_DATA, ns::node::CIPHER_VALUE])
        .ok_or_else(|| {
            Error::MalformedEnvelope(format!(
                "no CipherData/CipherValue in {}",
                scope.local_name()
            ))
        })?;
    decode_base64(&lookup::text_content(cipher_value))
}

/// First XML-DSig `KeyInfo` at or below `scope`.
pub fn locate_key_info<N: XmlNode>(scope: N) -> Result<N, Error> {
    lookup::find_descendant(scope, ns::node::KEY_INFO, Some(ns::DSIG))
        .ok_or_else(|| Error::MalformedEnvelope("no KeyInfo element".into()))
}

/// The `EncryptedKey` child of a `KeyInfo`.
pub fn locate_encrypted_key<N: XmlNode>(key_info: N) -> Result<N, Error> {
    lookup::find_child(key_info, ns::node::ENCRYPTED_KEY)
        .ok_or_else(|| Error::MalformedEnvelope("no EncryptedKey in KeyInfo".into()))
}

/// Decode base64 text, ignoring the whitespace producers wrap it with.
fn decode_base64(text: &str) -> Result<Vec<u8>, Error> {
    let clean: String = text.chars().filter(|c| !c.is_ascii_whitespace()).collect();
    base64::engine::general_purpose::STANDARD
        .decode(clean)
        .map_err(|e| Error::MalformedCiphertext(format!("invalid base64 in CipherValue: {e}")))
}
