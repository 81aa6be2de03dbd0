#![forbid(unsafe_code)]

//! XML-Enc decryption.
//!
//! Processing order:
//! 1. Validate options
//! 2. Parse the envelope (algorithm URIs and both cipher values)
//! 3. Resolve both algorithm URIs against the registry
//! 4. Load the private key and unwrap the content-key
//! 5. Decrypt the content

use crate::options::DecryptOptions;
use crate::parser::{self, ParsedEnvelope};
use kuvert_core::Error;
use kuvert_crypto::{
    cipher, keytransport, AlgorithmDescriptor, AlgorithmRegistry, OperationKind, Padding,
};
use zeroize::Zeroizing;

/// Decrypt an envelope and return its content as text.
///
/// AES content must be valid UTF-8.  3DES content is decoded lossily, since
/// its lenient padding rule can leave unstripped trailing bytes in place.
pub fn decrypt(xml: &str, options: &DecryptOptions) -> Result<String, Error> {
    let (bytes, content_alg) = open_envelope(xml, options)?;
    match content_alg.padding {
        Padding::TrailingLength => Ok(String::from_utf8_lossy(&bytes).into_owned()),
        _ => String::from_utf8(bytes)
            .map_err(|e| Error::Encoding(format!("decrypted content is not valid UTF-8: {e}"))),
    }
}

/// Decrypt an envelope and return the raw content bytes.
pub fn decrypt_to_bytes(xml: &str, options: &DecryptOptions) -> Result<Vec<u8>, Error> {
    open_envelope(xml, options).map(|(bytes, _)| bytes)
}

fn open_envelope(
    xml: &str,
    options: &DecryptOptions,
) -> Result<(Vec<u8>, &'static AlgorithmDescriptor), Error> {
    let private_key_pem = options.private_key_pem()?;
    let envelope = parser::parse(xml)?;

    let content_alg =
        AlgorithmRegistry::lookup(&envelope.content_uri, OperationKind::ContentCipher)?;
    let key_wrap_alg = AlgorithmRegistry::lookup(&envelope.key_wrap_uri, OperationKind::KeyWrap)?;

    let content_key = unwrap_key(&envelope, key_wrap_alg, private_key_pem)?;
    if content_key.len() != content_alg.key_size {
        tracing::debug!(
            algorithm = content_alg.name,
            key_len = content_key.len(),
            expected = content_alg.key_size,
            "unwrapped content-key has the wrong length"
        );
        return Err(Error::DecryptionFailed);
    }

    let cipher = cipher::for_descriptor(content_alg)?;
    let plaintext = cipher.decrypt(&content_key, &envelope.content_cipher)?;
    tracing::debug!(
        algorithm = content_alg.name,
        plaintext_len = plaintext.len(),
        "decrypted content"
    );
    Ok((plaintext, content_alg))
}

/// Unwrap and return only the content-key of an envelope.
///
/// `xml` may be a full `EncryptedData` document or a bare `KeyInfo`
/// fragment as rendered by
/// [`encrypt_key_info`](crate::encrypt::encrypt_key_info).
pub fn decrypt_key_info(xml: &str, options: &DecryptOptions) -> Result<Vec<u8>, Error> {
    let private_key_pem = options.private_key_pem()?;
    let doc = kuvert_xml::parse(xml)?;

    let key_info = parser::locate_key_info(doc.root())?;
    let encrypted_key = parser::locate_encrypted_key(key_info)?;
    let key_wrap_uri = parser::locate_encryption_method(encrypted_key)?;
    let wrapped_key = parser::locate_cipher_value(encrypted_key)?;

    let key_wrap_alg = AlgorithmRegistry::lookup(&key_wrap_uri, OperationKind::KeyWrap)?;
    let private_key = kuvert_keys::load_rsa_private_pem(private_key_pem.as_bytes())?;
    let transport = keytransport::for_descriptor(key_wrap_alg)?;
    transport.unwrap(&private_key, &wrapped_key)
}

fn unwrap_key(
    envelope: &ParsedEnvelope,
    key_wrap_alg: &'static AlgorithmDescriptor,
    private_key_pem: &str,
) -> Result<Zeroizing<Vec<u8>>, Error> {
    let private_key = kuvert_keys::load_rsa_private_pem(private_key_pem.as_bytes())?;
    let transport = keytransport::for_descriptor(key_wrap_alg)?;
    let key = transport.unwrap(&private_key, &envelope.wrapped_key)?;
    tracing::debug!(algorithm = key_wrap_alg.name, "unwrapped content-key");
    Ok(Zeroizing::new(key))
}
