#![forbid(unsafe_code)]

//! XML-Enc encryption.
//!
//! Processing order:
//! 1. Validate options
//! 2. Resolve both algorithm URIs against the registry
//! 3. Load the recipient's public key and certificate
//! 4. Generate a fresh content-key and encrypt the content with it
//! 5. Wrap the content-key and render `KeyInfo` / `EncryptedKey`
//! 6. Render `EncryptedData`
//!
//! Nothing past step 2 runs for an algorithm that cannot produce envelopes.

use crate::builder::EnvelopeBuilder;
use crate::options::{required, Content, EncryptOptions};
use base64::Engine;
use kuvert_core::Error;
use kuvert_crypto::{cipher, keytransport, AlgorithmDescriptor, AlgorithmRegistry, OperationKind};
use zeroize::Zeroizing;

/// Encrypt `content` into a complete `EncryptedData` document.
pub fn encrypt<'a>(content: impl Into<Content<'a>>, options: &EncryptOptions) -> Result<String, Error> {
    let settings = options.settings()?;
    let content_alg =
        AlgorithmRegistry::lookup_for_encryption(settings.content_uri, OperationKind::ContentCipher)?;
    let key_wrap_alg =
        AlgorithmRegistry::lookup_for_encryption(settings.key_wrap_uri, OperationKind::KeyWrap)?;

    let content = content.into();
    let plaintext = content.to_bytes(options.input_encoding)?;
    let recipient = Recipient::load(settings.public_key, settings.certificate)?;

    let cipher = cipher::for_descriptor(content_alg)?;
    let content_key = Zeroizing::new(cipher.generate_key()?);
    let encrypted = cipher.encrypt(&content_key, &plaintext)?;
    tracing::debug!(
        algorithm = content_alg.name,
        plaintext_len = plaintext.len(),
        ciphertext_len = encrypted.len(),
        "encrypted content"
    );

    let builder = EnvelopeBuilder::new();
    let key_info = recipient.key_info(&builder, key_wrap_alg, &content_key)?;
    let engine = base64::engine::general_purpose::STANDARD;
    builder.build_encrypted_data(&engine.encode(&encrypted), &key_info, content_alg.uri)
}

/// Wrap an existing content-key for the configured recipient and render
/// only the `KeyInfo` fragment.
///
/// The content algorithm option is not consulted.
pub fn encrypt_key_info(content_key: &[u8], options: &EncryptOptions) -> Result<String, Error> {
    let public_key = required(&options.public_key, "public_key")?;
    let certificate = required(&options.certificate, "certificate")?;
    let key_wrap_uri = required(&options.key_wrap_algorithm, "key_wrap_algorithm")?;

    let key_wrap_alg = AlgorithmRegistry::lookup_for_encryption(key_wrap_uri, OperationKind::KeyWrap)?;
    let recipient = Recipient::load(public_key, certificate)?;
    recipient.key_info(&EnvelopeBuilder::new(), key_wrap_alg, content_key)
}

/// Public key material of the party able to open the envelope.
struct Recipient {
    public_key: rsa::RsaPublicKey,
    /// Base64 DER of the certificate.
    certificate: String,
}

impl Recipient {
    fn load(public_key_pem: &str, certificate_pem: &str) -> Result<Self, Error> {
        Ok(Self {
            public_key: kuvert_keys::load_rsa_public_pem(public_key_pem.as_bytes())?,
            certificate: kuvert_keys::pem_to_cert(certificate_pem)?,
        })
    }

    fn key_info(
        &self,
        builder: &EnvelopeBuilder<'_>,
        key_wrap_alg: &'static AlgorithmDescriptor,
        content_key: &[u8],
    ) -> Result<String, Error> {
        let transport = keytransport::for_descriptor(key_wrap_alg)?;
        let wrapped = transport.wrap(&self.public_key, content_key)?;
        tracing::debug!(
            algorithm = key_wrap_alg.name,
            wrapped_len = wrapped.len(),
            "wrapped content-key"
        );

        let engine = base64::engine::general_purpose::STANDARD;
        builder.build_key_info(&engine.encode(&wrapped), &self.certificate, key_wrap_alg.uri)
    }
}
