#![forbid(unsafe_code)]

//! Rendering of `KeyInfo` / `EncryptedKey` and `EncryptedData` markup.
//!
//! The builder is pure: it only substitutes already base64-encoded values
//! into templates and performs no cryptography.

use kuvert_core::Error;
use kuvert_xml::template::{self, BuiltinTemplates, TemplateParams, TemplateRenderer};

/// Renders envelopes through a [`TemplateRenderer`].
pub struct EnvelopeBuilder<'r> {
    renderer: &'r dyn TemplateRenderer,
}

impl EnvelopeBuilder<'static> {
    /// Builder using the shipped templates.
    pub fn new() -> Self {
        Self {
            renderer: &BuiltinTemplates,
        }
    }
}

impl Default for EnvelopeBuilder<'static> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'r> EnvelopeBuilder<'r> {
    /// Builder using caller supplied templates.
    pub fn with_renderer(renderer: &'r dyn TemplateRenderer) -> Self {
        Self { renderer }
    }

    /// Render the `KeyInfo` fragment holding one `EncryptedKey`.
    ///
    /// `certificate` is the bare base64 DER body of the recipient's
    /// certificate, without PEM armor.
    pub fn build_key_info(
        &self,
        wrapped_key_b64: &str,
        certificate: &str,
        key_wrap_uri: &str,
    ) -> Result<String, Error> {
        let params = TemplateParams::from([
            ("encryptedKey", wrapped_key_b64),
            ("encryptionPublicCert", certificate),
            ("keyEncryptionMethod", key_wrap_uri),
        ]);
        self.renderer.render(template::KEY_INFO, &params)
    }

    /// Render the complete `EncryptedData` document around a `KeyInfo`
    /// fragment, which is inserted verbatim.
    pub fn build_encrypted_data(
        &self,
        content_b64: &str,
        key_info: &str,
        content_uri: &str,
    ) -> Result<String, Error> {
        let params = TemplateParams::from([
            ("encryptedContent", content_b64),
            ("keyInfo", key_info),
            ("contentEncryptionMethod", content_uri),
        ]);
        self.renderer.render(template::ENCRYPTED_KEY, &params)
    }
}
