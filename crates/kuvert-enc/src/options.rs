#![forbid(unsafe_code)]

//! Options for encryption and decryption calls.
//!
//! Options are validated eagerly at the start of every call; the first
//! missing field is reported and no work is attempted.

use base64::Engine;
use kuvert_core::{algorithm, Error};
use std::borrow::Cow;
use std::str::FromStr;

/// How textual content is turned into bytes before encryption.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputEncoding {
    #[default]
    Utf8,
    /// One byte per character, characters above U+00FF are rejected.
    /// `binary` is accepted as an alias.
    Latin1,
    Ascii,
    /// The text is base64 and is decoded first.
    Base64,
    /// The text is hex and is decoded first.
    Hex,
}

impl InputEncoding {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Utf8 => "utf8",
            Self::Latin1 => "latin1",
            Self::Ascii => "ascii",
            Self::Base64 => "base64",
            Self::Hex => "hex",
        }
    }

    /// Convert `text` into the bytes that get encrypted.
    pub fn encode(&self, text: &str) -> Result<Vec<u8>, Error> {
        match self {
            Self::Utf8 => Ok(text.as_bytes().to_vec()),
            Self::Latin1 => text
                .chars()
                .map(|c| {
                    u8::try_from(u32::from(c)).map_err(|_| {
                        Error::Encoding(format!("character {c:?} is not representable in latin1"))
                    })
                })
                .collect(),
            Self::Ascii => {
                if let Some(c) = text.chars().find(|c| !c.is_ascii()) {
                    return Err(Error::Encoding(format!("character {c:?} is not ASCII")));
                }
                Ok(text.as_bytes().to_vec())
            }
            Self::Base64 => {
                let clean: String = text.chars().filter(|c| !c.is_whitespace()).collect();
                base64::engine::general_purpose::STANDARD
                    .decode(clean)
                    .map_err(|e| Error::Encoding(format!("base64 content: {e}")))
            }
            Self::Hex => {
                hex::decode(text.trim()).map_err(|e| Error::Encoding(format!("hex content: {e}")))
            }
        }
    }
}

impl FromStr for InputEncoding {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "utf8" | "utf-8" => Ok(Self::Utf8),
            "latin1" | "binary" | "iso-8859-1" => Ok(Self::Latin1),
            "ascii" => Ok(Self::Ascii),
            "base64" => Ok(Self::Base64),
            "hex" => Ok(Self::Hex),
            other => Err(Error::Encoding(format!("unknown input encoding: {other}"))),
        }
    }
}

/// Content handed to [`encrypt`](crate::encrypt::encrypt).
#[derive(Debug, Clone, Copy)]
pub enum Content<'a> {
    /// Raw bytes, encrypted as is.
    Bytes(&'a [u8]),
    /// Text, converted with the options' [`InputEncoding`].
    Text(&'a str),
}

impl Content<'_> {
    pub fn to_bytes(&self, encoding: InputEncoding) -> Result<Cow<'_, [u8]>, Error> {
        match self {
            Content::Bytes(b) => Ok(Cow::Borrowed(b)),
            Content::Text(t) if encoding == InputEncoding::Utf8 => Ok(Cow::Borrowed(t.as_bytes())),
            Content::Text(t) => encoding.encode(t).map(Cow::Owned),
        }
    }
}

impl<'a> From<&'a str> for Content<'a> {
    fn from(s: &'a str) -> Self {
        Content::Text(s)
    }
}

impl<'a> From<&'a String> for Content<'a> {
    fn from(s: &'a String) -> Self {
        Content::Text(s)
    }
}

impl<'a> From<&'a [u8]> for Content<'a> {
    fn from(b: &'a [u8]) -> Self {
        Content::Bytes(b)
    }
}

impl<'a> From<&'a Vec<u8>> for Content<'a> {
    fn from(b: &'a Vec<u8>) -> Self {
        Content::Bytes(b)
    }
}

/// Configuration for producing an envelope.
#[derive(Debug, Clone, Default)]
pub struct EncryptOptions {
    /// RSA public key PEM (SPKI or PKCS#1) wrapping the content-key.
    pub public_key: Option<String>,
    /// X.509 certificate PEM embedded in the `EncryptedKey`.
    pub certificate: Option<String>,
    /// Key transport URI; only RSA-OAEP produces new envelopes.
    pub key_wrap_algorithm: Option<String>,
    /// Content encryption URI; only AES-256-CBC produces new envelopes.
    pub content_algorithm: Option<String>,
    pub input_encoding: InputEncoding,
}

/// Validated view of [`EncryptOptions`].
#[derive(Debug, Clone, Copy)]
pub(crate) struct EncryptSettings<'a> {
    pub public_key: &'a str,
    pub certificate: &'a str,
    pub key_wrap_uri: &'a str,
    pub content_uri: &'a str,
}

impl EncryptOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_public_key(mut self, pem: impl Into<String>) -> Self {
        self.public_key = Some(pem.into());
        self
    }

    pub fn with_certificate(mut self, pem: impl Into<String>) -> Self {
        self.certificate = Some(pem.into());
        self
    }

    pub fn with_key_wrap_algorithm(mut self, uri: impl Into<String>) -> Self {
        self.key_wrap_algorithm = Some(uri.into());
        self
    }

    pub fn with_content_algorithm(mut self, uri: impl Into<String>) -> Self {
        self.content_algorithm = Some(uri.into());
        self
    }

    /// RSA-OAEP key transport with AES-256-CBC content encryption.
    pub fn with_default_algorithms(self) -> Self {
        self.with_key_wrap_algorithm(algorithm::RSA_OAEP)
            .with_content_algorithm(algorithm::AES256_CBC)
    }

    pub fn with_input_encoding(mut self, encoding: InputEncoding) -> Self {
        self.input_encoding = encoding;
        self
    }

    /// Check that every required option is present.
    pub fn validate(&self) -> Result<(), Error> {
        self.settings().map(|_| ())
    }

    pub(crate) fn settings(&self) -> Result<EncryptSettings<'_>, Error> {
        Ok(EncryptSettings {
            public_key: required(&self.public_key, "public_key")?,
            certificate: required(&self.certificate, "certificate")?,
            key_wrap_uri: required(&self.key_wrap_algorithm, "key_wrap_algorithm")?,
            content_uri: required(&self.content_algorithm, "content_algorithm")?,
        })
    }
}

/// Configuration for opening an envelope.
#[derive(Clone, Default)]
pub struct DecryptOptions {
    /// RSA private key PEM (PKCS#8 or PKCS#1) unwrapping the content-key.
    pub private_key: Option<String>,
}

impl DecryptOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_private_key(mut self, pem: impl Into<String>) -> Self {
        self.private_key = Some(pem.into());
        self
    }

    /// Check that every required option is present.
    pub fn validate(&self) -> Result<(), Error> {
        self.private_key_pem().map(|_| ())
    }

    pub(crate) fn private_key_pem(&self) -> Result<&str, Error> {
        required(&self.private_key, "private_key")
    }
}

impl std::fmt::Debug for DecryptOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DecryptOptions")
            .field("private_key", &self.private_key.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

pub(crate) fn required<'a>(value: &'a Option<String>, name: &'static str) -> Result<&'a str, Error> {
    match value.as_deref() {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(Error::MissingConfiguration(name)),
    }
}
