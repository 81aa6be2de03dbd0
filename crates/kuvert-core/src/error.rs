#![forbid(unsafe_code)]

/// Errors produced by the kuvert XML Encryption library.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("missing configuration: {0}")]
    MissingConfiguration(&'static str),

    #[error("unsupported algorithm: {0}")]
    UnsupportedAlgorithm(String),

    #[error("malformed envelope: {0}")]
    MalformedEnvelope(String),

    #[error("invalid key material: {0}")]
    InvalidKeyMaterial(String),

    #[error("key too large: {key_len} bytes, at most {max_len} bytes fit the RSA modulus")]
    KeyTooLarge { key_len: usize, max_len: usize },

    #[error("malformed ciphertext: {0}")]
    MalformedCiphertext(String),

    /// Deliberately carries no detail: callers must not learn which check failed.
    #[error("decryption failed")]
    DecryptionFailed,

    #[error("XML parsing error: {0}")]
    XmlParse(String),

    #[error("template error: {0}")]
    Template(String),

    #[error("encoding error: {0}")]
    Encoding(String),

    #[error("secure random source failed: {0}")]
    Random(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
