#![forbid(unsafe_code)]

//! XML Encryption envelopes.
//!
//! Encrypts content under a one-time content-key, wraps that key for an RSA
//! recipient and renders both into an `EncryptedData` document; decryption
//! reverses the process.

pub mod builder;
pub mod decrypt;
pub mod encrypt;
pub mod options;
pub mod parser;

pub use builder::EnvelopeBuilder;
pub use decrypt::{decrypt, decrypt_key_info, decrypt_to_bytes};
pub use encrypt::{encrypt, encrypt_key_info};
pub use options::{Content, DecryptOptions, EncryptOptions, InputEncoding};
pub use parser::ParsedEnvelope;
