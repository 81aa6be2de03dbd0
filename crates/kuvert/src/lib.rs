#![forbid(unsafe_code)]

pub use kuvert_core as core;
pub use kuvert_xml as xml;
pub use kuvert_crypto as crypto;
pub use kuvert_keys as keys;
pub use kuvert_enc as enc;

pub use kuvert_core::{Error, Result};
pub use kuvert_enc::{decrypt, decrypt_to_bytes, encrypt, DecryptOptions, EncryptOptions};
