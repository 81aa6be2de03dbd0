#![forbid(unsafe_code)]

//! Key material for the kuvert XML Encryption library.
//!
//! Loads RSA keys from PEM (PKCS#1, PKCS#8, SPKI) and turns certificate PEM
//! into the bare base64 form embedded in `<X509Certificate>`.

pub mod loader;
pub mod x509;

pub use loader::{load_rsa_private_pem, load_rsa_public_pem};
pub use x509::pem_to_cert;
