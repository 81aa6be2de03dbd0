#![forbid(unsafe_code)]

//! Key transport: RSA-OAEP (MGF1 with SHA-1) and RSA PKCS#1 v1.5.
//!
//! The content-key is always shorter than the modulus, so it is wrapped in
//! a single RSA operation.  Every unwrap failure is reported as the same
//! opaque [`Error::DecryptionFailed`].

use crate::registry::{Algorithm, AlgorithmDescriptor, AlgorithmRegistry, OperationKind};
use kuvert_core::Error;
use rand::rngs::OsRng;
use rsa::traits::PublicKeyParts;
use rsa::{Oaep, Pkcs1v15Encrypt, RsaPrivateKey, RsaPublicKey};

/// SHA-1 output length, used by the OAEP overhead.
const SHA1_LEN: usize = 20;

/// Trait for key transport algorithms.
pub trait KeyTransportAlgorithm: Send + Sync {
    fn descriptor(&self) -> &'static AlgorithmDescriptor;

    /// Largest key that fits `public_key` with this padding.
    fn max_key_len(&self, public_key: &RsaPublicKey) -> usize;

    fn wrap(&self, public_key: &RsaPublicKey, key_data: &[u8]) -> Result<Vec<u8>, Error>;

    fn unwrap(&self, private_key: &RsaPrivateKey, wrapped: &[u8]) -> Result<Vec<u8>, Error>;

    fn uri(&self) -> &'static str {
        self.descriptor().uri
    }
}

/// Create a key transport algorithm from its URI.
pub fn from_uri(uri: &str) -> Result<Box<dyn KeyTransportAlgorithm>, Error> {
    let descriptor = AlgorithmRegistry::lookup(uri, OperationKind::KeyWrap)?;
    for_descriptor(descriptor)
}

/// Create a key transport algorithm for a registry descriptor.
pub fn for_descriptor(
    descriptor: &'static AlgorithmDescriptor,
) -> Result<Box<dyn KeyTransportAlgorithm>, Error> {
    match descriptor.algorithm {
        Algorithm::RsaOaepMgf1p => Ok(Box::new(RsaOaepTransport)),
        Algorithm::RsaPkcs1v15 => Ok(Box::new(RsaPkcs1Transport)),
        other => Err(Error::UnsupportedAlgorithm(format!(
            "not a key transport: {}",
            other.uri()
        ))),
    }
}

fn check_fits(max_len: usize, key_data: &[u8]) -> Result<(), Error> {
    if key_data.len() > max_len {
        return Err(Error::KeyTooLarge {
            key_len: key_data.len(),
            max_len,
        });
    }
    Ok(())
}

fn wrap_error(e: rsa::Error, key_len: usize, max_len: usize) -> Error {
    match e {
        rsa::Error::MessageTooLong => Error::KeyTooLarge { key_len, max_len },
        other => Error::InvalidKeyMaterial(format!("RSA encrypt: {other}")),
    }
}

fn unwrap_error(_: rsa::Error) -> Error {
    tracing::debug!("content-key unwrap rejected");
    Error::DecryptionFailed
}

struct RsaOaepTransport;

impl KeyTransportAlgorithm for RsaOaepTransport {
    fn descriptor(&self) -> &'static AlgorithmDescriptor {
        Algorithm::RsaOaepMgf1p.descriptor()
    }

    fn max_key_len(&self, public_key: &RsaPublicKey) -> usize {
        public_key.size().saturating_sub(2 * SHA1_LEN + 2)
    }

    fn wrap(&self, public_key: &RsaPublicKey, key_data: &[u8]) -> Result<Vec<u8>, Error> {
        let max_len = self.max_key_len(public_key);
        check_fits(max_len, key_data)?;
        public_key
            .encrypt(&mut OsRng, Oaep::new::<sha1::Sha1>(), key_data)
            .map_err(|e| wrap_error(e, key_data.len(), max_len))
    }

    fn unwrap(&self, private_key: &RsaPrivateKey, wrapped: &[u8]) -> Result<Vec<u8>, Error> {
        private_key
            .decrypt_blinded(&mut OsRng, Oaep::new::<sha1::Sha1>(), wrapped)
            .map_err(unwrap_error)
    }
}

struct RsaPkcs1Transport;

impl KeyTransportAlgorithm for RsaPkcs1Transport {
    fn descriptor(&self) -> &'static AlgorithmDescriptor {
        Algorithm::RsaPkcs1v15.descriptor()
    }

    fn max_key_len(&self, public_key: &RsaPublicKey) -> usize {
        public_key.size().saturating_sub(11)
    }

    fn wrap(&self, public_key: &RsaPublicKey, key_data: &[u8]) -> Result<Vec<u8>, Error> {
        let max_len = self.max_key_len(public_key);
        check_fits(max_len, key_data)?;
        public_key
            .encrypt(&mut OsRng, Pkcs1v15Encrypt, key_data)
            .map_err(|e| wrap_error(e, key_data.len(), max_len))
    }

    fn unwrap(&self, private_key: &RsaPrivateKey, wrapped: &[u8]) -> Result<Vec<u8>, Error> {
        private_key
            .decrypt_blinded(&mut OsRng, Pkcs1v15Encrypt, wrapped)
            .map_err(unwrap_error)
    }
}
