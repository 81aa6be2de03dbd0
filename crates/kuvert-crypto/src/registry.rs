#![forbid(unsafe_code)]

//! Algorithm registry mapping URIs to behaviour descriptors.
//!
//! The set of algorithms is closed: an unknown URI is always an
//! `UnsupportedAlgorithm` error, there is no default to fall back to.

use kuvert_core::{algorithm, Error};

/// What an algorithm URI is used for inside an envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationKind {
    /// `EncryptedData/EncryptionMethod`: symmetric payload encryption.
    ContentCipher,
    /// `EncryptedKey/EncryptionMethod`: asymmetric transport of the content-key.
    KeyWrap,
}

/// How padding is applied and removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Padding {
    /// PKCS#7, added and checked by the block-mode primitive.
    Pkcs7,
    /// Last byte read as the pad length and stripped only when it lies in
    /// `1..=block size`; any other value leaves the buffer untouched.
    ///
    /// This is a legacy interoperability rule, not PKCS validation.
    TrailingLength,
    /// RSA-OAEP with SHA-1 and MGF1-SHA-1.
    OaepSha1,
    /// RSA PKCS#1 v1.5 encryption padding.
    Pkcs1v15,
}

/// Every algorithm the library knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Algorithm {
    Aes256Cbc,
    TripleDesCbc,
    RsaOaepMgf1p,
    RsaPkcs1v15,
}

/// Static description of an algorithm.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlgorithmDescriptor {
    pub algorithm: Algorithm,
    pub uri: &'static str,
    /// Human readable cipher name.
    pub name: &'static str,
    pub kind: OperationKind,
    /// Symmetric key length in bytes; 0 for key transport.
    pub key_size: usize,
    /// IV length, equal to the cipher block size; 0 for key transport.
    pub iv_size: usize,
    pub padding: Padding,
    /// Whether new envelopes may be produced with this algorithm.
    /// Decrypt-only algorithms exist for legacy documents.
    pub encrypt: bool,
}

static DESCRIPTORS: [AlgorithmDescriptor; 4] = [
    AlgorithmDescriptor {
        algorithm: Algorithm::Aes256Cbc,
        uri: algorithm::AES256_CBC,
        name: "aes-256-cbc",
        kind: OperationKind::ContentCipher,
        key_size: 32,
        iv_size: 16,
        padding: Padding::Pkcs7,
        encrypt: true,
    },
    AlgorithmDescriptor {
        algorithm: Algorithm::TripleDesCbc,
        uri: algorithm::TRIPLEDES_CBC,
        name: "des-ede3-cbc",
        kind: OperationKind::ContentCipher,
        key_size: 24,
        iv_size: 8,
        padding: Padding::TrailingLength,
        encrypt: false,
    },
    AlgorithmDescriptor {
        algorithm: Algorithm::RsaOaepMgf1p,
        uri: algorithm::RSA_OAEP,
        name: "rsa-oaep-mgf1p",
        kind: OperationKind::KeyWrap,
        key_size: 0,
        iv_size: 0,
        padding: Padding::OaepSha1,
        encrypt: true,
    },
    AlgorithmDescriptor {
        algorithm: Algorithm::RsaPkcs1v15,
        uri: algorithm::RSA_PKCS1,
        name: "rsa-1_5",
        kind: OperationKind::KeyWrap,
        key_size: 0,
        iv_size: 0,
        padding: Padding::Pkcs1v15,
        encrypt: false,
    },
];

impl Algorithm {
    /// Parse an algorithm from its URI.
    pub fn from_uri(uri: &str) -> Option<Self> {
        match uri {
            algorithm::AES256_CBC => Some(Self::Aes256Cbc),
            algorithm::TRIPLEDES_CBC => Some(Self::TripleDesCbc),
            algorithm::RSA_OAEP => Some(Self::RsaOaepMgf1p),
            algorithm::RSA_PKCS1 => Some(Self::RsaPkcs1v15),
            _ => None,
        }
    }

    pub fn descriptor(self) -> &'static AlgorithmDescriptor {
        match self {
            Self::Aes256Cbc => &DESCRIPTORS[0],
            Self::TripleDesCbc => &DESCRIPTORS[1],
            Self::RsaOaepMgf1p => &DESCRIPTORS[2],
            Self::RsaPkcs1v15 => &DESCRIPTORS[3],
        }
    }

    pub fn uri(self) -> &'static str {
        self.descriptor().uri
    }

    pub fn kind(self) -> OperationKind {
        self.descriptor().kind
    }
}

/// Central, read-only registry of supported algorithms.
pub struct AlgorithmRegistry;

impl AlgorithmRegistry {
    /// Look up the descriptor for `uri` used as `kind`.
    pub fn lookup(uri: &str, kind: OperationKind) -> Result<&'static AlgorithmDescriptor, Error> {
        let descriptor = Algorithm::from_uri(uri)
            .map(Algorithm::descriptor)
            .filter(|d| d.kind == kind)
            .ok_or_else(|| Error::UnsupportedAlgorithm(format!("{}: {uri}", kind_label(kind))))?;
        Ok(descriptor)
    }

    /// Like [`lookup`](Self::lookup), but also rejects decrypt-only algorithms.
    pub fn lookup_for_encryption(
        uri: &str,
        kind: OperationKind,
    ) -> Result<&'static AlgorithmDescriptor, Error> {
        let descriptor = Self::lookup(uri, kind)?;
        if !descriptor.encrypt {
            return Err(Error::UnsupportedAlgorithm(format!(
                "{} is only supported for decryption: {uri}",
                kind_label(kind)
            )));
        }
        Ok(descriptor)
    }

    /// All registered algorithms.
    pub fn all() -> &'static [AlgorithmDescriptor] {
        &DESCRIPTORS
    }
}

fn kind_label(kind: OperationKind) -> &'static str {
    match kind {
        OperationKind::ContentCipher => "content encryption",
        OperationKind::KeyWrap => "key encryption",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_descriptors() {
        let aes = AlgorithmRegistry::lookup(algorithm::AES256_CBC, OperationKind::ContentCipher)
            .unwrap();
        assert_eq!((aes.key_size, aes.iv_size), (32, 16));
        assert_eq!(aes.padding, Padding::Pkcs7);

        let tdes =
            AlgorithmRegistry::lookup(algorithm::TRIPLEDES_CBC, OperationKind::ContentCipher)
                .unwrap();
        assert_eq!((tdes.key_size, tdes.iv_size), (24, 8));
        assert_eq!(tdes.padding, Padding::TrailingLength);
    }

    #[test]
    fn test_key_wrap_descriptors() {
        let oaep = AlgorithmRegistry::lookup(algorithm::RSA_OAEP, OperationKind::KeyWrap).unwrap();
        assert_eq!(oaep.padding, Padding::OaepSha1);
        let pkcs1 =
            AlgorithmRegistry::lookup(algorithm::RSA_PKCS1, OperationKind::KeyWrap).unwrap();
        assert_eq!(pkcs1.padding, Padding::Pkcs1v15);
    }

    #[test]
    fn test_unknown_uri_is_unsupported() {
        let result = AlgorithmRegistry::lookup(
            "http://www.w3.org/2001/04/xmlenc#aes128-cbc",
            OperationKind::ContentCipher,
        );
        assert!(matches!(result, Err(Error::UnsupportedAlgorithm(_))));
    }

    #[test]
    fn test_kind_mismatch_is_unsupported() {
        let result = AlgorithmRegistry::lookup(algorithm::RSA_OAEP, OperationKind::ContentCipher);
        assert!(matches!(result, Err(Error::UnsupportedAlgorithm(_))));
        let result = AlgorithmRegistry::lookup(algorithm::AES256_CBC, OperationKind::KeyWrap);
        assert!(matches!(result, Err(Error::UnsupportedAlgorithm(_))));
    }

    #[test]
    fn test_decrypt_only_algorithms_rejected_for_encryption() {
        assert!(AlgorithmRegistry::lookup_for_encryption(
            algorithm::AES256_CBC,
            OperationKind::ContentCipher
        )
        .is_ok());
        assert!(
            AlgorithmRegistry::lookup_for_encryption(algorithm::RSA_OAEP, OperationKind::KeyWrap)
                .is_ok()
        );
        assert!(matches!(
            AlgorithmRegistry::lookup_for_encryption(
                algorithm::TRIPLEDES_CBC,
                OperationKind::ContentCipher
            ),
            Err(Error::UnsupportedAlgorithm(_))
        ));
        assert!(matches!(
            AlgorithmRegistry::lookup_for_encryption(algorithm::RSA_PKCS1, OperationKind::KeyWrap),
            Err(Error::UnsupportedAlgorithm(_))
        ));
    }

    #[test]
    fn test_descriptor_table_is_consistent() {
        for d in AlgorithmRegistry::all() {
            assert_eq!(Algorithm::from_uri(d.uri), Some(d.algorithm));
            assert_eq!(d.algorithm.descriptor(), d);
        }
    }
}
