#![forbid(unsafe_code)]

//! Content encryption: AES-256-CBC and 3DES-CBC.
//!
//! Ciphertext on the wire is `IV ‖ CBC(plaintext)`, the IV being one block
//! of fresh random bytes.

use crate::random::random_bytes;
use crate::registry::{Algorithm, AlgorithmDescriptor, AlgorithmRegistry, OperationKind};
use cbc::cipher::block_padding::{NoPadding, Pkcs7};
use cbc::cipher::{BlockDecryptMut, BlockEncryptMut, KeyIvInit};
use kuvert_core::Error;

/// Trait for content cipher algorithms.
pub trait CipherAlgorithm: Send + Sync {
    fn descriptor(&self) -> &'static AlgorithmDescriptor;

    /// Encrypt `plaintext`, returning `IV ‖ ciphertext`.
    fn encrypt(&self, key: &[u8], plaintext: &[u8]) -> Result<Vec<u8>, Error>;

    /// Split off the IV from `data` and decrypt the remainder.
    fn decrypt(&self, key: &[u8], data: &[u8]) -> Result<Vec<u8>, Error>;

    fn uri(&self) -> &'static str {
        self.descriptor().uri
    }

    fn key_size(&self) -> usize {
        self.descriptor().key_size
    }

    fn iv_size(&self) -> usize {
        self.descriptor().iv_size
    }

    /// Generate a fresh content-key of the right length.
    fn generate_key(&self) -> Result<Vec<u8>, Error> {
        random_bytes(self.key_size())
    }
}

/// Create a content cipher from its URI.
pub fn from_uri(uri: &str) -> Result<Box<dyn CipherAlgorithm>, Error> {
    let descriptor = AlgorithmRegistry::lookup(uri, OperationKind::ContentCipher)?;
    for_descriptor(descriptor)
}

/// Create a content cipher for a registry descriptor.
pub fn for_descriptor(
    descriptor: &'static AlgorithmDescriptor,
) -> Result<Box<dyn CipherAlgorithm>, Error> {
    match descriptor.algorithm {
        Algorithm::Aes256Cbc => Ok(Box::new(Aes256Cbc)),
        Algorithm::TripleDesCbc => Ok(Box::new(TripleDesCbc)),
        other => Err(Error::UnsupportedAlgorithm(format!(
            "not a content cipher: {}",
            other.uri()
        ))),
    }
}

fn check_key(descriptor: &AlgorithmDescriptor, key: &[u8]) -> Result<(), Error> {
    if key.len() != descriptor.key_size {
        return Err(Error::InvalidKeyMaterial(format!(
            "{} expects a {} byte key, got {}",
            descriptor.name,
            descriptor.key_size,
            key.len()
        )));
    }
    Ok(())
}

/// Split `IV ‖ ciphertext`, rejecting input shorter than one IV.
fn split_iv<'a>(descriptor: &AlgorithmDescriptor, data: &'a [u8]) -> Result<(&'a [u8], &'a [u8]), Error> {
    if data.len() < descriptor.iv_size {
        return Err(Error::MalformedCiphertext(format!(
            "{} ciphertext is {} bytes, shorter than its {} byte IV",
            descriptor.name,
            data.len(),
            descriptor.iv_size
        )));
    }
    Ok(data.split_at(descriptor.iv_size))
}

fn prefix_iv(iv: &[u8], ciphertext: Vec<u8>) -> Vec<u8> {
    let mut result = Vec::with_capacity(iv.len() + ciphertext.len());
    result.extend_from_slice(iv);
    result.extend_from_slice(&ciphertext);
    result
}

// ── AES-256-CBC with PKCS#7 padding ──────────────────────────────────

struct Aes256Cbc;

impl CipherAlgorithm for Aes256Cbc {
    fn descriptor(&self) -> &'static AlgorithmDescriptor {
        Algorithm::Aes256Cbc.descriptor()
    }

    fn encrypt(&self, key: &[u8], plaintext: &[u8]) -> Result<Vec<u8>, Error> {
        check_key(self.descriptor(), key)?;
        let iv = random_bytes(self.iv_size())?;

        let enc = cbc::Encryptor::<aes::Aes256>::new_from_slices(key, &iv)
            .map_err(|e| Error::InvalidKeyMaterial(format!("AES-CBC init: {e}")))?;
        let ciphertext = enc.encrypt_padded_vec_mut::<Pkcs7>(plaintext);

        Ok(prefix_iv(&iv, ciphertext))
    }

    fn decrypt(&self, key: &[u8], data: &[u8]) -> Result<Vec<u8>, Error> {
        check_key(self.descriptor(), key)?;
        let (iv, ciphertext) = split_iv(self.descriptor(), data)?;

        let dec = cbc::Decryptor::<aes::Aes256>::new_from_slices(key, iv)
            .map_err(|_| Error::DecryptionFailed)?;
        // Block-multiple and padding checks both surface as the same error.
        dec.decrypt_padded_vec_mut::<Pkcs7>(ciphertext)
            .map_err(|_| Error::DecryptionFailed)
    }
}

// ── 3DES-CBC ─────────────────────────────────────────────────────────

struct TripleDesCbc;

impl CipherAlgorithm for TripleDesCbc {
    fn descriptor(&self) -> &'static AlgorithmDescriptor {
        Algorithm::TripleDesCbc.descriptor()
    }

    fn encrypt(&self, key: &[u8], plaintext: &[u8]) -> Result<Vec<u8>, Error> {
        check_key(self.descriptor(), key)?;
        let iv = random_bytes(self.iv_size())?;

        let enc = cbc::Encryptor::<des::TdesEde3>::new_from_slices(key, &iv)
            .map_err(|e| Error::InvalidKeyMaterial(format!("3DES init: {e}")))?;
        let ciphertext = enc.encrypt_padded_vec_mut::<Pkcs7>(plaintext);

        Ok(prefix_iv(&iv, ciphertext))
    }

    fn decrypt(&self, key: &[u8], data: &[u8]) -> Result<Vec<u8>, Error> {
        check_key(self.descriptor(), key)?;
        let (iv, ciphertext) = split_iv(self.descriptor(), data)?;

        let dec = cbc::Decryptor::<des::TdesEde3>::new_from_slices(key, iv)
            .map_err(|_| Error::DecryptionFailed)?;
        let buf = dec
            .decrypt_padded_vec_mut::<NoPadding>(ciphertext)
            .map_err(|_| Error::DecryptionFailed)?;

        Ok(strip_trailing_length(buf, self.iv_size()))
    }
}

/// Remove padding by trusting the last byte as the pad length.
///
/// Only lengths in `1..=block_size` are stripped and the filler bytes are
/// not inspected; any other trailing byte leaves the buffer as is.  This
/// mirrors what existing 3DES producers and consumers accept and must not be
/// tightened without breaking them.
pub fn strip_trailing_length(mut buf: Vec<u8>, block_size: usize) -> Vec<u8> {
    if let Some(&last) = buf.last() {
        let pad_len = last as usize;
        if (1..=block_size).contains(&pad_len) && pad_len <= buf.len() {
            buf.truncate(buf.len() - pad_len);
        }
    }
    buf
}

#[cfg(test)]
mod tests {
    use super::*;
    use kuvert_core::algorithm;

    #[test]
    fn test_aes256_cbc_zero_key_hello_world() {
        let key = [0u8; 32];
        let cipher = from_uri(algorithm::AES256_CBC).unwrap();
        let ct = cipher.encrypt(&key, b"hello world").unwrap();
        assert_eq!(ct.len(), 16 + 16);
        let pt = cipher.decrypt(&key, &ct).unwrap();
        assert_eq!(pt, b"hello world");
    }

    #[test]
    fn test_aes256_cbc_known_answer() {
        // NIST SP 800-38A F.2.5, first block, followed by a full PKCS#7 block.
        let key = hex::decode("603deb1015ca71be2b73aef0857d77811f352c073b6108d72d9810a30914dff4")
            .unwrap();
        let iv = hex::decode("000102030405060708090a0b0c0d0e0f").unwrap();
        let pt = hex::decode("6bc1bee22e409f96e93d7e117393172a").unwrap();

        let enc = cbc::Encryptor::<aes::Aes256>::new_from_slices(&key, &iv).unwrap();
        let ct = enc.encrypt_padded_vec_mut::<Pkcs7>(&pt);
        assert_eq!(
            hex::encode(&ct[..16]),
            "f58c4c04d6e5f1ba779eabfb5f7bfbd6"
        );

        let mut wire = iv.clone();
        wire.extend_from_slice(&ct);
        let cipher = from_uri(algorithm::AES256_CBC).unwrap();
        assert_eq!(cipher.decrypt(&key, &wire).unwrap(), pt);
    }

    #[test]
    fn test_iv_is_prefixed_and_fresh() {
        let key = [0x42u8; 32];
        let cipher = from_uri(algorithm::AES256_CBC).unwrap();
        let mut seen = std::collections::HashSet::new();
        for _ in 0..64 {
            let ct = cipher.encrypt(&key, b"same plaintext").unwrap();
            assert!(seen.insert(ct), "IV ‖ ciphertext repeated");
        }
    }

    #[test]
    fn test_3des_roundtrip() {
        let key = [0x42u8; 24];
        let cipher = from_uri(algorithm::TRIPLEDES_CBC).unwrap();
        let plaintexts: [&[u8]; 5] = [b"", b"A", b"test data", b"exactly8", b"a longer 3DES message"];
        for pt in plaintexts {
            let ct = cipher.encrypt(&key, pt).unwrap();
            assert_eq!(ct.len() % 8, 0);
            assert_eq!(cipher.decrypt(&key, &ct).unwrap(), pt);
        }
    }

    #[test]
    fn test_aes_roundtrip_binary() {
        let key: Vec<u8> = (0..32).collect();
        let cipher = from_uri(algorithm::AES256_CBC).unwrap();
        let pt: Vec<u8> = (0..=255).collect();
        let ct = cipher.encrypt(&key, &pt).unwrap();
        assert_eq!(cipher.decrypt(&key, &ct).unwrap(), pt);
    }

    #[test]
    fn test_short_input_is_malformed() {
        let aes = from_uri(algorithm::AES256_CBC).unwrap();
        let result = aes.decrypt(&[0u8; 32], &[0u8; 15]);
        assert!(matches!(result, Err(Error::MalformedCiphertext(_))));

        let tdes = from_uri(algorithm::TRIPLEDES_CBC).unwrap();
        let result = tdes.decrypt(&[0u8; 24], &[0u8; 7]);
        assert!(matches!(result, Err(Error::MalformedCiphertext(_))));
    }

    #[test]
    fn test_cipher_level_errors_are_opaque() {
        let key = [0x11u8; 32];
        let cipher = from_uri(algorithm::AES256_CBC).unwrap();
        // Not a block multiple after the IV.
        let result = cipher.decrypt(&key, &[0u8; 16 + 5]);
        assert!(matches!(result, Err(Error::DecryptionFailed)));
        // IV only: nothing to unpad.
        let result = cipher.decrypt(&key, &[0u8; 16]);
        assert!(matches!(result, Err(Error::DecryptionFailed)));
    }

    #[test]
    fn test_wrong_key_length() {
        let cipher = from_uri(algorithm::AES256_CBC).unwrap();
        let result = cipher.encrypt(&[0u8; 16], b"data");
        assert!(matches!(result, Err(Error::InvalidKeyMaterial(_))));
    }

    #[test]
    fn test_generate_key_length() {
        assert_eq!(from_uri(algorithm::AES256_CBC).unwrap().generate_key().unwrap().len(), 32);
        assert_eq!(from_uri(algorithm::TRIPLEDES_CBC).unwrap().generate_key().unwrap().len(), 24);
    }

    #[test]
    fn test_key_transport_uri_is_not_a_cipher() {
        assert!(matches!(
            from_uri(algorithm::RSA_OAEP),
            Err(Error::UnsupportedAlgorithm(_))
        ));
    }

    // ── trailing pad-length edge cases ───────────────────────────────

    #[test]
    fn test_strip_out_of_range_pad_bytes_untouched() {
        for last in [0u8, 9, 255] {
            let mut buf = b"abcdefg".to_vec();
            buf.push(last);
            assert_eq!(strip_trailing_length(buf.clone(), 8), buf, "last byte {last}");
        }
    }

    #[test]
    fn test_strip_valid_pad() {
        let buf = b"hello\x03\x03\x03".to_vec();
        assert_eq!(strip_trailing_length(buf, 8), b"hello");
    }

    #[test]
    fn test_strip_full_block_and_empty() {
        assert_eq!(strip_trailing_length(vec![8u8; 8], 8), Vec::<u8>::new());
        assert_eq!(strip_trailing_length(Vec::new(), 8), Vec::<u8>::new());
    }

    #[test]
    fn test_3des_decrypt_without_padding_keeps_buffer() {
        // Encrypt a block whose last byte is 0x00 with no padding at all.
        let key = [0x24u8; 24];
        let iv = [0x01u8; 8];
        let block = *b"1234567\x00";
        let enc = cbc::Encryptor::<des::TdesEde3>::new_from_slices(&key, &iv).unwrap();
        let ct = enc.encrypt_padded_vec_mut::<NoPadding>(&block);

        let mut wire = iv.to_vec();
        wire.extend_from_slice(&ct);
        let cipher = from_uri(algorithm::TRIPLEDES_CBC).unwrap();
        assert_eq!(cipher.decrypt(&key, &wire).unwrap(), block);
    }
}
