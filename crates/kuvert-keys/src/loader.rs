#![forbid(unsafe_code)]

//! RSA key loading from PEM data.

use kuvert_core::Error;

/// Load an RSA private key from PEM data (PKCS#8 or PKCS#1).
pub fn load_rsa_private_pem(pem_data: &[u8]) -> Result<rsa::RsaPrivateKey, Error> {
    use pkcs8::DecodePrivateKey;
    let pem_str = pem_text(pem_data)?;

    // Try PKCS#8 first
    if let Ok(pk) = rsa::RsaPrivateKey::from_pkcs8_pem(pem_str) {
        return Ok(pk);
    }

    // Try PKCS#1
    use pkcs1::DecodeRsaPrivateKey;
    rsa::RsaPrivateKey::from_pkcs1_pem(pem_str)
        .map_err(|e| Error::InvalidKeyMaterial(format!("failed to parse RSA private key PEM: {e}")))
}

/// Load an RSA public key from PEM data (SPKI or PKCS#1).
pub fn load_rsa_public_pem(pem_data: &[u8]) -> Result<rsa::RsaPublicKey, Error> {
    use pkcs8::DecodePublicKey;
    let pem_str = pem_text(pem_data)?;

    // Try SPKI first
    if let Ok(pk) = rsa::RsaPublicKey::from_public_key_pem(pem_str) {
        return Ok(pk);
    }

    // Try PKCS#1
    use pkcs1::DecodeRsaPublicKey;
    rsa::RsaPublicKey::from_pkcs1_pem(pem_str)
        .map_err(|e| Error::InvalidKeyMaterial(format!("failed to parse RSA public key PEM: {e}")))
}

/// Decode PEM bytes as UTF-8 and drop surrounding whitespace.
fn pem_text(pem_data: &[u8]) -> Result<&str, Error> {
    let pem_str = std::str::from_utf8(pem_data)
        .map_err(|e| Error::InvalidKeyMaterial(format!("invalid PEM encoding: {e}")))?;
    Ok(pem_str.trim())
}
