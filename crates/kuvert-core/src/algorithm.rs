#![forbid(unsafe_code)]

//! Algorithm URI constants for XML Encryption.
//!
//! These strings are part of the interoperability contract and appear
//! verbatim in `Algorithm` attributes.

// ── Block cipher algorithms ──────────────────────────────────────────

pub const AES256_CBC: &str = "http://www.w3.org/2001/04/xmlenc#aes256-cbc";
pub const TRIPLEDES_CBC: &str = "http://www.w3.org/2001/04/xmlenc#tripledes-cbc";

// ── Key transport algorithms ─────────────────────────────────────────

pub const RSA_OAEP: &str = "http://www.w3.org/2001/04/xmlenc#rsa-oaep-mgf1p";
pub const RSA_PKCS1: &str = "http://www.w3.org/2001/04/xmlenc#rsa-1_5";

// ── Digest algorithms ────────────────────────────────────────────────

/// Digest announced inside the RSA-OAEP `EncryptionMethod`.
pub const SHA1: &str = "http://www.w3.org/2000/09/xmldsig#sha1";
