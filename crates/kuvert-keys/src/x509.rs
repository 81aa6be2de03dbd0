#![forbid(unsafe_code)]

//! Certificate PEM handling for `<X509Certificate>`.
//!
//! The certificate is re-encoded, never reissued: the DER bytes inside the
//! PEM are emitted unchanged as a single line of base64.  No chain or trust
//! validation is done here.

use base64::Engine;
use der::Decode;
use kuvert_core::Error;
use x509_cert::Certificate;

/// Convert certificate PEM into the bare base64 body used in
/// `<X509Certificate>`: header, footer and line breaks removed.
pub fn pem_to_cert(pem_data: &str) -> Result<String, Error> {
    let der_bytes = certificate_der(pem_data)?;
    Ok(base64::engine::general_purpose::STANDARD.encode(der_bytes))
}

/// Extract and structurally check the DER bytes of a certificate PEM.
///
/// Strict RFC 7468 decoding is tried first.  PEM wrapped at other widths
/// (76 columns is common) falls back to stripping the armor and decoding
/// the remaining base64 as is.
pub fn certificate_der(pem_data: &str) -> Result<Vec<u8>, Error> {
    // Some PEM files carry extra blank lines
    let trimmed = pem_data.trim();

    let der_bytes = match pem_rfc7468::decode_vec(trimmed.as_bytes()) {
        Ok((label, der_bytes)) => {
            if label != CERTIFICATE_LABEL {
                return Err(Error::InvalidKeyMaterial(format!(
                    "expected CERTIFICATE PEM label, got: {label}"
                )));
            }
            der_bytes
        }
        Err(e) => {
            tracing::debug!(error = %e, "strict PEM decoding failed, stripping armor");
            strip_armor(trimmed)?
        }
    };

    let cert = Certificate::from_der(&der_bytes)
        .map_err(|e| Error::InvalidKeyMaterial(format!("failed to parse X.509 certificate: {e}")))?;
    tracing::trace!(subject = %cert.tbs_certificate.subject, "loaded certificate");

    Ok(der_bytes)
}

const CERTIFICATE_LABEL: &str = "CERTIFICATE";

/// Decode the body between `BEGIN CERTIFICATE` and `END CERTIFICATE`,
/// ignoring line length and whitespace.
fn strip_armor(pem: &str) -> Result<Vec<u8>, Error> {
    let begin = format!("-----BEGIN {CERTIFICATE_LABEL}-----");
    let end = format!("-----END {CERTIFICATE_LABEL}-----");

    let mut lines = pem.lines().map(str::trim).filter(|l| !l.is_empty());
    if lines.next() != Some(begin.as_str()) {
        return Err(Error::InvalidKeyMaterial(
            "failed to decode certificate PEM: missing BEGIN CERTIFICATE line".into(),
        ));
    }

    let mut body = String::new();
    let mut closed = false;
    for line in lines {
        if line == end {
            closed = true;
            break;
        }
        body.extend(line.chars().filter(|c| !c.is_ascii_whitespace()));
    }
    if !closed {
        return Err(Error::InvalidKeyMaterial(
            "failed to decode certificate PEM: missing END CERTIFICATE line".into(),
        ));
    }

    base64::engine::general_purpose::STANDARD
        .decode(body)
        .map_err(|e| Error::InvalidKeyMaterial(format!("failed to decode certificate PEM: {e}")))
}
