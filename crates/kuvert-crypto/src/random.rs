#![forbid(unsafe_code)]

//! Secure random bytes from the operating system.

use kuvert_core::Error;
use rand::rngs::OsRng;
use rand::RngCore;

/// Fill a fresh buffer of `len` bytes from the OS CSPRNG.
///
/// A failing entropy source is reported, never replaced by a weaker one.
pub fn random_bytes(len: usize) -> Result<Vec<u8>, Error> {
    let mut buf = vec![0u8; len];
    OsRng
        .try_fill_bytes(&mut buf)
        .map_err(|e| Error::Random(e.to_string()))?;
    Ok(buf)
}
