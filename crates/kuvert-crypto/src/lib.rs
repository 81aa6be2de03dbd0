#![forbid(unsafe_code)]

//! Cryptographic building blocks for XML-Enc envelopes.
//!
//! - [`registry`]: the closed table of supported algorithm URIs
//! - [`cipher`]: CBC content encryption with IV framing and padding
//! - [`keytransport`]: RSA wrapping of the content-key
//! - [`random`]: OS-backed secure random bytes

pub mod cipher;
pub mod keytransport;
pub mod random;
pub mod registry;

pub use registry::{Algorithm, AlgorithmDescriptor, AlgorithmRegistry, OperationKind, Padding};
