#![forbid(unsafe_code)]

//! Core types shared by every kuvert crate: the error enum, algorithm URI
//! constants and XML namespace / element names.

pub mod algorithm;
pub mod error;
pub mod ns;

pub use error::{Error, Result};
