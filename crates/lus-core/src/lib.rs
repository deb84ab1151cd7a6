//! lus-core: shared error type and application configuration.
//!
//! This crate is the foundational dependency for the other lus-* crates. It
//! provides the unified [`Error`] type with its HTTP status mapping and the
//! [`config::Config`] structure consumed at startup.

pub mod config;
pub mod error;

pub use error::{Error, Result};
