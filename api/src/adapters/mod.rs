//! Adapters layer
//!
//! Implementations of port traits for external systems.

pub mod greader;

pub use greader::GReaderClientImpl;
