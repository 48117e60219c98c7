//! Test utilities
//!
//! Manual mock implementation of the reader port plus test fixtures.
//!
//! Why a manual mock instead of mockall?
//! - The mock scripts per-feed response sequences (fail, then succeed),
//!   which reads more naturally as a builder than as expectation macros
//! - We control exactly what it returns without macro magic

pub mod fixtures;
pub mod mocks;

pub use fixtures::*;
pub use mocks::*;
