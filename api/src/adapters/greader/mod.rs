//! FreshRSS Google Reader API adapter

mod client;

pub use client::GReaderClientImpl;
