//! Shared primitives for the Squoosh Native host.
//!
//! This crate holds the small types every other crate in the workspace leans
//! on. It has no knowledge of HTTP, archives or RPC.
//!
//! ## Architecture
//!
//! - **common** (this crate): error locations, the paired-client secret
//! - **bridge-core**: asset serving, RPC bridge, call gating, codecs
//! - **squoosh-native**: application wiring everything together

pub mod client_token;
pub mod error;

pub use client_token::ClientToken;
pub use error::error_location::ErrorLocation;
pub use error::redact_error::RedactError;

#[cfg(test)]
mod tests;
