//! Cache backends and the adapter the fetcher talks to.

pub mod adapter;
pub mod client;
pub mod file;

/// Logical cache key for the discovery document.
pub const CACHE_KEY_CONFIGS: &str = "idp-metadata.configuration";
/// Logical cache key for the key-set document.
pub const CACHE_KEY_JWKS: &str = "idp-metadata.jwks";
