//! HTTP helpers for metadata retrieval.

pub mod client;
