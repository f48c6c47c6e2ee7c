//! End-to-end coverage for provider configuration loading.

mod adfs;
mod cache_backends;
