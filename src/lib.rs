//! Resolve and cache the OpenID discovery document and signing keys of ADFS and Azure AD
//! identity providers behind one normalised, read-only view.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod cache;
pub mod http;
pub mod metrics;
pub mod security;

mod configuration;
mod error;
mod fetcher;
mod metadata;
mod options;
mod profile;
mod _prelude {
	pub use std::{
		fmt::Debug,
		sync::Arc,
		time::{Duration, Instant},
	};

	pub use crate::{Error, Result};
}

#[cfg(feature = "prometheus")] pub use crate::metrics::install_default_exporter;
pub use crate::{
	cache::{
		CACHE_KEY_CONFIGS, CACHE_KEY_JWKS,
		adapter::{CacheAdapter, CacheSpec},
		client::{BoxFuture, CacheClient, CacheProtocol},
		file::FileStore,
	},
	configuration::{CONFIGURATION_NOT_FOUND, Configuration, LoadStatus},
	error::{Error, Result, ValidationError},
	fetcher::{DocumentKind, Location, MetadataFetcher},
	metadata::{DiscoveryDocument, KeySet},
	options::{
		ConfigurationOptions, ConfigurationSpec, DEFAULT_CONNECT_TIMEOUT,
		DEFAULT_MAX_RESPONSE_BYTES, FetchPolicy,
	},
	profile::{Identity, ProviderProfile},
};
