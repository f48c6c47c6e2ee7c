//! Cache-first retrieval of the discovery and key-set documents.

// std
use std::path::PathBuf;
// crates.io
use reqwest::Client;
use tokio::fs;
use url::Url;
// self
use crate::{
	_prelude::*,
	cache::{CACHE_KEY_CONFIGS, CACHE_KEY_JWKS, adapter::CacheAdapter},
	http::client::{self as http_client, check_size},
	metadata::{DiscoveryDocument, KeySet},
	metrics,
	options::FetchPolicy,
};

/// The two documents a configuration loads.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DocumentKind {
	/// OpenID discovery document.
	Configuration,
	/// JSON Web Key Set referenced by `jwks_uri`.
	KeySet,
}
impl DocumentKind {
	/// Fixed logical cache slot for this document.
	pub fn cache_key(self) -> &'static str {
		match self {
			Self::Configuration => CACHE_KEY_CONFIGS,
			Self::KeySet => CACHE_KEY_JWKS,
		}
	}

	/// Label used in logs and metrics.
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Configuration => "configuration",
			Self::KeySet => "jwks",
		}
	}
}

/// Where a document lives.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Location {
	/// `http` or `https` URL.
	Remote(Url),
	/// Local file, given as a path or a `file://` URL.
	Local(PathBuf),
}
impl Location {
	/// Classify a location string. Anything that is not an HTTP(S) or `file://` URL is a path.
	pub fn parse(raw: &str) -> Self {
		match Url::parse(raw) {
			Ok(url) if matches!(url.scheme(), "http" | "https") => Self::Remote(url),
			Ok(url) if url.scheme() == "file" =>
				Self::Local(url.to_file_path().unwrap_or_else(|_| PathBuf::from(raw))),
			_ => Self::Local(PathBuf::from(raw)),
		}
	}
}

/// Retrieves documents through the cache adapter, falling back to a single origin read.
#[derive(Clone, Debug)]
pub struct MetadataFetcher {
	client: Client,
	policy: FetchPolicy,
	cache: CacheAdapter,
}
impl MetadataFetcher {
	/// Build a fetcher with the default reqwest client.
	pub fn new(policy: FetchPolicy, cache: CacheAdapter) -> Result<Self> {
		let client = http_client::build_client(&policy)?;

		Ok(Self::with_client(client, policy, cache))
	}

	/// Build a fetcher using the supplied HTTP client.
	pub fn with_client(client: Client, policy: FetchPolicy, cache: CacheAdapter) -> Self {
		Self { client, policy, cache }
	}

	/// Fetch and parse the discovery document at `location`.
	pub async fn fetch_discovery(&self, location: &str) -> Result<DiscoveryDocument> {
		self.fetch_document(DocumentKind::Configuration, location, DiscoveryDocument::from_slice)
			.await
	}

	/// Fetch and parse the key set at `location`.
	pub async fn fetch_key_set(&self, location: &str) -> Result<KeySet> {
		self.fetch_document(DocumentKind::KeySet, location, KeySet::from_slice).await
	}

	/// Resolve a document: cache hit first, otherwise one origin read whose parsed payload is
	/// written back to the cache.
	///
	/// A cached payload that no longer parses is treated as a miss.
	#[tracing::instrument(skip(self, parse), fields(document = kind.as_str()))]
	pub async fn fetch_document<T, F>(&self, kind: DocumentKind, location: &str, parse: F) -> Result<T>
	where
		F: Fn(&[u8]) -> Result<T>,
	{
		let key = kind.cache_key();

		if self.cache.is_enabled() {
			let cached = self.cache.get(key).await;

			metrics::record_cache_lookup(kind.as_str(), cached.is_some());

			if let Some(bytes) = cached {
				match parse(&bytes) {
					Ok(document) => {
						tracing::debug!(key, "served from cache");

						return Ok(document);
					},
					Err(err) => {
						tracing::warn!(key, error = %err, "discarding unparseable cached payload");
					},
				}
			}
		}

		let start = Instant::now();
		let outcome = match self.read_location(location).await {
			Ok(bytes) => parse(&bytes).map(|document| (bytes, document)),
			Err(err) => Err(err),
		};

		metrics::record_fetch(kind.as_str(), outcome.is_ok(), start.elapsed());

		let (bytes, document) = outcome?;

		self.cache.set(key, &bytes).await;

		Ok(document)
	}

	/// Read the raw body at `location` without consulting the cache.
	pub async fn read_location(&self, location: &str) -> Result<Vec<u8>> {
		match Location::parse(location) {
			Location::Remote(url) => http_client::fetch_remote(&self.client, &url, &self.policy).await,
			Location::Local(path) => {
				if self.policy.require_https {
					return Err(Error::Security(format!(
						"Local location {} is not allowed when HTTPS is required.",
						path.display()
					)));
				}

				let bytes = fs::read(&path).await?;

				check_size(bytes.len() as u64, &self.policy)?;

				tracing::debug!(path = %path.display(), size = bytes.len(), "document read from disk");

				Ok(bytes)
			},
		}
	}
}
