//! Best-effort get/set over the configured cache backend.

// self
use crate::{
	_prelude::*,
	cache::{client::CacheClient, file::FileStore},
};

/// Validated description of the cache backend selected by the caller.
#[derive(Clone, Debug, Default)]
pub enum CacheSpec {
	/// No caching; every lookup misses.
	#[default]
	None,
	/// Payloads stored as files under `path`.
	File {
		/// Directory holding cached payloads.
		path: std::path::PathBuf,
	},
	/// Payloads stored through an injected Redis-protocol client.
	Redis {
		/// Caller-owned client.
		client: Arc<dyn CacheClient>,
	},
	/// Payloads stored through an injected Memcached-protocol client.
	Memcache {
		/// Caller-owned client.
		client: Arc<dyn CacheClient>,
	},
}
impl CacheSpec {
	/// Configuration spelling of the backend type.
	pub fn kind(&self) -> &'static str {
		match self {
			Self::None => "none",
			Self::File { .. } => "file",
			Self::Redis { .. } => "redis",
			Self::Memcache { .. } => "memcache",
		}
	}
}

/// Uniform cache facade used by the metadata fetcher.
///
/// Backend failures never surface: a failed read is a miss and a failed write is dropped, since
/// the fetcher always falls back to the origin.
#[derive(Clone, Debug)]
pub struct CacheAdapter {
	backend: Backend,
}
impl CacheAdapter {
	/// Build the adapter for a validated cache specification.
	pub fn new(spec: &CacheSpec) -> Self {
		let backend = match spec {
			CacheSpec::None => Backend::Disabled,
			CacheSpec::File { path } => Backend::File(FileStore::new(path)),
			CacheSpec::Redis { client } | CacheSpec::Memcache { client } =>
				Backend::Client(client.clone()),
		};

		Self { backend }
	}

	/// Adapter that never stores anything.
	pub fn disabled() -> Self {
		Self { backend: Backend::Disabled }
	}

	/// Whether lookups can ever hit.
	pub fn is_enabled(&self) -> bool {
		!matches!(self.backend, Backend::Disabled)
	}

	/// Look up `key`, returning `None` on a miss or on any backend error.
	pub async fn get(&self, key: &str) -> Option<Vec<u8>> {
		let outcome = match &self.backend {
			Backend::Disabled => return None,
			Backend::File(store) => store.read(key).await,
			Backend::Client(client) => client.get_item(key).await,
		};

		outcome.unwrap_or_else(|err| {
			tracing::warn!(key, error = %err, "cache read failed; treating as miss");

			None
		})
	}

	/// Store `value` under `key`, ignoring backend errors.
	pub async fn set(&self, key: &str, value: &[u8]) {
		let outcome = match &self.backend {
			Backend::Disabled => return,
			Backend::File(store) => store.write(key, value).await,
			Backend::Client(client) => client.save(key, value).await,
		};

		if let Err(err) = outcome {
			tracing::warn!(key, error = %err, "cache write failed; continuing without cache");
		}
	}
}

#[derive(Clone, Debug)]
enum Backend {
	Disabled,
	File(FileStore),
	Client(Arc<dyn CacheClient>),
}
