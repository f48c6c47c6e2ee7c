//! Crate-wide error types and `Result` alias.

/// Library-wide result type.
pub type Result<T> = std::result::Result<T, Error>;

/// Unified error type for the metadata crate.
///
/// Only [`Error::Validation`] escapes [`Configuration::load`](crate::Configuration::load) for a
/// well-formed runtime; every other variant describes a fetch or cache problem that is captured
/// into [`LoadStatus`](crate::LoadStatus) or swallowed by the cache adapter.
#[allow(missing_docs)]
#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error(transparent)]
	Io(#[from] std::io::Error),

	#[error(transparent)]
	Reqwest(#[from] reqwest::Error),
	#[error(transparent)]
	Serde(#[from] serde_json::Error),
	#[error(transparent)]
	Url(#[from] url::ParseError),

	#[cfg(feature = "redis")]
	#[error(transparent)]
	Redis(#[from] redis::RedisError),

	#[error(transparent)]
	Validation(#[from] ValidationError),

	#[error("Cache error: {0}")]
	Cache(String),
	#[error("Discovery document has no {member}.")]
	IncompleteDocument { member: &'static str },
	#[error("Upstream HTTP status {status} from {url}")]
	HttpStatus { status: http::StatusCode, url: url::Url },
	#[error("Metrics error: {0}")]
	Metrics(String),
	#[error("Security violation: {0}")]
	Security(String),
}
impl Error {
	/// Borrow the validation failure when this error is one.
	pub fn as_validation(&self) -> Option<&ValidationError> {
		match self {
			Self::Validation(err) => Some(err),
			_ => None,
		}
	}
}

/// Structural problems with caller-supplied options.
///
/// The rendered message of every variant is stable and matches the text callers have historically
/// matched on.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
	/// A provider-required identity field or `client_id` is absent or empty.
	#[error("Missing {0}")]
	MissingField(&'static str),
	/// `cache` is not a mapping, or the mapping has no `type`.
	#[error("Invalid cache configuration")]
	InvalidCacheConfiguration,
	/// `cache.type` is not one of `none`, `file`, `redis`, `memcache`.
	#[error("Invalid cache type")]
	InvalidCacheType,
	/// `cache.type = file` without a usable `path`.
	#[error("Missing file path")]
	MissingFilePath,
	/// `cache.type = redis` without an injected client.
	#[error("Missing Redis client")]
	MissingRedisClient,
	/// The injected client does not speak the Redis protocol.
	#[error("Invalid Redis client, must be Redis or Predis")]
	InvalidRedisClient,
	/// `cache.type = memcache` without an injected client.
	#[error("Missing Memcached client")]
	MissingMemcachedClient,
	/// The injected client does not speak the Memcached protocol.
	#[error("Invalid Memcached client")]
	InvalidMemcachedClient,
}
