//! Caller-supplied option bag and its validation into a typed specification.
//!
//! Options arrive loosely shaped (deserialised from configuration files or assembled in code), so
//! validation inspects shapes only and reports the first violated rule in a fixed order:
//! provider identity fields, then `client_id`, then the cache structure, then the backend-specific
//! cache requirements. No I/O happens here.

// crates.io
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
// self
use crate::{
	_prelude::*,
	cache::{
		adapter::CacheSpec,
		client::{CacheClient, CacheProtocol},
	},
	error::ValidationError,
	profile::{Identity, ProviderProfile},
	security,
};

/// Default size guard for fetched documents (1 MiB).
pub const DEFAULT_MAX_RESPONSE_BYTES: u64 = 1_048_576;
/// Default TCP connect timeout for remote documents.
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Transport guards applied to every document fetch.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FetchPolicy {
	/// Reject plain-HTTP and local-file locations.
	#[serde(default)]
	pub require_https: bool,
	/// DNS suffix allowlist for remote hosts; empty allows every host.
	#[serde(default, deserialize_with = "crate::security::deserialize_allowed_domains")]
	pub allowed_domains: Vec<String>,
	/// Largest accepted document body in bytes.
	#[serde(default = "default_max_response_bytes")]
	pub max_response_bytes: u64,
	/// Connect timeout used when building the HTTP client.
	#[serde(default = "default_connect_timeout")]
	pub connect_timeout: Duration,
}
impl FetchPolicy {
	/// Require HTTPS for every location.
	pub fn with_require_https(mut self, require_https: bool) -> Self {
		self.require_https = require_https;

		self
	}

	/// Add a domain to the allowlist.
	pub fn add_allowed_domain(mut self, domain: impl Into<String>) -> Self {
		let raw = domain.into();

		if let Some(domain) = security::canonicalize_dns_name(&raw)
			&& !self.allowed_domains.contains(&domain)
		{
			self.allowed_domains.push(domain);
		}

		self
	}

	/// Override the response size guard.
	pub fn with_max_response_bytes(mut self, max_response_bytes: u64) -> Self {
		self.max_response_bytes = max_response_bytes;

		self
	}
}
impl Default for FetchPolicy {
	fn default() -> Self {
		Self {
			require_https: false,
			allowed_domains: Vec::new(),
			max_response_bytes: DEFAULT_MAX_RESPONSE_BYTES,
			connect_timeout: DEFAULT_CONNECT_TIMEOUT,
		}
	}
}

/// Raw, unvalidated options for a configuration.
///
/// Recognised keys: `hostname` (ADFS), `tenant` and `tenant_id` (Azure AD), `client_id`,
/// `config_uri`, and `cache` (`{ "type": "none" | "file" | "redis" | "memcache", "path": … }`).
/// The Redis or Memcached client cannot travel through a configuration file and is injected
/// with [`ConfigurationOptions::cache_client`].
#[derive(Clone, Debug, Default, Deserialize)]
pub struct ConfigurationOptions {
	/// Transport guards.
	#[serde(default)]
	pub fetch: FetchPolicy,
	#[serde(flatten)]
	values: Map<String, Value>,
	#[serde(skip)]
	cache_client: Option<Arc<dyn CacheClient>>,
}
impl ConfigurationOptions {
	/// Create an empty option bag.
	pub fn new() -> Self {
		Self::default()
	}

	/// Set an arbitrary option.
	pub fn set(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
		self.values.insert(key.into(), value.into());

		self
	}

	/// Remove an option, returning its previous value.
	pub fn remove(&mut self, key: &str) -> Option<Value> {
		self.values.remove(key)
	}

	/// Read an option.
	pub fn get(&self, key: &str) -> Option<&Value> {
		self.values.get(key)
	}

	/// ADFS farm hostname.
	pub fn hostname(self, hostname: impl Into<String>) -> Self {
		self.set("hostname", hostname.into())
	}

	/// Azure AD tenant segment.
	pub fn tenant(self, tenant: impl Into<String>) -> Self {
		self.set("tenant", tenant.into())
	}

	/// Azure AD directory id.
	pub fn tenant_id(self, tenant_id: impl Into<String>) -> Self {
		self.set("tenant_id", tenant_id.into())
	}

	/// Application (client) id.
	pub fn client_id(self, client_id: impl Into<String>) -> Self {
		self.set("client_id", client_id.into())
	}

	/// Explicit discovery-document location (URL or local path).
	pub fn config_uri(self, config_uri: impl Into<String>) -> Self {
		self.set("config_uri", config_uri.into())
	}

	/// Cache specification, e.g. `json!({ "type": "file", "path": "/var/cache/idp" })`.
	pub fn cache(self, cache: impl Into<Value>) -> Self {
		self.set("cache", cache)
	}

	/// Inject the Redis or Memcached client referenced by the cache specification.
	pub fn cache_client(mut self, client: Arc<dyn CacheClient>) -> Self {
		self.cache_client = Some(client);

		self
	}

	/// Replace the transport guards.
	pub fn fetch_policy(mut self, policy: FetchPolicy) -> Self {
		self.fetch = policy;

		self
	}

	/// Validate the bag against `profile`, producing a typed specification.
	pub fn validate(
		&self,
		profile: ProviderProfile,
	) -> std::result::Result<ConfigurationSpec, ValidationError> {
		for field in profile.required_fields() {
			self.required(field)?;
		}

		let identity = match profile {
			ProviderProfile::Adfs => Identity::Hostname(self.required("hostname")?),
			ProviderProfile::AzureAd => Identity::Tenant {
				tenant: self.required("tenant")?,
				tenant_id: self.required("tenant_id")?,
			},
		};
		let client_id = self.required("client_id")?;
		let config_uri = self.non_empty_str("config_uri").map(str::to_owned);
		let cache = parse_cache(self.values.get("cache"), self.cache_client.as_ref())?;

		Ok(ConfigurationSpec {
			profile,
			identity,
			client_id,
			config_uri,
			cache,
			fetch: self.fetch.clone(),
		})
	}

	fn required(&self, field: &'static str) -> std::result::Result<String, ValidationError> {
		self.non_empty_str(field).map(str::to_owned).ok_or(ValidationError::MissingField(field))
	}

	fn non_empty_str(&self, field: &str) -> Option<&str> {
		self.values.get(field).and_then(Value::as_str).filter(|value| !value.is_empty())
	}
}
impl From<Map<String, Value>> for ConfigurationOptions {
	fn from(values: Map<String, Value>) -> Self {
		Self { values, ..Default::default() }
	}
}

/// Validated configuration input.
#[derive(Clone, Debug)]
pub struct ConfigurationSpec {
	/// Provider rule set.
	pub profile: ProviderProfile,
	/// Caller identity matching the profile.
	pub identity: Identity,
	/// Application (client) id.
	pub client_id: String,
	/// Explicit discovery-document location, if supplied.
	pub config_uri: Option<String>,
	/// Cache backend selection.
	pub cache: CacheSpec,
	/// Transport guards.
	pub fetch: FetchPolicy,
}
impl ConfigurationSpec {
	/// Discovery-document location: the explicit `config_uri` verbatim, else the profile template.
	pub fn resolve_config_uri(&self) -> String {
		match &self.config_uri {
			Some(uri) => uri.clone(),
			None => self.profile.well_known_uri(&self.identity),
		}
	}
}

fn parse_cache(
	raw: Option<&Value>,
	client: Option<&Arc<dyn CacheClient>>,
) -> std::result::Result<CacheSpec, ValidationError> {
	let map = match raw {
		None | Some(Value::Null) => return Ok(CacheSpec::None),
		Some(Value::Object(map)) => map,
		Some(_) => return Err(ValidationError::InvalidCacheConfiguration),
	};
	let kind = map.get("type").ok_or(ValidationError::InvalidCacheConfiguration)?;

	match kind.as_str() {
		Some("none") => Ok(CacheSpec::None),
		Some("file") => map
			.get("path")
			.and_then(Value::as_str)
			.filter(|path| !path.is_empty())
			.map(|path| CacheSpec::File { path: path.into() })
			.ok_or(ValidationError::MissingFilePath),
		Some("redis") => {
			let client = select_client(
				map,
				client,
				CacheProtocol::Redis,
				ValidationError::MissingRedisClient,
				ValidationError::InvalidRedisClient,
			)?;

			Ok(CacheSpec::Redis { client })
		},
		Some("memcache") => {
			let client = select_client(
				map,
				client,
				CacheProtocol::Memcached,
				ValidationError::MissingMemcachedClient,
				ValidationError::InvalidMemcachedClient,
			)?;

			Ok(CacheSpec::Memcache { client })
		},
		_ => Err(ValidationError::InvalidCacheType),
	}
}

// A `client` member inside the serialised mapping can never be a usable handle, so it is treated
// as an incompatible client rather than a missing one.
fn select_client(
	map: &Map<String, Value>,
	client: Option<&Arc<dyn CacheClient>>,
	protocol: CacheProtocol,
	missing: ValidationError,
	invalid: ValidationError,
) -> std::result::Result<Arc<dyn CacheClient>, ValidationError> {
	match client {
		Some(client) if client.protocol() == protocol => Ok(client.clone()),
		Some(_) => Err(invalid),
		None if map.get("client").is_some_and(|value| !value.is_null()) => Err(invalid),
		None => Err(missing),
	}
}

fn default_max_response_bytes() -> u64 {
	DEFAULT_MAX_RESPONSE_BYTES
}

fn default_connect_timeout() -> Duration {
	DEFAULT_CONNECT_TIMEOUT
}
