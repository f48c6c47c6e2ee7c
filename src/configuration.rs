//! Normalised, read-only provider configuration and its load pipeline.
//!
//! Loading runs validation, resolves the discovery-document location, then fetches the discovery
//! document and the key set it references. Validation problems are returned as errors; fetch
//! problems never are. They leave a fully built [`Configuration`] whose [`LoadStatus`] reports the
//! failure and whose document getters are empty.

// crates.io
use reqwest::Client;
use serde::{Deserialize, Serialize};
// self
use crate::{
	_prelude::*,
	cache::adapter::{CacheAdapter, CacheSpec},
	fetcher::MetadataFetcher,
	metadata::{DiscoveryDocument, KeySet},
	options::{ConfigurationOptions, ConfigurationSpec},
	profile::ProviderProfile,
};

/// Error reported in [`LoadStatus`] whenever either document could not be loaded.
pub const CONFIGURATION_NOT_FOUND: &str = "Configuration not found";

/// Outcome of the fetch pipeline: `{"status": true}` or `{"status": false, "error": "…"}`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadStatus {
	status: bool,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	error: Option<String>,
}
impl LoadStatus {
	/// Both documents were loaded.
	pub fn loaded() -> Self {
		Self { status: true, error: None }
	}

	/// Loading failed with `error`.
	pub fn failed(error: impl Into<String>) -> Self {
		Self { status: false, error: Some(error.into()) }
	}

	/// Whether both documents were loaded.
	pub fn is_loaded(&self) -> bool {
		self.status
	}

	/// Failure message, present only when loading failed.
	pub fn error(&self) -> Option<&str> {
		self.error.as_deref()
	}
}

/// Provider metadata resolved for one ADFS farm or Azure AD tenant.
///
/// Built once by [`Configuration::load`] and never mutated afterwards; share it freely across
/// threads. Check [`Configuration::load_status`] before trusting the document getters.
#[derive(Clone, Debug)]
pub struct Configuration {
	spec: ConfigurationSpec,
	config_uri: String,
	metadata: Option<Metadata>,
	key_set: KeySet,
	load_status: LoadStatus,
}
impl Configuration {
	/// Validate `options` for `profile` and load the provider metadata.
	///
	/// # Errors
	/// Returns [`Error::Validation`] for missing identity fields, a missing `client_id`, or a
	/// malformed cache specification, and [`Error::Reqwest`] if the HTTP client cannot be built.
	/// Unreachable or malformed documents are reported through [`Configuration::load_status`].
	pub async fn load(profile: ProviderProfile, options: &ConfigurationOptions) -> Result<Self> {
		let spec = options.validate(profile)?;
		let fetcher = MetadataFetcher::new(spec.fetch.clone(), CacheAdapter::new(&spec.cache))?;

		Ok(Self::assemble(spec, &fetcher).await)
	}

	/// Like [`Configuration::load`], reusing a caller-owned HTTP client.
	///
	/// # Errors
	/// Returns [`Error::Validation`] when the options are invalid.
	pub async fn load_with_client(
		profile: ProviderProfile,
		options: &ConfigurationOptions,
		client: Client,
	) -> Result<Self> {
		let spec = options.validate(profile)?;
		let fetcher =
			MetadataFetcher::with_client(client, spec.fetch.clone(), CacheAdapter::new(&spec.cache));

		Ok(Self::assemble(spec, &fetcher).await)
	}

	/// Load an ADFS configuration.
	///
	/// # Errors
	/// See [`Configuration::load`].
	pub async fn adfs(options: &ConfigurationOptions) -> Result<Self> {
		Self::load(ProviderProfile::Adfs, options).await
	}

	/// Load an Azure AD configuration.
	///
	/// # Errors
	/// See [`Configuration::load`].
	pub async fn azure_ad(options: &ConfigurationOptions) -> Result<Self> {
		Self::load(ProviderProfile::AzureAd, options).await
	}

	#[tracing::instrument(
		skip_all,
		fields(
			profile = spec.profile.as_str(),
			cache = spec.cache.kind(),
			config_uri = tracing::field::Empty
		)
	)]
	async fn assemble(spec: ConfigurationSpec, fetcher: &MetadataFetcher) -> Self {
		let config_uri = spec.resolve_config_uri();

		tracing::Span::current().record("config_uri", config_uri.as_str());

		match fetch_metadata(spec.profile, fetcher, &config_uri).await {
			Ok((metadata, key_set)) => {
				tracing::debug!(keys = key_set.len(), "provider metadata loaded");

				Self {
					spec,
					config_uri,
					metadata: Some(metadata),
					key_set,
					load_status: LoadStatus::loaded(),
				}
			},
			Err(err) => {
				tracing::warn!(error = %err, "provider metadata unavailable");

				Self {
					spec,
					config_uri,
					metadata: None,
					key_set: KeySet::default(),
					load_status: LoadStatus::failed(CONFIGURATION_NOT_FOUND),
				}
			},
		}
	}

	/// Provider profile this configuration was loaded for.
	pub fn profile(&self) -> ProviderProfile {
		self.spec.profile
	}

	/// ADFS hostname.
	pub fn hostname(&self) -> Option<&str> {
		self.spec.identity.hostname()
	}

	/// Azure AD tenant.
	pub fn tenant(&self) -> Option<&str> {
		self.spec.identity.tenant()
	}

	/// Azure AD tenant id.
	pub fn tenant_id(&self) -> Option<&str> {
		self.spec.identity.tenant_id()
	}

	/// Application (client) id.
	pub fn client_id(&self) -> &str {
		&self.spec.client_id
	}

	/// Discovery-document location actually used.
	pub fn config_uri(&self) -> &str {
		&self.config_uri
	}

	/// Cache backend the configuration was loaded through.
	pub fn cache_spec(&self) -> &CacheSpec {
		&self.spec.cache
	}

	/// Outcome of the fetch pipeline.
	pub fn load_status(&self) -> &LoadStatus {
		&self.load_status
	}

	/// Shorthand for `load_status().is_loaded()`.
	pub fn is_loaded(&self) -> bool {
		self.load_status.is_loaded()
	}

	/// Signing keys by key id; empty when loading failed.
	pub fn key_set(&self) -> &KeySet {
		&self.key_set
	}

	/// Full discovery document.
	pub fn discovery_document(&self) -> Option<&DiscoveryDocument> {
		self.metadata.as_ref().map(|metadata| &metadata.document)
	}

	/// OpenID issuer.
	pub fn issuer(&self) -> Option<&str> {
		self.document_str(|doc| doc.issuer.as_deref())
	}

	/// Issuer expected in access tokens.
	pub fn access_token_issuer(&self) -> Option<&str> {
		self.metadata.as_ref().and_then(|metadata| metadata.access_token_issuer.as_deref())
	}

	/// Authorization endpoint.
	pub fn authorization_endpoint(&self) -> Option<&str> {
		self.document_str(|doc| doc.authorization_endpoint.as_deref())
	}

	/// Token endpoint.
	pub fn token_endpoint(&self) -> Option<&str> {
		self.document_str(|doc| doc.token_endpoint.as_deref())
	}

	/// UserInfo endpoint.
	pub fn userinfo_endpoint(&self) -> Option<&str> {
		self.document_str(|doc| doc.userinfo_endpoint.as_deref())
	}

	/// Device authorization endpoint.
	pub fn device_authorization_endpoint(&self) -> Option<&str> {
		self.document_str(|doc| doc.device_authorization_endpoint.as_deref())
	}

	/// End-session (logout) endpoint.
	pub fn end_session_endpoint(&self) -> Option<&str> {
		self.document_str(|doc| doc.end_session_endpoint.as_deref())
	}

	/// Key-set location advertised by the discovery document.
	pub fn jwks_uri(&self) -> Option<&str> {
		self.document_str(|doc| doc.jwks_uri.as_deref())
	}

	/// Algorithms supported for ID token signatures.
	pub fn id_token_signing_alg_values_supported(&self) -> &[String] {
		self.discovery_document()
			.map(|doc| doc.id_token_signing_alg_values_supported.as_slice())
			.unwrap_or_default()
	}

	/// Algorithms supported for token-endpoint client authentication.
	pub fn token_endpoint_auth_signing_alg_values_supported(&self) -> &[String] {
		self.discovery_document()
			.map(|doc| doc.token_endpoint_auth_signing_alg_values_supported.as_slice())
			.unwrap_or_default()
	}

	fn document_str<'a, F>(&'a self, f: F) -> Option<&'a str>
	where
		F: FnOnce(&'a DiscoveryDocument) -> Option<&'a str>,
	{
		self.discovery_document().and_then(f)
	}
}

#[derive(Clone, Debug)]
struct Metadata {
	document: DiscoveryDocument,
	access_token_issuer: Option<String>,
}

async fn fetch_metadata(
	profile: ProviderProfile,
	fetcher: &MetadataFetcher,
	config_uri: &str,
) -> Result<(Metadata, KeySet)> {
	let document = fetcher.fetch_discovery(config_uri).await?;
	let jwks_uri = document
		.jwks_uri
		.as_deref()
		.ok_or(Error::IncompleteDocument { member: "jwks_uri" })?;
	let key_set = fetcher.fetch_key_set(jwks_uri).await?;
	let access_token_issuer =
		document.issuer.as_deref().map(|issuer| profile.access_token_issuer(issuer));

	Ok((Metadata { document, access_token_issuer }, key_set))
}
