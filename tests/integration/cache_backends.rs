//! Cache validation and cache-first loading across backends.

// std
use std::sync::Arc;
// crates.io
use idp_metadata::{
	CACHE_KEY_CONFIGS, CACHE_KEY_JWKS, CacheProtocol, Configuration, ConfigurationOptions,
	FileStore, Result,
};
use serde_json::{Value, json};
use wiremock::MockServer;
// self
use crate::common::{self, CLIENT_ID, KID, MemoryClient};

fn adfs_options() -> ConfigurationOptions {
	ConfigurationOptions::new()
		.hostname("your_domain")
		.client_id(CLIENT_ID)
		.config_uri("/not/a/real/location.json")
}

async fn validation_message(options: ConfigurationOptions) -> String {
	Configuration::adfs(&options).await.unwrap_err().to_string()
}

#[tokio::test]
async fn malformed_cache_specifications_are_rejected() {
	let cases: [(Value, &str); 8] = [
		(json!(""), "Invalid cache configuration"),
		(json!({}), "Invalid cache configuration"),
		(json!({ "path": "/tmp" }), "Invalid cache configuration"),
		(json!({ "type": "bogus" }), "Invalid cache type"),
		(json!({ "type": "file" }), "Missing file path"),
		(json!({ "type": "redis" }), "Missing Redis client"),
		(
			json!({ "type": "redis", "client": "tcp://127.0.0.1:6379" }),
			"Invalid Redis client, must be Redis or Predis",
		),
		(json!({ "type": "memcache" }), "Missing Memcached client"),
	];

	for (cache, expected) in cases {
		assert_eq!(validation_message(adfs_options().cache(cache)).await, expected);
	}
}

#[tokio::test]
async fn injected_client_must_speak_the_configured_protocol() {
	let memcached = Arc::new(MemoryClient::new(CacheProtocol::Memcached));
	let redis = Arc::new(MemoryClient::new(CacheProtocol::Redis));

	assert_eq!(
		validation_message(
			adfs_options().cache(json!({ "type": "redis" })).cache_client(memcached.clone())
		)
		.await,
		"Invalid Redis client, must be Redis or Predis"
	);
	assert_eq!(
		validation_message(adfs_options().cache(json!({ "type": "memcache" })).cache_client(redis))
			.await,
		"Invalid Memcached client"
	);

	let config = Configuration::adfs(
		&adfs_options().cache(json!({ "type": "memcache" })).cache_client(memcached),
	)
	.await
	.expect("valid cache client");

	assert_eq!(config.cache_spec().kind(), "memcache");
}

#[tokio::test]
async fn client_cache_hit_reproduces_the_same_view_without_refetching() -> Result<()> {
	let _ = tracing_subscriber::fmt::try_init();

	let server = MockServer::start().await;
	let config_uri = common::mount_provider(&server, "adfs", 1).await;
	let client = Arc::new(MemoryClient::new(CacheProtocol::Redis));
	let options = ConfigurationOptions::new()
		.hostname("your_domain")
		.client_id(CLIENT_ID)
		.config_uri(config_uri)
		.cache(json!({ "type": "redis" }))
		.cache_client(client.clone());
	let first = Configuration::adfs(&options).await?;

	assert!(first.is_loaded());
	assert_eq!(client.keys(), [CACHE_KEY_CONFIGS, CACHE_KEY_JWKS]);
	assert_eq!(client.save_count(), 2);

	let second = Configuration::adfs(&options).await?;

	assert_eq!(second.load_status(), first.load_status());
	assert_eq!(second.discovery_document(), first.discovery_document());
	assert_eq!(second.access_token_issuer(), first.access_token_issuer());
	assert_eq!(second.key_set(), first.key_set());
	assert_eq!(client.save_count(), 2);

	server.verify().await;

	Ok(())
}

#[tokio::test]
async fn file_cache_persists_documents_across_loads() -> Result<()> {
	let server = MockServer::start().await;
	let config_uri = common::mount_provider(&server, "azure_ad", 1).await;
	let dir = common::scratch_dir("file-cache");
	let options = ConfigurationOptions::new()
		.tenant("common")
		.tenant_id("iv9puejd-qmJ1-AL2i-j3TP-wrb7qjjvxttz")
		.client_id(CLIENT_ID)
		.config_uri(config_uri)
		.cache(json!({ "type": "file", "path": dir.to_string_lossy() }));
	let first = Configuration::azure_ad(&options).await?;
	let store = FileStore::new(&dir);

	assert!(first.is_loaded());
	assert!(store.entry_path(CACHE_KEY_CONFIGS).is_file());
	assert!(store.entry_path(CACHE_KEY_JWKS).is_file());

	let second = Configuration::azure_ad(&options).await?;

	assert!(second.is_loaded());
	assert_eq!(second.issuer(), first.issuer());
	assert!(second.key_set().contains(KID));

	server.verify().await;

	let _ = std::fs::remove_dir_all(&dir);

	Ok(())
}

#[tokio::test]
async fn failed_loads_leave_the_cache_untouched() -> Result<()> {
	let client = Arc::new(MemoryClient::new(CacheProtocol::Memcached));
	let config = Configuration::adfs(
		&adfs_options().cache(json!({ "type": "memcache" })).cache_client(client.clone()),
	)
	.await?;

	assert!(!config.is_loaded());
	assert!(client.keys().is_empty());
	assert_eq!(client.save_count(), 0);

	Ok(())
}
