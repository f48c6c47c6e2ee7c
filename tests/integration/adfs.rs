//! ADFS profile: validation, location derivation, and successful loads.

// crates.io
use idp_metadata::{
	CONFIGURATION_NOT_FOUND, Configuration, ConfigurationOptions, LoadStatus, ProviderProfile,
	Result,
};
use wiremock::{
	Mock, MockServer, ResponseTemplate,
	matchers::{method, path},
};
// self
use crate::common::{self, CLIENT_ID, KID};

#[tokio::test]
async fn missing_identity_fields_are_reported_in_order() {
	let err = Configuration::adfs(&ConfigurationOptions::new()).await.unwrap_err();

	assert_eq!(err.to_string(), "Missing hostname");

	let err = Configuration::adfs(&ConfigurationOptions::new().hostname("some_hostname.com"))
		.await
		.unwrap_err();

	assert_eq!(err.to_string(), "Missing client_id");

	let err = Configuration::adfs(&ConfigurationOptions::new().hostname("").client_id(CLIENT_ID))
		.await
		.unwrap_err();

	assert_eq!(err.to_string(), "Missing hostname");
}

#[test]
fn default_location_is_derived_from_hostname() {
	let spec = ConfigurationOptions::new()
		.hostname("some_hostname.com")
		.client_id(CLIENT_ID)
		.validate(ProviderProfile::Adfs)
		.expect("valid options");

	assert_eq!(
		spec.resolve_config_uri(),
		"https://some_hostname.com/adfs/.well-known/openid-configuration"
	);
}

#[tokio::test]
async fn loads_remote_metadata() -> Result<()> {
	let _ = tracing_subscriber::fmt::try_init();

	let server = MockServer::start().await;
	let config_uri = common::mount_provider(&server, "adfs", 1).await;
	let options = ConfigurationOptions::new()
		.hostname("your_domain")
		.client_id(CLIENT_ID)
		.config_uri(config_uri.clone());
	let config = Configuration::adfs(&options).await?;

	assert_eq!(config.load_status(), &LoadStatus::loaded());
	assert_eq!(config.config_uri(), config_uri);
	assert_eq!(config.hostname(), Some("your_domain"));
	assert_eq!(config.client_id(), CLIENT_ID);
	assert_eq!(config.issuer(), Some("https://your_domain/adfs"));
	assert_eq!(config.access_token_issuer(), Some("http://your_domain/adfs/services/trust"));
	assert_eq!(
		config.authorization_endpoint(),
		Some("https://your_domain/adfs/oauth2/authorize/")
	);
	assert_eq!(config.token_endpoint(), Some("https://your_domain/adfs/oauth2/token/"));
	assert_eq!(config.userinfo_endpoint(), Some("https://your_domain/adfs/userinfo"));
	assert_eq!(
		config.device_authorization_endpoint(),
		Some("https://your_domain/adfs/oauth2/devicecode")
	);
	assert_eq!(config.end_session_endpoint(), Some("https://your_domain/adfs/oauth2/logout"));
	assert_eq!(config.id_token_signing_alg_values_supported(), ["RS256"]);
	assert_eq!(config.token_endpoint_auth_signing_alg_values_supported(), ["RS256"]);
	assert!(config.key_set().contains(KID));
	assert_eq!(config.key_set().len(), 2);
	assert!(config.key_set().jwk(KID).is_some());

	server.verify().await;

	Ok(())
}

#[tokio::test]
async fn loads_local_fixture_files() -> Result<()> {
	let config_uri = common::fixture_path("adfs", "configuration.json");
	let options = ConfigurationOptions::new()
		.hostname("your_domain")
		.client_id(CLIENT_ID)
		.config_uri(config_uri.to_string_lossy());
	let config = Configuration::adfs(&options).await?;

	assert!(config.is_loaded());
	assert_eq!(config.jwks_uri(), Some("tests/fixtures/adfs/jwks.json"));
	assert!(config.key_set().contains(KID));

	Ok(())
}

#[tokio::test]
async fn unreachable_discovery_document_yields_failed_status() -> Result<()> {
	let server = MockServer::start().await;

	Mock::given(method("GET"))
		.respond_with(ResponseTemplate::new(404))
		.expect(1)
		.mount(&server)
		.await;

	let config_uri = format!("{}/adfs/.well-known/openid-configuration", server.uri());
	let options = ConfigurationOptions::new()
		.hostname("some_hostname.com")
		.client_id(CLIENT_ID)
		.config_uri(config_uri.clone());
	let config = Configuration::adfs(&options).await?;

	assert_eq!(config.load_status(), &LoadStatus::failed(CONFIGURATION_NOT_FOUND));
	assert_eq!(
		serde_json::to_value(config.load_status()).expect("json"),
		serde_json::json!({ "status": false, "error": "Configuration not found" })
	);
	assert_eq!(config.config_uri(), config_uri);
	assert_eq!(config.hostname(), Some("some_hostname.com"));
	assert!(config.issuer().is_none());
	assert!(config.key_set().is_empty());

	server.verify().await;

	Ok(())
}

#[tokio::test]
async fn key_set_failure_drops_both_documents() -> Result<()> {
	let server = MockServer::start().await;
	let mut configuration = common::fixture("adfs", "configuration.json");

	configuration["jwks_uri"] = format!("{}/keys", server.uri()).into();

	Mock::given(method("GET"))
		.and(path("/configuration"))
		.respond_with(ResponseTemplate::new(200).set_body_json(configuration))
		.mount(&server)
		.await;
	Mock::given(method("GET"))
		.and(path("/keys"))
		.respond_with(ResponseTemplate::new(500))
		.mount(&server)
		.await;

	let options = ConfigurationOptions::new()
		.hostname("your_domain")
		.client_id(CLIENT_ID)
		.config_uri(format!("{}/configuration", server.uri()));
	let config = Configuration::adfs(&options).await?;

	assert_eq!(config.load_status().error(), Some(CONFIGURATION_NOT_FOUND));
	assert!(config.discovery_document().is_none());
	assert!(config.access_token_issuer().is_none());
	assert!(config.key_set().is_empty());

	Ok(())
}
