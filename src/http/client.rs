//! HTTP client integration for remote metadata documents.

// crates.io
use http::{HeaderValue, header::ACCEPT};
use reqwest::{Client, redirect::Policy};
use url::Url;
// self
use crate::{_prelude::*, options::FetchPolicy, security};

/// Maximum redirect depth followed for a single document.
pub const MAX_REDIRECTS: usize = 10;

/// Build the default reqwest client for document retrieval.
pub fn build_client(policy: &FetchPolicy) -> Result<Client> {
	let client = Client::builder()
		.redirect(Policy::limited(MAX_REDIRECTS))
		.user_agent(format!("idp-metadata/{}", env!("CARGO_PKG_VERSION")))
		.connect_timeout(policy.connect_timeout)
		.build()?;

	Ok(client)
}

/// Issue a single GET for `url` and return the body.
///
/// Non-success statuses and bodies above the policy's size guard are errors; there is no retry.
pub async fn fetch_remote(client: &Client, url: &Url, policy: &FetchPolicy) -> Result<Vec<u8>> {
	if policy.require_https {
		security::enforce_https(url)?;
	}

	security::enforce_allowlist(url, &policy.allowed_domains)?;

	let start = Instant::now();
	let response = client
		.get(url.clone())
		.header(ACCEPT, HeaderValue::from_static("application/json"))
		.send()
		.await?;
	let status = response.status();

	if !status.is_success() {
		return Err(Error::HttpStatus { status, url: url.clone() });
	}
	if let Some(length) = response.content_length() {
		check_size(length, policy)?;
	}

	let bytes = response.bytes().await?;

	check_size(bytes.len() as u64, policy)?;

	tracing::debug!(
		url = %url,
		status = %status,
		elapsed = ?start.elapsed(),
		size = bytes.len(),
		"document fetch complete"
	);

	Ok(bytes.to_vec())
}

pub(crate) fn check_size(size: u64, policy: &FetchPolicy) -> Result<()> {
	if size > policy.max_response_bytes {
		return Err(Error::Security(format!(
			"Response size {size} bytes exceeds the configured guard of {limit} bytes.",
			limit = policy.max_response_bytes
		)));
	}

	Ok(())
}
