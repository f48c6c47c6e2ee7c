//! Transport guards covering HTTPS enforcement and remote host allowlists.
//!
//! # Threat Model
//! The discovery document chooses where the key set is fetched from. When the caller pins the
//! allowed domains, a tampered or misconfigured discovery document cannot redirect key retrieval to
//! an arbitrary host.

// std
use std::collections::HashSet;
// crates.io
use serde::{Deserialize, de::Deserializer};
use url::Url;
// self
use crate::_prelude::*;

/// Canonicalise a DNS name by trimming whitespace, removing any trailing dot, and lowercasing.
pub fn canonicalize_dns_name(value: &str) -> Option<String> {
	let trimmed = value.trim();
	if trimmed.is_empty() {
		return None;
	}

	let without_trailing_dot = trimmed.trim_end_matches('.');
	if without_trailing_dot.is_empty() {
		return None;
	}

	Some(without_trailing_dot.to_ascii_lowercase())
}

/// Normalise an allowlist by canonicalising entries and removing duplicates/empties.
pub fn normalize_allowlist(domains: Vec<String>) -> Vec<String> {
	let mut seen = HashSet::new();
	let mut normalized = Vec::with_capacity(domains.len());

	for domain in domains {
		if let Some(canonical) = canonicalize_dns_name(&domain)
			&& seen.insert(canonical.clone())
		{
			normalized.push(canonical);
		}
	}

	normalized
}

/// `serde` helper to normalise allowlist domains during deserialisation.
pub fn deserialize_allowed_domains<'de, D>(
	deserializer: D,
) -> std::result::Result<Vec<String>, D::Error>
where
	D: Deserializer<'de>,
{
	let raw = Vec::<String>::deserialize(deserializer)?;
	Ok(normalize_allowlist(raw))
}

/// Ensure the provided URL uses HTTPS.
pub fn enforce_https(url: &Url) -> Result<()> {
	if url.scheme() == "https" {
		Ok(())
	} else {
		Err(Error::Security(format!("Upstream URL {url} must use HTTPS.")))
	}
}

/// Reject a remote URL whose host falls outside `allowed_domains`.
pub fn enforce_allowlist(url: &Url, allowed_domains: &[String]) -> Result<()> {
	match url.host_str() {
		Some(host) if host_is_allowed(host, allowed_domains) => Ok(()),
		Some(host) => Err(Error::Security(format!("Host '{host}' is not in the allowlist."))),
		None if allowed_domains.is_empty() => Ok(()),
		None => Err(Error::Security(format!("Upstream URL {url} has no host."))),
	}
}

#[inline]
fn matches_allowlist(host: &str, domain: &str) -> bool {
	if host == domain {
		return true;
	}

	host.strip_suffix(domain).and_then(|prefix| prefix.strip_suffix('.')).is_some()
}

fn is_canonical_allowlist_entry(domain: &str) -> bool {
	!domain.is_empty()
		&& !domain.ends_with('.')
		&& domain.trim().len() == domain.len()
		&& !domain.chars().any(|c| c.is_ascii_uppercase())
}

/// Evaluate whether the given hostname is allowed by the provided suffix allowlist.
///
/// When the list is empty, all hosts are considered valid.
pub fn host_is_allowed(host: &str, allowed_domains: &[String]) -> bool {
	if allowed_domains.is_empty() {
		return true;
	}

	let Some(host) = canonicalize_dns_name(host) else {
		return false;
	};

	allowed_domains.iter().any(|domain| {
		if is_canonical_allowlist_entry(domain) {
			matches_allowlist(&host, domain)
		} else if let Some(canonical) = canonicalize_dns_name(domain) {
			matches_allowlist(&host, &canonical)
		} else {
			false
		}
	})
}
