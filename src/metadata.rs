//! Parsed provider documents: the OpenID discovery document and the signing key set.

// std
use std::collections::HashMap;
// crates.io
use jsonwebtoken::jwk::{Jwk, JwkSet};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
// self
use crate::_prelude::*;

/// OpenID Provider metadata published at the well-known location.
///
/// Every member is optional; members this crate does not model are kept in `extra`.
#[allow(missing_docs)]
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct DiscoveryDocument {
	#[serde(default)]
	pub issuer: Option<String>,
	#[serde(default)]
	pub authorization_endpoint: Option<String>,
	#[serde(default)]
	pub token_endpoint: Option<String>,
	#[serde(default)]
	pub userinfo_endpoint: Option<String>,
	#[serde(default)]
	pub device_authorization_endpoint: Option<String>,
	#[serde(default)]
	pub end_session_endpoint: Option<String>,
	#[serde(default)]
	pub jwks_uri: Option<String>,
	#[serde(default)]
	pub id_token_signing_alg_values_supported: Vec<String>,
	#[serde(default)]
	pub token_endpoint_auth_signing_alg_values_supported: Vec<String>,
	#[serde(flatten)]
	pub extra: Map<String, Value>,
}
impl DiscoveryDocument {
	/// Parse a discovery document from its JSON body.
	pub fn from_slice(bytes: &[u8]) -> Result<Self> {
		Ok(serde_json::from_slice(bytes)?)
	}
}

/// Signing keys indexed by key id, each kept as the raw JWK object.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct KeySet {
	keys: HashMap<String, Value>,
}
impl KeySet {
	/// Parse a `{"keys": [...]}` document.
	///
	/// Keys without a string `kid` cannot be addressed and are skipped; when a `kid` repeats, the
	/// first occurrence wins.
	pub fn from_slice(bytes: &[u8]) -> Result<Self> {
		#[derive(Deserialize)]
		struct Document {
			keys: Vec<Value>,
		}

		let document: Document = serde_json::from_slice(bytes)?;
		let mut keys = HashMap::with_capacity(document.keys.len());

		for key in document.keys {
			let Some(kid) = key.get("kid").and_then(Value::as_str).map(str::to_owned) else {
				tracing::debug!("skipping key without kid");

				continue;
			};

			if keys.contains_key(&kid) {
				tracing::debug!(kid = %kid, "ignoring duplicate key id");

				continue;
			}

			keys.insert(kid, key);
		}

		Ok(Self { keys })
	}

	/// Raw key material for `kid`.
	pub fn get(&self, kid: &str) -> Option<&Value> {
		self.keys.get(kid)
	}

	/// Whether a key with `kid` is present.
	pub fn contains(&self, kid: &str) -> bool {
		self.keys.contains_key(kid)
	}

	/// Number of addressable keys.
	pub fn len(&self) -> usize {
		self.keys.len()
	}

	/// Whether the set holds no keys.
	pub fn is_empty(&self) -> bool {
		self.keys.is_empty()
	}

	/// Iterate over key ids.
	pub fn kids(&self) -> impl Iterator<Item = &str> {
		self.keys.keys().map(String::as_str)
	}

	/// Borrow the full mapping.
	pub fn as_map(&self) -> &HashMap<String, Value> {
		&self.keys
	}

	/// Typed view of the key for `kid`, `None` when absent or not a well-formed JWK.
	pub fn jwk(&self, kid: &str) -> Option<Jwk> {
		self.keys.get(kid).and_then(|value| serde_json::from_value(value.clone()).ok())
	}

	/// Typed key set for verifiers, dropping keys that are not well-formed JWKs.
	pub fn to_jwk_set(&self) -> JwkSet {
		let keys = self
			.keys
			.values()
			.filter_map(|value| serde_json::from_value(value.clone()).ok())
			.collect();

		JwkSet { keys }
	}
}
