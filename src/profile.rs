//! Provider profiles: the fixed rule sets that distinguish ADFS from Azure AD.

// crates.io
use serde::{Deserialize, Serialize};

/// Identity provider flavour driving URI templates, required fields, and issuer rules.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderProfile {
	/// Active Directory Federation Services, addressed by hostname.
	Adfs,
	/// Azure Active Directory (Entra ID) v2.0 endpoints, addressed by tenant.
	AzureAd,
}
impl ProviderProfile {
	/// Identity fields that must be present, in the order they are checked.
	pub fn required_fields(self) -> &'static [&'static str] {
		match self {
			Self::Adfs => &["hostname"],
			Self::AzureAd => &["tenant", "tenant_id"],
		}
	}

	/// Default discovery-document location derived from the identity.
	///
	/// Plain substitution: no trimming or case folding is applied to the identity values.
	pub fn well_known_uri(self, identity: &Identity) -> String {
		let authority = identity.authority();

		match self {
			Self::Adfs => format!("https://{authority}/adfs/.well-known/openid-configuration"),
			Self::AzureAd => format!(
				"https://login.microsoftonline.com/{authority}/v2.0/.well-known/openid-configuration"
			),
		}
	}

	/// Issuer expected in access tokens, given the discovery-document issuer.
	///
	/// ADFS signs access tokens with its WS-Trust issuer (`http://…/services/trust`) rather than the
	/// OpenID issuer; Azure AD uses the discovery issuer for both.
	pub fn access_token_issuer(self, issuer: &str) -> String {
		match self {
			Self::Adfs => {
				let issuer = match issuer.strip_prefix("https://") {
					Some(rest) => format!("http://{rest}"),
					None => issuer.to_owned(),
				};

				format!("{issuer}/services/trust")
			},
			Self::AzureAd => issuer.to_owned(),
		}
	}

	/// Short label used in logs and metrics.
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Adfs => "adfs",
			Self::AzureAd => "azure_ad",
		}
	}
}

/// Caller identity validated against a [`ProviderProfile`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Identity {
	/// ADFS farm hostname.
	Hostname(String),
	/// Azure AD tenant (name or GUID) and its directory id.
	Tenant {
		/// Tenant segment used in the authority URL.
		tenant: String,
		/// Directory (tenant) id.
		tenant_id: String,
	},
}
impl Identity {
	/// Segment substituted into the well-known URI template.
	pub fn authority(&self) -> &str {
		match self {
			Self::Hostname(hostname) => hostname,
			Self::Tenant { tenant, .. } => tenant,
		}
	}

	/// Hostname for ADFS identities.
	pub fn hostname(&self) -> Option<&str> {
		match self {
			Self::Hostname(hostname) => Some(hostname),
			Self::Tenant { .. } => None,
		}
	}

	/// Tenant for Azure AD identities.
	pub fn tenant(&self) -> Option<&str> {
		match self {
			Self::Tenant { tenant, .. } => Some(tenant),
			Self::Hostname(_) => None,
		}
	}

	/// Tenant id for Azure AD identities.
	pub fn tenant_id(&self) -> Option<&str> {
		match self {
			Self::Tenant { tenant_id, .. } => Some(tenant_id),
			Self::Hostname(_) => None,
		}
	}
}
