//! Token response returned by the login, registration, social-login, and renewal endpoints.

// self
use crate::{
	_prelude::*,
	auth::{CredentialBundle, CredentialBundleBuilderError},
};

/// Wire shape of a token exchange.
///
/// Every field is optional at the parsing layer so an incomplete response surfaces as a
/// [`CredentialBundleBuilderError`] naming the missing field rather than a generic JSON error.
/// The camel-case aliases cover older backend builds that echoed the cookie field names.
#[derive(Clone, Default, Deserialize)]
pub struct TokenResponse {
	/// Newly issued access token.
	#[serde(default, alias = "token")]
	pub access_token: Option<String>,
	/// Refresh token to present on the next renewal.
	#[serde(default, alias = "refreshToken")]
	pub refresh_token: Option<String>,
	/// Access token expiry in epoch milliseconds.
	#[serde(default, alias = "tokenExpires")]
	pub expires_at: Option<i64>,
	/// Token type hint; the backend always answers `bearer`.
	#[serde(default)]
	pub token_type: Option<String>,
}
impl TokenResponse {
	/// Converts the response into a complete [`CredentialBundle`].
	pub fn into_bundle(self) -> Result<CredentialBundle, CredentialBundleBuilderError> {
		let mut builder = CredentialBundle::builder();

		if let Some(access) = self.access_token {
			builder = builder.access_token(access);
		}
		if let Some(refresh) = self.refresh_token {
			builder = builder.refresh_token(refresh);
		}
		if let Some(millis) = self.expires_at {
			builder = builder.expires_at_millis(millis);
		}

		builder.build()
	}
}
impl Debug for TokenResponse {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("TokenResponse")
			.field("access_token", &self.access_token.as_ref().map(|_| "<redacted>"))
			.field("refresh_token", &self.refresh_token.as_ref().map(|_| "<redacted>"))
			.field("expires_at", &self.expires_at)
			.field("token_type", &self.token_type)
			.finish()
	}
}
