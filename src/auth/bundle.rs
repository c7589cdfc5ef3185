//! Atomic credential bundle (access token, refresh token, expiry) and its builder.

// crates.io
use serde::{Deserializer, Serializer, de::Error as DeError};
// self
use crate::{_prelude::*, auth::TokenSecret};

/// Lifecycle status of a bundle relative to an instant and a renewal skew.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum BundleStatus {
	/// The access token is trusted for longer than the renewal skew.
	Valid,
	/// The access token is still valid but falls inside the renewal skew.
	NearingExpiry,
	/// The access token must not be trusted anymore.
	Expired,
}

/// Errors produced by [`CredentialBundleBuilder`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ThisError)]
pub enum CredentialBundleBuilderError {
	/// Issued when no access token value was provided.
	#[error("Access token is required.")]
	MissingAccessToken,
	/// Issued when no refresh token value was provided.
	#[error("Refresh token is required.")]
	MissingRefreshToken,
	/// Issued when no expiry (absolute or relative) was configured.
	#[error("Expiry must be supplied via expires_at or expires_in.")]
	MissingExpiry,
	/// Issued when an epoch-millisecond expiry cannot be represented.
	#[error("Expiry {millis} ms is outside the supported range.")]
	ExpiryOutOfRange {
		/// Rejected epoch-millisecond value.
		millis: i64,
	},
}

/// Access token, refresh token, and expiry, stored and rotated as one unit.
///
/// The serialized form keeps the field names of the `auth-token-data` cookie
/// (`token`, `refreshToken`, `tokenExpires`) with the expiry in epoch milliseconds.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialBundle {
	/// Bearer credential presented on every authenticated call.
	#[serde(rename = "token")]
	pub access_token: TokenSecret,
	/// Secret presented only to the renewal endpoint.
	#[serde(rename = "refreshToken")]
	pub refresh_token: TokenSecret,
	/// Instant after which the access token must not be trusted.
	#[serde(rename = "tokenExpires", with = "epoch_millis")]
	pub expires_at: OffsetDateTime,
}
impl CredentialBundle {
	/// Returns a builder; all three fields are required.
	pub fn builder() -> CredentialBundleBuilder {
		CredentialBundleBuilder::default()
	}

	/// Computes the lifecycle status at `instant` for the given renewal skew.
	pub fn status_at(&self, instant: OffsetDateTime, skew: Duration) -> BundleStatus {
		if instant >= self.expires_at {
			return BundleStatus::Expired;
		}
		if self.expires_at - skew <= instant {
			return BundleStatus::NearingExpiry;
		}

		BundleStatus::Valid
	}

	/// Returns `true` when `expires_at - skew <= instant`.
	pub fn needs_renewal_at(&self, instant: OffsetDateTime, skew: Duration) -> bool {
		!matches!(self.status_at(instant, skew), BundleStatus::Valid)
	}

	/// Expiry expressed in epoch milliseconds.
	pub fn expires_at_millis(&self) -> i64 {
		epoch_millis::to_millis(self.expires_at)
	}
}
impl Debug for CredentialBundle {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("CredentialBundle")
			.field("access_token", &"<redacted>")
			.field("refresh_token", &"<redacted>")
			.field("expires_at", &self.expires_at)
			.finish()
	}
}

/// Builder for [`CredentialBundle`].
#[derive(Clone, Debug, Default)]
pub struct CredentialBundleBuilder {
	access_token: Option<TokenSecret>,
	refresh_token: Option<TokenSecret>,
	expires_at: Option<OffsetDateTime>,
	expires_at_millis: Option<i64>,
	expires_in: Option<Duration>,
}
impl CredentialBundleBuilder {
	/// Provides the access token value.
	pub fn access_token(mut self, token: impl Into<String>) -> Self {
		self.access_token = Some(TokenSecret::new(token));

		self
	}

	/// Provides the refresh token value.
	pub fn refresh_token(mut self, token: impl Into<String>) -> Self {
		self.refresh_token = Some(TokenSecret::new(token));

		self
	}

	/// Sets an absolute expiry instant.
	pub fn expires_at(mut self, instant: OffsetDateTime) -> Self {
		self.expires_at = Some(instant);

		self
	}

	/// Sets an absolute expiry in epoch milliseconds, the backend's wire format.
	pub fn expires_at_millis(mut self, millis: i64) -> Self {
		self.expires_at_millis = Some(millis);

		self
	}

	/// Sets a relative expiry measured from the current clock.
	pub fn expires_in(mut self, duration: Duration) -> Self {
		self.expires_in = Some(duration);

		self
	}

	/// Consumes the builder and produces a [`CredentialBundle`].
	pub fn build(self) -> Result<CredentialBundle, CredentialBundleBuilderError> {
		let access_token =
			self.access_token.ok_or(CredentialBundleBuilderError::MissingAccessToken)?;
		let refresh_token =
			self.refresh_token.ok_or(CredentialBundleBuilderError::MissingRefreshToken)?;
		let expires_at = match (self.expires_at, self.expires_at_millis, self.expires_in) {
			(Some(instant), _, _) => instant,
			(None, Some(millis), _) => epoch_millis::from_millis(millis)
				.map_err(|_| CredentialBundleBuilderError::ExpiryOutOfRange { millis })?,
			(None, None, Some(delta)) => OffsetDateTime::now_utc() + delta,
			(None, None, None) => return Err(CredentialBundleBuilderError::MissingExpiry),
		};

		Ok(CredentialBundle { access_token, refresh_token, expires_at })
	}
}

pub(crate) mod epoch_millis {
	// self
	use super::*;

	const NANOS_PER_MILLI: i128 = 1_000_000;

	pub(crate) fn to_millis(instant: OffsetDateTime) -> i64 {
		i64::try_from(instant.unix_timestamp_nanos() / NANOS_PER_MILLI).unwrap_or(i64::MAX)
	}

	pub(crate) fn from_millis(
		millis: i64,
	) -> std::result::Result<OffsetDateTime, time::error::ComponentRange> {
		OffsetDateTime::from_unix_timestamp_nanos(i128::from(millis) * NANOS_PER_MILLI)
	}

	pub(crate) fn serialize<S>(instant: &OffsetDateTime, serializer: S) -> Result<S::Ok, S::Error>
	where
		S: Serializer,
	{
		serializer.serialize_i64(to_millis(*instant))
	}

	pub(crate) fn deserialize<'de, D>(deserializer: D) -> Result<OffsetDateTime, D::Error>
	where
		D: Deserializer<'de>,
	{
		let millis = i64::deserialize(deserializer)?;

		from_millis(millis).map_err(D::Error::custom)
	}
}

#[cfg(test)]
mod tests {
	// crates.io
	use time::macros;
	// self
	use super::*;

	const SKEW: Duration = Duration::seconds(60);

	fn bundle_expiring_at(instant: OffsetDateTime) -> CredentialBundle {
		CredentialBundle::builder()
			.access_token("access")
			.refresh_token("refresh")
			.expires_at(instant)
			.build()
			.expect("Bundle fixture should build.")
	}

	#[test]
	fn status_honors_the_renewal_skew() {
		let bundle = bundle_expiring_at(macros::datetime!(2025-06-01 12:00 UTC));

		assert_eq!(bundle.status_at(macros::datetime!(2025-06-01 11:58 UTC), SKEW), BundleStatus::Valid);
		assert_eq!(
			bundle.status_at(macros::datetime!(2025-06-01 11:59 UTC), SKEW),
			BundleStatus::NearingExpiry
		);
		assert_eq!(
			bundle.status_at(macros::datetime!(2025-06-01 11:59:30 UTC), SKEW),
			BundleStatus::NearingExpiry
		);
		assert_eq!(bundle.status_at(macros::datetime!(2025-06-01 12:00 UTC), SKEW), BundleStatus::Expired);
	}

	#[test]
	fn renewal_boundary_is_inclusive() {
		let expires = macros::datetime!(2025-06-01 12:00 UTC);
		let bundle = bundle_expiring_at(expires);

		assert!(bundle.needs_renewal_at(expires - SKEW, SKEW));
		assert!(!bundle.needs_renewal_at(expires - SKEW - Duration::milliseconds(1), SKEW));
		assert!(!bundle.needs_renewal_at(expires - Duration::seconds(1), Duration::ZERO));
	}

	#[test]
	fn builder_requires_every_field() {
		let missing_refresh = CredentialBundle::builder()
			.access_token("access")
			.expires_in(Duration::hours(1))
			.build()
			.expect_err("Bundles without refresh tokens must be rejected.");

		assert_eq!(missing_refresh, CredentialBundleBuilderError::MissingRefreshToken);

		let missing_expiry = CredentialBundle::builder()
			.access_token("access")
			.refresh_token("refresh")
			.build()
			.expect_err("Bundles without expiry must be rejected.");

		assert_eq!(missing_expiry, CredentialBundleBuilderError::MissingExpiry);
	}

	#[test]
	fn builder_accepts_epoch_millis() {
		let bundle = CredentialBundle::builder()
			.access_token("access")
			.refresh_token("refresh")
			.expires_at_millis(1_748_779_200_123)
			.build()
			.expect("Epoch-millisecond expiries should build.");

		assert_eq!(bundle.expires_at, macros::datetime!(2025-06-01 12:00:00.123 UTC));
		assert_eq!(bundle.expires_at_millis(), 1_748_779_200_123);
	}

	#[test]
	fn serialized_form_matches_the_session_cookie() {
		let bundle = bundle_expiring_at(macros::datetime!(2025-06-01 12:00 UTC));
		let payload = serde_json::to_value(&bundle).expect("Bundle should serialize.");

		assert_eq!(
			payload,
			serde_json::json!({
				"token": "access",
				"refreshToken": "refresh",
				"tokenExpires": 1_748_779_200_000_i64,
			})
		);

		let restored: CredentialBundle =
			serde_json::from_value(payload).expect("Serialized bundle should deserialize.");

		assert_eq!(restored, bundle);
	}

	#[test]
	fn debug_output_redacts_secrets() {
		let rendered = format!("{:?}", bundle_expiring_at(macros::datetime!(2025-06-01 12:00 UTC)));

		assert!(!rendered.contains("access\""));
		assert!(rendered.contains("<redacted>"));
	}
}
