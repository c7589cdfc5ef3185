//! Cookie-backed [`CredentialStore`] mirroring the web client's `auth-token-data` cookie.
//!
//! The store keeps the percent-encoded cookie value in process and renders the `Cookie` and
//! `Set-Cookie` header values a host (server-side renderer, webview bridge) needs to keep the
//! browser copy in sync. The cookie is always written with `SameSite=Strict`.
//!
//! A cookie that no longer decodes into a bundle is treated as logged out and dropped on read,
//! so a damaged browser copy never locks the session into failing calls.

// crates.io
use url::form_urlencoded;
// self
use crate::{
	_prelude::*,
	auth::CredentialBundle,
	store::{CredentialStore, StoreError, StoreFuture},
};

/// Name of the cookie holding the serialized credential bundle.
pub const SESSION_COOKIE_NAME: &str = "auth-token-data";

/// In-process cookie jar holding the single session cookie.
#[derive(Clone, Debug, Default)]
pub struct CookieStore(Arc<RwLock<Option<String>>>);
impl CookieStore {
	/// Seeds the store from a request `Cookie` header (`name=value; other=value`).
	///
	/// Other cookies are ignored; a header without the session cookie yields an empty store.
	pub fn from_cookie_header(header: &str) -> Self {
		let value = header
			.split(';')
			.filter_map(|pair| pair.trim().split_once('='))
			.find(|(name, _)| *name == SESSION_COOKIE_NAME)
			.map(|(_, value)| value.to_owned())
			.filter(|value| !value.is_empty());

		Self(Arc::new(RwLock::new(value)))
	}

	/// Renders the `Cookie` request header fragment for the current session, if any.
	pub fn cookie_header(&self) -> Option<String> {
		self.0.read().as_ref().map(|value| format!("{SESSION_COOKIE_NAME}={value}"))
	}

	/// Renders the `Set-Cookie` response header that reproduces the current state: the
	/// session cookie when a bundle is stored, or an immediately-expiring deletion otherwise.
	pub fn set_cookie_header(&self) -> String {
		match self.0.read().as_ref() {
			Some(value) => format!("{SESSION_COOKIE_NAME}={value}; Path=/; SameSite=Strict"),
			None => format!("{SESSION_COOKIE_NAME}=; Path=/; SameSite=Strict; Max-Age=0"),
		}
	}

	fn encode(bundle: &CredentialBundle) -> Result<String, StoreError> {
		let json = serde_json::to_string(bundle).map_err(|e| StoreError::Serialization {
			message: format!("Failed to serialize session cookie: {e}"),
		})?;

		Ok(form_urlencoded::byte_serialize(json.as_bytes()).collect())
	}

	fn decode(raw: &str) -> Option<CredentialBundle> {
		// Encoded values contain no `&` or `=`, so the whole value decodes as one key.
		let json = form_urlencoded::parse(raw.as_bytes())
			.next()
			.map(|(decoded, _)| decoded.into_owned())
			.unwrap_or_default();

		serde_json::from_str(&json).ok()
	}
}
impl CredentialStore for CookieStore {
	fn get(&self) -> StoreFuture<'_, Option<CredentialBundle>> {
		let jar = self.0.clone();

		Box::pin(async move {
			let mut slot = jar.write();
			let bundle = slot.as_deref().and_then(Self::decode);

			if bundle.is_none() {
				slot.take();
			}

			Ok(bundle)
		})
	}

	fn set(&self, bundle: CredentialBundle) -> StoreFuture<'_, ()> {
		let jar = self.0.clone();

		Box::pin(async move {
			let encoded = Self::encode(&bundle)?;

			*jar.write() = Some(encoded);

			Ok(())
		})
	}

	fn clear(&self) -> StoreFuture<'_, ()> {
		let jar = self.0.clone();

		Box::pin(async move {
			jar.write().take();

			Ok(())
		})
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	fn bundle() -> CredentialBundle {
		CredentialBundle::builder()
			.access_token("access token+1")
			.refresh_token("refresh;1")
			.expires_at_millis(1_748_779_200_000)
			.build()
			.expect("Cookie fixture bundle should build.")
	}

	#[tokio::test]
	async fn set_cookie_header_is_same_site_strict() {
		let store = CookieStore::default();

		store.set(bundle()).await.expect("Setting the session cookie should succeed.");

		let header = store.set_cookie_header();

		assert!(header.starts_with("auth-token-data=%7B"));
		assert!(header.ends_with("; Path=/; SameSite=Strict"));
		assert!(!header[..header.find(';').expect("Attributes should follow the value.")]
			.contains(' '));

		store.clear().await.expect("Clearing the session cookie should succeed.");

		assert_eq!(
			store.set_cookie_header(),
			"auth-token-data=; Path=/; SameSite=Strict; Max-Age=0"
		);
		assert!(store.cookie_header().is_none());
	}

	#[tokio::test]
	async fn request_cookie_header_round_trips() {
		let store = CookieStore::default();

		store.set(bundle()).await.expect("Setting the session cookie should succeed.");

		let header = format!(
			"theme=dark; {}; locale=vi",
			store.cookie_header().expect("A stored bundle should render a cookie.")
		);
		let restored = CookieStore::from_cookie_header(&header)
			.get()
			.await
			.expect("Encoded cookies should decode.")
			.expect("The session cookie should be found among others.");

		assert_eq!(restored, bundle());
	}

	#[tokio::test]
	async fn missing_cookie_means_logged_out() {
		let store = CookieStore::from_cookie_header("theme=dark; auth-token-data=");

		assert!(store.get().await.expect("Empty stores should read.").is_none());
	}

	#[tokio::test]
	async fn corrupt_cookie_reads_as_logged_out_and_is_dropped() {
		let store = CookieStore::from_cookie_header("auth-token-data=%7Bbroken");

		assert_eq!(store.cookie_header().as_deref(), Some("auth-token-data=%7Bbroken"));
		assert!(store.get().await.expect("Corrupt cookies should read as empty.").is_none());
		assert!(store.cookie_header().is_none());
		assert_eq!(
			store.set_cookie_header(),
			"auth-token-data=; Path=/; SameSite=Strict; Max-Age=0"
		);
	}
}
