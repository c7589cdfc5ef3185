//! Shared fixtures for the gateway integration suites.

#![allow(dead_code)]

// std
use std::sync::Arc;
// crates.io
use httpmock::MockServer;
use time::{Duration, OffsetDateTime};
// self
use ingredient_gateway::{
	auth::CredentialBundle,
	descriptor::ApiDescriptor,
	gateway::ReqwestGateway,
	store::{CredentialStore, MemoryStore},
	url::Url,
};

/// Builds a descriptor whose services all live on the mock server.
pub fn descriptor_for(server: &MockServer) -> ApiDescriptor {
	ApiDescriptor::builder(
		Url::parse(&server.url("/")).expect("Mock server base URL should parse successfully."),
	)
	.build()
	.expect("Descriptor for the mock server should build successfully.")
}

/// Builds a bundle expiring `expires_in` from now.
pub fn bundle_expiring_in(access: &str, refresh: &str, expires_in: Duration) -> CredentialBundle {
	CredentialBundle::builder()
		.access_token(access)
		.refresh_token(refresh)
		.expires_at(OffsetDateTime::now_utc() + expires_in)
		.build()
		.expect("Bundle fixture should build successfully.")
}

/// Current clock in epoch milliseconds.
pub fn now_millis() -> i64 {
	i64::try_from(OffsetDateTime::now_utc().unix_timestamp_nanos() / 1_000_000)
		.expect("Current time should fit into epoch milliseconds.")
}

/// Renewal response body in the backend's wire format.
pub fn renewal_body(access: &str, refresh: &str, expires_at_millis: i64) -> String {
	serde_json::json!({
		"access_token": access,
		"refresh_token": refresh,
		"expires_at": expires_at_millis,
		"token_type": "bearer",
	})
	.to_string()
}

/// Gateway on the mock server backed by a memory store, optionally seeded.
pub fn build_gateway(
	server: &MockServer,
	seed: Option<CredentialBundle>,
) -> (ReqwestGateway, MemoryStore) {
	let store = seed.map(MemoryStore::with_bundle).unwrap_or_default();
	let shared: Arc<dyn CredentialStore> = Arc::new(store.clone());

	(ReqwestGateway::new(shared, descriptor_for(server)), store)
}
