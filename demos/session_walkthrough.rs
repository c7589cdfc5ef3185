//! Walks one session through login, a proactive renewal, and logout against a mock backend.
//!
//! 1. Log in; the issued bundle expires in 30 seconds, inside the 60 second renewal skew.
//! 2. Fetch the profile; the gateway renews the bundle first and sends the new access token.
//! 3. Log out; the bundle is cleared and later calls go out anonymously.

// std
use std::sync::Arc;
// crates.io
use color_eyre::Result;
use httpmock::prelude::*;
use time::OffsetDateTime;
use url::Url;
// self
use ingredient_gateway::{
	api::LoginRequest,
	descriptor::ApiDescriptor,
	gateway::ReqwestGateway,
	store::{CredentialStore, MemoryStore},
};

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let server = MockServer::start_async().await;
	let now_ms = i64::try_from(OffsetDateTime::now_utc().unix_timestamp_nanos() / 1_000_000)?;
	let login_mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/auth/login");
			then.status(200).header("content-type", "application/json").json_body(
				serde_json::json!({
					"access_token": "demo-access",
					"refresh_token": "demo-refresh",
					"expires_at": now_ms + 30_000,
					"token_type": "bearer",
				}),
			);
		})
		.await;
	let refresh_mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/auth/refresh");
			then.status(200).header("content-type", "application/json").json_body(
				serde_json::json!({
					"access_token": "demo-access-renewed",
					"refresh_token": "demo-refresh-renewed",
					"expires_at": now_ms + 3_600_000,
					"token_type": "bearer",
				}),
			);
		})
		.await;
	let me_mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/auth/me").header("authorization", "Bearer demo-access-renewed");
			then.status(200).header("content-type", "application/json").body(
				"{\"username\":\"demo\",\"email\":\"demo@example.com\",\"email_verified\":true,\"provider\":\"email\",\"has_password\":true}",
			);
		})
		.await;
	let logout_mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/auth/logout");
			then.status(200).body("{\"message\":\"Logged out successfully\"}");
		})
		.await;
	let store = MemoryStore::default();
	let shared: Arc<dyn CredentialStore> = Arc::new(store.clone());
	let descriptor = ApiDescriptor::builder(Url::parse(&server.url("/"))?).build()?;
	let gateway = ReqwestGateway::new(shared, descriptor);
	let bundle = gateway.login(&LoginRequest::email("demo@example.com", "demo-password")).await?;

	println!("Logged in; access token expires at {} ms.", bundle.expires_at_millis());

	let profile = gateway.me().await?;

	println!("Profile loaded for {} after {} renewal(s).", profile.username, gateway.renewal_metrics.successes());

	gateway.logout().await?;

	println!("Logged out; session present: {}.", store.snapshot().is_some());

	login_mock.assert_async().await;
	refresh_mock.assert_async().await;
	me_mock.assert_async().await;
	logout_mock.assert_async().await;

	Ok(())
}
