//! Demonstrates plugging a non-reqwest transport into the gateway.
//!
//! 1. Implement [`GatewayHttpClient`] for a type that answers from a script instead of the
//!    network; here the renewal endpoint always rejects the refresh token.
//! 2. Pass the transport to [`Gateway::with_http_client`].
//! 3. Observe that an expiring session is renewed, the renewal fails, the store is cleared, and
//!    the call reports [`SessionExpiredError`] without reaching its target.

// std
use std::{
	error::Error as StdError,
	fmt::{Display, Formatter, Result as FmtResult},
	sync::Arc,
};
// crates.io
use color_eyre::Result;
use time::Duration;
use url::Url;
// self
use ingredient_gateway::{
	auth::CredentialBundle,
	descriptor::ApiDescriptor,
	error::{Error, SessionExpiredError},
	gateway::{Gateway, GatewayRequest},
	http::{GatewayHttpClient, HttpFuture},
	reqwest::{Request, Response},
	store::{CredentialStore, MemoryStore},
};

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let bundle = CredentialBundle::builder()
		.access_token("demo-access")
		.refresh_token("demo-refresh-revoked")
		.expires_in(Duration::seconds(20))
		.build()?;
	let store = MemoryStore::with_bundle(bundle);
	let shared: Arc<dyn CredentialStore> = Arc::new(store.clone());
	let descriptor =
		ApiDescriptor::builder(Url::parse("https://food.example.com/")?).build()?;
	let gateway: Gateway<ScriptedHttpClient> =
		Gateway::with_http_client(shared, descriptor, ScriptedHttpClient);

	match gateway.send("detect/user/7", GatewayRequest::get()).await {
		Err(Error::SessionExpired(SessionExpiredError::Rejected { status })) => {
			println!("Renewal rejected with status {status}; please sign in again.");
		},
		Err(other) => return Err(other.into()),
		Ok(response) => println!("Unexpected response with status {}.", response.status()),
	}

	println!("Session present after rejection: {}.", store.snapshot().is_some());

	Ok(())
}

#[derive(Debug)]
struct ScriptedTransportError;
impl Display for ScriptedTransportError {
	fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
		f.write_str("scripted transport cannot reach this path")
	}
}
impl StdError for ScriptedTransportError {}

struct ScriptedHttpClient;
impl GatewayHttpClient for ScriptedHttpClient {
	type TransportError = ScriptedTransportError;

	fn execute(&self, request: Request) -> HttpFuture<'_, Result<Response, Self::TransportError>> {
		let is_renewal = request.url().path() == "/auth/refresh";

		Box::pin(async move {
			if !is_renewal {
				return Err(ScriptedTransportError);
			}

			let response = http::Response::builder()
				.status(401)
				.body("{\"detail\":\"Invalid refresh token\"}".to_owned())
				.map_err(|_| ScriptedTransportError)?;

			Ok(Response::from(response))
		})
	}
}
