//! Transport seam between the gateway and the HTTP stack.
//!
//! The gateway assembles every outgoing call as a [`reqwest::Request`] and hands it to a
//! [`GatewayHttpClient`]. The default implementation, [`ReqwestHttpClient`], executes it on a
//! shared [`ReqwestClient`]; tests and embedders can substitute their own transport (a
//! recording fake, a proxy-aware client, a webview bridge) without touching the gateway.

// std
use std::ops::Deref;
// self
use crate::{_prelude::*, error::ConfigError};

/// Boxed future returned by [`GatewayHttpClient::execute`].
pub type HttpFuture<'a, T> = Pin<Box<dyn Future<Output = T> + 'a + Send>>;

/// Abstraction over HTTP transports able to execute gateway requests.
///
/// Implementations must be `Send + Sync + 'static` so one transport can be shared across
/// cloned gateways, and the returned futures must be `Send` so gateway calls can hop
/// executor threads.
pub trait GatewayHttpClient
where
	Self: 'static + Send + Sync,
{
	/// Concrete error emitted by the underlying transport.
	type TransportError: 'static + Send + Sync + StdError;

	/// Executes `request` and returns the raw response, whatever its status.
	///
	/// Only failures to complete the exchange (DNS, connect, TLS, IO) are errors; 4xx and
	/// 5xx answers are ordinary responses.
	fn execute(
		&self,
		request: ReqwestRequest,
	) -> HttpFuture<'_, Result<ReqwestResponse, Self::TransportError>>;
}

/// Thin wrapper around [`ReqwestClient`] so shared HTTP behavior lives in one place.
#[derive(Clone, Debug, Default)]
pub struct ReqwestHttpClient(pub ReqwestClient);
impl ReqwestHttpClient {
	/// Wraps an existing reqwest [`ReqwestClient`].
	pub fn with_client(client: ReqwestClient) -> Self {
		Self(client)
	}

	/// Builds a client with the given user agent and request timeout.
	pub fn build(
		user_agent: &str,
		timeout: std::time::Duration,
	) -> Result<Self, ConfigError> {
		let client = ReqwestClient::builder()
			.user_agent(user_agent)
			.timeout(timeout)
			.build()
			.map_err(ConfigError::http_client_build)?;

		Ok(Self(client))
	}
}
impl AsRef<ReqwestClient> for ReqwestHttpClient {
	fn as_ref(&self) -> &ReqwestClient {
		&self.0
	}
}
impl Deref for ReqwestHttpClient {
	type Target = ReqwestClient;

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}
impl GatewayHttpClient for ReqwestHttpClient {
	type TransportError = ReqwestError;

	fn execute(
		&self,
		request: ReqwestRequest,
	) -> HttpFuture<'_, Result<ReqwestResponse, Self::TransportError>> {
		Box::pin(self.0.execute(request))
	}
}
