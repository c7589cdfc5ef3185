//! Authenticated request gateway.
//!
//! [`Gateway::send`] attaches the session's bearer credential to an outgoing call and, when
//! the stored bundle is inside the renewal skew, renews it first. Renewals are single-flight:
//! concurrent calls that observe an expiring bundle wait on one guard and reuse the bundle the
//! first caller obtained. A failed renewal clears the session and fails the call with
//! [`SessionExpiredError`](crate::error::SessionExpiredError) before the target is contacted.

pub mod request;

mod metrics;
mod renewal;
mod send;

pub use metrics::RenewalMetrics;
pub use request::*;

// self
use crate::{
	_prelude::*,
	auth::CredentialBundle,
	descriptor::ApiDescriptor,
	http::{GatewayHttpClient, ReqwestHttpClient},
	obs::{self, CallKind},
	store::CredentialStore,
};

/// Gateway specialized for the crate's default reqwest transport.
pub type ReqwestGateway = Gateway<ReqwestHttpClient>;

/// Routes backend calls through one session.
///
/// The gateway owns the transport, the credential store, and the descriptor so every typed
/// caller shares the same renewal policy. Clones share all state, including the
/// single-flight renewal guard.
pub struct Gateway<C = ReqwestHttpClient>
where
	C: ?Sized + GatewayHttpClient,
{
	/// HTTP transport used for every outbound call.
	pub http_client: Arc<C>,
	/// Store holding the session's credential bundle.
	pub store: Arc<dyn CredentialStore>,
	/// Backend service URLs and renewal policy.
	pub descriptor: ApiDescriptor,
	/// Shared counters for renewal outcomes.
	pub renewal_metrics: Arc<RenewalMetrics>,
	request_factory: ReqwestClient,
	renewal_guard: Arc<AsyncMutex<()>>,
}
impl<C> Gateway<C>
where
	C: ?Sized + GatewayHttpClient,
{
	/// Creates a gateway that dispatches through the caller-provided transport.
	pub fn with_http_client(
		store: Arc<dyn CredentialStore>,
		descriptor: ApiDescriptor,
		http_client: impl Into<Arc<C>>,
	) -> Self {
		Self::assemble(store, descriptor, http_client.into(), ReqwestClient::default())
	}

	fn assemble(
		store: Arc<dyn CredentialStore>,
		descriptor: ApiDescriptor,
		http_client: Arc<C>,
		request_factory: ReqwestClient,
	) -> Self {
		Self {
			http_client,
			store,
			descriptor,
			renewal_metrics: Default::default(),
			request_factory,
			renewal_guard: Default::default(),
		}
	}

	/// Returns the stored bundle, if any, without renewing it.
	pub async fn session(&self) -> Result<Option<CredentialBundle>> {
		Ok(self.store.get().await?)
	}

	/// Returns `true` when a bundle is stored.
	pub async fn is_authenticated(&self) -> Result<bool> {
		Ok(self.session().await?.is_some())
	}

	/// Persists a bundle obtained from a login, registration, or social-login exchange,
	/// replacing any previous session.
	pub async fn begin_session(&self, bundle: CredentialBundle) -> Result<()> {
		obs::decision(CallKind::SessionStart, "storing new credential bundle");

		Ok(self.store.set(bundle).await?)
	}

	/// Clears the stored bundle unconditionally; later calls are anonymous.
	pub async fn end_session(&self) -> Result<()> {
		obs::decision(CallKind::Logout, "clearing credential bundle");

		Ok(self.store.clear().await?)
	}
}
impl Gateway<ReqwestHttpClient> {
	/// Creates a gateway backed by its own reqwest transport.
	pub fn new(store: Arc<dyn CredentialStore>, descriptor: ApiDescriptor) -> Self {
		Self::with_reqwest(store, descriptor, ReqwestHttpClient::default())
	}

	/// Creates a gateway around a preconfigured reqwest transport; requests are assembled
	/// with the same client so its defaults (user agent, timeouts) apply.
	pub fn with_reqwest(
		store: Arc<dyn CredentialStore>,
		descriptor: ApiDescriptor,
		http_client: ReqwestHttpClient,
	) -> Self {
		let request_factory = http_client.0.clone();

		Self::assemble(store, descriptor, Arc::new(http_client), request_factory)
	}
}
impl<C> Clone for Gateway<C>
where
	C: ?Sized + GatewayHttpClient,
{
	fn clone(&self) -> Self {
		Self {
			http_client: Arc::clone(&self.http_client),
			store: Arc::clone(&self.store),
			descriptor: self.descriptor.clone(),
			renewal_metrics: Arc::clone(&self.renewal_metrics),
			request_factory: self.request_factory.clone(),
			renewal_guard: Arc::clone(&self.renewal_guard),
		}
	}
}
impl<C> Debug for Gateway<C>
where
	C: ?Sized + GatewayHttpClient,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Gateway")
			.field("descriptor", &self.descriptor)
			.field("renewal_metrics", &self.renewal_metrics)
			.finish()
	}
}
