//! Single-flight credential renewal.
//!
//! Callers reach [`Gateway::renew`] only after observing a bundle inside the renewal skew.
//! The guard serializes renewals; once a caller holds it, the store is read again so callers
//! queued behind a successful renewal reuse its bundle instead of presenting a refresh token
//! that was just rotated. Two gateways sharing one store do not share the guard, so their
//! renewals can still race and the last write wins.

// self
use crate::{
	_prelude::*,
	auth::{CredentialBundle, TokenResponse},
	error::{SessionExpiredError, TransportError},
	gateway::Gateway,
	http::GatewayHttpClient,
	obs::{self, CallKind, CallOutcome, CallSpan},
};

#[derive(Serialize)]
struct RenewalRequest<'a> {
	refresh_token: &'a str,
}

impl<C> Gateway<C>
where
	C: ?Sized + GatewayHttpClient,
{
	/// Renews the stored bundle, or reuses one renewed while this call waited on the guard.
	pub(crate) async fn renew(&self) -> Result<CredentialBundle> {
		const KIND: CallKind = CallKind::Renewal;

		let span = CallSpan::new(KIND, "renew");

		obs::record_call_outcome(KIND, CallOutcome::Attempt);

		let result = span
			.instrument(async move {
				let _singleflight = self.renewal_guard.lock().await;
				let Some(current) = self.store.get().await? else {
					obs::decision(KIND, "session ended while waiting for renewal");

					return Err(Error::from(SessionExpiredError::Ended));
				};

				if !current.needs_renewal_at(OffsetDateTime::now_utc(), self.descriptor.renewal_skew)
				{
					self.renewal_metrics.record_reuse();
					obs::decision(KIND, "reusing bundle renewed by a concurrent call");

					return Ok(current);
				}

				let request = self.renewal_request(&current)?;

				self.renewal_metrics.record_attempt();

				match self.exchange_refresh_token(request).await {
					Ok(renewed) => {
						self.store.set(renewed.clone()).await?;
						self.renewal_metrics.record_success();
						obs::decision(KIND, "credential bundle renewed");

						Ok(renewed)
					},
					Err(expired) => {
						self.renewal_metrics.record_failure();
						obs::session_failure(KIND, &expired);
						self.store.clear().await?;

						Err(expired.into())
					},
				}
			})
			.await;

		match &result {
			Ok(_) => obs::record_call_outcome(KIND, CallOutcome::Success),
			Err(_) => obs::record_call_outcome(KIND, CallOutcome::Failure),
		}

		result
	}

	fn renewal_request(&self, current: &CredentialBundle) -> Result<ReqwestRequest> {
		let url = self.descriptor.renewal_url()?;
		let body = RenewalRequest { refresh_token: current.refresh_token.expose() };

		self.request_factory
			.post(url)
			.json(&body)
			.build()
			.map_err(|e| crate::error::ConfigError::RequestBuild(e).into())
	}

	async fn exchange_refresh_token(
		&self,
		request: ReqwestRequest,
	) -> Result<CredentialBundle, SessionExpiredError> {
		let response = self
			.http_client
			.execute(request)
			.await
			.map_err(|e| SessionExpiredError::Transport { source: TransportError::network(e) })?;
		let status = response.status();

		if !status.is_success() {
			return Err(SessionExpiredError::Rejected { status: status.as_u16() });
		}

		let body = response
			.bytes()
			.await
			.map_err(|e| SessionExpiredError::Transport { source: TransportError::from(e) })?;
		let mut deserializer = serde_json::Deserializer::from_slice(&body);
		let parsed: TokenResponse = serde_path_to_error::deserialize(&mut deserializer)
			.map_err(|source| SessionExpiredError::MalformedResponse {
				source,
				status: status.as_u16(),
			})?;

		Ok(parsed.into_bundle()?)
	}
}
