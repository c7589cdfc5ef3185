// crates.io
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
// self
use crate::{
	_prelude::*,
	auth::CredentialBundle,
	error::{ConfigError, TransportError},
	gateway::{Gateway, GatewayRequest, RequestBody, request},
	http::GatewayHttpClient,
	obs::{self, CallKind, CallOutcome, CallSpan},
};

impl<C> Gateway<C>
where
	C: ?Sized + GatewayHttpClient,
{
	/// Issues `request` against `target` as if the session held a perpetually valid credential.
	///
	/// `target` is resolved against the descriptor's base URL; absolute URLs pass through.
	/// The stored bundle is renewed first when it falls inside the renewal skew; a failed
	/// renewal clears the session and returns
	/// [`SessionExpired`](crate::error::Error::SessionExpired) without contacting `target`.
	/// The response is returned whatever its status; a 401 from the target is not retried.
	pub async fn send(
		&self,
		target: impl AsRef<str>,
		request: GatewayRequest,
	) -> Result<ReqwestResponse> {
		const KIND: CallKind = CallKind::Send;

		let span = CallSpan::new(KIND, "send");

		obs::record_call_outcome(KIND, CallOutcome::Attempt);

		let target = target.as_ref();
		let result = span
			.instrument(async move {
				let url = self.descriptor.resolve(target)?;
				let bundle = if request.anonymous {
					obs::decision(KIND, "anonymous request; skipping credential lookup");

					None
				} else {
					self.current_bundle().await?
				};
				let outgoing = self.assemble_request(url, request, bundle.as_ref())?;

				self.http_client
					.execute(outgoing)
					.await
					.map_err(|e| Error::from(TransportError::network(e)))
			})
			.await;

		match &result {
			Ok(_) => obs::record_call_outcome(KIND, CallOutcome::Success),
			Err(_) => obs::record_call_outcome(KIND, CallOutcome::Failure),
		}

		result
	}

	/// Reads the stored bundle, renewing it first when it is inside the renewal skew.
	pub(crate) async fn current_bundle(&self) -> Result<Option<CredentialBundle>> {
		let Some(bundle) = self.store.get().await? else {
			obs::decision(CallKind::Send, "no credential bundle; sending anonymously");

			return Ok(None);
		};
		let now = OffsetDateTime::now_utc();

		if !bundle.needs_renewal_at(now, self.descriptor.renewal_skew) {
			return Ok(Some(bundle));
		}

		self.renew().await.map(Some)
	}

	fn assemble_request(
		&self,
		url: Url,
		request: GatewayRequest,
		bundle: Option<&CredentialBundle>,
	) -> Result<ReqwestRequest> {
		let GatewayRequest { method, headers, body, timeout, .. } = request;
		let mut defaults = HeaderMap::new();

		if !body.is_binary() {
			defaults.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
		}
		if let Some(bundle) = bundle {
			let bearer = bundle
				.access_token
				.bearer_header()
				.map_err(ConfigError::InvalidCredentialHeader)?;

			defaults.insert(AUTHORIZATION, bearer);
		}

		let mut builder = self.request_factory.request(method, url);

		builder = match body {
			RequestBody::Empty => builder,
			RequestBody::Json(bytes) | RequestBody::Bytes(bytes) => builder.body(bytes),
			RequestBody::Multipart(form) => builder.multipart(form),
		};

		if let Some(timeout) = timeout {
			builder = builder.timeout(timeout);
		}

		builder
			.headers(request::merge_headers(defaults, headers))
			.build()
			.map_err(|e| ConfigError::RequestBuild(e).into())
	}
}
