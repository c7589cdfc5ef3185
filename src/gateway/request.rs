//! Caller-facing request options for [`Gateway::send`](crate::gateway::Gateway::send).

// crates.io
use reqwest::{
	header::{HeaderMap, HeaderName, HeaderValue},
	multipart::Form,
};
// self
use crate::{_prelude::*, error::ConfigError};

/// Body attached to a gateway request.
#[derive(Debug, Default)]
pub enum RequestBody {
	/// No body.
	#[default]
	Empty,
	/// Pre-serialized JSON document.
	Json(Vec<u8>),
	/// Opaque binary payload; the caller supplies its own content type, if any.
	Bytes(Vec<u8>),
	/// Multipart form; the transport writes the boundary into the content type.
	Multipart(Form),
}
impl RequestBody {
	/// Returns `true` when the default `application/json` content type must be omitted.
	pub fn is_binary(&self) -> bool {
		matches!(self, Self::Bytes(_) | Self::Multipart(_))
	}
}

/// Method, headers, and body of a call routed through the gateway.
///
/// Headers set here are merged on top of the gateway defaults (`Authorization`,
/// `Content-Type`): a caller header replaces the default with the same name and leaves the
/// others in place.
#[derive(Debug)]
pub struct GatewayRequest {
	/// HTTP method.
	pub method: Method,
	/// Caller-supplied headers.
	pub headers: HeaderMap,
	/// Request body.
	pub body: RequestBody,
	/// Optional per-call timeout applied by the transport.
	pub timeout: Option<std::time::Duration>,
	/// Skips the credential lookup: no bearer header, no renewal.
	pub anonymous: bool,
}
impl GatewayRequest {
	/// Creates an empty request with the given method.
	pub fn new(method: Method) -> Self {
		Self {
			method,
			headers: HeaderMap::new(),
			body: RequestBody::Empty,
			timeout: None,
			anonymous: false,
		}
	}

	/// `GET` request.
	pub fn get() -> Self {
		Self::new(Method::GET)
	}

	/// `POST` request.
	pub fn post() -> Self {
		Self::new(Method::POST)
	}

	/// `PUT` request.
	pub fn put() -> Self {
		Self::new(Method::PUT)
	}

	/// `PATCH` request.
	pub fn patch() -> Self {
		Self::new(Method::PATCH)
	}

	/// `DELETE` request.
	pub fn delete() -> Self {
		Self::new(Method::DELETE)
	}

	/// Serializes `body` as the JSON payload.
	pub fn json<T>(mut self, body: &T) -> Result<Self, ConfigError>
	where
		T: ?Sized + Serialize,
	{
		self.body = RequestBody::Json(serde_json::to_vec(body)?);

		Ok(self)
	}

	/// Attaches an opaque binary payload.
	pub fn bytes(mut self, body: impl Into<Vec<u8>>) -> Self {
		self.body = RequestBody::Bytes(body.into());

		self
	}

	/// Attaches a multipart form.
	pub fn multipart(mut self, form: Form) -> Self {
		self.body = RequestBody::Multipart(form);

		self
	}

	/// Appends a typed header.
	pub fn header(mut self, name: HeaderName, value: HeaderValue) -> Self {
		self.headers.append(name, value);

		self
	}

	/// Appends a header from strings, validating both parts.
	pub fn try_header(self, name: &str, value: &str) -> Result<Self, ConfigError> {
		let invalid = || ConfigError::InvalidHeader { name: name.to_owned() };
		let header_name = HeaderName::from_bytes(name.as_bytes()).map_err(|_| invalid())?;
		let header_value = HeaderValue::from_str(value).map_err(|_| invalid())?;

		Ok(self.header(header_name, header_value))
	}

	/// Sends the call without credentials even when a session is stored.
	///
	/// Used by the sign-in endpoints, which must not trigger a renewal of a stale session.
	pub fn anonymous(mut self) -> Self {
		self.anonymous = true;

		self
	}

	/// Sets a per-call timeout.
	pub fn timeout(mut self, timeout: std::time::Duration) -> Self {
		self.timeout = Some(timeout);

		self
	}
}
impl Default for GatewayRequest {
	fn default() -> Self {
		Self::get()
	}
}

/// Merges caller headers on top of `defaults`: every caller header name replaces the default
/// entry of the same name; all caller values for that name are kept.
pub(crate) fn merge_headers(mut defaults: HeaderMap, overrides: HeaderMap) -> HeaderMap {
	for name in overrides.keys() {
		defaults.remove(name);
	}
	for (name, value) in overrides.iter() {
		defaults.append(name.clone(), value.clone());
	}

	defaults
}
