//! Gateway-level error types shared across the gateway, stores, and typed API callers.

// self
use crate::_prelude::*;

/// Gateway-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical gateway error exposed by public APIs.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Storage-layer failure.
	#[error("{0}")]
	Storage(
		#[from]
		#[source]
		crate::store::StoreError,
	),
	/// Local configuration or request construction problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Transport failure (DNS, TCP, TLS) while issuing the target call.
	#[error(transparent)]
	Transport(#[from] TransportError),
	/// Credential renewal failed; the user must authenticate again.
	#[error(transparent)]
	SessionExpired(#[from] SessionExpiredError),

	/// Backend answered a typed call with a non-success status.
	#[error("{operation} failed: {status} - {body}")]
	Api {
		/// Typed operation that issued the call.
		operation: &'static str,
		/// HTTP status code returned by the backend.
		status: u16,
		/// Raw response body, lossily decoded as UTF-8.
		body: String,
	},
	/// Backend answered a typed call with JSON that does not match the expected shape.
	#[error("{operation} returned a malformed body.")]
	Decode {
		/// Typed operation that issued the call.
		operation: &'static str,
		/// Structured parsing failure naming the offending field.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
	},
	/// A session-start call succeeded but its token response lacks a bundle field.
	#[error("{operation} returned incomplete credentials.")]
	IncompleteCredentials {
		/// Typed operation that issued the call.
		operation: &'static str,
		/// Missing or invalid bundle field.
		#[source]
		source: crate::auth::CredentialBundleBuilderError,
	},
}
impl Error {
	/// Returns `true` when the caller should send the user back to the sign-in screen.
	pub fn is_session_expired(&self) -> bool {
		matches!(self, Self::SessionExpired(_))
	}
}

/// Configuration and request-construction failures raised by the gateway.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
	/// The request target cannot be resolved against the descriptor's base URL.
	#[error("Request target `{target}` cannot be resolved.")]
	InvalidTarget {
		/// Target string supplied by the caller.
		target: String,
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// The stored access token cannot be rendered as an HTTP header value.
	#[error("Access token cannot be used as an Authorization header.")]
	InvalidCredentialHeader(#[source] reqwest::header::InvalidHeaderValue),
	/// A caller-supplied header name or value is invalid.
	#[error("Header `{name}` is invalid.")]
	InvalidHeader {
		/// Header name as supplied by the caller.
		name: String,
	},
	/// The request body could not be serialized as JSON.
	#[error("Request body could not be serialized as JSON.")]
	SerializeBody(#[from] serde_json::Error),
	/// A multipart part carries an invalid MIME type.
	#[error("Upload MIME type `{mime}` is invalid.")]
	InvalidMime {
		/// MIME string supplied by the caller.
		mime: String,
		/// Underlying reqwest validation failure.
		#[source]
		source: ReqwestError,
	},
	/// The outgoing request could not be assembled.
	#[error("Outgoing request could not be assembled.")]
	RequestBuild(#[source] ReqwestError),
	/// A query date could not be formatted.
	#[error("Query date could not be formatted.")]
	DateFormat(#[from] time::error::Format),
}
impl ConfigError {
	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}
}

/// Reasons a renewal attempt invalidated the session.
#[derive(Debug, ThisError)]
pub enum SessionExpiredError {
	/// The renewal endpoint answered with a non-success status.
	#[error("Session expired: the renewal endpoint answered with status {status}.")]
	Rejected {
		/// HTTP status code returned by the renewal endpoint.
		status: u16,
	},
	/// The renewal call could not be completed.
	#[error("Session expired: the renewal call could not be completed.")]
	Transport {
		/// Underlying transport failure.
		#[source]
		source: TransportError,
	},
	/// The renewal endpoint returned JSON that does not describe a credential bundle.
	#[error("Session expired: the renewal endpoint returned malformed JSON.")]
	MalformedResponse {
		/// Structured parsing failure.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
		/// HTTP status code of the renewal response.
		status: u16,
	},
	/// The renewal response parsed but lacks one of the bundle fields.
	#[error("Session expired: the renewal response is incomplete.")]
	IncompleteBundle(#[from] crate::auth::CredentialBundleBuilderError),
	/// The session was cleared while this call waited for a concurrent renewal.
	#[error("Session expired: the session ended while waiting for a concurrent renewal.")]
	Ended,
}

/// Transport-level failures (network, IO).
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while calling the backend.")]
	Network {
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// Underlying IO failure surfaced during transport.
	#[error("I/O error occurred while calling the backend.")]
	Io(#[from] std::io::Error),
}
impl TransportError {
	/// Wraps a transport-specific network error.
	pub fn network(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Network { source: Box::new(src) }
	}
}
impl From<ReqwestError> for TransportError {
	fn from(e: ReqwestError) -> Self {
		Self::network(e)
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::store::StoreError;

	#[test]
	fn session_expired_is_detectable_through_the_gateway_error() {
		let error: Error = SessionExpiredError::Rejected { status: 401 }.into();

		assert!(error.is_session_expired());
		assert!(error.to_string().contains("401"));

		let error: Error = StoreError::Backend { message: "disk full".into() }.into();

		assert!(!error.is_session_expired());
	}

	#[test]
	fn transport_failures_keep_their_source() {
		let io = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "refused");
		let error = SessionExpiredError::Transport { source: TransportError::Io(io) };
		let source = StdError::source(&error)
			.expect("Transport-caused expiry should expose the transport failure.");

		assert_eq!(source.to_string(), "I/O error occurred while calling the backend.");
	}

	#[test]
	fn api_errors_render_status_and_body() {
		let error = Error::Api {
			operation: "Fetch detect detail",
			status: 404,
			body: "{\"detail\":\"Detect not found\"}".into(),
		};

		assert_eq!(
			error.to_string(),
			"Fetch detect detail failed: 404 - {\"detail\":\"Detect not found\"}"
		);
	}
}
