//! Typed callers for the backend services, each routed through [`Gateway::send`].
//!
//! Every caller is a thin layer: build the request, send it through the gateway, and map a
//! non-success status to [`Error::Api`] carrying the response body. Renewal, bearer
//! attachment, and session clearing all happen inside the gateway.

pub mod agent;
pub mod auth;
pub mod detect;
pub mod upload;

pub use agent::*;
pub use auth::*;
pub use detect::*;
pub use upload::*;

// self
use crate::{_prelude::*, error::TransportError};

/// Reads a JSON body from a successful response, or maps the status to [`Error::Api`].
pub(crate) async fn read_json<T>(operation: &'static str, response: ReqwestResponse) -> Result<T>
where
	T: DeserializeOwned,
{
	let bytes = read_success(operation, response).await?;
	let mut deserializer = serde_json::Deserializer::from_slice(&bytes);

	serde_path_to_error::deserialize(&mut deserializer)
		.map_err(|source| Error::Decode { operation, source })
}

/// Returns the body of a successful response, or maps the status to [`Error::Api`].
pub(crate) async fn read_success(
	operation: &'static str,
	response: ReqwestResponse,
) -> Result<Vec<u8>> {
	let status = response.status();
	let bytes = response.bytes().await.map_err(TransportError::from)?;

	if !status.is_success() {
		return Err(Error::Api {
			operation,
			status: status.as_u16(),
			body: String::from_utf8_lossy(&bytes).into_owned(),
		});
	}

	Ok(bytes.to_vec())
}

/// Generic acknowledgement returned by endpoints that only report a message.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageResponse {
	/// Human-readable confirmation.
	pub message: String,
}
