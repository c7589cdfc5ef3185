//! Cooking agent callers.

// self
use crate::{
	_prelude::*,
	api::{self, Detection},
	descriptor,
	gateway::{Gateway, GatewayRequest},
	http::GatewayHttpClient,
};

/// Acknowledgement of a started cooking session.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StartCookingResponse {
	/// Identifier to poll with [`Gateway::cooking_status`].
	pub request_id: String,
	/// Outcome reported by the agent.
	pub status: String,
	/// Human-readable message for the user.
	pub message: String,
	/// Agent pipeline stage the session is in.
	pub stage: String,
}

/// Progress of a cooking session.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CookingStatus {
	/// Session identifier.
	pub request_id: String,
	/// Agent pipeline stage the session is in.
	pub stage: String,
	/// Session status.
	pub status: String,
	/// Creation timestamp as rendered by the agent.
	pub created_at: String,
	/// Last update timestamp as rendered by the agent.
	pub updated_at: String,
	/// Failure reported by the agent, if any.
	#[serde(default)]
	pub error: Option<String>,
}

#[derive(Serialize)]
struct StartCookingRequest<'a> {
	detected_ingredients: &'a [Detection],
}

impl<C> Gateway<C>
where
	C: ?Sized + GatewayHttpClient,
{
	/// Starts a cooking session for the ingredients detected in an upload.
	pub async fn start_cooking(&self, detected_ingredients: &[Detection]) -> Result<StartCookingResponse> {
		let url = descriptor::join(&self.descriptor.endpoints.agent, "start")?;
		let request =
			GatewayRequest::post().json(&StartCookingRequest { detected_ingredients })?;
		let response = self.send(url.as_str(), request).await?;

		api::read_json("Start agent", response).await
	}

	/// Polls the progress of a cooking session.
	pub async fn cooking_status(&self, request_id: &str) -> Result<CookingStatus> {
		let url =
			descriptor::join_segments(&self.descriptor.endpoints.agent, &["status", request_id])?;
		let response = self.send(url.as_str(), GatewayRequest::get()).await?;

		api::read_json("Fetch agent status", response).await
	}
}
